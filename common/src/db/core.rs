use crate::db::component::{Component, Pin};
use crate::db::indices::{ComponentId, NetId, PinRef};
use crate::db::netlist::Netlist;
use crate::error::DesignError;
use crate::geom::rtree::ObstacleIndex;
use crate::geom::{Coordinate, Obstacle, Rect};
use std::collections::{BTreeMap, HashMap};

/// The routed board: components, net classes, obstacles and layer names.
pub struct Design {
    pub components: Vec<Component>,
    pub netlists: BTreeMap<i32, Netlist>,
    pub obstacles: Vec<Obstacle>,
    pub layers: BTreeMap<i32, String>,

    pub component_name_map: HashMap<String, ComponentId>,
    pub net_name_map: HashMap<String, NetId>,

    obstacle_index: ObstacleIndex,
}

impl Design {
    pub fn new() -> Self {
        Self {
            components: Vec::new(),
            netlists: BTreeMap::new(),
            obstacles: Vec::new(),
            layers: BTreeMap::new(),
            component_name_map: HashMap::new(),
            net_name_map: HashMap::new(),
            obstacle_index: ObstacleIndex::new(),
        }
    }

    pub fn num_components(&self) -> usize {
        self.components.len()
    }

    pub fn add_layer(&mut self, index: i32, name: impl Into<String>) {
        self.layers.insert(index, name.into());
    }

    pub fn layer_name(&self, index: i32) -> Option<&str> {
        self.layers.get(&index).map(String::as_str)
    }

    /// Net id for `name`, allocating a fresh one on first use.
    pub fn net_id(&mut self, name: &str) -> NetId {
        if let Some(&id) = self.net_name_map.get(name) {
            return id;
        }
        let id = NetId::new(self.net_name_map.len());
        self.net_name_map.insert(name.to_string(), id);
        id
    }

    pub fn add_component(
        &mut self,
        name: impl Into<String>,
        pins: Vec<Pin>,
    ) -> Result<ComponentId, DesignError> {
        let name = name.into();
        if self.component_name_map.contains_key(&name) {
            return Err(DesignError::DuplicateComponent(name));
        }
        let component = Component::new(name.clone(), pins)?;
        let id = ComponentId::new(self.components.len());
        self.components.push(component);
        self.component_name_map.insert(name, id);
        Ok(id)
    }

    pub fn component(&self, id: ComponentId) -> &Component {
        &self.components[id.index()]
    }

    pub fn component_by_name(&self, name: &str) -> Option<ComponentId> {
        self.component_name_map.get(name).copied()
    }

    pub fn create_netlist(&mut self, key: i32) -> Result<&mut Netlist, DesignError> {
        if self.netlists.contains_key(&key) {
            return Err(DesignError::DuplicateNetlist(key));
        }
        Ok(self.netlists.entry(key).or_insert_with(|| Netlist::new(key)))
    }

    pub fn netlist(&self, key: i32) -> Result<&Netlist, DesignError> {
        self.netlists.get(&key).ok_or(DesignError::UnknownNetlist(key))
    }

    pub fn resolve_pin(&self, component: &str, pin: &str) -> Result<PinRef, DesignError> {
        let cid = self
            .component_by_name(component)
            .ok_or_else(|| DesignError::UnknownComponent(component.to_string()))?;
        let pid = self.components[cid.index()]
            .pin_id(pin)
            .ok_or_else(|| DesignError::UnknownPin {
                component: component.to_string(),
                pin: pin.to_string(),
            })?;
        Ok(PinRef {
            component: cid,
            pin: pid,
        })
    }

    pub fn pin_coordinate(&self, pin: PinRef) -> Coordinate {
        self.components[pin.component.index()].pin(pin.pin).coordinate
    }

    pub fn add_obstacle(&mut self, obstacle: Obstacle) {
        let id = self.obstacles.len();
        self.obstacle_index.insert(obstacle.rect, obstacle.layer, id);
        self.obstacles.push(obstacle);
    }

    pub fn obstacles_in(&self, area: Rect, layer: i32) -> impl Iterator<Item = &Obstacle> {
        self.obstacle_index
            .query(area, layer)
            .into_iter()
            .map(move |id| &self.obstacles[id])
    }

    /// Bounding box of every pin and obstacle, or `None` for an empty design.
    pub fn extent(&self) -> Option<Rect> {
        let comps = self.components.iter().map(|c| c.bounding_rect());
        let obstacles = self.obstacles.iter().map(|o| o.rect);
        comps.chain(obstacles).reduce(|a, b| a.union(&b))
    }
}

impl Default for Design {
    fn default() -> Self {
        Self::new()
    }
}
