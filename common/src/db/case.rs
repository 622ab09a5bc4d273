//! Serde description of a routing case, used by the binary and by tests to
//! populate a [`Design`] without a board-file parser.

use crate::db::component::Pin;
use crate::db::core::Design;
use crate::db::indices::{ComponentId, PinId, PinRef};
use crate::geom::{Coordinate, Obstacle};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
pub struct CaseFile {
    #[serde(default)]
    pub layers: Vec<LayerEntry>,
    #[serde(default)]
    pub components: Vec<ComponentEntry>,
    #[serde(default)]
    pub obstacles: Vec<ObstacleEntry>,
    #[serde(default)]
    pub netlists: Vec<NetlistEntry>,
}

#[derive(Debug, Deserialize)]
pub struct LayerEntry {
    pub index: i32,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ComponentEntry {
    pub name: String,
    pub pins: Vec<PinEntry>,
}

#[derive(Debug, Deserialize)]
pub struct PinEntry {
    pub name: String,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub layer: i32,
    pub net: String,
}

#[derive(Debug, Deserialize)]
pub struct ObstacleEntry {
    #[serde(default)]
    pub layer: i32,
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

#[derive(Debug, Deserialize)]
pub struct NetlistEntry {
    pub key: i32,
    pub nets: Vec<String>,
}

impl CaseFile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read case file {:?}", path))?;
        toml::from_str(&text).with_context(|| format!("Invalid case description in {:?}", path))
    }

    pub fn into_design(self) -> Result<Design> {
        let mut design = Design::new();

        for layer in self.layers {
            design.add_layer(layer.index, layer.name);
        }

        for comp in self.components {
            let pins: Vec<Pin> = comp
                .pins
                .into_iter()
                .map(|p| {
                    let net = design.net_id(&p.net);
                    Pin::new(p.name, Coordinate::new(p.x, p.y, p.layer), net)
                })
                .collect();
            design
                .add_component(comp.name.clone(), pins)
                .with_context(|| format!("Component '{}'", comp.name))?;
        }

        for o in self.obstacles {
            let obstacle = Obstacle::new(
                Coordinate::new(o.x0, o.y0, o.layer),
                Coordinate::new(o.x1, o.y1, o.layer),
            )?;
            design.add_obstacle(obstacle);
        }

        for entry in self.netlists {
            let mut members: Vec<(String, Vec<PinRef>)> = Vec::with_capacity(entry.nets.len());
            for net_name in &entry.nets {
                let Some(&net) = design.net_name_map.get(net_name) else {
                    log::warn!("Netlist {}: net '{}' has no pins, skipped", entry.key, net_name);
                    continue;
                };
                let mut pins = Vec::new();
                for (ci, comp) in design.components.iter().enumerate() {
                    for (pi, pin) in comp.pins().iter().enumerate() {
                        if pin.net == net {
                            pins.push(PinRef {
                                component: ComponentId::new(ci),
                                pin: PinId::new(pi),
                            });
                        }
                    }
                }
                members.push((net_name.clone(), pins));
            }

            let ids: Vec<_> = members
                .iter()
                .map(|(name, _)| design.net_name_map[name])
                .collect();
            let netlist = design.create_netlist(entry.key)?;
            for ((name, pins), id) in members.into_iter().zip(ids) {
                netlist.add_net(name, id)?.pins = pins;
            }
        }

        Ok(design)
    }
}
