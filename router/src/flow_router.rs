use crate::error::RouterError;
use crate::graph::TileGraph;
use pcb_common::db::core::Design;
use pcb_common::db::indices::{ComponentId, NetId};
use pcb_common::geom::{Segment, Via};
use pcb_common::util::config::FlowRoutingConfig;
use pcb_common::util::profiler::StageTimer;
use rayon::prelude::*;
use serde::Serialize;

/// Whether every pin of a component found an escape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum FlowStatus {
    Complete,
    Partial { routed: i64, demand: i64 },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PinEscape {
    pub pin: String,
    pub net: NetId,
    /// Layer the pin leaves the component on.
    pub layer: i32,
}

/// Via and wiring assignment for one component's escape routing.
#[derive(Clone, Debug, Serialize)]
pub struct EscapePlan {
    pub component: String,
    pub status: FlowStatus,
    pub flow: i64,
    pub cost: i64,
    pub escapes: Vec<PinEscape>,
    pub vias: Vec<Via>,
    pub segments: Vec<Segment>,
}

impl EscapePlan {
    pub fn is_complete(&self) -> bool {
        self.status == FlowStatus::Complete
    }
}

/// Builds, solves and decodes the flow graph of one component.
pub fn plan_component(
    design: &Design,
    id: ComponentId,
    config: &FlowRoutingConfig,
) -> Result<EscapePlan, RouterError> {
    let comp = design.component(id);
    let mut graph = TileGraph::build(design, id, config)?;
    let result = graph.solve();
    let demand = graph.demand();

    let status = if result.flow == demand {
        FlowStatus::Complete
    } else {
        log::warn!(
            "Component '{}': only {}/{} pins escaped",
            comp.name(),
            result.flow,
            demand
        );
        FlowStatus::Partial {
            routed: result.flow,
            demand,
        }
    };

    let mut escapes = Vec::new();
    let mut vias = Vec::new();
    let mut segments = Vec::new();
    for (pin_id, path) in graph.pin_paths() {
        let pin = comp.pin(pin_id);
        let net = pin.net;
        let mut exit_layer = pin.coordinate.z;

        for pair in path.windows(2) {
            let a = graph.vertex(pair[0]);
            let b = graph.vertex(pair[1]);
            if !a.is_geometric() || !b.is_geometric() {
                continue;
            }
            exit_layer = b.layer();
            if a.layer() != b.layer() {
                vias.push(Via::new(a.coordinate, b.layer(), Some(net))?);
            } else if a.coordinate != b.coordinate {
                segments.push(Segment::new(a.coordinate, b.coordinate, net)?);
            }
        }

        escapes.push(PinEscape {
            pin: pin.name.clone(),
            net,
            layer: exit_layer,
        });
    }

    log::debug!(
        "Component '{}': flow {} cost {}, {} vias, {} segments",
        comp.name(),
        result.flow,
        result.cost,
        vias.len(),
        segments.len()
    );

    Ok(EscapePlan {
        component: comp.name().to_string(),
        status,
        flow: result.flow,
        cost: result.cost,
        escapes,
        vias,
        segments,
    })
}

/// Plans every component independently and in parallel.
pub fn run(design: &Design, config: &FlowRoutingConfig) -> Result<Vec<EscapePlan>, RouterError> {
    let _timer = StageTimer::new("Escape routing");
    log::info!(
        "Escape routing {} components over {} layers",
        design.num_components(),
        config.layers
    );

    let plans: Vec<EscapePlan> = (0..design.num_components())
        .into_par_iter()
        .map(|i| plan_component(design, ComponentId::new(i), config))
        .collect::<Result<_, _>>()?;

    let complete = plans.iter().filter(|p| p.is_complete()).count();
    let vias: usize = plans.iter().map(|p| p.vias.len()).sum();
    log::info!(
        "Escape routing done: {}/{} components complete, {} vias",
        complete,
        plans.len(),
        vias
    );
    Ok(plans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcb_common::db::component::Pin;
    use pcb_common::geom::Coordinate;
    use std::collections::{BTreeMap, HashMap};

    fn grid_component(design: &mut Design, name: &str, x: f64, y: f64, rows: usize, cols: usize) {
        let mut pins = Vec::new();
        for r in 0..rows {
            for c in 0..cols {
                let net = design.net_id(&format!("{}_{}_{}", name, r, c));
                pins.push(Pin::new(
                    format!("{}{}", r, c),
                    Coordinate::new(x + c as f64, y + r as f64, 0),
                    net,
                ));
            }
        }
        design.add_component(name, pins).unwrap();
    }

    #[test]
    fn small_array_escapes_completely() {
        let mut design = Design::new();
        grid_component(&mut design, "U1", 0.0, 0.0, 3, 3);
        let plan = plan_component(&design, ComponentId::new(0), &FlowRoutingConfig::default())
            .unwrap();
        assert_eq!(plan.status, FlowStatus::Complete);
        assert_eq!(plan.flow, 9);
        assert_eq!(plan.escapes.len(), 9);
        assert!(plan.segments.iter().all(|s| s.length() > 0.0));
        for via in &plan.vias {
            assert!(via.coordinate().z < via.layer());
        }
    }

    #[test]
    fn layer_capacity_limits_flow() {
        let mut design = Design::new();
        grid_component(&mut design, "U1", 0.0, 0.0, 3, 3);
        let config = FlowRoutingConfig {
            layers: 1,
            layer_capacity: Some(4),
            ..FlowRoutingConfig::default()
        };
        let plan = plan_component(&design, ComponentId::new(0), &config).unwrap();
        assert_eq!(
            plan.status,
            FlowStatus::Partial {
                routed: 4,
                demand: 9
            }
        );
        assert!(!plan.is_complete());
        assert!(plan.vias.is_empty());
    }

    #[test]
    fn extra_layers_cost_more_and_need_vias() {
        let mut design = Design::new();
        grid_component(&mut design, "U1", 0.0, 0.0, 4, 4);
        let config = FlowRoutingConfig {
            layers: 2,
            layer_capacity: Some(10),
            ..FlowRoutingConfig::default()
        };
        let plan = plan_component(&design, ComponentId::new(0), &config).unwrap();
        assert_eq!(plan.flow, 16);
        assert!(plan.escapes.iter().filter(|e| e.layer == 1).count() >= 6);
        assert!(!plan.vias.is_empty());
        assert!(plan.cost >= 6 * (config.via_cost + config.layer_cost));
    }

    #[test]
    fn escape_wiring_never_shares_a_spot_between_nets() {
        let mut design = Design::new();
        grid_component(&mut design, "U1", 0.0, 0.0, 5, 5);
        let plan = plan_component(&design, ComponentId::new(0), &FlowRoutingConfig::default())
            .unwrap();
        assert!(plan.is_complete());

        let key = |c: Coordinate| {
            (
                c.z,
                (c.x * 1000.0).round() as i64,
                (c.y * 1000.0).round() as i64,
            )
        };
        let mut owner: HashMap<(i32, i64, i64), NetId> = HashMap::new();
        for s in &plan.segments {
            for end in [s.start(), s.end()] {
                let net = *owner.entry(key(end)).or_insert(s.net());
                assert_eq!(net, s.net(), "{:?} is shared", end);
            }
        }
        for via in &plan.vias {
            let c = via.coordinate();
            let net = via.net().unwrap();
            for z in c.z..=via.layer() {
                let at = key(c.with_layer(z));
                assert_eq!(*owner.entry(at).or_insert(net), net, "via at {:?}", c);
            }
        }
    }

    #[test]
    fn vias_spread_over_row_buses() {
        let mut design = Design::new();
        grid_component(&mut design, "U1", 0.0, 0.0, 3, 3);
        grid_component(&mut design, "U2", 10.0, 0.0, 3, 3);
        // no side exits anywhere, so every escape has to drop onto a bus
        let config = FlowRoutingConfig {
            layers: 2,
            layer_capacity: Some(0),
            max_via_count: 2,
            ..FlowRoutingConfig::default()
        };
        let plan = plan_component(&design, ComponentId::new(0), &config).unwrap();
        assert_eq!(
            plan.status,
            FlowStatus::Partial {
                routed: 6,
                demand: 9
            }
        );
        assert_eq!(plan.vias.len(), 6);
        assert!(plan.escapes.iter().all(|e| e.layer == 1));

        let mut per_row: BTreeMap<i64, usize> = BTreeMap::new();
        for via in &plan.vias {
            assert_eq!((via.coordinate().z, via.layer()), (0, 1));
            *per_row.entry((via.coordinate().y * 2.0).round() as i64).or_default() += 1;
        }
        assert_eq!(per_row.len(), 3);
        assert!(per_row.values().all(|&n| n == 2));
        // the first escape on each bus costs 1 on top, the second 3
        assert_eq!(plan.cost, 3 * (2 * (config.via_cost + config.layer_cost) + 1 + 3));
    }

    #[test]
    fn components_are_planned_in_parallel() {
        let mut design = Design::new();
        grid_component(&mut design, "U1", 0.0, 0.0, 2, 2);
        grid_component(&mut design, "U2", 10.0, 0.0, 2, 3);
        let plans = run(&design, &FlowRoutingConfig::default()).unwrap();
        assert_eq!(plans.len(), 2);
        assert_eq!(plans[1].component, "U2");
        assert!(plans.iter().all(EscapePlan::is_complete));
    }

    #[test]
    fn ambiguous_stacking_is_reported() {
        let mut design = Design::new();
        grid_component(&mut design, "U1", 0.0, 0.0, 2, 2);
        grid_component(&mut design, "U2", 10.0, 0.0, 2, 2);
        grid_component(&mut design, "U3", 0.0, 10.0, 2, 2);
        assert!(matches!(
            run(&design, &FlowRoutingConfig::default()),
            Err(RouterError::AmbiguousStacking(_))
        ));
    }
}
