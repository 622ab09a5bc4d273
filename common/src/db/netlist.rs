use crate::db::indices::{NetId, PinRef};
use crate::error::DesignError;
use std::collections::HashMap;

#[derive(Clone, Debug)]
pub struct Net {
    pub name: String,
    pub id: NetId,
    pub pins: Vec<PinRef>,
}

/// Keyed collection of nets belonging to one net class.
#[derive(Clone, Debug)]
pub struct Netlist {
    key: i32,
    nets: Vec<Net>,
    net_name_map: HashMap<String, usize>,
}

impl Netlist {
    pub fn new(key: i32) -> Self {
        Self {
            key,
            nets: Vec::new(),
            net_name_map: HashMap::new(),
        }
    }

    pub fn key(&self) -> i32 {
        self.key
    }

    pub fn add_net(&mut self, name: impl Into<String>, id: NetId) -> Result<&mut Net, DesignError> {
        let name = name.into();
        if self.net_name_map.contains_key(&name) {
            return Err(DesignError::DuplicateNet {
                netlist: self.key,
                net: name,
            });
        }
        let slot = self.nets.len();
        self.net_name_map.insert(name.clone(), slot);
        self.nets.push(Net {
            name,
            id,
            pins: Vec::new(),
        });
        Ok(&mut self.nets[slot])
    }

    pub fn net(&self, name: &str) -> Option<&Net> {
        self.net_name_map.get(name).map(|&i| &self.nets[i])
    }

    pub fn net_mut(&mut self, name: &str) -> Option<&mut Net> {
        match self.net_name_map.get(name) {
            Some(&i) => Some(&mut self.nets[i]),
            None => None,
        }
    }

    pub fn nets(&self) -> &[Net] {
        &self.nets
    }

    pub fn len(&self) -> usize {
        self.nets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nets.is_empty()
    }
}
