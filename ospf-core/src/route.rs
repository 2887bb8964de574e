//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::{Arc, Mutex};

use derive_new::new;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::debug::Debug;
use crate::packet::error::{ValidationError, ValidationResult};

// Routing table protected by the single coarse lock callers are expected to
// hold across every lookup-then-modify sequence.
pub type SharedRoutingTable = Arc<Mutex<RoutingTable>>;

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[derive(Deserialize, Serialize)]
pub enum DestinationType {
    Router,
    Network,
}

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[derive(Deserialize, Serialize)]
pub enum PathType {
    IntraArea,
    InterArea,
    Type1External,
    Type2External,
}

// Gateway address plus outgoing interface.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[derive(Deserialize, Serialize)]
pub struct Nexthop {
    pub gateway: IpAddr,
    pub interface: String,
}

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[derive(Deserialize, Serialize)]
#[derive(new)]
pub struct RouteEntryKey {
    pub dest_type: DestinationType,
    pub dest_id: Ipv4Addr,
    pub area_id: Ipv4Addr,
}

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[derive(Deserialize, Serialize)]
#[derive(new)]
pub struct RoutePathKey {
    pub nexthop: Nexthop,
    pub adv_rtr: Ipv4Addr,
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
#[derive(new)]
pub struct RoutingTablePath {
    pub path_type: PathType,
    pub cost: u32,
    pub type2_cost: u32,
    pub nexthop: Nexthop,
    pub adv_rtr: Ipv4Addr,
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct RoutingTableEntry {
    pub dest_type: DestinationType,
    pub dest_id: Ipv4Addr,
    pub area_id: Ipv4Addr,
    pub paths: Vec<RoutingTablePath>,
}

// Result of adding a path to a routing table entry.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AddPathOutcome {
    Added,
    Duplicate,
    Rejected(PathConflict),
}

// Non-fatal warning raised when a path doesn't share the type and cost of
// the paths already attached to the entry.
#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct PathConflict {
    pub dest_id: Ipv4Addr,
    pub expected: (PathType, u32),
    pub received: (PathType, u32),
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct RoutingTable {
    entries: BTreeMap<RouteEntryKey, RoutingTableEntry>,
}

// ===== impl Nexthop =====

impl Nexthop {
    pub fn new(
        gateway: IpAddr,
        interface: impl Into<String>,
    ) -> ValidationResult<Self> {
        let interface = interface.into();
        if gateway.is_unspecified() {
            return Err(ValidationError::InvalidNexthopGateway(gateway));
        }
        if interface.is_empty() {
            return Err(ValidationError::InvalidNexthopInterface);
        }

        Ok(Nexthop { gateway, interface })
    }
}

// ===== impl RoutingTablePath =====

impl RoutingTablePath {
    pub fn key(&self) -> RoutePathKey {
        RoutePathKey::new(self.nexthop.clone(), self.adv_rtr)
    }
}

// ===== impl RoutingTableEntry =====

impl RoutingTableEntry {
    fn new(key: RouteEntryKey) -> Self {
        RoutingTableEntry {
            dest_type: key.dest_type,
            dest_id: key.dest_id,
            area_id: key.area_id,
            paths: Default::default(),
        }
    }

    pub fn key(&self) -> RouteEntryKey {
        RouteEntryKey::new(self.dest_type, self.dest_id, self.area_id)
    }

    // Adds a path, keeping every path of the entry at the same type and
    // cost.
    pub fn add_path(&mut self, path: RoutingTablePath) -> AddPathOutcome {
        if let Some(first) = self.paths.first().filter(|first| {
            first.path_type != path.path_type || first.cost != path.cost
        }) {
            let conflict = PathConflict {
                dest_id: self.dest_id,
                expected: (first.path_type, first.cost),
                received: (path.path_type, path.cost),
            };
            conflict.log();
            return AddPathOutcome::Rejected(conflict);
        }

        let path_key = path.key();
        if self.paths.iter().any(|p| p.key() == path_key) {
            return AddPathOutcome::Duplicate;
        }

        Debug::RoutePathAdd(&self.key(), &path_key).log();
        self.paths.push(path);
        AddPathOutcome::Added
    }

    // Removes the path with the given key, if present.
    pub fn remove_path(&mut self, path_key: &RoutePathKey) {
        let key = self.key();
        self.paths.retain(|path| {
            if path.key() == *path_key {
                Debug::RoutePathRemove(&key, path_key).log();
                false
            } else {
                true
            }
        });
    }

    pub fn get_path(
        &self,
        path_key: &RoutePathKey,
    ) -> Option<&RoutingTablePath> {
        self.paths.iter().find(|path| path.key() == *path_key)
    }
}

// ===== impl PathConflict =====

impl PathConflict {
    pub(crate) fn log(&self) {
        warn!(
            dest_id = %self.dest_id,
            expected = ?self.expected,
            received = ?self.received,
            "{}",
            self
        );
    }
}

impl std::fmt::Display for PathConflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "path type or cost differs from existing equal-cost paths")
    }
}

impl std::error::Error for PathConflict {}

// ===== impl RoutingTable =====

impl RoutingTable {
    // Returns the entry with the given key, creating it if it doesn't exist
    // yet.
    pub fn add_entry(
        &mut self,
        key: RouteEntryKey,
    ) -> ValidationResult<&mut RoutingTableEntry> {
        if key.dest_id.is_unspecified() {
            return Err(ValidationError::InvalidDestinationId(key.dest_id));
        }

        let entry = match self.entries.entry(key) {
            btree_map::Entry::Occupied(o) => o.into_mut(),
            btree_map::Entry::Vacant(v) => {
                Debug::RouteEntryAdd(&key).log();
                v.insert(RoutingTableEntry::new(key))
            }
        };
        Ok(entry)
    }

    // Removes the entry with the given key, if present.
    pub fn delete_entry(
        &mut self,
        key: &RouteEntryKey,
    ) -> Option<RoutingTableEntry> {
        let entry = self.entries.remove(key);
        if entry.is_some() {
            Debug::RouteEntryDelete(key).log();
        }
        entry
    }

    pub fn get_entry(
        &self,
        key: &RouteEntryKey,
    ) -> Option<&RoutingTableEntry> {
        self.entries.get(key)
    }

    pub fn get_entry_mut(
        &mut self,
        key: &RouteEntryKey,
    ) -> Option<&mut RoutingTableEntry> {
        self.entries.get_mut(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RoutingTableEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
