use std::fmt;

use serde::Serialize;

use crate::RouterId;

/// Snapshot of a router's finite-cost knowledge, broadcast to its neighbors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistanceVector {
    pub router: RouterId,
    /// `(destination, cost)` pairs, ascending by destination
    pub routes: Vec<(RouterId, u32)>,
}

impl DistanceVector {
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }
}

impl fmt::Display for DistanceVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let routes: Vec<String> = self
            .routes
            .iter()
            .map(|(dest, cost)| format!("({},{})", dest, cost))
            .collect();
        write!(f, "{}", routes.join(","))
    }
}

/// Entry of a neighbor table changed by one advertisement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteChange {
    pub router: RouterId,
    pub destination: RouterId,
    pub next_hop: RouterId,
    /// `None` when the destination was previously unknown
    pub old_cost: Option<u32>,
    pub new_cost: u32,
}
