use std::collections::{BTreeMap, BTreeSet};

use log::debug;

use crate::error::{RoutingError, RoutingResult};
use crate::{INFINITY, RouterId};

/// Undirected weighted graph of routers.
///
/// Links are kept in a symmetric adjacency map: every insert writes both
/// directions, so `link_cost(a, b)` and `link_cost(b, a)` always agree.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    routers: BTreeSet<RouterId>,
    adjacency: BTreeMap<RouterId, BTreeMap<RouterId, u32>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub a: RouterId,
    pub b: RouterId,
    pub cost: u32,
}

impl Topology {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a topology from `(a, b, cost)` triples, stopping at the first invalid link.
    pub fn from_links<I, R>(links: I) -> RoutingResult<Self>
    where
        I: IntoIterator<Item = (R, R, u32)>,
        R: Into<RouterId>,
    {
        let mut topology = Self::new();
        for (a, b, cost) in links {
            topology.add_link(a, b, cost)?;
        }
        Ok(topology)
    }

    pub fn add_link(
        &mut self,
        a: impl Into<RouterId>,
        b: impl Into<RouterId>,
        cost: u32,
    ) -> RoutingResult<()> {
        let (a, b) = (a.into(), b.into());

        if a == b {
            if cost > 0 {
                return Err(RoutingError::InvalidLink {
                    a,
                    b,
                    cost,
                    reason: "a router cannot be connected to itself with a cost greater than 0",
                });
            }
            self.routers.insert(a);
            return Ok(());
        }

        if cost == 0 || cost == INFINITY {
            return Err(RoutingError::InvalidLink {
                a,
                b,
                cost,
                reason: "link cost must be positive and finite",
            });
        }

        self.routers.insert(a.clone());
        self.routers.insert(b.clone());

        if let Some(previous) = self
            .adjacency
            .entry(a.clone())
            .or_default()
            .insert(b.clone(), cost)
        {
            debug!("Link {} - {} redefined (cost {} -> {})", a, b, previous, cost);
        }
        self.adjacency.entry(b).or_default().insert(a, cost);

        Ok(())
    }

    /// Cost of the direct link: 0 for the same router, `INFINITY` when not connected.
    pub fn link_cost(&self, a: &str, b: &str) -> u32 {
        if a == b {
            return 0;
        }
        self.adjacency
            .get(a)
            .and_then(|links| links.get(b))
            .copied()
            .unwrap_or(INFINITY)
    }

    /// Routers with a direct link to `router`, ascending.
    pub fn neighbors(&self, router: &str) -> Vec<RouterId> {
        self.adjacency
            .get(router)
            .map(|links| links.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn neighbors_with_cost(&self, router: &str) -> impl Iterator<Item = (&RouterId, u32)> {
        self.adjacency
            .get(router)
            .into_iter()
            .flat_map(|links| links.iter().map(|(n, cost)| (n, *cost)))
    }

    pub fn all_routers(&self) -> Vec<RouterId> {
        self.routers.iter().cloned().collect()
    }

    pub fn contains(&self, router: &str) -> bool {
        self.routers.contains(router)
    }

    pub fn router_count(&self) -> usize {
        self.routers.len()
    }

    /// Number of undirected links.
    pub fn link_count(&self) -> usize {
        self.adjacency.values().map(BTreeMap::len).sum::<usize>() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.link_count() == 0
    }

    /// Every undirected link once, with `a < b`, ascending.
    pub fn links(&self) -> Vec<Link> {
        self.adjacency
            .iter()
            .flat_map(|(a, links)| {
                links
                    .iter()
                    .filter(move |(b, _)| a < *b)
                    .map(move |(b, cost)| Link {
                        a: a.clone(),
                        b: b.clone(),
                        cost: *cost,
                    })
            })
            .collect()
    }
}
