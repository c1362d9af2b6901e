//! Link-state routing tables
//!
//! Every router runs a shortest-path computation over the whole topology
//! and keeps, per destination, the best known cost and the predecessor on
//! the path back to the source. Routing tables are then derived by walking
//! the predecessor chain towards the source.
//!
//! The next router to expand is the unvisited one with the cheapest *single
//! edge* from the frontier, not the one with the smallest accumulated
//! distance. The frontier starts as the source alone and grows one hop at a
//! time once all of its neighbors have been visited.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use log::{debug, info};
use serde::Serialize;

use crate::algorithms::observer::{NoopObserver, RoutingObserver};
use crate::error::{RoutingError, RoutingResult};
use crate::network::Topology;
use crate::output::cost_label;
use crate::protocol::{RoutingEntry, RoutingTable};
use crate::{INFINITY, RouterId};

/// Converged shortest-path state for one destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkingEntry {
    pub destination: RouterId,
    pub cost: u32,
    pub predecessor: Option<RouterId>,
}

/// Converged shortest-path state of one source, ascending by destination.
#[derive(Debug, Clone, Serialize)]
pub struct WorkingTable {
    pub source: RouterId,
    pub entries: Vec<WorkingEntry>,
}

impl WorkingTable {
    pub fn get(&self, destination: &str) -> Option<&WorkingEntry> {
        self.entries.iter().find(|e| e.destination == destination)
    }

    /// Routers from the source to `destination`, both included.
    /// Empty when the destination is unreachable.
    pub fn path_to(&self, destination: &str) -> Vec<RouterId> {
        let mut path = Vec::new();
        let mut current = match self.get(destination) {
            Some(entry) => entry,
            None => return path,
        };

        for _ in 0..=self.entries.len() {
            path.push(current.destination.clone());
            if current.destination == self.source {
                path.reverse();
                return path;
            }
            current = match current.predecessor.as_deref().and_then(|p| self.get(p)) {
                Some(entry) => entry,
                None => break,
            };
        }

        Vec::new()
    }
}

/// Mutable arena for one source: indices follow the ascending router list.
struct ShortestPathState {
    source: usize,
    cost: Vec<u32>,
    predecessor: Vec<Option<usize>>,
    visited: Vec<bool>,
}

pub struct LinkStateEngine {
    routers: Vec<RouterId>,
    index: HashMap<RouterId, usize>,
    adjacency: Vec<BTreeMap<usize, u32>>,
}

impl LinkStateEngine {
    pub fn new(topology: &Topology) -> RoutingResult<Self> {
        if topology.is_empty() {
            return Err(RoutingError::EmptyTopology);
        }

        let routers = topology.all_routers();
        let index: HashMap<RouterId, usize> = routers
            .iter()
            .enumerate()
            .map(|(i, r)| (r.clone(), i))
            .collect();

        let adjacency = routers
            .iter()
            .map(|r| {
                topology
                    .neighbors_with_cost(r)
                    .map(|(n, cost)| (index[n], cost))
                    .collect()
            })
            .collect();

        Ok(Self {
            routers,
            index,
            adjacency,
        })
    }

    /// Routing tables of every router, ascending by owner.
    pub fn compute_all(&self) -> RoutingResult<Vec<RoutingTable>> {
        self.compute_all_observed(&mut NoopObserver)
    }

    pub fn compute_all_observed(
        &self,
        observer: &mut dyn RoutingObserver,
    ) -> RoutingResult<Vec<RoutingTable>> {
        let mut tables = Vec::with_capacity(self.routers.len());
        for source in 0..self.routers.len() {
            let state = self.shortest_paths(source);
            let working = self.working_table(&state);
            let table = self.routing_table(&state)?;
            observer.on_link_state_computed(&working, &table);
            tables.push(table);
        }

        info!("Link-state routing tables computed for {} routers", tables.len());
        Ok(tables)
    }

    pub fn compute_working_table(&self, source: &str) -> RoutingResult<WorkingTable> {
        let source = self.router_index(source)?;
        Ok(self.working_table(&self.shortest_paths(source)))
    }

    pub fn compute_routing_table(&self, source: &str) -> RoutingResult<RoutingTable> {
        let source = self.router_index(source)?;
        self.routing_table(&self.shortest_paths(source))
    }

    fn router_index(&self, router: &str) -> RoutingResult<usize> {
        self.index
            .get(router)
            .copied()
            .ok_or_else(|| RoutingError::UnknownRouter(router.to_string()))
    }

    fn edge_cost(&self, from: usize, to: usize) -> u32 {
        if from == to {
            return 0;
        }
        self.adjacency[from].get(&to).copied().unwrap_or(INFINITY)
    }

    fn shortest_paths(&self, source: usize) -> ShortestPathState {
        let n = self.routers.len();
        let mut state = ShortestPathState {
            source,
            cost: vec![INFINITY; n],
            predecessor: vec![None; n],
            visited: vec![false; n],
        };
        state.cost[source] = 0;
        state.predecessor[source] = Some(source);

        for _ in 0..n {
            let Some(closest) = self.next_closest(&mut state) else {
                debug!(
                    "No frontier left from {}, remaining routers are unreachable",
                    self.routers[source]
                );
                break;
            };
            let path_cost = self.path_cost(&state, closest);
            self.relax(&mut state, closest, path_cost);
        }

        state
    }

    /// Pick and mark the unvisited router with the cheapest edge from the frontier.
    fn next_closest(&self, state: &mut ShortestPathState) -> Option<usize> {
        let mut frontier = BTreeSet::from([state.source]);

        loop {
            // A router is adjacent to itself, which is how the source gets picked first.
            let mut connected = frontier.clone();
            for &router in &frontier {
                connected.extend(self.adjacency[router].keys().copied());
            }

            let mut closest = None;
            let mut closest_cost = INFINITY;
            for &from in &frontier {
                for &candidate in &connected {
                    if state.visited[candidate] {
                        continue;
                    }
                    let cost = self.edge_cost(from, candidate);
                    if cost < closest_cost {
                        closest = Some(candidate);
                        closest_cost = cost;
                    }
                }
            }

            if let Some(router) = closest {
                state.visited[router] = true;
                return Some(router);
            }

            if connected.len() == frontier.len() {
                return None;
            }
            frontier = connected;
        }
    }

    /// Sum of edge costs along the predecessor chain from `router` back to the source.
    fn path_cost(&self, state: &ShortestPathState, router: usize) -> u32 {
        let mut total: u32 = 0;
        let mut current = router;

        for _ in 0..self.routers.len() {
            if current == state.source {
                return total;
            }
            match state.predecessor[current] {
                Some(prev) => {
                    total = total.saturating_add(self.edge_cost(prev, current));
                    current = prev;
                }
                None => return INFINITY,
            }
        }

        if current == state.source { total } else { INFINITY }
    }

    fn relax(&self, state: &mut ShortestPathState, router: usize, path_cost: u32) {
        for (&neighbor, &link_cost) in &self.adjacency[router] {
            let candidate = path_cost.saturating_add(link_cost);
            if candidate < state.cost[neighbor] {
                debug!(
                    "[{}] {} now reachable via {} at cost {} (was {})",
                    self.routers[state.source],
                    self.routers[neighbor],
                    self.routers[router],
                    candidate,
                    cost_label(state.cost[neighbor])
                );
                state.cost[neighbor] = candidate;
                state.predecessor[neighbor] = Some(router);
            }
        }
    }

    /// First router after the source on the predecessor chain towards `dest`.
    fn find_next_hop(&self, state: &ShortestPathState, dest: usize) -> Option<usize> {
        if dest == state.source {
            return Some(dest);
        }

        let mut current = dest;
        for _ in 0..self.routers.len() {
            let prev = state.predecessor[current]?;
            if prev == state.source {
                return Some(current);
            }
            current = prev;
        }
        None
    }

    fn working_table(&self, state: &ShortestPathState) -> WorkingTable {
        let entries = self
            .routers
            .iter()
            .enumerate()
            .map(|(i, dest)| WorkingEntry {
                destination: dest.clone(),
                cost: state.cost[i],
                predecessor: state.predecessor[i].map(|p| self.routers[p].clone()),
            })
            .collect();

        WorkingTable {
            source: self.routers[state.source].clone(),
            entries,
        }
    }

    fn routing_table(&self, state: &ShortestPathState) -> RoutingResult<RoutingTable> {
        let mut table = RoutingTable::new(self.routers[state.source].clone());

        for (i, dest) in self.routers.iter().enumerate() {
            // Cost is re-derived from the chain: a router relaxed after its own
            // neighbors were expanded leaves them with a stale working cost.
            let cost = self.path_cost(state, i);
            let entry = match self.find_next_hop(state, i) {
                Some(hop) if cost != INFINITY => {
                    RoutingEntry::new(dest.clone(), self.routers[hop].clone(), cost)
                }
                _ => RoutingEntry::unreachable(dest.clone()),
            };
            table.add_entry(entry)?;
        }

        table.sort();
        Ok(table)
    }
}
