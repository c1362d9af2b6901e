//! Distance-vector routing tables
//!
//! Every router starts out knowing its direct neighbors only. A fixed
//! sequence of advertisements is then replayed: the advertising router
//! sends its current distance vector to each neighbor, which keeps any
//! destination it did not know and any strictly cheaper path. Knowledge
//! never propagates further than one hop per advertisement.

use std::collections::BTreeMap;

use log::{debug, info};

use crate::algorithms::observer::{AdvertisementEvent, NoopObserver, RoutingObserver};
use crate::error::{RoutingError, RoutingResult};
use crate::network::loader::validate_message_order;
use crate::network::Topology;
use crate::protocol::{RouteChange, RoutingEntry, RoutingTable};
use crate::RouterId;

#[derive(Debug, Clone)]
pub struct DistanceVectorEngine<'a> {
    topology: &'a Topology,
    tables: BTreeMap<RouterId, RoutingTable>,
    events_applied: usize,
}

impl<'a> DistanceVectorEngine<'a> {
    /// Seed one table per router with its direct neighbors and itself.
    pub fn new(topology: &'a Topology) -> RoutingResult<Self> {
        if topology.is_empty() {
            return Err(RoutingError::EmptyTopology);
        }

        let mut tables = BTreeMap::new();
        for router in topology.all_routers() {
            let mut table = RoutingTable::new(router.clone());
            for (neighbor, cost) in topology.neighbors_with_cost(&router) {
                table.add_entry(RoutingEntry::new(neighbor.clone(), neighbor.clone(), cost))?;
            }
            table.add_entry(RoutingEntry::new(router.clone(), router.clone(), 0))?;
            table.sort();
            tables.insert(router, table);
        }

        info!("Routing tables initialized for {} routers", tables.len());

        Ok(Self {
            topology,
            tables,
            events_applied: 0,
        })
    }

    pub fn table(&self, router: &str) -> Option<&RoutingTable> {
        self.tables.get(router)
    }

    /// All tables, ascending by owner.
    pub fn tables(&self) -> Vec<&RoutingTable> {
        self.tables.values().collect()
    }

    pub fn into_tables(self) -> Vec<RoutingTable> {
        self.tables.into_values().collect()
    }

    pub fn events_applied(&self) -> usize {
        self.events_applied
    }

    /// Broadcast `router`'s distance vector to its neighbors once.
    pub fn advertise(&mut self, router: &str) -> RoutingResult<Vec<RouteChange>> {
        let (_, changes) = self.apply_advertisement(router)?;
        Ok(changes)
    }

    /// Replay `order`, returning the number of entries added or improved.
    ///
    /// The whole order is checked against the topology before the first event.
    pub fn run(&mut self, order: &[RouterId]) -> RoutingResult<usize> {
        self.run_observed(order, &mut NoopObserver)
    }

    pub fn run_observed(
        &mut self,
        order: &[RouterId],
        observer: &mut dyn RoutingObserver,
    ) -> RoutingResult<usize> {
        validate_message_order(self.topology, order)?;

        observer.on_tables_initialized(&self.tables());
        if order.is_empty() {
            info!("Nothing to compute, advertisement order is empty");
        }

        let mut total = 0;
        for (sequence, router) in order.iter().enumerate() {
            let (neighbors, changes) = self.apply_advertisement(router)?;
            total += changes.len();

            let vector = self.tables[router.as_str()].distance_vector();
            let tables = self.tables();
            observer.on_advertisement(&AdvertisementEvent {
                sequence,
                vector: &vector,
                neighbors: &neighbors,
                changes: &changes,
                tables: &tables,
            });
        }

        info!(
            "Replayed {} advertisements, {} routing entries changed",
            order.len(),
            total
        );
        Ok(total)
    }

    /// Whether one advertisement from every router would leave all tables unchanged.
    pub fn is_converged(&self) -> bool {
        let mut scratch = self.clone();
        let routers = self.topology.all_routers();
        routers.iter().all(|router| {
            scratch
                .apply_advertisement(router)
                .map(|(_, changes)| changes.is_empty())
                .unwrap_or(false)
        })
    }

    fn apply_advertisement(
        &mut self,
        router: &str,
    ) -> RoutingResult<(Vec<RouterId>, Vec<RouteChange>)> {
        let topology = self.topology;
        let vector = self
            .tables
            .get(router)
            .ok_or_else(|| RoutingError::UnknownRouterInMessageOrder(router.to_string()))?
            .distance_vector();

        debug!("Router {} sending distance vector {}", router, vector);

        let mut neighbors = Vec::new();
        let mut changes = Vec::new();

        for (neighbor, link_cost) in topology.neighbors_with_cost(router) {
            neighbors.push(neighbor.clone());
            let Some(table) = self.tables.get_mut(neighbor.as_str()) else {
                continue;
            };

            for (destination, cost) in &vector.routes {
                let candidate = link_cost.saturating_add(*cost);

                if !table.has_destination(destination) {
                    table.add_entry(RoutingEntry::new(destination.clone(), router, candidate))?;
                    debug!(
                        "{} learned {} via {} at cost {}",
                        neighbor, destination, router, candidate
                    );
                    changes.push(RouteChange {
                        router: neighbor.clone(),
                        destination: destination.clone(),
                        next_hop: router.to_string(),
                        old_cost: None,
                        new_cost: candidate,
                    });
                    continue;
                }

                // Known destination: an error here means the table lost an entry.
                let current = table.cost_to(destination)?;
                if candidate < current {
                    table.update_entry(destination, router, candidate)?;
                    debug!(
                        "{} improved {} via {}: {} -> {}",
                        neighbor, destination, router, current, candidate
                    );
                    changes.push(RouteChange {
                        router: neighbor.clone(),
                        destination: destination.clone(),
                        next_hop: router.to_string(),
                        old_cost: Some(current),
                        new_cost: candidate,
                    });
                }
            }

            table.sort();
        }

        self.events_applied += 1;
        Ok((neighbors, changes))
    }
}
