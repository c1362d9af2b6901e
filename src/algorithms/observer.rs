//! Step callbacks for the routing engines
//!
//! Engines never print. Callers that want to follow a computation plug a
//! [`RoutingObserver`]; every hook defaults to a no-op.

use crate::algorithms::dijkstra::WorkingTable;
use crate::protocol::{DistanceVector, RouteChange, RoutingTable};
use crate::RouterId;

/// One applied distance-vector advertisement.
#[derive(Debug)]
pub struct AdvertisementEvent<'a> {
    /// Position of the event in the advertisement order
    pub sequence: usize,
    pub vector: &'a DistanceVector,
    pub neighbors: &'a [RouterId],
    pub changes: &'a [RouteChange],
    /// Every table after the event, ascending by owner
    pub tables: &'a [&'a RoutingTable],
}

pub trait RoutingObserver {
    /// Distance-vector tables as seeded, before the first advertisement.
    fn on_tables_initialized(&mut self, _tables: &[&RoutingTable]) {}

    fn on_advertisement(&mut self, _event: &AdvertisementEvent<'_>) {}

    /// Link-state computation finished for one source.
    fn on_link_state_computed(&mut self, _working: &WorkingTable, _table: &RoutingTable) {}
}

/// Observer that ignores every step.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl RoutingObserver for NoopObserver {}
