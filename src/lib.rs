//! Routing table computation for small weighted router topologies.
//!
//! Two engines share the same [`Topology`] and [`RoutingTable`] types:
//!
//! - [`LinkStateEngine`]: every router computes shortest paths over the full
//!   topology and derives its next hops from the predecessor chain.
//! - [`DistanceVectorEngine`]: routers start with their direct neighbors and
//!   learn the rest from a fixed sequence of distance-vector advertisements.
//!
//! Loading ([`network::loader`]) and rendering ([`output`]) live next to the
//! engines but the engines themselves never touch the filesystem or print.

pub mod algorithms;
pub mod config;
pub mod error;
pub mod network;
pub mod output;
pub mod protocol;

pub use algorithms::{DistanceVectorEngine, LinkStateEngine, NoopObserver, RoutingObserver};
pub use error::{RoutingError, RoutingResult};
pub use network::Topology;
pub use protocol::{DistanceVector, RouteChange, RoutingEntry, RoutingTable};

pub type RouterId = String;

/// Cost of a pair of routers with no known path.
pub const INFINITY: u32 = u32::MAX;
