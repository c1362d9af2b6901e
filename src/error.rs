//! Routing error types

use thiserror::Error;

use crate::RouterId;

/// Errors raised while loading a topology or computing routing tables
#[derive(Debug, Error)]
pub enum RoutingError {
    /// A topology line could not be parsed into two routers and a cost
    #[error("Malformed topology input on line {line}: {reason}")]
    MalformedTopologyInput { line: usize, reason: String },

    /// A link violates the graph invariants
    #[error("Invalid link {a} - {b} with cost {cost}: {reason}")]
    InvalidLink {
        a: RouterId,
        b: RouterId,
        cost: u32,
        reason: &'static str,
    },

    /// The advertisement order names a router absent from the topology
    #[error("Router {0} in message order is not present in the topology")]
    UnknownRouterInMessageOrder(RouterId),

    /// Computation requested for a router absent from the topology
    #[error("Router {0} is not present in the topology")]
    UnknownRouter(RouterId),

    /// Update or lookup against a destination the table does not know
    #[error("Destination {destination} not present in routing table of {router}")]
    UnknownDestination {
        router: RouterId,
        destination: RouterId,
    },

    /// Second entry for a destination the table already holds
    #[error("Destination {destination} already present in routing table of {router}")]
    DuplicateDestination {
        router: RouterId,
        destination: RouterId,
    },

    /// No link was loaded
    #[error("No connection specified in the topology")]
    EmptyTopology,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for routing operations
pub type RoutingResult<T> = Result<T, RoutingError>;
