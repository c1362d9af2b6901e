pub mod loader;
pub mod topology;

pub use loader::{
    expand_message_order, load_message_order, load_topology, parse_message_order, parse_topology,
};
pub use topology::{Link, Topology};
