pub mod dijkstra;
pub mod distance_vector;
pub mod observer;

pub use dijkstra::{LinkStateEngine, WorkingEntry, WorkingTable};
pub use distance_vector::DistanceVectorEngine;
pub use observer::{AdvertisementEvent, NoopObserver, RoutingObserver};
