//! Network-backed collaborators for the location and weather actions.

pub mod cache;
pub mod connectivity;
pub mod http;
pub mod location;
pub mod weather;

pub use cache::{CachedSnapshot, SnapshotCache};
pub use connectivity::{Connectivity, FixedConnectivity, TcpProbe};
pub use http::{JsonFetch, ReqwestFetch};
pub use location::LocationService;
pub use weather::WeatherService;

pub(crate) const OFFLINE_MESSAGE: &str = "You appear to be offline";
