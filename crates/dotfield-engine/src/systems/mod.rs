pub mod rng;
pub mod connections;
pub mod swarm;
pub mod trail;
pub mod curves;
pub mod shape;
#[cfg(feature = "vectors")]
pub mod vector;
