mod backup;
mod persist;
mod store;

pub mod domain;
pub mod schedule;

pub use backup::*;
pub use persist::*;
pub use store::*;
