mod activity;
mod collaborator;
mod contract;
mod id;

pub use activity::*;
pub use collaborator::*;
pub use contract::*;
pub use id::*;
