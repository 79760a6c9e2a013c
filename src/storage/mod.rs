//! Object storage transport boundary

mod local;
mod traits;

pub use local::LocalObjectStore;
pub use traits::{ObjectHandle, ObjectStore};

#[cfg(test)]
pub use traits::MockObjectStore;
