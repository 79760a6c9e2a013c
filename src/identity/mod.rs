//! Identity/session provider boundary
//!
//! The provider is an external collaborator; the rest of the app only talks
//! to it through an explicit [`Session`].

mod local;
mod session;
mod traits;

pub use local::LocalIdentityProvider;
pub use session::Session;
pub use traits::{IdentityProvider, UserProfile};

#[cfg(test)]
pub use traits::MockIdentityProvider;
