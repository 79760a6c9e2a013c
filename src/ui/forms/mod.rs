//! Form rendering module
//!
//! - `field_renderer`: Field rendering utilities
//! - `profile_form`: The profile edit screen

mod field_renderer;
mod profile_form;

pub use profile_form::draw_profile;
