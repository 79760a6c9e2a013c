//! Form domain layer
//!
//! A headless form engine: fields register by name, validity is recomputed on
//! every edit, and submission is single-flight per form instance.

#![allow(dead_code)]

mod field;
mod form_state;
mod registry;

pub use field::{FieldSpec, FieldValue, FormField};
pub use form_state::{FormController, SubmitHandler, SubmitPayload};
