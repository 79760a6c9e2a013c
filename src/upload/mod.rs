//! File constraint and upload coordination

mod constraints;
mod coordinator;

pub use constraints::{FileConstraints, PendingFile, SelectedFile};
pub use coordinator::{FileChooser, Selection, UploadCoordinator};

#[cfg(test)]
pub(crate) use constraints::test_support;
#[cfg(test)]
pub use coordinator::MockFileChooser;
