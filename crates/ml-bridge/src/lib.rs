//! Bridge to the external segmentation model script.
//!
//! Each call runs the script once as a child process, captures its merged
//! stdout/stderr and maps the exit status to a [`TrainingOutcome`].

pub mod bridge;
pub mod operation;

pub use bridge::ModelBridge;
pub use custlysis_core::reports::TrainingOutcome;
pub use operation::{ModelOperation, ModelRequest};
