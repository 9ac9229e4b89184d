//! Pipeline module.
//!
//! A user's mutation requests are recorded as an ordered list of
//! [`Command`]s. Running the same list on the same input always yields the
//! same table.

mod builder;
mod command;

pub use builder::{Pipeline, PipelineBuilder, PipelineOutcome};
pub use command::{Command, StepResult};
