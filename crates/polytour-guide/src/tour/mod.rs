//! # Tour Module
//!
//! The guided tour: fixed step definitions plus the state machine that keeps
//! them synchronized with what the user actually does in the editor.

mod machine;
mod steps;

pub use machine::{TourConfig, TourController, TourProgress};
pub use steps::{default_steps, hints, ButtonAction, StepAction, StepButton, StepId, TourStep};
