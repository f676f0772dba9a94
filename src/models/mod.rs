//! Document models served by the HTTP API.

pub mod tutorial;

pub use tutorial::{Tutorial, TutorialInput};
