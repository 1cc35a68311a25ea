//! Application layer
//!
//! `AppCommand`/`AppSnapshot` shared state and the controller that owns
//! the audio transports, the record, and the generation workers.

pub mod controller;
pub mod state;

pub use controller::AppController;
pub use state::{AppCommand, AppSnapshot, ClipStatus};
