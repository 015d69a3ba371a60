//! Background Tasks Module
//!
//! Periodic maintenance for the bundled in-memory backend.

mod cleanup;

pub use cleanup::spawn_sweep_task;
