//! Headless testing framework: Pilot, snapshot helpers.
//!
//! Use the [`Pilot`] to drive a composed document through a headless
//! [`Client`](crate::runtime::Client) the way a user would. Use
//! [`render_to_string`] and [`render_booted`] to capture markup for
//! snapshot-style assertions.

pub mod pilot;
pub mod snapshot;

pub use pilot::Pilot;
pub use snapshot::{render_booted, render_to_string, SnapshotError};
