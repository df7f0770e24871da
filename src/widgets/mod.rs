//! Built-in seeds: containers, text, inputs and buttons.

pub mod button;
pub mod container;
pub mod input;
pub mod text;

pub use container::{column, form, row};
