//! Form fields and submission built on the reactive core.

pub mod fields;
pub mod focus;
pub mod submit;
pub mod theme;

pub use fields::{EmailField, FloatField, PasswordField, TextField};
pub use focus::focus_next_field;
pub use submit::SubmitButton;
pub use theme::FieldTheme;
