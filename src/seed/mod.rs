//! Composition: seeds, options and the phases they are applied in.

pub mod component;
pub mod context;
pub mod options;

pub use component::{Options, Seed};
pub use context::{Apply, ComposeError, Context, Phase};
pub use options::{
    attr, catch, class, on, on_change, on_click, on_enter, on_enter_key, on_error, on_exit,
    on_input, on_load, required, style, text, when, Attr, Class, Lifecycle, On, OnError, Style,
    Text, When,
};
