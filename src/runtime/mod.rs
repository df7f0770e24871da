//! Headless client runtime.
//!
//! Executes the behavior a [`Document`](crate::document::Document) describes
//! without a browser: expressions are parsed from their rendered text and
//! evaluated with client-language semantics, and statements patch a copy of
//! the document tree.

pub mod client;
pub mod eval;
pub mod lexer;
pub mod lifecycle;
pub mod parser;
pub mod value;

pub use client::Client;
pub use eval::{evaluate, Env, ScriptError};
pub use lifecycle::{LifecycleEvent, LifecycleTracker};
pub use parser::{parse, Ast, ParseError};
pub use value::JsValue;
