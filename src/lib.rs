//! # seedling
//!
//! Composable, reactive single-page web apps, built on the server in Rust.
//!
//! A page is composed from seeds (elements) and options. Client behavior is
//! never written by hand: typed expressions render to client code, variables
//! hook the instances that read them, and gates re-apply options or attach
//! children whenever a variable changes. Forms come with validation, error
//! display and secret hashing built in.
//!
//! ## Core Systems
//!
//! - **[`js`]**: Expression builder: typed client expressions and statements
//! - **[`client`]**: Variables, compound values, hooks, render dispatch and gates
//! - **[`dom`]**: Slotmap-backed element arena with queries and HTML output
//! - **[`document`]**: The composed page and its registries
//! - **[`seed`]**: Seeds, options and the phases they are applied in
//! - **[`widgets`]**: Built-in seeds: containers, text, inputs, buttons
//! - **[`forms`]**: Form fields and the submit button
//! - **[`runtime`]**: Headless client that executes a document's behavior
//! - **[`testing`]**: Pilot and snapshot helpers
//! - **[`app`]**: App configuration, app-only options and export

// Foundation
pub mod id;
pub mod js;

// Core systems
pub mod client;
pub mod document;
pub mod dom;
pub mod seed;

// Components
pub mod forms;
pub mod widgets;

// Execution
pub mod runtime;
pub mod testing;

// Application
pub mod app;

pub use app::{App, AppConfig};
pub use document::Document;
pub use id::{InstanceId, VariableId};
pub use seed::{Apply, ComposeError, Seed};
