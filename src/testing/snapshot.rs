//! Snapshot rendering helpers.
//!
//! Functions for converting composed seeds and documents into markup strings
//! suitable for snapshot testing and assertions.

use crate::app::AppConfig;
use crate::document::Document;
use crate::dom::{markup, Mode};
use crate::runtime::{Client, ScriptError};
use crate::seed::{ComposeError, Seed};

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compose `seed` under a fresh document body and return its markup as the
/// server would send it, before any client code runs.
///
/// # Panics
///
/// If the seed fails to compose.
///
/// # Examples
///
/// ```ignore
/// use seedling::testing::render_to_string;
/// use seedling::widgets::text;
///
/// let html = render_to_string(&text::new().with(text::set_string("Hello")));
/// assert_eq!(html, r#"<p id="s1">Hello</p>"#);
/// ```
#[track_caller]
pub fn render_to_string(seed: &Seed) -> String {
    match compose(seed) {
        Ok(document) => first_child_markup(&document, document.dom(), Mode::Server),
        Err(err) => panic!("seed failed to compose: {err}"),
    }
}

/// Compose `seed`, boot a client on it, and return what the page shows.
///
/// Unlike [`render_to_string`] this reflects the initial gate states and
/// bound text.
pub fn render_booted(seed: &Seed) -> Result<String, SnapshotError> {
    let document = compose(seed)?;
    let client = Client::boot(&document)?;
    Ok(first_child_markup(&document, client.dom(), Mode::Live))
}

/// Why a snapshot could not be taken.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// The seed did not compose.
    #[error(transparent)]
    Compose(#[from] ComposeError),
    /// Booting the client failed.
    #[error(transparent)]
    Boot(#[from] ScriptError),
}

// ---------------------------------------------------------------------------
// Internals
// ---------------------------------------------------------------------------

fn compose(seed: &Seed) -> Result<Document, ComposeError> {
    let mut document = Document::new(AppConfig::new("snapshot"));
    let body = document.body();
    document.apply(body, seed)?;
    Ok(document)
}

fn first_child_markup(document: &Document, dom: &crate::dom::Dom, mode: Mode) -> String {
    dom.children(document.body())
        .first()
        .map(|&child| markup::render(dom, child, mode))
        .unwrap_or_default()
}
