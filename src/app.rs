//! App struct: configuration, app-only options and export.
//!
//! [`App`] owns the document of a single-page application. App-only options
//! ([`set_color`], [`set_description`], [`set_loading_page`]) configure it,
//! and [`App::export`] produces the files a static host serves.

use std::fs;
use std::io;
use std::path::Path;

use crate::client::LIBRARY;
use crate::document::Document;
use crate::dom::{markup, Mode, NodeId, SeedKind};
use crate::id::InstanceId;
use crate::js::{Expr, Statement};
use crate::runtime::{Client, ScriptError};
use crate::seed::{Apply, ComposeError, Context, Phase, Seed};

// ---------------------------------------------------------------------------
// AppConfig
// ---------------------------------------------------------------------------

/// Configuration for the application.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// App name, used as the page title.
    pub name: String,
    /// Optional one-line description for the page metadata.
    pub description: Option<String>,
    /// Optional theme color (any CSS color).
    pub theme_color: Option<String>,
    /// The page shown until the client has booted.
    pub loading_page: Option<InstanceId>,
}

impl AppConfig {
    /// Create a config for an app called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            theme_color: None,
            loading_page: None,
        }
    }

    /// Set the description (builder).
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the theme color (builder).
    pub fn with_theme_color(mut self, color: impl Into<String>) -> Self {
        self.theme_color = Some(color.into());
        self
    }
}

// ---------------------------------------------------------------------------
// App-only options
// ---------------------------------------------------------------------------

/// Theme color option. See [`set_color`].
#[derive(Debug, Clone, PartialEq)]
pub struct SetColor(String);

/// Set the app's theme color.
///
/// At build time this sets the color the page starts with. Under a gate it
/// switches the color while the condition holds and restores the build-time
/// color otherwise.
pub fn set_color(color: impl Into<String>) -> SetColor {
    SetColor(color.into())
}

impl Apply for SetColor {
    fn apply(&self, cx: &mut Context<'_>) -> Result<(), ComposeError> {
        match cx.phase() {
            Phase::Build => {
                cx.require_kind("set_color", SeedKind::App)?;
                cx.document_mut().config_mut().theme_color = Some(self.0.clone());
            }
            Phase::Client => cx.emit(Statement::Theme(Expr::string(self.0.clone()))),
            Phase::Undo => {
                let previous = cx.document().config().theme_color.clone().unwrap_or_default();
                cx.emit(Statement::Theme(Expr::string(previous)));
            }
        }
        Ok(())
    }
}

/// Description option. See [`set_description`].
#[derive(Debug, Clone, PartialEq)]
pub struct SetDescription(String);

/// Set the description written into the page metadata.
pub fn set_description(description: impl Into<String>) -> SetDescription {
    SetDescription(description.into())
}

impl Apply for SetDescription {
    fn apply(&self, cx: &mut Context<'_>) -> Result<(), ComposeError> {
        cx.require_build("set_description")?;
        cx.require_kind("set_description", SeedKind::App)?;
        cx.document_mut().config_mut().description = Some(self.0.clone());
        Ok(())
    }
}

/// Loading page option. See [`set_loading_page`].
#[derive(Debug, Clone)]
pub struct SetLoadingPage(Seed);

/// Show `page` until the client has booted.
///
/// The page is part of the server markup and is detached by a `load`
/// handler on the body.
pub fn set_loading_page(page: Seed) -> SetLoadingPage {
    SetLoadingPage(page.with_kind(SeedKind::Page))
}

impl Apply for SetLoadingPage {
    fn apply(&self, cx: &mut Context<'_>) -> Result<(), ComposeError> {
        cx.require_build("set_loading_page")?;
        cx.require_kind("set_loading_page", SeedKind::App)?;
        let node = cx.add_child(&self.0)?;
        let instance = cx
            .document()
            .node(node)
            .map(|data| data.instance)
            .ok_or(ComposeError::UnknownNode(node))?;
        cx.node_mut()?.on("load", Statement::Unmount(instance).into());
        cx.document_mut().config_mut().loading_page = Some(instance);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// The main application struct.
///
/// Owns the document whose body is the app's root seed.
#[derive(Debug, Clone)]
pub struct App {
    document: Document,
}

impl App {
    /// Create an empty app called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(AppConfig::new(name))
    }

    /// Create an empty app from a config.
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            document: Document::new(config),
        }
    }

    /// Apply an option (or add a child seed) to the app body.
    pub fn add(&mut self, option: impl Apply) -> Result<&mut Self, ComposeError> {
        let body = self.document.body();
        self.document.apply(body, &option)?;
        Ok(self)
    }

    /// The app body.
    pub fn body(&self) -> NodeId {
        self.document.body()
    }

    /// The app's document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Mutable access to the app's document.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// The app's configuration.
    pub fn config(&self) -> &AppConfig {
        self.document.config()
    }

    /// Produce the page, its behavior script and the client library.
    ///
    /// The page carries the initial state: a headless client runs every
    /// render function once before the markup is written.
    pub fn export(&self) -> Result<Bundle, ExportError> {
        let client = Client::prerender(&self.document)?;
        let config = self.document.config();

        let mut html = String::from("<!DOCTYPE html>\n<html>\n<head>\n");
        html.push_str("<meta charset=\"utf-8\">\n");
        html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
        html.push_str("<title>");
        markup::escape_text(&config.name, &mut html);
        html.push_str("</title>\n");
        if let Some(description) = &config.description {
            meta(&mut html, "description", description);
        }
        meta(&mut html, "theme-color", config.theme_color.as_deref().unwrap_or(""));
        html.push_str("<script src=\"seed.js\"></script>\n");
        html.push_str("<script defer src=\"app.js\"></script>\n");
        html.push_str("</head>\n");
        html.push_str(&markup::render(client.dom(), client.body(), Mode::Server));
        html.push_str("\n</html>\n");

        let script = self.document.behavior();
        tracing::info!(
            app = %config.name,
            html = html.len(),
            script = script.len(),
            "exported app"
        );
        Ok(Bundle { html, script })
    }
}

fn meta(out: &mut String, name: &str, content: &str) {
    out.push_str("<meta");
    markup::attribute(out, "name", name);
    markup::attribute(out, "content", content);
    out.push_str(">\n");
}

// ---------------------------------------------------------------------------
// Bundle
// ---------------------------------------------------------------------------

/// An exported app.
#[derive(Debug, Clone, PartialEq)]
pub struct Bundle {
    /// `index.html`: metadata and the server-rendered body.
    pub html: String,
    /// `app.js`: the behavior script.
    pub script: String,
}

impl Bundle {
    /// The client library every page loads.
    pub fn library(&self) -> &'static str {
        LIBRARY
    }

    /// Write `index.html`, `app.js` and `seed.js` into `dir`, creating it if
    /// needed.
    pub fn write_to(&self, dir: impl AsRef<Path>) -> Result<(), ExportError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        fs::write(dir.join("index.html"), &self.html)?;
        fs::write(dir.join("app.js"), &self.script)?;
        fs::write(dir.join("seed.js"), LIBRARY)?;
        tracing::info!(dir = %dir.display(), "wrote bundle");
        Ok(())
    }
}

/// Errors raised while building or exporting an app.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Composition failed.
    #[error(transparent)]
    Compose(#[from] ComposeError),
    /// The initial render failed.
    #[error("initial render failed: {0}")]
    Boot(#[from] ScriptError),
    /// Writing the bundle failed.
    #[error("failed to write bundle: {0}")]
    Io(#[from] io::Error),
}

// ===========================================================================
// Tests
// ===========================================================================
