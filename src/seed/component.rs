//! Seeds (child components) and option lists.

use std::fmt;
use std::rc::Rc;

use crate::dom::SeedKind;

use super::context::{Apply, ComposeError, Context, Phase};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// An ordered, cheaply clonable list of options.
#[derive(Clone, Default)]
pub struct Options(Vec<Rc<dyn Apply>>);

impl Options {
    /// An empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an option (builder).
    pub fn with(mut self, option: impl Apply + 'static) -> Self {
        self.push(option);
        self
    }

    /// Append an option.
    pub fn push(&mut self, option: impl Apply + 'static) {
        self.0.push(Rc::new(option));
    }

    /// Number of options.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Apply for Options {
    fn apply(&self, cx: &mut Context<'_>) -> Result<(), ComposeError> {
        for option in &self.0 {
            option.apply(cx)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options").field("len", &self.0.len()).finish()
    }
}

// ---------------------------------------------------------------------------
// Seed
// ---------------------------------------------------------------------------

/// A component: an element to create, plus the options to build it with.
///
/// Applying a seed to a target (during the build phase) creates it as the
/// target's last child.
#[derive(Clone)]
pub struct Seed {
    tag: String,
    kind: SeedKind,
    options: Options,
}

impl Seed {
    /// A plain element seed.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            kind: SeedKind::Element,
            options: Options::new(),
        }
    }

    /// Set the seed role (builder).
    pub fn with_kind(mut self, kind: SeedKind) -> Self {
        self.kind = kind;
        self
    }

    /// Add an option or child (builder).
    pub fn with(mut self, option: impl Apply + 'static) -> Self {
        self.options.push(option);
        self
    }

    /// HTML tag.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Seed role.
    pub fn kind(&self) -> SeedKind {
        self.kind
    }

    /// Options applied when the seed is built.
    pub fn options(&self) -> &Options {
        &self.options
    }
}

impl Apply for Seed {
    fn apply(&self, cx: &mut Context<'_>) -> Result<(), ComposeError> {
        match cx.phase() {
            Phase::Build => cx.add_child(self).map(|_| ()),
            phase => Err(ComposeError::IncompatiblePhase {
                option: "child seed",
                phase,
            }),
        }
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Seed")
            .field("tag", &self.tag)
            .field("kind", &self.kind)
            .field("options", &self.options)
            .finish()
    }
}
