//! Option application: phases, the [`Apply`] trait and its [`Context`].
//!
//! An option is applied to a target node in one of three phases. During
//! [`Phase::Build`] it mutates the document directly. During
//! [`Phase::Client`] it emits the statements that produce the same effect on
//! the client, and during [`Phase::Undo`] the statements that revert it. Gates
//! use the last two to build their branches.

use std::fmt;

use crate::client::Value;
use crate::document::Document;
use crate::dom::{NodeData, NodeId, SeedKind};
use crate::id::InstanceId;
use crate::js::{ArityError, Script, Statement};

use super::component::Seed;

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// When an option is being applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Server-side construction of the document.
    Build,
    /// Emitting client statements that apply the option.
    Client,
    /// Emitting client statements that revert the option.
    Undo,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Build => "build",
            Phase::Client => "client",
            Phase::Undo => "undo",
        })
    }
}

// ---------------------------------------------------------------------------
// ComposeError
// ---------------------------------------------------------------------------

/// Errors raised while composing a document.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ComposeError {
    /// The option cannot run in this phase.
    #[error("`{option}` cannot be applied during the {phase} phase")]
    IncompatiblePhase {
        /// Option name.
        option: &'static str,
        /// The rejected phase.
        phase: Phase,
    },
    /// The option needs a different kind of target.
    #[error("`{option}` requires a {expected} target, got {found}")]
    WrongKind {
        /// Option name.
        option: &'static str,
        /// Required kind.
        expected: SeedKind,
        /// Actual kind.
        found: SeedKind,
    },
    /// A compound value had the wrong number of operands.
    #[error(transparent)]
    Arity(#[from] ArityError),
    /// The target is not (or no longer) part of the document.
    #[error("node {0:?} is not part of the document")]
    UnknownNode(NodeId),
}

// ---------------------------------------------------------------------------
// Apply
// ---------------------------------------------------------------------------

/// A composable option.
///
/// Implemented by every option and by [`Seed`] itself, so seeds can be
/// passed wherever options are accepted.
pub trait Apply {
    /// Apply to `cx.target()` in `cx.phase()`.
    fn apply(&self, cx: &mut Context<'_>) -> Result<(), ComposeError>;
}

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// Target, phase and output of one option application.
pub struct Context<'a> {
    document: &'a mut Document,
    target: NodeId,
    instance: InstanceId,
    phase: Phase,
    emitted: Script,
}

impl<'a> Context<'a> {
    /// A context for `target`. Fails if the node does not exist.
    pub fn new(
        document: &'a mut Document,
        target: NodeId,
        phase: Phase,
    ) -> Result<Self, ComposeError> {
        let instance = document
            .node(target)
            .map(|node| node.instance)
            .ok_or(ComposeError::UnknownNode(target))?;
        Ok(Self {
            document,
            target,
            instance,
            phase,
            emitted: Script::new(),
        })
    }

    /// The current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The target node.
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// Client-side id of the target.
    pub fn instance(&self) -> InstanceId {
        self.instance
    }

    /// The document being composed.
    pub fn document(&self) -> &Document {
        &*self.document
    }

    /// Mutable access to the document (to allocate variables, for instance).
    pub fn document_mut(&mut self) -> &mut Document {
        &mut *self.document
    }

    /// The target node's data.
    pub fn node(&self) -> Result<&NodeData, ComposeError> {
        self.document
            .node(self.target)
            .ok_or(ComposeError::UnknownNode(self.target))
    }

    /// Mutable access to the target node's data.
    pub fn node_mut(&mut self) -> Result<&mut NodeData, ComposeError> {
        let target = self.target;
        self.document
            .node_mut(target)
            .ok_or(ComposeError::UnknownNode(target))
    }

    /// Fail unless this is the build phase.
    pub fn require_build(&self, option: &'static str) -> Result<(), ComposeError> {
        match self.phase {
            Phase::Build => Ok(()),
            phase => Err(ComposeError::IncompatiblePhase { option, phase }),
        }
    }

    /// Fail unless the target is of `expected` kind.
    pub fn require_kind(&self, option: &'static str, expected: SeedKind) -> Result<(), ComposeError> {
        let found = self.node()?.kind;
        if found == expected {
            Ok(())
        } else {
            Err(ComposeError::WrongKind {
                option,
                expected,
                found,
            })
        }
    }

    /// Append a client statement to this application's output.
    pub fn emit(&mut self, statement: Statement) {
        self.emitted.push(statement);
    }

    /// Apply another option to the same target and phase.
    pub fn apply(&mut self, option: &dyn Apply) -> Result<(), ComposeError> {
        option.apply(self)
    }

    /// Apply `option` to the same target in `phase`, returning what it emits.
    pub fn collect(&mut self, phase: Phase, option: &dyn Apply) -> Result<Script, ComposeError> {
        let mut cx = Context {
            document: &mut *self.document,
            target: self.target,
            instance: self.instance,
            phase,
            emitted: Script::new(),
        };
        option.apply(&mut cx)?;
        Ok(cx.emitted)
    }

    /// Hook the target on `trigger` and append `statement` to its render
    /// function.
    pub fn bind(&mut self, trigger: &Value, statement: Statement) {
        self.document.hook(trigger, self.instance, statement);
    }

    /// Create `seed` as the last child of the target and build it.
    pub fn add_child(&mut self, seed: &Seed) -> Result<NodeId, ComposeError> {
        let child = self
            .document
            .insert_child(self.target, seed.tag(), seed.kind())
            .ok_or(ComposeError::UnknownNode(self.target))?;
        let mut cx = Context::new(&mut *self.document, child, Phase::Build)?;
        seed.options().apply(&mut cx)?;
        Ok(child)
    }

    /// Statements emitted so far.
    pub fn into_script(self) -> Script {
        self.emitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppConfig;

    #[test]
    fn phase_display() {
        assert_eq!(Phase::Build.to_string(), "build");
        assert_eq!(Phase::Undo.to_string(), "undo");
    }

    #[test]
    fn incompatible_phase_message() {
        let err = ComposeError::IncompatiblePhase {
            option: "on",
            phase: Phase::Client,
        };
        assert_eq!(err.to_string(), "`on` cannot be applied during the client phase");
    }

    #[test]
    fn context_for_missing_node_fails() {
        let mut doc = Document::new(AppConfig::new("t"));
        let body = doc.body();
        let child = doc.insert_child(body, "p", SeedKind::Element).unwrap();
        doc.remove(child);
        assert!(matches!(
            Context::new(&mut doc, child, Phase::Build),
            Err(ComposeError::UnknownNode(_))
        ));
    }

    #[test]
    fn require_build_and_kind() {
        let mut doc = Document::new(AppConfig::new("t"));
        let body = doc.body();
        let cx = Context::new(&mut doc, body, Phase::Undo).unwrap();
        assert!(cx.require_build("x").is_err());
        assert!(cx.require_kind("x", SeedKind::App).is_ok());
        let err = cx.require_kind("x", SeedKind::Page).unwrap_err();
        assert_eq!(err.to_string(), "`x` requires a page target, got app");
    }

    #[test]
    fn add_child_builds_seed() {
        let mut doc = Document::new(AppConfig::new("t"));
        let body = doc.body();
        let mut cx = Context::new(&mut doc, body, Phase::Build).unwrap();
        let child = cx.add_child(&Seed::new("p")).unwrap();
        assert_eq!(doc.node(child).unwrap().tag, "p");
        assert_eq!(doc.node(child).unwrap().instance, InstanceId(1));
    }
}
