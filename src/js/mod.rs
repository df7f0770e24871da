//! Expression builder: typed client expressions and statements.
//!
//! Pure and stateless. Nodes are built compositionally and rendered to client
//! code with explicit parenthesisation and per-character literal escaping.

pub mod escape;
pub mod expr;
pub mod script;

pub use expr::{Arity, ArityError, Expr, Operation, Operator};
pub use script::{Script, Statement};
