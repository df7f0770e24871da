//! Reactive client model: variables, compound values, hooks, render
//! dispatch and gates.
//!
//! Everything here is data describing client behavior. The document holds
//! the registries; [`crate::runtime`] executes them headlessly and the
//! shipped library ([`LIBRARY`]) executes them in a browser.

pub mod gate;
pub mod hook;
pub mod op;
pub mod render;
pub mod secret;
pub mod value;
pub mod variable;

pub use gate::{bind_text, render_if, show_if, BindText, RenderIf, ShowIf};
pub use hook::{Hook, HookRegistry};
pub use render::{render, RenderRegistry};
pub use secret::hash_secret;
pub use value::{Compound, Value};
pub use variable::{BoolVar, Kind, Literal, NumberVar, Secret, SecretParams, StringVar, Variable};

/// The client library every exported page loads as `seed.js`.
pub const LIBRARY: &str = include_str!("seed.js");

#[cfg(test)]
mod tests {
    use super::LIBRARY;

    fn function_body(name: &str) -> &'static str {
        let start = LIBRARY
            .find(&format!("function {name}("))
            .unwrap_or_else(|| panic!("seed.js defines {name}"));
        let rest = &LIBRARY[start..];
        let end = rest.find("\n  }\n").unwrap();
        &rest[..end]
    }

    #[test]
    fn library_drops_hooks_of_detached_fragments() {
        let unmount = function_body("unmount");
        let drop = unmount.find("unregister(").unwrap();
        assert!(drop < unmount.find("el.hidden = true").unwrap());

        let mount = function_body("mount");
        let restore = mount.find("reregister(").unwrap();
        assert!(restore < mount.find("refresh(owner)").unwrap());
    }

    #[test]
    fn library_renders_never_reject_into_the_event_loop() {
        let set = function_body("set");
        assert!(set.contains("refresh(owner)"));
        assert!(!set.contains("render("));
        assert!(function_body("refresh").contains(".catch("));
        assert!(function_body("boot").contains("refresh(el.id)"));
    }
}
