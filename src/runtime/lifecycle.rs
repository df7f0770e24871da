//! Client lifecycle: mount, unmount and render events.
//!
//! The [`LifecycleTracker`] records which fragments are currently detached
//! and accumulates lifecycle events that tests can drain and inspect.

use std::collections::{HashMap, HashSet};

use crate::id::InstanceId;

/// Events that occur while the client runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// A fragment was attached to the live document.
    Mount { instance: InstanceId },
    /// A fragment was detached from the live document.
    Unmount { instance: InstanceId },
    /// An instance's render function ran.
    Render { instance: InstanceId },
}

/// Tracks detached fragments, render counts and pending events.
#[derive(Debug, Default)]
pub struct LifecycleTracker {
    detached: HashSet<InstanceId>,
    renders: HashMap<InstanceId, usize>,
    pending: Vec<LifecycleEvent>,
}

impl LifecycleTracker {
    /// An empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that a fragment was attached.
    ///
    /// If it was not detached, this is a no-op (no duplicate event).
    pub fn on_mount(&mut self, instance: InstanceId) {
        if self.detached.remove(&instance) {
            self.pending.push(LifecycleEvent::Mount { instance });
        }
    }

    /// Record that a fragment was detached.
    ///
    /// If it was already detached, this is a no-op.
    pub fn on_unmount(&mut self, instance: InstanceId) {
        if self.detached.insert(instance) {
            self.pending.push(LifecycleEvent::Unmount { instance });
        }
    }

    /// Record a run of `instance`'s render function.
    pub fn on_render(&mut self, instance: InstanceId) {
        *self.renders.entry(instance).or_default() += 1;
        self.pending.push(LifecycleEvent::Render { instance });
    }

    /// How many times `instance` has rendered.
    pub fn render_count(&self, instance: InstanceId) -> usize {
        self.renders.get(&instance).copied().unwrap_or(0)
    }

    /// Whether the fragment rooted at `instance` is detached.
    pub fn is_detached(&self, instance: InstanceId) -> bool {
        self.detached.contains(&instance)
    }

    /// Drain and return all pending events.
    pub fn pending_events(&mut self) -> Vec<LifecycleEvent> {
        std::mem::take(&mut self.pending)
    }

    /// Whether there are any pending events.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmount_then_mount() {
        let mut tracker = LifecycleTracker::new();
        let id = InstanceId(3);
        tracker.on_mount(id);
        assert!(!tracker.has_pending());

        tracker.on_unmount(id);
        tracker.on_unmount(id);
        assert!(tracker.is_detached(id));
        tracker.on_mount(id);
        assert_eq!(
            tracker.pending_events(),
            vec![
                LifecycleEvent::Unmount { instance: id },
                LifecycleEvent::Mount { instance: id },
            ]
        );
        assert!(!tracker.has_pending());
    }

    #[test]
    fn render_counts_accumulate() {
        let mut tracker = LifecycleTracker::new();
        tracker.on_render(InstanceId(1));
        tracker.on_render(InstanceId(1));
        assert_eq!(tracker.render_count(InstanceId(1)), 2);
        assert_eq!(tracker.render_count(InstanceId(2)), 0);
        assert_eq!(tracker.pending_events().len(), 2);
    }
}
