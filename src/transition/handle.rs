use std::sync::{Arc, OnceLock};

use crate::sections::registry::SectionId;

/// Tagged completion value of one transition.
///
/// A redirected transition resolves `Superseded`, never an error, so
/// callers can distinguish "reached the requested target" from "the user
/// steered elsewhere mid-flight" without consulting side-channel state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The transition played to the end and landed on `reached`.
    Completed { reached: SectionId },
    /// A redirect replaced this transition before it finished.
    Superseded { new_target: SectionId },
}

/// Cloneable completion handle for one transition.
///
/// Resolved exactly once by the tick that finishes the transition or by
/// the redirect that supersedes it. Handles never reject.
#[derive(Clone, Debug)]
pub struct TransitionHandle {
    slot: Arc<OnceLock<TransitionOutcome>>,
}

impl TransitionHandle {
    pub(crate) fn pending() -> Self {
        Self {
            slot: Arc::new(OnceLock::new()),
        }
    }

    /// Pre-resolved handle, used by the reduced-motion bypass.
    pub(crate) fn resolved(outcome: TransitionOutcome) -> Self {
        let handle = Self::pending();
        handle.resolve(outcome);
        handle
    }

    pub(crate) fn resolve(&self, outcome: TransitionOutcome) {
        let fresh = self.slot.set(outcome).is_ok();
        debug_assert!(fresh, "transition handle resolved twice");
    }

    pub fn outcome(&self) -> Option<TransitionOutcome> {
        self.slot.get().copied()
    }

    pub fn is_resolved(&self) -> bool {
        self.slot.get().is_some()
    }
}
