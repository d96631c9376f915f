//! Mutable encounter state shared across calls.
use serde::{Deserialize, Serialize};

/// Global encounter toggle plus the flags describing the most recent encounter.
///
/// Every entry point clears the two "last encounter" flags before it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EncounterSession {
    disabled: bool,
    last_was_fishing: bool,
    last_was_surfing: bool,
}

impl EncounterSession {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            disabled: false,
            last_was_fishing: false,
            last_was_surfing: false,
        }
    }

    pub const fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        self.disabled
    }

    #[must_use]
    pub const fn last_was_fishing(&self) -> bool {
        self.last_was_fishing
    }

    #[must_use]
    pub const fn last_was_surfing(&self) -> bool {
        self.last_was_surfing
    }

    pub(crate) const fn begin_attempt(&mut self) {
        self.last_was_fishing = false;
        self.last_was_surfing = false;
    }

    pub(crate) const fn mark_fishing(&mut self) {
        self.last_was_fishing = true;
    }

    pub(crate) const fn mark_surfing(&mut self) {
        self.last_was_surfing = true;
    }
}
