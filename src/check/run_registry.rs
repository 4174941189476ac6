//! Once-per-name claim set
//!
//! A package name may appear under many parents in the graph; whichever task
//! claims it first does the resolution work, every later claim is a no-op.
//! Scoped to one walk, so repeated runs start clean.

use std::collections::HashSet;
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct RunRegistry {
    seen: Mutex<HashSet<String>>,
}

impl RunRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically claim `name`. Returns true exactly once per name; names are
    /// never released within a run.
    pub fn claim(&self, name: &str) -> bool {
        let mut seen = self.seen.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        seen.insert(name.to_string())
    }

    pub fn claimed_count(&self) -> usize {
        self.seen
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}
