//! Preserving and rolling back registry contents.

use super::Registry;

/// Copy of a registry's steps and hooks.
///
/// Restoring a snapshot does not rewind identity counters, so handles issued
/// after the snapshot never match definitions restored from it.
#[derive(Clone, Debug)]
pub struct RegistrySnapshot {
    contents: Registry,
}

impl Registry {
    /// Capture the current steps and hooks.
    #[must_use]
    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            contents: self.clone(),
        }
    }

    /// Replace the steps and hooks with those of `snapshot`.
    pub fn restore(&mut self, snapshot: RegistrySnapshot) {
        let current = std::mem::replace(self, snapshot.contents);
        self.next_id = self.next_id.max(current.next_id);
        self.hooks.carry_ids_from(&current.hooks);
    }

    /// Run `f` and roll the registry back afterwards.
    ///
    /// The rollback also happens when `f` panics.
    ///
    /// # Examples
    /// ```
    /// use cress::{Registry, StepCall, StepError};
    ///
    /// let mut registry = Registry::new();
    /// registry.scoped(|registry| {
    ///     registry
    ///         .register_step(Some("temporary"), |_: &StepCall<'_>| Ok::<_, StepError>(()))
    ///         .map(|_| ())
    /// })?;
    /// assert!(registry.is_empty());
    /// # Ok::<(), cress::StepLoadingError>(())
    /// ```
    pub fn scoped<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let snapshot = self.snapshot();
        let guard = RestoreOnDrop {
            registry: self,
            snapshot: Some(snapshot),
        };
        f(&mut *guard.registry)
    }
}

struct RestoreOnDrop<'a> {
    registry: &'a mut Registry,
    snapshot: Option<RegistrySnapshot>,
}

impl Drop for RestoreOnDrop<'_> {
    fn drop(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            self.registry.restore(snapshot);
        }
    }
}
