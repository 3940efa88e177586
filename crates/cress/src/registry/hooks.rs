//! Lifecycle hooks and their ordering.

use std::fmt;
use std::sync::Arc;

use cress_gherkin::{Background, Feature, Record, ScenarioRef, Step};
use hashbrown::HashMap;

use super::Registry;

/// Lifecycle point a hook is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// A whole run.
    All,
    /// One feature.
    Feature,
    /// One example of a scenario.
    Example,
    /// The background steps of one example.
    Background,
    /// One step.
    Step,
}

impl Scope {
    /// Lowercase name used in diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Feature => "feature",
            Self::Example => "example",
            Self::Background => "background",
            Self::Step => "step",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// When a hook runs relative to the wrapped call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timing {
    /// Before the call.
    Before,
    /// Entered before and exited after the call.
    Around,
    /// After the call, whether it failed or not.
    After,
}

impl Timing {
    /// Lowercase name used in diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Before => "before",
            Self::Around => "around",
            Self::After => "after",
        }
    }

    const fn direction(self) -> i64 {
        match self {
            Self::Before | Self::Around => 1,
            Self::After => -1,
        }
    }
}

impl fmt::Display for Timing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse ordering tier.
///
/// On the way in, outer hooks run first and inner hooks last; after hooks
/// run in the opposite order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PriorityClass {
    /// Framework hooks that wrap around user hooks.
    SystemOuter = -1,
    /// User hooks.
    #[default]
    User = 0,
    /// Framework hooks that run inside user hooks.
    SystemInner = 1,
}

/// Registration options for a hook.
///
/// Lower priorities run earlier within a class on the way in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HookOptions {
    name: Option<String>,
    priority: i32,
    class: PriorityClass,
}

impl HookOptions {
    /// User-class hook at priority zero, named after its type.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Name the hook explicitly; registering the same name again replaces it.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Explicit priority within the class.
    #[must_use]
    pub const fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Priority class.
    #[must_use]
    pub const fn class(mut self, class: PriorityClass) -> Self {
        self.class = class;
        self
    }
}

/// What a hook is running for.
#[derive(Debug, Clone, Copy)]
#[non_exhaustive]
pub enum HookTarget<'a> {
    /// A whole run.
    All,
    /// A feature.
    Feature(&'a Feature),
    /// One example of a scenario, with its examples row if it has one.
    Example {
        /// The scenario.
        scenario: ScenarioRef<'a>,
        /// The examples row the steps were resolved from.
        outline: Option<&'a Record>,
    },
    /// A feature's background.
    Background(&'a Background),
    /// A step.
    Step(&'a Step),
}

/// Failure reported by a hook.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct HookError {
    message: String,
}

impl HookError {
    /// Create an error carrying `message`.
    pub fn new(message: impl fmt::Display) -> Self {
        Self {
            message: message.to_string(),
        }
    }

    /// The message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Exit half of an around hook.
///
/// Returned when the hook is entered and released once the wrapped call has
/// finished.
#[must_use]
pub struct AroundGuard {
    exit: Option<Box<dyn FnOnce() -> Result<(), HookError>>>,
}

impl AroundGuard {
    /// Run `exit` when the guard is released.
    pub fn new(exit: impl FnOnce() -> Result<(), HookError> + 'static) -> Self {
        Self {
            exit: Some(Box::new(exit)),
        }
    }

    /// A guard with nothing to do on exit.
    pub const fn empty() -> Self {
        Self { exit: None }
    }

    pub(crate) fn release(mut self) -> Result<(), HookError> {
        self.exit.take().map_or(Ok(()), |exit| exit())
    }
}

impl fmt::Debug for AroundGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AroundGuard")
            .field("pending", &self.exit.is_some())
            .finish()
    }
}

pub(crate) type PlainHook = Arc<dyn Fn(&HookTarget<'_>) -> Result<(), HookError> + Send + Sync>;
pub(crate) type AroundHook =
    Arc<dyn Fn(&HookTarget<'_>) -> Result<AroundGuard, HookError> + Send + Sync>;

#[derive(Clone)]
pub(crate) enum Callback {
    Plain(PlainHook),
    Around(AroundHook),
}

/// Proof of a hook registration, used to remove it again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookHandle {
    pub(crate) scope: Scope,
    pub(crate) timing: Timing,
    pub(crate) name: String,
    pub(crate) id: u64,
}

impl HookHandle {
    /// Name the hook was registered under.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Scope the hook was registered for.
    #[must_use]
    pub const fn scope(&self) -> Scope {
        self.scope
    }

    /// Timing the hook was registered for.
    #[must_use]
    pub const fn timing(&self) -> Timing {
        self.timing
    }

    /// Remove the hook this handle created from `registry`.
    pub fn unregister(&self, registry: &mut Registry) -> bool {
        registry.unregister_hook(self)
    }
}

#[derive(Clone)]
pub(crate) struct HookEntry {
    pub(crate) name: String,
    id: u64,
    priority: i32,
    class: PriorityClass,
    insertion: i64,
    pub(crate) callback: Callback,
}

impl HookEntry {
    fn key(&self, timing: Timing) -> (i64, i64, i64) {
        let direction = timing.direction();
        (
            direction * self.class as i64,
            direction * i64::from(self.priority),
            direction * self.insertion,
        )
    }
}

/// Hooks grouped by `(scope, timing)`.
#[derive(Clone, Default)]
pub(crate) struct HookTable {
    entries: HashMap<(Scope, Timing), Vec<HookEntry>>,
    next_insertion: i64,
    next_id: u64,
}

impl HookTable {
    /// Keep id allocation ahead of anything `other` has issued.
    pub(crate) fn carry_ids_from(&mut self, other: &Self) {
        self.next_id = self.next_id.max(other.next_id);
    }

    pub(crate) fn insert(
        &mut self,
        scope: Scope,
        timing: Timing,
        options: HookOptions,
        default_name: &str,
        callback: Callback,
    ) -> HookHandle {
        let name = options.name.unwrap_or_else(|| default_name.to_owned());
        self.next_id += 1;
        let id = self.next_id;
        let bucket = self.entries.entry((scope, timing)).or_default();
        if let Some(existing) = bucket.iter_mut().find(|entry| entry.name == name) {
            log::debug!("replacing {timing} {scope} hook '{name}'");
            existing.id = id;
            existing.priority = options.priority;
            existing.class = options.class;
            existing.callback = callback;
        } else {
            log::debug!("registering {timing} {scope} hook '{name}'");
            self.next_insertion += 1;
            bucket.push(HookEntry {
                name: name.clone(),
                id,
                priority: options.priority,
                class: options.class,
                insertion: self.next_insertion,
                callback,
            });
        }
        HookHandle {
            scope,
            timing,
            name,
            id,
        }
    }

    pub(crate) fn remove(&mut self, handle: &HookHandle) -> bool {
        let Some(bucket) = self.entries.get_mut(&(handle.scope, handle.timing)) else {
            return false;
        };
        let before = bucket.len();
        bucket.retain(|entry| entry.id != handle.id);
        bucket.len() != before
    }

    /// Hooks for `(scope, timing)` in execution order.
    pub(crate) fn ordered(&self, scope: Scope, timing: Timing) -> Vec<HookEntry> {
        let mut hooks = self
            .entries
            .get(&(scope, timing))
            .cloned()
            .unwrap_or_default();
        hooks.sort_by_key(|entry| entry.key(timing));
        hooks
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}
