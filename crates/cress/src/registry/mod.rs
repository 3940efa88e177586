//! Step and hook registration, lookup and wrapping.
//!
//! A [`Registry`] owns an ordered list of step definitions and the hook
//! table. Lookup walks the list in registration order and stops at the first
//! pattern that matches; there is no ranking by specificity. A pattern
//! registered again replaces the earlier definition in its original slot.

use std::any;
use std::sync::{Arc, LazyLock, Mutex, MutexGuard, PoisonError};

use cress_gherkin::{Node, Step};
use hashbrown::HashMap;

mod hooks;
mod snapshot;
mod steps;
mod wrap;

pub use hooks::{
    AroundGuard, HookError, HookHandle, HookOptions, HookTarget, PriorityClass, Scope, Timing,
};
pub use snapshot::RegistrySnapshot;
pub use steps::{
    NoDefinitionFound, StepDeclaration, StepDefinition, StepHandle, StepId, StepLoadingError,
    StepMatch, StepOrigin,
};
pub use wrap::{HookBracket, HookFailure, WrapError};

use crate::pattern::StepPattern;
use crate::types::{StepCall, StepError, StepHandler};
use hooks::{Callback, HookTable};
use steps::{sentence_for, sentence_from_doc};

/// Registered steps and hooks.
#[derive(Clone, Default)]
pub struct Registry {
    steps: Vec<Arc<StepDefinition>>,
    index: HashMap<String, usize>,
    hooks: HookTable,
    next_id: u64,
}

impl Registry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every step declared with [`step!`](crate::step).
    ///
    /// Declarations are registered sorted by source file and line, so the
    /// result does not depend on link order.
    ///
    /// # Errors
    ///
    /// Returns the first [`StepLoadingError`] among the declarations.
    pub fn from_inventory() -> Result<Self, StepLoadingError> {
        let mut declarations: Vec<&StepDeclaration> = inventory::iter::<StepDeclaration>
            .into_iter()
            .collect();
        declarations.sort_by_key(|declaration| (declaration.file, declaration.line));
        let mut registry = Self::new();
        for declaration in declarations {
            let pattern = declaration.sentence()?;
            registry.insert(&pattern, Arc::new(declaration.handler), Some(declaration.origin()))?;
        }
        Ok(registry)
    }

    /// Register `handler` under `pattern`.
    ///
    /// Without a pattern the sentence is derived from the handler's function
    /// name: `i_have_cukes` registers as `I have cukes`. Closures have no
    /// usable name and must be given a pattern.
    ///
    /// # Errors
    ///
    /// Returns [`StepLoadingError::InvalidPattern`] when the pattern does not
    /// compile and [`StepLoadingError::UnnamedHandler`] when no sentence can
    /// be derived.
    ///
    /// # Examples
    /// ```
    /// use cress::{Registry, StepCall, StepError};
    ///
    /// fn i_have_cukes(_: &StepCall<'_>) -> Result<(), StepError> {
    ///     Ok(())
    /// }
    ///
    /// let mut registry = Registry::new();
    /// let handle = registry.register_step(None, i_have_cukes)?;
    /// assert_eq!(handle.pattern(), "I have cukes");
    /// assert!(registry.match_sentence("Given I have cukes").is_ok());
    /// # Ok::<(), cress::StepLoadingError>(())
    /// ```
    pub fn register_step<H>(
        &mut self,
        pattern: Option<&str>,
        handler: H,
    ) -> Result<StepHandle, StepLoadingError>
    where
        H: Fn(&StepCall<'_>) -> Result<(), StepError> + Send + Sync + 'static,
    {
        let pattern = match pattern {
            Some(pattern) => pattern.to_owned(),
            None => sentence_for::<H>()?,
        };
        self.insert(&pattern, Arc::new(handler), None)
    }

    /// Register `handler` under the first non-blank line of `doc`.
    ///
    /// # Errors
    ///
    /// Returns [`StepLoadingError::MissingDocumentation`] for blank
    /// documentation and [`StepLoadingError::InvalidPattern`] when the line
    /// does not compile.
    pub fn register_documented_step<H>(
        &mut self,
        doc: &str,
        handler: H,
    ) -> Result<StepHandle, StepLoadingError>
    where
        H: Fn(&StepCall<'_>) -> Result<(), StepError> + Send + Sync + 'static,
    {
        let pattern = sentence_from_doc(doc)?;
        self.insert(&pattern, Arc::new(handler), None)
    }

    fn insert(
        &mut self,
        pattern: &str,
        handler: StepHandler,
        origin: Option<StepOrigin>,
    ) -> Result<StepHandle, StepLoadingError> {
        let compiled = StepPattern::new(pattern).map_err(|source| StepLoadingError::InvalidPattern {
            pattern: pattern.to_owned(),
            source,
        })?;
        self.next_id += 1;
        let id = StepId(self.next_id);
        let definition = Arc::new(StepDefinition {
            id,
            pattern: compiled,
            handler,
            origin,
        });
        let slot = self.index.get(pattern).copied();
        match slot.and_then(|position| self.steps.get_mut(position)) {
            Some(existing) => {
                log::debug!("replacing step definition '{pattern}'");
                *existing = definition;
            }
            None => {
                log::debug!("registering step definition '{pattern}'");
                self.index.insert(pattern.to_owned(), self.steps.len());
                self.steps.push(definition);
            }
        }
        Ok(StepHandle {
            id,
            pattern: pattern.to_owned(),
        })
    }

    /// Remove the definition `handle` created.
    ///
    /// Returns `false` when it is already gone, including when it was
    /// replaced by a later registration of the same pattern.
    pub fn unregister_step(&mut self, handle: &StepHandle) -> bool {
        let Some(position) = self.index.get(&handle.pattern).copied() else {
            return false;
        };
        if self.steps.get(position).is_none_or(|step| step.id != handle.id) {
            return false;
        }
        self.steps.remove(position);
        self.reindex();
        log::debug!("unregistered step definition '{}'", handle.pattern);
        true
    }

    fn reindex(&mut self) {
        self.index = self
            .steps
            .iter()
            .enumerate()
            .map(|(position, step)| (step.pattern.as_str().to_owned(), position))
            .collect();
    }

    /// Registered definitions in matching order.
    pub fn steps(&self) -> impl ExactSizeIterator<Item = &StepDefinition> {
        self.steps.iter().map(AsRef::as_ref)
    }

    /// Number of step definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether no step definitions are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Find the first definition whose pattern occurs in `sentence`.
    ///
    /// # Errors
    ///
    /// Returns [`NoDefinitionFound`] without a location when nothing
    /// matches.
    pub fn match_sentence(&self, sentence: &str) -> Result<StepMatch, NoDefinitionFound> {
        self.steps
            .iter()
            .find_map(|definition| {
                definition.pattern.captures(sentence).map(|arguments| StepMatch {
                    definition: Arc::clone(definition),
                    arguments,
                })
            })
            .ok_or_else(|| NoDefinitionFound {
                sentence: sentence.to_owned(),
                location: None,
            })
    }

    /// Match a parsed step by its sentence.
    ///
    /// # Errors
    ///
    /// Returns [`NoDefinitionFound`] carrying the step's location.
    pub fn match_step(&self, step: &Step) -> Result<StepMatch, NoDefinitionFound> {
        self.match_sentence(step.sentence()).map_err(|mut missing| {
            missing.location = Some(step.location().clone());
            missing
        })
    }

    /// Match every step, reporting each missing definition separately.
    #[must_use]
    pub fn match_steps(&self, steps: &[Step]) -> Vec<Result<StepMatch, NoDefinitionFound>> {
        steps.iter().map(|step| self.match_step(step)).collect()
    }

    /// Register a before hook.
    ///
    /// Without an explicit name the hook is named after its type, so two
    /// unnamed closures defined in the same function replace each other.
    pub fn before<H>(&mut self, scope: Scope, options: HookOptions, hook: H) -> HookHandle
    where
        H: Fn(&HookTarget<'_>) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.hooks.insert(
            scope,
            Timing::Before,
            options,
            any::type_name::<H>(),
            Callback::Plain(Arc::new(hook)),
        )
    }

    /// Register an after hook.
    ///
    /// Naming follows [`before`](Self::before).
    pub fn after<H>(&mut self, scope: Scope, options: HookOptions, hook: H) -> HookHandle
    where
        H: Fn(&HookTarget<'_>) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.hooks.insert(
            scope,
            Timing::After,
            options,
            any::type_name::<H>(),
            Callback::Plain(Arc::new(hook)),
        )
    }

    /// Register an around hook.
    ///
    /// The hook runs on entry and returns an [`AroundGuard`] whose exit
    /// closure runs once the wrapped call is over.
    pub fn around<H>(&mut self, scope: Scope, options: HookOptions, hook: H) -> HookHandle
    where
        H: Fn(&HookTarget<'_>) -> Result<AroundGuard, HookError> + Send + Sync + 'static,
    {
        self.hooks.insert(
            scope,
            Timing::Around,
            options,
            any::type_name::<H>(),
            Callback::Around(Arc::new(hook)),
        )
    }

    /// Remove the hook `handle` created; `false` when it is already gone.
    pub fn unregister_hook(&mut self, handle: &HookHandle) -> bool {
        self.hooks.remove(handle)
    }

    /// Number of registered hooks across all scopes.
    #[must_use]
    pub fn hook_count(&self) -> usize {
        self.hooks.len()
    }

    /// The hooks of `scope`, split into entry and exit halves.
    ///
    /// The bracket holds its own copy of the hook lists.
    pub fn before_after(&self, scope: Scope) -> HookBracket {
        HookBracket::new(
            scope,
            self.hooks.ordered(scope, Timing::Before),
            self.hooks.ordered(scope, Timing::Around),
            self.hooks.ordered(scope, Timing::After),
        )
    }

    /// Wrap `call` in the hooks of `scope`.
    ///
    /// The returned closure runs the before hooks, enters the around hooks,
    /// runs `call`, exits the around hooks in reverse and finally runs the
    /// after hooks. After hooks run whether `call` failed or not. The first
    /// error wins. It captures the hook lists as they are now and does not
    /// borrow the registry.
    ///
    /// # Examples
    /// ```
    /// use cress::{HookOptions, HookTarget, Registry, Scope};
    ///
    /// let mut registry = Registry::new();
    /// registry.before(Scope::All, HookOptions::new().named("setup"), |_| Ok(()));
    /// let wrapped = registry.wrap(Scope::All, |_| Ok::<_, std::fmt::Error>(42));
    /// assert_eq!(wrapped(&HookTarget::All), Ok(42));
    /// ```
    pub fn wrap<T, E, F>(
        &self,
        scope: Scope,
        call: F,
    ) -> impl FnOnce(&HookTarget<'_>) -> Result<T, WrapError<E>> + use<T, E, F>
    where
        F: FnOnce(&HookTarget<'_>) -> Result<T, E>,
    {
        let bracket = self.before_after(scope);
        move |target| wrap::run_bracketed(bracket, target, call)
    }

    /// Remove every step and hook.
    pub fn clear(&mut self) {
        self.steps.clear();
        self.index.clear();
        let previous = std::mem::take(&mut self.hooks);
        self.hooks.carry_ids_from(&previous);
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("steps", &self.steps)
            .field("hooks", &self.hooks.len())
            .finish_non_exhaustive()
    }
}

static GLOBAL: LazyLock<Mutex<Registry>> = LazyLock::new(|| {
    let registry = Registry::from_inventory()
        .unwrap_or_else(|error| panic!("invalid step declaration: {error}"));
    Mutex::new(registry)
});

/// The process-wide default registry, seeded from [`step!`](crate::step)
/// declarations on first use.
///
/// # Panics
///
/// Panics on first use if a declaration has an invalid pattern.
#[must_use]
pub fn global() -> MutexGuard<'static, Registry> {
    GLOBAL.lock().unwrap_or_else(PoisonError::into_inner)
}
