//! Fluent-backed localisation for runtime diagnostics.
//!
//! Every user-facing error in this crate renders through the active loader.
//! A process-wide loader starts in English; [`ScopedLocalization`] swaps in
//! a loader for the current thread only, which keeps tests independent.

use std::cell::RefCell;
use std::sync::{LazyLock, PoisonError, RwLock};

use fluent::FluentArgs;
use i18n_embed::I18nEmbedError;
use i18n_embed::fluent::{FluentLanguageLoader, fluent_language_loader};
use rust_embed::RustEmbed;
use thiserror::Error;
use unic_langid::LanguageIdentifier;

/// Embedded Fluent resources shipped with the crate.
///
/// # Examples
/// ```
/// # use cress::localization::Localizations;
/// # use i18n_embed::fluent::fluent_language_loader;
/// # use unic_langid::langid;
/// let loader = fluent_language_loader!();
/// let selected = i18n_embed::select(&loader, &Localizations, &[langid!("fr")])?;
/// assert!(selected.contains(&langid!("fr")));
/// # Ok::<(), i18n_embed::I18nEmbedError>(())
/// ```
#[derive(RustEmbed)]
#[folder = "i18n"]
pub struct Localizations;

static LANGUAGE_LOADER: LazyLock<RwLock<FluentLanguageLoader>> = LazyLock::new(|| {
    let loader = fluent_language_loader!();
    i18n_embed::select(&loader, &Localizations, &[unic_langid::langid!("en-US")])
        .unwrap_or_else(|error| panic!("failed to load default English translations: {error}"));
    RwLock::new(loader)
});

thread_local! {
    static OVERRIDE_LOADER: RefCell<Option<FluentLanguageLoader>> = const { RefCell::new(None) };
}

/// Errors from localisation setup and queries.
#[derive(Debug, Error)]
pub enum LocalizationError {
    /// The global loader lock was poisoned.
    #[error("localization state is poisoned")]
    Poisoned,
    /// Loading or selecting Fluent resources failed.
    #[error("failed to load localization resources: {0}")]
    Loader(#[from] I18nEmbedError),
}

/// RAII guard that installs a thread-local loader for its lifetime.
///
/// Guards nest: dropping one reinstates whatever loader was active when it
/// was created.
#[must_use]
pub struct ScopedLocalization {
    previous: Option<FluentLanguageLoader>,
}

impl ScopedLocalization {
    /// Load `requested` into a dedicated loader and activate it for the
    /// current thread.
    ///
    /// # Errors
    ///
    /// Returns [`LocalizationError::Loader`] if the resources cannot be
    /// loaded for the requested languages.
    pub fn new(requested: &[LanguageIdentifier]) -> Result<Self, LocalizationError> {
        let loader = fluent_language_loader!();
        i18n_embed::select(&loader, &Localizations, requested)?;
        let previous = OVERRIDE_LOADER.with(|cell| cell.replace(Some(loader)));
        Ok(Self { previous })
    }
}

impl Drop for ScopedLocalization {
    fn drop(&mut self) {
        let previous = self.previous.take();
        OVERRIDE_LOADER.with(|cell| {
            *cell.borrow_mut() = previous;
        });
    }
}

/// Switch the active loader to the best match for `requested`.
///
/// Applies to the thread-local loader when a [`ScopedLocalization`] is
/// active, otherwise to the process-wide one.
///
/// # Errors
///
/// Returns [`LocalizationError::Poisoned`] if the global lock is poisoned or
/// [`LocalizationError::Loader`] when resource selection fails.
pub fn select_localizations(
    requested: &[LanguageIdentifier],
) -> Result<Vec<LanguageIdentifier>, LocalizationError> {
    OVERRIDE_LOADER.with(|cell| -> Result<_, LocalizationError> {
        if let Some(loader) = cell.borrow().as_ref() {
            return Ok(i18n_embed::select(loader, &Localizations, requested)?);
        }
        let guard = LANGUAGE_LOADER
            .read()
            .map_err(|_| LocalizationError::Poisoned)?;
        Ok(i18n_embed::select(&*guard, &Localizations, requested)?)
    })
}

/// Languages of the active loader, most preferred first.
///
/// # Errors
///
/// Returns [`LocalizationError::Poisoned`] if the global lock is poisoned.
pub fn current_languages() -> Result<Vec<LanguageIdentifier>, LocalizationError> {
    OVERRIDE_LOADER.with(|cell| -> Result<_, LocalizationError> {
        if let Some(loader) = cell.borrow().as_ref() {
            return Ok(loader.current_languages());
        }
        let guard = LANGUAGE_LOADER
            .read()
            .map_err(|_| LocalizationError::Poisoned)?;
        Ok(guard.current_languages())
    })
}

/// Retrieve a localised message without arguments.
#[must_use]
pub fn message(id: &str) -> String {
    with_loader(|loader| strip_directional_isolates(&loader.get(id)))
}

/// Retrieve a localised message with Fluent arguments.
///
/// Directional isolation marks inserted around arguments are removed.
///
/// # Examples
/// ```
/// # use cress::localization;
/// let rendered = localization::message_with_args("no-definition-found", |args| {
///     args.set("sentence", "Given nothing");
/// });
/// assert_eq!(rendered, "no step definition matches 'Given nothing'");
/// ```
#[must_use]
pub fn message_with_args<F>(id: &str, configure: F) -> String
where
    F: FnOnce(&mut FluentArgs<'static>),
{
    with_loader(|loader| {
        let mut args = FluentArgs::new();
        configure(&mut args);
        strip_directional_isolates(&loader.get_args_fluent(id, Some(&args)))
    })
}

fn with_loader<R>(callback: impl FnOnce(&FluentLanguageLoader) -> R) -> R {
    OVERRIDE_LOADER.with(|cell| {
        let borrow = cell.borrow();
        if let Some(loader) = borrow.as_ref() {
            return callback(loader);
        }
        drop(borrow);
        let guard = LANGUAGE_LOADER
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        callback(&guard)
    })
}

/// Remove the Unicode directional isolates Fluent places around arguments.
#[must_use]
pub fn strip_directional_isolates(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(*c, '\u{2066}' | '\u{2067}' | '\u{2068}' | '\u{2069}'))
        .collect()
}
