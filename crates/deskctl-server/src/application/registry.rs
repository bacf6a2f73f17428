//! Action registry.
//!
//! The registry maps action names to handlers.  It is built from a
//! [`HandlerCatalog`] at startup and rebuilt from the same catalog on every
//! `reload` command.
//!
//! # Atomic replace
//!
//! The live mapping is an `Arc<HashMap<..>>` behind an `RwLock`.  A reload
//! builds the complete new map without holding the lock, then swaps the `Arc`
//! under a brief write lock.  Lookups clone the handler `Arc` out under a
//! read lock, so a handler already running keeps working after a swap, and a
//! lookup never observes a half-built map.
//!
//! If the catalog as a whole fails, the previous mapping stays in place.  A
//! single entry that fails to register is skipped with a warning.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use thiserror::Error;
use tracing::{debug, info, warn};

use super::handlers::{builtin_handlers, ActionHandler};

/// Name of the built-in reload command.  No handler may register under it.
pub const RELOAD_ACTION: &str = "reload";

/// Error type for registry construction.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The catalog could not be enumerated at all.
    #[error("handler catalog failed: {0}")]
    Catalog(String),

    /// One catalog entry could not be registered.
    #[error("failed to register handler '{name}': {reason}")]
    Registration { name: String, reason: String },
}

/// One catalog entry: a handler, or the reason it could not be produced.
pub type CatalogEntry = Result<Arc<dyn ActionHandler>, RegistryError>;

/// A source of handlers the registry is (re)built from.
pub trait HandlerCatalog: Send + Sync {
    /// Enumerates every handler this catalog provides.
    ///
    /// # Errors
    ///
    /// [`RegistryError::Catalog`] when the catalog cannot be read at all.
    /// Failures of individual entries are reported inside the returned list.
    fn discover(&self) -> Result<Vec<CatalogEntry>, RegistryError>;
}

/// The handlers compiled into the server.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinCatalog;

impl HandlerCatalog for BuiltinCatalog {
    fn discover(&self) -> Result<Vec<CatalogEntry>, RegistryError> {
        Ok(builtin_handlers().into_iter().map(Ok).collect())
    }
}

type HandlerMap = HashMap<String, Arc<dyn ActionHandler>>;

/// Process-wide name → handler mapping with atomic reload.
pub struct ActionRegistry {
    catalog: Box<dyn HandlerCatalog>,
    handlers: RwLock<Arc<HandlerMap>>,
}

impl ActionRegistry {
    /// Builds the registry from `catalog`.
    ///
    /// # Errors
    ///
    /// [`RegistryError::Catalog`] when the initial discovery fails.
    pub fn load(catalog: impl HandlerCatalog + 'static) -> Result<Self, RegistryError> {
        let handlers = build(&catalog)?;
        info!(count = handlers.len(), "action registry loaded");
        Ok(Self {
            catalog: Box::new(catalog),
            handlers: RwLock::new(Arc::new(handlers)),
        })
    }

    /// Looks up the handler registered under `name`.
    pub fn lookup(&self, name: &str) -> Option<Arc<dyn ActionHandler>> {
        self.snapshot().get(name).cloned()
    }

    /// Rebuilds the mapping from the catalog and swaps it in.
    ///
    /// Returns the number of registered actions, `reload` excluded.
    ///
    /// # Errors
    ///
    /// [`RegistryError::Catalog`] when discovery fails; the previous mapping
    /// is kept.
    pub fn reload(&self) -> Result<usize, RegistryError> {
        let fresh = Arc::new(build(self.catalog.as_ref())?);
        let count = fresh.len();
        *self.handlers.write().unwrap_or_else(PoisonError::into_inner) = fresh;
        info!(count, "action registry reloaded");
        Ok(count)
    }

    /// Number of registered actions.
    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registered action names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.snapshot().keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// The mapping as of this call.  Later reloads do not affect it.
    pub fn snapshot(&self) -> Arc<HandlerMap> {
        Arc::clone(&self.handlers.read().unwrap_or_else(PoisonError::into_inner))
    }
}

fn build(catalog: &dyn HandlerCatalog) -> Result<HandlerMap, RegistryError> {
    let mut map = HandlerMap::new();
    for entry in catalog.discover()? {
        let handler = match entry {
            Ok(handler) => handler,
            Err(e) => {
                warn!("skipping handler: {e}");
                continue;
            }
        };
        let name = handler.name();
        if name == RELOAD_ACTION {
            warn!("skipping handler: '{RELOAD_ACTION}' is reserved");
            continue;
        }
        if map.insert(name.to_string(), handler).is_some() {
            warn!(action = name, "duplicate handler name, keeping the last one");
        }
        debug!(action = name, "registered handler");
    }
    Ok(map)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use deskctl_core::CommandMessage;
    use serde_json::{json, Value};

    use super::*;
    use crate::application::handlers::{HandlerContext, HandlerError};

    struct Named(&'static str, i64);

    impl ActionHandler for Named {
        fn name(&self) -> &'static str {
            self.0
        }

        fn handle(&self, _: &CommandMessage, _: &HandlerContext) -> Result<Value, HandlerError> {
            Ok(json!(self.1))
        }
    }

    fn entry(name: &'static str, value: i64) -> CatalogEntry {
        Ok(Arc::new(Named(name, value)))
    }

    /// A catalog whose content changes between discoveries.
    #[derive(Default)]
    struct Scripted {
        calls: AtomicUsize,
    }

    impl HandlerCatalog for Scripted {
        fn discover(&self) -> Result<Vec<CatalogEntry>, RegistryError> {
            match self.calls.fetch_add(1, Ordering::SeqCst) {
                0 => Ok(vec![entry("one", 1)]),
                1 => Ok(vec![
                    entry("one", 1),
                    entry("two", 2),
                ]),
                _ => Err(RegistryError::Catalog("catalog unavailable".into())),
            }
        }
    }

    #[test]
    fn test_builtin_catalog_registers_every_action() {
        let registry = ActionRegistry::load(BuiltinCatalog).unwrap();

        assert_eq!(registry.len(), 11);
        assert!(registry.lookup("click").is_some());
        assert!(registry.lookup("reload").is_none());
        assert!(registry.lookup("fly").is_none());
    }

    #[test]
    fn test_reload_swaps_in_new_mapping() {
        // Arrange
        let registry = ActionRegistry::load(Scripted::default()).unwrap();
        assert_eq!(registry.names(), vec!["one"]);

        // Act
        let count = registry.reload().unwrap();

        // Assert
        assert_eq!(count, 2);
        assert_eq!(registry.names(), vec!["one", "two"]);
    }

    #[test]
    fn test_failed_reload_keeps_previous_mapping() {
        let registry = ActionRegistry::load(Scripted::default()).unwrap();
        registry.reload().unwrap();

        let err = registry.reload().unwrap_err();

        assert!(matches!(err, RegistryError::Catalog(_)));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_snapshot_is_unaffected_by_reload() {
        let registry = ActionRegistry::load(Scripted::default()).unwrap();
        let before = registry.snapshot();

        registry.reload().unwrap();

        assert_eq!(before.len(), 1);
        assert_eq!(registry.snapshot().len(), 2);
    }

    struct Messy;

    impl HandlerCatalog for Messy {
        fn discover(&self) -> Result<Vec<CatalogEntry>, RegistryError> {
            Ok(vec![
                entry("dup", 1),
                Err(RegistryError::Registration {
                    name: "broken".into(),
                    reason: "failed to initialise".into(),
                }),
                entry("reload", 0),
                entry("dup", 2),
            ])
        }
    }

    #[test]
    fn test_bad_entries_are_skipped_and_last_duplicate_wins() {
        let registry = ActionRegistry::load(Messy).unwrap();

        assert_eq!(registry.names(), vec!["dup"]);

        let (_driver, ctx) = crate::application::handlers::tests::context();
        let cmd = CommandMessage::from_value(json!({})).unwrap();
        let result = registry.lookup("dup").unwrap().handle(&cmd, &ctx).unwrap();
        assert_eq!(result, json!(2));
    }

    #[test]
    fn test_lookups_during_concurrent_reloads_always_see_a_full_map() {
        // Each reload yields the complete builtin set, so every lookup of a
        // builtin action must succeed no matter how it interleaves.
        let registry = Arc::new(ActionRegistry::load(BuiltinCatalog).unwrap());

        let writer = {
            let registry = Arc::clone(&registry);
            std::thread::spawn(move || {
                for _ in 0..200 {
                    registry.reload().unwrap();
                }
            })
        };
        for _ in 0..2_000 {
            assert!(registry.lookup("move").is_some());
            assert_eq!(registry.len(), 11);
        }
        writer.join().unwrap();
    }
}
