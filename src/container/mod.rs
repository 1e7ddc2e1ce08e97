//! Startup container.
//!
//! Holds everything discovery scans: route handlers, named access predicates
//! and style declarations, each in registration order. Built by the
//! application before the registries; read-only afterwards.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use crate::css::StyleSource;
use crate::routing::HandlerDef;
use crate::security::AccessPredicate;

/// A registered style declaration and the type it was registered as.
#[derive(Clone)]
pub struct StyleEntry {
    pub type_id: TypeId,
    pub type_name: &'static str,
    pub source: Arc<dyn StyleSource>,
}

#[derive(Default)]
pub struct Container {
    handlers: Vec<HandlerDef>,
    predicates: HashMap<&'static str, Arc<dyn AccessPredicate>>,
    styles: Vec<StyleEntry>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_handler(mut self, handler: HandlerDef) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Register an access predicate under the name route schemas refer to.
    /// A later registration under the same name replaces the earlier one.
    pub fn with_predicate(
        mut self,
        name: &'static str,
        predicate: impl AccessPredicate + 'static,
    ) -> Self {
        self.predicates.insert(name, Arc::new(predicate));
        self
    }

    pub fn with_style<S: StyleSource>(mut self, source: S) -> Self {
        self.styles.push(StyleEntry {
            type_id: TypeId::of::<S>(),
            type_name: std::any::type_name::<S>(),
            source: Arc::new(source),
        });
        self
    }

    /// Every object tagged as a route handler.
    pub fn handlers(&self) -> &[HandlerDef] {
        &self.handlers
    }

    pub fn predicate(&self, name: &str) -> Option<Arc<dyn AccessPredicate>> {
        self.predicates.get(name).cloned()
    }

    pub fn styles(&self) -> &[StyleEntry] {
        &self.styles
    }
}
