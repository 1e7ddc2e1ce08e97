//! Style registry: class-name assignment and the cached stylesheet.
//!
//! # Responsibilities
//! - Assign each discovered declaration its class name (`<prefix>-<index>`
//!   in discovery order, unless it names itself)
//! - Compile all declarations into one stylesheet and hash it
//! - Publish the hash-addressed stylesheet URL
//!
//! # Design Decisions
//! - Discovery happens once at startup; the entry list is immutable afterwards
//! - Cached mode: compiled at most once, on first use, behind a `OnceCell`
//! - Live-reload mode: declarations and names re-evaluated on every access,
//!   hash fixed to `dev`, nothing cached

use std::any::TypeId;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::config::CssConfig;
use crate::container::StyleEntry;
use crate::css::compiler::{compile, Stylesheet};
use crate::css::declaration::{StyleDeclaration, StyleSource};
use crate::observability::metrics;

struct Discovered {
    type_id: TypeId,
    source: Arc<dyn StyleSource>,
    generated: String,
    class_name: String,
    declaration: StyleDeclaration,
}

pub struct StyleRegistry {
    entries: Vec<Discovered>,
    url_template: String,
    live: bool,
    cache: OnceCell<Arc<Stylesheet>>,
}

impl fmt::Debug for StyleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyleRegistry")
            .field(
                "classes",
                &self.entries.iter().map(|e| &e.class_name).collect::<Vec<_>>(),
            )
            .field("url_template", &self.url_template)
            .field("live", &self.live)
            .field("compiled", &self.cache.get().is_some())
            .finish()
    }
}

impl StyleRegistry {
    /// Discover declarations in registration order.
    pub fn discover(styles: &[StyleEntry], config: &CssConfig) -> Self {
        let entries: Vec<Discovered> = styles
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let generated = format!("{}-{}", config.class_prefix, index);
                let class_name = entry.source.class_name().unwrap_or_else(|| generated.clone());
                tracing::debug!(style = entry.type_name, class = %class_name, "Style discovered");
                Discovered {
                    type_id: entry.type_id,
                    source: entry.source.clone(),
                    generated,
                    class_name,
                    declaration: entry.source.declare(),
                }
            })
            .collect();

        tracing::info!(
            styles = entries.len(),
            live_reload = config.live_reload,
            "Style registry ready"
        );

        Self {
            entries,
            url_template: config.url_template.clone(),
            live: config.live_reload,
            cache: OnceCell::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    pub fn url_template(&self) -> &str {
        &self.url_template
    }

    /// Class name of the first declaration registered as `S`.
    pub fn class_name<S: StyleSource>(&self) -> Option<Cow<'_, str>> {
        let type_id = TypeId::of::<S>();
        self.entries
            .iter()
            .find(|e| e.type_id == type_id)
            .map(|e| self.current_name(e))
    }

    /// Class name of the declaration at a discovery index.
    pub fn class_name_at(&self, index: usize) -> Option<Cow<'_, str>> {
        self.entries.get(index).map(|e| self.current_name(e))
    }

    fn current_name<'a>(&self, entry: &'a Discovered) -> Cow<'a, str> {
        if self.live {
            match entry.source.class_name() {
                Some(name) => Cow::Owned(name),
                None => Cow::Borrowed(&entry.generated),
            }
        } else {
            Cow::Borrowed(&entry.class_name)
        }
    }

    /// The compiled stylesheet.
    pub fn stylesheet(&self) -> Arc<Stylesheet> {
        if self.live {
            let declared: Vec<(Cow<'_, str>, StyleDeclaration)> = self
                .entries
                .iter()
                .map(|e| (self.current_name(e), e.source.declare()))
                .collect();
            let text = compile(declared.iter().map(|(name, decl)| (&**name, decl)));
            metrics::record_stylesheet_compile(true);
            tracing::debug!(bytes = text.len(), "Stylesheet rebuilt");
            return Arc::new(Stylesheet::live(text));
        }

        self.cache
            .get_or_init(|| {
                let text = compile(
                    self.entries
                        .iter()
                        .map(|e| (e.class_name.as_str(), &e.declaration)),
                );
                let sheet = Stylesheet::hashed(text);
                metrics::record_stylesheet_compile(false);
                tracing::debug!(bytes = sheet.text.len(), hash = %sheet.hash, "Stylesheet compiled");
                Arc::new(sheet)
            })
            .clone()
    }

    /// URL of the current stylesheet.
    pub fn stylesheet_url(&self) -> String {
        self.url_template.replace("{hash}", &self.stylesheet().hash)
    }
}
