//! Stylesheet compilation.
//!
//! # Output
//! ```text
//! .<class><suffix> {<rule>}\n        per non-empty slot, then per extra suffix rule
//! ...                                 for every declaration in discovery order
//! @media(<query>) {\n                 per distinct query, first-encounter order
//! .<class><suffix> {<rule>}\n        for every declaration block under that query
//! }\n
//! ```
//!
//! # Design Decisions
//! - Deterministic: same declarations always produce byte-identical text
//! - Newlines inside rules are collapsed to spaces, never rejected

use sha2::{Digest, Sha256};

use crate::css::declaration::StyleDeclaration;

/// Hash reported in live-reload mode.
pub const DEV_HASH: &str = "dev";

/// Compiled stylesheet text and its content hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stylesheet {
    pub text: String,
    pub hash: String,
}

impl Stylesheet {
    /// Hash the text with SHA-256.
    pub fn hashed(text: String) -> Self {
        let hash = content_hash(&text);
        Self { text, hash }
    }

    pub fn live(text: String) -> Self {
        Self {
            text,
            hash: DEV_HASH.to_string(),
        }
    }

    pub fn is_live(&self) -> bool {
        self.hash == DEV_HASH
    }
}

/// Lowercase hex SHA-256 of the stylesheet text.
pub fn content_hash(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

/// Compile `(class name, declaration)` pairs in the given order.
pub fn compile<'a, I>(items: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a StyleDeclaration)>,
{
    let items: Vec<_> = items.into_iter().collect();
    let mut out = String::new();

    for (class, decl) in &items {
        emit_rules(&mut out, class, decl);
    }

    let mut queries: Vec<&str> = Vec::new();
    for (_, decl) in &items {
        for (query, _) in decl.media_blocks() {
            if !queries.contains(&query.as_str()) {
                queries.push(query.as_str());
            }
        }
    }

    for query in queries {
        out.push_str("@media(");
        out.push_str(query);
        out.push_str(") {\n");
        for (class, decl) in &items {
            for (_, block) in decl.media_blocks().iter().filter(|(q, _)| q == query) {
                emit_rules(&mut out, class, block);
            }
        }
        out.push_str("}\n");
    }

    out
}

fn emit_rules(out: &mut String, class: &str, decl: &StyleDeclaration) {
    let slots = decl.slots().map(|(pseudo, rule)| (pseudo.suffix(), rule));
    let extra = decl
        .extra_rules()
        .iter()
        .map(|(suffix, rule)| (suffix.as_str(), rule.as_str()));

    for (suffix, rule) in slots.chain(extra) {
        out.push('.');
        out.push_str(class);
        out.push_str(suffix);
        out.push_str(" {");
        out.extend(rule.chars().map(|c| if c == '\n' || c == '\r' { ' ' } else { c }));
        out.push_str("}\n");
    }
}
