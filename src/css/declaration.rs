//! Typed style declarations.
//!
//! A declaration owns one optional rule per enumerated pseudo-state, free-form
//! selector-suffix rules in insertion order, and media-query blocks that nest
//! their own declaration.

const PSEUDO_COUNT: usize = 26;

macro_rules! pseudo_states {
    ($( $variant:ident => $suffix:literal, $setter:ident; )*) => {
        /// Enumerated pseudo-classes and pseudo-elements, in emission order.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Pseudo {
            $( $variant, )*
        }

        impl Pseudo {
            pub const ALL: [Pseudo; PSEUDO_COUNT] = [$( Pseudo::$variant, )*];

            /// Selector suffix appended to the class name.
            pub const fn suffix(self) -> &'static str {
                match self {
                    $( Pseudo::$variant => $suffix, )*
                }
            }
        }

        impl StyleDeclaration {
            $(
                pub fn $setter(self, rule: impl Into<String>) -> Self {
                    self.pseudo(Pseudo::$variant, rule)
                }
            )*
        }
    };
}

pseudo_states! {
    Base => "", style;
    Hover => ":hover", hover;
    Active => ":active", active;
    Focus => ":focus", focus;
    Visited => ":visited", visited;
    FirstChild => ":first-child", first_child;
    LastChild => ":last-child", last_child;
    Checked => ":checked", checked;
    Disabled => ":disabled", disabled;
    Enabled => ":enabled", enabled;
    Required => ":required", required;
    Optional => ":optional", optional;
    Empty => ":empty", empty;
    FirstOfType => ":first-of-type", first_of_type;
    LastOfType => ":last-of-type", last_of_type;
    OnlyChild => ":only-child", only_child;
    OnlyOfType => ":only-of-type", only_of_type;
    Target => ":target", target;
    Before => "::before", before;
    After => "::after", after;
    FirstLine => "::first-line", first_line;
    FirstLetter => "::first-letter", first_letter;
    Selection => "::selection", selection;
    Placeholder => "::placeholder", placeholder;
    Marker => "::marker", marker;
    FileSelectorButton => "::file-selector-button", file_selector_button;
}

/// CSS rules for one generated class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleDeclaration {
    slots: [Option<String>; PSEUDO_COUNT],
    extra: Vec<(String, String)>,
    media: Vec<(String, StyleDeclaration)>,
}

impl StyleDeclaration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the rule of one pseudo-state slot, replacing any earlier rule.
    pub fn pseudo(mut self, pseudo: Pseudo, rule: impl Into<String>) -> Self {
        self.slots[pseudo as usize] = Some(rule.into());
        self
    }

    /// Set the rule for an arbitrary selector suffix (`">a"`, `" .icon"`, ...).
    /// A suffix set twice keeps its first position and the last rule.
    pub fn rule(mut self, suffix: impl Into<String>, rule: impl Into<String>) -> Self {
        upsert(&mut self.extra, suffix.into(), rule.into());
        self
    }

    /// Set the block applied under `@media(<query>)`, replacing an earlier
    /// block for the same query in place.
    pub fn media(mut self, query: impl Into<String>, block: StyleDeclaration) -> Self {
        upsert(&mut self.media, query.into(), block);
        self
    }

    pub fn get(&self, pseudo: Pseudo) -> Option<&str> {
        self.slots[pseudo as usize].as_deref()
    }

    /// Non-empty pseudo-state rules in emission order.
    pub fn slots(&self) -> impl Iterator<Item = (Pseudo, &str)> + '_ {
        Pseudo::ALL
            .iter()
            .filter_map(|&p| self.get(p).filter(|rule| !rule.is_empty()).map(|rule| (p, rule)))
    }

    pub fn extra_rules(&self) -> &[(String, String)] {
        &self.extra
    }

    pub fn media_blocks(&self) -> &[(String, StyleDeclaration)] {
        &self.media
    }
}

fn upsert<V>(entries: &mut Vec<(String, V)>, key: String, value: V) {
    match entries.iter_mut().find(|(k, _)| *k == key) {
        Some(entry) => entry.1 = value,
        None => entries.push((key, value)),
    }
}

/// Something that declares styles for one class.
///
/// `declare` and `class_name` are called once at discovery, or on every
/// stylesheet build in live-reload mode.
pub trait StyleSource: Send + Sync + 'static {
    /// Explicit class name instead of a generated one.
    fn class_name(&self) -> Option<String> {
        None
    }

    fn declare(&self) -> StyleDeclaration;
}

impl StyleSource for StyleDeclaration {
    fn declare(&self) -> StyleDeclaration {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pseudo_order() {
        assert_eq!(Pseudo::ALL.len(), 26);
        assert_eq!(Pseudo::ALL[0], Pseudo::Base);
        assert_eq!(Pseudo::ALL[1].suffix(), ":hover");
        assert_eq!(Pseudo::ALL[17].suffix(), ":target");
        assert_eq!(Pseudo::ALL[18].suffix(), "::before");
        assert_eq!(Pseudo::ALL[25].suffix(), "::file-selector-button");
    }

    #[test]
    fn test_slots_skip_empty_rules() {
        let decl = StyleDeclaration::new()
            .after("content: '';")
            .hover("")
            .style("color: red;");

        let slots: Vec<_> = decl.slots().collect();
        assert_eq!(slots, vec![(Pseudo::Base, "color: red;"), (Pseudo::After, "content: '';")]);
    }
}
