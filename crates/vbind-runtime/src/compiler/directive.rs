#![forbid(unsafe_code)]

//! Directive attributes (`v-text`, `v-model`).

use std::fmt;

/// Reserved attribute-name prefix marking a directive.
pub const DIRECTIVE_PREFIX: &str = "v-";

/// The closed set of supported directives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Directive {
    /// One-way binding of an element's text content.
    Text,
    /// Two-way binding of a form control's value.
    Model,
}

impl Directive {
    /// Look up a directive by its name (the attribute name without `v-`).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "text" => Some(Self::Text),
            "model" => Some(Self::Model),
            _ => None,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Model => "model",
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{DIRECTIVE_PREFIX}{}", self.name())
    }
}

/// The directive name of an attribute, if the attribute is a directive.
#[must_use]
pub fn directive_name(attr_name: &str) -> Option<&str> {
    attr_name.strip_prefix(DIRECTIVE_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_prefix() {
        assert_eq!(directive_name("v-text"), Some("text"));
        assert_eq!(directive_name("v-"), Some(""));
        assert_eq!(directive_name("class"), None);
        assert_eq!(directive_name("V-text"), None);
        assert_eq!(directive_name("data-v-text"), None);
    }

    #[test]
    fn closed_table() {
        assert_eq!(Directive::from_name("text"), Some(Directive::Text));
        assert_eq!(Directive::from_name("model"), Some(Directive::Model));
        assert_eq!(Directive::from_name("html"), None);
        assert_eq!(Directive::from_name(""), None);
        assert_eq!(Directive::from_name("Text"), None);
    }

    #[test]
    fn display_includes_prefix() {
        assert_eq!(Directive::Model.to_string(), "v-model");
        assert_eq!(Directive::Text.name(), "text");
    }
}
