//! Locators: immutable (strategy, selector) pairs.
//!
//! `data-testid` attributes are the primary contract with the application; class,
//! tag and name strategies are kept for older screens. Every strategy renders to a
//! CSS selector so all backends share one query path.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Attribute carrying the test contract
pub const TEST_ID_ATTRIBUTE: &str = "data-testid";

/// How a locator selects elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    /// `[data-testid='value']`
    TestId,
    /// `[data-testid^='value']`
    TestIdPrefix,
    /// Raw CSS selector
    Css,
    /// Element id
    Id,
    /// Single class name
    ClassName,
    /// Tag name
    TagName,
    /// `name` attribute
    Name,
}

impl Strategy {
    /// Short label used in messages
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::TestId => "testid",
            Self::TestIdPrefix => "testid^",
            Self::Css => "css",
            Self::Id => "id",
            Self::ClassName => "class",
            Self::TagName => "tag",
            Self::Name => "name",
        }
    }
}

/// A (strategy, selector) pair identifying zero or more DOM nodes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator {
    strategy: Strategy,
    value: Cow<'static, str>,
}

impl Locator {
    /// Test-id locator, usable in `const` items
    #[must_use]
    pub const fn test_id(id: &'static str) -> Self {
        Self::from_static(Strategy::TestId, id)
    }

    /// Elements whose test id starts with `prefix`
    #[must_use]
    pub const fn test_id_prefix(prefix: &'static str) -> Self {
        Self::from_static(Strategy::TestIdPrefix, prefix)
    }

    /// Raw CSS locator
    #[must_use]
    pub const fn css(selector: &'static str) -> Self {
        Self::from_static(Strategy::Css, selector)
    }

    /// Element-id locator
    #[must_use]
    pub const fn id(id: &'static str) -> Self {
        Self::from_static(Strategy::Id, id)
    }

    /// Class-name locator
    #[must_use]
    pub const fn class_name(class: &'static str) -> Self {
        Self::from_static(Strategy::ClassName, class)
    }

    /// Tag-name locator
    #[must_use]
    pub const fn tag(tag: &'static str) -> Self {
        Self::from_static(Strategy::TagName, tag)
    }

    /// `name` attribute locator
    #[must_use]
    pub const fn name(name: &'static str) -> Self {
        Self::from_static(Strategy::Name, name)
    }

    const fn from_static(strategy: Strategy, value: &'static str) -> Self {
        Self {
            strategy,
            value: Cow::Borrowed(value),
        }
    }

    /// Locator with an owned selector
    #[must_use]
    pub fn owned(strategy: Strategy, value: impl Into<String>) -> Self {
        Self {
            strategy,
            value: Cow::Owned(value.into()),
        }
    }

    /// Selection strategy
    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Raw selector value
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Render as a CSS selector
    #[must_use]
    pub fn to_css(&self) -> String {
        match self.strategy {
            Strategy::TestId => attribute_selector(TEST_ID_ATTRIBUTE, "=", &self.value),
            Strategy::TestIdPrefix => attribute_selector(TEST_ID_ATTRIBUTE, "^=", &self.value),
            Strategy::Css => self.value.to_string(),
            Strategy::Id => attribute_selector("id", "=", &self.value),
            Strategy::ClassName => format!(".{}", self.value),
            Strategy::TagName => self.value.to_string(),
            Strategy::Name => attribute_selector("name", "=", &self.value),
        }
    }

    /// Scope this locator to descendants of `parent`
    #[must_use]
    pub fn within(&self, parent: &Self) -> Self {
        Self::owned(
            Strategy::Css,
            format!("{} {}", parent.to_css(), self.to_css()),
        )
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.strategy.label(), self.value)
    }
}

/// A test-id pattern with one `{}` placeholder, filled per index or key.
///
/// Indices are 0-based and follow render order; an index past the last rendered
/// item yields a locator that matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocatorTemplate {
    pattern: &'static str,
}

impl LocatorTemplate {
    /// Template over `data-testid`
    #[must_use]
    pub const fn test_id(pattern: &'static str) -> Self {
        Self { pattern }
    }

    /// Locator for the item at `index`
    #[must_use]
    pub fn at(&self, index: usize) -> Locator {
        self.with(&index.to_string())
    }

    /// Locator for a string key such as a tag or method name
    #[must_use]
    pub fn with(&self, key: &str) -> Locator {
        Locator::owned(Strategy::TestId, self.pattern.replacen("{}", key, 1))
    }

    /// Prefix locator matching every filled instance
    #[must_use]
    pub fn any(&self) -> Locator {
        let prefix = self.pattern.split("{}").next().unwrap_or(self.pattern);
        Locator::owned(Strategy::TestIdPrefix, prefix)
    }

    /// The raw pattern
    #[must_use]
    pub const fn pattern(&self) -> &'static str {
        self.pattern
    }
}

fn attribute_selector(attr: &str, op: &str, value: &str) -> String {
    format!("[{attr}{op}'{}']", escape_css_string(value))
}

/// Escape a value for use inside a single-quoted CSS string
#[must_use]
pub fn escape_css_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if ch == '\'' || ch == '\\' {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Rectangle of a rendered element
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    /// X position
    pub x: f64,
    /// Y position
    pub y: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl BoundingBox {
    /// Create a new bounding box
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// True when the box has a visible area
    #[must_use]
    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod render_tests {
        use super::*;

        #[test]
        fn test_test_id_renders_attribute_selector() {
            assert_eq!(
                Locator::test_id("hero-section").to_css(),
                "[data-testid='hero-section']"
            );
        }

        #[test]
        fn test_prefix_renders_starts_with() {
            assert_eq!(
                Locator::test_id_prefix("blog-post-card-").to_css(),
                "[data-testid^='blog-post-card-']"
            );
        }

        #[test]
        fn test_secondary_strategies() {
            assert_eq!(Locator::id("systems").to_css(), "[id='systems']");
            assert_eq!(Locator::class_name("orbit-node").to_css(), ".orbit-node");
            assert_eq!(Locator::tag("h1").to_css(), "h1");
            assert_eq!(Locator::name("email").to_css(), "[name='email']");
            assert_eq!(
                Locator::css("p[class*='muted']").to_css(),
                "p[class*='muted']"
            );
        }

        #[test]
        fn test_quotes_are_escaped() {
            let loc = Locator::owned(Strategy::TestId, "search-suggestion-rust's book");
            assert_eq!(
                loc.to_css(),
                "[data-testid='search-suggestion-rust\\'s book']"
            );
        }

        #[test]
        fn test_display_names_strategy() {
            assert_eq!(Locator::test_id("hero-title").to_string(), "testid=hero-title");
            assert_eq!(Locator::tag("main").to_string(), "tag=main");
        }

        #[test]
        fn test_within_scopes_to_parent() {
            let badge = Locator::css("[class*='badge']");
            let card = Locator::test_id("project-card-0");
            assert_eq!(
                badge.within(&card).to_css(),
                "[data-testid='project-card-0'] [class*='badge']"
            );
        }
    }

    mod template_tests {
        use super::*;

        const CARD: LocatorTemplate = LocatorTemplate::test_id("blog-post-card-{}");

        #[test]
        fn test_at_fills_index() {
            assert_eq!(CARD.at(0), Locator::owned(Strategy::TestId, "blog-post-card-0"));
            assert_eq!(CARD.at(12).value(), "blog-post-card-12");
        }

        #[test]
        fn test_with_fills_key() {
            let method = LocatorTemplate::test_id("contact-method-{}");
            assert_eq!(method.with("github").value(), "contact-method-github");
        }

        #[test]
        fn test_any_matches_every_instance() {
            assert_eq!(CARD.any().to_css(), "[data-testid^='blog-post-card-']");
        }

        #[test]
        fn test_constant_locators_are_const() {
            const HERO: Locator = Locator::test_id("hero-section");
            assert_eq!(HERO.strategy(), Strategy::TestId);
        }
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_distinct_indices_give_distinct_locators(a in 0usize..10_000, b in 0usize..10_000) {
                let template = LocatorTemplate::test_id("project-card-{}");
                prop_assert_eq!(template.at(a) == template.at(b), a == b);
            }

            #[test]
            fn prop_escaped_value_has_no_bare_quote(value in ".*") {
                let escaped = escape_css_string(&value);
                let mut prev_backslash = false;
                for ch in escaped.chars() {
                    if ch == '\'' {
                        prop_assert!(prev_backslash);
                    }
                    prev_backslash = ch == '\\' && !prev_backslash;
                }
            }
        }
    }
}
