//! Declarative description of a fake application.
//!
//! A [`MockSite`] maps URL paths to [`MockPage`]s, each a tree of [`MockElement`]s.
//! Elements carry the behavior the waits care about: delayed insertion, delayed
//! reveal, opacity fade-in, viewport-dependent visibility, broken images and
//! click or submit actions.

use crate::console::ConsoleEntry;
use crate::locator::TEST_ID_ATTRIBUTE;
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

/// Effect of clicking an element or submitting a form
#[derive(Debug, Clone, PartialEq)]
pub enum ClickAction {
    /// Load another path (may carry a query or fragment)
    Navigate(String),
    /// Make every element matching the selector visible
    Show(String),
    /// Hide every element matching the selector
    Hide(String),
    /// Flip visibility of every element matching the selector
    Toggle(String),
    /// Append a console entry
    Log(ConsoleEntry),
}

/// One node of a mock page
#[derive(Debug, Clone, PartialEq)]
pub struct MockElement {
    pub(crate) tag: String,
    pub(crate) attributes: BTreeMap<String, String>,
    pub(crate) text: String,
    pub(crate) value: Option<String>,
    pub(crate) visible: bool,
    pub(crate) enabled: bool,
    pub(crate) selected: bool,
    pub(crate) focusable: bool,
    pub(crate) image_loaded: bool,
    pub(crate) appear_after: Duration,
    pub(crate) reveal_after: Duration,
    pub(crate) fade_in: Duration,
    pub(crate) widths: Option<(u32, u32)>,
    pub(crate) on_click: Vec<ClickAction>,
    pub(crate) on_submit: Vec<ClickAction>,
    pub(crate) children: Vec<MockElement>,
}

impl MockElement {
    /// Visible, enabled element with no attributes
    #[must_use]
    pub fn new(tag: &str) -> Self {
        let tag = tag.to_ascii_lowercase();
        let focusable = matches!(
            tag.as_str(),
            "a" | "button" | "input" | "textarea" | "select"
        );
        let value = matches!(tag.as_str(), "input" | "textarea" | "select").then(String::new);
        Self {
            tag,
            attributes: BTreeMap::new(),
            text: String::new(),
            value,
            visible: true,
            enabled: true,
            selected: false,
            focusable,
            image_loaded: true,
            appear_after: Duration::ZERO,
            reveal_after: Duration::ZERO,
            fade_in: Duration::ZERO,
            widths: None,
            on_click: Vec::new(),
            on_submit: Vec::new(),
            children: Vec::new(),
        }
    }

    /// `<tag data-testid="id">`
    #[must_use]
    pub fn with_test_id(tag: &str, id: &str) -> Self {
        Self::new(tag).test_id(id)
    }

    /// Set `data-testid`
    #[must_use]
    pub fn test_id(self, id: &str) -> Self {
        self.attr(TEST_ID_ATTRIBUTE, id)
    }

    /// Set `id`
    #[must_use]
    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    /// Add a class
    #[must_use]
    pub fn class(mut self, class: &str) -> Self {
        let classes = self.attributes.entry("class".to_string()).or_default();
        if !classes.is_empty() {
            classes.push(' ');
        }
        classes.push_str(class);
        self
    }

    /// Set an attribute
    #[must_use]
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    /// Set the `name` attribute
    #[must_use]
    pub fn name(self, name: &str) -> Self {
        self.attr("name", name)
    }

    /// Set text content
    #[must_use]
    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    /// Set the control value
    #[must_use]
    pub fn value(mut self, value: &str) -> Self {
        self.value = Some(value.to_string());
        self
    }

    /// Link target; clicking navigates
    #[must_use]
    pub fn href(mut self, path: &str) -> Self {
        self.on_click.push(ClickAction::Navigate(path.to_string()));
        self.attr("href", path)
    }

    /// Rendered hidden (`display: none`)
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Disabled control
    #[must_use]
    pub const fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Checked / selected
    #[must_use]
    pub const fn selected(mut self) -> Self {
        self.selected = true;
        self
    }

    /// Reachable with Tab
    #[must_use]
    pub const fn focusable(mut self) -> Self {
        self.focusable = true;
        self
    }

    /// Image whose load failed
    #[must_use]
    pub const fn broken_image(mut self) -> Self {
        self.image_loaded = false;
        self
    }

    /// Inserted into the DOM `delay` after page load
    #[must_use]
    pub const fn appear_after(mut self, delay: Duration) -> Self {
        self.appear_after = delay;
        self
    }

    /// In the DOM from the start but hidden until `delay` after load
    #[must_use]
    pub const fn reveal_after(mut self, delay: Duration) -> Self {
        self.reveal_after = delay;
        self
    }

    /// Opacity rises linearly from 0 to 1 over `duration`
    #[must_use]
    pub const fn fade_in(mut self, duration: Duration) -> Self {
        self.fade_in = duration;
        self
    }

    /// Visible only when the viewport width is within `min..=max`
    #[must_use]
    pub const fn visible_between(mut self, min: u32, max: u32) -> Self {
        self.widths = Some((min, max));
        self
    }

    /// Click effect
    #[must_use]
    pub fn on_click(mut self, action: ClickAction) -> Self {
        self.on_click.push(action);
        self
    }

    /// Submit effect (forms)
    #[must_use]
    pub fn on_submit(mut self, action: ClickAction) -> Self {
        self.on_submit.push(action);
        self
    }

    /// Append a child
    #[must_use]
    pub fn child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Append children
    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = Self>) -> Self {
        self.children.extend(children);
        self
    }
}

/// One routed document
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MockPage {
    pub(crate) title: String,
    pub(crate) ready_after: Duration,
    pub(crate) body: Vec<MockElement>,
    pub(crate) console: Vec<ConsoleEntry>,
}

impl MockPage {
    /// Empty page with a title
    #[must_use]
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Self::default()
        }
    }

    /// `document.readyState` stays `interactive` until `delay` after load
    #[must_use]
    pub const fn ready_after(mut self, delay: Duration) -> Self {
        self.ready_after = delay;
        self
    }

    /// Add a top-level element
    #[must_use]
    pub fn element(mut self, element: MockElement) -> Self {
        self.body.push(element);
        self
    }

    /// Add top-level elements
    #[must_use]
    pub fn elements(mut self, elements: impl IntoIterator<Item = MockElement>) -> Self {
        self.body.extend(elements);
        self
    }

    /// Console entry emitted on load
    #[must_use]
    pub fn console(mut self, entry: ConsoleEntry) -> Self {
        self.console.push(entry);
        self
    }
}

/// A fake application: routes plus a fallback
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MockSite {
    pub(crate) routes: BTreeMap<String, MockPage>,
    pub(crate) not_found: MockPage,
    pub(crate) scripts: Vec<(String, serde_json::Value)>,
    pub(crate) failing: BTreeSet<String>,
}

impl MockSite {
    /// Site with no routes; unknown paths render an empty page
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `page` at `path`. A path ending in `/*` serves every sub-path.
    #[must_use]
    pub fn route(mut self, path: &str, page: MockPage) -> Self {
        self.routes.insert(path.to_string(), page);
        self
    }

    /// Page served for unknown paths
    #[must_use]
    pub fn not_found(mut self, page: MockPage) -> Self {
        self.not_found = page;
        self
    }

    /// `execute_script` returns `value` for scripts containing `needle`
    #[must_use]
    pub fn script(mut self, needle: &str, value: serde_json::Value) -> Self {
        self.scripts.push((needle.to_string(), value));
        self
    }

    /// Make a driver command fail with a driver error
    #[must_use]
    pub fn failing(mut self, command: &str) -> Self {
        self.failing.insert(command.to_string());
        self
    }

    /// Page for a path (query and fragment ignored)
    #[must_use]
    pub fn resolve(&self, path: &str) -> &MockPage {
        let path = path
            .split(['?', '#'])
            .next()
            .filter(|p| !p.is_empty())
            .unwrap_or("/");
        let trimmed = if path.len() > 1 {
            path.trim_end_matches('/')
        } else {
            path
        };
        if let Some(page) = self.routes.get(trimmed) {
            return page;
        }
        self.routes
            .iter()
            .filter_map(|(route, page)| {
                route
                    .strip_suffix("/*")
                    .filter(|prefix| trimmed.starts_with(&format!("{prefix}/")))
                    .map(|prefix| (prefix.len(), page))
            })
            .max_by_key(|(len, _)| *len)
            .map_or(&self.not_found, |(_, page)| page)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod element_tests {
        use super::*;

        #[test]
        fn test_controls_start_with_empty_value() {
            assert_eq!(MockElement::new("input").value, Some(String::new()));
            assert_eq!(MockElement::new("div").value, None);
            assert!(MockElement::new("button").focusable);
            assert!(!MockElement::new("span").focusable);
        }

        #[test]
        fn test_classes_accumulate() {
            let el = MockElement::new("div").class("card").class("featured");
            assert_eq!(el.attributes["class"], "card featured");
        }

        #[test]
        fn test_href_navigates_on_click() {
            let el = MockElement::new("a").href("/blog");
            assert_eq!(el.on_click, vec![ClickAction::Navigate("/blog".to_string())]);
            assert_eq!(el.attributes["href"], "/blog");
        }
    }

    mod route_tests {
        use super::*;

        fn site() -> MockSite {
            MockSite::new()
                .route("/", MockPage::new("Home"))
                .route("/blog", MockPage::new("Blog"))
                .route("/blog/*", MockPage::new("Post"))
                .not_found(MockPage::new("404"))
        }

        #[test]
        fn test_exact_routes() {
            let site = site();
            assert_eq!(site.resolve("/").title, "Home");
            assert_eq!(site.resolve("").title, "Home");
            assert_eq!(site.resolve("/blog/").title, "Blog");
            assert_eq!(site.resolve("/blog?tag=rust").title, "Blog");
            assert_eq!(site.resolve("/#systems").title, "Home");
        }

        #[test]
        fn test_wildcard_routes() {
            assert_eq!(site().resolve("/blog/hello-world").title, "Post");
        }

        #[test]
        fn test_unknown_path_is_not_found() {
            assert_eq!(site().resolve("/nope").title, "404");
            assert_eq!(site().resolve("/blogger").title, "404");
        }
    }
}
