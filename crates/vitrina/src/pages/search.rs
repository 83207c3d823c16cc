//! Site search (`/search`).

use super::texts;
use crate::fixture::BrowserSession;
use crate::locator::{Locator, LocatorTemplate};
use crate::page::{BasePage, PageObject};
use crate::result::{ErrorCategory, VitrinaResult};
use async_trait::async_trait;
use regex::Regex;
use std::sync::OnceLock;

/// `Found 3 results`
fn results_count_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"Found\s+(\d+)").ok())
        .as_ref()
}

/// Parse the count out of the results banner
#[must_use]
pub fn parse_results_count(text: &str) -> Option<usize> {
    results_count_pattern()?
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// What the page shows after a query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchState {
    /// Results reported or rendered
    pub results: usize,
    /// The explicit no-results indicator is visible
    pub no_results: bool,
    /// The error indicator is visible
    pub error: bool,
}

impl SearchState {
    /// At least one of results, no-results or error is showing
    #[must_use]
    pub const fn responded(&self) -> bool {
        self.results > 0 || self.no_results || self.error
    }

    /// How many of the three indicators are showing
    #[must_use]
    pub fn indicators(&self) -> usize {
        [self.results > 0, self.no_results, self.error]
            .into_iter()
            .filter(|shown| *shown)
            .count()
    }
}

/// Page object for the search page
#[derive(Debug, Clone, Copy)]
pub struct SearchPage<'s> {
    base: BasePage<'s>,
}

impl<'s> SearchPage<'s> {
    pub const PATH: &'static str = "/search";

    pub const TITLE: Locator = Locator::test_id("search-title");
    pub const INPUT: Locator = Locator::test_id("search-input");
    pub const BUTTON: Locator = Locator::test_id("search-button");
    pub const SUGGESTIONS: Locator = Locator::test_id("search-suggestions");
    pub const ACTIVE_FILTERS: Locator = Locator::test_id("search-active-filters");
    pub const ERROR: Locator = Locator::test_id("search-error");
    pub const NO_RESULTS: Locator = Locator::test_id("search-no-results");
    pub const RESULTS_COUNT: Locator = Locator::test_id("search-results-count");
    pub const RESULTS: Locator = Locator::test_id_prefix("search-result-");

    pub const SUGGESTION: LocatorTemplate = LocatorTemplate::test_id("search-suggestion-{}");
    pub const TYPE_FILTER: LocatorTemplate = LocatorTemplate::test_id("search-filter-type-{}");
    pub const TAG_FILTER: LocatorTemplate = LocatorTemplate::test_id("search-filter-tag-{}");

    #[must_use]
    pub fn new(session: &'s BrowserSession) -> Self {
        Self {
            base: BasePage::new(session),
        }
    }

    pub async fn enter_query(&self, text: &str) -> VitrinaResult<()> {
        self.base.fill_text(&Self::INPUT, text).await
    }

    pub async fn query_value(&self) -> VitrinaResult<String> {
        self.base.value_of(&Self::INPUT).await
    }

    /// Click the search button; press Enter in the input when the button never
    /// becomes clickable
    pub async fn submit_search(&self) -> VitrinaResult<()> {
        match self.base.click(&Self::BUTTON).await {
            Err(e) if e.category() == ErrorCategory::Lookup => {
                self.base.press_enter_on(&Self::INPUT).await
            }
            other => other,
        }
    }

    /// Labels of suggestion buttons
    pub async fn suggestions(&self) -> VitrinaResult<Vec<String>> {
        let buttons = Locator::tag("button").within(&Self::SUGGESTIONS);
        Ok(texts(&self.base.optional_elements(&buttons).await?))
    }

    pub async fn click_suggestion(&self, suggestion: &str) -> VitrinaResult<()> {
        self.base.click(&Self::SUGGESTION.with(suggestion)).await
    }

    pub async fn has_error(&self) -> VitrinaResult<bool> {
        self.base.is_displayed(&Self::ERROR).await
    }

    pub async fn has_no_results(&self) -> VitrinaResult<bool> {
        self.base.is_displayed(&Self::NO_RESULTS).await
    }

    /// Count from the `Found N` banner, else the number of rendered results
    pub async fn results_count(&self) -> VitrinaResult<usize> {
        if let Some(banner) = self.base.optional_text(&Self::RESULTS_COUNT).await? {
            if let Some(count) = parse_results_count(&banner) {
                return Ok(count);
            }
        }
        self.base.count(&Self::RESULTS).await
    }

    /// Current results, no-results and error indicators
    pub async fn state(&self) -> VitrinaResult<SearchState> {
        Ok(SearchState {
            results: self.results_count().await?,
            no_results: self.has_no_results().await?,
            error: self.has_error().await?,
        })
    }

    /// Wait until a results banner, a result, the no-results indicator or the
    /// error indicator renders, then read the state
    pub async fn wait_for_response(&self) -> VitrinaResult<SearchState> {
        let css = &[
            Self::RESULTS_COUNT,
            Self::RESULTS,
            Self::NO_RESULTS,
            Self::ERROR,
        ]
        .iter()
        .map(Locator::to_css)
        .collect::<Vec<_>>()
        .join(", ");
        let driver = self.base.driver();
        self.base
            .waiter()
            .until("search response", move || async move {
                let matches = driver.query(css).await?;
                Ok(matches.iter().any(|m| m.visible).then_some(()))
            })
            .await?;
        self.state().await
    }

    /// Focus the input, press Tab and report the focused element's test id
    pub async fn focus_input_and_tab(&self) -> VitrinaResult<Option<String>> {
        self.base.click(&Self::INPUT).await?;
        self.base.press_tab().await?;
        self.base.active_test_id().await
    }

    pub async fn toggle_type_filter(&self, kind: &str) -> VitrinaResult<()> {
        self.base.click(&Self::TYPE_FILTER.with(kind)).await
    }

    pub async fn toggle_tag_filter(&self, tag: &str) -> VitrinaResult<()> {
        self.base.click(&Self::TAG_FILTER.with(tag)).await
    }

    pub async fn has_active_filters(&self) -> VitrinaResult<bool> {
        self.base.is_displayed(&Self::ACTIVE_FILTERS).await
    }

    /// Input and title visible
    pub async fn verify_page_loaded(&self) -> VitrinaResult<()> {
        self.base.assert_visible(&Self::INPUT).await?;
        self.base.assert_visible(&Self::TITLE).await
    }
}

#[async_trait(?Send)]
impl PageObject for SearchPage<'_> {
    fn url_pattern(&self) -> &str {
        Self::PATH
    }

    fn container(&self) -> Locator {
        Self::INPUT
    }

    fn base(&self) -> &BasePage<'_> {
        &self.base
    }

    fn page_name(&self) -> &str {
        "search"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod parse_tests {
        use super::*;

        #[test]
        fn test_banner_count() {
            assert_eq!(parse_results_count("Found 3 results"), Some(3));
            assert_eq!(parse_results_count("Found  12 result(s) for \"rust\""), Some(12));
            assert_eq!(parse_results_count("No results"), None);
        }

        #[test]
        fn test_state_responded() {
            assert!(!SearchState::default().responded());
            assert!(SearchState { results: 2, ..SearchState::default() }.responded());
            assert!(SearchState { error: true, ..SearchState::default() }.responded());
            let both = SearchState { results: 1, no_results: true, error: false };
            assert_eq!(both.indicators(), 2);
        }
    }
}
