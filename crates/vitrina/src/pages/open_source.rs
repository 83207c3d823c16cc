//! Open source showcase (`/open-source`).

use crate::ensure;
use crate::fixture::BrowserSession;
use crate::locator::Locator;
use crate::page::{BasePage, PageObject};
use crate::result::VitrinaResult;
use async_trait::async_trait;

/// Page object for the open source page
#[derive(Debug, Clone, Copy)]
pub struct OpenSourcePage<'s> {
    base: BasePage<'s>,
}

impl<'s> OpenSourcePage<'s> {
    pub const PATH: &'static str = "/open-source";

    pub const CONTAINER: Locator = Locator::test_id("opensource-container");
    pub const TITLE: Locator = Locator::test_id("opensource-title");
    pub const SUBTITLE: Locator = Locator::test_id("opensource-subtitle");
    pub const DESCRIPTION: Locator = Locator::test_id("opensource-description");
    pub const PROJECTS_SECTION: Locator = Locator::test_id("opensource-projects-section");
    pub const PROJECTS_GRID: Locator = Locator::test_id("opensource-projects-grid");
    pub const PHILOSOPHY_SECTION: Locator = Locator::test_id("opensource-philosophy-section");
    pub const PHILOSOPHY_CONTENT: Locator = Locator::test_id("opensource-philosophy-content");
    pub const PHILOSOPHY_STATEMENT: Locator = Locator::test_id("opensource-philosophy-statement");
    pub const PHILOSOPHY_VALUES: Locator = Locator::test_id("opensource-philosophy-values");

    pub const PROJECT_CARDS: Locator = Locator::test_id_prefix("opensource-project-");
    pub const VALUE_ITEMS: Locator = Locator::test_id_prefix("opensource-value-");

    #[must_use]
    pub fn new(session: &'s BrowserSession) -> Self {
        Self {
            base: BasePage::new(session),
        }
    }

    pub async fn title(&self) -> VitrinaResult<String> {
        self.base.text_of(&Self::TITLE).await
    }

    pub async fn subtitle(&self) -> VitrinaResult<String> {
        self.base.text_of(&Self::SUBTITLE).await
    }

    pub async fn description(&self) -> VitrinaResult<Option<String>> {
        self.base.optional_text(&Self::DESCRIPTION).await
    }

    /// Project cards rendered in the grid
    pub async fn project_count(&self) -> VitrinaResult<usize> {
        self.base
            .count(&Self::PROJECT_CARDS.within(&Self::PROJECTS_GRID))
            .await
    }

    /// Philosophy values listed under the statement
    pub async fn value_count(&self) -> VitrinaResult<usize> {
        self.base
            .count(&Self::VALUE_ITEMS.within(&Self::PHILOSOPHY_VALUES))
            .await
    }

    pub async fn philosophy_statement(&self) -> VitrinaResult<String> {
        self.base.text_of(&Self::PHILOSOPHY_STATEMENT).await
    }

    // -------------------------------------------------------------------------
    // Verification
    // -------------------------------------------------------------------------

    /// Container, title and projects section visible
    pub async fn verify_page_loaded(&self) -> VitrinaResult<()> {
        self.base.assert_visible(&Self::CONTAINER).await?;
        self.base.assert_visible(&Self::TITLE).await?;
        self.base.assert_visible(&Self::PROJECTS_SECTION).await
    }

    pub async fn verify_all_sections_present(&self) -> VitrinaResult<()> {
        self.base.assert_visible(&Self::PROJECTS_SECTION).await?;
        self.base.assert_visible(&Self::PHILOSOPHY_SECTION).await
    }

    pub async fn verify_header_content(&self) -> VitrinaResult<()> {
        let title = self.title().await?;
        ensure!(!title.trim().is_empty(), "Open source title is empty");
        let subtitle = self.subtitle().await?;
        ensure!(!subtitle.trim().is_empty(), "Open source subtitle is empty");
        Ok(())
    }

    /// Statement visible and at least one value listed
    pub async fn verify_philosophy_content(&self) -> VitrinaResult<()> {
        self.base.assert_visible(&Self::PHILOSOPHY_STATEMENT).await?;
        let values = self.value_count().await?;
        ensure!(values > 0, "Expected philosophy values, found none");
        Ok(())
    }

    pub async fn verify_projects_visible(&self) -> VitrinaResult<()> {
        let projects = self.project_count().await?;
        ensure!(projects > 0, "Expected open source projects, found none");
        Ok(())
    }
}

#[async_trait(?Send)]
impl PageObject for OpenSourcePage<'_> {
    fn url_pattern(&self) -> &str {
        Self::PATH
    }

    fn container(&self) -> Locator {
        Self::CONTAINER
    }

    fn base(&self) -> &BasePage<'_> {
        &self.base
    }

    fn page_name(&self) -> &str {
        "open-source"
    }
}
