//! Projects index (`/projects`): featured grid, main grid, search and filters.

use super::texts;
use crate::ensure;
use crate::fixture::BrowserSession;
use crate::locator::{Locator, LocatorTemplate};
use crate::page::{BasePage, PageObject};
use crate::result::VitrinaResult;
use async_trait::async_trait;

/// Which project grid an index refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectGrid {
    /// `projects-featured-grid`
    Featured,
    /// `projects-grid`
    Main,
}

impl ProjectGrid {
    const fn card(self) -> LocatorTemplate {
        match self {
            Self::Featured => LocatorTemplate::test_id("project-card-featured-{}"),
            Self::Main => LocatorTemplate::test_id("project-card-{}"),
        }
    }

    const fn title(self) -> LocatorTemplate {
        match self {
            Self::Featured => LocatorTemplate::test_id("project-title-featured-{}"),
            Self::Main => LocatorTemplate::test_id("project-title-{}"),
        }
    }

    const fn summary(self) -> LocatorTemplate {
        match self {
            Self::Featured => LocatorTemplate::test_id("project-summary-featured-{}"),
            Self::Main => LocatorTemplate::test_id("project-summary-{}"),
        }
    }

    const fn tech(self) -> LocatorTemplate {
        match self {
            Self::Featured => LocatorTemplate::test_id("project-tech-featured-{}"),
            Self::Main => LocatorTemplate::test_id("project-tech-{}"),
        }
    }
}

/// Page object for the projects index
#[derive(Debug, Clone, Copy)]
pub struct ProjectsPage<'s> {
    base: BasePage<'s>,
}

impl<'s> ProjectsPage<'s> {
    pub const PATH: &'static str = "/projects";

    pub const CONTAINER: Locator = Locator::test_id("projects-container");
    pub const TITLE: Locator = Locator::test_id("projects-title");
    pub const SEARCH: Locator = Locator::test_id("projects-search");
    pub const FILTER: Locator = Locator::test_id("projects-filter");
    pub const FILTER_CATEGORY: Locator = Locator::test_id("projects-filter-category");
    pub const FILTER_TECH: Locator = Locator::test_id("projects-filter-tech");
    pub const FILTER_CLEAR: Locator = Locator::test_id("projects-filter-clear");
    pub const FEATURED_GRID: Locator = Locator::test_id("projects-featured-grid");
    pub const GRID: Locator = Locator::test_id("projects-grid");

    pub const CATEGORY_FILTER: LocatorTemplate =
        LocatorTemplate::test_id("projects-filter-category-{}");
    pub const TECH_FILTER: LocatorTemplate = LocatorTemplate::test_id("projects-filter-tech-{}");

    #[must_use]
    pub fn new(session: &'s BrowserSession) -> Self {
        Self {
            base: BasePage::new(session),
        }
    }

    pub async fn is_container_visible(&self) -> VitrinaResult<bool> {
        self.base.is_displayed(&Self::CONTAINER).await
    }

    pub async fn title_text(&self) -> VitrinaResult<Option<String>> {
        self.base.optional_text(&Self::TITLE).await
    }

    // -------------------------------------------------------------------------
    // Search and filters
    // -------------------------------------------------------------------------

    pub async fn is_search_visible(&self) -> VitrinaResult<bool> {
        self.base.is_displayed(&Self::SEARCH).await
    }

    pub async fn search(&self, term: &str) -> VitrinaResult<()> {
        self.base.fill_text(&Self::SEARCH, term).await
    }

    pub async fn search_value(&self) -> VitrinaResult<String> {
        self.base.value_of(&Self::SEARCH).await
    }

    /// Labels of the category filter buttons
    pub async fn filter_categories(&self) -> VitrinaResult<Vec<String>> {
        let buttons = Locator::css("button").within(&Self::FILTER_CATEGORY);
        Ok(texts(&self.base.optional_elements(&buttons).await?))
    }

    pub async fn filter_by_category(&self, category: &str) -> VitrinaResult<()> {
        self.base.click(&Self::CATEGORY_FILTER.with(category)).await
    }

    /// Labels of the technology filter buttons
    pub async fn filter_technologies(&self) -> VitrinaResult<Vec<String>> {
        let buttons = Locator::css("button").within(&Self::FILTER_TECH);
        Ok(texts(&self.base.optional_elements(&buttons).await?))
    }

    pub async fn filter_by_technology(&self, tech: &str) -> VitrinaResult<()> {
        self.base.click(&Self::TECH_FILTER.with(tech)).await
    }

    pub async fn is_clear_filters_visible(&self) -> VitrinaResult<bool> {
        self.base.is_displayed(&Self::FILTER_CLEAR).await
    }

    pub async fn click_clear_filters(&self) -> VitrinaResult<()> {
        self.base.click(&Self::FILTER_CLEAR).await
    }

    // -------------------------------------------------------------------------
    // Cards
    // -------------------------------------------------------------------------

    pub async fn featured_project_count(&self) -> VitrinaResult<usize> {
        let cards = ProjectGrid::Featured.card().any().within(&Self::FEATURED_GRID);
        self.base.count(&cards).await
    }

    /// Cards in the main grid, featured cards excluded
    pub async fn project_count(&self) -> VitrinaResult<usize> {
        let cards = ProjectGrid::Main.card().any().within(&Self::GRID);
        let cards = self.base.optional_elements(&cards).await?;
        Ok(cards
            .iter()
            .filter(|c| c.test_id().is_some_and(|id| !id.contains("featured")))
            .count())
    }

    /// Title of card `index`; `None` when that card is not rendered
    pub async fn project_title(&self, grid: ProjectGrid, index: usize) -> VitrinaResult<Option<String>> {
        self.base.optional_text(&grid.title().at(index)).await
    }

    /// Summary of card `index`; `None` when that card is not rendered
    pub async fn project_summary(&self, grid: ProjectGrid, index: usize) -> VitrinaResult<Option<String>> {
        self.base.optional_text(&grid.summary().at(index)).await
    }

    /// Technology badges of card `index`
    pub async fn project_technologies(&self, grid: ProjectGrid, index: usize) -> VitrinaResult<Vec<String>> {
        let badges = Locator::css("[class*='badge']").within(&grid.tech().at(index));
        Ok(texts(&self.base.optional_elements(&badges).await?))
    }

    /// Open card `index` and wait for its detail route
    pub async fn click_project(&self, grid: ProjectGrid, index: usize) -> VitrinaResult<String> {
        self.base.click(&grid.card().at(index)).await?;
        self.base.wait_for_route_change("/projects/").await
    }

    // -------------------------------------------------------------------------
    // Verification
    // -------------------------------------------------------------------------

    pub async fn verify_page_loaded(&self) -> VitrinaResult<()> {
        self.base.assert_visible(&Self::CONTAINER).await?;
        self.base.assert_visible(&Self::TITLE).await
    }

    /// Assert at least one card renders in either grid
    pub async fn verify_projects_visible(&self) -> VitrinaResult<()> {
        let featured = self.featured_project_count().await?;
        let main = self.project_count().await?;
        ensure!(
            featured > 0 || main > 0,
            "Expected project cards, found {featured} featured and {main} in the main grid"
        );
        Ok(())
    }

    /// Assert card `index` has a title, a summary and at least one badge
    pub async fn verify_project_has_metadata(&self, grid: ProjectGrid, index: usize) -> VitrinaResult<()> {
        let title = self.project_title(grid, index).await?.unwrap_or_default();
        ensure!(!title.trim().is_empty(), "Project {index} ({grid:?}) has no title");
        let summary = self.project_summary(grid, index).await?.unwrap_or_default();
        ensure!(!summary.trim().is_empty(), "Project {index} ({grid:?}) has no summary");
        let tech = self.project_technologies(grid, index).await?;
        ensure!(!tech.is_empty(), "Project {index} ({grid:?}) has no technologies");
        Ok(())
    }
}

#[async_trait(?Send)]
impl PageObject for ProjectsPage<'_> {
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
        "projects"
    }
}
