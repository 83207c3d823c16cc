//! Blog index (`/blog`): post grid and tag filters.

use super::texts;
use crate::ensure;
use crate::fixture::BrowserSession;
use crate::locator::{Locator, LocatorTemplate};
use crate::page::{BasePage, PageObject};
use crate::result::VitrinaResult;
use async_trait::async_trait;

/// Number of leading cards checked for link containers
const LINK_CHECK_LIMIT: usize = 3;

/// Page object for the blog index
#[derive(Debug, Clone, Copy)]
pub struct BlogPage<'s> {
    base: BasePage<'s>,
}

impl<'s> BlogPage<'s> {
    pub const PATH: &'static str = "/blog";

    pub const CONTAINER: Locator = Locator::test_id("blog-container");
    pub const GRID: Locator = Locator::test_id("blog-grid");
    pub const TITLE: Locator = Locator::test_id("blog-title");

    pub const FILTER: Locator = Locator::test_id("blog-filter");
    pub const FILTER_TAGS: Locator = Locator::test_id_prefix("blog-filter-tag-");
    pub const FILTER_CLEAR: Locator = Locator::test_id("blog-filter-clear");

    pub const POST_CARDS: Locator = Locator::test_id_prefix("blog-post-card-");
    pub const POST_TITLES: Locator = Locator::test_id_prefix("blog-post-title-");
    pub const POST_EXCERPTS: Locator = Locator::test_id_prefix("blog-post-excerpt-");
    pub const POST_DATES: Locator = Locator::test_id_prefix("blog-post-date-");

    pub const POST_CARD: LocatorTemplate = LocatorTemplate::test_id("blog-post-card-{}");
    pub const POST_TITLE: LocatorTemplate = LocatorTemplate::test_id("blog-post-title-{}");
    pub const POST_EXCERPT: LocatorTemplate = LocatorTemplate::test_id("blog-post-excerpt-{}");
    pub const POST_DATE: LocatorTemplate = LocatorTemplate::test_id("blog-post-date-{}");
    pub const FILTER_TAG: LocatorTemplate = LocatorTemplate::test_id("blog-filter-tag-{}");

    /// Main-navigation link to this page
    pub const NAV_LINK: Locator = Locator::css("a[href='/blog']");

    #[must_use]
    pub fn new(session: &'s BrowserSession) -> Self {
        Self {
            base: BasePage::new(session),
        }
    }

    pub async fn is_container_visible(&self) -> VitrinaResult<bool> {
        self.base.is_displayed(&Self::CONTAINER).await
    }

    pub async fn is_grid_visible(&self) -> VitrinaResult<bool> {
        self.base.is_displayed(&Self::GRID).await
    }

    pub async fn title_text(&self) -> VitrinaResult<String> {
        self.base.text_of(&Self::TITLE).await
    }

    // -------------------------------------------------------------------------
    // Posts
    // -------------------------------------------------------------------------

    pub async fn post_count(&self) -> VitrinaResult<usize> {
        self.base.count(&Self::POST_CARDS).await
    }

    /// Title of post `index`
    pub async fn post_title(&self, index: usize) -> VitrinaResult<String> {
        self.base.text_of(&Self::POST_TITLE.at(index)).await
    }

    /// Excerpt of post `index`
    pub async fn post_excerpt(&self, index: usize) -> VitrinaResult<String> {
        self.base.text_of(&Self::POST_EXCERPT.at(index)).await
    }

    /// Date of post `index`
    pub async fn post_date(&self, index: usize) -> VitrinaResult<String> {
        self.base.text_of(&Self::POST_DATE.at(index)).await
    }

    /// Open post `index` and wait for its route
    pub async fn click_post(&self, index: usize) -> VitrinaResult<String> {
        self.base.click(&Self::POST_CARD.at(index)).await?;
        self.base.wait_for_route_change("/blog/").await
    }

    // -------------------------------------------------------------------------
    // Filters
    // -------------------------------------------------------------------------

    /// Labels of the tag filter buttons
    pub async fn available_filters(&self) -> VitrinaResult<Vec<String>> {
        Ok(texts(&self.base.optional_elements(&Self::FILTER_TAGS).await?))
    }

    pub async fn click_filter_tag(&self, tag: &str) -> VitrinaResult<()> {
        self.base.click(&Self::FILTER_TAG.with(tag)).await
    }

    /// Click the first tag filter, if any
    pub async fn click_first_filter(&self) -> VitrinaResult<bool> {
        if self.base.count(&Self::FILTER_TAGS).await? == 0 {
            return Ok(false);
        }
        self.base.click_nth(&Self::FILTER_TAGS, 0).await?;
        Ok(true)
    }

    pub async fn is_filter_clear_visible(&self) -> VitrinaResult<bool> {
        self.base.is_displayed(&Self::FILTER_CLEAR).await
    }

    pub async fn click_filter_clear(&self) -> VitrinaResult<()> {
        self.base.click(&Self::FILTER_CLEAR).await
    }

    // -------------------------------------------------------------------------
    // Verification
    // -------------------------------------------------------------------------

    /// Assert container and grid are visible
    pub async fn verify_page_loaded(&self) -> VitrinaResult<()> {
        self.base.assert_visible(&Self::CONTAINER).await?;
        self.base.assert_visible(&Self::GRID).await
    }

    pub async fn verify_posts_visible(&self) -> VitrinaResult<()> {
        let count = self.post_count().await?;
        ensure!(count > 0, "Expected blog posts to be visible, found {count}");
        Ok(())
    }

    /// Assert post `index` has a non-empty title, excerpt and date
    pub async fn verify_post_has_metadata(&self, index: usize) -> VitrinaResult<()> {
        let title = self.post_title(index).await?;
        ensure!(!title.trim().is_empty(), "Post {index} has no title");
        let excerpt = self.post_excerpt(index).await?;
        ensure!(!excerpt.trim().is_empty(), "Post {index} has no excerpt");
        let date = self.post_date(index).await?;
        ensure!(!date.trim().is_empty(), "Post {index} has no date");
        Ok(())
    }

    pub async fn verify_filter_controls(&self) -> VitrinaResult<()> {
        self.base.assert_visible(&Self::FILTER).await?;
        let filters = self.available_filters().await?;
        ensure!(!filters.is_empty(), "No filter tags available");
        Ok(())
    }

    /// Assert the first few post cards sit inside a link or render as one
    pub async fn verify_post_links_accessible(&self) -> VitrinaResult<()> {
        let count = self.post_count().await?;
        for index in 0..count.min(LINK_CHECK_LIMIT) {
            let card = Self::POST_CARD.at(index);
            let linked = Locator::css("a").within(&card);
            let wrapped = card.within(&Locator::css("a"));
            let is_link = self.base.find_element(&card).await?.snapshot.tag == "a";
            ensure!(
                is_link
                    || self.base.is_present(&wrapped).await?
                    || self.base.is_present(&linked).await?,
                "Post {index} is not reachable through a link"
            );
        }
        Ok(())
    }
}

#[async_trait(?Send)]
impl PageObject for BlogPage<'_> {
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
        "blog"
    }
}
