//! Case studies index (`/case-studies`) and a case study detail page.

use crate::fixture::BrowserSession;
use crate::locator::{Locator, LocatorTemplate};
use crate::page::{BasePage, PageObject};
use crate::result::VitrinaResult;
use async_trait::async_trait;

/// Page object for the case studies index
#[derive(Debug, Clone, Copy)]
pub struct CaseStudiesPage<'s> {
    base: BasePage<'s>,
}

impl<'s> CaseStudiesPage<'s> {
    pub const PATH: &'static str = "/case-studies";

    pub const CONTAINER: Locator = Locator::test_id("case-studies-page");
    pub const GRID: Locator = Locator::test_id("case-studies-grid");
    pub const DESCRIPTION: Locator = Locator::test_id("case-studies-description");

    pub const CARD: LocatorTemplate = LocatorTemplate::test_id("case-study-{}");

    #[must_use]
    pub fn new(session: &'s BrowserSession) -> Self {
        Self {
            base: BasePage::new(session),
        }
    }

    /// Cards rendered in the grid; zero when the grid itself is missing
    pub async fn case_card_count(&self) -> VitrinaResult<usize> {
        self.base.count(&Self::CARD.any().within(&Self::GRID)).await
    }

    pub async fn is_description_visible(&self) -> VitrinaResult<bool> {
        self.base.is_displayed(&Self::DESCRIPTION).await
    }

    /// Follow the link inside card `index` and wait for the detail page
    pub async fn open_case(&self, index: usize) -> VitrinaResult<CaseStudyDetailPage<'s>> {
        let cards = Self::CARD.any().within(&Self::GRID);
        let link = Locator::tag("a").within(&cards);
        self.base.click_nth(&link, index).await?;
        self.base.wait_for_route_change("/case-studies/").await?;
        let detail = CaseStudyDetailPage::new(self.base.session());
        detail.verify_loaded().await?;
        Ok(detail)
    }
}

#[async_trait(?Send)]
impl PageObject for CaseStudiesPage<'_> {
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
        "case-studies"
    }
}

/// Page object for one case study (`/case-studies/{slug}`)
#[derive(Debug, Clone, Copy)]
pub struct CaseStudyDetailPage<'s> {
    base: BasePage<'s>,
}

impl<'s> CaseStudyDetailPage<'s> {
    pub const PATH: &'static str = "/case-studies/";

    pub const CONTAINER: Locator = Locator::test_id("case-study-detail-page");
    pub const PROBLEM: Locator = Locator::test_id("case-study-problem");
    pub const SOLUTION: Locator = Locator::test_id("case-study-solution");
    pub const CHALLENGES: Locator = Locator::test_id("case-study-challenges");
    pub const RESULTS: Locator = Locator::test_id("case-study-results");
    pub const LESSONS: Locator = Locator::test_id("case-study-lessons");

    #[must_use]
    pub fn new(session: &'s BrowserSession) -> Self {
        Self {
            base: BasePage::new(session),
        }
    }

    pub async fn problem(&self) -> VitrinaResult<String> {
        self.base.text_of(&Self::PROBLEM).await
    }

    /// Which of solution, challenges, results and lessons rendered
    pub async fn sections_present(&self) -> VitrinaResult<Vec<&'static str>> {
        let mut present = Vec::new();
        for (name, locator) in [
            ("solution", Self::SOLUTION),
            ("challenges", Self::CHALLENGES),
            ("results", Self::RESULTS),
            ("lessons", Self::LESSONS),
        ] {
            if self.base.is_present(&locator).await? {
                present.push(name);
            }
        }
        Ok(present)
    }
}

#[async_trait(?Send)]
impl PageObject for CaseStudyDetailPage<'_> {
    fn url_pattern(&self) -> &str {
        Self::PATH
    }

    /// The problem statement is the one section every case study has
    fn container(&self) -> Locator {
        Self::PROBLEM
    }

    fn base(&self) -> &BasePage<'_> {
        &self.base
    }

    fn page_name(&self) -> &str {
        "case-study-detail"
    }
}
