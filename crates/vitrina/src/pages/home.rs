//! Home page (`/`).
//!
//! The skills widget is responsive: the orbit renders from 1024px up, the
//! accordion below. Exactly one of the two is visible at any viewport.

use crate::config::Viewport;
use crate::console::ConsoleEntry;
use crate::ensure;
use crate::fixture::BrowserSession;
use crate::locator::Locator;
use crate::page::{BasePage, PageObject};
use crate::result::VitrinaResult;
use async_trait::async_trait;
use std::path::PathBuf;

/// Minimum number of orbit nodes on desktop
pub const MIN_ORBIT_NODES: usize = 6;

/// Page object for the landing page
#[derive(Debug, Clone, Copy)]
pub struct HomePage<'s> {
    base: BasePage<'s>,
}

impl<'s> HomePage<'s> {
    /// Canonical path
    pub const PATH: &'static str = "/";

    // Hero
    pub const HERO_SECTION: Locator = Locator::test_id("hero-section");
    pub const HERO_TITLE: Locator = Locator::test_id("hero-title");
    pub const HERO_SUBTITLE: Locator = Locator::class_name("hero-subtitle");

    // Calls to action
    pub const EXPLORE_BUTTON: Locator = Locator::test_id("explore-work-button");
    pub const CONTACT_BUTTON: Locator = Locator::test_id("contact-button");

    // Skills: orbit on desktop, accordion on mobile
    pub const SKILL_ORBIT: Locator = Locator::test_id("skill-orbit");
    pub const SKILL_ORBIT_NODES: Locator = Locator::class_name("orbit-node");
    pub const SKILL_ORBIT_CENTER: Locator = Locator::class_name("orbit-center");
    pub const SKILL_ORBIT_LABEL: Locator = Locator::class_name("orbit-label");
    pub const SKILLS_ACCORDION: Locator = Locator::class_name("accordion");
    pub const ACCORDION_ITEMS: Locator = Locator::class_name("accordion-item");

    // Sections
    pub const PROJECTS_SECTION: Locator = Locator::id("systems");
    pub const PROJECT_CARDS: Locator = Locator::test_id("project-card");
    pub const PHILOSOPHIES_SECTION: Locator = Locator::class_name("philosophies");
    pub const PHILOSOPHY_ITEMS: Locator = Locator::class_name("philosophy-item");
    pub const COMPETENCY_CARDS: Locator = Locator::class_name("competency-card");

    // Structure
    pub const MAIN_CONTENT: Locator = Locator::tag("main");
    pub const PAGE_HEADER: Locator = Locator::class_name("page-header");
    pub const NAVIGATION_HEADER: Locator = Locator::test_id("navigation-header");
    pub const HEADING: Locator = Locator::tag("h1");

    /// Home page over `session`
    #[must_use]
    pub fn new(session: &'s BrowserSession) -> Self {
        Self {
            base: BasePage::new(session),
        }
    }

    /// Assert hero section and title are visible
    pub async fn verify_page_loaded(&self) -> VitrinaResult<()> {
        self.base.assert_visible(&Self::HERO_SECTION).await?;
        self.base.assert_visible(&Self::HERO_TITLE).await
    }

    /// Assert the document title names the site
    pub async fn verify_page_title(&self) -> VitrinaResult<()> {
        let title = self.base.page_title().await?;
        ensure!(
            title.contains("Dev Mahn X") || title.contains("Portfolio"),
            "Unexpected page title: {title}"
        );
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Hero
    // -------------------------------------------------------------------------

    pub async fn hero_title_text(&self) -> VitrinaResult<String> {
        self.base.text_of(&Self::HERO_TITLE).await
    }

    pub async fn is_hero_section_visible(&self) -> VitrinaResult<bool> {
        self.base.is_displayed(&Self::HERO_SECTION).await
    }

    pub async fn scroll_to_hero_section(&self) -> VitrinaResult<()> {
        self.base.scroll_to_element(&Self::HERO_SECTION).await
    }

    pub async fn click_explore_button(&self) -> VitrinaResult<()> {
        self.base.click(&Self::EXPLORE_BUTTON).await
    }

    pub async fn click_contact_button(&self) -> VitrinaResult<()> {
        self.base.click(&Self::CONTACT_BUTTON).await
    }

    pub async fn verify_explore_button_visible(&self) -> VitrinaResult<()> {
        self.base.assert_visible(&Self::EXPLORE_BUTTON).await
    }

    pub async fn verify_contact_button_visible(&self) -> VitrinaResult<()> {
        self.base.assert_visible(&Self::CONTACT_BUTTON).await
    }

    // -------------------------------------------------------------------------
    // Skills
    // -------------------------------------------------------------------------

    pub async fn is_skill_orbit_visible(&self) -> VitrinaResult<bool> {
        self.base.is_displayed(&Self::SKILL_ORBIT).await
    }

    pub async fn skill_orbit_node_count(&self) -> VitrinaResult<usize> {
        self.base.count(&Self::SKILL_ORBIT_NODES).await
    }

    /// Hover the orbit node at `index`
    pub async fn hover_skill_orbit_node(&self, index: usize) -> VitrinaResult<()> {
        self.base.hover_nth(&Self::SKILL_ORBIT_NODES, index).await
    }

    /// Click the orbit node at `index`
    pub async fn click_skill_orbit_node(&self, index: usize) -> VitrinaResult<()> {
        self.base.click_nth(&Self::SKILL_ORBIT_NODES, index).await
    }

    pub async fn is_accordion_visible(&self) -> VitrinaResult<bool> {
        self.base.is_displayed(&Self::SKILLS_ACCORDION).await
    }

    pub async fn accordion_item_count(&self) -> VitrinaResult<usize> {
        self.base.count(&Self::ACCORDION_ITEMS).await
    }

    /// Expand the accordion item at `index`
    pub async fn expand_accordion_item(&self, index: usize) -> VitrinaResult<()> {
        self.base.click_nth(&Self::ACCORDION_ITEMS, index).await
    }

    /// Visibility of (orbit, accordion) at the current viewport
    pub async fn skill_widgets(&self) -> VitrinaResult<(bool, bool)> {
        let orbit = self.is_skill_orbit_visible().await?;
        let accordion = self.is_accordion_visible().await?;
        Ok((orbit, accordion))
    }

    // -------------------------------------------------------------------------
    // Sections
    // -------------------------------------------------------------------------

    pub async fn scroll_to_projects_section(&self) -> VitrinaResult<()> {
        self.base.scroll_to_element(&Self::PROJECTS_SECTION).await
    }

    pub async fn is_projects_section_visible(&self) -> VitrinaResult<bool> {
        self.base.is_displayed(&Self::PROJECTS_SECTION).await
    }

    pub async fn featured_projects_count(&self) -> VitrinaResult<usize> {
        self.base.count(&Self::PROJECT_CARDS).await
    }

    /// Click the featured project card at `index` and wait for its detail route
    pub async fn click_project_card(&self, index: usize) -> VitrinaResult<String> {
        self.base.click_nth(&Self::PROJECT_CARDS, index).await?;
        self.base.wait_for_url_change("/projects/").await
    }

    pub async fn hover_project_card(&self, index: usize) -> VitrinaResult<()> {
        self.base.hover_nth(&Self::PROJECT_CARDS, index).await
    }

    pub async fn is_philosophies_section_visible(&self) -> VitrinaResult<bool> {
        self.base.is_displayed(&Self::PHILOSOPHIES_SECTION).await
    }

    pub async fn philosophy_count(&self) -> VitrinaResult<usize> {
        self.base.count(&Self::PHILOSOPHY_ITEMS).await
    }

    pub async fn competency_count(&self) -> VitrinaResult<usize> {
        self.base.count(&Self::COMPETENCY_CARDS).await
    }

    pub async fn is_navigation_visible(&self) -> VitrinaResult<bool> {
        self.base.is_displayed(&Self::NAVIGATION_HEADER).await
    }

    /// Scroll down by `pixels`
    pub async fn scroll_down(&self, pixels: i64) -> VitrinaResult<()> {
        self.base.scroll_by(0, pixels).await
    }

    // -------------------------------------------------------------------------
    // Responsive layout
    // -------------------------------------------------------------------------

    /// Switch to 375px and assert the accordion replaces the orbit
    pub async fn verify_mobile_layout(&self) -> VitrinaResult<()> {
        self.base.set_viewport(Viewport::MOBILE).await?;
        let (orbit, accordion) = self.skill_widgets().await?;
        ensure!(!orbit, "SkillOrbit should not be visible on mobile");
        ensure!(accordion, "Accordion should be visible on mobile");
        Ok(())
    }

    /// Switch to 1024px and assert the orbit replaces the accordion
    pub async fn verify_desktop_layout(&self) -> VitrinaResult<()> {
        self.base.set_viewport(Viewport::DESKTOP).await?;
        let (orbit, accordion) = self.skill_widgets().await?;
        ensure!(orbit, "SkillOrbit should be visible on desktop");
        ensure!(!accordion, "Accordion should not be visible on desktop");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Console and accessibility
    // -------------------------------------------------------------------------

    pub async fn console_errors(&self) -> VitrinaResult<Vec<ConsoleEntry>> {
        self.base.console_errors().await
    }

    pub async fn verify_no_console_errors(&self) -> VitrinaResult<()> {
        self.base.assert_no_console_errors().await
    }

    /// Assert exactly one `<h1>` is rendered
    pub async fn verify_h1_unique(&self) -> VitrinaResult<()> {
        let headings = self.base.count(&Self::HEADING).await?;
        ensure!(headings == 1, "Expected 1 H1, found {headings}");
        Ok(())
    }

    pub async fn verify_page_accessible(&self) -> VitrinaResult<()> {
        self.verify_h1_unique().await
    }

    // -------------------------------------------------------------------------
    // Diagnostics
    // -------------------------------------------------------------------------

    pub async fn take_hero_screenshot(&self) -> VitrinaResult<PathBuf> {
        self.base.take_screenshot(Some("home_hero.png")).await
    }

    pub async fn take_full_page_screenshot(&self) -> VitrinaResult<PathBuf> {
        self.base.take_screenshot(Some("home_full_page.png")).await
    }

    /// Truncated markup of `<main>`
    pub async fn page_structure(&self) -> VitrinaResult<String> {
        self.base.element_tree(&Self::MAIN_CONTENT).await
    }

    // -------------------------------------------------------------------------
    // Workflows
    // -------------------------------------------------------------------------

    /// Explore button scrolls to the systems section
    pub async fn navigate_to_systems_via_explore_button(&self) -> VitrinaResult<()> {
        self.verify_page_loaded().await?;
        self.click_explore_button().await?;
        self.base.waiter().scroll_reveal(&Self::PROJECTS_SECTION).await?;
        Ok(())
    }

    /// Contact button routes to `/resume`
    pub async fn navigate_to_resume_via_contact_button(&self) -> VitrinaResult<String> {
        self.verify_page_loaded().await?;
        self.click_contact_button().await?;
        let url = self.base.wait_for_route_change("/resume").await?;
        self.base.assert_url_contains("/resume").await?;
        Ok(url)
    }

    /// Desktop orbit shows at least [`MIN_ORBIT_NODES`] nodes; hovers the first
    pub async fn explore_skill_orbit_on_desktop(&self) -> VitrinaResult<usize> {
        self.base.set_viewport(Viewport::DESKTOP).await?;
        self.verify_page_loaded().await?;
        ensure!(
            self.is_skill_orbit_visible().await?,
            "SkillOrbit should be visible on desktop"
        );
        let nodes = self.skill_orbit_node_count().await?;
        ensure!(
            nodes >= MIN_ORBIT_NODES,
            "Expected at least {MIN_ORBIT_NODES} nodes, found {nodes}"
        );
        self.hover_skill_orbit_node(0).await?;
        Ok(nodes)
    }
}

#[async_trait(?Send)]
impl PageObject for HomePage<'_> {
    fn url_pattern(&self) -> &str {
        Self::PATH
    }

    fn container(&self) -> Locator {
        Self::HERO_SECTION
    }

    fn base(&self) -> &BasePage<'_> {
        &self.base
    }

    fn page_name(&self) -> &str {
        "home"
    }
}
