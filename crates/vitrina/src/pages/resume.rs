//! Resume page (`/resume`).

use super::is_numbered;
use crate::ensure;
use crate::fixture::BrowserSession;
use crate::locator::{Locator, LocatorTemplate};
use crate::page::{BasePage, PageObject};
use crate::result::VitrinaResult;
use async_trait::async_trait;

const EXPERIENCE_PREFIX: &str = "resume-experience-";
const PROJECT_PREFIX: &str = "resume-project-";

/// Page object for the resume
#[derive(Debug, Clone, Copy)]
pub struct ResumePage<'s> {
    base: BasePage<'s>,
}

impl<'s> ResumePage<'s> {
    pub const PATH: &'static str = "/resume";

    pub const CONTAINER: Locator = Locator::test_id("resume-container");
    pub const HEADER: Locator = Locator::test_id("resume-header");
    pub const TITLE: Locator = Locator::test_id("resume-title");
    pub const SUBTITLE: Locator = Locator::test_id("resume-subtitle");
    pub const STATEMENT: Locator = Locator::test_id("resume-statement");
    pub const EXPERTISE_GRID: Locator = Locator::test_id("resume-expertise-grid");
    pub const SKILLS_CARD: Locator = Locator::test_id("resume-skills-card");
    pub const LANGUAGES_CARD: Locator = Locator::test_id("resume-languages-card");
    pub const FRAMEWORKS_CARD: Locator = Locator::test_id("resume-frameworks-card");
    pub const TOOLS_CARD: Locator = Locator::test_id("resume-tools-card");
    pub const EXPERIENCE_LIST: Locator = Locator::test_id("resume-experience-list");
    pub const PROJECTS_GRID: Locator = Locator::test_id("resume-projects-grid");
    pub const CONTACT_CARD: Locator = Locator::test_id("resume-contact-card");
    pub const AVAILABILITY: Locator = Locator::test_id("resume-availability");
    pub const GITHUB_BUTTON: Locator = Locator::test_id("resume-github-button");
    pub const EMAIL_BUTTON: Locator = Locator::test_id("resume-email-button");
    pub const DOWNLOAD_BUTTON: Locator = Locator::test_id("resume-download-button");

    pub const PROJECT_NAME: LocatorTemplate = LocatorTemplate::test_id("resume-project-name-{}");

    #[must_use]
    pub fn new(session: &'s BrowserSession) -> Self {
        Self {
            base: BasePage::new(session),
        }
    }

    pub async fn is_container_visible(&self) -> VitrinaResult<bool> {
        self.base.is_displayed(&Self::CONTAINER).await
    }

    pub async fn title(&self) -> VitrinaResult<String> {
        self.base.text_of(&Self::TITLE).await
    }

    pub async fn subtitle(&self) -> VitrinaResult<String> {
        self.base.text_of(&Self::SUBTITLE).await
    }

    pub async fn statement(&self) -> VitrinaResult<String> {
        self.base.text_of(&Self::STATEMENT).await
    }

    pub async fn is_expertise_section_visible(&self) -> VitrinaResult<bool> {
        self.base.is_displayed(&Self::EXPERTISE_GRID).await
    }

    /// Cards inside the expertise grid
    pub async fn expertise_card_count(&self) -> VitrinaResult<usize> {
        let cards = Locator::css("[class*='Card']").within(&Self::EXPERTISE_GRID);
        self.base.count(&cards).await
    }

    pub async fn is_experience_section_visible(&self) -> VitrinaResult<bool> {
        self.base.is_displayed(&Self::EXPERIENCE_LIST).await
    }

    /// Numbered experience entries (`resume-experience-N`)
    pub async fn experience_entry_count(&self) -> VitrinaResult<usize> {
        let entries = Locator::test_id_prefix(EXPERIENCE_PREFIX).within(&Self::EXPERIENCE_LIST);
        let entries = self.base.optional_elements(&entries).await?;
        Ok(entries.iter().filter(|e| is_numbered(e, EXPERIENCE_PREFIX)).count())
    }

    pub async fn is_projects_section_visible(&self) -> VitrinaResult<bool> {
        self.base.is_displayed(&Self::PROJECTS_GRID).await
    }

    /// Numbered project cards (`resume-project-N`), not their name or role parts
    pub async fn project_count(&self) -> VitrinaResult<usize> {
        let projects = Locator::test_id_prefix(PROJECT_PREFIX).within(&Self::PROJECTS_GRID);
        let projects = self.base.optional_elements(&projects).await?;
        Ok(projects.iter().filter(|p| is_numbered(p, PROJECT_PREFIX)).count())
    }

    /// Name of project `index`; `None` when not rendered
    pub async fn project_name(&self, index: usize) -> VitrinaResult<Option<String>> {
        self.base.optional_text(&Self::PROJECT_NAME.at(index)).await
    }

    pub async fn is_contact_section_visible(&self) -> VitrinaResult<bool> {
        self.base.is_displayed(&Self::CONTACT_CARD).await
    }

    pub async fn availability(&self) -> VitrinaResult<String> {
        self.base.text_of(&Self::AVAILABILITY).await
    }

    pub async fn is_github_button_visible(&self) -> VitrinaResult<bool> {
        self.base.is_displayed(&Self::GITHUB_BUTTON).await
    }

    pub async fn is_download_button_visible(&self) -> VitrinaResult<bool> {
        self.base.is_displayed(&Self::DOWNLOAD_BUTTON).await
    }

    pub async fn click_github_button(&self) -> VitrinaResult<()> {
        self.base.scroll_to_element(&Self::GITHUB_BUTTON).await?;
        self.base.click(&Self::GITHUB_BUTTON).await
    }

    // -------------------------------------------------------------------------
    // Verification
    // -------------------------------------------------------------------------

    /// Container, title and expertise grid visible
    pub async fn verify_page_loaded(&self) -> VitrinaResult<()> {
        self.base.assert_visible(&Self::CONTAINER).await?;
        self.base.assert_visible(&Self::TITLE).await?;
        self.base.assert_visible(&Self::EXPERTISE_GRID).await
    }

    /// Expertise, experience, projects and contact sections visible
    pub async fn verify_key_sections_present(&self) -> VitrinaResult<()> {
        for section in [
            Self::EXPERTISE_GRID,
            Self::EXPERIENCE_LIST,
            Self::PROJECTS_GRID,
            Self::CONTACT_CARD,
        ] {
            self.base.assert_visible(&section).await?;
        }
        Ok(())
    }

    /// Title, subtitle and statement are non-empty
    pub async fn verify_header_content(&self) -> VitrinaResult<()> {
        let title = self.title().await?;
        let subtitle = self.subtitle().await?;
        let statement = self.statement().await?;
        ensure!(
            !title.trim().is_empty() && !subtitle.trim().is_empty() && !statement.trim().is_empty(),
            "Resume header incomplete: title='{title}' subtitle='{subtitle}' statement='{statement}'"
        );
        Ok(())
    }
}

#[async_trait(?Send)]
impl PageObject for ResumePage<'_> {
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
        "resume"
    }
}
