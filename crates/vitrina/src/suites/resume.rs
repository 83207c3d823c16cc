//! Resume page: header, sections, counts, contact buttons and layout.

use crate::case;
use crate::config::Viewport;
use crate::ensure;
use crate::fixture::BrowserSession;
use crate::harness::TestSuite;
use crate::page::PageObject;
use crate::pages::ResumePage;
use crate::result::VitrinaResult;

pub const NAME: &str = "resume";

/// Suite registration
#[must_use]
pub fn suite() -> TestSuite {
    TestSuite::new(NAME)
        .with_test(case!(resume_page_loads).critical())
        .with_test(case!(header_has_title))
        .with_test(case!(header_content_complete))
        .with_test(case!(expertise_cards_present))
        .with_test(case!(experience_entries_present))
        .with_test(case!(projects_present))
        .with_test(case!(contact_section_visible))
        .with_test(case!(github_button_visible))
        .with_test(case!(download_button_visible))
        .with_test(case!(all_sections_present))
        .with_test(case!(resume_layout_desktop))
        .with_test(case!(resume_layout_mobile))
}

async fn loaded(session: &BrowserSession) -> VitrinaResult<ResumePage<'_>> {
    let resume = ResumePage::new(session);
    resume.load().await?;
    Ok(resume)
}

async fn resume_page_loads(session: &BrowserSession) -> VitrinaResult<()> {
    loaded(session).await?.verify_page_loaded().await
}

async fn header_has_title(session: &BrowserSession) -> VitrinaResult<()> {
    let title = loaded(session).await?.title().await?;
    ensure!(!title.trim().is_empty(), "Resume title is empty");
    Ok(())
}

async fn header_content_complete(session: &BrowserSession) -> VitrinaResult<()> {
    loaded(session).await?.verify_header_content().await
}

async fn expertise_cards_present(session: &BrowserSession) -> VitrinaResult<()> {
    let resume = loaded(session).await?;
    ensure!(
        resume.is_expertise_section_visible().await?,
        "Expertise section not visible"
    );
    let cards = resume.expertise_card_count().await?;
    ensure!(cards > 0, "No expertise cards");
    Ok(())
}

async fn experience_entries_present(session: &BrowserSession) -> VitrinaResult<()> {
    let entries = loaded(session).await?.experience_entry_count().await?;
    ensure!(entries > 0, "No experience entries");
    Ok(())
}

async fn projects_present(session: &BrowserSession) -> VitrinaResult<()> {
    let resume = loaded(session).await?;
    let projects = resume.project_count().await?;
    ensure!(projects > 0, "No resume projects");
    let name = resume.project_name(0).await?.unwrap_or_default();
    ensure!(!name.trim().is_empty(), "First resume project has no name");
    Ok(())
}

async fn contact_section_visible(session: &BrowserSession) -> VitrinaResult<()> {
    let resume = loaded(session).await?;
    ensure!(
        resume.is_contact_section_visible().await?,
        "Contact card not visible"
    );
    Ok(())
}

async fn github_button_visible(session: &BrowserSession) -> VitrinaResult<()> {
    let resume = loaded(session).await?;
    ensure!(resume.is_github_button_visible().await?, "GitHub button not visible");
    Ok(())
}

async fn download_button_visible(session: &BrowserSession) -> VitrinaResult<()> {
    let resume = loaded(session).await?;
    ensure!(
        resume.is_download_button_visible().await?,
        "Download button not visible"
    );
    Ok(())
}

async fn all_sections_present(session: &BrowserSession) -> VitrinaResult<()> {
    loaded(session).await?.verify_key_sections_present().await
}

async fn resume_layout_desktop(session: &BrowserSession) -> VitrinaResult<()> {
    layout(session, Viewport::DESKTOP).await
}

async fn resume_layout_mobile(session: &BrowserSession) -> VitrinaResult<()> {
    layout(session, Viewport::MOBILE).await
}

async fn layout(session: &BrowserSession, viewport: Viewport) -> VitrinaResult<()> {
    let resume = ResumePage::new(session);
    resume.base().set_viewport(viewport).await?;
    resume.load().await?;
    resume.verify_page_loaded().await?;
    resume.verify_key_sections_present().await
}
