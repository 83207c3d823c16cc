//! Open source page: header, projects, philosophy and layout.

use crate::case;
use crate::config::Viewport;
use crate::fixture::BrowserSession;
use crate::harness::TestSuite;
use crate::page::PageObject;
use crate::pages::OpenSourcePage;
use crate::result::VitrinaResult;

pub const NAME: &str = "open_source";

/// Suite registration
#[must_use]
pub fn suite() -> TestSuite {
    TestSuite::new(NAME)
        .with_test(case!(opensource_page_loads).critical())
        .with_test(case!(header_content_complete))
        .with_test(case!(projects_present))
        .with_test(case!(philosophy_content_present))
        .with_test(case!(all_sections_present))
        .with_test(case!(opensource_layout_desktop))
        .with_test(case!(opensource_layout_mobile))
}

async fn loaded(session: &BrowserSession) -> VitrinaResult<OpenSourcePage<'_>> {
    let page = OpenSourcePage::new(session);
    page.load().await?;
    Ok(page)
}

async fn opensource_page_loads(session: &BrowserSession) -> VitrinaResult<()> {
    loaded(session).await?.verify_page_loaded().await
}

async fn header_content_complete(session: &BrowserSession) -> VitrinaResult<()> {
    loaded(session).await?.verify_header_content().await
}

async fn projects_present(session: &BrowserSession) -> VitrinaResult<()> {
    loaded(session).await?.verify_projects_visible().await
}

async fn philosophy_content_present(session: &BrowserSession) -> VitrinaResult<()> {
    loaded(session).await?.verify_philosophy_content().await
}

async fn all_sections_present(session: &BrowserSession) -> VitrinaResult<()> {
    loaded(session).await?.verify_all_sections_present().await
}

async fn opensource_layout_desktop(session: &BrowserSession) -> VitrinaResult<()> {
    layout(session, Viewport::DESKTOP).await
}

async fn opensource_layout_mobile(session: &BrowserSession) -> VitrinaResult<()> {
    layout(session, Viewport::MOBILE).await
}

async fn layout(session: &BrowserSession, viewport: Viewport) -> VitrinaResult<()> {
    let page = OpenSourcePage::new(session);
    page.base().set_viewport(viewport).await?;
    page.load().await?;
    page.verify_page_loaded().await?;
    page.verify_all_sections_present().await
}
