//! Static content pages: each renders its container, some their own sections.

use crate::case;
use crate::data;
use crate::fixture::BrowserSession;
use crate::harness::TestSuite;
use crate::page::PageObject;
use crate::pages::{StaticPage, StaticPageKind};
use crate::result::VitrinaResult;

pub const NAME: &str = "static_pages";

/// Suite registration
#[must_use]
pub fn suite() -> TestSuite {
    TestSuite::new(NAME)
        .with_test(case!(ai_page_loads))
        .with_test(case!(hardware_page_loads))
        .with_test(case!(research_page_loads))
        .with_test(case!(newsletter_page_loads))
        .with_test(case!(models_3d_page_loads))
        .with_test(case!(systems_page_loads))
        .with_test(case!(splash_page_loads))
}

async fn loads(session: &BrowserSession, kind: StaticPageKind) -> VitrinaResult<StaticPage<'_>> {
    let page = StaticPage::new(session, kind);
    page.load().await?;
    page.verify_loaded().await?;
    Ok(page)
}

async fn ai_page_loads(session: &BrowserSession) -> VitrinaResult<()> {
    loads(session, StaticPageKind::Ai).await.map(drop)
}

async fn hardware_page_loads(session: &BrowserSession) -> VitrinaResult<()> {
    loads(session, StaticPageKind::Hardware).await.map(drop)
}

async fn research_page_loads(session: &BrowserSession) -> VitrinaResult<()> {
    loads(session, StaticPageKind::Research).await.map(drop)
}

async fn newsletter_page_loads(session: &BrowserSession) -> VitrinaResult<()> {
    loads(session, StaticPageKind::Newsletter).await.map(drop)
}

/// The viewer may keep the container hidden while rendering; presence is enough
async fn models_3d_page_loads(session: &BrowserSession) -> VitrinaResult<()> {
    let page = StaticPage::new(session, StaticPageKind::Models3d);
    page.load().await?;
    page.base().assert_present(&page.container()).await
}

async fn systems_page_loads(session: &BrowserSession) -> VitrinaResult<()> {
    loads(session, StaticPageKind::Systems)
        .await?
        .verify_sections()
        .await
}

async fn splash_page_loads(session: &BrowserSession) -> VitrinaResult<()> {
    let page = loads(session, StaticPageKind::Splash).await?;
    page.verify_sections().await?;
    page.verify_splash(data::SPLASH_TITLE).await
}
