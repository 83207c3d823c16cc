//! Critical-path checks: home, navigation, contact form, structure and search.

use crate::case;
use crate::ensure;
use crate::fixture::BrowserSession;
use crate::harness::TestSuite;
use crate::locator::Locator;
use crate::page::{BasePage, PageObject};
use crate::pages::{ContactPage, HomePage, SearchPage};
use crate::result::VitrinaResult;

pub const NAME: &str = "smoke";

/// Suite registration
#[must_use]
pub fn suite() -> TestSuite {
    TestSuite::new(NAME)
        .with_test(case!(home_page_loads).smoke())
        .with_test(case!(hero_section_visible).smoke())
        .with_test(case!(explore_button_clickable).smoke())
        .with_test(case!(contact_button_clickable).smoke())
        .with_test(case!(no_console_errors).smoke())
        .with_test(case!(home_to_systems_navigation).smoke())
        .with_test(case!(home_to_resume_navigation).smoke())
        .with_test(case!(contact_page_loads).smoke())
        .with_test(case!(contact_form_has_all_fields).smoke())
        .with_test(case!(home_page_has_single_h1).smoke())
        .with_test(case!(navigation_structure_present).smoke())
        .with_test(case!(search_page_loads).smoke())
        .with_test(case!(search_input_accepts_text).smoke())
}

async fn loaded_home(session: &BrowserSession) -> VitrinaResult<HomePage<'_>> {
    let home = HomePage::new(session);
    home.load().await?;
    home.verify_page_loaded().await?;
    Ok(home)
}

async fn home_page_loads(session: &BrowserSession) -> VitrinaResult<()> {
    let home = HomePage::new(session);
    home.load().await?;
    home.base().assert_visible(&HomePage::MAIN_CONTENT).await
}

async fn hero_section_visible(session: &BrowserSession) -> VitrinaResult<()> {
    let home = loaded_home(session).await?;
    ensure!(home.is_hero_section_visible().await?, "Hero section not visible");
    let title = home.hero_title_text().await?;
    ensure!(
        title.contains("Engineer") || title.contains("Dev"),
        "Title incorrect: {title}"
    );
    Ok(())
}

async fn explore_button_clickable(session: &BrowserSession) -> VitrinaResult<()> {
    loaded_home(session).await?.verify_explore_button_visible().await
}

async fn contact_button_clickable(session: &BrowserSession) -> VitrinaResult<()> {
    loaded_home(session).await?.verify_contact_button_visible().await
}

async fn no_console_errors(session: &BrowserSession) -> VitrinaResult<()> {
    loaded_home(session).await?.verify_no_console_errors().await
}

async fn home_to_systems_navigation(session: &BrowserSession) -> VitrinaResult<()> {
    let home = HomePage::new(session);
    home.load().await?;
    home.navigate_to_systems_via_explore_button().await?;
    ensure!(
        home.is_projects_section_visible().await?,
        "Systems section not visible after click"
    );
    Ok(())
}

async fn home_to_resume_navigation(session: &BrowserSession) -> VitrinaResult<()> {
    let home = HomePage::new(session);
    home.load().await?;
    let url = home.navigate_to_resume_via_contact_button().await?;
    ensure!(url.contains("/resume"), "Navigation failed: {url}");
    Ok(())
}

async fn contact_page_loads(session: &BrowserSession) -> VitrinaResult<()> {
    let contact = ContactPage::new(session);
    contact.load().await?;
    contact.base().assert_visible(&Locator::tag("form")).await
}

async fn contact_form_has_all_fields(session: &BrowserSession) -> VitrinaResult<()> {
    let contact = ContactPage::new(session);
    contact.load().await?;
    contact.verify_all_form_fields_present().await?;
    ensure!(
        contact.is_submit_button_visible().await?,
        "Submit button missing"
    );
    Ok(())
}

async fn home_page_has_single_h1(session: &BrowserSession) -> VitrinaResult<()> {
    loaded_home(session).await?.verify_h1_unique().await
}

async fn navigation_structure_present(session: &BrowserSession) -> VitrinaResult<()> {
    let page = BasePage::new(session);
    page.navigate_home().await?;
    page.assert_visible(&HomePage::NAVIGATION_HEADER).await
}

async fn search_page_loads(session: &BrowserSession) -> VitrinaResult<()> {
    let search = SearchPage::new(session);
    search.load().await?;
    search.base().assert_visible(&SearchPage::INPUT).await
}

async fn search_input_accepts_text(session: &BrowserSession) -> VitrinaResult<()> {
    let search = SearchPage::new(session);
    search.load().await?;
    search.enter_query("test").await?;
    let value = search.query_value().await?;
    ensure!(value.contains("test"), "Text not entered in search field: '{value}'");
    Ok(())
}
