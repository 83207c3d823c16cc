//! Site search: page load, keyboard focus and the response contract.

use crate::case;
use crate::data;
use crate::ensure;
use crate::fixture::BrowserSession;
use crate::harness::TestSuite;
use crate::page::PageObject;
use crate::pages::SearchPage;
use crate::result::VitrinaResult;

pub const NAME: &str = "search";

/// Suite registration
#[must_use]
pub fn suite() -> TestSuite {
    TestSuite::new(NAME)
        .with_test(case!(search_page_loads).critical())
        .with_test(case!(search_interaction_and_accessibility))
}

async fn search_page_loads(session: &BrowserSession) -> VitrinaResult<()> {
    let search = SearchPage::new(session);
    search.load().await?;
    search.verify_page_loaded().await
}

async fn search_interaction_and_accessibility(session: &BrowserSession) -> VitrinaResult<()> {
    let search = SearchPage::new(session);
    search.load().await?;
    search.enter_query(&data::unmatched_query()).await?;

    let focused = search.focus_input_and_tab().await?;
    ensure!(
        focused.is_some(),
        "Tab did not move focus to a focusable element"
    );

    search.submit_search().await?;
    let state = search.wait_for_response().await?;
    ensure!(
        state.responded(),
        "Search did not return results, no-results, or error state"
    );
    Ok(())
}
