//! Case studies: list the cards and open the first one.

use crate::case;
use crate::ensure;
use crate::fixture::BrowserSession;
use crate::harness::TestSuite;
use crate::page::PageObject;
use crate::pages::CaseStudiesPage;
use crate::result::VitrinaResult;

pub const NAME: &str = "case_studies";

/// Suite registration
#[must_use]
pub fn suite() -> TestSuite {
    TestSuite::new(NAME).with_test(case!(case_studies_list_and_navigate))
}

/// Without cards the page must at least explain itself
async fn case_studies_list_and_navigate(session: &BrowserSession) -> VitrinaResult<()> {
    let page = CaseStudiesPage::new(session);
    page.load().await?;

    if page.case_card_count().await? == 0 {
        ensure!(
            page.is_description_visible().await?,
            "No case studies and no description"
        );
        return Ok(());
    }

    let detail = page.open_case(0).await?;
    ensure!(
        detail.is_loaded().await?,
        "Case study detail did not load problem section"
    );
    Ok(())
}
