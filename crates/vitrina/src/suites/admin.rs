//! Admin screens. The messages inbox needs a backend the test environment
//! rarely has, so its cases are registered skipped.

use crate::case;
use crate::data;
use crate::ensure;
use crate::fixture::BrowserSession;
use crate::harness::TestSuite;
use crate::page::PageObject;
use crate::pages::{AdminAnalyticsPage, AdminMessagesPage};
use crate::result::VitrinaResult;
use tracing::debug;

pub const NAME: &str = "admin";

/// Reason the inbox cases never run
pub const MESSAGES_SKIP: &str = "Admin messages page requires backend API availability \
     (contacts.json) which may not be present in test environment";

/// Suite registration
#[must_use]
pub fn suite() -> TestSuite {
    TestSuite::new(NAME)
        .with_test(case!(admin_analytics_page_loads))
        .with_test(case!(admin_analytics_tab_navigation))
        .with_test(case!(admin_messages_page_loads).skipped(MESSAGES_SKIP))
        .with_test(case!(admin_messages_list_and_select).skipped(MESSAGES_SKIP))
}

async fn admin_analytics_page_loads(session: &BrowserSession) -> VitrinaResult<()> {
    let page = AdminAnalyticsPage::new(session);
    page.load().await?;
    ensure!(
        page.is_shell_visible().await?,
        "Neither the analytics title nor the auth input rendered"
    );
    Ok(())
}

async fn admin_analytics_tab_navigation(session: &BrowserSession) -> VitrinaResult<()> {
    let page = AdminAnalyticsPage::new(session);
    page.load().await?;
    if page.needs_auth().await? {
        page.authenticate(data::ADMIN_DUMMY_TOKEN).await?;
    }

    page.open_export_tab().await?;
    // The backend may refuse the export; only the tab switch matters here
    if let Err(e) = page.trigger_export().await {
        debug!(error = %e, "export action unavailable");
    }

    page.open_delete_tab().await?;
    ensure!(
        page.has_delete_controls().await?,
        "Delete tab shows neither confirmation nor action"
    );
    Ok(())
}

async fn admin_messages_page_loads(session: &BrowserSession) -> VitrinaResult<()> {
    let page = AdminMessagesPage::new(session);
    page.load().await?;
    ensure!(page.is_ready().await?, "Admin messages page did not render");
    Ok(())
}

async fn admin_messages_list_and_select(session: &BrowserSession) -> VitrinaResult<()> {
    let page = AdminMessagesPage::new(session);
    page.load().await?;
    page.wait_for_messages().await?;
    if let Some(first) = page.message_ids().await?.first() {
        page.select_message(first).await?;
    }
    Ok(())
}
