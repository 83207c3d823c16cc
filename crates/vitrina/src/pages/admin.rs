//! Admin screens: analytics (`/admin/analytics`) and messages (`/admin/messages`).
//!
//! Both sit behind a token and a backend API. Without them the analytics page
//! renders only its auth input and the messages page its loading state, so most
//! accessors here treat missing UI as absent rather than failing.

use crate::driver::ElementSnapshot;
use crate::fixture::BrowserSession;
use crate::locator::{Locator, LocatorTemplate};
use crate::page::{BasePage, PageObject};
use crate::result::VitrinaResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Page object for the analytics dashboard
#[derive(Debug, Clone, Copy)]
pub struct AdminAnalyticsPage<'s> {
    base: BasePage<'s>,
}

impl<'s> AdminAnalyticsPage<'s> {
    pub const PATH: &'static str = "/admin/analytics";

    pub const PAGE: Locator = Locator::test_id("admin-analytics-page");
    pub const TITLE: Locator = Locator::test_id("admin-analytics-title");
    pub const DESCRIPTION: Locator = Locator::test_id("admin-analytics-description");
    pub const AUTH_INPUT: Locator = Locator::test_id("admin-analytics-auth-input");
    pub const MESSAGE: Locator = Locator::test_id("admin-analytics-message");
    pub const TAB_STATS: Locator = Locator::test_id("admin-analytics-tab-stats");
    pub const TAB_EXPORT: Locator = Locator::test_id("admin-analytics-tab-export");
    pub const TAB_DELETE: Locator = Locator::test_id("admin-analytics-tab-delete");
    pub const EXPORT_ACTION: Locator = Locator::test_id("admin-analytics-export-action");
    pub const DELETE_CONFIRM: Locator = Locator::test_id("admin-analytics-delete-confirm");
    pub const DELETE_ACTION: Locator = Locator::test_id("admin-analytics-delete-action");

    #[must_use]
    pub fn new(session: &'s BrowserSession) -> Self {
        Self {
            base: BasePage::new(session),
        }
    }

    /// Title or auth input visible (dashboard shell in either mode)
    pub async fn is_shell_visible(&self) -> VitrinaResult<bool> {
        Ok(self.base.is_displayed(&Self::TITLE).await?
            || self.base.is_displayed(&Self::AUTH_INPUT).await?)
    }

    pub async fn needs_auth(&self) -> VitrinaResult<bool> {
        self.base.is_displayed(&Self::AUTH_INPUT).await
    }

    /// Type a token into the auth input and wait for the stats reload
    pub async fn authenticate(&self, token: &str) -> VitrinaResult<()> {
        self.base.fill_text(&Self::AUTH_INPUT, token).await?;
        self.base.wait_for_page_load().await
    }

    pub async fn open_stats_tab(&self) -> VitrinaResult<()> {
        self.base.click(&Self::TAB_STATS).await
    }

    pub async fn open_export_tab(&self) -> VitrinaResult<()> {
        self.base.click(&Self::TAB_EXPORT).await
    }

    /// Click the export action if it renders; returns whether it was clicked
    pub async fn trigger_export(&self) -> VitrinaResult<bool> {
        if !self.base.is_displayed(&Self::EXPORT_ACTION).await? {
            return Ok(false);
        }
        self.base.click(&Self::EXPORT_ACTION).await?;
        Ok(true)
    }

    pub async fn open_delete_tab(&self) -> VitrinaResult<()> {
        self.base.click(&Self::TAB_DELETE).await
    }

    /// Set the delete confirmation checkbox to `checked`
    pub async fn set_delete_confirm(&self, checked: bool) -> VitrinaResult<()> {
        if self.base.is_selected(&Self::DELETE_CONFIRM).await? != checked {
            self.base.click(&Self::DELETE_CONFIRM).await?;
        }
        Ok(())
    }

    /// Click the delete action if it renders; returns whether it was clicked
    pub async fn trigger_delete(&self) -> VitrinaResult<bool> {
        if !self.base.is_displayed(&Self::DELETE_ACTION).await? {
            return Ok(false);
        }
        self.base.click(&Self::DELETE_ACTION).await?;
        Ok(true)
    }

    /// Delete tab shows its confirmation or its action
    pub async fn has_delete_controls(&self) -> VitrinaResult<bool> {
        Ok(self.base.is_displayed(&Self::DELETE_CONFIRM).await?
            || self.base.is_displayed(&Self::DELETE_ACTION).await?)
    }

    pub async fn has_message(&self) -> VitrinaResult<bool> {
        self.base.is_displayed(&Self::MESSAGE).await
    }
}

#[async_trait(?Send)]
impl PageObject for AdminAnalyticsPage<'_> {
    fn url_pattern(&self) -> &str {
        Self::PATH
    }

    fn container(&self) -> Locator {
        Self::PAGE
    }

    fn base(&self) -> &BasePage<'_> {
        &self.base
    }

    fn page_name(&self) -> &str {
        "admin-analytics"
    }
}

/// Message counters shown above the inbox. Missing or unparsable counters read 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageCounts {
    pub total: u32,
    pub unread: u32,
    pub read: u32,
}

/// Page object for the contact-message inbox
#[derive(Debug, Clone, Copy)]
pub struct AdminMessagesPage<'s> {
    base: BasePage<'s>,
}

impl<'s> AdminMessagesPage<'s> {
    pub const PATH: &'static str = "/admin/messages";

    pub const PAGE: Locator = Locator::test_id("admin-messages-page");
    pub const TITLE: Locator = Locator::test_id("admin-messages-title");
    pub const DESCRIPTION: Locator = Locator::test_id("admin-messages-description");
    pub const LOADING: Locator = Locator::test_id("admin-messages-loading");
    pub const RETRY_BUTTON: Locator = Locator::test_id("admin-messages-retry-button");
    pub const TOTAL: Locator = Locator::test_id("admin-messages-total");
    pub const UNREAD: Locator = Locator::test_id("admin-messages-unread");
    pub const READ: Locator = Locator::test_id("admin-messages-read");
    pub const EXPORT: Locator = Locator::test_id("admin-messages-export");
    pub const LIST: Locator = Locator::test_id("admin-messages-list");
    pub const EMPTY: Locator = Locator::test_id("admin-messages-empty");
    pub const DETAIL: Locator = Locator::test_id("admin-message-detail");

    pub const MESSAGE: LocatorTemplate = LocatorTemplate::test_id("admin-message-{}");

    #[must_use]
    pub fn new(session: &'s BrowserSession) -> Self {
        Self {
            base: BasePage::new(session),
        }
    }

    /// Page container and title both visible
    pub async fn is_ready(&self) -> VitrinaResult<bool> {
        Ok(self.base.is_displayed(&Self::PAGE).await?
            && self.base.is_displayed(&Self::TITLE).await?)
    }

    /// Wait for the loading indicator to clear, then for the list or empty state
    pub async fn wait_for_messages(&self) -> VitrinaResult<()> {
        let waiter = self.base.waiter();
        waiter.invisible(&Self::LOADING).await?;
        let css = &format!("{}, {}", Self::LIST.to_css(), Self::EMPTY.to_css());
        let driver = self.base.driver();
        waiter
            .until("message list or empty state", move || async move {
                let matches = driver.query(css).await?;
                Ok(matches.iter().any(|m| m.visible).then_some(()))
            })
            .await
    }

    async fn counter(&self, locator: &Locator) -> VitrinaResult<u32> {
        Ok(self
            .base
            .optional_text(locator)
            .await?
            .and_then(|t| t.trim().parse().ok())
            .unwrap_or(0))
    }

    pub async fn counts(&self) -> VitrinaResult<MessageCounts> {
        Ok(MessageCounts {
            total: self.counter(&Self::TOTAL).await?,
            unread: self.counter(&Self::UNREAD).await?,
            read: self.counter(&Self::READ).await?,
        })
    }

    /// Click export if it renders; returns whether it was clicked
    pub async fn click_export(&self) -> VitrinaResult<bool> {
        if !self.base.is_displayed(&Self::EXPORT).await? {
            return Ok(false);
        }
        self.base.click(&Self::EXPORT).await?;
        Ok(true)
    }

    /// Message cards in the list (the detail pane excluded)
    pub async fn message_count(&self) -> VitrinaResult<usize> {
        let cards = Self::MESSAGE.any().within(&Self::LIST);
        let cards = self.base.optional_elements(&cards).await?;
        Ok(cards
            .iter()
            .filter(|c| c.test_id() != Some("admin-message-detail"))
            .count())
    }

    /// Ids of the listed messages, in list order
    pub async fn message_ids(&self) -> VitrinaResult<Vec<String>> {
        let cards = Self::MESSAGE.any().within(&Self::LIST);
        let cards = self.base.optional_elements(&cards).await?;
        Ok(cards
            .iter()
            .filter_map(ElementSnapshot::test_id)
            .filter(|id| *id != "admin-message-detail")
            .filter_map(|id| id.strip_prefix("admin-message-"))
            .map(str::to_owned)
            .collect())
    }

    /// Open message `id` and wait for the detail pane
    pub async fn select_message(&self, id: &str) -> VitrinaResult<()> {
        self.base.click(&Self::MESSAGE.with(id)).await?;
        self.base.find_visible(&Self::DETAIL).await?;
        Ok(())
    }

    pub async fn retry(&self) -> VitrinaResult<()> {
        self.base.click(&Self::RETRY_BUTTON).await
    }
}

#[async_trait(?Send)]
impl PageObject for AdminMessagesPage<'_> {
    fn url_pattern(&self) -> &str {
        Self::PATH
    }

    fn container(&self) -> Locator {
        Self::PAGE
    }

    fn base(&self) -> &BasePage<'_> {
        &self.base
    }

    fn page_name(&self) -> &str {
        "admin-messages"
    }
}
