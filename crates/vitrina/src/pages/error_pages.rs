//! Error screens: the not-found page and the runtime error boundary.

use crate::fixture::BrowserSession;
use crate::locator::Locator;
use crate::page::BasePage;
use crate::result::VitrinaResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which error screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorPage {
    /// Rendered for any unknown route
    NotFound,
    /// Error boundary for runtime failures
    ServerError,
}

impl ErrorPage {
    pub const ALL: [Self; 2] = [Self::NotFound, Self::ServerError];

    /// Route that triggers the page
    #[must_use]
    pub const fn trigger_path(self) -> &'static str {
        match self {
            Self::NotFound => "/this-page-does-not-exist-xyz",
            Self::ServerError => "/error",
        }
    }

    /// Container locator
    #[must_use]
    pub const fn container(self) -> Locator {
        match self {
            Self::NotFound => Locator::test_id("404-page"),
            Self::ServerError => Locator::test_id("500-page"),
        }
    }

    /// The other error screen
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::NotFound => Self::ServerError,
            Self::ServerError => Self::NotFound,
        }
    }
}

impl fmt::Display for ErrorPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => f.write_str("404"),
            Self::ServerError => f.write_str("500"),
        }
    }
}

/// Navigates to and inspects the error screens
#[derive(Debug, Clone, Copy)]
pub struct ErrorPages<'s> {
    base: BasePage<'s>,
}

impl<'s> ErrorPages<'s> {
    #[must_use]
    pub fn new(session: &'s BrowserSession) -> Self {
        Self {
            base: BasePage::new(session),
        }
    }

    pub async fn goto(&self, page: ErrorPage) -> VitrinaResult<()> {
        self.base.navigate_to(page.trigger_path()).await
    }

    pub async fn is_displayed(&self, page: ErrorPage) -> VitrinaResult<bool> {
        self.base.is_displayed(&page.container()).await
    }

    /// `page` visible and the other error container not visible
    pub async fn verify_shown(&self, page: ErrorPage) -> VitrinaResult<()> {
        self.base.assert_visible(&page.container()).await?;
        self.base.assert_not_visible(&page.other().container()).await
    }
}
