//! Mostly-static content pages sharing one shape: a container, an `h1` title and
//! an optional muted description. A few carry extra sections of their own.

use crate::ensure;
use crate::fixture::BrowserSession;
use crate::locator::Locator;
use crate::page::{BasePage, PageObject};
use crate::result::VitrinaResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Which static page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StaticPageKind {
    Ai,
    Hardware,
    Research,
    Newsletter,
    Models3d,
    Systems,
    Splash,
}

impl StaticPageKind {
    pub const ALL: [Self; 7] = [
        Self::Ai,
        Self::Hardware,
        Self::Research,
        Self::Newsletter,
        Self::Models3d,
        Self::Systems,
        Self::Splash,
    ];

    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Ai => "/ai",
            Self::Hardware => "/hardware",
            Self::Research => "/research",
            Self::Newsletter => "/newsletter",
            Self::Models3d => "/3d-models",
            Self::Systems => "/systems",
            Self::Splash => "/splash",
        }
    }

    /// Test id of the page container
    #[must_use]
    pub const fn container_id(self) -> &'static str {
        match self {
            Self::Ai => "ai-page",
            Self::Hardware => "hardware-page",
            Self::Research => "research-page",
            Self::Newsletter => "newsletter-page",
            Self::Models3d => "3d-models-page",
            Self::Systems => "systems-page",
            Self::Splash => "splash-page",
        }
    }

    /// The 3D viewer loads its models before rendering anything
    #[must_use]
    pub const fn load_timeout(self) -> Option<Duration> {
        match self {
            Self::Models3d => Some(Duration::from_secs(20)),
            _ => None,
        }
    }

    /// Sections that must render besides the container
    #[must_use]
    pub const fn sections(self) -> &'static [Locator] {
        match self {
            Self::Models3d => MODELS_SECTIONS,
            Self::Systems => SYSTEMS_SECTIONS,
            Self::Splash => SPLASH_SECTIONS,
            Self::Ai | Self::Hardware | Self::Research | Self::Newsletter => &[],
        }
    }
}

const MODELS_SECTIONS: &[Locator] = &[
    Locator::test_id("models-grid"),
    Locator::test_id("featured-models-grid"),
    Locator::test_id("controls-guide-grid"),
];

const SYSTEMS_SECTIONS: &[Locator] = &[
    Locator::test_id("systems-header"),
    Locator::test_id("architecture-diagram"),
    Locator::test_id("tech-stack-grid"),
    Locator::test_id("capabilities-grid"),
    Locator::test_id("philosophy-grid"),
];

const SPLASH_SECTIONS: &[Locator] = &[
    Locator::test_id("splash-content"),
    Locator::test_id("splash-title"),
    Locator::test_id("splash-enter-button"),
];

impl fmt::Display for StaticPageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path().trim_start_matches('/'))
    }
}

/// Page object for one static page
#[derive(Debug, Clone, Copy)]
pub struct StaticPage<'s> {
    base: BasePage<'s>,
    kind: StaticPageKind,
}

impl<'s> StaticPage<'s> {
    pub const TITLE: Locator = Locator::tag("h1");
    pub const DESCRIPTION: Locator = Locator::css("p[class*='muted']");

    pub const SPLASH_TITLE: Locator = Locator::test_id("splash-title");
    pub const SPLASH_ENTER: Locator = Locator::test_id("splash-enter-button");
    pub const SPLASH_REDIRECT: Locator = Locator::test_id("splash-redirect-message");

    #[must_use]
    pub fn new(session: &'s BrowserSession, kind: StaticPageKind) -> Self {
        let base = BasePage::new(session);
        let base = match kind.load_timeout() {
            Some(timeout) => base.with_timeout(timeout),
            None => base,
        };
        Self { base, kind }
    }

    #[must_use]
    pub const fn kind(&self) -> StaticPageKind {
        self.kind
    }

    pub async fn title(&self) -> VitrinaResult<String> {
        self.base
            .text_of(&Self::TITLE.within(&self.container()))
            .await
    }

    pub async fn description(&self) -> VitrinaResult<Option<String>> {
        self.base
            .optional_text(&Self::DESCRIPTION.within(&self.container()))
            .await
    }

    /// Container present in the DOM (the 3D page renders its canvas before
    /// the container becomes visible)
    pub async fn is_present(&self) -> VitrinaResult<bool> {
        self.base.is_present(&self.container()).await
    }

    // -------------------------------------------------------------------------
    // Verification
    // -------------------------------------------------------------------------

    /// Container rendered plus a non-empty title
    pub async fn verify_page_loaded(&self) -> VitrinaResult<()> {
        if self.kind == StaticPageKind::Models3d {
            self.base.assert_present(&self.container()).await?;
        } else {
            self.base.assert_visible(&self.container()).await?;
        }
        let title = self.title().await?;
        ensure!(!title.trim().is_empty(), "{} page has an empty title", self.kind);
        Ok(())
    }

    /// Every page-specific section is rendered
    pub async fn verify_sections(&self) -> VitrinaResult<()> {
        for section in self.kind.sections() {
            self.base.assert_present(section).await?;
        }
        Ok(())
    }

    /// Splash title reads `expected`; enter button and redirect notice visible
    pub async fn verify_splash(&self, expected: &str) -> VitrinaResult<()> {
        ensure!(
            self.kind == StaticPageKind::Splash,
            "verify_splash called on the {} page",
            self.kind
        );
        self.base.assert_text_equals(&Self::SPLASH_TITLE, expected).await?;
        self.base.assert_visible(&Self::SPLASH_ENTER).await?;
        self.base.assert_visible(&Self::SPLASH_REDIRECT).await
    }

    /// Click enter and wait for the redirect away from the splash URL
    pub async fn enter_from_splash(&self) -> VitrinaResult<String> {
        let before = self.base.current_url().await?;
        self.base.click(&Self::SPLASH_ENTER).await?;
        self.base.waiter().url_changes(&before).await
    }
}

#[async_trait(?Send)]
impl PageObject for StaticPage<'_> {
    fn url_pattern(&self) -> &str {
        self.kind.path()
    }

    fn container(&self) -> Locator {
        Locator::test_id(self.kind.container_id())
    }

    fn base(&self) -> &BasePage<'_> {
        &self.base
    }

    fn page_name(&self) -> &str {
        self.kind.container_id()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod kind_tests {
        use super::*;

        #[test]
        fn test_paths_and_ids_are_distinct() {
            let paths: std::collections::HashSet<_> =
                StaticPageKind::ALL.iter().map(|k| k.path()).collect();
            let ids: std::collections::HashSet<_> =
                StaticPageKind::ALL.iter().map(|k| k.container_id()).collect();
            assert_eq!(paths.len(), StaticPageKind::ALL.len());
            assert_eq!(ids.len(), StaticPageKind::ALL.len());
        }

        #[test]
        fn test_only_models_have_a_long_timeout() {
            assert_eq!(
                StaticPageKind::Models3d.load_timeout(),
                Some(Duration::from_secs(20))
            );
            assert!(StaticPageKind::Ai.load_timeout().is_none());
        }

        #[test]
        fn test_display_drops_slash() {
            assert_eq!(StaticPageKind::Models3d.to_string(), "3d-models");
        }
    }
}
