//! Concrete page objects, one per application screen.
//!
//! Every page wraps a [`BasePage`](crate::page::BasePage), declares its locators as
//! associated constants and implements [`PageObject`](crate::page::PageObject) for
//! its path and container. Indexed accessors build their locator from a
//! [`LocatorTemplate`](crate::locator::LocatorTemplate); an index past the rendered
//! items is a not-found failure, never another item's data.

pub mod admin;
pub mod blog;
pub mod case_studies;
pub mod contact;
pub mod error_pages;
pub mod home;
pub mod open_source;
pub mod projects;
pub mod resume;
pub mod search;
pub mod static_pages;

pub use admin::{AdminAnalyticsPage, AdminMessagesPage, MessageCounts};
pub use blog::BlogPage;
pub use case_studies::{CaseStudiesPage, CaseStudyDetailPage};
pub use contact::{ContactForm, ContactMethod, ContactPage};
pub use error_pages::{ErrorPage, ErrorPages};
pub use home::HomePage;
pub use open_source::OpenSourcePage;
pub use projects::{ProjectGrid, ProjectsPage};
pub use resume::ResumePage;
pub use search::{SearchPage, SearchState};
pub use static_pages::{StaticPage, StaticPageKind};

use crate::driver::ElementSnapshot;

/// Rendered text of each element
pub(crate) fn texts(elements: &[ElementSnapshot]) -> Vec<String> {
    elements.iter().map(|e| e.text.clone()).collect()
}

/// Test id is `prefix` followed by digits only (`resume-project-3`, not
/// `resume-project-name-3`)
pub(crate) fn is_numbered(element: &ElementSnapshot, prefix: &str) -> bool {
    element
        .test_id()
        .and_then(|id| id.strip_prefix(prefix))
        .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn with_test_id(id: &str) -> ElementSnapshot {
        let mut attributes = BTreeMap::new();
        attributes.insert("data-testid".to_string(), id.to_string());
        ElementSnapshot {
            attributes,
            ..ElementSnapshot::default()
        }
    }

    mod numbered_tests {
        use super::*;

        #[test]
        fn test_numeric_suffix_only() {
            assert!(is_numbered(&with_test_id("resume-project-0"), "resume-project-"));
            assert!(is_numbered(&with_test_id("resume-project-12"), "resume-project-"));
            assert!(!is_numbered(&with_test_id("resume-project-name-0"), "resume-project-"));
            assert!(!is_numbered(&with_test_id("resume-project-"), "resume-project-"));
            assert!(!is_numbered(&ElementSnapshot::default(), "resume-project-"));
        }
    }
}
