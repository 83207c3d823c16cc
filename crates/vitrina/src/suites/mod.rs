//! Registered suites: the end-to-end test modules as library code.
//!
//! Each submodule exposes `NAME` and `suite()`. Cases are plain
//! `async fn(&BrowserSession) -> VitrinaResult<()>` bodies wrapped with
//! [`case!`](crate::case), so the CLI and the integration tests run the same code.

pub mod admin;
pub mod blog;
pub mod case_studies;
pub mod contact;
pub mod error_pages;
pub mod open_source;
pub mod projects;
pub mod resume;
pub mod search;
pub mod smoke;
pub mod static_pages;

use crate::harness::TestSuite;

/// Every suite, in run order
#[must_use]
pub fn registry() -> Vec<TestSuite> {
    vec![
        smoke::suite(),
        blog::suite(),
        projects::suite(),
        contact::suite(),
        resume::suite(),
        search::suite(),
        open_source::suite(),
        static_pages::suite(),
        case_studies::suite(),
        error_pages::suite(),
        admin::suite(),
    ]
}

/// Registered suite names, in run order
#[must_use]
pub fn names() -> Vec<String> {
    registry().into_iter().map(|s| s.name).collect()
}

/// The suite called `name`
#[must_use]
pub fn find(name: &str) -> Option<TestSuite> {
    registry().into_iter().find(|s| s.name == name)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::harness::Marker;
    use std::collections::HashSet;

    mod registry_tests {
        use super::*;

        #[test]
        fn test_names_unique() {
            let names = names();
            let unique: HashSet<_> = names.iter().collect();
            assert_eq!(unique.len(), names.len());
            assert_eq!(names[0], "smoke");
        }

        #[test]
        fn test_case_names_unique_per_suite() {
            for suite in registry() {
                let unique: HashSet<_> = suite.tests.iter().map(|t| t.name).collect();
                assert_eq!(unique.len(), suite.test_count(), "duplicate in {}", suite.name);
            }
        }

        #[test]
        fn test_smoke_cases_marked() {
            let smoke = find("smoke").unwrap();
            assert!(smoke.tests.iter().all(|t| t.marker == Marker::Smoke));
        }

        #[test]
        fn test_environmental_skips() {
            let errors = find("error_pages").unwrap();
            assert!(errors.case("server_error_page_rendered").unwrap().skip.is_some());
            assert!(errors.case("not_found_page_rendered").unwrap().skip.is_none());

            let admin = find("admin").unwrap();
            let skipped = admin.tests.iter().filter(|t| t.skip.is_some()).count();
            assert_eq!(skipped, 2);
            assert!(find("nope").is_none());
        }
    }
}
