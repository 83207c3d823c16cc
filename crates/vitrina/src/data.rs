//! Shared test inputs: form fixtures, search queries, expected copy and minimum
//! counts used by the suites.

use crate::pages::ContactForm;

// =============================================================================
// CONTACT FORM
// =============================================================================

/// A complete, valid submission
#[must_use]
pub fn valid_contact_form() -> ContactForm {
    ContactForm::new(
        "John Doe",
        "john.doe@example.com",
        "Test Message",
        "This is a test message from the E2E test suite.",
    )
}

/// Everything valid except the email
#[must_use]
pub fn invalid_email_contact_form() -> ContactForm {
    ContactForm::new("Jane Doe", "not-an-email", "Test", "Message")
}

/// All fields empty
#[must_use]
pub fn empty_contact_form() -> ContactForm {
    ContactForm::default()
}

/// Values the round-trip case writes and reads back
#[must_use]
pub fn round_trip_contact_form() -> ContactForm {
    ContactForm::new(
        "Test User",
        "test@example.com",
        "Test Subject",
        "This is a test message with enough characters",
    )
}

/// Awkward field values: (name, value)
pub const FORM_EDGE_CASES: [(&str, &str); 6] = [
    ("special_chars", "Test @#$%^&*() Message"),
    ("unicode", "Test メッセージ 🎉"),
    ("sql_injection", "'; DROP TABLE--"),
    ("html_injection", "<script>alert('xss')</script>"),
    ("whitespace_only", "   "),
    ("single_char", "A"),
];

/// A 1000-character field value
#[must_use]
pub fn long_text() -> String {
    "A".repeat(1000)
}

// =============================================================================
// SEARCH
// =============================================================================

pub const SEARCH_BLOG_QUERIES: [&str; 3] = ["blog", "post", "article"];
pub const SEARCH_PROJECT_QUERIES: [&str; 3] = ["project", "work", "portfolio"];
pub const SEARCH_NONEXISTENT_QUERIES: [&str; 3] = ["xyzabc", "nosuchpage", "invalid_query_12345"];

/// A query no content can match: `noresults-` plus a random-ish suffix
#[must_use]
pub fn unmatched_query() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| d.subsec_nanos());
    format!("noresults-{nanos:08x}")
}

// =============================================================================
// EXPECTED CONTENT
// =============================================================================

pub const HERO_TITLE: &str = "Engineer Dev Mahn X";
pub const EXPLORE_BUTTON_TEXT: &str = "Explore the Work";
pub const CONTACT_BUTTON_TEXT: &str = "Contact / Collaborate";
pub const SPLASH_TITLE: &str = "Personal OS";
pub const ADMIN_DUMMY_TOKEN: &str = "dummy-token";

/// Minimum counts the home page renders
pub const MIN_FEATURED_PROJECTS: usize = 3;
pub const MIN_PHILOSOPHY_ITEMS: usize = 3;

// =============================================================================
// RESPONSIVE BREAKPOINTS
// =============================================================================

/// Named widths in pixels, narrowest first
pub const BREAKPOINTS: [(&str, u32); 7] = [
    ("mobile_small", 320),
    ("mobile", 375),
    ("mobile_large", 425),
    ("tablet", 768),
    ("laptop", 1024),
    ("desktop", 1280),
    ("large_desktop", 1920),
];

/// Width of the named breakpoint
#[must_use]
pub fn breakpoint(name: &str) -> Option<u32> {
    BREAKPOINTS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, width)| *width)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod data_tests {
        use super::*;

        #[test]
        fn test_unmatched_query_prefix() {
            let query = unmatched_query();
            assert!(query.starts_with("noresults-"));
            assert!(query.len() > "noresults-".len());
        }

        #[test]
        fn test_breakpoints_sorted() {
            assert!(BREAKPOINTS.windows(2).all(|w| w[0].1 < w[1].1));
            assert_eq!(breakpoint("laptop"), Some(1024));
            assert_eq!(breakpoint("watch"), None);
        }

        #[test]
        fn test_long_text_length() {
            assert_eq!(long_text().chars().count(), 1000);
        }

        #[test]
        fn test_valid_form_fields_non_empty() {
            let form = valid_contact_form();
            assert!(!form.name.is_empty() && form.email.contains('@'));
            assert!(!invalid_email_contact_form().email.contains('@'));
            assert_eq!(empty_contact_form(), ContactForm::default());
        }
    }
}
