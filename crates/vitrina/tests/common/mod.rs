//! In-memory portfolio site shared by the integration tests.
//!
//! Every route renders the test ids the page objects look for, so each
//! registered suite can run end to end against `MockDriverFactory`.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use vitrina::console::BENIGN_404_MESSAGE;
use vitrina::mock::{ClickAction, MockElement, MockPage, MockSite};
use vitrina::{ConsoleEntry, SuiteConfig};

pub const BASE_URL: &str = "http://portfolio.test";

/// Short waits keep absent-element checks fast
pub fn config(screenshots: &Path) -> Arc<SuiteConfig> {
    Arc::new(
        SuiteConfig::default()
            .with_base_url(BASE_URL)
            .with_explicit_wait(Duration::from_millis(400))
            .with_poll_interval(Duration::from_millis(10))
            .with_screenshot_dir(screenshots),
    )
}

fn el(tag: &str, id: &str) -> MockElement {
    MockElement::with_test_id(tag, id)
}

fn text(tag: &str, id: &str, content: &str) -> MockElement {
    el(tag, id).text(content)
}

fn show(id: &str) -> ClickAction {
    ClickAction::Show(format!("[data-testid='{id}']"))
}

fn hide(id: &str) -> ClickAction {
    ClickAction::Hide(format!("[data-testid='{id}']"))
}

fn navigation() -> MockElement {
    el("nav", "navigation-header").children([
        MockElement::new("a").href("/").text("Home"),
        MockElement::new("a").href("/blog").text("Blog"),
        MockElement::new("a").href("/projects").text("Projects"),
        MockElement::new("a").href("/resume").text("Resume"),
    ])
}

// =============================================================================
// HOME
// =============================================================================

fn home() -> MockPage {
    let orbit = el("div", "skill-orbit")
        .visible_between(768, u32::MAX)
        .child(MockElement::new("div").class("orbit-center").text("Core"))
        .children((0..6).map(|i| {
            MockElement::new("button")
                .class("orbit-node")
                .child(MockElement::new("span").class("orbit-label").text(&format!("Skill {i}")))
        }));
    let accordion = MockElement::new("div")
        .class("accordion")
        .visible_between(0, 767)
        .children((0..4).map(|i| {
            MockElement::new("button")
                .class("accordion-item")
                .text(&format!("Area {i}"))
        }));
    let systems = MockElement::new("section")
        .id("systems")
        .children((0..3).map(|i| {
            el("a", "project-card")
                .href(&format!("/projects/system-{i}"))
                .text(&format!("System {i}"))
        }));
    let philosophies = MockElement::new("section")
        .class("philosophies")
        .children((0..3).map(|i| {
            MockElement::new("div")
                .class("philosophy-item")
                .text(&format!("Principle {i}"))
        }))
        .children((0..4).map(|i| {
            MockElement::new("div")
                .class("competency-card")
                .text(&format!("Competency {i}"))
        }));

    MockPage::new("Engineer Dev Mahn X | Portfolio")
        .element(navigation())
        .element(
            MockElement::new("main").children([
                el("section", "hero-section").children([
                    text("h1", "hero-title", "Engineer Dev Mahn X"),
                    MockElement::new("p").class("hero-subtitle").text("Systems, tools and research"),
                    text("button", "explore-work-button", "Explore the Work")
                        .attr("type", "button")
                        .on_click(ClickAction::Navigate("#systems".to_string())),
                    text("a", "contact-button", "Contact / Collaborate").href("/resume"),
                ]),
                orbit,
                accordion,
                systems,
                philosophies,
            ]),
        )
        .console(
            ConsoleEntry::severe(format!("{BENIGN_404_MESSAGE} (Not Found)"))
                .with_source("http://portfolio.test/favicon.ico"),
        )
}

// =============================================================================
// BLOG
// =============================================================================

fn blog() -> MockPage {
    let posts = ["first-post", "second-post", "third-post"];
    MockPage::new("Blog")
        .element(navigation())
        .element(el("div", "blog-container").children([
            text("h1", "blog-title", "Blog"),
            el("div", "blog-filter").children([
                text("button", "blog-filter-tag-rust", "rust").on_click(show("blog-filter-clear")),
                text("button", "blog-filter-tag-testing", "testing").on_click(show("blog-filter-clear")),
                text("button", "blog-filter-clear", "Clear")
                    .hidden()
                    .on_click(hide("blog-filter-clear")),
            ]),
            el("div", "blog-grid").children(posts.iter().enumerate().map(|(i, slug)| {
                el("a", &format!("blog-post-card-{i}"))
                    .href(&format!("/blog/{slug}"))
                    .children([
                        text("h2", &format!("blog-post-title-{i}"), &format!("Post {i}")),
                        text("p", &format!("blog-post-excerpt-{i}"), "An excerpt worth reading."),
                        text("time", &format!("blog-post-date-{i}"), "2024-03-09"),
                    ])
            })),
        ]))
}

fn blog_post() -> MockPage {
    MockPage::new("Post").element(el("article", "blog-post").child(MockElement::new("h1").text("Post")))
}

// =============================================================================
// PROJECTS
// =============================================================================

fn project_card(grid: &str, i: usize) -> MockElement {
    let infix = if grid.is_empty() { String::new() } else { format!("{grid}-") };
    el("a", &format!("project-card-{infix}{i}"))
        .href(&format!("/projects/{infix}{i}"))
        .children([
            text("h3", &format!("project-title-{infix}{i}"), &format!("Project {infix}{i}")),
            text("p", &format!("project-summary-{infix}{i}"), "Does one thing well."),
            el("div", &format!("project-tech-{infix}{i}")).children([
                MockElement::new("span").class("badge").text("Rust"),
                MockElement::new("span").class("badge").text("WASM"),
            ]),
        ])
}

fn projects() -> MockPage {
    MockPage::new("Projects")
        .element(navigation())
        .element(el("div", "projects-container").children([
            text("h1", "projects-title", "Projects"),
            el("input", "projects-search").attr("type", "search"),
            el("div", "projects-filter").children([
                el("div", "projects-filter-category").children([
                    text("button", "projects-filter-category-all", "All"),
                    text("button", "projects-filter-category-tools", "Tools"),
                ]),
                el("div", "projects-filter-tech").children([
                    text("button", "projects-filter-tech-rust", "Rust"),
                    text("button", "projects-filter-tech-python", "Python"),
                ]),
                text("button", "projects-filter-clear", "Clear filters"),
            ]),
            el("div", "projects-featured-grid").children((0..2).map(|i| project_card("featured", i))),
            el("div", "projects-grid").children((0..4).map(|i| project_card("", i))),
        ]))
}

fn project_detail() -> MockPage {
    MockPage::new("Project").element(el("article", "project-detail").child(MockElement::new("h1").text("Project")))
}

// =============================================================================
// CONTACT
// =============================================================================

fn contact() -> MockPage {
    MockPage::new("Contact")
        .element(navigation())
        .element(el("div", "contact-container").children([
            MockElement::new("h1").text("Contact"),
            text("p", "contact-description", "Questions, collaborations, or just hello."),
            el("div", "contact-form-card").children([
                text("h2", "contact-form-title", "Send a message"),
                text("p", "contact-form-subtitle", "Replies within two days"),
                el("form", "contact-form")
                    .on_submit(show("contact-success"))
                    .children([
                        el("input", "contact-input-name").name("name"),
                        el("input", "contact-input-email").name("email").attr("type", "email"),
                        el("input", "contact-input-subject").name("subject"),
                        el("textarea", "contact-input-message").name("message"),
                        text("button", "contact-submit-button", "Send").attr("type", "submit"),
                    ]),
                text("p", "contact-success", "Thanks!").hidden(),
            ]),
            MockElement::new("aside").children([
                text("h2", "contact-methods-title", "Other ways to reach me"),
                text("a", "contact-method-email", "Email").attr("href", "mailto:hello@example.com"),
                text("a", "contact-method-github", "GitHub").attr("href", "https://github.com/"),
                text("a", "contact-method-linkedin", "LinkedIn").attr("href", "https://linkedin.com/"),
            ]),
        ]))
}

// =============================================================================
// RESUME
// =============================================================================

fn resume() -> MockPage {
    let expertise = ["skills", "languages", "frameworks", "tools"];
    MockPage::new("Resume")
        .element(navigation())
        .element(el("div", "resume-container").children([
            el("header", "resume-header").children([
                text("h1", "resume-title", "Dev Mahn X"),
                text("p", "resume-subtitle", "Systems Engineer"),
                text("p", "resume-statement", "I build reliable tools."),
            ]),
            el("div", "resume-expertise-grid").children(
                expertise
                    .iter()
                    .map(|e| el("div", &format!("resume-{e}-card")).class("Card").text(e)),
            ),
            el("div", "resume-experience-list").children((0..2).map(|i| {
                el("div", &format!("resume-experience-{i}"))
                    .child(text("h3", &format!("resume-experience-role-{i}"), "Engineer"))
            })),
            el("div", "resume-projects-grid").children((0..3).map(|i| {
                el("div", &format!("resume-project-{i}")).children([
                    text("h3", &format!("resume-project-name-{i}"), &format!("Tool {i}")),
                    text("p", &format!("resume-project-role-{i}"), "Author"),
                ])
            })),
            el("div", "resume-contact-card").children([
                text("p", "resume-availability", "Open to collaboration"),
                text("a", "resume-github-button", "GitHub").attr("href", "https://github.com/"),
                text("a", "resume-email-button", "Email").attr("href", "mailto:hello@example.com"),
                text("button", "resume-download-button", "Download PDF").attr("type", "button"),
            ]),
        ]))
}

// =============================================================================
// SEARCH
// =============================================================================

fn search() -> MockPage {
    MockPage::new("Search")
        .element(navigation())
        .element(MockElement::new("main").children([
            text("h1", "search-title", "Search"),
            MockElement::new("form")
                .on_submit(show("search-no-results"))
                .children([
                    el("input", "search-input").attr("type", "search"),
                    text("button", "search-button", "Search").attr("type", "submit"),
                ]),
            el("div", "search-suggestions").children([
                text("button", "search-suggestion-rust", "rust"),
                text("button", "search-suggestion-testing", "testing"),
            ]),
            text("p", "search-no-results", "No results found").hidden(),
        ]))
}

// =============================================================================
// OPEN SOURCE
// =============================================================================

fn open_source() -> MockPage {
    MockPage::new("Open Source")
        .element(navigation())
        .element(el("div", "opensource-container").children([
            text("h1", "opensource-title", "Open Source"),
            text("p", "opensource-subtitle", "Tools given back"),
            text("p", "opensource-description", "Libraries and utilities."),
            el("section", "opensource-projects-section").child(
                el("div", "opensource-projects-grid").children(
                    (0..3).map(|i| text("div", &format!("opensource-project-{i}"), &format!("Library {i}"))),
                ),
            ),
            el("section", "opensource-philosophy-section").child(
                el("div", "opensource-philosophy-content").children([
                    text("p", "opensource-philosophy-statement", "Share what you build."),
                    el("ul", "opensource-philosophy-values").children(
                        (0..3).map(|i| text("li", &format!("opensource-value-{i}"), &format!("Value {i}"))),
                    ),
                ]),
            ),
        ]))
}

// =============================================================================
// STATIC PAGES
// =============================================================================

fn static_page(container: &str, title: &str) -> MockPage {
    MockPage::new(title).element(navigation()).element(el("div", container).children([
        MockElement::new("h1").text(title),
        MockElement::new("p").class("text-muted").text("A short description."),
    ]))
}

fn models_3d() -> MockPage {
    MockPage::new("3D Models").element(
        el("div", "3d-models-page").children([
            MockElement::new("h1").text("3D Models"),
            el("div", "models-grid"),
            el("div", "featured-models-grid"),
            el("div", "controls-guide-grid"),
        ]),
    )
}

fn systems() -> MockPage {
    static_page("systems-page", "Systems").element(MockElement::new("div").children([
        text("header", "systems-header", "How it fits together"),
        el("div", "architecture-diagram"),
        el("div", "tech-stack-grid"),
        el("div", "capabilities-grid"),
        el("div", "philosophy-grid"),
    ]))
}

fn splash() -> MockPage {
    MockPage::new("Personal OS").element(el("div", "splash-page").child(
        el("div", "splash-content").children([
            text("h1", "splash-title", "Personal OS"),
            text("a", "splash-enter-button", "Enter").href("/"),
            text("p", "splash-redirect-message", "Redirecting shortly"),
        ]),
    ))
}

// =============================================================================
// CASE STUDIES
// =============================================================================

fn case_studies() -> MockPage {
    MockPage::new("Case Studies").element(navigation()).element(
        el("div", "case-studies-page").children([
            MockElement::new("h1").text("Case Studies"),
            text("p", "case-studies-description", "How problems were solved."),
            el("div", "case-studies-grid").children(["perf-engine", "search-index"].iter().enumerate().map(
                |(i, slug)| {
                    el("div", &format!("case-study-{i}"))
                        .child(MockElement::new("a").href(&format!("/case-studies/{slug}")).text(slug))
                },
            )),
        ]),
    )
}

fn case_study_detail() -> MockPage {
    MockPage::new("Case Study").element(el("article", "case-study-detail-page").children([
        text("section", "case-study-problem", "Latency was too high."),
        text("section", "case-study-solution", "Cache the hot path."),
        text("section", "case-study-results", "p99 halved."),
    ]))
}

// =============================================================================
// ERRORS
// =============================================================================

fn not_found() -> MockPage {
    MockPage::new("404").element(el("div", "404-page").child(MockElement::new("h1").text("Page not found")))
}

fn server_error() -> MockPage {
    MockPage::new("500").element(el("div", "500-page").child(MockElement::new("h1").text("Something broke")))
}

// =============================================================================
// ADMIN
// =============================================================================

fn admin_analytics() -> MockPage {
    MockPage::new("Analytics").element(el("div", "admin-analytics-page").children([
        text("h1", "admin-analytics-title", "Analytics"),
        el("input", "admin-analytics-auth-input").attr("type", "password"),
        text("button", "admin-analytics-tab-stats", "Stats"),
        text("button", "admin-analytics-tab-export", "Export").on_click(show("admin-analytics-export-action")),
        text("button", "admin-analytics-tab-delete", "Delete").on_click(show("admin-analytics-delete-confirm")),
        text("button", "admin-analytics-export-action", "Download CSV").hidden(),
        el("input", "admin-analytics-delete-confirm")
            .attr("type", "checkbox")
            .hidden(),
    ]))
}

fn admin_messages() -> MockPage {
    MockPage::new("Messages").element(el("div", "admin-messages-page").children([
        text("h1", "admin-messages-title", "Messages"),
        text("p", "admin-messages-loading", "Loading...").hidden(),
        text("span", "admin-messages-total", "2"),
        text("span", "admin-messages-unread", "1"),
        text("span", "admin-messages-read", "1"),
        el("ul", "admin-messages-list").children(["a1", "b2"].iter().map(|id| {
            text("li", &format!("admin-message-{id}"), &format!("Message {id}"))
                .on_click(show("admin-message-detail"))
        })),
        text("div", "admin-message-detail", "Full message").hidden(),
    ]))
}

/// The whole portfolio
pub fn portfolio() -> MockSite {
    MockSite::new()
        .route("/", home())
        .route("/blog", blog())
        .route("/blog/*", blog_post())
        .route("/projects", projects())
        .route("/projects/*", project_detail())
        .route("/contact", contact())
        .route("/resume", resume())
        .route("/search", search())
        .route("/open-source", open_source())
        .route("/ai", static_page("ai-page", "AI"))
        .route("/hardware", static_page("hardware-page", "Hardware"))
        .route("/research", static_page("research-page", "Research"))
        .route("/newsletter", static_page("newsletter-page", "Newsletter"))
        .route("/3d-models", models_3d())
        .route("/systems", systems())
        .route("/splash", splash())
        .route("/case-studies", case_studies())
        .route("/case-studies/*", case_study_detail())
        .route("/error", server_error())
        .route("/admin/analytics", admin_analytics())
        .route("/admin/messages", admin_messages())
        .not_found(not_found())
}
