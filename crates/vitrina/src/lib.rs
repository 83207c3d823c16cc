//! Vitrina: page-object end-to-end suite for the portfolio web app
//!
//! Vitrina drives a real browser (Chromium over CDP, or any W3C WebDriver
//! endpoint) against a running deployment of the portfolio site and checks every
//! screen through typed page objects.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                     VITRINA Architecture                         │
//! ├──────────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐   ┌──────────────┐   ┌──────────┐   ┌──────────┐  │
//! │  │ suites    │──►│ pages        │──►│ BasePage │──►│ Waiter   │  │
//! │  │ (cases)   │   │ (per screen) │   │          │   │          │  │
//! │  └─────┬─────┘   └──────────────┘   └────┬─────┘   └────┬─────┘  │
//! │        │ TestHarness                     ▼              ▼        │
//! │        ▼                          ┌────────────────────────────┐ │
//! │  ┌───────────────┐                │ BrowserDriver              │ │
//! │  │SessionFixture │───────────────►│ Chromium │ WebDriver │Mock │ │
//! │  └───────────────┘                └────────────────────────────┘ │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Configuration is resolved once into an immutable [`SuiteConfig`] and shared by
//! every session. Waits poll a predicate; nothing sleeps for a fixed time.
//!
//! ```ignore
//! use std::sync::Arc;
//! use vitrina::{LiveDriverFactory, SessionFixture, SuiteConfig, TestHarness};
//!
//! let config = Arc::new(SuiteConfig::from_env()?);
//! let factory = LiveDriverFactory::new();
//! let fixture = SessionFixture::new(&factory, config);
//! let results = TestHarness::new().run(&vitrina::suites::smoke::suite(), &fixture).await;
//! assert!(results.all_passed());
//! ```

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::large_stack_arrays, clippy::large_stack_frames))]

/// Chromium over CDP
#[cfg(feature = "browser")]
pub mod browser;
pub mod config;
pub mod console;
/// Shared test inputs and expected copy
#[allow(missing_docs)]
pub mod data;
pub mod driver;
pub mod fixture;
pub mod harness;
pub mod locator;
/// In-memory browser
#[allow(clippy::missing_errors_doc)]
pub mod mock;
#[allow(clippy::missing_errors_doc)]
pub mod page;
/// Page objects
#[allow(missing_docs, clippy::missing_errors_doc)]
pub mod pages;
pub mod presence;
pub mod result;
/// Page scripts evaluated by the live backends
pub mod script;
/// Registered suites
#[allow(missing_docs)]
pub mod suites;
pub mod wait;
/// W3C WebDriver
#[cfg(feature = "webdriver")]
pub mod webdriver;

#[cfg(feature = "browser")]
pub use browser::ChromiumDriver;
pub use config::{BrowserKind, ConfigOverrides, SuiteConfig, Viewport};
pub use console::{ConsoleEntry, ConsoleFilter, LogLevel};
pub use driver::{BrowserDriver, DriverFactory, ElementRef, ElementSnapshot, Key, LiveDriverFactory};
pub use fixture::{BrowserSession, CaseBody, CaseFuture, FailureArtifacts, FixtureOutcome, SessionFixture};
pub use harness::{
    Marker, Outcome, RunReport, Selection, SuiteResults, TestCase, TestHarness, TestResult, TestSuite,
};
pub use locator::{Locator, LocatorTemplate};
pub use mock::{MockDriver, MockDriverFactory};
pub use page::{BasePage, PageObject};
pub use presence::Presence;
pub use result::{ErrorCategory, VitrinaError, VitrinaResult};
#[cfg(feature = "webdriver")]
pub use webdriver::WebDriverDriver;
pub use wait::{WaitOptions, Waiter};
