//! Smoke run against a real deployment.
//!
//! Needs a reachable app (`BASE_URL`) and a browser; run with
//! `cargo test -p vitrina --test live_tests -- --ignored`.

#![cfg(feature = "browser")]

use std::sync::Arc;
use vitrina::{suites, LiveDriverFactory, SessionFixture, SuiteConfig, TestHarness};

#[tokio::test]
#[ignore = "requires a running application and chromium"]
async fn test_live_smoke_suite() {
    let config = Arc::new(SuiteConfig::from_env().unwrap());
    let factory = LiveDriverFactory::new();
    let fixture = SessionFixture::new(&factory, config);

    let results = TestHarness::new()
        .run(&suites::smoke::suite(), &fixture)
        .await;

    assert!(results.all_passed(), "{:#?}", results.failures());
}
