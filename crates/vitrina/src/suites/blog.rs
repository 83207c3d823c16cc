//! Blog index: posts, metadata, filters, navigation and layout.

use crate::case;
use crate::config::Viewport;
use crate::ensure;
use crate::fixture::BrowserSession;
use crate::harness::TestSuite;
use crate::page::{BasePage, PageObject};
use crate::pages::BlogPage;
use crate::result::VitrinaResult;

pub const NAME: &str = "blog";

/// Suite registration
#[must_use]
pub fn suite() -> TestSuite {
    TestSuite::new(NAME)
        .with_test(case!(blog_page_loads).critical())
        .with_test(case!(blog_grid_visible))
        .with_test(case!(blog_posts_have_metadata))
        .with_test(case!(blog_posts_clickable))
        .with_test(case!(blog_filter_controls_present))
        .with_test(case!(blog_filter_functionality))
        .with_test(case!(blog_accessible_from_navigation))
        .with_test(case!(blog_no_console_errors))
        .with_test(case!(blog_responsive_desktop))
        .with_test(case!(blog_responsive_mobile))
}

async fn loaded(session: &BrowserSession) -> VitrinaResult<BlogPage<'_>> {
    let blog = BlogPage::new(session);
    blog.load().await?;
    Ok(blog)
}

async fn blog_page_loads(session: &BrowserSession) -> VitrinaResult<()> {
    let blog = loaded(session).await?;
    blog.base().assert_visible(&BlogPage::CONTAINER).await?;
    blog.base().assert_visible(&BlogPage::TITLE).await?;
    let title = blog.title_text().await?;
    ensure!(!title.trim().is_empty(), "Blog title is empty");
    Ok(())
}

async fn blog_grid_visible(session: &BrowserSession) -> VitrinaResult<()> {
    let blog = loaded(session).await?;
    blog.verify_page_loaded().await?;
    blog.verify_posts_visible().await
}

async fn blog_posts_have_metadata(session: &BrowserSession) -> VitrinaResult<()> {
    loaded(session).await?.verify_post_has_metadata(0).await
}

async fn blog_posts_clickable(session: &BrowserSession) -> VitrinaResult<()> {
    let blog = loaded(session).await?;
    let url = blog.click_post(0).await?;
    ensure!(url.contains("/blog/"), "Not on blog post page: {url}");
    Ok(())
}

async fn blog_filter_controls_present(session: &BrowserSession) -> VitrinaResult<()> {
    loaded(session).await?.verify_filter_controls().await
}

async fn blog_filter_functionality(session: &BrowserSession) -> VitrinaResult<()> {
    let blog = loaded(session).await?;
    let initial = blog.post_count().await?;
    ensure!(initial > 0, "No initial posts found");

    if blog.click_first_filter().await? && blog.is_filter_clear_visible().await? {
        blog.click_filter_clear().await?;
    }
    let after = blog.post_count().await?;
    ensure!(after > 0, "No posts after clearing filters");
    Ok(())
}

async fn blog_accessible_from_navigation(session: &BrowserSession) -> VitrinaResult<()> {
    let page = BasePage::new(session);
    page.navigate_home().await?;
    if !page.is_displayed(&BlogPage::NAV_LINK).await? {
        // Navigation variants without a blog link have nothing to check
        return Ok(());
    }
    page.click(&BlogPage::NAV_LINK).await?;
    page.wait_for_route_change("/blog").await?;
    page.assert_visible(&BlogPage::CONTAINER).await
}

async fn blog_no_console_errors(session: &BrowserSession) -> VitrinaResult<()> {
    loaded(session).await?.base().assert_no_console_errors().await
}

async fn blog_responsive_desktop(session: &BrowserSession) -> VitrinaResult<()> {
    responsive(session, Viewport::DESKTOP).await
}

async fn blog_responsive_mobile(session: &BrowserSession) -> VitrinaResult<()> {
    responsive(session, Viewport::MOBILE).await
}

async fn responsive(session: &BrowserSession, viewport: Viewport) -> VitrinaResult<()> {
    let blog = BlogPage::new(session);
    blog.base().set_viewport(viewport).await?;
    blog.load().await?;
    blog.base().assert_visible(&BlogPage::CONTAINER).await?;
    let posts = blog.post_count().await?;
    ensure!(posts > 0, "No posts visible at {viewport}");
    Ok(())
}
