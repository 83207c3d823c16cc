//! Projects index: grids, metadata, filters, search and navigation.

use crate::case;
use crate::config::Viewport;
use crate::ensure;
use crate::fixture::BrowserSession;
use crate::harness::TestSuite;
use crate::page::PageObject;
use crate::pages::{ProjectGrid, ProjectsPage};
use crate::result::VitrinaResult;

pub const NAME: &str = "projects";

/// Suite registration
#[must_use]
pub fn suite() -> TestSuite {
    TestSuite::new(NAME)
        .with_test(case!(projects_page_loads).critical())
        .with_test(case!(projects_grid_visible))
        .with_test(case!(projects_have_metadata))
        .with_test(case!(project_titles_accessible))
        .with_test(case!(category_filters_available))
        .with_test(case!(technology_filters_available))
        .with_test(case!(clear_filters_button_exists))
        .with_test(case!(search_input_accessible))
        .with_test(case!(search_accepts_input))
        .with_test(case!(projects_page_reachable_by_url))
        .with_test(case!(project_click_navigation))
        .with_test(case!(projects_layout_desktop))
        .with_test(case!(projects_layout_mobile))
}

async fn loaded(session: &BrowserSession) -> VitrinaResult<ProjectsPage<'_>> {
    let projects = ProjectsPage::new(session);
    projects.load().await?;
    Ok(projects)
}

/// Grids that rendered at least one card
async fn populated_grids(projects: &ProjectsPage<'_>) -> VitrinaResult<Vec<ProjectGrid>> {
    let mut grids = Vec::new();
    if projects.featured_project_count().await? > 0 {
        grids.push(ProjectGrid::Featured);
    }
    if projects.project_count().await? > 0 {
        grids.push(ProjectGrid::Main);
    }
    ensure!(!grids.is_empty(), "Neither project grid rendered a card");
    Ok(grids)
}

async fn projects_page_loads(session: &BrowserSession) -> VitrinaResult<()> {
    loaded(session).await?.verify_page_loaded().await
}

async fn projects_grid_visible(session: &BrowserSession) -> VitrinaResult<()> {
    loaded(session).await?.verify_projects_visible().await
}

async fn projects_have_metadata(session: &BrowserSession) -> VitrinaResult<()> {
    let projects = loaded(session).await?;
    for grid in populated_grids(&projects).await? {
        projects.verify_project_has_metadata(grid, 0).await?;
    }
    Ok(())
}

async fn project_titles_accessible(session: &BrowserSession) -> VitrinaResult<()> {
    let projects = loaded(session).await?;
    for grid in populated_grids(&projects).await? {
        let title = projects.project_title(grid, 0).await?.unwrap_or_default();
        ensure!(!title.trim().is_empty(), "First {grid:?} project has no title");
    }
    Ok(())
}

async fn category_filters_available(session: &BrowserSession) -> VitrinaResult<()> {
    let categories = loaded(session).await?.filter_categories().await?;
    ensure!(!categories.is_empty(), "No category filters");
    Ok(())
}

async fn technology_filters_available(session: &BrowserSession) -> VitrinaResult<()> {
    let techs = loaded(session).await?.filter_technologies().await?;
    ensure!(!techs.is_empty(), "No technology filters");
    Ok(())
}

async fn clear_filters_button_exists(session: &BrowserSession) -> VitrinaResult<()> {
    let projects = loaded(session).await?;
    projects.base().assert_present(&ProjectsPage::FILTER_CLEAR).await
}

async fn search_input_accessible(session: &BrowserSession) -> VitrinaResult<()> {
    let projects = loaded(session).await?;
    ensure!(projects.is_search_visible().await?, "Project search not visible");
    Ok(())
}

async fn search_accepts_input(session: &BrowserSession) -> VitrinaResult<()> {
    let projects = loaded(session).await?;
    projects.search("design").await?;
    let value = projects.search_value().await?;
    ensure!(value == "design", "Search field holds '{value}'");
    Ok(())
}

async fn projects_page_reachable_by_url(session: &BrowserSession) -> VitrinaResult<()> {
    let projects = loaded(session).await?;
    let url = projects.base().current_url().await?;
    ensure!(url.ends_with(ProjectsPage::PATH), "Unexpected URL {url}");
    Ok(())
}

async fn project_click_navigation(session: &BrowserSession) -> VitrinaResult<()> {
    let projects = loaded(session).await?;
    let grid = populated_grids(&projects).await?[0];
    let url = projects.click_project(grid, 0).await?;
    ensure!(url.contains("/projects/"), "Not on a project page: {url}");
    Ok(())
}

async fn projects_layout_desktop(session: &BrowserSession) -> VitrinaResult<()> {
    layout(session, Viewport::DESKTOP).await
}

async fn projects_layout_mobile(session: &BrowserSession) -> VitrinaResult<()> {
    layout(session, Viewport::MOBILE).await
}

async fn layout(session: &BrowserSession, viewport: Viewport) -> VitrinaResult<()> {
    let projects = ProjectsPage::new(session);
    projects.base().set_viewport(viewport).await?;
    projects.load().await?;
    projects.verify_page_loaded().await?;
    projects.verify_projects_visible().await
}
