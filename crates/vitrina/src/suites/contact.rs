//! Contact page: form round trip, contact methods, submit control and layout.

use crate::case;
use crate::config::Viewport;
use crate::data;
use crate::ensure;
use crate::fixture::BrowserSession;
use crate::harness::TestSuite;
use crate::page::PageObject;
use crate::pages::{ContactMethod, ContactPage};
use crate::result::VitrinaResult;

pub const NAME: &str = "contact";

/// Suite registration
#[must_use]
pub fn suite() -> TestSuite {
    TestSuite::new(NAME)
        .with_test(case!(contact_page_loads).critical())
        .with_test(case!(contact_form_visible))
        .with_test(case!(all_form_fields_present))
        .with_test(case!(form_fields_accept_input))
        .with_test(case!(form_accepts_edge_case_values).edge_case())
        .with_test(case!(contact_methods_sidebar_visible))
        .with_test(case!(contact_methods_available))
        .with_test(case!(email_contact_method_clickable))
        .with_test(case!(submit_button_visible))
        .with_test(case!(submit_button_enabled))
        .with_test(case!(contact_layout_desktop))
        .with_test(case!(contact_layout_mobile))
        .with_test(case!(page_text_is_visible))
}

async fn loaded(session: &BrowserSession) -> VitrinaResult<ContactPage<'_>> {
    let contact = ContactPage::new(session);
    contact.load().await?;
    Ok(contact)
}

async fn contact_page_loads(session: &BrowserSession) -> VitrinaResult<()> {
    loaded(session).await?.verify_page_loaded().await
}

async fn contact_form_visible(session: &BrowserSession) -> VitrinaResult<()> {
    let contact = loaded(session).await?;
    ensure!(contact.is_container_visible().await?, "Contact container not visible");
    ensure!(contact.is_form_visible().await?, "Contact form not visible");
    Ok(())
}

async fn all_form_fields_present(session: &BrowserSession) -> VitrinaResult<()> {
    loaded(session).await?.verify_all_form_fields_present().await
}

async fn form_fields_accept_input(session: &BrowserSession) -> VitrinaResult<()> {
    let contact = loaded(session).await?;
    let written = data::round_trip_contact_form();
    contact.fill_form(&written).await?;
    let read = contact.form_values().await?;
    ensure!(read == written, "Form read back {read:?}, wrote {written:?}");
    Ok(())
}

async fn form_accepts_edge_case_values(session: &BrowserSession) -> VitrinaResult<()> {
    let contact = loaded(session).await?;
    for (label, value) in data::FORM_EDGE_CASES {
        contact.fill_subject(value).await?;
        let read = contact.form_values().await?.subject;
        ensure!(read == value, "{label}: subject read back '{read}'");
    }
    Ok(())
}

async fn contact_methods_sidebar_visible(session: &BrowserSession) -> VitrinaResult<()> {
    loaded(session).await?.verify_contact_methods_sidebar_visible().await
}

async fn contact_methods_available(session: &BrowserSession) -> VitrinaResult<()> {
    let methods = loaded(session).await?.available_contact_methods().await?;
    ensure!(!methods.is_empty(), "No contact methods rendered");
    Ok(())
}

async fn email_contact_method_clickable(session: &BrowserSession) -> VitrinaResult<()> {
    let contact = loaded(session).await?;
    let methods = contact.available_contact_methods().await?;
    ensure!(!methods.is_empty(), "No contact methods rendered");
    if methods.contains(&ContactMethod::Email) {
        contact.click_contact_method(ContactMethod::Email).await?;
    }
    Ok(())
}

async fn submit_button_visible(session: &BrowserSession) -> VitrinaResult<()> {
    let contact = loaded(session).await?;
    ensure!(contact.is_submit_button_visible().await?, "Submit button not visible");
    Ok(())
}

async fn submit_button_enabled(session: &BrowserSession) -> VitrinaResult<()> {
    let contact = loaded(session).await?;
    ensure!(contact.is_submit_button_enabled().await?, "Submit button disabled");
    Ok(())
}

async fn contact_layout_desktop(session: &BrowserSession) -> VitrinaResult<()> {
    let contact = ContactPage::new(session);
    contact.base().set_viewport(Viewport::DESKTOP).await?;
    contact.load().await?;
    contact.verify_page_loaded().await?;
    contact.verify_contact_methods_sidebar_visible().await
}

async fn contact_layout_mobile(session: &BrowserSession) -> VitrinaResult<()> {
    let contact = ContactPage::new(session);
    contact.base().set_viewport(Viewport::MOBILE).await?;
    contact.load().await?;
    contact.verify_page_loaded().await?;
    contact.verify_all_form_fields_present().await
}

async fn page_text_is_visible(session: &BrowserSession) -> VitrinaResult<()> {
    loaded(session).await?.verify_text_content().await
}
