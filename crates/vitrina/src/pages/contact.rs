//! Contact page (`/contact`): form and contact-method sidebar.

use crate::fixture::BrowserSession;
use crate::locator::{Locator, LocatorTemplate};
use crate::page::{BasePage, PageObject};
use crate::result::VitrinaResult;
use crate::ensure;
use async_trait::async_trait;
use std::fmt;

/// Values of the four contact form fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactForm {
    /// Form with all four values
    #[must_use]
    pub fn new(name: &str, email: &str, subject: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            subject: subject.to_string(),
            message: message.to_string(),
        }
    }
}

/// Entries of the contact-method sidebar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactMethod {
    Email,
    Github,
    Linkedin,
    TwitterX,
}

impl ContactMethod {
    /// Every method, in sidebar order
    pub const ALL: [Self; 4] = [Self::Email, Self::Github, Self::Linkedin, Self::TwitterX];

    /// Test-id suffix
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Github => "github",
            Self::Linkedin => "linkedin",
            Self::TwitterX => "twitter/x",
        }
    }
}

impl fmt::Display for ContactMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Page object for the contact page
#[derive(Debug, Clone, Copy)]
pub struct ContactPage<'s> {
    base: BasePage<'s>,
}

impl<'s> ContactPage<'s> {
    pub const PATH: &'static str = "/contact";

    pub const CONTAINER: Locator = Locator::test_id("contact-container");
    pub const DESCRIPTION: Locator = Locator::test_id("contact-description");
    pub const FORM_TITLE: Locator = Locator::test_id("contact-form-title");
    pub const FORM_SUBTITLE: Locator = Locator::test_id("contact-form-subtitle");
    pub const FORM: Locator = Locator::test_id("contact-form");
    pub const FORM_CARD: Locator = Locator::test_id("contact-form-card");
    pub const METHODS_TITLE: Locator = Locator::test_id("contact-methods-title");

    pub const INPUT_NAME: Locator = Locator::test_id("contact-input-name");
    pub const INPUT_EMAIL: Locator = Locator::test_id("contact-input-email");
    pub const INPUT_SUBJECT: Locator = Locator::test_id("contact-input-subject");
    pub const INPUT_MESSAGE: Locator = Locator::test_id("contact-input-message");
    pub const SUBMIT_BUTTON: Locator = Locator::test_id("contact-submit-button");

    pub const METHOD: LocatorTemplate = LocatorTemplate::test_id("contact-method-{}");

    #[must_use]
    pub fn new(session: &'s BrowserSession) -> Self {
        Self {
            base: BasePage::new(session),
        }
    }

    pub async fn is_container_visible(&self) -> VitrinaResult<bool> {
        self.base.is_displayed(&Self::CONTAINER).await
    }

    pub async fn description(&self) -> VitrinaResult<String> {
        self.base.text_of(&Self::DESCRIPTION).await
    }

    pub async fn form_title(&self) -> VitrinaResult<String> {
        self.base.text_of(&Self::FORM_TITLE).await
    }

    pub async fn is_form_visible(&self) -> VitrinaResult<bool> {
        self.base.is_displayed(&Self::FORM).await
    }

    // -------------------------------------------------------------------------
    // Form
    // -------------------------------------------------------------------------

    pub async fn fill_name(&self, name: &str) -> VitrinaResult<()> {
        self.base.fill_text(&Self::INPUT_NAME, name).await
    }

    pub async fn fill_email(&self, email: &str) -> VitrinaResult<()> {
        self.base.fill_text(&Self::INPUT_EMAIL, email).await
    }

    pub async fn fill_subject(&self, subject: &str) -> VitrinaResult<()> {
        self.base.fill_text(&Self::INPUT_SUBJECT, subject).await
    }

    pub async fn fill_message(&self, message: &str) -> VitrinaResult<()> {
        self.base.fill_text(&Self::INPUT_MESSAGE, message).await
    }

    /// Fill all four fields, replacing what they held
    pub async fn fill_form(&self, form: &ContactForm) -> VitrinaResult<()> {
        self.fill_name(&form.name).await?;
        self.fill_email(&form.email).await?;
        self.fill_subject(&form.subject).await?;
        self.fill_message(&form.message).await
    }

    /// Read the four fields back
    pub async fn form_values(&self) -> VitrinaResult<ContactForm> {
        Ok(ContactForm {
            name: self.base.value_of(&Self::INPUT_NAME).await?,
            email: self.base.value_of(&Self::INPUT_EMAIL).await?,
            subject: self.base.value_of(&Self::INPUT_SUBJECT).await?,
            message: self.base.value_of(&Self::INPUT_MESSAGE).await?,
        })
    }

    pub async fn submit(&self) -> VitrinaResult<()> {
        self.base.click(&Self::SUBMIT_BUTTON).await
    }

    pub async fn is_submit_button_visible(&self) -> VitrinaResult<bool> {
        self.base.is_displayed(&Self::SUBMIT_BUTTON).await
    }

    pub async fn is_submit_button_enabled(&self) -> VitrinaResult<bool> {
        self.base.is_enabled(&Self::SUBMIT_BUTTON).await
    }

    // -------------------------------------------------------------------------
    // Contact methods
    // -------------------------------------------------------------------------

    pub async fn has_contact_method(&self, method: ContactMethod) -> VitrinaResult<bool> {
        self.base.is_present(&Self::METHOD.with(method.key())).await
    }

    /// Methods rendered in the sidebar
    pub async fn available_contact_methods(&self) -> VitrinaResult<Vec<ContactMethod>> {
        let mut available = Vec::new();
        for method in ContactMethod::ALL {
            if self.has_contact_method(method).await? {
                available.push(method);
            }
        }
        Ok(available)
    }

    pub async fn click_contact_method(&self, method: ContactMethod) -> VitrinaResult<()> {
        let locator = Self::METHOD.with(method.key());
        self.base.scroll_to_element(&locator).await?;
        self.base.click(&locator).await
    }

    // -------------------------------------------------------------------------
    // Verification
    // -------------------------------------------------------------------------

    /// Container, form title and form visible
    pub async fn verify_page_loaded(&self) -> VitrinaResult<()> {
        self.base.assert_visible(&Self::CONTAINER).await?;
        self.base.assert_visible(&Self::FORM_TITLE).await?;
        self.base.assert_visible(&Self::FORM).await
    }

    pub async fn verify_all_form_fields_present(&self) -> VitrinaResult<()> {
        for field in [
            Self::INPUT_NAME,
            Self::INPUT_EMAIL,
            Self::INPUT_SUBJECT,
            Self::INPUT_MESSAGE,
        ] {
            self.base.assert_visible(&field).await?;
        }
        Ok(())
    }

    pub async fn verify_contact_methods_sidebar_visible(&self) -> VitrinaResult<()> {
        self.base.assert_visible(&Self::METHODS_TITLE).await
    }

    /// Form title and description render non-empty text
    pub async fn verify_text_content(&self) -> VitrinaResult<()> {
        let title = self.form_title().await?;
        ensure!(!title.trim().is_empty(), "Contact form title is empty");
        let description = self.description().await?;
        ensure!(!description.trim().is_empty(), "Contact description is empty");
        Ok(())
    }
}

#[async_trait(?Send)]
impl PageObject for ContactPage<'_> {
    fn url_pattern(&self) -> &str {
        Self::PATH
    }

    fn container(&self) -> Locator {
        Self::CONTAINER
    }

    fn base(&self) -> &BasePage<'_> {
        &self.base
    }

    fn page_name(&self) -> &str {
        "contact"
    }
}
