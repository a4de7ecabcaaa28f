use crate::docs::DocRef;
use crate::listing;
use fantoccini::error::CmdError;
use fantoccini::{Client, Locator};
use std::time::Duration;

/// Select element id for the material type dropdown
pub const VIEW_TYPE_SELECT: &str = "MaterialArchive__noTable__sbv__ViewType";
/// Select element id for the year dropdown
pub const YEAR_SELECT: &str = "MaterialArchive__noTable__sbv__YearSelect";
/// Select element id for the certification level dropdown
pub const EXAMINATION_SELECT: &str = "MaterialArchive__noTable__sbv__ExaminationSelect";
/// Select element id for the subject dropdown
pub const SUBJECT_SELECT: &str = "MaterialArchive__noTable__sbv__SubjectSelect";

/// Drives the archive's cascading dropdown form through a WebDriver session.
///
/// The form is a sequential macro: select an option, wait for the dependent
/// dropdowns to repopulate, inspect the new state, repeat. The settle delay
/// between steps is configurable rather than baked in.
pub struct Navigator {
    client: Client,
    settle: Duration,
}

impl Navigator {
    /// Wrap a connected WebDriver client
    pub fn new(client: Client, settle: Duration) -> Self {
        Self { client, settle }
    }

    /// Load the archive page and accept the terms checkbox if present
    pub async fn open_archive(&self, url: &str) -> Result<(), CmdError> {
        ::log::info!("loading archive page: {}", url);
        self.client.goto(url).await?;
        tokio::time::sleep(self.settle).await;
        self.accept_terms().await
    }

    /// Tick the terms-and-conditions checkbox when it is shown unchecked
    async fn accept_terms(&self) -> Result<(), CmdError> {
        match self.client.find(Locator::Css("input[type=\"checkbox\"]")).await {
            Ok(checkbox) => {
                if !checkbox.is_selected().await? {
                    checkbox.click().await?;
                    ::log::info!("accepted terms and conditions");
                    tokio::time::sleep(self.settle).await;
                }
            }
            Err(_) => {
                ::log::debug!("no terms checkbox found on page");
            }
        }
        Ok(())
    }

    /// Select an option by value within the given select element, then wait
    /// for the page to settle
    pub async fn select_value(&self, select_id: &str, value: &str) -> Result<(), CmdError> {
        let selector = format!(
            "select[id=\"{}\"] option[value=\"{}\"]",
            select_id, value
        );
        let option = self.client.find(Locator::Css(&selector)).await?;
        option.click().await?;
        ::log::debug!("selected '{}' in {}", value, select_id);

        // Dependent dropdowns repopulate asynchronously
        tokio::time::sleep(self.settle).await;
        Ok(())
    }

    /// Read the `(value, text)` options currently offered by a dropdown
    pub async fn dropdown_options(&self, select_id: &str) -> Result<Vec<(String, String)>, CmdError> {
        let html = self.client.source().await?;
        Ok(listing::dropdown_options(&html, select_id))
    }

    /// Collect document references from the current results listing
    pub async fn document_links(&self) -> Result<Vec<DocRef>, CmdError> {
        let html = self.client.source().await?;
        let base = self.client.current_url().await?;
        Ok(listing::document_links(&html, &base))
    }

    /// Close the WebDriver session
    pub async fn close(self) -> Result<(), CmdError> {
        self.client.close().await
    }
}
