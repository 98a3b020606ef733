// Legal content endpoints

use reqwest::Method;
use tracing::debug;

use crate::client::AdminClient;
use crate::error::Error;
use crate::models::{LegalPageBody, LegalRecord};

impl AdminClient {
    /// `GET /legal` → `LegalContent[]`
    ///
    /// Sends the bearer token when signed in; the public site reads the
    /// same endpoint anonymously.
    pub async fn list_legal_pages(&self) -> Result<Vec<LegalRecord>, Error> {
        let builder = self.optionally_authorized(Method::GET, &["legal"])?;
        let resp = self.send(builder).await?;
        let pages: Vec<LegalRecord> = self.handle_response(resp).await?;
        debug!(count = pages.len(), "fetched legal pages");
        Ok(pages)
    }

    /// `POST /legal` with `{title, content, language, pageTitle}`
    pub async fn create_legal_page(&self, body: &LegalPageBody) -> Result<LegalRecord, Error> {
        debug!(page_title = %body.page_title, "creating legal page");
        self.post(&["legal"], body).await
    }

    /// `PATCH /legal/{id}` with `{content, title, pageTitle, language}`
    pub async fn update_legal_page(
        &self,
        id: &str,
        body: &LegalPageBody,
    ) -> Result<LegalRecord, Error> {
        debug!(id, "updating legal page");
        self.patch(&["legal", id], body).await
    }
}
