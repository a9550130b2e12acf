//! Lead endpoints: corporate-cleaning contacts and phone call-backs.

use booking_console_core::{ContactId, PhoneLeadId, PhoneLeadStatus};
use serde_json::json;
use tracing::instrument;

use super::{ApiClient, ApiRequest, ClientError};
use crate::session::SessionCredential;

impl ApiClient {
    /// `GET /contact`
    ///
    /// # Errors
    ///
    /// Returns error if no base URL is configured or the transport fails.
    #[instrument(skip(self, credential))]
    pub async fn list_contacts(
        &self,
        credential: Option<&SessionCredential>,
    ) -> Result<reqwest::Response, ClientError> {
        self.send(ApiRequest::get("/contact").bearer(credential)).await
    }

    /// `DELETE /contact/{id}`
    ///
    /// # Errors
    ///
    /// Returns error if no base URL is configured or the transport fails.
    #[instrument(skip(self, credential), fields(id = %id))]
    pub async fn delete_contact(
        &self,
        credential: Option<&SessionCredential>,
        id: &ContactId,
    ) -> Result<reqwest::Response, ClientError> {
        self.send(ApiRequest::delete(format!("/contact/{id}")).bearer(credential))
            .await
    }

    /// `GET /phone`
    ///
    /// # Errors
    ///
    /// Returns error if no base URL is configured or the transport fails.
    #[instrument(skip(self, credential))]
    pub async fn list_phone_leads(
        &self,
        credential: Option<&SessionCredential>,
    ) -> Result<reqwest::Response, ClientError> {
        self.send(ApiRequest::get("/phone").bearer(credential)).await
    }

    /// `PATCH /phone/{id}` with `{status}`
    ///
    /// # Errors
    ///
    /// Returns error if no base URL is configured or the transport fails.
    #[instrument(skip(self, credential), fields(id = %id, status = %status))]
    pub async fn update_phone_lead_status(
        &self,
        credential: Option<&SessionCredential>,
        id: &PhoneLeadId,
        status: PhoneLeadStatus,
    ) -> Result<reqwest::Response, ClientError> {
        self.send(
            ApiRequest::patch(format!("/phone/{id}"))
                .bearer(credential)
                .json(json!({ "status": status })),
        )
        .await
    }

    /// `DELETE /phone/{id}`
    ///
    /// # Errors
    ///
    /// Returns error if no base URL is configured or the transport fails.
    #[instrument(skip(self, credential), fields(id = %id))]
    pub async fn delete_phone_lead(
        &self,
        credential: Option<&SessionCredential>,
        id: &PhoneLeadId,
    ) -> Result<reqwest::Response, ClientError> {
        self.send(ApiRequest::delete(format!("/phone/{id}")).bearer(credential))
            .await
    }
}
