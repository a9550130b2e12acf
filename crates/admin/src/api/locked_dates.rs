//! Locked-date endpoints, one calendar per service line.

use booking_console_core::{CivilDate, ServiceLine};
use serde_json::json;
use tracing::instrument;

use super::{ApiClient, ApiRequest, ClientError};
use crate::session::SessionCredential;

impl ApiClient {
    /// `GET /{service}/locked-dates/all`
    ///
    /// # Errors
    ///
    /// Returns error if no base URL is configured or the transport fails.
    #[instrument(skip(self, credential), fields(service = %service))]
    pub async fn list_locked_dates(
        &self,
        credential: Option<&SessionCredential>,
        service: ServiceLine,
    ) -> Result<reqwest::Response, ClientError> {
        self.send(
            ApiRequest::get(format!("/{service}/locked-dates/all"))
                .bearer(credential)
                .no_cache(),
        )
        .await
    }

    /// `POST /{service}/locked-dates` with `{date: "YYYY-MM-DD"}`
    ///
    /// # Errors
    ///
    /// Returns error if no base URL is configured or the transport fails.
    #[instrument(skip(self, credential), fields(service = %service, date = %date))]
    pub async fn add_locked_date(
        &self,
        credential: Option<&SessionCredential>,
        service: ServiceLine,
        date: CivilDate,
    ) -> Result<reqwest::Response, ClientError> {
        self.send(
            ApiRequest::post(format!("/{service}/locked-dates"))
                .bearer(credential)
                .json(json!({ "date": date })),
        )
        .await
    }

    /// `DELETE /{service}/locked-dates/{YYYY-MM-DD}`
    ///
    /// # Errors
    ///
    /// Returns error if no base URL is configured or the transport fails.
    #[instrument(skip(self, credential), fields(service = %service, date = %date))]
    pub async fn remove_locked_date(
        &self,
        credential: Option<&SessionCredential>,
        service: ServiceLine,
        date: CivilDate,
    ) -> Result<reqwest::Response, ClientError> {
        self.send(
            ApiRequest::delete(format!("/{service}/locked-dates/{date}")).bearer(credential),
        )
        .await
    }
}
