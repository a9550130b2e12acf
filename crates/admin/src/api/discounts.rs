//! Discount code endpoints.

use tracing::instrument;

use super::{ApiClient, ApiRequest, ClientError, DiscountPayload};
use crate::session::SessionCredential;

/// Delete path for a discount id or code.
///
/// The segment is percent-encoded; the server decides whether it names an
/// id or a code.
///
/// ```
/// use booking_console_admin::api::discount_path;
///
/// assert_eq!(discount_path("SOMMAR 25/50%"), "/discount/SOMMAR%2025%2F50%25");
/// ```
#[must_use]
pub fn discount_path(id_or_code: &str) -> String {
    format!("/discount/{}", urlencoding::encode(id_or_code))
}

impl ApiClient {
    /// `GET /discount`
    ///
    /// # Errors
    ///
    /// Returns error if no base URL is configured or the transport fails.
    #[instrument(skip(self, credential))]
    pub async fn list_discounts(
        &self,
        credential: Option<&SessionCredential>,
    ) -> Result<reqwest::Response, ClientError> {
        self.send(ApiRequest::get("/discount").bearer(credential).no_cache())
            .await
    }

    /// `POST /discount/create-discount`
    ///
    /// # Errors
    ///
    /// Returns error if no base URL is configured or the transport fails.
    #[instrument(skip(self, credential, payload), fields(code = %payload.code))]
    pub async fn create_discount(
        &self,
        credential: Option<&SessionCredential>,
        payload: &DiscountPayload,
    ) -> Result<reqwest::Response, ClientError> {
        let body = serde_json::to_value(payload)?;
        self.send(
            ApiRequest::post("/discount/create-discount")
                .bearer(credential)
                .json(body),
        )
        .await
    }

    /// `DELETE /discount/{idOrCode}`
    ///
    /// # Errors
    ///
    /// Returns error if no base URL is configured or the transport fails.
    #[instrument(skip(self, credential))]
    pub async fn delete_discount(
        &self,
        credential: Option<&SessionCredential>,
        id_or_code: &str,
    ) -> Result<reqwest::Response, ClientError> {
        self.send(ApiRequest::delete(discount_path(id_or_code)).bearer(credential))
            .await
    }
}
