//! Price list endpoints.

use serde_json::Value;
use tracing::instrument;

use super::{ApiClient, ApiRequest, ClientError, PriceList};
use crate::session::SessionCredential;

impl ApiClient {
    /// `GET /prices` or `GET /prices/clean`
    ///
    /// # Errors
    ///
    /// Returns error if no base URL is configured or the transport fails.
    #[instrument(skip(self, credential), fields(list = ?list))]
    pub async fn get_prices(
        &self,
        credential: Option<&SessionCredential>,
        list: PriceList,
    ) -> Result<reqwest::Response, ClientError> {
        self.send(ApiRequest::get(list.path()).bearer(credential).no_cache())
            .await
    }

    /// `PATCH /prices` or `PATCH /prices/clean`
    ///
    /// # Errors
    ///
    /// Returns error if no base URL is configured or the transport fails.
    #[instrument(skip(self, credential, document), fields(list = ?list))]
    pub async fn save_prices(
        &self,
        credential: Option<&SessionCredential>,
        list: PriceList,
        document: Value,
    ) -> Result<reqwest::Response, ClientError> {
        self.send(ApiRequest::patch(list.path()).bearer(credential).json(document))
            .await
    }
}
