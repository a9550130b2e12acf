//! Authentication endpoints.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::instrument;

use super::{ApiClient, ApiRequest, ClientError};

impl ApiClient {
    /// `POST /admin/login`. No bearer credential is sent.
    ///
    /// # Errors
    ///
    /// Returns error if no base URL is configured or the transport fails.
    #[instrument(skip(self, password), fields(username = %username))]
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<reqwest::Response, ClientError> {
        let body = json!({ "username": username, "password": password.expose_secret() });
        self.send(ApiRequest::post("/admin/login").json(body)).await
    }

    /// `POST /admin/register`. No bearer credential is sent.
    ///
    /// # Errors
    ///
    /// Returns error if no base URL is configured or the transport fails.
    #[instrument(skip(self, password), fields(username = %username))]
    pub async fn register_admin(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<reqwest::Response, ClientError> {
        let body = json!({ "username": username, "password": password.expose_secret() });
        self.send(ApiRequest::post("/admin/register").json(body)).await
    }
}
