//! Booking endpoints, one collection per service line.

use booking_console_core::{BookingId, ServiceLine};
use tracing::instrument;

use super::{ApiClient, ApiRequest, BookingUpdate, ClientError};
use crate::session::SessionCredential;

/// Path that triggers the confirmation email for a booking.
///
/// Moving uses an action-first path; the other lines nest the action under
/// the booking.
#[must_use]
pub fn confirmation_path(service: ServiceLine, id: &BookingId) -> String {
    match service {
        ServiceLine::Moving => format!("/moving/send-confirmation/{id}"),
        ServiceLine::Cleaning | ServiceLine::Bygg => format!("/{service}/{id}/send-confirmation"),
    }
}

impl ApiClient {
    /// `GET /{service}`
    ///
    /// # Errors
    ///
    /// Returns error if no base URL is configured or the transport fails.
    #[instrument(skip(self, credential), fields(service = %service))]
    pub async fn list_bookings(
        &self,
        credential: Option<&SessionCredential>,
        service: ServiceLine,
    ) -> Result<reqwest::Response, ClientError> {
        self.send(
            ApiRequest::get(format!("/{service}"))
                .bearer(credential)
                .no_cache(),
        )
        .await
    }

    /// `GET /{service}/{id}`
    ///
    /// # Errors
    ///
    /// Returns error if no base URL is configured or the transport fails.
    #[instrument(skip(self, credential), fields(service = %service, id = %id))]
    pub async fn get_booking(
        &self,
        credential: Option<&SessionCredential>,
        service: ServiceLine,
        id: &BookingId,
    ) -> Result<reqwest::Response, ClientError> {
        self.send(
            ApiRequest::get(format!("/{service}/{id}"))
                .bearer(credential)
                .no_cache(),
        )
        .await
    }

    /// `PATCH /{service}/{id}`
    ///
    /// # Errors
    ///
    /// Returns error if no base URL is configured or the transport fails.
    #[instrument(skip(self, credential, update), fields(service = %service, id = %id))]
    pub async fn update_booking(
        &self,
        credential: Option<&SessionCredential>,
        service: ServiceLine,
        id: &BookingId,
        update: &BookingUpdate,
    ) -> Result<reqwest::Response, ClientError> {
        let body = serde_json::to_value(update)?;
        self.send(
            ApiRequest::patch(format!("/{service}/{id}"))
                .bearer(credential)
                .json(body),
        )
        .await
    }

    /// `DELETE /{service}/{id}`
    ///
    /// # Errors
    ///
    /// Returns error if no base URL is configured or the transport fails.
    #[instrument(skip(self, credential), fields(service = %service, id = %id))]
    pub async fn delete_booking(
        &self,
        credential: Option<&SessionCredential>,
        service: ServiceLine,
        id: &BookingId,
    ) -> Result<reqwest::Response, ClientError> {
        self.send(ApiRequest::delete(format!("/{service}/{id}")).bearer(credential))
            .await
    }

    /// `POST` to the service line's confirmation path.
    ///
    /// # Errors
    ///
    /// Returns error if no base URL is configured or the transport fails.
    #[instrument(skip(self, credential), fields(service = %service, id = %id))]
    pub async fn send_confirmation(
        &self,
        credential: Option<&SessionCredential>,
        service: ServiceLine,
        id: &BookingId,
    ) -> Result<reqwest::Response, ClientError> {
        self.send(ApiRequest::post(confirmation_path(service, id)).bearer(credential))
            .await
    }
}
