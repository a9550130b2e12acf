//! Price list editing and lead management.

#![allow(clippy::unwrap_used)]

use booking_console_admin::api::PriceList;
use booking_console_admin::screens::{ContactScreen, PhoneLeadFilter, PhoneLeadScreen, PriceScreen};
use booking_console_core::{ContactId, PhoneLeadId, PhoneLeadStatus, ServiceLine};
use booking_console_integration_tests::FakeBackend;
use serde_json::json;

const TOKEN: &str = "tok-leads";

// ============================================================================
// Prices
// ============================================================================

#[tokio::test]
async fn test_price_edit_round() {
    let backend = FakeBackend::start().await;
    backend.respond(
        "GET",
        "/prices/clean",
        200,
        &json!([{
            "pricePerKvm": 40,
            "fixedPrice": 1500,
            "extraServices": [{ "Persinner": 100, "ExtraBadrum": 400, "ExtraToalett": 200, "inglassadDusch": 300 }]
        }]),
    );
    backend.respond("PATCH", "/prices/clean", 200, &json!({ "ok": true }));

    let screen = PriceScreen::new(backend.state_with_session(TOKEN), PriceList::Cleaning);
    screen.load().await.unwrap();
    assert!(screen.set("pricePerKvm", "42,5"));
    assert!(screen.set("ExtraBadrum", "450"));
    assert!(!screen.set("travelFee", "100"));

    let message = screen.save().await.unwrap();
    assert_eq!(message, "Priser uppdaterade.");
    assert_eq!(screen.values().ok_message.as_deref(), Some("Priser uppdaterade."));

    let body = backend.requests_to("PATCH", "/prices/clean")[0].body.clone().unwrap();
    assert_eq!(body["pricePerKvm"], json!(42.5));
    assert_eq!(body["fixedPrice"], json!(1500.0));
    assert_eq!(body["extraServices"][0]["ExtraBadrum"], json!(450.0));
    assert!(body.get("ExtraBadrum").is_none());
}

#[tokio::test]
async fn test_non_numeric_price_is_not_sent() {
    let backend = FakeBackend::start().await;
    backend.respond("GET", "/prices", 200, &json!({ "data": { "pricePerKvm": 45 } }));

    let screen = PriceScreen::new(backend.state_with_session(TOKEN), PriceList::Moving);
    screen.load().await.unwrap();
    screen.set("travelFee", "gratis");

    let err = screen.save().await.unwrap_err();
    assert_eq!(
        err.validation().unwrap().get("travelFee"),
        Some("Ange ett giltigt numeriskt värde.")
    );
    assert!(backend.requests_to("PATCH", "/prices").is_empty());
}

// ============================================================================
// Contacts
// ============================================================================

#[tokio::test]
async fn test_contact_search_and_delete() {
    let backend = FakeBackend::start().await;
    backend.respond(
        "GET",
        "/contact",
        200,
        &json!([
            { "_id": "c1", "name": "Städ AB", "email": "info@stad.se", "city": "Uppsala", "phone": "018-123" },
            { "_id": "c2", "name": "Kontor KB", "email": "hej@kontor.se", "city": "Malmö", "phone": "040-555" }
        ]),
    );
    backend.respond("DELETE", "/contact/c1", 200, &json!({}));

    let screen = ContactScreen::new(backend.state_with_session(TOKEN));
    screen.load().await.unwrap();
    assert_eq!(screen.search("malmö").len(), 1);
    assert_eq!(screen.search("018").len(), 1);
    assert_eq!(screen.search("  ").len(), 2);

    screen.delete(&ContactId::new("c1")).await.unwrap();
    assert_eq!(screen.contacts().len(), 1);
    assert!(backend.requests_to("DELETE", "/contact/c1")[0].has_bearer(TOKEN));
}

// ============================================================================
// Phone leads
// ============================================================================

#[tokio::test]
async fn test_phone_lead_status_and_filter() {
    let backend = FakeBackend::start().await;
    backend.respond(
        "GET",
        "/phone",
        200,
        &json!({ "data": [
            { "_id": "p1", "phone": "0701111111", "service": "Flyttstädning", "status": "Ingen status" },
            { "_id": "p2", "phone": "0702222222", "service": "Flytthjälp", "status": "Har Ringt" }
        ] }),
    );
    backend.respond("PATCH", "/phone/p1", 200, &json!({}));
    backend.respond("DELETE", "/phone/p2", 500, &json!({ "message": "Serverfel" }));

    let screen = PhoneLeadScreen::new(backend.state_with_session(TOKEN));
    screen.load().await.unwrap();

    screen
        .set_status(&PhoneLeadId::new("p1"), PhoneLeadStatus::CallBack)
        .await
        .unwrap();
    assert_eq!(
        backend.requests_to("PATCH", "/phone/p1")[0].body,
        Some(json!({ "status": "Ska ringa upp" }))
    );

    let call_back = screen.filtered(PhoneLeadFilter {
        service: Some(ServiceLine::Cleaning),
        status: Some(PhoneLeadStatus::CallBack),
    });
    assert_eq!(call_back.len(), 1);
    assert_eq!(call_back[0].phone, "0701111111");

    let err = screen.delete(&PhoneLeadId::new("p2")).await.unwrap_err();
    assert_eq!(err.user_message(), "Serverfel");
    assert_eq!(screen.leads().len(), 2);
}
