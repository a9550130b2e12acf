//! Discount codes: sorted list, create and delete by id or code.

#![allow(clippy::unwrap_used)]

use booking_console_admin::screens::{DiscountForm, DiscountScreen};
use booking_console_core::ServiceLine;
use booking_console_integration_tests::FakeBackend;
use serde_json::json;

const TOKEN: &str = "tok-discount";

async fn loaded_screen(backend: &FakeBackend) -> DiscountScreen {
    backend.respond(
        "GET",
        "/discount",
        200,
        &json!({
            "discounts": [
                { "code": "VINTER", "type": "fixed", "value": 300, "isActive": true },
                { "code": "SOMMAR 25/50%", "type": "percentage", "value": 25, "isActive": true },
                { "_id": "64b0aa", "code": "SOMMAR 25/50%", "type": "percentage", "value": 50, "isActive": false }
            ]
        }),
    );
    let screen = DiscountScreen::new(backend.state_with_session(TOKEN));
    screen.load().await.unwrap();
    screen
}

#[tokio::test]
async fn test_load_sorts_by_code() {
    let backend = FakeBackend::start().await;
    let screen = loaded_screen(&backend).await;

    let codes: Vec<String> = screen.discounts().into_iter().map(|d| d.code).collect();
    assert_eq!(codes, vec!["SOMMAR 25/50%", "SOMMAR 25/50%", "VINTER"]);
    assert!(backend.requests_to("GET", "/discount")[0].bypasses_cache());
}

// ============================================================================
// Delete
// ============================================================================

#[tokio::test]
async fn test_delete_without_id_targets_encoded_code() {
    let backend = FakeBackend::start().await;
    backend.respond("DELETE", "/discount/SOMMAR%2025%2F50%25", 200, &json!({}));
    let screen = loaded_screen(&backend).await;

    let target = screen
        .discounts()
        .into_iter()
        .find(|d| d.id.is_none() && d.code.starts_with("SOMMAR"))
        .unwrap();
    screen.delete(&target).await.unwrap();

    let deletes = backend.requests_to("DELETE", "/discount/SOMMAR%2025%2F50%25");
    assert_eq!(deletes.len(), 1);
    assert!(deletes[0].has_bearer(TOKEN));

    let remaining = screen.discounts();
    assert_eq!(remaining.len(), 2);
    assert!(remaining.iter().any(|d| d.id.is_some() && d.code == "SOMMAR 25/50%"));
    assert!(!remaining.iter().any(|d| d.id.is_none() && d.code.starts_with("SOMMAR")));
}

#[tokio::test]
async fn test_delete_prefers_id() {
    let backend = FakeBackend::start().await;
    backend.respond("DELETE", "/discount/64b0aa", 200, &json!({}));
    let screen = loaded_screen(&backend).await;

    let target = screen
        .discounts()
        .into_iter()
        .find(|d| d.id.is_some())
        .unwrap();
    screen.delete(&target).await.unwrap();

    assert_eq!(backend.requests_to("DELETE", "/discount/64b0aa").len(), 1);
    assert!(screen.discounts().iter().all(|d| d.id.is_none()));
}

#[tokio::test]
async fn test_failed_delete_keeps_row() {
    let backend = FakeBackend::start().await;
    backend.respond("DELETE", "/discount/VINTER", 404, &json!("Rabattkoden hittades inte"));
    let screen = loaded_screen(&backend).await;

    let target = screen
        .discounts()
        .into_iter()
        .find(|d| d.code == "VINTER")
        .unwrap();
    let err = screen.delete(&target).await.unwrap_err();
    assert_eq!(err.user_message(), "Rabattkoden hittades inte");
    assert_eq!(screen.discounts().len(), 3);
}

// ============================================================================
// Create
// ============================================================================

#[tokio::test]
async fn test_create_inserts_in_code_order() {
    let backend = FakeBackend::start().await;
    backend.respond(
        "POST",
        "/discount/create-discount",
        201,
        &json!({
            "discount": {
                "_id": "64b0bb", "code": "TIOPROCENT", "type": "percentage",
                "value": 10, "isActive": true, "applicableServices": ["moving"]
            }
        }),
    );
    let screen = loaded_screen(&backend).await;

    let mut form = DiscountForm {
        value: "10".to_string(),
        valid_until: "2026-06-30".to_string(),
        applicable_services: vec![ServiceLine::Moving],
        ..DiscountForm::default()
    };
    form.set_code("tioprocent");
    let created = screen.create(&form).await.unwrap();
    assert_eq!(created.code, "TIOPROCENT");

    let codes: Vec<String> = screen.discounts().into_iter().map(|d| d.code).collect();
    assert_eq!(
        codes,
        vec!["SOMMAR 25/50%", "SOMMAR 25/50%", "TIOPROCENT", "VINTER"]
    );

    let body = backend.requests_to("POST", "/discount/create-discount")[0]
        .body
        .clone()
        .unwrap();
    assert_eq!(body["code"], json!("TIOPROCENT"));
    assert_eq!(body["type"], json!("percentage"));
    assert_eq!(body["validUntil"], json!("2026-06-30"));
    assert!(body.get("validFrom").is_none());
    assert_eq!(body["applicableServices"], json!(["moving"]));
}

#[tokio::test]
async fn test_duplicate_code_is_rejected_without_request() {
    let backend = FakeBackend::start().await;
    let screen = loaded_screen(&backend).await;

    let mut form = DiscountForm {
        value: "5".to_string(),
        ..DiscountForm::default()
    };
    form.set_code("vinter");
    let err = screen.create(&form).await.unwrap_err();
    assert!(err.validation().unwrap().contains("code"));
    assert!(backend.requests_to("POST", "/discount/create-discount").is_empty());
}
