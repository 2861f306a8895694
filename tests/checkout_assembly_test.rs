mod common;

use common::TestApp;
use iabot_api::{
    errors::ServiceError,
    services::{catalog::NewCatalogItem, checkout::CreateCheckoutInput},
};
use serde_json::{json, Value};

const ORIGIN: &str = "https://iabot.example";

fn catalog_item(nombre: &str, precio: Value) -> NewCatalogItem {
    NewCatalogItem {
        nombre: Some(nombre.to_string()),
        precio: Some(precio),
        descripcion: None,
    }
}

fn checkout_input(plan: &str, feature_ids: Vec<i32>) -> CreateCheckoutInput {
    CreateCheckoutInput {
        plan: Some(plan.to_string()),
        selected_features_ids: feature_ids,
        email: Some("cliente@example.com".to_string()),
        name: Some("Carlos Mendoza".to_string()),
    }
}

#[tokio::test]
async fn plan_only_checkout_yields_one_line_item_in_minor_units() {
    let app = TestApp::new().await;
    app.state
        .services
        .catalog
        .add_plan(catalog_item("Básico", json!("100.00")))
        .await
        .unwrap();

    let session_id = app
        .state
        .services
        .checkout
        .create_checkout_session(checkout_input("Básico", vec![]), ORIGIN)
        .await
        .unwrap();
    assert_eq!(session_id, "cs_test_1");

    let sessions = app.gateway.sessions.lock().unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].line_items.len(), 1);
    assert_eq!(sessions[0].line_items[0].name, "Básico");
    assert_eq!(sessions[0].line_items[0].unit_amount, 10_000);
}

#[tokio::test]
async fn unknown_feature_ids_are_skipped_without_error() {
    let app = TestApp::new().await;
    let catalog = &app.state.services.catalog;
    catalog
        .add_plan(catalog_item("Avanzado", json!(149)))
        .await
        .unwrap();
    let feature = catalog
        .add_feature(catalog_item("Canal WhatsApp", json!(25)))
        .await
        .unwrap();

    app.state
        .services
        .checkout
        .create_checkout_session(
            checkout_input("Avanzado", vec![feature.id, 9999]),
            ORIGIN,
        )
        .await
        .unwrap();

    let sessions = app.gateway.sessions.lock().unwrap();
    assert_eq!(sessions[0].line_items.len(), 2);
    assert_eq!(sessions[0].line_items[0].name, "Avanzado");
    assert_eq!(sessions[0].line_items[1].name, "Canal WhatsApp");
    assert_eq!(sessions[0].line_items[1].unit_amount, 2_500);
}

#[tokio::test]
async fn missing_plan_is_a_validation_error() {
    let app = TestApp::new().await;

    let input = CreateCheckoutInput {
        plan: None,
        selected_features_ids: vec![],
        email: None,
        name: None,
    };
    let err = app
        .state
        .services
        .checkout
        .create_checkout_session(input, ORIGIN)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)));
    assert_eq!(app.session_count(), 0);
}

#[tokio::test]
async fn unknown_plan_is_not_found_and_makes_no_provider_call() {
    let app = TestApp::new().await;

    let err = app
        .state
        .services
        .checkout
        .create_checkout_session(checkout_input("Inexistente", vec![]), ORIGIN)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
    assert_eq!(app.session_count(), 0);
}

#[tokio::test]
async fn session_carries_urls_email_and_reconciliation_metadata() {
    let app = TestApp::new().await;
    let catalog = &app.state.services.catalog;
    catalog
        .add_plan(catalog_item("Básico", json!("100.00")))
        .await
        .unwrap();
    let feature = catalog
        .add_feature(catalog_item("Integración CRM", json!("49.99")))
        .await
        .unwrap();

    app.state
        .services
        .checkout
        .create_checkout_session(checkout_input("Básico", vec![feature.id]), ORIGIN)
        .await
        .unwrap();

    let sessions = app.gateway.sessions.lock().unwrap();
    let session = &sessions[0];
    assert_eq!(session.success_url, format!("{}/success", ORIGIN));
    assert_eq!(session.cancel_url, format!("{}/cancel", ORIGIN));
    assert_eq!(session.customer_email.as_deref(), Some("cliente@example.com"));
    assert_eq!(session.currency, "usd");

    let metadata: std::collections::HashMap<_, _> = session
        .metadata
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    assert_eq!(metadata.get("plan"), Some(&"Básico"));
    assert_eq!(metadata.get("total"), Some(&"149.99"));
    assert_eq!(metadata.get("customer_name"), Some(&"Carlos Mendoza"));
}
