//! Financial movements (`/mov_finanziarios`)

use reqwest::Method;
use serde_json::{json, Value};

use super::client::{ApiResponse, SferanetClient};
use super::payload::timestamp;
use crate::auth::TokenKind;
use crate::config::Settings;
use crate::error::{GatewayError, GatewayResult};
use crate::models::{FinancialTransaction, MovementType, RecordStatus};

/// Causal code for card payments
const POS_CAUSAL: &str = "POS";

pub fn movement_payload(
    transaction: &FinancialTransaction,
    external_id: &str,
    settings: &Settings,
    now: &str,
) -> Value {
    json!({
        "codiceagenzia": settings.agency_code,
        "tipocattura": settings.capture_type,
        "externalid": external_id,
        "codcausale": POS_CAUSAL,
        "datamovimento": now,
        "datacreazione": now,
        "datamodifica": now,
        "descrizione": transaction.description,
        "importo": transaction.total,
        "stato": RecordStatus::Inserting,
        "tipomovimento": MovementType::Collected,
    })
}

/// Record a payment. `order_id` becomes the external id; a random one is used otherwise.
pub async fn add_financial_transaction(
    client: &mut SferanetClient,
    transaction: &FinancialTransaction,
    practice_id: u64,
    order_id: Option<&str>,
) -> GatewayResult<ApiResponse> {
    tracing::info!("Adding financial transaction for practice {}.", practice_id);
    let external_id = order_id
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().simple().to_string());

    let body = movement_payload(transaction, &external_id, client.settings(), &timestamp());
    let url = client.url("/mov_finanziarios");
    let outcome = client
        .send(TokenKind::Primary, Method::POST, &url, Some(&body))
        .await?;

    let fallback = format!(
        "Generic error, debug please. Error code: {}",
        outcome.code().unwrap_or_default()
    );
    outcome
        .respond("Financial Movement created correctly", &fallback, |body| {
            Some(json!({ "financial_movement": body }))
        })
        .map_err(|e| {
            tracing::error!("Error while creating a transactional movement. Error: {}", e);
            GatewayError::transport("Error while creating a transactional movement", e)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::{INVALID_INPUT, NOT_FOUND};
    use crate::api::testing::{client_for, settings};
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn payment() -> FinancialTransaction {
        FinancialTransaction {
            description: "Acconto ordine 1001".to_string(),
            total: 250.0,
        }
    }

    #[test]
    fn test_movement_payload() {
        let body = movement_payload(&payment(), "1001", &settings(), "T");
        assert_eq!(body["externalid"], "1001");
        assert_eq!(body["codcausale"], "POS");
        assert_eq!(body["importo"], 250.0);
        assert_eq!(body["stato"], "INS");
        assert_eq!(body["tipomovimento"], "INC");
        assert_eq!(body["codiceagenzia"], "AG001");
    }

    #[tokio::test]
    async fn test_order_id_becomes_external_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/mov_finanziarios"))
            .and(body_partial_json(json!({ "externalid": "1001" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "/mov/5" })))
            .expect(1)
            .mount(&server)
            .await;

        let mut client = client_for(&server);
        let resp = add_financial_transaction(&mut client, &payment(), 4821, Some("1001"))
            .await
            .unwrap();
        assert!(resp.status);
        assert_eq!(resp.msg, "Financial Movement created correctly");
        assert_eq!(resp.data, Some(json!({ "financial_movement": { "id": "/mov/5" } })));
    }

    #[tokio::test]
    async fn test_generated_external_ids_differ() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(2)
            .mount(&server)
            .await;

        let mut client = client_for(&server);
        add_financial_transaction(&mut client, &payment(), 1, None)
            .await
            .unwrap();
        add_financial_transaction(&mut client, &payment(), 1, None)
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        let ids: Vec<Value> = requests
            .iter()
            .map(|r| serde_json::from_slice::<Value>(&r.body).unwrap()["externalid"].clone())
            .collect();
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
    }

    #[tokio::test]
    async fn test_error_statuses() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "externalid": "bad" })))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "error": "importo" })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "externalid": "gone" })))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "externalid": "teapot" })))
            .respond_with(ResponseTemplate::new(418).set_body_json(json!({ "detail": "no" })))
            .mount(&server)
            .await;

        let mut client = client_for(&server);

        let invalid = add_financial_transaction(&mut client, &payment(), 1, Some("bad"))
            .await
            .unwrap();
        assert_eq!(invalid.msg, INVALID_INPUT);
        assert_eq!(invalid.data, Some(json!({ "error": "importo" })));

        let missing = add_financial_transaction(&mut client, &payment(), 1, Some("gone"))
            .await
            .unwrap();
        assert_eq!(missing, ApiResponse::failure(NOT_FOUND));

        let other = add_financial_transaction(&mut client, &payment(), 1, Some("teapot"))
            .await
            .unwrap();
        assert!(!other.status);
        assert_eq!(other.msg, "Generic error, debug please. Error code: 418");
        assert_eq!(other.data, Some(json!({ "detail": "no" })));
    }
}
