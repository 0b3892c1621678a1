//! Customer accounts: SferaNet `/accounts` and the FacileWS lookup

use reqwest::Method;
use serde_json::{json, Value};
use url::Url;

use super::client::{ApiResponse, SferanetClient, GENERIC_ERROR};
use super::payload::{copy_optional, into_object, text, timestamp, OptionalField};
use crate::auth::TokenKind;
use crate::config::Settings;
use crate::error::{GatewayError, GatewayResult};
use crate::models::{Customer, RecordStatus};

/// Backend key => customer field
const CUSTOMER_OPTIONAL: &[OptionalField<Customer>] = &[
    ("partitaiva", |c: &Customer| text(&c.vat_number)),
    ("externalid", |c: &Customer| text(&c.external_id)),
    ("nome", |c: &Customer| text(&c.name)),
    ("localitanascitacitta", |c: &Customer| text(&c.born_city)),
    ("localitaresidenzacitta", |c: &Customer| text(&c.residence_city)),
    ("nazione", |c: &Customer| text(&c.nation)),
    ("cap", |c: &Customer| text(&c.postal_code)),
    ("indirizzo2", |c: &Customer| text(&c.additional_address)),
    ("sex", |c: &Customer| text(&c.sex)),
    ("id", |c: &Customer| text(&c.id)),
    ("user", |c: &Customer| text(&c.user)),
];

pub fn account_payload(customer: &Customer, settings: &Settings, now: &str) -> Value {
    let mut body = into_object(json!({
        "codiceagenzia": settings.agency_code,
        "tipocattura": settings.capture_type,
        "cognome": customer.surname,
        "flagpersonafisica": u8::from(customer.is_physical_person),
        "codicefiscale": customer.fiscal_code,
        "iscliente": 0,
        "isfornitore": 0,
        "ispromotore": 0,
        "creazione": now,
        "indirizzo1": customer.first_address,
        "stato": RecordStatus::Inserting,
        "emailcomunicazioni": customer.email_address,
        "datanascita": customer.birthday,
    }));
    copy_optional(&mut body, customer, CUSTOMER_OPTIONAL);
    Value::Object(body)
}

/// List all accounts. Transport failures are logged, not raised.
pub async fn list_accounts(client: &mut SferanetClient) -> GatewayResult<ApiResponse> {
    tracing::info!("Getting all accounts.");
    let url = client.url("/accounts");
    let outcome = client.send(TokenKind::Primary, Method::GET, &url, None).await?;

    let response = outcome
        .respond("Accounts retrieved successfully.", GENERIC_ERROR, |body| {
            body.and_then(|b| b.get("hydra:member").cloned())
        })
        .unwrap_or_else(|e| {
            let msg = format!("Error while getting all accounts. Error: {}", e);
            tracing::error!("{}", msg);
            ApiResponse::failure(msg)
        });
    Ok(response)
}

/// Look a customer up on FacileWS by fiscal code, or by VAT number for businesses.
pub async fn lookup_customer(
    client: &mut SferanetClient,
    id: &str,
    is_business: bool,
) -> GatewayResult<ApiResponse> {
    let field = if is_business { "piva" } else { "cf" };
    let base = format!(
        "{}/{}",
        client.endpoints().facilews_account_url.trim_end_matches('/'),
        client.settings().agency_code
    );
    let mut url = Url::parse(&base).map_err(|e| GatewayError::Config(format!("{}: {}", base, e)))?;
    url.query_pairs_mut().append_pair(field, id);

    tracing::info!("Getting user by id at EP {}", url);
    let outcome = client
        .send(TokenKind::Secondary, Method::GET, url.as_str(), None)
        .await?;

    outcome
        .respond("Customer retrieved successfully.", GENERIC_ERROR, |body| body)
        .map_err(|e| {
            tracing::error!("Error while looking up a customer. Error: {}", e);
            GatewayError::transport("Error while looking up a customer", e)
        })
}

/// Create a customer account.
pub async fn create_account(
    client: &mut SferanetClient,
    customer: &Customer,
) -> GatewayResult<ApiResponse> {
    tracing::info!("Creating a new account.");
    let body = account_payload(customer, client.settings(), &timestamp());
    let url = client.url("/accounts");
    let outcome = client
        .send(TokenKind::Primary, Method::POST, &url, Some(&body))
        .await?;

    outcome
        .respond("Customer created successfully", GENERIC_ERROR, |body| {
            Some(json!({ "account_created": body }))
        })
        .map_err(|e| {
            tracing::error!("Error while creating a new customer. Error: {}", e);
            GatewayError::transport("Error while creating a new customer", e)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::{INVALID_INPUT, NOT_FOUND};
    use crate::api::testing::{client_for, settings};
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn customer() -> Customer {
        Customer {
            surname: "Rossi".to_string(),
            is_physical_person: true,
            fiscal_code: "RSSMRA80A01H501U".to_string(),
            first_address: "Via Roma 1".to_string(),
            email_address: "mario@example.com".to_string(),
            birthday: "1980-01-01".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_account_payload_required_fields() {
        let body = account_payload(&customer(), &settings(), "2024-05-01T10:00:00.000Z");
        assert_eq!(body["codiceagenzia"], "AG001");
        assert_eq!(body["tipocattura"], "WORDPRESS");
        assert_eq!(body["flagpersonafisica"], 1);
        assert_eq!(body["stato"], "INS");
        assert_eq!(body["creazione"], "2024-05-01T10:00:00.000Z");
        assert_eq!(body["iscliente"], 0);
        assert!(body.get("nome").is_none());
        assert!(body.get("partitaiva").is_none());
    }

    #[test]
    fn test_account_payload_copies_only_present_optionals() {
        let mut c = customer();
        c.name = Some("Mario".to_string());
        c.vat_number = Some("IT01234567890".to_string());
        c.postal_code = Some("00100".to_string());

        let body = account_payload(&c, &settings(), "now");
        let optional_keys: Vec<&str> = CUSTOMER_OPTIONAL
            .iter()
            .map(|(k, _)| *k)
            .filter(|k| body.get(*k).is_some())
            .collect();
        assert_eq!(optional_keys, vec!["partitaiva", "nome", "cap"]);
        assert_eq!(body["partitaiva"], "IT01234567890");
        assert_eq!(body["nome"], "Mario");
        assert_eq!(body["cap"], "00100");
    }

    #[tokio::test]
    async fn test_create_account_created() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/accounts"))
            .and(body_partial_json(json!({ "cognome": "Rossi", "codiceagenzia": "AG001" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "/accounts/77" })))
            .expect(1)
            .mount(&server)
            .await;

        let mut client = client_for(&server);
        let resp = create_account(&mut client, &customer()).await.unwrap();
        assert!(resp.status);
        assert_eq!(resp.msg, "Customer created successfully");
        assert_eq!(
            resp.data,
            Some(json!({ "account_created": { "id": "/accounts/77" } }))
        );
    }

    #[tokio::test]
    async fn test_create_account_invalid_input() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/accounts"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({ "hydra:description": "bad" })),
            )
            .mount(&server)
            .await;

        let mut client = client_for(&server);
        let resp = create_account(&mut client, &customer()).await.unwrap();
        assert!(!resp.status);
        assert_eq!(resp.msg, INVALID_INPUT);
        assert_eq!(resp.data, Some(json!({ "hydra:description": "bad" })));
    }

    #[tokio::test]
    async fn test_create_account_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let mut client = client_for(&server);
        let resp = create_account(&mut client, &customer()).await.unwrap();
        assert!(!resp.status);
        assert_eq!(resp.msg, NOT_FOUND);
        assert_eq!(resp.data, None);
    }

    #[tokio::test]
    async fn test_list_accounts_returns_members() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/accounts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "hydra:member": [{ "cognome": "Rossi" }, { "cognome": "Bianchi" }],
                "hydra:totalItems": 2
            })))
            .mount(&server)
            .await;

        let mut client = client_for(&server);
        let resp = list_accounts(&mut client).await.unwrap();
        assert!(resp.status);
        assert_eq!(
            resp.data,
            Some(json!([{ "cognome": "Rossi" }, { "cognome": "Bianchi" }]))
        );
    }

    #[tokio::test]
    async fn test_list_accounts_absorbs_transport_error() {
        let server = MockServer::builder().start().await;
        let mut client = client_for(&server);
        drop(server);

        let resp = list_accounts(&mut client).await.unwrap();
        assert!(!resp.status);
        assert!(resp.msg.starts_with("Error while getting all accounts."));
    }

    #[tokio::test]
    async fn test_lookup_customer_uses_facilews_token() {
        let server = MockServer::start().await;
        let mut client = client_for(&server);
        let token = client.tokens().get_token(TokenKind::Secondary).unwrap();

        Mock::given(method("GET"))
            .and(path("/Api/Rest/Account/AG001"))
            .and(query_param("piva", "01234567890"))
            .and(header("authorization", format!("Bearer {}", token).as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ragionesociale": "ACME" })))
            .expect(1)
            .mount(&server)
            .await;

        let resp = lookup_customer(&mut client, "01234567890", true).await.unwrap();
        assert!(resp.status);
        assert_eq!(resp.data, Some(json!({ "ragionesociale": "ACME" })));
    }

    #[tokio::test]
    async fn test_lookup_private_customer_by_fiscal_code() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/Api/Rest/Account/AG001"))
            .and(query_param("cf", "RSSMRA80A01H501U"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let mut client = client_for(&server);
        let resp = lookup_customer(&mut client, "RSSMRA80A01H501U", false)
            .await
            .unwrap();
        assert_eq!(resp, ApiResponse::failure(NOT_FOUND));
    }
}
