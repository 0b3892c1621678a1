//! Practices (`/prt_praticas`) and their passengers

use reqwest::Method;
use serde_json::{json, Value};

use super::attachments::add_attachments;
use super::client::{ApiResponse, SferanetClient, GENERIC_ERROR};
use super::payload::{copy_optional, id_from_iri, into_object, text, timestamp, OptionalField};
use crate::auth::TokenKind;
use crate::config::Settings;
use crate::error::{GatewayError, GatewayResult};
use crate::models::{Contractor, Passenger, PracticeData, RecordStatus};

const CONTRACTOR_OPTIONAL: &[OptionalField<Contractor>] = &[
    ("indirizzo", |c: &Contractor| text(&c.address)),
    ("telefonocliente", |c: &Contractor| text(&c.phone_number)),
    ("emailcliente", |c: &Contractor| text(&c.email_address)),
];

const PASSENGER_OPTIONAL: &[OptionalField<Passenger>] =
    &[("cellulare", |p: &Passenger| text(&p.phone))];

pub fn practice_payload(
    contractor: &Contractor,
    practice: &PracticeData,
    settings: &Settings,
    now: &str,
) -> Value {
    let mut body = into_object(json!({
        "codiceagenzia": settings.agency_code,
        "tipocattura": settings.capture_type,
        "datacreazione": now,
        "datasaldo": now,
        "datamodifica": now,
        "stato": RecordStatus::WorkInProgress,
        "descrizionepratica": practice.description,
        "noteinterne": "",
        "noteesterne": "",
        "cognomecliente": contractor.surname,
        "nomecliente": contractor.name,
    }));
    copy_optional(&mut body, contractor, CONTRACTOR_OPTIONAL);
    Value::Object(body)
}

pub fn passenger_payload(passenger: &Passenger, practice_id: u64) -> Value {
    let mut body = into_object(json!({
        "pratica": format!("prt_praticas/{}", practice_id),
        "cognomepax": passenger.surname,
        "nomepax": passenger.name,
        "annullata": 0,
        "iscontraente": 0,
        "datadinascita": passenger.birthday,
        "sesso": passenger.sex,
    }));
    copy_optional(&mut body, passenger, PASSENGER_OPTIONAL);
    Value::Object(body)
}

/// `{"practice_id": N}` from a created-practice body
fn created_practice_id(body: Option<Value>) -> Option<Value> {
    let id = body
        .as_ref()
        .and_then(|b| b.get("id").or_else(|| b.get("@id")))
        .and_then(Value::as_str)
        .map(id_from_iri)
        .unwrap_or(Value::Null);
    Some(json!({ "practice_id": id }))
}

/// Create a practice in work-in-progress state.
pub async fn create_practice(
    client: &mut SferanetClient,
    contractor: &Contractor,
    practice: &PracticeData,
) -> GatewayResult<ApiResponse> {
    tracing::info!("Creating a new practice.");
    let body = practice_payload(contractor, practice, client.settings(), &timestamp());
    let url = client.url("/prt_praticas");
    let outcome = client
        .send(TokenKind::Primary, Method::POST, &url, Some(&body))
        .await?;

    outcome
        .respond("Practice created successfully", GENERIC_ERROR, created_practice_id)
        .map_err(|e| {
            tracing::error!("Error while creating a new practice. Error: {}", e);
            GatewayError::transport("Error while creating a new practice", e)
        })
}

/// Add a passenger to an existing practice, uploading their documents first.
pub async fn add_passenger(
    client: &mut SferanetClient,
    passenger: &Passenger,
    practice_id: u64,
) -> GatewayResult<ApiResponse> {
    tracing::info!("Adding passenger to practice {}.", practice_id);
    if !passenger.attachments.is_empty() {
        add_attachments(client, &passenger.attachments, practice_id).await?;
    }

    let body = passenger_payload(passenger, practice_id);
    let url = client.url("/prt_praticapasseggeros");
    let outcome = client
        .send(TokenKind::Primary, Method::POST, &url, Some(&body))
        .await?;

    let success = format!("Passenger associated successfully to practice {}", practice_id);
    outcome.respond(&success, GENERIC_ERROR, |body| body).map_err(|e| {
        let context = format!(
            "Error while adding a passenger to the practice. Passenger: {} {}",
            passenger.surname, passenger.name
        );
        tracing::error!("{}. Error: {}", context, e);
        GatewayError::transport(context, e)
    })
}

/// Move a practice from work-in-progress to inserted.
pub async fn finalize_practice(
    client: &mut SferanetClient,
    practice_id: u64,
) -> GatewayResult<ApiResponse> {
    tracing::info!("Finalizing practice {}", practice_id);
    let body = json!({ "stato": RecordStatus::Inserting });
    let url = client.url(&format!("/prt_praticas/{}", practice_id));
    let outcome = client
        .send(TokenKind::Primary, Method::PUT, &url, Some(&body))
        .await?;

    outcome
        .respond("Practice finalized correctly", GENERIC_ERROR, |_| Some(json!({})))
        .map_err(|e| {
            tracing::error!("Error while finalizing practice {}. Error: {}", practice_id, e);
            GatewayError::transport(format!("Error while finalizing practice {}", practice_id), e)
        })
}
