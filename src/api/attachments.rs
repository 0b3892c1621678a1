//! Document upload (`/allegatos`)
//!
//! Each URL is downloaded, base64-encoded and posted as a separate document
//! linked to the practice record. Uploads run one after another and only the
//! last upload's response is returned; earlier outcomes are logged only.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::Method;
use serde_json::{json, Value};

use super::client::{ApiResponse, SferanetClient, GENERIC_ERROR};
use super::payload::timestamp;
use crate::auth::TokenKind;
use crate::config::Settings;
use crate::error::{GatewayError, GatewayResult};
use crate::models::RecordStatus;

/// Table the document is linked to
const PRACTICE_TABLE: &str = "PRT_Pratica";

pub fn attachment_payload(
    content: &[u8],
    index: usize,
    practice_id: u64,
    settings: &Settings,
    now: &str,
) -> Value {
    json!({
        "data": STANDARD.encode(content),
        "agenziaid": settings.agency_id,
        "allegatotipoid": settings.attachment_type_id,
        "visibileingestionedocumentale": 1,
        "note": "",
        "nometabella": PRACTICE_TABLE,
        "idrecord": practice_id,
        "pubblico": 0,
        "flagannullato": false,
        "stato": RecordStatus::Inserting,
        "codiceagenzia": settings.agency_code,
        "nomefile": format!("attachment_{}", index),
        "datainserimento": now,
        "descrizione": "Attachment",
    })
}

/// Upload every document in `urls` to the practice.
pub async fn add_attachments(
    client: &mut SferanetClient,
    urls: &[String],
    practice_id: u64,
) -> GatewayResult<ApiResponse> {
    tracing::info!("Adding {} attachments to practice {}.", urls.len(), practice_id);

    let mut last = ApiResponse::failure("No attachments to upload");
    for (index, source) in urls.iter().enumerate() {
        let content = client.fetch(source).await.map_err(|e| {
            tracing::error!("Error while downloading attachment {}. Error: {}", source, e);
            GatewayError::transport(format!("Error while downloading attachment {}", source), e)
        })?;

        let body = attachment_payload(&content, index, practice_id, client.settings(), &timestamp());
        let url = client.url("/allegatos");
        let outcome = client
            .send(TokenKind::Primary, Method::POST, &url, Some(&body))
            .await?;

        last = outcome
            .respond("Attachments created correctly", GENERIC_ERROR, |_| Some(json!({})))
            .map_err(|e| {
                tracing::error!("Error while adding an attachment. Error: {}", e);
                GatewayError::transport("Error while adding an attachment", e)
            })?;
    }

    Ok(last)
}
