//! Practice services (`/prt_praticaservizios`) and their quotes

use reqwest::Method;
use serde_json::{json, Value};

use super::client::{ApiResponse, SferanetClient, GENERIC_ERROR};
use super::payload::{copy_optional, into_object, text, timestamp, OptionalField};
use crate::auth::TokenKind;
use crate::error::{GatewayError, GatewayResult};
use crate::models::{Service, SoldService};

const CURRENCY: &str = "EUR";

/// Backend key => service field
const SERVICE_OPTIONAL: &[OptionalField<Service>] = &[
    ("partenzada", |s: &Service| text(&s.departure_from)),
    ("rientroa", |s: &Service| text(&s.return_to)),
    ("destinazione", |s: &Service| text(&s.destination)),
    ("sistemazione", |s: &Service| text(&s.accommodation)),
    ("struttura", |s: &Service| text(&s.structure)),
    ("trattamento", |s: &Service| text(&s.treatment)),
    ("trasporti", |s: &Service| text(&s.transports)),
    ("altriservizi", |s: &Service| text(&s.other_services)),
    ("externalid", |s: &Service| text(&s.external_id)),
    ("regimevendita", |s: &Service| text(&s.sale_regime)),
    ("codiceisodestinazione", |s: &Service| text(&s.destination_iso_code)),
    ("brand", |s: &Service| text(&s.brand)),
    ("localitaDescrizioneLibera", |s: &Service| text(&s.location_description)),
    ("riferimentopressofornitore", |s: &Service| text(&s.supplier_reference)),
    ("nomestrutturavoucher", |s: &Service| text(&s.voucher_structure_name)),
    ("indirizzostrutturavoucher", |s: &Service| text(&s.voucher_structure_address)),
    ("mailstrutturavoucher", |s: &Service| text(&s.voucher_structure_email)),
    ("telefonostrutturavoucher", |s: &Service| text(&s.voucher_structure_phone)),
    ("noteinterne", |s: &Service| text(&s.internal_notes)),
    ("noteesterne", |s: &Service| text(&s.external_notes)),
    ("passeggeri", |s: &Service| text(&s.passengers)),
    ("nazionefornitore", |s: &Service| text(&s.supplier_nation)),
];

pub fn service_payload(service: &Service, practice_id: Option<u64>, now: &str) -> Value {
    let mut body = into_object(json!({
        "annullata": 0,
        "datacreazione": now,
        "tipodestinazione": service.destination_type,
        "tiposervizio": service.service_type,
        "descrizione": service.name,
        "ragsocfornitore": service.supplier_business_name,
        "codicefornitore": service.supplier_business_code,
        "codicefilefornitore": service.supplier_file_code,
        "datainizioservizio": service.start_date,
        "datafineservizio": service.end_date,
        "duratagg": service.duration_days,
        "duratant": service.duration_nights,
        "nrpaxadulti": service.no_pax_adults,
        "nrpaxchild": service.no_pax_childs,
        "nrpaxinfant": service.no_pax_infants,
    }));
    if let Some(id) = practice_id {
        body.insert("pratica".to_string(), json!(format!("/prt_praticas/{}", id)));
    }
    copy_optional(&mut body, service, SERVICE_OPTIONAL);
    Value::Object(body)
}

/// Number of sold units and their summed price
pub fn quote_totals(sold: &[SoldService]) -> (usize, f64) {
    (sold.len(), sold.iter().map(|s| s.price).sum())
}

pub fn quote_payload(sold: &[SoldService], service_id: u64, description: &str, now: &str) -> Value {
    let (quantity, revenue) = quote_totals(sold);
    json!({
        "descrizionequota": description,
        "datavendita": now,
        "quantitacosto": 1,
        "costovalutaprimaria": 0,
        "codiceisovalutacosto": CURRENCY,
        "quantitaricavo": quantity,
        "ricavovalutaprimaria": revenue,
        "codiceisovalutaricavo": CURRENCY,
        "commissioniattivevalutaprimaria": 0,
        "commissionipassivevalutaprimaria": 0,
        "progressivo": 0,
        "annullata": 0,
        "servizio": format!("prt_praticaservizios/{}", service_id),
    })
}

/// Add a service, optionally linked to a practice.
pub async fn add_service(
    client: &mut SferanetClient,
    service: &Service,
    practice_id: Option<u64>,
) -> GatewayResult<ApiResponse> {
    match practice_id {
        Some(id) => tracing::info!("Associating a new service to the practice {}", id),
        None => tracing::info!("Creating a service without practice"),
    }
    let body = service_payload(service, practice_id, &timestamp());
    let url = client.url("/prt_praticaservizios");
    let outcome = client
        .send(TokenKind::Primary, Method::POST, &url, Some(&body))
        .await?;

    outcome
        .respond("Service associated to practice successfully", GENERIC_ERROR, |body| {
            Some(json!({ "service_associated": body }))
        })
        .map_err(|e| {
            tracing::error!("Error while associating a service to a practice. Error: {}", e);
            GatewayError::transport("Error while associating a service to a practice", e)
        })
}

/// Add the revenue quote for the units sold of a service.
pub async fn add_quote(
    client: &mut SferanetClient,
    sold: &[SoldService],
    service_id: u64,
    description: &str,
) -> GatewayResult<ApiResponse> {
    tracing::info!("Adding quote to service with id {}", service_id);
    let body = quote_payload(sold, service_id, description, &timestamp());
    let url = client.url("/prt_praticaservizioquotas");
    let outcome = client
        .send(TokenKind::Primary, Method::POST, &url, Some(&body))
        .await?;

    outcome
        .respond(
            "Quote created and associated to the service successfully",
            GENERIC_ERROR,
            |body| Some(json!({ "quote_created": body })),
        )
        .map_err(|e| {
            tracing::error!("Error while creating a practice quote related to a service. Error: {}", e);
            GatewayError::transport("Error while creating a practice quote related to a service", e)
        })
}
