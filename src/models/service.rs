//! Service (practice line item) models

use serde::{Deserialize, Serialize};

/// A service sold within a practice (flight, hotel stay, package...).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Service {
    pub destination_type: String,
    #[serde(rename = "type")]
    pub service_type: String,
    /// Shown on the invoice
    pub name: String,
    pub supplier_business_name: String,
    pub supplier_business_code: String,
    /// Supplier confirmation code for the booking
    pub supplier_file_code: String,
    pub start_date: String,
    pub end_date: String,
    pub duration_days: u32,
    pub duration_nights: u32,
    pub no_pax_adults: u32,
    pub no_pax_childs: u32,
    pub no_pax_infants: u32,

    #[serde(default)]
    pub departure_from: Option<String>,
    #[serde(default)]
    pub return_to: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub accommodation: Option<String>,
    /// Structure name, tour-operator packages only
    #[serde(default)]
    pub structure: Option<String>,
    #[serde(default)]
    pub treatment: Option<String>,
    #[serde(default)]
    pub transports: Option<String>,
    #[serde(default)]
    pub other_services: Option<String>,
    #[serde(default)]
    pub external_id: Option<String>,
    /// `74T` or `ORD`
    #[serde(default)]
    pub sale_regime: Option<String>,
    #[serde(default)]
    pub destination_iso_code: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub location_description: Option<String>,
    #[serde(default)]
    pub supplier_reference: Option<String>,
    #[serde(default)]
    pub voucher_structure_name: Option<String>,
    #[serde(default)]
    pub voucher_structure_address: Option<String>,
    #[serde(default)]
    pub voucher_structure_email: Option<String>,
    #[serde(default)]
    pub voucher_structure_phone: Option<String>,
    #[serde(default)]
    pub internal_notes: Option<String>,
    #[serde(default)]
    pub external_notes: Option<String>,
    #[serde(default)]
    pub passengers: Option<String>,
    #[serde(default)]
    pub supplier_nation: Option<String>,
}

/// A single sold unit of a service; only its price matters for quotes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SoldService {
    pub price: f64,
}
