//! Customer and contractor models

use serde::{Deserialize, Serialize};

/// Customer record sent to the `/accounts` endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Customer {
    /// Surname, or business name for companies
    pub surname: String,
    pub is_physical_person: bool,
    /// Fiscal code, or VAT number for companies
    pub fiscal_code: String,
    pub first_address: String,
    pub email_address: String,
    pub birthday: String,

    #[serde(default, alias = "VAT_number")]
    pub vat_number: Option<String>,
    /// Unique id of the customer in the supplier's system
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub born_city: Option<String>,
    #[serde(default)]
    pub residence_city: Option<String>,
    #[serde(default)]
    pub nation: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub additional_address: Option<String>,
    #[serde(default)]
    pub sex: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
}

/// Contractor (the paying customer) attached to a new practice.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Contractor {
    pub surname: String,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub email_address: Option<String>,
}
