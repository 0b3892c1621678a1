//! Practice-related models

use serde::{Deserialize, Serialize};

/// Practice header data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PracticeData {
    /// Shown on the invoice
    pub description: String,
}

/// Passenger travelling on a practice
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Passenger {
    pub surname: String,
    pub name: String,
    /// Birth date, e.g. `01/01/1990`
    pub birthday: String,
    pub sex: String,
    #[serde(default)]
    pub phone: Option<String>,
    /// Document URLs uploaded to the practice before the passenger is added
    #[serde(default)]
    pub attachments: Vec<String>,
}

/// Payment or accounting entry attached to a practice.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinancialTransaction {
    pub description: String,
    pub total: f64,
}
