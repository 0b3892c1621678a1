//! Backend status and type codes

use serde::{Deserialize, Serialize};

/// Record state (`stato`) shared by practices, accounts, movements and attachments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordStatus {
    /// Practice still being assembled
    #[serde(rename = "WP")]
    WorkInProgress,
    /// Record fully loaded
    #[serde(rename = "INS")]
    Inserting,
}

/// Financial movement type (`tipomovimento`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementType {
    #[serde(rename = "INC")]
    Collected,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(serde_json::json!(RecordStatus::WorkInProgress), "WP");
        assert_eq!(serde_json::json!(RecordStatus::Inserting), "INS");
        assert_eq!(serde_json::json!(MovementType::Collected), "INC");
    }
}
