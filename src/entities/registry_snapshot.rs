use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Authoritative FMCSA-derived record for a carrier, captured at
/// verification time. Replaced wholesale whenever verification runs; the
/// raw payload is retained for audit and replay.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub legal_name: Option<String>,
    pub physical_address: Option<String>,
    pub phone: Option<String>,
    pub dot_number: Option<String>,
    pub mc_number: Option<String>,
    pub common_authority: AuthorityStatus,
    pub contract_authority: AuthorityStatus,
    pub broker_authority: AuthorityStatus,
    pub allowed_to_operate: Option<bool>,
    pub operation_code: OperationCode,
    pub active_status: bool,
    pub vehicle_oos_rate: f64,
    pub vehicle_oos_national_average: f64,
    pub driver_oos_rate: f64,
    pub driver_oos_national_average: f64,
    pub raw: serde_json::Value,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorityStatus {
    Active,
    Inactive,
    Unknown,
}

impl AuthorityStatus {
    pub fn is_active(&self) -> bool {
        match self {
            Self::Active => true,
            _ => false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationCode {
    Interstate,
    Intrastate,
    Unspecified,
}
