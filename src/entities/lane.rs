use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::EquipmentType;
use crate::error::{validation_error, Error};

/// A single origin->destination freight route inside an RFP. Lanes are
/// created in bulk from parsed upload rows and are immutable afterwards.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Lane {
    pub id: Uuid,
    pub rfp_id: Uuid,
    pub origin_city: String,
    pub origin_state: String,
    pub destination_city: String,
    pub destination_state: String,
    pub equipment: EquipmentType,
    pub frequency: Option<String>,
}

/// One parsed row from a lane upload.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LaneRow {
    pub origin_city: String,
    pub origin_state: String,
    pub destination_city: String,
    pub destination_state: String,
    pub equipment: EquipmentType,
    pub frequency: Option<String>,
}

impl Lane {
    pub fn from_row(rfp_id: Uuid, row: LaneRow) -> Result<Self, Error> {
        let origin_city = required(&row.origin_city, "origin city")?;
        let origin_state = required(&row.origin_state, "origin state")?;
        let destination_city = required(&row.destination_city, "destination city")?;
        let destination_state = required(&row.destination_state, "destination state")?;

        Ok(Self {
            id: Uuid::new_v4(),
            rfp_id,
            origin_city,
            origin_state,
            destination_city,
            destination_state,
            equipment: row.equipment,
            frequency: row.frequency.filter(|f| !f.trim().is_empty()),
        })
    }
}

fn required(value: &str, field: &str) -> Result<String, Error> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(validation_error(format!("lane row is missing {}", field)));
    }

    Ok(trimmed.to_string())
}

#[test]
fn rows_are_trimmed_and_validated() {
    let row = LaneRow {
        origin_city: " Chicago ".into(),
        origin_state: "IL".into(),
        destination_city: "Dallas".into(),
        destination_state: "TX".into(),
        equipment: EquipmentType::DryVan,
        frequency: Some("weekly".into()),
    };

    let lane = Lane::from_row(Uuid::new_v4(), row).unwrap();
    assert_eq!(lane.origin_city, "Chicago");
    assert_eq!(lane.frequency.as_deref(), Some("weekly"));
}

#[test]
fn blank_required_fields_are_rejected() {
    let row = LaneRow {
        origin_city: "Chicago".into(),
        origin_state: "IL".into(),
        destination_city: "  ".into(),
        destination_state: "TX".into(),
        equipment: EquipmentType::Reefer,
        frequency: None,
    };

    let err = Lane::from_row(Uuid::new_v4(), row).unwrap_err();
    assert_eq!(err.message, "lane row is missing destination city");
}
