use oso::PolarClass;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The tenant boundary. Every carrier, registration, and RFP belongs to
/// exactly one organization.
#[derive(Clone, Debug, Serialize, Deserialize, PolarClass)]
pub struct Organization {
    #[polar(attribute)]
    pub id: Uuid,
}

impl Organization {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}
