pub mod bid;
pub mod carrier;
pub mod invite;
pub mod lane;
pub mod registration;
pub mod registry_snapshot;
pub mod rfp;

pub use bid::{parse_rate, Bid, BidRow};
pub use carrier::{Carrier, CarrierForm, EquipmentType};
pub use invite::Invite;
pub use lane::{Lane, LaneRow};
pub use registration::{Registration, RegistrationRequest};
pub use registry_snapshot::{AuthorityStatus, OperationCode, RegistrySnapshot};
pub use rfp::{Rfp, TransportMode};
