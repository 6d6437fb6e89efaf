pub mod bids;
pub mod carriers;
pub mod registrations;
pub mod rfps;
pub mod tender;
