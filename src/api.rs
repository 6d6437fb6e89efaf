pub mod interface;
pub mod server;

pub use interface::*;
pub use server::serve;
