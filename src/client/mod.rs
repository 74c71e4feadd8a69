pub mod resolver;
pub mod status;

pub use resolver::{parse_address, resolve, Endpoint, ServerAddress};
pub use status::{query, RawStatus, StatusClient};
