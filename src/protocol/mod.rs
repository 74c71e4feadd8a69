pub mod codec;
pub mod reply;

pub use codec::{CodecError, DEFAULT_PORT};
pub use reply::StatusReply;
