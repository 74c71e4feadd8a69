pub mod status;

pub use status::{RenderRequest, ServerStatus, StatusSummary};
