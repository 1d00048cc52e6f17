pub mod auth;
pub mod extract;
pub mod response;

pub use auth::{require_scope, ScopeGuard};
pub use extract::{JsonBody, RecordId};
pub use response::{envelope_method_not_allowed, ApiResponse, ApiResult};
