//! Shared HTTP building blocks: response envelope, error mapping and the
//! validating JSON extractor.

mod error;
mod response;
mod validated_json;

pub use error::{bad_request, domain_error, parse_field, status_for, ApiError};
pub use response::{ApiResponse, EmptyData, PaginatedResponse, PaginationParams};
pub use validated_json::{ValidatedJson, ValidatedJsonRejection};
