pub mod error_details;
pub mod function_key;
pub mod request_id;

pub use error_details::{redact_error_details_middleware, RedactErrorDetails};
pub use function_key::{function_key_middleware, FunctionKey};
pub use request_id::{get_request_id, request_id_middleware, RequestId};
