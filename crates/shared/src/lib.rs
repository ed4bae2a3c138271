mod error;
pub use error::{AppError, ErrorBody, ErrorKind};

mod env;
pub use env::{AppEnv, normalize_model};

mod json;
pub use json::Json;

mod retry;
pub use retry::RetryPolicy;
