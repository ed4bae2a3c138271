mod api_key;
pub use api_key::ApiKeyConfigured;

mod shutdown_signal;
pub use shutdown_signal::shutdown_signal;

mod state;
pub use state::AppState;
