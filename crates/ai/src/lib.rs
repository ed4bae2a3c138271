mod client;
pub use client::OpenAiProvider;

mod embed;
pub use embed::{Embedder, order_rows};

mod extract_json;
pub use extract_json::extract_json;

mod generate_text;
pub use generate_text::{GenerationOptions, TextGenerator};
