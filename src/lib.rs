//! inkgen: previews tattoo designs on a user's photo.
//!
//! The service takes a photo and a few style fields, builds a prompt, sends
//! both to a Gemini multimodal model and relays the text/image reply as JSON
//! or a rendered HTML page. Generated images are kept in a flat directory as
//! `generated_image<N>.png`.

pub mod config;
pub mod error;
pub mod gemini;
pub mod imaging;
pub mod logger;
pub mod models;
pub mod prompt;
pub mod server;
pub mod storage;

pub use config::{Config, GeminiConfig};
pub use error::{Result, TattooError};
pub use gemini::{ContentGenerator, GeminiClient};
pub use models::*;
pub use storage::{ImageStorage, LocalImageStore, SavedImage};
