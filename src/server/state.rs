use std::sync::Arc;

use crate::{
    error::Result, gemini::ContentGenerator, server::render::Templates, storage::ImageStorage,
};

/// Application state shared across HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<dyn ContentGenerator>,
    pub storage: Arc<dyn ImageStorage>,
    pub templates: Arc<Templates>,
}

impl AppState {
    pub fn new(generator: Arc<dyn ContentGenerator>, storage: Arc<dyn ImageStorage>) -> Result<Self> {
        Ok(Self {
            generator,
            storage,
            templates: Arc::new(Templates::new()?),
        })
    }
}
