use std::path::PathBuf;

use async_trait::async_trait;
use serde::Serialize;

use crate::{error::Result, models::InlineImage};

#[async_trait]
pub trait ImageStorage: Send + Sync {
    /// Persists `image` under the next free index.
    async fn save(&self, image: &InlineImage) -> Result<SavedImage>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedImage {
    pub index: u64,
    pub path: PathBuf,
}
