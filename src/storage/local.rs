use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::{
    error::{Result, TattooError},
    models::InlineImage,
    storage::traits::{ImageStorage, SavedImage},
};

const FILE_PREFIX: &str = "generated_image";
const FILE_SUFFIX: &str = ".png";
const MAX_CLAIM_ATTEMPTS: u64 = 32;

/// Flat directory of `generated_image<N>.png` files.
///
/// Saves inside one process are serialized; files are created with
/// create-new semantics so a writer from another process bumps the index
/// instead of overwriting.
pub struct LocalImageStore {
    dir: PathBuf,
    lock: Mutex<()>,
}

pub fn file_name(index: u64) -> String {
    format!("{}{}{}", FILE_PREFIX, index, FILE_SUFFIX)
}

/// `generated_image12.png` -> `Some(12)`; anything else -> `None`.
pub fn parse_index(file_name: &str) -> Option<u64> {
    let digits = file_name
        .strip_prefix(FILE_PREFIX)?
        .strip_suffix(FILE_SUFFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn successor(index: u64) -> Result<u64> {
    index.checked_add(1).ok_or_else(|| {
        TattooError::IoError(std::io::Error::new(
            ErrorKind::Other,
            format!("image index {} has no successor", index),
        ))
    })
}

impl LocalImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            lock: Mutex::new(()),
        }
    }

    async fn scan(&self) -> Result<Vec<SavedImage>> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut found = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if let Some(index) = entry.file_name().to_str().and_then(parse_index) {
                found.push(SavedImage {
                    index,
                    path: entry.path(),
                });
            }
        }
        found.sort_by_key(|saved| saved.index);
        Ok(found)
    }

    async fn max_index(&self) -> Result<u64> {
        Ok(self.scan().await?.last().map_or(0, |saved| saved.index))
    }
}

#[async_trait]
impl ImageStorage for LocalImageStore {
    async fn save(&self, image: &InlineImage) -> Result<SavedImage> {
        let _guard = self.lock.lock().await;
        tokio::fs::create_dir_all(&self.dir).await?;

        let mut index = successor(self.max_index().await?)?;
        for _ in 0..MAX_CLAIM_ATTEMPTS {
            let path = self.dir.join(file_name(index));
            let opened = tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await;

            match opened {
                Ok(mut file) => {
                    file.write_all(&image.data).await?;
                    file.flush().await?;
                    log::info!("💾 Saved generated image to {}", path.display());
                    return Ok(SavedImage { index, path });
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    log::warn!("{} already exists, trying next index", path.display());
                    index = successor(index)?;
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(TattooError::IoError(std::io::Error::new(
            ErrorKind::AlreadyExists,
            format!(
                "could not claim a free file name in {} after {} attempts",
                self.dir.display(),
                MAX_CLAIM_ATTEMPTS
            ),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn image(byte: u8) -> InlineImage {
        InlineImage::png(vec![byte; 8])
    }

    #[test]
    fn test_parse_index() {
        assert_eq!(parse_index("generated_image1.png"), Some(1));
        assert_eq!(parse_index("generated_image42.png"), Some(42));
        assert_eq!(parse_index("generated_image.png"), None);
        assert_eq!(parse_index("generated_image3.jpg"), None);
        assert_eq!(parse_index("other7.png"), None);
        assert_eq!(parse_index("generated_image+7.png"), None);
        assert_eq!(parse_index("generated_image-7.png"), None);
        assert_eq!(parse_index("generated_image 7.png"), None);
        assert_eq!(file_name(5), "generated_image5.png");
    }

    #[tokio::test]
    async fn test_sequential_saves_number_from_one() {
        let tmp = tempfile::tempdir().unwrap();
        let store = LocalImageStore::new(tmp.path().join("out"));
        assert_eq!(store.max_index().await.unwrap(), 0);

        for i in 1..=3u8 {
            let saved = store.save(&image(i)).await.unwrap();
            assert_eq!(saved.index, i as u64);
        }

        let listed = store.scan().await.unwrap();
        let indices: Vec<u64> = listed.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
        assert_eq!(std::fs::read(&listed[1].path).unwrap(), vec![2u8; 8]);
    }

    #[tokio::test]
    async fn test_continues_after_highest_existing_index() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("generated_image7.png"), b"x").unwrap();
        std::fs::write(tmp.path().join("generated_image2.png"), b"x").unwrap();
        std::fs::write(tmp.path().join("notes.txt"), b"x").unwrap();

        let store = LocalImageStore::new(tmp.path());
        let saved = store.save(&image(1)).await.unwrap();
        assert_eq!(saved.index, 8);
        assert!(tmp.path().join("generated_image8.png").exists());
    }

    #[tokio::test]
    async fn test_concurrent_saves_do_not_overwrite() {
        let tmp = tempfile::tempdir().unwrap();
        let store = Arc::new(LocalImageStore::new(tmp.path()));

        let handles: Vec<_> = (0..8u8)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.save(&image(i)).await.unwrap().index })
            })
            .collect();

        let mut indices = Vec::new();
        for handle in handles {
            indices.push(handle.await.unwrap());
        }
        indices.sort_unstable();
        assert_eq!(indices, (1..=8).collect::<Vec<u64>>());
    }

    #[tokio::test]
    async fn test_separate_stores_on_one_dir_skip_claimed_names() {
        let tmp = tempfile::tempdir().unwrap();
        let first = Arc::new(LocalImageStore::new(tmp.path()));
        let second = Arc::new(LocalImageStore::new(tmp.path()));

        let handles: Vec<_> = (0..16u8)
            .map(|i| {
                let store = if i % 2 == 0 {
                    Arc::clone(&first)
                } else {
                    Arc::clone(&second)
                };
                tokio::spawn(async move {
                    let saved = store.save(&image(i)).await.unwrap();
                    (saved, i)
                })
            })
            .collect();

        let mut saved = Vec::new();
        for handle in handles {
            saved.push(handle.await.unwrap());
        }

        let mut indices: Vec<u64> = saved.iter().map(|(s, _)| s.index).collect();
        indices.sort_unstable();
        assert_eq!(indices, (1..=16).collect::<Vec<u64>>());

        for (s, byte) in &saved {
            assert_eq!(std::fs::read(&s.path).unwrap(), vec![*byte; 8]);
        }
    }

    #[tokio::test]
    async fn test_index_overflow_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join(file_name(u64::MAX)), b"x").unwrap();

        let store = LocalImageStore::new(tmp.path());
        assert!(matches!(
            store.save(&image(1)).await,
            Err(TattooError::IoError(_))
        ));
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 1);
    }
}
