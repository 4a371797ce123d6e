//! In-process blob store.

use std::sync::Arc;

use dashmap::DashMap;
use mappin_core::traits::BlobStore;
use mappin_core::MappinResult;
use uuid::Uuid;

/// URL scheme of blobs served from memory.
pub const BLOB_URL_PREFIX: &str = "memory://blobs/";

/// Blob store keeping uploads in memory, addressed by generated URLs.
#[derive(Clone, Default)]
pub struct MemoryBlobStore {
    blobs: Arc<DashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    /// Create an empty blob store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes previously stored under `url`.
    pub fn fetch(&self, url: &str) -> Option<Vec<u8>> {
        self.blobs.get(url).map(|b| b.value().clone())
    }

    /// Number of stored blobs.
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    /// Whether nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

impl std::fmt::Debug for MemoryBlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryBlobStore")
            .field("blobs", &self.blobs.len())
            .finish()
    }
}

impl BlobStore for MemoryBlobStore {
    fn store(&self, bytes: &[u8]) -> MappinResult<String> {
        let url = format!("{}{}", BLOB_URL_PREFIX, Uuid::new_v4());
        self.blobs.insert(url.clone(), bytes.to_vec());
        tracing::debug!(%url, size = bytes.len(), "blob stored");
        Ok(url)
    }
}
