//! The two capabilities the backup needs from the outside world. [`crate::VkApi`]
//! and [`crate::DiskApi`] implement them over HTTP, and [`crate::fake`] has
//! in-memory versions for tests.
use anyhow::Result;
use async_trait::async_trait;

use crate::api::Photo;

/// Outcome of an idempotent directory creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryStatus {
    Created,
    AlreadyExists,
}

/// Somewhere photos can be listed from.
#[async_trait]
pub trait PhotoSource {
    /// Returns every photo in the owner's profile album, in service order.
    async fn fetch_photos(&self) -> Result<Vec<Photo>>;
}

/// Somewhere photos can be copied to.
#[async_trait]
pub trait Storage {
    /// Creates `path`. Succeeds if it already exists.
    async fn create_directory(&self, path: &str) -> Result<DirectoryStatus>;

    /// Asks the storage to fetch `source_url` into `directory/file_name`,
    /// overwriting whatever is there. Returns once the request is accepted,
    /// not when the copy is done.
    async fn upload_file(
        &self,
        source_url: &str,
        file_name: &str,
        directory: &str,
    ) -> Result<serde_json::Value>;
}
