use std::path::PathBuf;

use crate::{DiskApi, VkApi};

/// Everything about a backup run that isn't a credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of photos to back up
    pub photo_limit: usize,

    /// Disk folder the photos go into
    pub directory: String,

    /// Local file the manifest is written to
    pub manifest_path: PathBuf,

    pub vk_base_url: String,
    pub vk_api_version: String,
    pub disk_base_url: String,
}

impl Config {
    pub const DEFAULT_PHOTO_LIMIT: usize = 5;
    pub const DEFAULT_DIRECTORY: &'static str = "/vk_photos";
    pub const DEFAULT_MANIFEST_PATH: &'static str = "saved_photos.json";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_photo_limit(mut self, photo_limit: usize) -> Self {
        self.photo_limit = photo_limit;
        self
    }

    pub fn with_directory(mut self, directory: impl Into<String>) -> Self {
        self.directory = directory.into();
        self
    }

    pub fn with_manifest_path(mut self, manifest_path: impl Into<PathBuf>) -> Self {
        self.manifest_path = manifest_path.into();
        self
    }

    pub fn with_vk_base_url(mut self, url: impl Into<String>) -> Self {
        self.vk_base_url = url.into();
        self
    }

    pub fn with_vk_api_version(mut self, version: impl Into<String>) -> Self {
        self.vk_api_version = version.into();
        self
    }

    pub fn with_disk_base_url(mut self, url: impl Into<String>) -> Self {
        self.disk_base_url = url.into();
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            photo_limit: Self::DEFAULT_PHOTO_LIMIT,
            directory: Self::DEFAULT_DIRECTORY.to_string(),
            manifest_path: PathBuf::from(Self::DEFAULT_MANIFEST_PATH),
            vk_base_url: VkApi::DEFAULT_BASE_URL.to_string(),
            vk_api_version: VkApi::DEFAULT_VERSION.to_string(),
            disk_base_url: DiskApi::DEFAULT_BASE_URL.to_string(),
        }
    }
}
