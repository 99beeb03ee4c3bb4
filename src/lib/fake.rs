//! In-memory stand-ins for the photo source and the storage. They record every
//! call so tests can check what a [`crate::Backup`] did without touching the
//! network.
use std::{collections::HashSet, sync::Arc};

use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;
use tokio::sync::Mutex;

use crate::{
    api::{ApiError, Photo},
    disk_path, DirectoryStatus, PhotoSource, Storage,
};

/// A photo source that hands out a fixed list, or fails with an HTTP status.
#[derive(Debug, Clone, Default)]
pub struct FakePhotoSource {
    pub photos: Vec<Photo>,
    pub fail_with: Option<u16>,
    pub calls: Arc<Mutex<usize>>,
}

impl FakePhotoSource {
    pub fn new(photos: Vec<Photo>) -> Self {
        Self {
            photos,
            ..Default::default()
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            fail_with: Some(status),
            ..Default::default()
        }
    }

    pub async fn calls(&self) -> usize {
        *self.calls.lock().await
    }
}

#[async_trait]
impl PhotoSource for FakePhotoSource {
    async fn fetch_photos(&self) -> Result<Vec<Photo>> {
        *self.calls.lock().await += 1;
        if let Some(status) = self.fail_with {
            return Err(fake_error(status).into());
        }
        Ok(self.photos.clone())
    }
}

/// One accepted upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeUpload {
    pub source_url: String,
    pub file_name: String,
    pub directory: String,
}

impl FakeUpload {
    pub fn path(&self) -> String {
        disk_path(&self.directory, &self.file_name)
    }
}

/// A storage that keeps directories and uploads in memory. Status overrides
/// make the corresponding call fail the way the remote service would.
#[derive(Debug, Clone, Default)]
pub struct FakeStorage {
    pub directories: Arc<Mutex<HashSet<String>>>,
    pub uploads: Arc<Mutex<Vec<FakeUpload>>>,

    /// Status `create_directory` answers with; 201 and 409 still succeed
    pub directory_status: Option<u16>,

    /// Status returned by `upload_file` instead of 202
    pub upload_status: Option<u16>,

    /// Fail only once this many uploads were accepted
    pub fail_after: usize,
}

impl FakeStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn with_directory(self, path: impl Into<String>) -> Self {
        self.directories.lock().await.insert(path.into());
        self
    }

    pub fn with_directory_status(mut self, status: u16) -> Self {
        self.directory_status = Some(status);
        self
    }

    pub fn with_upload_status(mut self, status: u16) -> Self {
        self.upload_status = Some(status);
        self
    }

    pub fn with_fail_after(mut self, uploads: usize) -> Self {
        self.fail_after = uploads;
        self
    }

    pub async fn uploads(&self) -> Vec<FakeUpload> {
        self.uploads.lock().await.clone()
    }

    pub async fn has_directory(&self, path: &str) -> bool {
        self.directories.lock().await.contains(path)
    }
}

#[async_trait]
impl Storage for FakeStorage {
    async fn create_directory(&self, path: &str) -> Result<DirectoryStatus> {
        match self.directory_status {
            Some(201) => return Ok(DirectoryStatus::Created),
            Some(409) => return Ok(DirectoryStatus::AlreadyExists),
            Some(status) => return Err(fake_error(status).into()),
            None => {}
        }

        let mut directories = self.directories.lock().await;
        if directories.insert(path.to_string()) {
            info!("Folder '{}' created.", path);
            Ok(DirectoryStatus::Created)
        } else {
            info!("Folder '{}' already exists.", path);
            Ok(DirectoryStatus::AlreadyExists)
        }
    }

    async fn upload_file(
        &self,
        source_url: &str,
        file_name: &str,
        directory: &str,
    ) -> Result<serde_json::Value> {
        let mut uploads = self.uploads.lock().await;
        if let Some(status) = self.upload_status {
            if uploads.len() >= self.fail_after {
                return Err(fake_error(status).into());
            }
        }

        let upload = FakeUpload {
            source_url: source_url.to_string(),
            file_name: file_name.to_string(),
            directory: directory.to_string(),
        };
        debug!("Fake upload {} -> {}", source_url, upload.path());
        uploads.push(upload);

        Ok(json!({
            "href": format!("https://fake.disk/operations/{}", uploads.len()),
            "method": "GET",
            "templated": false,
        }))
    }
}

fn fake_error(status: u16) -> ApiError {
    ApiError::Status {
        service: "fake",
        status,
        body: format!("fake failure {}", status),
    }
}
