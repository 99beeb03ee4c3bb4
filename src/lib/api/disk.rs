use anyhow::Result;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use vk_photo_backup_derive::ApiRequest;

use crate::{AccessToken, ApiError, Client, DirectoryStatus, Storage};

pub const RESOURCES: &str = "resources";
pub const RESOURCES_UPLOAD: &str = "resources/upload";

#[derive(Debug, Serialize, Clone, ApiRequest)]
pub struct CreateFolderRequest<'a> {
    /// Disk path of the folder to create
    pub path: &'a str,
}

#[derive(Debug, Serialize, Clone, ApiRequest)]
pub struct UploadUrlRequest<'a> {
    /// Where Disk should download the file from
    pub url: &'a str,

    /// Full destination path, including the file name
    pub path: &'a str,

    /// Replace an existing file at `path`
    pub overwrite: bool,
}

/// Joins a Disk directory and a file name.
pub fn disk_path(directory: &str, file_name: &str) -> String {
    format!("{}/{}", directory.trim_end_matches('/'), file_name)
}

/// Creates folders and uploads files on Yandex Disk.
#[derive(Debug, Clone)]
pub struct DiskApi {
    client: Client,
}

impl DiskApi {
    pub const DEFAULT_BASE_URL: &'static str = "https://cloud-api.yandex.net/v1/disk";

    /// Returns a Disk client authorized with `token`. `client` must not carry
    /// an `Authorization` header of its own.
    pub fn new(client: Client, token: impl Into<AccessToken>) -> Result<Self> {
        let token = token.into();
        if token.is_empty() {
            return Err(ApiError::MissingParameter("Yandex Disk token").into());
        }

        Ok(Self {
            client: client.with_authorization(format!("OAuth {}", token)),
        })
    }
}

#[async_trait]
impl Storage for DiskApi {
    async fn create_directory(&self, path: &str) -> Result<DirectoryStatus> {
        let response = self
            .client
            .put(RESOURCES, &CreateFolderRequest { path })
            .await?;

        match response.status {
            StatusCode::CREATED => {
                info!("Folder '{}' created.", path);
                Ok(DirectoryStatus::Created)
            }
            StatusCode::CONFLICT => {
                info!("Folder '{}' already exists.", path);
                Ok(DirectoryStatus::AlreadyExists)
            }
            _ => Err(response.into_error("Yandex Disk").into()),
        }
    }

    async fn upload_file(
        &self,
        source_url: &str,
        file_name: &str,
        directory: &str,
    ) -> Result<serde_json::Value> {
        let path = disk_path(directory, file_name);
        let req = UploadUrlRequest {
            url: source_url,
            path: &path,
            overwrite: true,
        };
        let response = self.client.post(RESOURCES_UPLOAD, &req).await?;

        if response.status != StatusCode::ACCEPTED {
            return Err(response.into_error("Yandex Disk").into());
        }

        let ack = serde_json::from_str(&response.body)
            .map_err(|e| ApiError::Malformed(format!("upload acknowledgement: {}", e)))?;
        info!("File '{}' queued for upload to '{}'.", file_name, directory);
        Ok(ack)
    }
}
