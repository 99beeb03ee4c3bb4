use anyhow::Result;
use async_trait::async_trait;
use derive_more::*;
use serde::{Deserialize, Serialize};
use vk_photo_backup_derive::ApiRequest;

use crate::{AccessToken, ApiError, Client, PhotoSource, VkResponse};

/// VK method that lists photos in an album.
pub const PHOTOS_GET: &str = "photos.get";

/// Numeric or short-name identifier of the VK account being backed up.
#[derive(Debug, Clone, PartialEq, Eq, From, Into, FromStr, Display)]
pub struct OwnerId(String);

impl OwnerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for OwnerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Likes {
    /// Number of users who liked the photo
    pub count: u64,
}

/// One rendition of a photo.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PhotoSize {
    /// Size category, e.g. `s`, `m`, `x`, `z`, `w`
    #[serde(rename = "type")]
    pub size_type: String,

    /// Width in pixels; zero for some old uploads
    pub width: u32,

    /// Height in pixels; zero for some old uploads
    pub height: u32,

    /// Where the rendition can be downloaded
    pub url: String,
}

impl PhotoSize {
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Photo {
    /// Photo identifier, unique per owner. Not every response carries it.
    #[serde(default)]
    pub id: Option<i64>,

    /// Upload date in Unix time
    pub date: i64,

    /// Available renditions. Requires `photo_sizes=1`.
    pub sizes: Vec<PhotoSize>,

    /// Like counter. Requires `extended=1`.
    pub likes: Likes,
}

impl Photo {
    /// Returns the rendition with the most pixels. The first one wins a tie.
    pub fn largest_size(&self) -> Option<&PhotoSize> {
        let mut largest: Option<&PhotoSize> = None;
        for size in &self.sizes {
            if largest.map_or(true, |l| size.area() > l.area()) {
                largest = Some(size);
            }
        }
        largest
    }
}

/// Payload of a successful `photos.get` call.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PhotoList {
    #[serde(default)]
    pub count: Option<u64>,
    pub items: Vec<Photo>,
}

#[derive(Debug, Serialize, Clone, ApiRequest)]
pub struct PhotosGetRequest<'a> {
    /// Account that owns the album
    pub owner_id: &'a str,

    /// Album selector; `profile` is the avatar album
    pub album_id: &'a str,

    pub access_token: &'a str,

    /// API version
    pub v: &'a str,

    /// Set to 1 to include likes
    pub extended: u8,

    /// Set to 1 to include `sizes`
    pub photo_sizes: u8,
}

/// Lists a user's profile photos through the VK API.
#[derive(Debug, Clone)]
pub struct VkApi {
    client: Client,
    owner_id: OwnerId,
    token: AccessToken,
    version: String,
}

impl VkApi {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.vk.com/method";
    pub const DEFAULT_VERSION: &'static str = "5.131";

    /// Returns a client for `owner_id`'s photos. Fails if either argument is
    /// blank.
    pub fn new(
        client: Client,
        owner_id: impl Into<OwnerId>,
        token: impl Into<AccessToken>,
    ) -> Result<Self> {
        let owner_id = owner_id.into();
        let token = token.into();
        if owner_id.as_str().trim().is_empty() {
            return Err(ApiError::MissingParameter("VK owner id").into());
        }
        if token.is_empty() {
            return Err(ApiError::MissingParameter("VK access token").into());
        }

        Ok(Self {
            client,
            owner_id,
            token,
            version: Self::DEFAULT_VERSION.to_string(),
        })
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn owner_id(&self) -> &OwnerId {
        &self.owner_id
    }

    /// Calls `photos.get` for the profile album.
    pub async fn get_profile_photos(&self) -> Result<PhotoList> {
        let req = PhotosGetRequest {
            owner_id: self.owner_id.as_str(),
            album_id: "profile",
            access_token: self.token.as_str(),
            v: &self.version,
            extended: 1,
            photo_sizes: 1,
        };

        let response = self.client.get(PHOTOS_GET, &req).await?;
        if !response.is_success() {
            return Err(response.into_error("VK").into());
        }

        VkResponse::<PhotoList>::from_str(&response.body)?.into_result()
    }
}

#[async_trait]
impl PhotoSource for VkApi {
    async fn fetch_photos(&self) -> Result<Vec<Photo>> {
        let list = self.get_profile_photos().await?;
        info!(
            "Fetched {} profile photos of {}",
            list.items.len(),
            self.owner_id
        );
        Ok(list.items)
    }
}
