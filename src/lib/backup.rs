//! `Backup` drives a single run: list photos, keep the most liked ones, copy
//! each one's largest rendition into storage, and write a manifest.
//!
//! Any failure aborts the run. Uploads that already went through stay in
//! storage, but the manifest is only written once every upload was accepted.
use anyhow::Result;

use crate::{
    api::{ApiError, DiskApi, OwnerId, Photo, VkApi},
    AccessToken, Client, Config, Manifest, PhotoSource, SavedPhoto, Storage,
};

#[derive(Debug)]
pub struct Backup<P, S> {
    source: P,
    storage: S,
    config: Config,
}

impl<P, S> Backup<P, S>
where
    P: PhotoSource + Send + Sync,
    S: Storage + Send + Sync,
{
    pub fn new(source: P, storage: S, config: Config) -> Self {
        Self {
            source,
            storage,
            config,
        }
    }

    pub fn source(&self) -> &P {
        &self.source
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs the backup and returns the manifest that was written.
    pub async fn run(&self) -> Result<Manifest> {
        let photos = self.source.fetch_photos().await?;
        self.storage.create_directory(&self.config.directory).await?;

        let selected = select_photos(photos, self.config.photo_limit);
        info!(
            "Backing up {} photos to '{}'",
            selected.len(),
            self.config.directory
        );

        let mut manifest = Manifest::new();
        for photo in &selected {
            let size = photo.largest_size().ok_or_else(|| {
                ApiError::Malformed(format!(
                    "photo with {} likes from {} has no sizes",
                    photo.likes.count, photo.date
                ))
            })?;
            let file_name = file_name_for(photo, &manifest);

            self.storage
                .upload_file(&size.url, &file_name, &self.config.directory)
                .await?;
            manifest.push(SavedPhoto {
                file_name,
                size: size.size_type.clone(),
            });
        }

        manifest.write_to(&self.config.manifest_path)?;
        info!(
            "Backup complete: {} photos saved, manifest at {}",
            manifest.len(),
            self.config.manifest_path.display()
        );
        Ok(manifest)
    }
}

impl Backup<VkApi, DiskApi> {
    /// Builds the VK and Yandex Disk clients from the endpoints and API version
    /// in `config`.
    pub fn connect(
        config: Config,
        owner_id: impl Into<OwnerId>,
        vk_token: impl Into<AccessToken>,
        disk_token: impl Into<AccessToken>,
    ) -> Result<Self> {
        let vk = VkApi::new(Client::new(&config.vk_base_url), owner_id, vk_token)?
            .with_version(&config.vk_api_version);
        let disk = DiskApi::new(Client::new(&config.disk_base_url), disk_token)?;
        Ok(Self::new(vk, disk, config))
    }
}

/// Sorts by likes, most liked first, and keeps the first `limit`. Photos with
/// equal likes stay in source order.
pub fn select_photos(mut photos: Vec<Photo>, limit: usize) -> Vec<Photo> {
    photos.sort_by(|a, b| b.likes.count.cmp(&a.likes.count));
    photos.truncate(limit);
    photos
}

/// Picks a file name for `photo` that isn't in `manifest` yet:
/// `{likes}.jpg`, then `{likes}_{date}.jpg`, then `{likes}_{date}_{id}.jpg`
/// when the photo has an id, then a numeric suffix on the last stem tried.
pub fn file_name_for(photo: &Photo, manifest: &Manifest) -> String {
    let likes = photo.likes.count;
    let mut stems = vec![likes.to_string(), format!("{}_{}", likes, photo.date)];
    if let Some(id) = photo.id {
        stems.push(format!("{}_{}_{}", likes, photo.date, id));
    }

    if let Some(stem) = stems
        .iter()
        .find(|s| !manifest.contains_file(&format!("{}.jpg", s)))
    {
        return format!("{}.jpg", stem);
    }

    let last = stems.last().cloned().unwrap_or_default();
    (2..)
        .map(|n| format!("{}_{}.jpg", last, n))
        .find(|c| !manifest.contains_file(c))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Likes;

    fn photo(id: i64, likes: u64, date: i64) -> Photo {
        Photo {
            id: Some(id),
            date,
            likes: Likes { count: likes },
            ..Default::default()
        }
    }

    fn saved(file_name: &str) -> SavedPhoto {
        SavedPhoto {
            file_name: file_name.into(),
            size: "z".into(),
        }
    }

    #[test]
    fn select_is_stable_and_truncates() {
        let photos = vec![photo(1, 10, 0), photo(2, 50, 0), photo(3, 10, 0), photo(4, 20, 0)];
        let ids: Vec<i64> = select_photos(photos.clone(), 3)
            .iter()
            .filter_map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![2, 4, 1]);

        let ids: Vec<i64> = select_photos(photos, 10)
            .iter()
            .filter_map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![2, 4, 1, 3]);
    }

    #[test]
    fn zero_limit_selects_nothing() {
        assert!(select_photos(vec![photo(1, 1, 0)], 0).is_empty());
    }

    #[test]
    fn names_escalate_on_collision() {
        let p = photo(7, 10, 1600000000);
        let mut manifest = Manifest::new();
        assert_eq!(file_name_for(&p, &manifest), "10.jpg");

        manifest.push(saved("10.jpg"));
        assert_eq!(file_name_for(&p, &manifest), "10_1600000000.jpg");

        manifest.push(saved("10_1600000000.jpg"));
        assert_eq!(file_name_for(&p, &manifest), "10_1600000000_7.jpg");

        manifest.push(saved("10_1600000000_7.jpg"));
        assert_eq!(file_name_for(&p, &manifest), "10_1600000000_7_2.jpg");

        manifest.push(saved("10_1600000000_7_2.jpg"));
        assert_eq!(file_name_for(&p, &manifest), "10_1600000000_7_3.jpg");
    }

    #[test]
    fn names_without_id_fall_back_to_counter() {
        let p = Photo {
            id: None,
            ..photo(0, 10, 1600000000)
        };
        let mut manifest = Manifest::new();
        manifest.push(saved("10.jpg"));
        manifest.push(saved("10_1600000000.jpg"));
        assert_eq!(file_name_for(&p, &manifest), "10_1600000000_2.jpg");

        manifest.push(saved("10_1600000000_2.jpg"));
        assert_eq!(file_name_for(&p, &manifest), "10_1600000000_3.jpg");
    }
}
