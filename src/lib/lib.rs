//! `vk_photo_backup` copies the most liked VK profile photos to Yandex Disk.
//!
//! # Framework
//!
//! The key components are:
//!
//! - [`Client`] is a thin shim around the HTTP client. Each remote service gets
//! its own `Client`, rooted at the service's base URL.
//!
//! - [`VkApi`] lists a user's profile photos. It implements [`PhotoSource`].
//!
//! - [`DiskApi`] creates folders and asks Yandex Disk to download files by URL.
//! It implements [`Storage`].
//!
//! - [`Backup`] ties them together: it keeps the `photo_limit` most liked
//! photos, uploads the largest rendition of each, and writes a [`Manifest`].
//!
//! [`fake`] has in-memory implementations of [`PhotoSource`] and [`Storage`]
//! for testing.
//!
//! # Example
//!
//! ```no_run
//! use vk_photo_backup::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default().with_photo_limit(3);
//!     let vk = VkApi::new(Client::new(&config.vk_base_url), "1", "vk-token")?;
//!     let disk = DiskApi::new(Client::new(&config.disk_base_url), "disk-token")?;
//!
//!     let manifest = Backup::new(vk, disk, config).run().await?;
//!     println!("saved {} photos", manifest.len());
//!     Ok(())
//! }
//! ```

#[macro_use]
extern crate log;

pub mod api;
pub mod backend;
pub mod backup;
pub mod client;
pub mod config;
pub mod fake;
pub mod manifest;

pub use api::*;
pub use backend::*;
pub use backup::*;
pub use client::*;
pub use config::*;
pub use manifest::*;

/// This method initializes [`env_logger`] from the environment, defaulting to `info` level logging.
pub fn init_logger() {
    // We use try_init here so it can by run by tests.
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
    debug!("Logger initialized.");
}
