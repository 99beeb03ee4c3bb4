/// Backs up the most liked VK profile photos of an account to Yandex Disk.
///
/// The VK owner id and both tokens are asked for interactively so they never
/// end up in shell history.
#[macro_use]
extern crate log;

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use argh::FromArgs;
use vk_photo_backup::*;

#[derive(FromArgs)]
/// Copy the most liked VK profile photos to Yandex Disk.
struct Args {
    /// number of photos to back up
    #[argh(option, default = "Config::DEFAULT_PHOTO_LIMIT")]
    limit: usize,

    /// yandex disk folder to upload into
    #[argh(option, default = "Config::DEFAULT_DIRECTORY.to_string()")]
    directory: String,

    /// where to write the manifest
    #[argh(option, default = "Config::DEFAULT_MANIFEST_PATH.to_string()")]
    manifest: String,

    /// vk api version to request
    #[argh(option, default = "VkApi::DEFAULT_VERSION.to_string()")]
    vk_api_version: String,
}

fn prompt(input: &mut impl BufRead, label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;

    let mut line = String::new();
    input
        .read_line(&mut line)
        .with_context(|| format!("Failed to read {}", label))?;
    Ok(line.trim().to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    vk_photo_backup::init_logger();
    let args: Args = argh::from_env();

    let config = Config::default()
        .with_photo_limit(args.limit)
        .with_directory(args.directory)
        .with_manifest_path(args.manifest)
        .with_vk_api_version(args.vk_api_version);

    let (owner_id, vk_token, disk_token) = {
        let mut input = io::stdin().lock();
        (
            prompt(&mut input, "VK user id")?,
            prompt(&mut input, "VK access token")?,
            prompt(&mut input, "Yandex Disk token")?,
        )
    };

    let backup = Backup::connect(config, owner_id, vk_token, disk_token)?;
    info!("Starting backup of {}...", backup.source().owner_id());
    let manifest = backup.run().await?;
    println!("Backup complete: {} photos saved.", manifest.len());
    Ok(())
}
