use std::path::PathBuf;

use mockito::{Matcher, Server};
use serde_json::json;
use tempfile::TempDir;
use vk_photo_backup::{
    fake::{FakePhotoSource, FakeStorage},
    *,
};

fn size(size_type: &str, width: u32, height: u32, id: i64) -> PhotoSize {
    PhotoSize {
        size_type: size_type.to_string(),
        width,
        height,
        url: format!("https://img.vk/{}_{}.jpg", id, size_type),
    }
}

fn photo(id: i64, likes: u64, date: i64) -> Photo {
    Photo {
        id: Some(id),
        date,
        likes: Likes { count: likes },
        sizes: vec![
            size("s", 75, 75, id),
            size("z", 1080, 1080, id),
            size("m", 130, 130, id),
        ],
    }
}

fn config(dir: &TempDir) -> Config {
    Config::default().with_manifest_path(dir.path().join("saved_photos.json"))
}

fn read_manifest(path: &PathBuf) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn keeps_the_most_liked() {
    vk_photo_backup::init_logger();
    let dir = TempDir::new().unwrap();
    let config = config(&dir).with_photo_limit(2);
    let manifest_path = config.manifest_path.clone();

    let backup = Backup::new(
        FakePhotoSource::new(vec![photo(1, 10, 100), photo(2, 50, 200), photo(3, 20, 300)]),
        FakeStorage::new(),
        config,
    );
    let manifest = backup.run().await.unwrap();

    let uploads = backup.storage().uploads().await;
    let urls: Vec<&str> = uploads.iter().map(|u| u.source_url.as_str()).collect();
    assert_eq!(urls, vec!["https://img.vk/2_z.jpg", "https://img.vk/3_z.jpg"]);
    assert!(uploads.iter().all(|u| u.directory == "/vk_photos"));
    assert!(backup.storage().has_directory("/vk_photos").await);

    assert_eq!(
        read_manifest(&manifest_path),
        json!([
            { "file_name": "50.jpg", "size": "z" },
            { "file_name": "20.jpg", "size": "z" }
        ])
    );
    assert_eq!(manifest.len(), 2);
}

#[tokio::test]
async fn fewer_photos_than_limit_uploads_all() {
    let dir = TempDir::new().unwrap();
    let backup = Backup::new(
        FakePhotoSource::new(vec![photo(1, 3, 0), photo(2, 7, 0)]),
        FakeStorage::new(),
        config(&dir),
    );
    let manifest = backup.run().await.unwrap();

    assert_eq!(backup.storage().uploads().await.len(), 2);
    let names: Vec<&str> = manifest.photos.iter().map(|p| p.file_name.as_str()).collect();
    assert_eq!(names, vec!["7.jpg", "3.jpg"]);
}

#[tokio::test]
async fn more_photos_than_limit_truncates_with_stable_ties() {
    let dir = TempDir::new().unwrap();
    let photos = (1..=8).map(|id| photo(id, (id % 3) as u64, id * 10)).collect();
    let backup = Backup::new(FakePhotoSource::new(photos), FakeStorage::new(), config(&dir));
    backup.run().await.unwrap();

    // likes by id: 1,2,0,1,2,0,1,2
    let urls: Vec<String> = backup
        .storage()
        .uploads()
        .await
        .into_iter()
        .map(|u| u.source_url)
        .collect();
    assert_eq!(
        urls,
        vec![
            "https://img.vk/2_z.jpg",
            "https://img.vk/5_z.jpg",
            "https://img.vk/8_z.jpg",
            "https://img.vk/1_z.jpg",
            "https://img.vk/4_z.jpg",
        ]
    );
}

#[tokio::test]
async fn equal_likes_get_distinct_names() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir);
    let manifest_path = config.manifest_path.clone();
    let backup = Backup::new(
        FakePhotoSource::new(vec![photo(1, 10, 1111), photo(2, 10, 2222), photo(3, 10, 2222)]),
        FakeStorage::new(),
        config,
    );
    backup.run().await.unwrap();

    assert_eq!(
        read_manifest(&manifest_path),
        json!([
            { "file_name": "10.jpg", "size": "z" },
            { "file_name": "10_2222.jpg", "size": "z" },
            { "file_name": "10_2222_3.jpg", "size": "z" }
        ])
    );
    let paths: Vec<String> = backup
        .storage()
        .uploads()
        .await
        .iter()
        .map(|u| u.path())
        .collect();
    assert_eq!(
        paths,
        vec![
            "/vk_photos/10.jpg",
            "/vk_photos/10_2222.jpg",
            "/vk_photos/10_2222_3.jpg"
        ]
    );
}

#[tokio::test]
async fn existing_directory_is_not_fatal() {
    let dir = TempDir::new().unwrap();
    let backup = Backup::new(
        FakePhotoSource::new(vec![photo(1, 1, 0)]),
        FakeStorage::new().with_directory_status(409),
        config(&dir),
    );
    let manifest = backup.run().await.unwrap();
    assert_eq!(manifest.len(), 1);
    assert_eq!(backup.storage().uploads().await.len(), 1);

    let storage = FakeStorage::new().with_directory("/vk_photos").await;
    let backup = Backup::new(FakePhotoSource::new(vec![photo(1, 1, 0)]), storage, config(&dir));
    backup.run().await.unwrap();
    assert_eq!(backup.storage().uploads().await.len(), 1);
}

#[tokio::test]
async fn directory_failure_stops_before_uploads() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir);
    let manifest_path = config.manifest_path.clone();
    let backup = Backup::new(
        FakePhotoSource::new(vec![photo(1, 1, 0)]),
        FakeStorage::new().with_directory_status(403),
        config,
    );

    let err = backup.run().await.unwrap_err();
    assert_eq!(
        err.downcast_ref::<ApiError>().and_then(ApiError::status),
        Some(403)
    );
    assert!(backup.storage().uploads().await.is_empty());
    assert!(!manifest_path.exists());
}

#[tokio::test]
async fn upload_failure_writes_no_manifest() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir);
    let manifest_path = config.manifest_path.clone();
    let backup = Backup::new(
        FakePhotoSource::new(vec![photo(1, 5, 0), photo(2, 4, 0), photo(3, 3, 0)]),
        FakeStorage::new().with_upload_status(500).with_fail_after(1),
        config,
    );

    let err = backup.run().await.unwrap_err();
    assert_eq!(
        err.downcast_ref::<ApiError>().and_then(ApiError::status),
        Some(500)
    );
    // The first upload went through and stays in storage.
    assert_eq!(backup.storage().uploads().await.len(), 1);
    assert!(!manifest_path.exists());
}

#[tokio::test]
async fn source_failure_touches_nothing() {
    let dir = TempDir::new().unwrap();
    let backup = Backup::new(FakePhotoSource::failing(401), FakeStorage::new(), config(&dir));

    assert!(backup.run().await.is_err());
    assert_eq!(backup.source().calls().await, 1);
    assert!(!backup.storage().has_directory("/vk_photos").await);
}

#[tokio::test]
async fn photo_without_sizes_is_malformed() {
    let dir = TempDir::new().unwrap();
    let mut bare = photo(1, 1, 0);
    bare.sizes.clear();
    let backup = Backup::new(FakePhotoSource::new(vec![bare]), FakeStorage::new(), config(&dir));

    let err = backup.run().await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ApiError>(),
        Some(ApiError::Malformed(_))
    ));
}

#[tokio::test]
async fn manifest_is_replaced_each_run() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir);
    let manifest_path = config.manifest_path.clone();
    std::fs::write(&manifest_path, "[{\"file_name\": \"old.jpg\", \"size\": \"x\"}]").unwrap();

    let backup = Backup::new(FakePhotoSource::new(vec![]), FakeStorage::new(), config);
    let manifest = backup.run().await.unwrap();

    assert!(manifest.is_empty());
    assert_eq!(std::fs::read_to_string(&manifest_path).unwrap(), "[]");
    assert!(backup.storage().has_directory("/vk_photos").await);
}

#[tokio::test]
async fn unwritable_manifest_is_a_manifest_error() {
    let dir = TempDir::new().unwrap();
    let config = Config::default().with_manifest_path(dir.path().join("missing/saved_photos.json"));
    let backup = Backup::new(
        FakePhotoSource::new(vec![photo(1, 1, 0)]),
        FakeStorage::new(),
        config,
    );

    let err = backup.run().await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ManifestError>(),
        Some(ManifestError::Write { .. })
    ));
}

#[tokio::test]
async fn connect_uses_config_endpoints_and_version() {
    let mut vk_server = Server::new_async().await;
    let mut disk_server = Server::new_async().await;
    let dir = TempDir::new().unwrap();

    let photos = vk_server
        .mock("GET", "/method/photos.get")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("owner_id".into(), "42".into()),
            Matcher::UrlEncoded("v".into(), "5.199".into()),
        ]))
        .with_status(200)
        .with_body(
            json!({
                "response": {
                    "count": 3,
                    "items": [
                        { "id": 1, "date": 100, "likes": { "count": 10 },
                          "sizes": [ { "type": "x", "width": 604, "height": 453, "url": "https://img.vk/1.jpg" } ] },
                        { "id": 2, "date": 200, "likes": { "count": 50 },
                          "sizes": [ { "type": "w", "width": 2560, "height": 1920, "url": "https://img.vk/2.jpg" } ] },
                        { "id": 3, "date": 300, "likes": { "count": 20 },
                          "sizes": [ { "type": "y", "width": 807, "height": 605, "url": "https://img.vk/3.jpg" } ] }
                    ]
                }
            })
            .to_string(),
        )
        .create_async()
        .await;
    let folder = disk_server
        .mock("PUT", "/v1/disk/resources")
        .match_query(Matcher::UrlEncoded("path".into(), "/vk_photos".into()))
        .with_status(409)
        .create_async()
        .await;
    let uploads = disk_server
        .mock("POST", "/v1/disk/resources/upload")
        .match_query(Matcher::Any)
        .match_header("authorization", "OAuth disk-token")
        .with_status(202)
        .with_body(json!({ "href": "https://disk/op", "method": "GET", "templated": false }).to_string())
        .expect(2)
        .create_async()
        .await;

    let config = Config::default()
        .with_photo_limit(2)
        .with_manifest_path(dir.path().join("saved_photos.json"))
        .with_vk_api_version("5.199")
        .with_vk_base_url(format!("{}/method", vk_server.url()))
        .with_disk_base_url(format!("{}/v1/disk", disk_server.url()));
    let manifest_path = config.manifest_path.clone();
    let backup = Backup::connect(config, "42", "vk-token", "disk-token").unwrap();
    backup.run().await.unwrap();
    photos.assert_async().await;
    folder.assert_async().await;
    uploads.assert_async().await;

    assert_eq!(
        read_manifest(&manifest_path),
        json!([
            { "file_name": "50.jpg", "size": "w" },
            { "file_name": "20.jpg", "size": "y" }
        ])
    );
}

#[tokio::test]
async fn connect_rejects_blank_tokens() {
    let err = Backup::connect(Config::default(), "42", "vk-token", " ").unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ApiError>(),
        Some(ApiError::MissingParameter(_))
    ));
}

#[tokio::test]
async fn photos_without_ids_get_counter_names() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir);
    let manifest_path = config.manifest_path.clone();
    let photos = (1..=3)
        .map(|n| Photo {
            id: None,
            ..photo(n, 10, 777)
        })
        .collect();
    let backup = Backup::new(FakePhotoSource::new(photos), FakeStorage::new(), config);
    backup.run().await.unwrap();

    assert_eq!(
        read_manifest(&manifest_path),
        json!([
            { "file_name": "10.jpg", "size": "z" },
            { "file_name": "10_777.jpg", "size": "z" },
            { "file_name": "10_777_2.jpg", "size": "z" }
        ])
    );
}
