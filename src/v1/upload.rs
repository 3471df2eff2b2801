/*
 * Copyright (c) 2026 The gphotos-upload Authors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::v1::album::Album;
use crate::v1::client::Client;
use crate::v1::errors::GPhotosError;
use crate::v1::media_item::{MediaItem, NewMediaItemResult};
use std::path::{Path, PathBuf};

const UPLOADS_PATH: &str = "/v1/uploads";

/// Opaque, single-use handle returned by a raw byte upload.
///
/// Redeeming it through [`MediaItem::create_from_upload`] consumes the value,
/// so a token cannot be reused once spent.
#[derive(Debug)]
pub struct UploadToken(String);

impl UploadToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub(crate) fn into_inner(self) -> String {
        self.0
    }
}

/// Outcome of one file's pass through the upload pipeline.
///
/// `Ok(Some(item))` is a created media item, `Ok(None)` a creation the server
/// accepted without echoing the item back. Failures carry the stage that
/// produced them: reading the file, the raw upload, the batch creation call,
/// or the server's per-item rejection.
#[derive(Debug)]
pub struct UploadReport {
    pub file: PathBuf,
    pub outcome: Result<Option<MediaItem>, GPhotosError>,
}

/// Uploads files into the library through the two-phase protocol, optionally
/// attaching them to one album.
#[derive(Debug)]
pub struct Uploader {
    client: Client,
    album_id: Option<String>,
}

impl Uploader {
    pub fn new(client: Client, album_id: Option<String>) -> Self {
        Self { client, album_id }
    }

    /// Runs every file through the pipeline, in order, one at a time.
    ///
    /// Files are independent: a failure at any stage produces that file's
    /// failed report and processing moves on to the next file. Each outcome is
    /// logged as it completes; the returned reports are in submission order.
    pub async fn upload_files(&self, files: &[PathBuf]) -> Vec<UploadReport> {
        let mut reports = Vec::with_capacity(files.len());

        for file in files {
            log::info!("Uploading photo -- '{}'", file.display());

            let outcome = self.upload_one(file).await;
            match &outcome {
                Ok(_) => log::info!(
                    "Added '{}' to library{}",
                    display_name(file),
                    self.album_id
                        .as_deref()
                        .map_or(String::new(), |id| format!(" and album '{id}'")),
                ),
                Err(GPhotosError::Io(err)) => {
                    log::error!("Could not read file '{}' -- {}", file.display(), err)
                }
                Err(err) => {
                    log::error!("Could not add '{}' to library -- {}", display_name(file), err)
                }
            }

            reports.push(UploadReport {
                file: file.clone(),
                outcome,
            });
        }

        reports
    }

    // One file, four stages: read, raw upload, batch create, result check.
    async fn upload_one(&self, file: &Path) -> Result<Option<MediaItem>, GPhotosError> {
        let bytes = tokio::fs::read(file).await?;
        let token = self.raw_upload(file, bytes.into()).await?;
        let result: NewMediaItemResult =
            MediaItem::create_from_upload(&self.client, self.album_id.as_deref(), token).await?;
        result.into_outcome()
    }

    /// Posts a file's bytes and returns the upload token the server minted
    /// for them.
    ///
    /// Success is an HTTP 200 with a non-empty body; the body is the token.
    pub async fn raw_upload(
        &self,
        file: &Path,
        data: bytes::Bytes,
    ) -> Result<UploadToken, GPhotosError> {
        let resp = self
            .client
            .post_octets(UPLOADS_PATH, &display_name(file), data)
            .await?;

        if resp.status != 200 {
            return Err(GPhotosError::UploadRejected(resp.status, resp.text()));
        }
        if resp.body.is_empty() {
            return Err(GPhotosError::EmptyUploadToken());
        }
        Ok(UploadToken(resp.text()))
    }
}

/// Uploads the given photos, resolving `album_title` once beforehand when one
/// is named.
///
/// A named album that cannot be found or created aborts this batch only: the
/// failure has already been logged and an empty report vector comes back.
pub async fn upload_photos(
    client: &Client,
    photos: &[PathBuf],
    album_title: Option<&str>,
) -> Result<Vec<UploadReport>, GPhotosError> {
    let album_id = match album_title {
        Some(title) => match Album::find_or_create(client, title).await? {
            Some(id) => Some(id),
            // No destination exists to upload into.
            None => return Ok(Vec::new()),
        },
        None => None,
    };

    let uploader = Uploader::new(client.clone(), album_id);
    Ok(uploader.upload_files(photos).await)
}

/// Uploads one directory as an album named after its base name.
///
/// Only immediate regular files are taken, sorted by path so batches submit in
/// a stable order.
pub async fn upload_directory(
    client: &Client,
    dir: &Path,
) -> Result<Vec<UploadReport>, GPhotosError> {
    log::info!("Uploading photos in directory -- '{}'", dir.display());

    let dir = dir.canonicalize()?;
    let album_title = dir
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string());

    let mut files: Vec<PathBuf> = std::fs::read_dir(&dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    files.sort();

    upload_photos(client, &files, Some(&album_title)).await
}

/// Uploads each given directory as its own album, independently.
///
/// Entries that are not directories are skipped. Directories do not share
/// album state beyond whatever title matching naturally produces.
pub async fn upload_directories(
    client: &Client,
    dirs: &[PathBuf],
) -> Result<Vec<UploadReport>, GPhotosError> {
    let mut reports = Vec::new();
    for dir in dirs {
        if !dir.is_dir() {
            continue;
        }
        reports.extend(upload_directory(client, dir).await?);
    }
    Ok(reports)
}

// Base name for headers and log lines
fn display_name(file: &Path) -> String {
    file.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string())
}
