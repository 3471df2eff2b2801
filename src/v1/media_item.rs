/*
 * Copyright (c) 2026 The gphotos-upload Authors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::v1::client::Client;
use crate::v1::errors::GPhotosError;
use crate::v1::upload::UploadToken;
use num_enum::TryFromPrimitive;
use serde::Deserialize;
use serde_json::json;

const BATCH_CREATE_PATH: &str = "/v1/mediaItems:batchCreate";

/// Holds information returned from the MediaItem API.
///
/// See [Google Photos API Docs](https://developers.google.com/photos/library/reference/rest/v1/mediaItems)
/// for more details on the individual fields.
#[derive(Deserialize, Debug)]
pub struct MediaItem {
    pub id: String,

    #[serde(default)]
    pub description: String,

    #[serde(rename = "productUrl")]
    pub product_url: Option<String>,

    #[serde(rename = "mimeType")]
    pub mime_type: Option<String>,

    pub filename: Option<String>,
}

impl MediaItem {
    /// Redeems an upload token into a permanent library media item, optionally
    /// placing it into the given album.
    ///
    /// The token is consumed: the API treats it as single-use, so it cannot be
    /// redeemed twice. Returns the per-item result; inspect
    /// [`NewMediaItemResult::status`] for the server's verdict on the item.
    pub async fn create_from_upload(
        client: &Client,
        album_id: Option<&str>,
        token: UploadToken,
    ) -> Result<NewMediaItemResult, GPhotosError> {
        let mut body = json!({
            "newMediaItems": [{
                "description": "",
                "simpleMediaItem": { "uploadToken": token.into_inner() }
            }]
        });
        if let Some(id) = album_id {
            body["albumId"] = json!(id);
        }
        let data = serde_json::to_vec(&body)?;

        let resp = client
            .post_json::<BatchCreateResponse>(BATCH_CREATE_PATH, data)
            .await?;

        // A response without the results array is a failed call even when the
        // HTTP status was ok.
        resp.new_media_item_results
            .and_then(|mut results| {
                if results.is_empty() {
                    None
                } else {
                    Some(results.swap_remove(0))
                }
            })
            .ok_or(GPhotosError::ResponseMissing())
    }
}

/// Per-item outcome of a batch creation call
#[derive(Deserialize, Debug)]
pub struct NewMediaItemResult {
    #[serde(rename = "uploadToken")]
    pub upload_token: Option<String>,

    pub status: Option<Status>,

    #[serde(rename = "mediaItem")]
    pub media_item: Option<MediaItem>,
}

impl NewMediaItemResult {
    /// Converts the server's per-item verdict into a result: the created media
    /// item (when the server returned one) or the item's rejection.
    pub fn into_outcome(self) -> Result<Option<MediaItem>, GPhotosError> {
        match self.status {
            Some(status) if status.is_error() => {
                let code = status.code.unwrap_or_default();
                let message = status
                    .message
                    .unwrap_or_else(|| rpc_code_name(code));
                Err(GPhotosError::ItemRejected { code, message })
            }
            _ => Ok(self.media_item),
        }
    }
}

/// `google.rpc.Status` as attached to each batch creation result
#[derive(Deserialize, Debug)]
pub struct Status {
    pub code: Option<i32>,
    pub message: Option<String>,
}

impl Status {
    /// A present, positive code marks the item as failed; an absent or
    /// non-positive code is success.
    pub fn is_error(&self) -> bool {
        self.code.is_some_and(|code| code > 0)
    }
}

/// Item status codes per the google.rpc.Code definition
#[derive(Debug, TryFromPrimitive)]
#[repr(i32)]
pub enum RpcStatusCode {
    Ok = 0,
    Cancelled = 1,
    Unknown = 2,
    InvalidArgument = 3,
    DeadlineExceeded = 4,
    NotFound = 5,
    AlreadyExists = 6,
    PermissionDenied = 7,
    ResourceExhausted = 8,
    FailedPrecondition = 9,
    Aborted = 10,
    OutOfRange = 11,
    Unimplemented = 12,
    Internal = 13,
    Unavailable = 14,
    DataLoss = 15,
    Unauthenticated = 16,
}

// Readable stand-in for a status that came back without a message
fn rpc_code_name(code: i32) -> String {
    RpcStatusCode::try_from(code)
        .map(|known| format!("{known:?}"))
        .unwrap_or_else(|_| format!("status code {code}"))
}

// Expected response from a batch creation request
#[derive(Deserialize, Debug)]
struct BatchCreateResponse {
    #[serde(rename = "newMediaItemResults")]
    new_media_item_results: Option<Vec<NewMediaItemResult>>,
}
