/*
 * Copyright (c) 2026 The gphotos-upload Authors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::v1::client::Client;
use crate::v1::errors::GPhotosError;
use crate::v1::parsers::from_count_str;
use async_stream::try_stream;
use futures::{Stream, StreamExt, pin_mut};
use serde::Deserialize;
use serde_json::json;

const ALBUMS_PATH: &str = "/v1/albums";

/// Holds information returned from the Album API.
///
/// See [Google Photos API Docs](https://developers.google.com/photos/library/reference/rest/v1/albums)
/// for more details on the individual fields.
#[derive(Deserialize, Debug)]
pub struct Album {
    pub id: String,

    #[serde(default)]
    pub title: String,

    #[serde(rename = "productUrl")]
    pub product_url: Option<String>,

    #[serde(default, rename = "isWriteable")]
    pub is_writeable: bool,

    // The wire encodes the count as a decimal string; absent means empty
    #[serde(default, rename = "mediaItemsCount", deserialize_with = "from_count_str")]
    pub media_items_count: u64,

    #[serde(rename = "coverPhotoBaseUrl")]
    pub cover_photo_base_url: Option<String>,
}

impl Album {
    /// Retrieves the library's albums as a lazy stream.
    ///
    /// One page is fetched per network request, triggered as the stream is
    /// consumed; callers that stop early never force the remaining pages.
    /// With `app_created_only` the listing is restricted to albums created by
    /// this client's credential scope.
    pub fn list(
        client: &Client,
        app_created_only: bool,
    ) -> impl Stream<Item = Result<Album, GPhotosError>> {
        let client = client.clone();

        // Page through and return the albums as a stream.
        try_stream! {
            let mut page_token: Option<String> = None;

            loop {
                let cursor = page_token.take();
                let mut params: Vec<(&str, &str)> = vec![(
                    "excludeNonAppCreatedData",
                    if app_created_only { "true" } else { "false" },
                )];
                if let Some(token) = cursor.as_deref() {
                    params.push(("pageToken", token));
                }

                let resp = client
                    .get::<AlbumListResponse>(ALBUMS_PATH, Some(&params))
                    .await?;

                // A response without an album collection means the listing is
                // exhausted, not that something went wrong.
                let Some(albums) = resp.albums else { break };

                for album in albums {
                    yield album;
                }

                match resp.next_page_token {
                    Some(next) => page_token = Some(next),
                    None => break,
                }
            }
        }
    }

    /// Returns the id of the app-created album with the given title, creating
    /// the album when no title matches.
    ///
    /// Matching is case-insensitive against app-created albums only; the first
    /// match in pagination order wins. `Ok(None)` means the create call came
    /// back without an id, so no destination album is available — the
    /// condition has already been logged.
    pub async fn find_or_create(
        client: &Client,
        title: &str,
    ) -> Result<Option<String>, GPhotosError> {
        let wanted = title.to_lowercase();

        let albums = Self::list(client, true);
        pin_mut!(albums);
        while let Some(album) = albums.next().await {
            let album = album?;
            if album.title.to_lowercase() == wanted {
                log::info!("Uploading into EXISTING photo album -- '{title}'");
                return Ok(Some(album.id));
            }
        }

        match Self::create(client, title).await? {
            Some(id) => {
                log::info!("Uploading into NEW photo album -- '{title}'");
                Ok(Some(id))
            }
            None => {
                log::error!("Could not find or create photo album '{title}'");
                Ok(None)
            }
        }
    }

    /// Creates a new album with the given title.
    ///
    /// Returns the new album's id, or `None` when the server response omits
    /// one.
    pub async fn create(client: &Client, title: &str) -> Result<Option<String>, GPhotosError> {
        let data = serde_json::to_vec(&json!({"album": {"title": title}}))?;
        let created = client.post_json::<CreatedAlbum>(ALBUMS_PATH, data).await?;
        Ok(created.id)
    }
}

// Expected response from an album listing request. Both fields can be absent;
// a missing collection terminates pagination.
#[derive(Deserialize, Debug)]
struct AlbumListResponse {
    albums: Option<Vec<Album>>,

    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

// Expected response from an album creation request. The server echoes the
// album back; success is signaled by the presence of an id.
#[derive(Deserialize, Debug)]
struct CreatedAlbum {
    id: Option<String>,
}
