/*
 * Copyright (c) 2026 The gphotos-upload Authors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

//! # gphotos-upload
//!
//! A client for the Google Photos Library APIv1, built around the two-phase
//! upload protocol: raw bytes are posted first and exchanged for an opaque
//! upload token, which a batched media-item creation call then redeems into a
//! permanent library entry, optionally placed into an album.
//!
//! For further details on the Rest API refer to the
//! [Google Photos Library API docs](https://developers.google.com/photos/library/reference/rest)
//!
//! ## Features
//!
//! - Album information
//!     - Paginated listing as a lazy stream
//!     - Idempotent find-or-create by title (app-created scope only)
//! - Photo upload
//!     - Raw byte upload returning a single-use upload token
//!     - Batched media-item creation with per-item result reporting
//!     - Partial-failure tolerant batches: one bad file never stops the rest
//! - Flat and directories-as-albums batch orchestration
//! - Lower level interface for handling the raw communication
//!
//! *The Google Photos API uses OAuth2 bearer authorization. Obtaining and
//! refreshing the access token is left up to the consumer of this library;
//! [`v1::Creds`] loads a stored authorized-user file or wraps a raw token.*
//!
//! ## Usage
//!
//! ```rust
//! use gphotos_upload::v1::{Album, Client, Creds, upload_photos};
//! use futures::{StreamExt, pin_mut};
//! use std::path::PathBuf;
//!
//! async fn backfill(access_token: &str, photos: &[PathBuf]) -> anyhow::Result<()> {
//!     let client = Client::new(Creds::from_access_token(access_token));
//!
//!     // Upload into an album, creating it on first use.
//!     let reports = upload_photos(&client, photos, Some("Trip2023")).await?;
//!     for report in &reports {
//!         if report.outcome.is_err() {
//!             eprintln!("failed: {}", report.file.display());
//!         }
//!     }
//!
//!     // Dump the library's albums and their key attributes.
//!     let albums = Album::list(&client, false);
//!     pin_mut!(albums);
//!     while let Some(album) = albums.next().await {
//!         let album = album?;
//!         println!("{} ({} items)", album.title, album.media_items_count);
//!     }
//!     Ok(())
//! }
//! ```
//!
pub mod v1;
