/*
 * Copyright (c) 2026 The gphotos-upload Authors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;
use futures::{StreamExt, pin_mut};
use gphotos_upload::v1::{Album, Client, Creds, upload_directories, upload_photos};
use std::path::{Path, PathBuf};

/// Upload photos to Google Photos.
#[derive(Parser, Debug)]
struct CliArgs {
    /// File for reading and storing user authentication tokens.
    #[clap(long = "auth", value_name = "auth_file")]
    auth_file: Option<PathBuf>,

    /// Name of the photo album to create (if it doesn't exist). Any uploaded
    /// photos will be added to this album.
    #[clap(long, value_name = "album_name")]
    album: Option<String>,

    /// Name of an output file for log messages.
    #[clap(long, value_name = "log_file")]
    log: Option<PathBuf>,

    /// Upload each directory as its own album instead of treating the paths
    /// as individual photos.
    #[clap(long)]
    dirs_as_albums: bool,

    /// Photos to upload, or directories when --dirs-as-albums is given.
    #[clap(value_name = "photo")]
    photos: Vec<PathBuf>,
}

fn init_logging(log_file: Option<&Path>) -> anyhow::Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(path) = log_file {
        let file = std::fs::File::create(path)
            .with_context(|| format!("could not open log file '{}'", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

// Stored credentials are preferred; a fresh token from the environment stands
// in when they are missing or unreadable.
fn load_creds(auth_file: Option<&Path>) -> anyhow::Result<Creds> {
    if let Some(path) = auth_file {
        match Creds::from_authorized_user_file(path) {
            Ok(creds) => {
                if creds.is_expired() {
                    log::debug!("Stored access token is past its expiry; requests may fail");
                }
                return Ok(creds);
            }
            Err(err) => {
                log::debug!("Error loading auth tokens from '{}' -- {}", path.display(), err)
            }
        }
    }

    dotenv().ok();
    let token = std::env::var("GPHOTOS_ACCESS_TOKEN").context(
        "no usable credentials: pass --auth with a valid authorized-user file \
         or set GPHOTOS_ACCESS_TOKEN",
    )?;
    Ok(Creds::from_access_token(&token))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    init_logging(args.log.as_deref())?;

    let creds = load_creds(args.auth_file.as_deref())?;
    if let Some(path) = args.auth_file.as_deref() {
        if let Err(err) = creds.save_to_file(path) {
            log::debug!("Could not save auth tokens -- {err}");
        }
    }

    let client = Client::new(creds);

    if args.dirs_as_albums {
        upload_directories(&client, &args.photos).await?;
    } else {
        upload_photos(&client, &args.photos, args.album.as_deref()).await?;
    }

    // As a quick status check, dump the albums and their key attributes
    println!("{:<50} | {:>8} | {}", "PHOTO ALBUM", "# PHOTOS", "IS WRITEABLE?");
    let albums = Album::list(&client, false);
    pin_mut!(albums);
    while let Some(album) = albums.next().await {
        let album = album?;
        println!(
            "{:<50} | {:>8} | {}",
            album.title, album.media_items_count, album.is_writeable
        );
    }

    Ok(())
}
