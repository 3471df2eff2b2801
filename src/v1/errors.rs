/*
 * Copyright (c) 2026 The gphotos-upload Authors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

use std::io;
use thiserror::Error;

/// Error conditions that can be returned
#[derive(Error, Debug)]
pub enum GPhotosError {
    #[error("I/O error")]
    Io(#[from] io::Error),

    #[error("Request network error")]
    Request(#[from] reqwest::Error),

    #[error("Authorization error. {0}")]
    Auth(String),

    #[error("Deserialization error")]
    Deserialization(#[from] serde_json::Error),

    #[error("URL Parse error")]
    UrlParsing(#[from] url::ParseError),

    #[error("Expected response missing")]
    ResponseMissing(),

    #[error("API Response was error: {0}, msg: {1}")]
    ApiResponse(u16, String),

    #[error("API Response is malformed: {0:?}")]
    ApiResponseMalformed(serde_json::Error),

    #[error("Upload rejected with status {0}: {1}")]
    UploadRejected(u16, String),

    #[error("Upload returned an empty token")]
    EmptyUploadToken(),

    #[error("Media item creation failed: {message} (code {code})")]
    ItemRejected { code: i32, message: String },
}
