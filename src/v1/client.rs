/*
 * Copyright (c) 2026 The gphotos-upload Authors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

use crate::v1::errors::GPhotosError;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

// Root Google Photos Library API
pub const API_ORIGIN: &str = "https://photoslibrary.googleapis.com";

/// This can be filter types as well as other parameters the specific API expects
pub type ApiParams<'a> = [(&'a str, &'a str)];

/// Bearer credential for the Library API, in the shape of a stored
/// authorized-user file. Only `token` is required; the remaining fields are
/// carried so a loaded credential can be persisted back unchanged.
#[derive(Default, Clone, Serialize, Deserialize)]
pub struct Creds {
    token: String,
    refresh_token: Option<String>,
    id_token: Option<String>,
    scopes: Option<Vec<String>>,
    token_uri: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
    expiry: Option<DateTime<Utc>>,
}

impl Creds {
    /// Wraps a raw OAuth2 access token
    pub fn from_access_token(token: &str) -> Self {
        Self {
            token: token.into(),
            ..Default::default()
        }
    }

    /// Reads a stored authorized-user JSON file
    pub fn from_authorized_user_file(path: &Path) -> Result<Self, GPhotosError> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let creds: Creds = serde_json::from_reader(reader)?;
        if creds.token.is_empty() {
            return Err(GPhotosError::Auth(
                "stored credential has no access token".into(),
            ));
        }
        Ok(creds)
    }

    /// Persists this credential as an authorized-user JSON file
    pub fn save_to_file(&self, path: &Path) -> Result<(), GPhotosError> {
        std::fs::write(path, serde_json::to_string(self)?)?;
        Ok(())
    }

    /// True when the stored expiry timestamp has passed
    pub fn is_expired(&self) -> bool {
        self.expiry.is_some_and(|at| at <= Utc::now())
    }

    pub(crate) fn access_token(&self) -> &str {
        &self.token
    }
}

impl std::fmt::Debug for Creds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Creds")
            .field("token", &"xxx")
            .field("refresh_token", &"xxx")
            .field("client_id", &"xxx")
            .field("client_secret", &"xxx")
            .field("expiry", &self.expiry)
            .finish()
    }
}

/// Directly communicates with the API.
///
/// The higher level [`crate::v1::Album`] and [`crate::v1::Uploader`] calls are
/// built on this; it is public so consumers can make requests the library does
/// not model.
#[derive(Clone)]
pub struct Client {
    creds: Arc<Creds>,
    https_client: reqwest::Client,
    origin: String,
}

impl Client {
    /// Creates a new client instance from the provided credential
    pub fn new(creds: Creds) -> Self {
        Self::with_origin(creds, API_ORIGIN)
    }

    /// Creates a client against a non-default origin, e.g. a local test server
    pub fn with_origin(creds: Creds, origin: &str) -> Self {
        Self {
            creds: Arc::new(creds),
            https_client: reqwest::Client::new(),
            origin: origin.into(),
        }
    }

    /// Performs a get request against the given API path
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Option<&ApiParams<'_>>,
    ) -> Result<T, GPhotosError> {
        let base = url::Url::parse(&self.origin)?.join(path)?;
        let req_url = params.map_or(Ok(base.clone()), |v| {
            reqwest::Url::parse_with_params(base.as_str(), v)
        })?;
        let resp = self
            .https_client
            .get(req_url)
            .bearer_auth(self.creds.access_token())
            .header("Accept", "application/json")
            .send()
            .await?;
        self.parse_json(resp).await
    }

    /// Performs a post request with a JSON body against the given API path
    pub async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        data: Vec<u8>,
    ) -> Result<T, GPhotosError> {
        let req_url = url::Url::parse(&self.origin)?.join(path)?;
        let resp = self
            .https_client
            .post(req_url)
            .bearer_auth(self.creds.access_token())
            .header("Content-type", "application/json")
            .header("Accept", "application/json")
            .body(data)
            .send()
            .await?;
        self.parse_json(resp).await
    }

    /// Posts raw bytes against the given API path. The three upload headers
    /// are attached to this request only; no other request ever carries them.
    pub async fn post_octets(
        &self,
        path: &str,
        file_name: &str,
        data: Bytes,
    ) -> Result<RawResponse, GPhotosError> {
        let req_url = url::Url::parse(&self.origin)?.join(path)?;
        let resp = self
            .https_client
            .post(req_url)
            .bearer_auth(self.creds.access_token())
            .header("Content-type", "application/octet-stream")
            .header("X-Goog-Upload-Protocol", "raw")
            .header("X-Goog-Upload-File-Name", file_name)
            .body(data)
            .send()
            .await?;
        Ok(RawResponse {
            status: resp.status().as_u16(),
            body: resp.bytes().await?,
        })
    }

    async fn parse_json<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, GPhotosError> {
        let status = resp.status();
        let body = resp.bytes().await?;
        log::debug!("Server response: {}", String::from_utf8_lossy(&body));
        if !status.is_success() {
            return Err(GPhotosError::ApiResponse(
                status.as_u16(),
                String::from_utf8_lossy(&body).into_owned(),
            ));
        }
        serde_json::from_slice(&body).map_err(GPhotosError::ApiResponseMalformed)
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client").field("origin", &self.origin).finish()
    }
}

/// Status and body of a raw (non-JSON) API response
#[derive(Debug)]
pub struct RawResponse {
    pub status: u16,
    pub body: Bytes,
}

impl RawResponse {
    /// The response body as text
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
