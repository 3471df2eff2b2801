/*
 * Copyright (c) 2026 The gphotos-upload Authors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// One request as the mock server saw it, for assertions.
#[allow(dead_code)]
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

#[allow(dead_code)]
impl RecordedRequest {
    /// Header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        let wanted = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(name, _)| *name == wanted)
            .map(|(_, value)| value.as_str())
    }

    /// Path without the query string.
    pub fn route(&self) -> &str {
        self.path.split('?').next().unwrap_or(&self.path)
    }

    pub fn query_param(&self, key: &str) -> Option<&str> {
        let (_, query) = self.path.split_once('?')?;
        query.split('&').find_map(|pair| {
            let (k, v) = pair.split_once('=')?;
            (k == key).then_some(v)
        })
    }

    pub fn json_body(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }
}

/// Scripted responses for one method + path. Responses are served in order;
/// the final one repeats for any further calls.
pub struct Route {
    method: &'static str,
    path: &'static str,
    responses: VecDeque<(u16, String)>,
}

#[allow(dead_code)]
impl Route {
    pub fn new(method: &'static str, path: &'static str) -> Self {
        Self {
            method,
            path,
            responses: VecDeque::new(),
        }
    }

    pub fn respond(mut self, status: u16, body: &str) -> Self {
        self.responses.push_back((status, body.to_string()));
        self
    }

    fn matches(&self, request: &RecordedRequest) -> bool {
        request.method == self.method && request.route() == self.path
    }

    fn next_response(&mut self) -> (u16, String) {
        if self.responses.len() > 1 {
            self.responses.pop_front().unwrap()
        } else {
            self.responses
                .front()
                .cloned()
                .unwrap_or((404, "{}".to_string()))
        }
    }
}

/// A localhost HTTP listener that plays scripted responses and records every
/// request it receives. Unmatched requests get a 404 with an empty JSON body.
pub struct MockPhotosApi {
    pub url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    handle: JoinHandle<()>,
}

#[allow(dead_code)]
impl MockPhotosApi {
    pub async fn start(routes: Vec<Route>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let url = format!("http://127.0.0.1:{port}");

        let requests: Arc<Mutex<Vec<RecordedRequest>>> = Arc::new(Mutex::new(Vec::new()));
        let seen = requests.clone();
        let routes = Mutex::new(routes);

        let handle = tokio::spawn(async move {
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    break;
                };
                let Some(request) = read_request(&mut stream).await else {
                    continue;
                };

                let (status, body) = match routes
                    .lock()
                    .unwrap()
                    .iter_mut()
                    .find(|route| route.matches(&request))
                {
                    Some(route) => route.next_response(),
                    None => (404, "{}".to_string()),
                };
                seen.lock().unwrap().push(request);

                let resp = format!(
                    "HTTP/1.1 {status} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    reason(status),
                    body.len(),
                );
                let _ = stream.write_all(resp.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        Self {
            url,
            requests,
            handle,
        }
    }

    /// Everything received so far, in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, method: &str, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.route() == path)
            .collect()
    }
}

impl Drop for MockPhotosApi {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

// Reads one full HTTP/1.1 request (headers plus content-length body).
async fn read_request(stream: &mut TcpStream) -> Option<RecordedRequest> {
    let mut buf: Vec<u8> = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find_subslice(&buf, b"\r\n\r\n") {
            break pos + 4;
        }
        if buf.len() > 1 << 20 {
            return None;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();

    let mut headers = Vec::new();
    let mut content_length = 0usize;
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim().to_ascii_lowercase();
            let value = value.trim().to_string();
            if name == "content-length" {
                content_length = value.parse().unwrap_or(0);
            }
            headers.push((name, value));
        }
    }

    let mut body = buf[header_end..].to_vec();
    while body.len() < content_length {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }

    Some(RecordedRequest {
        method,
        path,
        headers,
        body,
    })
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Status",
    }
}

// Live-API credentials from the environment, for the ignored smoke tests.
#[allow(dead_code)]
pub fn access_token_creds() -> anyhow::Result<gphotos_upload::v1::Creds> {
    let token = std::env::var("GPHOTOS_ACCESS_TOKEN")?;
    Ok(gphotos_upload::v1::Creds::from_access_token(&token))
}
