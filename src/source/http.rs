//! Minimal HTTP client for the sensor's `/data` endpoint.
//!
//! The sensor firmware answers with a status line, a content type and the
//! JSON body, then closes the socket. Requests are sent as HTTP/1.0 so a
//! conforming server never replies with chunked encoding.

use super::SummarySource;
use crate::error::FetchError;
use crate::summary::SensorSummary;
use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

const DEFAULT_PORT: u16 = 80;

/// Path requested when the configured URL has none.
const DEFAULT_PATH: &str = "/data";

/// Responses larger than this are cut off and will fail to decode.
const MAX_RESPONSE_BYTES: u64 = 64 * 1024;

/// Polls a sensor summary over plain HTTP
#[derive(Debug, Clone)]
pub struct HttpSource {
    host: String,
    port: u16,
    path: String,
}

impl HttpSource {
    /// Create a source from an `http://host[:port][/path]` URL
    pub fn new(url: &str) -> Result<Self, FetchError> {
        let rest = url
            .strip_prefix("http://")
            .ok_or_else(|| FetchError::InvalidUrl(format!("{} (only http:// is supported)", url)))?;

        let (authority, path) = match rest.find('/') {
            Some(idx) => (&rest[..idx], &rest[idx..]),
            None => (rest, DEFAULT_PATH),
        };

        // IPv6 literals are bracketed so their colons are not read as a port
        let (host, port) = match authority.strip_prefix('[') {
            Some(bracketed) => {
                let (host, rest) = bracketed
                    .split_once(']')
                    .ok_or_else(|| FetchError::InvalidUrl(format!("{} (unclosed `[`)", url)))?;
                match rest.strip_prefix(':') {
                    Some(port) => (host, parse_port(url, port)?),
                    None if rest.is_empty() => (host, DEFAULT_PORT),
                    None => return Err(FetchError::InvalidUrl(format!("{} (bad port)", url))),
                }
            }
            None => match authority.rsplit_once(':') {
                Some((host, port)) => (host, parse_port(url, port)?),
                None => (authority, DEFAULT_PORT),
            },
        };

        if host.is_empty() {
            return Err(FetchError::InvalidUrl(format!("{} (missing host)", url)));
        }

        Ok(Self {
            host: host.to_string(),
            port,
            path: if path == "/" { DEFAULT_PATH.to_string() } else { path.to_string() },
        })
    }

    /// `host[:port]` as written in a URL or `Host` header; the port is
    /// omitted when it is the default.
    fn authority(&self) -> String {
        let host = if self.host.contains(':') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        };
        if self.port == DEFAULT_PORT {
            host
        } else {
            format!("{}:{}", host, self.port)
        }
    }

    fn request(&self) -> String {
        format!(
            "GET {} HTTP/1.0\r\nHost: {}\r\nAccept: application/json\r\nUser-Agent: sensor-dashboard/{}\r\n\r\n",
            self.path,
            self.authority(),
            env!("CARGO_PKG_VERSION"),
        )
    }
}

fn parse_port(url: &str, port: &str) -> Result<u16, FetchError> {
    port.parse::<u16>()
        .map_err(|_| FetchError::InvalidUrl(format!("{} (bad port)", url)))
}

#[async_trait]
impl SummarySource for HttpSource {
    async fn fetch(&self) -> Result<SensorSummary, FetchError> {
        let mut stream = TcpStream::connect((self.host.as_str(), self.port)).await?;
        stream.write_all(self.request().as_bytes()).await?;

        let mut raw = Vec::new();
        (&mut stream).take(MAX_RESPONSE_BYTES).read_to_end(&mut raw).await?;
        tracing::trace!(bytes = raw.len(), "received sensor response");

        let body = response_body(&raw)?;
        Ok(serde_json::from_slice(body)?)
    }

    fn describe(&self) -> String {
        format!("http://{}{}", self.authority(), self.path)
    }
}

/// Validate the status line and headers and return the body bytes.
pub fn response_body(raw: &[u8]) -> Result<&[u8], FetchError> {
    let header_end = raw
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .ok_or_else(|| FetchError::MalformedResponse("missing end of headers".to_string()))?;

    let head = std::str::from_utf8(&raw[..header_end])
        .map_err(|_| FetchError::MalformedResponse("headers are not UTF-8".to_string()))?;
    let mut lines = head.split("\r\n");

    let status_line = lines.next().unwrap_or_default();
    let mut parts = status_line.split_whitespace();
    let code = match (parts.next(), parts.next()) {
        (Some(version), Some(code)) if version.starts_with("HTTP/") => code
            .parse::<u16>()
            .map_err(|_| FetchError::MalformedResponse(format!("bad status line `{}`", status_line)))?,
        _ => {
            return Err(FetchError::MalformedResponse(format!(
                "bad status line `{}`",
                status_line
            )));
        }
    };

    if !(200..300).contains(&code) {
        return Err(FetchError::Status(code));
    }

    let mut content_length = None;
    for line in lines {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let name = name.trim();
        if name.eq_ignore_ascii_case("content-length") {
            let length = value.trim().parse::<usize>().map_err(|_| {
                FetchError::MalformedResponse(format!("bad content-length `{}`", value.trim()))
            })?;
            content_length = Some(length);
        } else if name.eq_ignore_ascii_case("transfer-encoding") {
            return Err(FetchError::MalformedResponse(format!(
                "unsupported transfer-encoding `{}`",
                value.trim()
            )));
        }
    }

    let body = &raw[header_end + 4..];
    match content_length {
        Some(length) if body.len() < length => Err(FetchError::MalformedResponse(format!(
            "body truncated at {} of {} bytes",
            body.len(),
            length
        ))),
        Some(length) => Ok(&body[..length]),
        None => Ok(body),
    }
}
