//! Minimal HTTP/1.1 client for the engine's Unix control socket.
//!
//! Sends one `GET` per connection with `Connection: close`. The response body
//! is framed by `Content-Length`, `Transfer-Encoding: chunked`, or EOF, in
//! that order of preference, and may not exceed [`MAX_BODY_BYTES`].

use std::path::Path;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixStream;

use cluster_source_interface::{Result, SourceError};

/// Largest response body accepted from the engine.
pub const MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

/// Status and body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

pub async fn get(socket_path: &Path, path: &str) -> Result<HttpResponse> {
    let mut stream = UnixStream::connect(socket_path)
        .await
        .map_err(|e| SourceError::Connect(format!("{}: {}", socket_path.display(), e)))?;

    let request = format!(
        "GET {} HTTP/1.1\r\nHost: localhost\r\nAccept: application/json\r\nConnection: close\r\n\r\n",
        path
    );
    stream
        .write_all(request.as_bytes())
        .await
        .map_err(|e| SourceError::Connect(format!("write failed: {}", e)))?;

    let mut reader = BufReader::new(stream);
    read_response(&mut reader).await
}

/// Read and parse one HTTP/1.1 response.
pub(crate) async fn read_response<R: AsyncRead + Unpin>(
    reader: &mut BufReader<R>,
) -> Result<HttpResponse> {
    read_response_limited(reader, MAX_BODY_BYTES).await
}

fn body_too_large(limit: usize) -> SourceError {
    SourceError::Protocol(format!("response body exceeds {} bytes", limit))
}

async fn read_response_limited<R: AsyncRead + Unpin>(
    reader: &mut BufReader<R>,
    limit: usize,
) -> Result<HttpResponse> {
    let mut status = read_status(reader).await?;
    let mut headers = read_headers(reader).await?;

    // Interim 1xx responses carry no body; the real response follows.
    while (100..200).contains(&status) {
        status = read_status(reader).await?;
        headers = read_headers(reader).await?;
    }

    let body = if headers.chunked {
        read_chunked(reader, limit).await?
    } else if let Some(length) = headers.content_length {
        if length > limit {
            return Err(body_too_large(limit));
        }
        let mut buf = vec![0u8; length];
        reader
            .read_exact(&mut buf)
            .await
            .map_err(|e| SourceError::Protocol(format!("read body failed: {}", e)))?;
        buf
    } else {
        let mut buf = Vec::new();
        let cap = u64::try_from(limit).unwrap_or(u64::MAX).saturating_add(1);
        (&mut *reader)
            .take(cap)
            .read_to_end(&mut buf)
            .await
            .map_err(|e| SourceError::Protocol(format!("read body failed: {}", e)))?;
        if buf.len() > limit {
            return Err(body_too_large(limit));
        }
        buf
    };

    Ok(HttpResponse { status, body })
}

#[derive(Debug, Default)]
struct Headers {
    content_length: Option<usize>,
    chunked: bool,
}

async fn read_line<R: AsyncRead + Unpin>(reader: &mut BufReader<R>, what: &str) -> Result<String> {
    let mut line = String::new();
    reader
        .read_line(&mut line)
        .await
        .map_err(|e| SourceError::Protocol(format!("read {} failed: {}", what, e)))?;
    Ok(line)
}

async fn read_status<R: AsyncRead + Unpin>(reader: &mut BufReader<R>) -> Result<u16> {
    let line = read_line(reader, "status line").await?;
    if line.is_empty() {
        return Err(SourceError::Protocol(
            "connection closed before response".to_string(),
        ));
    }

    let mut parts = line.split_whitespace();
    match (parts.next(), parts.next().and_then(|s| s.parse::<u16>().ok())) {
        (Some(version), Some(code)) if version.starts_with("HTTP/") => Ok(code),
        _ => Err(SourceError::Protocol(format!(
            "invalid status line: {}",
            line.trim()
        ))),
    }
}

async fn read_headers<R: AsyncRead + Unpin>(reader: &mut BufReader<R>) -> Result<Headers> {
    let mut headers = Headers::default();
    loop {
        let line = read_line(reader, "header").await?;
        if line == "\r\n" || line == "\n" || line.is_empty() {
            break;
        }

        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        match name.trim().to_ascii_lowercase().as_str() {
            "content-length" => {
                let length = value.parse().map_err(|_| {
                    SourceError::Protocol(format!("invalid content-length: {}", value))
                })?;
                headers.content_length = Some(length);
            }
            "transfer-encoding" => {
                headers.chunked = value.to_ascii_lowercase().contains("chunked");
            }
            _ => {}
        }
    }
    Ok(headers)
}

async fn read_chunked<R: AsyncRead + Unpin>(
    reader: &mut BufReader<R>,
    limit: usize,
) -> Result<Vec<u8>> {
    let mut body = Vec::new();
    loop {
        let line = read_line(reader, "chunk size").await?;
        let size_text = line.split(';').next().unwrap_or("").trim();
        let size = usize::from_str_radix(size_text, 16)
            .map_err(|_| SourceError::Protocol(format!("invalid chunk size: {}", line.trim())))?;

        if size == 0 {
            // Trailer section ends with an empty line (or EOF).
            loop {
                let trailer = read_line(reader, "trailer").await?;
                if trailer == "\r\n" || trailer == "\n" || trailer.is_empty() {
                    break;
                }
            }
            return Ok(body);
        }

        let start = body.len();
        let end = start
            .checked_add(size)
            .filter(|end| *end <= limit)
            .ok_or_else(|| body_too_large(limit))?;
        body.resize(end, 0);
        reader
            .read_exact(&mut body[start..])
            .await
            .map_err(|e| SourceError::Protocol(format!("read chunk failed: {}", e)))?;

        let terminator = read_line(reader, "chunk terminator").await?;
        if !terminator.trim().is_empty() {
            return Err(SourceError::Protocol("missing chunk terminator".to_string()));
        }
    }
}
