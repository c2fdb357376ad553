//! Monoio-native HTTPS transport
//!
//! Minimal HTTP/1.1 client over rustls and `monoio::net::TcpStream`. One
//! connection per request with `Connection: close`; the response body runs
//! until the peer's close_notify, is checked against `Content-Length` when
//! present, and is de-chunked when the server answers with
//! `Transfer-Encoding: chunked`. Binance requests carry all parameters in
//! the query string, so no request bodies are sent.

use crate::errors::{ClientError, Result};
use monoio::io::{AsyncReadRent, AsyncWriteRentExt};
use monoio::net::TcpStream;
use rustls::pki_types::ServerName;
use rustls::{ClientConfig, ClientConnection, RootCertStore};
use std::io::{Read, Write};
use std::sync::Arc;

/// HTTPS client for query-string style REST APIs
pub struct HttpsClient {
    tls_config: Arc<ClientConfig>,
}

/// Parsed HTTP response
#[derive(Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

impl HttpsClient {
    pub fn new() -> Result<Self> {
        let mut roots = RootCertStore::empty();
        roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

        let tls_config = ClientConfig::builder()
            .with_root_certificates(roots)
            .with_no_client_auth();

        Ok(Self {
            tls_config: Arc::new(tls_config),
        })
    }

    /// Issue a request and parse the response. `headers` are sent verbatim
    /// after the standard request headers.
    pub async fn request(
        &self,
        method: &str,
        url: &str,
        headers: &[(&str, &str)],
    ) -> Result<HttpResponse> {
        let parsed = url::Url::parse(url)?;
        let host = parsed
            .host_str()
            .ok_or_else(|| ClientError::InvalidUrl(format!("no host in {url}")))?
            .to_string();
        let port = parsed.port().unwrap_or(443);

        let mut target = parsed.path().to_string();
        if target.is_empty() {
            target.push('/');
        }
        if let Some(query) = parsed.query() {
            target.push('?');
            target.push_str(query);
        }

        let stream = TcpStream::connect(format!("{host}:{port}"))
            .await
            .map_err(|e| ClientError::Network(format!("TCP connect failed: {e}")))?;

        let server_name = ServerName::try_from(host.clone())
            .map_err(|e| ClientError::Network(format!("invalid server name: {e:?}")))?;
        let conn = ClientConnection::new(self.tls_config.clone(), server_name)
            .map_err(|e| ClientError::Network(format!("TLS setup failed: {e}")))?;

        let mut session = TlsSession::new(stream, conn);

        let mut request = format!(
            "{method} {target} HTTP/1.1\r\n\
             Host: {host}\r\n\
             User-Agent: fapi-rs/0.1\r\n\
             Accept: application/json\r\n\
             Connection: close\r\n\
             Content-Length: 0\r\n"
        );
        for (key, value) in headers {
            request.push_str(key);
            request.push_str(": ");
            request.push_str(value);
            request.push_str("\r\n");
        }
        request.push_str("\r\n");

        session.send(request.as_bytes()).await?;
        let raw = session.read_to_close().await?;

        parse_response(&raw)
    }
}

fn parse_response(raw: &[u8]) -> Result<HttpResponse> {
    let header_end = raw
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .ok_or_else(|| ClientError::Network("truncated HTTP response".to_string()))?;

    let head = String::from_utf8_lossy(&raw[..header_end]);
    let body = &raw[header_end + 4..];

    let mut lines = head.lines();
    let status_line = lines
        .next()
        .ok_or_else(|| ClientError::Network("empty HTTP response".to_string()))?;
    let status = status_line
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse::<u16>().ok())
        .ok_or_else(|| ClientError::Network(format!("bad status line: {status_line}")))?;

    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();

    let find = |name: &str| {
        headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    };

    // Chunk sizes count raw bytes, so de-chunking happens before any
    // UTF-8 conversion.
    let body = if find("transfer-encoding").is_some_and(|v| v.eq_ignore_ascii_case("chunked")) {
        decode_chunked(body)?
    } else {
        if let Some(expected) = find("content-length").and_then(|v| v.parse::<usize>().ok()) {
            if body.len() < expected {
                return Err(ClientError::Network(format!(
                    "truncated response body: got {} of {expected} bytes",
                    body.len()
                )));
            }
        }
        body.to_vec()
    };

    Ok(HttpResponse {
        status,
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

/// Reassemble a chunked transfer encoding body
fn decode_chunked(body: &[u8]) -> Result<Vec<u8>> {
    let mut decoded = Vec::with_capacity(body.len());
    let mut rest = body;

    loop {
        let Some(line_end) = rest.windows(2).position(|w| w == b"\r\n") else {
            break;
        };
        let size_line = std::str::from_utf8(&rest[..line_end])
            .map_err(|_| ClientError::Network("bad chunk size line".to_string()))?;
        let size = usize::from_str_radix(size_line.trim(), 16)
            .map_err(|_| ClientError::Network(format!("bad chunk size: {size_line:?}")))?;
        let after = &rest[line_end + 2..];
        if size == 0 {
            break;
        }
        if after.len() < size {
            return Err(ClientError::Network("truncated chunk".to_string()));
        }
        decoded.extend_from_slice(&after[..size]);
        // Skip the CRLF trailing each chunk
        rest = after[size..].strip_prefix(b"\r\n").unwrap_or(&after[size..]);
    }

    Ok(decoded)
}

/// rustls session driven over a monoio TCP stream
struct TlsSession {
    stream: TcpStream,
    conn: ClientConnection,
    handshaken: bool,
}

impl TlsSession {
    fn new(stream: TcpStream, conn: ClientConnection) -> Self {
        Self {
            stream,
            conn,
            handshaken: false,
        }
    }

    async fn handshake(&mut self) -> Result<()> {
        if self.handshaken {
            return Ok(());
        }
        while self.conn.is_handshaking() {
            self.flush_tls().await?;
            if !self.conn.is_handshaking() {
                break;
            }
            if self.conn.wants_read() {
                if self.feed_tls().await? == 0 {
                    return Err(ClientError::Network(
                        "connection closed during TLS handshake".to_string(),
                    ));
                }
            } else if !self.conn.wants_write() {
                return Err(ClientError::Network("TLS handshake stalled".to_string()));
            }
        }
        self.flush_tls().await?;
        self.handshaken = true;
        Ok(())
    }

    async fn send(&mut self, data: &[u8]) -> Result<()> {
        self.handshake().await?;
        self.conn
            .writer()
            .write_all(data)
            .map_err(|e| ClientError::Network(format!("TLS write failed: {e}")))?;
        self.flush_tls().await
    }

    async fn read_to_close(&mut self) -> Result<Vec<u8>> {
        self.handshake().await?;

        let mut plaintext = Vec::new();
        let mut scratch = [0u8; 4096];

        loop {
            // Drain whatever is already decrypted before touching the socket
            loop {
                match self.conn.reader().read(&mut scratch) {
                    // Clean close_notify from the peer
                    Ok(0) => return Ok(plaintext),
                    Ok(n) => plaintext.extend_from_slice(&scratch[..n]),
                    Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => break,
                    Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                        // Peer closed without close_notify; the body may be cut short
                        return Err(ClientError::Network(
                            "connection closed without close_notify".to_string(),
                        ));
                    }
                    Err(e) => {
                        return Err(ClientError::Network(format!("TLS read failed: {e}")))
                    }
                }
            }

            // A clean end of body arrives as close_notify and surfaces as
            // Ok(0) from the reader above, never as a bare TCP EOF.
            if self.feed_tls().await? == 0 {
                return Err(ClientError::Network(
                    "connection closed before end of response".to_string(),
                ));
            }
        }
    }

    /// Write any pending TLS records to the socket
    async fn flush_tls(&mut self) -> Result<()> {
        while self.conn.wants_write() {
            let mut wire = Vec::with_capacity(8192);
            self.conn
                .write_tls(&mut wire)
                .map_err(|e| ClientError::Network(format!("TLS encode failed: {e}")))?;
            if wire.is_empty() {
                break;
            }
            let (result, _) = self.stream.write_all(wire).await;
            result.map_err(|e| ClientError::Network(format!("TCP write failed: {e}")))?;
        }
        Ok(())
    }

    /// Read one batch of ciphertext from the socket into the TLS session;
    /// returns the number of TCP bytes consumed (0 on EOF)
    async fn feed_tls(&mut self) -> Result<usize> {
        let buf = vec![0u8; 4096];
        let (result, buf) = self.stream.read(buf).await;
        let n = result.map_err(|e| ClientError::Network(format!("TCP read failed: {e}")))?;
        if n == 0 {
            return Ok(0);
        }
        self.conn
            .read_tls(&mut std::io::Cursor::new(&buf[..n]))
            .map_err(|e| ClientError::Network(format!("TLS ingest failed: {e}")))?;
        self.conn
            .process_new_packets()
            .map_err(|e| ClientError::Network(format!("TLS decrypt failed: {e}")))?;
        Ok(n)
    }
}
