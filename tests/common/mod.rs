//! Mock LFS server shared by the integration tests.
//!
//! Listens on a random port and answers each connection with the first
//! route whose path prefix matches, or a 404.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

pub const OID_CONTENT: &[u8] = b"\x00\x01\x02";

pub struct Route {
    pub path: String,
    pub status: u16,
    pub reason: &'static str,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    /// Content-Length to advertise instead of the real body length.
    pub content_length: Option<usize>,
}

impl Route {
    pub fn new(path: &str, status: u16, reason: &'static str, body: &[u8]) -> Self {
        Route {
            path: path.to_string(),
            status,
            reason,
            headers: Vec::new(),
            body: body.to_vec(),
            content_length: None,
        }
    }

    /// Advertise `len` bytes but send only the body, then close.
    pub fn truncated(mut self, len: usize) -> Self {
        self.content_length = Some(len);
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

#[derive(Debug, Clone)]
pub struct MockRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl MockRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

pub struct MockLfsServer {
    port: u16,
    shutdown_tx: mpsc::Sender<()>,
    handle: Option<thread::JoinHandle<Vec<MockRequest>>>,
}

impl MockLfsServer {
    /// Start a server; `routes` receives the server's base URL so responses
    /// can point back at it.
    pub fn start<F>(routes: F) -> Self
    where
        F: FnOnce(&str) -> Vec<Route>,
    {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let routes = routes(&format!("http://127.0.0.1:{}", port));
        let (shutdown_tx, shutdown_rx) = mpsc::channel();

        // Non-blocking accept so the shutdown signal is noticed
        listener.set_nonblocking(true).unwrap();

        let handle = thread::spawn(move || {
            let mut requests = Vec::new();

            loop {
                if shutdown_rx.try_recv().is_ok() {
                    break;
                }

                match listener.accept() {
                    Ok((mut stream, _)) => {
                        stream.set_nonblocking(false).unwrap();
                        stream
                            .set_read_timeout(Some(Duration::from_secs(5)))
                            .unwrap();

                        if let Some(request) = read_request(&mut stream) {
                            let response = match routes
                                .iter()
                                .find(|r| request.path.starts_with(&r.path))
                            {
                                Some(route) => render(route),
                                None => render(&Route::new("", 404, "Not Found", b"")),
                            };
                            let _ = stream.write_all(&response);
                            let _ = stream.flush();
                            requests.push(request);
                        }
                    }
                    Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        thread::sleep(Duration::from_millis(10));
                    }
                    Err(_) => break,
                }
            }

            requests
        });

        MockLfsServer {
            port,
            shutdown_tx,
            handle: Some(handle),
        }
    }

    pub fn url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    pub fn stop(mut self) -> Vec<MockRequest> {
        let _ = self.shutdown_tx.send(());
        match self.handle.take() {
            Some(handle) => handle.join().unwrap_or_default(),
            None => vec![],
        }
    }
}

fn read_request(stream: &mut TcpStream) -> Option<MockRequest> {
    let mut data = Vec::new();
    let mut buffer = [0u8; 4096];

    // Headers
    let header_end = loop {
        if let Some(pos) = find(&data, b"\r\n\r\n") {
            break pos;
        }
        let n = stream.read(&mut buffer).ok()?;
        if n == 0 {
            return None;
        }
        data.extend_from_slice(&buffer[..n]);
    };

    let head = String::from_utf8_lossy(&data[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut first = lines.next()?.split_whitespace();
    let method = first.next()?.to_string();
    let path = first.next()?.to_string();

    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);

    // Body
    let mut body = data[header_end + 4..].to_vec();
    while body.len() < content_length {
        let n = stream.read(&mut buffer).ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&buffer[..n]);
    }

    Some(MockRequest {
        method,
        path,
        headers,
        body,
    })
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn render(route: &Route) -> Vec<u8> {
    let mut head = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n",
        route.status,
        route.reason,
        route.content_length.unwrap_or(route.body.len())
    );
    for (name, value) in &route.headers {
        head.push_str(&format!("{}: {}\r\n", name, value));
    }
    head.push_str("\r\n");

    let mut out = head.into_bytes();
    out.extend_from_slice(&route.body);
    out
}

/// Pointer file text naming `content`.
pub fn pointer_text(content: &[u8]) -> String {
    format!(
        "version https://git-lfs.github.com/spec/v1\noid sha256:{}\nsize {}\n",
        lfs_fetch::Oid::from_content(content),
        content.len()
    )
}

pub fn batch_path(owner: &str, repo: &str) -> String {
    format!("/{}/{}.git/info/lfs/objects/batch", owner, repo)
}

/// A batch response whose single download action points at `href`.
pub fn batch_body(href: &str, header: &[(&str, &str)]) -> Vec<u8> {
    let header: serde_json::Map<String, serde_json::Value> = header
        .iter()
        .map(|(k, v)| (k.to_string(), serde_json::Value::from(*v)))
        .collect();
    serde_json::json!({
        "transfer": "basic",
        "objects": [{
            "actions": {
                "download": { "href": href, "header": header, "expires_in": 3600 }
            }
        }]
    })
    .to_string()
    .into_bytes()
}
