//! Loopback HTTP/1.1 responder for client tests.
//!
//! Binds `127.0.0.1:0`, records every request, and answers each one from a
//! caller-supplied route function. Every response closes its connection, so
//! clients never reuse a socket between requests.
//!
//! ```no_run
//! # async fn demo() -> std::io::Result<()> {
//! let stub = http_stub::Stub::start(|req, _base| match req.target.as_str() {
//!     "/indexes" => (200, r#"{"indexes":[]}"#.to_string()),
//!     _ => (404, "{}".to_string()),
//! })
//! .await?;
//! println!("{}", stub.base_url);
//! # Ok(()) }
//! ```

use std::io;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// One request as received on the wire.
#[derive(Clone, Debug)]
pub struct Recorded {
    pub method: String,
    /// Raw request-target, e.g. `/indexes/docs%3Fx=1`.
    pub target: String,
    /// Header names are lower-cased.
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }
}

type Route = dyn Fn(&Recorded, &str) -> (u16, String) + Send + Sync;

pub struct Stub {
    /// `http://127.0.0.1:<port>`
    pub base_url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl Stub {
    /// Starts serving on an ephemeral port. `route` receives the request and
    /// the stub's own base URL and returns `(status, json body)`.
    pub async fn start<F>(route: F) -> io::Result<Self>
    where
        F: Fn(&Recorded, &str) -> (u16, String) + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let base_url = format!("http://{}", listener.local_addr()?);
        let requests = Arc::new(Mutex::new(Vec::new()));

        let route: Arc<Route> = Arc::new(route);
        let log = requests.clone();
        let base = base_url.clone();
        tokio::spawn(async move {
            while let Ok((sock, _)) = listener.accept().await {
                let route = route.clone();
                let log = log.clone();
                let base = base.clone();
                tokio::spawn(async move {
                    let _ = serve_one(sock, route.as_ref(), &log, &base).await;
                });
            }
        });

        Ok(Self { base_url, requests })
    }

    /// Requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<Recorded> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// `METHOD target` of every request so far.
    pub fn request_lines(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|r| format!("{} {}", r.method, r.target))
            .collect()
    }
}

async fn serve_one(
    mut sock: TcpStream,
    route: &Route,
    log: &Mutex<Vec<Recorded>>,
    base: &str,
) -> io::Result<()> {
    let Some(req) = read_request(&mut sock).await? else {
        return Ok(());
    };
    let (status, body) = route(&req, base);
    log.lock().unwrap_or_else(PoisonError::into_inner).push(req);

    let head = format!(
        "HTTP/1.1 {status} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    );
    sock.write_all(head.as_bytes()).await?;
    sock.write_all(body.as_bytes()).await?;
    sock.shutdown().await
}

async fn read_request(sock: &mut TcpStream) -> io::Result<Option<Recorded>> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = sock.read(&mut chunk).await?;
        if n == 0 {
            return Ok(None);
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next().unwrap_or_default().split_whitespace();
    let method = request_line.next().unwrap_or_default().to_string();
    let target = request_line.next().unwrap_or_default().to_string();

    let headers: Vec<(String, String)> = lines
        .filter_map(|l| l.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();
    let content_length = headers
        .iter()
        .find(|(k, _)| k == "content-length")
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = sock.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body_end = buf.len().min(header_end + content_length);
    let body = String::from_utf8_lossy(&buf[header_end..body_end]).into_owned();

    Ok(Some(Recorded {
        method,
        target,
        headers,
        body,
    }))
}
