//! Minimal HTTP/1.1 stand-in for the companion application, for integration tests.
//!
//! Answers `GET /api/ping` with a configurable status and body, and
//! `POST /api/download` with a configurable status after an optional delay.
//! Received delivery bodies are recorded. `stop()` closes the listening socket so
//! later connections are refused, like a companion that exited.
//!
//! [`reserve_block`] holds a run of consecutive loopback ports so a test can own
//! its whole candidate range instead of sweeping ports some other process may use.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

pub const LIVE_BODY: &str = r#"{"status":"pidm_active"}"#;

#[derive(Debug, Clone)]
pub struct CompanionOptions {
    pub ping_status: u16,
    pub ping_body: String,
    pub download_status: u16,
    pub download_body: String,
    /// Delay before answering a delivery (simulates a hung companion).
    pub download_delay: Duration,
}

impl Default for CompanionOptions {
    fn default() -> Self {
        Self {
            ping_status: 200,
            ping_body: LIVE_BODY.to_string(),
            download_status: 200,
            download_body: r#"{"ok":true}"#.to_string(),
            download_delay: Duration::ZERO,
        }
    }
}

pub struct Companion {
    pub port: u16,
    received: Arc<Mutex<Vec<String>>>,
    stopped: Arc<AtomicBool>,
}

impl Companion {
    /// Bodies of all delivery requests received so far.
    pub fn received(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }

    /// Close the listening socket; in-flight handlers finish on their own.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
        // Give the accept loop time to notice and drop the listener.
        thread::sleep(Duration::from_millis(50));
    }
}

impl Drop for Companion {
    fn drop(&mut self) {
        self.stopped.store(true, Ordering::SeqCst);
    }
}

pub fn start() -> Companion {
    start_with_options(CompanionOptions::default())
}

pub fn start_with_options(opts: CompanionOptions) -> Companion {
    start_on(TcpListener::bind("127.0.0.1:0").expect("bind"), opts)
}

/// Bind `count` consecutive loopback ports, lowest first.
///
/// Retries with a fresh ephemeral base when a neighbour is taken or the run would
/// pass the top of the port space.
pub fn reserve_block(count: u16) -> Vec<TcpListener> {
    assert!(count > 0);
    for _ in 0..50 {
        let first = TcpListener::bind("127.0.0.1:0").expect("bind");
        let base = first.local_addr().unwrap().port();
        if u32::from(base) + u32::from(count) - 1 > u32::from(u16::MAX) {
            continue;
        }
        let mut block = vec![first];
        for offset in 1..count {
            match TcpListener::bind(("127.0.0.1", base + offset)) {
                Ok(l) => block.push(l),
                Err(_) => break,
            }
        }
        if block.len() == usize::from(count) {
            return block;
        }
    }
    panic!("could not reserve {} consecutive loopback ports", count);
}

/// Serve the companion on an already bound listener.
pub fn start_on(listener: TcpListener, opts: CompanionOptions) -> Companion {
    let port = listener.local_addr().unwrap().port();
    listener.set_nonblocking(true).expect("nonblocking");

    let received = Arc::new(Mutex::new(Vec::new()));
    let stopped = Arc::new(AtomicBool::new(false));
    {
        let received = Arc::clone(&received);
        let stopped = Arc::clone(&stopped);
        thread::spawn(move || {
            while !stopped.load(Ordering::SeqCst) {
                match listener.accept() {
                    Ok((stream, _)) => {
                        let opts = opts.clone();
                        let received = Arc::clone(&received);
                        thread::spawn(move || handle(stream, &opts, &received));
                    }
                    Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        thread::sleep(Duration::from_millis(5));
                    }
                    Err(_) => break,
                }
            }
        });
    }
    Companion {
        port,
        received,
        stopped,
    }
}

fn handle(mut stream: TcpStream, opts: &CompanionOptions, received: &Mutex<Vec<String>>) {
    let _ = stream.set_nonblocking(false);
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let Some((method, path, body)) = read_request(&mut stream) else {
        return;
    };

    let (status, body) = match (method.as_str(), path.as_str()) {
        ("GET", "/api/ping") => (opts.ping_status, opts.ping_body.clone()),
        ("POST", "/api/download") => {
            received.lock().unwrap().push(body);
            if !opts.download_delay.is_zero() {
                thread::sleep(opts.download_delay);
            }
            (opts.download_status, opts.download_body.clone())
        }
        _ => (404, String::new()),
    };
    let response = format!(
        "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
}

/// Returns (method, path, body) once headers and `Content-Length` bytes are read.
fn read_request(stream: &mut TcpStream) -> Option<(String, String, String)> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = std::str::from_utf8(&buf[..header_end]).ok()?.to_string();
    let mut lines = head.lines();
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();
    let content_length = lines
        .filter_map(|l| l.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() - header_end < content_length {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body = String::from_utf8_lossy(&buf[header_end..]).into_owned();
    Some((method, path, body))
}
