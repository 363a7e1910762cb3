//! Minimal HTTP/1.1 server for integration tests.
//!
//! Routes by path prefix:
//! - `/files/<name>`: 200 with a body derived from `<name>`
//! - `/slow/<name>`: waits `SLOW_DELAY` before answering
//! - `/index`: the HTML body passed to `start`
//! - anything else: 404

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

pub const SLOW_DELAY: Duration = Duration::from_secs(3);

pub struct FileServer {
    pub base_url: String,
    requests: Arc<AtomicUsize>,
}

impl FileServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

/// Deterministic body served for `/files/<name>`.
pub fn body_for(name: &str) -> Vec<u8> {
    name.bytes().cycle().take(4096 + name.len()).collect()
}

/// Starts a server in a background thread. It runs until the process exits.
pub fn start(index_html: &str) -> FileServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let requests = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&requests);
    let index = Arc::new(index_html.as_bytes().to_vec());
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            counter.fetch_add(1, Ordering::SeqCst);
            let index = Arc::clone(&index);
            thread::spawn(move || handle(stream, &index));
        }
    });
    FileServer {
        base_url: format!("http://127.0.0.1:{}/", port),
        requests,
    }
}

fn respond(stream: &mut std::net::TcpStream, status: &str, body: &[u8]) {
    let head = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(body);
}

fn handle(mut stream: std::net::TcpStream, index: &[u8]) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let request = String::from_utf8_lossy(&buf[..n]);
    let path = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();

    if let Some(name) = path.strip_prefix("/files/") {
        respond(&mut stream, "200 OK", &body_for(name));
    } else if let Some(name) = path.strip_prefix("/slow/") {
        thread::sleep(SLOW_DELAY);
        respond(&mut stream, "200 OK", &body_for(name));
    } else if path == "/index" {
        respond(&mut stream, "200 OK", index);
    } else {
        respond(&mut stream, "404 Not Found", b"not found");
    }
}
