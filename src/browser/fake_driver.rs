//! In-process WebDriver stand-in for tests
//!
//! Serves HTTP/1.1 on a loopback port, records every request as
//! `"METHOD /path"` and answers through a caller-supplied route function.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

use serde_json::{Value, json};

pub(crate) const SESSION_ID: &str = "s1";

type Route = dyn Fn(&str, &str, &str) -> (u16, Value) + Send + Sync;

pub(crate) struct FakeDriver {
    pub(crate) url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl FakeDriver {
    /// `route(method, path, body)` returns the status and the `value` payload.
    pub(crate) fn start<F>(route: F) -> Self
    where
        F: Fn(&str, &str, &str) -> (u16, Value) + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let route: Arc<Route> = Arc::new(route);

        let log = Arc::clone(&requests);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                let log = Arc::clone(&log);
                let route = Arc::clone(&route);
                thread::spawn(move || serve(stream, &log, route.as_ref()));
            }
        });

        Self { url, requests }
    }

    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, request: &str) -> usize {
        self.requests().iter().filter(|r| r.as_str() == request).count()
    }
}

/// Answers for a driver with one session whose page never shows any element.
pub(crate) fn default_route(method: &str, path: &str) -> (u16, Value) {
    match (method, path) {
        ("POST", "/session") => (200, json!({ "sessionId": SESSION_ID, "capabilities": {} })),
        ("POST", p) if p.ends_with("/element") => (
            404,
            json!({ "error": "no such element", "message": "Unable to locate element" }),
        ),
        _ => (200, Value::Null),
    }
}

fn serve(stream: TcpStream, log: &Mutex<Vec<String>>, route: &Route) {
    let Ok(read_half) = stream.try_clone() else { return };
    let mut reader = BufReader::new(read_half);
    let mut writer = stream;

    // Keep-alive: several requests may arrive on one connection
    loop {
        let mut request_line = String::new();
        match reader.read_line(&mut request_line) {
            Ok(0) | Err(_) => return,
            Ok(_) => {}
        }
        let mut parts = request_line.split_whitespace();
        let method = parts.next().unwrap_or("").to_string();
        let path = parts.next().unwrap_or("").to_string();

        let mut content_length = 0usize;
        let mut chunked = false;
        loop {
            let mut header = String::new();
            if reader.read_line(&mut header).unwrap_or(0) == 0 {
                return;
            }
            let header = header.trim_end();
            if header.is_empty() {
                break;
            }
            if let Some((name, value)) = header.split_once(':') {
                let name = name.trim().to_ascii_lowercase();
                let value = value.trim();
                if name == "content-length" {
                    content_length = value.parse().unwrap_or(0);
                } else if name == "transfer-encoding" && value.eq_ignore_ascii_case("chunked") {
                    chunked = true;
                }
            }
        }

        let body = if chunked {
            read_chunked(&mut reader)
        } else {
            let mut buf = vec![0u8; content_length];
            if reader.read_exact(&mut buf).is_err() {
                return;
            }
            buf
        };
        let body = String::from_utf8_lossy(&body).into_owned();

        log.lock().unwrap().push(format!("{method} {path}"));
        let (status, value) = route(&method, &path, &body);
        let payload = json!({ "value": value }).to_string();
        let response = format!(
            "HTTP/1.1 {status} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{payload}",
            reason(status),
            payload.len()
        );
        if writer.write_all(response.as_bytes()).is_err() || writer.flush().is_err() {
            return;
        }
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        _ => "Internal Server Error",
    }
}

fn read_chunked(reader: &mut BufReader<TcpStream>) -> Vec<u8> {
    let mut body = Vec::new();
    loop {
        let mut size_line = String::new();
        if reader.read_line(&mut size_line).unwrap_or(0) == 0 {
            return body;
        }
        let size_text = size_line.trim().split(';').next().unwrap_or("0");
        let size = usize::from_str_radix(size_text, 16).unwrap_or(0);
        let mut chunk = vec![0u8; size + 2];
        if reader.read_exact(&mut chunk).is_err() {
            return body;
        }
        if size == 0 {
            return body;
        }
        chunk.truncate(size);
        body.extend_from_slice(&chunk);
    }
}
