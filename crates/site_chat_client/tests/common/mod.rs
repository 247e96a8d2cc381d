//! Minimal in-process HTTP responder for integration tests. No mocks: the
//! client under test talks real HTTP/1.1 over a local TCP socket.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// One received request: request line + headers, and the body.
#[derive(Debug, Clone)]
pub struct Received {
    pub head: String,
    pub body: String,
}

impl Received {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("request body should be JSON")
    }

    pub fn header(&self, name: &str) -> Option<String> {
        self.head.lines().find_map(|line| {
            let (k, v) = line.split_once(':')?;
            k.trim()
                .eq_ignore_ascii_case(name)
                .then(|| v.trim().to_string())
        })
    }
}

/// Canned reply: status line text and body.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: &'static str,
    pub content_type: &'static str,
    pub body: String,
}

impl Reply {
    pub fn json(body: &str) -> Self {
        Self {
            status: "200 OK",
            content_type: "application/json",
            body: body.to_string(),
        }
    }

    pub fn with_status(mut self, status: &'static str) -> Self {
        self.status = status;
        self
    }

    pub fn html(body: &str) -> Self {
        Self {
            status: "200 OK",
            content_type: "text/html",
            body: body.to_string(),
        }
    }
}

/// Bind an ephemeral std listener so the port is reserved before any server
/// thread starts.
pub fn bind() -> (std::net::TcpListener, u16) {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let port = listener.local_addr().unwrap().port();
    (listener, port)
}

/// A port with nothing listening on it.
pub fn dead_port() -> u16 {
    let (listener, port) = bind();
    drop(listener);
    port
}

async fn read_request(stream: &mut TcpStream) -> Received {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        let text = String::from_utf8_lossy(&buf);
        if let Some(end) = text.find("\r\n\r\n") {
            let head = text[..end].to_string();
            let len = head
                .lines()
                .find_map(|l| {
                    let (k, v) = l.split_once(':')?;
                    k.trim()
                        .eq_ignore_ascii_case("content-length")
                        .then(|| v.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= end + 4 + len {
                let body = String::from_utf8_lossy(&buf[end + 4..end + 4 + len]).to_string();
                return Received { head, body };
            }
        }
    }
    Received {
        head: String::from_utf8_lossy(&buf).to_string(),
        body: String::new(),
    }
}

async fn write_reply(stream: &mut TcpStream, reply: &Reply) {
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        reply.status,
        reply.content_type,
        reply.body.len(),
        reply.body
    );
    stream.write_all(response.as_bytes()).await.unwrap();
    stream.shutdown().await.ok();
}

/// Serve `replies` in order, one connection each, recording every request.
pub async fn serve(
    listener: std::net::TcpListener,
    replies: Vec<Reply>,
    log: Arc<Mutex<Vec<Received>>>,
) {
    let listener = TcpListener::from_std(listener).unwrap();
    for reply in replies {
        let (mut stream, _) = listener.accept().await.unwrap();
        let received = read_request(&mut stream).await;
        log.lock().unwrap().push(received);
        write_reply(&mut stream, &reply).await;
    }
}

/// Run [`serve`] on its own thread and runtime, for tests that drive a
/// separate process or a blocking client.
pub fn spawn_server(
    replies: Vec<Reply>,
) -> (u16, Arc<Mutex<Vec<Received>>>, std::thread::JoinHandle<()>) {
    let (listener, port) = bind();
    let log = Arc::new(Mutex::new(Vec::new()));
    let log_clone = log.clone();
    let handle = std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(serve(listener, replies, log_clone));
    });
    (port, log, handle)
}
