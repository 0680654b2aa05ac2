// Integration tests for heartbeat delivery over HTTP, against a throwaway local listener

use mata_sentry::core::render::{HeartbeatPayload, NodeStatus};
use mata_sentry::core::system_info::HardwareInfo;
use mata_sentry::core::transport::{is_success, HttpTransport, Transport};
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use super::common::start_time;

fn payload() -> HeartbeatPayload {
    HeartbeatPayload::build(
        &HardwareInfo::fallback(),
        "farm-secret",
        NodeStatus::Idling,
        None,
        start_time(),
    )
}

/// Serve one request with `status_line`, handing back the raw request text
fn serve_once(status_line: &'static str) -> (u16, mpsc::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        stream
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();

        let mut request = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = stream.read(&mut buf).unwrap_or(0);
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
            if request_complete(&request) {
                break;
            }
        }

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            status_line
        );
        stream.write_all(response.as_bytes()).unwrap();
        tx.send(String::from_utf8_lossy(&request).into_owned()).unwrap();
    });

    (port, rx)
}

fn request_complete(request: &[u8]) -> bool {
    let text = String::from_utf8_lossy(request);
    let Some(header_end) = text.find("\r\n\r\n") else {
        return false;
    };
    let content_length = text[..header_end]
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);
    request.len() >= header_end + 4 + content_length
}

#[test]
fn test_post_reaches_submit_endpoint() {
    let (port, rx) = serve_once("200 OK");
    let transport = HttpTransport::new("127.0.0.1", port, Duration::from_secs(5)).unwrap();

    let status = transport.send(&payload());
    assert_eq!(status, "200 OK");
    assert!(is_success(&status));

    let request = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert!(request.starts_with("POST /submit HTTP/1.1"));
    assert!(request.to_lowercase().contains("content-type: application/json"));

    let body = &request[request.find("\r\n\r\n").unwrap() + 4..];
    let json: serde_json::Value = serde_json::from_str(body).unwrap();
    assert_eq!(json["sentry_secret"], "farm-secret");
    assert_eq!(json["status"], "idling");
    assert_eq!(json["timestamp"], "2023-11-14T22:13:20Z");
    assert!(json.get("render_progress").is_none());
}

#[test]
fn test_server_error_is_reported_not_raised() {
    let (port, _rx) = serve_once("500 Internal Server Error");
    let transport = HttpTransport::new("127.0.0.1", port, Duration::from_secs(5)).unwrap();

    let status = transport.send(&payload());
    assert_eq!(status, "500 Internal Server Error");
    assert!(!is_success(&status));
}

#[test]
fn test_unreachable_collector() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let transport = HttpTransport::new("127.0.0.1", port, Duration::from_secs(2)).unwrap();

    let status = transport.send(&payload());
    assert!(status.starts_with("✗ POST failed"));
}
