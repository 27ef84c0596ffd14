//! Integration tests for the prediction upload client
//!
//! A minimal HTTP listener stands in for the inference server so the
//! full request shape can be verified on the wire.

use emocam_media::Segment;
use emocam_upload::{PredictClient, UploadError};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

fn find_header_end(raw: &[u8]) -> Option<usize> {
    raw.windows(4).position(|w| w == b"\r\n\r\n").map(|p| p + 4)
}

fn content_length(raw: &[u8]) -> Option<usize> {
    let head = String::from_utf8_lossy(raw);
    head.lines().find_map(|line| {
        let (name, value) = line.split_once(':')?;
        if name.eq_ignore_ascii_case("content-length") {
            value.trim().parse().ok()
        } else {
            None
        }
    })
}

async fn read_http_request(stream: &mut TcpStream) -> Vec<u8> {
    let mut request = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        let n = stream.read(&mut buf).await.unwrap();
        if n == 0 {
            break;
        }
        request.extend_from_slice(&buf[..n]);
        if let (Some(header_end), Some(body_len)) =
            (find_header_end(&request), content_length(&request))
        {
            if request.len() >= header_end + body_len {
                break;
            }
        }
    }
    request
}

async fn write_http_response(stream: &mut TcpStream, status_line: &str, body: &str) {
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_line,
        body.len(),
        body
    );
    stream.write_all(response.as_bytes()).await.unwrap();
    let _ = stream.shutdown().await;
}

/// Serve exactly one request with a canned response, handing the raw
/// request back for inspection.
async fn spawn_one_shot_server(
    status_line: &'static str,
    body: &'static str,
) -> (SocketAddr, oneshot::Receiver<Vec<u8>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let request = read_http_request(&mut stream).await;
        write_http_response(&mut stream, status_line, body).await;
        let _ = tx.send(request);
    });

    (addr, rx)
}

fn count_occurrences(haystack: &[u8], needle: &[u8]) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack.windows(needle.len()).filter(|w| w == &needle).count()
}

fn test_segment(data: &'static [u8]) -> Segment {
    Segment::new(0, data, Duration::from_secs(5))
}

#[tokio::test]
async fn test_upload_request_shape() {
    let (addr, request_rx) = spawn_one_shot_server("200 OK", r#"{"emotion": "happy"}"#).await;
    let client = PredictClient::new(&format!("http://{}/predict", addr), None).unwrap();

    let payload: &[u8] = b"FAKEWEBMDATA";
    let prediction = client.predict(&test_segment(payload)).await.unwrap();
    assert_eq!(prediction.emotion, "happy");

    let request = request_rx.await.unwrap();
    let head = String::from_utf8_lossy(&request);
    assert!(head.starts_with("POST /predict"));

    // Exactly one multipart field, named `file`, carrying the segment.
    // The space-prefixed needle avoids matching inside `filename=`.
    assert_eq!(count_occurrences(&request, b" name=\"file\""), 1);
    assert_eq!(count_occurrences(&request, b" name=\""), 1);
    assert_eq!(count_occurrences(&request, b"filename=\"video.webm\""), 1);
    assert_eq!(count_occurrences(&request, b"Content-Type: video/webm"), 1);
    assert_eq!(count_occurrences(&request, payload), 1);
}

#[tokio::test]
async fn test_non_success_status_is_request_failed() {
    let (addr, _request_rx) =
        spawn_one_shot_server("500 Internal Server Error", r#"{"error": "boom"}"#).await;
    let client = PredictClient::new(&format!("http://{}/predict", addr), None).unwrap();

    let result = client.predict(&test_segment(b"x")).await;
    assert!(matches!(
        result,
        Err(UploadError::RequestFailed { status: 500 })
    ));
}

#[tokio::test]
async fn test_missing_field_is_malformed_response() {
    let (addr, _request_rx) = spawn_one_shot_server("200 OK", r#"{"label": "happy"}"#).await;
    let client = PredictClient::new(&format!("http://{}/predict", addr), None).unwrap();

    let result = client.predict(&test_segment(b"x")).await;
    assert!(matches!(
        result,
        Err(UploadError::MalformedResponse { .. })
    ));
}

#[tokio::test]
async fn test_non_json_body_is_malformed_response() {
    let (addr, _request_rx) = spawn_one_shot_server("200 OK", "oops").await;
    let client = PredictClient::new(&format!("http://{}/predict", addr), None).unwrap();

    let result = client.predict(&test_segment(b"x")).await;
    assert!(matches!(
        result,
        Err(UploadError::MalformedResponse { .. })
    ));
}
