//! HttpGateway against a throwaway HTTP server on localhost.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

use folio::gateway::{Gateway, GatewayError, HttpGateway};
use folio::pages::{PageDraft, PageId, PageUpdate};

const RECORD: &str = r#"{"id":7,"title":"Groceries","body":"milk and eggs","createdAt":"2024-05-01T10:00:00Z","updatedAt":"2024-05-01T10:00:05.000Z"}"#;

#[derive(Debug)]
struct Recorded {
    request_line: String,
    body: String,
}

fn read_request(stream: &TcpStream) -> Recorded {
    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    reader.read_line(&mut request_line).unwrap();
    let mut content_length = 0;
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).unwrap();
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':')
            && name.eq_ignore_ascii_case("content-length")
        {
            content_length = value.trim().parse().unwrap();
        }
    }
    let mut body = vec![0; content_length];
    reader.read_exact(&mut body).unwrap();
    Recorded {
        request_line: request_line.trim_end().to_string(),
        body: String::from_utf8(body).unwrap(),
    }
}

/// Answer one request per canned `(status, body)` and report what was asked.
fn serve(responses: Vec<(u16, &'static str)>) -> (String, Receiver<Recorded>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for (status, body) in responses {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            let recorded = read_request(&stream);
            let _ = tx.send(recorded);
            let reason = match status {
                200 => "OK",
                201 => "Created",
                204 => "No Content",
                404 => "Not Found",
                _ => "Error",
            };
            let response = format!(
                "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes());
        }
    });
    (url, rx)
}

fn gateway(url: &str) -> HttpGateway {
    HttpGateway::new(url, Duration::from_secs(5)).unwrap()
}

fn next(rx: &Receiver<Recorded>) -> Recorded {
    rx.recv_timeout(Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_list_pages_converts_wire_records() {
    let body: &'static str = Box::leak(format!("[{RECORD}]").into_boxed_str());
    let (url, rx) = serve(vec![(200, body)]);

    let pages = gateway(&url).list_pages().await.unwrap();
    assert_eq!(next(&rx).request_line, "GET /content HTTP/1.1");
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].id, PageId::new("7"));
    assert_eq!(pages[0].title, "Groceries");
    assert_eq!(pages[0].created_at, 1_714_557_600_000);
    assert_eq!(pages[0].updated_at, 1_714_557_605_000);
}

#[tokio::test]
async fn test_create_posts_title_and_body() {
    let (url, rx) = serve(vec![(201, RECORD)]);

    let page = gateway(&url)
        .create_page(&PageDraft::blank())
        .await
        .unwrap();
    let request = next(&rx);
    assert_eq!(request.request_line, "POST /content HTTP/1.1");
    assert_eq!(request.body, r#"{"title":"","body":""}"#);
    assert_eq!(page.id, PageId::new("7"));
}

#[tokio::test]
async fn test_update_sends_only_given_fields() {
    let (url, rx) = serve(vec![(200, RECORD)]);

    let page = gateway(&url)
        .update_page(&PageId::new("7"), &PageUpdate::title("Groceries"))
        .await
        .unwrap();
    let request = next(&rx);
    assert_eq!(request.request_line, "PUT /content/7 HTTP/1.1");
    assert_eq!(request.body, r#"{"title":"Groceries"}"#);
    assert_eq!(page.title, "Groceries");
}

#[tokio::test]
async fn test_delete_accepts_empty_response() {
    let (url, rx) = serve(vec![(204, "")]);

    gateway(&format!("{url}/"))
        .delete_page(&PageId::new("7"))
        .await
        .unwrap();
    assert_eq!(next(&rx).request_line, "DELETE /content/7 HTTP/1.1");
}

#[tokio::test]
async fn test_missing_page_maps_to_not_found() {
    let (url, _rx) = serve(vec![(404, r#"{"error":"no such page"}"#)]);

    let err = gateway(&url)
        .update_page(&PageId::new("9"), &PageUpdate::body("a long enough body"))
        .await
        .unwrap_err();
    assert_eq!(err, GatewayError::NotFound(PageId::new("9")));
}

#[tokio::test]
async fn test_server_error_keeps_status_and_message() {
    let (url, _rx) = serve(vec![(500, "database unavailable")]);

    let err = gateway(&url).list_pages().await.unwrap_err();
    assert_eq!(
        err,
        GatewayError::Status {
            status: 500,
            message: "database unavailable".to_string(),
        }
    );
}

#[tokio::test]
async fn test_bad_json_is_malformed() {
    let (url, _rx) = serve(vec![(200, r#"{"pages":[]}"#)]);

    let err = gateway(&url).list_pages().await.unwrap_err();
    assert!(matches!(err, GatewayError::Malformed(_)));
}

#[tokio::test]
async fn test_bad_timestamp_is_malformed() {
    let (url, _rx) = serve(vec![(
        200,
        r#"{"id":1,"title":"t","body":"b","createdAt":"yesterday","updatedAt":"2024-05-01T10:00:00Z"}"#,
    )]);

    let err = gateway(&url)
        .create_page(&PageDraft::blank())
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::Malformed(_)));
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let err = gateway(&url).list_pages().await.unwrap_err();
    assert!(matches!(err, GatewayError::Network(_)));
}
