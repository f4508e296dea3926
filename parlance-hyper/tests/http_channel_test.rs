//! Wire-level tests for the hyper transport channel.
//!
//! A minimal TCP fixture stands in for a real server: it records one HTTP
//! request and answers with a canned response, so tests can assert the
//! exact request line, headers, and body the channel put on the wire.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use parlance_core::{Channel, Endpoint, Error, Method, PathTemplate, Request, UrlBuilder};
use parlance_hyper::{ClientBuilder, HyperChannel};
use parlance_serde::Runtime;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Widget {
    int_property: i32,
}

struct CreateWidget;

static CREATE_WIDGET_PATH: LazyLock<PathTemplate> = LazyLock::new(|| {
    PathTemplate::builder()
        .fixed("widgets")
        .variable("widgetId")
        .build()
});

impl Endpoint for CreateWidget {
    fn render_path(
        &self,
        params: &BTreeMap<String, String>,
        url: &mut UrlBuilder,
    ) -> Result<(), Error> {
        CREATE_WIDGET_PATH.fill(params, url)
    }

    fn http_method(&self) -> Method {
        Method::POST
    }
}

struct Ping;

static PING_PATH: LazyLock<PathTemplate> =
    LazyLock::new(|| PathTemplate::builder().fixed("ping").build());

impl Endpoint for Ping {
    fn render_path(
        &self,
        params: &BTreeMap<String, String>,
        url: &mut UrlBuilder,
    ) -> Result<(), Error> {
        PING_PATH.fill(params, url)
    }

    fn http_method(&self) -> Method {
        Method::GET
    }
}

/// One recorded HTTP request, as raw text pieces.
struct RecordedRequest {
    request_line: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl RecordedRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Accept one connection, record its request, answer with `response`.
async fn serve_once(response: &'static str) -> (SocketAddr, JoinHandle<RecordedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        let head_end = loop {
            let n = stream.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before request head");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = find(&buf, b"\r\n\r\n") {
                break pos;
            }
        };

        let head = String::from_utf8(buf[..head_end].to_vec()).unwrap();
        let mut lines = head.split("\r\n");
        let request_line = lines.next().unwrap().to_string();
        let headers: Vec<(String, String)> = lines
            .filter_map(|line| line.split_once(": "))
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();

        let content_length: usize = headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
            .map(|(_, value)| value.parse().unwrap())
            .unwrap_or(0);
        let body_start = head_end + 4;
        while buf.len() < body_start + content_length {
            let n = stream.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before request body");
            buf.extend_from_slice(&chunk[..n]);
        }
        let body = buf[body_start..body_start + content_length].to_vec();

        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.unwrap();

        RecordedRequest {
            request_line,
            headers,
            body,
        }
    });
    (addr, handle)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn create_widget_request(runtime: &Runtime) -> Request {
    let plain = runtime.plain_serde();
    let serializer = runtime.body_serde().serializer::<Widget>();
    Request::builder()
        .put_path_param("widgetId", plain.serialize_string("myWidget"))
        .put_header_param("headerKey", "2018-07-19T08:11:21Z")
        .put_all_query_params(
            "queryKey",
            vec!["ri.a.b.c.d".to_string(), "ri.a.b.c.e".to_string()],
        )
        .body(serializer.serialize(&Widget { int_property: 42 }).unwrap())
        .build()
}

#[tokio::test]
async fn test_renders_path_query_headers_and_body() {
    let (addr, recorded) = serve_once(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 19\r\n\r\n{\"intProperty\":84}\n",
    )
    .await;

    let runtime = Runtime::default();
    let channel = HyperChannel::new(format!("http://{addr}")).unwrap();
    let response = channel
        .execute(&CreateWidget, &create_widget_request(&runtime))
        .await
        .unwrap();

    assert_eq!(response.code(), 200);
    let widget: Widget = runtime
        .body_serde()
        .deserializer()
        .deserialize(response)
        .await
        .unwrap();
    assert_eq!(widget, Widget { int_property: 84 });

    let recorded = recorded.await.unwrap();
    assert_eq!(
        recorded.request_line,
        "POST /widgets/myWidget?queryKey=ri.a.b.c.d&queryKey=ri.a.b.c.e HTTP/1.1"
    );
    assert_eq!(recorded.header("headerKey"), Some("2018-07-19T08:11:21Z"));
    assert_eq!(recorded.header("content-type"), Some("application/json"));
    assert_eq!(recorded.body, b"{\"intProperty\":42}");
}

#[tokio::test]
async fn test_bodyless_request_omits_content_type() {
    let (addr, recorded) = serve_once("HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n").await;

    let channel = HyperChannel::new(format!("http://{addr}")).unwrap();
    let response = channel
        .execute(&Ping, &Request::default())
        .await
        .unwrap();
    Runtime::default()
        .empty_body_deserializer()
        .deserialize(response)
        .await
        .unwrap();

    let recorded = recorded.await.unwrap();
    assert_eq!(recorded.request_line, "GET /ping HTTP/1.1");
    assert_eq!(recorded.header("content-type"), None);
    assert!(recorded.body.is_empty());
}

#[tokio::test]
async fn test_non_success_status_conveyed_as_response() {
    let (addr, _recorded) = serve_once(
        "HTTP/1.1 500 Internal Server Error\r\nContent-Type: text/plain\r\nContent-Length: 4\r\n\r\noops",
    )
    .await;

    // The bare transport never decodes errors.
    let channel = HyperChannel::new(format!("http://{addr}")).unwrap();
    let response = channel.execute(&Ping, &Request::default()).await.unwrap();
    assert_eq!(response.code(), 500);
    assert_eq!(response.content_type(), Some("text/plain"));
    let body = response.into_body().collect().await.unwrap();
    assert_eq!(&body[..], b"oops");
}

#[tokio::test]
async fn test_client_stack_decodes_remote_errors() {
    let envelope = "{\"errorCode\":\"FAILED_PRECONDITION\",\
                    \"errorName\":\"Default:FailedPrecondition\",\
                    \"errorInstanceId\":\"abc\",\"parameters\":{\"key\":\"value\"}}";
    let response: &'static str = Box::leak(
        format!(
            "HTTP/1.1 500 Internal Server Error\r\nContent-Type: application/json\r\n\
             Content-Length: {}\r\n\r\n{}",
            envelope.len(),
            envelope
        )
        .into_boxed_str(),
    );
    let (addr, _recorded) = serve_once(response).await;

    let channel = ClientBuilder::new(format!("http://{addr}"))
        .max_attempts(1)
        .build()
        .unwrap();
    let err = channel
        .execute(&Ping, &Request::default())
        .await
        .unwrap_err();
    match err {
        Error::Remote(remote) => {
            assert_eq!(remote.status(), 500);
            assert_eq!(
                remote.to_string(),
                "RemoteException: FAILED_PRECONDITION (Default:FailedPrecondition) \
                 with instance ID abc"
            );
        }
        other => panic!("expected remote error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_connect_failure_surfaces_as_transport_error() {
    // Bind to learn a free port, then close it again.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let channel = HyperChannel::new(format!("http://{addr}")).unwrap();
    let err = channel
        .execute(&Ping, &Request::default())
        .await
        .unwrap_err();
    match err {
        Error::Transport { source, .. } => assert!(source.is_some()),
        other => panic!("expected transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_retry_replays_request_body() {
    // First connection is reset before a response; the retry layer
    // replays the same request on a fresh connection.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        drop(stream);

        let (mut stream, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = stream.read(&mut chunk).await.unwrap();
            assert!(n > 0);
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = find(&buf, b"\r\n\r\n") {
                let content_length: usize = 18;
                if buf.len() >= pos + 4 + content_length {
                    break;
                }
            }
        }
        stream
            .write_all(
                b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 18\r\n\r\n{\"intProperty\":84}",
            )
            .await
            .unwrap();
        stream.shutdown().await.unwrap();
        buf
    });

    let runtime = Runtime::default();
    let channel = ClientBuilder::new(format!("http://{addr}"))
        .max_attempts(3)
        .build()
        .unwrap();
    let response = channel
        .execute(&CreateWidget, &create_widget_request(&runtime))
        .await
        .unwrap();
    let widget: Widget = runtime
        .body_serde()
        .deserializer()
        .deserialize(response)
        .await
        .unwrap();
    assert_eq!(widget, Widget { int_property: 84 });

    let replayed = server.await.unwrap();
    assert!(find(&replayed, b"{\"intProperty\":42}").is_some());
}
