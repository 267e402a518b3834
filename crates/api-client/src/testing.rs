//! Raw HTTP fixture for exercising `HttpTransport` over a real socket

use reqwest::Url;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serve each canned response to one connection, in order, then stop
///
/// Responses are written verbatim, so a short body with a larger
/// `Content-Length` simulates a connection cut mid-body.
pub(crate) async fn serve(responses: Vec<&'static str>) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        for raw in responses {
            let (mut socket, _) = listener.accept().await.unwrap();
            read_head(&mut socket).await;
            socket.write_all(raw.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        }
    });

    Url::parse(&format!("http://{addr}/")).unwrap()
}

async fn read_head(socket: &mut tokio::net::TcpStream) {
    let mut seen = Vec::new();
    let mut buf = [0u8; 1024];
    while !seen.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => seen.extend_from_slice(&buf[..n]),
        }
    }
}

pub(crate) const UNAUTHORIZED_JSON: &str = "HTTP/1.1 401 Unauthorized\r\n\
Content-Type: application/json\r\nX-Trace: t-401\r\nContent-Length: 12\r\n\
Connection: close\r\n\r\n{\"code\":\"X\"}";

pub(crate) const UNAUTHORIZED_TRUNCATED: &str = "HTTP/1.1 401 Unauthorized\r\n\
Content-Type: application/json\r\nContent-Length: 100\r\nConnection: close\r\n\r\n{\"code\"";

pub(crate) const FORBIDDEN_EMPTY: &str =
    "HTTP/1.1 403 Forbidden\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";

pub(crate) const SERVER_ERROR_EMPTY: &str =
    "HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";

pub(crate) const OK_JSON: &str = "HTTP/1.1 200 OK\r\n\
Content-Type: application/json\r\nContent-Length: 8\r\nConnection: close\r\n\r\n{\"id\":1}";
