// Canned-response leaderboard service for exercising the HTTP client.
use std::{
    // `Arc<Mutex<..>>` lets handlers on the server thread record what the test reads.
    sync::{mpsc, Arc, Mutex},
    thread,
};

use axum::{
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    routing::any,
    Router,
};

// One request as the stub saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub content_type: Option<String>,
    pub body: String,
}

type Requests = Arc<Mutex<Vec<Recorded>>>;

pub struct Stub {
    pub base_url: String,
    pub requests: Requests,
}

// Serve `routes` (path, status, body) on an ephemeral port.  Unknown paths
// get a 404.  The server thread runs until the test binary exits.
pub fn serve(routes: Vec<(&'static str, u16, &'static str)>) -> Stub {
    let requests: Requests = Arc::new(Mutex::new(Vec::new()));
    let app = router(routes).with_state(Arc::clone(&requests));

    let (addr_tx, addr_rx) = mpsc::channel();
    // A dedicated OS thread with its own runtime keeps the server alive
    // while the blocking client under test runs on the test thread.
    thread::spawn(move || {
        let runtime = tokio::runtime::Runtime::new().expect("test runtime");
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                .await
                .expect("bind ephemeral test port");
            let addr = listener.local_addr().expect("get local addr");
            // Bound before publishing, so early connects queue in the backlog.
            let _ = addr_tx.send(addr);
            axum::serve(listener, app).await.expect("stub server failed");
        });
    });

    let addr = addr_rx.recv().expect("stub server did not start");
    Stub {
        base_url: format!("http://{addr}"),
        requests,
    }
}

fn router(routes: Vec<(&'static str, u16, &'static str)>) -> Router<Requests> {
    let mut app = Router::new();
    for (path, status, reply) in routes {
        let status = StatusCode::from_u16(status).expect("valid status code");
        app = app.route(
            path,
            any(
                move |State(seen): State<Requests>,
                      method: Method,
                      headers: HeaderMap,
                      body: String| async move {
                    record(&seen, method, path, &headers, body);
                    (status, reply)
                },
            ),
        );
    }
    app.fallback(
        |State(seen): State<Requests>, method: Method, uri: Uri, headers: HeaderMap, body: String| async move {
            record(&seen, method, uri.path(), &headers, body);
            (StatusCode::NOT_FOUND, "not found")
        },
    )
}

fn record(seen: &Requests, method: Method, path: &str, headers: &HeaderMap, body: String) {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    seen.lock().unwrap().push(Recorded {
        method: method.to_string(),
        path: path.to_string(),
        content_type,
        body,
    });
}
