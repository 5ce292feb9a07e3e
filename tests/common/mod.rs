#![allow(dead_code)]

use std::{
    sync::{mpsc, Arc, Mutex},
    thread,
    time::Duration,
};

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Handle to a fake `/calcular` backend running on its own thread.
pub struct MockBackend {
    pub url: String,
    pub requests: Arc<Mutex<Vec<Value>>>,
}

impl MockBackend {
    pub fn requests(&self) -> Vec<Value> {
        self.requests.lock().expect("request log poisoned").clone()
    }
}

#[derive(Clone)]
struct BackendState {
    status: StatusCode,
    body: Value,
    delay: Duration,
    requests: Arc<Mutex<Vec<Value>>>,
}

async fn calcular(
    State(state): State<BackendState>,
    Json(payload): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state
        .requests
        .lock()
        .expect("request log poisoned")
        .push(payload);
    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }
    (state.status, Json(state.body.clone()))
}

/// Starts a backend that answers every POST with `status` and `body`.
pub fn spawn_backend(status: StatusCode, body: Value) -> MockBackend {
    spawn_backend_with_delay(status, body, Duration::ZERO)
}

pub fn spawn_backend_with_delay(status: StatusCode, body: Value, delay: Duration) -> MockBackend {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = BackendState {
        status,
        body,
        delay,
        requests: Arc::clone(&requests),
    };
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .expect("build backend runtime");
        runtime.block_on(async move {
            let listener = TcpListener::bind("127.0.0.1:0")
                .await
                .expect("bind backend listener");
            let addr = listener.local_addr().expect("backend address");
            tx.send(addr).expect("report backend address");
            let app = Router::new()
                .route("/calcular", post(calcular))
                .with_state(state);
            axum::serve(listener, app).await.expect("serve backend");
        });
    });

    let addr = rx
        .recv_timeout(Duration::from_secs(5))
        .expect("backend did not start");
    MockBackend {
        url: format!("http://{addr}/calcular"),
        requests,
    }
}

/// Successful response using the backend's Portuguese field names.
pub fn sample_response() -> Value {
    json!({
        "total_toneladas": 4.36,
        "arvores": 24,
        "compensacoes": {
            "Reflorestamento": 174.4,
            "Energia Renovável": 218.0
        },
        "categorias": {
            "Energia": 1200.0,
            "Transporte": 3160.0
        }
    })
}

/// An endpoint nothing listens on.
pub const UNREACHABLE_ENDPOINT: &str = "http://127.0.0.1:1/calcular";
