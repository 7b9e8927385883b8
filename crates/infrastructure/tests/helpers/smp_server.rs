use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone)]
pub enum SmpBehavior {
    Metadata(String),
    Status(u16),
    Delay(Duration),
}

#[derive(Clone)]
struct SmpState {
    behavior: SmpBehavior,
    paths: Arc<Mutex<Vec<String>>>,
}

/// HTTP server standing in for an SMP; answers every path the same way.
pub struct MockSmp {
    url: String,
    paths: Arc<Mutex<Vec<String>>>,
}

impl MockSmp {
    pub async fn start(behavior: SmpBehavior) -> Self {
        let paths = Arc::new(Mutex::new(Vec::new()));
        let state = SmpState {
            behavior,
            paths: paths.clone(),
        };
        let app = Router::new().fallback(handle).with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            url: format!("http://{}", addr),
            paths,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn requested_paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }
}

async fn handle(State(state): State<SmpState>, uri: Uri) -> Response {
    state.paths.lock().unwrap().push(uri.path().to_string());

    match state.behavior {
        SmpBehavior::Metadata(xml) => (
            StatusCode::OK,
            [("content-type", "application/xml")],
            xml,
        )
            .into_response(),
        SmpBehavior::Status(code) => StatusCode::from_u16(code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response(),
        SmpBehavior::Delay(delay) => {
            tokio::time::sleep(delay).await;
            StatusCode::OK.into_response()
        }
    }
}
