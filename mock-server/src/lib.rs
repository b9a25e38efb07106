use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

const GENERATORS: [&str; 4] = ["owo", "gay", "zws", "sketchy"];
const METADATA: [&str; 3] = ["OWOIFY", "PROXY", "IGNORE"];

/// A stored short link, shaped like the owo.vc link record.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Link {
    pub id: String,
    pub destination: String,
    pub method: String,
    pub metadata: String,
    pub visits: u64,
    pub scrapes: u64,
    pub status: String,
}

#[derive(Deserialize)]
pub struct CreateLink {
    pub link: String,
    pub generator: Option<String>,
    pub metadata: Option<String>,
}

#[derive(Deserialize)]
pub struct ShortenQuery {
    pub url: Option<String>,
}

#[derive(Clone, Debug)]
pub struct MockConfig {
    /// Domain short ids are minted under, e.g. `owo.mock/abcd1234`.
    pub domain: String,
    /// Number of shorten requests accepted before every further one gets 429.
    pub rate_limit: Option<usize>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            domain: "owo.mock".to_string(),
            rate_limit: None,
        }
    }
}

pub struct MockState {
    config: MockConfig,
    links: RwLock<HashMap<String, Link>>,
    accepted: AtomicUsize,
}

pub type Db = Arc<MockState>;

type ApiError = (StatusCode, Json<Value>);

pub fn app() -> Router {
    app_with(MockConfig::default())
}

pub fn app_with(config: MockConfig) -> Router {
    let db: Db = Arc::new(MockState {
        config,
        links: RwLock::new(HashMap::new()),
        accepted: AtomicUsize::new(0),
    });
    Router::new()
        .route("/api/v2/link", post(create_link))
        .route("/api/v2/link/{id}", get(get_link))
        .route("/v2/shorten", get(shorten_query))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, MockConfig::default()).await
}

pub async fn run_with(listener: TcpListener, config: MockConfig) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(config)).await
}

fn is_http_url(link: &str) -> bool {
    let rest = link
        .strip_prefix("https://")
        .or_else(|| link.strip_prefix("http://"));
    matches!(rest, Some(host) if !host.is_empty() && !host.starts_with('/'))
}

fn new_code() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

/// Counts the request against the rate limit; `false` once it is exhausted.
fn admit(db: &MockState) -> bool {
    match db.config.rate_limit {
        Some(limit) => db.accepted.fetch_add(1, Ordering::SeqCst) < limit,
        None => true,
    }
}

async fn store(db: &MockState, destination: String, method: &str, metadata: &str) -> Link {
    let link = Link {
        id: format!("{}/{}", db.config.domain, new_code()),
        destination,
        method: method.to_string(),
        metadata: metadata.to_string(),
        visits: 0,
        scrapes: 0,
        status: "ACTIVE".to_string(),
    };
    db.links.write().await.insert(link.id.clone(), link.clone());
    link
}

fn message(status: StatusCode, message: &str) -> ApiError {
    (status, Json(json!({ "message": message })))
}

async fn create_link(State(db): State<Db>, Json(input): Json<CreateLink>) -> Result<Json<Link>, ApiError> {
    if !admit(&db) {
        return Err(message(StatusCode::TOO_MANY_REQUESTS, "rate limited"));
    }
    if !is_http_url(&input.link) {
        return Err(message(StatusCode::BAD_REQUEST, "invalid link"));
    }
    let generator = input.generator.unwrap_or_else(|| "owo".to_string());
    if !GENERATORS.contains(&generator.as_str()) {
        return Err(message(StatusCode::BAD_REQUEST, "invalid generator"));
    }
    let metadata = input.metadata.unwrap_or_else(|| "OWOIFY".to_string());
    if !METADATA.contains(&metadata.as_str()) {
        return Err(message(StatusCode::BAD_REQUEST, "invalid metadata"));
    }
    let method = generator.to_uppercase();
    Ok(Json(store(&db, input.link, &method, &metadata).await))
}

async fn get_link(State(db): State<Db>, Path(id): Path<String>) -> Result<Json<Link>, ApiError> {
    let links = db.links.read().await;
    links
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| message(StatusCode::NOT_FOUND, "link not found"))
}

async fn shorten_query(
    State(db): State<Db>,
    Query(query): Query<ShortenQuery>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    if !admit(&db) {
        return Err((
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({ "ok": false, "error": "rate limited" })),
        ));
    }
    let Some(url) = query.url.filter(|url| is_http_url(url)) else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "ok": false, "error": "This is not a valid URL" })),
        ));
    };
    let link = store(&db, url, "QUERY", "IGNORE").await;
    let code = link.id.rsplit('/').next().unwrap_or_default().to_string();
    let body = json!({
        "ok": true,
        "result": {
            "code": code,
            "short_link": link.id,
            "full_short_link": format!("https://{}", link.id),
            "original_link": link.destination,
        }
    });
    Ok((StatusCode::CREATED, Json(body)))
}
