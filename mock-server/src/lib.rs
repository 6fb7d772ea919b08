use std::{borrow::Cow, collections::HashMap, sync::Arc};

use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const DEFAULT_API_KEY: &str = "mock-key";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub count: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Context {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub count: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    pub project_id: String,
    pub project_name: String,
    pub done: bool,
}

/// Everything the mock API knows, plus a per-action request counter.
#[derive(Debug)]
pub struct MockState {
    pub api_key: String,
    pub projects: Vec<Project>,
    pub contexts: Vec<Context>,
    pub tasks: Vec<Task>,
    hits: HashMap<String, usize>,
}

impl MockState {
    /// A fresh account: an empty Inbox and two contexts, like a new signup.
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            projects: vec![Project {
                id: new_id(),
                name: "Inbox".to_string(),
                count: 0,
            }],
            contexts: vec![
                Context {
                    id: new_id(),
                    name: "Home".to_string(),
                    icon: "home.png".to_string(),
                    count: 0,
                },
                Context {
                    id: new_id(),
                    name: "Office".to_string(),
                    icon: "office.png".to_string(),
                    count: 0,
                },
            ],
            tasks: Vec::new(),
            hits: HashMap::new(),
        }
    }

    /// Number of authenticated requests received for `action`.
    pub fn hits(&self, action: &str) -> usize {
        self.hits.get(action).copied().unwrap_or(0)
    }
}

pub type Db = Arc<RwLock<MockState>>;

pub fn new_db(api_key: &str) -> Db {
    Arc::new(RwLock::new(MockState::new(api_key)))
}

pub fn app() -> Router {
    app_with_state(new_db(DEFAULT_API_KEY))
}

pub fn app_with_state(db: Db) -> Router {
    Router::new()
        .route("/api/{*path}", get(dispatch))
        .route("/broken", get(broken))
        .with_state(db)
}

pub async fn serve(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_state(db)).await
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()[..10].to_string()
}

/// Serve `/api/<action>[/<k>-<v>...]/key-<api_key>`.
///
/// The raw path is split before percent-decoding, so an encoded `/` stays
/// inside its segment.
async fn dispatch(State(db): State<Db>, uri: Uri) -> Response {
    let raw = uri.path().strip_prefix("/api/").unwrap_or_default();
    let decoded: Result<Vec<String>, _> = raw
        .split('/')
        .map(|segment| urlencoding::decode(segment).map(Cow::into_owned))
        .collect();
    let Ok(mut segments) = decoded else {
        return (StatusCode::BAD_REQUEST, "invalid percent-encoding").into_response();
    };
    let last = segments.pop();
    let key = last.as_deref().and_then(|last| last.strip_prefix("key-"));

    let mut state = db.write().await;
    if key != Some(state.api_key.as_str()) {
        tracing::debug!("rejected request without a valid key");
        return (StatusCode::UNAUTHORIZED, "invalid key").into_response();
    }
    if segments.is_empty() {
        return StatusCode::NOT_FOUND.into_response();
    }

    let action = segments.remove(0);
    *state.hits.entry(action.clone()).or_default() += 1;
    let params: HashMap<&str, &str> = segments
        .iter()
        .filter_map(|segment| segment.split_once('-'))
        .collect();
    tracing::info!(%action, ?params, "mock request");

    match action.as_str() {
        "projects" => Json(state.projects.clone()).into_response(),
        "contexts" => Json(state.contexts.clone()).into_response(),
        "actions" => {
            let tasks: Vec<Task> = match (params.get("what"), params.get("id")) {
                (Some(&"project"), Some(id)) => state
                    .tasks
                    .iter()
                    .filter(|task| task.project_id == *id)
                    .cloned()
                    .collect(),
                _ => state.tasks.clone(),
            };
            Json(tasks).into_response()
        }
        "newproject" => {
            let Some(name) = params.get("name") else {
                return (StatusCode::BAD_REQUEST, "name is required").into_response();
            };
            state.projects.push(Project {
                id: new_id(),
                name: name.to_string(),
                count: 0,
            });
            Json(json!({"response": "ok"})).into_response()
        }
        "newaction" => {
            let (Some(name), Some(project_id)) = (params.get("name"), params.get("project_id"))
            else {
                return (StatusCode::BAD_REQUEST, "name and project_id are required")
                    .into_response();
            };
            let Some(project) = state.projects.iter_mut().find(|p| p.id == *project_id) else {
                return (StatusCode::BAD_REQUEST, "unknown project").into_response();
            };
            project.count += 1;
            let task = Task {
                id: new_id(),
                name: name.to_string(),
                project_id: project.id.clone(),
                project_name: project.name.clone(),
                done: false,
            };
            state.tasks.push(task);
            Json(json!({"response": "ok"})).into_response()
        }
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

/// A 200 whose body is not JSON.
async fn broken() -> &'static str {
    "<html><body>maintenance</body></html>"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_serializes_to_api_shape() {
        let project = Project {
            id: "a1b2c3d4e5".to_string(),
            name: "Inbox".to_string(),
            count: 2,
        };
        let json = serde_json::to_value(&project).unwrap();
        assert_eq!(json, json!({"id": "a1b2c3d4e5", "name": "Inbox", "count": 2}));
    }

    #[test]
    fn new_state_has_inbox_and_contexts() {
        let state = MockState::new("k");
        assert_eq!(state.projects.len(), 1);
        assert_eq!(state.projects[0].name, "Inbox");
        assert_eq!(state.contexts.len(), 2);
        assert!(state.tasks.is_empty());
        assert_eq!(state.hits("projects"), 0);
    }

    #[test]
    fn ids_are_ten_hex_chars() {
        let id = new_id();
        assert_eq!(id.len(), 10);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
