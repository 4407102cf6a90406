//! Stateful in-memory GitLab fake
//!
//! Serves the slice of the GitLab v4 API the synchronization core uses,
//! with real create/update semantics: commits validate their actions
//! against the current file set and apply atomically, so version
//! monotonicity and atomicity tests observe realistic behavior.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::{json, Value};
use wiremock::http::Method;
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// One commit accepted by the fake, with its applied actions
#[derive(Debug, Clone)]
pub struct CommitRecord {
    pub project_id: u64,
    pub branch: String,
    pub message: String,
    /// `(action, file_path)` pairs in request order
    pub actions: Vec<(String, String)>,
}

#[derive(Debug, Default)]
struct State {
    namespace: String,
    namespace_id: u64,
    next_project_id: u64,
    commit_seq: u64,
    /// project name -> id
    projects: BTreeMap<String, u64>,
    /// project id -> path -> content
    files: BTreeMap<u64, BTreeMap<String, String>>,
    commits: Vec<CommitRecord>,
    /// project id -> pipeline payload
    pipelines: BTreeMap<u64, Value>,
    pipelines_unavailable: bool,
}

impl State {
    fn create_project(&mut self, name: &str) -> u64 {
        let id = self.next_project_id;
        self.next_project_id += 1;
        self.projects.insert(name.to_string(), id);
        self.files.insert(id, BTreeMap::new());
        id
    }

    fn project_json(&self, name: &str, id: u64) -> Value {
        json!({
            "id": id,
            "name": name,
            "path_with_namespace": format!("{}/{}", self.namespace, name),
            "web_url": format!("http://gitlab.test/{}/{}", self.namespace, name),
        })
    }
}

/// A wiremock-backed fake GitLab instance
pub struct FakeGitlab {
    server: MockServer,
    state: Arc<Mutex<State>>,
}

impl FakeGitlab {
    /// Boot the fake with a single configured namespace
    pub async fn start(namespace: &str) -> Self {
        let server = MockServer::start().await;
        let state = Arc::new(Mutex::new(State {
            namespace: namespace.to_string(),
            namespace_id: 1,
            next_project_id: 100,
            ..Default::default()
        }));

        for m in [Method::GET, Method::POST] {
            Mock::given(method(m))
                .and(path_regex("^/api/v4/.*"))
                .respond_with(Router {
                    state: Arc::clone(&state),
                })
                .mount(&server)
                .await;
        }

        Self { server, state }
    }

    /// Base URL of the fake host
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Create a project directly in the fake state
    pub fn seed_project(&self, name: &str) -> u64 {
        self.state.lock().unwrap().create_project(name)
    }

    /// Write a file into a seeded project
    pub fn seed_file(&self, project: &str, path: &str, content: &str) {
        let mut state = self.state.lock().unwrap();
        let id = state.projects[project];
        state
            .files
            .get_mut(&id)
            .unwrap()
            .insert(path.to_string(), content.to_string());
    }

    /// Read a file back out of the fake state
    pub fn file(&self, project: &str, path: &str) -> Option<String> {
        let state = self.state.lock().unwrap();
        let id = *state.projects.get(project)?;
        state.files.get(&id)?.get(path).cloned()
    }

    /// All file paths currently present in a project
    pub fn file_paths(&self, project: &str) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state
            .projects
            .get(project)
            .and_then(|id| state.files.get(id))
            .map(|files| files.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn project_exists(&self, name: &str) -> bool {
        self.state.lock().unwrap().projects.contains_key(name)
    }

    /// Commits accepted so far, oldest first
    pub fn commits(&self) -> Vec<CommitRecord> {
        self.state.lock().unwrap().commits.clone()
    }

    pub fn commit_count(&self) -> usize {
        self.state.lock().unwrap().commits.len()
    }

    /// Configure the latest pipeline reported for a project
    pub fn set_pipeline(&self, project: &str, status: &str, web_url: &str) {
        let mut state = self.state.lock().unwrap();
        let id = state.projects[project];
        state.pipelines.insert(
            id,
            json!({"id": 1, "status": status, "web_url": web_url}),
        );
    }

    /// Make the pipelines endpoint fail with a server error
    pub fn set_pipelines_unavailable(&self, unavailable: bool) {
        self.state.lock().unwrap().pipelines_unavailable = unavailable;
    }
}

struct Router {
    state: Arc<Mutex<State>>,
}

impl Respond for Router {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let path = request.url.path();
        let Some(rest) = path.strip_prefix("/api/v4/") else {
            return not_found("route");
        };
        let segments: Vec<String> = rest
            .split('/')
            .map(|s| urlencoding::decode(s).map(|c| c.into_owned()).unwrap_or_default())
            .collect();
        let segments: Vec<&str> = segments.iter().map(String::as_str).collect();

        let get = request.method == Method::GET;
        let post = request.method == Method::POST;

        let mut state = self.state.lock().unwrap();
        match segments.as_slice() {
            ["namespaces", name] if get => {
                if *name == state.namespace {
                    ResponseTemplate::new(200).set_body_json(json!({
                        "id": state.namespace_id,
                        "name": state.namespace,
                        "full_path": state.namespace,
                    }))
                } else {
                    not_found("namespace")
                }
            }

            ["projects", path_with_namespace] if get => {
                let Some(name) = path_with_namespace
                    .strip_prefix(&format!("{}/", state.namespace))
                else {
                    return not_found("project");
                };
                match state.projects.get(name).copied() {
                    Some(id) => {
                        ResponseTemplate::new(200).set_body_json(state.project_json(name, id))
                    }
                    None => not_found("project"),
                }
            }

            ["projects"] if post => {
                let body: Value = match serde_json::from_slice(&request.body) {
                    Ok(v) => v,
                    Err(_) => return bad_request("invalid body"),
                };
                let Some(name) = body.get("name").and_then(Value::as_str) else {
                    return bad_request("name required");
                };
                if body.get("namespace_id").and_then(Value::as_u64)
                    != Some(state.namespace_id)
                {
                    return bad_request("unknown namespace_id");
                }
                if state.projects.contains_key(name) {
                    return bad_request("project exists");
                }
                let name = name.to_string();
                let id = state.create_project(&name);
                ResponseTemplate::new(201).set_body_json(state.project_json(&name, id))
            }

            ["projects", id, "repository", "files", file_path] if get => {
                let Some(files) = id.parse::<u64>().ok().and_then(|id| state.files.get(&id))
                else {
                    return not_found("project");
                };
                match files.get(*file_path) {
                    Some(content) => ResponseTemplate::new(200).set_body_json(json!({
                        "file_path": file_path,
                        "content": BASE64.encode(content),
                    })),
                    None => not_found("file"),
                }
            }

            ["projects", id, "repository", "commits"] if post => {
                let Some(project_id) = id.parse::<u64>().ok() else {
                    return not_found("project");
                };
                if !state.files.contains_key(&project_id) {
                    return not_found("project");
                }
                let body: Value = match serde_json::from_slice(&request.body) {
                    Ok(v) => v,
                    Err(_) => return bad_request("invalid body"),
                };
                apply_commit(&mut state, project_id, &body)
            }

            ["projects", id, "pipelines"] if get => {
                if state.pipelines_unavailable {
                    return ResponseTemplate::new(500)
                        .set_body_json(json!({"message": "pipelines unavailable"}));
                }
                let pipelines: Vec<Value> = id
                    .parse::<u64>()
                    .ok()
                    .and_then(|id| state.pipelines.get(&id))
                    .into_iter()
                    .cloned()
                    .collect();
                ResponseTemplate::new(200).set_body_json(pipelines)
            }

            _ => not_found("route"),
        }
    }
}

/// Validate every action against the current file set, then apply all
///
/// Mirrors GitLab's atomicity: a single invalid action rejects the whole
/// commit and no file changes.
fn apply_commit(state: &mut State, project_id: u64, body: &Value) -> ResponseTemplate {
    let branch = body.get("branch").and_then(Value::as_str).unwrap_or("");
    let message = body
        .get("commit_message")
        .and_then(Value::as_str)
        .unwrap_or("");
    let Some(actions) = body.get("actions").and_then(Value::as_array) else {
        return bad_request("actions required");
    };

    let files = state.files.get(&project_id).cloned().unwrap_or_default();
    let mut staged: Vec<(String, String, String)> = Vec::new();
    for action in actions {
        let kind = action.get("action").and_then(Value::as_str).unwrap_or("");
        let file_path = action
            .get("file_path")
            .and_then(Value::as_str)
            .unwrap_or("");
        let content = action.get("content").and_then(Value::as_str).unwrap_or("");

        match kind {
            "create" if files.contains_key(file_path) => {
                return bad_request("file already exists");
            }
            "update" if !files.contains_key(file_path) => {
                return bad_request("file does not exist");
            }
            "create" | "update" => {}
            _ => return bad_request("unsupported action"),
        }
        staged.push((kind.to_string(), file_path.to_string(), content.to_string()));
    }

    let project_files = state.files.get_mut(&project_id).unwrap();
    for (_, file_path, content) in &staged {
        project_files.insert(file_path.clone(), content.clone());
    }

    state.commit_seq += 1;
    let commit_id = format!("{:040x}", state.commit_seq);
    state.commits.push(CommitRecord {
        project_id,
        branch: branch.to_string(),
        message: message.to_string(),
        actions: staged
            .iter()
            .map(|(kind, file_path, _)| (kind.clone(), file_path.clone()))
            .collect(),
    });

    ResponseTemplate::new(201).set_body_json(json!({
        "id": commit_id,
        "short_id": &commit_id[..8],
        "title": message,
    }))
}

fn not_found(what: &str) -> ResponseTemplate {
    ResponseTemplate::new(404).set_body_json(json!({"message": format!("404 {what} Not Found")}))
}

fn bad_request(message: &str) -> ResponseTemplate {
    ResponseTemplate::new(400).set_body_json(json!({"message": message}))
}
