//! End-to-end scenarios: HTTP surface, SQL store, and remote
//! synchronization exercised together against a fake GitLab.

use featws_api::auth::AuthMode;
use featws_api::{build_router, build_state, ApiConfig};
use featws_core::RemoteConfig;
use featws_test_utils::FakeGitlab;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

const NAMESPACE: &str = "rulesheets";
const PROJECT: &str = "rulesheet-risk";

struct TestApp {
    base: String,
    _db_dir: tempfile::TempDir,
}

async fn boot(fake: &FakeGitlab) -> TestApp {
    let db_dir = tempfile::tempdir().unwrap();
    let db_path = db_dir.path().join("featws.db");

    let config = ApiConfig {
        port: 0,
        allow_origins: "*".to_string(),
        database_url: format!("sqlite://{}", db_path.display()),
        external_host: "localhost".to_string(),
        auth_modes: vec![AuthMode::None],
        api_key: String::new(),
        openam_url: String::new(),
        remote: RemoteConfig {
            token: "test-token".to_string(),
            url: fake.uri(),
            namespace: NAMESPACE.to_string(),
            prefix: "rulesheet-".to_string(),
            default_branch: "main".to_string(),
            ci_script: "stages:\n  - deploy\n".to_string(),
        },
    };

    let state = build_state(&config).await.unwrap();
    let app = build_router(state, &config.allow_origins);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        base: format!("http://{addr}"),
        _db_dir: db_dir,
    }
}

async fn post_rulesheet(base: &str, payload: Value) -> Value {
    let response = reqwest::Client::new()
        .post(format!("{base}/api/v1/rulesheets"))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    response.json().await.unwrap()
}

#[tokio::test]
async fn create_from_empty_remote_commits_all_artifacts() {
    let fake = FakeGitlab::start(NAMESPACE).await;
    let app = boot(&fake).await;

    let created = post_rulesheet(
        &app.base,
        json!({
            "name": "risk",
            "slug": "risk",
            "features": [{"name": "b"}, {"name": "a"}]
        }),
    )
    .await;

    assert_eq!(created["version"], "1");

    let mut paths = fake.file_paths(PROJECT);
    paths.sort();
    assert_eq!(
        paths,
        vec![
            ".gitlab-ci.yml",
            "VERSION",
            "features.json",
            "parameters.json",
            "rules.json",
        ]
    );

    let features = fake.file(PROJECT, "features.json").unwrap();
    assert!(features.starts_with("[\n  {\n    \"name\": \"a\"\n  }"));
}

#[tokio::test]
async fn version_increments_across_updates() {
    let fake = FakeGitlab::start(NAMESPACE).await;
    let app = boot(&fake).await;
    let http = reqwest::Client::new();

    let created = post_rulesheet(&app.base, json!({"name": "risk", "slug": "risk"})).await;
    let id = created["id"].as_u64().unwrap();

    for _ in 0..2 {
        let response = http
            .put(format!("{}/api/v1/rulesheets/{id}", app.base))
            .json(&json!({"name": "risk", "slug": "risk"}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
    }

    assert_eq!(fake.file(PROJECT, "VERSION").unwrap(), "3\n");
    assert_eq!(fake.commit_count(), 3);
}

#[tokio::test]
async fn legacy_text_rules_rehydrate_on_read() {
    let fake = FakeGitlab::start(NAMESPACE).await;
    let app = boot(&fake).await;

    let created = post_rulesheet(&app.base, json!({"name": "risk", "slug": "risk"})).await;
    let id = created["id"].as_u64().unwrap();

    // Leave rules.json empty so the legacy file is authoritative
    fake.seed_file(PROJECT, "rules.json", "");
    fake.seed_file(
        PROJECT,
        "rules.featws",
        "foo = 1\n\n[s]\nk = v\n\n[[a]]\nx = 1\n\n[[a]]\nx = 2\n",
    );

    let fetched: Value = reqwest::get(format!("{}/api/v1/rulesheets/{id}", app.base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(
        fetched["rules"],
        json!({
            "foo": "1",
            "s": {"k": "v"},
            "a": [{"x": "1"}, {"x": "2"}]
        })
    );
}

#[tokio::test]
async fn leaf_rules_survive_a_write_read_round_trip() {
    let fake = FakeGitlab::start(NAMESPACE).await;
    let app = boot(&fake).await;

    let created = post_rulesheet(
        &app.base,
        json!({
            "name": "risk",
            "slug": "risk",
            "rules": {"r1": {"condition": "x>0", "value": 5, "type": "number"}}
        }),
    )
    .await;
    let id = created["id"].as_u64().unwrap();

    let fetched: Value = reqwest::get(format!("{}/api/v1/rulesheets/{id}", app.base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(
        fetched["rules"],
        json!({"r1": {"condition": "x>0", "value": 5, "type": "number"}})
    );
    assert_eq!(fetched["hasStringRule"], json!(false));
    assert_eq!(fetched["version"], "1");
}

#[tokio::test]
async fn string_rules_survive_a_write_read_round_trip() {
    let fake = FakeGitlab::start(NAMESPACE).await;
    let app = boot(&fake).await;

    let created = post_rulesheet(
        &app.base,
        json!({
            "name": "risk",
            "slug": "risk",
            "rules": {"r1": "10", "r2": "20"}
        }),
    )
    .await;
    let id = created["id"].as_u64().unwrap();

    let fetched: Value = reqwest::get(format!("{}/api/v1/rulesheets/{id}", app.base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(fetched["rules"], json!({"r1": "10", "r2": "20"}));
    assert_eq!(fetched["hasStringRule"], json!(true));
}

#[tokio::test]
async fn list_rehydrates_and_counts() {
    let fake = FakeGitlab::start(NAMESPACE).await;
    let app = boot(&fake).await;
    let http = reqwest::Client::new();

    for slug in ["alpha", "beta"] {
        post_rulesheet(&app.base, json!({"name": slug, "slug": slug})).await;
    }

    let listed: Vec<Value> = http
        .get(format!("{}/api/v1/rulesheets", app.base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|sheet| sheet["version"] == "1"));

    let counted: Value = http
        .get(format!("{}/api/v1/rulesheets?count=true", app.base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(counted, json!({"count": 2}));
}

#[tokio::test]
async fn delete_removes_the_row_and_keeps_the_remote_project() {
    let fake = FakeGitlab::start(NAMESPACE).await;
    let app = boot(&fake).await;
    let http = reqwest::Client::new();

    let created = post_rulesheet(&app.base, json!({"name": "risk", "slug": "risk"})).await;
    let id = created["id"].as_u64().unwrap();

    let deleted = http
        .delete(format!("{}/api/v1/rulesheets/{id}", app.base))
        .send()
        .await
        .unwrap();
    assert_eq!(deleted.status(), 204);

    let gone = reqwest::get(format!("{}/api/v1/rulesheets/{id}", app.base))
        .await
        .unwrap();
    assert_eq!(gone.status(), 404);

    assert!(fake.project_exists(PROJECT));
    assert_eq!(fake.file(PROJECT, "VERSION").unwrap(), "1\n");
}
