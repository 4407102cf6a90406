use featws_core::{
    build_synchronizer, DisabledSynchronizer, RemoteConfig, Rulesheet, RulesheetService,
};
use featws_store::{Page, RulesheetFilter, RulesheetStore};
use featws_test_utils::FakeGitlab;
use pretty_assertions::assert_eq;
use serde_json::json;

const NAMESPACE: &str = "rulesheets";

async fn sql_only_service() -> RulesheetService {
    let store = RulesheetStore::connect("sqlite::memory:").await.unwrap();
    store.migrate().await.unwrap();
    RulesheetService::new(store, Box::new(DisabledSynchronizer))
}

async fn synced_service(fake: &FakeGitlab) -> RulesheetService {
    let store = RulesheetStore::connect("sqlite::memory:").await.unwrap();
    store.migrate().await.unwrap();

    let config = RemoteConfig {
        token: "test-token".to_string(),
        url: fake.uri(),
        namespace: NAMESPACE.to_string(),
        prefix: "rulesheet-".to_string(),
        default_branch: "main".to_string(),
        ci_script: "stages:\n  - deploy\n".to_string(),
    };
    RulesheetService::new(store, build_synchronizer(&config).unwrap())
}

fn payload(name: &str, slug: &str) -> Rulesheet {
    Rulesheet {
        name: name.to_string(),
        slug: slug.to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn create_persists_row_and_commits_initial_version() {
    let fake = FakeGitlab::start(NAMESPACE).await;
    let service = synced_service(&fake).await;

    let mut sheet = payload("risk", "risk");
    service.create(&mut sheet).await.unwrap();

    assert!(sheet.id > 0);
    assert_eq!(sheet.version, "1");
    assert!(fake.project_exists("rulesheet-risk"));
    assert_eq!(fake.commits()[0].message, "[FEATWS BOT] Create Repo");
}

#[tokio::test]
async fn create_without_remote_keeps_version_unchanged() {
    let service = sql_only_service().await;

    let mut sheet = payload("risk", "risk");
    service.create(&mut sheet).await.unwrap();

    assert!(sheet.id > 0);
    assert_eq!(sheet.version, "");
}

#[tokio::test]
async fn create_rejects_missing_name_before_touching_sql() {
    let service = sql_only_service().await;

    let mut sheet = payload("", "risk");
    let err = service.create(&mut sheet).await.unwrap_err();

    assert!(err.is_bad_request());
    assert_eq!(
        service.count(&RulesheetFilter::default()).await.unwrap(),
        0
    );
}

#[tokio::test]
async fn create_derives_slug_from_name() {
    let fake = FakeGitlab::start(NAMESPACE).await;
    let service = synced_service(&fake).await;

    let mut sheet = payload("Credit Risk", "");
    service.create(&mut sheet).await.unwrap();

    assert_eq!(sheet.slug, "credit-risk");
    assert!(fake.project_exists("rulesheet-credit-risk"));
}

#[tokio::test]
async fn get_rehydrates_rule_content() {
    let fake = FakeGitlab::start(NAMESPACE).await;
    let service = synced_service(&fake).await;

    let mut sheet = payload("risk", "risk");
    sheet.features = Some(vec![json!({"name": "income"}).as_object().unwrap().clone()]);
    sheet.rules = Some(json!({"r1": {"value": "10"}}));
    service.create(&mut sheet).await.unwrap();

    let fetched = service.get(sheet.id).await.unwrap().expect("row exists");

    assert_eq!(fetched.name, "risk");
    assert_eq!(fetched.version, "1");
    assert_eq!(
        fetched.features,
        Some(vec![json!({"name": "income"}).as_object().unwrap().clone()])
    );
    assert_eq!(fetched.rules, Some(json!({"r1": {"value": "10"}})));
}

#[tokio::test]
async fn get_missing_row_is_none() {
    let service = sql_only_service().await;
    assert!(service.get(12345).await.unwrap().is_none());
}

#[tokio::test]
async fn update_bumps_version_and_commits() {
    let fake = FakeGitlab::start(NAMESPACE).await;
    let service = synced_service(&fake).await;

    let mut sheet = payload("risk", "risk");
    service.create(&mut sheet).await.unwrap();

    sheet.name = "risk v2".to_string();
    let updated = service.update(&mut sheet).await.unwrap();

    assert!(updated);
    assert_eq!(sheet.version, "2");
    assert_eq!(fake.file("rulesheet-risk", "VERSION").unwrap(), "2\n");
    assert_eq!(fake.commits()[1].message, "[FEATWS BOT] Update Repo");
}

#[tokio::test]
async fn update_missing_row_returns_false_without_commit() {
    let fake = FakeGitlab::start(NAMESPACE).await;
    let service = synced_service(&fake).await;

    let mut sheet = payload("ghost", "ghost");
    sheet.id = 999;
    let updated = service.update(&mut sheet).await.unwrap();

    assert!(!updated);
    assert_eq!(fake.commit_count(), 0);
}

#[tokio::test]
async fn delete_removes_row_but_keeps_remote_project() {
    let fake = FakeGitlab::start(NAMESPACE).await;
    let service = synced_service(&fake).await;

    let mut sheet = payload("risk", "risk");
    service.create(&mut sheet).await.unwrap();

    assert!(service.delete(sheet.id).await.unwrap());
    assert!(!service.delete(sheet.id).await.unwrap());

    // The remote project is intentionally retained
    assert!(fake.project_exists("rulesheet-risk"));
}

#[tokio::test]
async fn find_rehydrates_each_match() {
    let fake = FakeGitlab::start(NAMESPACE).await;
    let service = synced_service(&fake).await;

    for slug in ["alpha", "beta"] {
        let mut sheet = payload(slug, slug);
        service.create(&mut sheet).await.unwrap();
    }

    let found = service
        .find(&RulesheetFilter::default(), Page::default())
        .await
        .unwrap();

    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|s| s.version == "1"));

    let filtered = service
        .find(
            &RulesheetFilter::from_params([("slug", "beta")]).unwrap(),
            Page::default(),
        )
        .await
        .unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].name, "beta");
}

#[tokio::test]
async fn count_matches_filter_ignoring_pagination() {
    let service = sql_only_service().await;

    for slug in ["a", "b", "c"] {
        let mut sheet = payload(slug, slug);
        service.create(&mut sheet).await.unwrap();
    }

    let count = service.count(&RulesheetFilter::default()).await.unwrap();
    assert_eq!(count, 3);
}
