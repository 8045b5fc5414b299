//! Integration tests for the convert and check stages.
//!
//! These drive the pipeline against a mock account page served by wiremock.

use std::fs;
use std::path::Path;
use std::time::Duration;

use cookie_checker_core::pipeline::check_one;
use cookie_checker_core::{
    CheckEngine, CookieRecord, CookieStore, Outcome, Tier, Validator, WorkingStore, convert_folder,
};
use serde_json::Value;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod support;
use support::socket_guard::start_mock_server_or_skip;

macro_rules! require_mock_server {
    () => {{
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        mock_server
    }};
}

const DUO_PAGE: &str =
    "<html><h1>Manage your subscription</h1><p>Your plan: Premium Duo</p></html>";
const FAMILY_PAGE: &str =
    "<html><h1>Manage your subscription</h1><p>Premium Family, includes Premium</p></html>";
const LOGIN_PAGE: &str = "<html><h1>Log in to continue</h1></html>";

struct Dirs {
    _temp: TempDir,
    store: CookieStore,
    working: WorkingStore,
    input: std::path::PathBuf,
}

fn dirs() -> Dirs {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("cookies");
    fs::create_dir_all(&input).unwrap();
    let store = CookieStore::new(temp.path().join("json__spotify_cookies"));
    store.prepare(false).unwrap();
    let working = WorkingStore::new(temp.path().join("working_cookies"));
    Dirs {
        _temp: temp,
        store,
        working,
        input,
    }
}

fn validator_for(server: &MockServer, timeout: Duration) -> Validator {
    Validator::with_endpoint(&format!("{}/us/account", server.uri()), timeout).unwrap()
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

async fn mount_page(server: &MockServer, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path("/us/account"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_structured_set_classified_and_saved_by_tier() {
    let server = require_mock_server!();
    Mock::given(method("GET"))
        .and(path("/us/account"))
        .and(header("cookie", "sid=v1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(DUO_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let dirs = dirs();
    fs::write(
        dirs.input.join("acct.json"),
        r#"[{"name":"sid","value":"v1","domain":".spotify.com"}]"#,
    )
    .unwrap();

    let report = convert_folder(&dirs.input, &dirs.store).unwrap();
    assert_eq!(report.converted_count(), 1);

    let validator = validator_for(&server, Duration::from_secs(5));
    let summary = CheckEngine::new(1)
        .unwrap()
        .check_store(&dirs.store, &validator, &dirs.working)
        .await
        .unwrap();

    assert_eq!(summary.total(), 1);
    assert_eq!(
        summary.results()[0].outcome(),
        Some(Outcome::Live(Tier::PremiumDuo))
    );

    let working_file = dirs.working.root().join("acct.json_Premium_Duo");
    assert!(working_file.is_file());
    assert_eq!(
        read_json(&working_file),
        read_json(&dirs.store.root().join("acct.json")),
        "working copy holds the canonical set unchanged"
    );
}

#[tokio::test]
async fn test_legacy_export_is_sent_as_cookie_header() {
    let server = require_mock_server!();
    Mock::given(method("GET"))
        .and(path("/us/account"))
        .and(header("cookie", "sp_dc=abc; sp_key=xyz"))
        .respond_with(ResponseTemplate::new(200).set_body_string(FAMILY_PAGE))
        .mount(&server)
        .await;

    let dirs = dirs();
    fs::write(
        dirs.input.join("export.txt"),
        "# Netscape HTTP Cookie File\n\
         .spotify.com\tTRUE\t/\tTRUE\t1700000000\tsp_dc\tabc\n\
         .spotify.com\tTRUE\t/\tFALSE\t1700000000\tsp_key\txyz\n",
    )
    .unwrap();

    convert_folder(&dirs.input, &dirs.store).unwrap();
    let validator = validator_for(&server, Duration::from_secs(5));
    let checked = check_one("export.txt", &dirs.store, &validator, &dirs.working)
        .await
        .unwrap();

    assert_eq!(checked.outcome, Outcome::Live(Tier::PremiumFamily));
    assert_eq!(
        checked.working_file.as_deref(),
        Some(dirs.working.root().join("export.txt_Premium_Family").as_path())
    );
}

#[tokio::test]
async fn test_merged_set_uses_latest_value_for_duplicate_name() {
    let server = require_mock_server!();
    Mock::given(method("GET"))
        .and(path("/us/account"))
        .and(header("cookie", "sid=new; other=1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(DUO_PAGE))
        .mount(&server)
        .await;

    let dirs = dirs();
    fs::write(
        dirs.input.join("acct"),
        r#"[{"name":"sid","value":"old"},{"name":"other","value":"1"}]"#,
    )
    .unwrap();
    convert_folder(&dirs.input, &dirs.store).unwrap();

    fs::write(dirs.input.join("acct"), r#"{"name":"sid","value":"new"}"#).unwrap();
    let report = convert_folder(&dirs.input, &dirs.store).unwrap();
    assert_eq!(report.converted[0].merge, cookie_checker_core::store::MergeKind::Appended);

    let stored = dirs.store.load("acct").unwrap().unwrap();
    assert_eq!(stored.len(), 3, "merge appends without de-duplication");

    let validator = validator_for(&server, Duration::from_secs(5));
    let outcome = validator.validate(&stored).await;
    assert_eq!(outcome, Outcome::Live(Tier::PremiumDuo));
}

#[tokio::test]
async fn test_unauthenticated_page_is_invalid_and_not_saved() {
    let server = require_mock_server!();
    mount_page(&server, 200, LOGIN_PAGE).await;

    let dirs = dirs();
    dirs.store
        .merge_into("acct", vec![CookieRecord::new("sid", "expired")])
        .unwrap();

    let validator = validator_for(&server, Duration::from_secs(5));
    let summary = CheckEngine::new(1)
        .unwrap()
        .check_store(&dirs.store, &validator, &dirs.working)
        .await
        .unwrap();

    assert_eq!(summary.invalid(), 1);
    assert_eq!(summary.live(), 0);
    assert!(!dirs.working.root().exists());
}

#[tokio::test]
async fn test_error_status_is_unreachable() {
    let server = require_mock_server!();
    mount_page(&server, 500, DUO_PAGE).await;

    let dirs = dirs();
    dirs.store
        .merge_into("acct", vec![CookieRecord::new("sid", "v1")])
        .unwrap();

    let validator = validator_for(&server, Duration::from_secs(5));
    let checked = check_one("acct", &dirs.store, &validator, &dirs.working)
        .await
        .unwrap();
    assert_eq!(checked.outcome, Outcome::Unreachable);
    assert!(checked.working_file.is_none());
}

#[tokio::test]
async fn test_slow_page_times_out_as_unreachable() {
    let server = require_mock_server!();
    Mock::given(method("GET"))
        .and(path("/us/account"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(DUO_PAGE)
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let validator = validator_for(&server, Duration::from_millis(200));
    let outcome = validator.validate(&[CookieRecord::new("sid", "v1")]).await;
    assert_eq!(outcome, Outcome::Unreachable);
}

#[tokio::test]
async fn test_timed_out_set_is_unreachable_and_not_saved() {
    let server = require_mock_server!();
    Mock::given(method("GET"))
        .and(path("/us/account"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(DUO_PAGE)
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let dirs = dirs();
    fs::write(dirs.input.join("slow.json"), r#"[{"name":"sid","value":"v1"}]"#).unwrap();
    convert_folder(&dirs.input, &dirs.store).unwrap();

    let validator = validator_for(&server, Duration::from_millis(200));
    let summary = CheckEngine::new(1)
        .unwrap()
        .check_store(&dirs.store, &validator, &dirs.working)
        .await
        .unwrap();

    assert_eq!(summary.total(), 1);
    assert_eq!(summary.unreachable(), 1);
    assert_eq!(summary.errored(), 0);
    assert!(!dirs.working.root().exists());
}

#[tokio::test]
async fn test_non_ascii_cookie_value_is_still_sent() {
    let server = require_mock_server!();
    Mock::given(method("GET"))
        .and(path("/us/account"))
        .respond_with(ResponseTemplate::new(200).set_body_string(DUO_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let validator = validator_for(&server, Duration::from_secs(5));
    let outcome = validator
        .validate(&[CookieRecord::new("sid", "caf\u{e9}")])
        .await;
    assert_eq!(outcome, Outcome::Live(Tier::PremiumDuo));
}

#[tokio::test]
async fn test_corrupt_set_does_not_stop_the_batch() {
    let server = require_mock_server!();
    mount_page(&server, 200, DUO_PAGE).await;

    let dirs = dirs();
    dirs.store
        .merge_into("good", vec![CookieRecord::new("sid", "v1")])
        .unwrap();
    fs::write(dirs.store.root().join("broken"), "{not json").unwrap();

    let validator = validator_for(&server, Duration::from_secs(5));
    let summary = CheckEngine::new(1)
        .unwrap()
        .check_store(&dirs.store, &validator, &dirs.working)
        .await
        .unwrap();

    assert_eq!(summary.total(), 2);
    assert_eq!(summary.errored(), 1);
    assert_eq!(summary.live(), 1);
    assert!(dirs.working.root().join("good_Premium_Duo").is_file());
}

#[tokio::test]
async fn test_concurrent_check_saves_every_live_set() {
    let server = require_mock_server!();
    mount_page(&server, 200, DUO_PAGE).await;

    let dirs = dirs();
    for index in 0..6 {
        dirs.store
            .merge_into(
                &format!("acct{index}"),
                vec![CookieRecord::new("sid", format!("v{index}"))],
            )
            .unwrap();
    }

    let validator = validator_for(&server, Duration::from_secs(5));
    let summary = CheckEngine::new(4)
        .unwrap()
        .check_store(&dirs.store, &validator, &dirs.working)
        .await
        .unwrap();

    assert_eq!(summary.live(), 6);
    assert_eq!(summary.by_tier().get(&Tier::PremiumDuo), Some(&6));
    let keys: Vec<_> = summary.results().iter().map(|r| r.key.clone()).collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted, "results are reported in key order");
    for index in 0..6 {
        assert!(
            dirs.working
                .root()
                .join(format!("acct{index}_Premium_Duo"))
                .is_file()
        );
    }
}
