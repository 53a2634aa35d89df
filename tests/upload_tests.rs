// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Upload selection, at-most-once delivery, and per-record failure isolation,
//! against a mock Strava server.

mod common;

use common::{raw_row, seed_records, test_db, SUMMER_NOON};
use mifit_sync::services::{StravaClient, Uploader};
use mockito::Matcher;

const CUTOFF: &str = "2024-06-01";
const RUN_VALUE: &str = r#"{"duration": 1800, "distance": 5000}"#;

fn client_for(server: &mockito::Server) -> StravaClient {
    StravaClient::with_base_urls(
        "test_client_id".to_string(),
        "test_secret".to_string(),
        &server.url(),
        &server.url(),
    )
}

#[tokio::test]
async fn upload_marks_record_and_never_uploads_it_again() {
    let mut server = mockito::Server::new_async().await;
    let create = server
        .mock("POST", "/activities")
        .match_header("authorization", "Bearer token123")
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": 987654}"#)
        .expect(1)
        .create_async()
        .await;
    let hide = server
        .mock("PUT", "/activities/987654")
        .with_status(200)
        .with_body("{}")
        .expect(1)
        .create_async()
        .await;

    let db = test_db();
    seed_records(&db, &[raw_row("indoor_running", SUMMER_NOON, RUN_VALUE)]);

    let client = client_for(&server);
    let uploader = Uploader::new(&db, &client, CUTOFF);

    let first = uploader.sync("token123").await.unwrap();
    assert_eq!(first.uploaded, 1);
    assert_eq!(first.skipped, 0);
    assert_eq!(db.strava_id(1).unwrap().as_deref(), Some("987654"));
    assert!(db.pending_uploads(CUTOFF).unwrap().is_empty());

    // A second pass finds nothing and issues no further requests.
    let second = uploader.sync("token123").await.unwrap();
    assert_eq!(second.uploaded, 0);
    assert_eq!(second.skipped, 0);

    create.assert_async().await;
    hide.assert_async().await;
}

#[tokio::test]
async fn unmapped_keys_are_skipped_without_network_calls() {
    let mut server = mockito::Server::new_async().await;
    let create = server
        .mock("POST", "/activities")
        .expect(0)
        .create_async()
        .await;

    let db = test_db();
    seed_records(&db, &[raw_row("yoga", SUMMER_NOON, RUN_VALUE)]);

    let outcome = Uploader::new(&db, &client_for(&server), CUTOFF)
        .sync("token123")
        .await
        .unwrap();

    assert_eq!(outcome.uploaded, 0);
    assert_eq!(outcome.skipped, 1);
    create.assert_async().await;
}

#[tokio::test]
async fn outdoor_records_are_never_selected() {
    let mut server = mockito::Server::new_async().await;
    let create = server
        .mock("POST", "/activities")
        .expect(0)
        .create_async()
        .await;

    let db = test_db();
    // Mapped key, matching cutoff, no Strava id -- but native to Strava.
    seed_records(&db, &[raw_row("outdoor_running", SUMMER_NOON, RUN_VALUE)]);

    let outcome = Uploader::new(&db, &client_for(&server), CUTOFF)
        .sync("token123")
        .await
        .unwrap();

    assert_eq!(outcome.uploaded, 0);
    assert_eq!(outcome.skipped, 0);
    create.assert_async().await;
}

#[tokio::test]
async fn missing_distance_uploads_as_zero() {
    let mut server = mockito::Server::new_async().await;
    let create = server
        .mock("POST", "/activities")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("name".into(), "escada".into()),
            Matcher::UrlEncoded("sport_type".into(), "StairStepper".into()),
            Matcher::UrlEncoded("elapsed_time".into(), "900".into()),
            Matcher::UrlEncoded("distance".into(), "0".into()),
            Matcher::UrlEncoded("start_date_local".into(), "2024-06-15T12:00:00Z".into()),
        ]))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": 11}"#)
        .expect(1)
        .create_async()
        .await;
    let hide = server
        .mock("PUT", "/activities/11")
        .with_status(200)
        .with_body("{}")
        .expect(1)
        .create_async()
        .await;

    let db = test_db();
    seed_records(
        &db,
        &[raw_row("climbing_machine", SUMMER_NOON, r#"{"duration": 900}"#)],
    );

    let outcome = Uploader::new(&db, &client_for(&server), CUTOFF)
        .sync("token123")
        .await
        .unwrap();

    assert_eq!(outcome.uploaded, 1);
    create.assert_async().await;
    hide.assert_async().await;
}

#[tokio::test]
async fn one_failed_record_does_not_abort_the_batch() {
    let mut server = mockito::Server::new_async().await;
    // The older record fails at Strava; the newer one succeeds.
    let failed_create = server
        .mock("POST", "/activities")
        .match_body(Matcher::UrlEncoded("elapsed_time".into(), "100".into()))
        .with_status(500)
        .with_body("oops")
        .expect(1)
        .create_async()
        .await;
    let ok_create = server
        .mock("POST", "/activities")
        .match_body(Matcher::UrlEncoded("elapsed_time".into(), "200".into()))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": 42}"#)
        .expect(1)
        .create_async()
        .await;
    let hide = server
        .mock("PUT", "/activities/42")
        .with_status(200)
        .with_body("{}")
        .expect(1)
        .create_async()
        .await;

    let db = test_db();
    seed_records(
        &db,
        &[
            raw_row("indoor_running", SUMMER_NOON, r#"{"duration": 100}"#),
            raw_row("indoor_walking", SUMMER_NOON + 3600, r#"{"duration": 200}"#),
        ],
    );

    let outcome = Uploader::new(&db, &client_for(&server), CUTOFF)
        .sync("token123")
        .await
        .unwrap();

    assert_eq!(outcome.uploaded, 1);
    assert_eq!(outcome.skipped, 1);
    // The failed record stays pending for the next run; the uploaded one
    // carries its Strava id.
    assert_eq!(db.strava_id(1).unwrap(), None);
    assert_eq!(db.strava_id(2).unwrap().as_deref(), Some("42"));
    assert_eq!(db.pending_uploads(CUTOFF).unwrap().len(), 1);

    failed_create.assert_async().await;
    ok_create.assert_async().await;
    hide.assert_async().await;
}

#[tokio::test]
async fn hide_from_home_failure_does_not_undo_the_upload() {
    let mut server = mockito::Server::new_async().await;
    let create = server
        .mock("POST", "/activities")
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": 77}"#)
        .expect(1)
        .create_async()
        .await;
    let hide = server
        .mock("PUT", "/activities/77")
        .with_status(500)
        .with_body("oops")
        .expect(1)
        .create_async()
        .await;

    let db = test_db();
    seed_records(&db, &[raw_row("indoor_running", SUMMER_NOON, RUN_VALUE)]);

    let outcome = Uploader::new(&db, &client_for(&server), CUTOFF)
        .sync("token123")
        .await
        .unwrap();

    assert_eq!(outcome.uploaded, 1);
    assert_eq!(outcome.skipped, 0);
    assert_eq!(db.strava_id(1).unwrap().as_deref(), Some("77"));

    create.assert_async().await;
    hide.assert_async().await;
}

#[tokio::test]
async fn unreadable_payload_is_skipped_not_fatal() {
    let mut server = mockito::Server::new_async().await;
    let create = server
        .mock("POST", "/activities")
        .expect(0)
        .create_async()
        .await;

    let db = test_db();
    seed_records(&db, &[raw_row("indoor_running", SUMMER_NOON, "not json")]);

    let outcome = Uploader::new(&db, &client_for(&server), CUTOFF)
        .sync("token123")
        .await
        .unwrap();

    assert_eq!(outcome.uploaded, 0);
    assert_eq!(outcome.skipped, 1);
    create.assert_async().await;
}
