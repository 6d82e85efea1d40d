use crate::fixtures::fake_disk::{MISSING_KEY, PUBLIC_KEY};
use crate::fixtures::test_app::TestApp;
use std::time::Duration;

#[tokio::test]
async fn index_renders_link_form() {
    let app = TestApp::spawn().await;

    let resp = app.client.get(app.url("/")).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let html = resp.text().await.unwrap();
    assert!(html.contains("name=\"public_key\""));
    assert!(html.contains("action=\"/files/\""));
}

#[tokio::test]
async fn list_files_renders_all_entries() {
    let app = TestApp::spawn().await;

    let resp = app.list_files(PUBLIC_KEY, None).await;
    assert_eq!(resp.status().as_u16(), 200);

    let html = resp.text().await.unwrap();
    for name in ["a.txt", "photos", "b.txt", "broken.bin", "nolink.bin"] {
        assert!(html.contains(name), "missing {name} in listing");
    }
    assert!(html.contains("value=\"/docs/b.txt\""));
}

#[tokio::test]
async fn second_listing_within_ttl_uses_cache() {
    let app = TestApp::spawn().await;

    let first = app.list_files(PUBLIC_KEY, None).await.text().await.unwrap();
    let second = app.list_files(PUBLIC_KEY, None).await.text().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(app.disk.list_calls(), 1);
}

#[tokio::test]
async fn listing_is_fetched_again_after_ttl() {
    let app = TestApp::spawn_with_settings(|s| s.cache.ttl_secs = 1).await;

    app.list_files(PUBLIC_KEY, None).await;
    tokio::time::sleep(Duration::from_millis(1100)).await;
    app.list_files(PUBLIC_KEY, None).await;

    assert_eq!(app.disk.list_calls(), 2);
}

#[tokio::test]
async fn folder_filter_shows_only_folders() {
    let app = TestApp::spawn().await;

    let html = app
        .list_files(PUBLIC_KEY, Some("folder"))
        .await
        .text()
        .await
        .unwrap();

    assert!(html.contains("photos"));
    assert!(!html.contains("a.txt"));
    assert!(!html.contains("selected_files"));

    // the filtered view is served from the cached full listing
    let html = app.list_files(PUBLIC_KEY, Some("file")).await.text().await.unwrap();
    assert!(html.contains("a.txt"));
    assert!(!html.contains(">photos<"));
    assert_eq!(app.disk.list_calls(), 1);
}

#[tokio::test]
async fn post_lists_files_and_reads_filter_from_query() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .post(app.url("/files/?file_type=dir"))
        .form(&[("public_key", PUBLIC_KEY)])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 200);
    let html = resp.text().await.unwrap();
    assert!(html.contains("photos"));
    assert!(!html.contains("b.txt"));
}

#[tokio::test]
async fn post_with_blank_link_rerenders_form_with_error() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .post(app.url("/files/"))
        .form(&[("public_key", "   ")])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 400);
    let html = resp.text().await.unwrap();
    assert!(html.contains("class=\"error\""));
    assert!(html.contains("action=\"/files/\""));
    assert_eq!(app.disk.list_calls(), 0);
}

#[tokio::test]
async fn post_with_overlong_link_is_rejected() {
    let app = TestApp::spawn().await;
    let long = "x".repeat(256);

    let resp = app
        .client
        .post(app.url("/files/"))
        .form(&[("public_key", long.as_str())])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 400);
    assert_eq!(app.disk.list_calls(), 0);
}

#[tokio::test]
async fn get_without_link_redirects_to_index() {
    let app = TestApp::spawn().await;

    let resp = app.client.get(app.url("/files/")).send().await.unwrap();

    assert!(resp.status().is_redirection());
    assert_eq!(resp.headers()["location"], "/");
}

#[tokio::test]
async fn unknown_link_passes_provider_status_through() {
    let app = TestApp::spawn().await;

    let resp = app.list_files(MISSING_KEY, None).await;

    assert_eq!(resp.status().as_u16(), 404);
    let html = resp.text().await.unwrap();
    assert!(html.contains("Resource not found."));
}

#[tokio::test]
async fn failed_listings_are_not_cached() {
    let app = TestApp::spawn().await;

    app.list_files(MISSING_KEY, None).await;
    app.list_files(MISSING_KEY, None).await;

    assert_eq!(app.disk.list_calls(), 2);
}

#[tokio::test]
async fn anonymous_listing_sends_no_authorization() {
    let app = TestApp::spawn().await;

    app.list_files(PUBLIC_KEY, None).await;

    assert!(app.disk.last_authorization.lock().is_none());
}

#[tokio::test]
async fn health_reports_ok() {
    let app = TestApp::spawn().await;

    let resp = app.client.get(app.url("/health")).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "ok");
}
