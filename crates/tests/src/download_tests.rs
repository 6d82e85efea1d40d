use crate::fixtures::fake_disk::{MISSING_KEY, PUBLIC_KEY};
use crate::fixtures::test_app::TestApp;
use std::io::{Cursor, Read};

fn unzip(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("valid zip archive");
    (0..archive.len())
        .map(|i| {
            let mut file = archive.by_index(i).unwrap();
            let mut data = Vec::new();
            file.read_to_end(&mut data).unwrap();
            (file.name().to_string(), data)
        })
        .collect()
}

#[tokio::test]
async fn download_single_file_streams_content() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .get(app.url("/download/"))
        .query(&[("public_key", PUBLIC_KEY), ("path", "/docs/b.txt")])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 200);
    assert_eq!(
        resp.headers()["content-disposition"],
        "attachment; filename=\"b.txt\""
    );
    assert_eq!(resp.headers()["content-type"], "text/plain");
    assert_eq!(resp.bytes().await.unwrap().as_ref(), b"world");
}

#[tokio::test]
async fn download_without_direct_link_never_fetches_bytes() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .get(app.url("/download/"))
        .query(&[("public_key", PUBLIC_KEY), ("path", "/nolink.bin")])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 502);
    let html = resp.text().await.unwrap();
    assert!(html.contains("download link"));
    assert_eq!(app.disk.link_calls(), 1);
    assert_eq!(app.disk.content_calls(), 0);
}

#[tokio::test]
async fn download_of_unknown_path_passes_404_through() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .get(app.url("/download/"))
        .query(&[("public_key", PUBLIC_KEY), ("path", "/nope.txt")])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 404);
}

#[tokio::test]
async fn download_requires_query_parameters() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .get(app.url("/download/"))
        .query(&[("public_key", PUBLIC_KEY)])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 400);
}

#[tokio::test]
async fn download_multiple_bundles_files_in_request_order() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .post(app.url("/download_multiple/"))
        .form(&[
            ("public_key", PUBLIC_KEY),
            ("selected_files", "/docs/b.txt"),
            ("selected_files", "/a.txt"),
        ])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 200);
    assert_eq!(resp.headers()["content-type"], "application/zip");
    assert_eq!(
        resp.headers()["content-disposition"],
        "attachment; filename=\"selected_files.zip\""
    );

    let entries = unzip(&resp.bytes().await.unwrap());
    assert_eq!(
        entries,
        vec![
            ("b.txt".to_string(), b"world".to_vec()),
            ("a.txt".to_string(), b"hello".to_vec()),
        ]
    );
}

#[tokio::test]
async fn download_multiple_skips_failing_files() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .post(app.url("/download_multiple/"))
        .form(&[
            ("public_key", PUBLIC_KEY),
            ("selected_files", "/a.txt"),
            ("selected_files", "/nolink.bin"),
            ("selected_files", "/broken.bin"),
            ("selected_files", "/missing.txt"),
            ("selected_files", "/docs/b.txt"),
        ])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 200);
    let entries = unzip(&resp.bytes().await.unwrap());
    let names: Vec<&str> = entries.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["a.txt", "b.txt"]);
}

#[tokio::test]
async fn download_multiple_with_unknown_link_returns_empty_archive() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .post(app.url("/download_multiple/"))
        .form(&[("public_key", MISSING_KEY), ("selected_files", "/a.txt")])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 200);
    assert!(unzip(&resp.bytes().await.unwrap()).is_empty());
}

#[tokio::test]
async fn download_multiple_without_selection_redirects_back() {
    let app = TestApp::spawn().await;
    let referer = app.url("/files/?public_key=abc");

    let resp = app
        .client
        .post(app.url("/download_multiple/"))
        .header("Referer", &referer)
        .form(&[("public_key", PUBLIC_KEY)])
        .send()
        .await
        .unwrap();

    assert!(resp.status().is_redirection());
    assert_eq!(resp.headers()["location"], referer.as_str());
    assert_eq!(app.disk.link_calls(), 0);
}

#[tokio::test]
async fn download_multiple_rejects_get() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .get(app.url("/download_multiple/"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 405);
}
