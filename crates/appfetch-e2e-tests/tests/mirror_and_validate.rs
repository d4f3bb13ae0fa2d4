use appfetch_e2e_tests::{
    SOURCES, build_params, fetch_params, init_tracing, listing_body, mock_file, mock_listing,
    remote_settings, validate_params,
};
use appfetch_lib::cli::{run_build, run_fetch, run_validate};
use appfetch_lib::error::{AppFetchError, ValidationError};
use assert_fs::TempDir;
use assert_fs::prelude::*;
use httpmock::prelude::*;
use predicates::prelude::*;

const APP_PY: &[u8] = b"import requests\nprint('hello')\n";

async fn serve_app<'a>(server: &'a MockServer, requirements: &str) -> Vec<httpmock::Mock<'a>> {
    let files: [(&str, &[u8]); 4] = [
        ("files/bucket/apps/demo/a.txt", b"alpha"),
        ("files/bucket/apps/demo/sub/b.txt", b"bravo\n"),
        ("files/bucket/apps/demo/app.py", APP_PY),
        (
            "files/bucket/apps/demo/requirements.txt",
            requirements.as_bytes(),
        ),
    ];
    let urls: Vec<&str> = files.iter().map(|(url, _)| *url).collect();

    let mut mocks = vec![mock_listing(server, &listing_body("FOLDER", &urls, None)).await];
    for (url, content) in files {
        mocks.push(mock_file(server, url, content).await);
    }
    mocks
}

#[tokio::test]
async fn test_build_mirrors_and_accepts_allowed_requirements() {
    init_tracing();

    let server = MockServer::start_async().await;
    let mocks = serve_app(&server, "# pinned\nrequests==2.0\n").await;
    let target = TempDir::new().unwrap();

    let result = run_build(build_params(&server, target.path(), "requests")).await;
    assert!(result.is_ok(), "Build should succeed: {result:?}");

    target.child("a.txt").assert("alpha");
    target.child("sub/b.txt").assert("bravo\n");
    target.child("app.py").assert(predicate::path::is_file());
    target
        .child("requirements.txt")
        .assert(predicate::str::contains("requests==2.0"));

    for mock in &mocks {
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn test_build_rejects_forbidden_package_after_downloading() {
    init_tracing();

    let server = MockServer::start_async().await;
    let _mocks = serve_app(&server, "flask==2.0\n").await;
    let target = TempDir::new().unwrap();

    let err = run_build(build_params(&server, target.path(), "requests"))
        .await
        .unwrap_err();

    assert_eq!(
        err.as_validation(),
        Some(&ValidationError::ForbiddenPackage {
            package: "flask".to_string()
        })
    );
    assert_eq!(
        err.as_validation().map(ValidationError::log_line).as_deref(),
        Some("AppValidationException: Package 'flask' is forbidden.")
    );

    target.child("a.txt").assert("alpha");
    target.child("sub/b.txt").assert("bravo\n");
}

#[tokio::test]
async fn test_continuation_token_is_followed() {
    init_tracing();

    let server = MockServer::start_async().await;
    let listing_path = format!("/v1/metadata/{SOURCES}");
    let first_url = "files/bucket/apps/demo/a.txt";
    let second_url = "files/bucket/apps/demo/sub/b.txt";

    // Registered first so that it wins over the untokenized page for requests
    // carrying the token.
    let second_page = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(listing_path.clone())
                .query_param("recursive", "true")
                .query_param("token", "t1");
            then.status(200)
                .json_body(listing_body("FOLDER", &[second_url], None));
        })
        .await;
    let first_page = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(listing_path.clone())
                .query_param("recursive", "true");
            then.status(200)
                .json_body(listing_body("FOLDER", &[first_url], Some("t1")));
        })
        .await;
    let first_file = mock_file(&server, first_url, b"alpha").await;
    let second_file = mock_file(&server, second_url, b"bravo\n").await;
    let target = TempDir::new().unwrap();

    let summary = run_fetch(fetch_params(&server, target.path()))
        .await
        .unwrap();

    assert_eq!(summary.pages, 2);
    assert_eq!(summary.files, 2);
    target.child("a.txt").assert("alpha");
    target.child("sub/b.txt").assert("bravo\n");
    first_page.assert_hits_async(1).await;
    second_page.assert_hits_async(1).await;
    first_file.assert_async().await;
    second_file.assert_async().await;
}

#[tokio::test]
async fn test_listing_that_is_not_a_folder_fails_validation() {
    init_tracing();

    let server = MockServer::start_async().await;
    let listing = mock_listing(&server, &listing_body("ITEM", &[], None)).await;
    let target = TempDir::new().unwrap();

    let err = run_fetch(fetch_params(&server, target.path()))
        .await
        .unwrap_err();

    assert!(matches!(
        err.as_validation(),
        Some(ValidationError::SourcesNotAFolder { .. })
    ));
    assert_eq!(err.to_string(), "Sources path must be a folder");
    listing.assert_async().await;
}

#[tokio::test]
async fn test_listing_error_status_aborts() {
    init_tracing();

    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(format!("/v1/metadata/{SOURCES}"));
            then.status(403);
        })
        .await;
    let target = TempDir::new().unwrap();

    let err = run_fetch(fetch_params(&server, target.path()))
        .await
        .unwrap_err();

    assert!(
        matches!(err, AppFetchError::Transport { status, .. } if status.as_u16() == 403),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn test_missing_file_aborts_the_run() {
    init_tracing();

    let server = MockServer::start_async().await;
    let urls = [
        "files/bucket/apps/demo/a.txt",
        "files/bucket/apps/demo/missing.txt",
        "files/bucket/apps/demo/z.txt",
    ];
    mock_listing(&server, &listing_body("FOLDER", &urls, None)).await;
    mock_file(&server, urls[0], b"alpha").await;
    let last = mock_file(&server, urls[2], b"zulu").await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(format!("/v1/{}", urls[1]));
            then.status(404);
        })
        .await;
    let target = TempDir::new().unwrap();

    let err = run_fetch(fetch_params(&server, target.path()))
        .await
        .unwrap_err();

    assert!(
        matches!(err, AppFetchError::Transport { status, .. } if status.as_u16() == 404),
        "unexpected error: {err:?}"
    );
    target.child("a.txt").assert("alpha");
    target.child("z.txt").assert(predicate::path::missing());
    last.assert_hits_async(0).await;
}

#[tokio::test]
async fn test_auth_headers_sent_on_every_request() {
    init_tracing();

    let server = MockServer::start_async().await;
    let file_url = "files/bucket/apps/demo/app.py";
    let listing = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(format!("/v1/metadata/{SOURCES}"))
                .header("api-key", "key-123")
                .header("authorization", "Bearer token-456");
            then.status(200)
                .json_body(listing_body("FOLDER", &[file_url], None));
        })
        .await;
    let file = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(format!("/v1/{file_url}"))
                .header("api-key", "key-123")
                .header("authorization", "Bearer token-456");
            then.status(200).body(APP_PY);
        })
        .await;
    let target = TempDir::new().unwrap();

    let mut params = fetch_params(&server, target.path());
    params.remote = remote_settings(&server, Some("key-123"), Some("token-456"));
    let summary = run_fetch(params).await.unwrap();

    assert_eq!(summary.pages, 1);
    assert_eq!(summary.files, 1);
    assert_eq!(summary.bytes, APP_PY.len() as u64);
    listing.assert_async().await;
    file.assert_async().await;
}

#[tokio::test]
async fn test_validate_existing_directory() {
    init_tracing();

    let target = TempDir::new().unwrap();
    target.child("app.py").write_binary(APP_PY).unwrap();
    target
        .child("requirements.txt")
        .write_str("requests[security]>=2.0,<3 ; python_version >= \"3.8\"\n")
        .unwrap();

    run_validate(&validate_params(target.path(), "requests")).unwrap();

    let err = run_validate(&validate_params(target.path(), "numpy")).unwrap_err();
    assert_eq!(err.to_string(), "Package 'requests' is forbidden.");
}

#[tokio::test]
async fn test_validate_creates_missing_requirements_file() {
    init_tracing();

    let target = TempDir::new().unwrap();
    target.child("app.py").touch().unwrap();

    run_validate(&validate_params(target.path(), "requests")).unwrap();

    target
        .child("requirements.txt")
        .assert(predicate::path::is_file());
    target.child("requirements.txt").assert("");
}
