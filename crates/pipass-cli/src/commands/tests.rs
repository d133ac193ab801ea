//! Unit tests for CLI commands.

use super::*;
use super::fetch::{build_reporter, render_report, FetchArgs};
use pipass_config::ColorChoice;
use pipass_core::types::ReportView;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Context pointed at a mock registry, with colors off
fn create_test_context(temp_dir: &TempDir, registry: &MockServer) -> CommandContext {
    let mut config = PipassToml::default();
    config.registry.url = registry.uri();
    config.registry.timeout_secs = 2;
    config.output.color = ColorChoice::Never;

    let cwd = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
    CommandContext::with_config(cwd, config)
}

fn fetch_args(package: &str, version: Option<&str>) -> FetchArgs {
    FetchArgs {
        package: package.to_string(),
        version: version.map(str::to_string),
        json: false,
        no_extras: false,
        files: false,
    }
}

fn requests_document() -> serde_json::Value {
    serde_json::json!({
        "info": {
            "name": "requests",
            "version": "2.31.0",
            "summary": "Python HTTP for Humans.",
            "license": "Apache 2.0",
            "requires_python": ">=3.7",
            "requires_dist": [
                "charset-normalizer<4,>=2",
                "idna<4,>=2.5",
                "PySocks!=1.5.7,>=1.5.6; extra == \"socks\""
            ]
        },
        "releases": {
            "2.31.0": [{
                "filename": "requests-2.31.0-py3-none-any.whl",
                "packagetype": "bdist_wheel",
                "size": 62574,
                "upload_time_iso_8601": "2023-05-22T15:12:44.000000Z"
            }],
            "2.30.0": [{
                "filename": "requests-2.30.0.tar.gz",
                "packagetype": "sdist",
                "size": 110000,
                "upload_time_iso_8601": "2023-05-01T00:00:00.000000Z"
            }]
        },
        "urls": []
    })
}

fn requests_2_30_document() -> serde_json::Value {
    serde_json::json!({
        "info": {
            "name": "requests",
            "version": "2.30.0",
            "summary": "Python HTTP for Humans.",
            "requires_dist": ["urllib3<3,>=1.21.1"]
        },
        "urls": [{
            "filename": "requests-2.30.0.tar.gz",
            "packagetype": "sdist",
            "size": 110000,
            "upload_time_iso_8601": "2023-05-01T00:00:00.000000Z"
        }]
    })
}

async fn mount_requests(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/pypi/requests/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(requests_document()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_fetch_latest_text_report() {
    let server = MockServer::start().await;
    mount_requests(&server).await;

    let temp_dir = tempfile::tempdir().unwrap();
    let ctx = create_test_context(&temp_dir, &server);

    let text = render_report(&fetch_args("requests", None), &ctx).await.unwrap();

    assert!(text.starts_with("Name: requests\nLatest Version: 2.31.0\nSummary: Python HTTP for Humans.\n"));
    assert!(!text.contains("\nVersion: "));
    assert!(text.contains(
        "Versions:\n  2.30.0 — 2023-05-01T00:00:00Z\n  2.31.0 — 2023-05-22T15:12:44Z\n"
    ));
    assert!(text.contains("Dependencies:\n  charset-normalizer<4,>=2\n  idna<4,>=2.5\n"));
    assert!(text.contains("PySocks"));
}

#[tokio::test]
async fn test_fetch_requested_version_uses_scoped_metadata() {
    let server = MockServer::start().await;
    mount_requests(&server).await;
    Mock::given(method("GET"))
        .and(path("/pypi/requests/2.30.0/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(requests_2_30_document()))
        .expect(1)
        .mount(&server)
        .await;

    let temp_dir = tempfile::tempdir().unwrap();
    let ctx = create_test_context(&temp_dir, &server);

    let text = render_report(&fetch_args("requests", Some("2.30.0")), &ctx).await.unwrap();

    assert!(text.contains("Latest Version: 2.31.0\nVersion: 2.30.0\n"));
    assert!(text.contains("Dependencies:\n  urllib3<3,>=1.21.1\n"));
    assert!(!text.contains("idna"));
}

#[tokio::test]
async fn test_fetch_json_no_extras_with_files() {
    let server = MockServer::start().await;
    mount_requests(&server).await;

    let temp_dir = tempfile::tempdir().unwrap();
    let ctx = create_test_context(&temp_dir, &server);
    let args = FetchArgs {
        json: true,
        no_extras: true,
        files: true,
        ..fetch_args("requests", None)
    };

    let json = render_report(&args, &ctx).await.unwrap();
    let report: ReportView = serde_json::from_str(&json).unwrap();

    assert_eq!(report.version, "2.31.0");
    assert_eq!(report.versions.len(), 2);
    assert!(report.dependencies.iter().all(|dep| !dep.is_extra()));
    assert_eq!(report.dependencies.len(), 2);
    assert_eq!(report.files.len(), 1);
    assert_eq!(report.files[0].filename, "requests-2.31.0-py3-none-any.whl");
}

#[tokio::test]
async fn test_fetch_sends_configured_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pypi/requests/json"))
        .and(header("user-agent", "corp-tool/2.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(requests_document()))
        .expect(1)
        .mount(&server)
        .await;

    let temp_dir = tempfile::tempdir().unwrap();
    let mut ctx = create_test_context(&temp_dir, &server);
    ctx.config.registry.user_agent = "corp-tool/2.0".to_string();

    assert!(render_report(&fetch_args("requests", None), &ctx).await.is_ok());
}

#[tokio::test]
async fn test_unknown_package_exits_2() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pypi/nonexistent-pkg-xyz/json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let temp_dir = tempfile::tempdir().unwrap();
    let ctx = create_test_context(&temp_dir, &server);

    let error = render_report(&fetch_args("nonexistent-pkg-xyz", None), &ctx).await.unwrap_err();
    assert!(matches!(error, PipassError::PackageNotFound { .. }));
    assert_eq!(error.exit_code(), 2);
}

#[tokio::test]
async fn test_unknown_version_exits_3() {
    let server = MockServer::start().await;
    mount_requests(&server).await;

    let temp_dir = tempfile::tempdir().unwrap();
    let ctx = create_test_context(&temp_dir, &server);

    let error = render_report(&fetch_args("requests", Some("0.0.1")), &ctx).await.unwrap_err();
    assert!(matches!(error, PipassError::VersionNotFound { .. }));
    assert_eq!(error.exit_code(), 3);
}

#[tokio::test]
async fn test_server_error_exits_4() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let temp_dir = tempfile::tempdir().unwrap();
    let ctx = create_test_context(&temp_dir, &server);

    let error = render_report(&fetch_args("requests", None), &ctx).await.unwrap_err();
    assert!(matches!(error, PipassError::Transport { .. }));
    assert_eq!(error.exit_code(), 4);
}

#[tokio::test]
async fn test_invalid_name_exits_2_without_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(requests_document()))
        .expect(0)
        .mount(&server)
        .await;

    let temp_dir = tempfile::tempdir().unwrap();
    let ctx = create_test_context(&temp_dir, &server);

    let error = render_report(&fetch_args("not a/name", None), &ctx).await.unwrap_err();
    assert!(matches!(error, PipassError::PackageNotFound { .. }));
    assert_eq!(error.exit_code(), 2);
}

#[tokio::test]
async fn test_dispatch_fetch_command() {
    let server = MockServer::start().await;
    mount_requests(&server).await;

    let temp_dir = tempfile::tempdir().unwrap();
    let ctx = create_test_context(&temp_dir, &server);
    let command = Commands::Fetch {
        package: "requests".to_string(),
        version: None,
        json: true,
        no_extras: false,
        files: false,
    };

    assert!(dispatch_command(command, &ctx).await.is_ok());
}

#[tokio::test]
async fn test_build_reporter_follows_config() {
    let mut config = PipassToml::default();
    config.registry.url = "https://mirror.example/".to_string();
    config.registry.timeout_secs = 7;

    let reporter = build_reporter(&config).unwrap();
    assert_eq!(reporter.client().base_url(), "https://mirror.example");
    assert_eq!(reporter.client().timeout(), std::time::Duration::from_secs(7));
}

#[tokio::test]
async fn test_context_uses_configured_colors() {
    let temp_dir = tempfile::tempdir().unwrap();
    let cwd = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();

    let mut config = PipassToml::default();
    config.output.color = ColorChoice::Always;
    let ctx = CommandContext::with_config(cwd.clone(), config);

    assert!(ctx.output.colors().is_enabled());
    assert_eq!(ctx.cwd, cwd);
}
