//! Integration tests for gomodtools
//!
//! These tests verify:
//! - go.mod upgrades keep the rest of the file intact
//! - The module proxy client against a local HTTP stub
//! - Cache pruning against a temporary module cache
//! - Import sorting across a project tree

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test fixture directory creation helper
fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

mod manifest_upgrade {
    use super::*;
    use gomodtools::manifest::{ChangeWriter, WriteOutcome};
    use gomodtools::proxy::StaticProxy;
    use gomodtools::update::{UpgradeOptions, Upgrader};

    const GO_MOD: &str = r#"// Service manifest
module example.com/service

go 1.21

require (
	github.com/gin-gonic/gin v1.9.0 // web framework
	github.com/stretchr/testify v1.8.0
	golang.org/x/net v0.17.0 // indirect
)

require github.com/google/uuid v1.3.0

replace github.com/stretchr/testify => ../testify

exclude golang.org/x/net v0.16.0

retract v0.1.0
"#;

    fn proxy() -> StaticProxy {
        StaticProxy::new()
            .with_version("github.com/gin-gonic/gin", "v1.9.0", Some("1.18"))
            .with_version("github.com/gin-gonic/gin", "v1.9.1", Some("1.20"))
            .with_version("github.com/gin-gonic/gin", "v1.10.0", Some("1.22"))
            .with_version("github.com/stretchr/testify", "v1.8.0", Some("1.13"))
            .with_version("github.com/google/uuid", "v1.3.0", None)
            .with_version("github.com/google/uuid", "v1.6.0", None)
            .with_version("golang.org/x/net", "v0.17.0", Some("1.18"))
            .with_version("golang.org/x/net", "v0.20.0", Some("1.18"))
    }

    #[tokio::test]
    async fn test_upgrade_preserves_layout() {
        let temp_dir = create_test_dir();
        let path = temp_dir.path().join("go.mod");
        fs::write(&path, GO_MOD).unwrap();

        let proxy = proxy();
        let upgrader = Upgrader::new(&proxy, UpgradeOptions::new());
        let mut out = Vec::new();
        let (report, outcome) = upgrader
            .run(&path, ChangeWriter::new(true), &mut out)
            .await
            .unwrap();

        assert_eq!(outcome, WriteOutcome::Written);
        let expected = GO_MOD
            .replace("gin v1.9.0 // web", "gin v1.9.1 // web")
            .replace("uuid v1.3.0", "uuid v1.6.0");
        assert_eq!(fs::read_to_string(&path).unwrap(), expected);
        assert_eq!(report.changes.len(), 2);
    }

    #[tokio::test]
    async fn test_upgrade_indirect_opt_in() {
        let proxy = proxy();
        let upgrader = Upgrader::new(&proxy, UpgradeOptions::new().with_indirect(true));

        let report = upgrader
            .upgrade(Path::new("go.mod"), GO_MOD.as_bytes())
            .await
            .unwrap();
        let updated = String::from_utf8(report.updated).unwrap();

        assert!(updated.contains("golang.org/x/net v0.20.0 // indirect"));
    }

    #[tokio::test]
    async fn test_upgrade_with_newer_toolchain() {
        let proxy = proxy();
        let upgrader = Upgrader::new(&proxy, UpgradeOptions::new().with_go_version("1.22.1"));

        let report = upgrader
            .upgrade(Path::new("go.mod"), GO_MOD.as_bytes())
            .await
            .unwrap();
        let updated = String::from_utf8(report.updated).unwrap();

        assert!(updated.contains("\ngo 1.22.1\n"));
        assert!(updated.contains("github.com/gin-gonic/gin v1.10.0 // web framework"));
    }

    #[tokio::test]
    async fn test_upgrade_inserts_missing_go_directive() {
        let content = "module example.com/bare\n\nrequire github.com/google/uuid v1.3.0\n";
        let proxy = proxy();
        let upgrader = Upgrader::new(&proxy, UpgradeOptions::new().with_go_version("1.22"));

        let report = upgrader
            .upgrade(Path::new("go.mod"), content.as_bytes())
            .await
            .unwrap();

        assert_eq!(
            String::from_utf8(report.updated).unwrap(),
            "module example.com/bare\n\ngo 1.22\n\nrequire github.com/google/uuid v1.6.0\n"
        );
    }

    #[tokio::test]
    async fn test_unchanged_manifest_is_not_printed() {
        let content = "module example.com/leaf\n\ngo 1.21\n";
        let temp_dir = create_test_dir();
        let path = temp_dir.path().join("go.mod");
        fs::write(&path, content).unwrap();

        let proxy = StaticProxy::new();
        let upgrader = Upgrader::new(&proxy, UpgradeOptions::new());
        let mut out = Vec::new();
        let (_, outcome) = upgrader
            .run(&path, ChangeWriter::new(false), &mut out)
            .await
            .unwrap();

        assert_eq!(outcome, WriteOutcome::Unchanged);
        assert!(out.is_empty());
    }
}

mod proxy_http {
    use gomodtools::error::RegistryError;
    use gomodtools::proxy::{GoProxyClient, HttpClient, ModuleProxy, ProxyConfig};
    use gomodtools::update::{find_latest_compatible, Resolution};
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::{Duration, Instant};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve canned bodies by request path; unknown paths answer 404
    async fn serve(routes: HashMap<String, String>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let routes = Arc::new(routes);

        tokio::spawn(async move {
            loop {
                let (mut socket, _) = match listener.accept().await {
                    Ok(conn) => conn,
                    Err(_) => return,
                };
                let routes = Arc::clone(&routes);
                tokio::spawn(async move {
                    let mut buf = Vec::new();
                    let mut chunk = [0u8; 1024];
                    loop {
                        let n = socket.read(&mut chunk).await.unwrap_or(0);
                        if n == 0 {
                            break;
                        }
                        buf.extend_from_slice(&chunk[..n]);
                        if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                            break;
                        }
                    }

                    let request = String::from_utf8_lossy(&buf);
                    let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();
                    let response = match routes.get(&path) {
                        Some(body) => format!(
                            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            body.len(),
                            body
                        ),
                        None => "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                            .to_string(),
                    };
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        format!("http://{}", addr)
    }

    fn routes() -> HashMap<String, String> {
        let mut routes = HashMap::new();
        routes.insert(
            "/github.com/!burnt!sushi/toml/@v/list".to_string(),
            "v1.2.0\nv1.3.2\nv1.3.0\nv1.4.0-rc.1\n".to_string(),
        );
        routes.insert(
            "/github.com/!burnt!sushi/toml/@v/v1.3.2.mod".to_string(),
            "module github.com/BurntSushi/toml\n\ngo 1.23\n".to_string(),
        );
        routes.insert(
            "/github.com/!burnt!sushi/toml/@v/v1.3.0.mod".to_string(),
            "module github.com/BurntSushi/toml\n\ngo 1.16\n".to_string(),
        );
        routes
    }

    fn client(url: &str) -> GoProxyClient {
        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        GoProxyClient::new(HttpClient::from_client(http), ProxyConfig::new(url))
    }

    #[tokio::test]
    async fn test_list_versions_escaped_and_sorted() {
        let url = serve(routes()).await;
        let proxy = client(&url);

        let versions = proxy.list_versions("github.com/BurntSushi/toml").await.unwrap();
        assert_eq!(versions, vec!["v1.4.0-rc.1", "v1.3.2", "v1.3.0", "v1.2.0"]);
    }

    #[tokio::test]
    async fn test_fetch_mod() {
        let url = serve(routes()).await;
        let proxy = client(&format!("{}/", url));

        let file = proxy
            .fetch_mod("github.com/BurntSushi/toml", "v1.3.0")
            .await
            .unwrap();
        assert_eq!(file.go_version(), Some("1.16"));
        assert_eq!(proxy.endpoint(), url);
    }

    #[tokio::test]
    async fn test_missing_module_is_not_found() {
        let url = serve(routes()).await;
        let proxy = client(&url);

        let err = proxy.list_versions("github.com/acme/none").await.unwrap_err();
        assert!(matches!(err, RegistryError::ModuleNotFound { .. }));
    }

    #[tokio::test]
    async fn test_unresponsive_proxy_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let http = HttpClient::with_config(Duration::from_millis(300), "gomodtools-test").unwrap();
        let proxy = GoProxyClient::new(http, ProxyConfig::new(&url));

        let started = Instant::now();
        let err = proxy.list_versions("example.com/slow").await.unwrap_err();
        assert!(matches!(err, RegistryError::Timeout { ref module, .. } if module == "example.com/slow"));
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_find_latest_compatible_over_http() {
        let url = serve(routes()).await;
        let proxy = client(&url);

        let result = find_latest_compatible(&proxy, "github.com/BurntSushi/toml", "v1.2.0", "1.21")
            .await
            .unwrap();
        assert!(matches!(result, Resolution::Upgrade { ref version, .. } if version == "v1.3.0"));
    }
}

mod cache_prune {
    use super::*;
    use gomodtools::error::CommandError;
    use gomodtools::package_manager::{decode_module_stream, GoToolchain, ListedModule};
    use gomodtools::prune::{CachePruner, PruneOptions};

    /// Toolchain replaying a recorded `go list -m -json all` for every module
    struct RecordedToolchain {
        output: &'static str,
    }

    impl GoToolchain for RecordedToolchain {
        fn list_modules(&self, _dir: &Path) -> Result<Vec<ListedModule>, CommandError> {
            decode_module_stream(self.output.as_bytes())
        }

        fn env(&self, _key: &str) -> Result<String, CommandError> {
            Ok(String::new())
        }
    }

    const GO_LIST: &str = r#"{"Path": "example.com/app", "Main": true}
{"Path": "github.com/BurntSushi/toml", "Version": "v1.3.2"}
{"Path": "golang.org/x/sys", "Version": "v0.20.0", "Replace": {"Path": "golang.org/x/sys", "Version": "v0.21.0"}}
"#;

    fn cache_with(entries: &[&str]) -> (TempDir, PathBuf) {
        let temp_dir = create_test_dir();
        let cache = temp_dir.path().join("mod");
        for entry in entries {
            fs::create_dir_all(cache.join(entry)).unwrap();
            fs::write(cache.join(entry).join("go.mod"), "module x\n").unwrap();
        }
        fs::create_dir_all(cache.join("cache/download/golang.org/x/sys/@v")).unwrap();
        (temp_dir, cache)
    }

    #[test]
    fn test_prune_keeps_required_and_replacements() {
        let project = create_test_dir();
        fs::write(project.path().join("go.mod"), "module example.com/app\n").unwrap();
        let (_cache_dir, cache) = cache_with(&[
            "github.com/!burnt!sushi/toml@v1.3.2",
            "github.com/!burnt!sushi/toml@v1.2.0",
            "golang.org/x/sys@v0.20.0",
            "golang.org/x/sys@v0.21.0",
        ]);

        let toolchain = RecordedToolchain { output: GO_LIST };
        let pruner = CachePruner::new(&toolchain, PruneOptions::default());
        let report = pruner.run(project.path(), &cache).unwrap();

        assert_eq!(report.kept, 3);
        assert_eq!(
            report.removed,
            vec![cache.join("github.com/!burnt!sushi/toml@v1.2.0")]
        );
        assert!(cache.join("golang.org/x/sys@v0.21.0").exists());
        assert!(cache.join("cache/download").exists());
    }

    #[test]
    fn test_prune_skips_hidden_directories() {
        let project = create_test_dir();
        fs::create_dir_all(project.path().join(".git/sub")).unwrap();
        fs::write(project.path().join(".git/sub/go.mod"), "module hidden\n").unwrap();
        let (_cache_dir, cache) = cache_with(&["github.com/!burnt!sushi/toml@v1.3.2"]);

        let toolchain = RecordedToolchain { output: GO_LIST };
        let pruner = CachePruner::new(
            &toolchain,
            PruneOptions {
                dry_run: true,
                verbose: true,
            },
        );
        let report = pruner.run(project.path(), &cache).unwrap();

        assert_eq!(report.manifests, 0);
        assert_eq!(report.total(), 1);
        assert!(cache.join("github.com/!burnt!sushi/toml@v1.3.2").exists());
    }
}

mod import_sorting {
    use super::*;
    use gomodtools::imports::{find_go_files, local_prefix, FileOutcome, ImportSorter, Passthrough};
    use gomodtools::manifest::{ChangeWriter, WriteOutcome};

    #[test]
    fn test_sort_project_tree() {
        let temp_dir = create_test_dir();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("cmd/app")).unwrap();
        fs::write(root.join("go.mod"), "module example.com/proj\n\ngo 1.22\n").unwrap();
        fs::write(
            root.join("cmd/app/main.go"),
            "package main\n\nimport (\n\t\"example.com/proj/internal\"\n\t\"fmt\"\n\t\"example.com/projx/lib\"\n)\n\nfunc main() {}\n",
        )
        .unwrap();
        fs::write(
            root.join("cgo.go"),
            "package proj\n\n// #include <stdio.h>\nimport \"C\"\n\nimport (\n\t\"os\"\n\t\"fmt\"\n)\n",
        )
        .unwrap();

        let prefix = local_prefix(root, None).unwrap();
        let sorter = ImportSorter::new(&Passthrough, prefix, ChangeWriter::new(true));

        let mut outcomes = Vec::new();
        for file in find_go_files(root).unwrap() {
            outcomes.push(sorter.process_file(&file, &mut std::io::sink()).unwrap());
        }

        assert_eq!(
            outcomes,
            vec![
                FileOutcome::SkippedCgo,
                FileOutcome::Processed(WriteOutcome::Written),
            ]
        );
        assert_eq!(
            fs::read_to_string(root.join("cmd/app/main.go")).unwrap(),
            "package main\n\nimport (\n\t\"fmt\"\n\n\t\"example.com/projx/lib\"\n\n\t\"example.com/proj/internal\"\n)\n\nfunc main() {}\n"
        );
    }
}
