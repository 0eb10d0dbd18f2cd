use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Child, Command};
use std::time::Duration;
use tempfile::TempDir;

fn senti_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("senti");
    path
}

fn setup_test_env(port: u16) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();

    let config_content = format!(
        r#"[server]
bind = "127.0.0.1:{}"

[history]
path = "{}/data/history.json"

[inference]
provider = "disabled"
"#,
        port,
        root.display()
    );

    let config_path = config_dir.join("sentiscope.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_senti(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = senti_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run senti binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

/// A spawned `senti serve` process, killed on drop.
struct ServerGuard {
    child: Child,
    base_url: String,
}

impl ServerGuard {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for ServerGuard {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

fn spawn_server(config_path: &Path, port: u16) -> ServerGuard {
    let child = Command::new(senti_binary())
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .arg("serve")
        .spawn()
        .expect("Failed to spawn senti serve");

    let guard = ServerGuard {
        child,
        base_url: format!("http://127.0.0.1:{}", port),
    };

    // Wait for the server to accept connections
    let client = reqwest::blocking::Client::new();
    for _ in 0..50 {
        if client.get(guard.url("/health")).send().is_ok() {
            return guard;
        }
        std::thread::sleep(Duration::from_millis(100));
    }
    panic!("Server did not become ready on port {}", port);
}

fn assert_timestamp_format(ts: &str) {
    // YYYY-MM-DD HH:MM:SS
    assert_eq!(ts.len(), 19, "unexpected timestamp length: {:?}", ts);
    for (i, c) in ts.char_indices() {
        match i {
            4 | 7 => assert_eq!(c, '-', "timestamp {:?}", ts),
            10 => assert_eq!(c, ' ', "timestamp {:?}", ts),
            13 | 16 => assert_eq!(c, ':', "timestamp {:?}", ts),
            _ => assert!(c.is_ascii_digit(), "timestamp {:?}", ts),
        }
    }
}

#[test]
fn test_health() {
    let (_tmp, config_path) = setup_test_env(7411);
    let server = spawn_server(&config_path, 7411);

    let body: serde_json::Value = reqwest::blocking::get(server.url("/health"))
        .unwrap()
        .json()
        .unwrap();
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[test]
fn test_analyze_empty_text_rejected() {
    let (_tmp, config_path) = setup_test_env(7412);
    let server = spawn_server(&config_path, 7412);
    let client = reqwest::blocking::Client::new();

    for payload in [
        serde_json::json!({ "text": "" }),
        serde_json::json!({ "text": "   " }),
        serde_json::json!({}),
    ] {
        let resp = client
            .post(server.url("/analyze"))
            .json(&payload)
            .send()
            .unwrap();
        assert_eq!(resp.status().as_u16(), 400);
        let body: serde_json::Value = resp.json().unwrap();
        assert_eq!(body["error"], "No text provided");
    }
}

#[test]
fn test_analyze_fails_when_provider_disabled() {
    let (_tmp, config_path) = setup_test_env(7413);
    let server = spawn_server(&config_path, 7413);
    let client = reqwest::blocking::Client::new();

    let resp = client
        .post(server.url("/analyze"))
        .json(&serde_json::json!({ "text": "The phone is great." }))
        .send()
        .unwrap();
    assert_eq!(resp.status().as_u16(), 500);
    let body: serde_json::Value = resp.json().unwrap();
    assert!(
        body["error"].as_str().unwrap().contains("disabled"),
        "expected disabled-provider error, got: {}",
        body
    );
}

#[test]
fn test_summarize_short_text_passes_through() {
    let (_tmp, config_path) = setup_test_env(7414);
    let server = spawn_server(&config_path, 7414);
    let client = reqwest::blocking::Client::new();

    // 100 words or fewer never touch the summarizer, so this succeeds
    // even with the disabled provider.
    let text = "This short review is perfectly fine as it is.";
    let resp = client
        .post(server.url("/summarize"))
        .json(&serde_json::json!({ "text": text }))
        .send()
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let body: serde_json::Value = resp.json().unwrap();
    assert_eq!(body["summary"], text);
}

#[test]
fn test_summarize_long_text_requires_provider() {
    let (_tmp, config_path) = setup_test_env(7415);
    let server = spawn_server(&config_path, 7415);
    let client = reqwest::blocking::Client::new();

    let text = vec!["word"; 101].join(" ");
    let resp = client
        .post(server.url("/summarize"))
        .json(&serde_json::json!({ "text": text }))
        .send()
        .unwrap();
    assert_eq!(resp.status().as_u16(), 500);
}

#[test]
fn test_summarize_empty_text_rejected() {
    let (_tmp, config_path) = setup_test_env(7416);
    let server = spawn_server(&config_path, 7416);
    let client = reqwest::blocking::Client::new();

    let resp = client
        .post(server.url("/summarize"))
        .json(&serde_json::json!({ "text": "" }))
        .send()
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);
    let body: serde_json::Value = resp.json().unwrap();
    assert_eq!(body["error"], "No text provided");
}

#[test]
fn test_history_lifecycle() {
    let (_tmp, config_path) = setup_test_env(7417);
    let server = spawn_server(&config_path, 7417);
    let client = reqwest::blocking::Client::new();

    // Empty log before any save
    let log: serde_json::Value = client
        .get(server.url("/get-history"))
        .send()
        .unwrap()
        .json()
        .unwrap();
    assert_eq!(log, serde_json::json!([]));

    // Save one entry
    let resp = client
        .post(server.url("/save-history"))
        .json(&serde_json::json!({
            "text": "The phone is great.",
            "overall_sentiment": "Very Positive",
            "score": 0.988,
            "key_phrases": ["The phone"],
            "summary": "The phone is great."
        }))
        .send()
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let body: serde_json::Value = resp.json().unwrap();
    assert_eq!(body["message"], "History saved successfully");

    // Listed with all fields preserved and a stamped timestamp
    let log: serde_json::Value = client
        .get(server.url("/get-history"))
        .send()
        .unwrap()
        .json()
        .unwrap();
    let entries = log.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["text"], "The phone is great.");
    assert_eq!(entries[0]["overall_sentiment"], "Very Positive");
    assert_eq!(entries[0]["score"], 0.988);
    assert_eq!(entries[0]["key_phrases"], serde_json::json!(["The phone"]));
    assert_timestamp_format(entries[0]["timestamp"].as_str().unwrap());

    // Delete by timestamp
    let timestamp = entries[0]["timestamp"].as_str().unwrap().to_string();
    let resp = client
        .delete(server.url("/delete-entry"))
        .json(&serde_json::json!({ "timestamp": timestamp }))
        .send()
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let body: serde_json::Value = resp.json().unwrap();
    assert_eq!(body["message"], "Entry deleted successfully");

    let log: serde_json::Value = client
        .get(server.url("/get-history"))
        .send()
        .unwrap()
        .json()
        .unwrap();
    assert_eq!(log, serde_json::json!([]));
}

#[test]
fn test_save_minimal_payload_uses_defaults() {
    let (_tmp, config_path) = setup_test_env(7418);
    let server = spawn_server(&config_path, 7418);
    let client = reqwest::blocking::Client::new();

    let resp = client
        .post(server.url("/save-history"))
        .json(&serde_json::json!({}))
        .send()
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let log: serde_json::Value = client
        .get(server.url("/get-history"))
        .send()
        .unwrap()
        .json()
        .unwrap();
    let entries = log.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["text"], "");
    assert_eq!(entries[0]["score"], serde_json::Value::Null);
    assert_eq!(entries[0]["key_phrases"], serde_json::json!([]));
    assert_eq!(entries[0]["summary"], "");
}

#[test]
fn test_sequential_saves_preserve_order() {
    let (_tmp, config_path) = setup_test_env(7419);
    let server = spawn_server(&config_path, 7419);
    let client = reqwest::blocking::Client::new();

    for i in 0..3 {
        let resp = client
            .post(server.url("/save-history"))
            .json(&serde_json::json!({ "text": format!("entry {}", i) }))
            .send()
            .unwrap();
        assert_eq!(resp.status().as_u16(), 200);
    }

    let log: serde_json::Value = client
        .get(server.url("/get-history"))
        .send()
        .unwrap()
        .json()
        .unwrap();
    let entries = log.as_array().unwrap();
    assert_eq!(entries.len(), 3);
    for (i, entry) in entries.iter().enumerate() {
        assert_eq!(entry["text"], format!("entry {}", i));
    }
}

#[test]
fn test_delete_missing_timestamp_rejected() {
    let (_tmp, config_path) = setup_test_env(7420);
    let server = spawn_server(&config_path, 7420);
    let client = reqwest::blocking::Client::new();

    for payload in [
        serde_json::json!({}),
        serde_json::json!({ "timestamp": "" }),
    ] {
        let resp = client
            .delete(server.url("/delete-entry"))
            .json(&payload)
            .send()
            .unwrap();
        assert_eq!(resp.status().as_u16(), 400);
        let body: serde_json::Value = resp.json().unwrap();
        assert_eq!(body["error"], "Missing timestamp");
    }
}

#[test]
fn test_delete_without_history_file_is_404() {
    let (_tmp, config_path) = setup_test_env(7421);
    let server = spawn_server(&config_path, 7421);
    let client = reqwest::blocking::Client::new();

    let resp = client
        .delete(server.url("/delete-entry"))
        .json(&serde_json::json!({ "timestamp": "2026-01-01 00:00:00" }))
        .send()
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);
    let body: serde_json::Value = resp.json().unwrap();
    assert!(body["error"].as_str().unwrap().contains("not found"));
}

#[test]
fn test_delete_non_matching_timestamp_succeeds() {
    let (_tmp, config_path) = setup_test_env(7422);
    let server = spawn_server(&config_path, 7422);
    let client = reqwest::blocking::Client::new();

    client
        .post(server.url("/save-history"))
        .json(&serde_json::json!({ "text": "keep me" }))
        .send()
        .unwrap();

    let resp = client
        .delete(server.url("/delete-entry"))
        .json(&serde_json::json!({ "timestamp": "1999-12-31 23:59:59" }))
        .send()
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let log: serde_json::Value = client
        .get(server.url("/get-history"))
        .send()
        .unwrap()
        .json()
        .unwrap();
    assert_eq!(log.as_array().unwrap().len(), 1);
}

#[test]
fn test_cli_history_list_empty() {
    let (_tmp, config_path) = setup_test_env(7423);

    let (stdout, stderr, success) = run_senti(&config_path, &["history", "list"]);
    assert!(success, "history list failed: {}", stderr);
    assert_eq!(stdout.trim(), "[]");
}

#[test]
fn test_cli_history_delete_without_file_fails() {
    let (_tmp, config_path) = setup_test_env(7424);

    let (_, stderr, success) = run_senti(&config_path, &["history", "delete", "2026-01-01 00:00:00"]);
    assert!(!success, "delete without a history file should fail");
    assert!(
        stderr.contains("not found"),
        "Should report not found, got: {}",
        stderr
    );
}

#[test]
fn test_cli_analyze_empty_text_fails() {
    let (_tmp, config_path) = setup_test_env(7425);

    let (_, stderr, success) = run_senti(&config_path, &["analyze", "   "]);
    assert!(!success, "analyze with blank text should fail");
    assert!(
        stderr.contains("No text provided"),
        "Should report the validation error, got: {}",
        stderr
    );
}

#[test]
fn test_cli_summarize_short_text_passes_through() {
    let (_tmp, config_path) = setup_test_env(7426);

    let (stdout, stderr, success) = run_senti(&config_path, &["summarize", "A short note."]);
    assert!(success, "summarize failed: {}", stderr);
    assert!(stdout.contains("A short note."));
}

#[test]
fn test_unknown_inference_provider_rejected() {
    let tmp = TempDir::new().unwrap();
    let config_path = tmp.path().join("sentiscope.toml");
    fs::write(
        &config_path,
        r#"[inference]
provider = "local"
"#,
    )
    .unwrap();

    let (_, stderr, success) = run_senti(&config_path, &["history", "list"]);
    assert!(!success, "unknown provider should be rejected at config load");
    assert!(
        stderr.contains("Unknown inference provider"),
        "Should mention unknown provider, got: {}",
        stderr
    );
}

#[test]
fn test_http_provider_requires_base_url() {
    let tmp = TempDir::new().unwrap();
    let config_path = tmp.path().join("sentiscope.toml");
    fs::write(
        &config_path,
        r#"[inference]
provider = "http"
"#,
    )
    .unwrap();

    let (_, stderr, success) = run_senti(&config_path, &["history", "list"]);
    assert!(!success, "http provider without base_url should be rejected");
    assert!(
        stderr.contains("base_url"),
        "Should mention base_url, got: {}",
        stderr
    );
}
