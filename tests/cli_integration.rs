use mockito::Server;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dirs");
    }
    fs::write(path, content).expect("write test file");
}

/// Run the binary with HOME pointed at `home` so no real user config leaks in
fn run_keyswitch(args: &[&str], home: &Path) -> (bool, String, String) {
    let bin = std::env::var("CARGO_BIN_EXE_keyswitch").unwrap_or_else(|_| {
        let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        path.push("target");
        path.push("debug");
        if cfg!(windows) {
            path.push("keyswitch.exe");
        } else {
            path.push("keyswitch");
        }
        path.to_string_lossy().into_owned()
    });
    let output = Command::new(bin)
        .args(args)
        .arg("--no-color")
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("RUST_LOG")
        .env_remove("HTTP_PROXY")
        .env_remove("http_proxy")
        .env_remove("ALL_PROXY")
        .env_remove("all_proxy")
        .output()
        .expect("run keyswitch");
    (
        output.status.success(),
        String::from_utf8_lossy(&output.stdout).into_owned(),
        String::from_utf8_lossy(&output.stderr).into_owned(),
    )
}

fn pool_yaml(base_url: &str, keys: &[&str]) -> String {
    let mut yaml = format!(
        "provider:\n  custom:\n    base_url: {base_url}\n    model_name: qwen3-coder\n    api_keys:\n"
    );
    for key in keys {
        yaml.push_str(&format!("    - {key}\n"));
    }
    yaml
}

fn backups_in(dir: &Path) -> Vec<PathBuf> {
    let mut found: Vec<PathBuf> = fs::read_dir(dir)
        .expect("read dir")
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.to_string_lossy().contains("_backup_"))
        .collect();
    found.sort();
    found
}

fn mock_chat(server: &mut Server, key: &str, status: usize) -> mockito::Mock {
    server
        .mock("POST", "/v1/chat/completions")
        .match_header("authorization", format!("Bearer {key}").as_str())
        .with_status(status)
        .with_body("{}")
        .create()
}

#[test]
fn explicit_missing_config_fails() {
    let home = TempDir::new().unwrap();
    let missing = home.path().join("nope.yml");

    let (ok, _, stderr) = run_keyswitch(&["-c", missing.to_str().unwrap()], home.path());
    assert!(!ok);
    assert!(stderr.contains("Config file not found"), "stderr: {stderr}");
    assert!(!missing.exists());
}

#[test]
fn missing_default_config_is_created() {
    let home = TempDir::new().unwrap();

    let (ok, stdout, stderr) = run_keyswitch(&[], home.path());
    assert!(ok, "stderr: {stderr}");
    assert!(stdout.contains("Created default config file"));

    let created = fs::read_to_string(home.path().join(".keyswitch").join("provider.yml")).unwrap();
    assert!(created.contains("sk-your-api-key-here"));
    assert!(created.contains("base_url"));
}

#[test]
fn malformed_config_fails() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("provider.yml");
    write_file(&config, "provider:\n  custom:\n    api_keys: [sk-a]\n");

    let (ok, _, stderr) = run_keyswitch(&["-c", config.to_str().unwrap()], home.path());
    assert!(!ok);
    assert!(stderr.contains("missing required field 'base_url'"), "stderr: {stderr}");
}

#[test]
fn switches_to_first_valid_key_and_prunes_dead_ones() {
    let home = TempDir::new().unwrap();
    let mut server = Server::new();
    let _dead = mock_chat(&mut server, "sk-dead", 401);
    let _busy = mock_chat(&mut server, "sk-busy", 503);
    let good = mock_chat(&mut server, "sk-good", 200);
    let never = mock_chat(&mut server, "sk-spare", 200).expect(0);

    let base_url = format!("{}/v1", server.url());
    let config = home.path().join("keys").join("provider.yml");
    let original = pool_yaml(&base_url, &["sk-dead", "sk-busy", "sk-good", "sk-spare"]);
    write_file(&config, &original);
    let settings = home.path().join(".qwen").join("settings.json");

    let (ok, stdout, stderr) = run_keyswitch(
        &["-c", config.to_str().unwrap(), "-s", settings.to_str().unwrap()],
        home.path(),
    );
    assert!(ok, "stdout: {stdout}\nstderr: {stderr}");
    good.assert();
    never.assert();

    let json: Value = serde_json::from_str(&fs::read_to_string(&settings).unwrap()).unwrap();
    assert_eq!(json["$version"], 2);
    assert_eq!(json["security"]["auth"]["selectedType"], "openai");
    assert_eq!(json["security"]["auth"]["apiKey"], "sk-good");
    assert_eq!(json["security"]["auth"]["baseUrl"], base_url.as_str());
    assert_eq!(json["model"]["name"], "qwen3-coder");

    let pruned = fs::read_to_string(&config).unwrap();
    assert!(!pruned.contains("sk-dead"));
    assert!(pruned.contains("sk-busy"));
    assert!(pruned.contains("sk-spare"));

    let backups = backups_in(config.parent().unwrap());
    assert_eq!(backups.len(), 1);
    assert_eq!(fs::read_to_string(&backups[0]).unwrap(), original);
}

#[test]
fn reverse_mode_checks_from_the_end() {
    let home = TempDir::new().unwrap();
    let mut server = Server::new();
    let first = mock_chat(&mut server, "sk-first", 200).expect(0);
    let last = mock_chat(&mut server, "sk-last", 200);

    let config = home.path().join("provider.yml");
    write_file(
        &config,
        &pool_yaml(&format!("{}/v1", server.url()), &["sk-first", "sk-last"]),
    );
    let settings = home.path().join("settings.json");

    let (ok, _, stderr) = run_keyswitch(
        &[
            "-c",
            config.to_str().unwrap(),
            "-s",
            settings.to_str().unwrap(),
            "--mode",
            "reverse",
        ],
        home.path(),
    );
    assert!(ok, "stderr: {stderr}");
    first.assert();
    last.assert();

    let json: Value = serde_json::from_str(&fs::read_to_string(&settings).unwrap()).unwrap();
    assert_eq!(json["security"]["auth"]["apiKey"], "sk-last");
}

#[test]
fn best_mode_uses_highest_balance() {
    let home = TempDir::new().unwrap();
    let mut server = Server::new();
    for (key, balance) in [("sk-a", "5.0"), ("sk-b", "20.0"), ("sk-c", "0.1")] {
        server
            .mock("GET", "/v1/user/info")
            .match_header("authorization", format!("Bearer {key}").as_str())
            .with_status(200)
            .with_body(format!(r#"{{"code":20000,"data":{{"balance":"{balance}"}}}}"#))
            .create();
    }
    let _empty = server
        .mock("GET", "/v1/user/info")
        .match_header("authorization", "Bearer sk-empty")
        .with_status(200)
        .with_body(r#"{"code":20000,"data":{"balance":"0"}}"#)
        .create();

    let config = home.path().join("provider.yml");
    write_file(
        &config,
        &format!(
            "provider:\n  silicon:\n    base_url: {url}/v1\n    balance_url: {url}/v1/user/info\n    balance_field: data.balance\n    api_keys: [sk-a, sk-empty, sk-b, sk-c]\n",
            url = server.url()
        ),
    );
    let settings = home.path().join("settings.json");

    let (ok, stdout, stderr) = run_keyswitch(
        &[
            "-c",
            config.to_str().unwrap(),
            "-s",
            settings.to_str().unwrap(),
            "-m",
            "best",
        ],
        home.path(),
    );
    assert!(ok, "stdout: {stdout}\nstderr: {stderr}");

    let json: Value = serde_json::from_str(&fs::read_to_string(&settings).unwrap()).unwrap();
    assert_eq!(json["security"]["auth"]["apiKey"], "sk-b");
    assert_eq!(json["model"]["name"], "default-model");

    let pruned = fs::read_to_string(&config).unwrap();
    assert!(!pruned.contains("sk-empty"));
    assert!(pruned.contains("sk-c"));
}

#[test]
fn no_valid_key_exits_non_zero() {
    let home = TempDir::new().unwrap();
    let mut server = Server::new();
    let _limited = mock_chat(&mut server, "sk-limited", 429);

    let config = home.path().join("provider.yml");
    let original = pool_yaml(&format!("{}/v1", server.url()), &["sk-limited"]);
    write_file(&config, &original);
    let settings = home.path().join("settings.json");

    let (ok, _, stderr) = run_keyswitch(
        &["-c", config.to_str().unwrap(), "-s", settings.to_str().unwrap()],
        home.path(),
    );
    assert!(!ok);
    assert!(stderr.contains("No valid API key found"), "stderr: {stderr}");
    assert_eq!(fs::read_to_string(&config).unwrap(), original);
    assert!(!settings.exists());
}

#[test]
fn restore_brings_back_pruned_keys() {
    let home = TempDir::new().unwrap();
    let mut server = Server::new();
    let _dead = mock_chat(&mut server, "sk-dead", 403);
    let _good = mock_chat(&mut server, "sk-good", 200);

    let config = home.path().join("provider.yml");
    let original = pool_yaml(&format!("{}/v1", server.url()), &["sk-dead", "sk-good"]);
    write_file(&config, &original);
    let settings = home.path().join("settings.json");

    let (ok, _, stderr) = run_keyswitch(
        &["-c", config.to_str().unwrap(), "-s", settings.to_str().unwrap()],
        home.path(),
    );
    assert!(ok, "stderr: {stderr}");
    assert_ne!(fs::read_to_string(&config).unwrap(), original);

    let (ok, stdout, _) = run_keyswitch(&["backups", "-c", config.to_str().unwrap()], home.path());
    assert!(ok);
    assert!(stdout.contains("provider_backup_"));

    let (ok, stdout, stderr) = run_keyswitch(&["restore", "-c", config.to_str().unwrap()], home.path());
    assert!(ok, "stderr: {stderr}");
    assert!(stdout.contains("Restored"));
    assert_eq!(fs::read_to_string(&config).unwrap(), original);
}

#[test]
fn restore_without_backups_fails() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("provider.yml");
    write_file(&config, "provider: {}\n");

    let (ok, _, stderr) = run_keyswitch(&["restore", "-c", config.to_str().unwrap()], home.path());
    assert!(!ok);
    assert!(stderr.contains("No backups found"), "stderr: {stderr}");
}

#[test]
fn pick_mode_without_a_choice_fails() {
    let home = TempDir::new().unwrap();
    let mut server = Server::new();
    let _good = mock_chat(&mut server, "sk-good", 200);

    let config = home.path().join("provider.yml");
    write_file(&config, &pool_yaml(&format!("{}/v1", server.url()), &["sk-good"]));
    let settings = home.path().join("settings.json");

    // stdin is closed, so the prompt reads an empty answer
    let (ok, stdout, stderr) = run_keyswitch(
        &[
            "-c",
            config.to_str().unwrap(),
            "-s",
            settings.to_str().unwrap(),
            "--mode",
            "pick",
        ],
        home.path(),
    );
    assert!(!ok);
    assert!(stdout.contains("Select a key [1-1]"), "stdout: {stdout}");
    assert!(stderr.contains("Invalid selection"), "stderr: {stderr}");
    assert!(!settings.exists());
}

#[test]
fn zero_timeout_is_rejected() {
    let home = TempDir::new().unwrap();
    let (ok, _, stderr) = run_keyswitch(&["--timeout", "0"], home.path());
    assert!(!ok);
    assert!(stderr.contains("--timeout"), "stderr: {stderr}");
    assert!(!home.path().join(".keyswitch").exists());
}
