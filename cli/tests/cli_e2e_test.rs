use assert_cmd::{Command, cargo_bin_cmd};
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const NM_VARS: [&str; 8] = [
    "NM_WINDOW_SECONDS",
    "NM_SIGMA_THRESHOLD",
    "NM_STORAGE_BACKEND",
    "NM_STORAGE_SHARDS",
    "NM_OWNER_ID",
    "NM_METRICS_ENABLED",
    "NM_LOG_LEVEL",
    "NM_LOG_FORMAT",
];

fn neonomaly() -> Command {
    let mut cmd = cargo_bin_cmd!("neonomaly");
    for var in NM_VARS {
        cmd.env_remove(var);
    }
    cmd.env_remove("RUST_LOG");
    cmd
}

fn write_readings(dir: &TempDir, body: &str) -> std::path::PathBuf {
    let path = dir.path().join("readings.json");
    fs::write(&path, body).unwrap();
    path
}

mod help_and_version {
    use super::*;

    #[test]
    fn test_help_flag() {
        neonomaly()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Usage:"))
            .stdout(predicate::str::contains("detect"));
    }

    #[test]
    fn test_version_flag() {
        neonomaly()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("neonomaly"));
    }

    #[test]
    fn test_no_args_shows_help() {
        neonomaly()
            .assert()
            .failure()
            .stderr(predicate::str::contains("Usage:"));
    }
}

mod detect_subcommand {
    use super::*;

    #[test]
    fn test_detect_json_output() {
        let dir = TempDir::new().unwrap();
        let input = write_readings(
            &dir,
            r#"[
                {"value": 10, "timestamp": 0},
                {"value": 10, "timestamp": 1000},
                {"value": 10, "timestamp": 2000},
                {"value": 100, "timestamp": 3000}
            ]"#,
        );

        let output = neonomaly()
            .args(["detect", "--service", "api", "--metric", "latency"])
            .arg("--input")
            .arg(&input)
            .args(["--window-seconds", "10", "--sigma", "3", "--json"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(result["window_len"], 4);
        assert_eq!(result["window_mean"], 32.5);
        assert_eq!(result["is_anomaly"], false);
        assert_eq!(result["timestamp"], 3000);
    }

    #[test]
    fn test_detect_human_output_flags_spike() {
        let dir = TempDir::new().unwrap();
        let mut body: Vec<String> = (0..20)
            .map(|i| (100 + i % 2, i * 1000))
            .map(|(value, ts)| format!(r#"{{"value":{value},"timestamp":{ts}}}"#))
            .collect();
        let spike = r#"{"value": 500, "timestamp": "1970-01-01T00:00:20Z"}"#;
        body.push(spike.to_string());
        let input = write_readings(&dir, &format!("[{}]", body.join(",")));

        neonomaly()
            .args(["detect", "--service", "api", "--metric", "latency"])
            .arg("--input")
            .arg(&input)
            .assert()
            .success()
            .stdout(predicate::str::contains("spike"))
            .stdout(predicate::str::contains("21 readings"));
    }

    #[test]
    fn test_detect_zero_window() {
        let dir = TempDir::new().unwrap();
        let input = write_readings(
            &dir,
            r#"[{"value": 1, "timestamp": 0}, {"value": 999, "timestamp": 1000}]"#,
        );

        neonomaly()
            .args(["detect", "--service", "api", "--metric", "m", "--json"])
            .args(["--window-seconds", "0"])
            .arg("--input")
            .arg(&input)
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""window_len": 1"#))
            .stdout(predicate::str::contains(r#""is_anomaly": false"#));
    }

    #[test]
    fn test_detect_empty_input_is_no_data() {
        let dir = TempDir::new().unwrap();
        let input = write_readings(&dir, "[]");

        neonomaly()
            .args(["detect", "--service", "api", "--metric", "latency"])
            .arg("--input")
            .arg(&input)
            .assert()
            .failure()
            .stderr(predicate::str::contains("No data"));
    }

    #[test]
    fn test_detect_missing_input_file() {
        neonomaly()
            .args(["detect", "--service", "api", "--metric", "latency"])
            .args(["--input", "/nonexistent/readings.json"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("readings.json"));
    }

    #[test]
    fn test_detect_prints_prometheus_metrics() {
        let dir = TempDir::new().unwrap();
        let input = write_readings(&dir, r#"[{"value": 1, "timestamp": 0}]"#);

        neonomaly()
            .args(["detect", "--service", "api", "--metric", "m", "--metrics"])
            .arg("--input")
            .arg(&input)
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "neonomaly_readings_appended_total",
            ));
    }
}

mod config_subcommand {
    use super::*;

    #[test]
    fn test_config_prints_defaults() {
        neonomaly()
            .arg("config")
            .assert()
            .success()
            .stdout(predicate::str::contains("default_window_seconds = 600"))
            .stdout(predicate::str::contains("backend = \"memory\""));
    }

    #[test]
    fn test_config_file_and_env_precedence() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("neonomaly.toml");
        fs::write(
            &path,
            "[detection]\ndefault_window_seconds = 120\ndefault_sigma_threshold = 2.5\n",
        )
        .unwrap();

        neonomaly()
            .arg("config")
            .arg("--config")
            .arg(&path)
            .env("NM_WINDOW_SECONDS", "60")
            .assert()
            .success()
            .stdout(predicate::str::contains("default_window_seconds = 60"))
            .stdout(predicate::str::contains("default_sigma_threshold = 2.5"));
    }

    #[test]
    fn test_env_default_value_overrides_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("neonomaly.toml");
        let toml = r#"
[detection]
default_window_seconds = 120

[observability]
metrics_enabled = false
"#;
        fs::write(&path, toml).unwrap();

        neonomaly()
            .arg("config")
            .arg("--config")
            .arg(&path)
            .env("NM_WINDOW_SECONDS", "600")
            .env("NM_METRICS_ENABLED", "true")
            .assert()
            .success()
            .stdout(predicate::str::contains("default_window_seconds = 600"))
            .stdout(predicate::str::contains("metrics_enabled = true"));
    }

    #[test]
    fn test_config_rejects_unknown_backend() {
        neonomaly()
            .arg("config")
            .env("NM_STORAGE_BACKEND", "neo4j")
            .assert()
            .failure()
            .stderr(predicate::str::contains("invalid configuration"));
    }
}
