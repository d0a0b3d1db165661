use std::path::Path;
use std::process::{Command, Output};

use courseware_core::{CredentialStore, TokenPair};
use courseware_file::FileCredentialStore;
use serde_json::{Value, json};

/// Run the CLI against `api_url`, keeping credentials in `data_dir`.
pub fn run_cli(args: &[&str], data_dir: &Path, api_url: &str) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_courseware"));
    cmd.args(args);
    cmd.env("COURSEWARE_DATA_DIR", data_dir);
    cmd.env("COURSEWARE_API_URL", api_url);
    cmd.env("NO_COLOR", "1");
    cmd.env_remove("COURSEWARE_EMAIL");
    cmd.env_remove("COURSEWARE_PASSWORD");
    cmd.env_remove("RUST_LOG");
    cmd.output().expect("Failed to execute CLI")
}

/// Run the CLI and expect success; returns stdout.
pub fn run_cli_success(args: &[&str], data_dir: &Path, api_url: &str) -> String {
    let output = run_cli(args, data_dir, api_url);
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Run the CLI and expect failure; returns stderr.
pub fn run_cli_failure(args: &[&str], data_dir: &Path, api_url: &str) -> String {
    let output = run_cli(args, data_dir, api_url);
    if output.status.success() {
        panic!("CLI command should have failed: {:?}", args);
    }
    String::from_utf8_lossy(&output.stderr).to_string()
}

pub fn user_json(verified: bool) -> Value {
    json!({
        "id": "0b6f3c8e-2f1a-4f6b-9a3e-6c1d2e3f4a5b",
        "email": "sam@example.com",
        "first_name": "Sam",
        "last_name": "Lee",
        "role": "STUDENT",
        "email_verified": verified
    })
}

/// Store a session as if `courseware login` had run.
pub fn seed_session(data_dir: &Path, access: &str, refresh: &str) -> FileCredentialStore {
    let store = FileCredentialStore::in_dir(data_dir);
    let user = serde_json::from_value(user_json(true)).unwrap();
    store
        .save_login(&TokenPair::new(access, refresh), &user)
        .unwrap();
    store
}
