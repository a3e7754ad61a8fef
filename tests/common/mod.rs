//! Shared test infrastructure for integration tests.

use std::path::Path;
use std::process::{Command, Output};

/// Run the compiled binary inside `cwd` with a clean logging environment.
pub fn run_place_enrich(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_place-enrich"))
        .args(args)
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .env("GOOGLE_MAPS_API_KEY", "integration-test-key")
        .output()
        .expect("run place-enrich")
}

pub fn write_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent directory");
    }
    std::fs::write(path, contents.as_bytes()).expect("write file");
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
