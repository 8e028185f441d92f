// Shared test helpers for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::{TempDir, tempdir};

use conformance_runner::core::classifier::FaultPolicy;
use conformance_runner::core::execution::ExecutorSettings;

/// A stand-in compiler. The "language" is POSIX shell: a successful compile
/// copies the source behind a shebang to `<source>.out`. Marker lines steer
/// the compile phase itself.
pub const FAKE_COMPILER: &str = r#"#!/bin/sh
src="$1"
if grep -q '^#compile-error' "$src"; then
    echo "error: program rejected" >&2
    exit 1
fi
if grep -q '^#compile-segv' "$src"; then
    kill -SEGV $$
fi
if grep -q '^#compile-hang' "$src"; then
    sleep 30
fi
if grep -q '^#no-artifact' "$src"; then
    exit 0
fi
{ echo '#!/bin/sh'; cat "$src"; } > "$src.out"
chmod +x "$src.out"
"#;

pub const FAKE_COMPILER_FILE: &str = "fakecc.sh";

/// Creates a temporary suite root containing the fake compiler.
pub fn setup_test_environment() -> TempDir {
    let temp_dir = tempdir().expect("Failed to create temporary directory");
    fs::write(temp_dir.path().join(FAKE_COMPILER_FILE), FAKE_COMPILER)
        .expect("Failed to write fake compiler");
    temp_dir
}

/// Executor settings pointing at the fake compiler inside `root`.
pub fn fake_settings(root: &Path) -> ExecutorSettings {
    let root = fs::canonicalize(root).expect("Failed to canonicalize root");
    ExecutorSettings {
        compiler: PathBuf::from("sh"),
        compiler_args: vec![root.join(FAKE_COMPILER_FILE).to_string_lossy().into_owned()],
        source_dir: root.join("cases"),
        root,
        source_extension: "sh".to_string(),
        artifact_suffix: ".out".to_string(),
        default_timeout: Duration::from_secs(5),
        output_limit: 64 * 1024,
        faults: FaultPolicy::default(),
    }
}

/// Header of a suite file driving the fake compiler; append `[[cases]]` to it.
pub const SUITE_HEADER: &str = r#"
language = "en"
compiler = "sh ./fakecc.sh"
source_extension = "sh"
default_timeout_secs = 5
"#;

/// Writes `Conformance.toml` (header plus `cases`) into `dir`.
pub fn write_suite(dir: &Path, cases: &str) -> PathBuf {
    let path = dir.join("Conformance.toml");
    fs::write(&path, format!("{SUITE_HEADER}\n{cases}")).expect("Failed to write suite file");
    path
}

/// Helper function to create an invalid TOML configuration
pub fn create_invalid_toml(temp_dir: &TempDir) -> PathBuf {
    let path = temp_dir.path().join("invalid.toml");
    let content = r#"
compiler = "sh ./fakecc.sh"
# Invalid TOML - missing closing bracket
[[cases]
name = "invalid-case"
source = ""
"#;
    fs::write(&path, content).unwrap();
    path
}
