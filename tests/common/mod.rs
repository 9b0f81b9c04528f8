//! Common test utilities

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

/// Get the path to the chartdesk binary
pub fn chartdesk_bin() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // Remove test binary name
    path.pop(); // Remove deps
    path.push("chartdesk");
    path
}

/// Run chartdesk with the given arguments, colors off
pub fn run_chartdesk(args: &[&str]) -> Output {
    Command::new(chartdesk_bin())
        .arg("--no-color")
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to execute chartdesk")
}

/// Run chartdesk with `script` piped to stdin via `--script -`
pub fn run_chartdesk_stdin(args: &[&str], script: &str) -> Output {
    let mut child = Command::new(chartdesk_bin())
        .args(["--no-color", "--script", "-"])
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn chartdesk");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(script.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

/// Write an event script into `dir`
pub fn write_script(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    path
}

/// Files in `dir` with the given extension
pub fn files_with_extension(dir: &Path, ext: &str) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|x| x == ext))
        .collect()
}
