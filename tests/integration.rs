//! Integration tests for chartdesk CLI

mod common;

use common::{files_with_extension, run_chartdesk, run_chartdesk_stdin, write_script};
use tempfile::TempDir;

// =============================================================================
// Basic functionality tests
// =============================================================================

#[test]
fn test_help_flag() {
    let output = run_chartdesk(&["--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Headless chart configuration dashboard"));
    assert!(stdout.contains("--script"));
    assert!(stdout.contains("--chart-type"));
    assert!(stdout.contains("--export"));
    assert!(stdout.contains("--debounce-ms"));
}

#[test]
fn test_version_flag() {
    let output = run_chartdesk(&["--version"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("chartdesk"));
}

#[test]
fn test_sample_summary() {
    let output = run_chartdesk(&[]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[Series]"));
    assert!(stdout.contains("Series 1"));
    assert!(stdout.contains("12, 19, 3, 5, 2"));
    assert!(stdout.contains("bar canvas"));
}

// =============================================================================
// Script tests
// =============================================================================

#[test]
fn test_script_adds_and_edits_series() {
    let dir = TempDir::new().unwrap();
    let script = write_script(
        dir.path(),
        "edits.txt",
        &[
            "# grow by one series and fill it",
            "click add-dataset",
            "input dataset-data-2 4, 4, 4",
            "blur dataset-data-2",
            "input dataset-name-2 \"Costs, net\"",
            "blur dataset-name-2",
        ],
    );
    let output = run_chartdesk(&["--seed", "3", "--script", script.to_str().unwrap()]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Costs, net"));
    assert!(stdout.contains("4, 4, 4, 0, 0"));
}

#[test]
fn test_script_from_stdin_switches_type() {
    let output = run_chartdesk_stdin(
        &[],
        "change chart-type donut\nchange single-series-select 1\nwait 300\n",
    );
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("donut canvas"));
    assert!(stdout.contains("Current series: Series 2"));
}

#[test]
fn test_invalid_value_is_a_warning() {
    let output = run_chartdesk_stdin(&[], "input dataset-color-0 not-a-color\n");
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("warning"));
    assert!(stderr.contains("dataset-color-0"));
}

#[test]
fn test_script_parse_error_exits() {
    let output = run_chartdesk_stdin(&[], "click add-dataset\nhover chart-type\n");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("line 2"));
}

#[test]
fn test_missing_script_file() {
    let output = run_chartdesk(&["--script", "/nonexistent/chartdesk-script.txt"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Cannot read script"));
}

#[test]
fn test_show_controls() {
    let output = run_chartdesk(&["--chart-type", "bar-line", "--show-controls"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[Controls]"));
    assert!(stdout.contains("mixed-type-0 bar"));
    assert!(stdout.contains("mixed-type-1 line marker=circle"));
}

// =============================================================================
// Validation tests
// =============================================================================

#[test]
fn test_unknown_palette() {
    let output = run_chartdesk(&["--palette", "neon"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown palette"));
}

#[test]
fn test_scale_out_of_range() {
    let output = run_chartdesk(&["--scale", "9"]);
    assert!(!output.status.success());
}

#[test]
fn test_bad_background() {
    let output = run_chartdesk(&["--background", "white"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("background"));
}

#[test]
fn test_export_into_missing_directory() {
    let output = run_chartdesk(&["--export", "--out-dir", "/nonexistent/chartdesk/out"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Directory does not exist"));
}

// =============================================================================
// Export tests
// =============================================================================

#[test]
fn test_treemap_svg_export() {
    let dir = TempDir::new().unwrap();
    let output = run_chartdesk(&[
        "--chart-type",
        "treemap",
        "--export",
        "--format",
        "svg",
        "--background",
        "#101010",
        "--out-dir",
        dir.path().to_str().unwrap(),
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let files = files_with_extension(dir.path(), "svg");
    assert_eq!(files.len(), 1);
    let markup = std::fs::read_to_string(&files[0]).unwrap();
    assert!(markup.starts_with("<svg"));
    assert!(markup.contains("#101010"));
    assert!(markup.contains("Point 2: 19"));
}

#[test]
fn test_streamgraph_svg_export_from_script() {
    let dir = TempDir::new().unwrap();
    let output = run_chartdesk_stdin(
        &["--out-dir", dir.path().to_str().unwrap()],
        "change chart-type streamgraph\nchange export-type svg\nchange export-scale 3\nclick export-image\n",
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let files = files_with_extension(dir.path(), "svg");
    assert_eq!(files.len(), 1);
    let markup = std::fs::read_to_string(&files[0]).unwrap();
    assert!(markup.contains("<path"));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Exported:"));
}

fn png_size(bytes: &[u8]) -> (u32, u32) {
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    let be = |at: usize| u32::from_be_bytes(bytes[at..at + 4].try_into().unwrap());
    (be(16), be(20))
}

#[test]
fn test_streamgraph_png_export_is_scaled() {
    let dir = TempDir::new().unwrap();
    let output = run_chartdesk(&[
        "--chart-type",
        "streamgraph",
        "--export",
        "--width",
        "300",
        "--height",
        "200",
        "--scale",
        "2",
        "--out-dir",
        dir.path().to_str().unwrap(),
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let files = files_with_extension(dir.path(), "png");
    assert_eq!(files.len(), 1);
    let bytes = std::fs::read(&files[0]).unwrap();
    assert_eq!(png_size(&bytes), (600, 400));
}

#[test]
fn test_dark_theme_svg_export_uses_theme_background() {
    let dir = TempDir::new().unwrap();
    let output = run_chartdesk(&[
        "--chart-type",
        "treemap",
        "--theme",
        "dark",
        "--export",
        "--format",
        "svg",
        "--out-dir",
        dir.path().to_str().unwrap(),
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let files = files_with_extension(dir.path(), "svg");
    assert_eq!(files.len(), 1);
    let markup = std::fs::read_to_string(&files[0]).unwrap();
    assert!(markup.contains(r##"fill="#1E1E1E""##));
    assert!(!markup.contains(r##"fill="#FFFFFF""##));
}

#[test]
fn test_bar_png_export() {
    let dir = TempDir::new().unwrap();
    let output = run_chartdesk(&[
        "--export",
        "--scale",
        "1",
        "--width",
        "480",
        "--height",
        "270",
        "--out-dir",
        dir.path().to_str().unwrap(),
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let files = files_with_extension(dir.path(), "png");
    assert_eq!(files.len(), 1);
    let name = files[0].file_name().unwrap().to_string_lossy().to_string();
    assert!(name.ends_with("@1x.png"), "{}", name);
    let bytes = std::fs::read(&files[0]).unwrap();
    assert_eq!(&bytes[..4], b"\x89PNG");
}
