use std::{path::Path, process::Command};

fn fontello_svg(dir: &Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_fontello-svg"))
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run fontello-svg")
}

fn entries(dir: &Path) -> usize {
    std::fs::read_dir(dir).unwrap().count()
}

#[test]
fn missing_required_flags() {
    let dir = tempfile::tempdir().unwrap();
    let output = fontello_svg(dir.path(), &[]);

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("missing required parameters (--config, --out)"));
    assert!(stdout.contains("--fill-colors"));
    assert!(!stdout.contains('\x1b'));
    assert_eq!(entries(dir.path()), 0);
}

#[test]
fn missing_out_flag() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.json"), r#"{ "glyphs": [] }"#).unwrap();
    let output = fontello_svg(dir.path(), &["--config", "config.json"]);

    assert!(!output.status.success());
    assert_eq!(entries(dir.path()), 1);
}

#[test]
fn unreadable_config() {
    let dir = tempfile::tempdir().unwrap();
    let output = fontello_svg(dir.path(), &["--config", "nope.json", "--out", "svg"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("nope.json"));
    assert!(!dir.path().join("svg").exists());
}

#[test]
fn malformed_colors() {
    let dir = tempfile::tempdir().unwrap();
    let output = fontello_svg(
        dir.path(),
        &["--config", "config.json", "--out", "svg", "--fill-colors", "black"],
    );

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("label:value"));
    assert_eq!(entries(dir.path()), 0);
}

#[test]
fn empty_config_writes_only_css() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.json"), r#"{ "glyphs": [] }"#).unwrap();
    let output = fontello_svg(dir.path(), &["--config", "config.json", "--out", "svg"]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("svg/index.css"));
    assert_eq!(std::fs::read_to_string(dir.path().join("svg/index.css")).unwrap(), "");
    assert_eq!(entries(&dir.path().join("svg")), 1);
}

const TWO_GLYPHS: &str = r#"{
    "glyphs": [
        { "css": "home", "code": 59392, "src": "entypo" },
        { "css": "star", "code": 59393, "src": "entypo" }
    ]
}"#;

/// Nothing listens on port 1, so every download fails without leaving the machine.
const UNREACHABLE_URL: &str = "http://127.0.0.1:1/{0}/{1}.svg";

fn export_with_one_existing_file(verbose: bool) -> (tempfile::TempDir, std::process::Output) {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.json"), TWO_GLYPHS).unwrap();
    std::fs::create_dir(dir.path().join("svg")).unwrap();
    std::fs::write(dir.path().join("svg/entypo-home-black.svg"), "<svg/>").unwrap();

    let mut args = vec!["--config", "config.json", "--out", "svg", "--svg-url", UNREACHABLE_URL];
    if verbose {
        args.push("--verbose");
    }
    let output = fontello_svg(dir.path(), &args);
    (dir, output)
}

fn stdout_lines(output: &std::process::Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout).lines().map(str::to_string).collect()
}

#[test]
fn verbose_progress_lines() {
    let (dir, output) = export_with_one_existing_file(true);

    assert!(output.status.success());
    let mut lines = stdout_lines(&output);
    lines.sort();
    assert_eq!(
        lines,
        [
            "  [error] download failed: http://127.0.0.1:1/entypo/star.svg",
            "  [saved] svg/index.css",
            "  [skipped] existing SVG: home-entypo",
        ]
    );
    assert!(!dir.path().join("svg/entypo-star-black.svg").exists());
    assert_eq!(
        std::fs::read_to_string(dir.path().join("svg/entypo-home-black.svg")).unwrap(),
        "<svg/>"
    );
}

#[test]
fn skipped_lines_need_verbose() {
    let (_dir, output) = export_with_one_existing_file(false);

    assert!(output.status.success());
    let mut lines = stdout_lines(&output);
    lines.sort();
    assert_eq!(
        lines,
        [
            "  [error] download failed: http://127.0.0.1:1/entypo/star.svg",
            "  [saved] svg/index.css",
        ]
    );
}

#[test]
fn no_color_when_piped() {
    let (_dir, output) = export_with_one_existing_file(true);
    assert!(!output.stdout.contains(&0x1b));
}
