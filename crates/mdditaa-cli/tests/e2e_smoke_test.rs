use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::tempdir;

use mdditaa_cli::{Args, run_with_env};

/// Collects all .md fixtures
fn collect_md_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("md")
            })
            .collect()
    } else {
        Vec::new()
    };

    // Sort for consistent test output
    files.sort();
    files
}

fn fixtures() -> Vec<PathBuf> {
    let fixtures = collect_md_files(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures"));
    assert!(!fixtures.is_empty(), "No fixtures found in tests/fixtures/");
    fixtures
}

/// Copies `fixture` into `dir`, pointing `path=` annotations at `dir/assets`
fn stage_fixture(fixture: &Path, dir: &Path) -> PathBuf {
    let assets = dir.join("assets");
    fs::create_dir_all(&assets).expect("Failed to create assets directory");
    let source = fs::read_to_string(fixture).expect("Failed to read fixture");
    let staged = dir.join(format!(
        "input-{}",
        fixture.file_name().expect("fixture has a name").to_string_lossy()
    ));
    fs::write(&staged, source.replace("@ASSETS@", &assets.to_string_lossy()))
        .expect("Failed to stage fixture");
    staged
}

/// Runs the CLI without consulting the process environment
fn run(args: &Args) -> Result<(), mdditaa::MdditaaError> {
    run_with_env(args, |_| None)
}

fn args(input: &Path, output: &Path, command: &str, image_dir: &Path) -> Args {
    Args {
        input: Some(input.to_string_lossy().to_string()),
        output: Some(output.to_string_lossy().to_string()),
        config: Some(
            PathBuf::from(env!("CARGO_MANIFEST_DIR"))
                .join("tests/fixtures/config.toml")
                .to_string_lossy()
                .to_string(),
        ),
        command: Some(command.to_string()),
        image_dir: Some(image_dir.to_string_lossy().to_string()),
        extra_copy_dir: None,
        log_level: "off".to_string(),
    }
}

#[cfg(unix)]
#[test]
fn e2e_smoke_test_renders_fixtures() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let image_dir = temp_dir.path().join("img");

    for fixture in fixtures() {
        let output = temp_dir
            .path()
            .join(fixture.file_name().expect("fixture has a name"));

        let input = stage_fixture(&fixture, temp_dir.path());
        run(&args(&input, &output, "cp {infile} {outfile}", &image_dir))
            .unwrap_or_else(|err| panic!("{} failed: {err}", fixture.display()));

        let rendered = fs::read_to_string(&output).expect("Failed to read output");
        assert!(
            !rendered.contains("\n```ditaa\n") && !rendered.starts_with("```ditaa"),
            "{}: diagram block left in output:\n{rendered}",
            fixture.display()
        );
        assert!(
            rendered.contains("![") && rendered.contains("diagram-"),
            "{}: no image embed in output:\n{rendered}",
            fixture.display()
        );
    }

    let images = fs::read_dir(&image_dir)
        .expect("image directory should exist")
        .count();
    assert!(images > 0, "no images were generated");
}

#[cfg(unix)]
#[test]
fn e2e_smoke_test_falls_back_on_renderer_failure() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let image_dir = temp_dir.path().join("img");

    for fixture in fixtures() {
        let output = temp_dir
            .path()
            .join(fixture.file_name().expect("fixture has a name"));

        let input = stage_fixture(&fixture, temp_dir.path());
        run(&args(&input, &output, "false {infile} {outfile}", &image_dir))
            .unwrap_or_else(|err| panic!("{} failed: {err}", fixture.display()));

        let rendered = fs::read_to_string(&output).expect("Failed to read output");
        assert!(
            !rendered.contains("]("),
            "{}: unexpected image embed:\n{rendered}",
            fixture.display()
        );
    }
}

#[test]
fn e2e_mixed_fixture_keeps_non_diagram_content() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let fixture = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/mixed.md");
    let input = stage_fixture(&fixture, temp_dir.path());
    let output = temp_dir.path().join("mixed.md");

    run(&args(
        &input,
        &output,
        "mdditaa-no-such-renderer {infile} {outfile}",
        &temp_dir.path().join("img"),
    ))
    .expect("run should succeed even when the renderer is missing");

    let rendered = fs::read_to_string(&output).expect("Failed to read output");
    assert!(rendered.contains("```rust\nfn main() {}\n```"));
    assert!(rendered.contains("Inline mention of ```ditaa stays as text."));
    assert!(rendered.contains("\n      /----\\\n"));
    assert!(rendered.contains("\n    A->B\n"));
    assert!(rendered.ends_with('\n'));
}

#[test]
fn e2e_missing_config_file_fails() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let fixture = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/simple.md");
    let output = temp_dir.path().join("out.md");

    let mut args = args(&fixture, &output, "true", &temp_dir.path().join("img"));
    args.config = Some(temp_dir.path().join("missing.toml").to_string_lossy().to_string());

    assert!(run(&args).is_err(), "missing config should fail");
    assert!(!output.exists());
}

#[cfg(unix)]
#[test]
fn e2e_path_override_copies_into_annotated_directory() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let fixture = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/mixed.md");
    let input = stage_fixture(&fixture, temp_dir.path());
    let output = temp_dir.path().join("mixed.md");

    run(&args(
        &input,
        &output,
        "cp {infile} {outfile}",
        &temp_dir.path().join("img"),
    ))
    .expect("run should succeed");

    let rendered = fs::read_to_string(&output).expect("Failed to read output");
    let assets = temp_dir.path().join("assets");
    let copied: Vec<_> = fs::read_dir(&assets)
        .expect("assets directory should exist")
        .flatten()
        .map(|entry| entry.path())
        .collect();
    assert_eq!(copied.len(), 1, "only the annotated block targets assets/");
    assert!(rendered.contains(&format!("  ![{0}]({0})", copied[0].display())));
}
