use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::tempdir;

use pcbsvg_cli::{Args, ExportLayer, run};

/// Collects all .json files from a directory
fn collect_json_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("json")
            })
            .collect()
    } else {
        Vec::new()
    };

    files.sort();
    files
}

/// Demo circuits live at the workspace root, relative to the workspace not the crate
fn demos_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("demos")
}

fn args(input: &Path, output: &Path) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output: output.to_string_lossy().to_string(),
        config: None,
        layer: None,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_valid_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let demos = collect_json_files(demos_path());

    assert!(!demos.is_empty(), "No demo circuits found in demos/");

    let mut failed = Vec::new();

    for demo_path in &demos {
        let output_filename = format!("{}.svg", demo_path.file_stem().unwrap().to_string_lossy());
        let output_path = temp_dir.path().join(output_filename);

        match run(&args(demo_path, &output_path)) {
            Ok(()) => {
                let svg = fs::read_to_string(&output_path).unwrap();
                assert!(svg.starts_with("<svg"), "{} is not SVG", output_path.display());
            }
            Err(e) => failed.push((demo_path.clone(), e)),
        }
    }

    if !failed.is_empty() {
        eprintln!("\nDemos that failed:");
        for (path, err) in &failed {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} demo(s) failed unexpectedly", failed.len());
    }
}

#[test]
fn e2e_smoke_test_error_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let error_demos = collect_json_files(demos_path().join("errors"));

    assert!(
        !error_demos.is_empty(),
        "No error demos found in demos/errors/"
    );

    let mut unexpectedly_succeeded = Vec::new();

    for demo_path in &error_demos {
        let output_filename = format!(
            "error_{}.svg",
            demo_path.file_stem().unwrap().to_string_lossy()
        );
        let output_path = temp_dir.path().join(output_filename);

        if run(&args(demo_path, &output_path)).is_ok() {
            unexpectedly_succeeded.push(demo_path.clone());
        }
    }

    if !unexpectedly_succeeded.is_empty() {
        eprintln!("\nError demos that unexpectedly succeeded:");
        for path in &unexpectedly_succeeded {
            eprintln!("  - {}", path.display());
        }
        panic!(
            "{} error demo(s) succeeded unexpectedly",
            unexpectedly_succeeded.len()
        );
    }
}

#[test]
fn e2e_solder_paste_layer_with_config() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let input = temp_dir.path().join("paste.json");
    fs::write(
        &input,
        r#"[
            {"type": "pcb_board", "center": {"x": 0, "y": 0}, "width": 10, "height": 10},
            {"type": "pcb_solder_paste", "shape": "rect", "x": 1, "y": 1, "width": 1, "height": 1, "layer": "top"}
        ]"#,
    )
    .unwrap();
    let config = temp_dir.path().join("config.toml");
    fs::write(&config, "background_color = \"#fff\"\n").unwrap();
    let output = temp_dir.path().join("paste.svg");

    let mut args = args(&input, &output);
    args.config = Some(config.to_string_lossy().to_string());
    args.layer = Some(ExportLayer::SolderPasteTop);
    run(&args).expect("Failed to export paste layer");

    let svg = fs::read_to_string(&output).unwrap();
    assert!(svg.contains(r#"data-layer="solder-paste-top""#));
    assert!(svg.contains(r##"fill="#fff""##));
}

#[test]
fn e2e_missing_input_fails() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let missing = temp_dir.path().join("missing.json");
    let output = temp_dir.path().join("out.svg");

    assert!(run(&args(&missing, &output)).is_err());
    assert!(!output.exists());
}
