use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::tempdir;

use ocelgraph::OcelGraphError;
use ocelgraph_cli::{Args, OutputFormat, run};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

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

    // Sort for consistent test output
    files.sort();
    files
}

fn args_for(input: &Path, output: &Path, format: OutputFormat) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output: Some(output.to_string_lossy().to_string()),
        format,
        config: None,
        engine: None,
        rank_direction: None,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_valid_fixtures() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let valid_fixtures = collect_json_files(fixtures_dir());
    assert!(
        !valid_fixtures.is_empty(),
        "No valid fixtures found in tests/fixtures/"
    );

    let mut failed = Vec::new();

    for fixture in &valid_fixtures {
        let stem = fixture.file_stem().unwrap().to_string_lossy().to_string();
        for (format, extension) in [(OutputFormat::Json, "json"), (OutputFormat::Svg, "svg")] {
            let output_path = temp_dir.path().join(format!("{stem}.{extension}"));
            let args = args_for(fixture, &output_path, format);

            match run(&args) {
                Ok(()) if output_path.exists() => {}
                Ok(()) => failed.push((fixture.clone(), "no output written".to_string())),
                Err(e) => failed.push((fixture.clone(), e.to_string())),
            }
        }
    }

    if !failed.is_empty() {
        eprintln!("\nValid fixtures that failed:");
        for (path, err) in &failed {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} valid fixture run(s) failed unexpectedly", failed.len());
    }
}

#[test]
fn e2e_smoke_test_error_fixtures() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let error_fixtures = collect_json_files(fixtures_dir().join("errors"));
    assert!(
        !error_fixtures.is_empty(),
        "No error fixtures found in tests/fixtures/errors/"
    );

    let mut unexpectedly_succeeded = Vec::new();

    for fixture in &error_fixtures {
        let output_path = temp_dir.path().join(format!(
            "error_{}.json",
            fixture.file_stem().unwrap().to_string_lossy()
        ));
        let args = args_for(fixture, &output_path, OutputFormat::Json);

        match run(&args) {
            Err(OcelGraphError::Parse { .. }) => {}
            Err(other) => panic!("{}: expected a parse error, got {other}", fixture.display()),
            Ok(()) => unexpectedly_succeeded.push(fixture.clone()),
        }
    }

    if !unexpectedly_succeeded.is_empty() {
        eprintln!("\nError fixtures that unexpectedly succeeded:");
        for path in &unexpectedly_succeeded {
            eprintln!("  - {}", path.display());
        }
        panic!(
            "{} error fixture(s) succeeded unexpectedly",
            unexpectedly_succeeded.len()
        );
    }
}

#[test]
fn e2e_json_output_describes_the_graph() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output_path = temp_dir.path().join("parallel.json");

    let args = args_for(
        &fixtures_dir().join("parallel_relations.json"),
        &output_path,
        OutputFormat::Json,
    );
    run(&args).expect("run should succeed");

    let output = fs::read_to_string(&output_path).expect("Failed to read output");
    let value: serde_json::Value = serde_json::from_str(&output).expect("Output is not JSON");

    assert_eq!(value["nodes"].as_array().unwrap().len(), 2);
    let offsets: Vec<f64> = value["edges"]
        .as_array()
        .unwrap()
        .iter()
        .map(|edge| edge["offsetDistance"].as_f64().unwrap())
        .collect();
    assert_eq!(offsets, vec![-20.0, 0.0, 20.0, 0.0]);
}

#[test]
fn e2e_reject_policy_from_config_file() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "[input]\npolicy = \"reject\"\n").expect("Failed to write config");

    let fixture = fixtures_dir().join("unknown_endpoint.json");
    let output_path = temp_dir.path().join("out.json");

    let mut args = args_for(&fixture, &output_path, OutputFormat::Json);
    run(&args).expect("skip policy should succeed");

    args.config = Some(config_path.to_string_lossy().to_string());
    let err = run(&args).expect_err("reject policy should fail");
    assert!(matches!(err, OcelGraphError::MalformedInput(_)));
}

#[test]
fn e2e_missing_input_is_an_io_error() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let args = args_for(
        &temp_dir.path().join("missing.json"),
        &temp_dir.path().join("out.svg"),
        OutputFormat::Svg,
    );

    let err = run(&args).expect_err("missing input should fail");
    assert!(matches!(err, OcelGraphError::Io(_)));
}
