use std::{fs, path::PathBuf};

use tempfile::tempdir;

use tfviz::{TfvizError, export::Format};
use tfviz_cli::{Args, run};

/// Collects every demo module directory
fn collect_demo_modules(dir: PathBuf) -> Vec<PathBuf> {
    let mut modules: Vec<PathBuf> = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .collect()
    } else {
        Vec::new()
    };

    // Sort for consistent test output
    modules.sort();
    modules
}

fn demos_path() -> PathBuf {
    // Demos are at workspace root, relative to workspace not the crate
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("demos")
}

fn dot_args(input: &PathBuf, output: &PathBuf) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output: Some(output.to_string_lossy().to_string()),
        format: Format::Dot,
        config: None,
        ignore_ingress: false,
        ignore_egress: false,
        ignore_warnings: false,
        verbose: false,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_demo_modules() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let demos = collect_demo_modules(demos_path());

    assert!(!demos.is_empty(), "No demo modules found in demos/");

    let mut failed = Vec::new();

    for demo in &demos {
        let output = temp_dir
            .path()
            .join(format!("{}.dot", demo.file_name().unwrap().to_string_lossy()));

        match run(&dot_args(demo, &output)) {
            Ok(()) => {
                let dot = fs::read_to_string(&output).unwrap();
                if !dot.starts_with("digraph") {
                    failed.push((demo.clone(), "output is not a digraph".to_string()));
                }
            }
            Err(e) => failed.push((demo.clone(), e.to_string())),
        }
    }

    if !failed.is_empty() {
        eprintln!("\nDemo modules that failed:");
        for (path, err) in &failed {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} demo module(s) failed unexpectedly", failed.len());
    }
}

#[test]
fn e2e_three_tier_topology() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output = temp_dir.path().join("three_tier.dot");

    run(&dot_args(&demos_path().join("three_tier"), &output)).expect("run failed");
    let dot = fs::read_to_string(&output).unwrap();

    assert!(dot.contains("subgraph \"cluster_aws_vpc_main\""));
    assert!(dot.contains("\"aws_instance_app_server_1\" -> \"Internet\""));
    assert!(dot.contains("\"aws_instance_app_server_1\" -> \"aws_instance_app_server_2\""));
    assert!(dot.contains("\"aws_subnet_public\" -> \"aws_db_instance_postgres\""));
    assert!(!dot.contains("aws_s3_bucket_assets"));
}

#[test]
fn e2e_existing_output_is_rejected() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output = temp_dir.path().join("taken.dot");
    fs::write(&output, "keep").unwrap();

    let err = run(&dot_args(&demos_path().join("defaults"), &output)).unwrap_err();
    assert!(matches!(err, TfvizError::OutputExists(_)));
    assert_eq!(fs::read_to_string(&output).unwrap(), "keep");
}

#[test]
fn e2e_missing_input_fails() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output = temp_dir.path().join("out.dot");

    let err = run(&dot_args(&temp_dir.path().join("nowhere"), &output)).unwrap_err();
    assert!(matches!(err, TfvizError::Parse { .. }));
    assert!(!output.exists());
}

#[test]
fn e2e_ignore_flags_drop_edges() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output = temp_dir.path().join("quiet.dot");

    let mut args = dot_args(&demos_path().join("three_tier"), &output);
    args.ignore_ingress = true;
    args.ignore_egress = true;
    run(&args).expect("run failed");

    let dot = fs::read_to_string(&output).unwrap();
    assert!(!dot.contains("->"));
    assert!(dot.contains("\"aws_instance_app_server_1\""));
}
