use clap::Parser;
use kerfkit::{run, Cli};
use std::path::Path;
use tempfile::TempDir;

const PROGRAM: &str = "BOF
G00X-10.0Y-10.0
G41
M04
G01X-5.0Y-5.0
G02X+0.0Y+0.0I-5.0J+0.0
G01X+0.0Y+100.0
G01X+100.0Y+100.0
G01X+100.0Y+0.0
G01X+0.0Y+0.0
M03
G40

G00X+25.0Y+25.0
G41
M04
G01X+25.0Y+22.0
G03X+20.0Y+20.0I+25.0J+25.0
G01X+20.0Y+30.0
G01X+30.0Y+30.0
G01X+30.0Y+20.0
G01X+20.0Y+20.0
M03
G40
EOF
";

fn cli(dir: &Path, extra: &[&str]) -> Cli {
    let input = dir.join("part.cam");
    std::fs::write(&input, PROGRAM).unwrap();
    let config = dir.join("config.toml");
    std::fs::write(&config, "").unwrap();

    let mut args = vec![
        "kerfkit".to_string(),
        input.display().to_string(),
        "--config".to_string(),
        config.display().to_string(),
    ];
    args.extend(extra.iter().map(|s| s.to_string()));
    Cli::try_parse_from(args).unwrap()
}

#[test]
fn test_writes_corrected_program() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("fixed.cam");
    let cli = cli(dir.path(), &["-o", output.to_str().unwrap()]);

    let report = run(&cli).unwrap();
    assert_eq!(report.summary.holes, 1);
    assert_eq!(report.summary.modified, 1);

    let written = std::fs::read_to_string(&output).unwrap();
    let expected = PROGRAM
        .replace("G40\n\n", "G40\n")
        .replacen("G00X+25.0Y+25.0\nG41", "G00X+25.0Y+25.0\nG42", 1);
    assert_eq!(written, expected);
    assert!(!dir.path().join(".fixed.cam.tmp").exists());
}

#[test]
fn test_dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("fixed.cam");
    let cli = cli(dir.path(), &["-o", output.to_str().unwrap(), "--dry-run"]);

    run(&cli).unwrap();
    assert!(!output.exists());
}

#[test]
fn test_report_is_written() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("fixed.cam");
    let report_path = dir.path().join("report.json");
    let cli = cli(
        dir.path(),
        &[
            "-o",
            output.to_str().unwrap(),
            "--report",
            report_path.to_str().unwrap(),
        ],
    );

    run(&cli).unwrap();
    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(report["summary"]["blocks"], 2);
    assert_eq!(report["blocks"][1]["is_hole"], true);
    assert_eq!(report["blocks"][1]["correction"]["compensation"], "right");
}

#[test]
fn test_configured_output_file() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("from-config.cam");
    let mut cli = cli(dir.path(), &[]);
    let config = cli.config.clone().unwrap();
    std::fs::write(
        &config,
        format!("output_file = {:?}\n", output.display().to_string()),
    )
    .unwrap();
    cli.config = Some(config);

    run(&cli).unwrap();
    assert!(output.exists());
}

#[test]
fn test_malformed_program_fails_without_output() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("fixed.cam");
    let cli = cli(dir.path(), &["-o", output.to_str().unwrap()]);
    std::fs::write(&cli.input, "G00X+1.0Y+1.0\nG41\nM04\nG01X+0.0Y+0.0\nG03X+2.0Y+0.0\n").unwrap();

    let err = run(&cli).unwrap_err();
    assert!(format!("{:#}", err).contains("Malformed block starting at line 3"));
    assert!(!output.exists());
}

#[test]
fn test_missing_input_fails() {
    let dir = TempDir::new().unwrap();
    let mut cli = cli(dir.path(), &[]);
    cli.input = dir.path().join("absent.cam");
    assert!(run(&cli).is_err());
}

#[test]
fn test_argument_count_is_checked() {
    assert!(Cli::try_parse_from(["kerfkit"]).is_err());
    assert!(Cli::try_parse_from(["kerfkit", "a.cam", "b.cam"]).is_err());
}
