use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::tempdir;

fn run_cli(dir: &Path, args: &[&str]) -> Output {
    let config = dir.join("paperkit.toml");
    if !config.exists() {
        fs::write(&config, "").unwrap();
    }
    Command::new(env!("CARGO_BIN_EXE_paperkit"))
        .current_dir(dir)
        .arg("--config")
        .arg(&config)
        .arg("-q")
        .args(args)
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn dry_run_submit_writes_script_and_prints_commands() {
    let dir = tempdir().unwrap();
    let output = run_cli(
        dir.path(),
        &["submit", "1.3", "0.3", "10", "tmmc", "--submit", "--dry-run"],
    );
    assert!(output.status.success(), "{:?}", output);

    let text = stdout(&output);
    assert!(text.contains("scons -j4 -C . square-well-monte-carlo"));
    assert!(text.contains("sbatch -J periodic-ww1.30-ff0.30-N10-tmmc"));
    assert!(!text.contains("job periodic-ww1.30-ff0.30-N10-tmmc started"));

    let script = dir.path().join("jobs/periodic-ww1.30-ff0.30-N10-tmmc.sh");
    let body = fs::read_to_string(script).unwrap();
    assert!(body.contains("#SBATCH --mem-per-cpu=200"));
    assert!(body.contains(" --tmmc"));
}

#[test]
fn dry_run_renormalization_prints_both_scripts() {
    let dir = tempdir().unwrap();
    let output = run_cli(
        dir.path(),
        &["renormalization", "1", "1.3", "5", "range(2, 5)", "-O", "--dry-run"],
    );
    assert!(output.status.success(), "{:?}", output);

    let text = stdout(&output);
    assert!(text.contains("python run-absolute.py 1 1.3 10 '[2, 3, 4]' -O"));
    assert!(text.contains("python run-monte-carlo.py 1 1.3 10 '[2, 3, 4]'"));
}

#[test]
fn dry_run_melting_honours_config_overrides() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("paperkit.toml"),
        "[sweep]\nmelting-program = \"./new-melting.mkdat\"\n",
    )
    .unwrap();
    let output = run_cli(dir.path(), &["melting", "--n", "0.9", "1.0", "--dry-run"]);
    assert!(output.status.success(), "{:?}", output);

    let text = stdout(&output);
    let commands: Vec<&str> = text
        .lines()
        .filter(|l| l.starts_with("./new-melting.mkdat"))
        .collect();
    assert_eq!(commands.len(), 2);
    assert!(commands[0].contains("--kT 2 --rd 0.9"));
    assert!(commands[1].ends_with("--dir crystallization"));
}

#[test]
fn missing_reference_fails_the_command() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("data")).unwrap();
    let output = run_cli(
        dir.path(),
        &["thermo", "1.3", "0.3", "25", "-m", "tmmc", "--no-figures"],
    );
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error"));
}

#[test]
fn unknown_set_key_is_rejected() {
    let dir = tempdir().unwrap();
    let output = run_cli(
        dir.path(),
        &["triplet", "0.3", "-S", "cluster.nodes=2"],
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unsupported key"));
}
