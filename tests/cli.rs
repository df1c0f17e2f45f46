//! End-to-end runs of the split_contrasts binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const SAMPLES: &str = "sample,group\ns1,ctrl\ns2,treat\ns3,blank\n";
const CONTRASTS: &str = "id,exclude_samples_col,exclude_samples_values\nA,group,ctrl;blank\nB,group,\n";

fn split_contrasts_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_split_contrasts"))
}

fn write_inputs(dir: &Path, samples: &str, contrasts: &str) -> (PathBuf, PathBuf, PathBuf) {
    let sample_path = dir.join("samples.csv");
    let contrast_path = dir.join("contrasts.csv");
    let out = dir.join("out");
    fs::write(&sample_path, samples).unwrap();
    fs::write(&contrast_path, contrasts).unwrap();
    fs::create_dir(&out).unwrap();
    (sample_path, contrast_path, out)
}

fn run(args: &[&std::ffi::OsStr]) -> Output {
    Command::new(split_contrasts_bin())
        .args(args)
        .output()
        .expect("Failed to run split_contrasts")
}

fn listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn positional_paths_produce_file_pairs() {
    let temp = TempDir::new().unwrap();
    let (samples, contrasts, out) = write_inputs(temp.path(), SAMPLES, CONTRASTS);

    let output = run(&[
        samples.as_os_str(),
        contrasts.as_os_str(),
        "-o".as_ref(),
        out.as_os_str(),
    ]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(
        listing(&out),
        vec![
            "contrast__A.csv",
            "contrast__B.csv",
            "sample__A.csv",
            "sample__B.csv"
        ]
    );
    assert_eq!(
        fs::read_to_string(out.join("sample__A.csv")).unwrap(),
        "sample,group\r\ns2,treat\r\n"
    );
    assert_eq!(
        fs::read_to_string(out.join("sample__B.csv")).unwrap(),
        "sample,group\r\ns1,ctrl\r\ns2,treat\r\ns3,blank\r\n"
    );
    // default verbosity only reports errors
    assert!(output.stderr.is_empty());
}

#[test]
fn flagged_paths_and_info_logging() {
    let temp = TempDir::new().unwrap();
    let (samples, contrasts, out) = write_inputs(temp.path(), SAMPLES, CONTRASTS);

    let output = run(&[
        "--samples".as_ref(),
        samples.as_os_str(),
        "--contrasts".as_ref(),
        contrasts.as_os_str(),
        "--Output".as_ref(),
        out.as_os_str(),
        "--verbose".as_ref(),
        "info".as_ref(),
    ]);
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("creating contrast files"), "stderr: {stderr}");
    assert!(stderr.contains("task finished"), "stderr: {stderr}");
    assert_eq!(listing(&out).len(), 4);
}

#[test]
fn missing_id_column_exits_with_one() {
    let temp = TempDir::new().unwrap();
    let (samples, contrasts, out) = write_inputs(temp.path(), SAMPLES, "name,group\nA,x\n");

    let output = run(&[
        samples.as_os_str(),
        contrasts.as_os_str(),
        "-o".as_ref(),
        out.as_os_str(),
    ]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR"), "stderr: {stderr}");
    assert!(stderr.contains("'id'"), "stderr: {stderr}");
    assert!(listing(&out).is_empty());
}

#[test]
fn missing_sample_file_exits_with_one() {
    let temp = TempDir::new().unwrap();
    let (_, contrasts, out) = write_inputs(temp.path(), SAMPLES, CONTRASTS);
    let missing = temp.path().join("missing.csv");

    let output = run(&[
        missing.as_os_str(),
        contrasts.as_os_str(),
        "-o".as_ref(),
        out.as_os_str(),
    ]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing.csv"));
    assert!(listing(&out).is_empty());
}

#[test]
fn undetectable_contrasts_dialect_exits_with_one() {
    let temp = TempDir::new().unwrap();
    let (samples, contrasts, out) = write_inputs(temp.path(), SAMPLES, "");

    let output = run(&[
        samples.as_os_str(),
        contrasts.as_os_str(),
        "-o".as_ref(),
        out.as_os_str(),
    ]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("could not detect dialect"), "stderr: {stderr}");
    assert!(listing(&out).is_empty());
}

#[test]
fn version_flag() {
    let output = run(&["-V".as_ref()]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "split_contrasts 1.0.1"
    );
}

#[test]
fn unknown_verbosity_is_a_usage_error() {
    let output = run(&["a.csv".as_ref(), "b.csv".as_ref(), "-v".as_ref(), "loud".as_ref()]);
    assert_eq!(output.status.code(), Some(2));
}
