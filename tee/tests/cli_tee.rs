//! CLI tests for the `tee` binary.
//!
//! Spawns the binary with piped stdin and verifies standard output, the
//! destination file, and exit codes.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use std::thread;

use tee::exit_codes;
use tee::test_support::scratch_file;

fn run_tee(args: &[&str], input: &[u8]) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_tee"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn tee");
    let mut stdin = child.stdin.take().expect("stdin piped");
    let input = input.to_vec();
    // Feed stdin from a separate thread so a full stdout pipe cannot deadlock
    // the test. Failed runs may exit without reading, so write errors are
    // expected there.
    let feeder = thread::spawn(move || {
        let _ = stdin.write_all(&input);
    });
    let output = child.wait_with_output().expect("wait tee");
    feeder.join().expect("stdin feeder");
    output
}

fn run_to(path: &Path, extra: &[&str], input: &[u8]) -> Output {
    let path = path.to_str().expect("utf-8 path");
    let mut args = extra.to_vec();
    args.push(path);
    run_tee(&args, input)
}

#[test]
fn copies_lines_to_stdout_and_file() {
    let (_dir, path) = scratch_file("out.txt").expect("scratch");
    let output = run_to(&path, &[], b"a\nb\n");

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert_eq!(output.stdout, b"a\nb\n");
    assert_eq!(fs::read(&path).expect("read"), b"a\nb\n");
}

#[test]
fn final_line_without_newline_is_copied_as_is() {
    let (_dir, path) = scratch_file("out.txt").expect("scratch");
    let output = run_to(&path, &[], b"a\nb");

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert_eq!(output.stdout, b"a\nb");
    assert_eq!(fs::read(&path).expect("read"), b"a\nb");
}

#[test]
fn empty_input_creates_empty_file() {
    let (_dir, path) = scratch_file("out.txt").expect("scratch");
    let output = run_to(&path, &[], b"");

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert!(output.stdout.is_empty());
    assert_eq!(fs::read(&path).expect("read"), b"");
}

#[test]
fn empty_input_truncates_existing_file() {
    let (_dir, path) = scratch_file("out.txt").expect("scratch");
    fs::write(&path, "stale\n").expect("seed");
    let output = run_to(&path, &[], b"");

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert_eq!(fs::read(&path).expect("read"), b"");
}

#[test]
fn overwrite_mode_is_idempotent() {
    let (_dir, path) = scratch_file("out.txt").expect("scratch");
    let input = b"first line\nsecond line\n";

    run_to(&path, &[], input);
    let once = fs::read(&path).expect("read");
    run_to(&path, &[], input);
    let twice = fs::read(&path).expect("read");

    assert_eq!(once, input);
    assert_eq!(twice, once);
}

#[test]
fn append_mode_concatenates_runs() {
    let (_dir, path) = scratch_file("out.txt").expect("scratch");

    let first = run_to(&path, &["-a"], b"one\n");
    let second = run_to(&path, &["--append"], b"two\n");

    assert_eq!(first.stdout, b"one\n");
    assert_eq!(second.stdout, b"two\n");
    assert_eq!(fs::read(&path).expect("read"), b"one\ntwo\n");
}

#[test]
fn filepath_option_names_the_destination() {
    let (_dir, path) = scratch_file("out.txt").expect("scratch");
    let output = run_to(&path, &["--filepath"], b"x\n");

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert_eq!(fs::read(&path).expect("read"), b"x\n");
}

#[test]
fn extra_positionals_are_ignored() {
    let (dir, path) = scratch_file("out.txt").expect("scratch");
    let ignored = dir.path().join("ignored.txt");
    let output = run_tee(
        &[
            path.to_str().expect("utf-8 path"),
            ignored.to_str().expect("utf-8 path"),
        ],
        b"x\n",
    );

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert_eq!(fs::read(&path).expect("read"), b"x\n");
    assert!(!ignored.exists());
}

#[test]
fn missing_path_fails_with_invalid_argument() {
    let output = run_tee(&[], b"never read\n");

    assert_eq!(output.status.code(), Some(exit_codes::FAILURE));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid argument"), "stderr: {stderr}");
}

#[test]
fn unopenable_destination_fails() {
    let (dir, _) = scratch_file("unused").expect("scratch");
    let path = dir.path().join("missing").join("out.txt");
    let output = run_to(&path, &[], b"a\n");

    assert_eq!(output.status.code(), Some(exit_codes::FAILURE));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot open"), "stderr: {stderr}");
}

#[test]
fn invalid_config_fails_before_copying() {
    let (dir, path) = scratch_file("out.txt").expect("scratch");
    let config = dir.path().join("tee.toml");
    fs::write(&config, "retry_limit = 0\n").expect("write config");

    let output = run_to(
        &path,
        &["--config", config.to_str().expect("utf-8 path")],
        b"a\n",
    );

    assert_eq!(output.status.code(), Some(exit_codes::FAILURE));
    assert!(!path.exists());
}

#[test]
fn large_input_is_copied_exactly() {
    let (_dir, path) = scratch_file("out.txt").expect("scratch");
    let input: Vec<u8> = (0..20_000)
        .flat_map(|i| format!("{i:08}\n").into_bytes())
        .collect();
    let output = run_to(&path, &[], &input);

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert_eq!(output.stdout, input);
    assert_eq!(fs::read(&path).expect("read"), input);
}
