//! End-to-end tests of the `ref-reader` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// `>chr1\nACGTACGT\nTTGG\n>chr2\nCCCCAAAA\n` with its index
fn fixture() -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let fasta = dir.path().join("ref.fa");
    std::fs::write(&fasta, ">chr1\nACGTACGT\nTTGG\n>chr2\nCCCCAAAA\n").unwrap();
    std::fs::write(
        dir.path().join("ref.fa.fai"),
        "chr1\t12\t6\t8\t9\nchr2\t8\t26\t8\t9\n",
    )
    .unwrap();
    (dir, fasta)
}

fn ref_reader() -> Command {
    Command::cargo_bin("ref-reader").unwrap()
}

#[test]
fn test_query_text_output() {
    let (_dir, fasta) = fixture();

    ref_reader()
        .arg("query")
        .arg(&fasta)
        .arg("chr1:7-10")
        .assert()
        .success()
        .stdout(">chr1:7-10\nGTTT\n");
}

#[test]
fn test_query_whole_contig() {
    let (_dir, fasta) = fixture();

    ref_reader()
        .args(["query", fasta.to_str().unwrap(), "chr2", "--cache-size", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CCCCAAAA"));
}

#[test]
fn test_query_json_output() {
    let (_dir, fasta) = fixture();

    let output = ref_reader()
        .args(["query", fasta.to_str().unwrap(), "chr1:1-4", "chr2:5-8", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json[0]["bases"], "ACGT");
    assert_eq!(json[0]["region"]["start"], 0);
    assert_eq!(json[1]["bases"], "AAAA");
    assert_eq!(json[1]["region"]["reference_name"], "chr2");
}

#[test]
fn test_query_tsv_output() {
    let (_dir, fasta) = fixture();

    ref_reader()
        .args(["query", fasta.to_str().unwrap(), "chr1:9-12", "-f", "tsv"])
        .assert()
        .success()
        .stdout("name\tstart\tend\tbases\nchr1\t8\t12\tTTGG\n");
}

#[test]
fn test_query_unknown_contig_fails() {
    let (_dir, fasta) = fixture();

    ref_reader()
        .args(["query", fasta.to_str().unwrap(), "chrZ:1-2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown reference_name: chrZ"));
}

#[test]
fn test_query_out_of_bounds_fails() {
    let (_dir, fasta) = fixture();

    ref_reader()
        .args(["query", fasta.to_str().unwrap(), "chr2:5-9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot query region"));
}

#[test]
fn test_query_missing_index_fails() {
    let (dir, fasta) = fixture();
    std::fs::remove_file(dir.path().join("ref.fa.fai")).unwrap();

    ref_reader()
        .args(["query", fasta.to_str().unwrap(), "chr1:1-2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn test_query_explicit_index_path() {
    let (dir, fasta) = fixture();
    let fai = dir.path().join("elsewhere.fai");
    std::fs::rename(dir.path().join("ref.fa.fai"), &fai).unwrap();

    ref_reader()
        .args(["query", fasta.to_str().unwrap(), "chr2:1-2", "--fai", fai.to_str().unwrap()])
        .assert()
        .success()
        .stdout(">chr2:1-2\nCC\n");
}

#[test]
fn test_contigs_tsv() {
    let (_dir, fasta) = fixture();

    ref_reader()
        .args(["contigs", fasta.to_str().unwrap(), "--format", "tsv"])
        .assert()
        .success()
        .stdout("name\tlength\tposition_in_file\nchr1\t12\t0\nchr2\t8\t1\n");
}

#[test]
fn test_contigs_json() {
    let (_dir, fasta) = fixture();

    let output = ref_reader()
        .args(["contigs", fasta.to_str().unwrap(), "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json.as_array().map(Vec::len), Some(2));
    assert_eq!(json[1]["name"], "chr2");
    assert_eq!(json[1]["length"], 8);
}

#[test]
fn test_verbose_logs_through_tracing_once() {
    let (_dir, fasta) = fixture();

    let output = ref_reader()
        .args(["contigs", fasta.to_str().unwrap(), "--verbose"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("2 contigs").count(), 1, "stderr: {stderr}");
    assert!(stderr.contains("Loaded FASTA index"));
}

#[test]
fn test_quiet_by_default() {
    let (_dir, fasta) = fixture();

    ref_reader()
        .args(["query", fasta.to_str().unwrap(), "chr1:1-4"])
        .assert()
        .success()
        .stderr("");
}
