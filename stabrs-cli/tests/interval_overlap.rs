use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use flate2::read::MultiGzDecoder;
use pretty_assertions::assert_eq;
use rstest::*;
use tempfile::TempDir;

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_intervalOverlap"))
        .args(args)
        .output()
        .expect("failed to launch intervalOverlap")
}

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

/// Run against `select.bed` and `query.bed` and return the output file's contents.
fn overlap(select: &str, query: &str, flags: &[&str]) -> String {
    let dir = TempDir::new().unwrap();
    let select = write(dir.path(), "select.bed", select);
    let query = write(dir.path(), "query.bed", query);
    let out = dir.path().join("out.bed");

    let mut args: Vec<&str> = flags.to_vec();
    args.extend([
        select.to_str().unwrap(),
        query.to_str().unwrap(),
        out.to_str().unwrap(),
    ]);
    let output = run(&args);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    fs::read_to_string(out).unwrap()
}

#[rstest]
#[case("any", "chr1\t15\t25\n")]
#[case("within", "")]
#[case("s", "")]
#[case("o", "chr1\t15\t25\n")]
#[case("oi", "")]
fn test_partial_overlap(#[case] relationship: &str, #[case] expected: &str) {
    let out = overlap(
        "chr1\t10\t20\n",
        "chr1\t15\t25\n",
        &["--relationship", relationship],
    );
    assert_eq!(out, expected);
}

#[rstest]
#[case("m", "chr1\t20\t30\n")]
#[case("any", "chr1\t20\t30\n")]
#[case("o", "")]
#[case("mi", "")]
fn test_adjacent_intervals(#[case] relationship: &str, #[case] expected: &str) {
    let out = overlap(
        "chr1\t10\t20\n",
        "chr1\t20\t30\n",
        &["--relationship", relationship],
    );
    assert_eq!(out, expected);
}

#[rstest]
fn test_non_overlap_mode() {
    let out = overlap(
        "chr1\t0\t5\n",
        "chr1\t10\t15\nchr1\t2\t3\nchr2\t0\t5\n",
        &["--nonOverlap"],
    );
    assert_eq!(out, "chr1\t10\t15\nchr2\t0\t5\n");
}

#[rstest]
fn test_merged_output_lists_matches() {
    let out = overlap(
        "chr1\t0\t10\tA\nchr1\t5\t15\tB\nchr1\t100\t200\tC\n",
        "chr1\t8\t9\tq1\nchr1\t50\t60\tq2\n",
        &["--mergedOutput"],
    );
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "chr1\t8\t9\tq1");
    let mut hits = lines[1..].to_vec();
    hits.sort();
    assert_eq!(hits, vec!["chr1\t0\t10\tA", "chr1\t5\t15\tB"]);
}

#[rstest]
fn test_aggregate_reports_cluster_once() {
    let select = "chr1\t1\t8\tA\nchr1\t3\t5\tB\nchr1\t6\t11\tC\nchr1\t50\t60\tD\n";
    let query = "chr1\t4\t7\tq\n";

    let plain = overlap(select, query, &["--mergedOutput"]);
    assert_eq!(plain.lines().count(), 4);

    let aggregated = overlap(select, query, &["--mergedOutput", "--aggregate"]);
    assert_eq!(
        aggregated,
        "chr1\t4\t7\tq\nchr1\t1\t8\tA\nchr1\t3\t5\tB\nchr1\t6\t11\tC\n"
    );
}

#[rstest]
#[case(&["--threads", "4"])]
#[case(&["--threads", "1"])]
fn test_output_keeps_query_order(#[case] flags: &[&str]) {
    let select: String = (0..50).map(|i| format!("chr1\t{}\t{}\n", i * 100, i * 100 + 50)).collect();
    let query: String = (0..2000)
        .map(|i| format!("chr1\t{}\t{}\n", (i * 37) % 5000, (i * 37) % 5000 + 10))
        .collect();

    let out = overlap(&select, &query, &[flags, &["--nonOverlap"][..]].concat());
    let single = overlap(&select, &query, &["--nonOverlap"]);
    assert_eq!(out, single);
}

#[rstest]
fn test_vcf_query_keeps_header_and_gzips_output() {
    let dir = TempDir::new().unwrap();
    let select = write(dir.path(), "genes.bed", "chr1\t90\t150\n");
    let query = write(
        dir.path(),
        "calls.vcf",
        "##fileformat=VCFv4.2\n#CHROM\tPOS\tID\tREF\tALT\nchr1\t100\t.\tA\tG\nchr1\t500\t.\tC\tT\n",
    );
    let out = dir.path().join("hits.vcf.gz");

    let output = run(&[
        select.to_str().unwrap(),
        query.to_str().unwrap(),
        out.to_str().unwrap(),
    ]);
    assert!(output.status.success());

    let mut text = String::new();
    MultiGzDecoder::new(fs::File::open(&out).unwrap())
        .read_to_string(&mut text)
        .unwrap();
    assert_eq!(
        text,
        "##fileformat=VCFv4.2\n#CHROM\tPOS\tID\tREF\tALT\nchr1\t100\t.\tA\tG\n"
    );
}

#[rstest]
fn test_print_relationships() {
    let output = run(&["--printRelationships"]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    for code in ["oi", "di", "mi", "si", "fi", "gt", "lt", "any", "within", "equal"] {
        assert!(stdout.contains(code), "missing {code}");
    }
}

#[rstest]
fn test_incompatible_modes_rejected_before_io() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out.bed");
    let output = run(&[
        "--mergedOutput",
        "--nonOverlap",
        "missing_select.bed",
        "missing_query.bed",
        out.to_str().unwrap(),
    ]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("mutually exclusive"));
    assert!(!out.exists());
}

#[rstest]
fn test_invalid_relationship() {
    let output = run(&["--relationship", "near", "a.bed", "b.bed", "c.bed"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid relationship: 'near'"));
}

#[rstest]
#[case("select.bam", "query.bed")]
#[case("select.bed", "query.txt")]
fn test_unsupported_extension(#[case] select: &str, #[case] query: &str) {
    let dir = TempDir::new().unwrap();
    let select = write(dir.path(), select, "chr1\t1\t2\n");
    let query = write(dir.path(), query, "chr1\t1\t2\n");
    let out = dir.path().join("out.bed");

    let output = run(&[
        select.to_str().unwrap(),
        query.to_str().unwrap(),
        out.to_str().unwrap(),
    ]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unsupported file type"));
    assert!(!out.exists());
}

#[rstest]
fn test_wrong_argument_count() {
    assert!(!run(&["a.bed", "b.bed"]).status.success());
    assert!(!run(&["a.bed", "b.bed", "c.bed", "d.bed"]).status.success());
}

#[rstest]
fn test_malformed_query_fails() {
    let dir = TempDir::new().unwrap();
    let select = write(dir.path(), "select.bed", "chr1\t1\t2\n");
    let query = write(dir.path(), "query.bed", "chr1\t1\t2\nchr1\tten\t20\n");
    let out = dir.path().join("out.bed");

    let output = run(&[
        select.to_str().unwrap(),
        query.to_str().unwrap(),
        out.to_str().unwrap(),
    ]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("line 2"));
}
