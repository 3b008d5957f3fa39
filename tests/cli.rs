//! End-to-end tests of the `asm-qc` binary on small hand-made inputs.
//!
//! Reference: `ref1` (60 bp, one CDS spanning it) and `ref2` (30 bp). Depth is
//! good over all of `ref1` and the first 20 bases of `ref2`. The assembly is a
//! single contig identical to `ref1`.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const REF1: &str = "ATGAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAATAA";
const REF2: &str = "CTAGCTAGCTAGCTAGCTAGCTAGCTAGCT";

const COORDS_HEADER: &str = "/data/a.fa /data/b.fa\nNUCMER\n\n[S1]\t[E1]\t[S2]\t[E2]\t[LEN 1]\t[LEN 2]\t[% IDY]\t[LEN R]\t[LEN Q]\t[FRM]\t[TAGS]\n";

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let fixture = Self {
            dir: TempDir::new().unwrap(),
        };
        fixture.write("ref.fa", &format!(">ref1\n{REF1}\n>ref2\n{REF2}\n"));
        fixture.write(
            "ref.gff",
            "##gff-version 3\nref1\ttest\tgene\t1\t60\t.\t+\t.\tID=gene1\nref1\ttest\tCDS\t1\t60\t.\t+\t0\tID=cds1\n",
        );

        let mut depth = String::from("name\tpos\tfwd\trev\n");
        for pos in 1..=60 {
            depth.push_str(&format!("ref1\t{pos}\t10\t10\n"));
        }
        for pos in 1..=20 {
            depth.push_str(&format!("ref2\t{pos}\t10\t10\n"));
        }
        fixture.write("depth.tsv", &depth);

        fixture.write("contigs.fa", &format!(">ctg1\n{REF1}\n"));
        fixture.write("empty.fa", "");
        fixture.write(
            "contigs_vs_ref.coords",
            &format!("{COORDS_HEADER}1\t60\t1\t60\t60\t60\t100.00\t60\t60\t1\t1\tref1\tctg1\n"),
        );
        fixture.write(
            "cds_vs_contigs.coords",
            &format!("{COORDS_HEADER}1\t60\t1\t60\t60\t60\t100.00\t60\t60\t1\t1\tctg1\tref1:1-60:+\n"),
        );
        fixture
    }

    fn write(&self, name: &str, content: &str) {
        fs::write(self.path(name), content).unwrap();
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn evaluate(&self, assembly: &str) -> Command {
        let mut cmd = Command::cargo_bin("asm-qc").unwrap();
        cmd.arg("evaluate")
            .arg("--reference")
            .arg(self.path("ref.fa"))
            .arg("--gff")
            .arg(self.path("ref.gff"))
            .arg("--assembly")
            .arg(self.path(assembly))
            .arg("--depth")
            .arg(self.path("depth.tsv"));
        cmd
    }

    fn evaluate_with_hits(&self) -> Command {
        let mut cmd = self.evaluate("contigs.fa");
        cmd.arg("--contig-hits")
            .arg(self.path("contigs_vs_ref.coords"))
            .arg("--cds-hits")
            .arg(self.path("cds_vs_contigs.coords"));
        cmd
    }
}

fn stat_line(key: &str, value: u64) -> String {
    format!("{key}\t{value}\n")
}

#[test]
fn test_evaluate_full_run() {
    let fixture = Fixture::new();

    fixture
        .evaluate_with_hits()
        .assert()
        .success()
        .stdout(predicate::str::starts_with(stat_line("ref_bases", 90)))
        .stdout(predicate::str::contains(stat_line("ref_sequences", 2)))
        .stdout(predicate::str::contains(stat_line("ref_bases_assembled", 60)))
        .stdout(predicate::str::contains(stat_line("ref_sequences_assembled", 1)))
        .stdout(predicate::str::contains(stat_line("ref_sequences_assembled_ok", 1)))
        .stdout(predicate::str::contains(stat_line("ref_bases_assembler_missed", 20)))
        .stdout(predicate::str::contains(stat_line("assembly_bases", 60)))
        .stdout(predicate::str::contains(stat_line("assembly_bases_in_ref", 60)))
        .stdout(predicate::str::contains(stat_line("assembly_contigs_hit_ref", 1)))
        .stdout(predicate::str::contains(stat_line("cds_number", 1)))
        .stdout(predicate::str::contains(stat_line("cds_assembled", 1)))
        .stdout(predicate::str::contains(stat_line("cds_assembled_ok", 1)));
}

#[test]
fn test_evaluate_empty_assembly() {
    let fixture = Fixture::new();

    fixture
        .evaluate("empty.fa")
        .assert()
        .success()
        .stdout(predicate::str::contains(stat_line("ref_bases_assembled", 0)))
        .stdout(predicate::str::contains(stat_line("ref_bases_assembler_missed", 80)))
        .stdout(predicate::str::contains(stat_line("assembly_contigs", 0)))
        .stdout(predicate::str::contains(stat_line("cds_number", 1)))
        .stdout(predicate::str::contains(stat_line("cds_assembled", 0)));
}

#[test]
fn test_evaluate_tsv_format() {
    let fixture = Fixture::new();

    let output = fixture
        .evaluate("empty.fa")
        .args(["--format", "tsv"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("ref_bases\tref_sequences\t"));
    assert!(lines[0].ends_with("cds_assembled\tcds_assembled_ok"));
    assert!(lines[1].starts_with("90\t2\t0\t"));
}

#[test]
fn test_evaluate_json_format() {
    let fixture = Fixture::new();

    let output = fixture
        .evaluate_with_hits()
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["stats"]["cds_assembled_ok"], 1);
    assert_eq!(report["plot_order"][0], "ctg1");
    assert_eq!(report["reference"]["sequences"][1]["id"], "ref2");
    assert_eq!(report["reference"]["sequences"][1]["offset"], 60);
    assert_eq!(report["gaps"][1]["should_have_assembled"][0]["end"], 19);
    assert!(report["metadata"]["generated_at"].is_string());
}

#[test]
fn test_evaluate_writes_output_files() {
    let fixture = Fixture::new();
    let prefix = fixture.path("out");

    fixture
        .evaluate_with_hits()
        .arg("--output-prefix")
        .arg(&prefix)
        .assert()
        .success();

    let text = fs::read_to_string(fixture.path("out.stats.txt")).unwrap();
    assert!(text.starts_with("ref_bases\t90\n"));
    assert_eq!(text.lines().count(), 14);

    let tsv = fs::read_to_string(fixture.path("out.stats.tsv")).unwrap();
    assert_eq!(tsv.lines().count(), 2);

    let json = fs::read_to_string(fixture.path("out.qc.json")).unwrap();
    let report: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(report["stats"]["ref_bases"], 90);
}

#[test]
fn test_evaluate_requires_hits_for_non_empty_assembly() {
    let fixture = Fixture::new();

    fixture
        .evaluate("contigs.fa")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "--contig-hits is required when the assembly is not empty",
        ));
}

#[test]
fn test_evaluate_rejects_both_depth_sources() {
    let fixture = Fixture::new();

    fixture
        .evaluate("empty.fa")
        .arg("--reads-bam")
        .arg(fixture.path("reads.bam"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("--depth"));
}

#[test]
fn test_evaluate_missing_input_file() {
    let fixture = Fixture::new();

    fixture
        .evaluate("no_such_assembly.fa")
        .assert()
        .failure()
        .stderr(predicate::str::contains("assembly file not found"));
}

#[test]
fn test_evaluate_rejects_unknown_cds_hit() {
    let fixture = Fixture::new();
    fixture.write(
        "cds_vs_contigs.coords",
        &format!("{COORDS_HEADER}1\t60\t1\t60\t60\t60\t100.00\t60\t60\t1\t1\tctg1\tref1:5-60:+\n"),
    );

    fixture
        .evaluate_with_hits()
        .assert()
        .failure()
        .stderr(predicate::str::contains("ref1:5-60:+"));
}

#[test]
fn test_extract_cds() {
    let fixture = Fixture::new();
    fixture.write(
        "ref.gff",
        "ref1\ttest\tCDS\t1\t60\t.\t+\t0\tID=cds1\nref2\ttest\tCDS\t1\t6\t.\t-\t0\tID=cds2\n",
    );
    let output = fixture.path("cds.fa");

    Command::cargo_bin("asm-qc")
        .unwrap()
        .arg("extract-cds")
        .arg("--reference")
        .arg(fixture.path("ref.fa"))
        .arg("--gff")
        .arg(fixture.path("ref.gff"))
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 2 CDS (66 bases)"));

    let fasta = fs::read_to_string(&output).unwrap();
    assert!(fasta.contains(&format!(">ref1:1-60:+\n{REF1}\n")));
    // CTAGCT reverse complemented
    assert!(fasta.contains(">ref2:1-6:-\nAGCTAG\n"));
}

#[test]
fn test_extract_cds_missing_reference() {
    let dir = TempDir::new().unwrap();
    let missing = Path::new("/no/such/ref.fa");

    Command::cargo_bin("asm-qc")
        .unwrap()
        .args(["extract-cds", "--gff"])
        .arg(dir.path().join("ref.gff"))
        .arg("--reference")
        .arg(missing)
        .arg("--output")
        .arg(dir.path().join("cds.fa"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("reference file not found"));
}
