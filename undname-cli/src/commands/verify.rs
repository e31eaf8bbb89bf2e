use std::path::PathBuf;

use anyhow::Context;
use serde::Serialize;
use undname::fixtures::{load_fixtures, verify};

use crate::{
    app::GlobalOptions,
    output::{emit, Align, Report, TabWriter},
};

#[derive(Debug, Serialize)]
pub struct FileResult {
    pub path: String,
    pub total: usize,
    pub passed: usize,
    pub mismatches: Vec<MismatchInfo>,
}

#[derive(Debug, Serialize)]
pub struct MismatchInfo {
    pub line: usize,
    pub symbol: String,
    pub expected: String,
    pub actual: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyReport {
    pub files: Vec<FileResult>,
}

impl VerifyReport {
    fn failed(&self) -> usize {
        self.files.iter().map(|file| file.mismatches.len()).sum()
    }
}

impl Report for VerifyReport {
    fn print_text(&self) {
        for file in &self.files {
            for mismatch in &file.mismatches {
                println!("{}:{}: {}", file.path, mismatch.line, mismatch.symbol);
                println!("  expected: {}", mismatch.expected);
                println!("  actual:   {}", mismatch.actual);
            }
        }

        let mut tw = TabWriter::new(&[
            ("Fixture", Align::Left),
            ("Passed", Align::Right),
            ("Total", Align::Right),
        ]);
        for file in &self.files {
            tw.row([
                file.path.clone(),
                file.passed.to_string(),
                file.total.to_string(),
            ]);
        }
        tw.print();
    }
}

pub fn run(paths: &[PathBuf], opts: &GlobalOptions) -> anyhow::Result<()> {
    let mut report = VerifyReport {
        files: Vec::with_capacity(paths.len()),
    };

    for path in paths {
        let cases = load_fixtures(path)
            .with_context(|| format!("failed to load fixtures: {}", path.display()))?;
        let result = verify(&cases);
        log::debug!(
            "{}: {}/{} passed",
            path.display(),
            result.passed(),
            result.total
        );

        report.files.push(FileResult {
            path: path.display().to_string(),
            total: result.total,
            passed: result.passed(),
            mismatches: result
                .mismatches
                .into_iter()
                .map(|m| MismatchInfo {
                    line: m.line,
                    symbol: m.symbol,
                    expected: m.expected,
                    actual: m.actual,
                })
                .collect(),
        });
    }

    emit(&report, opts)?;

    let failed = report.failed();
    if failed > 0 {
        anyhow::bail!("{failed} fixture case(s) did not match");
    }
    Ok(())
}
