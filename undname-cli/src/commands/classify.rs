use std::{collections::BTreeMap, path::Path};

use anyhow::Context;
use serde::Serialize;
use undname::{
    classify::{group_by_class, CategoryCounts},
    decode_all,
};

use crate::{
    app::GlobalOptions,
    output::{emit, Align, Report, TabWriter},
};

#[derive(Debug, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct ClassifyReport {
    pub total: usize,
    pub counts: Vec<CategoryCount>,
    pub classes: BTreeMap<String, Vec<String>>,
}

impl Report for ClassifyReport {
    fn print_text(&self) {
        println!("{} symbols", self.total);
        println!();

        let mut tw =
            TabWriter::new(&[("Category", Align::Left), ("Count", Align::Right)]).indent("  ");
        for entry in self.counts.iter().filter(|entry| entry.count > 0) {
            tw.row([entry.category.clone(), entry.count.to_string()]);
        }
        tw.print();

        for (class, members) in &self.classes {
            println!();
            println!("{class} ({})", members.len());
            for member in members {
                println!("  {member}");
            }
        }
    }
}

/// Read one symbol per line, skipping blank lines.
fn read_symbols(path: &Path) -> anyhow::Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read symbol list: {}", path.display()))?;

    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}

pub fn run(path: &Path, opts: &GlobalOptions) -> anyhow::Result<()> {
    let symbols = read_symbols(path)?;
    log::debug!("classifying {} symbols from {}", symbols.len(), path.display());

    let decoded = decode_all(&symbols);
    let counts = CategoryCounts::from_symbols(&decoded);

    let report = ClassifyReport {
        total: counts.total(),
        counts: counts
            .iter()
            .map(|(category, count)| CategoryCount {
                category: category.to_string(),
                count,
            })
            .collect(),
        classes: group_by_class(&decoded)
            .into_iter()
            .map(|(class, members)| {
                let rendered = members.iter().map(ToString::to_string).collect();
                (class, rendered)
            })
            .collect(),
    };

    emit(&report, opts)
}
