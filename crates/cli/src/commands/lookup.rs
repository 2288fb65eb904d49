//! Lookup command handler.
//!
//! Opens the corpus, runs one lookup and prints the neighbors.

use clap::Args;
use neighbors_core::{config::AppConfig, AppResult};
use neighbors_lookup::{Corpus, LookupReport};
use std::io::Write;

/// Look up the nearest documents of one document
#[derive(Args, Debug)]
pub struct LookupCommand {
    /// Row id of the document (line number in the id table, from 0)
    pub doc_num: usize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl LookupCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::debug!(
            "Looking up top-{} neighbors of document {}",
            config.top_k,
            self.doc_num
        );

        // Everything that can fail happens before the first line is printed.
        let corpus = Corpus::open(&config.id_table_path(), &config.index_path())?;
        let report = corpus.lookup(self.doc_num, config.top_k)?;

        let mut out = std::io::stdout().lock();
        if self.json {
            write_json(&mut out, &report)?;
        } else {
            write_text(&mut out, &report)?;
        }
        out.flush()?;

        Ok(())
    }
}

/// Header line, then one label per neighbor.
fn write_text(out: &mut impl Write, report: &LookupReport) -> AppResult<()> {
    writeln!(out, "[target doc: {} ]", report.target.label)?;
    for label in report.labels() {
        writeln!(out, "{}", label)?;
    }
    Ok(())
}

fn write_json(out: &mut impl Write, report: &LookupReport) -> AppResult<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use neighbors_lookup::{Metric, RankedNeighbor, TargetDoc};

    fn report() -> LookupReport {
        let neighbor = |rank, row, distance, label: &str| RankedNeighbor {
            rank,
            row,
            distance,
            label: label.to_string(),
        };
        LookupReport {
            target: TargetDoc {
                row: 0,
                label: "docA".to_string(),
            },
            metric: Metric::L2,
            exact: true,
            top_k: 2,
            neighbors: vec![neighbor(1, 0, 0.0, "docA"), neighbor(2, 1, 1.5, "docB")],
        }
    }

    #[test]
    fn test_text_output() {
        let mut buf = Vec::new();
        write_text(&mut buf, &report()).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "[target doc: docA ]\ndocA\ndocB\n"
        );
    }

    #[test]
    fn test_json_output() {
        let mut buf = Vec::new();
        write_json(&mut buf, &report()).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["target"]["label"], "docA");
        assert_eq!(value["metric"], "l2");
        assert_eq!(value["topK"], 2);
        assert_eq!(value["neighbors"][1]["label"], "docB");
        assert_eq!(value["neighbors"][1]["distance"], 1.5);
    }
}
