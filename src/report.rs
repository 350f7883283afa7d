//! Machine-readable record of one run.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{label_grid, Analysis, Representatives, Result, Summary};

/// Everything a renderer needs to lay out a report for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Where the text came from (path, URL, `-` for stdin).
    pub source: String,
    /// Theme per cluster label.
    pub themes: BTreeMap<usize, String>,
    /// The final summary.
    pub summary: String,
    /// Cluster label per chunk.
    pub labels: Vec<usize>,
    /// `labels` rendered by [`label_grid`].
    pub label_grid: String,
    /// Representative chunk indices per cluster.
    pub representatives: Vec<Representatives>,
    /// Chunk statistics and the reduction ratio.
    pub analysis: Analysis,
}

impl Report {
    /// Build a report from a finished summary.
    #[must_use]
    pub fn new(source: impl Into<String>, summary: &Summary) -> Self {
        Self {
            source: source.into(),
            themes: summary.themes.clone(),
            summary: summary.summary.clone(),
            labels: summary.labels().to_vec(),
            label_grid: label_grid(summary.labels()),
            representatives: summary.selection.representatives.clone(),
            analysis: summary.analysis.clone(),
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| std::io::Error::from(e).into())
    }

    /// Write pretty-printed JSON to `path`.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Report {
        Report {
            source: "speech.txt".into(),
            themes: BTreeMap::from([(0, "Economy".into()), (1, "unrelated".into())]),
            summary: "A speech.".into(),
            labels: vec![0, 0, 1],
            label_grid: "0 0 1".into(),
            representatives: vec![Representatives {
                label: 0,
                indices: vec![1, 0],
            }],
            analysis: Analysis {
                word_count_per_chunk: vec![80, 90, 10],
                total_chunks: 3,
                total_words: 180,
                words_sent: 90,
                reduction_ratio: 0.5,
                total_tokens: Some(240),
                tokens_sent: Some(118),
            },
        }
    }

    #[test]
    fn test_json_keys() {
        let json = sample().to_json_pretty().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["themes"]["0"], "Economy");
        assert_eq!(value["analysis"]["total_words"], 180);
        assert_eq!(value["representatives"][0]["indices"][0], 1);
        assert_eq!(value["analysis"]["tokens_sent"], 118);
    }

    #[test]
    fn test_write_json() {
        let path = std::env::temp_dir().join(format!("precis-report-{}.json", std::process::id()));
        let report = sample();
        report.write_json(&path).unwrap();

        let read: Report = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(read, report);
    }
}
