//! Skip report artifact.
//!
//! After a dispatch run, the skipped contacts are persisted to a
//! timestamped plain-text file. The report is write-once; reruns get a
//! fresh file name.

use crate::models::DispatchSummary;
use chrono::Local;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Derived, write-once summary of skipped contacts.
#[derive(Debug, Clone, PartialEq)]
pub struct SkipReport {
    total: usize,
    skipped: Vec<(String, String)>,
}

impl SkipReport {
    /// Build a report from a finished dispatch run. Skipped contacts keep
    /// their original batch order.
    pub fn from_summary(summary: &DispatchSummary) -> Self {
        Self {
            total: summary.total,
            skipped: summary
                .skipped
                .iter()
                .map(|s| (s.name.clone(), s.phone.clone()))
                .collect(),
        }
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// Share of skipped contacts, in percent. A zero-contact batch has
    /// nothing to divide by and reports 0.
    pub fn percentage_skipped(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.skipped.len() as f64 / self.total as f64) * 100.0
    }

    /// Render the report body.
    pub fn render(&self) -> String {
        let mut out = format!("Skipped phone numbers: {}\n", self.skipped.len());
        for (name, phone) in &self.skipped {
            out.push_str(&format!("{} -> {}\n", name, phone));
        }
        out.push_str(&format!(
            "Percentage skipped phone numbers: {:.2}%\n",
            self.percentage_skipped()
        ));
        out
    }

    /// Write the report into `dir` under a timestamped name and return the
    /// full path. The sortable timestamp keeps runs from colliding.
    pub fn write_to_dir(&self, dir: &Path) -> io::Result<PathBuf> {
        let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
        let path = dir.join(format!("skipped_contacts_{}.txt", timestamp));
        fs::write(&path, self.render())?;
        Ok(path)
    }
}
