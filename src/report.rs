//! Run totals and the human readable summary printed at the end.

use std::{fmt, time::Duration};

use crate::{batch::BatchOutcome, clients::entities::DownloadedFile};

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Renders a byte count with binary prefixes and two decimals, e.g. `1.50 KB`.
#[allow(clippy::cast_precision_loss)]
pub fn format_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    for unit in UNITS {
        if size < 1024.0 {
            return format!("{size:.2} {unit}");
        }
        size /= 1024.0;
    }
    format!("{size:.2} PB")
}

/// Counts for one collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSummary {
    pub name: String,
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub size: u64,
}

/// Totals of a whole run.
#[derive(Debug, Default, Clone)]
pub struct SyncReport {
    pub elapsed: Duration,
    pub collections: Vec<CollectionSummary>,
    pub files: Vec<DownloadedFile>,
    pub total_size: u64,
}

impl SyncReport {
    pub fn record(&mut self, name: &str, outcome: BatchOutcome) {
        self.collections.push(CollectionSummary {
            name: name.to_string(),
            downloaded: outcome.files.len(),
            skipped: outcome.skipped,
            failed: outcome.failed,
            size: outcome.total_size,
        });
        self.total_size += outcome.total_size;
        self.files.extend(outcome.files);
    }

    pub fn total_files(&self) -> usize {
        self.files.len()
    }
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(50);
        for c in &self.collections {
            writeln!(
                f,
                "{}: {} downloaded ({}), {} skipped, {} failed",
                c.name,
                c.downloaded,
                format_size(c.size),
                c.skipped,
                c.failed
            )?;
        }
        writeln!(f, "{rule}")?;
        writeln!(f, "Download Summary:")?;
        writeln!(f, "Total time: {:.2} seconds", self.elapsed.as_secs_f64())?;
        writeln!(f, "Total files downloaded: {}", self.total_files())?;
        writeln!(f, "Total size downloaded: {}", format_size(self.total_size))?;
        write!(f, "{rule}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn formats_sizes() {
        assert_eq!(format_size(0), "0.00 B");
        assert_eq!(format_size(1023), "1023.00 B");
        assert_eq!(format_size(1024), "1.00 KB");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(1024 * 1024), "1.00 MB");
        assert_eq!(format_size(1024u64.pow(3)), "1.00 GB");
        assert_eq!(format_size(1024u64.pow(4)), "1.00 TB");
        assert_eq!(format_size(1024u64.pow(5)), "1.00 PB");
        assert_eq!(format_size(3 * 1024u64.pow(6)), "3072.00 PB");
    }

    #[test]
    fn unit_escalates_at_each_boundary() {
        for (exp, unit) in ["KB", "MB", "GB", "TB"].into_iter().enumerate() {
            let boundary = 1024u64.pow(u32::try_from(exp).unwrap() + 1);
            assert!(format_size(boundary - 1).ends_with(UNITS[exp]));
            assert!(format_size(boundary).ends_with(&format!(" {unit}")));
        }
    }

    #[test]
    fn aggregates_collections() {
        let mut report = SyncReport::default();
        report.record(
            "Liked Songs",
            BatchOutcome {
                total_size: 2048,
                files: vec![DownloadedFile {
                    path: PathBuf::from("a.mp3"),
                    size: 2048,
                }],
                skipped: 3,
                failed: 1,
            },
        );
        report.record(
            "Road Trip",
            BatchOutcome {
                total_size: 1024,
                files: vec![DownloadedFile {
                    path: PathBuf::from("b.mp3"),
                    size: 1024,
                }],
                skipped: 0,
                failed: 0,
            },
        );

        assert_eq!(report.total_files(), 2);
        assert_eq!(report.total_size, 3072);
        assert_eq!(report.collections[0].skipped, 3);
    }

    #[test]
    fn renders_summary_block() {
        let mut report = SyncReport {
            elapsed: Duration::from_millis(12_340),
            ..SyncReport::default()
        };
        report.record(
            "Liked Songs",
            BatchOutcome {
                total_size: 1536,
                files: vec![DownloadedFile {
                    path: PathBuf::from("a.mp3"),
                    size: 1536,
                }],
                skipped: 1,
                failed: 0,
            },
        );

        let rendered = report.to_string();
        assert!(rendered.contains("Liked Songs: 1 downloaded (1.50 KB), 1 skipped, 0 failed"));
        assert!(rendered.contains("Download Summary:"));
        assert!(rendered.contains("Total time: 12.34 seconds"));
        assert!(rendered.contains("Total files downloaded: 1"));
        assert!(rendered.contains("Total size downloaded: 1.50 KB"));
    }
}
