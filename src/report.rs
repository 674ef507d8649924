use crate::collector::MergeStats;
use crate::pipeline::TargetProgress;
use crate::verifier::{Discrepancy, VerifyStats};
use std::io::{self, Write};
use std::path::PathBuf;

const RULE_WIDTH: usize = 60;
const KIB: f64 = 1024.0;
const MIB: f64 = 1024.0 * 1024.0;

/// Something observable happened in the pipeline
#[derive(Clone, Debug, PartialEq)]
pub enum MergeEvent {
    Discovered { count: usize },
    StaleOutputRemoved { path: PathBuf },
    FileMerged { position: usize, total: usize, name: String, bytes: u64 },
    FileSkipped { name: String, error: String },
    MergeFinished { stats: MergeStats, output: PathBuf },
    TargetChecked(TargetProgress),
    Verified(VerifyStats),
    Discrepancies(Vec<Discrepancy>),
    Failed(String),
}

impl MergeEvent {
    /// Share of the input set walked so far, for `FileMerged`
    pub fn percent(&self) -> Option<f64> {
        match self {
            MergeEvent::FileMerged { position, total, .. } if *total > 0 => {
                Some(*position as f64 / *total as f64 * 100.0)
            }
            _ => None,
        }
    }
}

pub trait Reporter {
    fn on_event(&mut self, event: &MergeEvent);
}

/// Keeps every event, for tests and callers that render later
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub events: Vec<MergeEvent>,
}

impl RecordingReporter {
    pub fn merged_names(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                MergeEvent::FileMerged { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn skipped_names(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                MergeEvent::FileSkipped { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Reporter for RecordingReporter {
    fn on_event(&mut self, event: &MergeEvent) {
        self.events.push(event.clone());
    }
}

/// Human-readable progress and summary
pub struct ConsoleReporter<W: Write> {
    out: W,
}

impl ConsoleReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn banner(&mut self) {
        self.line("Book merge");
        self.line("Merges a directory of text documents into one corpus file for batch benchmarks");
        self.rule();
    }

    pub fn finish(&mut self) {
        self.line("\nAll done.");
    }

    fn line(&mut self, text: &str) {
        let _ = writeln!(self.out, "{}", text);
    }

    fn rule(&mut self) {
        self.line(&"=".repeat(RULE_WIDTH));
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn on_event(&mut self, event: &MergeEvent) {
        match event {
            MergeEvent::Discovered { count } => {
                self.line(&format!("Found {} documents", count));
                self.line("Merging...");
                self.rule();
            }
            MergeEvent::StaleOutputRemoved { path } => {
                self.line(&format!("Removing stale output: {}", path.display()));
            }
            MergeEvent::FileMerged { name, bytes, .. } => {
                let percent = event.percent().unwrap_or(0.0);
                self.line(&format!(
                    "  [{:5.1}%] merged: {} ({} KB)",
                    percent,
                    name,
                    format_kb(*bytes)
                ));
            }
            MergeEvent::FileSkipped { name, error } => {
                self.line(&format!("  error reading {}: {}", name, error));
            }
            MergeEvent::MergeFinished { stats, output } => {
                self.line("");
                self.rule();
                self.line("Merge complete");
                self.line("Statistics:");
                self.line(&format!("   - documents merged: {}", stats.documents));
                self.line(&format!("   - total size: {} MB", format_mb(stats.content_bytes)));
                self.line(&format!("   - elapsed: {:.2} s", stats.elapsed.as_secs_f64()));
                self.line(&format!("   - output file: {}", output.display()));
            }
            MergeEvent::TargetChecked(target) => {
                self.line(&format!("   - size on disk: {} MB", format_mb(target.actual_bytes)));
                let goal = format!("{:.0}", target.target_bytes as f64 / MIB);
                if target.reached() {
                    self.line(&format!("Target of {} MB reached", goal));
                } else {
                    self.line(&format!(
                        "{} MB short of the {} MB target",
                        format_mb(target.remaining_bytes()),
                        goal
                    ));
                }
            }
            MergeEvent::Verified(stats) => {
                self.line("\nVerifying merged file...");
                self.line("Verification:");
                self.line(&format!("   - file size: {} MB", format_mb(stats.byte_size)));
                self.line(&format!("   - documents: {}", stats.markers));
                self.line(&format!("   - lines: {}", format_thousands(stats.lines)));
                self.line(&format!("   - words (approx.): {}", format_thousands(stats.words)));
            }
            MergeEvent::Discrepancies(found) => {
                for discrepancy in found {
                    self.line(&format!("   ! {}", discrepancy));
                }
            }
            MergeEvent::Failed(message) => {
                self.line(&format!("\nMerge failed: {}", message));
            }
        }
    }
}

pub fn format_kb(bytes: u64) -> String {
    format!("{:.1}", bytes as f64 / KIB)
}

pub fn format_mb(bytes: u64) -> String {
    format!("{:.1}", bytes as f64 / MIB)
}

/// 1234567 -> "1,234,567"
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
