use bookmerge::config::MergeConfig;
use bookmerge::pipeline;
use bookmerge::report::{ConsoleReporter, MergeEvent, Reporter};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

#[derive(Parser, Debug)]
#[command(name = "bookmerge")]
#[command(
    about = "Merge a directory of text documents into one delimited corpus file",
    long_about = None
)]
struct Cli {
    /// Directory holding the documents
    #[arg(long)]
    input: Option<PathBuf>,
    /// Merged output file, replaced on every run
    #[arg(long)]
    output: Option<PathBuf>,
    /// File extension to pick up
    #[arg(long)]
    suffix: Option<String>,
    /// Advisory size goal in MB
    #[arg(long = "target-mb")]
    target_mb: Option<u64>,
    /// Fail when the read-back disagrees with the merge totals
    #[arg(long)]
    strict: bool,
    /// Print the final report as JSON after the summary
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn config(&self) -> MergeConfig {
        let mut config = MergeConfig::default().with_strict(self.strict);
        if let Some(input) = &self.input {
            config.input_dir = input.clone();
        }
        if let Some(output) = &self.output {
            config.output_path = output.clone();
        }
        if let Some(suffix) = &self.suffix {
            config = config.with_suffix(suffix);
        }
        if let Some(mb) = self.target_mb {
            config = config.with_target_size(mb.saturating_mul(1024 * 1024));
        }
        config
    }
}

fn main() -> ExitCode {
    bookmerge::init_tracing("bookmerge");
    let cli = Cli::parse();
    let config = cli.config();

    let mut reporter = ConsoleReporter::stdout();
    reporter.banner();

    match pipeline::run(&config, &mut reporter) {
        Ok(report) => {
            reporter.finish();
            if cli.json {
                match serde_json::to_string_pretty(&report) {
                    Ok(json) => println!("{}", json),
                    Err(e) => error!(error = %e, "failed to serialize report"),
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "merge pipeline failed");
            reporter.on_event(&MergeEvent::Failed(e.to_string()));
            ExitCode::FAILURE
        }
    }
}
