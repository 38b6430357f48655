use super::{InputArgs, emit_json};
use async_trait::async_trait;
use bytescope_analysis::analyze_concurrently;
use clap::Args;
use std::error::Error;
use std::path::PathBuf;

#[derive(Args)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    source: InputArgs,

    /// Compute the views inline instead of as parallel tasks
    #[arg(long)]
    sequential: bool,

    /// Output file for the JSON report (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[async_trait]
impl super::Command for AnalyzeArgs {
    async fn execute(self) -> Result<(), Box<dyn Error>> {
        let decoded = self.source.decode()?;
        let mut config = self.source.config()?;
        if self.sequential {
            config.concurrent = false;
        }

        let report = analyze_concurrently(decoded, config).await?;
        tracing::info!(
            "analyzed {} bytes ({})",
            report.info.byte_length,
            report.info.keccak_hash
        );
        emit_json(&report, self.output.as_ref())
    }
}
