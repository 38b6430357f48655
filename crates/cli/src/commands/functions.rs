use super::{InputArgs, emit_json};
use async_trait::async_trait;
use bytescope_analysis::functions::segment_functions;
use bytescope_core::config::SelectorScan;
use clap::Args;
use std::error::Error;
use std::path::PathBuf;

#[derive(Args)]
pub struct FunctionsArgs {
    #[command(flatten)]
    source: InputArgs,

    /// Only take selectors from inside each segment
    #[arg(long)]
    segment_only: bool,

    /// Output file for the JSON (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[async_trait]
impl super::Command for FunctionsArgs {
    async fn execute(self) -> Result<(), Box<dyn Error>> {
        let decoded = self.source.decode()?;
        let config = self.source.config()?;
        let scan = if self.segment_only {
            SelectorScan::Segment
        } else {
            config.selector_scan
        };

        let segmentation = segment_functions(&decoded.instructions, &decoded.jump_dests, scan);
        emit_json(&segmentation, self.output.as_ref())
    }
}
