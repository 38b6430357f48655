use super::{InputArgs, emit_json};
use async_trait::async_trait;
use bytescope_analysis::events::reconstruct_events;
use clap::Args;
use std::error::Error;
use std::path::PathBuf;

#[derive(Args)]
pub struct EventsArgs {
    #[command(flatten)]
    source: InputArgs,

    /// Only print events whose topics and data were recovered
    #[arg(long)]
    resolved: bool,

    /// Output file for the JSON (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[async_trait]
impl super::Command for EventsArgs {
    async fn execute(self) -> Result<(), Box<dyn Error>> {
        let decoded = self.source.decode()?;
        let mut events = reconstruct_events(&decoded.instructions);
        if self.resolved {
            events.retain(|e| e.is_resolved());
        }
        emit_json(&events, self.output.as_ref())
    }
}
