use super::{InputArgs, emit, emit_json};
use async_trait::async_trait;
use bytescope_analysis::tree::{build_forest, render_outline, to_dot};
use clap::Args;
use std::error::Error;
use std::path::PathBuf;

#[derive(Args)]
pub struct TreeArgs {
    #[command(flatten)]
    source: InputArgs,

    /// Emit Graphviz .dot instead of JSON
    #[arg(long, conflicts_with = "outline")]
    dot: bool,

    /// Emit an indented text outline instead of JSON
    #[arg(long)]
    outline: bool,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[async_trait]
impl super::Command for TreeArgs {
    async fn execute(self) -> Result<(), Box<dyn Error>> {
        let decoded = self.source.decode()?;
        let forest = build_forest(&decoded.instructions);

        if self.dot {
            emit(&to_dot(&forest), self.output.as_ref())
        } else if self.outline {
            emit(render_outline(&forest).trim_end(), self.output.as_ref())
        } else {
            emit_json(&forest, self.output.as_ref())
        }
    }
}
