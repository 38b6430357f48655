/// Module for the `decode` subcommand, which decodes EVM bytecode to annotated disassembly.
///
/// The default output is one line per instruction (`OFFSET MNEMONIC [0xIMM] // description`);
/// `--json` prints the wire records instead, together with the blob metadata.
use super::{InputArgs, emit, emit_json};
use async_trait::async_trait;
use bytescope_core::decoder::DecodeInfo;
use bytescope_core::disasm::{InstructionRecord, disassemble, to_records};
use clap::Args;
use serde::Serialize;
use std::error::Error;
use std::path::PathBuf;

/// Arguments for the `decode` subcommand.
#[derive(Args)]
pub struct DecodeArgs {
    #[command(flatten)]
    source: InputArgs,

    /// Print JSON instruction records instead of disassembly text
    #[arg(long)]
    json: bool,

    /// Leave out the `// description` comments
    #[arg(long)]
    no_descriptions: bool,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Serialize)]
struct DecodeOutput<'a> {
    info: &'a DecodeInfo,
    instructions: Vec<InstructionRecord>,
}

#[async_trait]
impl super::Command for DecodeArgs {
    async fn execute(self) -> Result<(), Box<dyn Error>> {
        let decoded = self.source.decode()?;
        let mut config = self.source.config()?;

        if self.json {
            let out = DecodeOutput {
                info: &decoded.info,
                instructions: to_records(&decoded.instructions),
            };
            return emit_json(&out, self.output.as_ref());
        }

        if self.no_descriptions {
            config.disassembly.descriptions = false;
        }
        let text = disassemble(&decoded.instructions, &config.disassembly);
        emit(text.trim_end(), self.output.as_ref())
    }
}
