/// Module for the `find` subcommand: opcode, instruction and selector queries.
///
/// Exactly one query is run per invocation. Results are printed as JSON: a list of wire records
/// for lookups, `{"found": bool}` for membership checks.
use super::{InputArgs, emit_json};
use async_trait::async_trait;
use bytescope_analysis::search::{Query, parse_selector, selector_of};
use bytescope_core::Opcode;
use bytescope_core::disasm::{InstructionRecord, parse_disassembly};
use bytescope_core::decoder::Instruction;
use clap::{ArgGroup, Args};
use serde_json::json;
use std::error::Error;
use std::path::PathBuf;

#[derive(Args)]
#[command(group(
    ArgGroup::new("query")
        .required(true)
        .args(["opcode", "selector", "signature", "call_selector", "instruction"]),
))]
pub struct FindArgs {
    #[command(flatten)]
    source: InputArgs,

    /// List instructions using this mnemonic (aliases accepted)
    #[arg(long)]
    opcode: Option<String>,

    /// List PUSH4 instructions carrying this 4-byte selector
    #[arg(long)]
    selector: Option<String>,

    /// Like --selector, with the selector computed from a signature such as `transfer(address,uint256)`
    #[arg(long)]
    signature: Option<String>,

    /// Check whether a CALL immediate starts with this selector
    #[arg(long)]
    call_selector: Option<String>,

    /// Check for an exact instruction written as a disassembly line, e.g. `0004 PUSH1 0x80`
    #[arg(long)]
    instruction: Option<String>,

    /// Output file for the JSON (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn records(found: &[&Instruction]) -> Vec<InstructionRecord> {
    found.iter().map(|ins| InstructionRecord::from(*ins)).collect()
}

#[async_trait]
impl super::Command for FindArgs {
    async fn execute(self) -> Result<(), Box<dyn Error>> {
        let decoded = self.source.decode()?;
        let query = Query::new(&decoded.instructions);

        if let Some(mnemonic) = &self.opcode {
            let op: Opcode = mnemonic.parse()?;
            let found = query.instructions_with_opcode(op);
            tracing::info!("{} instructions use {op}", found.len());
            let found: Vec<&Instruction> = found.iter().collect();
            return emit_json(&records(&found), self.output.as_ref());
        }

        let selector = match (&self.selector, &self.signature) {
            (Some(hex), _) => {
                Some(parse_selector(hex).ok_or_else(|| format!("invalid selector '{hex}'"))?)
            }
            (None, Some(signature)) => {
                let selector = selector_of(signature);
                tracing::info!("{signature} -> {selector}");
                Some(selector.into_inner())
            }
            (None, None) => None,
        };
        if let Some(selector) = selector {
            return emit_json(&records(&query.selector_references(selector)), self.output.as_ref());
        }

        if let Some(hex) = &self.call_selector {
            return emit_json(&json!({ "found": query.match_function_signature(hex) }), self.output.as_ref());
        }

        if let Some(line) = &self.instruction {
            let parsed = parse_disassembly(line)?;
            let [candidate] = parsed.as_slice() else {
                return Err(format!("expected one instruction, got {}", parsed.len()).into());
            };
            let op = candidate
                .opcode()
                .ok_or_else(|| format!("unknown mnemonic '{}'", candidate.mnemonic))?;
            let ins = Instruction::new(candidate.offset, op, candidate.imm.clone());
            return emit_json(&json!({ "found": query.match_instruction(&ins) }), self.output.as_ref());
        }

        Ok(())
    }
}
