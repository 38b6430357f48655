use async_trait::async_trait;
use bytescope_core::config::AnalysisConfig;
use bytescope_core::decoder::{DecodedBytecode, decode_bytecode};
use clap::{Args, Subcommand};
use serde::Serialize;
use std::error::Error;
use std::fs;
use std::path::PathBuf;

pub mod analyze;
pub mod decode;
pub mod events;
pub mod find;
pub mod functions;
pub mod tree;

/// Every `bytescope` subcommand.
#[derive(Subcommand)]
pub enum Cmd {
    /// Decode bytecode to annotated disassembly
    Decode(decode::DecodeArgs),

    /// Print the instruction tree as JSON or Graphviz
    Tree(tree::TreeArgs),

    /// Print candidate function segments
    Functions(functions::FunctionsArgs),

    /// Reconstruct LOG topics and payloads
    Events(events::EventsArgs),

    /// Search for opcodes, instructions and selectors
    Find(find::FindArgs),

    /// Run every enabled view and print the joined report
    Analyze(analyze::AnalyzeArgs),
}

/// A runnable subcommand.
#[async_trait]
pub trait Command {
    /// Runs the command to completion, printing or writing its output.
    async fn execute(self) -> Result<(), Box<dyn Error>>;
}

#[async_trait]
impl Command for Cmd {
    async fn execute(self) -> Result<(), Box<dyn Error>> {
        match self {
            Cmd::Decode(args) => args.execute().await,
            Cmd::Tree(args) => args.execute().await,
            Cmd::Functions(args) => args.execute().await,
            Cmd::Events(args) => args.execute().await,
            Cmd::Find(args) => args.execute().await,
            Cmd::Analyze(args) => args.execute().await,
        }
    }
}

/// Input and configuration shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Input bytecode as a hex string (0x...) or file path prefixed with @
    pub input: String,

    /// JSON analysis config; missing keys take their defaults
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl InputArgs {
    /// Decodes the input, reading `@path` inputs from disk.
    pub fn decode(&self) -> Result<DecodedBytecode, Box<dyn Error>> {
        let (decoded, _bytes) = match self.input.strip_prefix('@') {
            Some(path) => decode_bytecode(path, true)?,
            None => decode_bytecode(&self.input, false)?,
        };
        Ok(decoded)
    }

    /// Loads the config file, or the standard preset when none was given.
    pub fn config(&self) -> Result<AnalysisConfig, Box<dyn Error>> {
        Ok(match &self.config {
            Some(path) => AnalysisConfig::from_file(path)?,
            None => AnalysisConfig::default(),
        })
    }
}

/// Writes `text` to `output`, or stdout when no path was given.
pub(crate) fn emit(text: &str, output: Option<&PathBuf>) -> Result<(), Box<dyn Error>> {
    match output {
        Some(path) => {
            fs::write(path, text)?;
            tracing::info!("wrote {}", path.display());
        }
        None => println!("{text}"),
    }
    Ok(())
}

/// Pretty-prints `value` as JSON to `output` or stdout.
pub(crate) fn emit_json<T: Serialize>(value: &T, output: Option<&PathBuf>) -> Result<(), Box<dyn Error>> {
    emit(&serde_json::to_string_pretty(value)?, output)
}
