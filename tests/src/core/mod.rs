mod config;
mod decoder;
mod disassembly;
