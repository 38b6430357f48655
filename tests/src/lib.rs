//! Cross-crate tests for the bytescope workspace, plus the bytecode fixtures they share.

#[cfg(test)]
mod analysis;
#[cfg(test)]
mod api;
#[cfg(test)]
mod core;

/// Solidity-style runtime: a dispatcher over two selectors, each jumping to a function body.
///
/// ```text
/// 00 PUSH1 80 PUSH1 40 MSTORE
/// 05 PUSH1 00 CALLDATALOAD PUSH1 e0 SHR
/// 0b DUP1 PUSH4 a9059cbb EQ PUSH1 22 JUMPI
/// 15 DUP1 PUSH4 70a08231 EQ PUSH1 69 JUMPI
/// 1f PUSH0 DUP1 REVERT
/// 22 JUMPDEST PUSH32 <100> PUSH1 01 PUSH32 <Transfer topic> LOG2 STOP
/// 69 JUMPDEST PUSH1 2a PUSH0 MSTORE PUSH1 20 PUSH0 RETURN
/// ```
pub const DISPATCHER_RUNTIME: &str = concat!(
    "6080604052",
    "60003560e01c",
    "8063a9059cbb14602257",
    "806370a0823114606957",
    "5f80fd",
    "5b",
    "7f0000000000000000000000000000000000000000000000000000000000000064",
    "6001",
    "7fddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef",
    "a200",
    "5b602a5f5260205ff3",
);

/// `keccak256("Transfer(address,address,uint256)")`
pub const TRANSFER_TOPIC: &str = "ddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef";

/// Installs a debug-level subscriber once per test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}
