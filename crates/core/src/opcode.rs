//! EVM opcode table and category predicates.
//!
//! Every one of the 256 byte values maps to exactly one [`Opcode`]: a named instruction, one of
//! the numbered families (`PUSH`, `DUP`, `SWAP`, `LOG`) or [`Opcode::Undefined`] carrying the raw
//! byte. The mapping lives in a single `match` in [`Opcode::from_byte`], so the compiler checks it
//! is total.
//!
//! Bytes that have been renamed across hard forks resolve to one canonical display name:
//!
//! | byte | canonical    | aliases               |
//! |------|--------------|-----------------------|
//! | 0x20 | `KECCAK256`  | `SHA3`                |
//! | 0x44 | `PREVRANDAO` | `DIFFICULTY`, `RANDOM`|
//! | 0xff | `SELFDESTRUCT` | `SUICIDE`           |
//!
//! Alias names are accepted by [`FromStr`] but never produced by [`Opcode::mnemonic`].
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Placeholder mnemonic for unassigned byte values.
pub const UNDEFINED_MNEMONIC: &str = "UNDEFINED";

const PUSH_NAMES: [&str; 32] = [
    "PUSH1", "PUSH2", "PUSH3", "PUSH4", "PUSH5", "PUSH6", "PUSH7", "PUSH8", "PUSH9", "PUSH10",
    "PUSH11", "PUSH12", "PUSH13", "PUSH14", "PUSH15", "PUSH16", "PUSH17", "PUSH18", "PUSH19",
    "PUSH20", "PUSH21", "PUSH22", "PUSH23", "PUSH24", "PUSH25", "PUSH26", "PUSH27", "PUSH28",
    "PUSH29", "PUSH30", "PUSH31", "PUSH32",
];

const DUP_NAMES: [&str; 16] = [
    "DUP1", "DUP2", "DUP3", "DUP4", "DUP5", "DUP6", "DUP7", "DUP8", "DUP9", "DUP10", "DUP11",
    "DUP12", "DUP13", "DUP14", "DUP15", "DUP16",
];

const SWAP_NAMES: [&str; 16] = [
    "SWAP1", "SWAP2", "SWAP3", "SWAP4", "SWAP5", "SWAP6", "SWAP7", "SWAP8", "SWAP9", "SWAP10",
    "SWAP11", "SWAP12", "SWAP13", "SWAP14", "SWAP15", "SWAP16",
];

const LOG_NAMES: [&str; 5] = ["LOG0", "LOG1", "LOG2", "LOG3", "LOG4"];

/// Enumeration of EVM opcodes.
///
/// The numbered families hold their index: `PUSH(1..=32)`, `DUP(1..=16)`, `SWAP(1..=16)` and
/// `LOG(0..=4)`. Values built through [`Opcode::from_byte`] always respect those ranges.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Opcode {
    // 0x00 - stop & arithmetic
    STOP,
    ADD,
    MUL,
    SUB,
    DIV,
    SDIV,
    MOD,
    SMOD,
    ADDMOD,
    MULMOD,
    EXP,
    SIGNEXTEND,
    // 0x10 - comparison & bitwise logic
    LT,
    GT,
    SLT,
    SGT,
    EQ,
    ISZERO,
    AND,
    OR,
    XOR,
    NOT,
    BYTE,
    SHL,
    SHR,
    SAR,
    // 0x20 - hashing
    KECCAK256,
    // 0x30 - environment
    ADDRESS,
    BALANCE,
    ORIGIN,
    CALLER,
    CALLVALUE,
    CALLDATALOAD,
    CALLDATASIZE,
    CALLDATACOPY,
    CODESIZE,
    CODECOPY,
    GASPRICE,
    EXTCODESIZE,
    EXTCODECOPY,
    RETURNDATASIZE,
    RETURNDATACOPY,
    EXTCODEHASH,
    // 0x40 - block information
    BLOCKHASH,
    COINBASE,
    TIMESTAMP,
    NUMBER,
    PREVRANDAO,
    GASLIMIT,
    CHAINID,
    SELFBALANCE,
    BASEFEE,
    BLOBHASH,
    BLOBBASEFEE,
    // 0x50 - stack, memory, storage & flow
    POP,
    MLOAD,
    MSTORE,
    MSTORE8,
    SLOAD,
    SSTORE,
    JUMP,
    JUMPI,
    PC,
    MSIZE,
    GAS,
    JUMPDEST,
    TLOAD,
    TSTORE,
    MCOPY,
    PUSH0,
    // 0x60-0xa4 - numbered families
    PUSH(u8),
    DUP(u8),
    SWAP(u8),
    LOG(u8),
    // 0xf0 - system
    CREATE,
    CALL,
    CALLCODE,
    RETURN,
    DELEGATECALL,
    CREATE2,
    STATICCALL,
    REVERT,
    INVALID,
    SELFDESTRUCT,
    /// Byte value with no assigned instruction.
    Undefined(u8),
}

impl Opcode {
    /// Maps a raw byte to its opcode. Total over all 256 values.
    pub const fn from_byte(byte: u8) -> Self {
        use Opcode::*;

        match byte {
            0x00 => STOP,
            0x01 => ADD,
            0x02 => MUL,
            0x03 => SUB,
            0x04 => DIV,
            0x05 => SDIV,
            0x06 => MOD,
            0x07 => SMOD,
            0x08 => ADDMOD,
            0x09 => MULMOD,
            0x0a => EXP,
            0x0b => SIGNEXTEND,
            0x10 => LT,
            0x11 => GT,
            0x12 => SLT,
            0x13 => SGT,
            0x14 => EQ,
            0x15 => ISZERO,
            0x16 => AND,
            0x17 => OR,
            0x18 => XOR,
            0x19 => NOT,
            0x1a => BYTE,
            0x1b => SHL,
            0x1c => SHR,
            0x1d => SAR,
            0x20 => KECCAK256,
            0x30 => ADDRESS,
            0x31 => BALANCE,
            0x32 => ORIGIN,
            0x33 => CALLER,
            0x34 => CALLVALUE,
            0x35 => CALLDATALOAD,
            0x36 => CALLDATASIZE,
            0x37 => CALLDATACOPY,
            0x38 => CODESIZE,
            0x39 => CODECOPY,
            0x3a => GASPRICE,
            0x3b => EXTCODESIZE,
            0x3c => EXTCODECOPY,
            0x3d => RETURNDATASIZE,
            0x3e => RETURNDATACOPY,
            0x3f => EXTCODEHASH,
            0x40 => BLOCKHASH,
            0x41 => COINBASE,
            0x42 => TIMESTAMP,
            0x43 => NUMBER,
            0x44 => PREVRANDAO,
            0x45 => GASLIMIT,
            0x46 => CHAINID,
            0x47 => SELFBALANCE,
            0x48 => BASEFEE,
            0x49 => BLOBHASH,
            0x4a => BLOBBASEFEE,
            0x50 => POP,
            0x51 => MLOAD,
            0x52 => MSTORE,
            0x53 => MSTORE8,
            0x54 => SLOAD,
            0x55 => SSTORE,
            0x56 => JUMP,
            0x57 => JUMPI,
            0x58 => PC,
            0x59 => MSIZE,
            0x5a => GAS,
            0x5b => JUMPDEST,
            0x5c => TLOAD,
            0x5d => TSTORE,
            0x5e => MCOPY,
            0x5f => PUSH0,
            0x60..=0x7f => PUSH(byte - 0x5f),
            0x80..=0x8f => DUP(byte - 0x7f),
            0x90..=0x9f => SWAP(byte - 0x8f),
            0xa0..=0xa4 => LOG(byte - 0xa0),
            0xf0 => CREATE,
            0xf1 => CALL,
            0xf2 => CALLCODE,
            0xf3 => RETURN,
            0xf4 => DELEGATECALL,
            0xf5 => CREATE2,
            0xfa => STATICCALL,
            0xfd => REVERT,
            0xfe => INVALID,
            0xff => SELFDESTRUCT,
            other => Undefined(other),
        }
    }

    /// Parses a raw byte into an `Opcode` and its immediate data size.
    ///
    /// # Examples
    /// ```
    /// use bytescope_core::Opcode;
    ///
    /// assert_eq!(Opcode::parse(0x60), (Opcode::PUSH(1), 1));
    /// assert_eq!(Opcode::parse(0x01), (Opcode::ADD, 0));
    /// ```
    pub const fn parse(byte: u8) -> (Self, usize) {
        let op = Self::from_byte(byte);
        (op, op.immediate_size())
    }

    /// Converts the opcode back to its byte value.
    ///
    /// Family members outside the assigned range, such as a hand-built `PUSH(0)` or `LOG(5)`,
    /// encode as `INVALID` (`0xfe`).
    pub const fn to_byte(self) -> u8 {
        use Opcode::*;

        match self {
            STOP => 0x00,
            ADD => 0x01,
            MUL => 0x02,
            SUB => 0x03,
            DIV => 0x04,
            SDIV => 0x05,
            MOD => 0x06,
            SMOD => 0x07,
            ADDMOD => 0x08,
            MULMOD => 0x09,
            EXP => 0x0a,
            SIGNEXTEND => 0x0b,
            LT => 0x10,
            GT => 0x11,
            SLT => 0x12,
            SGT => 0x13,
            EQ => 0x14,
            ISZERO => 0x15,
            AND => 0x16,
            OR => 0x17,
            XOR => 0x18,
            NOT => 0x19,
            BYTE => 0x1a,
            SHL => 0x1b,
            SHR => 0x1c,
            SAR => 0x1d,
            KECCAK256 => 0x20,
            ADDRESS => 0x30,
            BALANCE => 0x31,
            ORIGIN => 0x32,
            CALLER => 0x33,
            CALLVALUE => 0x34,
            CALLDATALOAD => 0x35,
            CALLDATASIZE => 0x36,
            CALLDATACOPY => 0x37,
            CODESIZE => 0x38,
            CODECOPY => 0x39,
            GASPRICE => 0x3a,
            EXTCODESIZE => 0x3b,
            EXTCODECOPY => 0x3c,
            RETURNDATASIZE => 0x3d,
            RETURNDATACOPY => 0x3e,
            EXTCODEHASH => 0x3f,
            BLOCKHASH => 0x40,
            COINBASE => 0x41,
            TIMESTAMP => 0x42,
            NUMBER => 0x43,
            PREVRANDAO => 0x44,
            GASLIMIT => 0x45,
            CHAINID => 0x46,
            SELFBALANCE => 0x47,
            BASEFEE => 0x48,
            BLOBHASH => 0x49,
            BLOBBASEFEE => 0x4a,
            POP => 0x50,
            MLOAD => 0x51,
            MSTORE => 0x52,
            MSTORE8 => 0x53,
            SLOAD => 0x54,
            SSTORE => 0x55,
            JUMP => 0x56,
            JUMPI => 0x57,
            PC => 0x58,
            MSIZE => 0x59,
            GAS => 0x5a,
            JUMPDEST => 0x5b,
            TLOAD => 0x5c,
            TSTORE => 0x5d,
            MCOPY => 0x5e,
            PUSH0 => 0x5f,
            PUSH(n @ 1..=32) => 0x5f + n,
            DUP(n @ 1..=16) => 0x7f + n,
            SWAP(n @ 1..=16) => 0x8f + n,
            LOG(n @ 0..=4) => 0xa0 + n,
            PUSH(_) | DUP(_) | SWAP(_) | LOG(_) => 0xfe,
            CREATE => 0xf0,
            CALL => 0xf1,
            CALLCODE => 0xf2,
            RETURN => 0xf3,
            DELEGATECALL => 0xf4,
            CREATE2 => 0xf5,
            STATICCALL => 0xfa,
            REVERT => 0xfd,
            INVALID => 0xfe,
            SELFDESTRUCT => 0xff,
            Undefined(byte) => byte,
        }
    }

    /// Number of immediate bytes following the opcode (`n` for `PUSHn`, otherwise 0).
    pub const fn immediate_size(self) -> usize {
        match self {
            Self::PUSH(n @ 1..=32) => n as usize,
            _ => 0,
        }
    }

    /// Canonical mnemonic, or [`UNDEFINED_MNEMONIC`] for unassigned bytes.
    pub fn mnemonic(self) -> &'static str {
        use Opcode::*;

        match self {
            STOP => "STOP",
            ADD => "ADD",
            MUL => "MUL",
            SUB => "SUB",
            DIV => "DIV",
            SDIV => "SDIV",
            MOD => "MOD",
            SMOD => "SMOD",
            ADDMOD => "ADDMOD",
            MULMOD => "MULMOD",
            EXP => "EXP",
            SIGNEXTEND => "SIGNEXTEND",
            LT => "LT",
            GT => "GT",
            SLT => "SLT",
            SGT => "SGT",
            EQ => "EQ",
            ISZERO => "ISZERO",
            AND => "AND",
            OR => "OR",
            XOR => "XOR",
            NOT => "NOT",
            BYTE => "BYTE",
            SHL => "SHL",
            SHR => "SHR",
            SAR => "SAR",
            KECCAK256 => "KECCAK256",
            ADDRESS => "ADDRESS",
            BALANCE => "BALANCE",
            ORIGIN => "ORIGIN",
            CALLER => "CALLER",
            CALLVALUE => "CALLVALUE",
            CALLDATALOAD => "CALLDATALOAD",
            CALLDATASIZE => "CALLDATASIZE",
            CALLDATACOPY => "CALLDATACOPY",
            CODESIZE => "CODESIZE",
            CODECOPY => "CODECOPY",
            GASPRICE => "GASPRICE",
            EXTCODESIZE => "EXTCODESIZE",
            EXTCODECOPY => "EXTCODECOPY",
            RETURNDATASIZE => "RETURNDATASIZE",
            RETURNDATACOPY => "RETURNDATACOPY",
            EXTCODEHASH => "EXTCODEHASH",
            BLOCKHASH => "BLOCKHASH",
            COINBASE => "COINBASE",
            TIMESTAMP => "TIMESTAMP",
            NUMBER => "NUMBER",
            PREVRANDAO => "PREVRANDAO",
            GASLIMIT => "GASLIMIT",
            CHAINID => "CHAINID",
            SELFBALANCE => "SELFBALANCE",
            BASEFEE => "BASEFEE",
            BLOBHASH => "BLOBHASH",
            BLOBBASEFEE => "BLOBBASEFEE",
            POP => "POP",
            MLOAD => "MLOAD",
            MSTORE => "MSTORE",
            MSTORE8 => "MSTORE8",
            SLOAD => "SLOAD",
            SSTORE => "SSTORE",
            JUMP => "JUMP",
            JUMPI => "JUMPI",
            PC => "PC",
            MSIZE => "MSIZE",
            GAS => "GAS",
            JUMPDEST => "JUMPDEST",
            TLOAD => "TLOAD",
            TSTORE => "TSTORE",
            MCOPY => "MCOPY",
            PUSH0 => "PUSH0",
            PUSH(n) => family_name(&PUSH_NAMES, n, 1),
            DUP(n) => family_name(&DUP_NAMES, n, 1),
            SWAP(n) => family_name(&SWAP_NAMES, n, 1),
            LOG(n) => family_name(&LOG_NAMES, n, 0),
            CREATE => "CREATE",
            CALL => "CALL",
            CALLCODE => "CALLCODE",
            RETURN => "RETURN",
            DELEGATECALL => "DELEGATECALL",
            CREATE2 => "CREATE2",
            STATICCALL => "STATICCALL",
            REVERT => "REVERT",
            INVALID => "INVALID",
            SELFDESTRUCT => "SELFDESTRUCT",
            Undefined(_) => UNDEFINED_MNEMONIC,
        }
    }

    /// Historical names that denote the same byte as this opcode.
    pub const fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::KECCAK256 => &["SHA3"],
            Self::PREVRANDAO => &["DIFFICULTY", "RANDOM"],
            Self::SELFDESTRUCT => &["SUICIDE"],
            _ => &[],
        }
    }

    /// One-line human description, used as the disassembly comment.
    pub const fn description(self) -> &'static str {
        use Opcode::*;

        match self {
            STOP => "Halts execution",
            ADD => "Addition operation",
            MUL => "Multiplication operation",
            SUB => "Subtraction operation",
            DIV => "Integer division operation",
            SDIV => "Signed integer division operation",
            MOD => "Modulo remainder operation",
            SMOD => "Signed modulo remainder operation",
            ADDMOD => "Modulo addition operation",
            MULMOD => "Modulo multiplication operation",
            EXP => "Exponential operation",
            SIGNEXTEND => "Extend length of two's complement signed integer",
            LT => "Less-than comparison",
            GT => "Greater-than comparison",
            SLT => "Signed less-than comparison",
            SGT => "Signed greater-than comparison",
            EQ => "Equality comparison",
            ISZERO => "Is-zero comparison",
            AND => "Bitwise AND operation",
            OR => "Bitwise OR operation",
            XOR => "Bitwise XOR operation",
            NOT => "Bitwise NOT operation",
            BYTE => "Retrieve single byte from word",
            SHL => "Left shift operation",
            SHR => "Logical right shift operation",
            SAR => "Arithmetic (signed) right shift operation",
            KECCAK256 => "Compute Keccak-256 hash",
            ADDRESS => "Get address of currently executing account",
            BALANCE => "Get balance of the given account",
            ORIGIN => "Get execution origination address",
            CALLER => "Get caller address",
            CALLVALUE => "Get deposited value by the instruction/transaction responsible for this execution",
            CALLDATALOAD => "Get input data of current environment",
            CALLDATASIZE => "Get size of input data in current environment",
            CALLDATACOPY => "Copy input data in current environment to memory",
            CODESIZE => "Get size of code running in current environment",
            CODECOPY => "Copy code running in current environment to memory",
            GASPRICE => "Get price of gas in current environment",
            EXTCODESIZE => "Get size of an account's code",
            EXTCODECOPY => "Copy an account's code to memory",
            RETURNDATASIZE => "Get size of output data from the previous call",
            RETURNDATACOPY => "Copy output data from the previous call to memory",
            EXTCODEHASH => "Get hash of an account's code",
            BLOCKHASH => "Get the hash of one of the 256 most recent complete blocks",
            COINBASE => "Get the block's beneficiary address",
            TIMESTAMP => "Get the block's timestamp",
            NUMBER => "Get the block's number",
            PREVRANDAO => "Get the previous block's RANDAO mix (formerly difficulty)",
            GASLIMIT => "Get the block's gas limit",
            CHAINID => "Get the chain ID",
            SELFBALANCE => "Get balance of currently executing account",
            BASEFEE => "Get the base fee",
            BLOBHASH => "Get versioned hashes",
            BLOBBASEFEE => "Get the current blob base fee",
            POP => "Remove item from stack",
            MLOAD => "Load word from memory",
            MSTORE => "Save word to memory",
            MSTORE8 => "Save byte to memory",
            SLOAD => "Load word from storage",
            SSTORE => "Save word to storage",
            JUMP => "Alter the program counter",
            JUMPI => "Conditionally alter the program counter",
            PC => "Get the value of the program counter prior to the increment",
            MSIZE => "Get the size of active memory in bytes",
            GAS => "Get the amount of available gas",
            JUMPDEST => "Mark a valid destination for jumps",
            TLOAD => "Load word from transient storage",
            TSTORE => "Save word to transient storage",
            MCOPY => "Copy memory areas",
            PUSH0 => "Place value 0 on stack",
            PUSH(_) => "Place item on stack",
            DUP(_) => "Duplicate stack item",
            SWAP(_) => "Exchange stack items",
            LOG(_) => "Append log record",
            CREATE => "Create a new account with associated code",
            CALL => "Message-call into an account",
            CALLCODE => "Message-call into this account with alternative account's code",
            RETURN => "Halt execution returning output data",
            DELEGATECALL => "Message-call into this account with an alternative account's code, persisting sender and value",
            CREATE2 => "Create a new account with associated code at a predictable address",
            STATICCALL => "Static message-call into an account",
            REVERT => "Halt execution reverting state changes but returning data",
            INVALID => "Designated invalid instruction",
            SELFDESTRUCT => "Halt execution and register account for later deletion",
            Undefined(_) => "Undefined opcode",
        }
    }

    /// `PUSH1..=PUSH32`. `PUSH0` carries no immediate and is not included.
    pub const fn is_push(self) -> bool {
        matches!(self, Self::PUSH(1..=32))
    }

    /// `PUSH0..=PUSH32`: every instruction that places a constant on the stack.
    pub const fn is_constant_push(self) -> bool {
        matches!(self, Self::PUSH0) || self.is_push()
    }

    /// `JUMP` or `JUMPI`.
    pub const fn is_jump(self) -> bool {
        matches!(self, Self::JUMP | Self::JUMPI)
    }

    /// `JUMP`, `JUMPI` or `JUMPDEST`: the opcodes that close a nesting level in the
    /// instruction tree.
    pub const fn is_jump_class(self) -> bool {
        matches!(self, Self::JUMP | Self::JUMPI | Self::JUMPDEST)
    }

    /// `ADD..=SIGNEXTEND`.
    pub const fn is_arithmetic(self) -> bool {
        matches!(self.to_byte(), 0x01..=0x0b) && !matches!(self, Self::Undefined(_))
    }

    /// `LT`, `GT`, `SLT`, `SGT`, `EQ`, `ISZERO`.
    pub const fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::LT | Self::GT | Self::SLT | Self::SGT | Self::EQ | Self::ISZERO
        )
    }

    /// `AND`, `OR`, `XOR`, `NOT`, `BYTE`, `SHL`, `SHR`, `SAR`.
    pub const fn is_bitwise(self) -> bool {
        matches!(
            self,
            Self::AND
                | Self::OR
                | Self::XOR
                | Self::NOT
                | Self::BYTE
                | Self::SHL
                | Self::SHR
                | Self::SAR
        )
    }

    /// `BLOCKHASH..=BLOBBASEFEE`.
    pub const fn is_block_info(self) -> bool {
        matches!(
            self,
            Self::BLOCKHASH
                | Self::COINBASE
                | Self::TIMESTAMP
                | Self::NUMBER
                | Self::PREVRANDAO
                | Self::GASLIMIT
                | Self::CHAINID
                | Self::SELFBALANCE
                | Self::BASEFEE
                | Self::BLOBHASH
                | Self::BLOBBASEFEE
        )
    }

    /// Pure stack manipulation: `POP`, `PUSH0..=PUSH32`, `DUPn`, `SWAPn`.
    pub const fn is_stack(self) -> bool {
        matches!(self, Self::POP | Self::PUSH0 | Self::DUP(_) | Self::SWAP(_)) || self.is_push()
    }

    /// `MLOAD`, `MSTORE`, `MSTORE8`, `MSIZE`, `MCOPY`.
    pub const fn is_memory(self) -> bool {
        matches!(
            self,
            Self::MLOAD | Self::MSTORE | Self::MSTORE8 | Self::MSIZE | Self::MCOPY
        )
    }

    /// Persistent and transient storage access.
    pub const fn is_storage(self) -> bool {
        matches!(
            self,
            Self::SLOAD | Self::SSTORE | Self::TLOAD | Self::TSTORE
        )
    }

    /// Opcodes that delimit or redirect execution.
    pub const fn is_flow_control(self) -> bool {
        matches!(
            self,
            Self::STOP
                | Self::JUMP
                | Self::JUMPI
                | Self::JUMPDEST
                | Self::RETURN
                | Self::REVERT
                | Self::SELFDESTRUCT
                | Self::INVALID
        )
    }

    /// The `0xf0` range: account creation, message calls and halting.
    pub const fn is_system(self) -> bool {
        matches!(
            self,
            Self::CREATE
                | Self::CALL
                | Self::CALLCODE
                | Self::RETURN
                | Self::DELEGATECALL
                | Self::CREATE2
                | Self::STATICCALL
                | Self::REVERT
                | Self::INVALID
                | Self::SELFDESTRUCT
        )
    }

    /// `SELFDESTRUCT`.
    pub const fn is_self_destruct(self) -> bool {
        matches!(self, Self::SELFDESTRUCT)
    }

    /// `LOG0..=LOG4`.
    pub const fn is_log(self) -> bool {
        matches!(self, Self::LOG(0..=4))
    }

    /// Opcodes that end execution of the current call frame.
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::STOP | Self::RETURN | Self::REVERT | Self::SELFDESTRUCT | Self::INVALID
        )
    }

    /// Terminal opcodes plus `JUMP` and `JUMPI`.
    pub const fn is_block_ending(self) -> bool {
        self.is_terminal() || self.is_jump()
    }

    /// Assigned instruction: not [`Opcode::Undefined`] and, for the numbered families, an index
    /// the EVM actually assigns.
    pub const fn is_defined(self) -> bool {
        match self {
            Self::Undefined(_) => false,
            Self::PUSH(n) => matches!(n, 1..=32),
            Self::DUP(n) | Self::SWAP(n) => matches!(n, 1..=16),
            Self::LOG(n) => n <= 4,
            _ => true,
        }
    }
}

const fn family_name(names: &'static [&'static str], n: u8, first: u8) -> &'static str {
    let idx = n.wrapping_sub(first) as usize;
    if idx < names.len() {
        names[idx]
    } else {
        UNDEFINED_MNEMONIC
    }
}

/// Mnemonic for a raw byte. Never fails; unassigned bytes yield [`UNDEFINED_MNEMONIC`].
pub fn mnemonic(byte: u8) -> &'static str {
    Opcode::from_byte(byte).mnemonic()
}

impl From<u8> for Opcode {
    fn from(byte: u8) -> Self {
        Self::from_byte(byte)
    }
}

impl From<Opcode> for u8 {
    fn from(op: Opcode) -> Self {
        op.to_byte()
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// Error returned when a mnemonic does not name any opcode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown opcode mnemonic: {0}")]
pub struct ParseOpcodeError(pub String);

impl FromStr for Opcode {
    type Err = ParseOpcodeError;

    /// Parses a mnemonic (case-insensitive), accepting historical aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let alias = match upper.as_str() {
            "SHA3" => Some(Self::KECCAK256),
            "DIFFICULTY" | "RANDOM" => Some(Self::PREVRANDAO),
            "SUICIDE" => Some(Self::SELFDESTRUCT),
            _ => None,
        };
        if let Some(op) = alias {
            return Ok(op);
        }

        (0..=u8::MAX)
            .map(Self::from_byte)
            .find(|op| op.is_defined() && op.mnemonic() == upper)
            .ok_or_else(|| ParseOpcodeError(s.to_string()))
    }
}

impl Serialize for Opcode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.to_byte())
    }
}

impl<'de> Deserialize<'de> for Opcode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        u8::deserialize(deserializer).map(Self::from_byte)
    }
}
