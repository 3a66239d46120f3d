use num_bigint::BigUint;
use std::fmt;
use thiserror::Error;

/// Which retry loop of key generation ran out of attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Prime,
    Exponent,
    Verification,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Prime => write!(f, "prime sampling"),
            Stage::Exponent => write!(f, "exponent search"),
            Stage::Verification => write!(f, "round-trip verification"),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid bounds [{min}, {max}]: {reason}")]
    InvalidBound { min: u64, max: u64, reason: String },

    #[error("key generation gave up on {stage} after {attempts} attempts")]
    KeyGenerationExhausted { stage: Stage, attempts: usize },

    #[error("character {character:?} (code point {code_point}) does not fit below {capacity}")]
    EncodingOverflow {
        character: char,
        code_point: u32,
        capacity: u32,
    },

    #[error("invalid codec widths ({char_width}, {block_width}): {reason}")]
    InvalidCodec {
        char_width: usize,
        block_width: usize,
        reason: String,
    },

    #[error("block {block} is not smaller than the modulus {modulus}")]
    BlockTooLarge { block: BigUint, modulus: BigUint },

    #[error("no factor pair or inverse exponent found for n = {0}")]
    CrackNotFound(BigUint),

    #[error("modulus {0} is too large to enumerate its primes")]
    ModulusTooLarge(BigUint),

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("malformed data: {0}")]
    Parse(String),

    #[error("I/O error")]
    Io(#[from] std::io::Error),

    #[error("serialization error (JSON)")]
    Json(#[from] serde_json::Error),

    #[error("prompt failed")]
    Prompt(#[from] requestty::ErrorKind),
}

pub type Result<T> = std::result::Result<T, Error>;
