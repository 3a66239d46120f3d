//! RSA over deliberately small integers.
//!
//! Key generation, a fixed-width decimal codec, the modular exponentiation
//! cipher and a brute-force cracker that recovers the private exponent from
//! the public key alone, showing why a small modulus offers no security.

pub mod codec;
pub mod config;
pub mod crack;
pub mod error;
pub mod euclid;
pub mod file;
pub mod key_gen;
pub mod prime;
pub mod rsa;

pub use crate::error::{Error, Result};
