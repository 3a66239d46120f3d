//! Runtime settings for key generation, the codec, the cracker and the
//! files the interactive tool reads and writes.
//!
//! Every field has a default, so a partial (or absent) JSON file is fine.

use crate::codec::Codec;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeyGenConfig {
    /// Smallest value sampled for p, q and e.
    #[serde(default = "default_min_bound")]
    pub min_bound: u64,
    /// Largest value sampled for p, q and e (inclusive).
    #[serde(default = "default_max_bound")]
    pub max_bound: u64,
    /// Miller-Rabin rounds per candidate.
    #[serde(default = "default_rounds")]
    pub rounds: usize,
    /// Retry ceiling for each sampling loop.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
}

fn default_min_bound() -> u64 {
    100
}

fn default_max_bound() -> u64 {
    1000
}

fn default_rounds() -> usize {
    40
}

fn default_max_attempts() -> usize {
    10_000
}

impl Default for KeyGenConfig {
    fn default() -> Self {
        Self {
            min_bound: default_min_bound(),
            max_bound: default_max_bound(),
            rounds: default_rounds(),
            max_attempts: default_max_attempts(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CrackConfig {
    #[serde(default = "default_rounds")]
    pub rounds: usize,
}

impl Default for CrackConfig {
    fn default() -> Self {
        Self {
            rounds: default_rounds(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FileConfig {
    pub public_key: PathBuf,
    pub private_key: PathBuf,
    pub plaintext: PathBuf,
    pub encrypted: PathBuf,
    pub decrypted: PathBuf,
    pub cracked: PathBuf,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            public_key: "public_key.json".into(),
            private_key: "private_key.json".into(),
            plaintext: "message.txt".into(),
            encrypted: "message_encrypted.txt".into(),
            decrypted: "message_decrypted.txt".into(),
            cracked: "message_cracked.txt".into(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Settings {
    #[serde(default)]
    pub key_gen: KeyGenConfig,
    #[serde(default)]
    pub codec: Codec,
    #[serde(default)]
    pub crack: CrackConfig,
    #[serde(default)]
    pub files: FileConfig,
}

impl Settings {
    /// Reads settings from a JSON file, or returns the defaults when no path
    /// is given.
    pub fn load(path: Option<&Path>) -> Result<Settings> {
        match path {
            Some(path) => {
                let data = fs::read_to_string(path)?;
                Ok(serde_json::from_str(&data)?)
            }
            None => Ok(Settings::default()),
        }
    }
}
