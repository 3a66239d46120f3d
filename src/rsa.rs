// src/rsa.rs

use crate::codec::Codec;
use crate::error::{Error, Result};
use crate::key_gen::{PrivateKey, PublicKey};
use log::debug;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ciphertext blocks in message order.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EncryptedMessage {
    blocks: Vec<BigUint>,
}

impl EncryptedMessage {
    pub fn new(blocks: Vec<BigUint>) -> EncryptedMessage {
        EncryptedMessage { blocks }
    }

    pub fn blocks(&self) -> &[BigUint] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

// Tab separated decimal blocks
impl fmt::Display for EncryptedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, block) in self.blocks.iter().enumerate() {
            if i > 0 {
                write!(f, "\t")?;
            }
            write!(f, "{}", block)?;
        }
        Ok(())
    }
}

impl FromStr for EncryptedMessage {
    type Err = Error;

    fn from_str(s: &str) -> Result<EncryptedMessage> {
        s.split_whitespace()
            .map(|block| {
                block
                    .parse::<BigUint>()
                    .map_err(|err| Error::Parse(format!("block {:?}: {}", block, err)))
            })
            .collect::<Result<Vec<_>>>()
            .map(EncryptedMessage::new)
    }
}

fn check_block(block: &BigUint, n: &BigUint) -> Result<()> {
    if block >= n {
        return Err(Error::BlockTooLarge {
            block: block.clone(),
            modulus: n.clone(),
        });
    }
    Ok(())
}

/// `block^e mod n`; fails when `block >= n` since the reduction would lose
/// information.
pub fn encrypt_block(block: &BigUint, n: &BigUint, e: &BigUint) -> Result<BigUint> {
    check_block(block, n)?;
    Ok(block.modpow(e, n))
}

/// `block^d mod n`.
pub fn decrypt_block(block: &BigUint, n: &BigUint, d: &BigUint) -> Result<BigUint> {
    check_block(block, n)?;
    Ok(block.modpow(d, n))
}

pub fn rsa_encrypt(pub_key: &PublicKey, plaintext: &str) -> Result<EncryptedMessage> {
    rsa_encrypt_with(&Codec::default(), pub_key, plaintext)
}

pub fn rsa_decrypt(priv_key: &PrivateKey, ciphertext: &EncryptedMessage) -> Result<String> {
    rsa_decrypt_with(&Codec::default(), priv_key, ciphertext)
}

pub fn rsa_encrypt_with(
    codec: &Codec,
    pub_key: &PublicKey,
    plaintext: &str,
) -> Result<EncryptedMessage> {
    let blocks = codec
        .encode(plaintext)?
        .iter()
        .map(|block| encrypt_block(block, pub_key.n(), pub_key.e()))
        .collect::<Result<Vec<_>>>()?;
    debug!("Encrypted {} characters into {} blocks", plaintext.chars().count(), blocks.len());
    Ok(EncryptedMessage::new(blocks))
}

pub fn rsa_decrypt_with(
    codec: &Codec,
    priv_key: &PrivateKey,
    ciphertext: &EncryptedMessage,
) -> Result<String> {
    let blocks = ciphertext
        .blocks()
        .iter()
        .map(|block| decrypt_block(block, priv_key.n(), priv_key.d()))
        .collect::<Result<Vec<_>>>()?;
    codec.decode(&blocks)
}
