use crate::codec::Codec;
use crate::config::KeyGenConfig;
use crate::error::{Error, Result, Stage};
use crate::euclid::{extended_gcd, mod_inverse};
use crate::prime::{is_prime, is_probable_prime};
use crate::rsa::{rsa_decrypt_with, rsa_encrypt_with};
use log::{debug, info, warn};
use num_bigint::{BigInt, BigUint, RandBigInt, Sign::Plus};
use num_traits::One;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Instant;

#[derive(Clone, Debug, Serialize, Deserialize, Eq, Hash, PartialEq)]
pub struct PublicKey {
    n: BigUint,
    e: BigUint,
}

#[derive(Clone, Debug, Serialize, Deserialize, Eq, Hash, PartialEq)]
pub struct PrivateKey {
    n: BigUint,
    d: BigUint,
}

impl PublicKey {
    pub fn new(n: BigUint, e: BigUint) -> PublicKey {
        PublicKey { n, e }
    }

    pub fn n(&self) -> &BigUint {
        &self.n
    }

    pub fn e(&self) -> &BigUint {
        &self.e
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<PublicKey> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

impl PrivateKey {
    pub fn new(n: BigUint, d: BigUint) -> PrivateKey {
        PrivateKey { n, d }
    }

    pub fn n(&self) -> &BigUint {
        &self.n
    }

    pub fn d(&self) -> &BigUint {
        &self.d
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<PrivateKey> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// An RSA keypair `(n, e, d)`.
///
/// Only built by [`generate_keypair`] or [`Keypair::from_primes`], both of
/// which check that `e * d = 1 (mod phi(n))` and `2 < d < phi(n)`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Keypair {
    n: BigUint,
    e: BigUint,
    d: BigUint,
}

impl Keypair {
    /// Builds the keypair for known primes `p`, `q` and public exponent `e`.
    pub fn from_primes(p: &BigUint, q: &BigUint, e: &BigUint) -> Result<Keypair> {
        if p == q || !is_prime(p) || !is_prime(q) {
            return Err(Error::InvalidKey(format!(
                "p = {} and q = {} must be distinct primes",
                p, q
            )));
        }
        let phi = totient(p, q);
        let d = mod_inverse(e, &phi).ok_or_else(|| {
            Error::InvalidKey(format!("e = {} is not invertible modulo {}", e, phi))
        })?;
        Keypair::validated(p * q, e.clone(), d, &phi)
    }

    fn validated(n: BigUint, e: BigUint, d: BigUint, phi: &BigUint) -> Result<Keypair> {
        let two = BigUint::from(2u8);
        if (&e * &d) % phi != BigUint::one() {
            return Err(Error::InvalidKey(format!(
                "e * d = {} * {} is not 1 modulo {}",
                e, d, phi
            )));
        }
        if d <= two || &d >= phi {
            return Err(Error::InvalidKey(format!(
                "d = {} is outside (2, {})",
                d, phi
            )));
        }
        Ok(Keypair { n, e, d })
    }

    pub fn n(&self) -> &BigUint {
        &self.n
    }

    pub fn e(&self) -> &BigUint {
        &self.e
    }

    pub fn d(&self) -> &BigUint {
        &self.d
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey::new(self.n.clone(), self.e.clone())
    }

    pub fn private_key(&self) -> PrivateKey {
        PrivateKey::new(self.n.clone(), self.d.clone())
    }
}

pub fn totient(p: &BigUint, q: &BigUint) -> BigUint {
    (p - 1u8) * (q - 1u8)
}

// Runs `attempt` until it yields a value, at most `max_attempts` times
fn retry<T, F>(stage: Stage, max_attempts: usize, mut attempt: F) -> Result<T>
where
    F: FnMut() -> Result<Option<T>>,
{
    for tries in 1..=max_attempts {
        if let Some(value) = attempt()? {
            debug!("{} succeeded after {} attempts", stage, tries);
            return Ok(value);
        }
    }
    warn!("{} gave up after {} attempts", stage, max_attempts);
    Err(Error::KeyGenerationExhausted {
        stage,
        attempts: max_attempts,
    })
}

fn check_bounds(config: &KeyGenConfig, codec: &Codec) -> Result<()> {
    let invalid = |reason: &str| {
        Err(Error::InvalidBound {
            min: config.min_bound,
            max: config.max_bound,
            reason: reason.to_owned(),
        })
    };
    if config.min_bound > config.max_bound {
        return invalid("lower bound is above upper bound");
    }
    // prime gaps are short, so this stops early on any wide range
    let primes = (config.min_bound..=config.max_bound)
        .filter(|&candidate| is_prime(&BigUint::from(candidate)))
        .take(2)
        .count();
    if primes < 2 {
        return invalid("range holds fewer than two primes");
    }
    let max = BigUint::from(config.max_bound);
    if &max * &max < codec.block_limit() {
        return invalid("every modulus would be smaller than the codec's blocks");
    }
    Ok(())
}

/// Generates a keypair with `p`, `q` and `e` drawn from
/// `[config.min_bound, config.max_bound]`.
///
/// `q` is redrawn when it equals `p` or when `n = p * q` would be smaller
/// than `codec.block_limit()`, so every block of `codec` fits below `n`.
/// Each sampling loop gives up after `config.max_attempts` draws.
pub fn generate_keypair<R: Rng + ?Sized>(
    config: &KeyGenConfig,
    codec: &Codec,
    rng: &mut R,
) -> Result<Keypair> {
    check_bounds(config, codec)?;
    let now = Instant::now();
    let min = BigUint::from(config.min_bound);
    let upper = BigUint::from(config.max_bound) + 1u8;
    let block_limit = codec.block_limit();

    let p = retry(Stage::Prime, config.max_attempts, || {
        let candidate = rng.gen_biguint_range(&min, &upper);
        Ok(is_probable_prime(&candidate, config.rounds, rng).then_some(candidate))
    })?;
    let q = retry(Stage::Prime, config.max_attempts, || {
        let candidate = rng.gen_biguint_range(&min, &upper);
        if candidate == p || &p * &candidate < block_limit {
            return Ok(None);
        }
        Ok(is_probable_prime(&candidate, config.rounds, rng).then_some(candidate))
    })?;
    debug!("Found primes p = {} and q = {}", p, q);

    let n = &p * &q;
    let phi = totient(&p, &q);
    let phi_int = BigInt::from_biguint(Plus, phi.clone());
    let two = BigInt::from(2u8);

    let (e, d) = retry(Stage::Exponent, config.max_attempts, || {
        let e = rng.gen_biguint_range(&min, &upper);
        let (g, d, _) = extended_gcd(&BigInt::from_biguint(Plus, e.clone()), &phi_int);
        if g.is_one() && d > two && d < phi_int {
            Ok(d.to_biguint().map(|d| (e, d)))
        } else {
            Ok(None)
        }
    })?;

    let keypair = Keypair::validated(n, e, d, &phi)?;
    let confidence = 1.0 - 1.0 / 4.0f64.powi(config.rounds as i32);
    info!(
        "Generated keypair n = {} e = {} in {}ms (prime confidence {})",
        keypair.n,
        keypair.e,
        now.elapsed().as_millis(),
        confidence
    );
    Ok(keypair)
}

/// Generates keypairs until one encrypts and decrypts `check_message` back to
/// itself, giving up after `config.max_attempts` keypairs.
pub fn generate_verified_keypair<R: Rng + ?Sized>(
    config: &KeyGenConfig,
    codec: &Codec,
    check_message: &str,
    rng: &mut R,
) -> Result<Keypair> {
    retry(Stage::Verification, config.max_attempts, || {
        let keypair = generate_keypair(config, codec, rng)?;
        let encrypted = rsa_encrypt_with(codec, &keypair.public_key(), check_message)?;
        match rsa_decrypt_with(codec, &keypair.private_key(), &encrypted) {
            Ok(decrypted) if decrypted == check_message => Ok(Some(keypair)),
            Ok(decrypted) => {
                warn!("Check message came back as {:?}, trying again", decrypted);
                Ok(None)
            }
            Err(err) => {
                warn!("Check message failed to decrypt ({}), trying again", err);
                Ok(None)
            }
        }
    })
}
