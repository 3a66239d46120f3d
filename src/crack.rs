//! Recovering the private exponent from a public key by factoring `n`.
//!
//! This only finishes in reasonable time because `n` is tiny: every number
//! up to `n` is tested for primality before the factor pair is searched.

use crate::error::{Error, Result};
use crate::euclid::mod_inverse;
use crate::key_gen::{totient, PrivateKey, PublicKey};
use crate::prime::is_probable_prime;
use log::{debug, info};
use num_bigint::BigUint;
use num_traits::{One, ToPrimitive};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::time::Instant;

/// All primes `<= limit`, in increasing order.
///
/// Candidates are tested in parallel. Each one gets its own `StdRng`,
/// seeded from one draw of `rng` mixed with the candidate, so the result
/// depends only on `rng` and not on how rayon splits the work.
pub fn list_primes<R: Rng + ?Sized>(limit: usize, rounds: usize, rng: &mut R) -> Vec<usize> {
    let seed: u64 = rng.gen();
    (2..=limit)
        .into_par_iter()
        .filter(|&candidate| {
            let mut rng = StdRng::seed_from_u64(seed ^ candidate as u64);
            is_probable_prime(&BigUint::from(candidate), rounds, &mut rng)
        })
        .collect()
}

/// Smallest `d >= 1` with `e * d = 1 (mod phi)`.
pub fn find_private_exponent(e: &BigUint, phi: &BigUint) -> Option<BigUint> {
    // every integer is congruent to 1 modulo 1
    if phi.is_one() {
        return Some(BigUint::one());
    }
    mod_inverse(e, phi).filter(|d| ((e * d) % phi).is_one())
}

/// Recovers a private exponent for `(n, e)`.
///
/// Lists every prime up to `n`, looks for a pair `p * q = n` among them and
/// inverts `e` modulo `(p - 1) * (q - 1)`. The pair with the smallest `p`
/// that yields an inverse wins.
pub fn crack<R: Rng + ?Sized>(
    n: &BigUint,
    e: &BigUint,
    rounds: usize,
    rng: &mut R,
) -> Result<BigUint> {
    let limit = n
        .to_usize()
        .ok_or_else(|| Error::ModulusTooLarge(n.clone()))?;

    let now = Instant::now();
    let primes = list_primes(limit, rounds, rng);
    info!(
        "Listed {} primes up to {} in {}ms",
        primes.len(),
        limit,
        now.elapsed().as_millis()
    );

    let now = Instant::now();
    let found = primes.par_iter().find_map_first(|&p| {
        if limit % p != 0 {
            return None;
        }
        let q = limit / p;
        primes.binary_search(&q).ok()?;
        debug!("Found factors p = {} and q = {}", p, q);
        let phi = totient(&BigUint::from(p), &BigUint::from(q));
        find_private_exponent(e, &phi)
    });

    match found {
        Some(d) => {
            info!("Recovered d = {} in {}ms", d, now.elapsed().as_millis());
            Ok(d)
        }
        None => Err(Error::CrackNotFound(n.clone())),
    }
}

pub fn crack_public_key<R: Rng + ?Sized>(
    pub_key: &PublicKey,
    rounds: usize,
    rng: &mut R,
) -> Result<PrivateKey> {
    let d = crack(pub_key.n(), pub_key.e(), rounds, rng)?;
    Ok(PrivateKey::new(pub_key.n().clone(), d))
}
