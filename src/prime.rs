use num_bigint::{BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::Rng;

// Splits n into 2^r * s with s odd
fn factor_as_power_of_two_times_odd(n: &BigUint) -> (u64, BigUint) {
    let mut s = n.clone();
    let mut r = 0;
    while s.is_even() {
        r += 1;
        s >>= 1;
    }
    (r, s)
}

/// Miller-Rabin primality test.
///
/// Runs `rounds` witnesses drawn from `[2, n-2]`. A single witness of
/// compositeness is conclusive; passing every round means `n` is prime with
/// a false positive probability of at most `4^-rounds`.
pub fn is_probable_prime<R: Rng + ?Sized>(n: &BigUint, rounds: usize, rng: &mut R) -> bool {
    let one = BigUint::one();
    let two = BigUint::from(2u8);
    let three = BigUint::from(3u8);

    if n < &two {
        return false;
    }
    // 3 has no witness range to draw from
    if n == &two || n == &three {
        return true;
    }
    if n.is_even() {
        return false;
    }

    let n_minus_one = n - &one;
    let (r, s) = factor_as_power_of_two_times_odd(&n_minus_one);

    !(0..rounds).any(|_| {
        let a = rng.gen_biguint_range(&two, &n_minus_one);
        is_witness(&a, n, r, &s)
    })
}

const FIXED_WITNESSES: [u8; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

/// Miller-Rabin with the first twelve primes as witnesses.
///
/// Exact for every `n` below 3.3 * 10^24, so it needs no randomness for the
/// sizes handled here.
pub fn is_prime(n: &BigUint) -> bool {
    if n < &BigUint::from(2u8) {
        return false;
    }
    for p in FIXED_WITNESSES {
        let p = BigUint::from(p);
        if n == &p {
            return true;
        }
        if (n % &p).is_zero() {
            return false;
        }
    }

    let (r, s) = factor_as_power_of_two_times_odd(&(n - 1u8));
    !FIXED_WITNESSES
        .iter()
        .any(|&a| is_witness(&BigUint::from(a), n, r, &s))
}

// True when a proves n = 2^r * s + 1 composite
fn is_witness(a: &BigUint, n: &BigUint, r: u64, s: &BigUint) -> bool {
    let n_minus_one = n - 1u8;
    let two = BigUint::from(2u8);

    let mut x = a.modpow(s, n);
    if x.is_one() || x == n_minus_one {
        return false;
    }
    for _ in 1..r {
        x = x.modpow(&two, n);
        if x == n_minus_one {
            return false;
        }
    }
    true
}
