use num_bigint::{BigInt, BigUint, Sign::Plus};
use num_integer::Integer;
use num_traits::{One, Zero};
use std::mem;

/// Extended Euclidean algorithm.
///
/// Returns `(g, x, y)` with `a*x + b*y = g = gcd(a, b)`. Iterative, so the
/// stack stays flat whatever the size of the inputs.
pub fn extended_gcd(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
    let (mut old_r, mut r) = (a.clone(), b.clone());
    let (mut old_x, mut x) = (BigInt::one(), BigInt::zero());
    let (mut old_y, mut y) = (BigInt::zero(), BigInt::one());

    while !r.is_zero() {
        let quo = old_r.div_floor(&r);
        old_r -= &quo * &r;
        old_x -= &quo * &x;
        old_y -= &quo * &y;
        mem::swap(&mut old_r, &mut r);
        mem::swap(&mut old_x, &mut x);
        mem::swap(&mut old_y, &mut y);
    }
    (old_r, old_x, old_y)
}

/// Inverse of `a` modulo `m`, normalised into `[0, m)`, or `None` when `a`
/// and `m` share a factor.
pub fn mod_inverse(a: &BigUint, m: &BigUint) -> Option<BigUint> {
    if m.is_zero() {
        return None;
    }
    let modulo = BigInt::from_biguint(Plus, m.clone());
    let (gcd, x, _) = extended_gcd(&BigInt::from_biguint(Plus, a.clone()), &modulo);
    if !gcd.is_one() {
        return None;
    }
    x.mod_floor(&modulo).to_biguint()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn i(n: i64) -> BigInt {
        BigInt::from(n)
    }

    fn u(n: u64) -> BigUint {
        BigUint::from(n)
    }

    #[test]
    fn base_cases_work() {
        assert_eq!(extended_gcd(&i(42), &i(0)), (i(42), i(1), i(0)));
        assert_eq!(extended_gcd(&i(0), &i(42)), (i(42), i(0), i(1)));
        assert_eq!(extended_gcd(&i(0), &i(0)), (i(0), i(1), i(0)));
    }

    #[test]
    fn textbook_vector_works() {
        let (g, x, y) = extended_gcd(&i(17), &i(3120));
        assert_eq!(g, i(1));
        assert_eq!(i(17) * &x + i(3120) * &y, i(1));
        assert_eq!(x.mod_floor(&i(3120)), i(2753));
    }

    #[test]
    fn bezout_identity_holds() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..2000 {
            let a: i64 = rng.gen_range(0..1_000_000);
            let b: i64 = rng.gen_range(0..1_000_000);
            let (g, x, y) = extended_gcd(&i(a), &i(b));
            assert_eq!(g, i(a.gcd(&b)), "gcd({a}, {b})");
            assert_eq!(i(a) * x + i(b) * y, g, "bezout({a}, {b})");
        }
    }

    #[test]
    fn large_inputs_work() {
        // consecutive Fibonacci numbers are the worst case for Euclid
        let (mut f0, mut f1) = (BigInt::one(), BigInt::one());
        for _ in 0..5000 {
            let next = &f0 + &f1;
            f0 = mem::replace(&mut f1, next);
        }
        let (g, x, y) = extended_gcd(&f1, &f0);
        assert!(g.is_one());
        assert_eq!(&f1 * x + &f0 * y, g);
    }

    #[test]
    fn mod_inverse_works() {
        assert_eq!(mod_inverse(&u(5), &u(14)), Some(u(3)));
        assert_eq!(mod_inverse(&u(2), &u(5)), Some(u(3)));
        assert_eq!(mod_inverse(&u(2), &u(7)), Some(u(4)));
        assert_eq!(mod_inverse(&u(17), &u(3120)), Some(u(2753)));
        assert_eq!(mod_inverse(&u(6), &u(9)), None);
        assert_eq!(mod_inverse(&u(6), &u(0)), None);
    }
}
