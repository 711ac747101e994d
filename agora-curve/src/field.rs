use crate::CurveError;

use num_bigint::BigUint;
use num_traits::{One, Zero};

/// Arithmetic over the integers modulo a prime `p`.
///
/// Every operation returns a value reduced into `[0, p)`. Operands do not
/// need to be reduced beforehand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrimeField {
    modulus: BigUint,
}

impl PrimeField {
    pub fn new(modulus: BigUint) -> Self {
        Self { modulus }
    }

    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    pub fn reduce(&self, number: &BigUint) -> BigUint {
        if number < &self.modulus {
            number.clone()
        } else {
            number % &self.modulus
        }
    }

    pub fn add(&self, lhs: &BigUint, rhs: &BigUint) -> BigUint {
        (lhs + rhs) % &self.modulus
    }

    pub fn neg(&self, number: &BigUint) -> BigUint {
        let reduced = self.reduce(number);
        if reduced.is_zero() {
            reduced
        } else {
            &self.modulus - reduced
        }
    }

    pub fn sub(&self, lhs: &BigUint, rhs: &BigUint) -> BigUint {
        self.add(lhs, &self.neg(rhs))
    }

    pub fn mul(&self, lhs: &BigUint, rhs: &BigUint) -> BigUint {
        (lhs * rhs) % &self.modulus
    }

    /// Multiplicative inverse through Fermat's little theorem, `x^(p - 2)`.
    ///
    /// Only meaningful for a prime modulus; a composite one yields an
    /// arbitrary value instead of an error.
    pub fn inverse(&self, number: &BigUint) -> Result<BigUint, CurveError> {
        let reduced = self.reduce(number);
        if reduced.is_zero() {
            return Err(CurveError::DivisionByZero);
        }
        let two = BigUint::one() + BigUint::one();
        let exponent = if self.modulus > two {
            &self.modulus - two
        } else {
            // 1 is its own inverse modulo 2
            BigUint::one()
        };
        Ok(reduced.modpow(&exponent, &self.modulus))
    }
}
