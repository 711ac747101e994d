#![deny(clippy::all)]
#![deny(clippy::dbg_macro)]

mod field;
mod group;
mod point;

pub use field::PrimeField;
pub use group::CurveGroup;
pub use point::CurvePoint;

pub use num_bigint::BigUint;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CurveError {
    #[error("attempted to invert zero modulo p")]
    DivisionByZero,
}
