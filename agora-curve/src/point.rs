use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Serialize, Serializer};

use std::fmt;

/// A point of a short Weierstrass curve, either the point at infinity or an
/// affine coordinate pair.
///
/// `Infinity` is both the group identity and the result of every group-law
/// case the arithmetic leaves undefined, see [`CurveGroup::combine`].
///
/// [`CurveGroup::combine`]: crate::CurveGroup::combine
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum CurvePoint {
    Infinity,
    Affine {
        #[serde(serialize_with = "serialize_decimal")]
        x: BigUint,
        #[serde(serialize_with = "serialize_decimal")]
        y: BigUint,
    },
}

pub(crate) fn serialize_decimal<S: Serializer>(number: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(number)
}

impl CurvePoint {
    pub fn new(x: BigUint, y: BigUint) -> Self {
        Self::Affine { x, y }
    }

    pub fn from_u64(x: u64, y: u64) -> Self {
        Self::new(BigUint::from(x), BigUint::from(y))
    }

    pub fn is_identity(&self) -> bool {
        matches!(self, Self::Infinity)
    }

    /// Doubling such a point yields `Infinity`, see [`CurveGroup::combine`].
    ///
    /// [`CurveGroup::combine`]: crate::CurveGroup::combine
    pub fn has_zero_x(&self) -> bool {
        self.x().is_some_and(Zero::is_zero)
    }

    pub fn x(&self) -> Option<&BigUint> {
        match self {
            Self::Infinity => None,
            Self::Affine { x, .. } => Some(x),
        }
    }

    pub fn y(&self) -> Option<&BigUint> {
        match self {
            Self::Infinity => None,
            Self::Affine { y, .. } => Some(y),
        }
    }
}

impl fmt::Display for CurvePoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Infinity => write!(f, "O"),
            Self::Affine { x, y } => write!(f, "({}, {})", x, y),
        }
    }
}
