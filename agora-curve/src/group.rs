use crate::field::PrimeField;
use crate::point::{serialize_decimal, CurvePoint};
use crate::CurveError;

use log::{debug, trace};
use num_bigint::BigUint;
use serde::ser::{Serialize, SerializeStruct, Serializer};

use std::fmt;

/// The cyclic subgroup generated by a base point `g` on the curve
/// `y^2 = x^3 + a*x + b (mod p)`.
///
/// Construction enumerates `g, 2g, 3g, ...` until the first `Infinity`, so
/// it only terminates for a base point of finite order on a well-formed curve.
/// Neither the curve parameters nor the base point are validated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurveGroup {
    field: PrimeField,
    a: BigUint,
    b: BigUint,
    generator: CurvePoint,
    points: Vec<CurvePoint>,
}

impl CurveGroup {
    pub fn new(a: BigUint, b: BigUint, p: BigUint, generator: CurvePoint) -> Result<Self, CurveError> {
        let field = PrimeField::new(p);
        let a = field.reduce(&a);
        let b = field.reduce(&b);
        let mut group = Self {
            field,
            a,
            b,
            generator,
            points: Vec::new(),
        };
        group.points = group.enumerate_subgroup()?;
        debug!(
            "enumerated subgroup of {} with order {}",
            group.generator,
            group.order()
        );
        Ok(group)
    }

    pub fn from_u64(a: u64, b: u64, p: u64, generator: CurvePoint) -> Result<Self, CurveError> {
        Self::new(BigUint::from(a), BigUint::from(b), BigUint::from(p), generator)
    }

    // g, 2g, ... terminated by the first Infinity
    fn enumerate_subgroup(&self) -> Result<Vec<CurvePoint>, CurveError> {
        let mut points = vec![self.generator.clone()];
        let mut accumulator = self.generator.clone();
        while !accumulator.is_identity() {
            accumulator = self.combine(&accumulator, &self.generator)?;
            points.push(accumulator.clone());
        }
        Ok(points)
    }

    pub fn a(&self) -> &BigUint {
        &self.a
    }

    pub fn b(&self) -> &BigUint {
        &self.b
    }

    pub fn modulus(&self) -> &BigUint {
        self.field.modulus()
    }

    pub fn field(&self) -> &PrimeField {
        &self.field
    }

    pub fn generator(&self) -> &CurvePoint {
        &self.generator
    }

    /// Number of enumerated points, the terminating `Infinity` included.
    pub fn order(&self) -> usize {
        self.points.len()
    }

    pub fn points(&self) -> &[CurvePoint] {
        &self.points
    }

    pub fn is_on_curve(&self, point: &CurvePoint) -> bool {
        match point {
            CurvePoint::Infinity => true,
            CurvePoint::Affine { x, y } => {
                let y2 = self.field.mul(y, y);
                let x3 = self.field.mul(&self.field.mul(x, x), x);
                let ax = self.field.mul(&self.a, x);
                let rhs = self.field.add(&self.field.add(&x3, &ax), &self.b);
                y2 == rhs
            }
        }
    }

    /// Adds two points with the group law.
    ///
    /// The degenerate cases do not follow the textbook rules:
    /// * an `Infinity` operand annihilates, `P + O = O`;
    /// * doubling a point with `x == 0` gives `Infinity` whatever its `y`;
    /// * two distinct points sharing `x` give `Infinity`.
    ///
    /// Doubling a point with `y == 0` and `x != 0` hits a zero inverse and
    /// surfaces [`CurveError::DivisionByZero`].
    pub fn combine(&self, lhs: &CurvePoint, rhs: &CurvePoint) -> Result<CurvePoint, CurveError> {
        let (x1, y1, x2, y2) = match (lhs, rhs) {
            (CurvePoint::Affine { x: x1, y: y1 }, CurvePoint::Affine { x: x2, y: y2 }) => {
                (x1, y1, x2, y2)
            }
            _ => {
                trace!("{} + {}: missing operand", lhs, rhs);
                return Ok(CurvePoint::Infinity);
            }
        };

        let slope = if lhs == rhs {
            if lhs.has_zero_x() {
                trace!("{} doubled: tangent at x == 0", lhs);
                return Ok(CurvePoint::Infinity);
            }
            let three_x2 = self.field.mul(&BigUint::from(3_u32), &self.field.mul(x1, x1));
            let numerator = self.field.add(&three_x2, &self.a);
            let denominator = self.field.add(y1, y1);
            self.field.mul(&numerator, &self.field.inverse(&denominator)?)
        } else {
            if x1 == x2 {
                trace!("{} + {}: vertical line", lhs, rhs);
                return Ok(CurvePoint::Infinity);
            }
            let numerator = self.field.sub(y1, y2);
            let denominator = self.field.sub(x1, x2);
            self.field.mul(&numerator, &self.field.inverse(&denominator)?)
        };

        let x3 = self
            .field
            .sub(&self.field.mul(&slope, &slope), &self.field.add(x1, x2));
        let y3 = self
            .field
            .sub(&self.field.mul(&slope, &self.field.sub(x1, &x3)), y1);
        Ok(CurvePoint::new(x3, y3))
    }

    /// `k`-fold sum of `point` with itself, for `k >= 1`.
    ///
    /// Multiples of the generator are read from the enumerated subgroup; any
    /// other point is scaled by repeated addition. Double-and-add is not a
    /// drop-in replacement here because the `x == 0` doubling rule would fire
    /// on intermediate points that repeated addition never doubles.
    ///
    /// `k == 0` returns `point` unchanged.
    pub fn scale(&self, point: &CurvePoint, k: u64) -> Result<CurvePoint, CurveError> {
        if point == &self.generator && k > 0 {
            let multiple = usize::try_from(k - 1)
                .ok()
                .and_then(|index| self.points.get(index))
                .cloned()
                .unwrap_or(CurvePoint::Infinity);
            return Ok(multiple);
        }
        self.scale_by_addition(point, k)
    }

    fn scale_by_addition(&self, point: &CurvePoint, k: u64) -> Result<CurvePoint, CurveError> {
        let mut result = point.clone();
        for _ in 1..k {
            // Infinity annihilates, nothing changes past this point
            if result.is_identity() {
                break;
            }
            result = self.combine(&result, point)?;
        }
        Ok(result)
    }
}

impl fmt::Display for CurveGroup {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, point) in self.points.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", point)?;
        }
        Ok(())
    }
}

impl Serialize for CurveGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct Decimal<'a>(&'a BigUint);

        impl Serialize for Decimal<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serialize_decimal(self.0, serializer)
            }
        }

        let mut state = serializer.serialize_struct("CurveGroup", 6)?;
        state.serialize_field("a", &Decimal(&self.a))?;
        state.serialize_field("b", &Decimal(&self.b))?;
        state.serialize_field("p", &Decimal(self.modulus()))?;
        state.serialize_field("generator", &self.generator)?;
        state.serialize_field("order", &self.order())?;
        state.serialize_field("points", &self.points)?;
        state.end()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn point(x: u64, y: u64) -> CurvePoint {
        CurvePoint::from_u64(x, y)
    }

    // y^2 = x^3 + 2x + 2 (mod 17), g = (5, 1)
    fn worked_group() -> CurveGroup {
        CurveGroup::from_u64(2, 2, 17, point(5, 1)).unwrap()
    }

    // y^2 = x^3 + 2x + 3 (mod 97), g = (1, 43)
    fn even_group() -> CurveGroup {
        CurveGroup::from_u64(2, 3, 97, point(1, 43)).unwrap()
    }

    #[test]
    fn worked_example_subgroup() {
        let group = worked_group();
        let expected = vec![
            point(5, 1),
            point(6, 3),
            point(10, 6),
            point(3, 1),
            point(9, 16),
            point(16, 13),
            point(0, 6),
            point(13, 7),
            point(7, 6),
            point(7, 11),
            point(13, 10),
            point(0, 11),
            point(16, 4),
            point(9, 1),
            point(3, 16),
            point(10, 11),
            point(6, 14),
            point(5, 16),
            CurvePoint::Infinity,
        ];
        assert_eq!(group.order(), 19);
        assert_eq!(group.points(), expected.as_slice());
        assert_eq!(group.generator(), &point(5, 1));
        assert_eq!(group.modulus(), &BigUint::from(17_u32));
        assert!(group.points().iter().all(|p| group.is_on_curve(p)));
        assert!(!group.is_on_curve(&point(5, 2)));
    }

    #[test]
    fn group_with_even_order() {
        let group = even_group();
        assert_eq!(group.order(), 50);
        assert_eq!(group.points()[1], point(92, 16));
        assert_eq!(group.points()[2], point(0, 10));
        assert_eq!(group.points()[24], point(30, 0));
        assert_eq!(group.points()[46], point(0, 87));
        assert_eq!(group.points().last(), Some(&CurvePoint::Infinity));
    }

    #[test]
    fn identity_generator() {
        let group = CurveGroup::from_u64(2, 2, 17, CurvePoint::Infinity).unwrap();
        assert_eq!(group.order(), 1);
        assert_eq!(group.points(), &[CurvePoint::Infinity]);
    }

    #[test]
    fn coefficients_are_reduced() {
        let group = CurveGroup::from_u64(19, 36, 17, point(5, 1)).unwrap();
        assert_eq!(group.a(), &BigUint::from(2_u32));
        assert_eq!(group.b(), &BigUint::from(2_u32));
        assert_eq!(group.points(), worked_group().points());
    }

    #[test]
    fn successive_multiples() {
        for group in [worked_group(), even_group()] {
            let g = group.generator().clone();
            let n = group.order() as u64;
            for i in 1..n {
                let ig = group.scale(&g, i).unwrap();
                assert_eq!(
                    group.combine(&ig, &g).unwrap(),
                    group.scale(&g, i + 1).unwrap()
                );
            }
            assert_eq!(group.scale(&g, n).unwrap(), CurvePoint::Infinity);
            // Infinity absorbs further additions
            assert_eq!(group.scale(&g, n + 1).unwrap(), CurvePoint::Infinity);
            assert_eq!(group.scale(&g, 10 * n).unwrap(), CurvePoint::Infinity);
        }
    }

    #[test]
    fn lookup_matches_repeated_addition() {
        let group = even_group();
        let g = group.generator().clone();
        for k in 1..=60 {
            assert_eq!(
                group.scale(&g, k).unwrap(),
                group.scale_by_addition(&g, k).unwrap()
            );
        }
        assert_eq!(group.scale(&g, 0).unwrap(), g);
        assert_eq!(group.scale_by_addition(&g, 0).unwrap(), g);
    }

    #[test]
    fn combine_commutes() {
        for group in [worked_group(), even_group()] {
            for p in group.points() {
                for q in group.points() {
                    assert_eq!(group.combine(p, q), group.combine(q, p));
                }
            }
        }
    }

    #[test]
    fn combine_associates_on_odd_subgroup() {
        let group = worked_group();
        let points = group.points();
        for p in points {
            for q in points {
                for r in points {
                    let pq = group.combine(p, q).unwrap();
                    let qr = group.combine(q, r).unwrap();
                    let left = group.combine(&pq, r).unwrap();
                    let right = group.combine(p, &qr).unwrap();
                    // the degenerate rules collapse some sums to Infinity
                    if !left.is_identity() && !right.is_identity() {
                        assert_eq!(left, right);
                    }
                }
            }
        }
    }

    #[test]
    fn infinity_annihilates() {
        let group = worked_group();
        for p in group.points() {
            assert_eq!(
                group.combine(&CurvePoint::Infinity, p).unwrap(),
                CurvePoint::Infinity
            );
            assert_eq!(
                group.combine(p, &CurvePoint::Infinity).unwrap(),
                CurvePoint::Infinity
            );
        }
        assert_eq!(
            group.scale(&CurvePoint::Infinity, 5).unwrap(),
            CurvePoint::Infinity
        );
    }

    #[test]
    fn doubling_with_zero_x() {
        let group = worked_group();
        assert_eq!(
            group.combine(&point(0, 6), &point(0, 6)).unwrap(),
            CurvePoint::Infinity
        );
        assert_eq!(
            group.combine(&point(0, 11), &point(0, 11)).unwrap(),
            CurvePoint::Infinity
        );
        // not on the curve, the rule only looks at x
        assert_eq!(
            group.combine(&point(0, 5), &point(0, 5)).unwrap(),
            CurvePoint::Infinity
        );
        assert_eq!(group.scale(&point(0, 6), 2).unwrap(), CurvePoint::Infinity);

        let group = even_group();
        assert_eq!(
            group.combine(&point(0, 10), &point(0, 10)).unwrap(),
            CurvePoint::Infinity
        );
    }

    #[test]
    fn vertical_line() {
        let group = worked_group();
        assert_eq!(
            group.combine(&point(5, 1), &point(5, 16)).unwrap(),
            CurvePoint::Infinity
        );
        assert_eq!(
            group.combine(&point(0, 6), &point(0, 11)).unwrap(),
            CurvePoint::Infinity
        );
    }

    #[test]
    fn doubling_with_zero_y_fails() {
        let group = even_group();
        assert_eq!(
            group.combine(&point(30, 0), &point(30, 0)),
            Err(CurveError::DivisionByZero)
        );
        assert_eq!(
            group.scale(&point(30, 0), 2),
            Err(CurveError::DivisionByZero)
        );

        // y^2 = x^3 + 7 (mod 101) has an order-two point at (93, 0)
        let group = CurveGroup::from_u64(0, 7, 101, point(4, 24)).unwrap();
        assert_eq!(group.order(), 102);
        assert_eq!(group.points()[50], point(93, 0));
        assert_eq!(
            group.combine(&point(93, 0), &point(93, 0)),
            Err(CurveError::DivisionByZero)
        );
    }

    #[test]
    fn shared_secret_agreement() {
        let group = worked_group();
        let g = group.generator().clone();
        let alpha_public = group.scale(&g, 9).unwrap();
        let beta_public = group.scale(&g, 3).unwrap();
        assert_eq!(alpha_public, point(7, 6));
        assert_eq!(beta_public, point(10, 6));
        let alice = group.scale(&beta_public, 9).unwrap();
        let bob = group.scale(&alpha_public, 3).unwrap();
        assert_eq!(alice, point(13, 7));
        assert_eq!(alice, bob);

        let group = even_group();
        let g = group.generator().clone();
        let alpha_public = group.scale(&g, 13).unwrap();
        let beta_public = group.scale(&g, 29).unwrap();
        assert_eq!(alpha_public, point(47, 79));
        assert_eq!(beta_public, point(10, 21));
        assert_eq!(group.scale(&beta_public, 13).unwrap(), point(11, 80));
        assert_eq!(group.scale(&alpha_public, 29).unwrap(), point(11, 80));
    }

    #[test]
    fn random_agreement_away_from_zero_x() {
        let group = worked_group();
        let g = group.generator().clone();
        let n = group.order() as u64;
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..50 {
            let alpha = rng.gen_range(1..n);
            let beta = rng.gen_range(1..n);
            let alpha_public = group.scale(&g, alpha).unwrap();
            let beta_public = group.scale(&g, beta).unwrap();
            // 7g and 12g sit at x == 0 and collapse when doubled
            if alpha_public.has_zero_x() || beta_public.has_zero_x() {
                continue;
            }
            assert_eq!(
                group.scale(&beta_public, alpha).unwrap(),
                group.scale(&alpha_public, beta).unwrap()
            );
        }
    }

    #[test]
    fn display_and_serialize() {
        let group = CurveGroup::from_u64(2, 3, 97, point(3, 6)).unwrap();
        assert_eq!(group.order(), 5);
        assert_eq!(group.to_string(), "(3, 6), (80, 10), (80, 87), (3, 91), O");
        let json = serde_json::to_value(&group).unwrap();
        assert_eq!(json["p"], "97");
        assert_eq!(json["order"], 5);
        assert_eq!(json["points"][4], "Infinity");
        assert_eq!(json["generator"]["Affine"]["x"], "3");
    }
}
