//! Reference ellipsoid parameters.

use crate::error::GeodError;
use crate::math::{atanh, is_finite, sq};

pub const WGS84_A: f64 = 6_378_137.0;
pub const WGS84_F: f64 = 1.0 / 298.257_223_563;

/// Named ellipsoids as (name, semi-major axis, flattening).
const NAMED: &[(&str, f64, f64)] = &[
    ("WGS84", WGS84_A, WGS84_F),
    ("GRS80", 6_378_137.0, 1.0 / 298.257_222_101),
    ("clrk66", 6_378_206.4, 1.0 - 6_356_583.8 / 6_378_206.4),
    ("intl", 6_378_388.0, 1.0 / 297.0),
    ("bessel", 6_377_397.155, 1.0 / 299.152_812_8),
    ("airy", 6_377_563.396, 1.0 - 6_356_256.910 / 6_377_563.396),
    ("krass", 6_378_245.0, 1.0 / 298.3),
    ("sphere", 6_370_997.0, 0.0),
];

/// An ellipsoid of revolution with its derived constants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ellipsoid {
    /// Equatorial radius (metres)
    pub a: f64,
    /// Flattening; negative for a prolate ellipsoid
    pub f: f64,
    /// 1 - f
    pub f1: f64,
    /// First eccentricity squared: f(2 - f)
    pub e2: f64,
    /// Second eccentricity squared: e2 / f1^2
    pub ep2: f64,
    /// Third flattening: f / (2 - f)
    pub n: f64,
    /// Polar semi-axis: a * f1
    pub b: f64,
    /// Authalic radius squared
    pub c2: f64,
}

impl Ellipsoid {
    /// Build an ellipsoid from its equatorial radius and flattening.
    ///
    /// A flattening greater than 1 is taken as the inverse flattening.
    pub fn new(a: f64, f: f64) -> Result<Self, GeodError> {
        let ellipsoid = Self::derive(a, f);
        if !(is_finite(ellipsoid.a) && ellipsoid.a > 0.0) {
            return Err(GeodError::InvalidEllipsoid(format!(
                "major radius {a} is not positive"
            )));
        }
        if !(is_finite(ellipsoid.b) && ellipsoid.b > 0.0) {
            return Err(GeodError::InvalidEllipsoid(format!(
                "minor radius {} is not positive",
                ellipsoid.b
            )));
        }
        Ok(ellipsoid)
    }

    /// The WGS84 ellipsoid.
    pub fn wgs84() -> Self {
        Self::derive(WGS84_A, WGS84_F)
    }

    fn derive(a: f64, f: f64) -> Self {
        let f = if f <= 1.0 { f } else { 1.0 / f };
        let f1 = 1.0 - f;
        let e2 = f * (2.0 - f);
        let ep2 = e2 / sq(f1);
        let n = f / (2.0 - f);
        let b = a * f1;
        let c2 = (sq(a)
            + sq(b)
                * if e2 == 0.0 {
                    1.0
                } else {
                    let ratio = if e2 > 0.0 {
                        atanh(e2.sqrt())
                    } else {
                        (-e2).sqrt().atan()
                    };
                    ratio / e2.abs().sqrt()
                })
            / 2.0;
        Self {
            a,
            f,
            f1,
            e2,
            ep2,
            n,
            b,
            c2,
        }
    }

    /// Look up one of the built-in reference ellipsoids by name (case-insensitive).
    pub fn named(name: &str) -> Result<Self, GeodError> {
        let (_, a, f) = NAMED
            .iter()
            .find(|(n, _, _)| n.eq_ignore_ascii_case(name))
            .ok_or_else(|| GeodError::UnknownEllipsoid(name.to_string()))?;
        Self::new(*a, *f)
    }

    /// Names accepted by [`Ellipsoid::named`].
    pub fn names() -> impl Iterator<Item = &'static str> {
        NAMED.iter().map(|(n, _, _)| *n)
    }

    /// First eccentricity (imaginary for prolate ellipsoids, returned as NaN).
    pub fn eccentricity(&self) -> f64 {
        self.e2.sqrt()
    }

    /// Total surface area, 4 pi c2.
    pub fn area(&self) -> f64 {
        4.0 * std::f64::consts::PI * self.c2
    }
}
