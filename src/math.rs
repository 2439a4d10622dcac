//! Platform-independent constants and small numeric helpers shared by the
//! geodesic engine and the polygon accumulator.

use std::f64::consts::PI;

/// Difference between 1 and the next larger double: 2^-52.
pub const EPSILON: f64 = f64::EPSILON;
/// Smallest positive normalized double: 2^-1022.
pub const MIN_VAL: f64 = f64::MIN_POSITIVE;
/// Largest finite double: 2^1023 * (2 - EPSILON).
pub const MAX_VAL: f64 = f64::MAX;
/// Radians per degree.
pub const DEGREE: f64 = PI / 180.0;
pub const NAN: f64 = f64::NAN;
pub const INF: f64 = f64::INFINITY;

#[inline]
pub fn sq(x: f64) -> f64 {
    x * x
}

/// Real cube root; negative arguments give negative roots.
#[inline]
pub fn cbrt(x: f64) -> f64 {
    let y = x.abs().powf(1.0 / 3.0);
    if x >= 0.0 {
        y
    } else {
        -y
    }
}

/// log(1 + x), accurate for small x.
#[inline]
pub fn log1p(x: f64) -> f64 {
    x.ln_1p()
}

/// Inverse hyperbolic tangent, odd by construction.
#[inline]
pub fn atanh(x: f64) -> f64 {
    let y = x.abs();
    let y = log1p(2.0 * y / (1.0 - y)) / 2.0;
    if x < 0.0 {
        -y
    } else {
        y
    }
}

/// True for finite values; NaN and infinities fail.
#[inline]
pub fn is_finite(x: f64) -> bool {
    x.abs() <= MAX_VAL
}

/// Place an angle in [-180, 180). Assumes x is in [-540, 540).
#[inline]
pub fn ang_normalize(x: f64) -> f64 {
    if x >= 180.0 {
        x - 360.0
    } else if x < -180.0 {
        x + 360.0
    } else {
        x
    }
}

/// Reduce an angle of any size to [-180, 180). Infinities give NaN.
#[inline]
pub fn ang_wrap(x: f64) -> f64 {
    ang_normalize(x % 360.0)
}

/// Snap tiny angles onto a grid of 1/16 degree increments near zero.
///
/// The smallest nonzero result is 1/16 - nextafter(1/16, 0) = 2^-57, about
/// 0.7 pm on the earth. This removes near-singular inputs such as 1e-200
/// without disturbing angles of ordinary size.
#[inline]
pub fn ang_round(x: f64) -> f64 {
    const Z: f64 = 1.0 / 16.0;
    let y = x.abs();
    let y = if y < Z { Z - (Z - y) } else { y };
    if x < 0.0 {
        -y
    } else {
        y
    }
}

/// Rescale a (sin, cos) pair onto the unit circle.
#[inline]
pub fn sin_cos_norm(sinx: f64, cosx: f64) -> (f64, f64) {
    let r = sinx.hypot(cosx);
    (sinx / r, cosx / r)
}

/// Latitudes outside [-90, 90] become NaN.
#[inline]
pub fn lat_fix(x: f64) -> f64 {
    if x.abs() > 90.0 {
        NAN
    } else {
        x
    }
}

/// Error-free transformation of a sum: u + v == s + t exactly, s = round(u + v).
#[inline]
pub fn two_sum(u: f64, v: f64) -> (f64, f64) {
    let s = u + v;
    let up = s - v;
    let vpp = s - up;
    let up = up - u;
    let vpp = vpp - v;
    (s, -(up + vpp))
}
