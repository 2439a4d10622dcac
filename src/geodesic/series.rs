//! Series expansions in the third flattening `n` and in `eps`.
//!
//! The per-ellipsoid coefficient tables (`A3x`, `C3x`, `C4x`) are filled once
//! by [`Geodesic::new`](super::Geodesic::new); the per-geodesic series
//! (`C1`, `C1'`, `C2`) depend only on `eps` and are written into caller-owned
//! scratch arrays.

use super::{Geodesic, N_A3X, N_C3, N_C3X, N_C4, N_C4X};
use crate::math::sq;

/// Evaluate `y = sinp ? sum(c[i] sin(2 i x), i, 1, n) : sum(c[i] cos((2 i + 1) x), i, 0, n - 1)`
/// by Clenshaw summation.
pub(crate) fn sin_cos_series(sinp: bool, sinx: f64, cosx: f64, c: &[f64], n: usize) -> f64 {
    // Point to one beyond the last element
    let mut k = n + usize::from(sinp);
    // 2 * cos(2 * x)
    let ar = 2.0 * (cosx - sinx) * (cosx + sinx);
    let mut y0 = if n & 1 != 0 {
        k -= 1;
        c[k]
    } else {
        0.0
    };
    let mut y1 = 0.0;
    // Unroll loop x 2, so accumulators return to their original role
    for _ in 0..n / 2 {
        k -= 1;
        y1 = ar * y0 - y1 + c[k];
        k -= 1;
        y0 = ar * y1 - y0 + c[k];
    }
    if sinp {
        // sin(2 * x) * y0
        2.0 * sinx * cosx * y0
    } else {
        // cos(x) * (y0 - y1)
        cosx * (y0 - y1)
    }
}

/// The scale factor A1 - 1 = mean value of (d/dsigma)I1 - 1.
pub(crate) fn a1m1f(eps: f64) -> f64 {
    let eps2 = sq(eps);
    let t = eps2 * (eps2 * (eps2 + 4.0) + 64.0) / 256.0;
    (t + eps) / (1.0 - eps)
}

/// The coefficients C1[l] in the Fourier expansion of B1. Sets `c[1..=6]`.
pub(crate) fn c1f(eps: f64, c: &mut [f64]) {
    let eps2 = sq(eps);
    let mut d = eps;
    c[1] = d * ((6.0 - eps2) * eps2 - 16.0) / 32.0;
    d *= eps;
    c[2] = d * ((64.0 - 9.0 * eps2) * eps2 - 128.0) / 2048.0;
    d *= eps;
    c[3] = d * (9.0 * eps2 - 16.0) / 768.0;
    d *= eps;
    c[4] = d * (3.0 * eps2 - 5.0) / 512.0;
    d *= eps;
    c[5] = -7.0 * d / 1280.0;
    d *= eps;
    c[6] = -7.0 * d / 2048.0;
}

/// The coefficients C1p[l] in the Fourier expansion of B1p, the reversion of B1.
pub(crate) fn c1pf(eps: f64, c: &mut [f64]) {
    let eps2 = sq(eps);
    let mut d = eps;
    c[1] = d * (eps2 * (205.0 * eps2 - 432.0) + 768.0) / 1536.0;
    d *= eps;
    c[2] = d * (eps2 * (4005.0 * eps2 - 4736.0) + 3840.0) / 12288.0;
    d *= eps;
    c[3] = d * (116.0 - 225.0 * eps2) / 384.0;
    d *= eps;
    c[4] = d * (2695.0 - 7173.0 * eps2) / 7680.0;
    d *= eps;
    c[5] = 3467.0 * d / 7680.0;
    d *= eps;
    c[6] = 38081.0 * d / 61440.0;
}

/// The scale factor A2 - 1 = mean value of (d/dsigma)I2 - 1.
pub(crate) fn a2m1f(eps: f64) -> f64 {
    let eps2 = sq(eps);
    let t = eps2 * (eps2 * (25.0 * eps2 + 36.0) + 64.0) / 256.0;
    t * (1.0 - eps) - eps
}

/// The coefficients C2[l] in the Fourier expansion of B2.
pub(crate) fn c2f(eps: f64, c: &mut [f64]) {
    let eps2 = sq(eps);
    let mut d = eps;
    c[1] = d * (eps2 * (eps2 + 2.0) + 16.0) / 32.0;
    d *= eps;
    c[2] = d * (eps2 * (35.0 * eps2 + 64.0) + 384.0) / 2048.0;
    d *= eps;
    c[3] = d * (15.0 * eps2 + 80.0) / 768.0;
    d *= eps;
    c[4] = d * (7.0 * eps2 + 35.0) / 512.0;
    d *= eps;
    c[5] = 63.0 * d / 1280.0;
    d *= eps;
    c[6] = 77.0 * d / 2048.0;
}

pub(crate) fn a3_coeff(n: f64) -> [f64; N_A3X] {
    [
        1.0,
        (n - 1.0) / 2.0,
        (n * (3.0 * n - 1.0) - 2.0) / 8.0,
        ((-n - 3.0) * n - 1.0) / 16.0,
        (-2.0 * n - 3.0) / 64.0,
        -3.0 / 128.0,
    ]
}

pub(crate) fn c3_coeff(n: f64) -> [f64; N_C3X] {
    [
        (1.0 - n) / 4.0,
        (1.0 - n * n) / 8.0,
        ((3.0 - n) * n + 3.0) / 64.0,
        (2.0 * n + 5.0) / 128.0,
        3.0 / 128.0,
        ((n - 3.0) * n + 2.0) / 32.0,
        ((-3.0 * n - 2.0) * n + 3.0) / 64.0,
        (n + 3.0) / 128.0,
        5.0 / 256.0,
        (n * (5.0 * n - 9.0) + 5.0) / 192.0,
        (9.0 - 10.0 * n) / 384.0,
        7.0 / 512.0,
        (7.0 - 14.0 * n) / 512.0,
        7.0 / 512.0,
        21.0 / 2560.0,
    ]
}

/// Coefficients of the area series, polynomials in the second eccentricity squared.
pub(crate) fn c4_coeff(ep2: f64) -> [f64; N_C4X] {
    [
        (ep2 * (ep2 * (ep2 * ((832.0 - 640.0 * ep2) * ep2 - 1144.0) + 1716.0) - 3003.0)
            + 30030.0)
            / 45045.0,
        (ep2 * (ep2 * ((832.0 - 640.0 * ep2) * ep2 - 1144.0) + 1716.0) - 3003.0) / 60060.0,
        (ep2 * ((208.0 - 160.0 * ep2) * ep2 - 286.0) + 429.0) / 18018.0,
        ((104.0 - 80.0 * ep2) * ep2 - 143.0) / 10296.0,
        (13.0 - 10.0 * ep2) / 1430.0,
        -1.0 / 156.0,
        (ep2 * (ep2 * (ep2 * (640.0 * ep2 - 832.0) + 1144.0) - 1716.0) + 3003.0) / 540540.0,
        (ep2 * (ep2 * (160.0 * ep2 - 208.0) + 286.0) - 429.0) / 108108.0,
        (ep2 * (80.0 * ep2 - 104.0) + 143.0) / 51480.0,
        (10.0 * ep2 - 13.0) / 6435.0,
        5.0 / 3276.0,
        (ep2 * ((208.0 - 160.0 * ep2) * ep2 - 286.0) + 429.0) / 900900.0,
        ((104.0 - 80.0 * ep2) * ep2 - 143.0) / 257400.0,
        (13.0 - 10.0 * ep2) / 25025.0,
        -1.0 / 2184.0,
        (ep2 * (80.0 * ep2 - 104.0) + 143.0) / 2522520.0,
        (10.0 * ep2 - 13.0) / 140140.0,
        5.0 / 45864.0,
        (13.0 - 10.0 * ep2) / 1621620.0,
        -1.0 / 58968.0,
        1.0 / 792792.0,
    ]
}

impl Geodesic {
    /// Horner evaluation of `sum(A3x[k] eps^k)`.
    pub(crate) fn a3f(&self, eps: f64) -> f64 {
        self.a3x.iter().rev().fold(0.0, |v, &x| eps * v + x)
    }

    /// Fill `c[1..N_C3]` with the longitude series coefficients for `eps`.
    pub(crate) fn c3f(&self, eps: f64, c: &mut [f64]) {
        let mut j = N_C3X;
        for k in (1..N_C3).rev() {
            let mut t = 0.0;
            for _ in 0..N_C3 - k {
                j -= 1;
                t = eps * t + self.c3x[j];
            }
            c[k] = t;
        }
        let mut mult = 1.0;
        for ck in c.iter_mut().take(N_C3).skip(1) {
            mult *= eps;
            *ck *= mult;
        }
    }

    /// Fill `c[0..N_C4]` with the area series coefficients for `k2`.
    pub(crate) fn c4f(&self, k2: f64, c: &mut [f64]) {
        let mut j = N_C4X;
        for k in (0..N_C4).rev() {
            let mut t = 0.0;
            for _ in 0..N_C4 - k {
                j -= 1;
                t = k2 * t + self.c4x[j];
            }
            c[k] = t;
        }
        let mut mult = 1.0;
        for ck in c.iter_mut().take(N_C4).skip(1) {
            mult *= k2;
            *ck *= mult;
        }
    }
}
