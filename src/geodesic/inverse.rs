//! The inverse problem: starting guess, Newton iteration on the longitude
//! difference, and the reduced-length auxiliaries.

use std::f64::consts::PI;

use super::data::{GeodesicData, Solution};
use super::mask::Mask;
use super::series::{a1m1f, a2m1f, c1f, c2f, sin_cos_series};
use super::{Geodesic, MAXIT, N_C1, N_C2, N_C3, N_C4, TOL0, TOL1};
use crate::math::{ang_normalize, ang_round, cbrt, lat_fix, sin_cos_norm, sq, DEGREE, NAN};

/// Positive root `k` of `k^4 + 2 k^3 - (x^2 + y^2 - 1) k^2 - 2 y^2 k - y^2 = 0`.
///
/// For `y = 0` and `|x| <= 1` the root is zero.
pub(crate) fn astroid(x: f64, y: f64) -> f64 {
    let p = sq(x);
    let q = sq(y);
    let r = (p + q - 1.0) / 6.0;
    if q == 0.0 && r <= 0.0 {
        return 0.0;
    }
    // Avoid possible division by zero when r = 0 by multiplying equations
    // for s and t by r^3 and r, resp.
    let s = p * q / 4.0;
    let r2 = sq(r);
    let r3 = r * r2;
    // The discriminant of the quadratic equation for T3. This is zero on
    // the evolute curve p^(1/3) + q^(1/3) = 1.
    let disc = s * (s + 2.0 * r3);
    let mut u = r;
    if disc >= 0.0 {
        let mut t3 = s + r3;
        // Pick the sign on the sqrt to maximize abs(T3), minimizing loss of
        // precision due to cancellation.
        t3 += if t3 < 0.0 { -disc.sqrt() } else { disc.sqrt() };
        let t = cbrt(t3);
        // T can be zero, but then r2 / T -> 0.
        u += t + if t != 0.0 { r2 / t } else { 0.0 };
    } else {
        // T is complex, but the way u is defined the result is real.
        let ang = (-disc).sqrt().atan2(-(s + r3));
        // There are three possible cube roots. We choose the root which
        // avoids cancellation. Note that disc < 0 implies that r < 0.
        u += 2.0 * r * (ang / 3.0).cos();
    }
    // guaranteed positive
    let v = (sq(u) + q).sqrt();
    // Avoid loss of accuracy when u < 0.
    let uv = if u < 0.0 { q / (v - u) } else { u + v };
    // positive?
    let w = (uv - q) / (2.0 * v);
    // Rearrange expression for k to avoid loss of accuracy due to
    // subtraction. Division by 0 not possible because uv > 0, w >= 0.
    uv / ((uv + sq(w)).sqrt() + w)
}

/// Output of [`Geodesic::lengths`]. The distance and reduced length are in
/// units of `b` and `a` respectively.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Lengths {
    pub s12b: f64,
    pub m12a: f64,
    pub m0: f64,
    pub scale12: f64,
    pub scale21: f64,
}

struct Start {
    sig12: f64,
    salp1: f64,
    calp1: f64,
    salp2: f64,
    calp2: f64,
}

#[derive(Clone, Copy, Debug)]
struct Lambda12 {
    lam12: f64,
    salp2: f64,
    calp2: f64,
    sig12: f64,
    ssig1: f64,
    csig1: f64,
    ssig2: f64,
    csig2: f64,
    eps: f64,
    domg12: f64,
    dlam12: f64,
}

impl Geodesic {
    /// Distance, reduced length and optionally the geodesic scales between
    /// two points given on the auxiliary sphere.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn lengths(
        &self,
        eps: f64,
        sig12: f64,
        ssig1: f64,
        csig1: f64,
        ssig2: f64,
        csig2: f64,
        cbet1: f64,
        cbet2: f64,
        scalep: bool,
        c1a: &mut [f64],
        c2a: &mut [f64],
    ) -> Lengths {
        let e = &self.ellipsoid;
        c1f(eps, c1a);
        c2f(eps, c2a);
        let a1m1 = a1m1f(eps);
        let ab1 = (1.0 + a1m1)
            * (sin_cos_series(true, ssig2, csig2, c1a, N_C1)
                - sin_cos_series(true, ssig1, csig1, c1a, N_C1));
        let a2m1 = a2m1f(eps);
        let ab2 = (1.0 + a2m1)
            * (sin_cos_series(true, ssig2, csig2, c2a, N_C2)
                - sin_cos_series(true, ssig1, csig1, c2a, N_C2));
        let cbet1sq = sq(cbet1);
        let cbet2sq = sq(cbet2);
        let w1 = (1.0 - e.e2 * cbet1sq).sqrt();
        let w2 = (1.0 - e.e2 * cbet2sq).sqrt();
        let m0 = a1m1 - a2m1;
        let mut j12 = m0 * sig12 + (ab1 - ab2);
        // Missing a factor of a. The parentheses keep the cancellation
        // accurate for coincident points.
        let m12a = (w2 * (csig1 * ssig2) - w1 * (ssig1 * csig2)) - e.f1 * csig1 * csig2 * j12;
        // Missing a factor of b
        let s12b = (1.0 + a1m1) * sig12 + ab1;
        let (scale12, scale21) = if scalep {
            let csig12 = csig1 * csig2 + ssig1 * ssig2;
            j12 *= e.f1;
            (
                csig12
                    + (e.e2 * (cbet1sq - cbet2sq) * ssig2 / (w1 + w2) - csig2 * j12) * ssig1 / w1,
                csig12
                    - (e.e2 * (cbet1sq - cbet2sq) * ssig1 / (w1 + w2) - csig1 * j12) * ssig2 / w2,
            )
        } else {
            (NAN, NAN)
        };
        Lengths {
            s12b,
            m12a,
            m0,
            scale12,
            scale21,
        }
    }

    /// Starting point for Newton's method in `salp1`, `calp1`.
    ///
    /// `sig12` is -1 when Newton's method is required; otherwise it is the
    /// arc length of a short line and `salp2`, `calp2` are also set.
    #[allow(clippy::too_many_arguments)]
    fn inverse_start(
        &self,
        sbet1: f64,
        cbet1: f64,
        sbet2: f64,
        cbet2: f64,
        lam12: f64,
        c1a: &mut [f64],
        c2a: &mut [f64],
    ) -> Start {
        let e = &self.ellipsoid;
        let mut sig12 = -1.0;
        let mut salp2 = NAN;
        let mut calp2 = NAN;
        // bet12 = bet2 - bet1 in [0, pi); bet12a = bet2 + bet1 in (-pi, 0]
        let sbet12 = sbet2 * cbet1 - cbet2 * sbet1;
        let cbet12 = cbet2 * cbet1 + sbet2 * sbet1;
        let sbet12a = sbet2 * cbet1 + cbet2 * sbet1;

        let shortline = cbet12 >= 0.0 && sbet12 < 0.5 && lam12 <= PI / 6.0;
        let omg12 = if shortline {
            lam12 / (1.0 - e.e2 * sq(cbet1)).sqrt()
        } else {
            lam12
        };
        let (mut somg12, mut comg12) = omg12.sin_cos();

        let mut salp1 = cbet2 * somg12;
        let mut calp1 = if comg12 >= 0.0 {
            sbet12 + cbet2 * sbet1 * sq(somg12) / (1.0 + comg12)
        } else {
            sbet12a - cbet2 * sbet1 * sq(somg12) / (1.0 - comg12)
        };

        let ssig12 = salp1.hypot(calp1);
        let csig12 = sbet1 * sbet2 + cbet1 * cbet2 * comg12;

        if shortline && ssig12 < self.etol2 {
            // really short lines
            (salp2, calp2) = sin_cos_norm(
                cbet1 * somg12,
                sbet12 - cbet1 * sbet2 * sq(somg12) / (1.0 + comg12),
            );
            sig12 = ssig12.atan2(csig12);
        } else if csig12 >= 0.0 || ssig12 >= 3.0 * e.f.abs() * PI * sq(cbet1) {
            // Zeroth order spherical approximation is OK
        } else {
            // Scale lam12 and bet2 to x, y coordinate system where the
            // antipodal point is at the origin and the singular point is at
            // y = 0, x = -1.
            let (x, y, lamscale) = if e.f >= 0.0 {
                // x = dlong, y = dlat
                let k2 = sq(sbet1) * e.ep2;
                let eps = k2 / (2.0 * (1.0 + (1.0 + k2).sqrt()) + k2);
                let lamscale = e.f * cbet1 * self.a3f(eps) * PI;
                let betscale = lamscale * cbet1;
                ((lam12 - PI) / lamscale, sbet12a / betscale, lamscale)
            } else {
                // x = dlat, y = dlong
                let cbet12a = cbet2 * cbet1 - sbet2 * sbet1;
                let bet12a = sbet12a.atan2(cbet12a);
                // For lon12 = 180 this repeats a calculation made in gen_inverse.
                let l = self.lengths(
                    e.n,
                    PI + bet12a,
                    sbet1,
                    -cbet1,
                    sbet2,
                    cbet2,
                    cbet1,
                    cbet2,
                    false,
                    c1a,
                    c2a,
                );
                let x = -1.0 + l.m12a / (e.f1 * cbet1 * cbet2 * l.m0 * PI);
                let betscale = if x < -0.01 {
                    sbet12a / x
                } else {
                    -e.f * sq(cbet1) * PI
                };
                let lamscale = betscale / cbet1;
                (x, (lam12 - PI) / lamscale, lamscale)
            };

            if y > -TOL1 && x > -1.0 - self.xthresh {
                // strip near cut
                if e.f >= 0.0 {
                    salp1 = 1.0f64.min(-x);
                    calp1 = -(1.0 - sq(salp1)).sqrt();
                } else {
                    calp1 = (if x > -TOL1 { 0.0f64 } else { -1.0 }).max(x);
                    salp1 = (1.0 - sq(calp1)).sqrt();
                }
            } else {
                // Estimate omg12 from the astroid and update the spherical
                // estimate of alp1. Because omg12 is near pi, work with
                // omg12a = pi - omg12.
                let k = astroid(x, y);
                let omg12a = lamscale
                    * if e.f >= 0.0 {
                        -x * k / (1.0 + k)
                    } else {
                        -y * (1.0 + k) / k
                    };
                somg12 = omg12a.sin();
                comg12 = -omg12a.cos();
                salp1 = cbet2 * somg12;
                calp1 = sbet12a - cbet2 * sbet1 * sq(somg12) / (1.0 - comg12);
            }
        }
        let (salp1, calp1) = sin_cos_norm(salp1, calp1);
        Start {
            sig12,
            salp1,
            calp1,
            salp2,
            calp2,
        }
    }

    /// Longitude difference reached by the geodesic leaving point 1 with
    /// azimuth (salp1, calp1), and its derivative with respect to alp1 when
    /// `diffp` is set.
    #[allow(clippy::too_many_arguments)]
    fn lambda12(
        &self,
        sbet1: f64,
        cbet1: f64,
        sbet2: f64,
        cbet2: f64,
        salp1: f64,
        calp1: f64,
        diffp: bool,
        c1a: &mut [f64],
        c2a: &mut [f64],
        c3a: &mut [f64],
    ) -> Lambda12 {
        let e = &self.ellipsoid;
        // Break degeneracy of equatorial line. This case has already been
        // handled.
        let calp1 = if sbet1 == 0.0 && calp1 == 0.0 {
            -self.tiny
        } else {
            calp1
        };

        // sin(alp1) * cos(bet1) = sin(alp0)
        let salp0 = salp1 * cbet1;
        // calp0 > 0
        let calp0 = calp1.hypot(salp1 * sbet1);

        // tan(bet1) = tan(sig1) * cos(alp1)
        // tan(omg1) = sin(alp0) * tan(sig1) = tan(alp1) * sin(bet1)
        let somg1 = salp0 * sbet1;
        let comg1 = calp1 * cbet1;
        let (ssig1, csig1) = sin_cos_norm(sbet1, comg1);

        // Enforce symmetries in the case abs(bet2) = -bet1. Need to be
        // careful about this case, since this can yield singularities in the
        // Newton iteration.
        let salp2 = if cbet2 != cbet1 { salp0 / cbet2 } else { salp1 };
        // calp2 = sqrt(1 - sq(salp2)) = sqrt(sq(calp0) - sq(sbet2)) / cbet2,
        // rearranged to give alp2 in [0, pi/2].
        let calp2 = if cbet2 != cbet1 || sbet2.abs() != -sbet1 {
            (sq(calp1 * cbet1)
                + if cbet1 < -sbet1 {
                    (cbet2 - cbet1) * (cbet1 + cbet2)
                } else {
                    (sbet1 - sbet2) * (sbet1 + sbet2)
                })
            .sqrt()
                / cbet2
        } else {
            calp1.abs()
        };
        // tan(bet2) = tan(sig2) * cos(alp2)
        // tan(omg2) = sin(alp0) * tan(sig2)
        let somg2 = salp0 * sbet2;
        let comg2 = calp2 * cbet2;
        let (ssig2, csig2) = sin_cos_norm(sbet2, comg2);

        // sig12 = sig2 - sig1, limit to [0, pi]
        let sig12 = (csig1 * ssig2 - ssig1 * csig2)
            .max(0.0)
            .atan2(csig1 * csig2 + ssig1 * ssig2);
        // omg12 = omg2 - omg1, limit to [0, pi]
        let omg12 = (comg1 * somg2 - somg1 * comg2)
            .max(0.0)
            .atan2(comg1 * comg2 + somg1 * somg2);

        let k2 = sq(calp0) * e.ep2;
        let eps = k2 / (2.0 * (1.0 + (1.0 + k2).sqrt()) + k2);
        self.c3f(eps, c3a);
        let b312 = sin_cos_series(true, ssig2, csig2, c3a, N_C3 - 1)
            - sin_cos_series(true, ssig1, csig1, c3a, N_C3 - 1);
        let h0 = -e.f * self.a3f(eps);
        let domg12 = salp0 * h0 * (sig12 + b312);
        let lam12 = omg12 + domg12;

        let dlam12 = if !diffp {
            NAN
        } else if calp2 == 0.0 {
            -2.0 * (1.0 - e.e2 * sq(cbet1)).sqrt() / sbet1
        } else {
            let l = self.lengths(
                eps, sig12, ssig1, csig1, ssig2, csig2, cbet1, cbet2, false, c1a, c2a,
            );
            l.m12a / (calp2 * cbet2)
        };

        Lambda12 {
            lam12,
            salp2,
            calp2,
            sig12,
            ssig1,
            csig1,
            ssig2,
            csig2,
            eps,
            domg12,
            dlam12,
        }
    }

    /// Solve the inverse problem without validating the inputs.
    ///
    /// Latitudes outside [-90, 90] are treated as NaN, and a NaN input gives
    /// NaN in every computed field. Longitudes are assumed to lie in
    /// [-540, 540). `lat2`, `lon2` are recorded as given.
    pub fn gen_inverse(
        &self,
        lat1: f64,
        lon1: f64,
        lat2: f64,
        lon2: f64,
        outmask: Mask,
    ) -> GeodesicData {
        let outmask = outmask.outputs();
        let mut data = GeodesicData::new(lat1, lon1);
        data.lat2 = Some(lat2);
        data.lon2 = Some(lon2);
        let solution = self
            .solve_inverse(lat1, lon1, lat2, lon2, outmask)
            .unwrap_or(Solution::NAN);
        solution.fill(&mut data, outmask);
        data
    }

    /// `None` when the Newton iteration fails to converge.
    fn solve_inverse(
        &self,
        lat1: f64,
        lon1: f64,
        lat2: f64,
        lon2: f64,
        outmask: Mask,
    ) -> Option<Solution> {
        let e = &self.ellipsoid;
        let scalep = outmask.intersects(Mask::GEODESICSCALE);

        let lon1 = ang_normalize(lon1);
        // If very close to being on the same meridian, then make it so.
        let mut lon12 = ang_round(ang_normalize(ang_normalize(lon2) - lon1));
        // Make longitude difference positive.
        let mut lonsign = if lon12 >= 0.0 { 1.0 } else { -1.0 };
        lon12 *= lonsign;
        if lon12 == 180.0 {
            lonsign = 1.0;
        }
        // If really close to the equator, treat as on equator.
        let mut lat1 = ang_round(lat_fix(lat1));
        let mut lat2 = ang_round(lat_fix(lat2));
        // Swap points so that point with higher (abs) latitude is point 1.
        // A NaN latitude always ends up in point 1, where it reaches every
        // branch below.
        let swapp = if lat1.abs() < lat2.abs() || lat2.is_nan() {
            -1.0
        } else {
            1.0
        };
        if swapp < 0.0 {
            lonsign = -lonsign;
            std::mem::swap(&mut lat1, &mut lat2);
        }
        // Make lat1 <= 0
        let latsign = if lat1 < 0.0 { 1.0 } else { -1.0 };
        lat1 *= latsign;
        lat2 *= latsign;
        // Now 0 <= lon12 <= 180, -90 <= lat1 <= 0 and lat1 <= lat2 <= -lat1.
        // lonsign, swapp and latsign record the transformation; 1 means no
        // change was made.

        let phi = lat1 * DEGREE;
        // Ensure cbet1 = +epsilon at poles
        let (sbet1, cbet1) = sin_cos_norm(
            e.f1 * phi.sin(),
            if lat1 == -90.0 { self.tiny } else { phi.cos() },
        );
        let phi = lat2 * DEGREE;
        // Ensure cbet2 = +epsilon at poles
        let (mut sbet2, mut cbet2) = sin_cos_norm(
            e.f1 * phi.sin(),
            if lat2.abs() == 90.0 { self.tiny } else { phi.cos() },
        );

        // If cbet1 < -sbet1, then cbet2 - cbet1 is a sensitive measure of
        // |bet1| - |bet2|. Otherwise abs(sbet2) + sbet1 is a better measure.
        // When these vanish force bet2 = +/- bet1 exactly.
        if cbet1 < -sbet1 {
            if cbet2 == cbet1 {
                sbet2 = if sbet2 < 0.0 { sbet1 } else { -sbet1 };
            }
        } else if sbet2.abs() == -sbet1 {
            cbet2 = cbet1;
        }

        let lam12 = lon12 * DEGREE;
        let slam12 = if lon12 == 180.0 { 0.0 } else { lam12.sin() };
        // lon12 == 90 isn't interesting
        let clam12 = lam12.cos();

        // index zero elements of these arrays are unused
        let mut c1a = [0.0; N_C1 + 1];
        let mut c2a = [0.0; N_C2 + 1];
        let mut c3a = [0.0; N_C3];

        let mut sol = Solution::NAN;
        let (mut salp1, mut calp1, mut salp2, mut calp2) = (NAN, NAN, NAN, NAN);
        let mut omg12 = NAN;
        let mut s12x = NAN;
        let mut m12x = NAN;

        let mut meridian = lat1 == -90.0 || slam12 == 0.0;

        if meridian {
            // Endpoints are on a single full meridian, so the geodesic might
            // lie on a meridian. Head to the target longitude; at the target
            // we're heading north.
            calp1 = clam12;
            salp1 = slam12;
            calp2 = 1.0;
            salp2 = 0.0;

            // tan(bet) = tan(sig) * cos(alp)
            let (ssig1, csig1) = (sbet1, calp1 * cbet1);
            let (ssig2, csig2) = (sbet2, calp2 * cbet2);

            // sig12 = sig2 - sig1
            let sig12 = (csig1 * ssig2 - ssig1 * csig2)
                .max(0.0)
                .atan2(csig1 * csig2 + ssig1 * ssig2);

            let l = self.lengths(
                e.n, sig12, ssig1, csig1, ssig2, csig2, cbet1, cbet2, scalep, &mut c1a, &mut c2a,
            );
            sol.scale12 = l.scale12;
            sol.scale21 = l.scale21;

            // Zero length geodesics might yield m12 < 0, and sig12 > pi/2
            // means the meridian is not a shortest path anyway.
            if sig12 < 1.0 || l.m12a >= 0.0 {
                m12x = l.m12a * e.a;
                s12x = l.s12b * e.b;
                sol.a12 = sig12 / DEGREE;
            } else {
                // m12 < 0, i.e., prolate and too close to anti-podal
                meridian = false;
            }
        }

        if !meridian && sbet1 == 0.0 && (e.f <= 0.0 || lam12 <= PI - e.f * PI) {
            // Geodesic runs along equator. The bound mimics the way lambda12
            // works with calp1 = 0.
            calp1 = 0.0;
            calp2 = 0.0;
            salp1 = 1.0;
            salp2 = 1.0;
            s12x = e.a * lam12;
            m12x = e.b * (lam12 / e.f1).sin();
            if scalep {
                sol.scale12 = (lam12 / e.f1).cos();
                sol.scale21 = sol.scale12;
            }
            sol.a12 = lon12 / e.f1;
            omg12 = lam12 / e.f1;
        } else if !meridian {
            // Now point1 and point2 belong within a hemisphere bounded by a
            // meridian and geodesic is neither meridional nor equatorial.
            let start =
                self.inverse_start(sbet1, cbet1, sbet2, cbet2, lam12, &mut c1a, &mut c2a);
            salp1 = start.salp1;
            calp1 = start.calp1;

            if start.sig12 >= 0.0 {
                // Short lines (inverse_start sets salp2, calp2)
                let sig12 = start.sig12;
                salp2 = start.salp2;
                calp2 = start.calp2;
                let w1 = (1.0 - e.e2 * sq(cbet1)).sqrt();
                s12x = sig12 * e.a * w1;
                m12x = sq(w1) * e.a / e.f1 * (sig12 * e.f1 / w1).sin();
                if scalep {
                    sol.scale12 = (sig12 * e.f1 / w1).cos();
                    sol.scale21 = sol.scale12;
                }
                sol.a12 = sig12 / DEGREE;
                omg12 = lam12 / w1;
            } else {
                // Newton's method
                let mut ov = 0.0;
                let mut trip = 0;
                let mut numit = 0;
                let mut converged = false;
                let last = loop {
                    let l = self.lambda12(
                        sbet1,
                        cbet1,
                        sbet2,
                        cbet2,
                        salp1,
                        calp1,
                        trip < 1,
                        &mut c1a,
                        &mut c2a,
                        &mut c3a,
                    );
                    let v = l.lam12 - lam12;
                    log::trace!("inverse iteration {numit}: salp1 = {salp1}, calp1 = {calp1}, v = {v}");
                    if !(v.abs() > self.tiny) || trip >= 1 {
                        converged = v.abs() <= TOL1.max(ov);
                        break l;
                    }
                    let dalp1 = -v / l.dlam12;
                    let (sdalp1, cdalp1) = dalp1.sin_cos();
                    let nsalp1 = salp1 * cdalp1 + calp1 * sdalp1;
                    calp1 = calp1 * cdalp1 - salp1 * sdalp1;
                    salp1 = nsalp1.max(0.0);
                    (salp1, calp1) = sin_cos_norm(salp1, calp1);
                    // Without quadratic convergence (slope -> 0) fall back on
                    // tests based on epsilon: abs(v) against 200 epsilon, and
                    // the reduction anticipated from v / ov against epsilon.
                    if !(v.abs() >= TOL1 && sq(v) >= ov * TOL0) {
                        trip += 1;
                    }
                    ov = v.abs();
                    numit += 1;
                    if numit >= MAXIT {
                        break l;
                    }
                };

                if !converged {
                    log::debug!(
                        "inverse geodesic did not converge after {numit} iterations: \
                         ({lat1}, {lon1}) to ({lat2}, {lon2})"
                    );
                    return None;
                }

                salp2 = last.salp2;
                calp2 = last.calp2;
                let l = self.lengths(
                    last.eps,
                    last.sig12,
                    last.ssig1,
                    last.csig1,
                    last.ssig2,
                    last.csig2,
                    cbet1,
                    cbet2,
                    scalep,
                    &mut c1a,
                    &mut c2a,
                );
                m12x = l.m12a * e.a;
                s12x = l.s12b * e.b;
                sol.scale12 = l.scale12;
                sol.scale21 = l.scale21;
                sol.a12 = last.sig12 / DEGREE;
                omg12 = lam12 - last.domg12;
            }
        }

        // Convert -0 to 0
        sol.s12 = 0.0 + s12x;
        sol.m12 = 0.0 + m12x;

        if outmask.intersects(Mask::AREA) {
            // From lambda12: sin(alp1) * cos(bet1) = sin(alp0)
            let salp0 = salp1 * cbet1;
            // calp0 > 0
            let calp0 = calp1.hypot(salp1 * sbet1);
            let mut area12 = if calp0 != 0.0 && salp0 != 0.0 {
                // From lambda12: tan(bet) = tan(sig) * cos(alp)
                let (ssig1, csig1) = sin_cos_norm(sbet1, calp1 * cbet1);
                let (ssig2, csig2) = sin_cos_norm(sbet2, calp2 * cbet2);
                let k2 = sq(calp0) * e.ep2;
                // Multiplier = a^2 * e^2 * cos(alpha0) * sin(alpha0).
                let a4 = sq(e.a) * calp0 * salp0 * e.e2;
                let mut c4a = [0.0; N_C4];
                self.c4f(k2, &mut c4a);
                let b41 = sin_cos_series(false, ssig1, csig1, &c4a, N_C4);
                let b42 = sin_cos_series(false, ssig2, csig2, &c4a, N_C4);
                a4 * (b42 - b41)
            } else {
                // Avoid problems with indeterminate sig1, sig2 on equator
                0.0
            };
            let alp12 = if !meridian && omg12 < 0.75 * PI && sbet2 - sbet1 < 1.75 {
                // Use tan(Gamma/2) = tan(omg12/2)
                //   * (tan(bet1/2) + tan(bet2/2)) / (1 + tan(bet1/2) * tan(bet2/2))
                // with tan(x/2) = sin(x) / (1 + cos(x))
                let somg12 = omg12.sin();
                let domg12 = 1.0 + omg12.cos();
                let dbet1 = 1.0 + cbet1;
                let dbet2 = 1.0 + cbet2;
                2.0 * (somg12 * (sbet1 * dbet2 + sbet2 * dbet1))
                    .atan2(domg12 * (sbet1 * sbet2 + dbet1 * dbet2))
            } else {
                // alp12 = alp2 - alp1, used in atan2 so no need to normalize
                let mut salp12 = salp2 * calp1 - calp2 * salp1;
                let mut calp12 = calp2 * calp1 + salp2 * salp1;
                // alp1 = +/-180 and alp2 = 0 must give alp12 = -180, which
                // depends on the sign attached to a zero salp12.
                if salp12 == 0.0 && calp12 < 0.0 {
                    salp12 = self.tiny * calp1;
                    calp12 = -1.0;
                }
                salp12.atan2(calp12)
            };
            area12 += e.c2 * alp12;
            area12 *= swapp * lonsign * latsign;
            // Convert -0 to 0
            sol.area12 = area12 + 0.0;
        }

        // Convert calp, salp to azimuth accounting for lonsign, swapp, latsign.
        if swapp < 0.0 {
            std::mem::swap(&mut salp1, &mut salp2);
            std::mem::swap(&mut calp1, &mut calp2);
            std::mem::swap(&mut sol.scale12, &mut sol.scale21);
        }
        salp1 *= swapp * lonsign;
        calp1 *= swapp * latsign;
        salp2 *= swapp * lonsign;
        calp2 *= swapp * latsign;

        // minus signs give range [-180, 180). 0 - converts -0 to +0.
        sol.azi1 = 0.0 - (-salp1).atan2(calp1) / DEGREE;
        sol.azi2 = 0.0 - (-salp2).atan2(calp2) / DEGREE;

        Some(sol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_astroid_degenerate_root() {
        assert_eq!(astroid(0.5, 0.0), 0.0);
        assert_eq!(astroid(-1.0, 0.0), 0.0);
    }

    #[test]
    fn test_astroid_solves_quartic() {
        for &(x, y) in &[(-0.5, -0.3), (-1.2, -0.01), (-0.9, -2.0), (0.3, 0.4)] {
            let k = astroid(x, y);
            assert!(k > 0.0);
            let residual = k.powi(4) + 2.0 * k.powi(3) - (x * x + y * y - 1.0) * k * k
                - 2.0 * y * y * k
                - y * y;
            let scale = 1.0 + k.powi(4);
            assert!(residual.abs() / scale < 1e-12, "x = {x}, y = {y}");
        }
    }

    #[test]
    fn test_lengths_on_meridian_quadrant() {
        // Equator to pole along a meridian on WGS84.
        let g = Geodesic::wgs84();
        let e = g.ellipsoid();
        let mut c1a = [0.0; N_C1 + 1];
        let mut c2a = [0.0; N_C2 + 1];
        let l = g.lengths(
            e.n,
            PI / 2.0,
            0.0,
            1.0,
            1.0,
            0.0,
            1.0,
            0.0,
            true,
            &mut c1a,
            &mut c2a,
        );
        assert_relative_eq!(l.s12b * e.b, 10_001_965.729_312_724, epsilon = 1e-6);
        assert!(l.scale12.is_finite());
    }
}
