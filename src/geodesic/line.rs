//! A geodesic anchored at a point with a fixed starting azimuth.

use super::data::{GeodesicData, Solution};
use super::mask::Mask;
use super::series::{a1m1f, a2m1f, c1f, c1pf, c2f, sin_cos_series};
use super::{Geodesic, N_C1, N_C1P, N_C2, N_C3, N_C4};
use crate::math::{ang_normalize, ang_round, lat_fix, sin_cos_norm, sq, DEGREE, NAN};

/// A geodesic line from a start point, queried for positions along it.
///
/// The trigonometric state of the start point and the series coefficients
/// named by the capability mask are computed once in
/// [`Geodesic::line`]; each position query is then a handful of series
/// evaluations. Outputs whose capabilities were not requested at
/// construction come back as `None`.
#[derive(Clone, Debug)]
pub struct GeodesicLine<'a> {
    geod: &'a Geodesic,
    caps: Mask,
    lat1: f64,
    lon1: f64,
    azi1: f64,
    salp1: f64,
    calp1: f64,
    salp0: f64,
    calp0: f64,
    ssig1: f64,
    csig1: f64,
    somg1: f64,
    comg1: f64,
    k2: f64,
    a1m1: f64,
    a2m1: f64,
    a3c: f64,
    a4: f64,
    b11: f64,
    b21: f64,
    b31: f64,
    b41: f64,
    stau1: f64,
    ctau1: f64,
    c1a: [f64; N_C1 + 1],
    c1pa: [f64; N_C1P + 1],
    c2a: [f64; N_C2 + 1],
    c3a: [f64; N_C3],
    c4a: [f64; N_C4],
}

impl<'a> GeodesicLine<'a> {
    /// Set up a line without validating the start point. The latitude and
    /// azimuth are used as given (see [`Geodesic::line`] for the checked
    /// entry point); `LATITUDE` and `AZIMUTH` are always included in `caps`.
    pub(crate) fn new(geod: &'a Geodesic, lat1: f64, lon1: f64, azi1: f64, caps: Mask) -> Self {
        let e = &geod.ellipsoid;
        let caps = caps | Mask::LATITUDE | Mask::AZIMUTH;
        let lat1 = lat_fix(lat1);
        let azi1 = ang_round(ang_normalize(azi1));

        let alp1 = azi1 * DEGREE;
        // Guard against underflow in salp0
        let salp1 = if azi1 == -180.0 { 0.0 } else { alp1.sin() };
        let calp1 = if azi1.abs() == 90.0 { 0.0 } else { alp1.cos() };

        let phi = lat1 * DEGREE;
        // Ensure cbet1 = +epsilon at poles
        let (sbet1, cbet1) = sin_cos_norm(
            e.f1 * phi.sin(),
            if lat1.abs() == 90.0 { geod.tiny } else { phi.cos() },
        );

        // Evaluate alp0 from sin(alp1) * cos(bet1) = sin(alp0)
        let salp0 = salp1 * cbet1;
        // Alt: calp0 = hypot(sbet1, calp1 * cbet1). calp0 > 0.
        let calp0 = calp1.hypot(salp1 * sbet1);
        // tan(bet1) = tan(sig1) * cos(alp1); sig1 in (-pi, pi], and sig1 = 0
        // for the equatorial line heading east.
        let somg1 = salp0 * sbet1;
        let comg1 = if sbet1 != 0.0 || calp1 != 0.0 {
            cbet1 * calp1
        } else {
            1.0
        };
        let (ssig1, csig1) = sin_cos_norm(sbet1, comg1);

        let k2 = sq(calp0) * e.ep2;
        let eps = k2 / (2.0 * (1.0 + (1.0 + k2).sqrt()) + k2);

        let mut line = Self {
            geod,
            caps,
            lat1,
            lon1,
            azi1,
            salp1,
            calp1,
            salp0,
            calp0,
            ssig1,
            csig1,
            somg1,
            comg1,
            k2,
            a1m1: NAN,
            a2m1: NAN,
            a3c: NAN,
            a4: NAN,
            b11: NAN,
            b21: NAN,
            b31: NAN,
            b41: NAN,
            stau1: NAN,
            ctau1: NAN,
            c1a: [0.0; N_C1 + 1],
            c1pa: [0.0; N_C1P + 1],
            c2a: [0.0; N_C2 + 1],
            c3a: [0.0; N_C3],
            c4a: [0.0; N_C4],
        };

        if caps.intersects(Mask::CAP_C1) {
            line.a1m1 = a1m1f(eps);
            c1f(eps, &mut line.c1a);
            line.b11 = sin_cos_series(true, ssig1, csig1, &line.c1a, N_C1);
            let (s, c) = line.b11.sin_cos();
            // tau1 = sig1 + B11
            line.stau1 = ssig1 * c + csig1 * s;
            line.ctau1 = csig1 * c - ssig1 * s;
        }
        if caps.intersects(Mask::CAP_C1P) {
            c1pf(eps, &mut line.c1pa);
        }
        if caps.intersects(Mask::CAP_C2) {
            line.a2m1 = a2m1f(eps);
            c2f(eps, &mut line.c2a);
            line.b21 = sin_cos_series(true, ssig1, csig1, &line.c2a, N_C2);
        }
        if caps.intersects(Mask::CAP_C3) {
            geod.c3f(eps, &mut line.c3a);
            line.a3c = -e.f * salp0 * geod.a3f(eps);
            line.b31 = sin_cos_series(true, ssig1, csig1, &line.c3a, N_C3 - 1);
        }
        if caps.intersects(Mask::CAP_C4) {
            geod.c4f(k2, &mut line.c4a);
            // Multiplier = a^2 * e^2 * cos(alpha0) * sin(alpha0)
            line.a4 = sq(e.a) * calp0 * salp0 * e.e2;
            line.b41 = sin_cos_series(false, ssig1, csig1, &line.c4a, N_C4);
        }
        line
    }

    pub fn lat1(&self) -> f64 {
        self.lat1
    }

    pub fn lon1(&self) -> f64 {
        self.lon1
    }

    /// Starting azimuth, normalized to [-180, 180).
    pub fn azi1(&self) -> f64 {
        self.azi1
    }

    pub fn capabilities(&self) -> Mask {
        self.caps
    }

    /// Position at distance `s12` (metres) from the start point.
    ///
    /// Needs the `DISTANCE_IN` capability, which [`Geodesic::line`] always
    /// supplies; without it every output is `None` and `a12` is NaN.
    pub fn position(&self, s12: f64, outmask: Mask) -> GeodesicData {
        self.gen_position(false, s12, outmask)
    }

    /// Position at arc length `a12` (degrees) from the start point.
    pub fn arc_position(&self, a12: f64, outmask: Mask) -> GeodesicData {
        self.gen_position(true, a12, outmask)
    }

    /// Position at `s12_a12` along the line, an arc length in degrees when
    /// `arcmode` is set and a distance in metres otherwise.
    pub fn gen_position(&self, arcmode: bool, s12_a12: f64, outmask: Mask) -> GeodesicData {
        let mut data = GeodesicData::new(self.lat1, self.lon1);
        data.azi1 = Some(self.azi1);
        let outmask = (outmask & self.caps).outputs();
        if !(arcmode || self.caps.outputs().intersects(Mask::DISTANCE_IN)) {
            // Impossible distance calculation requested
            return data;
        }
        let sol = self.solve(arcmode, s12_a12, outmask);
        sol.fill(&mut data, outmask);
        if !arcmode {
            data.s12 = Some(s12_a12);
        }
        data
    }

    fn solve(&self, arcmode: bool, s12_a12: f64, outmask: Mask) -> Solution {
        let e = &self.geod.ellipsoid;
        let tiny = self.geod.tiny;
        let mut sol = Solution::NAN;

        let mut b12 = 0.0;
        let mut ab1 = 0.0;
        let (sig12, ssig12, csig12) = if arcmode {
            // Interpret s12_a12 as spherical arc length
            let sig12 = s12_a12 * DEGREE;
            let mut s12a = s12_a12.abs();
            s12a -= 180.0 * (s12a / 180.0).floor();
            (
                sig12,
                if s12a == 0.0 { 0.0 } else { sig12.sin() },
                if s12a == 90.0 { 0.0 } else { sig12.cos() },
            )
        } else {
            // Interpret s12_a12 as distance
            let tau12 = s12_a12 / (e.b * (1.0 + self.a1m1));
            let (s, c) = tau12.sin_cos();
            // tau2 = tau1 + tau12
            b12 = -sin_cos_series(
                true,
                self.stau1 * c + self.ctau1 * s,
                self.ctau1 * c - self.stau1 * s,
                &self.c1pa,
                N_C1P,
            );
            let sig12 = tau12 - (b12 - self.b11);
            (sig12, sig12.sin(), sig12.cos())
        };

        // sig2 = sig1 + sig12
        let ssig2 = self.ssig1 * csig12 + self.csig1 * ssig12;
        let mut csig2 = self.csig1 * csig12 - self.ssig1 * ssig12;
        if outmask.intersects(Mask::DISTANCE | Mask::REDUCEDLENGTH | Mask::GEODESICSCALE) {
            if arcmode {
                b12 = sin_cos_series(true, ssig2, csig2, &self.c1a, N_C1);
            }
            ab1 = (1.0 + self.a1m1) * (b12 - self.b11);
        }
        // sin(bet2) = cos(alp0) * sin(sig2)
        let sbet2 = self.calp0 * ssig2;
        // Alt: cbet2 = hypot(csig2, salp0 * ssig2)
        let mut cbet2 = self.salp0.hypot(self.calp0 * csig2);
        if cbet2 == 0.0 {
            // I.e., salp0 = 0, csig2 = 0. Break the degeneracy in this case
            cbet2 = tiny;
            csig2 = tiny;
        }
        // tan(omg2) = sin(alp0) * tan(sig2)
        let somg2 = self.salp0 * ssig2;
        let comg2 = csig2;
        // tan(alp0) = cos(sig2) * tan(alp2)
        let salp2 = self.salp0;
        let calp2 = self.calp0 * csig2;
        // omg12 = omg2 - omg1
        let omg12 = (somg2 * self.comg1 - comg2 * self.somg1)
            .atan2(comg2 * self.comg1 + somg2 * self.somg1);

        sol.s12 = if arcmode {
            e.b * ((1.0 + self.a1m1) * sig12 + ab1)
        } else {
            s12_a12
        };

        if outmask.intersects(Mask::LONGITUDE) {
            let lam12 = omg12
                + self.a3c
                    * (sig12
                        + (sin_cos_series(true, ssig2, csig2, &self.c3a, N_C3 - 1) - self.b31));
            let lon12 = lam12 / DEGREE;
            // Reduce to [-180, 180) so that the sum stays in [-540, 540)
            let lon12 = lon12 - 360.0 * (lon12 / 360.0 + 0.5).floor();
            sol.lon2 = ang_normalize(self.lon1 + lon12);
        }

        sol.lat2 = sbet2.atan2(e.f1 * cbet2) / DEGREE;
        // minus signs give range [-180, 180). 0 - converts -0 to +0.
        sol.azi2 = 0.0 - (-salp2).atan2(calp2) / DEGREE;

        if outmask.intersects(Mask::REDUCEDLENGTH | Mask::GEODESICSCALE) {
            let ssig1sq = sq(self.ssig1);
            let ssig2sq = sq(ssig2);
            let w1 = (1.0 + self.k2 * ssig1sq).sqrt();
            let w2 = (1.0 + self.k2 * ssig2sq).sqrt();
            let b22 = sin_cos_series(true, ssig2, csig2, &self.c2a, N_C2);
            let ab2 = (1.0 + self.a2m1) * (b22 - self.b21);
            let j12 = (self.a1m1 - self.a2m1) * sig12 + (ab1 - ab2);
            // Add parens around (csig1 * ssig2) and (ssig1 * csig2) to
            // ensure accurate cancellation in the case of coincident points.
            sol.m12 = e.b
                * ((w2 * (self.csig1 * ssig2) - w1 * (self.ssig1 * csig2))
                    - self.csig1 * csig2 * j12);
            let t = self.k2 * (ssig2sq - ssig1sq) / (w1 + w2);
            sol.scale12 = csig12 + (t * ssig2 - csig2 * j12) * self.ssig1 / w1;
            sol.scale21 = csig12 - (t * self.ssig1 - self.csig1 * j12) * ssig2 / w2;
        }

        if outmask.intersects(Mask::AREA) {
            let b42 = sin_cos_series(false, ssig2, csig2, &self.c4a, N_C4);
            let (salp12, calp12) = if self.calp0 == 0.0 || self.salp0 == 0.0 {
                // alp12 = alp2 - alp1, used in atan2 so no need to normalize
                let salp12 = salp2 * self.calp1 - calp2 * self.salp1;
                let calp12 = calp2 * self.calp1 + salp2 * self.salp1;
                // alp1 = +/-180 and alp2 = 0 must give alp12 = -180, which
                // depends on the sign attached to a zero salp12.
                if salp12 == 0.0 && calp12 < 0.0 {
                    (tiny * self.calp1, -1.0)
                } else {
                    (salp12, calp12)
                }
            } else {
                // tan(alp) = tan(alp0) * sec(sig)
                // tan(alp2 - alp1) = (tan(alp2) - tan(alp1)) / (tan(alp2) * tan(alp1) + 1)
                //   = calp0 * salp0 * (csig1 - csig2) / (salp0^2 + calp0^2 * csig1 * csig2)
                // If csig12 > 0, write csig1 - csig2 = ssig12 * (csig1 * ssig12 /
                // (1 + csig12) + ssig1); if csig12 < 0, write 1 - csig12 + ssig12 * ssig1.
                (
                    self.calp0
                        * self.salp0
                        * if csig12 <= 0.0 {
                            self.csig1 * (1.0 - csig12) + ssig12 * self.ssig1
                        } else {
                            ssig12 * (self.csig1 * ssig12 / (1.0 + csig12) + self.ssig1)
                        },
                    sq(self.salp0) + sq(self.calp0) * self.csig1 * csig2,
                )
            };
            sol.area12 = e.c2 * salp12.atan2(calp12) + self.a4 * (b42 - self.b41);
        }

        sol.a12 = if arcmode { s12_a12 } else { sig12 / DEGREE };
        sol
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn jfk_line(caps: Mask) -> GeodesicLine<'static> {
        Geodesic::wgs84().line(40.6, -73.8, 45.0, caps).unwrap()
    }

    #[test]
    fn test_arc_position() {
        let line = jfk_line(Mask::ALL);
        let r = line.arc_position(90.0, Mask::ALL);
        assert_relative_eq!(r.a12, 90.0);
        assert_relative_eq!(r.lat2.unwrap(), 32.611_003_775_208_08, epsilon = 1e-10);
        assert_relative_eq!(r.lon2.unwrap(), 49.042_195_065_566_06, epsilon = 1e-10);
        assert_relative_eq!(r.azi2.unwrap(), 140.383_028_461_941_93, epsilon = 1e-10);
        assert_relative_eq!(r.s12.unwrap(), 10_004_584.402_265_891, epsilon = 1e-6);
    }

    #[test]
    fn test_backwards_position() {
        let line = jfk_line(Mask::DIRECT_DEFAULT | Mask::DISTANCE_IN);
        let r = line.position(-5_000_000.0, Mask::ALL);
        assert_relative_eq!(r.a12, -45.040_274_730_431_48, epsilon = 1e-10);
        assert_relative_eq!(r.lat2.unwrap(), 4.518_038_574_039_05, epsilon = 1e-10);
        assert_relative_eq!(r.lon2.unwrap(), -103.844_652_808_761_14, epsilon = 1e-10);
        assert_relative_eq!(r.azi2.unwrap(), 32.636_903_331_187_73, epsilon = 1e-10);
        assert_eq!(r.s12, Some(-5_000_000.0));
        // Not among the line's capabilities.
        assert_eq!(r.m12, None);
        assert_eq!(r.area12, None);
    }

    #[test]
    fn test_public_line_can_always_take_distances() {
        let line = jfk_line(Mask::LATITUDE);
        assert!(line.capabilities().contains(Mask::DISTANCE_IN));
        assert!(line.position(1000.0, Mask::LATITUDE).lat2.is_some());
    }

    #[test]
    fn test_position_needs_distance_in() {
        let g = Geodesic::wgs84();
        let line = GeodesicLine::new(g, 40.6, -73.8, 45.0, Mask::LATITUDE | Mask::LONGITUDE);
        assert!(!line.capabilities().contains(Mask::DISTANCE_IN));
        let r = line.position(1000.0, Mask::ALL);
        assert!(r.a12.is_nan());
        assert_eq!(r.lat2, None);
        assert_eq!(r.azi1, Some(45.0));
        // Arc mode still works.
        assert!(line.arc_position(10.0, Mask::LATITUDE).lat2.is_some());
    }

    #[test]
    fn test_zero_distance_returns_start() {
        let line = jfk_line(Mask::ALL);
        let r = line.position(0.0, Mask::ALL);
        assert_relative_eq!(r.lat2.unwrap(), 40.6, epsilon = 1e-12);
        assert_relative_eq!(r.lon2.unwrap(), -73.8, epsilon = 1e-12);
        assert_relative_eq!(r.azi2.unwrap(), 45.0, epsilon = 1e-12);
        assert_relative_eq!(r.m12.unwrap(), 0.0, epsilon = 1e-9);
        assert_relative_eq!(r.scale12.unwrap(), 1.0, epsilon = 1e-15);
        assert_relative_eq!(r.area12.unwrap(), 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_positions_agree_with_direct() {
        let g = Geodesic::wgs84();
        let line = jfk_line(Mask::ALL);
        for &s12 in &[1.0e3, 2.5e6, 1.0e7, 1.9e7] {
            let p = line.position(s12, Mask::ALL);
            let d = g.direct(40.6, -73.8, 45.0, s12, Mask::ALL).unwrap();
            assert_eq!(p.lat2, d.lat2);
            assert_eq!(p.lon2, d.lon2);
            assert_eq!(p.a12, d.a12);
            // and the arc version lands on the same point
            let a = line.arc_position(p.a12, Mask::ALL);
            assert_relative_eq!(a.lat2.unwrap(), p.lat2.unwrap(), epsilon = 1e-12);
            assert_relative_eq!(a.s12.unwrap(), s12, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_normalizes_azimuth() {
        let g = Geodesic::wgs84();
        let line = g.line(0.0, 0.0, 270.0, Mask::ALL).unwrap();
        assert_eq!(line.azi1(), -90.0);
        let line = g.line(0.0, 0.0, 180.0, Mask::ALL).unwrap();
        assert_eq!(line.azi1(), -180.0);
    }
}
