//! Geodesics on an ellipsoid of revolution.
//!
//! The algorithms follow C. F. F. Karney, *Algorithms for geodesics*,
//! J. Geodesy 87, 43-55 (2013), with series expansions carried to sixth
//! order in the third flattening. Distances are accurate to round-off for
//! |f| < 0.01, in every configuration including nearly antipodal points.
//!
//! [`Geodesic`] owns the ellipsoid and its coefficient tables and is
//! immutable after construction, so one instance can be shared across
//! threads. The checked entry points (`inverse`, `direct`, `arc_direct`,
//! `line`, `area`) validate their inputs; the `gen_*` variants do not, and
//! let NaN propagate instead.

mod data;
mod inverse;
mod line;
mod mask;
mod series;

use std::sync::OnceLock;

pub use data::GeodesicData;
pub use line::GeodesicLine;
pub use mask::Mask;

use crate::ellipsoid::Ellipsoid;
use crate::error::GeodError;
use crate::math::{ang_normalize, is_finite, EPSILON, MIN_VAL};
use crate::polygon::{PolygonArea, PolygonResult};

/// Order of the series expansions.
pub(crate) const GEOD_ORD: usize = 6;
pub(crate) const N_A3X: usize = GEOD_ORD;
pub(crate) const N_C1: usize = GEOD_ORD;
pub(crate) const N_C1P: usize = GEOD_ORD;
pub(crate) const N_C2: usize = GEOD_ORD;
pub(crate) const N_C3: usize = GEOD_ORD;
pub(crate) const N_C3X: usize = (N_C3 * (N_C3 - 1)) / 2;
pub(crate) const N_C4: usize = GEOD_ORD;
pub(crate) const N_C4X: usize = (N_C4 * (N_C4 + 1)) / 2;

/// Newton iteration limit for the inverse problem.
pub(crate) const MAXIT: usize = 50;
pub(crate) const TOL0: f64 = EPSILON;
/// Increased from tol0 to avoid slow convergence on nearly antipodal points.
pub(crate) const TOL1: f64 = 200.0 * TOL0;

/// The geodesic engine for one ellipsoid.
#[derive(Clone, Debug)]
pub struct Geodesic {
    pub(crate) ellipsoid: Ellipsoid,
    /// sqrt(MIN_VAL)
    pub(crate) tiny: f64,
    /// 1000 sqrt(EPSILON)
    pub(crate) xthresh: f64,
    /// sqrt(EPSILON) / max(0.1, sqrt(|e2|)), the "really short line" threshold
    pub(crate) etol2: f64,
    pub(crate) a3x: [f64; N_A3X],
    pub(crate) c3x: [f64; N_C3X],
    pub(crate) c4x: [f64; N_C4X],
}

static WGS84: OnceLock<Geodesic> = OnceLock::new();

impl Geodesic {
    /// Build the engine for the ellipsoid with equatorial radius `a` (metres)
    /// and flattening `f`. A flattening above 1 is read as `1/f`.
    pub fn new(a: f64, f: f64) -> Result<Self, GeodError> {
        Ok(Self::from_ellipsoid(Ellipsoid::new(a, f)?))
    }

    /// Build the engine for one of the named ellipsoids, e.g. `"GRS80"`.
    pub fn named(name: &str) -> Result<Self, GeodError> {
        Ok(Self::from_ellipsoid(Ellipsoid::named(name)?))
    }

    pub fn from_ellipsoid(ellipsoid: Ellipsoid) -> Self {
        let tol2 = EPSILON.sqrt();
        let geod = Self {
            tiny: MIN_VAL.sqrt(),
            xthresh: 1000.0 * tol2,
            etol2: tol2 / 0.1f64.max(ellipsoid.e2.abs().sqrt()),
            a3x: series::a3_coeff(ellipsoid.n),
            c3x: series::c3_coeff(ellipsoid.n),
            c4x: series::c4_coeff(ellipsoid.ep2),
            ellipsoid,
        };
        log::debug!(
            "geodesic engine for a = {}, f = {} (c2 = {})",
            ellipsoid.a,
            ellipsoid.f,
            ellipsoid.c2
        );
        geod
    }

    /// The shared WGS84 engine, built on first use.
    pub fn wgs84() -> &'static Geodesic {
        WGS84.get_or_init(|| Self::from_ellipsoid(Ellipsoid::wgs84()))
    }

    pub fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }

    /// Equatorial radius (metres).
    pub fn a(&self) -> f64 {
        self.ellipsoid.a
    }

    pub fn f(&self) -> f64 {
        self.ellipsoid.f
    }

    /// Total area of the ellipsoid, 4 pi c2.
    pub fn total_area(&self) -> f64 {
        self.ellipsoid.area()
    }

    /// Solve the inverse problem between (lat1, lon1) and (lat2, lon2).
    ///
    /// The recorded `lon1`, `lon2` are normalized to [-180, 180).
    pub fn inverse(
        &self,
        lat1: f64,
        lon1: f64,
        lat2: f64,
        lon2: f64,
        outmask: Mask,
    ) -> Result<GeodesicData, GeodError> {
        let lon1 = check_position(lat1, lon1)?;
        let lon2 = check_position(lat2, lon2)?;
        Ok(self.gen_inverse(lat1, lon1, lat2, lon2, outmask))
    }

    /// Solve the direct problem: travel `s12` metres from (lat1, lon1) with
    /// initial azimuth `azi1`.
    pub fn direct(
        &self,
        lat1: f64,
        lon1: f64,
        azi1: f64,
        s12: f64,
        outmask: Mask,
    ) -> Result<GeodesicData, GeodError> {
        let lon1 = check_position(lat1, lon1)?;
        let azi1 = check_azimuth(azi1)?;
        check_distance(s12)?;
        Ok(self.gen_direct(lat1, lon1, azi1, false, s12, outmask))
    }

    /// As [`Geodesic::direct`] with the length given as an arc `a12` (degrees)
    /// on the auxiliary sphere.
    pub fn arc_direct(
        &self,
        lat1: f64,
        lon1: f64,
        azi1: f64,
        a12: f64,
        outmask: Mask,
    ) -> Result<GeodesicData, GeodError> {
        let lon1 = check_position(lat1, lon1)?;
        let azi1 = check_azimuth(azi1)?;
        check_distance(a12)?;
        Ok(self.gen_direct(lat1, lon1, azi1, true, a12, outmask))
    }

    /// The direct problem without input checks. `DISTANCE_IN` is added to
    /// the line's capabilities when `s12_a12` is a distance.
    pub fn gen_direct(
        &self,
        lat1: f64,
        lon1: f64,
        azi1: f64,
        arcmode: bool,
        s12_a12: f64,
        outmask: Mask,
    ) -> GeodesicData {
        let caps = if arcmode {
            outmask
        } else {
            outmask | Mask::DISTANCE_IN
        };
        GeodesicLine::new(self, lat1, lon1, azi1, caps).gen_position(arcmode, s12_a12, outmask)
    }

    /// A line starting at (lat1, lon1) with azimuth `azi1`, able to compute
    /// the outputs in `caps`. Distance queries are always supported.
    pub fn line(
        &self,
        lat1: f64,
        lon1: f64,
        azi1: f64,
        caps: Mask,
    ) -> Result<GeodesicLine<'_>, GeodError> {
        let lon1 = check_position(lat1, lon1)?;
        let azi1 = check_azimuth(azi1)?;
        Ok(GeodesicLine::new(
            self,
            lat1,
            lon1,
            azi1,
            caps | Mask::DISTANCE_IN,
        ))
    }

    /// Perimeter and area of the polygon with vertices `points` as
    /// `(lat, lon)` pairs. The polygon need not be closed. With `polyline`
    /// set only the length is computed.
    ///
    /// Counter-clockwise traversal gives a positive area.
    pub fn area(&self, points: &[(f64, f64)], polyline: bool) -> Result<PolygonResult, GeodError> {
        let mut poly = PolygonArea::new(self, polyline);
        for &(lat, lon) in points {
            let lon = check_position(lat, lon)?;
            poly.add_point(lat, lon);
        }
        Ok(poly.compute(false, true))
    }
}

/// Reject latitudes outside [-90, 90]; fold the longitude by one turn into
/// [-180, 360] and return it normalized to [-180, 180). NaN passes.
pub(crate) fn check_position(lat: f64, lon: f64) -> Result<f64, GeodError> {
    if lat.abs() > 90.0 {
        return Err(GeodError::InvalidLatitude(lat));
    }
    let lon = fold_turn(lon);
    if lon < -180.0 || lon > 360.0 {
        return Err(GeodError::InvalidLongitude(lon));
    }
    Ok(ang_normalize(lon))
}

pub(crate) fn check_azimuth(azi: f64) -> Result<f64, GeodError> {
    let azi = fold_turn(azi);
    if azi < -180.0 || azi > 360.0 {
        return Err(GeodError::InvalidAzimuth(azi));
    }
    Ok(ang_normalize(azi))
}

pub(crate) fn check_distance(s: f64) -> Result<(), GeodError> {
    if !is_finite(s) {
        return Err(GeodError::InvalidDistance(s));
    }
    Ok(())
}

fn fold_turn(x: f64) -> f64 {
    let x = if x > 360.0 { x - 360.0 } else { x };
    if x < -180.0 {
        x + 360.0
    } else {
        x
    }
}
