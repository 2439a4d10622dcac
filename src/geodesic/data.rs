//! The result record shared by the inverse, direct and line calculations.

use super::mask::Mask;
use crate::math::NAN;

/// Result of a geodesic calculation.
///
/// `lat1`, `lon1` and `a12` are always present. The other fields are `Some`
/// exactly when the corresponding output was requested (and, for a
/// [`GeodesicLine`](super::GeodesicLine), supported by its capabilities).
/// The inverse problem always echoes its end point in `lat2`, `lon2`.
/// A field that was requested but could not be computed holds `Some(NaN)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeodesicData {
    pub lat1: f64,
    pub lon1: f64,
    pub azi1: Option<f64>,
    pub lat2: Option<f64>,
    pub lon2: Option<f64>,
    pub azi2: Option<f64>,
    /// Distance from point 1 to point 2 (metres)
    pub s12: Option<f64>,
    /// Arc length on the auxiliary sphere (degrees)
    pub a12: f64,
    /// Reduced length (metres)
    pub m12: Option<f64>,
    /// Geodesic scale of point 2 relative to point 1 (M12)
    pub scale12: Option<f64>,
    /// Geodesic scale of point 1 relative to point 2 (M21)
    pub scale21: Option<f64>,
    /// Area between the geodesic and the equator (square metres)
    pub area12: Option<f64>,
}

impl GeodesicData {
    pub(crate) fn new(lat1: f64, lon1: f64) -> Self {
        Self {
            lat1,
            lon1,
            azi1: None,
            lat2: None,
            lon2: None,
            azi2: None,
            s12: None,
            a12: NAN,
            m12: None,
            scale12: None,
            scale21: None,
            area12: None,
        }
    }

    /// The geodesic scale pair (M12, M21) if it was computed.
    pub fn scales(&self) -> Option<(f64, f64)> {
        self.scale12.zip(self.scale21)
    }

    /// End point `(lat2, lon2)` if both coordinates were computed.
    pub fn point2(&self) -> Option<(f64, f64)> {
        self.lat2.zip(self.lon2)
    }
}

/// Raw numbers produced by the solvers before they are sorted into a
/// [`GeodesicData`] according to the output mask.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Solution {
    pub a12: f64,
    pub lat2: f64,
    pub lon2: f64,
    pub azi1: f64,
    pub azi2: f64,
    pub s12: f64,
    pub m12: f64,
    pub scale12: f64,
    pub scale21: f64,
    pub area12: f64,
}

impl Solution {
    pub const NAN: Solution = Solution {
        a12: NAN,
        lat2: NAN,
        lon2: NAN,
        azi1: NAN,
        azi2: NAN,
        s12: NAN,
        m12: NAN,
        scale12: NAN,
        scale21: NAN,
        area12: NAN,
    };

    /// Copy the fields selected by `outmask` into `data`.
    pub fn fill(&self, data: &mut GeodesicData, outmask: Mask) {
        let outmask = outmask.outputs();
        let pick = |flag: Mask, v: f64| outmask.intersects(flag).then_some(v);
        data.a12 = self.a12;
        // End points already recorded (the inverse problem's inputs) are kept.
        if outmask.intersects(Mask::LATITUDE) {
            data.lat2 = data.lat2.or(Some(self.lat2));
        }
        if outmask.intersects(Mask::LONGITUDE) {
            data.lon2 = data.lon2.or(Some(self.lon2));
        }
        if outmask.intersects(Mask::AZIMUTH) {
            data.azi1 = data.azi1.or(Some(self.azi1));
            data.azi2 = Some(self.azi2);
        }
        if let Some(s12) = pick(Mask::DISTANCE, self.s12) {
            data.s12 = Some(s12);
        }
        data.m12 = pick(Mask::REDUCEDLENGTH, self.m12);
        if outmask.intersects(Mask::GEODESICSCALE) {
            data.scale12 = Some(self.scale12);
            data.scale21 = Some(self.scale21);
        }
        data.area12 = pick(Mask::AREA, self.area12);
    }
}
