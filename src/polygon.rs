//! Perimeter and area of polygons whose edges are geodesics.

use std::f64::consts::PI;

use crate::accumulator::Accumulator;
use crate::geodesic::{Geodesic, Mask};
use crate::math::{ang_normalize, NAN};

/// Output of [`PolygonArea::compute`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PolygonResult {
    /// Number of vertices
    pub number: usize,
    /// Perimeter of the polygon, or length of the polyline (metres)
    pub perimeter: f64,
    /// Enclosed area (square metres); `None` for a polyline
    pub area: Option<f64>,
}

/// Accumulates the vertices of a polygon (or polyline) and reports its
/// perimeter and area.
///
/// The area is the sum of the signed areas between each edge and the
/// equator, corrected by half the ellipsoid's area whenever the polygon
/// encircles a pole (an odd number of antimeridian crossings).
#[derive(Clone, Debug)]
pub struct PolygonArea<'a> {
    geod: &'a Geodesic,
    polyline: bool,
    mask: Mask,
    area0: f64,
    num: usize,
    crossings: i32,
    areasum: Option<Accumulator>,
    perimetersum: Accumulator,
    lat0: f64,
    lon0: f64,
    lat1: f64,
    lon1: f64,
}

impl<'a> PolygonArea<'a> {
    pub fn new(geod: &'a Geodesic, polyline: bool) -> Self {
        Self {
            geod,
            polyline,
            mask: if polyline {
                Mask::DISTANCE
            } else {
                Mask::DISTANCE | Mask::AREA
            },
            area0: 4.0 * PI * geod.ellipsoid().c2,
            num: 0,
            crossings: 0,
            areasum: (!polyline).then(Accumulator::default),
            perimetersum: Accumulator::default(),
            lat0: 0.0,
            lon0: 0.0,
            lat1: 0.0,
            lon1: 0.0,
        }
    }

    /// Number of -1, 0 or 1 crossings of the antimeridian going from `lon1`
    /// to `lon2` along the shorter way round.
    pub fn transit(lon1: f64, lon2: f64) -> i32 {
        let lon1 = ang_normalize(lon1);
        let lon2 = ang_normalize(lon2);
        // in (-180, 180]
        let lon12 = -ang_normalize(lon1 - lon2);
        if lon1 < 0.0 && lon2 >= 0.0 && lon12 > 0.0 {
            1
        } else if lon2 < 0.0 && lon1 >= 0.0 && lon12 < 0.0 {
            -1
        } else {
            0
        }
    }

    pub fn clear(&mut self) {
        self.num = 0;
        self.crossings = 0;
        if let Some(areasum) = self.areasum.as_mut() {
            areasum.set(0.0);
        }
        self.perimetersum.set(0.0);
        self.lat0 = 0.0;
        self.lon0 = 0.0;
        self.lat1 = 0.0;
        self.lon1 = 0.0;
    }

    pub fn number(&self) -> usize {
        self.num
    }

    pub fn is_polyline(&self) -> bool {
        self.polyline
    }

    /// Add a vertex. Coordinates are not checked: a latitude outside
    /// [-90, 90] turns the running sums into NaN. Longitudes are taken to lie
    /// in [-540, 540).
    pub fn add_point(&mut self, lat: f64, lon: f64) {
        if self.num == 0 {
            self.lat0 = lat;
            self.lon0 = lon;
        } else {
            let (s12, area12) = self.edge(self.lat1, self.lon1, lat, lon);
            self.perimetersum.add(s12);
            if let Some(areasum) = self.areasum.as_mut() {
                areasum.add(area12);
                self.crossings += Self::transit(self.lon1, lon);
            }
        }
        self.lat1 = lat;
        self.lon1 = lon;
        self.num += 1;
    }

    /// Perimeter and area of the polygon closed back to its first vertex.
    ///
    /// With `reverse` unset counter-clockwise traversal counts as positive.
    /// With `sign` set the area is reported in (-area0/2, area0/2], else in
    /// [0, area0), where area0 is the total area of the ellipsoid.
    pub fn compute(&self, reverse: bool, sign: bool) -> PolygonResult {
        if self.num < 2 {
            return PolygonResult {
                number: self.num,
                perimeter: 0.0,
                area: (!self.polyline).then_some(0.0),
            };
        }
        let Some(areasum) = self.areasum else {
            return PolygonResult {
                number: self.num,
                perimeter: self.perimetersum.sum(0.0),
                area: None,
            };
        };
        let (s12, area12) = self.edge(self.lat1, self.lon1, self.lat0, self.lon0);
        let mut tempsum = areasum;
        tempsum.add(area12);
        let crossings = self.crossings + Self::transit(self.lon1, self.lon0);
        PolygonResult {
            number: self.num,
            perimeter: self.perimetersum.sum(s12),
            area: Some(self.reduce_area(tempsum, crossings, reverse, sign)),
        }
    }

    /// The result [`compute`](Self::compute) would give after adding
    /// (lat, lon), without adding it.
    pub fn test_compute(&self, lat: f64, lon: f64, reverse: bool, sign: bool) -> PolygonResult {
        if self.num == 0 {
            return PolygonResult {
                number: 1,
                perimeter: 0.0,
                area: (!self.polyline).then_some(0.0),
            };
        }
        let number = self.num + 1;
        let (s12, area12) = self.edge(self.lat1, self.lon1, lat, lon);
        let mut perimeter = self.perimetersum;
        perimeter.add(s12);
        let Some(areasum) = self.areasum else {
            return PolygonResult {
                number,
                perimeter: perimeter.sum(0.0),
                area: None,
            };
        };
        let (s01, area01) = self.edge(lat, lon, self.lat0, self.lon0);
        let mut tempsum = areasum;
        tempsum.add(area12);
        tempsum.add(area01);
        let crossings =
            self.crossings + Self::transit(self.lon1, lon) + Self::transit(lon, self.lon0);
        PolygonResult {
            number,
            perimeter: perimeter.sum(s01),
            area: Some(self.reduce_area(tempsum, crossings, reverse, sign)),
        }
    }

    fn edge(&self, lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> (f64, f64) {
        let r = self.geod.gen_inverse(lat1, lon1, lat2, lon2, self.mask);
        (r.s12.unwrap_or(NAN), r.area12.unwrap_or(NAN))
    }

    fn reduce_area(&self, mut tempsum: Accumulator, crossings: i32, reverse: bool, sign: bool) -> f64 {
        if crossings & 1 != 0 {
            let half = self.area0 / 2.0;
            tempsum.add(if tempsum.sum(0.0) < 0.0 { half } else { -half });
        }
        // area is with the clockwise sense. If !reverse convert to
        // counter-clockwise convention.
        if !reverse {
            tempsum.negate();
        }
        // If sign put area in (-area0/2, area0/2], else put area in [0, area0)
        let area = tempsum.sum(0.0);
        if sign {
            if area > self.area0 / 2.0 {
                tempsum.add(-self.area0);
            } else if area <= -self.area0 / 2.0 {
                tempsum.add(self.area0);
            }
        } else if area >= self.area0 {
            tempsum.add(-self.area0);
        } else if area < 0.0 {
            tempsum.add(self.area0);
        }
        0.0 + tempsum.sum(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const OCTANT: [(f64, f64); 3] = [(0.0, 0.0), (0.0, 90.0), (90.0, 0.0)];
    const SQUARE: [(f64, f64); 4] = [(1.0, 1.0), (1.0, -1.0), (-1.0, -1.0), (-1.0, 1.0)];

    fn polygon(points: &[(f64, f64)], polyline: bool) -> PolygonArea<'static> {
        let mut poly = PolygonArea::new(Geodesic::wgs84(), polyline);
        for &(lat, lon) in points {
            poly.add_point(lat, lon);
        }
        poly
    }

    #[test]
    fn test_transit() {
        assert_eq!(PolygonArea::transit(170.0, -170.0), 0);
        assert_eq!(PolygonArea::transit(-170.0, 170.0), 0);
        assert_eq!(PolygonArea::transit(-10.0, 10.0), 1);
        assert_eq!(PolygonArea::transit(10.0, -10.0), -1);
        assert_eq!(PolygonArea::transit(0.0, 180.0), 0);
        assert_eq!(PolygonArea::transit(180.0, 0.0), 1);
    }

    #[test]
    fn test_octant_orientation_and_sign() {
        let poly = polygon(&OCTANT, false);
        let r = poly.compute(false, true);
        assert_eq!(r.number, 3);
        assert_relative_eq!(r.perimeter, 30_022_685.630_020_067, epsilon = 1e-6);
        assert_relative_eq!(r.area.unwrap(), 63_758_202_715_511.055, max_relative = 1e-12);

        let reversed = poly.compute(true, true).area.unwrap();
        assert_relative_eq!(reversed, -63_758_202_715_511.055, max_relative = 1e-12);

        // Clockwise area as a positive number: the rest of the ellipsoid.
        let unsigned = poly.compute(true, false).area.unwrap();
        assert_relative_eq!(unsigned, 446_307_419_008_577.4, max_relative = 1e-12);
        assert_relative_eq!(
            unsigned + r.area.unwrap(),
            Geodesic::wgs84().total_area(),
            max_relative = 1e-14
        );
    }

    #[test]
    fn test_compute_does_not_mutate() {
        let poly = polygon(&OCTANT, false);
        let a = poly.compute(false, true);
        let b = poly.compute(false, true);
        assert_eq!(a, b);
        assert_eq!(poly.number(), 3);
    }

    #[test]
    fn test_test_compute_previews_next_point() {
        let mut poly = polygon(&OCTANT[..2], false);
        let preview = poly.test_compute(90.0, 0.0, false, true);
        assert_eq!(poly.number(), 2);
        poly.add_point(90.0, 0.0);
        let actual = poly.compute(false, true);
        assert_eq!(preview.number, actual.number);
        assert_relative_eq!(preview.perimeter, actual.perimeter, max_relative = 1e-15);
        assert_relative_eq!(preview.area.unwrap(), actual.area.unwrap(), max_relative = 1e-14);

        let empty = PolygonArea::new(Geodesic::wgs84(), false);
        let r = empty.test_compute(10.0, 10.0, false, true);
        assert_eq!((r.number, r.perimeter, r.area), (1, 0.0, Some(0.0)));
    }

    #[test]
    fn test_polyline() {
        let poly = polygon(&OCTANT, true);
        let r = poly.compute(false, true);
        assert_eq!(r.area, None);
        assert_relative_eq!(r.perimeter, 20_020_719.900_707_345, epsilon = 1e-6);

        let poly = polygon(&OCTANT[..1], true);
        let r = poly.test_compute(0.0, 90.0, false, true);
        assert_eq!(r.number, 2);
        assert_relative_eq!(r.perimeter, 10_018_754.171_394_622, epsilon = 1e-6);
        assert_eq!(r.area, None);
    }

    #[test]
    fn test_degenerate_inputs() {
        let empty = polygon(&[], false).compute(false, true);
        assert_eq!((empty.number, empty.perimeter, empty.area), (0, 0.0, Some(0.0)));
        let single = polygon(&[(0.0, 0.0)], false).compute(false, true);
        assert_eq!((single.number, single.perimeter, single.area), (1, 0.0, Some(0.0)));
        assert_eq!(polygon(&[], true).compute(false, true).area, None);
    }

    #[test]
    fn test_square_rotation_and_reversal() {
        let expected = 49_238_887_518.554_405;
        for k in 0..4 {
            let mut pts = SQUARE.to_vec();
            pts.rotate_left(k);
            let r = polygon(&pts, false).compute(false, true);
            assert_relative_eq!(r.perimeter, 887_508.146_424_665_9, epsilon = 1e-6);
            assert_relative_eq!(r.area.unwrap(), expected, max_relative = 1e-10);

            pts.reverse();
            let r = polygon(&pts, false).compute(false, true);
            assert_relative_eq!(r.area.unwrap(), -expected, max_relative = 1e-10);
        }
    }

    #[test]
    fn test_antimeridian_square() {
        let pts = [(1.0, 179.0), (1.0, -179.0), (-1.0, -179.0), (-1.0, 179.0)];
        let r = polygon(&pts, false).compute(false, true);
        assert_relative_eq!(r.perimeter, 887_508.146_424_665_9, epsilon = 1e-6);
        assert_relative_eq!(r.area.unwrap(), -49_238_887_518.554_405, max_relative = 1e-10);
    }

    #[test]
    fn test_polar_cap() {
        let pts = [(89.0, 0.0), (89.0, 90.0), (89.0, 180.0), (89.0, 270.0)];
        let r = polygon(&pts, false).compute(false, true);
        assert_relative_eq!(r.perimeter, 631_819.874_528_017_6, epsilon = 1e-6);
        assert_relative_eq!(r.area.unwrap(), 24_952_305_678.0, max_relative = 1e-10);
    }

    #[test]
    fn test_clear() {
        let mut poly = polygon(&OCTANT, false);
        poly.clear();
        assert_eq!(poly.number(), 0);
        for &(lat, lon) in &SQUARE {
            poly.add_point(lat, lon);
        }
        let r = poly.compute(false, true);
        assert_relative_eq!(r.area.unwrap(), 49_238_887_518.554_405, max_relative = 1e-10);
    }

    #[test]
    fn test_bad_latitude_gives_nan() {
        let r = polygon(&[(0.0, 0.0), (91.0, 10.0), (10.0, 10.0)], false).compute(false, true);
        assert!(r.perimeter.is_nan());
        assert!(r.area.unwrap().is_nan());
    }
}
