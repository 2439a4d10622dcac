//! Array-oriented geodesic front end.
//!
//! Element-wise forward and inverse problems over `ndarray` views, points
//! along a geodesic, and lengths and areas of vertex sequences. Inputs are
//! longitude first and in degrees unless `radians` is set. Nothing here
//! validates coordinates: a latitude outside [-90, 90] yields NaN in the
//! affected outputs rather than an error.

use ndarray::{Array1, ArrayView1};

use crate::ellipsoid::Ellipsoid;
use crate::error::GeodError;
use crate::geodesic::{Geodesic, GeodesicLine, Mask};
use crate::math::{ang_wrap, NAN};
use crate::polygon::PolygonArea;

type Triple = (Array1<f64>, Array1<f64>, Array1<f64>);

/// Batch calculations on one ellipsoid.
#[derive(Clone, Debug)]
pub struct Geod {
    geodesic: Geodesic,
}

impl Geod {
    pub fn new(a: f64, f: f64) -> Result<Self, GeodError> {
        Ok(Self {
            geodesic: Geodesic::new(a, f)?,
        })
    }

    /// A named ellipsoid such as `"WGS84"` or `"clrk66"`.
    pub fn named(name: &str) -> Result<Self, GeodError> {
        Ok(Self {
            geodesic: Geodesic::named(name)?,
        })
    }

    pub fn wgs84() -> Self {
        Self {
            geodesic: Geodesic::wgs84().clone(),
        }
    }

    pub fn geodesic(&self) -> &Geodesic {
        &self.geodesic
    }

    pub fn ellipsoid(&self) -> &Ellipsoid {
        self.geodesic.ellipsoid()
    }

    /// Forward problem per element: end longitudes, end latitudes and back
    /// azimuths after travelling `dist` metres from each start point.
    pub fn fwd(
        &self,
        lons: &ArrayView1<'_, f64>,
        lats: &ArrayView1<'_, f64>,
        az: &ArrayView1<'_, f64>,
        dist: &ArrayView1<'_, f64>,
        radians: bool,
    ) -> Result<Triple, GeodError> {
        let n = same_length(&[
            ("lons", lons.len()),
            ("lats", lats.len()),
            ("az", az.len()),
            ("dist", dist.len()),
        ])?;
        let mut lons2 = Array1::from_elem(n, NAN);
        let mut lats2 = Array1::from_elem(n, NAN);
        let mut back = Array1::from_elem(n, NAN);

        for i in 0..n {
            let lon1 = ang_wrap(to_degrees(lons[i], radians));
            let lat1 = to_degrees(lats[i], radians);
            let azi1 = ang_wrap(to_degrees(az[i], radians));
            let r = self
                .geodesic
                .gen_direct(lat1, lon1, azi1, false, dist[i], Mask::DIRECT_DEFAULT);
            lons2[i] = from_degrees(r.lon2.unwrap_or(NAN), radians);
            lats2[i] = from_degrees(r.lat2.unwrap_or(NAN), radians);
            back[i] = from_degrees(back_azimuth(r.azi2.unwrap_or(NAN)), radians);
        }
        Ok((lons2, lats2, back))
    }

    /// Inverse problem per element: forward azimuths, back azimuths and
    /// distances (metres) between the point pairs.
    pub fn inv(
        &self,
        lons1: &ArrayView1<'_, f64>,
        lats1: &ArrayView1<'_, f64>,
        lons2: &ArrayView1<'_, f64>,
        lats2: &ArrayView1<'_, f64>,
        radians: bool,
    ) -> Result<Triple, GeodError> {
        let n = same_length(&[
            ("lons1", lons1.len()),
            ("lats1", lats1.len()),
            ("lons2", lons2.len()),
            ("lats2", lats2.len()),
        ])?;
        let mut az12 = Array1::from_elem(n, NAN);
        let mut az21 = Array1::from_elem(n, NAN);
        let mut dist = Array1::from_elem(n, NAN);

        for i in 0..n {
            let r = self.inverse_deg(
                to_degrees(lons1[i], radians),
                to_degrees(lats1[i], radians),
                to_degrees(lons2[i], radians),
                to_degrees(lats2[i], radians),
            );
            az12[i] = from_degrees(r.1, radians);
            az21[i] = from_degrees(back_azimuth(r.2), radians);
            dist[i] = r.0;
        }
        Ok((az12, az21, dist))
    }

    /// `npts` points spaced equally along the geodesic between two points,
    /// endpoints excluded, as `(lon, lat)` pairs.
    pub fn npts(
        &self,
        lon1: f64,
        lat1: f64,
        lon2: f64,
        lat2: f64,
        npts: usize,
        radians: bool,
    ) -> Vec<(f64, f64)> {
        let lon1 = ang_wrap(to_degrees(lon1, radians));
        let lat1 = to_degrees(lat1, radians);
        let (s12, azi1, _) = self.inverse_deg(
            lon1,
            lat1,
            to_degrees(lon2, radians),
            to_degrees(lat2, radians),
        );
        let del_s = s12 / (npts + 1) as f64;
        let line = GeodesicLine::new(
            &self.geodesic,
            lat1,
            lon1,
            azi1,
            Mask::LATITUDE | Mask::LONGITUDE | Mask::DISTANCE_IN,
        );
        (1..=npts)
            .map(|i| {
                let p = line.position(i as f64 * del_s, Mask::LATITUDE | Mask::LONGITUDE);
                (
                    from_degrees(p.lon2.unwrap_or(NAN), radians),
                    from_degrees(p.lat2.unwrap_or(NAN), radians),
                )
            })
            .collect()
    }

    /// Distance (metres) of each segment of the path through the points.
    pub fn line_lengths(
        &self,
        lons: &ArrayView1<'_, f64>,
        lats: &ArrayView1<'_, f64>,
        radians: bool,
    ) -> Result<Array1<f64>, GeodError> {
        let n = same_length(&[("lons", lons.len()), ("lats", lats.len())])?;
        let lengths: Vec<f64> = (1..n)
            .map(|i| {
                self.inverse_deg(
                    to_degrees(lons[i - 1], radians),
                    to_degrees(lats[i - 1], radians),
                    to_degrees(lons[i], radians),
                    to_degrees(lats[i], radians),
                )
                .0
            })
            .collect();
        Ok(Array1::from(lengths))
    }

    /// Total length (metres) of the path through the points, summed with
    /// compensation.
    pub fn line_length(
        &self,
        lons: &ArrayView1<'_, f64>,
        lats: &ArrayView1<'_, f64>,
        radians: bool,
    ) -> Result<f64, GeodError> {
        Ok(self.accumulate(lons, lats, radians, true)?.0)
    }

    /// Signed area (square metres, counter-clockwise positive) and perimeter
    /// (metres) of the polygon through the points. The polygon need not be
    /// closed.
    pub fn polygon_area_perimeter(
        &self,
        lons: &ArrayView1<'_, f64>,
        lats: &ArrayView1<'_, f64>,
        radians: bool,
    ) -> Result<(f64, f64), GeodError> {
        let (perimeter, area) = self.accumulate(lons, lats, radians, false)?;
        Ok((area, perimeter))
    }

    /// (distance, azi1, azi2) in metres and degrees.
    fn inverse_deg(&self, lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> (f64, f64, f64) {
        let r = self.geodesic.gen_inverse(
            lat1,
            ang_wrap(lon1),
            lat2,
            ang_wrap(lon2),
            Mask::INVERSE_DEFAULT,
        );
        (
            r.s12.unwrap_or(NAN),
            r.azi1.unwrap_or(NAN),
            r.azi2.unwrap_or(NAN),
        )
    }

    fn accumulate(
        &self,
        lons: &ArrayView1<'_, f64>,
        lats: &ArrayView1<'_, f64>,
        radians: bool,
        polyline: bool,
    ) -> Result<(f64, f64), GeodError> {
        same_length(&[("lons", lons.len()), ("lats", lats.len())])?;
        let mut poly = PolygonArea::new(&self.geodesic, polyline);
        for (&lon, &lat) in lons.iter().zip(lats.iter()) {
            poly.add_point(
                to_degrees(lat, radians),
                ang_wrap(to_degrees(lon, radians)),
            );
        }
        let r = poly.compute(false, true);
        Ok((r.perimeter, r.area.unwrap_or(NAN)))
    }
}

/// Turn the forward azimuth at the end point into the azimuth back to the
/// start, in (-180, 180].
fn back_azimuth(azi2: f64) -> f64 {
    if azi2 > 0.0 {
        azi2 - 180.0
    } else {
        azi2 + 180.0
    }
}

fn to_degrees(x: f64, radians: bool) -> f64 {
    if radians {
        x.to_degrees()
    } else {
        x
    }
}

fn from_degrees(x: f64, radians: bool) -> f64 {
    if radians {
        x.to_radians()
    } else {
        x
    }
}

/// Common length of named arrays given as `(name, len)` pairs.
fn same_length(lengths: &[(&str, usize)]) -> Result<usize, GeodError> {
    let (first, head) = match lengths.first() {
        Some(&(name, len)) => (name, len),
        None => return Ok(0),
    };
    for &(name, len) in &lengths[1..] {
        if len != head {
            return Err(GeodError::Shape(format!(
                "{first} and {name} must have same length, got {head} and {len}"
            )));
        }
    }
    Ok(head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    const ANT_LATS: [f64; 17] = [
        -72.9, -71.9, -74.9, -74.3, -77.5, -77.4, -71.7, -65.9, -65.7, -66.6, -66.9, -69.8, -70.0,
        -71.0, -77.3, -77.9, -74.7,
    ];
    const ANT_LONS: [f64; 17] = [
        -74.0, -102.0, -102.0, -131.0, -163.0, 163.0, 172.0, 140.0, 113.0, 88.0, 59.0, 25.0, -4.0,
        -14.0, -33.0, -46.0, -61.0,
    ];

    fn boston_portland() -> (f64, f64, f64, f64) {
        (
            -71.0 - 7.0 / 60.0,
            42.0 + 15.0 / 60.0,
            -123.0 - 41.0 / 60.0,
            45.0 + 31.0 / 60.0,
        )
    }

    #[test]
    fn test_inv_classic() {
        let g = Geod::named("clrk66").unwrap();
        let (lon1, lat1, lon2, lat2) = boston_portland();
        let (az12, az21, dist) = g
            .inv(
                &array![lon1].view(),
                &array![lat1].view(),
                &array![lon2].view(),
                &array![lat2].view(),
                false,
            )
            .unwrap();
        assert_relative_eq!(az12[0], -66.531, epsilon = 1e-3);
        assert_relative_eq!(az21[0], 75.654, epsilon = 1e-3);
        assert_relative_eq!(dist[0], 4_164_192.708, epsilon = 1e-3);
    }

    #[test]
    fn test_fwd_classic() {
        let g = Geod::named("clrk66").unwrap();
        let (lon1, lat1, lon2, lat2) = boston_portland();
        let (lons2, lats2, back) = g
            .fwd(
                &array![lon1].view(),
                &array![lat1].view(),
                &array![-66.530_594_787_662_3].view(),
                &array![4_164_192.708_099_466_3].view(),
                false,
            )
            .unwrap();
        assert_relative_eq!(lons2[0], lon2, epsilon = 1e-9);
        assert_relative_eq!(lats2[0], lat2, epsilon = 1e-9);
        assert_relative_eq!(back[0], 75.654, epsilon = 1e-3);
    }

    #[test]
    fn test_fwd_inv_radians() {
        let g = Geod::wgs84();
        let (az12, az21, dist) = g
            .inv(
                &array![20f64.to_radians()].view(),
                &array![10f64.to_radians()].view(),
                &array![40f64.to_radians()].view(),
                &array![30f64.to_radians()].view(),
                true,
            )
            .unwrap();
        assert_relative_eq!(dist[0], 3_035_728.956_905_632_3, epsilon = 1e-6);
        assert_relative_eq!(az12[0], 40.319_640_222_045_905f64.to_radians(), epsilon = 1e-12);
        assert_relative_eq!(
            az21[0],
            (47.328_994_793_150_06f64 - 180.0).to_radians(),
            epsilon = 1e-12
        );

        let (lons2, lats2, _) = g
            .fwd(
                &array![20f64.to_radians()].view(),
                &array![10f64.to_radians()].view(),
                &array![30f64.to_radians()].view(),
                &array![1_000_000.0].view(),
                true,
            )
            .unwrap();
        assert_relative_eq!(lons2[0], 24.701_477_421_983_434f64.to_radians(), epsilon = 1e-12);
        assert_relative_eq!(lats2[0], 17.786_923_817_892_19f64.to_radians(), epsilon = 1e-12);
    }

    #[test]
    fn test_back_azimuth_range() {
        assert_eq!(back_azimuth(0.0), 180.0);
        assert_eq!(back_azimuth(180.0), 0.0);
        assert_eq!(back_azimuth(-180.0), 0.0);
        assert_relative_eq!(back_azimuth(-104.346), 75.654, epsilon = 1e-12);
        assert_eq!(back_azimuth(90.0), -90.0);
    }

    #[test]
    fn test_npts() {
        let g = Geod::named("clrk66").unwrap();
        let (lon1, lat1, lon2, lat2) = boston_portland();
        let pts = g.npts(lon1, lat1, lon2, lat2, 10, false);
        let expected = [
            (-75.414, 43.528),
            (-79.883, 44.637),
            (-84.512, 45.565),
            (-89.279, 46.299),
            (-94.156, 46.830),
            (-99.112, 47.149),
            (-104.106, 47.251),
            (-109.100, 47.136),
            (-114.051, 46.805),
            (-118.924, 46.262),
        ];
        assert_eq!(pts.len(), expected.len());
        for (&(lon, lat), &(elon, elat)) in pts.iter().zip(expected.iter()) {
            assert_relative_eq!(lon, elon, epsilon = 5e-4);
            assert_relative_eq!(lat, elat, epsilon = 5e-4);
        }
        assert!(g.npts(lon1, lat1, lon2, lat2, 0, false).is_empty());
    }

    #[test]
    fn test_antarctica() {
        let g = Geod::new(6_378_137.0, 0.003_352_810_664_747_512_6).unwrap();
        let lons = Array1::from(ANT_LONS.to_vec());
        let lats = Array1::from(ANT_LATS.to_vec());
        let (area, perimeter) = g
            .polygon_area_perimeter(&lons.view(), &lats.view(), false)
            .unwrap();
        assert_relative_eq!(area, 13_376_856_682_207.375, max_relative = 1e-12);
        assert_relative_eq!(perimeter, 14_710_425.406_973_64, epsilon = 1e-6);

        let length = g.line_length(&lons.view(), &lats.view(), false).unwrap();
        assert_relative_eq!(length, 14_259_605.611_101_86, epsilon = 1e-6);

        let lengths = g.line_lengths(&lons.view(), &lats.view(), false).unwrap();
        assert_eq!(lengths.len(), 16);
        assert_relative_eq!(lengths.sum(), length, epsilon = 1e-6);
    }

    #[test]
    fn test_line_lengths_wgs84() {
        let g = Geod::wgs84();
        let lons = Array1::from(ANT_LONS[..3].to_vec());
        let lats = Array1::from(ANT_LATS[..3].to_vec());
        let lengths = g.line_lengths(&lons.view(), &lats.view(), false).unwrap();
        assert_relative_eq!(lengths[0], 943_065.743_832_019_4, epsilon = 1e-6);
        assert_relative_eq!(lengths[1], 334_805.009_650_699_9, epsilon = 1e-6);

        let one = array![10.0];
        assert_eq!(g.line_lengths(&one.view(), &one.view(), false).unwrap().len(), 0);
    }

    #[test]
    fn test_shape_mismatch() {
        let g = Geod::wgs84();
        let a = array![1.0, 2.0];
        let b = array![1.0];
        let err = g
            .inv(&a.view(), &a.view(), &a.view(), &b.view(), false)
            .unwrap_err();
        assert_eq!(
            err,
            GeodError::Shape("lons1 and lats2 must have same length, got 2 and 1".to_string())
        );
        assert!(g.line_length(&a.view(), &b.view(), false).is_err());
    }

    #[test]
    fn test_bad_latitude_is_nan_not_error() {
        let g = Geod::wgs84();
        let (az12, az21, dist) = g
            .inv(
                &array![0.0, 0.0].view(),
                &array![91.0, 0.0].view(),
                &array![10.0, 10.0].view(),
                &array![0.0, 0.0].view(),
                false,
            )
            .unwrap();
        assert!(dist[0].is_nan() && az12[0].is_nan() && az21[0].is_nan());
        assert!(dist[1].is_finite());
    }

    #[test]
    fn test_wraps_any_longitude() {
        let g = Geod::wgs84();
        let (_, _, d1) = g
            .inv(
                &array![730.0].view(),
                &array![10.0].view(),
                &array![-1050.0].view(),
                &array![30.0].view(),
                false,
            )
            .unwrap();
        let (_, _, d2) = g
            .inv(
                &array![10.0].view(),
                &array![10.0].view(),
                &array![30.0].view(),
                &array![30.0].view(),
                false,
            )
            .unwrap();
        assert_eq!(d1[0], d2[0]);
    }
}
