//! PyO3 bindings for the batch geodesic calculations.

use numpy::{PyArray1, PyReadonlyArray1};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::geod::Geod;

type Arrays3<'py> = (
    Bound<'py, PyArray1<f64>>,
    Bound<'py, PyArray1<f64>>,
    Bound<'py, PyArray1<f64>>,
);

fn make_geod(a: f64, f: f64) -> PyResult<Geod> {
    Geod::new(a, f).map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Solve the forward geodesic problem element-wise.
///
/// Args:
///     a: Equatorial radius of the ellipsoid (metres).
///     f: Flattening of the ellipsoid.
///     lons, lats: Start points.
///     az: Forward azimuths at the start points.
///     dist: Distances to travel (metres).
///     radians: Angles in radians instead of degrees.
///
/// Returns:
///     Tuple of (lons, lats, back_azimuths) at the end points.
#[pyfunction]
#[pyo3(signature = (a, f, lons, lats, az, dist, radians=false))]
#[allow(clippy::too_many_arguments)]
pub fn geod_fwd<'py>(
    py: Python<'py>,
    a: f64,
    f: f64,
    lons: PyReadonlyArray1<'py, f64>,
    lats: PyReadonlyArray1<'py, f64>,
    az: PyReadonlyArray1<'py, f64>,
    dist: PyReadonlyArray1<'py, f64>,
    radians: bool,
) -> PyResult<Arrays3<'py>> {
    let geod = make_geod(a, f)?;
    let lons = lons.as_array().to_owned();
    let lats = lats.as_array().to_owned();
    let az = az.as_array().to_owned();
    let dist = dist.as_array().to_owned();

    let (x, y, back) = py
        .allow_threads(move || {
            geod.fwd(&lons.view(), &lats.view(), &az.view(), &dist.view(), radians)
        })
        .map_err(|e| PyValueError::new_err(e.to_string()))?;

    Ok((
        PyArray1::from_owned_array(py, x),
        PyArray1::from_owned_array(py, y),
        PyArray1::from_owned_array(py, back),
    ))
}

/// Solve the inverse geodesic problem element-wise.
///
/// Returns:
///     Tuple of (forward_azimuths, back_azimuths, distances).
#[pyfunction]
#[pyo3(signature = (a, f, lons1, lats1, lons2, lats2, radians=false))]
#[allow(clippy::too_many_arguments)]
pub fn geod_inv<'py>(
    py: Python<'py>,
    a: f64,
    f: f64,
    lons1: PyReadonlyArray1<'py, f64>,
    lats1: PyReadonlyArray1<'py, f64>,
    lons2: PyReadonlyArray1<'py, f64>,
    lats2: PyReadonlyArray1<'py, f64>,
    radians: bool,
) -> PyResult<Arrays3<'py>> {
    let geod = make_geod(a, f)?;
    let lons1 = lons1.as_array().to_owned();
    let lats1 = lats1.as_array().to_owned();
    let lons2 = lons2.as_array().to_owned();
    let lats2 = lats2.as_array().to_owned();

    let (az12, az21, dist) = py
        .allow_threads(move || {
            geod.inv(
                &lons1.view(),
                &lats1.view(),
                &lons2.view(),
                &lats2.view(),
                radians,
            )
        })
        .map_err(|e| PyValueError::new_err(e.to_string()))?;

    Ok((
        PyArray1::from_owned_array(py, az12),
        PyArray1::from_owned_array(py, az21),
        PyArray1::from_owned_array(py, dist),
    ))
}

/// Equally spaced points between two points, endpoints excluded.
///
/// Returns:
///     List of (lon, lat) tuples.
#[pyfunction]
#[pyo3(signature = (a, f, lon1, lat1, lon2, lat2, npts, radians=false))]
#[allow(clippy::too_many_arguments)]
pub fn geod_npts(
    py: Python<'_>,
    a: f64,
    f: f64,
    lon1: f64,
    lat1: f64,
    lon2: f64,
    lat2: f64,
    npts: usize,
    radians: bool,
) -> PyResult<Vec<(f64, f64)>> {
    let geod = make_geod(a, f)?;
    Ok(py.allow_threads(move || geod.npts(lon1, lat1, lon2, lat2, npts, radians)))
}

/// Length of each segment of the path through the points (metres).
#[pyfunction]
#[pyo3(signature = (a, f, lons, lats, radians=false))]
pub fn geod_line_lengths<'py>(
    py: Python<'py>,
    a: f64,
    f: f64,
    lons: PyReadonlyArray1<'py, f64>,
    lats: PyReadonlyArray1<'py, f64>,
    radians: bool,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let geod = make_geod(a, f)?;
    let lons = lons.as_array().to_owned();
    let lats = lats.as_array().to_owned();

    let lengths = py
        .allow_threads(move || geod.line_lengths(&lons.view(), &lats.view(), radians))
        .map_err(|e| PyValueError::new_err(e.to_string()))?;

    Ok(PyArray1::from_owned_array(py, lengths))
}

/// Total length of the path through the points (metres).
#[pyfunction]
#[pyo3(signature = (a, f, lons, lats, radians=false))]
pub fn geod_line_length<'py>(
    py: Python<'py>,
    a: f64,
    f: f64,
    lons: PyReadonlyArray1<'py, f64>,
    lats: PyReadonlyArray1<'py, f64>,
    radians: bool,
) -> PyResult<f64> {
    let geod = make_geod(a, f)?;
    let lons = lons.as_array().to_owned();
    let lats = lats.as_array().to_owned();

    py.allow_threads(move || geod.line_length(&lons.view(), &lats.view(), radians))
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Signed area (m^2) and perimeter (m) of the polygon through the points.
///
/// Counter-clockwise polygons have positive area.
#[pyfunction]
#[pyo3(signature = (a, f, lons, lats, radians=false))]
pub fn geod_polygon_area_perimeter<'py>(
    py: Python<'py>,
    a: f64,
    f: f64,
    lons: PyReadonlyArray1<'py, f64>,
    lats: PyReadonlyArray1<'py, f64>,
    radians: bool,
) -> PyResult<(f64, f64)> {
    let geod = make_geod(a, f)?;
    let lons = lons.as_array().to_owned();
    let lats = lats.as_array().to_owned();

    py.allow_threads(move || geod.polygon_area_perimeter(&lons.view(), &lats.view(), radians))
        .map_err(|e| PyValueError::new_err(e.to_string()))
}
