use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeodError {
    #[error("Invalid ellipsoid: {0}")]
    InvalidEllipsoid(String),

    #[error("Unknown ellipsoid: {0}")]
    UnknownEllipsoid(String),

    #[error("latitude {0} not in [-90, 90]")]
    InvalidLatitude(f64),

    #[error("longitude {0} not in [-180, 360]")]
    InvalidLongitude(f64),

    #[error("azimuth {0} not in [-180, 360]")]
    InvalidAzimuth(f64),

    #[error("distance {0} not a finite number")]
    InvalidDistance(f64),

    #[error("Invalid shape: {0}")]
    Shape(String),
}
