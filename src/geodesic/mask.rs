//! Capability and output flags for geodesic calculations.

use std::ops::{BitAnd, BitOr, BitOrAssign};

/// A set of requested outputs, or of capabilities a [`GeodesicLine`] carries.
///
/// Each output flag also carries the series capabilities it needs, so a
/// line built with `Mask::DISTANCE` knows to precompute the C1 series.
///
/// [`GeodesicLine`]: super::GeodesicLine
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Mask(u32);

impl Mask {
    pub(crate) const CAP_NONE: Mask = Mask(0);
    pub(crate) const CAP_C1: Mask = Mask(1 << 0);
    pub(crate) const CAP_C1P: Mask = Mask(1 << 1);
    pub(crate) const CAP_C2: Mask = Mask(1 << 2);
    pub(crate) const CAP_C3: Mask = Mask(1 << 3);
    pub(crate) const CAP_C4: Mask = Mask(1 << 4);
    pub(crate) const CAP_ALL: Mask = Mask(0x1F);
    pub(crate) const OUT_ALL: Mask = Mask(0x7F80);

    pub const NONE: Mask = Mask(0);
    pub const LATITUDE: Mask = Mask(1 << 7 | Self::CAP_NONE.0);
    pub const LONGITUDE: Mask = Mask(1 << 8 | Self::CAP_C3.0);
    pub const AZIMUTH: Mask = Mask(1 << 9 | Self::CAP_NONE.0);
    pub const DISTANCE: Mask = Mask(1 << 10 | Self::CAP_C1.0);
    /// Allows a line to be queried by distance rather than arc length.
    pub const DISTANCE_IN: Mask = Mask(1 << 11 | Self::CAP_C1.0 | Self::CAP_C1P.0);
    pub const REDUCEDLENGTH: Mask = Mask(1 << 12 | Self::CAP_C1.0 | Self::CAP_C2.0);
    pub const GEODESICSCALE: Mask = Mask(1 << 13 | Self::CAP_C1.0 | Self::CAP_C2.0);
    pub const AREA: Mask = Mask(1 << 14 | Self::CAP_C4.0);
    pub const ALL: Mask = Mask(Self::OUT_ALL.0 | Self::CAP_ALL.0);

    /// Outputs of the inverse problem when none are given: distance and azimuths.
    pub const INVERSE_DEFAULT: Mask = Mask(Self::DISTANCE.0 | Self::AZIMUTH.0);
    /// Outputs of the direct problem when none are given: position and azimuth.
    pub const DIRECT_DEFAULT: Mask =
        Mask(Self::LATITUDE.0 | Self::LONGITUDE.0 | Self::AZIMUTH.0);

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn from_bits(bits: u32) -> Self {
        Mask(bits & Self::ALL.0)
    }

    /// True if any bit of `other` is set in `self`.
    pub const fn intersects(self, other: Mask) -> bool {
        self.0 & other.0 != 0
    }

    /// True if every bit of `other` is set in `self`.
    pub const fn contains(self, other: Mask) -> bool {
        self.0 & other.0 == other.0
    }

    /// The output bits only, capability bits stripped.
    pub(crate) const fn outputs(self) -> Mask {
        Mask(self.0 & Self::OUT_ALL.0)
    }
}

impl Default for Mask {
    fn default() -> Self {
        Self::INVERSE_DEFAULT
    }
}

impl BitOr for Mask {
    type Output = Mask;

    fn bitor(self, rhs: Mask) -> Mask {
        Mask(self.0 | rhs.0)
    }
}

impl BitOrAssign for Mask {
    fn bitor_assign(&mut self, rhs: Mask) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Mask {
    type Output = Mask;

    fn bitand(self, rhs: Mask) -> Mask {
        Mask(self.0 & rhs.0)
    }
}
