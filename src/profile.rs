use strum_macros::{Display, EnumIter, EnumString};

use crate::error::{Error, Result};

/// Source light profile
///
/// Each profile carries the number of coordinates its acceptance table is
/// queried with and the half light radius used for extended sources when
/// none is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Profile {
    /// Point source
    Point,
    /// Exponential disk
    Disk,
    /// De Vaucouleurs bulge
    Bulge,
}
impl Profile {
    /// Parses a profile name: `POINT`, `DISK` or `BULGE`
    pub fn from_name(name: &str) -> Result<Self> {
        name.parse()
            .map_err(|_| Error::UnknownProfile(name.to_string()))
    }
    /// Name of the array holding the mean acceptance table
    pub fn mean_tag(&self) -> &'static str {
        match self {
            Profile::Point => "POINT",
            Profile::Disk => "DISK",
            Profile::Bulge => "BULGE",
        }
    }
    /// Name of the array holding the acceptance RMS table
    pub fn rms_tag(&self) -> &'static str {
        match self {
            Profile::Point => "PRMS",
            Profile::Disk => "DRMS",
            Profile::Bulge => "BRMS",
        }
    }
    /// Number of query coordinates: (sigma,offset) or (hlradius,sigma,offset)
    pub fn arity(&self) -> usize {
        match self {
            Profile::Point => 2,
            Profile::Disk | Profile::Bulge => 3,
        }
    }
    /// Default half light radius in arcsec, `None` for point sources
    pub fn default_hlradius(&self) -> Option<f64> {
        match self {
            Profile::Point => None,
            Profile::Disk => Some(0.45),
            Profile::Bulge => Some(1.),
        }
    }
}

/// Acceptance statistic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Statistic {
    /// Mean fiber acceptance
    Mean,
    /// RMS of the fiber acceptance
    Rms,
}
