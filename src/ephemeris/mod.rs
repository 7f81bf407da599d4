//! Target ephemerides.
//!
//! This module defines the data carried between the ephemeris service and the
//! rest of the pipeline:
//!
//! * [`EphemerisSample`] – one `(epoch, RA, DEC)` row of a computed ephemeris,
//! * [`TargetSpec`] – which body to compute, and from where,
//! * [`TimeSpec`] – either an explicit list of epochs or a start/stop/step range,
//! * [`EphemerisSource`] – the seam behind which the actual service lives.
//!
//! The default implementation is [`horizons::HorizonsClient`], which queries
//! the JPL Horizons file API. Tests substitute fixed-table sources through the
//! [`EphemerisSource`] trait.

pub mod horizons;

use std::str::FromStr;

use crate::constants::{Degree, JulianDate};
use crate::skymast_errors::SkymastError;

/// A single computed position of the target.
///
/// Angles are ICRF right ascension and declination in degrees, the epoch is a
/// UTC Julian Date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EphemerisSample {
    pub epoch_jd: JulianDate,
    pub ra: Degree,
    pub dec: Degree,
}

/// How a target identifier string is to be interpreted by the ephemeris
/// service.
///
/// Horizons resolves the same string very differently depending on the lookup
/// namespace: `"134340"` is Pluto as a small body but a spacecraft-style major
/// body code otherwise. The variants mirror the lookup modes of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdType {
    /// Asteroid or comet lookup by number or packed designation.
    #[default]
    SmallBody,
    /// Planet, natural satellite or spacecraft code, passed through verbatim.
    MajorBody,
    /// Small-body designation lookup (`DES=`).
    Designation,
    /// Small-body name or designation lookup (`NAME=`).
    Name,
    /// Asteroid name lookup (`ASTNAM=`).
    AsteroidName,
    /// Comet name lookup (`COMNAM=`).
    CometName,
}

impl IdType {
    /// Wrap an identifier into the COMMAND string expected by Horizons.
    ///
    /// Small-body lookups carry a trailing `;`, named lookups get their
    /// namespace prefix, major bodies pass through unchanged.
    pub(crate) fn command(&self, id: &str) -> String {
        match self {
            IdType::SmallBody => format!("{id};"),
            IdType::MajorBody => id.to_owned(),
            IdType::Designation => format!("DES={id};"),
            IdType::Name => format!("NAME={id};"),
            IdType::AsteroidName => format!("ASTNAM={id};"),
            IdType::CometName => format!("COMNAM={id};"),
        }
    }
}

impl FromStr for IdType {
    type Err = SkymastError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "smallbody" => Ok(IdType::SmallBody),
            "majorbody" => Ok(IdType::MajorBody),
            "designation" => Ok(IdType::Designation),
            "name" => Ok(IdType::Name),
            "asteroid_name" => Ok(IdType::AsteroidName),
            "comet_name" => Ok(IdType::CometName),
            other => Err(SkymastError::InvalidSearchRequest(format!(
                "unknown identifier type: {other:?}"
            ))),
        }
    }
}

/// The body whose positions are requested, plus the observing site.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetSpec {
    /// Identifier string, interpreted according to [`IdType`].
    pub id: String,
    pub id_type: IdType,
    /// Observer location code (e.g. `"@TESS"`). `None` selects the geocenter.
    pub location: Option<String>,
}

impl TargetSpec {
    /// Geocentric small-body target.
    pub fn new(id: impl Into<String>) -> Self {
        TargetSpec {
            id: id.into(),
            id_type: IdType::default(),
            location: None,
        }
    }
}

/// Epochs at which the ephemeris is evaluated.
#[derive(Debug, Clone, PartialEq)]
pub enum TimeSpec {
    /// Explicit UTC Julian Dates, evaluated one row per epoch.
    Epochs(Vec<JulianDate>),
    /// Uniform grid from `start` to `stop` (calendar dates `YYYY-MM-DD`) with
    /// a service-side step such as `"1d"` or `"2h"`.
    Range {
        start: String,
        stop: String,
        step: String,
    },
}

/// Source of computed target positions.
///
/// Implementations must return exactly one sample per requested epoch when
/// given [`TimeSpec::Epochs`], in the same order.
pub trait EphemerisSource {
    fn fetch(
        &self,
        target: &TargetSpec,
        times: &TimeSpec,
    ) -> Result<Vec<EphemerisSample>, SkymastError>;
}
