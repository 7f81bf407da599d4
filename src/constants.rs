//! # Constants and type definitions for Skymast
//!
//! This module centralizes the **angular constants**, **time conversion factors**, and
//! **common type definitions** used throughout the `skymast` library, together with the
//! fixed thresholds of the footprint-search pipeline.
//!
//! ## Overview
//!
//! - Unit conversions (degrees ↔ radians, JD ↔ MJD)
//! - Core type aliases used across the crate
//! - Defaults for search-region construction and footprint matching
//! - Hard thresholds (pole reprojection latitude, mission validity dates)
//!
//! These definitions are used by all main modules, including the region codec, the
//! search-region builder, and the footprint matcher.

// -------------------------------------------------------------------------------------------------
// Angular constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Conversion factor between Julian Date and Modified Julian Date
pub const JDTOMJD: f64 = 2400000.5;

// -------------------------------------------------------------------------------------------------
// Search-pipeline defaults and thresholds
// -------------------------------------------------------------------------------------------------

/// Default half-width of the search ribbon and default match radius, in degrees (~30 arcsec).
pub const DEFAULT_SEARCH_RADIUS: Degree = 0.0083;

/// Number of vertices used when expanding a `CIRCLE` region into a polygon.
pub const CIRCLE_POLYGON_RESOLUTION: usize = 16;

/// Absolute mean latitude (degrees) above which winding tests reproject the ring
/// into the Galactic frame to avoid pole-induced sign errors.
pub const POLE_REPROJECTION_LATITUDE: Degree = 75.0;

/// TESS footprint metadata is unreliable before this epoch (JD 2456778.5 = 2014-05-01 UT);
/// observations at or before it are dropped when querying from the TESS spacecraft.
pub const TESS_FOOTPRINT_FLOOR_JD: JulianDate = 2456778.5;

/// Maximum accepted span of a search time range, in days.
pub const MAX_QUERY_RANGE_DAYS: f64 = 30.0;

/// Default maximum number of archive records returned by a query.
pub const DEFAULT_MAX_RECORDS: usize = 100;

/// JPL Horizons file-input API endpoint used for ephemeris generation.
pub const HORIZONS_API_URL: &str = "https://ssd.jpl.nasa.gov/api/horizons_file.api";

/// MAST CAOM TAP service used for archive footprint queries.
pub const MAST_TAP_SERVICE_URL: &str = "http://vao.stsci.edu/CAOMTAP/TapService.aspx";

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Julian Date (days)
pub type JulianDate = f64;
/// Modified Julian Date (days)
pub type MJD = f64;
