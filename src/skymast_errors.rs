use thiserror::Error;

/// Crate-wide error type.
///
/// Variants are grouped by how callers are expected to react:
///
/// * Region parse errors (`UnsupportedRegionShape`, `MalformedRegion`) are recoverable and
///   are mapped to safe defaults inside batch loops rather than aborting them.
/// * Geometry errors (`DegenerateRing`, `DegeneratePath`) signal input that cannot produce
///   a usable ring; callers either propagate them (builder) or degrade with a warning
///   (winding test, matcher).
/// * External service errors (`UreqHttpError`, `HorizonsPayload`, `ArchivePayload`,
///   `CsvError`) propagate to the caller, which owns retry and messaging policy.
/// * Input validation errors (`InvalidSearchRequest`, `InvalidTimeRange`, `InvalidDate`)
///   are raised before any network call.
#[derive(Error, Debug)]
pub enum SkymastError {
    #[error("Unsupported region shape: {0}")]
    UnsupportedRegionShape(String),

    #[error("Malformed region string: {0}")]
    MalformedRegion(String),

    #[error("Degenerate ring: {0}")]
    DegenerateRing(String),

    #[error("Degenerate path: {0}")]
    DegeneratePath(String),

    #[error("HTTP ureq error: {0}")]
    UreqHttpError(#[from] ureq::Error),

    #[error("Unexpected JPL Horizons payload: {0}")]
    HorizonsPayload(String),

    #[error("Unexpected archive payload: {0}")]
    ArchivePayload(String),

    #[error("CSV decoding error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Invalid search request: {0}")]
    InvalidSearchRequest(String),

    #[error("Invalid time range: {0}")]
    InvalidTimeRange(String),

    #[error("Invalid date: {0}")]
    InvalidDate(#[from] hifitime::HifitimeError),
}

impl PartialEq for SkymastError {
    fn eq(&self, other: &Self) -> bool {
        use SkymastError::*;
        match (self, other) {
            (UnsupportedRegionShape(a), UnsupportedRegionShape(b)) => a == b,
            (MalformedRegion(a), MalformedRegion(b)) => a == b,
            (DegenerateRing(a), DegenerateRing(b)) => a == b,
            (DegeneratePath(a), DegeneratePath(b)) => a == b,
            (HorizonsPayload(a), HorizonsPayload(b)) => a == b,
            (ArchivePayload(a), ArchivePayload(b)) => a == b,
            (InvalidSearchRequest(a), InvalidSearchRequest(b)) => a == b,
            (InvalidTimeRange(a), InvalidTimeRange(b)) => a == b,
            (InvalidDate(a), InvalidDate(b)) => a == b,

            // Not comparable beyond the variant itself
            (UreqHttpError(_), UreqHttpError(_)) => true,
            (CsvError(_), CsvError(_)) => true,

            _ => false,
        }
    }
}
