//! MAST TAP archive backend.
//!
//! Queries the CAOM pointing table through the synchronous TAP endpoint: the
//! ADQL text is form-POSTed to `{service}/sync` and the result set is read
//! back as CSV. The spatial constraint reuses the region string of the search
//! polygon, rewritten into an ADQL `POLYGON('ICRS', ...)` constructor.

use itertools::Itertools;
use tracing::{debug, warn};

use super::{ArchiveQuery, ObservationArchive, ObservationRecord};
use crate::constants::MAST_TAP_SERVICE_URL;
use crate::env_state::SkymastEnv;
use crate::skymast_errors::SkymastError;

/// Rewrite a `POLYGON lon lat ...` region string into the ADQL constructor
/// form, `POLYGON('ICRS', lon, lat, ...)`.
pub fn region_to_adql(region: &str) -> String {
    let coords = region
        .split_whitespace()
        .filter(|token| !token.eq_ignore_ascii_case("POLYGON"))
        .join(", ");
    format!("POLYGON('ICRS', {coords})")
}

/// Assemble the ADQL text for one archive query.
///
/// The spatial clause asks for all pointings whose reference position falls
/// inside the search polygon. The time window applies only when both bounds
/// are present; the collection filter only when at least one mission is
/// given.
pub fn build_adql(query: &ArchiveQuery) -> String {
    let mut adql = format!(
        "SELECT TOP {} * FROM dbo.ObsPointing WHERE 1=CONTAINS(POINT('ICRS', s_ra, s_dec), {}) ",
        query.max_records,
        region_to_adql(&query.region)
    );
    match (query.t_min, query.t_max) {
        (Some(t_min), Some(t_max)) => {
            adql.push_str(&format!("AND t_min >= {t_min} and t_max <= {t_max} "));
        }
        (None, None) => {}
        _ => warn!("archive time window needs both bounds, ignoring the partial one"),
    }
    if !query.missions.is_empty() {
        let missions = query.missions.iter().map(|m| format!("'{m}'")).join(",");
        adql.push_str(&format!("AND obs_collection in ({missions}) "));
    }
    adql
}

/// Pointed-observation search against the MAST TAP service.
#[derive(Debug, Clone)]
pub struct TapArchive<'e> {
    env_state: &'e SkymastEnv,
    service_url: String,
}

impl<'e> TapArchive<'e> {
    pub fn new(env_state: &'e SkymastEnv) -> Self {
        TapArchive {
            env_state,
            service_url: MAST_TAP_SERVICE_URL.to_owned(),
        }
    }

    /// Replace the TAP service base URL.
    pub fn with_service_url(mut self, service_url: impl Into<String>) -> Self {
        self.service_url = service_url.into();
        self
    }
}

impl ObservationArchive for TapArchive<'_> {
    fn query(&self, query: &ArchiveQuery) -> Result<Vec<ObservationRecord>, SkymastError> {
        let adql = build_adql(query);
        debug!("TAP query: {adql}");
        let sync_url = format!("{}/sync", self.service_url);
        let maxrec = query.max_records.to_string();
        let response = self.env_state.post_form(
            sync_url.as_str(),
            &[
                ("REQUEST", "doQuery"),
                ("LANG", "ADQL"),
                ("RESPONSEFORMAT", "csv"),
                ("MAXREC", &maxrec),
                ("QUERY", &adql),
            ],
        )?;
        deserialize_observations(&response)
    }
}

/// Positions of the typed columns inside one CSV result set.
struct ColumnMap {
    obs_id: usize,
    s_ra: usize,
    s_dec: usize,
    t_min: usize,
    t_max: usize,
    s_region: usize,
    obs_collection: Option<usize>,
    target_name: Option<usize>,
    instrument_name: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, SkymastError> {
        let find = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
        let require = |name: &str| {
            find(name).ok_or_else(|| {
                SkymastError::ArchivePayload(format!(
                    "archive response has no {name} column"
                ))
            })
        };
        Ok(ColumnMap {
            obs_id: require("obs_id")?,
            s_ra: require("s_ra")?,
            s_dec: require("s_dec")?,
            t_min: require("t_min")?,
            t_max: require("t_max")?,
            s_region: require("s_region")?,
            obs_collection: find("obs_collection"),
            target_name: find("target_name"),
            instrument_name: find("instrument_name"),
        })
    }

    fn is_typed(&self, index: usize) -> bool {
        index == self.obs_id
            || index == self.s_ra
            || index == self.s_dec
            || index == self.t_min
            || index == self.t_max
            || index == self.s_region
            || Some(index) == self.obs_collection
            || Some(index) == self.target_name
            || Some(index) == self.instrument_name
    }
}

/// Decode a CSV result set into observation records.
///
/// A row whose required columns cannot be decoded is dropped with a warning
/// rather than failing the whole result set. Columns outside the typed set
/// are kept verbatim in the record's `extra` map.
pub(crate) fn deserialize_observations(
    payload: &str,
) -> Result<Vec<ObservationRecord>, SkymastError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(payload.as_bytes());
    let headers = csv_reader.headers()?.clone();
    let columns = ColumnMap::from_headers(&headers)?;

    let mut records = Vec::new();
    for row in csv_reader.records() {
        let row = row?;
        match record_from_row(&row, &columns, &headers) {
            Ok(record) => records.push(record),
            Err(error) => warn!("skipping malformed archive row: {error}"),
        }
    }
    Ok(records)
}

fn record_from_row(
    row: &csv::StringRecord,
    columns: &ColumnMap,
    headers: &csv::StringRecord,
) -> Result<ObservationRecord, SkymastError> {
    let text = |index: usize| row.get(index).unwrap_or_default().to_owned();
    let numeric = |index: usize, name: &str| {
        let raw = row.get(index).unwrap_or_default();
        raw.parse::<f64>().map_err(|_| {
            SkymastError::ArchivePayload(format!("{name} is not numeric: {raw:?}"))
        })
    };

    let mut record = ObservationRecord::new(
        text(columns.obs_id),
        numeric(columns.s_ra, "s_ra")?,
        numeric(columns.s_dec, "s_dec")?,
        numeric(columns.t_min, "t_min")?,
        numeric(columns.t_max, "t_max")?,
        text(columns.s_region),
    );
    if let Some(index) = columns.obs_collection {
        record.obs_collection = text(index);
    }
    if let Some(index) = columns.target_name {
        record.target_name = text(index);
    }
    if let Some(index) = columns.instrument_name {
        record.instrument_name = text(index);
    }
    for (index, value) in row.iter().enumerate() {
        if columns.is_typed(index) {
            continue;
        }
        if let Some(name) = headers.get(index) {
            record.extra.insert(name.to_owned(), value.to_owned());
        }
    }
    Ok(record)
}
