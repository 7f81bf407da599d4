//! JPL Horizons ephemeris backend.
//!
//! Talks to the Horizons *file* API: the whole request is a batch-style text
//! block POSTed as the `input` form field. The response is plain text with the
//! observer table between the `$$SOE` / `$$EOE` markers, one CSV row per
//! epoch.

use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::{EphemerisSample, EphemerisSource, TargetSpec, TimeSpec};
use crate::constants::HORIZONS_API_URL;
use crate::env_state::SkymastEnv;
use crate::skymast_errors::SkymastError;

/// Observer table block of a Horizons text response.
static OBSERVER_TABLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\$\$SOE\s*\n(.*?)\$\$EOE").unwrap());

/// One CSV row of the observer table.
///
/// With `QUANTITIES='1'`, `ANG_FORMAT='DEG'` and `CAL_FORMAT='JD'` the columns
/// are the epoch as a Julian Date, the solar and lunar presence markers, then
/// astrometric RA and DEC in degrees. Rows carry no header and a trailing
/// comma, so they are deserialized by position after stripping it.
#[derive(Debug, serde::Deserialize)]
struct ObserverRow {
    epoch_jd: f64,
    _solar_presence: String,
    _lunar_presence: String,
    ra: f64,
    dec: f64,
}

/// Ephemeris generation through the JPL Horizons file API.
///
/// The client borrows the shared environment for its HTTP agent. The endpoint
/// can be overridden for tests pointed at a local fixture server.
#[derive(Debug, Clone)]
pub struct HorizonsClient<'e> {
    env_state: &'e SkymastEnv,
    api_url: String,
}

impl<'e> HorizonsClient<'e> {
    pub fn new(env_state: &'e SkymastEnv) -> Self {
        HorizonsClient {
            env_state,
            api_url: HORIZONS_API_URL.to_owned(),
        }
    }

    /// Replace the service endpoint.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Assemble the batch-style input block for one ephemeris request.
    fn batch_input(target: &TargetSpec, times: &TimeSpec) -> String {
        let command = target.id_type.command(&target.id);
        let center = target.location.as_deref().unwrap_or("500@399");
        let epochs = match times {
            TimeSpec::Epochs(epochs) => {
                format!("TLIST_TYPE='JD'\nTLIST={}", epochs.iter().join(","))
            }
            TimeSpec::Range { start, stop, step } => format!(
                "START_TIME='{start}'\nSTOP_TIME='{stop}'\nSTEP_SIZE='{step}'"
            ),
        };
        format!(
            "
!$$SOF
COMMAND='{command}'
OBJ_DATA='NO'
MAKE_EPHEM='YES'
EPHEM_TYPE='OBSERVER'
CENTER='{center}'
QUANTITIES='1'
ANG_FORMAT='DEG'
CAL_FORMAT='JD'
CSV_FORMAT='YES'
{epochs}
"
        )
    }
}

impl EphemerisSource for HorizonsClient<'_> {
    fn fetch(
        &self,
        target: &TargetSpec,
        times: &TimeSpec,
    ) -> Result<Vec<EphemerisSample>, SkymastError> {
        let requested_params = Self::batch_input(target, times);
        debug!(object = %target.id, "requesting Horizons observer ephemeris");
        let response = self.env_state.post_form(
            self.api_url.as_str(),
            &[("format", "text"), ("input", &requested_params)],
        )?;
        deserialize_ephemeris(&response)
    }
}

/// Parse a Horizons text response into ephemeris samples.
///
/// Anything outside the `$$SOE` / `$$EOE` markers is ignored. A response
/// without the markers is a service-side rejection (unknown object, bad
/// epoch grid) and is surfaced with the first lines of the payload.
pub(crate) fn deserialize_ephemeris(
    jpl_response: &str,
) -> Result<Vec<EphemerisSample>, SkymastError> {
    let table = OBSERVER_TABLE
        .captures(jpl_response)
        .and_then(|captures| captures.get(1))
        .ok_or_else(|| {
            SkymastError::HorizonsPayload(format!(
                "no $$SOE/$$EOE ephemeris block, response starts with: {}",
                response_excerpt(jpl_response)
            ))
        })?;

    // Each row ends with a trailing comma that the CSV reader would take for
    // an empty extra column.
    let data = table
        .as_str()
        .lines()
        .map(|line| line.trim().trim_end_matches(','))
        .filter(|line| !line.is_empty())
        .join("\n");

    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(data.as_bytes());

    let mut samples = Vec::new();
    for record in csv_reader.deserialize::<ObserverRow>() {
        let row = record?;
        samples.push(EphemerisSample {
            epoch_jd: row.epoch_jd,
            ra: row.ra,
            dec: row.dec,
        });
    }
    Ok(samples)
}

fn response_excerpt(payload: &str) -> String {
    payload
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(3)
        .join(" | ")
}
