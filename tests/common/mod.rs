use std::cell::RefCell;

use skymast::archive::ObservationRecord;
use skymast::ephemeris::{EphemerisSample, EphemerisSource, TargetSpec, TimeSpec};
use skymast::skymast_errors::SkymastError;

/// Install the test log subscriber once per binary.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Table-driven ephemeris source.
///
/// Range requests return the stored path as-is; explicit epoch lists are
/// served by linear interpolation along the path, clamped at both ends. The
/// number of served requests is recorded so tests can assert how often the
/// pipeline actually called out.
pub struct FixedPathEphemeris {
    pub path: Vec<EphemerisSample>,
    pub calls: RefCell<usize>,
}

impl FixedPathEphemeris {
    pub fn new(path: Vec<EphemerisSample>) -> Self {
        FixedPathEphemeris {
            path,
            calls: RefCell::new(0),
        }
    }

    /// Straight-line path sampled once per day.
    pub fn linear(
        start_jd: f64,
        ra0: f64,
        dec0: f64,
        ra_rate: f64,
        dec_rate: f64,
        days: usize,
    ) -> Self {
        let path = (0..days)
            .map(|day| {
                let dt = day as f64;
                EphemerisSample {
                    epoch_jd: start_jd + dt,
                    ra: ra0 + ra_rate * dt,
                    dec: dec0 + dec_rate * dt,
                }
            })
            .collect();
        Self::new(path)
    }

    fn at(&self, epoch_jd: f64) -> EphemerisSample {
        let first = self.path.first().copied().unwrap();
        let last = self.path.last().copied().unwrap();
        if epoch_jd <= first.epoch_jd {
            return EphemerisSample { epoch_jd, ..first };
        }
        if epoch_jd >= last.epoch_jd {
            return EphemerisSample { epoch_jd, ..last };
        }
        for window in self.path.windows(2) {
            let (a, b) = (window[0], window[1]);
            if epoch_jd <= b.epoch_jd {
                let f = (epoch_jd - a.epoch_jd) / (b.epoch_jd - a.epoch_jd);
                return EphemerisSample {
                    epoch_jd,
                    ra: a.ra + f * (b.ra - a.ra),
                    dec: a.dec + f * (b.dec - a.dec),
                };
            }
        }
        EphemerisSample { epoch_jd, ..last }
    }
}

impl EphemerisSource for FixedPathEphemeris {
    fn fetch(
        &self,
        _target: &TargetSpec,
        times: &TimeSpec,
    ) -> Result<Vec<EphemerisSample>, SkymastError> {
        *self.calls.borrow_mut() += 1;
        Ok(match times {
            TimeSpec::Range { .. } => self.path.clone(),
            TimeSpec::Epochs(epochs) => epochs.iter().map(|&jd| self.at(jd)).collect(),
        })
    }
}

/// Axis-aligned 1x1 degree footprint centered on `(ra, dec)`.
pub fn box_footprint(ra: f64, dec: f64) -> String {
    format!(
        "POLYGON {} {} {} {} {} {} {} {}",
        ra - 0.5,
        dec - 0.5,
        ra + 0.5,
        dec - 0.5,
        ra + 0.5,
        dec + 0.5,
        ra - 0.5,
        dec + 0.5
    )
}

/// Record with a 1x1 degree box footprint centered on its reference position.
pub fn box_record(
    obs_id: &str,
    ra: f64,
    dec: f64,
    t_min_mjd: f64,
    t_max_mjd: f64,
) -> ObservationRecord {
    ObservationRecord::new(obs_id, ra, dec, t_min_mjd, t_max_mjd, box_footprint(ra, dec))
}
