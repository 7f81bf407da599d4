//! # Skymast: environment and service wiring
//!
//! This module defines the [`Skymast`](crate::skymast::Skymast) struct, the central façade that wires together:
//!
//! 1. **Environment state** ([`SkymastEnv`](crate::env_state::SkymastEnv)) — the shared HTTP agent.
//! 2. **Ephemeris access** — [`HorizonsClient`](crate::ephemeris::horizons::HorizonsClient)
//!    over the JPL Horizons file API.
//! 3. **Archive access** — [`TapArchive`](crate::archive::tap::TapArchive) over the MAST TAP
//!    service.
//!
//! The façade only owns the environment; the service clients borrow it and are
//! created on demand, so a single `Skymast` can serve any number of searches
//! over one HTTP session.
//!
//! ## Typical usage
//!
//! ```rust, no_run
//! use skymast::skymast::Skymast;
//! use skymast::search::SearchRequest;
//!
//! let skymast = Skymast::new();
//!
//! let request = SearchRequest::builder()
//!     .target("2021 AB1")
//!     .start("2021-01-01")
//!     .stop("2021-01-15")
//!     .mission("TESS")
//!     .build()
//!     .unwrap();
//!
//! let outcome = skymast.search(&request).unwrap();
//! for record in &outcome.records {
//!     println!("{} observed the target on {}", record.obs_id, record.obs_mid_date);
//! }
//! ```
//!
//! ## See also
//! ------------
//! * [`run_search`](crate::search::run_search) – The same pipeline against caller-provided services.
//! * [`SearchRequest`](crate::search::SearchRequest) – Validated search parameters.
//! * [`SkymastEnv`](crate::env_state::SkymastEnv) – Shared HTTP agent.

use crate::archive::tap::TapArchive;
use crate::env_state::SkymastEnv;
use crate::ephemeris::horizons::HorizonsClient;
use crate::search::{run_search, SearchOutcome, SearchRequest};
use crate::skymast_errors::SkymastError;

#[derive(Debug, Clone, Default)]
pub struct Skymast {
    pub env_state: SkymastEnv,
}

impl Skymast {
    /// Construct a new [`Skymast`] context with a fresh HTTP session.
    pub fn new() -> Self {
        Skymast {
            env_state: SkymastEnv::new(),
        }
    }

    /// Horizons ephemeris client bound to this context.
    pub fn horizons(&self) -> HorizonsClient<'_> {
        HorizonsClient::new(&self.env_state)
    }

    /// MAST TAP archive client bound to this context.
    pub fn archive(&self) -> TapArchive<'_> {
        TapArchive::new(&self.env_state)
    }

    /// Run a full moving-target search against the production services.
    ///
    /// Arguments
    /// -----------------
    /// * `request`: Validated search parameters from [`SearchRequest::builder`].
    ///
    /// Return
    /// ----------
    /// * The search region, sampled trajectory and matching observations, or
    ///   the first [`SkymastError`] met along the pipeline.
    pub fn search(&self, request: &SearchRequest) -> Result<SearchOutcome, SkymastError> {
        run_search(request, &self.horizons(), &self.archive())
    }
}
