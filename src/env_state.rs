//! # Skymast environment state
//!
//! This module defines [`crate::env_state::SkymastEnv`], the **shared environment object** used
//! across the `skymast` library. It provides access to a persistent **HTTP client** used for
//! ephemeris generation (JPL Horizons) and archive queries (MAST TAP).
//!
//! This object is designed to be **cheaply cloneable** and passed to the collaborators that
//! talk to external services.
//!
//! ## Overview
//!
//! The main responsibilities of `SkymastEnv` are:
//!
//! 1. Manage a global [`ureq::Agent`] HTTP client with sensible default settings.
//! 2. Provide simple utilities for performing form-encoded POST requests.
//!
//! ## Structure
//!
//! ```text
//! SkymastEnv
//! └── http_client (ureq::Agent)
//! ```
//!
//! ## Notes
//!
//! - The [`crate::env_state::SkymastEnv`] struct is meant to be reused and shared between
//!   different parts of the crate to avoid redundant HTTP session creation.
//! - Both external services used here answer form-encoded POSTs; responses are read as text
//!   and decoded downstream.
//!
//! ## See also
//!
//! - [`ureq::Agent`] – Minimal HTTP client used internally.
use std::convert::TryFrom;
use std::time::Duration;
use ureq::{
    http::{self, Uri},
    Agent,
};

use crate::skymast_errors::SkymastError;

/// Shared state passed to the service clients of the library.
///
/// # Fields
///
/// * `http_client` - A ureq agent used to make HTTP requests
#[derive(Debug, Clone)]
pub struct SkymastEnv {
    pub http_client: Agent,
}

impl Default for SkymastEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl SkymastEnv {
    /// Create a new environment with an HTTP client using default settings.
    ///
    /// The global timeout is generous because Horizons ephemeris generation for long epoch
    /// lists can take several seconds server-side.
    pub fn new() -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(30)))
            .build();
        let agent: Agent = config.into();

        SkymastEnv { http_client: agent }
    }

    /// Send a form-encoded POST request and return the response body as text.
    ///
    /// Arguments
    /// -----------------
    /// * `url`: Target URL.
    /// * `form`: Key/value pairs sent as `application/x-www-form-urlencoded`.
    ///
    /// Return
    /// ----------
    /// * The response body, or a [`SkymastError::UreqHttpError`] on transport failure.
    pub(crate) fn post_form<U>(&self, url: U, form: &[(&str, &str)]) -> Result<String, SkymastError>
    where
        Uri: TryFrom<U>,
        <Uri as TryFrom<U>>::Error: Into<http::Error>,
    {
        let mut response = self.http_client.post(url).send_form(form.iter().copied())?;
        Ok(response.body_mut().read_to_string()?)
    }
}
