pub mod archive;
pub mod constants;
pub mod env_state;
pub mod ephemeris;
pub mod footprint;
mod ref_frame;
pub mod search;
pub mod search_region;
pub mod skymast;
pub mod skymast_errors;
pub mod stcs;
pub mod time;
