//! LensProfile Settings Crate
//!
//! Handles application configuration (sampling and JFL boilerplate) and
//! the lens parameter files exchanged with design editors.

pub mod config;
pub mod error;
pub mod persistence;

pub use config::{Config, FileFormat, APP_DIR, CONFIG_FILE};
pub use error::{ParameterError, SettingsError, SettingsResult};
pub use persistence::{
    load_lens, save_lens, LensParameters, ParameterFile, SegmentParameters, SurfaceParameters,
};
