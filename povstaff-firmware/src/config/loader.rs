//! Configuration loading
//!
//! Reads `staff.toml` from the image bank. Falls back to the embedded
//! defaults if the bank has none or it does not parse.

use core::str;
use defmt::*;

use embedded_io::Read;
use embedded_storage::nor_flash::ReadNorFlash;
use povstaff_core::config::{parse_config, ConfigError, StaffConfig};
use povstaff_drivers::BankFileSystem;
use povstaff_hal::{FileSystem, FsError};

/// Name of the configuration file in the bank
pub const CONFIG_FILE: &str = "staff.toml";

/// Maximum TOML config size
const MAX_TOML_SIZE: usize = 2048;

/// Embedded default configuration (compiled into firmware)
/// Edit staff.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../../staff.toml");

/// Configuration loading errors
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoadError {
    /// Bank not mounted or file missing
    Storage(FsError),
    /// File larger than the read buffer
    TooLarge,
    /// Invalid UTF-8 in TOML data
    InvalidUtf8,
    /// TOML parsing failed
    Parse(ConfigError),
}

impl From<FsError> for LoadError {
    fn from(e: FsError) -> Self {
        LoadError::Storage(e)
    }
}

impl From<ConfigError> for LoadError {
    fn from(e: ConfigError) -> Self {
        LoadError::Parse(e)
    }
}

/// Load configuration, preferring the bank over the embedded defaults
pub fn load_config<F: ReadNorFlash>(fs: &mut BankFileSystem<F>) -> StaffConfig {
    match load_from_bank(fs) {
        Ok(config) => {
            info!("Loaded configuration from bank {}", CONFIG_FILE);
            log_config_summary(&config);
            config
        }
        Err(LoadError::Storage(FsError::NotFound)) => {
            info!("No {} in bank, using embedded defaults", CONFIG_FILE);
            embedded_config()
        }
        Err(e) => {
            warn!("Bank configuration unusable: {:?}, using embedded defaults", e);
            embedded_config()
        }
    }
}

fn load_from_bank<F: ReadNorFlash>(fs: &mut BankFileSystem<F>) -> Result<StaffConfig, LoadError> {
    fs.mount()?;
    let mut file = fs.open(CONFIG_FILE)?;

    let mut buffer = [0u8; MAX_TOML_SIZE];
    let mut len = 0;
    loop {
        if len == buffer.len() {
            let mut probe = [0u8; 1];
            if file.read(&mut probe)? > 0 {
                return Err(LoadError::TooLarge);
            }
            break;
        }
        let n = file.read(&mut buffer[len..])?;
        if n == 0 {
            break;
        }
        len += n;
    }
    debug!("Read {} bytes of TOML from bank", len);

    let toml = str::from_utf8(&buffer[..len]).map_err(|_| LoadError::InvalidUtf8)?;
    Ok(parse_config(toml)?)
}

/// Parse the staff.toml embedded at compile time
///
/// build.rs validates it, so a failure here means the parser and the
/// validator disagree; the built-in defaults are used then.
fn embedded_config() -> StaffConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            log_config_summary(&config);
            config
        }
        Err(e) => {
            error!("Failed to parse embedded config: {:?}", e);
            StaffConfig::default()
        }
    }
}

/// Log a summary of the loaded configuration
fn log_config_summary(config: &StaffConfig) {
    info!("  mode: {}", config.mode.name());
    debug!("  brightness: {}", config.brightness);
    debug!("  manifest: {}", config.manifest.as_str());
    debug!("  default duration: {} ms", config.default_duration_ms);
    debug!("  line period: {} us", config.line_period_us);
    debug!("  auto advance: {}", config.auto_advance);
    debug!("  color correction: {}", config.color_correction);
}
