/// Configuration default values
///
/// This module contains all the default values for configuration options,
/// making them easily changeable in one central location.
// Web server defaults
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

// Job defaults
pub const DEFAULT_MAX_HISTORY: usize = 10;

// Config file
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";
