//! Store configuration

/// Word store options
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Version stamped into exported backups
    pub data_version: String,

    /// Maximum number of cached translations
    pub cache_capacity: usize,

    /// Highlight color before the user picks one
    pub default_color: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_version: "1.11.0".to_string(),
            cache_capacity: 2000,
            default_color: "#ffeb3b".to_string(),
        }
    }
}
