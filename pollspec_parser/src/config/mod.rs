//! Configuration module for pollspec
//! Compile-time limits come from the TOML profile read by build.rs;
//! runtime preferences come from the environment or a TOML file.

// Include generated constants from build.rs
include!(concat!(env!("OUT_DIR"), "/constants.rs"));

pub mod runtime;

pub use runtime::{ConfigError, LoggingPreferences, ParserPreferences, RuntimeConfig};

/// Build information and configuration metadata
pub mod build_info {
    /// Returns the configuration profile used during build
    pub fn profile() -> &'static str {
        option_env!("POLLSPEC_BUILD_PROFILE").unwrap_or("development")
    }

    /// Returns the configuration directory used during build
    pub fn config_dir() -> &'static str {
        option_env!("POLLSPEC_CONFIG_DIR").unwrap_or("config")
    }

    /// Returns configuration source information
    pub fn source_info() -> String {
        format!("Generated from {}/{}.toml", config_dir(), profile())
    }
}

#[cfg(test)]
mod tests {
    use super::compile_time;

    #[test]
    fn test_generated_limits_are_sane() {
        assert!(compile_time::syntax::MAX_ERROR_CHUNK_CHARS > 0);
        assert!(compile_time::syntax::MAX_FORMULA_DEPTH > 0);
        assert!(
            compile_time::address::MAX_DNS_LABEL_LENGTH <= compile_time::address::MAX_DNS_LENGTH
        );
        assert!(compile_time::interval::MAX_DELAY_SECONDS <= i32::MAX as u64);
    }

    #[test]
    fn test_source_info_names_profile() {
        let info = super::build_info::source_info();
        assert!(info.contains(super::build_info::profile()));
        assert!(info.ends_with(".toml"));
    }
}
