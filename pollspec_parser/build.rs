// build.rs - TOML-driven compile-time limit generation
use std::env;
use std::fs;
use std::path::Path;

#[derive(serde::Deserialize)]
struct CompileTimeConfig {
    syntax: SyntaxLimits,
    macros: MacroLimits,
    address: AddressLimits,
    interval: IntervalLimits,
    logging: LoggingLimits,
}

#[derive(serde::Deserialize)]
struct SyntaxLimits {
    max_error_chunk_chars: usize,
    max_formula_depth: usize,
}

#[derive(serde::Deserialize)]
struct MacroLimits {
    max_macro_name_length: usize,
    max_function_params: usize,
}

#[derive(serde::Deserialize)]
struct AddressLimits {
    max_dns_length: usize,
    max_dns_label_length: usize,
}

#[derive(serde::Deserialize)]
struct IntervalLimits {
    max_delay_seconds: u64,
    max_custom_intervals: usize,
}

#[derive(serde::Deserialize)]
struct LoggingLimits {
    log_buffer_size: usize,
    max_log_message_length: usize,
    security_min_log_level: u8,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=POLLSPEC_BUILD_PROFILE");
    println!("cargo:rerun-if-env-changed=POLLSPEC_CONFIG_DIR");

    let profile =
        env::var("POLLSPEC_BUILD_PROFILE").unwrap_or_else(|_| "development".to_string());
    let config_dir = env::var("POLLSPEC_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    // Find workspace root (parent of pollspec_parser directory)
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = Path::new(&manifest_dir)
        .parent()
        .expect("Could not find workspace root (parent directory)");

    let config_path = workspace_root
        .join(&config_dir)
        .join(format!("{}.toml", profile));

    println!("cargo:rerun-if-changed={}", config_path.display());

    if !config_path.exists() {
        panic!(
            "Configuration file not found: {}\nWorkspace root: {}\nLooking for: {}/{}/{}.toml",
            config_path.display(),
            workspace_root.display(),
            workspace_root.display(),
            config_dir,
            profile
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", config_path.display(), e));

    let config: CompileTimeConfig = toml::from_str(&config_content)
        .unwrap_or_else(|e| panic!("Invalid TOML in {}: {}", config_path.display(), e));

    validate_limits(&config, &profile);
    generate_constants(&config, &profile);
}

fn validate_limits(config: &CompileTimeConfig, profile: &str) {
    const ABSOLUTE_MAX_FORMULA_DEPTH: usize = 4096;
    const ABSOLUTE_MAX_DNS_LENGTH: usize = 255;

    if config.syntax.max_error_chunk_chars == 0 {
        panic!("LIMITS: max_error_chunk_chars must be positive");
    }

    if config.syntax.max_formula_depth == 0
        || config.syntax.max_formula_depth > ABSOLUTE_MAX_FORMULA_DEPTH
    {
        panic!("LIMITS: max_formula_depth must be within 1..={ABSOLUTE_MAX_FORMULA_DEPTH}");
    }

    if config.address.max_dns_length > ABSOLUTE_MAX_DNS_LENGTH {
        panic!("LIMITS: max_dns_length exceeds the DNS maximum of 255");
    }

    if config.address.max_dns_label_length > config.address.max_dns_length {
        panic!("LIMITS: max_dns_label_length exceeds max_dns_length");
    }

    if config.interval.max_delay_seconds > i32::MAX as u64 {
        panic!("LIMITS: max_delay_seconds must fit into a signed 32-bit integer");
    }

    if config.logging.security_min_log_level > 2 {
        panic!("LIMITS: security_min_log_level too high (max: 2)");
    }

    if profile == "production" && config.syntax.max_formula_depth > 256 {
        panic!("PRODUCTION: max_formula_depth too high for production");
    }
}

fn generate_constants(config: &CompileTimeConfig, profile: &str) {
    let out_dir = env::var("OUT_DIR").unwrap();
    let output_path = Path::new(&out_dir).join("constants.rs");

    let constants_code = format!(
        r#"
// Generated compile-time constants from TOML configuration
// Profile: {}
// DO NOT EDIT - Generated by build.rs

pub mod compile_time {{
    pub mod syntax {{
        pub const MAX_ERROR_CHUNK_CHARS: usize = {};
        pub const MAX_FORMULA_DEPTH: usize = {};
    }}

    pub mod macros {{
        pub const MAX_MACRO_NAME_LENGTH: usize = {};
        pub const MAX_FUNCTION_PARAMS: usize = {};
    }}

    pub mod address {{
        pub const MAX_DNS_LENGTH: usize = {};
        pub const MAX_DNS_LABEL_LENGTH: usize = {};
    }}

    pub mod interval {{
        pub const MAX_DELAY_SECONDS: u64 = {};
        pub const MAX_CUSTOM_INTERVALS: usize = {};
    }}

    pub mod logging {{
        pub const LOG_BUFFER_SIZE: usize = {};
        pub const MAX_LOG_MESSAGE_LENGTH: usize = {};
        pub const SECURITY_MIN_LOG_LEVEL: u8 = {};
    }}
}}
"#,
        profile,
        // Syntax
        config.syntax.max_error_chunk_chars,
        config.syntax.max_formula_depth,
        // Macros
        config.macros.max_macro_name_length,
        config.macros.max_function_params,
        // Address
        config.address.max_dns_length,
        config.address.max_dns_label_length,
        // Interval
        config.interval.max_delay_seconds,
        config.interval.max_custom_intervals,
        // Logging
        config.logging.log_buffer_size,
        config.logging.max_log_message_length,
        config.logging.security_min_log_level,
    );

    fs::write(output_path, constants_code).unwrap();
}
