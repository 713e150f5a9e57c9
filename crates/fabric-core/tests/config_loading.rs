//! Configuration layering and its effect on resolution.
//!
//! Tests cover:
//! - File values override defaults; environment values override the file
//! - Out-of-range values from any layer are rejected
//! - Strict resolution loaded from configuration rejects undeclared attributes

#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use std::io::Write;

use fabric_core::{
    config::{ENV_MAX_DEPTH, ENV_REJECT_UNKNOWN_ATTRIBUTES},
    service::ServiceInfo,
    variant::resolve_value_with,
    Config, Error, ResolutionError, Result,
};
use serde_json::json;
use serial_test::serial;
use tempfile::NamedTempFile;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn config_file(content: &str) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new().map_err(|e| Error::config(e.to_string()))?;
    file.write_all(content.as_bytes())
        .map_err(|e| Error::config(e.to_string()))?;
    Ok(file)
}

fn clear_env() {
    std::env::remove_var(ENV_MAX_DEPTH);
    std::env::remove_var(ENV_REJECT_UNKNOWN_ATTRIBUTES);
}

#[test]
#[serial]
fn test_file_overrides_defaults() -> Result<()> {
    init_tracing();
    clear_env();
    let file = config_file("[resolver]\nmax_depth = 16\n")?;

    let config = Config::load(Some(file.path()))?;
    assert_eq!(config.resolver.max_depth, 16);
    assert!(!config.resolver.reject_unknown_attributes);
    Ok(())
}

#[test]
#[serial]
fn test_env_overrides_file() -> Result<()> {
    init_tracing();
    clear_env();
    let file = config_file("[resolver]\nmax_depth = 16\nreject_unknown_attributes = false\n")?;

    std::env::set_var(ENV_MAX_DEPTH, "4");
    std::env::set_var(ENV_REJECT_UNKNOWN_ATTRIBUTES, "true");
    let loaded = Config::load(Some(file.path()));
    clear_env();

    let config = loaded?;
    assert_eq!(config.resolver.max_depth, 4);
    assert!(config.resolver.reject_unknown_attributes);
    Ok(())
}

#[test]
#[serial]
fn test_out_of_range_env_value_rejected() {
    init_tracing();
    clear_env();
    std::env::set_var(ENV_MAX_DEPTH, "4096");
    let loaded = Config::load(None);
    clear_env();

    assert!(matches!(loaded, Err(Error::Validation(ref err)) if err.is_out_of_range()), "{loaded:?}");
}

#[test]
#[serial]
fn test_out_of_range_file_value_rejected() -> Result<()> {
    clear_env();
    let file = config_file("[resolver]\nmax_depth = 0\n")?;

    let loaded = Config::load(Some(file.path()));
    assert!(matches!(loaded, Err(Error::Validation(_))), "{loaded:?}");
    Ok(())
}

#[test]
#[serial]
fn test_loaded_strict_mode_rejects_undeclared_attributes() -> Result<()> {
    init_tracing();
    clear_env();
    let file = config_file("[resolver]\nreject_unknown_attributes = true\n")?;
    let config = Config::load(Some(file.path()))?;

    let payload = json!({
        "ServiceKind": "Stateless",
        "Name": "fabric:/web/front",
        "TypeName": "FrontType",
        "Colour": "blue",
    });
    let result = resolve_value_with::<ServiceInfo>(&payload, &config.resolver);
    assert_eq!(
        result,
        Err(ResolutionError::UnexpectedField {
            field: "Colour".to_string()
        })
    );

    // The lenient default ignores the same attribute
    let lenient = resolve_value_with::<ServiceInfo>(&payload, &Config::default().resolver);
    assert!(lenient.is_ok(), "{lenient:?}");
    Ok(())
}
