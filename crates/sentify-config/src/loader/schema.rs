//! Schema validation helpers for Sentify JSON5 configuration.
//!
//! Layers are checked before merging so that errors point at the file that
//! introduced them; serde then decodes the merged value.

use crate::ConfigError;
use serde_json::{Map, Value};

/// Validate a single config layer against the schema.
pub(super) fn validate_layer_schema(value: &Value, layer: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, "")?;
    ensure_allowed_keys(
        map,
        &[
            "$schema",
            "store",
            "classifier",
            "ingestion",
            "analytics",
            "server",
        ],
        layer,
        "",
    )?;

    if let Some(value) = map.get("$schema") {
        expect_string(value, layer, "$schema")?;
    }
    if let Some(value) = map.get("store") {
        validate_store(value, layer, "store")?;
    }
    if let Some(value) = map.get("classifier") {
        validate_classifier(value, layer, "classifier")?;
    }
    if let Some(value) = map.get("ingestion") {
        validate_ingestion(value, layer, "ingestion")?;
    }
    if let Some(value) = map.get("analytics") {
        validate_analytics(value, layer, "analytics")?;
    }
    if let Some(value) = map.get("server") {
        validate_server(value, layer, "server")?;
    }
    Ok(())
}

fn validate_store(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(map, &["provider", "path", "busy_timeout_ms"], layer, path)?;
    if let Some(value) = map.get("provider") {
        let provider_path = join_path(path, "provider");
        match value.as_str() {
            Some("sqlite" | "memory") => {}
            Some(_) => {
                return Err(invalid_field(
                    layer,
                    &provider_path,
                    "expected \"sqlite\" or \"memory\"",
                ));
            }
            None => return Err(invalid_field(layer, &provider_path, "expected string")),
        }
    }
    if let Some(value) = map.get("path") {
        expect_string(value, layer, &join_path(path, "path"))?;
    }
    if let Some(value) = map.get("busy_timeout_ms") {
        expect_u64(value, layer, &join_path(path, "busy_timeout_ms"))?;
    }
    Ok(())
}

fn validate_classifier(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(map, &["extra_words"], layer, path)?;
    if let Some(value) = map.get("extra_words") {
        let words_path = join_path(path, "extra_words");
        let words = expect_object(value, layer, &words_path)?;
        for (word, polarity) in words {
            expect_f64(polarity, layer, &join_path(&words_path, word))?;
        }
    }
    Ok(())
}

fn validate_ingestion(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(
        map,
        &["require_serial_id", "max_serial_chars", "max_comment_chars"],
        layer,
        path,
    )?;
    if let Some(value) = map.get("require_serial_id") {
        expect_bool(value, layer, &join_path(path, "require_serial_id"))?;
    }
    if let Some(value) = map.get("max_serial_chars") {
        expect_u64(value, layer, &join_path(path, "max_serial_chars"))?;
    }
    if let Some(value) = map.get("max_comment_chars") {
        if !value.is_null() {
            expect_u64(value, layer, &join_path(path, "max_comment_chars"))?;
        }
    }
    Ok(())
}

fn validate_analytics(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(map, &["utc_offset_minutes", "top_terms"], layer, path)?;
    if let Some(value) = map.get("utc_offset_minutes") {
        expect_i64(value, layer, &join_path(path, "utc_offset_minutes"))?;
    }
    if let Some(value) = map.get("top_terms") {
        expect_u64(value, layer, &join_path(path, "top_terms"))?;
    }
    Ok(())
}

fn validate_server(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(map, &["address", "port"], layer, path)?;
    if let Some(value) = map.get("address") {
        expect_string(value, layer, &join_path(path, "address"))?;
    }
    if let Some(value) = map.get("port") {
        let port_path = join_path(path, "port");
        match value.as_u64() {
            Some(port) if port <= u64::from(u16::MAX) => {}
            Some(_) => return Err(invalid_field(layer, &port_path, "port out of range")),
            None => return Err(invalid_field(layer, &port_path, "expected integer")),
        }
    }
    Ok(())
}

/// Expect a JSON object or return a typed error.
fn expect_object<'a>(
    value: &'a Value,
    layer: &str,
    path: &str,
) -> Result<&'a Map<String, Value>, ConfigError> {
    value
        .as_object()
        .ok_or_else(|| invalid_field(layer, path, "expected object"))
}

fn expect_string(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_string() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected string"))
    }
}

fn expect_bool(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_boolean() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected bool"))
    }
}

/// Expect a non-negative integer.
fn expect_u64(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_u64() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected non-negative integer"))
    }
}

fn expect_i64(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_i64() || value.is_u64() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected integer"))
    }
}

fn expect_f64(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_number() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected number"))
    }
}

/// Ensure an object contains only allowed keys.
fn ensure_allowed_keys(
    map: &Map<String, Value>,
    allowed: &[&str],
    layer: &str,
    path: &str,
) -> Result<(), ConfigError> {
    match map.keys().find(|key| !allowed.contains(&key.as_str())) {
        Some(key) => Err(invalid_field(layer, &join_path(path, key), "unknown key")),
        None => Ok(()),
    }
}

/// Join nested paths for error messages.
fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

fn invalid_field(layer: &str, path: &str, message: &str) -> ConfigError {
    ConfigError::Schema {
        origin: layer.to_string(),
        field: if path.is_empty() { "root" } else { path }.to_string(),
        message: message.to_string(),
    }
}
