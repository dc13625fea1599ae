//! Typed reads of stage parameters from an `on_create` JSON object.
//!
//! An absent or null key yields `None` so the stage keeps its default. A key
//! that is present with the wrong JSON type is an error naming the key.

use anyhow::{anyhow, bail, Result};
use serde_json::Value;

/// Check that `config` is an object (or `null`, meaning no config given)
/// holding only `allowed` keys.
pub fn ensure_known_keys(config: &Value, allowed: &[&str]) -> Result<()> {
    let map = match config {
        Value::Null => return Ok(()),
        Value::Object(map) => map,
        other => bail!("Stage config must be an object, got {}", other),
    };
    if let Some(unknown) = map.keys().find(|key| !allowed.contains(&key.as_str())) {
        bail!(
            "Unknown parameter '{}' (expected one of: {})",
            unknown,
            allowed.join(", ")
        );
    }
    Ok(())
}

fn present<'a>(config: &'a Value, key: &str) -> Option<&'a Value> {
    config.get(key).filter(|value| !value.is_null())
}

pub fn f64_param(config: &Value, key: &str) -> Result<Option<f64>> {
    present(config, key)
        .map(|value| {
            value
                .as_f64()
                .ok_or_else(|| anyhow!("Parameter '{}' must be a number, got {}", key, value))
        })
        .transpose()
}

/// Integer parameter; integral floats such as `100.0` are accepted
pub fn i32_param(config: &Value, key: &str) -> Result<Option<i32>> {
    let Some(value) = present(config, key) else {
        return Ok(None);
    };

    let wide = match (value.as_i64(), value.as_f64()) {
        (Some(int), _) => int,
        (None, Some(float)) if float.fract() == 0.0 && float.abs() <= i64::MAX as f64 => {
            float as i64
        }
        _ => bail!("Parameter '{}' must be an integer, got {}", key, value),
    };
    let narrow = i32::try_from(wide)
        .map_err(|_| anyhow!("Parameter '{}' = {} does not fit in i32", key, wide))?;
    Ok(Some(narrow))
}

pub fn str_param<'a>(config: &'a Value, key: &str) -> Result<Option<&'a str>> {
    present(config, key)
        .map(|value| {
            value
                .as_str()
                .ok_or_else(|| anyhow!("Parameter '{}' must be a string, got {}", key, value))
        })
        .transpose()
}
