use crate::error::{PlaytimeError, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Parse `KEY=VALUE` arguments from the command line
pub fn parse_key_values(args: &[String]) -> Result<HashMap<String, String>> {
    let mut values = HashMap::new();

    for arg in args {
        if let Some((key, value)) = arg.split_once('=') {
            values.insert(key.to_string(), value.to_string());
        } else {
            return Err(PlaytimeError::InvalidToolCall(format!(
                "Invalid argument format: {}. Expected KEY=VALUE",
                arg
            )));
        }
    }

    Ok(values)
}

/// Load variables from a dotenv-style file.
///
/// Blank lines and `#` comments are skipped, an optional `export ` prefix is
/// accepted, and values wrapped in matching single or double quotes are
/// unquoted.
pub fn load_env_file(path: &Path) -> Result<Vec<(String, String)>> {
    let content = fs::read_to_string(path).map_err(|e| {
        PlaytimeError::InvalidConfig(format!("Failed to read env file {}: {}", path.display(), e))
    })?;

    let mut vars = Vec::new();
    for (line_num, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);

        match line.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                vars.push((key.trim().to_string(), unquote(value.trim()).to_string()));
            }
            _ => {
                return Err(PlaytimeError::InvalidConfig(format!(
                    "Invalid env format at {}:{}: {}",
                    path.display(),
                    line_num + 1,
                    line
                )));
            }
        }
    }

    Ok(vars)
}

/// Export variables from an env file into the process environment.
///
/// Variables already present in the environment win. A missing file is not
/// an error; returns the number of variables that were set.
pub fn apply_env_file(path: &Path) -> Result<usize> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no env file");
        return Ok(0);
    }

    let mut applied = 0;
    for (key, value) in load_env_file(path)? {
        if std::env::var_os(&key).is_none() {
            std::env::set_var(&key, value);
            applied += 1;
        }
    }

    tracing::debug!(path = %path.display(), applied, "loaded env file");
    Ok(applied)
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
