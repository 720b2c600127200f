//! TOML parser with helpful error messages

use std::path::Path;

use anyhow::{Context, Result};

use super::schema::ProvisionConfig;

/// Parse siteprov.toml, resolving relative paths against its directory
pub fn parse_config(path: &Path) -> Result<ProvisionConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let mut config = parse_config_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    if let Some(base) = path.parent() {
        config.resolve_paths(base);
    }
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Parse siteprov.toml content from string
pub fn parse_config_str(content: &str) -> Result<ProvisionConfig> {
    let config: ProvisionConfig =
        toml::from_str(content).map_err(|e| enhance_toml_error(e, content))?;

    config.validate()?;

    Ok(config)
}

fn enhance_toml_error(error: toml::de::Error, content: &str) -> anyhow::Error {
    let line = error
        .span()
        .map(|span| content.get(..span.start).unwrap_or(content).matches('\n').count() + 1);

    match line {
        Some(line_num) => anyhow::anyhow!(
            "TOML parsing error at line {}:\n{}\n\nError: {}",
            line_num,
            line_context(content, line_num),
            error.message()
        ),
        None => anyhow::anyhow!("TOML parsing error: {}", error.message()),
    }
}

fn line_context(content: &str, line_num: usize) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let start = line_num.saturating_sub(2);
    let end = (line_num + 1).min(lines.len());

    lines[start.min(end)..end]
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let num = start + i + 1;
            let marker = if num == line_num { ">>>" } else { "   " };
            format!("{} {:4} | {}", marker, num, line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
