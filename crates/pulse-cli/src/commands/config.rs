//! Config show command.

use anyhow::{Context, Result};
use pulse_config::ResolvedConfig;

use crate::theme::Theme;

/// Print the resolved configuration as TOML, with the files that fed it.
pub(crate) fn show_config(resolved: &ResolvedConfig) -> Result<()> {
    let rendered = resolved
        .to_toml()
        .context("failed to render configuration")?;

    if resolved.loaded_files.is_empty() {
        eprintln!("{}", Theme::dimmed("# no config files found; showing defaults"));
    }
    for file in &resolved.loaded_files {
        eprintln!("{}", Theme::dimmed(&format!("# loaded {file}")));
    }
    if resolved.config.gateway.token.is_some() {
        let source = resolved
            .source_of("gateway.token")
            .map_or_else(|| "unknown".to_owned(), ToString::to_string);
        eprintln!("{}", Theme::dimmed(&format!("# token set (from {source}), not shown")));
    }

    print!("{rendered}");
    Ok(())
}
