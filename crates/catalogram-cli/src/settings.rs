use std::path::{Path, PathBuf};

use catalogram_render::{DiagramFormat, QuotingRule, RenderError, RenderOptions};
use serde::{Deserialize, Serialize};

use crate::CliError;

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "catalogram.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub render: RenderSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderSettings {
    pub format: Option<String>,
    pub title: Option<String>,
    pub quoting: Option<String>,
    pub output: Option<PathBuf>,
    pub no_remarks: Option<bool>,
    pub no_foreign_key_names: Option<bool>,
    pub no_index_names: Option<bool>,
    pub no_primary_key_names: Option<bool>,
    /// Shorthand for all three `no_*_names` switches.
    pub portable_names: Option<bool>,
    pub show_ordinal_numbers: Option<bool>,
}

/// Render settings after merging config and flags, ready to use.
#[derive(Debug, Clone)]
pub struct ResolvedRender {
    pub format: DiagramFormat,
    pub options: RenderOptions,
    pub output: Option<PathBuf>,
}

/// Load settings from `path`, or from the default file when it exists.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, CliError> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !default.exists() {
                return Ok(Settings::default());
            }
            default
        }
    };

    let content = std::fs::read_to_string(&path).map_err(|err| {
        CliError::InvalidConfig(format!("cannot read {}: {err}", path.display()))
    })?;
    tracing::debug!(path = %path.display(), "config loaded");
    parse_settings(&content)
}

pub fn parse_settings(content: &str) -> Result<Settings, CliError> {
    Ok(toml::from_str(content)?)
}

/// Merge flags over config values and check the combination is renderable.
pub fn resolve_render(
    settings: &Settings,
    overrides: RenderSettings,
) -> Result<ResolvedRender, CliError> {
    let config = &settings.render;
    let format = match overrides.format.as_deref().or(config.format.as_deref()) {
        Some(value) => value.parse::<DiagramFormat>()?,
        None => DiagramFormat::Mermaid,
    };
    let quoting = match overrides.quoting.as_deref().or(config.quoting.as_deref()) {
        Some(value) => value.parse::<QuotingRule>()?,
        None => QuotingRule::None,
    };
    if !format.supports(quoting) {
        return Err(RenderError::UnsupportedFormatOption(format!(
            "{format} does not support quoting rule '{quoting}'"
        ))
        .into());
    }

    let portable = switch(overrides.portable_names, config.portable_names);

    Ok(ResolvedRender {
        format,
        options: RenderOptions {
            title: overrides.title.or_else(|| config.title.clone()),
            quoting,
            no_remarks: switch(overrides.no_remarks, config.no_remarks),
            no_foreign_key_names: portable
                || switch(overrides.no_foreign_key_names, config.no_foreign_key_names),
            no_index_names: portable || switch(overrides.no_index_names, config.no_index_names),
            no_primary_key_names: portable
                || switch(overrides.no_primary_key_names, config.no_primary_key_names),
            show_ordinal_numbers: switch(
                overrides.show_ordinal_numbers,
                config.show_ordinal_numbers,
            ),
        },
        output: overrides.output.or_else(|| config.output.clone()),
    })
}

fn switch(flag: Option<bool>, config: Option<bool>) -> bool {
    flag.or(config).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let settings = parse_settings(
            r#"
[render]
format = "dbml"
title = "From config"
quoting = "quote-all"
output = "schema.dbml"
"#,
        )
        .unwrap();

        let resolved = resolve_render(
            &settings,
            RenderSettings {
                title: Some("From flag".to_string()),
                ..RenderSettings::default()
            },
        )
        .unwrap();

        assert_eq!(resolved.format, DiagramFormat::Dbml);
        assert_eq!(resolved.options.quoting, QuotingRule::QuoteAll);
        assert_eq!(resolved.options.title.as_deref(), Some("From flag"));
        assert_eq!(resolved.output, Some(PathBuf::from("schema.dbml")));
    }

    #[test]
    fn defaults_without_config() {
        let resolved = resolve_render(&Settings::default(), RenderSettings::default()).unwrap();
        assert_eq!(resolved.format, DiagramFormat::Mermaid);
        assert_eq!(resolved.options.quoting, QuotingRule::None);
        assert!(resolved.output.is_none());
    }

    #[test]
    fn rejects_unsupported_combination() {
        let err = resolve_render(
            &Settings::default(),
            RenderSettings {
                format: Some("markdown".to_string()),
                quoting: Some("quote-all".to_string()),
                ..RenderSettings::default()
            },
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CliError::Render(RenderError::UnsupportedFormatOption(_))
        ));
    }

    #[test]
    fn display_switches_merge_with_config() {
        let settings = parse_settings(
            r#"
[render]
format = "markdown"
no_remarks = true
portable_names = true
show_ordinal_numbers = true
"#,
        )
        .unwrap();

        let resolved = resolve_render(
            &settings,
            RenderSettings {
                show_ordinal_numbers: Some(false),
                ..RenderSettings::default()
            },
        )
        .unwrap();

        let options = resolved.options;
        assert!(options.no_remarks);
        assert!(options.no_foreign_key_names);
        assert!(options.no_index_names);
        assert!(options.no_primary_key_names);
        assert!(!options.show_ordinal_numbers);
    }

    #[test]
    fn display_switches_default_off() {
        let resolved = resolve_render(&Settings::default(), RenderSettings::default()).unwrap();
        assert_eq!(
            resolved.options,
            RenderOptions {
                title: None,
                quoting: QuotingRule::None,
                ..RenderOptions::default()
            }
        );
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(matches!(
            parse_settings("[render]\ncolour = \"blue\"\n"),
            Err(CliError::Config(_))
        ));
    }
}
