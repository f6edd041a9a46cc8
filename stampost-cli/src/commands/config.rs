//! `stampost config` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use stampost_core::config::{StageSpec, StampostConfig};
use stampost_core::stage::StageRegistry;
use stampost_enricher::{EnricherConfig, KeyValueSpec, STATIC_HEADERS_KIND, register_defaults};

use crate::cli::{ConfigAction, ConfigArgs};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `config` command.
pub fn execute(args: ConfigArgs, config_path: &Path, writer: &OutputWriter) -> Result<(), CliError> {
    match args.action {
        ConfigAction::Validate => execute_validate(config_path, writer),
        ConfigAction::Show { section } => execute_show(config_path, section, writer),
    }
}

/// Execute the config validate subcommand.
///
/// Loads the configuration, builds every declared stage through the registry,
/// and re-parses `static_headers` key/value strings to surface the tokens that
/// would be dropped at runtime.
///
/// # Errors
///
/// Returns `CliError::Config` if validation fails (missing fields, invalid
/// values, parse errors, unknown stage kinds).
fn execute_validate(config_path: &Path, writer: &OutputWriter) -> Result<(), CliError> {
    info!(path = %config_path.display(), "validating configuration");

    let report = build_validation_report(config_path);

    writer.render(&report)?;

    if !report.valid {
        return Err(CliError::Config("configuration is invalid".to_owned()));
    }

    Ok(())
}

fn build_validation_report(config_path: &Path) -> ConfigValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut stage_count = 0;

    match StampostConfig::load(config_path) {
        Ok(config) => {
            stage_count = config.stages.len();

            let mut registry = StageRegistry::new();
            if let Err(e) = register_defaults(&mut registry) {
                errors.push(e.to_string());
            } else if let Err(e) = registry.build_all(&config.stages) {
                errors.push(e.to_string());
            }

            collect_keyval_warnings(&config.stages, &mut warnings);
        }
        Err(e) => errors.push(e.to_string()),
    }

    ConfigValidationReport {
        source: config_path.display().to_string(),
        valid: errors.is_empty(),
        stages: stage_count,
        errors,
        warnings,
    }
}

/// Re-run the key/value parser for every `static_headers` stage and record
/// each token it would discard. Stages whose settings fail to deserialize are
/// skipped here; `build_all` already reports those as errors.
fn collect_keyval_warnings(specs: &[StageSpec], warnings: &mut Vec<String>) {
    for spec in specs {
        if spec.kind != STATIC_HEADERS_KIND {
            continue;
        }

        let parsed: Result<EnricherConfig, toml::de::Error> =
            toml::Value::Table(spec.settings.clone()).try_into();
        let Ok(config) = parsed else {
            continue;
        };

        let outcome = KeyValueSpec::new(&config.key_values, &config.separator).parse();
        for warning in outcome.warnings {
            warnings.push(format!("stage '{}': {}", spec.display_name(), warning));
        }
    }
}

/// Execute the config show subcommand.
///
/// Loads and displays the effective configuration (file + env overrides + defaults).
///
/// # Errors
///
/// Returns `CliError::Core` if loading fails or `CliError::Command` if the
/// section name is invalid.
fn execute_show(
    config_path: &Path,
    section: Option<String>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    info!(path = %config_path.display(), "loading configuration");

    let config = StampostConfig::load(config_path)?;

    let report = match section {
        Some(section_name) => {
            let config_toml = match section_name.as_str() {
                "general" => serialize_section(&config.general),
                "generator" => serialize_section(&config.generator),
                "stages" => serialize_section(&StagesSection {
                    stages: &config.stages,
                }),
                _ => {
                    return Err(CliError::Command(format!(
                        "unknown section: {} (expected: general, generator, stages)",
                        section_name
                    )));
                }
            };
            ConfigReport {
                source: config_path.display().to_string(),
                section: Some(section_name),
                config_toml,
            }
        }
        None => ConfigReport {
            source: config_path.display().to_string(),
            section: None,
            config_toml: serialize_section(&config),
        },
    };

    writer.render(&report)?;

    Ok(())
}

fn serialize_section<T: Serialize>(section: &T) -> String {
    toml::to_string_pretty(section).unwrap_or_else(|e| format!("(serialization error: {})", e))
}

/// Wrapper so `--section stages` serializes as `[[stages]]` blocks instead of
/// a bare top-level array, which TOML cannot represent.
#[derive(Serialize)]
struct StagesSection<'a> {
    stages: &'a [StageSpec],
}

/// Configuration display report.
///
/// Contains the source file path and serialized TOML configuration.
/// The `config_toml` field is skipped during JSON serialization (only used for text rendering).
#[derive(Serialize)]
pub struct ConfigReport {
    /// Configuration file path
    pub source: String,
    /// Optional section name (None = full config)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    /// Serialized TOML configuration
    #[serde(skip)]
    pub config_toml: String,
}

impl Render for ConfigReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        if let Some(ref section) = self.section {
            let section_label = format!("[{}]", section);
            writeln!(
                w,
                "Configuration {} (source: {})",
                section_label.bold(),
                self.source
            )?;
        } else {
            writeln!(w, "Configuration (source: {})", self.source.bold())?;
        }

        writeln!(w)?;
        write!(w, "{}", self.config_toml)?;

        Ok(())
    }
}

/// Configuration validation report.
///
/// Contains validation result, error messages, and non-fatal parser warnings.
#[derive(Serialize)]
pub struct ConfigValidationReport {
    /// Configuration file path
    pub source: String,
    /// Whether the configuration is valid
    pub valid: bool,
    /// Number of declared stages
    pub stages: usize,
    /// Validation error messages (empty if valid)
    pub errors: Vec<String>,
    /// Key/value tokens that the parser would discard at runtime
    pub warnings: Vec<String>,
}

impl Render for ConfigValidationReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Config Validation: {}", self.source.bold())?;

        if self.valid {
            writeln!(w, "  Result: {}", "VALID".green().bold())?;
            writeln!(w, "  Stages: {}", self.stages)?;
        } else {
            writeln!(w, "  Result: {}", "INVALID".red().bold())?;
            for err in &self.errors {
                writeln!(w, "  Error: {}", err.red())?;
            }
        }

        for warn in &self.warnings {
            writeln!(w, "  Warning: {}", warn.yellow())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_report_render_text_full_config() {
        let report = ConfigReport {
            source: "stampost.toml".to_owned(),
            section: None,
            config_toml: "[general]\nlog_level = \"info\"\n\n[[stages]]\nkind = \"static_headers\""
                .to_owned(),
        };

        let mut buffer = Vec::new();
        report
            .render_text(&mut buffer)
            .expect("text rendering should succeed");

        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("Configuration"), "should contain header");
        assert!(
            output.contains("stampost.toml"),
            "should contain source filename"
        );
        assert!(
            output.contains("static_headers"),
            "should contain stage declarations"
        );
    }

    #[test]
    fn test_config_report_render_text_specific_section() {
        let report = ConfigReport {
            source: "/etc/stampost.toml".to_owned(),
            section: Some("generator".to_owned()),
            config_toml: "template_dir = \"templates\"".to_owned(),
        };

        let mut buffer = Vec::new();
        report
            .render_text(&mut buffer)
            .expect("text rendering should succeed");

        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("[generator]"), "should show section name");
        assert!(output.contains("template_dir"), "should show config content");
    }

    #[test]
    fn test_config_report_json_serialization() {
        let report = ConfigReport {
            source: "test.toml".to_owned(),
            section: Some("stages".to_owned()),
            config_toml: "kind = \"static_headers\"".to_owned(),
        };

        let json = serde_json::to_string(&report).expect("JSON serialization should succeed");
        let parsed: serde_json::Value = serde_json::from_str(&json).expect("should parse JSON");

        assert_eq!(parsed["source"].as_str(), Some("test.toml"));
        assert_eq!(parsed["section"].as_str(), Some("stages"));
        // config_toml is skipped in serialization
        assert!(
            parsed.get("config_toml").is_none(),
            "config_toml should be skipped"
        );
    }

    #[test]
    fn test_config_validation_report_valid() {
        let report = ConfigValidationReport {
            source: "stampost.toml".to_owned(),
            valid: true,
            stages: 2,
            errors: Vec::new(),
            warnings: Vec::new(),
        };

        let mut buffer = Vec::new();
        report
            .render_text(&mut buffer)
            .expect("text rendering should succeed");

        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("VALID"), "should show valid status");
        assert!(output.contains("Stages: 2"), "should show stage count");
        assert!(!output.contains("Error:"), "should not show errors");
    }

    #[test]
    fn test_config_validation_report_invalid_single_error() {
        let report = ConfigValidationReport {
            source: "bad.toml".to_owned(),
            valid: false,
            stages: 0,
            errors: vec!["unknown stage kind 'gzip'".to_owned()],
            warnings: Vec::new(),
        };

        let mut buffer = Vec::new();
        report
            .render_text(&mut buffer)
            .expect("text rendering should succeed");

        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("INVALID"), "should show invalid status");
        assert!(
            output.contains("unknown stage kind"),
            "should show error message"
        );
    }

    #[test]
    fn test_config_validation_report_invalid_multiple_errors() {
        let report = ConfigValidationReport {
            source: "bad.toml".to_owned(),
            valid: false,
            stages: 0,
            errors: vec![
                "error 1: invalid log level".to_owned(),
                "error 2: empty separator".to_owned(),
                "error 3: missing kind".to_owned(),
            ],
            warnings: Vec::new(),
        };

        let mut buffer = Vec::new();
        report
            .render_text(&mut buffer)
            .expect("text rendering should succeed");

        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("error 1"), "should show first error");
        assert!(output.contains("error 2"), "should show second error");
        assert!(output.contains("error 3"), "should show third error");
    }

    #[test]
    fn test_config_validation_report_renders_warnings() {
        let report = ConfigValidationReport {
            source: "stampost.toml".to_owned(),
            valid: true,
            stages: 1,
            errors: Vec::new(),
            warnings: vec![
                "stage 'tags': malformed pair 'oops': missing separator ':'".to_owned(),
            ],
        };

        let mut buffer = Vec::new();
        report
            .render_text(&mut buffer)
            .expect("text rendering should succeed");

        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("VALID"), "warnings should not flip validity");
        assert!(
            output.contains("Warning: stage 'tags'"),
            "should render warnings"
        );
    }

    #[test]
    fn test_config_validation_report_json_valid() {
        let report = ConfigValidationReport {
            source: "test.toml".to_owned(),
            valid: true,
            stages: 1,
            errors: Vec::new(),
            warnings: Vec::new(),
        };

        let json = serde_json::to_string(&report).expect("JSON serialization should succeed");
        let parsed: serde_json::Value = serde_json::from_str(&json).expect("should parse JSON");

        assert_eq!(parsed["valid"].as_bool(), Some(true));
        assert_eq!(parsed["stages"].as_u64(), Some(1));
        assert_eq!(
            parsed["errors"].as_array().expect("should be array").len(),
            0
        );
    }

    #[test]
    fn test_config_validation_report_json_invalid() {
        let report = ConfigValidationReport {
            source: "bad.toml".to_owned(),
            valid: false,
            stages: 0,
            errors: vec!["error message".to_owned()],
            warnings: vec!["warning message".to_owned()],
        };

        let json = serde_json::to_string(&report).expect("JSON serialization should succeed");
        let parsed: serde_json::Value = serde_json::from_str(&json).expect("should parse JSON");

        assert_eq!(parsed["valid"].as_bool(), Some(false));
        assert_eq!(
            parsed["errors"].as_array().expect("should be array").len(),
            1
        );
        assert_eq!(
            parsed["warnings"].as_array().expect("should be array").len(),
            1
        );
    }

    #[test]
    fn test_collect_keyval_warnings_reports_dropped_tokens() {
        let mut spec = StageSpec::new(STATIC_HEADERS_KIND);
        spec.name = Some("tags".to_owned());
        spec.settings.insert(
            "key_values".to_owned(),
            toml::Value::String("env:prod broken :empty".to_owned()),
        );

        let mut warnings = Vec::new();
        collect_keyval_warnings(&[spec], &mut warnings);

        assert_eq!(warnings.len(), 2, "should report both dropped tokens");
        assert!(
            warnings[0].contains("stage 'tags'"),
            "warnings should name the stage"
        );
        assert!(warnings.iter().any(|w| w.contains("'broken'")));
        assert!(warnings.iter().any(|w| w.contains("':empty'")));
    }

    #[test]
    fn test_collect_keyval_warnings_ignores_other_kinds() {
        let mut spec = StageSpec::new("router");
        spec.settings.insert(
            "key_values".to_owned(),
            toml::Value::String("broken".to_owned()),
        );

        let mut warnings = Vec::new();
        collect_keyval_warnings(&[spec], &mut warnings);

        assert!(
            warnings.is_empty(),
            "non static_headers stages should be skipped"
        );
    }

    #[test]
    fn test_collect_keyval_warnings_clean_config_is_silent() {
        let mut spec = StageSpec::new(STATIC_HEADERS_KIND);
        spec.settings.insert(
            "key_values".to_owned(),
            toml::Value::String("dc:ap-east env:prod".to_owned()),
        );

        let mut warnings = Vec::new();
        collect_keyval_warnings(&[spec], &mut warnings);

        assert!(warnings.is_empty(), "well-formed tokens produce no warnings");
    }

    #[test]
    fn test_config_report_empty_config() {
        let report = ConfigReport {
            source: "empty.toml".to_owned(),
            section: None,
            config_toml: String::new(),
        };

        let mut buffer = Vec::new();
        report
            .render_text(&mut buffer)
            .expect("empty config should render");

        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("Configuration"), "should have header");
        assert!(output.contains("empty.toml"), "should still name the source");
    }

    #[test]
    fn test_config_report_unicode_in_source_path() {
        let report = ConfigReport {
            source: "/path/to/설정.toml".to_owned(),
            section: None,
            config_toml: "test = true".to_owned(),
        };

        let mut buffer = Vec::new();
        report
            .render_text(&mut buffer)
            .expect("unicode path should render");

        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("설정.toml"), "should handle unicode paths");
    }

    #[test]
    fn test_stages_section_serializes_as_array_of_tables() {
        let mut spec = StageSpec::new(STATIC_HEADERS_KIND);
        spec.settings.insert(
            "key_values".to_owned(),
            toml::Value::String("env:prod".to_owned()),
        );
        let stages = vec![spec];

        let toml_str = serialize_section(&StagesSection { stages: &stages });

        assert!(
            toml_str.contains("[[stages]]"),
            "should render [[stages]] blocks, got: {}",
            toml_str
        );
        assert!(toml_str.contains("kind = \"static_headers\""));
    }

    #[test]
    fn test_config_report_multiline_toml() {
        let multiline_toml = r#"
[general]
log_level = "info"

[generator]
agent_prefix = "agent"
"#;
        let report = ConfigReport {
            source: "test.toml".to_owned(),
            section: None,
            config_toml: multiline_toml.to_owned(),
        };

        let mut buffer = Vec::new();
        report
            .render_text(&mut buffer)
            .expect("multiline config should render");

        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("[general]"), "should show all sections");
        assert!(output.contains("[generator]"), "should show all sections");
    }
}
