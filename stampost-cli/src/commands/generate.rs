//! `stampost generate` command handler
//!
//! Converts a host inventory pasted from a spreadsheet into per-host agent
//! configs. Inventory lines have the shape `[module] [host] logfile`, where a
//! missing module or host carries over from the previous line:
//!
//! ```text
//! checkout  10.0.0.1  /app/logs/CheckoutServer01.out
//!           10.0.0.2  /app/logs/CheckoutServer02.out
//!                     /app/logs/CheckoutServer09.out
//! billing   10.0.0.2  /app/logs/BillingServer01.out
//! ```
//!
//! The first host in sorted order renders with the collector template; every
//! other host renders as a plain agent shipping to it.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::Serialize;
use tracing::{info, warn};

use stampost_core::config::{GeneratorConfig, StampostConfig};

use crate::cli::GenerateArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Inventory line grammar: optional module token, optional host token starting
/// with digits or dots, mandatory file token.
const INVENTORY_PATTERN: &str = r"^(?:(?:(\S+)\s+)?([.\d]+)\S*\s+)?(\S+)$";

/// Template placeholder shape: `${name}`.
const PLACEHOLDER_PATTERN: &str = r"\$\{([^}]+)\}";

/// Execute the `generate` command.
///
/// Reads the inventory, groups entries per host, and renders one config part
/// per host plus one per log file. Without `--output-file` the generated
/// config goes to stdout and the summary is logged instead of rendered, so
/// the output stays pipeable.
///
/// # Errors
///
/// Returns `CliError::Generate` when the inventory or a template cannot be
/// read, or when no inventory line yields a usable entry.
pub fn execute(
    args: GenerateArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let config = StampostConfig::load(config_path)?;

    let template_dir = args
        .template_dir
        .unwrap_or_else(|| PathBuf::from(&config.generator.template_dir));
    let templates = Templates::load(&template_dir)?;

    info!(inventory = %args.inventory.display(), "generating agent configs");

    let content = fs::read_to_string(&args.inventory).map_err(|e| {
        CliError::Generate(format!(
            "cannot read inventory {}: {}",
            args.inventory.display(),
            e
        ))
    })?;

    let (mut entries, skipped) = parse_inventory(&content)?;
    if entries.is_empty() {
        return Err(CliError::Generate(format!(
            "no usable inventory lines in {}",
            args.inventory.display()
        )));
    }

    // Stable sort keeps the inventory order within one host.
    entries.sort_by(|a, b| a.host.cmp(&b.host));

    let rendered = render_all(&entries, &templates, &config.generator)?;

    let report = GenerateReport {
        inventory: args.inventory.display().to_string(),
        agents: rendered.agents,
        sources: entries.len(),
        skipped,
        collector: rendered.collector_host,
        output: args.output_file.as_ref().map(|p| p.display().to_string()),
    };

    match &args.output_file {
        Some(path) => {
            fs::write(path, &rendered.text).map_err(|e| {
                CliError::Generate(format!("cannot write {}: {}", path.display(), e))
            })?;
            writer.render(&report)?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(rendered.text.as_bytes())?;
            info!(
                agents = report.agents,
                sources = report.sources,
                skipped = report.skipped,
                "generated agent configs"
            );
        }
    }

    Ok(())
}

// ---- templates ----

/// The three templates that make up one generated config.
struct Templates {
    collector: String,
    agent: String,
    source: String,
}

impl Templates {
    fn load(dir: &Path) -> Result<Self, CliError> {
        Ok(Self {
            collector: read_template(dir, "collector.template")?,
            agent: read_template(dir, "agent.template")?,
            source: read_template(dir, "source.template")?,
        })
    }
}

fn read_template(dir: &Path, name: &str) -> Result<String, CliError> {
    let path = dir.join(name);
    fs::read_to_string(&path)
        .map_err(|e| CliError::Generate(format!("cannot read template {}: {}", path.display(), e)))
}

// ---- inventory parsing ----

/// One resolved inventory line.
#[derive(Debug, Clone, PartialEq, Eq)]
struct InventoryEntry {
    module: String,
    host: String,
    file: String,
    server: String,
}

/// Parse the inventory into entries plus a count of skipped lines.
///
/// Module and host stick until replaced. Lines that match nothing, and lines
/// that appear before any host is known, are skipped with a warning. A host
/// token like `10.0.0.1:8080` keeps only its leading digits-and-dots part.
fn parse_inventory(content: &str) -> Result<(Vec<InventoryEntry>, usize), CliError> {
    let pattern = Regex::new(INVENTORY_PATTERN)
        .map_err(|e| CliError::Generate(format!("invalid inventory pattern: {e}")))?;

    let mut entries = Vec::new();
    let mut skipped = 0;
    let mut module = String::new();
    let mut host: Option<String> = None;

    for (lineno, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let Some(caps) = pattern.captures(line) else {
            warn!(
                line = lineno + 1,
                content = line,
                "skipping unrecognized inventory line"
            );
            skipped += 1;
            continue;
        };

        if let Some(m) = caps.get(1) {
            module = m.as_str().to_owned();
        }
        if let Some(h) = caps.get(2) {
            host = Some(h.as_str().to_owned());
        }

        let Some(current_host) = host.clone() else {
            warn!(
                line = lineno + 1,
                content = line,
                "skipping inventory line before any host is known"
            );
            skipped += 1;
            continue;
        };

        let file = caps[3].to_owned();
        let server = Path::new(&file)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_owned();

        entries.push(InventoryEntry {
            module: module.clone(),
            host: current_host,
            file,
            server,
        });
    }

    Ok((entries, skipped))
}

// ---- rendering ----

struct RenderedConfig {
    text: String,
    agents: usize,
    collector_host: String,
}

/// Render one part per host group plus one part per entry.
///
/// Expects `entries` sorted by host. The substitution map carries
/// `agent_name`, `sources`, and `first_host` for the whole group, and
/// `source`, `file`, `server`, `module` for each entry.
fn render_all(
    entries: &[InventoryEntry],
    templates: &Templates,
    generator: &GeneratorConfig,
) -> Result<RenderedConfig, CliError> {
    let placeholder = Regex::new(PLACEHOLDER_PATTERN)
        .map_err(|e| CliError::Generate(format!("invalid placeholder pattern: {e}")))?;

    let Some(first) = entries.first() else {
        return Ok(RenderedConfig {
            text: String::new(),
            agents: 0,
            collector_host: String::new(),
        });
    };
    let collector_host = first.host.clone();

    let mut parts: Vec<String> = Vec::new();
    let mut agents = 0;

    for group in entries.chunk_by(|a, b| a.host == b.host) {
        let host = &group[0].host;
        let agent_name = format!("{}_{}", generator.agent_prefix, host.replace('.', "_"));
        let source_names: Vec<String> = (1..=group.len())
            .map(|i| format!("{}{}", generator.source_prefix, i))
            .collect();

        let mut vars: HashMap<&str, String> = HashMap::new();
        vars.insert("agent_name", agent_name);
        vars.insert("sources", source_names.join(" "));
        vars.insert("first_host", collector_host.clone());

        let agent_template = if agents == 0 {
            &templates.collector
        } else {
            &templates.agent
        };
        agents += 1;
        parts.push(substitute(agent_template, &vars, &placeholder));

        for (entry, source_name) in group.iter().zip(&source_names) {
            vars.insert("source", source_name.clone());
            vars.insert("file", entry.file.clone());
            vars.insert("server", entry.server.clone());
            vars.insert("module", entry.module.clone());
            parts.push(substitute(&templates.source, &vars, &placeholder));
        }
    }

    let text = parts
        .iter()
        .map(|p| p.trim_end())
        .collect::<Vec<_>>()
        .join("\n\n")
        + "\n";

    Ok(RenderedConfig {
        text,
        agents,
        collector_host,
    })
}

/// Replace `${name}` placeholders from `vars`. Unknown placeholders stay
/// verbatim so downstream tooling can spot them; each one logs a warning.
fn substitute(template: &str, vars: &HashMap<&str, String>, placeholder: &Regex) -> String {
    placeholder
        .replace_all(template, |caps: &regex::Captures<'_>| {
            let name = &caps[1];
            match vars.get(name) {
                Some(value) => value.clone(),
                None => {
                    warn!(placeholder = name, "unknown template placeholder left as-is");
                    caps[0].to_owned()
                }
            }
        })
        .into_owned()
}

// ---- report ----

/// Summary of one `generate` run.
#[derive(Serialize)]
pub struct GenerateReport {
    /// Inventory file path
    pub inventory: String,
    /// Number of generated agent parts (one per host)
    pub agents: usize,
    /// Number of generated source parts (one per log file)
    pub sources: usize,
    /// Inventory lines skipped as unusable
    pub skipped: usize,
    /// Host rendered with the collector template
    pub collector: String,
    /// Output file, if any (None = stdout)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl Render for GenerateReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Generate: {}", self.inventory.bold())?;
        writeln!(w, "  Agents: {}", self.agents)?;
        writeln!(w, "  Sources: {}", self.sources)?;
        writeln!(w, "  Collector: {}", self.collector)?;

        if self.skipped > 0 {
            let skipped = format!("{}", self.skipped);
            writeln!(w, "  Skipped lines: {}", skipped.yellow())?;
        } else {
            writeln!(w, "  Skipped lines: 0")?;
        }

        if let Some(ref output) = self.output {
            writeln!(w, "  Written to: {}", output.green())?;
        }

        Ok(())
    }
}
