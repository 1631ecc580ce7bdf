pub mod cli;
pub mod config;
pub mod config_generator;
pub mod display;
pub mod filter;
pub mod logging;

use crate::config::{KeyChecker, QueryConfig};
use crate::filter::{Clause, ClauseMatcher, FilterSet, LabelSet, labels_from_json};
use anyhow::{Context, bail};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

pub use cli::{ColorMode, Commands, OutputFormat, cli_parse};
pub use filter::{decode, encode};

fn apply_color_mode(mode: ColorMode) {
    match mode {
        ColorMode::Always => colored::control::set_override(true),
        ColorMode::Never => colored::control::set_override(false),
        ColorMode::Auto => {}
    }
}

/// Read a file, or stdin when the path is absent or `-`
fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file '{}'", path.display())),
        _ => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("Failed to read stdin")?;
            Ok(raw)
        }
    }
}

/// Parse JSON lines into label sets; blank lines are skipped
pub fn parse_label_sets(raw: &str) -> anyhow::Result<Vec<LabelSet>> {
    let mut sets = Vec::new();
    for (idx, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let value: serde_json::Value = serde_json::from_str(line)
            .with_context(|| format!("Invalid JSON on line {}", idx + 1))?;
        match labels_from_json(&value) {
            Some(labels) => sets.push(labels),
            None => bail!("Line {} is not a JSON object", idx + 1),
        }
    }
    Ok(sets)
}

fn write_output_file(path: &Path, content: &str) -> anyhow::Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write output file '{}'", path.display()))
}

fn warn_unknown_keys(checker: &KeyChecker, clauses: &[Clause], config: &QueryConfig) {
    for key in checker.unknown_keys(clauses) {
        warn!(
            key = %key,
            profile = %config.profile_name,
            "Unknown filter key; it is not listed in the profile"
        );
    }
}

fn warn_lossy_values(clauses: &[Clause]) {
    for clause in clauses.iter().filter(|c| !c.round_trips()) {
        warn!(
            clause = %clause,
            "Clause will not decode back unchanged (empty or invalid key, or a '\"' in the value)"
        );
    }
}

fn render_query(format: OutputFormat, query: &str) -> String {
    match format {
        OutputFormat::Text => display::format_query_text(query),
        OutputFormat::Json => display::format_query_json(query, &decode(query)),
    }
}

pub fn run() -> anyhow::Result<()> {
    let cli = cli_parse();
    logging::init_logging(cli.verbose, cli.quiet);
    apply_color_mode(cli.color);

    let config = config::load_config(cli.config.as_deref()).context("Failed to load config")?;
    let checker = KeyChecker::new(&config.keys).context("Failed to load config")?;
    let format = cli.format;

    debug!(profile = %config.profile_name, ?format, color = ?cli.color, "starting");
    if let Some(out_path) = &cli.output {
        info!("Output will be written to: {}", out_path.display());
    }

    let mut rendered = match &cli.command {
        Commands::Decode { query } => {
            let clauses = decode(query);
            debug!(count = clauses.len(), "decoded query");
            warn_unknown_keys(&checker, &clauses, &config);
            match format {
                OutputFormat::Text => display::format_clauses_text(&clauses),
                OutputFormat::Json => display::format_clauses_json(&clauses),
            }
        }
        Commands::Encode { clauses, input } => {
            let mut all = cli::clauses_from_triples(clauses)?;
            if let Some(input) = input {
                let raw = read_input(Some(input.as_path()))?;
                let mut from_file: Vec<Clause> =
                    serde_json::from_str(&raw).context("Expected a JSON array of clauses")?;
                all.append(&mut from_file);
            }
            warn_lossy_values(&all);
            warn_unknown_keys(&checker, &all, &config);
            render_query(format, &encode(&all))
        }
        Commands::Add { query, clause } => {
            let clause = Clause::from(clause.clone());
            warn_lossy_values(std::slice::from_ref(&clause));
            let mut set = FilterSet::from_query(query);
            set.push(clause);
            warn_unknown_keys(&checker, set.clauses(), &config);
            render_query(format, &set.to_query())
        }
        Commands::Remove { query, index } => {
            let mut set = FilterSet::from_query(query);
            set.remove(*index)?;
            render_query(format, &set.to_query())
        }
        Commands::Change {
            query,
            index,
            clause,
        } => {
            let clause = Clause::from(clause.clone());
            warn_lossy_values(std::slice::from_ref(&clause));
            let mut set = FilterSet::from_query(query);
            set.replace(*index, clause)?;
            warn_unknown_keys(&checker, set.clauses(), &config);
            render_query(format, &set.to_query())
        }
        Commands::Match { query, input } => {
            let clauses = decode(query);
            let matcher = ClauseMatcher::new(&clauses)?;
            let label_sets = parse_label_sets(&read_input(input.as_deref())?)?;
            let total = label_sets.len();
            let matched: Vec<LabelSet> = label_sets
                .into_iter()
                .filter(|labels| matcher.matches(labels))
                .collect();
            debug!(total, matched = matched.len(), "matched label sets");
            match format {
                OutputFormat::Text => display::format_matches_text(&matched, total),
                OutputFormat::Json => display::format_matches_json(&matched, total),
            }
        }
        Commands::Series { apm_table } => {
            let tag_key_series = config.tag_key_series(*apm_table);
            let health = &config.service_graph.health_series;
            match format {
                OutputFormat::Text => {
                    display::format_series_text(&config.profile_name, &tag_key_series, health)
                }
                OutputFormat::Json => {
                    display::format_series_json(&config.profile_name, &tag_key_series, health)
                }
            }
        }
        Commands::GenerateConfig {
            input,
            profile_name,
        } => {
            let label_sets = parse_label_sets(&read_input(input.as_deref())?)?;
            let generated = config_generator::generate_config(
                &label_sets,
                &config,
                &config_generator::GenerateConfigOptions {
                    profile_name: profile_name.clone(),
                },
            );
            let body = toml::to_string_pretty(&generated)
                .context("Failed to serialize generated config")?;
            let source = input
                .as_deref()
                .map_or_else(|| "-".to_string(), |p| p.display().to_string());
            let header = format!(
                "# Generated by adhoc-query generate-config\n# Source: {}\n# Label sets: {}\n\n",
                source,
                label_sets.len()
            );
            format!("{header}{body}")
        }
    };

    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }
    print!("{rendered}");
    if let Some(path) = &cli.output {
        write_output_file(path, &rendered)?;
    }

    Ok(())
}
