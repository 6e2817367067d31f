//! oxide-formtree CLI
//!
//! Renders schemas to HTML and processes posted forms into values.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::{Map, Value};
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use oxide_formtree::{
    parse_urlencoded, FormConfig, FormEngine, MemoryRecords, PostSearch, Schema, SearchResponse,
    TermSearch,
};

/// Schema-driven form rendering and processing.
#[derive(Parser)]
#[command(name = "oxide-formtree")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Engine configuration file (JSON).
    #[arg(short, long, env = "FORMTREE_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a schema to HTML.
    Render {
        /// Schema file (JSON).
        #[arg(short, long)]
        schema: PathBuf,

        /// Current values (JSON object).
        #[arg(long)]
        values: Option<PathBuf>,

        /// Record store used to resolve post and term titles (JSON).
        #[arg(long)]
        records: Option<PathBuf>,
    },

    /// Process posted input into values and print them as JSON.
    Process {
        /// Schema file (JSON).
        #[arg(short, long)]
        schema: PathBuf,

        /// Posted input as a JSON object (`-` for stdin).
        #[arg(short, long, conflicts_with = "body")]
        input: Option<PathBuf>,

        /// Posted input as an url-encoded body (`-` for stdin).
        #[arg(short, long)]
        body: Option<PathBuf>,
    },

    /// Search posts by title.
    SearchPosts {
        /// Record store (JSON).
        #[arg(short, long)]
        records: PathBuf,

        /// Search term.
        #[arg(short, long)]
        term: Option<String>,

        /// Restrict to these post types.
        #[arg(short, long)]
        post_type: Vec<String>,
    },

    /// Search the terms of a taxonomy by name.
    SearchTerms {
        /// Record store (JSON).
        #[arg(short, long)]
        records: PathBuf,

        /// Search term.
        #[arg(short, long)]
        term: Option<String>,

        /// Taxonomy to search.
        #[arg(long)]
        taxonomy: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => FormConfig::default(),
    };

    println!("{}", run(cli.command, config)?);
    Ok(())
}

fn run(command: Commands, config: FormConfig) -> anyhow::Result<String> {
    let engine = FormEngine::new().with_config(config);

    match command {
        Commands::Render {
            schema,
            values,
            records,
        } => {
            let form = load_schema(&schema)?;
            let values = match values {
                Some(path) => load_object(&path)?,
                None => Map::new(),
            };
            let engine = match records {
                Some(path) => engine.with_records(load_records(&path)?),
                None => engine,
            };
            Ok(engine.render_form(&form, &values)?)
        }

        Commands::Process {
            schema,
            input,
            body,
        } => {
            let form = load_schema(&schema)?;
            let input = match (input, body) {
                (Some(path), _) => serde_json::from_str(&read_source(&path)?)
                    .with_context(|| format!("invalid JSON input in {}", path.display()))?,
                (None, Some(path)) => parse_urlencoded(read_source(&path)?.trim_end()),
                (None, None) => Value::Object(Map::new()),
            };
            debug!(%input, "posted input");

            let mut values = Map::new();
            engine.process_form(&form, &mut values, &input)?;
            Ok(serde_json::to_string_pretty(&values)?)
        }

        Commands::SearchPosts {
            records,
            term,
            post_type,
        } => {
            let engine = engine.with_records(load_records(&records)?);
            let response = SearchResponse::from_result(engine.search_posts(&PostSearch {
                term,
                post_type,
            }));
            Ok(serde_json::to_string_pretty(&response)?)
        }

        Commands::SearchTerms {
            records,
            term,
            taxonomy,
        } => {
            let engine = engine.with_records(load_records(&records)?);
            let response =
                SearchResponse::from_result(engine.search_terms(&TermSearch { term, taxonomy }));
            Ok(serde_json::to_string_pretty(&response)?)
        }
    }
}

/// Reads a file, or stdin for `-`.
fn read_source(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn load_config(path: &Path) -> anyhow::Result<FormConfig> {
    let text = read_source(path)?;
    serde_json::from_str(&text).with_context(|| format!("invalid config in {}", path.display()))
}

fn load_schema(path: &Path) -> anyhow::Result<oxide_formtree::Element> {
    let text = read_source(path)?;
    Schema::from_str(&text).with_context(|| format!("invalid schema in {}", path.display()))
}

fn load_object(path: &Path) -> anyhow::Result<Map<String, Value>> {
    let text = read_source(path)?;
    serde_json::from_str(&text).with_context(|| format!("expected a JSON object in {}", path.display()))
}

fn load_records(path: &Path) -> anyhow::Result<MemoryRecords> {
    let text = read_source(path)?;
    serde_json::from_str(&text).with_context(|| format!("invalid records in {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    const SCHEMA: &str = r##"{
        "#id": "signup",
        "name": {"#type": "text", "#label": "Name"},
        "agree": {"#type": "checkbox"}
    }"##;

    #[test]
    fn test_cli_parses() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_render_command() {
        let schema = file(SCHEMA);
        let values = file(r#"{"name": "Ada"}"#);
        let html = run(
            Commands::Render {
                schema: schema.path().to_path_buf(),
                values: Some(values.path().to_path_buf()),
                records: None,
            },
            FormConfig::default(),
        )
        .unwrap();
        assert!(html.contains(r#"<div id="signup" class="form form-signup">"#));
        assert!(html.contains(r#"value="Ada""#));
    }

    #[test]
    fn test_process_body_command() {
        let schema = file(SCHEMA);
        let body = file("name=Ada+Lovelace&agree=1\n");
        let output = run(
            Commands::Process {
                schema: schema.path().to_path_buf(),
                input: None,
                body: Some(body.path().to_path_buf()),
            },
            FormConfig::default(),
        )
        .unwrap();
        let values: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(values, serde_json::json!({"name": "Ada Lovelace", "agree": true}));
    }

    #[test]
    fn test_search_command() {
        let records = file(r#"{"posts": [{"id": 1, "label": "Hello", "kind": "post"}]}"#);
        let output = run(
            Commands::SearchPosts {
                records: records.path().to_path_buf(),
                term: Some("hel".to_string()),
                post_type: Vec::new(),
            },
            FormConfig::default(),
        )
        .unwrap();
        assert!(output.contains(r#""success": true"#));
        assert!(output.contains(r#""label": "Hello""#));
    }

    #[test]
    fn test_config_file() {
        let config = file(r#"{"class_prefix": "wp-form"}"#);
        let config = load_config(config.path()).unwrap();
        assert_eq!(config.class_prefix, "wp-form");
        assert_eq!(config.select_placeholder, "- select -");
    }

    #[test]
    fn test_invalid_schema_reports_path() {
        let schema = file(r#"{"name": "text"}"#);
        let err = load_schema(schema.path()).unwrap_err();
        assert!(err.to_string().contains("invalid schema"));
    }
}
