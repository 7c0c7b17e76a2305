//! Tabula CLI
//!
//! Command-line interface for querying tabular files in plain language:
//! - Run queries and page through the result
//! - Inspect the derived schema and query suggestions
//! - Generate dataset insights
//! - Run row agents
//! - Transform a column
//! - Export query results

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tabula::assist::{
    analyze, apply_changes, AgentRunner, AgentScope, InsightCategory, RowAgent, Transformation,
    Transformer, DEFAULT_CATEGORIES,
};
use tabula::config::{generate_default_config, Config};
use tabula::data::{load_rows, ColumnDecl, ColumnSchema, Row, Schema, Value};
use tabula::export::{export, export_path, ExportFormat};
use tabula::query::{run_query, suggestions, TableSession};

/// Widest a table cell is printed before truncation
const MAX_CELL_WIDTH: usize = 24;

#[derive(Parser)]
#[command(name = "tabula")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Query JSON and CSV tables in plain language")]
#[command(long_about = "Tabula turns free-text questions such as \"top 5 orders from India sort by total desc\"\ninto filter, sort and limit plans over a JSON or CSV file.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: <config dir>/tabula/config.toml, then ./tabula.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (table, json, csv)
    #[arg(short, long, global = true)]
    pub format: Option<String>,

    /// Column declaration key[:type[:label]], repeatable (default: derived from the first row)
    #[arg(short, long = "column", global = true)]
    pub columns: Vec<ColumnDecl>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a query and print one page of the result
    Query {
        /// Dataset file (.json or .csv)
        file: PathBuf,
        /// Query text, e.g. "status is shipped sort by total desc"
        #[arg(default_value = "")]
        text: String,
        /// Page number, starting at 1
        #[arg(short, long, default_value = "1")]
        page: usize,
        /// Rows per page (default: from config)
        #[arg(long)]
        page_size: Option<usize>,
    },

    /// Print the derived schema
    Schema {
        /// Dataset file (.json or .csv)
        file: PathBuf,
    },

    /// Generate dataset insights
    Insights {
        /// Dataset file (.json or .csv)
        file: PathBuf,
        /// Categories to include (trends, outliers, patterns, recommendations, summary)
        #[arg(long = "category")]
        categories: Vec<InsightCategory>,
    },

    /// Print example queries for a dataset
    Suggest {
        /// Dataset file (.json or .csv)
        file: PathBuf,
    },

    /// Run a row agent over a dataset
    Agent {
        /// Dataset file (.json or .csv)
        file: PathBuf,
        /// Agent id (explain, predict, classify, draft, summarize, ...)
        id: String,
        /// Prompt template with {{column}} placeholders
        template: String,
        /// Only run on the row at this position (0-indexed)
        #[arg(long)]
        row: Option<usize>,
    },

    /// Transform one column and print the proposed changes
    Transform {
        /// Dataset file (.json or .csv)
        file: PathBuf,
        /// Transformation id (standardize, normalize, categorize, classify, translate, ...)
        id: String,
        /// Column to transform
        column: String,
        /// Prompt template with {{column}} placeholders
        #[arg(long, default_value = "")]
        template: String,
        /// Write the transformed dataset to this file or directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export query results as CSV or JSON
    Export {
        /// Dataset file (.json or .csv)
        file: PathBuf,
        /// Query text (default: all rows)
        #[arg(default_value = "")]
        text: String,
        /// Output file, or a directory for a timestamped file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::load_default(),
    };
    tabula::logging::init(&config.logging).context("failed to initialise logging")?;

    let format = cli
        .format
        .clone()
        .unwrap_or_else(|| config.export.format.clone())
        .to_lowercase();

    match cli.command {
        Commands::Query {
            file,
            text,
            page,
            page_size,
        } => {
            let (rows, schema) = load_table(&file, &cli.columns, config.table.sample_size)?;
            let mut session = TableSession::new(rows, schema)
                .with_page_size(page_size.unwrap_or(config.table.page_size));

            session.run_query(&text);
            session.set_page(page.saturating_sub(1));

            let view = session.view();
            let current = session.page();

            match format.as_str() {
                "json" => {
                    let body = serde_json::json!({
                        "query": view.query,
                        "filteredCount": view.filtered_count,
                        "matchedCount": view.matched_count,
                        "page": current,
                    });
                    println!("{}", serde_json::to_string_pretty(&body)?);
                }
                "csv" => {
                    let body = export(
                        current.rows.iter().copied(),
                        &session.schema().columns,
                        ExportFormat::Csv,
                    )?;
                    println!("{}", body);
                }
                _ => {
                    println!("{}", view.explanation());
                    println!(
                        "{} of {} rows matched",
                        view.matched_count,
                        session.rows().len()
                    );
                    println!();
                    print_table(&session.schema().columns, &current.rows);
                    println!();
                    println!(
                        "Page {} of {}",
                        current.index + 1,
                        current.total_pages.max(1)
                    );
                }
            }
        }

        Commands::Schema { file } => {
            let (_, schema) = load_table(&file, &cli.columns, config.table.sample_size)?;

            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&schema)?);
            } else {
                println!("{} rows, {} columns", schema.row_count, schema.columns.len());
                println!();
                for column in &schema.columns {
                    println!(
                        "{:<20} {:<8} {}",
                        column.key,
                        column.column_type.as_str(),
                        column.label
                    );
                }
            }
        }

        Commands::Insights { file, categories } => {
            let (rows, schema) = load_table(&file, &cli.columns, config.table.sample_size)?;
            let categories = if categories.is_empty() {
                DEFAULT_CATEGORIES.to_vec()
            } else {
                categories
            };

            let insights = analyze(&rows, &schema, &categories);

            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&insights)?);
            } else {
                for insight in &insights {
                    println!(
                        "[{}] {} ({:.0}% confidence)",
                        insight.category,
                        insight.title,
                        insight.confidence * 100.0
                    );
                    println!("    {}", insight.description);
                }
            }
        }

        Commands::Suggest { file } => {
            let (_, schema) = load_table(&file, &cli.columns, config.table.sample_size)?;
            for suggestion in suggestions(&schema) {
                println!("{}", suggestion);
            }
        }

        Commands::Agent {
            file,
            id,
            template,
            row,
        } => {
            let (rows, _) = load_table(&file, &cli.columns, config.table.sample_size)?;
            let scope = if row.is_some() {
                AgentScope::Single
            } else {
                AgentScope::Multi
            };
            let mut runner =
                AgentRunner::new(vec![RowAgent::new(&id, &id, template).with_scope(scope)]);

            let results = match row {
                Some(index) => {
                    let Some(target) = rows.get(index) else {
                        bail!("row {} is out of range ({} rows)", index, rows.len());
                    };
                    vec![runner.execute(&id, target, Some(Value::Number(index as f64)))?]
                }
                None => runner.execute_batch(&id, &rows)?,
            };

            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                for result in &results {
                    println!("[{}] {}", result.row_id, result.result);
                }
            }
        }

        Commands::Transform {
            file,
            id,
            column,
            template,
            output,
        } => {
            let (rows, schema) = load_table(&file, &cli.columns, config.table.sample_size)?;
            let mut transformer = Transformer::new(vec![Transformation::new(&id, &id, template)]);
            let changes = transformer.transform_column(&id, &rows, Some(column.as_str()))?;

            match output {
                Some(output) => {
                    let export_format = export_format(&format)?;
                    let path = export_path(&output, export_format);
                    let updated = apply_changes(&rows, &changes);
                    let body = export(&updated, &schema.columns, export_format)?;
                    std::fs::write(&path, body)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!("Applied {} changes to {}", changes.len(), path.display());
                }
                None if format == "json" => {
                    println!("{}", serde_json::to_string_pretty(&changes)?);
                }
                None => {
                    for change in &changes {
                        println!(
                            "row {}: {} -> {}",
                            change.row_index, change.old_value, change.new_value
                        );
                    }
                    println!("{} changes", changes.len());
                }
            }
        }

        Commands::Export { file, text, output } => {
            let export_format = export_format(&format)?;

            let (rows, schema) = load_table(&file, &cli.columns, config.table.sample_size)?;
            let outcome = run_query(&rows, &schema, &text);
            let body = export(outcome.rows.iter().copied(), &schema.columns, export_format)?;

            match output {
                Some(output) => {
                    let path = export_path(&output, export_format);
                    std::fs::write(&path, body)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!(
                        "Exported {} rows to {}",
                        outcome.matched_count,
                        path.display()
                    );
                }
                None => println!("{}", body),
            }
        }

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!("Config written to {}", path.display());
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

/// File format for written output; the table view exports as CSV
fn export_format(format: &str) -> anyhow::Result<ExportFormat> {
    match format {
        "table" => Ok(ExportFormat::Csv),
        other => Ok(other.parse::<ExportFormat>()?),
    }
}

/// Load a dataset and build its schema
fn load_table(
    file: &Path,
    columns: &[ColumnDecl],
    sample_size: usize,
) -> anyhow::Result<(Vec<Row>, Schema)> {
    let rows = load_rows(file).with_context(|| format!("failed to load {}", file.display()))?;
    let decls = (!columns.is_empty()).then_some(columns);
    let schema = Schema::build_with_sample_size(&rows, decls, sample_size)
        .context("invalid column declarations")?;

    tracing::debug!(file = %file.display(), rows = rows.len(), "Loaded dataset");
    Ok((rows, schema))
}

fn print_table(columns: &[ColumnSchema], rows: &[&Row]) {
    if rows.is_empty() {
        println!("No matching rows");
        return;
    }

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|c| match row.get(&c.key) {
                    Some(value) if !value.is_null() => value.to_string(),
                    _ => String::new(),
                })
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(c.label.chars().count()))
                .max()
                .unwrap_or(0)
                .min(MAX_CELL_WIDTH)
        })
        .collect();

    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(c, w)| pad(&c.label, *w))
        .collect();
    println!("{}", header.join(" | "));

    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    println!("{}", separator.join("-+-"));

    for row in &cells {
        let line: Vec<String> = row.iter().zip(&widths).map(|(c, w)| pad(c, *w)).collect();
        println!("{}", line.join(" | "));
    }
}

/// Left-align `text` in `width` characters, truncating with an ellipsis
fn pad(text: &str, width: usize) -> String {
    let fitted: String = if text.chars().count() > width {
        text.chars()
            .take(width.saturating_sub(1))
            .chain(std::iter::once('…'))
            .collect()
    } else {
        text.to_string()
    };
    format!("{:<width$}", fitted, width = width)
}
