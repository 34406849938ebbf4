//! Grid CLI - datagrid command
//!
//! Loads rows from a JSON file, applies search, filters, sort and paging
//! through a client-side grid and prints the requested page.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use datagrid_lib::query::{SortKey, Sorting, parse_date};
use datagrid_lib::{DataGrid, GridCallbacks, GridConfig};
use simplelog::{Config, LevelFilter, SimpleLogger, WriteLogger};

mod render;
mod rows;

/// Query a JSON table with search, filters, sorting and paging
#[derive(Parser, Debug)]
#[command(name = "datagrid")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON file holding an array of row objects
    #[arg(long, value_name = "FILE")]
    rows: PathBuf,

    /// Free-text search
    #[arg(long)]
    search: Option<String>,

    /// Restrict search to a column (repeatable; default: all columns)
    #[arg(long = "search-column", value_name = "COL")]
    search_columns: Vec<String>,

    /// Text filter on a column (repeatable)
    #[arg(long, value_name = "COL=VALUE", value_parser = parse_text_filter)]
    filter: Vec<(String, String)>,

    /// Lower date bound for a column, inclusive (repeatable)
    #[arg(long, value_name = "COL=YYYY-MM-DD", value_parser = parse_date_bound)]
    from: Vec<(String, NaiveDate)>,

    /// Upper date bound for a column, inclusive (repeatable)
    #[arg(long, value_name = "COL=YYYY-MM-DD", value_parser = parse_date_bound)]
    to: Vec<(String, NaiveDate)>,

    /// Sort key, primary first (repeatable)
    #[arg(long, value_name = "COL[:asc|desc]")]
    sort: Vec<SortKey>,

    /// Page to show, one-based
    #[arg(long, default_value = "1")]
    page: usize,

    /// Rows per page (default: from config)
    #[arg(long)]
    page_size: Option<usize>,

    /// Hide a column (repeatable)
    #[arg(long, value_name = "COL")]
    hide: Vec<String>,

    /// Grid config file (JSON)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write debug logs to this file instead of warnings to stderr
    #[arg(long, value_name = "FILE")]
    log: Option<PathBuf>,
}

fn split_assignment(value: &str) -> Result<(&str, &str), String> {
    match value.split_once('=') {
        Some((column, rest)) if !column.is_empty() => Ok((column, rest)),
        _ => Err(format!("expected COL=VALUE, got '{value}'")),
    }
}

fn parse_text_filter(value: &str) -> Result<(String, String), String> {
    let (column, text) = split_assignment(value)?;
    Ok((column.to_string(), text.to_string()))
}

fn parse_date_bound(value: &str) -> Result<(String, NaiveDate), String> {
    let (column, date) = split_assignment(value)?;
    let date = parse_date(date).map_err(|e| e.to_string())?;
    Ok((column.to_string(), date))
}

fn init_logging(path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            WriteLogger::init(LevelFilter::Debug, Config::default(), file)?;
        }
        None => SimpleLogger::init(LevelFilter::Warn, Config::default())?,
    }
    Ok(())
}

/// Merges `--from`/`--to` bounds per column.
fn date_ranges(cli: &Cli) -> BTreeMap<&str, (Option<NaiveDate>, Option<NaiveDate>)> {
    let mut ranges: BTreeMap<&str, (Option<NaiveDate>, Option<NaiveDate>)> = BTreeMap::new();
    for (column, date) in &cli.from {
        ranges.entry(column.as_str()).or_default().0 = Some(*date);
    }
    for (column, date) in &cli.to {
        ranges.entry(column.as_str()).or_default().1 = Some(*date);
    }
    ranges
}

fn apply(cli: &Cli, grid: &mut DataGrid<rows::Row>) -> Result<()> {
    for column in &cli.hide {
        grid.model()
            .set_column_visibility(column, false)
            .with_context(|| format!("cannot hide column '{column}'"))?;
    }

    if let Some(text) = &cli.search {
        grid.set_search_text(text.as_str());
    }
    if !cli.search_columns.is_empty() {
        grid.set_search_columns(cli.search_columns.iter().cloned())?;
    }
    for (column, text) in &cli.filter {
        grid.set_text_filter(column, text.as_str())?;
    }
    for (column, (from, to)) in date_ranges(cli) {
        grid.set_date_filter(column, from, to)
            .with_context(|| format!("invalid date range for '{column}'"))?;
    }
    if !cli.sort.is_empty() {
        grid.set_sorting(cli.sort.iter().cloned().collect::<Sorting>())?;
    }
    grid.flush();

    if let Some(page_size) = cli.page_size {
        grid.set_page_size(page_size)?;
    }
    grid.go_to_page(cli.page);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log.as_deref())?;

    let config = match &cli.config {
        Some(path) => GridConfig::load(path)?,
        None => GridConfig::default(),
    };
    let rows = rows::load(&cli.rows)?;

    let mut grid = DataGrid::new(rows::table(&rows), &config, GridCallbacks::new())?;
    grid.set_rows(rows);
    apply(&cli, &mut grid)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    render::write_page(&grid, &mut out)?;
    out.flush()?;

    grid.teardown();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args() {
        let cli = Cli::try_parse_from([
            "datagrid",
            "--rows",
            "rows.json",
            "--filter",
            "status=open",
            "--from",
            "createdAt=2024-01-05",
            "--to",
            "createdAt=2024-01-10",
            "--sort",
            "name:desc",
            "--sort",
            "id",
        ])
        .unwrap();

        assert_eq!(cli.filter, vec![("status".to_string(), "open".to_string())]);
        assert_eq!(cli.sort, vec![SortKey::desc("name"), SortKey::asc("id")]);
        let ranges = date_ranges(&cli);
        assert_eq!(
            ranges.get("createdAt"),
            Some(&(
                Some(parse_date("2024-01-05").unwrap()),
                Some(parse_date("2024-01-10").unwrap())
            ))
        );
    }

    #[test]
    fn test_bad_assignment_rejected() {
        assert!(parse_text_filter("=x").is_err());
        assert!(parse_date_bound("createdAt=05/01/2024").is_err());
        assert!(Cli::try_parse_from(["datagrid", "--rows", "r.json", "--sort", "a:up"]).is_err());
    }

    #[tokio::test]
    async fn test_apply_pipeline() {
        let rows = rows::parse(
            r#"[
                {"id": "a", "name": "Ann", "joined": "2024-01-03"},
                {"id": "b", "name": "Ben", "joined": "2024-01-06"},
                {"id": "c", "name": "Cara", "joined": "2024-01-09"},
                {"id": "d", "name": "Dan", "joined": "2024-01-12"}
            ]"#,
        )
        .unwrap();
        let cli = Cli::try_parse_from([
            "datagrid",
            "--rows",
            "rows.json",
            "--from",
            "joined=2024-01-05",
            "--sort",
            "name:desc",
            "--page-size",
            "2",
            "--page",
            "2",
        ])
        .unwrap();

        let mut grid =
            DataGrid::new(rows::table(&rows), &GridConfig::default(), GridCallbacks::new())
                .unwrap();
        grid.set_rows(rows);
        apply(&cli, &mut grid).unwrap();

        let ids: Vec<String> = grid.page_rows().iter().map(rows::Row::id).collect();
        assert_eq!(ids, vec!["b"]);
        assert_eq!(grid.pagination().label(), "Page 2 of 2");
    }
}
