//! Loading rows from JSON.

use std::path::Path;

use anyhow::{Context, Result, bail};
use datagrid_lib::model::{CellValue, ColumnDef, TableModel};
use serde_json::{Map, Value};

/// One record from the input file.
#[derive(Debug, Clone)]
pub struct Row {
    /// Position in the file, one-based.
    pub line: usize,
    pub fields: Map<String, Value>,
}

impl Row {
    /// The `id` field when present, otherwise the row's position.
    pub fn id(&self) -> String {
        match self.fields.get("id") {
            Some(Value::String(id)) => id.clone(),
            Some(Value::Null) | None => self.line.to_string(),
            Some(other) => other.to_string(),
        }
    }
}

/// Parses a JSON array of objects.
pub fn parse(json: &str) -> Result<Vec<Row>> {
    let value: Value = serde_json::from_str(json).context("rows are not valid JSON")?;
    let Value::Array(items) = value else {
        bail!("rows must be a JSON array of objects");
    };
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(fields) => Ok(Row {
                line: index + 1,
                fields,
            }),
            other => bail!("row {} is not an object: {other}", index + 1),
        })
        .collect()
}

pub fn load(path: &Path) -> Result<Vec<Row>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read rows from {}", path.display()))?;
    let rows = parse(&json)?;
    log::info!("Loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// A table whose columns are the keys of the first row.
pub fn table(rows: &[Row]) -> TableModel<Row> {
    let columns = rows
        .first()
        .map(|row| {
            row.fields
                .keys()
                .map(|key| {
                    let field = key.clone();
                    ColumnDef::new(key.clone(), key.clone(), move |row: &Row| {
                        row.fields
                            .get(&field)
                            .map_or(CellValue::Null, CellValue::from_json)
                    })
                })
                .collect()
        })
        .unwrap_or_default();
    TableModel::new(columns, Row::id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rows() {
        let rows = parse(r#"[{"id": 7, "name": "Ann"}, {"name": "Bob"}]"#).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id(), "7");
        assert_eq!(rows[1].id(), "2");
    }

    #[test]
    fn test_parse_rejects_non_objects() {
        assert!(parse(r#"{"id": 1}"#).is_err());
        assert!(parse(r#"[1, 2]"#).is_err());
    }

    #[test]
    fn test_columns_from_first_row() {
        let rows = parse(r#"[{"name": "Ann", "joined": "2024-01-05"}]"#).unwrap();
        let table = table(&rows);
        let ids: Vec<String> = table.columns().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["joined", "name"]);
        assert!(table.cell(&rows[0], "joined").unwrap().as_date().is_some());
    }
}
