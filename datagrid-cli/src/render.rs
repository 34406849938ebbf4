//! Plain-text table output.

use std::io::Write;

use datagrid_lib::DataGrid;
use datagrid_lib::query::Direction;

use crate::rows::Row;

/// Writes the current page as an aligned table followed by the page label.
pub fn write_page(grid: &DataGrid<Row>, out: &mut impl Write) -> std::io::Result<()> {
    let columns = grid.visible_columns();
    let rows = grid.page_rows();

    let headers: Vec<String> = columns
        .iter()
        .map(|column| match column.sort {
            Some(Direction::Asc) => format!("{} ^", column.header),
            Some(Direction::Desc) => format!("{} v", column.header),
            None => column.header.clone(),
        })
        .collect();
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|column| {
                    grid.model()
                        .cell(row, &column.id)
                        .map(|value| value.to_string())
                        .unwrap_or_default()
                })
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for line in &cells {
        for (width, cell) in widths.iter_mut().zip(line) {
            *width = (*width).max(cell.chars().count());
        }
    }

    write_line(out, &headers, &widths)?;
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    write_line(out, &rule, &widths)?;
    if cells.is_empty() {
        writeln!(out, "No results.")?;
    }
    for line in &cells {
        write_line(out, line, &widths)?;
    }

    let pagination = grid.pagination();
    writeln!(out)?;
    match pagination.item_range() {
        Some(range) => writeln!(
            out,
            "{}  (rows {}-{} of {})",
            pagination.label(),
            range.start(),
            range.end(),
            pagination.total_items()
        ),
        None => writeln!(out, "{}", pagination.label()),
    }
}

fn write_line(out: &mut impl Write, cells: &[String], widths: &[usize]) -> std::io::Result<()> {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    writeln!(out, "{}", padded.join("  ").trim_end())
}
