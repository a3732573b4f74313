use crate::process::resolve::{Role, RoleColumns};
use crate::table::Table;
use tracing::debug;

/// Missing cells and zero-length cells count as empty. A cell holding only
/// whitespace is an answer and is kept.
pub fn is_empty_cell(cell: Option<&str>) -> bool {
    cell.map_or(true, str::is_empty)
}

/// Pull column `idx` out of `table` as a one-column table headed `label`,
/// dropping empty cells and keeping the order of the rest.
pub fn extract_column(table: &Table, idx: usize, label: &str) -> Table {
    let rows: Vec<Vec<Option<String>>> = table
        .column(idx)
        .filter(|c| !is_empty_cell(*c))
        .map(|c| vec![c.map(str::to_string)])
        .collect();
    debug!(
        column = idx,
        label,
        kept = rows.len(),
        dropped = table.len() - rows.len(),
        "extracted column"
    );
    Table::new(vec![label.to_string()], rows)
}

/// One single-column table per role, in [`Role::ALL`] order. Each column
/// drops its own empties, so rows are not aligned across the outputs.
pub fn split_roles(table: &Table, columns: &RoleColumns) -> Vec<(Role, Table)> {
    columns
        .iter()
        .map(|(role, col)| (role, extract_column(table, col.index, role.label())))
        .collect()
}
