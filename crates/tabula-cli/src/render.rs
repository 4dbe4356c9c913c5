//! Terminal rendering of table views.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::{ASCII_MARKDOWN, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use tabula_core::{EditMode, Row, SortOrder, View};

use crate::commands::ColumnStatus;

/// How tables are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Box-drawing borders and colors for a terminal. Plain output is a
    /// Markdown table.
    pub styled: bool,
    pub width: u16,
}

impl RenderOptions {
    pub fn plain() -> Self {
        Self {
            styled: false,
            width: 120,
        }
    }

    pub fn styled(width: u16) -> Self {
        Self {
            styled: true,
            width,
        }
    }
}

/// Current page as a table plus a status footer.
pub fn render_view(view: &View, options: RenderOptions) -> String {
    let mut table = Table::new();
    apply_table_style(&mut table, options);
    let mut header = vec![header_cell("id", options)];
    header.extend(
        view.visible_columns
            .iter()
            .map(|column| header_cell(&sort_label(view, column.as_str()), options)),
    );
    table.set_header(header);
    for row in &view.rows {
        table.add_row(row_cells(view, row, options));
    }
    if options.styled {
        align_numeric_columns(&mut table, view);
    }

    let mut out = table.to_string();
    out.push('\n');
    out.push_str(&footer(view));
    out
}

/// Column list with visibility.
pub fn render_columns(columns: &[ColumnStatus], options: RenderOptions) -> String {
    let mut table = Table::new();
    apply_table_style(&mut table, options);
    table.set_header(vec![
        header_cell("Column", options),
        header_cell("Visible", options),
        header_cell("Sort", options),
    ]);
    for status in columns {
        let visible = if status.visible { "yes" } else { "no" };
        let visible = if options.styled {
            let color = if status.visible {
                Color::Green
            } else {
                Color::DarkGrey
            };
            Cell::new(visible).fg(color)
        } else {
            Cell::new(visible)
        };
        let name = if options.styled {
            Cell::new(status.name.as_str())
        } else {
            Cell::new(markdown_text(status.name.as_str()))
        };
        table.add_row(vec![
            name,
            visible,
            Cell::new(status.sort.map_or("-", SortOrder::label)),
        ]);
    }
    table.to_string()
}

fn apply_table_style(table: &mut Table, options: RenderOptions) {
    if options.styled {
        table
            .load_preset(UTF8_FULL_CONDENSED)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_width(options.width)
            .enforce_styling();
    } else {
        table
            .load_preset(ASCII_MARKDOWN)
            .set_content_arrangement(ContentArrangement::Disabled)
            .force_no_tty();
    }
}

fn row_cells(view: &View, row: &Row, options: RenderOptions) -> Vec<Cell> {
    let staged = view.is_staged(row);
    let mut cells = vec![id_cell(row, staged, options)];
    cells.extend(view.visible_columns.iter().map(|column| {
        let value = view.cell(row, column.as_str());
        if options.styled && value.is_empty() {
            Cell::new("-").fg(Color::DarkGrey)
        } else if options.styled && staged {
            Cell::new(value).fg(Color::Yellow)
        } else if options.styled {
            Cell::new(value)
        } else {
            Cell::new(markdown_text(&value))
        }
    }));
    cells
}

fn id_cell(row: &Row, staged: bool, options: RenderOptions) -> Cell {
    match (options.styled, staged) {
        (true, true) => Cell::new(format!("{}*", row.id))
            .fg(Color::Yellow)
            .add_attribute(Attribute::Bold),
        (true, false) => Cell::new(row.id.as_str()).fg(Color::Blue),
        (false, true) => Cell::new(format!("{}*", markdown_text(row.id.as_str()))),
        (false, false) => Cell::new(markdown_text(row.id.as_str())),
    }
}

fn header_cell(label: &str, options: RenderOptions) -> Cell {
    if options.styled {
        Cell::new(label)
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold)
    } else {
        Cell::new(markdown_text(label))
    }
}

/// Keeps a value on one Markdown table row: pipes are escaped and line
/// breaks become spaces.
fn markdown_text(text: &str) -> String {
    text.replace("\r\n", " ")
        .replace(['\r', '\n'], " ")
        .replace('|', "\\|")
}

fn sort_label(view: &View, column: &str) -> String {
    match &view.sort_by {
        Some(sorted) if sorted == column => match view.sort_order {
            SortOrder::Asc => format!("{column} ^"),
            SortOrder::Desc => format!("{column} v"),
        },
        _ => column.to_string(),
    }
}

/// Right-aligns columns whose shown values are all numeric.
fn align_numeric_columns(table: &mut Table, view: &View) {
    if view.rows.is_empty() {
        return;
    }
    for (index, column) in view.visible_columns.iter().enumerate() {
        let numeric = view.rows.iter().all(|row| {
            let value = view.cell(row, column.as_str());
            value.is_empty() || value.trim().parse::<f64>().is_ok()
        });
        if !numeric {
            continue;
        }
        if let Some(table_column) = table.column_mut(index + 1) {
            table_column.set_cell_alignment(CellAlignment::Right);
        }
    }
}

fn footer(view: &View) -> String {
    let mut lines = Vec::new();
    match view.range() {
        Some((first, last)) => lines.push(format!(
            "Showing {first}-{last} of {} rows (page {} of {})",
            view.total_count,
            view.page + 1,
            view.page_count
        )),
        None if view.total_rows == 0 => lines.push("No rows.".to_string()),
        None => lines.push(format!("No rows match \"{}\".", view.search_term)),
    }
    if view.total_count != view.total_rows {
        lines.push(format!(
            "Filtered by \"{}\" from {} rows.",
            view.search_term, view.total_rows
        ));
    }
    if let Some(column) = &view.sort_by {
        lines.push(format!("Sorted by {column} ({}).", view.sort_order.label()));
    }
    match &view.edit_mode {
        EditMode::Idle => {}
        EditMode::Batch => lines.push("Batch edit open.".to_string()),
        EditMode::Row(id) => lines.push(format!("Editing row {id}.")),
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
