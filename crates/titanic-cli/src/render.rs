//! Terminal tables for command output.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use titanic_model::{Field, FieldKind, Passenger, Projection};
use titanic_store::FareHistogram;

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(160);
}

/// One row per passenger, one column per field.
pub fn passengers_table(passengers: &[Passenger]) -> Table {
    let mut table = Table::new();
    table.set_header(Field::ALL.iter().map(|field| header_cell(field.name())));
    apply_table_style(&mut table);
    for (idx, field) in Field::ALL.iter().enumerate() {
        if field.kind() != FieldKind::Text {
            align_column(&mut table, idx, CellAlignment::Right);
        }
    }
    for passenger in passengers {
        table.add_row(Field::ALL.iter().map(|&field| value_cell(passenger, field)));
    }
    table
}

/// Attribute/value pairs for the projected fields of one passenger.
pub fn passenger_table(passenger: &Passenger, projection: &Projection) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Attribute"), header_cell("Value")]);
    apply_table_style(&mut table);
    for &field in projection.fields() {
        table.add_row(vec![Cell::new(field.name()), value_cell(passenger, field)]);
    }
    table
}

pub fn histogram_table(histogram: &FareHistogram) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Percentile"),
        header_cell("Fare ≤"),
        header_cell("Count"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for bucket in histogram.buckets() {
        let count = if bucket.count == 0 {
            dim_cell(bucket.count)
        } else {
            Cell::new(bucket.count)
        };
        table.add_row(vec![
            Cell::new(&bucket.label),
            Cell::new(format!("{:.4}", bucket.boundary)),
            count,
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(histogram.total()).add_attribute(Attribute::Bold),
    ]);
    table
}

fn value_cell(passenger: &Passenger, field: Field) -> Cell {
    let value = passenger.get(field).to_string();
    if field.is_nullable() && value.is_empty() {
        dim_cell("-")
    } else {
        Cell::new(value)
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(table: &mut Table) -> String {
        table.force_no_tty();
        table.to_string()
    }

    #[test]
    fn passengers_table_has_header_and_rows() {
        let passenger = Passenger {
            passenger_id: 1,
            name: "Braund, Mr. Owen Harris".to_string(),
            fare: 7.25,
            ..Passenger::default()
        };
        let mut table = passengers_table(&[passenger]);
        let rendered = plain(&mut table);
        assert!(rendered.contains("PassengerId"));
        assert!(rendered.contains("Embarked"));
        assert!(rendered.contains("7.25"));
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn passenger_table_lists_projected_fields_only() {
        let passenger = Passenger {
            name: "Moran, Mr. James".to_string(),
            ..Passenger::default()
        };
        let projection = Projection::parse(["Name", "Cabin"]).unwrap();
        let mut table = passenger_table(&passenger, &projection);
        let rendered = plain(&mut table);
        assert!(rendered.contains("Moran, Mr. James"));
        assert!(rendered.contains("Cabin"));
        assert!(!rendered.contains("Ticket"));
        assert_eq!(table.row_count(), 2);
    }
}
