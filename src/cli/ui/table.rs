use std::fmt::{self, Display, Formatter};

use tabled::{builder::Builder, settings::Style as TableStyle};

use super::painter::Painter;

/// A rounded two-column table of muted field names and their values.
#[derive(Debug)]
pub(crate) struct Table {
    rows: Vec<[String; 2]>,
}

impl Table {
    pub(crate) fn key_value(painter: &Painter, rows: Vec<(&str, String)>) -> Self {
        let rows = rows
            .into_iter()
            .map(|(field, value)| [painter.muted(field), value])
            .collect();
        Self { rows }
    }
}

impl Display for Table {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut builder = Builder::default();
        builder.push_record(["field", "value"]);
        for row in &self.rows {
            builder.push_record(row.iter().cloned());
        }
        let mut table = builder.build();
        table.with(TableStyle::rounded());
        write!(f, "{table}")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn key_value_table_keeps_row_order_under_a_header() {
        let painter = Painter::new(false);
        let table = Table::key_value(
            &painter,
            vec![("power", "on".into()), ("brightness", "100%".into())],
        )
        .to_string();

        let cells: Vec<Vec<&str>> = table
            .lines()
            .filter(|line| line.starts_with('│'))
            .map(|line| {
                line.split('│')
                    .map(str::trim)
                    .filter(|cell| !cell.is_empty())
                    .collect()
            })
            .collect();
        assert_eq!(
            vec![
                vec!["field", "value"],
                vec!["power", "on"],
                vec!["brightness", "100%"],
            ],
            cells
        );
        assert!(table.starts_with('╭'));
    }
}
