use std::error::Error;

use duckdb::{AccessMode, Config, Connection};
use itertools::Itertools;
use jiff::civil::Date;
use jiff::ToSpan;
use log::info;

use crate::series::{EconSeries, SeriesObservation, SeriesTable};

// DuckDB returns DATE columns as days since 1970-01-01; jiff's civil day
// zero is 0000-01-01, 719528 days earlier.
const EPOCH_DAYS: i32 = 719_528;

/// The DuckDB archive holding one table per indicator.
pub struct SeriesArchive {
    pub duckdb_path: String,
}

impl SeriesArchive {
    pub fn open(&self) -> Result<Connection, duckdb::Error> {
        Connection::open(&self.duckdb_path)
    }

    pub fn open_read_only(&self) -> Result<Connection, duckdb::Error> {
        let config = Config::default().access_mode(AccessMode::ReadOnly)?;
        Connection::open_with_flags(&self.duckdb_path, config)
    }

    /// Drop and recreate the destination table with the rows of `table`.
    /// Full replace on every invocation, no upsert, no merge.
    pub fn replace_table(
        &self,
        conn: &Connection,
        table: &SeriesTable,
    ) -> Result<usize, Box<dyn Error>> {
        let name = table.series.table_name();
        let mut sql = format!(
            r#"
DROP TABLE IF EXISTS {name};
CREATE TABLE {name} (
    date DATE NOT NULL,
    value VARCHAR NOT NULL
);
"#
        );
        if !table.is_empty() {
            let values = table
                .iter()
                .map(|r| format!("('{}', '{}')", r.date, r.value.replace('\'', "''")))
                .join(",\n    ");
            sql.push_str(&format!("INSERT INTO {} VALUES\n    {};\n", name, values));
        }
        conn.execute_batch(&sql)?;
        info!("inserted {} rows into {}", table.len(), name);
        Ok(table.len())
    }

    /// Read a series table back, most recent observation first.
    pub fn get_table(
        &self,
        conn: &Connection,
        series: EconSeries,
    ) -> Result<SeriesTable, Box<dyn Error>> {
        let query = format!(
            "SELECT date, value FROM {} ORDER BY date DESC;",
            series.table_name()
        );
        let mut stmt = conn.prepare(&query)?;
        let rows_iter = stmt.query_map([], |row| {
            let n = EPOCH_DAYS + row.get::<usize, i32>(0)?;
            Ok(SeriesObservation {
                date: Date::ZERO.checked_add(n.days()).unwrap(),
                value: row.get::<usize, String>(1)?,
            })
        })?;
        let mut rows: Vec<SeriesObservation> = Vec::new();
        for row in rows_iter {
            rows.push(row?);
        }
        Ok(SeriesTable::from_observations(series, rows))
    }

    pub fn row_count(&self, conn: &Connection, series: EconSeries) -> Result<usize, Box<dyn Error>> {
        let n: i64 = conn.query_row(
            &format!("SELECT count(*) FROM {};", series.table_name()),
            [],
            |row| row.get(0),
        )?;
        Ok(n as usize)
    }
}
