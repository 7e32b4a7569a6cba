//! Per-table counters of a migration run

use crate::dataset::Table;

/// What happened to one table during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableReport {
    pub table: Table,
    pub batches: usize,
    pub read: u64,
    pub inserted: u64,
}

impl TableReport {
    pub fn new(table: Table) -> Self {
        Self {
            table,
            batches: 0,
            read: 0,
            inserted: 0,
        }
    }

    /// Account for one written batch
    pub fn record(&mut self, read: usize, inserted: u64) {
        self.batches += 1;
        self.read += read as u64;
        self.inserted += inserted;
    }

    /// Rows that were already present on the target
    pub fn skipped(&self) -> u64 {
        self.read.saturating_sub(self.inserted)
    }
}

/// Summary of a successful run, tables in load order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    tables: Vec<TableReport>,
}

impl MigrationReport {
    pub fn push(&mut self, table: TableReport) {
        self.tables.push(table);
    }

    pub fn tables(&self) -> &[TableReport] {
        &self.tables
    }

    pub fn table(&self, table: Table) -> Option<&TableReport> {
        self.tables.iter().find(|t| t.table == table)
    }

    pub fn total_read(&self) -> u64 {
        self.tables.iter().map(|t| t.read).sum()
    }

    pub fn total_inserted(&self) -> u64 {
        self.tables.iter().map(|t| t.inserted).sum()
    }

    pub fn total_skipped(&self) -> u64 {
        self.tables.iter().map(TableReport::skipped).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let mut genres = TableReport::new(Table::Genre);
        genres.record(50, 50);
        genres.record(20, 5);

        let mut report = MigrationReport::default();
        report.push(genres);

        let genres = report.table(Table::Genre).unwrap();
        assert_eq!(genres.batches, 2);
        assert_eq!(genres.read, 70);
        assert_eq!(genres.inserted, 55);
        assert_eq!(genres.skipped(), 15);
        assert_eq!(report.total_skipped(), 15);
        assert!(report.table(Table::Person).is_none());
    }
}
