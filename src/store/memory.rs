//! In-memory tabular store used by tests and local development.
//!
//! Supports the A1 subset the services actually use: whole-column windows
//! (`A:E`), single cells (`E7`) and single-row rectangles (`D7:E7`).

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Sheet, StoreError, TabularStore};

#[derive(Default)]
pub struct MemoryStore {
    sheets: RwLock<HashMap<Sheet, Vec<Vec<String>>>>,
}

/// One end of an A1 range. `row` is 1-based; `None` means the whole column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CellRef {
    col: usize,
    row: Option<usize>,
}

fn parse_cell_ref(spec: &str) -> Result<CellRef, StoreError> {
    let letters: String = spec.chars().take_while(|c| c.is_ascii_alphabetic()).collect();
    let digits = &spec[letters.len()..];
    if letters.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(StoreError::Range(spec.to_string()));
    }

    let mut col = 0usize;
    for c in letters.chars() {
        col = col * 26 + (c.to_ascii_uppercase() as usize - 'A' as usize + 1);
    }

    let row = if digits.is_empty() {
        None
    } else {
        let n: usize = digits.parse().map_err(|_| StoreError::Range(spec.to_string()))?;
        if n == 0 {
            return Err(StoreError::Range(spec.to_string()));
        }
        Some(n)
    };

    Ok(CellRef { col: col - 1, row })
}

fn parse_range(range: &str) -> Result<(CellRef, CellRef), StoreError> {
    match range.split_once(':') {
        Some((start, end)) => Ok((parse_cell_ref(start)?, parse_cell_ref(end)?)),
        None => {
            let cell = parse_cell_ref(range)?;
            Ok((cell, cell))
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace one tab wholesale, header row included. Test seeding helper.
    pub async fn seed(&self, sheet: Sheet, rows: Vec<Vec<&str>>) {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(str::to_string).collect())
            .collect();
        self.sheets.write().await.insert(sheet, rows);
    }

    /// Raw snapshot of one tab, for assertions in tests.
    pub async fn snapshot(&self, sheet: Sheet) -> Vec<Vec<String>> {
        self.sheets.read().await.get(&sheet).cloned().unwrap_or_default()
    }
}

#[async_trait]
impl TabularStore for MemoryStore {
    async fn get_rows(&self, sheet: Sheet, range: &str) -> Result<Vec<Vec<String>>, StoreError> {
        let (start, end) = parse_range(range)?;
        let sheets = self.sheets.read().await;
        let rows = match sheets.get(&sheet) {
            Some(rows) => rows,
            None => return Ok(Vec::new()),
        };

        let first_row = start.row.map(|r| r - 1).unwrap_or(0);
        let last_row = end.row.map(|r| r - 1).unwrap_or(rows.len().saturating_sub(1));

        let mut out = Vec::new();
        for row in rows.iter().take(last_row + 1).skip(first_row) {
            let mut cells: Vec<String> = (start.col..=end.col)
                .map(|c| row.get(c).cloned().unwrap_or_default())
                .collect();
            // The remote API drops trailing empty cells; match it.
            while cells.last().is_some_and(|c| c.is_empty()) {
                cells.pop();
            }
            out.push(cells);
        }
        // ...and rows that are entirely empty at the tail.
        while out.last().is_some_and(|r| r.is_empty()) {
            out.pop();
        }
        Ok(out)
    }

    async fn append_row(&self, sheet: Sheet, row: Vec<String>) -> Result<(), StoreError> {
        self.sheets.write().await.entry(sheet).or_default().push(row);
        Ok(())
    }

    async fn update_range(
        &self,
        sheet: Sheet,
        range: &str,
        values: Vec<Vec<String>>,
    ) -> Result<(), StoreError> {
        let (start, _end) = parse_range(range)?;
        let row_anchor = start
            .row
            .ok_or_else(|| StoreError::Range(format!("update requires a row anchor: {range}")))?
            - 1;

        let mut sheets = self.sheets.write().await;
        let rows = sheets.entry(sheet).or_default();
        for (dr, incoming) in values.into_iter().enumerate() {
            let target = row_anchor + dr;
            if rows.len() <= target {
                rows.resize(target + 1, Vec::new());
            }
            let row = &mut rows[target];
            for (dc, cell) in incoming.into_iter().enumerate() {
                let col = start.col + dc;
                if row.len() <= col {
                    row.resize(col + 1, String::new());
                }
                row[col] = cell;
            }
        }
        Ok(())
    }
}
