//! Row mapping for the tabular store.
//!
//! Column order is the store contract: every record documents the A..-column
//! layout it expects and reads by position. Numeric cells parse leniently —
//! an empty or malformed cell counts as zero, matching what a hand-edited
//! workbook can contain.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Cell accessor: missing cells read as empty.
pub fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map(String::as_str).unwrap_or("")
}

/// Lenient numeric parse: empty or malformed cells count as zero.
pub fn cell_decimal(row: &[String], index: usize) -> Decimal {
    cell(row, index).trim().parse().unwrap_or(Decimal::ZERO)
}

/// Staff roster row. Columns: staff_id, name, email, password, role, status.
#[derive(Debug, Clone)]
pub struct StaffRecord {
    pub staff_id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub status: String,
}

impl StaffRecord {
    pub fn from_row(row: &[String]) -> Self {
        Self {
            staff_id: cell(row, 0).to_string(),
            name: cell(row, 1).to_string(),
            email: cell(row, 2).to_string(),
            password: cell(row, 3).to_string(),
            role: cell(row, 4).to_string(),
            status: cell(row, 5).to_string(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == "Active"
    }
}

/// Material master row. Columns: material_id, name, unit, current_cost,
/// current_stock. `current_cost` is the last-in price; consumption locks it
/// into the log row at write time.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Material {
    #[schema(example = "M01")]
    pub material_id: String,
    #[schema(example = "standard urn")]
    pub name: String,
    #[schema(example = "pc")]
    pub unit: String,
    #[schema(example = "100")]
    pub current_cost: Decimal,
    #[schema(example = "50")]
    pub current_stock: Decimal,
}

impl Material {
    pub fn from_row(row: &[String]) -> Self {
        Self {
            material_id: cell(row, 0).to_string(),
            name: cell(row, 1).to_string(),
            unit: cell(row, 2).to_string(),
            current_cost: cell_decimal(row, 3),
            current_stock: cell_decimal(row, 4),
        }
    }

    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.material_id.clone(),
            self.name.clone(),
            self.unit.clone(),
            self.current_cost.to_string(),
            self.current_stock.to_string(),
        ]
    }
}
