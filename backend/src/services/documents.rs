//! Spreadsheet import and export
//!
//! An import reads the first sheet of the uploaded workbook, picks the target
//! table from that sheet's name and writes every row in one transaction.

use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use shared::import::{normalize_sheet, ImportBatch, SheetKind};
use shared::{validate_new_good, validate_new_party, FieldError, GoodDefaults, ListQuery};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::services::workbook::{read_workbook, write_workbook, SheetRecord};
use crate::services::{ExpenseService, GoodsService, PartyService};

/// Tables that can be exported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportTable {
    Goods,
    Expenses,
    Suppliers,
    Customers,
}

impl ExportTable {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportTable::Goods => "goods",
            ExportTable::Expenses => "expenses",
            ExportTable::Suppliers => "suppliers",
            ExportTable::Customers => "customers",
        }
    }
}

impl FromStr for ExportTable {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "goods" => Ok(ExportTable::Goods),
            "expenses" => Ok(ExportTable::Expenses),
            "suppliers" => Ok(ExportTable::Suppliers),
            "customers" => Ok(ExportTable::Customers),
            _ => Err(AppError::validation(
                "table",
                format!("Unknown table '{}'", s),
            )),
        }
    }
}

/// Outcome of an import
#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    pub table: String,
    pub imported: usize,
}

/// A rendered workbook attachment
#[derive(Debug, Clone)]
pub struct WorkbookExport {
    pub filename: String,
    pub content: Vec<u8>,
}

/// Attachment name for an exported table, e.g. `shelfie_goods_2024-05-20.xlsx`
pub fn export_filename(table: ExportTable, date: NaiveDate) -> String {
    format!("shelfie_{}_{}.xlsx", table.as_str(), date.format("%Y-%m-%d"))
}

#[derive(Clone)]
pub struct DocumentService {
    db: PgPool,
    defaults: GoodDefaults,
}

impl DocumentService {
    pub fn new(db: PgPool, defaults: GoodDefaults) -> Self {
        Self { db, defaults }
    }

    // ========================================================================
    // Import
    // ========================================================================

    /// Import the first sheet of a workbook into the table its name points at
    pub async fn import(&self, bytes: &[u8]) -> AppResult<ImportSummary> {
        let sheet = read_workbook(bytes)?;
        let kind = SheetKind::detect(&sheet.name)?;
        let batch = normalize_sheet(kind, &sheet.rows, &self.defaults)?;
        validate_batch(&batch)?;

        let mut tx = self.db.begin().await?;

        match &batch {
            ImportBatch::Goods(goods) => {
                for good in goods {
                    sqlx::query(
                        r#"
                        INSERT INTO goods (name, quantity, unit_price, category, supplier_id,
                                           low_stock_threshold, high_stock_threshold)
                        VALUES ($1, $2, $3, $4, $5, $6, $7)
                        "#,
                    )
                    .bind(&good.name)
                    .bind(good.quantity)
                    .bind(good.unit_price)
                    .bind(&good.category)
                    .bind(good.supplier_id)
                    .bind(good.low_stock_threshold)
                    .bind(good.high_stock_threshold)
                    .execute(&mut *tx)
                    .await?;
                }
            }
            ImportBatch::Parties(party_kind, parties) => {
                let sql = format!(
                    "INSERT INTO {} (name, contact, email, address) VALUES ($1, $2, $3, $4)",
                    party_kind.table()
                );
                for party in parties {
                    sqlx::query(&sql)
                        .bind(&party.name)
                        .bind(&party.contact)
                        .bind(&party.email)
                        .bind(&party.address)
                        .execute(&mut *tx)
                        .await?;
                }
            }
        }

        tx.commit().await?;

        tracing::info!(
            sheet = %sheet.name,
            table = kind.table(),
            rows = batch.len(),
            "Sheet imported"
        );

        Ok(ImportSummary {
            table: kind.table().to_string(),
            imported: batch.len(),
        })
    }

    // ========================================================================
    // Export
    // ========================================================================

    /// Render a whole table as a dated single-sheet workbook
    pub async fn export(&self, table: ExportTable) -> AppResult<WorkbookExport> {
        let content = match table {
            ExportTable::Goods => {
                let goods = GoodsService::new(self.db.clone(), self.defaults.clone())
                    .all()
                    .await?;
                non_empty(table, &goods)?
            }
            ExportTable::Expenses => {
                let expenses = ExpenseService::new(self.db.clone()).export_rows().await?;
                non_empty(table, &expenses)?
            }
            ExportTable::Suppliers => {
                let suppliers = PartyService::suppliers(self.db.clone())
                    .list(&ListQuery::default())
                    .await?;
                non_empty(table, &suppliers)?
            }
            ExportTable::Customers => {
                let customers = PartyService::customers(self.db.clone())
                    .list(&ListQuery::default())
                    .await?;
                non_empty(table, &customers)?
            }
        };

        Ok(WorkbookExport {
            filename: export_filename(table, Utc::now().date_naive()),
            content,
        })
    }
}

fn non_empty<T: SheetRecord>(table: ExportTable, rows: &[T]) -> AppResult<Vec<u8>> {
    if rows.is_empty() {
        return Err(AppError::NoData(format!(
            "No data found in {} table",
            table.as_str()
        )));
    }
    write_workbook(table.as_str(), rows)
}

fn validate_batch(batch: &ImportBatch) -> AppResult<()> {
    let with_row = |index: usize, err: FieldError| {
        AppError::validation(err.field, format!("Row {}: {}", index + 1, err.message))
    };

    match batch {
        ImportBatch::Goods(goods) => goods
            .iter()
            .enumerate()
            .try_for_each(|(i, good)| validate_new_good(good).map_err(|e| with_row(i, e))),
        ImportBatch::Parties(_, parties) => parties
            .iter()
            .enumerate()
            .try_for_each(|(i, party)| validate_new_party(party).map_err(|e| with_row(i, e))),
    }
}
