//! Reporting service for the inventory overview and CSV export

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use shared::{Good, InventoryReport, StockLevel};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};

/// One line of the stock sheet
#[derive(Debug, Clone, Serialize)]
pub struct StockSheetRow {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub stock_value: Decimal,
    pub stock_level: StockLevel,
}

impl From<&Good> for StockSheetRow {
    fn from(good: &Good) -> Self {
        Self {
            id: good.id,
            name: good.name.clone(),
            category: good.category.clone(),
            quantity: good.quantity,
            unit_price: good.unit_price,
            stock_value: good.stock_value(),
            stock_level: good.stock_level(),
        }
    }
}

/// Reporting service
#[derive(Clone)]
pub struct ReportingService {
    db: PgPool,
}

impl ReportingService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    async fn goods(&self) -> AppResult<Vec<Good>> {
        let goods = sqlx::query_as::<_, Good>(
            r#"
            SELECT id, name, quantity, unit_price, category, supplier_id,
                   low_stock_threshold, high_stock_threshold, created_at
            FROM goods
            ORDER BY id
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(goods)
    }

    /// Stock totals, threshold alerts and per-category quantities
    pub async fn inventory_report(&self) -> AppResult<InventoryReport> {
        let goods = self.goods().await?;
        Ok(InventoryReport::from_goods(&goods))
    }

    /// Every good with its stock value and level, as CSV
    pub async fn stock_sheet_csv(&self) -> AppResult<String> {
        let rows: Vec<StockSheetRow> = self.goods().await?.iter().map(StockSheetRow::from).collect();
        Self::export_to_csv(&rows)
    }

    /// Serialize rows to CSV with a header line taken from the field names
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record)
                .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))
    }

    /// Attachment name for the stock sheet, e.g. `shelfie_stock_2024-05-20.csv`
    pub fn stock_sheet_filename(date: NaiveDate) -> String {
        format!("shelfie_stock_{}.csv", date.format("%Y-%m-%d"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[derive(Serialize)]
    struct Row {
        name: &'static str,
        quantity: i32,
        unit_price: Decimal,
        supplier_id: Option<i64>,
    }

    #[test]
    fn test_export_to_csv_writes_header_and_rows() {
        let rows = vec![
            Row {
                name: "Widget",
                quantity: 10,
                unit_price: Decimal::new(550, 2),
                supplier_id: Some(2),
            },
            Row {
                name: "Gadget, large",
                quantity: 0,
                unit_price: Decimal::ZERO,
                supplier_id: None,
            },
        ];

        let csv = ReportingService::export_to_csv(&rows).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "name,quantity,unit_price,supplier_id");
        assert_eq!(lines[1], "Widget,10,5.50,2");
        assert_eq!(lines[2], "\"Gadget, large\",0,0,");
    }

    #[test]
    fn test_stock_sheet_rows() {
        let good = Good {
            id: 4,
            name: "Widget".to_string(),
            quantity: 3,
            unit_price: Decimal::new(250, 2),
            category: "Tools".to_string(),
            supplier_id: None,
            low_stock_threshold: 5,
            high_stock_threshold: 50,
            created_at: chrono::Utc::now(),
        };

        let csv = ReportingService::export_to_csv(&[StockSheetRow::from(&good)]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "id,name,category,quantity,unit_price,stock_value,stock_level"
        );
        assert_eq!(lines[1], "4,Widget,Tools,3,2.50,7.50,low");
    }

    #[test]
    fn test_stock_sheet_filename() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        assert_eq!(
            ReportingService::stock_sheet_filename(date),
            "shelfie_stock_2024-05-02.csv"
        );
    }
}
