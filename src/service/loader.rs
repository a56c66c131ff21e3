use super::tabular::CsvTable;
use crate::error::ForecastError;
use crate::models::{MetadataColumns, Snapshot, SnapshotRow, UnifiedRow, UnifiedTable};
use std::io::Read;

/// 解析单周库存 CSV (Item, Quantity 必填; Category, Unit 可选)
///
/// Item 或 Quantity 为空 (含 NaN/NA 等标记) 的行被跳过, 负数量报错。
pub fn parse_snapshot<R: Read>(name: &str, reader: R) -> Result<Snapshot, ForecastError> {
    let table = CsvTable::read(name, reader)?;
    let item_idx = table.require("Item")?;
    let qty_idx = table.require("Quantity")?;
    let category_idx = table.column("Category");
    let unit_idx = table.column("Unit");

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for (row_no, record) in table.rows() {
        let item = CsvTable::text(record, item_idx);
        let quantity = table.number(record, qty_idx, row_no)?;
        let (Some(item), Some(quantity)) = (item, quantity) else {
            skipped += 1;
            continue;
        };
        if quantity < 0.0 {
            return Err(ForecastError::NegativeQuantity {
                table: table.name().to_string(),
                item: item.to_string(),
                row: row_no,
                value: quantity,
            });
        }

        rows.push(SnapshotRow {
            item: item.to_string(),
            quantity,
            category: category_idx
                .and_then(|i| CsvTable::text(record, i))
                .map(str::to_string),
            unit: unit_idx
                .and_then(|i| CsvTable::text(record, i))
                .map(str::to_string),
        });
    }

    if skipped > 0 {
        tracing::warn!("{}: skipped {} rows without Item or Quantity", table.name(), skipped);
    }

    Ok(Snapshot::new(
        MetadataColumns {
            category: category_idx.is_some(),
            unit: unit_idx.is_some(),
        },
        rows,
    ))
}

/// 按顺序拼接快照, 序号即位置 (0 = 最早)
pub fn load_snapshots(snapshots: Vec<Snapshot>) -> Result<UnifiedTable, ForecastError> {
    if snapshots.is_empty() {
        return Err(ForecastError::EmptyInput);
    }

    let mut table = UnifiedTable::default();
    for (idx, snapshot) in snapshots.into_iter().enumerate() {
        table.columns = table.columns.union(snapshot.columns);
        table.rows.extend(snapshot.rows.into_iter().map(|row| UnifiedRow {
            snapshot: idx,
            item: row.item,
            quantity: row.quantity,
            category: row.category,
            unit: row.unit,
        }));
    }

    tracing::debug!("Loaded {} rows from snapshots", table.rows.len());
    Ok(table)
}
