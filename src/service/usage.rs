use crate::models::{MetadataColumns, OrderRow, OrderTable, UnifiedTable, UsageRecord};
use std::collections::{BTreeMap, HashMap};

/// 物品 × 快照 数量矩阵 (已前向填充, 前导缺失补 0)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuantityMatrix {
    /// 列: 出现过的快照序号, 升序
    pub indices: Vec<usize>,
    /// 行: 物品 -> 各列数量
    pub items: BTreeMap<String, Vec<f64>>,
}

impl QuantityMatrix {
    pub fn from_table(table: &UnifiedTable) -> Self {
        let indices = table.snapshot_indices();
        let column_of: HashMap<usize, usize> =
            indices.iter().enumerate().map(|(col, &idx)| (idx, col)).collect();

        let mut cells: BTreeMap<String, Vec<Option<f64>>> = BTreeMap::new();
        for row in &table.rows {
            let col = column_of[&row.snapshot];
            let slots = cells
                .entry(row.item.clone())
                .or_insert_with(|| vec![None; indices.len()]);
            // 同一快照重复出现时保留第一条
            if slots[col].is_none() {
                slots[col] = Some(row.quantity);
            }
        }

        let items = cells
            .into_iter()
            .map(|(item, slots)| {
                let mut last = None;
                let filled = slots
                    .into_iter()
                    .map(|cell| {
                        if cell.is_some() {
                            last = cell;
                        }
                        last.unwrap_or(0.0)
                    })
                    .collect();
                (item, filled)
            })
            .collect();

        Self { indices, items }
    }

    pub fn periods(&self) -> usize {
        self.indices.len().saturating_sub(1)
    }
}

/// 计算每个物品的当前库存与平均每期用量
///
/// 只有库存下降计入用量, 补货 (上升) 记为 0。
/// 只有一个快照时没有周期, 平均用量为 0。
pub fn compute_usage(matrix: &QuantityMatrix) -> BTreeMap<String, UsageRecord> {
    let periods = matrix.periods();

    matrix
        .items
        .iter()
        .map(|(item, quantities)| {
            let total_usage: f64 = quantities
                .windows(2)
                .map(|w| (w[0] - w[1]).max(0.0))
                .sum();
            let avg_weekly_usage = if periods == 0 {
                total_usage
            } else {
                total_usage / periods as f64
            };
            let current_quantity = quantities.last().copied().unwrap_or(0.0);

            (
                item.clone(),
                UsageRecord {
                    current_quantity,
                    avg_weekly_usage,
                },
            )
        })
        .collect()
}

/// 从最新快照左连接 Category / Unit
pub fn attach_metadata(
    usage: &BTreeMap<String, UsageRecord>,
    table: &UnifiedTable,
) -> OrderTable {
    let mut metadata: HashMap<&str, (Option<&String>, Option<&String>)> = HashMap::new();
    if let Some(latest) = table.latest_index() {
        for row in table.rows_at(latest) {
            metadata
                .entry(row.item.as_str())
                .or_insert((row.category.as_ref(), row.unit.as_ref()));
        }
    }

    let columns: MetadataColumns = table.columns;
    let rows = usage
        .iter()
        .map(|(item, record)| {
            let mut row = OrderRow::new(item.clone(), *record);
            if let Some((category, unit)) = metadata.get(item.as_str()) {
                if columns.category {
                    row.category = category.cloned();
                }
                if columns.unit {
                    row.unit = unit.cloned();
                }
            }
            row
        })
        .collect();

    OrderTable {
        metadata: columns,
        has_prediction: false,
        has_demand: false,
        rows,
    }
}

/// 目标库存为两期平均用量: needed = 2 * avg - current, 向上取整, 不足 0 时为 0
pub fn reorder_quantity(current_quantity: f64, avg_weekly_usage: f64) -> u64 {
    let current = if current_quantity.is_nan() { 0.0 } else { current_quantity };
    let avg = if avg_weekly_usage.is_nan() { 0.0 } else { avg_weekly_usage };
    let needed = 2.0 * avg - current;
    if needed > 0.0 {
        needed.ceil() as u64
    } else {
        0
    }
}

pub fn compute_reorder(mut table: OrderTable) -> OrderTable {
    for row in &mut table.rows {
        row.recommended_order_quantity = reorder_quantity(row.current_quantity, row.avg_weekly_usage);
    }
    table
}
