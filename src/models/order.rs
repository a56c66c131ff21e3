use super::MetadataColumns;
use serde_json::{Map, Number, Value};

pub const COL_ITEM: &str = "Item";
pub const COL_CATEGORY: &str = "Category";
pub const COL_UNIT: &str = "Unit";
pub const COL_CURRENT_QUANTITY: &str = "Current_Quantity";
pub const COL_AVG_WEEKLY_USAGE: &str = "Avg_Weekly_Usage";
pub const COL_RECOMMENDED: &str = "Recommended_Order_Quantity";
pub const COL_PREDICTED: &str = "Predicted_Quantity";
pub const COL_DEMAND: &str = "Forecasted_Ingredient_Demand";

/// 单个物品的用量统计
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UsageRecord {
    pub current_quantity: f64,
    pub avg_weekly_usage: f64,
}

/// 结果表中的一行
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRow {
    pub item: String,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub current_quantity: f64,
    pub avg_weekly_usage: f64,
    pub recommended_order_quantity: u64,
    pub predicted_quantity: Option<f64>,
    pub forecasted_ingredient_demand: Option<f64>,
}

impl OrderRow {
    pub fn new(item: impl Into<String>, usage: UsageRecord) -> Self {
        Self {
            item: item.into(),
            category: None,
            unit: None,
            current_quantity: usage.current_quantity,
            avg_weekly_usage: usage.avg_weekly_usage,
            recommended_order_quantity: 0,
            predicted_quantity: None,
            forecasted_ingredient_demand: None,
        }
    }
}

/// 下周订货建议表
///
/// 列是否输出由各标志决定, 顺序固定:
/// Item, [Category], [Unit], Current_Quantity, Avg_Weekly_Usage,
/// Recommended_Order_Quantity, [Predicted_Quantity], [Forecasted_Ingredient_Demand]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderTable {
    pub metadata: MetadataColumns,
    pub has_prediction: bool,
    pub has_demand: bool,
    pub rows: Vec<OrderRow>,
}

impl OrderTable {
    pub fn headers(&self) -> Vec<&'static str> {
        let mut headers = vec![COL_ITEM];
        if self.metadata.category {
            headers.push(COL_CATEGORY);
        }
        if self.metadata.unit {
            headers.push(COL_UNIT);
        }
        headers.extend([COL_CURRENT_QUANTITY, COL_AVG_WEEKLY_USAGE, COL_RECOMMENDED]);
        if self.has_prediction {
            headers.push(COL_PREDICTED);
        }
        if self.has_demand {
            headers.push(COL_DEMAND);
        }
        headers
    }

    /// 按表头顺序输出一行的单元格
    pub fn values(&self, row: &OrderRow) -> Vec<Value> {
        let mut values = vec![Value::String(row.item.clone())];
        if self.metadata.category {
            values.push(optional_text(&row.category));
        }
        if self.metadata.unit {
            values.push(optional_text(&row.unit));
        }
        values.push(number(row.current_quantity));
        values.push(number(row.avg_weekly_usage));
        values.push(Value::from(row.recommended_order_quantity));
        if self.has_prediction {
            values.push(row.predicted_quantity.map(number).unwrap_or(Value::Null));
        }
        if self.has_demand {
            values.push(
                row.forecasted_ingredient_demand
                    .map(number)
                    .unwrap_or(Value::Null),
            );
        }
        values
    }

    /// 转为 JSON 记录列表 (records 方向)
    pub fn to_records(&self) -> Vec<Map<String, Value>> {
        let headers = self.headers();
        self.rows
            .iter()
            .map(|row| {
                headers
                    .iter()
                    .map(|h| h.to_string())
                    .zip(self.values(row))
                    .collect()
            })
            .collect()
    }

    pub fn sort_by_item(&mut self) {
        self.rows.sort_by(|a, b| a.item.cmp(&b.item));
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn optional_text(value: &Option<String>) -> Value {
    value.clone().map(Value::String).unwrap_or(Value::Null)
}

// NaN/inf 无法表示为 JSON 数字
fn number(value: f64) -> Value {
    Number::from_f64(value).map(Value::Number).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flour() -> OrderRow {
        let mut row = OrderRow::new(
            "Flour",
            UsageRecord {
                current_quantity: 60.0,
                avg_weekly_usage: 40.0,
            },
        );
        row.unit = Some("kg".to_string());
        row.recommended_order_quantity = 20;
        row
    }

    #[test]
    fn headers_follow_fixed_order() {
        let table = OrderTable {
            metadata: MetadataColumns {
                category: true,
                unit: true,
            },
            has_prediction: true,
            has_demand: true,
            rows: vec![],
        };
        assert_eq!(
            table.headers(),
            vec![
                "Item",
                "Category",
                "Unit",
                "Current_Quantity",
                "Avg_Weekly_Usage",
                "Recommended_Order_Quantity",
                "Predicted_Quantity",
                "Forecasted_Ingredient_Demand",
            ]
        );
    }

    #[test]
    fn records_skip_absent_columns_and_null_missing_cells() {
        let table = OrderTable {
            metadata: MetadataColumns {
                category: true,
                unit: true,
            },
            has_prediction: true,
            has_demand: false,
            rows: vec![flour()],
        };

        let records = table.to_records();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record["Item"], "Flour");
        assert_eq!(record["Category"], Value::Null);
        assert_eq!(record["Unit"], "kg");
        assert_eq!(record["Current_Quantity"], 60.0);
        assert_eq!(record["Recommended_Order_Quantity"], 20);
        assert_eq!(record["Predicted_Quantity"], Value::Null);
        assert!(!record.contains_key("Forecasted_Ingredient_Demand"));
    }

    #[test]
    fn sorts_rows_by_item() {
        let mut table = OrderTable::default();
        for name in ["Sugar", "Eggs", "Flour"] {
            table.rows.push(OrderRow::new(
                name,
                UsageRecord {
                    current_quantity: 0.0,
                    avg_weekly_usage: 0.0,
                },
            ));
        }
        table.sort_by_item();
        let items: Vec<_> = table.rows.iter().map(|r| r.item.as_str()).collect();
        assert_eq!(items, vec!["Eggs", "Flour", "Sugar"]);
    }
}
