use crate::error::ForecastError;
use crate::models::OrderTable;
use csv::{ReaderBuilder, Writer};
use serde_json::{Map, Number, Value};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// 结果文件名, 位于数据目录下
pub const ORDERS_FILE: &str = "next_week_orders.csv";

/// 将订货表写为 CSV (首行为表头)
pub fn write_orders<W: Write>(table: &OrderTable, writer: W) -> Result<(), ForecastError> {
    let mut writer = Writer::from_writer(writer);
    writer.write_record(table.headers())?;

    for row in &table.rows {
        let cells: Vec<String> = table.values(row).iter().map(cell_to_csv).collect();
        writer.write_record(&cells)?;
    }

    writer.flush()?;
    Ok(())
}

/// 导出订货表到文件
pub fn export_orders(table: &OrderTable, output_path: &Path) -> Result<(), ForecastError> {
    let file = File::create(output_path)?;
    write_orders(table, file)?;
    tracing::info!("Saved {} order recommendations to {}", table.len(), output_path.display());
    Ok(())
}

/// 读回 CSV 为记录列表: 整数、浮点数、空值 (null) 依次尝试, 其余为字符串
pub fn read_records<R: Read>(reader: R) -> Result<Vec<Map<String, Value>>, ForecastError> {
    let mut reader = ReaderBuilder::new().from_reader(reader);
    let headers = reader.headers()?.clone();

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.to_string(), csv_to_value(v)))
            .collect();
        records.push(row);
    }
    Ok(records)
}

/// 读取已保存的结果文件, 不存在时返回 None
pub fn load_orders(path: &Path) -> Result<Option<Vec<Map<String, Value>>>, ForecastError> {
    if !path.exists() {
        return Ok(None);
    }
    let file = File::open(path)?;
    read_records(file).map(Some)
}

fn cell_to_csv(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn csv_to_value(raw: &str) -> Value {
    if raw.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = raw.parse::<i64>() {
        return Value::from(i);
    }
    if let Some(n) = raw.parse::<f64>().ok().and_then(Number::from_f64) {
        return Value::Number(n);
    }
    Value::String(raw.to_string())
}
