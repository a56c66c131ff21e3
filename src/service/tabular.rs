use crate::error::ForecastError;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::io::Read;

/// 按缺失值处理的单元格文本 (与 pandas read_csv 默认 na_values 一致)
const NA_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// 已读入内存的 CSV 表, 按列名取值
pub(crate) struct CsvTable {
    name: String,
    headers: StringRecord,
    records: Vec<StringRecord>,
}

impl CsvTable {
    pub fn read<R: Read>(name: &str, reader: R) -> Result<Self, ForecastError> {
        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);
        let headers = reader.headers()?.clone();
        let records = reader.records().collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            name: name.to_string(),
            headers,
            records,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == column)
    }

    pub fn require(&self, column: &str) -> Result<usize, ForecastError> {
        self.column(column).ok_or_else(|| ForecastError::MissingColumn {
            table: self.name.clone(),
            column: column.to_string(),
        })
    }

    /// (数据行号, 记录), 行号从 1 开始
    pub fn rows(&self) -> impl Iterator<Item = (usize, &StringRecord)> {
        self.records.iter().enumerate().map(|(i, r)| (i + 1, r))
    }

    /// 空单元格与 NA 标记视为 null
    pub fn text(record: &StringRecord, idx: usize) -> Option<&str> {
        record
            .get(idx)
            .filter(|v| !v.is_empty() && !NA_TOKENS.contains(v))
    }

    pub fn number(
        &self,
        record: &StringRecord,
        idx: usize,
        row: usize,
    ) -> Result<Option<f64>, ForecastError> {
        let Some(raw) = Self::text(record, idx) else {
            return Ok(None);
        };
        match raw.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Some(value)),
            _ => Err(ForecastError::InvalidNumber {
                table: self.name.clone(),
                column: self.column_name(idx),
                row,
                value: raw.to_string(),
            }),
        }
    }

    pub fn column_name(&self, idx: usize) -> String {
        self.headers.get(idx).unwrap_or_default().to_string()
    }
}
