/// 快照中的一行库存记录
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotRow {
    pub item: String,
    pub quantity: f64,
    pub category: Option<String>,
    pub unit: Option<String>,
}

impl SnapshotRow {
    pub fn new(item: impl Into<String>, quantity: f64) -> Self {
        Self {
            item: item.into(),
            quantity,
            category: None,
            unit: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }
}

/// 元数据列是否出现在表头中
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetadataColumns {
    pub category: bool,
    pub unit: bool,
}

impl MetadataColumns {
    pub fn union(self, other: Self) -> Self {
        Self {
            category: self.category || other.category,
            unit: self.unit || other.unit,
        }
    }
}

/// 单周库存快照
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub columns: MetadataColumns,
    pub rows: Vec<SnapshotRow>,
}

impl Snapshot {
    pub fn new(columns: MetadataColumns, rows: Vec<SnapshotRow>) -> Self {
        Self { columns, rows }
    }
}

/// 合并后的行, 带来源快照序号 (0 = 最早)
#[derive(Debug, Clone, PartialEq)]
pub struct UnifiedRow {
    pub snapshot: usize,
    pub item: String,
    pub quantity: f64,
    pub category: Option<String>,
    pub unit: Option<String>,
}

/// 所有快照拼接后的统一表
#[derive(Debug, Clone, Default)]
pub struct UnifiedTable {
    pub columns: MetadataColumns,
    pub rows: Vec<UnifiedRow>,
}

impl UnifiedTable {
    /// 实际出现过的快照序号, 升序去重
    pub fn snapshot_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self.rows.iter().map(|r| r.snapshot).collect();
        indices.sort_unstable();
        indices.dedup();
        indices
    }

    pub fn latest_index(&self) -> Option<usize> {
        self.rows.iter().map(|r| r.snapshot).max()
    }

    pub fn rows_at(&self, snapshot: usize) -> impl Iterator<Item = &UnifiedRow> {
        self.rows.iter().filter(move |r| r.snapshot == snapshot)
    }
}
