use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// 新建周期记录的请求体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCycle {
    pub date: String,
    #[serde(default)]
    pub symptoms: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// 周期记录 (cycles 表)
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Cycle {
    pub id: i64,
    pub date: String,
    pub symptoms: Option<String>,
    pub notes: Option<String>,
}

impl Cycle {
    pub fn from_new(id: i64, input: NewCycle) -> Self {
        Self {
            id,
            date: input.date,
            symptoms: input.symptoms,
            notes: input.notes,
        }
    }
}
