use super::cycles::CycleRepository;
use crate::error::RepositoryError;
use crate::models::{Cycle, NewCycle};
use async_trait::async_trait;
use futures::TryStreamExt;
use sqlx::PgPool;

/// 建表 (不存在时)
pub async fn init_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS cycles (
            id BIGSERIAL PRIMARY KEY,
            date VARCHAR(50) NOT NULL,
            symptoms TEXT,
            notes TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// 插入一条周期记录
pub async fn insert_cycle(pool: &PgPool, input: &NewCycle) -> Result<Cycle, sqlx::Error> {
    sqlx::query_as::<_, Cycle>(
        r#"
        INSERT INTO cycles (date, symptoms, notes)
        VALUES ($1, $2, $3)
        RETURNING id, date, symptoms, notes
        "#,
    )
    .bind(&input.date)
    .bind(&input.symptoms)
    .bind(&input.notes)
    .fetch_one(pool)
    .await
}

/// 查询全部记录 (id 倒序)
pub async fn list_cycles(pool: &PgPool) -> Result<Vec<Cycle>, sqlx::Error> {
    sqlx::query_as::<_, Cycle>(
        r#"
        SELECT id, date, symptoms, notes
        FROM cycles
        ORDER BY id DESC
        "#,
    )
    .fetch(pool)
    .try_collect()
    .await
}

/// 删除记录, 返回影响行数
pub async fn delete_cycle(pool: &PgPool, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM cycles WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// PostgreSQL 存储, id 由数据库序列生成
pub struct PgCycleRepository {
    pool: PgPool,
}

impl PgCycleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CycleRepository for PgCycleRepository {
    async fn create(&self, input: NewCycle) -> Result<Cycle, RepositoryError> {
        Ok(insert_cycle(&self.pool, &input).await?)
    }

    async fn list(&self) -> Result<Vec<Cycle>, RepositoryError> {
        Ok(list_cycles(&self.pool).await?)
    }

    async fn delete(&self, id: i64) -> Result<bool, RepositoryError> {
        let affected = delete_cycle(&self.pool, id).await?;
        if affected == 0 {
            tracing::debug!("Cycle {} not found", id);
        }
        Ok(affected > 0)
    }
}
