//! Closed days repository

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, Pool, Postgres};
use uuid::Uuid;

use super::ClosedDayStore;
use crate::{
    error::AppResult,
    models::{ClosedDay, ClosedDayType},
};

#[derive(Clone)]
pub struct ClosedDaysRepository {
    pool: Pool<Postgres>,
}

#[derive(FromRow)]
struct ClosedDayRow {
    id: Uuid,
    closed_date: NaiveDate,
    reason: Option<String>,
    closure_type: String,
    created_at: DateTime<Utc>,
}

impl From<ClosedDayRow> for ClosedDay {
    fn from(row: ClosedDayRow) -> Self {
        let closure_type = row.closure_type.parse().unwrap_or_else(|e| {
            tracing::warn!("Closed day {}: {}, reading as holiday", row.id, e);
            ClosedDayType::Holiday
        });
        ClosedDay {
            id: row.id,
            date: row.closed_date,
            reason: row.reason,
            closure_type,
            created_at: row.created_at,
        }
    }
}

impl ClosedDaysRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClosedDayStore for ClosedDaysRepository {
    async fn insert(
        &self,
        date: NaiveDate,
        reason: Option<String>,
        closure_type: ClosedDayType,
    ) -> AppResult<ClosedDay> {
        let row = sqlx::query_as::<_, ClosedDayRow>(
            r#"
            INSERT INTO closed_days (id, closed_date, reason, closure_type)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(date)
        .bind(reason)
        .bind(closure_type.as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn list_between(&self, first: NaiveDate, last: NaiveDate) -> AppResult<Vec<ClosedDay>> {
        let rows = sqlx::query_as::<_, ClosedDayRow>(
            "SELECT * FROM closed_days WHERE closed_date >= $1 AND closed_date <= $2 ORDER BY closed_date",
        )
        .bind(first)
        .bind(last)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(ClosedDay::from).collect())
    }

    async fn list_all(&self) -> AppResult<Vec<ClosedDay>> {
        let rows = sqlx::query_as::<_, ClosedDayRow>(
            "SELECT * FROM closed_days ORDER BY closed_date, created_at",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(ClosedDay::from).collect())
    }
}
