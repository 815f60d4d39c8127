//! PostgreSQL implementation of TierSettingsStore.
//!
//! The singleton row is created lazily: an `INSERT ... ON CONFLICT DO NOTHING`
//! runs before every read, so concurrent first readers all see the same row.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::billing::{TierSettings, TIER_SETTINGS_ID};
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::TierSettingsStore;

pub struct PostgresTierSettingsStore {
    pool: PgPool,
}

impl PostgresTierSettingsStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TierSettingsRow {
    currency: String,
    basic_price: i64,
    pro_price: i64,
    basic_plan_id: Option<String>,
    pro_plan_id: Option<String>,
}

impl From<TierSettingsRow> for TierSettings {
    fn from(row: TierSettingsRow) -> Self {
        TierSettings {
            currency: row.currency,
            basic_price: row.basic_price,
            pro_price: row.pro_price,
            basic_plan_id: row.basic_plan_id,
            pro_plan_id: row.pro_plan_id,
        }
    }
}

#[async_trait]
impl TierSettingsStore for PostgresTierSettingsStore {
    async fn get_or_create(&self) -> Result<TierSettings, DomainError> {
        let defaults = TierSettings::default();

        sqlx::query(
            r#"
            INSERT INTO tier_settings (id, currency, basic_price, pro_price)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(TIER_SETTINGS_ID)
        .bind(&defaults.currency)
        .bind(defaults.basic_price)
        .bind(defaults.pro_price)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to create tier settings: {}", e),
            )
        })?;

        let row: TierSettingsRow = sqlx::query_as(
            r#"
            SELECT currency, basic_price, pro_price, basic_plan_id, pro_plan_id
            FROM tier_settings WHERE id = $1
            "#,
        )
        .bind(TIER_SETTINGS_ID)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to load tier settings: {}", e),
            )
        })?;

        Ok(row.into())
    }
}
