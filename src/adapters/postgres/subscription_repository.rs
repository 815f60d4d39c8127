//! PostgreSQL implementation of SubscriptionRepository.
//!
//! Upserts are keyed on the unique `gateway_subscription_id` column, so a
//! redelivered event rewrites the same row instead of inserting a duplicate.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::billing::{
    PaymentStatus, PaymentUpdate, SubscriptionRecord, SubscriptionUpsert, Tier, ACTIVE_STATUS,
};
use crate::domain::foundation::{
    DomainError, ErrorCode, SubscriptionRecordId, Timestamp, UserId,
};
use crate::ports::SubscriptionRepository;

const SELECT_COLUMNS: &str = r#"
    id, gateway_subscription_id, tier, status, user_id, current_period_end,
    last_payment_id, last_payment_order_id, last_payment_status, last_payment_at,
    created_at, updated_at
"#;

/// PostgreSQL implementation of the SubscriptionRepository port.
pub struct PostgresSubscriptionRepository {
    pool: PgPool,
}

impl PostgresSubscriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a subscription.
#[derive(Debug, sqlx::FromRow)]
struct SubscriptionRow {
    id: Uuid,
    gateway_subscription_id: String,
    tier: String,
    status: String,
    user_id: Option<String>,
    current_period_end: Option<DateTime<Utc>>,
    last_payment_id: Option<String>,
    last_payment_order_id: Option<String>,
    last_payment_status: Option<String>,
    last_payment_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<SubscriptionRow> for SubscriptionRecord {
    type Error = DomainError;

    fn try_from(row: SubscriptionRow) -> Result<Self, Self::Error> {
        let owner = row
            .user_id
            .map(UserId::new)
            .transpose()
            .map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid user_id: {}", e))
            })?;

        let last_payment_status = match row.last_payment_status.as_deref() {
            None => None,
            Some(s) => Some(PaymentStatus::parse(s).ok_or_else(|| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Invalid last_payment_status value: {}", s),
                )
            })?),
        };

        Ok(SubscriptionRecord {
            id: SubscriptionRecordId::from_uuid(row.id),
            gateway_subscription_id: row.gateway_subscription_id,
            tier: Tier::parse(&row.tier),
            status: row.status,
            owner,
            current_period_end: row.current_period_end.map(Timestamp::from_datetime),
            last_payment_id: row.last_payment_id,
            last_payment_order_id: row.last_payment_order_id,
            last_payment_status,
            last_payment_at: row.last_payment_at.map(Timestamp::from_datetime),
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("{}: {}", context, e))
}

#[async_trait]
impl SubscriptionRepository for PostgresSubscriptionRepository {
    async fn upsert(&self, upsert: SubscriptionUpsert) -> Result<SubscriptionRecord, DomainError> {
        let now = Timestamp::now();
        let query = format!(
            r#"
            INSERT INTO subscriptions (
                id, gateway_subscription_id, tier, status, user_id,
                current_period_end, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, NULL, $5, $6, $6)
            ON CONFLICT (gateway_subscription_id) DO UPDATE SET
                tier = EXCLUDED.tier,
                status = EXCLUDED.status,
                current_period_end = EXCLUDED.current_period_end,
                updated_at = EXCLUDED.updated_at
            RETURNING {}
            "#,
            SELECT_COLUMNS
        );

        let row: SubscriptionRow = sqlx::query_as(&query)
            .bind(SubscriptionRecordId::new().as_uuid())
            .bind(&upsert.gateway_subscription_id)
            .bind(upsert.tier.as_str())
            .bind(&upsert.status)
            .bind(upsert.current_period_end.map(|t| *t.as_datetime()))
            .bind(now.as_datetime())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to upsert subscription", e))?;

        row.try_into()
    }

    async fn assign_owner(
        &self,
        gateway_subscription_id: &str,
        owner: &UserId,
    ) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE subscriptions SET user_id = $2, updated_at = $3
            WHERE gateway_subscription_id = $1
            "#,
        )
        .bind(gateway_subscription_id)
        .bind(owner.as_str())
        .bind(Timestamp::now().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to assign subscription owner", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::SubscriptionNotFound,
                format!("Subscription not found: {}", gateway_subscription_id),
            ));
        }

        Ok(())
    }

    async fn record_payment(
        &self,
        gateway_subscription_id: &str,
        payment: PaymentUpdate,
    ) -> Result<u64, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE subscriptions SET
                last_payment_id = $2,
                last_payment_order_id = $3,
                last_payment_status = $4,
                last_payment_at = $5,
                status = CASE WHEN $6 THEN $7 ELSE status END,
                user_id = COALESCE($8, user_id),
                updated_at = $9
            WHERE gateway_subscription_id = $1
            "#,
        )
        .bind(gateway_subscription_id)
        .bind(&payment.payment_id)
        .bind(&payment.order_id)
        .bind(payment.status.as_str())
        .bind(payment.paid_at.as_datetime())
        .bind(payment.forces_active())
        .bind(ACTIVE_STATUS)
        .bind(payment.owner.as_ref().map(|o| o.as_str()))
        .bind(Timestamp::now().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to record payment", e))?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> SubscriptionRow {
        SubscriptionRow {
            id: Uuid::new_v4(),
            gateway_subscription_id: "sub_1".to_string(),
            tier: "BASIC".to_string(),
            status: "active".to_string(),
            user_id: None,
            current_period_end: None,
            last_payment_id: None,
            last_payment_order_id: None,
            last_payment_status: None,
            last_payment_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn null_user_id_maps_to_placeholder_owner() {
        let record = SubscriptionRecord::try_from(row()).unwrap();
        assert!(record.has_placeholder_owner());
        assert_eq!(record.tier, Tier::Basic);
    }

    #[test]
    fn payment_status_is_parsed() {
        let record = SubscriptionRecord::try_from(SubscriptionRow {
            last_payment_status: Some("failed".to_string()),
            user_id: Some("user-1".to_string()),
            ..row()
        })
        .unwrap();
        assert_eq!(record.last_payment_status, Some(PaymentStatus::Failed));
        assert_eq!(record.owner.unwrap().as_str(), "user-1");
    }

    #[test]
    fn unknown_payment_status_is_rejected() {
        let result = SubscriptionRecord::try_from(SubscriptionRow {
            last_payment_status: Some("refunded".to_string()),
            ..row()
        });
        assert!(result.is_err());
    }

    #[test]
    fn empty_user_id_is_rejected() {
        let result = SubscriptionRecord::try_from(SubscriptionRow {
            user_id: Some(String::new()),
            ..row()
        });
        assert!(result.is_err());
    }
}
