//! PostgreSQL implementation of UserRepository.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::billing::{BillingUser, Tier};
use crate::domain::foundation::{DomainError, ErrorCode, Role, UserId};
use crate::ports::UserRepository;

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: String,
    email: String,
    role: String,
    tier: String,
}

impl TryFrom<UserRow> for BillingUser {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let id = UserId::new(row.id).map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid user id: {}", e))
        })?;
        Ok(BillingUser {
            id,
            email: row.email,
            role: Role::parse(&row.role),
            tier: Tier::parse(&row.tier),
        })
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<BillingUser>, DomainError> {
        let row: Option<UserRow> =
            sqlx::query_as("SELECT id, email, role, tier FROM users WHERE email = $1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::new(
                        ErrorCode::DatabaseError,
                        format!("Failed to find user: {}", e),
                    )
                })?;

        row.map(BillingUser::try_from).transpose()
    }

    async fn update_tier(&self, user_id: &UserId, tier: Tier) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE users SET tier = $2, updated_at = NOW() WHERE id = $1")
            .bind(user_id.as_str())
            .bind(tier.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to update user tier: {}", e),
                )
            })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::UserNotFound,
                format!("User not found: {}", user_id),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_maps_role_and_tier_case_insensitively() {
        let user = BillingUser::try_from(UserRow {
            id: "user-1".to_string(),
            email: "a@x.com".to_string(),
            role: "admin".to_string(),
            tier: "pro".to_string(),
        })
        .unwrap();

        assert_eq!(user.role, Role::Admin);
        assert_eq!(user.tier, Tier::Pro);
    }

    #[test]
    fn empty_id_is_rejected() {
        let result = BillingUser::try_from(UserRow {
            id: " ".to_string(),
            email: "a@x.com".to_string(),
            role: "USER".to_string(),
            tier: "NONE".to_string(),
        });
        assert!(result.is_err());
    }
}
