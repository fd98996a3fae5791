//! Admin directory: read/update/delete over the user table.
//!
//! The HTTP layer gates every call on the elevated-access token before
//! anything here runs; these operations assume the gate already passed.

use snackquest_types::{EngineError, UserSummary};
use tracing::info;

use crate::store::Store;

const SUMMARY_COLUMNS: &str = "id, email, phone, username, authorized, created_at, introduction";

impl Store {
    /// All users, ordered by ascending id.
    pub async fn list_users(&self) -> Result<Vec<UserSummary>, EngineError> {
        let users = sqlx::query_as::<_, UserSummary>(&format!(
            "SELECT {SUMMARY_COLUMNS} FROM users ORDER BY id ASC"
        ))
        .fetch_all(self.pool())
        .await?;
        Ok(users)
    }

    /// Unconditionally overwrite the in-game authorization flag, leaving
    /// every other column untouched.
    pub async fn set_authorization(
        &self,
        user_id: i64,
        authorized: bool,
    ) -> Result<UserSummary, EngineError> {
        let updated = sqlx::query_as::<_, UserSummary>(&format!(
            "UPDATE users SET authorized = ?2 WHERE id = ?1 RETURNING {SUMMARY_COLUMNS}"
        ))
        .bind(user_id)
        .bind(authorized)
        .fetch_optional(self.pool())
        .await?;
        updated.ok_or(EngineError::NotFound)
    }

    /// Delete a user and everything owned by it: ledger row, character
    /// ownership, then the user row, all in one transaction. A missing
    /// user rolls the transaction back and reports `NotFound`, even
    /// though the dependent deletes are harmless no-ops.
    pub async fn delete_user(&self, user_id: i64) -> Result<i64, EngineError> {
        let mut tx = self.pool().begin().await?;

        sqlx::query("DELETE FROM resources WHERE user_id = ?1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM user_characters WHERE user_id = ?1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        let deleted = sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(EngineError::NotFound);
        }

        tx.commit().await?;
        info!(user_id, "user deleted");
        Ok(user_id)
    }
}
