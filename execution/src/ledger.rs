//! Resource ledger: per-user snack and point counters.
//!
//! The increment path is a single upsert-with-addition statement, so
//! concurrent grants for the same user serialize inside the storage
//! layer and no increment can be lost to a read-modify-write race.

use snackquest_types::{Balances, EngineError, GrantSet};

use crate::store::Store;

impl Store {
    /// Current balances for `user_id`. A user without a ledger row reads
    /// as all-zero; no row is created by reading.
    pub async fn balances(&self, user_id: i64) -> Result<Balances, EngineError> {
        let row = sqlx::query_as::<_, Balances>(
            "SELECT cola, chips, candy, gum, points FROM resources WHERE user_id = ?1",
        )
        .bind(user_id)
        .fetch_optional(self.pool())
        .await?;
        Ok(row.unwrap_or_default())
    }

    /// Atomically add `deltas` to the user's counters, creating the row
    /// if absent, and return the post-grant balances. All five counters
    /// move in the same statement or not at all.
    pub async fn grant(&self, user_id: i64, deltas: &GrantSet) -> Result<Balances, EngineError> {
        if deltas.cola < 0
            || deltas.chips < 0
            || deltas.candy < 0
            || deltas.gum < 0
            || deltas.points < 0
        {
            return Err(EngineError::Validation(
                "grant deltas must be non-negative".into(),
            ));
        }

        let balances = sqlx::query_as::<_, Balances>(
            "INSERT INTO resources (user_id, cola, chips, candy, gum, points) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6) \
             ON CONFLICT (user_id) DO UPDATE SET \
                 cola = cola + excluded.cola, \
                 chips = chips + excluded.chips, \
                 candy = candy + excluded.candy, \
                 gum = gum + excluded.gum, \
                 points = points + excluded.points \
             RETURNING cola, chips, candy, gum, points",
        )
        .bind(user_id)
        .bind(deltas.cola)
        .bind(deltas.chips)
        .bind(deltas.candy)
        .bind(deltas.gum)
        .bind(deltas.points)
        .fetch_one(self.pool())
        .await?;
        Ok(balances)
    }

    /// Administrative reset: zero every counter for `user_id`. A missing
    /// row is already zero, so it is left absent.
    pub async fn reset_resources(&self, user_id: i64) -> Result<Balances, EngineError> {
        sqlx::query(
            "UPDATE resources SET cola = 0, chips = 0, candy = 0, gum = 0, points = 0 \
             WHERE user_id = ?1",
        )
        .bind(user_id)
        .execute(self.pool())
        .await?;
        Ok(Balances::default())
    }
}

#[cfg(test)]
mod tests {
    use snackquest_types::{GrantSet, NewUser};

    use crate::store::Store;

    async fn store_with_user() -> (Store, i64) {
        let store = Store::open_in_memory().await.unwrap();
        let user = store
            .create_user(
                &NewUser {
                    email: "sarcus@example.com".into(),
                    phone: "13800000000".into(),
                    username: "Sarcus".into(),
                    password: "123456".into(),
                    introduction: None,
                },
                "$argon2id$test$hash",
            )
            .await
            .unwrap();
        (store, user.id)
    }

    #[tokio::test]
    async fn missing_row_reads_as_zero_without_creating_it() {
        let (store, user_id) = store_with_user().await;

        let balances = store.balances(user_id).await.unwrap();
        assert_eq!(balances.points, 0);

        // Reading twice must not have upserted a row.
        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM resources")
            .fetch_one(store.pool())
            .await
            .unwrap();
        assert_eq!(rows, 0);
    }

    #[tokio::test]
    async fn grant_round_trip_touches_only_named_counters() {
        let (store, user_id) = store_with_user().await;

        let after = store.grant(user_id, &GrantSet::points(5)).await.unwrap();
        assert_eq!(after.points, 5);
        assert_eq!(after.cola, 0);
        assert_eq!(after.candy, 0);

        let read_back = store.balances(user_id).await.unwrap();
        assert_eq!(read_back, after);
    }

    #[tokio::test]
    async fn concurrent_grants_lose_no_increments() {
        let (store, user_id) = store_with_user().await;

        let mut handles = Vec::new();
        for _ in 0..20 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.grant(user_id, &GrantSet::points(1)).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let balances = store.balances(user_id).await.unwrap();
        assert_eq!(balances.points, 20);
    }

    #[tokio::test]
    async fn negative_deltas_are_rejected_before_storage() {
        let (store, user_id) = store_with_user().await;

        let err = store
            .grant(user_id, &GrantSet::points(-1))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            snackquest_types::EngineError::Validation(_)
        ));
        assert_eq!(store.balances(user_id).await.unwrap().points, 0);
    }

    #[tokio::test]
    async fn reset_zeroes_all_counters() {
        let (store, user_id) = store_with_user().await;

        let mut deltas = GrantSet::points(3);
        deltas.cola = 2;
        store.grant(user_id, &deltas).await.unwrap();

        store.reset_resources(user_id).await.unwrap();
        let balances = store.balances(user_id).await.unwrap();
        assert_eq!(balances, Default::default());
    }
}
