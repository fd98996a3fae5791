//! Account registration and character ownership.

use chrono::Utc;
use snackquest_types::{
    Character, EngineError, NewUser, User, DEFAULT_CHARACTER_ID, MAX_INTRODUCTION_LENGTH,
    MAX_USERNAME_LENGTH,
};
use tracing::info;

use crate::{
    auth,
    store::{duplicate_field, Store},
};

impl Store {
    /// Create an account: hash the password, insert the user, and grant
    /// the default character so the ownership set is never empty.
    pub async fn register(&self, new_user: &NewUser) -> Result<User, EngineError> {
        validate(new_user)?;
        let password_hash = auth::hash_password(&new_user.password)?;
        let user = self.create_user(new_user, &password_hash).await?;
        info!(user_id = user.id, username = %user.username, "account registered");
        Ok(user)
    }

    /// Storage-level insert with a precomputed hash. The user row and the
    /// default character grant land in one transaction.
    pub async fn create_user(
        &self,
        new_user: &NewUser,
        password_hash: &str,
    ) -> Result<User, EngineError> {
        let created_at = Utc::now().timestamp();
        let mut tx = self.pool().begin().await?;

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO users (email, phone, username, password_hash, created_at, introduction) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6) RETURNING id",
        )
        .bind(&new_user.email)
        .bind(&new_user.phone)
        .bind(&new_user.username)
        .bind(password_hash)
        .bind(created_at)
        .bind(&new_user.introduction)
        .fetch_one(&mut *tx)
        .await
        .map_err(|err| match duplicate_field(&err) {
            Some(field) => EngineError::Validation(format!("{field} already taken")),
            None => EngineError::Persistence(err),
        })?;

        sqlx::query("INSERT INTO user_characters (user_id, character_id) VALUES (?1, ?2)")
            .bind(id)
            .bind(DEFAULT_CHARACTER_ID)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(User {
            id,
            email: new_user.email.clone(),
            phone: new_user.phone.clone(),
            username: new_user.username.clone(),
            password_hash: password_hash.to_string(),
            authorized: false,
            created_at,
            introduction: new_user.introduction.clone(),
        })
    }

    /// Characters owned by `user_id`, in catalog order.
    pub async fn owned_characters(&self, user_id: i64) -> Result<Vec<Character>, EngineError> {
        let characters = sqlx::query_as::<_, Character>(
            "SELECT c.id, c.name FROM characters c \
             JOIN user_characters uc ON uc.character_id = c.id \
             WHERE uc.user_id = ?1 ORDER BY c.id",
        )
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;
        Ok(characters)
    }

    pub async fn owns_character(
        &self,
        user_id: i64,
        character_id: i64,
    ) -> Result<bool, EngineError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM user_characters WHERE user_id = ?1 AND character_id = ?2",
        )
        .bind(user_id)
        .bind(character_id)
        .fetch_one(self.pool())
        .await?;
        Ok(count > 0)
    }
}

fn validate(new_user: &NewUser) -> Result<(), EngineError> {
    if new_user.username.is_empty() || new_user.username.len() > MAX_USERNAME_LENGTH {
        return Err(EngineError::Validation("invalid username".into()));
    }
    if !new_user.email.contains('@') {
        return Err(EngineError::Validation("invalid email".into()));
    }
    if new_user.phone.is_empty() {
        return Err(EngineError::Validation("invalid phone".into()));
    }
    if new_user.password.is_empty() {
        return Err(EngineError::Validation("password must not be empty".into()));
    }
    if let Some(introduction) = &new_user.introduction {
        if introduction.len() > MAX_INTRODUCTION_LENGTH {
            return Err(EngineError::Validation("introduction too long".into()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use snackquest_types::{EngineError, NewUser, DEFAULT_CHARACTER_ID};

    use crate::store::Store;

    fn new_user(suffix: &str) -> NewUser {
        NewUser {
            email: format!("{suffix}@example.com"),
            phone: format!("1390000{suffix}"),
            username: format!("user-{suffix}"),
            password: "123456".into(),
            introduction: None,
        }
    }

    #[tokio::test]
    async fn registration_grants_the_default_character() {
        let store = Store::open_in_memory().await.unwrap();
        let user = store.register(&new_user("a")).await.unwrap();

        let characters = store.owned_characters(user.id).await.unwrap();
        assert_eq!(characters.len(), 1);
        assert_eq!(characters[0].id, DEFAULT_CHARACTER_ID);
        assert!(store
            .owns_character(user.id, DEFAULT_CHARACTER_ID)
            .await
            .unwrap());
        assert!(!store.owns_character(user.id, 99).await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_unique_columns_report_the_field() {
        let store = Store::open_in_memory().await.unwrap();
        store.register(&new_user("a")).await.unwrap();

        let mut dup = new_user("b");
        dup.email = "a@example.com".into();
        let err = store.register(&dup).await.unwrap_err();
        match err {
            EngineError::Validation(message) => assert!(message.contains("email")),
            other => panic!("expected validation error, got {other:?}"),
        }

        let mut dup = new_user("c");
        dup.username = "user-a".into();
        let err = store.register(&dup).await.unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[tokio::test]
    async fn lookup_matches_email_phone_or_username() {
        let store = Store::open_in_memory().await.unwrap();
        let user = store.register(&new_user("a")).await.unwrap();

        for identifier in ["a@example.com", "1390000a", "user-a"] {
            let found = store.user_by_identifier(identifier).await.unwrap().unwrap();
            assert_eq!(found.id, user.id);
        }
        assert!(store.user_by_identifier("missing").await.unwrap().is_none());
    }
}
