//! User operations (credential store)

use chrono::Utc;
use sqlx::Row;

use crate::error::DbError;
use crate::models::{NewUser, User};
use crate::repository::Database;

impl Database {
    // ==================== User Operations ====================

    /// Insert a new user
    ///
    /// Fails with `DbError::Duplicate` when the email is already taken. The
    /// check is the table's UNIQUE constraint, so it holds even when two
    /// inserts race past an earlier lookup.
    pub async fn insert_user(&self, user: NewUser) -> Result<User, DbError> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO users (name, email, password_hash, role, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(now.to_rfc3339())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DbError::from_insert(e, format!("User '{}' already exists", user.email)))?;

        let id: i64 = result.get("id");

        Ok(User {
            id,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            created_at: now,
        })
    }

    /// Get a user by email
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, name, email, password_hash, role, created_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| User::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// List all users
    pub async fn list_users(&self) -> Result<Vec<User>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, email, password_hash, role, created_at
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| User::try_from(row).map_err(DbError::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::models::{NewUser, UserRole};
    use crate::{Database, DbError};

    fn new_user(name: &str, email: &str) -> NewUser {
        NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            role: UserRole::User,
        }
    }

    #[tokio::test]
    async fn test_insert_and_find_user() {
        let db = Database::new("sqlite::memory:").await.unwrap();

        let user = db.insert_user(new_user("A", "a@x.com")).await.unwrap();
        assert!(user.id > 0);

        let found = db.get_user_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert_eq!(found.name, "A");
        assert_eq!(found.role, UserRole::User);

        assert!(db.get_user_by_email("b@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected_by_store() {
        let db = Database::new("sqlite::memory:").await.unwrap();

        db.insert_user(new_user("A", "a@x.com")).await.unwrap();
        let err = db.insert_user(new_user("B", "a@x.com")).await.unwrap_err();
        assert!(matches!(err, DbError::Duplicate(_)));

        let users = db.list_users().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].name, "A");
    }

    #[tokio::test]
    async fn test_unassigned_role_round_trips() {
        let db = Database::new("sqlite::memory:").await.unwrap();

        let mut user = new_user("C", "c@x.com");
        user.role = UserRole::Unassigned;
        db.insert_user(user).await.unwrap();

        let found = db.get_user_by_email("c@x.com").await.unwrap().unwrap();
        assert_eq!(found.role, UserRole::Unassigned);
    }
}
