//! Credential Store
//!
//! User accounts with bcrypt password digests, backed by the shared SQLite
//! connection. Duplicate usernames surface from the uniqueness constraint
//! rather than a check-then-insert, so racing registrations cannot slip
//! through.

use crate::auth::models::User;
use crate::db::SharedConnection;
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::info;

#[derive(Debug)]
pub enum UserStoreError {
    DuplicateUsername,
    NotFound,
    Hash(bcrypt::BcryptError),
    Database(rusqlite::Error),
}

impl std::fmt::Display for UserStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserStoreError::DuplicateUsername => write!(f, "username already taken"),
            UserStoreError::NotFound => write!(f, "user not found"),
            UserStoreError::Hash(e) => write!(f, "password hashing failed: {e}"),
            UserStoreError::Database(e) => write!(f, "database error: {e}"),
        }
    }
}

impl std::error::Error for UserStoreError {}

impl From<rusqlite::Error> for UserStoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _)
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                UserStoreError::DuplicateUsername
            }
            _ => UserStoreError::Database(err),
        }
    }
}

impl From<bcrypt::BcryptError> for UserStoreError {
    fn from(err: bcrypt::BcryptError) -> Self {
        UserStoreError::Hash(err)
    }
}

#[derive(Clone)]
pub struct UserStore {
    conn: SharedConnection,
}

impl UserStore {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// Seed the bootstrap admin account if no admin exists yet.
    pub fn seed_admin(&self, password: &str) -> Result<(), UserStoreError> {
        let conn = self.conn.lock();

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM users WHERE is_admin = 1",
            [],
            |row| row.get(0),
        )?;
        if count > 0 {
            return Ok(());
        }

        let password_hash = hash(password, DEFAULT_COST)?;
        conn.execute(
            "INSERT INTO users (username, password_hash, is_admin, created_at)
             VALUES (?1, ?2, 1, ?3)",
            params![
                "admin",
                password_hash,
                Utc::now().to_rfc3339()
            ],
        )?;

        info!("Seeded admin user (username: admin)");
        Ok(())
    }

    /// Create a new user, hashing the password.
    pub fn create_user(
        &self,
        username: &str,
        password: &str,
        is_admin: bool,
    ) -> Result<User, UserStoreError> {
        let password_hash = hash(password, DEFAULT_COST)?;
        let created_at = Utc::now().to_rfc3339();

        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO users (username, password_hash, is_admin, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![username, password_hash, is_admin, created_at],
        )?;

        let user = User {
            id: conn.last_insert_rowid(),
            username: username.to_string(),
            password_hash,
            is_admin,
            created_at,
        };

        info!("Created user {} (admin: {})", user.username, user.is_admin);
        Ok(user)
    }

    pub fn get_by_id(&self, id: i64) -> Result<Option<User>, UserStoreError> {
        let conn = self.conn.lock();
        let user = conn
            .query_row(
                "SELECT id, username, password_hash, is_admin, created_at
                 FROM users WHERE id = ?1",
                params![id],
                Self::row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    pub fn get_by_username(&self, username: &str) -> Result<Option<User>, UserStoreError> {
        let conn = self.conn.lock();
        let user = conn
            .query_row(
                "SELECT id, username, password_hash, is_admin, created_at
                 FROM users WHERE username = ?1",
                params![username],
                Self::row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    /// Check a username/password pair. Returns the user on success; an
    /// unknown username and a wrong password are indistinguishable.
    pub fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, UserStoreError> {
        match self.get_by_username(username)? {
            Some(user) if verify(password, &user.password_hash)? => Ok(Some(user)),
            _ => Ok(None),
        }
    }

    /// Check a plaintext password against an already-loaded user row.
    pub fn check_password(&self, user: &User, password: &str) -> Result<bool, UserStoreError> {
        Ok(verify(password, &user.password_hash)?)
    }

    /// Replace a user's password digest.
    pub fn update_password(&self, id: i64, new_password: &str) -> Result<(), UserStoreError> {
        let password_hash = hash(new_password, DEFAULT_COST)?;

        let conn = self.conn.lock();
        let affected = conn.execute(
            "UPDATE users SET password_hash = ?1 WHERE id = ?2",
            params![password_hash, id],
        )?;

        if affected == 0 {
            return Err(UserStoreError::NotFound);
        }
        Ok(())
    }

    fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
        Ok(User {
            id: row.get(0)?,
            username: row.get(1)?,
            password_hash: row.get(2)?,
            is_admin: row.get(3)?,
            created_at: row.get(4)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn create_test_store() -> (UserStore, NamedTempFile) {
        let temp_file = NamedTempFile::new().unwrap();
        let conn = crate::db::open(temp_file.path().to_str().unwrap()).unwrap();
        let store = UserStore::new(conn);
        store.seed_admin("adminpass").unwrap();
        (store, temp_file)
    }

    #[test]
    fn test_admin_seeded_once() {
        let (store, _temp) = create_test_store();

        let admin = store.get_by_username("admin").unwrap().unwrap();
        assert!(admin.is_admin);

        // A second seed run is a no-op.
        store.seed_admin("otherpass").unwrap();
        assert!(store.authenticate("admin", "adminpass").unwrap().is_some());
    }

    #[test]
    fn test_create_and_retrieve_user() {
        let (store, _temp) = create_test_store();

        let user = store.create_user("alice", "secret1", false).unwrap();
        assert!(!user.is_admin);

        let by_id = store.get_by_id(user.id).unwrap().unwrap();
        assert_eq!(by_id.username, "alice");

        let by_name = store.get_by_username("alice").unwrap().unwrap();
        assert_eq!(by_name.id, user.id);
    }

    #[test]
    fn test_duplicate_username_is_conflict() {
        let (store, _temp) = create_test_store();

        store.create_user("alice", "secret1", false).unwrap();
        let err = store.create_user("alice", "other", false).unwrap_err();
        assert!(matches!(err, UserStoreError::DuplicateUsername));
    }

    #[test]
    fn test_authenticate() {
        let (store, _temp) = create_test_store();
        store.create_user("alice", "secret1", false).unwrap();

        assert!(store.authenticate("alice", "secret1").unwrap().is_some());
        assert!(store.authenticate("alice", "wrong").unwrap().is_none());
        assert!(store.authenticate("nobody", "secret1").unwrap().is_none());
    }

    #[test]
    fn test_update_password() {
        let (store, _temp) = create_test_store();
        let user = store.create_user("alice", "secret1", false).unwrap();

        store.update_password(user.id, "newsecret").unwrap();
        assert!(store.authenticate("alice", "secret1").unwrap().is_none());
        assert!(store.authenticate("alice", "newsecret").unwrap().is_some());
    }

    #[test]
    fn test_update_password_missing_user() {
        let (store, _temp) = create_test_store();
        let err = store.update_password(999, "whatever").unwrap_err();
        assert!(matches!(err, UserStoreError::NotFound));
    }
}
