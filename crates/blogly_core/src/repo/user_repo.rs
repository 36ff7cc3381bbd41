//! User repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide user CRUD over the `users` table.
//! - Own the cascade semantics of user deletion.
//!
//! # Invariants
//! - `list_users` orders by last name, then first name (default collation).
//! - Deleting a user removes every post it owns, and those posts'
//!   association rows, through referential integrity in one statement.

use crate::model::user::{NewUser, User, UserUpdate};
use crate::model::EntityKind;
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const USER_SELECT_SQL: &str = "SELECT id, first_name, last_name, image_url FROM users";

/// Repository interface for user CRUD operations.
pub trait UserRepository {
    /// Lists all users ordered by last name, then first name.
    fn list_users(&self) -> RepoResult<Vec<User>>;
    /// Gets one user by id.
    fn get_user(&self, id: i64) -> RepoResult<Option<User>>;
    /// Creates one user and returns its assigned id.
    fn create_user(&self, input: &NewUser) -> RepoResult<i64>;
    /// Re-writes all three user fields.
    fn update_user(&self, id: i64, input: &UserUpdate) -> RepoResult<()>;
    /// Deletes one user, cascading to its posts.
    fn delete_user(&self, id: i64) -> RepoResult<()>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn list_users(&self) -> RepoResult<Vec<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} ORDER BY last_name, first_name;"))?;
        let mut rows = stmt.query([])?;
        let mut users = Vec::new();
        while let Some(row) = rows.next()? {
            users.push(parse_user_row(row)?);
        }
        Ok(users)
    }

    fn get_user(&self, id: i64) -> RepoResult<Option<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_user_row(row)?));
        }
        Ok(None)
    }

    fn create_user(&self, input: &NewUser) -> RepoResult<i64> {
        input.validate()?;

        self.conn.execute(
            "INSERT INTO users (first_name, last_name, image_url) VALUES (?1, ?2, ?3);",
            params![
                input.first_name.as_str(),
                input.last_name.as_str(),
                input.image_url_or_default(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update_user(&self, id: i64, input: &UserUpdate) -> RepoResult<()> {
        input.validate()?;

        let changed = self.conn.execute(
            "UPDATE users
             SET
                first_name = ?2,
                last_name = ?3,
                image_url = ?4
             WHERE id = ?1;",
            params![
                id,
                input.first_name.as_str(),
                input.last_name.as_str(),
                input.image_url_or_default(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(EntityKind::User, id));
        }

        Ok(())
    }

    fn delete_user(&self, id: i64) -> RepoResult<()> {
        // One statement; posts and their association rows go with it via
        // ON DELETE CASCADE, so the cascade is atomic.
        let changed = self
            .conn
            .execute("DELETE FROM users WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(EntityKind::User, id));
        }

        Ok(())
    }
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    let user = User {
        id: row.get("id")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        image_url: row.get("image_url")?,
    };

    if user.first_name.trim().is_empty() || user.last_name.trim().is_empty() {
        return Err(RepoError::InvalidData(format!(
            "user {} has a blank name field",
            user.id
        )));
    }

    Ok(user)
}
