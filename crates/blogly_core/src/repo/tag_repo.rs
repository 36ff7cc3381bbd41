//! Tag repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide tag CRUD over the `tags` table.
//! - Answer the explicit "tags attached to post" association query.
//!
//! # Invariants
//! - Tag names are unique; a colliding insert or rename is rejected as a
//!   validation failure and leaves the existing tag unchanged.
//! - Deleting a tag removes its association rows but never its posts.

use crate::model::tag::{NewTag, Tag, TagUpdate};
use crate::model::{EntityKind, ValidationError};
use crate::repo::{table_exists, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const TAG_SELECT_SQL: &str = "SELECT id, name FROM tags";

/// Repository interface for tag CRUD and association queries.
pub trait TagRepository {
    /// Lists all tags ordered by name.
    fn list_tags(&self) -> RepoResult<Vec<Tag>>;
    /// Gets one tag by id.
    fn get_tag(&self, id: i64) -> RepoResult<Option<Tag>>;
    /// Creates one tag and returns its assigned id.
    fn create_tag(&self, input: &NewTag) -> RepoResult<i64>;
    /// Renames one tag, re-checking name uniqueness.
    fn update_tag(&self, id: i64, input: &TagUpdate) -> RepoResult<()>;
    /// Deletes one tag; its association rows go with it, posts survive.
    fn delete_tag(&self, id: i64) -> RepoResult<()>;
    /// Lists the tags attached to one post, ordered by name.
    fn list_tags_for_post(&self, post_id: i64) -> RepoResult<Vec<Tag>>;
}

/// SQLite-backed tag repository.
pub struct SqliteTagRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTagRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    ///
    /// Fails when the tag schema has not been migrated yet.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        for table in ["tags", "posts_tags"] {
            if !table_exists(conn, table)? {
                return Err(RepoError::MissingRequiredTable(table));
            }
        }
        Ok(Self { conn })
    }
}

impl TagRepository for SqliteTagRepository<'_> {
    fn list_tags(&self) -> RepoResult<Vec<Tag>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TAG_SELECT_SQL} ORDER BY name;"))?;
        let mut rows = stmt.query([])?;
        let mut tags = Vec::new();
        while let Some(row) = rows.next()? {
            tags.push(parse_tag_row(row)?);
        }
        Ok(tags)
    }

    fn get_tag(&self, id: i64) -> RepoResult<Option<Tag>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TAG_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_tag_row(row)?));
        }
        Ok(None)
    }

    fn create_tag(&self, input: &NewTag) -> RepoResult<i64> {
        input.validate()?;

        match self.conn.execute(
            "INSERT INTO tags (name) VALUES (?1);",
            [input.name.as_str()],
        ) {
            Ok(_) => Ok(self.conn.last_insert_rowid()),
            Err(err) if is_unique_violation(&err) => Err(RepoError::Validation(
                ValidationError::DuplicateTagName(input.name.clone()),
            )),
            Err(err) => Err(err.into()),
        }
    }

    fn update_tag(&self, id: i64, input: &TagUpdate) -> RepoResult<()> {
        input.validate()?;

        let changed = match self.conn.execute(
            "UPDATE tags SET name = ?2 WHERE id = ?1;",
            params![id, input.name.as_str()],
        ) {
            Ok(changed) => changed,
            Err(err) if is_unique_violation(&err) => {
                return Err(RepoError::Validation(ValidationError::DuplicateTagName(
                    input.name.clone(),
                )));
            }
            Err(err) => return Err(err.into()),
        };

        if changed == 0 {
            return Err(RepoError::NotFound(EntityKind::Tag, id));
        }

        Ok(())
    }

    fn delete_tag(&self, id: i64) -> RepoResult<()> {
        // One statement; association rows go with it via ON DELETE CASCADE.
        let changed = self.conn.execute("DELETE FROM tags WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(EntityKind::Tag, id));
        }

        Ok(())
    }

    fn list_tags_for_post(&self, post_id: i64) -> RepoResult<Vec<Tag>> {
        let mut stmt = self.conn.prepare(
            "SELECT t.id, t.name
             FROM posts_tags pt
             INNER JOIN tags t ON t.id = pt.tag_id
             WHERE pt.post_id = ?1
             ORDER BY t.name;",
        )?;
        let mut rows = stmt.query([post_id])?;
        let mut tags = Vec::new();
        while let Some(row) = rows.next()? {
            tags.push(parse_tag_row(row)?);
        }
        Ok(tags)
    }
}

fn parse_tag_row(row: &Row<'_>) -> RepoResult<Tag> {
    let tag = Tag {
        id: row.get("id")?,
        name: row.get("name")?,
    };

    if tag.name.trim().is_empty() {
        return Err(RepoError::InvalidData(format!(
            "tag {} has a blank name",
            tag.id
        )));
    }

    Ok(tag)
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == rusqlite::ErrorCode::ConstraintViolation
    )
}
