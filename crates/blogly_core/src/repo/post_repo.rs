//! Post repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide post CRUD over the `posts` table.
//! - Own tag-set replacement over `posts_tags` with atomic semantics.
//!
//! # Invariants
//! - Post creation fails with `MissingUser` when the owning user id does
//!   not resolve; a dangling reference is never created.
//! - Tag-set replacement clears and repopulates the association set in a
//!   single transaction; ids resolving to no tag are skipped silently.
//! - Listings order by `created_at DESC, id DESC` so the newest post is
//!   first and ties stay deterministic.

use crate::model::post::{NewPost, Post, PostUpdate};
use crate::model::tag::Tag;
use crate::model::EntityKind;
use crate::repo::{table_exists, RepoError, RepoResult};
use chrono::Utc;
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};

/// Homepage cap for the recent-posts listing.
pub const RECENT_POSTS_LIMIT: u32 = 5;

const POST_SELECT_SQL: &str = "SELECT id, title, content, created_at, user_id FROM posts";

/// Read model joining a post with its attached tags, sorted by tag name.
///
/// Templates render this without issuing further data access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRecord {
    pub post: Post,
    pub tags: Vec<Tag>,
}

/// Repository interface for post CRUD and association queries.
pub trait PostRepository {
    /// Creates one post with its initial tag set and returns the assigned id.
    fn create_post(&mut self, input: &NewPost) -> RepoResult<i64>;
    /// Gets one post with its tags.
    fn get_post(&self, id: i64) -> RepoResult<Option<PostRecord>>;
    /// Lists the most recent posts, capped at [`RECENT_POSTS_LIMIT`].
    fn list_recent_posts(&self) -> RepoResult<Vec<PostRecord>>;
    /// Lists all posts owned by one user.
    fn list_posts_by_user(&self, user_id: i64) -> RepoResult<Vec<PostRecord>>;
    /// Lists all posts attached to one tag; errors when the tag is absent.
    fn list_posts_by_tag(&self, tag_id: i64) -> RepoResult<Vec<PostRecord>>;
    /// Replaces title/content and the full tag set in one transaction.
    fn update_post(&mut self, id: i64, input: &PostUpdate) -> RepoResult<()>;
    /// Replaces the full tag set for one post.
    fn set_post_tags(&mut self, id: i64, tag_ids: &[i64]) -> RepoResult<()>;
    /// Deletes one post; its association rows go with it, tags survive.
    fn delete_post(&self, id: i64) -> RepoResult<()>;
}

/// SQLite-backed post repository.
#[derive(Debug)]
pub struct SqlitePostRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqlitePostRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    ///
    /// Fails when the association schema has not been migrated yet.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        for table in ["posts", "tags", "posts_tags"] {
            if !table_exists(conn, table)? {
                return Err(RepoError::MissingRequiredTable(table));
            }
        }
        Ok(Self { conn })
    }
}

impl PostRepository for SqlitePostRepository<'_> {
    fn create_post(&mut self, input: &NewPost) -> RepoResult<i64> {
        input.validate()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        if !user_exists_in_tx(&tx, input.user_id)? {
            return Err(RepoError::MissingUser(input.user_id));
        }

        tx.execute(
            "INSERT INTO posts (title, content, created_at, user_id)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                input.title.as_str(),
                input.content.as_str(),
                Utc::now().timestamp_millis(),
                input.user_id,
            ],
        )?;
        let post_id = tx.last_insert_rowid();

        attach_tags_in_tx(&tx, post_id, &input.tag_ids)?;
        tx.commit()?;

        Ok(post_id)
    }

    fn get_post(&self, id: i64) -> RepoResult<Option<PostRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{POST_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            let post = parse_post_row(row)?;
            let tags = load_tags_for_post(self.conn, post.id)?;
            return Ok(Some(PostRecord { post, tags }));
        }
        Ok(None)
    }

    fn list_recent_posts(&self) -> RepoResult<Vec<PostRecord>> {
        let sql = format!(
            "{POST_SELECT_SQL} ORDER BY created_at DESC, id DESC LIMIT {RECENT_POSTS_LIMIT};"
        );
        self.query_post_records(&sql, &[])
    }

    fn list_posts_by_user(&self, user_id: i64) -> RepoResult<Vec<PostRecord>> {
        let sql =
            format!("{POST_SELECT_SQL} WHERE user_id = ?1 ORDER BY created_at DESC, id DESC;");
        self.query_post_records(&sql, &[user_id])
    }

    fn list_posts_by_tag(&self, tag_id: i64) -> RepoResult<Vec<PostRecord>> {
        if !tag_exists(self.conn, tag_id)? {
            return Err(RepoError::NotFound(EntityKind::Tag, tag_id));
        }

        let sql = "SELECT p.id, p.title, p.content, p.created_at, p.user_id
             FROM posts p
             INNER JOIN posts_tags pt ON pt.post_id = p.id
             WHERE pt.tag_id = ?1
             ORDER BY p.created_at DESC, p.id DESC;";
        self.query_post_records(sql, &[tag_id])
    }

    fn update_post(&mut self, id: i64, input: &PostUpdate) -> RepoResult<()> {
        input.validate()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        // created_at and user_id are immutable and stay untouched.
        let changed = tx.execute(
            "UPDATE posts
             SET
                title = ?2,
                content = ?3
             WHERE id = ?1;",
            params![id, input.title.as_str(), input.content.as_str()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(EntityKind::Post, id));
        }

        tx.execute("DELETE FROM posts_tags WHERE post_id = ?1;", [id])?;
        attach_tags_in_tx(&tx, id, &input.tag_ids)?;
        tx.commit()?;

        Ok(())
    }

    fn set_post_tags(&mut self, id: i64, tag_ids: &[i64]) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        if !post_exists_in_tx(&tx, id)? {
            return Err(RepoError::NotFound(EntityKind::Post, id));
        }

        tx.execute("DELETE FROM posts_tags WHERE post_id = ?1;", [id])?;
        attach_tags_in_tx(&tx, id, tag_ids)?;
        tx.commit()?;

        Ok(())
    }

    fn delete_post(&self, id: i64) -> RepoResult<()> {
        // One statement; association rows go with it via ON DELETE CASCADE.
        let changed = self
            .conn
            .execute("DELETE FROM posts WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(EntityKind::Post, id));
        }

        Ok(())
    }
}

impl SqlitePostRepository<'_> {
    fn query_post_records(&self, sql: &str, binds: &[i64]) -> RepoResult<Vec<PostRecord>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(rusqlite::params_from_iter(binds.iter()))?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            let post = parse_post_row(row)?;
            let tags = load_tags_for_post(self.conn, post.id)?;
            records.push(PostRecord { post, tags });
        }
        Ok(records)
    }
}

fn parse_post_row(row: &Row<'_>) -> RepoResult<Post> {
    let post = Post {
        id: row.get("id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        created_at: row.get("created_at")?,
        user_id: row.get("user_id")?,
    };

    if post.title.trim().is_empty() || post.content.trim().is_empty() {
        return Err(RepoError::InvalidData(format!(
            "post {} has a blank required field",
            post.id
        )));
    }

    Ok(post)
}

fn load_tags_for_post(conn: &Connection, post_id: i64) -> RepoResult<Vec<Tag>> {
    let mut stmt = conn.prepare(
        "SELECT t.id, t.name
         FROM posts_tags pt
         INNER JOIN tags t ON t.id = pt.tag_id
         WHERE pt.post_id = ?1
         ORDER BY t.name;",
    )?;
    let mut rows = stmt.query([post_id])?;
    let mut tags = Vec::new();
    while let Some(row) = rows.next()? {
        tags.push(Tag {
            id: row.get("id")?,
            name: row.get("name")?,
        });
    }
    Ok(tags)
}

fn attach_tags_in_tx(tx: &Transaction<'_>, post_id: i64, tag_ids: &[i64]) -> RepoResult<()> {
    for tag_id in tag_ids {
        // The SELECT yields no row for an unresolved tag id, so it is
        // skipped rather than rejected; OR IGNORE absorbs repeated ids.
        tx.execute(
            "INSERT OR IGNORE INTO posts_tags (post_id, tag_id)
             SELECT ?1, id FROM tags WHERE id = ?2;",
            params![post_id, tag_id],
        )?;
    }
    Ok(())
}

fn user_exists_in_tx(tx: &Transaction<'_>, user_id: i64) -> RepoResult<bool> {
    let exists: i64 = tx.query_row(
        "SELECT EXISTS(SELECT 1 FROM users WHERE id = ?1);",
        [user_id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn post_exists_in_tx(tx: &Transaction<'_>, post_id: i64) -> RepoResult<bool> {
    let exists: i64 = tx.query_row(
        "SELECT EXISTS(SELECT 1 FROM posts WHERE id = ?1);",
        [post_id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn tag_exists(conn: &Connection, tag_id: i64) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM tags WHERE id = ?1);",
        [tag_id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
