use blogly_core::db::open_db_in_memory;
use blogly_core::{
    NewPost, NewTag, NewUser, PostService, PostServiceError, RepoError, SqlitePostRepository,
    SqliteTagRepository, SqliteUserRepository, TagService, UserService,
};
use rusqlite::Connection;

fn seed_user(conn: &Connection) -> i64 {
    let users = UserService::new(SqliteUserRepository::new(conn));
    users
        .create_user(&NewUser {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            image_url: None,
        })
        .unwrap()
        .id
}

fn seed_tag(conn: &Connection, name: &str) -> i64 {
    let tags = TagService::new(SqliteTagRepository::try_new(conn).unwrap());
    tags.create_tag(&NewTag {
        name: name.to_string(),
    })
    .unwrap()
    .id
}

fn seed_post(conn: &mut Connection, user_id: i64, title: &str, tag_ids: Vec<i64>) -> i64 {
    let repo = SqlitePostRepository::try_new(conn).unwrap();
    let mut posts = PostService::new(repo);
    posts
        .create_post(&NewPost {
            title: title.to_string(),
            content: format!("{title} body"),
            user_id,
            tag_ids,
        })
        .unwrap()
        .post
        .id
}

fn join_row_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM posts_tags;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn set_post_tags_replaces_the_full_set() {
    let mut conn = open_db_in_memory().unwrap();
    let user_id = seed_user(&conn);
    let t1 = seed_tag(&conn, "t1");
    let t2 = seed_tag(&conn, "t2");
    let t3 = seed_tag(&conn, "t3");
    let post_id = seed_post(&mut conn, user_id, "target", vec![t1, t2]);

    let repo = SqlitePostRepository::try_new(&mut conn).unwrap();
    let mut service = PostService::new(repo);
    let replaced = service.set_post_tags(post_id, &[t2, t3]).unwrap();

    let tag_ids: Vec<i64> = replaced.tags.iter().map(|tag| tag.id).collect();
    assert_eq!(tag_ids, vec![t2, t3]);
    drop(service);

    // The removed and added tags both survive as entities.
    let tags = TagService::new(SqliteTagRepository::try_new(&conn).unwrap());
    assert_eq!(tags.get_tag(t1).unwrap().name, "t1");
    assert_eq!(tags.get_tag(t3).unwrap().name, "t3");
}

#[test]
fn attaching_the_same_tag_twice_keeps_a_single_association_row() {
    let mut conn = open_db_in_memory().unwrap();
    let user_id = seed_user(&conn);
    let tag_id = seed_tag(&conn, "only");
    let post_id = seed_post(&mut conn, user_id, "target", Vec::new());

    {
        let repo = SqlitePostRepository::try_new(&mut conn).unwrap();
        let mut service = PostService::new(repo);
        let record = service.set_post_tags(post_id, &[tag_id, tag_id]).unwrap();
        assert_eq!(record.tags.len(), 1);
    }
    assert_eq!(join_row_count(&conn), 1);
}

#[test]
fn unresolved_tag_ids_are_silently_skipped() {
    let mut conn = open_db_in_memory().unwrap();
    let user_id = seed_user(&conn);
    let tag_id = seed_tag(&conn, "real");
    let post_id = seed_post(&mut conn, user_id, "target", Vec::new());

    let repo = SqlitePostRepository::try_new(&mut conn).unwrap();
    let mut service = PostService::new(repo);
    let record = service.set_post_tags(post_id, &[tag_id, 9_999]).unwrap();

    assert_eq!(record.tags.len(), 1);
    assert_eq!(record.tags[0].id, tag_id);
}

#[test]
fn create_post_attaches_its_initial_tag_set() {
    let mut conn = open_db_in_memory().unwrap();
    let user_id = seed_user(&conn);
    let beta = seed_tag(&conn, "beta");
    let alpha = seed_tag(&conn, "alpha");

    let repo = SqlitePostRepository::try_new(&mut conn).unwrap();
    let mut service = PostService::new(repo);
    let record = service
        .create_post(&NewPost {
            title: "tagged from birth".to_string(),
            content: "body".to_string(),
            user_id,
            tag_ids: vec![beta, alpha],
        })
        .unwrap();

    let names: Vec<&str> = record.tags.iter().map(|tag| tag.name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "beta"]);
}

#[test]
fn posts_by_tag_lists_attached_posts_and_rejects_missing_tags() {
    let mut conn = open_db_in_memory().unwrap();
    let user_id = seed_user(&conn);
    let tag_id = seed_tag(&conn, "shared");
    let first = seed_post(&mut conn, user_id, "first", vec![tag_id]);
    let second = seed_post(&mut conn, user_id, "second", vec![tag_id]);
    seed_post(&mut conn, user_id, "untagged", Vec::new());

    let repo = SqlitePostRepository::try_new(&mut conn).unwrap();
    let service = PostService::new(repo);

    let tagged = service.posts_by_tag(tag_id).unwrap();
    let ids: Vec<i64> = tagged.iter().map(|record| record.post.id).collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&first));
    assert!(ids.contains(&second));

    assert!(matches!(
        service.posts_by_tag(9_999).unwrap_err(),
        PostServiceError::TagNotFound(9_999)
    ));
}

#[test]
fn deleting_a_tag_detaches_it_from_posts_but_keeps_the_posts() {
    let mut conn = open_db_in_memory().unwrap();
    let user_id = seed_user(&conn);
    let doomed = seed_tag(&conn, "doomed");
    let keeper = seed_tag(&conn, "keeper");
    let first = seed_post(&mut conn, user_id, "first", vec![doomed, keeper]);
    let second = seed_post(&mut conn, user_id, "second", vec![doomed]);

    {
        let tags = TagService::new(SqliteTagRepository::try_new(&conn).unwrap());
        tags.delete_tag(doomed).unwrap();
    }

    let repo = SqlitePostRepository::try_new(&mut conn).unwrap();
    let service = PostService::new(repo);

    let first_record = service.get_post(first).unwrap();
    let names: Vec<&str> = first_record
        .tags
        .iter()
        .map(|tag| tag.name.as_str())
        .collect();
    assert_eq!(names, vec!["keeper"]);

    let second_record = service.get_post(second).unwrap();
    assert!(second_record.tags.is_empty());
}

#[test]
fn tags_for_post_lists_attached_tags_by_name() {
    let mut conn = open_db_in_memory().unwrap();
    let user_id = seed_user(&conn);
    let zebra = seed_tag(&conn, "zebra");
    let alpha = seed_tag(&conn, "alpha");
    let post_id = seed_post(&mut conn, user_id, "target", vec![zebra, alpha]);

    let tags = TagService::new(SqliteTagRepository::try_new(&conn).unwrap());
    let attached = tags.tags_for_post(post_id).unwrap();
    let names: Vec<&str> = attached.iter().map(|tag| tag.name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "zebra"]);
}

#[test]
fn set_post_tags_on_missing_post_signals_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    seed_user(&conn);
    let tag_id = seed_tag(&conn, "lonely");

    let repo = SqlitePostRepository::try_new(&mut conn).unwrap();
    let mut service = PostService::new(repo);
    assert!(matches!(
        service.set_post_tags(999, &[tag_id]).unwrap_err(),
        PostServiceError::PostNotFound(999)
    ));
    drop(service);
    assert_eq!(join_row_count(&conn), 0);
}

#[test]
fn post_repository_requires_the_association_schema() {
    let mut conn = open_db_in_memory().unwrap();
    conn.execute_batch("DROP TABLE posts_tags;").unwrap();

    let err = SqlitePostRepository::try_new(&mut conn).unwrap_err();
    assert!(matches!(err, RepoError::MissingRequiredTable("posts_tags")));
}
