use blogly_core::db::open_db_in_memory;
use blogly_core::{
    NewPost, NewTag, NewUser, PostService, RepoError, SqlitePostRepository, SqliteTagRepository,
    SqliteUserRepository, TagService, UserService, UserServiceError, UserUpdate,
    DEFAULT_IMAGE_URL,
};
use rusqlite::Connection;

fn new_user(first: &str, last: &str) -> NewUser {
    NewUser {
        first_name: first.to_string(),
        last_name: last.to_string(),
        image_url: None,
    }
}

#[test]
fn create_and_get_roundtrip_applies_image_placeholder() {
    let conn = open_db_in_memory().unwrap();
    let service = UserService::new(SqliteUserRepository::new(&conn));

    let created = service.create_user(&new_user("Ada", "Lovelace")).unwrap();
    assert_eq!(created.image_url, DEFAULT_IMAGE_URL);
    assert_eq!(created.full_name(), "Ada Lovelace");

    let loaded = service.get_user(created.id).unwrap();
    assert_eq!(loaded, created);
}

#[test]
fn list_users_orders_by_last_name_then_first_name() {
    let conn = open_db_in_memory().unwrap();
    let service = UserService::new(SqliteUserRepository::new(&conn));

    service.create_user(&new_user("A", "Zed")).unwrap();
    service.create_user(&new_user("B", "Able")).unwrap();
    service.create_user(&new_user("A", "Able")).unwrap();

    let listed = service.list_users().unwrap();
    let names: Vec<String> = listed.iter().map(|user| user.full_name()).collect();
    assert_eq!(names, vec!["A Able", "B Able", "A Zed"]);
}

#[test]
fn update_user_rewrites_all_three_fields() {
    let conn = open_db_in_memory().unwrap();
    let service = UserService::new(SqliteUserRepository::new(&conn));

    let created = service.create_user(&new_user("Ada", "Lovelace")).unwrap();
    let updated = service
        .update_user(
            created.id,
            &UserUpdate {
                first_name: "Augusta".to_string(),
                last_name: "King".to_string(),
                image_url: Some("https://example.com/ada.png".to_string()),
            },
        )
        .unwrap();

    assert_eq!(updated.first_name, "Augusta");
    assert_eq!(updated.last_name, "King");
    assert_eq!(updated.image_url, "https://example.com/ada.png");
    assert_eq!(updated.id, created.id);
}

#[test]
fn create_user_with_blank_first_name_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let service = UserService::new(SqliteUserRepository::new(&conn));

    let err = service.create_user(&new_user("  ", "Lovelace")).unwrap_err();
    assert!(matches!(
        err,
        UserServiceError::Repo(RepoError::Validation(_))
    ));
    assert!(service.list_users().unwrap().is_empty());
}

#[test]
fn missing_user_signals_not_found_without_mutation() {
    let conn = open_db_in_memory().unwrap();
    let service = UserService::new(SqliteUserRepository::new(&conn));
    service.create_user(&new_user("Ada", "Lovelace")).unwrap();

    assert!(matches!(
        service.get_user(999).unwrap_err(),
        UserServiceError::UserNotFound(999)
    ));
    assert!(matches!(
        service.delete_user(999).unwrap_err(),
        UserServiceError::UserNotFound(999)
    ));
    assert!(matches!(
        service
            .update_user(
                999,
                &UserUpdate {
                    first_name: "X".to_string(),
                    last_name: "Y".to_string(),
                    image_url: None,
                },
            )
            .unwrap_err(),
        UserServiceError::UserNotFound(999)
    ));
    assert_eq!(service.list_users().unwrap().len(), 1);
}

#[test]
fn delete_user_cascades_to_posts_and_their_associations() {
    let mut conn = open_db_in_memory().unwrap();

    let user_id = {
        let users = UserService::new(SqliteUserRepository::new(&conn));
        users.create_user(&new_user("Ada", "Lovelace")).unwrap().id
    };
    let tag_id = {
        let tags = TagService::new(SqliteTagRepository::try_new(&conn).unwrap());
        tags.create_tag(&NewTag {
            name: "news".to_string(),
        })
        .unwrap()
        .id
    };
    {
        let repo = SqlitePostRepository::try_new(&mut conn).unwrap();
        let mut posts = PostService::new(repo);
        posts
            .create_post(&NewPost {
                title: "tagged".to_string(),
                content: "body".to_string(),
                user_id,
                tag_ids: vec![tag_id],
            })
            .unwrap();
        posts
            .create_post(&NewPost {
                title: "plain".to_string(),
                content: "body".to_string(),
                user_id,
                tag_ids: Vec::new(),
            })
            .unwrap();
    }

    {
        let users = UserService::new(SqliteUserRepository::new(&conn));
        users.delete_user(user_id).unwrap();
    }

    assert_eq!(count_rows(&conn, "users"), 0);
    assert_eq!(count_rows(&conn, "posts"), 0);
    assert_eq!(count_rows(&conn, "posts_tags"), 0);
    // Tags are not owned by users or posts; the cascade must not touch them.
    assert_eq!(count_rows(&conn, "tags"), 1);
}

fn count_rows(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })
    .unwrap()
}
