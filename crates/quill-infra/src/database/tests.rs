#[cfg(test)]
mod tests {
    use crate::database::entity::post;
    use crate::database::postgres_store::PostgresPostStore;
    use quill_core::domain::{Post, PostField, PostId, PostPatch, PostStatus};
    use quill_core::error::RepoError;
    use quill_core::ports::PostStore;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn model(id: &str, title: &str, status: PostStatus) -> post::Model {
        let now = chrono::Utc::now();
        post::Model {
            id: id.to_owned(),
            title: title.to_owned(),
            content: "<p>Content</p>".to_owned(),
            author_name: "Ada".to_owned(),
            author_image: None,
            user_email: Some("ada@example.com".to_owned()),
            status: status.as_str().to_owned(),
            saved_at: Some(now.into()),
            created_at: None,
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_post_by_id() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model("p1", "Test Post", PostStatus::Draft)]])
            .into_connection();

        let store = PostgresPostStore::new(db);

        let result: Option<Post> = store.get_by_id(&PostId::new("p1")).await.unwrap();

        assert!(result.is_some());
        let post = result.unwrap();
        assert_eq!(post.title, "Test Post");
        assert_eq!(post.id, PostId::new("p1"));
        assert_eq!(post.status, PostStatus::Draft);
        assert!(post.saved_at.is_some());
    }

    #[tokio::test]
    async fn test_query_by_status() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![
                model("p1", "One", PostStatus::Published),
                model("p2", "Two", PostStatus::Published),
            ]])
            .into_connection();

        let store = PostgresPostStore::new(db);

        let posts = store
            .query_by_field(PostField::Status(PostStatus::Published))
            .await
            .unwrap();

        assert_eq!(posts.len(), 2);
        assert!(posts.iter().all(|p| p.is_published()));
    }

    #[tokio::test]
    async fn test_merge_update_writes_patched_record() {
        let existing = model("p1", "Before", PostStatus::Draft);
        let mut updated = existing.clone();
        updated.title = "After".to_owned();
        updated.status = PostStatus::Published.as_str().to_owned();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![existing]])
            .append_query_results(vec![vec![updated]])
            .into_connection();

        let store = PostgresPostStore::new(db);
        let patch = PostPatch {
            title: Some("After".into()),
            status: Some(PostStatus::Published),
            ..PostPatch::default()
        };

        store
            .update(&PostId::new("p1"), patch, true)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_merge_update_missing_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<post::Model>::new()])
            .into_connection();

        let store = PostgresPostStore::new(db);
        let result = store
            .update(&PostId::new("missing"), PostPatch::default(), true)
            .await;

        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_delete_missing_is_ok() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let store = PostgresPostStore::new(db);

        store.delete_by_id(&PostId::new("gone")).await.unwrap();
    }

    #[test]
    fn test_unknown_status_reads_as_draft() {
        let mut row = model("p1", "Odd", PostStatus::Draft);
        row.status = "archived".to_owned();

        let post: Post = row.into();
        assert_eq!(post.status, PostStatus::Draft);
    }
}
