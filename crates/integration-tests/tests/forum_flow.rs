//! Post/comment data flow against the in-memory store: creation,
//! comment-count maintenance, ordering, and the stale-count window.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use domains::{AuthorRef, Category, DeploymentMode, ForumError, MockIdentityProvider};
use integration_tests::InMemoryForumStore;
use services::ForumService;

fn anonymous_forum(store: Arc<InMemoryForumStore>) -> ForumService {
    ForumService::new(
        store,
        Arc::new(MockIdentityProvider::new()),
        DeploymentMode::Anonymous,
    )
}

#[tokio::test]
async fn comment_count_reflects_true_count_after_adds() {
    let store = Arc::new(InMemoryForumStore::new());
    let forum = anonymous_forum(store.clone());

    let post = forum
        .create_post("Hello", "first post", Category::General, Some("ada"))
        .await
        .unwrap();
    assert_eq!(post.comment_count, 0);

    forum.add_comment(post.id, "one", Some("bob")).await.unwrap();
    forum.add_comment(post.id, "two", Some("cyn")).await.unwrap();

    let listed = forum.list_posts(None).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].comment_count, 2);

    let loaded = forum.get_post(post.id).await.unwrap();
    assert_eq!(loaded.post.comment_count, 2);
    assert_eq!(loaded.comments.len(), 2);
    assert_eq!(loaded.comments[0].content, "one");
}

#[tokio::test]
async fn count_failure_leaves_count_stale_but_comment_added() {
    let store = Arc::new(InMemoryForumStore::new());
    let forum = anonymous_forum(store.clone());

    let post = forum
        .create_post("Hello", "body", Category::Help, None)
        .await
        .unwrap();

    store.fail_counts.store(true, Ordering::SeqCst);
    forum.add_comment(post.id, "hi", None).await.unwrap();

    let loaded = forum.get_post(post.id).await.unwrap();
    assert_eq!(loaded.comments.len(), 1);
    assert_eq!(loaded.post.comment_count, 0); // stale until the next recompute

    store.fail_counts.store(false, Ordering::SeqCst);
    let count = forum.recompute_comment_count(post.id).await.unwrap();
    assert_eq!(count, 1);
    assert_eq!(forum.get_post(post.id).await.unwrap().post.comment_count, 1);
}

#[tokio::test]
async fn list_posts_filters_by_category_newest_first() {
    let store = Arc::new(InMemoryForumStore::new());
    let forum = anonymous_forum(store);

    forum
        .create_post("A", "a", Category::Tech, None)
        .await
        .unwrap();
    forum
        .create_post("B", "b", Category::General, None)
        .await
        .unwrap();
    forum
        .create_post("C", "c", Category::Tech, None)
        .await
        .unwrap();

    let tech = forum.list_posts(Some(Category::Tech)).await.unwrap();
    assert_eq!(tech.len(), 2);
    assert!(tech.iter().all(|post| post.category == Category::Tech));
    assert!(tech[0].created_at >= tech[1].created_at);
}

#[tokio::test]
async fn comment_on_missing_post_is_rejected() {
    let store = Arc::new(InMemoryForumStore::new());
    let forum = anonymous_forum(store);

    let err = forum
        .add_comment(uuid::Uuid::new_v4(), "orphan", None)
        .await
        .unwrap_err();
    assert!(matches!(err, ForumError::Remote(_)));
}

#[tokio::test]
async fn authenticated_mode_stamps_profile_author() {
    let identity_id = uuid::Uuid::new_v4();

    let mut identity = MockIdentityProvider::new();
    identity.expect_current_identity().returning(move || {
        Ok(Some(domains::Identity {
            id: identity_id,
            email: "ada@example.com".into(),
            username: Some("ada".into()),
        }))
    });

    let store = Arc::new(InMemoryForumStore::new());
    let forum = ForumService::new(store, Arc::new(identity), DeploymentMode::Authenticated);

    let post = forum
        .create_post("Hello", "body", Category::General, None)
        .await
        .unwrap();
    assert_eq!(
        post.author,
        AuthorRef::Profile {
            user_id: identity_id,
            username: Some("ada".into()),
        }
    );
}
