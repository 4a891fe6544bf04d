mod common;

use common::TestStore;
use coursedb_migration::{Migrator, MigratorTrait};
use coursedb_store::repository::UserFilter;

#[tokio::test]
async fn test_schema_can_be_rolled_back_and_reapplied() {
    let t = TestStore::new().await;
    t.user("before").await;

    Migrator::down(&t.db, None)
        .await
        .expect("rollback should succeed");
    assert!(
        t.store.users.list(UserFilter::default()).await.is_err(),
        "user table should be gone after rollback"
    );

    Migrator::up(&t.db, None)
        .await
        .expect("reapplying should succeed");
    let users = t
        .store
        .users
        .list(UserFilter::default())
        .await
        .expect("list should succeed");
    assert!(users.is_empty());

    t.user("after").await;
    let course_id = t.course("Rebuilt").await;
    t.question(course_id, 2, &[true]).await;
}
