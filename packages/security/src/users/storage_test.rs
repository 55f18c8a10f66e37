// ABOUTME: Tests for user storage layer
// ABOUTME: Creation, lookups and duplicate handling against in-memory SQLite

#[cfg(test)]
mod tests {
    use super::super::storage::UserStorage;
    use catima_storage::{connect_in_memory, StorageError};

    async fn setup() -> UserStorage {
        UserStorage::new(connect_in_memory().await.unwrap())
    }

    #[tokio::test]
    async fn test_create_and_fetch_user() {
        let storage = setup().await;
        let user = storage.create_user("  alice ").await.unwrap();

        assert_eq!(user.username, "alice");
        assert_eq!(storage.get_user(user.id).await.unwrap(), Some(user.clone()));
        assert_eq!(
            storage.get_user_by_username("alice").await.unwrap(),
            Some(user)
        );
        assert_eq!(storage.get_user_by_username("bob").await.unwrap(), None);
        assert_eq!(storage.get_user(999).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_duplicate_username_is_rejected() {
        let storage = setup().await;
        storage.create_user("alice").await.unwrap();

        let err = storage.create_user("alice").await.unwrap_err();
        assert!(matches!(err, StorageError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_empty_username_is_rejected() {
        let storage = setup().await;

        let err = storage.create_user("   ").await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidData(_)));
    }

    #[tokio::test]
    async fn test_list_users_in_creation_order() {
        let storage = setup().await;
        storage.create_user("zed").await.unwrap();
        storage.create_user("amy").await.unwrap();

        let names: Vec<String> = storage
            .list_users()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.username)
            .collect();
        assert_eq!(names, vec!["zed", "amy"]);
    }
}
