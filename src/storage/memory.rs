use super::{PokemonStore, StorageError};
use crate::model::{Pokemon, PokemonUpdate};
use async_trait::async_trait;
use dashmap::DashMap;

/// In-memory storage backend using a concurrent hashmap.
///
/// Data is volatile and lost on shutdown. Exists so the trait contract can
/// be exercised without a DynamoDB table, and doubles as the proof that a
/// second backend slots in without touching callers.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    data: DashMap<u32, Pokemon>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            data: DashMap::new(),
        }
    }
}

#[async_trait]
impl PokemonStore for MemoryStorage {
    async fn create(&self, pokemon: Pokemon) -> Result<Pokemon, StorageError> {
        self.data.insert(pokemon.id, pokemon.clone());
        Ok(pokemon)
    }

    async fn get(&self, id: u32) -> Result<Option<Pokemon>, StorageError> {
        Ok(self.data.get(&id).map(|entry| entry.value().clone()))
    }

    async fn list_all(&self) -> Result<Vec<Pokemon>, StorageError> {
        Ok(self
            .data
            .iter()
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn update(
        &self,
        id: u32,
        update: PokemonUpdate,
    ) -> Result<Option<Pokemon>, StorageError> {
        if update.is_empty() {
            return self.get(id).await;
        }

        // get_mut holds the entry's shard lock, so the existence check and
        // the merge happen atomically.
        match self.data.get_mut(&id) {
            Some(mut entry) => {
                if let Some(name) = update.name {
                    entry.name = name;
                }
                if let Some(category) = update.category {
                    entry.category = category;
                }
                Ok(Some(entry.value().clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: u32) -> Result<bool, StorageError> {
        Ok(self.data.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pokemon(id: u32, name: &str, category: &str) -> Pokemon {
        Pokemon {
            id,
            name: name.to_string(),
            category: category.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let storage = MemoryStorage::new();
        let created = storage
            .create(pokemon(25, "Pikachu", "Electric"))
            .await
            .unwrap();
        assert_eq!(created, pokemon(25, "Pikachu", "Electric"));

        assert_eq!(
            storage.get(25).await.unwrap(),
            Some(pokemon(25, "Pikachu", "Electric"))
        );
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get(151).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_create_overwrites_same_id() {
        let storage = MemoryStorage::new();
        storage.create(pokemon(4, "Charmander", "Fire")).await.unwrap();
        storage.create(pokemon(4, "Charmeleon", "Fire")).await.unwrap();

        assert_eq!(
            storage.get(4).await.unwrap(),
            Some(pokemon(4, "Charmeleon", "Fire"))
        );
        assert_eq!(storage.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_merges_only_set_fields() {
        let storage = MemoryStorage::new();
        storage.create(pokemon(1, "Bulbasaur", "Grass")).await.unwrap();

        let updated = storage
            .update(
                1,
                PokemonUpdate {
                    name: Some("Ivysaur".to_string()),
                    category: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated, Some(pokemon(1, "Ivysaur", "Grass")));
        assert_eq!(storage.get(1).await.unwrap(), Some(pokemon(1, "Ivysaur", "Grass")));
    }

    #[tokio::test]
    async fn test_empty_update_returns_current_state() {
        let storage = MemoryStorage::new();
        storage.create(pokemon(7, "Squirtle", "Water")).await.unwrap();

        let result = storage.update(7, PokemonUpdate::default()).await.unwrap();
        assert_eq!(result, Some(pokemon(7, "Squirtle", "Water")));
        assert_eq!(storage.get(7).await.unwrap(), Some(pokemon(7, "Squirtle", "Water")));
    }

    #[tokio::test]
    async fn test_update_missing_returns_none_and_changes_nothing() {
        let storage = MemoryStorage::new();
        storage.create(pokemon(1, "Bulbasaur", "Grass")).await.unwrap();

        let result = storage
            .update(
                99,
                PokemonUpdate {
                    name: Some("MissingNo".to_string()),
                    category: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(result, None);
        assert_eq!(storage.list_all().await.unwrap(), vec![pokemon(1, "Bulbasaur", "Grass")]);
    }

    #[tokio::test]
    async fn test_delete() {
        let storage = MemoryStorage::new();
        storage.create(pokemon(52, "Meowth", "Normal")).await.unwrap();

        assert!(storage.delete(52).await.unwrap());
        assert_eq!(storage.get(52).await.unwrap(), None);
        assert!(!storage.delete(52).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_missing_leaves_storage_unchanged() {
        let storage = MemoryStorage::new();
        storage.create(pokemon(1, "Bulbasaur", "Grass")).await.unwrap();

        assert!(!storage.delete(2).await.unwrap());
        assert_eq!(storage.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_all_returns_every_record() {
        let storage = MemoryStorage::new();
        let expected = vec![
            pokemon(1, "Bulbasaur", "Grass"),
            pokemon(4, "Charmander", "Fire"),
            pokemon(7, "Squirtle", "Water"),
        ];
        for p in &expected {
            storage.create(p.clone()).await.unwrap();
        }

        let mut listed = storage.list_all().await.unwrap();
        listed.sort_by_key(|p| p.id);
        assert_eq!(listed, expected);
    }
}
