use crate::DbError;
use async_trait::async_trait;
use core_types::Client;
use sqlx::postgres::PgPool;
use std::collections::HashMap;

/// Read-only access to trader records, by internal id.
#[async_trait]
pub trait ClientRepository: Send + Sync {
    /// Returns `Ok(None)` when no client has this id.
    async fn find_client(&self, id: &str) -> Result<Option<Client>, DbError>;
}

/// The `DbRepository` reads client records from PostgreSQL.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
}

impl DbRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClientRepository for DbRepository {
    async fn find_client(&self, id: &str) -> Result<Option<Client>, DbError> {
        let client = sqlx::query_as::<_, Client>(
            "SELECT id, name, cpf, plan, platform FROM clients WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(client)
    }
}

/// A fixed set of clients held in memory, for tests and database-less deployments.
#[derive(Debug, Clone, Default)]
pub struct InMemoryClientRepository {
    clients: HashMap<String, Client>,
}

impl InMemoryClientRepository {
    pub fn new(clients: impl IntoIterator<Item = Client>) -> Self {
        Self {
            clients: clients
                .into_iter()
                .map(|client| (client.id.clone(), client))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

#[async_trait]
impl ClientRepository for InMemoryClientRepository {
    async fn find_client(&self, id: &str) -> Result<Option<Client>, DbError> {
        Ok(self.clients.get(id.trim()).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(id: &str) -> Client {
        Client {
            id: id.to_string(),
            name: "Ana Souza".to_string(),
            cpf: "123.456.789-00".to_string(),
            plan: "50K".to_string(),
            platform: "Profit".to_string(),
        }
    }

    #[tokio::test]
    async fn in_memory_repository_finds_by_id() {
        let repo = InMemoryClientRepository::new(vec![client("c-1"), client("c-2")]);
        assert_eq!(repo.len(), 2);

        let found = repo.find_client(" c-2 ").await.unwrap();
        assert_eq!(found.map(|c| c.id), Some("c-2".to_string()));
        assert!(repo.find_client("c-9").await.unwrap().is_none());
    }
}
