//! Client repository port.
//!
//! Persistence for the Client aggregate plus the two selections the
//! scheduled jobs run against it.
//!
//! # Concurrency
//!
//! Updates are plain overwrites. Two handlers that read the same client
//! and write it back race, and the last write wins.

use async_trait::async_trait;

use crate::domain::billing::Client;
use crate::domain::foundation::{ClientId, DomainError, Timestamp};

#[async_trait]
pub trait ClientRepository: Send + Sync {
    /// Save a new client.
    ///
    /// # Errors
    ///
    /// - `DuplicateRecord` if the email is already registered
    /// - `DatabaseError` on persistence failure
    async fn save(&self, client: &Client) -> Result<(), DomainError>;

    /// Overwrite an existing client.
    ///
    /// # Errors
    ///
    /// - `ClientNotFound` if the client does not exist
    async fn update(&self, client: &Client) -> Result<(), DomainError>;

    /// Remove a client.
    ///
    /// # Errors
    ///
    /// - `ClientNotFound` if the client does not exist
    async fn delete(&self, id: ClientId) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: ClientId) -> Result<Option<Client>, DomainError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Client>, DomainError>;

    /// Client holding the given provider agreement.
    async fn find_by_subscription_id(
        &self,
        subscription_id: &str,
    ) -> Result<Option<Client>, DomainError>;

    /// All clients, oldest first.
    async fn list_all(&self) -> Result<Vec<Client>, DomainError>;

    /// Active clients not yet flagged overdue whose due date is before `as_of`.
    async fn find_overdue_candidates(&self, as_of: Timestamp) -> Result<Vec<Client>, DomainError>;

    /// Active, unpaid clients due inside `[from, to]` (inclusive).
    async fn find_due_within(
        &self,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<Client>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_repository_is_object_safe() {
        fn _accepts(_repo: &dyn ClientRepository) {}
    }
}
