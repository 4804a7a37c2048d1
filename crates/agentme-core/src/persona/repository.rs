//! Persona store trait.
//!
//! Defines the interface for persona persistence and the current-persona
//! pointer.

use super::model::Persona;
use super::request::PersonaDraft;
use crate::error::Result;

/// An abstract store for personas and the "current persona" pointer.
///
/// Implementations persist the whole collection on every mutation. Reads never
/// fail: unreadable or corrupt content is treated as empty. Writes never
/// replace content they could not read.
///
/// # Implementation Notes
///
/// The store does not validate drafts and does not keep the current pointer in
/// sync with deletions. Callers that delete the current persona either re-point
/// it themselves or use [`PersonaStore::delete_and_reassign`].
#[async_trait::async_trait]
pub trait PersonaStore: Send + Sync {
    /// Assigns `id`/`created`, appends the persona and makes it current.
    ///
    /// Either both the collection and the pointer are updated or neither is.
    ///
    /// # Returns
    ///
    /// - `Ok(Persona)`: The stored record
    /// - `Err(AgentMeError::Storage)`: The underlying write failed
    /// - `Err(AgentMeError::Serialization)`: The stored collection is unreadable
    ///   and was left untouched
    async fn save(&self, draft: PersonaDraft) -> Result<Persona>;

    /// Returns every stored persona in insertion order.
    async fn list_all(&self) -> Vec<Persona>;

    /// Returns the persona marked current, if any.
    async fn get_current(&self) -> Option<Persona>;

    /// Overwrites the current pointer. `None` clears it.
    async fn set_current(&self, persona: Option<&Persona>) -> Result<()>;

    /// Removes the persona with the given id. Missing ids are a no-op.
    ///
    /// Fails without writing when the stored collection is unreadable.
    async fn delete(&self, id: &str) -> Result<()>;

    /// Finds a stored persona by id.
    async fn find(&self, id: &str) -> Option<Persona> {
        self.list_all().await.into_iter().find(|p| p.id == id)
    }

    /// Deletes a persona and re-points "current" if it was the deleted one.
    ///
    /// The new current persona is the first remaining one in stored order, or
    /// none if the collection is now empty.
    ///
    /// # Returns
    ///
    /// The current persona after the operation.
    async fn delete_and_reassign(&self, id: &str) -> Result<Option<Persona>> {
        let current = self.get_current().await;
        self.delete(id).await?;

        match current {
            Some(current) if current.id != id => Ok(Some(current)),
            Some(_) => {
                let next = self.list_all().await.into_iter().next();
                self.set_current(next.as_ref()).await?;
                Ok(next)
            }
            None => Ok(None),
        }
    }
}
