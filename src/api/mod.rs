//! Client side of the alias service API.
//!
//! [`ContactApi`] is the seam the purge pipeline talks through. The production
//! implementation is [`SimpleLoginClient`]; tests swap in an in-memory fake.

mod error;
pub mod simple_login;
#[cfg(test)]
pub mod test_utils;

use async_trait::async_trait;
pub use error::ApiError;
pub use simple_login::SimpleLoginClient;

use crate::ids::{AliasId, ContactId, PageId};

/// The three operations the purge needs from the service.
#[async_trait]
pub trait ContactApi: Send + Sync {
    /// List one page of the authenticated user's aliases.
    ///
    /// An empty page means there are no further pages.
    async fn list_aliases(&self, page: PageId) -> Result<Vec<AliasId>, ApiError>;

    /// List one page of the contacts attached to `alias`.
    async fn list_contacts(
        &self,
        alias: AliasId,
        page: PageId,
    ) -> Result<Vec<ContactId>, ApiError>;

    /// Delete a single contact. Irreversible.
    async fn delete_contact(&self, contact: ContactId) -> Result<(), ApiError>;
}
