//! Wire types for the SimpleLogin listing endpoints.
//!
//! Only the `id` of each record is read; every other field the service sends
//! (email, creation time, counters...) is ignored.

use serde::Deserialize;

use crate::ids::{AliasId, ContactId};

/// A listed record reduced to its identifier.
#[derive(Debug, Clone, Deserialize)]
pub struct IdRecord<I> {
    pub id: I,
}

/// Body of `GET /v2/aliases`.
#[derive(Debug, Clone, Deserialize)]
pub struct AliasesPage {
    pub aliases: Vec<IdRecord<AliasId>>,
}

/// Body of `GET /aliases/{alias_id}/contacts`.
#[derive(Debug, Clone, Deserialize)]
pub struct ContactsPage {
    pub contacts: Vec<IdRecord<ContactId>>,
}

impl AliasesPage {
    pub fn into_ids(self) -> Vec<AliasId> {
        self.aliases.into_iter().map(|record| record.id).collect()
    }
}

impl ContactsPage {
    pub fn into_ids(self) -> Vec<ContactId> {
        self.contacts.into_iter().map(|record| record.id).collect()
    }
}
