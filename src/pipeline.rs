//! The purge run: enumerate aliases, enumerate their contacts, delete them.
//!
//! Phases run strictly in sequence and never overlap. Every contact is
//! collected before the first deletion is issued, so a listing failure
//! leaves the account untouched.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::{
    api::{ApiError, ContactApi},
    ids::{AliasId, ContactId},
    observability::PROGRESS_LEVEL,
    pagination::collect_pages,
};

/// Where a purge run currently is. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    EnumeratingAliases,
    EnumeratingContacts,
    DeletingContacts,
    Done,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EnumeratingAliases => "enumerating_aliases",
            Self::EnumeratingContacts => "enumerating_contacts",
            Self::DeletingContacts => "deleting_contacts",
            Self::Done => "done",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PurgeOptions {
    /// Enumerate everything but issue no deletions.
    pub dry_run: bool,
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurgeReport {
    pub aliases: usize,
    pub contacts: usize,
    pub deleted: usize,
    pub dry_run: bool,
}

impl std::fmt::Display for PurgeReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Found {} aliases, {} contacts; deleted {}",
            self.aliases, self.contacts, self.deleted
        )?;
        if self.dry_run {
            f.write_str(" (dry run)")?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum PurgeError {
    #[error("Failed to list aliases: {0}")]
    ListAliases(#[source] ApiError),

    #[error("Failed to list contacts of alias {alias}: {source}")]
    ListContacts {
        alias: AliasId,
        #[source]
        source: ApiError,
    },

    #[error("Failed to delete contact {contact} ({deleted_so_far} deleted before it): {source}")]
    Delete {
        contact: ContactId,
        deleted_so_far: usize,
        #[source]
        source: ApiError,
    },
}

/// Every alias owned by the authenticated user.
pub async fn enumerate_aliases<A: ContactApi + ?Sized>(
    api: &A,
) -> Result<BTreeSet<AliasId>, ApiError> {
    collect_pages("aliases", move |page| api.list_aliases(page)).await
}

/// Every contact attached to one alias.
pub async fn enumerate_contacts<A: ContactApi + ?Sized>(
    api: &A,
    alias: AliasId,
) -> Result<BTreeSet<ContactId>, ApiError> {
    collect_pages("contacts", move |page| api.list_contacts(alias, page)).await
}

/// Union of the contacts of every alias, one alias at a time.
pub async fn collect_contacts<A: ContactApi + ?Sized>(
    api: &A,
    aliases: &BTreeSet<AliasId>,
) -> Result<BTreeSet<ContactId>, PurgeError> {
    let mut contacts = BTreeSet::new();

    for (done, &alias) in aliases.iter().enumerate() {
        let found = enumerate_contacts(api, alias)
            .await
            .map_err(|source| PurgeError::ListContacts { alias, source })?;

        tracing::event!(
            PROGRESS_LEVEL,
            %alias,
            found = found.len(),
            progress = done + 1,
            total = aliases.len(),
            "Listed alias contacts"
        );
        contacts.extend(found);
    }

    Ok(contacts)
}

/// Delete each contact once, in ascending id order. Stops at the first failure.
pub async fn delete_contacts<A: ContactApi + ?Sized>(
    api: &A,
    contacts: &BTreeSet<ContactId>,
) -> Result<usize, PurgeError> {
    let mut deleted = 0;

    for &contact in contacts {
        api.delete_contact(contact)
            .await
            .map_err(|source| PurgeError::Delete {
                contact,
                deleted_so_far: deleted,
                source,
            })?;

        deleted += 1;
        tracing::event!(
            PROGRESS_LEVEL,
            %contact,
            progress = deleted,
            total = contacts.len(),
            "Deleted contact"
        );
    }

    Ok(deleted)
}

/// Drives one purge run against a [`ContactApi`].
pub struct Purger<A> {
    api: A,
    options: PurgeOptions,
    stage: Stage,
}

impl<A: ContactApi> Purger<A> {
    pub fn new(api: A, options: PurgeOptions) -> Self {
        Self {
            api,
            options,
            stage: Stage::EnumeratingAliases,
        }
    }

    /// The stage reached so far. After a failed run this is the stage that failed.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    fn enter(&mut self, stage: Stage) {
        debug_assert!(stage >= self.stage, "purge stages only move forward");
        tracing::info!(from = %self.stage, to = %stage, "Purge stage");
        self.stage = stage;
    }

    pub async fn run(&mut self) -> Result<PurgeReport, PurgeError> {
        tracing::info!(dry_run = self.options.dry_run, "Starting contact purge");
        let aliases = enumerate_aliases(&self.api)
            .await
            .map_err(PurgeError::ListAliases)?;
        tracing::info!(count = aliases.len(), "Aliases enumerated");

        self.enter(Stage::EnumeratingContacts);
        let contacts = collect_contacts(&self.api, &aliases).await?;
        tracing::info!(count = contacts.len(), "Contacts enumerated");

        let deleted = if self.options.dry_run {
            tracing::info!(
                count = contacts.len(),
                "Dry run, skipping contact deletion"
            );
            0
        } else {
            self.enter(Stage::DeletingContacts);
            let deleted = delete_contacts(&self.api, &contacts).await?;
            tracing::info!(count = deleted, "Contacts deleted");
            deleted
        };

        self.enter(Stage::Done);

        Ok(PurgeReport {
            aliases: aliases.len(),
            contacts: contacts.len(),
            deleted,
            dry_run: self.options.dry_run,
        })
    }
}
