//! In-memory [`ContactApi`] for pipeline tests.
//!
//! Pages are scripted per endpoint; any page past the scripted ones is empty.
//! Every call is recorded so tests can assert on the exact request sequence.

use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;
use reqwest::StatusCode;

use super::{ApiError, ContactApi};
use crate::ids::{AliasId, ContactId, PageId};

/// One recorded call against the fake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    ListAliases(PageId),
    ListContacts(AliasId, PageId),
    Delete(ContactId),
}

#[derive(Debug, Default)]
pub struct FakeApi {
    alias_pages: Vec<Vec<AliasId>>,
    contact_pages: HashMap<AliasId, Vec<Vec<ContactId>>>,
    fail_alias_page: Option<PageId>,
    fail_contacts_for: Option<AliasId>,
    fail_delete: Option<ContactId>,
    calls: Mutex<Vec<Call>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_alias_pages(mut self, pages: &[&[u64]]) -> Self {
        self.alias_pages = pages
            .iter()
            .map(|page| page.iter().copied().map(AliasId).collect())
            .collect();
        self
    }

    pub fn with_contact_pages(mut self, alias: u64, pages: &[&[u64]]) -> Self {
        let pages = pages
            .iter()
            .map(|page| page.iter().copied().map(ContactId).collect())
            .collect();
        self.contact_pages.insert(AliasId(alias), pages);
        self
    }

    pub fn failing_alias_page(mut self, page: u32) -> Self {
        self.fail_alias_page = Some(PageId(page));
        self
    }

    pub fn failing_contacts_for(mut self, alias: u64) -> Self {
        self.fail_contacts_for = Some(AliasId(alias));
        self
    }

    pub fn failing_delete(mut self, contact: u64) -> Self {
        self.fail_delete = Some(ContactId(contact));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn deletions(&self) -> Vec<ContactId> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Delete(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn simulated_failure(url: String) -> ApiError {
        ApiError::Status {
            status: StatusCode::BAD_GATEWAY,
            url,
            body: "simulated failure".into(),
        }
    }
}

fn page_of<T: Clone>(pages: &[Vec<T>], page: PageId) -> Vec<T> {
    pages.get(page.0 as usize).cloned().unwrap_or_default()
}

#[async_trait]
impl ContactApi for FakeApi {
    async fn list_aliases(&self, page: PageId) -> Result<Vec<AliasId>, ApiError> {
        self.record(Call::ListAliases(page));
        if self.fail_alias_page == Some(page) {
            return Err(Self::simulated_failure(format!("/v2/aliases?page_id={page}")));
        }
        Ok(page_of(&self.alias_pages, page))
    }

    async fn list_contacts(
        &self,
        alias: AliasId,
        page: PageId,
    ) -> Result<Vec<ContactId>, ApiError> {
        self.record(Call::ListContacts(alias, page));
        if self.fail_contacts_for == Some(alias) {
            return Err(Self::simulated_failure(format!(
                "/aliases/{alias}/contacts?page_id={page}"
            )));
        }
        Ok(self
            .contact_pages
            .get(&alias)
            .map(|pages| page_of(pages, page))
            .unwrap_or_default())
    }

    async fn delete_contact(&self, contact: ContactId) -> Result<(), ApiError> {
        self.record(Call::Delete(contact));
        if self.fail_delete == Some(contact) {
            return Err(Self::simulated_failure(format!("/contacts/{contact}")));
        }
        Ok(())
    }
}
