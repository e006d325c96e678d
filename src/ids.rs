//! Identifier newtypes for SimpleLogin resources.
//!
//! Alias and contact ids are both plain integers on the wire. Keeping them as
//! distinct types stops a contact id from being passed where an alias id is
//! expected.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a user-owned alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AliasId(pub u64);

/// Identifier of a contact, scoped under one alias by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(pub u64);

/// Zero-based page cursor used by the listing endpoints (`page_id`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PageId(pub u32);

impl PageId {
    pub const FIRST: PageId = PageId(0);

    /// The page after this one, or `None` once the cursor is at `u32::MAX`.
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(PageId)
    }
}

impl fmt::Display for AliasId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
