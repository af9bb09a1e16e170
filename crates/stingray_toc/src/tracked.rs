//! Change tracking shared by every editable value of an archive.
//!
//! An editable value is wrapped in [`Tracked`], which keeps the original next to the
//! current value and lists the containers that embed it. Containers count how many of
//! their values are modified with a [`ModificationCounter`], so asking whether a bank
//! needs rewriting never walks its contents.

use derive_more::derive::Display;
use std::collections::BTreeSet;
use std::mem;

use crate::error::{Error, Result};

/// A container that is written back when one of its values changes
#[derive(Debug, Display, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Owner {
    #[display("bank {_0:#018x}")]
    Bank(u64),

    #[display("stream {_0:#018x}")]
    Stream(u64),

    #[display("text bank {_0:#018x}")]
    TextBank(u64),
}

/// Number of modified values inside a container
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct ModificationCounter(u32);

impl ModificationCounter {
    pub fn raise(&mut self) {
        self.0 += 1;
    }

    /// Fails instead of wrapping when nothing is left to lower
    pub fn lower(&mut self, owner: Owner) -> Result<()> {
        self.0 = self
            .0
            .checked_sub(1)
            .ok_or(Error::ReferenceCountUnderflow(owner))?;
        Ok(())
    }

    pub fn count(&self) -> u32 {
        self.0
    }

    pub fn is_modified(&self) -> bool {
        self.0 > 0
    }
}

/// A value with its original and the containers embedding it
#[derive(Debug, Clone, PartialEq)]
pub struct Tracked<T> {
    current: T,
    previous: Option<T>,
    owners: BTreeSet<Owner>,
}

impl<T> Tracked<T> {
    pub fn new(value: T) -> Self {
        Self {
            current: value,
            previous: None,
            owners: BTreeSet::new(),
        }
    }

    pub fn get(&self) -> &T {
        &self.current
    }

    /// The value before the first edit, or the current value when unmodified
    pub fn original(&self) -> &T {
        self.previous.as_ref().unwrap_or(&self.current)
    }

    pub fn is_modified(&self) -> bool {
        self.previous.is_some()
    }

    /// Replaces the value, keeping the original on the first edit
    ///
    /// Returns `true` when this edit moved the value from unmodified to modified.
    pub fn set(&mut self, value: T) -> bool {
        let old = mem::replace(&mut self.current, value);
        if self.previous.is_none() {
            self.previous = Some(old);
            true
        } else {
            false
        }
    }

    /// Restores the original, returning `true` if the value was modified
    pub fn revert(&mut self) -> bool {
        self.take_edit().is_some()
    }

    /// Restores the original and hands back the edited value
    pub fn take_edit(&mut self) -> Option<T> {
        let previous = self.previous.take()?;
        Some(mem::replace(&mut self.current, previous))
    }

    pub fn owners(&self) -> &BTreeSet<Owner> {
        &self.owners
    }

    /// Returns `true` if `owner` was not listed yet
    pub fn add_owner(&mut self, owner: Owner) -> bool {
        self.owners.insert(owner)
    }

    pub fn retain_owners(&mut self, keep: impl FnMut(&Owner) -> bool) {
        self.owners.retain(keep);
    }
}
