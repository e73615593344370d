// Copyright 2025 Kore Ledger, SL
// SPDX-License-Identifier: Apache-2.0

//! # Actor reference
//!
//! The `reference` module provides the `ActorRef` type. The `ActorRef` type is
//! the opaque identity naming an actor and its mailbox in the actor system.
//!

use serde::{Deserialize, Serialize};

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide nonce used to derive call-scoped references.
static CALL_NONCE: AtomicU64 = AtomicU64::new(0);

/// Opaque, comparable identity of an actor.
///
/// An `ActorRef` is the unique key under which an actor's mailbox is
/// registered in the [`ActorSystem`](crate::ActorSystem). References are
/// caller-supplied at spawn time; the system derives fresh ones for the
/// ephemeral actors backing [`call`](crate::ActorSystem::call).
///
/// The type is cheap to clone and safe to embed in messages, which is how
/// request/reply exchanges carry their reply-to address.
///
/// # Examples
///
/// ```ignore
/// use actor::ActorRef;
///
/// let reference = ActorRef::from("time-giver");
/// assert_eq!(reference.as_str(), "time-giver");
/// assert_eq!(reference.to_string(), "time-giver");
/// ```
#[derive(
    Clone, Hash, Eq, PartialEq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ActorRef(String);

impl ActorRef {
    /// Creates a reference from any string-like name.
    pub fn new(name: impl Into<String>) -> Self {
        ActorRef(name.into())
    }

    /// Returns the reference as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derives a fresh reference for one synchronous call against this
    /// target. The process-wide nonce guarantees that concurrent calls to
    /// the same target can never collide in the registry.
    pub(crate) fn call_scoped(&self) -> ActorRef {
        let nonce = CALL_NONCE.fetch_add(1, Ordering::Relaxed);
        ActorRef(format!("{}/sync-{}", self.0, nonce))
    }
}

impl From<&str> for ActorRef {
    fn from(name: &str) -> Self {
        ActorRef(name.to_owned())
    }
}

impl From<String> for ActorRef {
    fn from(name: String) -> Self {
        ActorRef(name)
    }
}

impl From<&String> for ActorRef {
    fn from(name: &String) -> Self {
        ActorRef(name.clone())
    }
}

impl fmt::Display for ActorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for ActorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
