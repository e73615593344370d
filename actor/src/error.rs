// Copyright 2025 Kore Ledger, SL
// SPDX-License-Identifier: Apache-2.0

//! # Errors module
//!

use crate::ActorRef;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for the actor system.
///
/// Every variant is local and non-fatal to the runtime: a caller that hits one
/// of these can keep using the system. Conditions that are logged and dropped
/// instead of surfaced (a message with no matching handler, a request reply
/// whose target is already gone) do not appear here.
#[derive(Clone, Debug, Error, PartialEq, Serialize, Deserialize)]
pub enum Error {
    /// An actor with the same reference is already registered.
    #[error("Actor '{0}' already exists.")]
    Exists(ActorRef),
    /// No actor is registered under the given reference.
    #[error("Actor '{0}' not found.")]
    NotFound(ActorRef),
    /// The target mailbox is closed and can no longer accept messages.
    #[error("Mailbox of actor '{0}' is closed.")]
    Closed(ActorRef),
    /// An error occurred while waiting for a response.
    #[error("An error occurred while receiving a response: {0}.")]
    Receive(String),
    /// The system has reached quiescence and no longer accepts new actors.
    #[error("The actor system is no longer running.")]
    NotRunning,
}
