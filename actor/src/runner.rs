// Copyright 2025 Kore Ledger, SL
// SPDX-License-Identifier: Apache-2.0

//! # Actor execution wrapper
//!
//! The `runner` module pairs a `Behavior` with its thread-of-control. Each
//! runner executes one behavior to completion on its own task and then
//! reports the actor's death on the system's completion queue, from which a
//! single cleanup task reclaims the registry entry.
//!

use crate::{ActorRef, Behavior, Dispatcher};

use tokio::sync::mpsc;

use tracing::{debug, error};

/// Execution wrapper for a single actor.
///
/// Owns both halves the behavior works with, the behavior itself and its
/// dispatcher, so handler invocation can borrow them independently. The
/// runner is consumed by [`run`](ActorRunner::run), which the system spawns
/// on the task tracker backing global quiescence.
pub(crate) struct ActorRunner<B: Behavior> {
    me: ActorRef,
    behavior: B,
    dispatcher: Dispatcher<B>,
    dead_letters: mpsc::Sender<ActorRef>,
}

impl<B> ActorRunner<B>
where
    B: Behavior,
{
    pub(crate) fn new(
        me: ActorRef,
        behavior: B,
        dispatcher: Dispatcher<B>,
        dead_letters: mpsc::Sender<ActorRef>,
    ) -> Self {
        debug!("Creating runner for actor '{}'.", &me);
        ActorRunner {
            me,
            behavior,
            dispatcher,
            dead_letters,
        }
    }

    /// Runs the behavior to completion and reports the actor's death.
    ///
    /// No panic isolation happens here: a behavior that fails internally is
    /// the behavior's own responsibility.
    pub(crate) async fn run(mut self) {
        debug!("Actor '{}' is running.", &self.me);
        self.behavior.run(&mut self.dispatcher).await;
        debug!("Actor '{}' has terminated.", &self.me);
        if self.dead_letters.send(self.me.clone()).await.is_err() {
            error!(
                "Failed to report termination of actor '{}'.",
                &self.me
            );
        }
    }
}
