// Copyright 2025 Kore Ledger, SL
// SPDX-License-Identifier: Apache-2.0

//! # Actor system
//!
//! The `system` module provides the `ActorSystem` type. The `ActorSystem`
//! type owns the identity-to-mailbox registry, spawns actors on their own
//! tasks, reclaims terminated actors through a dead-letter completion queue,
//! and offers a blocking `call` convenience built from an ephemeral actor.
//!

use crate::{
    ActorRef, Behavior, Dispatcher, Error, Message,
    mailbox::{MailboxSender, mailbox},
    runner::ActorRunner,
    syncer::Syncer,
};

use tokio::sync::{Mutex, RwLock, mpsc, oneshot};
use tokio_util::task::TaskTracker;

use tracing::{debug, error};

use std::collections::HashMap;
use std::sync::Arc;

/// Capacity of the dead-letter completion queue.
const DEAD_LETTERS: usize = 1000;

/// Actor system.
///
/// A cheap-to-clone handle over shared state: every clone observes the same
/// registry and the same lifecycle. The registry is the only structure
/// mutated from multiple tasks ([`spawn`](ActorSystem::spawn) inserts, the
/// cleanup task started by [`run`](ActorSystem::run) removes) and is guarded
/// by a single lock; mailbox contents need no locking because each mailbox
/// has exactly one reader.
///
/// # Examples
///
/// ```ignore
/// use actor::{ActorRef, ActorSystem, Message};
///
/// #[tokio::main]
/// async fn main() {
///     let system = ActorSystem::new();
///     let giver = ActorRef::from("time-giver");
///     system.spawn(giver.clone(), TimeGiver::default(), 10).await.unwrap();
///
///     let response = system
///         .call(&giver, Message::signal("ComputeTime"))
///         .await
///         .unwrap();
///     println!("{:?}", response.kind);
///
///     let handle = system.by_ref(&giver).await.unwrap();
///     handle.send(Message::signal("Quit")).await.unwrap();
///     system.run().await;
/// }
/// ```
#[derive(Clone)]
pub struct ActorSystem {
    /// The mailboxes of the actors running in this actor system.
    actors: Arc<RwLock<HashMap<ActorRef, MailboxSender>>>,

    /// Tracks every actor task for global quiescence.
    tracker: TaskTracker,

    /// Write side of the completion queue, cloned into every runner.
    /// Dropped by `run` once the tracker is empty, which closes the queue.
    dead_letters: Arc<Mutex<Option<mpsc::Sender<ActorRef>>>>,

    /// Read side of the completion queue, claimed by the cleanup task.
    dead_letters_receiver: Arc<Mutex<Option<mpsc::Receiver<ActorRef>>>>,
}

impl ActorSystem {
    /// Create a new actor system.
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel(DEAD_LETTERS);
        ActorSystem {
            actors: Arc::new(RwLock::new(HashMap::new())),
            tracker: TaskTracker::new(),
            dead_letters: Arc::new(Mutex::new(Some(sender))),
            dead_letters_receiver: Arc::new(Mutex::new(Some(receiver))),
        }
    }

    /// Registers and starts a new actor.
    ///
    /// The mailbox is created with the given bounded `capacity` and the
    /// reference is checked and inserted atomically under the registry
    /// lock. The behavior is initialized synchronously, so its handler
    /// tables are complete before the actor's task starts and the first
    /// envelope can be observed.
    ///
    /// # Arguments
    ///
    /// * `reference` - The unique reference to register the actor under.
    /// * `behavior` - The logic the actor runs.
    /// * `capacity` - Mailbox capacity; senders block while it is full.
    ///
    /// # Returns
    ///
    /// Returns the write-side handle of the new actor's mailbox.
    ///
    /// # Errors
    ///
    /// Returns `Error::Exists` if the reference is already registered, and
    /// `Error::NotRunning` if the system has already reached quiescence and
    /// closed its completion queue.
    ///
    pub async fn spawn<B>(
        &self,
        reference: ActorRef,
        mut behavior: B,
        capacity: usize,
    ) -> Result<MailboxSender, Error>
    where
        B: Behavior,
    {
        let dead_letters = {
            let guard = self.dead_letters.lock().await;
            guard.as_ref().cloned().ok_or(Error::NotRunning)?
        };

        // tokio channels reject a zero capacity; a rendezvous mailbox
        // degrades to a single slot.
        let (sender, receiver) =
            mailbox(reference.clone(), capacity.max(1));
        {
            let mut actors = self.actors.write().await;
            if actors.contains_key(&reference) {
                error!("Actor '{}' already exists!", &reference);
                return Err(Error::Exists(reference));
            }
            actors.insert(reference.clone(), sender.clone());
        }

        let mut dispatcher = Dispatcher::new(receiver, self.clone());
        behavior.initialize(reference.clone(), &mut dispatcher, self.clone());

        let runner =
            ActorRunner::new(reference, behavior, dispatcher, dead_letters);
        self.tracker.spawn(runner.run());
        Ok(sender)
    }

    /// Retrieves the mailbox handle of a running actor.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if no actor is registered under
    /// `reference`, including actors already reclaimed by cleanup.
    ///
    pub async fn by_ref(
        &self,
        reference: &ActorRef,
    ) -> Result<MailboxSender, Error> {
        let actors = self.actors.read().await;
        actors
            .get(reference)
            .cloned()
            .ok_or_else(|| Error::NotFound(reference.clone()))
    }

    /// Blocks until every spawned actor, original and ephemeral, has
    /// terminated and been removed from the registry.
    ///
    /// Starts the single cleanup task that consumes the completion queue in
    /// arrival order, removing each dead actor from the registry exactly
    /// once. The queue is closed only after the last actor task has
    /// finished, and `run` returns only after the cleanup task has drained
    /// it, so no registry entry outlives the system.
    ///
    /// Shutdown is cooperative only: an actor that never returns from its
    /// `run` keeps the system alive forever. A concurrent second `run`
    /// degrades to waiting for quiescence.
    pub async fn run(&self) {
        let receiver = self.dead_letters_receiver.lock().await.take();
        let Some(mut receiver) = receiver else {
            self.tracker.wait().await;
            return;
        };

        debug!("Running actor system...");
        let system = self.clone();
        let cleaner = tokio::spawn(async move {
            while let Some(reference) = receiver.recv().await {
                system.remove_dead_actor(&reference).await;
            }
        });

        self.tracker.close();
        self.tracker.wait().await;

        // Every runner has finished and posted its completion. Dropping the
        // last write side closes the queue, so the cleaner drains what is
        // left and exits.
        self.dead_letters.lock().await.take();
        if cleaner.await.is_err() {
            error!("Dead-letter cleanup task failed.");
        }
        debug!("Actor system stopped.");
    }

    /// Synchronous convenience over the asynchronous model.
    ///
    /// Spawns a [`Syncer`] under a call-scoped unique reference with a
    /// capacity-1 mailbox, sends `message` to `target` as a request whose
    /// reply-to is the syncer, and blocks the caller until the syncer
    /// relays the outcome. There is no timeout and no cancellation: a
    /// target that accepts the request but never responds hangs the call.
    ///
    /// # Errors
    ///
    /// Propagates any error from spawning the syncer, and returns
    /// `Error::NotFound` when `target` does not resolve.
    ///
    pub async fn call(
        &self,
        target: &ActorRef,
        message: Message,
    ) -> Result<Message, Error> {
        let (reply_sender, reply_receiver) = oneshot::channel();
        let syncer = Syncer::new(target.clone(), message, reply_sender);
        self.spawn(target.call_scoped(), syncer, 1).await?;
        reply_receiver
            .await
            .map_err(|error| Error::Receive(error.to_string()))?
    }

    /// Removes a dead actor from the registry. Dropping the registry's
    /// sender closes the mailbox, so later lookups fail rather than
    /// silently buffering.
    async fn remove_dead_actor(&self, reference: &ActorRef) {
        let mut actors = self.actors.write().await;
        if actors.remove(reference).is_some() {
            debug!("Removed dead actor '{}'.", reference);
        }
    }
}

impl Default for ActorSystem {
    fn default() -> Self {
        Self::new()
    }
}
