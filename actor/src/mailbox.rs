// Copyright 2025 Kore Ledger, SL
// SPDX-License-Identifier: Apache-2.0

//! # Mailbox
//!
//! The `mailbox` module provides the bounded FIFO queue owned by each actor.
//! The write side (`MailboxSender`) is shared through the system registry and
//! applies backpressure by suspending senders while the queue is full. The
//! read side (`MailboxReceiver`) has exactly one owner, the actor's
//! dispatcher, so mailbox contents never need external locking.
//!

use crate::{ActorRef, Error, Message};

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

use tracing::debug;

/// Creates the bounded mailbox for an actor.
///
/// # Arguments
///
/// * `owner` - The reference of the actor that will read this mailbox.
/// * `capacity` - Maximum number of queued envelopes before senders block.
///
/// # Returns
///
/// Returns a tuple of (sender, receiver) for the actor's mailbox.
///
pub(crate) fn mailbox(
    owner: ActorRef,
    capacity: usize,
) -> (MailboxSender, MailboxReceiver) {
    debug!("Creating mailbox for actor '{}'.", &owner);
    let (sender, receiver) = mpsc::channel(capacity);
    (
        MailboxSender {
            owner: owner.clone(),
            sender,
        },
        MailboxReceiver { owner, receiver },
    )
}

/// Write side of an actor's mailbox.
///
/// This is the handle returned by [`spawn`](crate::ActorSystem::spawn) and
/// [`by_ref`](crate::ActorSystem::by_ref). Any number of clones may exist;
/// every enqueued envelope is delivered to the single reading actor in FIFO
/// order per sender.
#[derive(Clone)]
pub struct MailboxSender {
    owner: ActorRef,
    sender: mpsc::Sender<Message>,
}

impl MailboxSender {
    /// Enqueues an envelope, suspending while the mailbox is full.
    ///
    /// # Errors
    ///
    /// Returns `Error::Closed` if the owning actor has terminated and its
    /// mailbox can no longer accept messages.
    ///
    pub async fn send(&self, message: Message) -> Result<(), Error> {
        self.sender
            .send(message)
            .await
            .map_err(|_| Error::Closed(self.owner.clone()))
    }

    /// The reference of the actor reading this mailbox.
    pub fn owner(&self) -> &ActorRef {
        &self.owner
    }

    /// True if the owning actor is gone and sends can no longer succeed.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// The fixed capacity chosen at spawn.
    pub fn max_capacity(&self) -> usize {
        self.sender.max_capacity()
    }
}

/// Read side of an actor's mailbox. Owned by the actor's dispatcher.
pub(crate) struct MailboxReceiver {
    owner: ActorRef,
    receiver: mpsc::Receiver<Message>,
}

impl MailboxReceiver {
    /// Waits for the next envelope. Returns `None` once the mailbox is
    /// closed and drained.
    pub(crate) async fn recv(&mut self) -> Option<Message> {
        self.receiver.recv().await
    }

    /// Pulls an envelope without waiting.
    pub(crate) fn try_recv(&mut self) -> Result<Message, TryRecvError> {
        self.receiver.try_recv()
    }

    pub(crate) fn owner(&self) -> &ActorRef {
        &self.owner
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn delivers_in_fifo_order() {
        let (sender, mut receiver) = mailbox(ActorRef::from("inbox"), 4);
        sender.send(Message::signal("First")).await.unwrap();
        sender.send(Message::signal("Second")).await.unwrap();

        assert_eq!(receiver.recv().await.unwrap().kind, "First");
        assert_eq!(receiver.recv().await.unwrap().kind, "Second");
    }

    #[tokio::test]
    async fn send_blocks_while_full() {
        let (sender, mut receiver) = mailbox(ActorRef::from("inbox"), 2);
        sender.send(Message::signal("First")).await.unwrap();
        sender.send(Message::signal("Second")).await.unwrap();

        let blocked = timeout(
            Duration::from_millis(50),
            sender.send(Message::signal("Third")),
        )
        .await;
        assert!(blocked.is_err());

        assert_eq!(receiver.recv().await.unwrap().kind, "First");

        timeout(
            Duration::from_millis(50),
            sender.send(Message::signal("Third")),
        )
        .await
        .expect("send must succeed once a slot is free")
        .unwrap();
    }

    #[tokio::test]
    async fn try_recv_reports_empty() {
        let (sender, mut receiver) = mailbox(ActorRef::from("inbox"), 1);
        assert!(matches!(receiver.try_recv(), Err(TryRecvError::Empty)));

        sender.send(Message::signal("Only")).await.unwrap();
        assert_eq!(receiver.try_recv().unwrap().kind, "Only");
    }

    #[tokio::test]
    async fn send_fails_when_reader_is_gone() {
        let (sender, receiver) = mailbox(ActorRef::from("inbox"), 1);
        drop(receiver);

        let result = sender.send(Message::signal("Late")).await;
        assert_eq!(result, Err(Error::Closed(ActorRef::from("inbox"))));
    }
}
