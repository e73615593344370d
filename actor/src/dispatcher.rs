// Copyright 2025 Kore Ledger, SL
// SPDX-License-Identifier: Apache-2.0

//! # Message dispatcher
//!
//! The `dispatcher` module provides the routing layer bound to exactly one
//! actor's mailbox. It owns the per-actor handler tables, classifies each
//! incoming envelope as a plain message or a request, and relays request
//! responses back to the requester through the system registry.
//!

use crate::{
    ActorRef, Error, Message, Payload, REQUEST_MESSAGE, RequestMessage,
    mailbox::MailboxReceiver, system::ActorSystem,
};

use tokio::sync::mpsc::error::TryRecvError;

use tracing::{debug, error};

use std::collections::HashMap;

/// One-way handler: consumes the payload of a matching plain message.
pub type MessageHandler<B> = Box<dyn FnMut(&mut B, Payload) + Send + Sync>;

/// Request handler: consumes the payload of a matching request and produces
/// the response message routed back to the requester.
pub type RequestHandler<B> = Box<dyn FnMut(&mut B, Payload) -> Message + Send + Sync>;

/// Fallback handler: receives the full envelope of any message no other
/// handler matched.
pub type DefaultHandler<B> = Box<dyn FnMut(&mut B, Message) + Send + Sync>;

/// Per-actor routing layer.
///
/// A dispatcher is bound 1:1 to an actor's mailbox plus a handle on the
/// system, and carries three handler tables: one-way handlers and request
/// handlers keyed by message kind, and at most one default handler. Tables
/// are populated during [`Behavior::initialize`](crate::Behavior::initialize)
/// and are not meant to change afterwards; registering the same kind twice
/// keeps the later handler.
///
/// All handler invocation happens synchronously on the owning actor's task:
/// no two handlers of the same actor ever run concurrently, so handlers may
/// mutate behavior state freely.
pub struct Dispatcher<B> {
    mailbox: MailboxReceiver,
    system: ActorSystem,
    message_handlers: HashMap<String, MessageHandler<B>>,
    request_handlers: HashMap<String, RequestHandler<B>>,
    default_handler: Option<DefaultHandler<B>>,
}

impl<B> Dispatcher<B> {
    /// Binds a new dispatcher to an actor's mailbox.
    pub(crate) fn new(mailbox: MailboxReceiver, system: ActorSystem) -> Self {
        Dispatcher {
            mailbox,
            system,
            message_handlers: HashMap::new(),
            request_handlers: HashMap::new(),
            default_handler: None,
        }
    }

    /// Registers the one-way handler for a message kind. A later
    /// registration for the same kind overwrites the earlier one.
    pub fn register_message_handler<F>(
        &mut self,
        kind: impl Into<String>,
        handler: F,
    ) where
        F: FnMut(&mut B, Payload) + Send + Sync + 'static,
    {
        self.message_handlers.insert(kind.into(), Box::new(handler));
    }

    /// Registers the request handler for a message kind. The returned
    /// message is delivered to the requester's `reply_to` mailbox by the
    /// dispatcher itself.
    pub fn register_request_handler<F>(
        &mut self,
        kind: impl Into<String>,
        handler: F,
    ) where
        F: FnMut(&mut B, Payload) -> Message + Send + Sync + 'static,
    {
        self.request_handlers.insert(kind.into(), Box::new(handler));
    }

    /// Registers the fallback handler invoked with the full envelope when no
    /// kind-specific handler matches.
    pub fn register_default_handler<F>(&mut self, handler: F)
    where
        F: FnMut(&mut B, Message) + Send + Sync + 'static,
    {
        self.default_handler = Some(Box::new(handler));
    }

    /// Waits for exactly one envelope and routes it.
    ///
    /// Reserved-kind envelopes are unwrapped and dispatched through the
    /// request handler table, and the handler's response is enqueued on the
    /// requester's mailbox. Everything else goes through the one-way table.
    /// An envelope nothing matches falls to the default handler, or is
    /// logged and dropped.
    ///
    /// # Errors
    ///
    /// Returns `Error::Closed` if the mailbox has been closed, which cannot
    /// happen while the actor is still registered.
    ///
    pub async fn receive(&mut self, behavior: &mut B) -> Result<(), Error> {
        match self.mailbox.recv().await {
            Some(envelope) => {
                self.dispatch(behavior, envelope).await;
                Ok(())
            }
            None => Err(Error::Closed(self.mailbox.owner().clone())),
        }
    }

    /// Routes one envelope if the mailbox is not empty, returning `false`
    /// without invoking anything otherwise. Lets an actor interleave message
    /// handling with periodic unrelated work.
    pub async fn try_receive(&mut self, behavior: &mut B) -> Result<bool, Error> {
        match self.mailbox.try_recv() {
            Ok(envelope) => {
                self.dispatch(behavior, envelope).await;
                Ok(true)
            }
            Err(TryRecvError::Empty) => Ok(false),
            Err(TryRecvError::Disconnected) => {
                Err(Error::Closed(self.mailbox.owner().clone()))
            }
        }
    }

    /// Resolves `target` through the system registry and enqueues the
    /// envelope on its mailbox, suspending while the target mailbox is full.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if no actor is registered under `target`.
    ///
    pub async fn send(
        &self,
        target: &ActorRef,
        message: Message,
    ) -> Result<(), Error> {
        let handle = self.system.by_ref(target).await?;
        handle.send(message).await
    }

    async fn dispatch(&mut self, behavior: &mut B, envelope: Message) {
        if envelope.is_request() {
            self.dispatch_request(behavior, envelope).await;
        } else {
            self.dispatch_message(behavior, envelope);
        }
    }

    fn dispatch_message(&mut self, behavior: &mut B, envelope: Message) {
        if let Some(handler) = self.message_handlers.get_mut(&envelope.kind) {
            debug!(
                "Actor '{}' handling message '{}'.",
                self.mailbox.owner(),
                &envelope.kind
            );
            handler(behavior, envelope.payload);
        } else if let Some(default) = self.default_handler.as_mut() {
            default(behavior, envelope);
        } else {
            error!(
                "Actor '{}' has no handler for message kind '{}', dropping message.",
                self.mailbox.owner(),
                &envelope.kind
            );
        }
    }

    async fn dispatch_request(&mut self, behavior: &mut B, envelope: Message) {
        let request = match envelope.payload.downcast::<RequestMessage>() {
            Ok(request) => request,
            Err(_) => {
                error!(
                    "Actor '{}' received a malformed '{}' envelope, dropping message.",
                    self.mailbox.owner(),
                    REQUEST_MESSAGE
                );
                return;
            }
        };
        if let Some(handler) = self.request_handlers.get_mut(&request.kind) {
            debug!(
                "Actor '{}' handling request '{}' from '{}'.",
                self.mailbox.owner(),
                &request.kind,
                &request.reply_to
            );
            let reply_to = request.reply_to;
            let response = handler(behavior, request.payload);
            self.reply(reply_to, response).await;
        } else if let Some(default) = self.default_handler.as_mut() {
            default(behavior, Message::request(request));
        } else {
            error!(
                "Actor '{}' has no handler for request kind '{}', dropping request.",
                self.mailbox.owner(),
                &request.kind
            );
        }
    }

    /// Best-effort delivery of a request response. A requester that has
    /// already terminated loses the response; nothing is retried.
    async fn reply(&self, reply_to: ActorRef, response: Message) {
        match self.system.by_ref(&reply_to).await {
            Ok(handle) => {
                if let Err(error) = handle.send(response).await {
                    error!(
                        "Actor '{}' could not deliver a response to '{}': {}",
                        self.mailbox.owner(),
                        &reply_to,
                        error
                    );
                }
            }
            Err(_) => {
                error!(
                    "Actor '{}' found no mailbox for reply target '{}', dropping response.",
                    self.mailbox.owner(),
                    &reply_to
                );
            }
        }
    }
}
