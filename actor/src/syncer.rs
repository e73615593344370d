// Copyright 2025 Kore Ledger, SL
// SPDX-License-Identifier: Apache-2.0

//! # Syncer
//!
//! The `syncer` module provides the ephemeral behavior that bridges the
//! asynchronous mailbox model to a blocking call. One syncer is spawned per
//! [`call`](crate::ActorSystem::call) invocation under a call-scoped unique
//! reference; it sends a single request, waits for whatever is routed back
//! to its own mailbox, relays that to the caller, and terminates.
//!

use crate::{
    ActorRef, Behavior, Dispatcher, Error, Message, RequestMessage,
    system::ActorSystem,
};

use async_trait::async_trait;
use tokio::sync::oneshot;

use tracing::{debug, error};

/// Result relayed to the blocked caller of a synchronous call.
pub type CallResult = Result<Message, Error>;

/// One-shot request/reply bridge.
///
/// From the target's perspective the syncer is an ordinary correspondent:
/// the target's own dispatcher routes its request-handler response to the
/// syncer's mailbox like any other message, so no special casing is needed
/// anywhere on the target side. The syncer's default handler relays exactly
/// one envelope to the private reply channel and the behavior returns,
/// triggering standard actor termination and cleanup.
pub struct Syncer {
    me: Option<ActorRef>,
    target: ActorRef,
    outgoing: Option<Message>,
    reply: Option<oneshot::Sender<CallResult>>,
}

impl Syncer {
    /// Creates the bridge for one call against `target`, relaying its
    /// outcome through `reply`.
    pub fn new(
        target: ActorRef,
        outgoing: Message,
        reply: oneshot::Sender<CallResult>,
    ) -> Self {
        Syncer {
            me: None,
            target,
            outgoing: Some(outgoing),
            reply: Some(reply),
        }
    }

    fn on_response(&mut self, envelope: Message) {
        if let Some(reply) = self.reply.take() {
            if reply.send(Ok(envelope)).is_err() {
                debug!("Caller gave up before the response arrived.");
            }
        }
    }
}

#[async_trait]
impl Behavior for Syncer {
    fn initialize(
        &mut self,
        me: ActorRef,
        dispatcher: &mut Dispatcher<Self>,
        _system: ActorSystem,
    ) {
        dispatcher.register_default_handler(Self::on_response);
        self.me = Some(me);
    }

    async fn run(&mut self, dispatcher: &mut Dispatcher<Self>) {
        let (Some(me), Some(outgoing)) =
            (self.me.clone(), self.outgoing.take())
        else {
            error!("Syncer was started without being initialized.");
            return;
        };

        let request = Message::request(RequestMessage {
            kind: outgoing.kind,
            payload: outgoing.payload,
            reply_to: me.clone(),
        });
        if let Err(error) = dispatcher.send(&self.target, request).await {
            debug!(
                "Syncer '{}' could not reach '{}': {}",
                &me, &self.target, &error
            );
            if let Some(reply) = self.reply.take() {
                let _ = reply.send(Err(error));
            }
            return;
        }

        // Exactly one blocking receive: whatever the dispatcher routes here
        // goes through the default handler and out to the caller.
        if dispatcher.receive(self).await.is_err() {
            error!(
                "Syncer '{}' lost its mailbox before a response arrived.",
                &me
            );
        }
    }
}
