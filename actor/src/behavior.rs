// Copyright 2025 Kore Ledger, SL
// SPDX-License-Identifier: Apache-2.0

//! # Behavior
//!
//! The `behavior` module provides the `Behavior` trait, the polymorphic
//! capability every actor's logic implements: register handlers during
//! `initialize`, then drive the receive loop in `run`.
//!

use crate::{ActorRef, Dispatcher, system::ActorSystem};

use async_trait::async_trait;

/// The pluggable logic an actor runs.
///
/// A behavior goes through exactly two phases. `initialize` is invoked
/// synchronously by [`spawn`](crate::ActorSystem::spawn), before the actor's
/// task starts, so handler registration is always complete before the first
/// envelope can be observed. `run` is then executed to completion on the
/// actor's own task; when it returns, the actor terminates and the system
/// reclaims its registry entry.
///
/// Handlers registered on the dispatcher take `&mut Self` as their first
/// argument: they always execute on the owning actor's task, never
/// concurrently with one another, so behavior state needs no synchronization.
/// A behavior that wants to originate traffic does so from `run` through
/// [`Dispatcher::send`].
///
/// # Examples
///
/// ```ignore
/// use actor::{ActorRef, ActorSystem, Behavior, Dispatcher, Message, Payload};
/// use async_trait::async_trait;
///
/// #[derive(Default)]
/// struct Counter {
///     total: u64,
///     running: bool,
/// }
///
/// impl Counter {
///     fn on_add(&mut self, payload: Payload) {
///         if let Ok(amount) = payload.downcast::<u64>() {
///             self.total += amount;
///         }
///     }
///
///     fn on_total(&mut self, _payload: Payload) -> Message {
///         Message::new("Total", self.total)
///     }
///
///     fn on_quit(&mut self, _envelope: Message) {
///         self.running = false;
///     }
/// }
///
/// #[async_trait]
/// impl Behavior for Counter {
///     fn initialize(
///         &mut self,
///         _me: ActorRef,
///         dispatcher: &mut Dispatcher<Self>,
///         _system: ActorSystem,
///     ) {
///         dispatcher.register_message_handler("Add", Self::on_add);
///         dispatcher.register_request_handler("Total", Self::on_total);
///         dispatcher.register_default_handler(Self::on_quit);
///     }
///
///     async fn run(&mut self, dispatcher: &mut Dispatcher<Self>) {
///         self.running = true;
///         while self.running {
///             if dispatcher.receive(self).await.is_err() {
///                 break;
///             }
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait Behavior: Send + Sized + 'static {
    /// Establishes the behavior's handler tables and captures whatever the
    /// behavior needs from its identity and the system. Called exactly once,
    /// before any message can arrive.
    fn initialize(
        &mut self,
        me: ActorRef,
        dispatcher: &mut Dispatcher<Self>,
        system: ActorSystem,
    );

    /// The actor's thread-of-control. Runs to completion; returning
    /// terminates the actor.
    async fn run(&mut self, dispatcher: &mut Dispatcher<Self>);
}
