// Copyright 2025 Kore Ledger, SL
// SPDX-License-Identifier: Apache-2.0

//! # Troupe Actor Runtime
//!
//! A minimal actor-model runtime for Rust: independent units of behavior
//! communicate exclusively through asynchronous message passing over
//! per-actor bounded mailboxes, coordinated by a central registry that
//! manages lifecycle and supports a blocking request/reply idiom on top of
//! the asynchronous model.
//!
//! ## Overview
//!
//! The actor model treats "actors" as the fundamental units of computation:
//! each actor owns its state, reads a single mailbox, and interacts with the
//! rest of the system only by sending and receiving messages. This runtime
//! keeps the model deliberately small. There is no supervision tree, no
//! persistence, and no distribution; what it provides is the concurrency
//! core those systems are built on:
//!
//! - **Identity**: actors are registered under opaque, comparable
//!   [`ActorRef`] keys, unique in the registry for the actor's lifetime.
//! - **Mailboxes**: bounded FIFO queues of envelopes. Senders suspend while
//!   a mailbox is full (producer backpressure) and the owning actor suspends
//!   while it is empty.
//! - **Dispatch**: each actor binds a [`Dispatcher`] that routes incoming
//!   envelopes by message kind to handlers registered during
//!   initialization. Handlers run strictly on the owning actor's task, so
//!   actor state needs no synchronization.
//! - **Request/reply**: a request envelope carries a reply-to reference;
//!   the target's dispatcher routes the registered request handler's
//!   response back to the requester automatically. The system's
//!   [`call`](ActorSystem::call) turns this into a blocking invocation by
//!   spawning a one-shot [`Syncer`] actor per call.
//! - **Quiescence**: terminated actors report themselves on a completion
//!   queue; [`run`](ActorSystem::run) drains it through a single cleanup
//!   task and returns once every actor, original and ephemeral, is gone.
//!
//! ## Getting started
//!
//! ```ignore
//! use actor::{
//!     ActorRef, ActorSystem, Behavior, Dispatcher, Message, Payload,
//! };
//! use async_trait::async_trait;
//!
//! #[derive(Default)]
//! struct Greeter {
//!     greeted: usize,
//!     running: bool,
//! }
//!
//! impl Greeter {
//!     fn on_greet(&mut self, payload: Payload) {
//!         if let Ok(name) = payload.downcast::<String>() {
//!             println!("hello, {name}");
//!             self.greeted += 1;
//!         }
//!     }
//!
//!     fn on_count(&mut self, _payload: Payload) -> Message {
//!         Message::new("Counted", self.greeted)
//!     }
//!
//!     fn on_quit(&mut self, _envelope: Message) {
//!         self.running = false;
//!     }
//! }
//!
//! #[async_trait]
//! impl Behavior for Greeter {
//!     fn initialize(
//!         &mut self,
//!         _me: ActorRef,
//!         dispatcher: &mut Dispatcher<Self>,
//!         _system: ActorSystem,
//!     ) {
//!         dispatcher.register_message_handler("Greet", Self::on_greet);
//!         dispatcher.register_request_handler("Count", Self::on_count);
//!         dispatcher.register_default_handler(Self::on_quit);
//!     }
//!
//!     async fn run(&mut self, dispatcher: &mut Dispatcher<Self>) {
//!         self.running = true;
//!         while self.running {
//!             if dispatcher.receive(self).await.is_err() {
//!                 break;
//!             }
//!         }
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let system = ActorSystem::new();
//!     let greeter = ActorRef::from("greeter");
//!     let handle = system
//!         .spawn(greeter.clone(), Greeter::default(), 10)
//!         .await
//!         .unwrap();
//!
//!     handle
//!         .send(Message::new("Greet", String::from("world")))
//!         .await
//!         .unwrap();
//!
//!     let counted = system
//!         .call(&greeter, Message::signal("Count"))
//!         .await
//!         .unwrap();
//!     assert_eq!(counted.payload.downcast::<usize>().ok(), Some(1));
//!
//!     handle.send(Message::signal("Quit")).await.unwrap();
//!     system.run().await;
//! }
//! ```
//!
//! ## Delivery guarantees
//!
//! Messages from one sender to one target are delivered and processed in
//! send order. No ordering holds across distinct senders to the same
//! target, nor across distinct targets. Delivery of request responses is
//! best effort: if the requester is gone by the time the response is ready,
//! the response is logged and dropped, never retried.
//!

// Private modules containing the implementation
mod behavior;
mod dispatcher;
mod error;
mod mailbox;
mod message;
mod reference;
mod runner;
mod syncer;
mod system;

/// Opaque identity naming an actor and its mailbox.
///
/// Unique key into the system registry; caller-supplied at spawn time, or
/// derived by the system for the ephemeral actors backing `call`.
pub use reference::ActorRef;

/// The pluggable logic an actor runs, polymorphic over initialize/run.
pub use behavior::Behavior;

/// Per-actor routing layer mapping message kinds to handlers.
///
/// Provides handler registration, blocking and non-blocking
/// receive-and-route, and the cross-actor send primitive.
pub use dispatcher::Dispatcher;

/// Handler signatures accepted by the dispatcher's registration methods.
pub use dispatcher::{DefaultHandler, MessageHandler, RequestHandler};

/// Comprehensive error type for all actor system operations.
pub use error::Error;

/// Write side of an actor's bounded mailbox.
pub use mailbox::MailboxSender;

/// Envelope shapes exchanged between actors, and the type-erased payload
/// they carry.
pub use message::{Message, Payload, RequestMessage};

/// Reserved message kind transporting a [`RequestMessage`]. User-level
/// message kinds must never use this literal.
pub use message::REQUEST_MESSAGE;

/// Ephemeral actor bridging the asynchronous mailbox model to a blocking
/// call for external callers.
pub use syncer::{CallResult, Syncer};

/// The registry owning every actor's identity and lifecycle.
pub use system::ActorSystem;
