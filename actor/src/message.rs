// Copyright 2025 Kore Ledger, SL
// SPDX-License-Identifier: Apache-2.0

//! # Message envelopes
//!
//! The `message` module provides the envelope shapes exchanged between
//! actors: `Message` for fire-and-forget traffic and `RequestMessage` for
//! request/reply exchanges. A request travels inside a plain `Message` whose
//! kind is the reserved [`REQUEST_MESSAGE`] tag, so a single mailbox shape
//! serves both patterns.
//!

use crate::ActorRef;

use std::any::Any;
use std::fmt;

/// Reserved message kind that marks an envelope as carrying a
/// [`RequestMessage`]. User-level message kinds must never use this literal.
pub const REQUEST_MESSAGE: &str = "RequestMessage";

/// Type-erased message payload.
///
/// Payloads are opaque to the runtime: the dispatcher routes on the message
/// kind alone and hands the payload to the registered handler, which decodes
/// it with [`downcast`](Payload::downcast). Decoding is checked, a mismatch
/// returns the payload untouched instead of panicking.
pub struct Payload(Box<dyn Any + Send>);

impl Payload {
    /// Wraps a value as an opaque payload.
    pub fn new<T: Any + Send>(value: T) -> Self {
        Payload(Box::new(value))
    }

    /// An empty payload for messages that are pure signals.
    pub fn empty() -> Self {
        Payload::new(())
    }

    /// Consumes the payload and recovers the value if it has the expected
    /// type. On mismatch the payload is handed back so the caller can try
    /// another decoding or forward the envelope unchanged.
    pub fn downcast<T: Any>(self) -> Result<T, Payload> {
        match self.0.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(raw) => Err(Payload(raw)),
        }
    }

    /// Borrows the value if it has the expected type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    /// True if the payload holds a value of the given type.
    pub fn is<T: Any>(&self) -> bool {
        self.0.is::<T>()
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Payload(..)")
    }
}

/// Envelope for one-way messages between actors.
#[derive(Debug)]
pub struct Message {
    /// Tag the receiving dispatcher routes on.
    pub kind: String,
    /// Opaque content, decoded by the matching handler.
    pub payload: Payload,
}

impl Message {
    /// Creates a message of the given kind carrying `payload`.
    pub fn new(kind: impl Into<String>, payload: impl Any + Send) -> Self {
        Message {
            kind: kind.into(),
            payload: Payload::new(payload),
        }
    }

    /// Creates a message with no content. Useful for tick or quit style
    /// notifications where the kind alone carries the meaning.
    pub fn signal(kind: impl Into<String>) -> Self {
        Message {
            kind: kind.into(),
            payload: Payload::empty(),
        }
    }

    /// Wraps a request into the plain envelope that transports it, using
    /// the reserved [`REQUEST_MESSAGE`] kind.
    pub fn request(request: RequestMessage) -> Self {
        Message {
            kind: REQUEST_MESSAGE.to_owned(),
            payload: Payload::new(request),
        }
    }

    /// True if this envelope transports a [`RequestMessage`].
    pub fn is_request(&self) -> bool {
        self.kind == REQUEST_MESSAGE
    }
}

/// Envelope for request/reply exchanges.
///
/// Carries the reference the response must be delivered to. The receiving
/// dispatcher invokes the matching request handler and routes the returned
/// [`Message`] to `reply_to` on the sender's behalf.
#[derive(Debug)]
pub struct RequestMessage {
    /// Tag the request handler table is keyed on.
    pub kind: String,
    /// Opaque content, decoded by the matching request handler.
    pub payload: Payload,
    /// Where the response message must be enqueued.
    pub reply_to: ActorRef,
}
