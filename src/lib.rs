

//! Core library for the Troupe framework.
//! Provides a minimal actor runtime: identities, bounded mailboxes, handler
//! dispatch and a blocking request/reply bridge over asynchronous message
//! passing. It is designed to stay small, the pieces here are the
//! concurrency core that richer actor stacks are built on.

pub use actor::{
    ActorRef, ActorSystem, Behavior, CallResult, DefaultHandler, Dispatcher,
    Error as ActorError, MailboxSender, Message, MessageHandler, Payload,
    REQUEST_MESSAGE, RequestMessage, RequestHandler, Syncer,
};
