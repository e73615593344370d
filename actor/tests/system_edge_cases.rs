// Edge case tests for registry lifecycle, backpressure and the
// log-and-drop delivery paths.

use actor::{
    ActorRef, ActorSystem, Behavior, Dispatcher, Error, Message, Payload,
    RequestMessage,
};
use async_trait::async_trait;

use tokio::sync::mpsc;
use tokio::time::{sleep, timeout};
use tracing_test::traced_test;

use std::time::Duration;

// Terminates immediately; exercises dead-letter cleanup.
struct Mayfly;

#[async_trait]
impl Behavior for Mayfly {
    fn initialize(
        &mut self,
        _me: ActorRef,
        _dispatcher: &mut Dispatcher<Self>,
        _system: ActorSystem,
    ) {
    }

    async fn run(&mut self, _dispatcher: &mut Dispatcher<Self>) {}
}

// Stays alive until any envelope arrives.
struct Keeper;

#[async_trait]
impl Behavior for Keeper {
    fn initialize(
        &mut self,
        _me: ActorRef,
        _dispatcher: &mut Dispatcher<Self>,
        _system: ActorSystem,
    ) {
    }

    async fn run(&mut self, dispatcher: &mut Dispatcher<Self>) {
        let _ = dispatcher.receive(self).await;
    }
}

// Sleeps before draining its mailbox, so senders hit a full queue first.
struct Sloth {
    probe: mpsc::UnboundedSender<i64>,
}

impl Sloth {
    fn on_work(&mut self, payload: Payload) {
        if let Ok(value) = payload.downcast::<i64>() {
            let _ = self.probe.send(value);
        }
    }
}

#[async_trait]
impl Behavior for Sloth {
    fn initialize(
        &mut self,
        _me: ActorRef,
        dispatcher: &mut Dispatcher<Self>,
        _system: ActorSystem,
    ) {
        dispatcher.register_message_handler("Work", Self::on_work);
    }

    async fn run(&mut self, dispatcher: &mut Dispatcher<Self>) {
        sleep(Duration::from_millis(150)).await;
        for _ in 0..2 {
            if dispatcher.receive(self).await.is_err() {
                break;
            }
        }
    }
}

// Forwards every recognised envelope to a probe; processes a fixed number
// of envelopes of any kind, then terminates.
struct Selective {
    probe: mpsc::UnboundedSender<i64>,
    envelopes: usize,
}

impl Selective {
    fn on_known(&mut self, payload: Payload) {
        if let Ok(value) = payload.downcast::<i64>() {
            let _ = self.probe.send(value);
        }
    }
}

#[async_trait]
impl Behavior for Selective {
    fn initialize(
        &mut self,
        _me: ActorRef,
        dispatcher: &mut Dispatcher<Self>,
        _system: ActorSystem,
    ) {
        dispatcher.register_message_handler("Known", Self::on_known);
    }

    async fn run(&mut self, dispatcher: &mut Dispatcher<Self>) {
        for _ in 0..self.envelopes {
            if dispatcher.receive(self).await.is_err() {
                break;
            }
        }
    }
}

// Answers a fixed number of requests, then terminates.
struct Responder {
    envelopes: usize,
}

impl Responder {
    fn on_ping(&mut self, _payload: Payload) -> Message {
        Message::signal("Pong")
    }
}

#[async_trait]
impl Behavior for Responder {
    fn initialize(
        &mut self,
        _me: ActorRef,
        dispatcher: &mut Dispatcher<Self>,
        _system: ActorSystem,
    ) {
        dispatcher.register_request_handler("Ping", Self::on_ping);
    }

    async fn run(&mut self, dispatcher: &mut Dispatcher<Self>) {
        for _ in 0..self.envelopes {
            if dispatcher.receive(self).await.is_err() {
                break;
            }
        }
    }
}

#[tokio::test]
async fn test_send_to_unknown_actor_fails_immediately() {
    let system = ActorSystem::new();
    let ghost = ActorRef::from("ghost");

    let lookup = system.by_ref(&ghost).await;
    assert_eq!(lookup.err(), Some(Error::NotFound(ghost.clone())));

    system.run().await;
}

#[tokio::test]
async fn test_call_to_unknown_actor_fails_without_blocking() {
    let system = ActorSystem::new();
    let ghost = ActorRef::from("ghost");

    let outcome = timeout(
        Duration::from_secs(1),
        system.call(&ghost, Message::signal("Echo")),
    )
    .await
    .expect("a call to an unknown actor must not block");
    assert_eq!(outcome.err(), Some(Error::NotFound(ghost)));

    // The ephemeral syncer has already terminated, so the system quiesces.
    timeout(Duration::from_secs(1), system.run())
        .await
        .expect("no actor is left running");
}

#[tokio::test]
async fn test_dead_actor_is_eventually_unregistered() {
    let system = ActorSystem::new();
    let keeper = ActorRef::from("keeper");
    let mayfly = ActorRef::from("mayfly");
    let keeper_handle =
        system.spawn(keeper.clone(), Keeper, 4).await.unwrap();
    system.spawn(mayfly.clone(), Mayfly, 4).await.unwrap();

    let running = {
        let system = system.clone();
        tokio::spawn(async move { system.run().await })
    };

    let mut unregistered = false;
    for _ in 0..200 {
        if matches!(
            system.by_ref(&mayfly).await,
            Err(Error::NotFound(_))
        ) {
            unregistered = true;
            break;
        }
        sleep(Duration::from_millis(10)).await;
    }
    assert!(unregistered, "the dead actor must leave the registry");

    // The keeper was untouched by the cleanup of its sibling.
    assert!(system.by_ref(&keeper).await.is_ok());

    keeper_handle.send(Message::signal("Quit")).await.unwrap();
    running.await.unwrap();
    assert_eq!(
        system.by_ref(&keeper).await.err(),
        Some(Error::NotFound(keeper))
    );
}

#[tokio::test]
async fn test_backpressure_on_full_mailbox() {
    let system = ActorSystem::new();
    let (probe, mut observed) = mpsc::unbounded_channel();
    let handle = system
        .spawn(ActorRef::from("sloth"), Sloth { probe }, 1)
        .await
        .unwrap();

    handle.send(Message::new("Work", 1i64)).await.unwrap();

    // One slot, one queued envelope: the next send must block until the
    // actor wakes up and drains.
    let blocked = timeout(
        Duration::from_millis(50),
        handle.send(Message::new("Work", 2i64)),
    )
    .await;
    assert!(blocked.is_err());

    timeout(
        Duration::from_secs(1),
        handle.send(Message::new("Work", 2i64)),
    )
    .await
    .expect("send must unblock once the mailbox drains")
    .unwrap();

    system.run().await;
    assert_eq!(observed.recv().await, Some(1));
    assert_eq!(observed.recv().await, Some(2));
}

#[tokio::test]
#[traced_test]
async fn test_unhandled_message_does_not_wedge_the_actor() {
    let system = ActorSystem::new();
    let (probe, mut observed) = mpsc::unbounded_channel();
    let handle = system
        .spawn(
            ActorRef::from("selective"),
            Selective {
                probe,
                envelopes: 2,
            },
            4,
        )
        .await
        .unwrap();

    // The unknown envelope is dropped; the next one is still handled.
    handle.send(Message::signal("Unknown")).await.unwrap();
    handle.send(Message::new("Known", 9i64)).await.unwrap();
    system.run().await;

    assert_eq!(observed.recv().await, Some(9));
}

#[tokio::test]
#[traced_test]
async fn test_unresolvable_reply_target_drops_only_that_response() {
    let system = ActorSystem::new();
    let responder = ActorRef::from("responder");
    let handle = system
        .spawn(responder.clone(), Responder { envelopes: 2 }, 4)
        .await
        .unwrap();

    // A hand-built request whose reply-to actor never existed: the handler
    // runs, the response has nowhere to go, the actor keeps serving.
    handle
        .send(Message::request(RequestMessage {
            kind: "Ping".to_owned(),
            payload: Payload::empty(),
            reply_to: ActorRef::from("ghost"),
        }))
        .await
        .unwrap();

    let response = system
        .call(&responder, Message::signal("Ping"))
        .await
        .unwrap();
    assert_eq!(response.kind, "Pong");

    system.run().await;
}

#[tokio::test]
#[traced_test]
async fn test_malformed_reserved_envelope_is_dropped() {
    let system = ActorSystem::new();
    let responder = ActorRef::from("responder");
    let handle = system
        .spawn(responder.clone(), Responder { envelopes: 2 }, 4)
        .await
        .unwrap();

    // Reserved kind without a RequestMessage payload.
    handle
        .send(Message::new("RequestMessage", 42i64))
        .await
        .unwrap();

    let response = system
        .call(&responder, Message::signal("Ping"))
        .await
        .unwrap();
    assert_eq!(response.kind, "Pong");

    system.run().await;
}
