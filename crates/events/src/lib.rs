use crossbeam_channel::{Receiver, Sender};

pub use crate::{event::*, event_data::*};

mod event;
mod event_data;

pub type EventPublisher = Sender<Event>;
pub type EventSubscriber = Receiver<Event>;

/// Hook fired after every successful mutating ledger operation. Observers are
/// not consulted for correctness; a failing observer never rolls anything
/// back.
pub trait EventObserver: Send {
    fn notify(&mut self, event: &Event);
}

impl<F> EventObserver for F
where
    F: FnMut(&Event) + Send,
{
    fn notify(&mut self, event: &Event) {
        self(event)
    }
}

/// Forwards events into an unbounded channel so the writer never blocks.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    publisher: EventPublisher,
}

impl ChannelObserver {
    pub fn new(publisher: EventPublisher) -> Self {
        Self { publisher }
    }

    /// Creates an observer along with the subscriber end of its channel.
    pub fn unbounded() -> (Self, EventSubscriber) {
        let (publisher, subscriber) = crossbeam_channel::unbounded();
        (Self::new(publisher), subscriber)
    }
}

impl EventObserver for ChannelObserver {
    fn notify(&mut self, event: &Event) {
        if let Err(err) = self.publisher.send(event.clone()) {
            telemetry::warn!("dropping event, subscriber is gone: {err}");
        }
    }
}
