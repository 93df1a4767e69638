//! Game event bus
//!
//! Events carry named arguments and are routed only to the handlers
//! subscribed to their [`EventType`]. A handler that returns `true` consumes
//! the event and later handlers never see it. Events are either queued for
//! the next [`EventSystem::dispatch`] or scheduled for a later bus time.

use std::collections::HashMap;

/// Kind of game event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    /// The game loop started
    GameStarted,
    /// The game loop ended
    GameEnded,
    /// A subsystem reported a critical error
    SystemFailure,
    /// A ship took damage
    ShipDamaged,
    /// A ship reached zero health
    ShipDestroyed,
}

/// Typed value attached to an event under a name
#[derive(Debug, Clone, PartialEq)]
pub enum EventArg {
    /// Name of a subsystem
    SystemName(String),
    /// Name of a ship
    ShipName(String),
    /// Scalar quantity such as damage dealt or health left
    Amount(f32),
}

/// A game event and its named arguments
#[derive(Debug, Clone)]
pub struct Event {
    /// What happened
    pub event_type: EventType,
    /// Bus time in seconds when the event was raised
    pub timestamp: f64,
    arguments: HashMap<&'static str, EventArg>,
}

impl Event {
    /// Event of `event_type` raised at `timestamp`, without arguments
    pub fn new(event_type: EventType, timestamp: f64) -> Self {
        Self {
            event_type,
            timestamp,
            arguments: HashMap::new(),
        }
    }

    /// `SystemFailure` naming the failed subsystem under `system`
    pub fn system_failure(system_name: impl Into<String>, timestamp: f64) -> Self {
        Self::new(EventType::SystemFailure, timestamp)
            .with_arg("system", EventArg::SystemName(system_name.into()))
    }

    /// Attach `value` under `key`, replacing any previous value
    pub fn with_arg(mut self, key: &'static str, value: EventArg) -> Self {
        self.arguments.insert(key, value);
        self
    }

    /// Argument stored under `key`
    pub fn get_arg(&self, key: &str) -> Option<&EventArg> {
        self.arguments.get(key)
    }

    /// The `system` argument, when it holds a subsystem name
    pub fn system_name(&self) -> Option<&str> {
        match self.get_arg("system") {
            Some(EventArg::SystemName(name)) => Some(name),
            _ => None,
        }
    }

    /// The `ship` argument, when it holds a ship name
    pub fn ship_name(&self) -> Option<&str> {
        match self.get_arg("ship") {
            Some(EventArg::ShipName(name)) => Some(name),
            _ => None,
        }
    }

    /// Scalar argument stored under `key`
    pub fn amount(&self, key: &str) -> Option<f32> {
        match self.get_arg(key) {
            Some(EventArg::Amount(value)) => Some(*value),
            _ => None,
        }
    }
}

/// Receiver of events of the types it subscribed to
pub trait EventHandler {
    /// React to `event`; `true` consumes it
    fn on_event(&mut self, event: &Event) -> bool;
}

impl<F> EventHandler for F
where
    F: FnMut(&Event) -> bool,
{
    fn on_event(&mut self, event: &Event) -> bool {
        self(event)
    }
}

/// Subscriptions plus the queued and scheduled events
#[derive(Default)]
pub struct EventSystem {
    queued: Vec<Event>,
    /// Sorted by delivery time, earliest first
    scheduled: Vec<(f64, Event)>,
    subscribers: HashMap<EventType, Vec<Box<dyn EventHandler>>>,
    now: f64,
}

impl EventSystem {
    /// Bus with no subscribers at time zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the bus clock; scheduled events at or before `time` become due
    pub fn update_time(&mut self, time: f64) {
        self.now = time;
    }

    /// Bus clock in seconds
    pub fn current_time(&self) -> f64 {
        self.now
    }

    /// Subscribe a boxed handler to `event_type`
    pub fn register_handler(&mut self, event_type: EventType, handler: Box<dyn EventHandler>) {
        self.subscribers.entry(event_type).or_default().push(handler);
    }

    /// Subscribe a closure to `event_type`
    pub fn subscribe<F>(&mut self, event_type: EventType, handler: F)
    where
        F: FnMut(&Event) -> bool + 'static,
    {
        self.register_handler(event_type, Box::new(handler));
    }

    /// Handlers subscribed to `event_type`
    pub fn handler_count(&self, event_type: EventType) -> usize {
        self.subscribers.get(&event_type).map_or(0, Vec::len)
    }

    /// Queue `event` for the next dispatch
    pub fn send(&mut self, event: Event) {
        self.queued.push(event);
    }

    /// Schedule `event` for the first dispatch at or after `delivery_time`
    pub fn post(&mut self, delivery_time: f64, event: Event) {
        let index = self
            .scheduled
            .partition_point(|(time, _)| *time <= delivery_time);
        self.scheduled.insert(index, (delivery_time, event));
    }

    /// Events not yet delivered
    pub fn pending(&self) -> usize {
        self.queued.len() + self.scheduled.len()
    }

    /// Deliver queued events, then every scheduled event that is due.
    ///
    /// Events raised by handlers during delivery wait for the next call.
    /// Returns how many events were delivered.
    pub fn dispatch(&mut self) -> usize {
        let due_count = self
            .scheduled
            .partition_point(|(time, _)| *time <= self.now);
        let due: Vec<Event> = self.scheduled.drain(..due_count).map(|(_, event)| event).collect();
        let queued = std::mem::take(&mut self.queued);

        let mut delivered = 0;
        for event in queued.iter().chain(&due) {
            self.deliver(event);
            delivered += 1;
        }
        delivered
    }

    fn deliver(&mut self, event: &Event) {
        let Some(handlers) = self.subscribers.get_mut(&event.event_type) else {
            return;
        };
        for handler in handlers.iter_mut() {
            if handler.on_event(event) {
                break;
            }
        }
    }

    /// Drop queued and scheduled events
    pub fn clear(&mut self) {
        self.queued.clear();
        self.scheduled.clear();
    }

    /// Drop every subscription
    pub fn clear_handlers(&mut self) {
        self.subscribers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder(seen: &Rc<RefCell<Vec<EventType>>>, consume: bool) -> impl FnMut(&Event) -> bool {
        let seen = Rc::clone(seen);
        move |event: &Event| {
            seen.borrow_mut().push(event.event_type);
            consume
        }
    }

    #[test]
    fn test_only_subscribers_are_called() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventSystem::new();
        bus.subscribe(EventType::GameStarted, recorder(&seen, false));

        bus.send(Event::new(EventType::GameStarted, 0.0));
        bus.send(Event::new(EventType::GameEnded, 0.0));
        assert_eq!(bus.dispatch(), 2);

        assert_eq!(*seen.borrow(), vec![EventType::GameStarted]);
        assert_eq!(bus.pending(), 0);
    }

    #[test]
    fn test_scheduled_waits_for_clock() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventSystem::new();
        bus.subscribe(EventType::GameEnded, recorder(&seen, false));
        bus.post(1.0, Event::new(EventType::GameEnded, 0.0));

        bus.update_time(0.5);
        assert_eq!(bus.dispatch(), 0);
        assert_eq!(bus.pending(), 1);

        bus.update_time(1.0);
        assert_eq!(bus.dispatch(), 1);
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(bus.pending(), 0);
    }

    #[test]
    fn test_scheduled_delivered_in_time_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventSystem::new();
        bus.subscribe(EventType::GameEnded, recorder(&seen, false));
        bus.subscribe(EventType::GameStarted, recorder(&seen, false));
        bus.subscribe(EventType::ShipDestroyed, recorder(&seen, false));

        bus.post(3.0, Event::new(EventType::GameEnded, 0.0));
        bus.post(1.0, Event::new(EventType::GameStarted, 0.0));
        bus.post(2.0, Event::new(EventType::ShipDestroyed, 0.0));
        bus.update_time(2.5);
        bus.dispatch();

        assert_eq!(
            *seen.borrow(),
            vec![EventType::GameStarted, EventType::ShipDestroyed]
        );
        assert_eq!(bus.pending(), 1);
    }

    #[test]
    fn test_consumed_event_stops() {
        let first = Rc::new(RefCell::new(Vec::new()));
        let second = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventSystem::new();
        bus.subscribe(EventType::ShipDestroyed, recorder(&first, true));
        bus.subscribe(EventType::ShipDestroyed, recorder(&second, false));

        bus.send(Event::new(EventType::ShipDestroyed, 0.0));
        bus.dispatch();

        assert_eq!(first.borrow().len(), 1);
        assert!(second.borrow().is_empty());
    }

    #[test]
    fn test_named_arguments() {
        let event = Event::new(EventType::ShipDamaged, 2.0)
            .with_arg("ship", EventArg::ShipName("Kestrel".to_string()))
            .with_arg("damage", EventArg::Amount(12.5));

        assert_eq!(event.ship_name(), Some("Kestrel"));
        assert_eq!(event.amount("damage"), Some(12.5));
        assert_eq!(event.amount("health"), None);
        assert_eq!(event.system_name(), None);
        assert_eq!(Event::system_failure("renderer", 0.0).system_name(), Some("renderer"));
    }

    #[test]
    fn test_clear_keeps_subscriptions() {
        let mut bus = EventSystem::new();
        bus.subscribe(EventType::GameStarted, |_: &Event| false);
        bus.send(Event::new(EventType::GameStarted, 0.0));
        bus.post(3.0, Event::new(EventType::GameEnded, 0.0));

        bus.clear();
        assert_eq!(bus.pending(), 0);
        assert_eq!(bus.handler_count(EventType::GameStarted), 1);

        bus.clear_handlers();
        assert_eq!(bus.handler_count(EventType::GameStarted), 0);
    }
}
