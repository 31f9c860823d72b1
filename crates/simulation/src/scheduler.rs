//! Discrete-event scheduler.
//!
//! A min-heap over `(timestamp, sequence)` pairs. The sequence number is
//! assigned at insertion, so events sharing a timestamp are delivered in the
//! order they were scheduled.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use types::{Event, SequenceNumber, Timestamp};

/// An event plus its insertion-order tie-breaker.
#[derive(Debug, Clone)]
pub struct ScheduledEvent {
    pub event: Event,
    pub sequence: SequenceNumber,
}

impl ScheduledEvent {
    fn key(&self) -> (Timestamp, SequenceNumber) {
        (self.event.timestamp(), self.sequence)
    }
}

impl PartialEq for ScheduledEvent {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for ScheduledEvent {}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledEvent {
    /// Reversed lexicographic order, turning `BinaryHeap` into a min-heap.
    fn cmp(&self, other: &Self) -> Ordering {
        other.key().cmp(&self.key())
    }
}

/// Priority queue of timestamped events with strict delivery order.
///
/// `pop` yields strictly increasing `(timestamp, sequence)` pairs; the
/// current time is set to each popped event's timestamp and therefore never
/// decreases.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    queue: BinaryHeap<ScheduledEvent>,
    next_sequence: SequenceNumber,
    current_time: Timestamp,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an event, assigning the next sequence number.
    pub fn schedule(&mut self, event: Event) {
        let sequence = self.next_sequence;
        self.next_sequence += SequenceNumber(1);
        self.queue.push(ScheduledEvent { event, sequence });
    }

    /// Remove and return the earliest event, advancing the current time.
    pub fn pop(&mut self) -> Option<Event> {
        let scheduled = self.queue.pop()?;
        self.current_time = scheduled.event.timestamp();
        Some(scheduled.event)
    }

    /// The earliest event without removing it; does not advance time.
    pub fn peek(&self) -> Option<&Event> {
        self.queue.peek().map(|s| &s.event)
    }

    /// Current simulated time (timestamp of the last popped event).
    pub fn now(&self) -> Timestamp {
        self.current_time
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Drop all pending events and reset time and sequence to zero.
    pub fn clear(&mut self) {
        self.queue.clear();
        self.next_sequence = SequenceNumber(0);
        self.current_time = Timestamp::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::{AgentWakeup, ClientId};

    fn wakeup(timestamp: u64, agent: u64) -> Event {
        Event::AgentWakeup(AgentWakeup {
            timestamp: Timestamp(timestamp),
            agent_id: ClientId(agent),
        })
    }

    fn agent_of(event: &Event) -> ClientId {
        match event {
            Event::AgentWakeup(e) => e.agent_id,
            _ => unreachable!("test only schedules wakeups"),
        }
    }

    #[test]
    fn empty_on_construction() {
        let scheduler = Scheduler::new();
        assert!(scheduler.is_empty());
        assert_eq!(scheduler.len(), 0);
        assert_eq!(scheduler.now(), Timestamp::ZERO);
        assert!(scheduler.peek().is_none());
    }

    #[test]
    fn pop_orders_by_timestamp() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(wakeup(300, 1));
        scheduler.schedule(wakeup(100, 2));
        scheduler.schedule(wakeup(200, 3));

        let order: Vec<u64> = std::iter::from_fn(|| scheduler.pop())
            .map(|e| e.timestamp().raw())
            .collect();
        assert_eq!(order, vec![100, 200, 300]);
    }

    #[test]
    fn same_timestamp_is_fifo() {
        let mut scheduler = Scheduler::new();
        for agent in 1..=5 {
            scheduler.schedule(wakeup(100, agent));
        }

        let order: Vec<ClientId> = std::iter::from_fn(|| scheduler.pop())
            .map(|e| agent_of(&e))
            .collect();
        assert_eq!(
            order,
            vec![
                ClientId(1),
                ClientId(2),
                ClientId(3),
                ClientId(4),
                ClientId(5)
            ]
        );
    }

    #[test]
    fn mixed_timestamps_and_sequences() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(wakeup(200, 1));
        scheduler.schedule(wakeup(100, 2));
        scheduler.schedule(wakeup(200, 3));
        scheduler.schedule(wakeup(100, 4));

        let order: Vec<(u64, ClientId)> = std::iter::from_fn(|| scheduler.pop())
            .map(|e| (e.timestamp().raw(), agent_of(&e)))
            .collect();
        assert_eq!(
            order,
            vec![
                (100, ClientId(2)),
                (100, ClientId(4)),
                (200, ClientId(1)),
                (200, ClientId(3)),
            ]
        );
    }

    #[test]
    fn popped_keys_strictly_increase() {
        let mut scheduler = Scheduler::new();
        for (t, a) in [(50u64, 1u64), (10, 2), (50, 3), (10, 4), (30, 5)] {
            scheduler.schedule(wakeup(t, a));
        }

        let mut previous = None;
        while let Some(event) = scheduler.pop() {
            let t = event.timestamp();
            if let Some(prev) = previous {
                assert!(t >= prev);
            }
            previous = Some(t);
        }
    }

    #[test]
    fn now_updates_on_pop_not_on_peek() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(wakeup(500, 1));

        assert!(scheduler.peek().is_some());
        assert_eq!(scheduler.now(), Timestamp::ZERO);

        scheduler.pop();
        assert_eq!(scheduler.now(), Timestamp(500));
    }

    #[test]
    fn clear_resets_everything() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(wakeup(100, 1));
        scheduler.schedule(wakeup(200, 2));
        scheduler.pop();

        scheduler.clear();
        assert!(scheduler.is_empty());
        assert_eq!(scheduler.now(), Timestamp::ZERO);

        // Sequence restarts: new ties are again FIFO from zero.
        scheduler.schedule(wakeup(100, 7));
        scheduler.schedule(wakeup(100, 8));
        assert_eq!(agent_of(&scheduler.pop().unwrap()), ClientId(7));
    }
}
