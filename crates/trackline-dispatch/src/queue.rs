//! The inbound message queue.
//!
//! The receive task is the only producer and writes raw lines into an
//! unbounded channel. The dispatcher is the only consumer: it drains the
//! channel on each tick, decodes the lines in arrival order, and keeps the
//! results in a FIFO it owns outright.

use std::collections::VecDeque;

use tokio::sync::mpsc;
use trackline_protocol::{Message, decode};
use trackline_transport::{LineReceiver, LineSender};

pub(crate) struct InboundQueue {
    lines: Option<LineReceiver>,
    messages: VecDeque<Message>,
}

impl InboundQueue {
    pub(crate) fn new() -> Self {
        Self {
            lines: None,
            messages: VecDeque::new(),
        }
    }

    /// Opens a fresh channel and returns the sender for a transport to
    /// feed. Lines from an earlier channel that were never pulled are lost.
    pub(crate) fn open(&mut self) -> LineSender {
        let (tx, rx) = mpsc::unbounded_channel();
        self.lines = Some(rx);
        tx
    }

    /// Moves every line received so far into the queue.
    pub(crate) fn pull(&mut self) -> usize {
        let Some(lines) = self.lines.as_mut() else {
            return 0;
        };
        let mut pulled = 0;
        while let Ok(line) = lines.try_recv() {
            self.messages.push_back(decode(&line));
            pulled += 1;
        }
        pulled
    }

    pub(crate) fn front(&self) -> Option<&Message> {
        self.messages.front()
    }

    pub(crate) fn pop_front(&mut self) -> Option<Message> {
        self.messages.pop_front()
    }

    /// Puts a message back at the head after a failed routing attempt.
    pub(crate) fn push_front(&mut self, message: Message) {
        self.messages.push_front(message);
    }

    /// Whether anything is waiting, decoded or not.
    pub(crate) fn has_pending(&self) -> bool {
        !self.messages.is_empty() || self.lines.as_ref().is_some_and(|rx| !rx.is_empty())
    }

    pub(crate) fn len(&self) -> usize {
        self.messages.len()
    }
}

#[cfg(test)]
mod tests {
    use trackline_protocol::MessageType;

    use super::*;

    #[test]
    fn test_pull_without_channel_is_empty() {
        let mut queue = InboundQueue::new();
        assert_eq!(queue.pull(), 0);
        assert!(!queue.has_pending());
        assert!(queue.front().is_none());
    }

    #[test]
    fn test_pull_decodes_in_arrival_order() {
        let mut queue = InboundQueue::new();
        let tx = queue.open();
        tx.send(r#"{"type":"Request","player":"Red","turnType":"Turn"}"#.into()).unwrap();
        tx.send("plain text".into()).unwrap();

        assert!(queue.has_pending(), "undecoded lines count as pending");
        assert_eq!(queue.pull(), 2);
        assert_eq!(queue.len(), 2);

        let first = queue.pop_front().unwrap();
        let second = queue.pop_front().unwrap();
        assert_eq!(first.message_type(), MessageType::Request);
        assert_eq!(second.to_string(), "plain text");
        assert!(!queue.has_pending());
    }

    #[test]
    fn test_push_front_restores_head() {
        let mut queue = InboundQueue::new();
        let tx = queue.open();
        tx.send("first".into()).unwrap();
        tx.send("second".into()).unwrap();
        queue.pull();

        let head = queue.pop_front().unwrap();
        queue.push_front(head);
        assert_eq!(queue.front().map(ToString::to_string).as_deref(), Some("first"));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_pull_after_sender_dropped_keeps_buffered_lines() {
        let mut queue = InboundQueue::new();
        let tx = queue.open();
        tx.send("last words".into()).unwrap();
        drop(tx);

        assert_eq!(queue.pull(), 1);
        assert_eq!(queue.pull(), 0);
        assert_eq!(queue.len(), 1);
    }
}
