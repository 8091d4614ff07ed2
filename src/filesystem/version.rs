use futures_channel::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Stream of versions published after each successful mutation.
pub type VersionReceiver = UnboundedReceiver<u64>;

/// Monotonically increasing change counter with push notification.
///
/// Subscribers receive every new version through an unbounded channel; sending never
/// calls back into the tree, so a bump cannot re-enter a mutation in progress.
#[derive(Debug, Default)]
pub struct VersionCounter {
    current: u64,
    subscribers: Vec<UnboundedSender<u64>>,
}

impl VersionCounter {
    pub fn current(&self) -> u64 {
        self.current
    }

    pub fn subscribe(&mut self) -> VersionReceiver {
        let (sender, receiver) = mpsc::unbounded();
        self.subscribers.push(sender);
        receiver
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub(crate) fn bump(&mut self) -> u64 {
        self.current += 1;
        let version = self.current;
        // closed receivers are dropped here
        self.subscribers
            .retain(|subscriber| subscriber.unbounded_send(version).is_ok());
        version
    }
}
