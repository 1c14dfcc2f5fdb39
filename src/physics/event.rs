//! Contact-change notifications.

use std::fmt;

use super::contact::Contact;

/// Callback invoked with a shape's new contact list.
pub type ContactListener = Box<dyn FnMut(&[Contact]) + Send + Sync>;

/// Handle returned by [`ContactSignal::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Ordered list of subscribers to a shape's contact changes.
///
/// Delivery is synchronous, in subscription order, with no buffering.
#[derive(Default)]
pub struct ContactSignal {
    next_id: u64,
    listeners: Vec<(SubscriptionId, ContactListener)>,
}

impl ContactSignal {
    /// Register a listener. It stays subscribed until [`unsubscribe`](Self::unsubscribe).
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&[Contact]) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    /// Deliver `contacts` to every listener.
    pub fn emit(&mut self, contacts: &[Contact]) {
        for (_, listener) in &mut self.listeners {
            listener(contacts);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl fmt::Debug for ContactSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContactSignal")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
