use std::fmt;

/// Callback invoked with the name of the property that changed
pub type PropertyChangedHandler = Box<dyn FnMut(&str)>;

/// Handle returned by [`NotifyPropertyChanged::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl From<u64> for SubscriptionId {
    fn from(raw: u64) -> Self {
        SubscriptionId(raw)
    }
}

/// Observer registration for subjects that announce property changes
pub trait NotifyPropertyChanged {
    fn subscribe(&mut self, handler: PropertyChangedHandler) -> SubscriptionId;

    /// Returns false when the subscription was not registered
    fn unsubscribe(&mut self, id: SubscriptionId) -> bool;
}

/// Ready-made change notifier a subject can embed and hand out from
/// [`Inspectable::change_notifier`](crate::traits::inspectable::Inspectable::change_notifier)
#[derive(Default)]
pub struct PropertyChangedEvent {
    next_id: u64,
    handlers: Vec<(SubscriptionId, PropertyChangedHandler)>,
}

impl PropertyChangedEvent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tells every subscriber that `property` changed
    pub fn raise(&mut self, property: &str) {
        for (_, handler) in self.handlers.iter_mut() {
            handler(property);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.len()
    }
}

impl NotifyPropertyChanged for PropertyChangedEvent {
    fn subscribe(&mut self, handler: PropertyChangedHandler) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, handler));
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(registered, _)| *registered != id);
        self.handlers.len() != before
    }
}

impl fmt::Debug for PropertyChangedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyChangedEvent")
            .field("subscribers", &self.handlers.len())
            .finish()
    }
}
