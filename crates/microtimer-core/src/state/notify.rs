/// Change tags delivered to observers.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Notification {
    /// Elapsed time changed; both display strings are stale too.
    ElapsedChanged,
    /// Only the display strings changed (swap mode toggled).
    DisplayTextChanged,
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
pub(crate) struct Observers {
    next_id: u64,
    entries: Vec<(SubscriptionId, Box<dyn FnMut(Notification)>)>,
}

impl Observers {
    pub(crate) fn subscribe(&mut self, f: impl FnMut(Notification) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(f)));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    pub(crate) fn notify(&mut self, n: Notification) {
        for (_, f) in &mut self.entries {
            f(n);
        }
    }
}
