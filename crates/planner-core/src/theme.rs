//! Dark/light mode resolution and the OS colour-scheme signal.
//!
//! A stored preference always wins. Without one, the resolver follows the OS
//! signal through a subscription until the user picks a mode explicitly;
//! from then on the OS signal is ignored for the rest of the session.

use std::sync::{
    mpsc::{self, Receiver, Sender},
    Arc, Mutex, Weak,
};

use planner_domain::ThemePreference;

#[derive(Debug)]
struct WatcherState {
    prefers_dark: bool,
    next_id: u64,
    subscribers: Vec<(u64, Sender<bool>)>,
}

/// Source of the OS-level "prefers dark" signal.
///
/// Platform glue calls [`ColorSchemeWatcher::publish`] whenever the OS
/// setting changes; consumers hold a [`ColorSchemeSubscription`].
#[derive(Debug, Clone)]
pub struct ColorSchemeWatcher {
    state: Arc<Mutex<WatcherState>>,
}

impl ColorSchemeWatcher {
    pub fn new(prefers_dark: bool) -> Self {
        Self {
            state: Arc::new(Mutex::new(WatcherState {
                prefers_dark,
                next_id: 1,
                subscribers: Vec::new(),
            })),
        }
    }

    pub fn prefers_dark(&self) -> bool {
        self.state
            .lock()
            .map(|state| state.prefers_dark)
            .unwrap_or(false)
    }

    /// Records a new OS value and notifies subscribers when it changed.
    pub fn publish(&self, prefers_dark: bool) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        if state.prefers_dark == prefers_dark {
            return;
        }
        state.prefers_dark = prefers_dark;
        state
            .subscribers
            .retain(|(_, sender)| sender.send(prefers_dark).is_ok());
        tracing::debug!(prefers_dark, "os colour scheme changed");
    }

    pub fn subscribe(&self) -> ColorSchemeSubscription {
        let (sender, receiver) = mpsc::channel();
        let id = match self.state.lock() {
            Ok(mut state) => {
                let id = state.next_id;
                state.next_id += 1;
                state.subscribers.push((id, sender));
                id
            }
            Err(_) => 0,
        };
        ColorSchemeSubscription {
            id,
            receiver,
            watcher: Arc::downgrade(&self.state),
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.state
            .lock()
            .map(|state| state.subscribers.len())
            .unwrap_or(0)
    }
}

/// Handle on the OS signal. Dropping or cancelling it unsubscribes.
#[derive(Debug)]
pub struct ColorSchemeSubscription {
    id: u64,
    receiver: Receiver<bool>,
    watcher: Weak<Mutex<WatcherState>>,
}

impl ColorSchemeSubscription {
    /// Drains pending notifications and returns the most recent one.
    pub fn try_latest(&self) -> Option<bool> {
        self.receiver.try_iter().last()
    }

    pub fn cancel(self) {}
}

impl Drop for ColorSchemeSubscription {
    fn drop(&mut self) {
        if let Some(state) = self.watcher.upgrade() {
            if let Ok(mut state) = state.lock() {
                state.subscribers.retain(|(id, _)| *id != self.id);
            }
        }
    }
}

/// Tracks the effective dark/light mode for one session.
#[derive(Debug)]
pub struct ThemeResolver {
    dark: bool,
    preference: Option<ThemePreference>,
    subscription: Option<ColorSchemeSubscription>,
}

impl ThemeResolver {
    /// Resolves the startup mode and, without a stored preference, starts
    /// following the OS signal.
    pub fn resolve(stored: Option<ThemePreference>, watcher: &ColorSchemeWatcher) -> Self {
        match stored {
            Some(preference) => Self {
                dark: preference.is_dark(),
                preference: Some(preference),
                subscription: None,
            },
            None => Self {
                dark: watcher.prefers_dark(),
                preference: None,
                subscription: Some(watcher.subscribe()),
            },
        }
    }

    pub fn is_dark(&self) -> bool {
        self.dark
    }

    pub fn preference(&self) -> Option<ThemePreference> {
        self.preference
    }

    pub fn is_tracking_os(&self) -> bool {
        self.subscription.is_some()
    }

    /// Applies pending OS changes. Returns `true` when the mode flipped.
    pub fn poll(&mut self) -> bool {
        let Some(latest) = self.subscription.as_ref().and_then(ColorSchemeSubscription::try_latest)
        else {
            return false;
        };
        let changed = latest != self.dark;
        self.dark = latest;
        changed
    }

    /// Records an explicit choice and stops OS tracking for the session.
    pub fn choose(&mut self, preference: ThemePreference) -> ThemePreference {
        if let Some(subscription) = self.subscription.take() {
            subscription.cancel();
        }
        self.preference = Some(preference);
        self.dark = preference.is_dark();
        preference
    }

    pub fn toggle(&mut self) -> ThemePreference {
        self.choose(ThemePreference::from_dark(!self.dark))
    }

    /// Forgets the stored choice so the next session follows the OS again.
    /// The current session keeps its mode and does not resume tracking.
    pub fn clear_preference(&mut self) {
        self.preference = None;
    }

    /// Releases the OS subscription. Call when the consuming view goes away.
    pub fn teardown(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_preference_wins_over_os() {
        let watcher = ColorSchemeWatcher::new(true);
        let resolver = ThemeResolver::resolve(Some(ThemePreference::Light), &watcher);
        assert!(!resolver.is_dark());
        assert!(!resolver.is_tracking_os());
        assert_eq!(watcher.subscriber_count(), 0);
    }

    #[test]
    fn follows_os_until_explicit_choice() {
        let watcher = ColorSchemeWatcher::new(false);
        let mut resolver = ThemeResolver::resolve(None, &watcher);
        assert!(!resolver.is_dark());
        assert_eq!(watcher.subscriber_count(), 1);

        watcher.publish(true);
        assert!(resolver.poll());
        assert!(resolver.is_dark());

        assert_eq!(resolver.toggle(), ThemePreference::Light);
        assert_eq!(watcher.subscriber_count(), 0);

        watcher.publish(false);
        watcher.publish(true);
        assert!(!resolver.poll());
        assert!(!resolver.is_dark());
    }

    #[test]
    fn poll_uses_latest_of_several_changes() {
        let watcher = ColorSchemeWatcher::new(false);
        let mut resolver = ThemeResolver::resolve(None, &watcher);
        watcher.publish(true);
        watcher.publish(false);
        assert!(!resolver.poll());
        assert!(!resolver.is_dark());
    }

    #[test]
    fn republishing_same_value_does_not_notify() {
        let watcher = ColorSchemeWatcher::new(true);
        let mut resolver = ThemeResolver::resolve(None, &watcher);
        watcher.publish(true);
        assert!(!resolver.poll());
    }

    #[test]
    fn teardown_and_drop_release_subscription() {
        let watcher = ColorSchemeWatcher::new(false);
        let mut first = ThemeResolver::resolve(None, &watcher);
        let second = ThemeResolver::resolve(None, &watcher);
        assert_eq!(watcher.subscriber_count(), 2);

        first.teardown();
        assert_eq!(watcher.subscriber_count(), 1);
        drop(second);
        assert_eq!(watcher.subscriber_count(), 0);
    }

    #[test]
    fn clearing_preference_does_not_resume_tracking() {
        let watcher = ColorSchemeWatcher::new(false);
        let mut resolver = ThemeResolver::resolve(None, &watcher);
        resolver.choose(ThemePreference::Dark);
        resolver.clear_preference();
        assert_eq!(resolver.preference(), None);
        assert!(!resolver.is_tracking_os());
        assert!(resolver.is_dark());
    }
}
