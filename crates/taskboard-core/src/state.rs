use tokio::sync::watch;

use crate::theme::ThemeConfiguration;

/// Holds a value that readers can snapshot or subscribe to.
///
/// Mutation goes through [`Observable::replace`] only; every replacement
/// wakes subscribers. Stores keep their `Observable` private and hand out
/// snapshots and receivers.
#[derive(Debug)]
pub struct Observable<T> {
    tx: watch::Sender<T>,
}

/// State holder for the current theme
pub type ThemeState = Observable<ThemeConfiguration>;

impl<T: Clone> Observable<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Snapshot of the current value
    pub fn current(&self) -> T {
        self.tx.borrow().clone()
    }

    /// Run `f` against the current value without cloning it
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.tx.borrow())
    }

    /// Receiver that observes every later replacement
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }

    /// Swap in a new value, returning the previous one
    pub fn replace(&self, value: T) -> T {
        self.tx.send_replace(value)
    }
}

impl<T: Clone + Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_and_snapshot() {
        let state = ThemeState::default();
        assert_eq!(state.current(), ThemeConfiguration::default());

        let mut next = ThemeConfiguration::default();
        next.board_background = "#222".to_string();
        let previous = state.replace(next.clone());

        assert_eq!(previous, ThemeConfiguration::default());
        assert_eq!(state.current(), next);
        assert_eq!(state.with(|theme| theme.board_background.clone()), "#222");
    }

    #[test]
    fn test_subscribers_see_changes() {
        let state = Observable::new(1u32);
        let mut rx = state.subscribe();
        assert!(!rx.has_changed().unwrap());

        state.replace(2);
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), 2);
    }
}
