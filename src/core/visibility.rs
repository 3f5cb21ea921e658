//! Multiplexed visibility subscriptions.
//!
//! One backend observer is shared by every materialized card. The hub tracks
//! which keys are subscribed so repeated subscribe calls after each render
//! never double-register an element.

use std::collections::HashSet;
use std::marker::PhantomData;

use super::host::VisibilityBackend;

pub struct VisibilityHub<C, B> {
    backend: B,
    subscribed: HashSet<String>,
    _card: PhantomData<fn(&C)>,
}

impl<C, B: VisibilityBackend<C>> VisibilityHub<C, B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            subscribed: HashSet::new(),
            _card: PhantomData,
        }
    }

    /// Start observing `card`. No-op if `key` is already subscribed.
    pub fn subscribe(&mut self, key: &str, card: &C) {
        if self.subscribed.insert(key.to_string()) {
            self.backend.observe(card);
        }
    }

    pub fn unsubscribe(&mut self, key: &str, card: &C) {
        if self.subscribed.remove(key) {
            self.backend.unobserve(card);
        }
    }

    #[inline]
    pub fn is_subscribed(&self, key: &str) -> bool {
        self.subscribed.contains(key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.subscribed.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.subscribed.is_empty()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}
