//! Enter events and subscriber management.

use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;

use super::fix::PositionFix;
use crate::poi::SharedPoi;

/// The user arrived at a point of interest.
#[derive(Debug, Clone, PartialEq)]
pub struct EnterEvent {
    /// The point of interest that was entered.
    pub poi: SharedPoi,
    /// The fix that triggered the arrival.
    pub fix: PositionFix,
}

/// Why the location source stopped delivering fixes.
///
/// Mirrors the platform geolocation error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationFailure {
    /// The user denied location access.
    PermissionDenied,
    /// The position could not be determined (no signal, hardware failure).
    PositionUnavailable,
    /// No fix arrived within the source's timeout.
    Timeout,
}

impl LocationFailure {
    /// Map a W3C geolocation error code (1, 2, 3).
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            1 => Some(LocationFailure::PermissionDenied),
            2 => Some(LocationFailure::PositionUnavailable),
            3 => Some(LocationFailure::Timeout),
            _ => None,
        }
    }

    /// The W3C geolocation error code.
    pub fn code(&self) -> u16 {
        match self {
            LocationFailure::PermissionDenied => 1,
            LocationFailure::PositionUnavailable => 2,
            LocationFailure::Timeout => 3,
        }
    }
}

impl fmt::Display for LocationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationFailure::PermissionDenied => write!(f, "permission denied"),
            LocationFailure::PositionUnavailable => write!(f, "position unavailable"),
            LocationFailure::Timeout => write!(f, "timed out"),
        }
    }
}

/// Receives notifications from the proximity engine.
///
/// Called synchronously on the thread that processes fixes; implementations
/// must not block.
pub trait ProximityObserver: Send + Sync {
    /// The user arrived at a point of interest.
    fn on_enter(&self, event: &EnterEvent);

    /// The location source failed.
    fn on_location_unavailable(&self, failure: LocationFailure) {
        let _ = failure;
    }
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Ordered set of observers.
#[derive(Default)]
pub(crate) struct Subscribers {
    next_id: u64,
    entries: Vec<(SubscriptionId, Arc<dyn ProximityObserver>)>,
}

impl Subscribers {
    pub(crate) fn add(&mut self, observer: Arc<dyn ProximityObserver>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, observer));
        id
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn notify_enter(&self, event: &EnterEvent) {
        for (_, observer) in &self.entries {
            observer.on_enter(event);
        }
    }

    pub(crate) fn notify_location_unavailable(&self, failure: LocationFailure) {
        for (_, observer) in &self.entries {
            observer.on_location_unavailable(failure);
        }
    }
}

impl fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("count", &self.entries.len())
            .finish()
    }
}

/// Engine notifications in stream form.
#[derive(Debug, Clone)]
pub enum TourEvent {
    /// The user arrived at a point of interest.
    Entered(EnterEvent),
    /// The location source failed.
    LocationUnavailable(LocationFailure),
}

/// Observer that forwards notifications into a tokio channel.
///
/// Lets an async presentation layer consume engine output as a stream.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<TourEvent>,
}

impl ChannelObserver {
    /// Create an observer and the receiving end of its channel.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<TourEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Wrap an existing sender.
    pub fn new(tx: mpsc::UnboundedSender<TourEvent>) -> Self {
        Self { tx }
    }

    fn send(&self, event: TourEvent) {
        // Receiver gone means the presentation layer was torn down
        if self.tx.send(event).is_err() {
            tracing::trace!("Tour event receiver dropped");
        }
    }
}

impl ProximityObserver for ChannelObserver {
    fn on_enter(&self, event: &EnterEvent) {
        self.send(TourEvent::Entered(event.clone()));
    }

    fn on_location_unavailable(&self, failure: LocationFailure) {
        self.send(TourEvent::LocationUnavailable(failure));
    }
}
