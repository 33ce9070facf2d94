//! The geo-proximity engine.
//!
//! Turns a stream of position fixes into discrete arrival events, one per
//! visit per point of interest.
//!
//! # Evaluation
//!
//! ```text
//! PositionFix ──► validate ──► order check ──► for each POI (list order)
//!                                                 distance ──► ProximityState
//!                                                               │
//!                                              Entered ◄────────┘
//!                                                 │
//!                                      EnterEvent ──► subscribers
//! ```
//!
//! Evaluation is synchronous and allocation-light. The engine never spawns
//! tasks or timers; callers serialize all calls into it.

use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Arc;

use super::config::ProximityConfig;
use super::error::ProximityError;
use super::events::{EnterEvent, LocationFailure, ProximityObserver, Subscribers, SubscriptionId};
use super::fix::{PositionFix, Timestamp};
use super::state::{ProximityState, Transition};
use crate::geo::distance_meters;
use crate::poi::{PoiCatalog, PoiId, SharedPoi};

/// Summary of a POI-set replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoiSetUpdate {
    /// POIs that received a fresh outside state.
    pub added: usize,
    /// POIs whose state was discarded.
    pub removed: usize,
    /// POIs whose state was kept.
    pub retained: usize,
}

/// Detects arrivals at points of interest with a two-radius hysteresis band.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use canalguide::poi::PoiCatalog;
/// use canalguide::proximity::{ChannelObserver, GeoProximityEngine, PositionFix, ProximityConfig};
///
/// let catalog = PoiCatalog::amsterdam_canal_tour();
/// let mut engine = GeoProximityEngine::new(ProximityConfig::default(), catalog.pois().to_vec())?;
///
/// let (observer, mut events) = ChannelObserver::channel();
/// engine.subscribe(Arc::new(observer));
///
/// let arrivals = engine.process_fix(&PositionFix::at(52.37459, 4.88306, 1_000))?;
/// ```
#[derive(Debug)]
pub struct GeoProximityEngine {
    config: ProximityConfig,

    /// Current POI set, in evaluation order.
    pois: Vec<SharedPoi>,

    /// One state per POI in `pois`.
    states: HashMap<PoiId, ProximityState>,

    subscribers: Subscribers,

    /// Timestamp of the last accepted fix.
    last_fix_at: Option<Timestamp>,

    /// Set while the source is failed; cleared by the next valid fix.
    location_failure: Option<LocationFailure>,

    disposed: bool,
}

impl GeoProximityEngine {
    /// Create an engine for the given POI set.
    ///
    /// Fails with `InvalidConfiguration` if the radii are invalid, or
    /// `InvalidPoi` for duplicate ids or invalid coordinates.
    pub fn new(
        config: ProximityConfig,
        pois: impl IntoIterator<Item = SharedPoi>,
    ) -> Result<Self, ProximityError> {
        config.validate()?;

        let mut engine = Self {
            config,
            pois: Vec::new(),
            states: HashMap::new(),
            subscribers: Subscribers::default(),
            last_fix_at: None,
            location_failure: None,
            disposed: false,
        };
        engine.replace_pois(pois)?;

        tracing::debug!(
            enter_radius_m = config.enter_radius_meters,
            exit_radius_m = config.exit_radius_meters,
            pois = engine.pois.len(),
            "Proximity engine created"
        );

        Ok(engine)
    }

    /// Create an engine over a validated catalog.
    pub fn from_catalog(
        config: ProximityConfig,
        catalog: &PoiCatalog,
    ) -> Result<Self, ProximityError> {
        Self::new(config, catalog.pois().iter().cloned())
    }

    /// The radius configuration.
    pub fn config(&self) -> &ProximityConfig {
        &self.config
    }

    /// The current POI set in evaluation order.
    pub fn pois(&self) -> &[SharedPoi] {
        &self.pois
    }

    /// Proximity state for a POI.
    pub fn state(&self, id: &PoiId) -> Option<&ProximityState> {
        self.states.get(id)
    }

    /// POIs the user is currently inside, in list order.
    pub fn inside_pois(&self) -> impl Iterator<Item = &SharedPoi> {
        self.pois.iter().filter(|poi| {
            self.states
                .get(&poi.id)
                .is_some_and(ProximityState::is_inside)
        })
    }

    /// Timestamp of the last accepted fix.
    pub fn last_fix_at(&self) -> Option<Timestamp> {
        self.last_fix_at
    }

    /// Whether the location source is currently delivering.
    pub fn is_location_available(&self) -> bool {
        self.location_failure.is_none()
    }

    /// `Err(LocationUnavailable)` while the source is failed.
    pub fn location_status(&self) -> Result<(), ProximityError> {
        match self.location_failure {
            Some(failure) => Err(ProximityError::LocationUnavailable(failure)),
            None => Ok(()),
        }
    }

    /// Whether `dispose` has been called.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Register an observer for enter events and location failures.
    pub fn subscribe(&mut self, observer: Arc<dyn ProximityObserver>) -> SubscriptionId {
        self.subscribers.add(observer)
    }

    /// Remove an observer. Returns `false` if it was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }

    /// Number of registered observers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Replace the POI set.
    ///
    /// New ids start outside, removed ids are dropped, and ids present in
    /// both sets keep their state so the user is not re-notified about a POI
    /// they are already standing at. An invalid set leaves the current one
    /// untouched.
    pub fn replace_pois(
        &mut self,
        pois: impl IntoIterator<Item = SharedPoi>,
    ) -> Result<PoiSetUpdate, ProximityError> {
        self.ensure_active()?;

        let pois: Vec<SharedPoi> = pois.into_iter().collect();
        let mut seen = HashSet::with_capacity(pois.len());
        for poi in &pois {
            if let Err(e) = poi.coordinates.validate() {
                return Err(ProximityError::InvalidPoi {
                    id: poi.id.clone(),
                    reason: e.to_string(),
                });
            }
            if !seen.insert(&poi.id) {
                return Err(ProximityError::InvalidPoi {
                    id: poi.id.clone(),
                    reason: "duplicate id".to_string(),
                });
            }
        }

        let mut previous = std::mem::take(&mut self.states);
        let mut update = PoiSetUpdate::default();
        for poi in &pois {
            let state = match previous.remove(&poi.id) {
                Some(state) => {
                    update.retained += 1;
                    state
                }
                None => {
                    update.added += 1;
                    ProximityState::new(poi.id.clone())
                }
            };
            self.states.insert(poi.id.clone(), state);
        }
        update.removed = previous.len();
        self.pois = pois;

        tracing::debug!(
            added = update.added,
            removed = update.removed,
            retained = update.retained,
            "POI set replaced"
        );

        Ok(update)
    }

    /// Evaluate a fix against every POI.
    ///
    /// Returns the enter events emitted for this fix in POI-list order; the
    /// same events are delivered to all subscribers before returning.
    /// Rejected fixes leave all state unchanged.
    pub fn process_fix(&mut self, fix: &PositionFix) -> Result<Vec<EnterEvent>, ProximityError> {
        self.ensure_active()?;

        if let Err(e) = fix.coordinates.validate() {
            tracing::warn!(
                timestamp_ms = fix.timestamp.as_millis(),
                error = %e,
                "Rejected invalid position fix"
            );
            return Err(ProximityError::InvalidFix {
                timestamp: fix.timestamp,
                reason: e.to_string(),
            });
        }

        if let Some(last) = self.last_fix_at {
            if fix.timestamp < last {
                tracing::warn!(
                    timestamp_ms = fix.timestamp.as_millis(),
                    last_ms = last.as_millis(),
                    "Rejected out-of-order position fix"
                );
                return Err(ProximityError::OutOfOrderFix {
                    timestamp: fix.timestamp,
                    last,
                });
            }
        }

        self.last_fix_at = Some(fix.timestamp);
        if let Some(failure) = self.location_failure.take() {
            tracing::info!(previous = %failure, "Location restored");
        }

        let mut events = Vec::new();
        for poi in &self.pois {
            let Some(state) = self.states.get_mut(&poi.id) else {
                continue;
            };

            let distance = distance_meters(&fix.coordinates, &poi.coordinates);
            match state.evaluate(distance, &self.config, fix.timestamp) {
                Transition::Entered => {
                    tracing::info!(
                        poi_id = %poi.id,
                        poi = %poi.name,
                        distance_m = distance,
                        timestamp_ms = fix.timestamp.as_millis(),
                        "Entered POI"
                    );
                    events.push(EnterEvent {
                        poi: Arc::clone(poi),
                        fix: *fix,
                    });
                }
                Transition::Exited => {
                    tracing::debug!(
                        poi_id = %poi.id,
                        distance_m = distance,
                        "Left POI"
                    );
                }
                Transition::Remained | Transition::Unchanged => {}
            }
        }

        for event in &events {
            self.subscribers.notify_enter(event);
        }

        Ok(events)
    }

    /// Record that the location source failed.
    ///
    /// Subscribers are notified once per failure report. Proximity state is
    /// frozen until the next valid fix arrives.
    pub fn report_location_unavailable(
        &mut self,
        failure: LocationFailure,
    ) -> Result<(), ProximityError> {
        self.ensure_active()?;

        tracing::warn!(failure = %failure, "Location source unavailable");
        self.location_failure = Some(failure);
        self.subscribers.notify_location_unavailable(failure);
        Ok(())
    }

    /// Release all POIs, states and subscribers.
    ///
    /// Every later call that takes input fails with `Disposed`.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.pois.clear();
        self.states.clear();
        self.subscribers.clear();
        self.last_fix_at = None;
        self.location_failure = None;
        self.disposed = true;
        tracing::debug!("Proximity engine disposed");
    }

    fn ensure_active(&self) -> Result<(), ProximityError> {
        if self.disposed {
            Err(ProximityError::Disposed)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Coordinate;
    use crate::poi::PointOfInterest;
    use parking_lot::Mutex;

    /// Anne Frank Huis area.
    const POI_LAT: f64 = 52.3745;
    const POI_LON: f64 = 4.8838;

    /// Meters per degree of latitude with the engine's Earth radius.
    const METERS_PER_DEG_LAT: f64 = 111_194.926_644_558_7;

    fn poi(id: &str, lat: f64, lon: f64) -> SharedPoi {
        Arc::new(PointOfInterest::new(id, id, Coordinate::new(lat, lon)))
    }

    /// Fix `meters` due north of the test POI.
    fn fix_north(meters: f64, ts: u64) -> PositionFix {
        PositionFix::at(POI_LAT + meters / METERS_PER_DEG_LAT, POI_LON, ts)
    }

    fn engine_with(config: ProximityConfig, pois: Vec<SharedPoi>) -> GeoProximityEngine {
        GeoProximityEngine::new(config, pois).unwrap()
    }

    fn default_engine() -> GeoProximityEngine {
        engine_with(
            ProximityConfig::default(),
            vec![poi("afh", POI_LAT, POI_LON)],
        )
    }

    #[derive(Default)]
    struct Recorder {
        entered: Mutex<Vec<PoiId>>,
        failures: Mutex<Vec<LocationFailure>>,
    }

    impl ProximityObserver for Recorder {
        fn on_enter(&self, event: &EnterEvent) {
            self.entered.lock().push(event.poi.id.clone());
        }

        fn on_location_unavailable(&self, failure: LocationFailure) {
            self.failures.lock().push(failure);
        }
    }

    #[test]
    fn test_rejects_invalid_configuration() {
        let config = ProximityConfig {
            enter_radius_meters: 30.0,
            exit_radius_meters: 20.0,
        };
        let result = GeoProximityEngine::new(config, Vec::<SharedPoi>::new());
        assert!(matches!(
            result,
            Err(ProximityError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_fix_at_poi_emits_once() {
        let mut engine = default_engine();
        let events = engine
            .process_fix(&PositionFix::at(POI_LAT, POI_LON, 1))
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].poi.id.as_str(), "afh");
        assert_eq!(events[0].fix.timestamp, Timestamp::from_millis(1));
    }

    #[test]
    fn test_lingering_emits_once() {
        let mut engine = default_engine();
        let total: usize = (0..10)
            .map(|i| {
                engine
                    .process_fix(&PositionFix::at(POI_LAT, POI_LON, i))
                    .unwrap()
                    .len()
            })
            .sum();
        assert_eq!(total, 1);
    }

    #[test]
    fn test_hysteresis_sequence() {
        let config = ProximityConfig::new(20.0, 30.0).unwrap();
        let mut engine = engine_with(config, vec![poi("afh", POI_LAT, POI_LON)]);

        let distances = [50.0, 15.0, 25.0, 35.0, 10.0];
        let emitted: Vec<usize> = distances
            .iter()
            .enumerate()
            .map(|(i, d)| engine.process_fix(&fix_north(*d, i as u64)).unwrap().len())
            .collect();

        assert_eq!(emitted, vec![0, 1, 0, 0, 1]);
    }

    #[test]
    fn test_replace_with_same_id_keeps_inside_state() {
        let mut engine = default_engine();
        assert_eq!(engine.process_fix(&fix_north(5.0, 1)).unwrap().len(), 1);

        let update = engine
            .replace_pois(vec![poi("afh", POI_LAT, POI_LON)])
            .unwrap();
        assert_eq!(
            update,
            PoiSetUpdate {
                added: 0,
                removed: 0,
                retained: 1
            }
        );

        assert!(engine.process_fix(&fix_north(3.0, 2)).unwrap().is_empty());
        assert!(engine.state(&PoiId::new("afh")).unwrap().is_inside());
    }

    #[test]
    fn test_replace_adds_and_removes() {
        let mut engine = engine_with(
            ProximityConfig::default(),
            vec![poi("a", POI_LAT, POI_LON), poi("b", 52.0, 4.0)],
        );
        engine.process_fix(&PositionFix::at(POI_LAT, POI_LON, 1)).unwrap();

        let update = engine
            .replace_pois(vec![poi("a", POI_LAT, POI_LON), poi("c", POI_LAT, POI_LON)])
            .unwrap();
        assert_eq!(update.added, 1);
        assert_eq!(update.removed, 1);
        assert_eq!(update.retained, 1);
        assert!(engine.state(&PoiId::new("b")).is_none());
        assert!(!engine.state(&PoiId::new("c")).unwrap().is_inside());

        // Only the newly added POI fires
        let events = engine
            .process_fix(&PositionFix::at(POI_LAT, POI_LON, 2))
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].poi.id.as_str(), "c");
    }

    #[test]
    fn test_replace_rejects_duplicates_and_keeps_previous_set() {
        let mut engine = default_engine();
        let result = engine.replace_pois(vec![poi("x", 52.0, 4.0), poi("x", 52.1, 4.1)]);
        assert!(matches!(result, Err(ProximityError::InvalidPoi { .. })));
        assert_eq!(engine.pois().len(), 1);
        assert!(engine.state(&PoiId::new("afh")).is_some());
    }

    #[test]
    fn test_replace_rejects_invalid_coordinates() {
        let mut engine = default_engine();
        let result = engine.replace_pois(vec![poi("bad", f64::NAN, 4.0)]);
        assert!(matches!(result, Err(ProximityError::InvalidPoi { .. })));
    }

    #[test]
    fn test_out_of_order_fix_rejected_without_mutation() {
        let mut engine = default_engine();
        engine.process_fix(&fix_north(50.0, 100)).unwrap();

        let result = engine.process_fix(&PositionFix::at(POI_LAT, POI_LON, 99));
        assert!(matches!(
            result,
            Err(ProximityError::OutOfOrderFix { .. })
        ));
        assert!(!engine.state(&PoiId::new("afh")).unwrap().is_inside());
        assert_eq!(engine.last_fix_at(), Some(Timestamp::from_millis(100)));
    }

    #[test]
    fn test_equal_timestamp_accepted() {
        let mut engine = default_engine();
        engine.process_fix(&fix_north(50.0, 100)).unwrap();
        let events = engine
            .process_fix(&PositionFix::at(POI_LAT, POI_LON, 100))
            .unwrap();
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_nan_latitude_rejected() {
        let mut engine = default_engine();
        engine.process_fix(&PositionFix::at(POI_LAT, POI_LON, 1)).unwrap();
        let before = engine.state(&PoiId::new("afh")).cloned();

        let result = engine.process_fix(&PositionFix::at(f64::NAN, POI_LON, 2));
        assert!(matches!(result, Err(ProximityError::InvalidFix { .. })));
        assert_eq!(engine.state(&PoiId::new("afh")).cloned(), before);
        assert_eq!(engine.last_fix_at(), Some(Timestamp::from_millis(1)));
    }

    #[test]
    fn test_overlapping_pois_each_fire_in_list_order() {
        let mut engine = engine_with(
            ProximityConfig::default(),
            vec![
                poi("second", POI_LAT + 0.00005, POI_LON),
                poi("first", POI_LAT, POI_LON),
            ],
        );
        let events = engine
            .process_fix(&PositionFix::at(POI_LAT + 0.000025, POI_LON, 1))
            .unwrap();
        let ids: Vec<&str> = events.iter().map(|e| e.poi.id.as_str()).collect();
        assert_eq!(ids, vec!["second", "first"]);

        assert!(engine
            .process_fix(&PositionFix::at(POI_LAT + 0.000025, POI_LON, 2))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_subscribers_receive_events() {
        let mut engine = default_engine();
        let recorder = Arc::new(Recorder::default());
        let id = engine.subscribe(recorder.clone());
        assert_eq!(engine.subscriber_count(), 1);

        engine.process_fix(&PositionFix::at(POI_LAT, POI_LON, 1)).unwrap();
        assert_eq!(recorder.entered.lock().len(), 1);

        assert!(engine.unsubscribe(id));
        engine.process_fix(&fix_north(100.0, 2)).unwrap();
        engine.process_fix(&PositionFix::at(POI_LAT, POI_LON, 3)).unwrap();
        assert_eq!(recorder.entered.lock().len(), 1);
    }

    #[test]
    fn test_location_unavailable_freezes_state() {
        let mut engine = default_engine();
        let recorder = Arc::new(Recorder::default());
        engine.subscribe(recorder.clone());

        engine.process_fix(&PositionFix::at(POI_LAT, POI_LON, 1)).unwrap();
        engine
            .report_location_unavailable(LocationFailure::PermissionDenied)
            .unwrap();

        assert!(!engine.is_location_available());
        assert_eq!(
            engine.location_status(),
            Err(ProximityError::LocationUnavailable(
                LocationFailure::PermissionDenied
            ))
        );
        assert_eq!(
            *recorder.failures.lock(),
            vec![LocationFailure::PermissionDenied]
        );
        assert!(engine.state(&PoiId::new("afh")).unwrap().is_inside());

        // A fresh fix restores the source and does not re-fire
        assert!(engine
            .process_fix(&PositionFix::at(POI_LAT, POI_LON, 2))
            .unwrap()
            .is_empty());
        assert!(engine.is_location_available());
    }

    #[test]
    fn test_dispose_releases_everything() {
        let mut engine = default_engine();
        let recorder = Arc::new(Recorder::default());
        engine.subscribe(recorder.clone());
        engine.process_fix(&PositionFix::at(POI_LAT, POI_LON, 1)).unwrap();

        engine.dispose();
        assert!(engine.is_disposed());
        assert!(engine.pois().is_empty());
        assert!(engine.state(&PoiId::new("afh")).is_none());
        assert_eq!(engine.subscriber_count(), 0);
        // Only the test holds the recorder now
        assert_eq!(Arc::strong_count(&recorder), 1);

        assert_eq!(
            engine.process_fix(&PositionFix::at(POI_LAT, POI_LON, 2)),
            Err(ProximityError::Disposed)
        );
        assert_eq!(
            engine.report_location_unavailable(LocationFailure::Timeout),
            Err(ProximityError::Disposed)
        );
        assert!(matches!(
            engine.replace_pois(Vec::<SharedPoi>::new()),
            Err(ProximityError::Disposed)
        ));
    }

    #[test]
    fn test_inside_pois() {
        let mut engine = engine_with(
            ProximityConfig::default(),
            vec![poi("near", POI_LAT, POI_LON), poi("far", 52.0, 4.0)],
        );
        engine.process_fix(&PositionFix::at(POI_LAT, POI_LON, 1)).unwrap();
        let inside: Vec<&str> = engine.inside_pois().map(|p| p.id.as_str()).collect();
        assert_eq!(inside, vec!["near"]);
    }
}
