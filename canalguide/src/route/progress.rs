//! Tour progress tracking driven by enter events.

use crate::poi::{PoiCatalog, PoiId, SharedPoi};
use crate::proximity::{EnterEvent, Timestamp};

/// Tracks which stops have been visited and which one is on screen.
///
/// The engine may report several arrivals for one fix when radii overlap;
/// the most recent one replaces the current card, matching how the info
/// card is shown one POI at a time.
///
/// # Usage
///
/// ```ignore
/// let mut progress = TourProgress::new(&catalog);
/// for event in engine.process_fix(&fix)? {
///     progress.record(&event);
/// }
/// println!("{}", progress.stop_label()); // "Stop 2 of 5"
/// ```
#[derive(Debug, Clone)]
pub struct TourProgress {
    /// Stop ids in tour order.
    stops: Vec<PoiId>,
    /// Distinct visited stops with their first arrival time (visit order).
    visited: Vec<(PoiId, Timestamp)>,
    /// POI whose card is currently shown.
    current: Option<SharedPoi>,
    /// Index of the most recently entered stop.
    current_index: usize,
}

impl TourProgress {
    /// Start tracking a tour over the catalog's stops.
    pub fn new(catalog: &PoiCatalog) -> Self {
        Self {
            stops: catalog.iter().map(|p| p.id.clone()).collect(),
            visited: Vec::new(),
            current: None,
            current_index: 0,
        }
    }

    /// Record an arrival.
    ///
    /// Replaces the current card. Arrivals at POIs that are not stops on
    /// this tour are shown but do not advance the stop counter.
    pub fn record(&mut self, event: &EnterEvent) {
        let id = &event.poi.id;
        if let Some(index) = self.stops.iter().position(|s| s == id) {
            self.current_index = index;
            if !self.visited.iter().any(|(v, _)| v == id) {
                self.visited.push((id.clone(), event.fix.timestamp));
            }
        }
        self.current = Some(event.poi.clone());
    }

    /// Close the current info card.
    pub fn dismiss(&mut self) -> Option<SharedPoi> {
        self.current.take()
    }

    /// POI whose info card is open, if any.
    pub fn current(&self) -> Option<&SharedPoi> {
        self.current.as_ref()
    }

    /// 1-based number of the most recently reached stop.
    pub fn current_stop(&self) -> usize {
        self.current_index + 1
    }

    /// Total number of stops.
    pub fn total_stops(&self) -> usize {
        self.stops.len()
    }

    /// Distinct stops visited, in arrival order, with first arrival time.
    pub fn visited(&self) -> &[(PoiId, Timestamp)] {
        &self.visited
    }

    /// Whether every stop has been visited.
    pub fn is_complete(&self) -> bool {
        !self.stops.is_empty() && self.visited.len() == self.stops.len()
    }

    /// Display label, e.g. "Stop 2 of 5".
    pub fn stop_label(&self) -> String {
        format!("Stop {} of {}", self.current_stop(), self.total_stops())
    }
}
