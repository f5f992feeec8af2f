// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::geo::GeoCoordinate;
use crate::interaction::{InteractionHandler, InteractionState, Outcome, PointerEvent};
use crate::locations::{sample_locations, update_distances, StudyLocation, DEFAULT_USER_LOCATION};
use crate::markers::MarkerSet;
use crate::presenter::{filtered_and_sorted, SortMode, ViewMode};
use crate::store::LocationStore;
use crate::viewport::{Viewport, DEFAULT_ZOOM};
use log::{debug, info, warn};
use std::fmt::Display;

/// Zoom used when jumping to a single study group.
pub const LOCATION_FOCUS_ZOOM: u8 = 7;

/// Message for the user. Errors are recoverable by definition here.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Info(String),
    Error(String),
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Notice::Info(m) | Notice::Error(m) => m,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }
}

/// Work the session asks its owner to do. Storage effects may block and
/// should run off the UI thread; their results come back through
/// [`MapSession::save_finished`] and [`MapSession::user_coordinate_reloaded`].
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    ShowInfo(StudyLocation),
    SaveUserCoordinate(GeoCoordinate),
    ReloadUserCoordinate,
    Notice(Notice),
}

/// Everything the map screen knows: viewport, markers, the user's position
/// and the study groups. Owned by exactly one thread.
#[derive(Debug, Clone)]
pub struct MapSession {
    viewport: Viewport,
    markers: MarkerSet,
    interaction: InteractionHandler,
    user: GeoCoordinate,
    default_user: GeoCoordinate,
    /// Position active when location selection started.
    selection_origin: Option<GeoCoordinate>,
    /// Bumped whenever the user starts a selection or confirms one. Storage
    /// results tagged with an older value are stale.
    user_generation: u64,
    /// Generation the outstanding cancel reload belongs to.
    reload_generation: Option<u64>,
    locations: Vec<StudyLocation>,
    sort_mode: SortMode,
    view_mode: ViewMode,
}

impl MapSession {
    pub fn new(
        user: GeoCoordinate,
        locations: Vec<StudyLocation>,
        zoom: u8,
        width: f64,
        height: f64,
    ) -> Self {
        let mut session = Self {
            viewport: Viewport::new(user, zoom, width, height),
            markers: MarkerSet::default(),
            interaction: InteractionHandler::new(),
            user,
            default_user: DEFAULT_USER_LOCATION,
            selection_origin: None,
            user_generation: 0,
            reload_generation: None,
            locations: Vec::new(),
            sort_mode: SortMode::default(),
            view_mode: ViewMode::default(),
        };
        session.set_locations(locations);
        session
    }

    pub fn with_default_user(mut self, default_user: GeoCoordinate) -> Self {
        self.default_user = default_user;
        self
    }

    /// Loads user position and locations synchronously, falling back to
    /// the default position and the sample groups when the store fails.
    pub fn load_blocking<S: LocationStore + ?Sized>(
        store: &S,
        default_user: GeoCoordinate,
        zoom: u8,
        width: f64,
        height: f64,
    ) -> (Self, Vec<Notice>) {
        let mut notices = Vec::new();

        let user = match store.load_user_coordinate() {
            Ok(Some(c)) => c,
            Ok(None) => {
                info!("No saved location, using default {}", default_user);
                default_user
            }
            Err(e) => {
                warn!("Error reading user location: {}", e);
                notices.push(Notice::Error(format!(
                    "Could not load your saved location ({}). Using the default.",
                    e
                )));
                default_user
            }
        };

        let mut session =
            Self::new(user, Vec::new(), zoom, width, height).with_default_user(default_user);
        if let Some(n) = session.locations_loaded(store.load_locations(user)) {
            notices.push(n);
        }
        (session, notices)
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn markers(&self) -> &MarkerSet {
        &self.markers
    }

    pub fn user_coordinate(&self) -> GeoCoordinate {
        self.user
    }

    pub fn locations(&self) -> &[StudyLocation] {
        &self.locations
    }

    pub fn sort_mode(&self) -> SortMode {
        self.sort_mode
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn interaction_state(&self) -> InteractionState {
        self.interaction.state()
    }

    pub fn is_selecting_location(&self) -> bool {
        self.interaction.is_selecting_location()
    }

    pub fn pending_coordinate(&self) -> Option<GeoCoordinate> {
        self.interaction.pending()
    }

    /// Locations after the current sort/filter.
    pub fn visible_locations(&self) -> Vec<StudyLocation> {
        filtered_and_sorted(&self.locations, self.sort_mode)
    }

    pub fn handle(&mut self, event: PointerEvent) -> Vec<Effect> {
        let Some(outcome) = self
            .interaction
            .handle(event, &mut self.viewport, &self.markers)
        else {
            return Vec::new();
        };

        match outcome {
            Outcome::ShowInfo(location) => vec![Effect::ShowInfo(location)],
            Outcome::SelectionStarted => {
                self.selection_origin = Some(self.user);
                self.user_generation += 1;
                vec![Effect::Notice(Notice::Info(
                    "Click anywhere on the map to set your new location. \
                     Right-click to recenter and scroll to zoom. \
                     Confirm when you're done, or Cancel to abort."
                        .to_string(),
                ))]
            }
            Outcome::PendingChanged(_) => {
                self.rebuild_markers();
                Vec::new()
            }
            Outcome::Confirmed(Some(coord)) => {
                self.selection_origin = None;
                self.user_generation += 1;
                self.set_user_coordinate(coord);
                vec![Effect::SaveUserCoordinate(coord)]
            }
            Outcome::Confirmed(None) => {
                self.selection_origin = None;
                self.rebuild_markers();
                vec![Effect::Notice(Notice::Info(
                    "No new location was picked. Your location is unchanged.".to_string(),
                ))]
            }
            Outcome::Cancelled => {
                self.reload_generation = Some(self.user_generation);
                if let Some(origin) = self.selection_origin.take() {
                    self.set_user_coordinate(origin);
                } else {
                    self.rebuild_markers();
                }
                vec![
                    Effect::ReloadUserCoordinate,
                    Effect::Notice(Notice::Info(
                        "Location selection cancelled. Your original location is preserved."
                            .to_string(),
                    )),
                ]
            }
        }
    }

    /// Result of a [`Effect::SaveUserCoordinate`]. A failure is reported but
    /// the coordinate stays active and is not retried.
    pub fn save_finished<E: Display>(&self, coord: GeoCoordinate, result: Result<(), E>) -> Notice {
        match result {
            Ok(()) => Notice::Info(format!(
                "Location saved successfully!\nLat: {:.6}, Lon: {:.6}",
                coord.latitude, coord.longitude
            )),
            Err(e) => {
                warn!("Failed to save user location {}: {}", coord, e);
                Notice::Error(format!("Failed to save location: {}", e))
            }
        }
    }

    /// Result of a [`Effect::ReloadUserCoordinate`]. Dropped when a selection
    /// was started or confirmed after the cancel that asked for it.
    pub fn user_coordinate_reloaded<E: Display>(
        &mut self,
        result: Result<Option<GeoCoordinate>, E>,
    ) -> Option<Notice> {
        if self.reload_generation.take() != Some(self.user_generation) {
            debug!("Ignoring stale user location reload");
            return None;
        }
        self.apply_user_result(result)
    }

    /// Result of the startup load of the saved position. Ignored once the
    /// user has started picking a location.
    pub fn user_coordinate_loaded<E: Display>(
        &mut self,
        result: Result<Option<GeoCoordinate>, E>,
    ) -> Option<Notice> {
        if self.user_generation != 0 {
            debug!("Ignoring startup user location, selection already started");
            return None;
        }
        self.apply_user_result(result)
    }

    fn apply_user_result<E: Display>(
        &mut self,
        result: Result<Option<GeoCoordinate>, E>,
    ) -> Option<Notice> {
        match result {
            Ok(Some(coord)) => {
                self.set_user_coordinate(coord);
                None
            }
            Ok(None) => {
                self.set_user_coordinate(self.default_user);
                None
            }
            Err(e) => {
                warn!("Error reloading user location: {}", e);
                Some(Notice::Error(format!(
                    "Could not reload your saved location ({}). Keeping {}.",
                    e, self.user
                )))
            }
        }
    }

    /// Result of a location load. On failure the current list is kept, or
    /// the sample groups are used if there is nothing yet.
    pub fn locations_loaded<E: Display>(
        &mut self,
        result: Result<Vec<StudyLocation>, E>,
    ) -> Option<Notice> {
        match result {
            Ok(locations) => {
                self.set_locations(locations);
                None
            }
            Err(e) => {
                warn!("Error loading study locations: {}", e);
                if self.locations.is_empty() {
                    self.set_locations(sample_locations());
                    Some(Notice::Error(format!(
                        "Study groups could not be loaded ({}). Showing sample data.",
                        e
                    )))
                } else {
                    Some(Notice::Error(format!(
                        "Study groups could not be refreshed ({}).",
                        e
                    )))
                }
            }
        }
    }

    /// Runs storage effects inline. Only for callers that may block, like
    /// the CLI and tests; the GUI runs them as background tasks instead.
    pub fn apply_blocking<S: LocationStore + ?Sized>(
        &mut self,
        effects: Vec<Effect>,
        store: &S,
    ) -> Vec<Effect> {
        let mut remaining = Vec::new();
        for effect in effects {
            match effect {
                Effect::SaveUserCoordinate(coord) => {
                    let notice = self.save_finished(coord, store.save_user_coordinate(coord));
                    remaining.push(Effect::Notice(notice));
                }
                Effect::ReloadUserCoordinate => {
                    if let Some(n) = self.user_coordinate_reloaded(store.load_user_coordinate()) {
                        remaining.push(Effect::Notice(n));
                    }
                }
                other => remaining.push(other),
            }
        }
        remaining
    }

    pub fn set_user_coordinate(&mut self, coord: GeoCoordinate) {
        self.user = coord;
        update_distances(&mut self.locations, coord);
        self.rebuild_markers();
    }

    pub fn set_locations(&mut self, locations: Vec<StudyLocation>) {
        self.locations = locations;
        update_distances(&mut self.locations, self.user);
        self.rebuild_markers();
    }

    pub fn set_sort_mode(&mut self, mode: SortMode) {
        self.sort_mode = mode;
        self.rebuild_markers();
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport.resize(width, height);
    }

    pub fn center_on_user(&mut self) {
        self.focus_user(DEFAULT_ZOOM);
    }

    /// Centers on the active user position at `zoom`, keeping the current
    /// zoom if `zoom` is out of range.
    pub fn focus_user(&mut self, zoom: u8) {
        self.viewport.set_center(self.user);
        self.viewport.set_zoom(zoom);
    }

    pub fn center_on_location(&mut self, id: u32) -> bool {
        match self.locations.iter().find(|l| l.id == id) {
            Some(location) => {
                self.viewport.set_center(location.coordinate);
                self.viewport.set_zoom(LOCATION_FOCUS_ZOOM);
                true
            }
            None => false,
        }
    }

    fn rebuild_markers(&mut self) {
        let anchor = self.interaction.pending().unwrap_or(self.user);
        self.markers = MarkerSet::rebuild(anchor, &self.visible_locations());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::PixelPoint;
    use crate::store::MemoryStore;

    fn session() -> MapSession {
        MapSession::new(DEFAULT_USER_LOCATION, sample_locations(), 3, 800.0, 600.0)
    }

    #[test]
    fn test_pending_click_moves_user_marker_only() {
        let mut s = session();
        s.handle(PointerEvent::EnterLocationSelect);
        s.handle(PointerEvent::SingleClick(PixelPoint::new(10.0, 10.0)));

        let pending = s.pending_coordinate().unwrap();
        assert_eq!(s.markers().user_marker().unwrap().position, pending);
        assert_eq!(s.user_coordinate(), DEFAULT_USER_LOCATION);
    }

    #[test]
    fn test_confirm_without_click_keeps_user() {
        let mut s = session();
        s.handle(PointerEvent::EnterLocationSelect);
        let effects = s.handle(PointerEvent::Confirm);
        assert!(matches!(effects.as_slice(), [Effect::Notice(Notice::Info(_))]));
        assert_eq!(s.user_coordinate(), DEFAULT_USER_LOCATION);
    }

    #[test]
    fn test_sort_mode_filters_markers() {
        let mut s = session();
        s.set_user_coordinate(GeoCoordinate::new(-33.930505201808685, 18.430816189682822));
        s.set_sort_mode(SortMode::Within100m);
        // ADF2625 sits on the user; MAF Group is ~45 m away.
        assert_eq!(s.visible_locations().len(), 2);
        assert_eq!(s.markers().len(), 3);
    }

    #[test]
    fn test_distances_refresh_on_user_change() {
        let mut s = session();
        let target = s.locations()[0].coordinate;
        s.set_user_coordinate(target);
        assert_eq!(s.locations()[0].distance_from_user, 0.0);
    }

    #[test]
    fn test_failed_location_load_falls_back_to_samples() {
        let store = MemoryStore::with_sample_data();
        store.set_fail_loads(true);
        let (s, notices) = MapSession::load_blocking(&store, DEFAULT_USER_LOCATION, 8, 800.0, 400.0);
        assert_eq!(s.locations().len(), 5);
        assert_eq!(s.user_coordinate(), DEFAULT_USER_LOCATION);
        assert_eq!(notices.len(), 2);
        assert!(notices.iter().all(|n| n.is_error()));
    }

    #[test]
    fn test_center_on_location() {
        let mut s = session();
        assert!(s.center_on_location(4));
        assert_eq!(s.viewport().zoom(), LOCATION_FOCUS_ZOOM);
        assert_eq!(s.viewport().center(), s.locations().iter().find(|l| l.id == 4).unwrap().coordinate);
        assert!(!s.center_on_location(99));

        s.center_on_user();
        assert_eq!(s.viewport().center(), DEFAULT_USER_LOCATION);
        assert_eq!(s.viewport().zoom(), DEFAULT_ZOOM);
    }
}
