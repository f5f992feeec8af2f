// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Pointer handling for the map.
//!
//! Raw pointer events come in from the widget already classified (press,
//! drag, click, double click, wheel). The handler turns them into viewport
//! calls and hit-tests, and reports anything the owner has to act on as an
//! [`Outcome`].

use crate::geo::GeoCoordinate;
use crate::locations::StudyLocation;
use crate::markers::{MarkerSet, HIT_TOLERANCE_PX};
use crate::projection::PixelPoint;
use crate::viewport::Viewport;
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    PrimaryPress(PixelPoint),
    PrimaryDrag(PixelPoint),
    PrimaryRelease(PixelPoint),
    SecondaryPress(PixelPoint),
    SingleClick(PixelPoint),
    DoubleClick(PixelPoint),
    WheelUp,
    WheelDown,
    /// The "set my location" control was pressed.
    EnterLocationSelect,
    Confirm,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Panning {
        anchor: PixelPoint,
    },
    LocationSelect {
        pending: Option<GeoCoordinate>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    ShowInfo(StudyLocation),
    SelectionStarted,
    /// A new candidate position was picked during location selection.
    PendingChanged(GeoCoordinate),
    /// Selection confirmed. `None` if nothing was clicked before confirming.
    Confirmed(Option<GeoCoordinate>),
    Cancelled,
}

#[derive(Debug, Clone, Default)]
pub struct InteractionHandler {
    state: InteractionState,
}

impl InteractionHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn is_selecting_location(&self) -> bool {
        matches!(self.state, InteractionState::LocationSelect { .. })
    }

    pub fn pending(&self) -> Option<GeoCoordinate> {
        match self.state {
            InteractionState::LocationSelect { pending } => pending,
            _ => None,
        }
    }

    /// Applies one event. Events that have no transition from the current
    /// state are ignored.
    pub fn handle(
        &mut self,
        event: PointerEvent,
        viewport: &mut Viewport,
        markers: &MarkerSet,
    ) -> Option<Outcome> {
        use InteractionState::*;
        use PointerEvent::*;

        match (self.state, event) {
            (Idle, PrimaryPress(p)) => {
                self.state = Panning { anchor: p };
                None
            }
            (Panning { anchor }, PrimaryDrag(p)) => {
                viewport.pan_by(p.x - anchor.x, p.y - anchor.y);
                self.state = Panning { anchor: p };
                None
            }
            (Panning { .. }, PrimaryRelease(_)) => {
                self.state = Idle;
                None
            }
            (Idle | LocationSelect { .. }, SecondaryPress(p)) => {
                let target = viewport.point_to_coordinate(p);
                viewport.set_center(target);
                None
            }
            (Idle, DoubleClick(p)) => {
                viewport.zoom_in();
                let target = viewport.point_to_coordinate(p);
                viewport.set_center(target);
                None
            }
            (Idle | LocationSelect { .. }, WheelUp) => {
                viewport.zoom_in();
                None
            }
            (Idle | LocationSelect { .. }, WheelDown) => {
                viewport.zoom_out();
                None
            }
            (Idle, SingleClick(p)) => markers
                .hit_test(p, viewport, HIT_TOLERANCE_PX)
                .and_then(|m| m.location.clone())
                .map(Outcome::ShowInfo),
            (Idle, EnterLocationSelect) => {
                debug!("Entering location selection");
                self.state = LocationSelect { pending: None };
                Some(Outcome::SelectionStarted)
            }
            (LocationSelect { .. }, SingleClick(p) | DoubleClick(p)) => {
                let coord = viewport.point_to_coordinate(p);
                self.state = LocationSelect {
                    pending: Some(coord),
                };
                Some(Outcome::PendingChanged(coord))
            }
            (LocationSelect { pending }, Confirm) => {
                debug!("Location selection confirmed: {:?}", pending);
                self.state = Idle;
                Some(Outcome::Confirmed(pending))
            }
            (LocationSelect { .. }, Cancel) => {
                debug!("Location selection cancelled");
                self.state = Idle;
                Some(Outcome::Cancelled)
            }
            _ => None,
        }
    }
}
