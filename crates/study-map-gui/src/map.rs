// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::Message;
use iced::advanced::{self, layout, renderer, widget, Layout, Widget};
use iced::widget::image;
use iced::{event, mouse, Border, Color, Element, Event, Length, Point, Radians, Rectangle, Size};
use log::{debug, warn};
use lru::LruCache;
use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use study_map_core::interaction::PointerEvent;
use study_map_core::markers::MarkerRole;
use study_map_core::projection::PixelPoint;
use study_map_core::tiles::{TileCoords, TileSource};
use study_map_core::MapSession;

/// A press and release closer than this is a click, not a drag.
const CLICK_SLOP_PX: f32 = 5.0;
const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(400);

const USER_MARKER_SIZE: f32 = 16.0;
const STUDY_MARKER_SIZE: f32 = 14.0;

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

// --- Tile Management ---
pub struct TileManager {
    tiles: Arc<Mutex<LruCache<TileCoords, image::Handle>>>,
    pending: Arc<Mutex<HashSet<TileCoords>>>,
    source: Arc<dyn TileSource>,
    user_agent: String,
    timeout: Duration,
}

impl TileManager {
    pub fn new(
        source: Arc<dyn TileSource>,
        capacity: usize,
        user_agent: String,
        timeout: Duration,
    ) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            tiles: Arc::new(Mutex::new(LruCache::new(capacity))),
            pending: Arc::new(Mutex::new(HashSet::new())),
            source,
            user_agent,
            timeout,
        }
    }

    pub fn get_tile(&self, coords: TileCoords) -> Option<image::Handle> {
        lock(&self.tiles).get(&coords).cloned()
    }

    pub fn has_pending(&self) -> bool {
        !lock(&self.pending).is_empty()
    }

    pub fn request_tile(&self, coords: TileCoords) {
        {
            let mut pending = lock(&self.pending);
            if pending.contains(&coords) || lock(&self.tiles).contains(&coords) {
                return;
            }
            pending.insert(coords);
        }

        let tiles = Arc::clone(&self.tiles);
        let pending = Arc::clone(&self.pending);
        let url = self.source.url_for(coords);
        let user_agent = self.user_agent.clone();
        let timeout = self.timeout;

        std::thread::spawn(move || {
            let resp = ureq::get(&url)
                .set("User-Agent", &user_agent)
                .timeout(timeout)
                .call();

            match resp {
                Ok(response) => {
                    let mut bytes = Vec::new();
                    match std::io::Read::read_to_end(&mut response.into_reader(), &mut bytes) {
                        Ok(_) => {
                            lock(&tiles).put(coords, image::Handle::from_bytes(bytes));
                            debug!("Fetched tile {:?}", coords);
                        }
                        Err(e) => warn!("Failed to read tile {:?}: {}", coords, e),
                    }
                }
                Err(e) => warn!("Failed to fetch tile {}: {}", url, e),
            }
            lock(&pending).remove(&coords);
        });
    }
}

// --- Click classification ---
#[derive(Debug, Clone, Copy, PartialEq)]
enum Release {
    Drag,
    Click,
    DoubleClick,
}

fn classify_release(
    press: Point,
    release: Point,
    last_click: Option<(Instant, Point)>,
    now: Instant,
) -> Release {
    if press.distance(release) >= CLICK_SLOP_PX {
        return Release::Drag;
    }
    match last_click {
        Some((at, p))
            if now.duration_since(at) <= DOUBLE_CLICK_WINDOW
                && p.distance(release) < CLICK_SLOP_PX =>
        {
            Release::DoubleClick
        }
        _ => Release::Click,
    }
}

fn to_pixel(p: Point) -> PixelPoint {
    PixelPoint::new(p.x as f64, p.y as f64)
}

// --- Widget ---
pub struct MapView<'a> {
    pub session: &'a MapSession,
    pub tile_manager: &'a TileManager,
}

#[derive(Debug, Clone, Copy, Default)]
struct MapState {
    /// Press position relative to the widget while the left button is down.
    press_position: Option<Point>,
    last_click: Option<(Instant, Point)>,
    last_size: Option<Size>,
}

impl<'a, Theme, Renderer> Widget<Message, Theme, Renderer> for MapView<'a>
where
    Renderer: renderer::Renderer + advanced::image::Renderer<Handle = image::Handle>,
{
    fn size(&self) -> Size<Length> {
        Size {
            width: Length::Fill,
            height: Length::Fill,
        }
    }

    fn tag(&self) -> widget::tree::Tag {
        widget::tree::Tag::of::<MapState>()
    }

    fn state(&self) -> widget::tree::State {
        widget::tree::State::new(MapState::default())
    }

    fn layout(
        &self,
        _tree: &mut widget::Tree,
        _renderer: &Renderer,
        limits: &layout::Limits,
    ) -> layout::Node {
        layout::Node::new(limits.max())
    }

    fn draw(
        &self,
        _tree: &widget::Tree,
        renderer: &mut Renderer,
        _theme: &Theme,
        _style: &renderer::Style,
        layout: Layout<'_>,
        _cursor: mouse::Cursor,
        _viewport: &Rectangle,
    ) {
        let bounds = layout.bounds();
        let viewport = self.session.viewport();

        renderer.with_layer(bounds, |renderer| {
            renderer.fill_quad(
                renderer::Quad {
                    bounds,
                    border: Border::default(),
                    ..Default::default()
                },
                Color::from_rgb(0.85, 0.85, 0.82),
            );

            // --- Tile Layer ---
            for tile in viewport.visible_tiles() {
                let tile_rect = Rectangle {
                    x: bounds.x + tile.screen.x as f32,
                    y: bounds.y + tile.screen.y as f32,
                    width: tile.size as f32,
                    height: tile.size as f32,
                };

                if let Some(handle) = self.tile_manager.get_tile(tile.coords) {
                    renderer.draw_image(
                        advanced::image::Image {
                            handle,
                            filter_method: image::FilterMethod::Linear,
                            rotation: Radians(0.0),
                            opacity: 1.0,
                            snap: true,
                        },
                        tile_rect,
                    );
                } else {
                    renderer.fill_quad(
                        renderer::Quad {
                            bounds: tile_rect,
                            border: Border {
                                color: Color::from_rgb(0.78, 0.78, 0.75),
                                width: 1.0,
                                radius: 0.0.into(),
                            },
                            ..Default::default()
                        },
                        Color::from_rgb(0.9, 0.9, 0.88),
                    );
                    self.tile_manager.request_tile(tile.coords);
                }
            }
        });

        // --- Marker Layer ---
        renderer.with_layer(bounds, |renderer| {
            // Study groups first so the user pin stays on top.
            let mut markers: Vec<_> = self.session.markers().iter().collect();
            markers.sort_by_key(|m| m.role == MarkerRole::UserLocation);

            for marker in markers {
                let p = viewport.coordinate_to_point(marker.position);
                let (size, fill) = match marker.role {
                    MarkerRole::UserLocation => (USER_MARKER_SIZE, Color::from_rgb(0.86, 0.15, 0.15)),
                    MarkerRole::StudyLocation => (STUDY_MARKER_SIZE, Color::from_rgb(0.15, 0.39, 0.92)),
                };
                let half = size / 2.0;

                renderer.fill_quad(
                    renderer::Quad {
                        bounds: Rectangle {
                            x: bounds.x + p.x as f32 - half,
                            y: bounds.y + p.y as f32 - half,
                            width: size,
                            height: size,
                        },
                        border: Border {
                            color: Color::WHITE,
                            width: 2.0,
                            radius: half.into(),
                        },
                        ..Default::default()
                    },
                    fill,
                );
            }
        });
    }

    fn on_event(
        &mut self,
        tree: &mut widget::Tree,
        event: Event,
        layout: Layout<'_>,
        cursor: mouse::Cursor,
        _renderer: &Renderer,
        _clipboard: &mut dyn advanced::Clipboard,
        shell: &mut advanced::Shell<'_, Message>,
        _viewport: &Rectangle,
    ) -> event::Status {
        let state = tree.state.downcast_mut::<MapState>();
        let bounds = layout.bounds();

        if state.last_size != Some(bounds.size()) {
            state.last_size = Some(bounds.size());
            shell.publish(Message::MapResized(bounds.width, bounds.height));
        }

        let relative = |p: Point| Point::new(p.x - bounds.x, p.y - bounds.y);

        match event {
            Event::Mouse(mouse::Event::WheelScrolled { delta }) => {
                if cursor.is_over(bounds) {
                    let y = match delta {
                        mouse::ScrollDelta::Lines { y, .. } => y,
                        mouse::ScrollDelta::Pixels { y, .. } => y,
                    };
                    if y > 0.0 {
                        shell.publish(Message::Map(PointerEvent::WheelUp));
                    } else if y < 0.0 {
                        shell.publish(Message::Map(PointerEvent::WheelDown));
                    }
                    return event::Status::Captured;
                }
            }
            Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                if let Some(p) = cursor.position_in(bounds) {
                    state.press_position = Some(p);
                    shell.publish(Message::Map(PointerEvent::PrimaryPress(to_pixel(p))));
                    return event::Status::Captured;
                }
            }
            Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Right)) => {
                if let Some(p) = cursor.position_in(bounds) {
                    shell.publish(Message::Map(PointerEvent::SecondaryPress(to_pixel(p))));
                    return event::Status::Captured;
                }
            }
            Event::Mouse(mouse::Event::CursorMoved { position }) => {
                if state.press_position.is_some() {
                    let p = relative(position);
                    shell.publish(Message::Map(PointerEvent::PrimaryDrag(to_pixel(p))));
                    return event::Status::Captured;
                }
            }
            Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                if let Some(press) = state.press_position.take() {
                    let release = cursor.position().map(relative).unwrap_or(press);
                    shell.publish(Message::Map(PointerEvent::PrimaryRelease(to_pixel(release))));

                    let now = Instant::now();
                    match classify_release(press, release, state.last_click, now) {
                        Release::Drag => {}
                        Release::Click => {
                            state.last_click = Some((now, release));
                            shell.publish(Message::Map(PointerEvent::SingleClick(to_pixel(release))));
                        }
                        Release::DoubleClick => {
                            state.last_click = None;
                            shell.publish(Message::Map(PointerEvent::DoubleClick(to_pixel(release))));
                        }
                    }
                    return event::Status::Captured;
                }
            }
            _ => {}
        }

        event::Status::Ignored
    }

    fn mouse_interaction(
        &self,
        tree: &widget::Tree,
        layout: Layout<'_>,
        cursor: mouse::Cursor,
        _viewport: &Rectangle,
        _renderer: &Renderer,
    ) -> mouse::Interaction {
        let state = tree.state.downcast_ref::<MapState>();
        if state.press_position.is_some() && !self.session.is_selecting_location() {
            mouse::Interaction::Grabbing
        } else if cursor.is_over(layout.bounds()) {
            if self.session.is_selecting_location() {
                mouse::Interaction::Crosshair
            } else {
                mouse::Interaction::Pointer
            }
        } else {
            mouse::Interaction::default()
        }
    }
}

impl<'a, Theme, Renderer> From<MapView<'a>> for Element<'a, Message, Theme, Renderer>
where
    Theme: 'a,
    Renderer: 'a + renderer::Renderer + advanced::image::Renderer<Handle = image::Handle>,
{
    fn from(map_view: MapView<'a>) -> Self {
        Self::new(map_view)
    }
}
