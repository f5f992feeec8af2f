// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use anyhow::Context;
use iced::widget::{
    button, column, container, horizontal_space, pick_list, row, scrollable, text, Column, Row,
};
use iced::{Background, Border, Element, Length, Subscription, Task, Theme};
use log::{info, warn};
use std::sync::Arc;
use std::time::Duration;
use study_map_core::config::AppConfig;
use study_map_core::geo::GeoCoordinate;
use study_map_core::interaction::PointerEvent;
use study_map_core::locations::{StudyLocation, Student};
use study_map_core::presenter::{
    grid_rows, info_text, members_line, summary_line, SortMode, ViewMode, GRID_COLUMNS,
};
use study_map_core::store::{LocationStore, StoreError};
use study_map_core::{get_config_root, Effect, MapSession, Notice};

mod map;
mod style;
use map::{MapView, TileManager};

const MAP_WIDTH: f32 = 830.0;
const MAP_HEIGHT_COLLAPSED: f32 = 200.0;
const MAP_HEIGHT_EXPANDED: f32 = 350.0;

fn main() -> iced::Result {
    if let Err(e) = init_logging() {
        eprintln!("File logging disabled: {:#}", e);
    }

    iced::application("Study Map", App::update, App::view)
        .theme(|_| Theme::Light)
        .subscription(App::subscription)
        .window_size((890.0, 680.0))
        .run_with(App::new)
}

fn init_logging() -> anyhow::Result<()> {
    use simplelog::{
        ColorChoice, CombinedLogger, Config, LevelFilter, TermLogger, TerminalMode, WriteLogger,
    };

    let root = get_config_root();
    std::fs::create_dir_all(&root).context("Failed to create config directory")?;
    let log_path = root.join("study-map.log");
    let file = std::fs::File::create(&log_path)
        .with_context(|| format!("Failed to create {}", log_path.display()))?;

    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Info,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Debug, Config::default(), file),
    ])
    .context("Logger already initialised")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Nav {
    Dashboard,
    Profile,
    Groups,
    Location,
    Messages,
    StudyPoints,
}

impl Nav {
    const ALL: [Nav; 6] = [
        Nav::Dashboard,
        Nav::Profile,
        Nav::Groups,
        Nav::Location,
        Nav::Messages,
        Nav::StudyPoints,
    ];

    fn label(&self) -> &'static str {
        match self {
            Nav::Dashboard => "DASHBOARD",
            Nav::Profile => "PROFILE",
            Nav::Groups => "GROUPS",
            Nav::Location => "LOCATION",
            Nav::Messages => "MESSAGES",
            Nav::StudyPoints => "STUDY POINTS",
        }
    }

    fn feature_name(&self) -> &'static str {
        match self {
            Nav::Dashboard => "Dashboard",
            Nav::Profile => "Profile",
            Nav::Groups => "Groups",
            Nav::Location => "Location",
            Nav::Messages => "Messages",
            Nav::StudyPoints => "Study Points",
        }
    }
}

/// What the background startup load produced.
#[derive(Debug, Clone)]
struct Startup {
    user: Result<Option<GeoCoordinate>, String>,
    locations: Result<Vec<StudyLocation>, String>,
    student: Option<Student>,
}

#[derive(Debug, Clone)]
enum Message {
    Loaded(Result<Startup, String>),
    RefreshLocations,
    LocationsLoaded(Result<Vec<StudyLocation>, String>),

    // Map
    Map(PointerEvent),
    MapResized(f32, f32),
    TilesTick,
    ToggleMapSize,

    // Location selection
    SetMyLocation,
    ConfirmLocation,
    CancelLocation,
    LocationSaved(GeoCoordinate, Result<(), String>),
    UserLocationReloaded(Result<Option<GeoCoordinate>, String>),

    // Groups list
    SortChanged(SortMode),
    SetViewMode(ViewMode),
    FocusLocation(u32),
    MessageGroup,

    Navigate(Nav),
    DialogClosed,
}

struct App {
    config: AppConfig,
    session: MapSession,
    student: Student,
    status: String,
    status_is_error: bool,
    loading: bool,
    map_expanded: bool,
    /// Set whenever the visible tile set may have changed; cleared once
    /// every requested tile has arrived.
    tiles_dirty: bool,
    tile_manager: TileManager,
}

impl App {
    fn new() -> (Self, Task<Message>) {
        let config = AppConfig::load();
        info!("Starting with data source {:?}", config.data_source);

        let session = MapSession::new(
            config.default_user_location,
            Vec::new(),
            config.initial_zoom,
            MAP_WIDTH as f64,
            MAP_HEIGHT_COLLAPSED as f64,
        )
        .with_default_user(config.default_user_location);

        let tile_manager = TileManager::new(
            Arc::new(config.tile_source()),
            config.tile_cache_capacity,
            config.user_agent.clone(),
            config.request_timeout() * 2,
        );

        let app = Self {
            session,
            student: Student::default(),
            status: "Loading...".to_string(),
            status_is_error: false,
            loading: true,
            map_expanded: false,
            tiles_dirty: true,
            tile_manager,
            config: config.clone(),
        };

        let default_user = config.default_user_location;
        let budget = config.request_timeout() * 3;
        let task = Task::perform(
            with_store(config, budget, move |store| {
                let user = store.load_user_coordinate();
                let anchor = match &user {
                    Ok(Some(c)) => *c,
                    _ => default_user,
                };
                let locations = store.load_locations(anchor);
                let student = store.load_current_student().unwrap_or_else(|e| {
                    warn!("Error loading student profile: {}", e);
                    None
                });
                Ok(Startup {
                    user: user.map_err(|e| e.to_string()),
                    locations: locations.map_err(|e| e.to_string()),
                    student,
                })
            }),
            Message::Loaded,
        );

        (app, task)
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Loaded(result) => {
                self.loading = false;
                self.tiles_dirty = true;
                let mut notices = Vec::new();
                match result {
                    Ok(startup) => {
                        if let Some(student) = startup.student {
                            self.student = student;
                        }
                        notices.extend(self.session.user_coordinate_loaded(startup.user));
                        self.session.focus_user(self.config.initial_zoom);
                        notices.extend(self.session.locations_loaded(startup.locations));
                    }
                    Err(e) => {
                        warn!("Startup load failed: {}", e);
                        notices.extend(self.session.locations_loaded::<String>(Err(e)));
                    }
                }
                self.status = self.groups_status();
                self.status_is_error = false;
                Task::batch(notices.into_iter().map(|n| self.show_notice(n)))
            }
            Message::RefreshLocations => {
                let user = self.session.user_coordinate();
                self.status = "Refreshing study groups...".to_string();
                Task::perform(
                    with_store(self.config.clone(), self.config.request_timeout(), move |store| {
                        store.load_locations(user)
                    }),
                    Message::LocationsLoaded,
                )
            }
            Message::LocationsLoaded(result) => {
                match self.session.locations_loaded(result) {
                    Some(notice) => self.show_notice(notice),
                    None => {
                        self.status = self.groups_status();
                        self.status_is_error = false;
                        Task::none()
                    }
                }
            }
            Message::Map(event) => {
                self.tiles_dirty = true;
                let effects = self.session.handle(event);
                self.run_effects(effects)
            }
            Message::MapResized(width, height) => {
                self.tiles_dirty = true;
                self.session.resize(width as f64, height as f64);
                Task::none()
            }
            Message::TilesTick => {
                self.tiles_dirty = self.tile_manager.has_pending();
                Task::none()
            }
            Message::ToggleMapSize => {
                self.map_expanded = !self.map_expanded;
                self.tiles_dirty = true;
                Task::none()
            }
            Message::SetMyLocation => {
                let effects = self.session.handle(PointerEvent::EnterLocationSelect);
                self.run_effects(effects)
            }
            Message::ConfirmLocation => {
                let effects = self.session.handle(PointerEvent::Confirm);
                self.run_effects(effects)
            }
            Message::CancelLocation => {
                let effects = self.session.handle(PointerEvent::Cancel);
                self.run_effects(effects)
            }
            Message::LocationSaved(coord, result) => {
                let notice = self.session.save_finished(coord, result);
                self.show_notice(notice)
            }
            Message::UserLocationReloaded(result) => {
                match self.session.user_coordinate_reloaded(result) {
                    Some(notice) => self.show_notice(notice),
                    None => Task::none(),
                }
            }
            Message::SortChanged(mode) => {
                self.session.set_sort_mode(mode);
                Task::none()
            }
            Message::SetViewMode(mode) => {
                self.session.set_view_mode(mode);
                Task::none()
            }
            Message::FocusLocation(id) => {
                if self.session.center_on_location(id) {
                    self.tiles_dirty = true;
                }
                Task::none()
            }
            Message::MessageGroup => under_construction("Messaging Feature"),
            Message::Navigate(Nav::Location) => {
                self.session.center_on_user();
                self.tiles_dirty = true;
                Task::none()
            }
            Message::Navigate(nav) => under_construction(nav.feature_name()),
            Message::DialogClosed => Task::none(),
        }
    }

    /// Runs session effects. Storage work goes to a blocking worker and
    /// comes back as a message.
    fn run_effects(&mut self, effects: Vec<Effect>) -> Task<Message> {
        let mut tasks = Vec::new();
        for effect in effects {
            match effect {
                Effect::ShowInfo(location) => tasks.push(Task::perform(
                    show_dialog(
                        "Study Group Information".to_string(),
                        info_text(&location),
                        rfd::MessageLevel::Info,
                    ),
                    |_| Message::DialogClosed,
                )),
                Effect::SaveUserCoordinate(coord) => {
                    self.status = "Saving location...".to_string();
                    self.status_is_error = false;
                    tasks.push(Task::perform(
                        with_store(self.config.clone(), self.config.request_timeout(), move |store| {
                            store.save_user_coordinate(coord)
                        }),
                        move |result| Message::LocationSaved(coord, result),
                    ));
                }
                Effect::ReloadUserCoordinate => tasks.push(Task::perform(
                    with_store(self.config.clone(), self.config.request_timeout(), |store| {
                        store.load_user_coordinate()
                    }),
                    Message::UserLocationReloaded,
                )),
                Effect::Notice(notice) => tasks.push(self.show_notice(notice)),
            }
        }
        Task::batch(tasks)
    }

    fn show_notice(&mut self, notice: Notice) -> Task<Message> {
        self.status = notice.message().lines().next().unwrap_or_default().to_string();
        self.status_is_error = notice.is_error();
        let (title, level) = match &notice {
            Notice::Info(_) => ("Study Map", rfd::MessageLevel::Info),
            Notice::Error(_) => ("Error", rfd::MessageLevel::Error),
        };
        Task::perform(
            show_dialog(title.to_string(), notice.message().to_string(), level),
            |_| Message::DialogClosed,
        )
    }

    fn groups_status(&self) -> String {
        format!(
            "{} study groups, you are at {}",
            self.session.locations().len(),
            self.session.user_coordinate()
        )
    }

    fn subscription(&self) -> Subscription<Message> {
        if self.tiles_dirty {
            iced::time::every(Duration::from_millis(250)).map(|_| Message::TilesTick)
        } else {
            Subscription::none()
        }
    }

    fn view(&self) -> Element<'_, Message> {
        let status = text(&self.status).size(12).color(if self.status_is_error {
            style::palette::ERROR
        } else {
            style::palette::TEXT_SECONDARY
        });

        let content = column![
            self.view_header(),
            self.view_navigation(),
            self.view_map_section(),
            self.view_groups_section(),
            row![
                status,
                horizontal_space(),
                text("© 2026 Study Map").size(11).color(style::palette::TEXT_SECONDARY)
            ]
            .padding([6, 20]),
        ]
        .spacing(10);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(style::container_page)
            .into()
    }

    fn view_header(&self) -> Element<'_, Message> {
        let avatar = container(text(self.student.initial().to_string()).size(18))
            .center(40.0)
            .style(|_theme: &Theme| container::Style {
                background: Some(Background::Color(style::palette::SELECTED_BLUE)),
                text_color: Some(iced::Color::WHITE),
                border: Border {
                    radius: 20.0.into(),
                    ..Default::default()
                },
                ..Default::default()
            });

        let details = column![
            text(self.student.full_name()).size(14),
            text(&self.student.student_number)
                .size(11)
                .color(style::palette::TEXT_SECONDARY),
            text(&self.student.email)
                .size(11)
                .color(style::palette::TEXT_SECONDARY),
        ]
        .spacing(2);

        container(
            row![
                text("LEARN HUB").size(22),
                horizontal_space(),
                container(row![avatar, details].spacing(10).align_y(iced::Alignment::Center))
                    .padding(8)
                    .style(style::container_card),
            ]
            .align_y(iced::Alignment::Center),
        )
        .padding([10, 20])
        .width(Length::Fill)
        .style(style::container_header)
        .into()
    }

    fn view_navigation(&self) -> Element<'_, Message> {
        let buttons = Nav::ALL.iter().map(|nav| -> Element<'static, Message> {
            button(
                text(nav.label())
                    .size(12)
                    .align_x(iced::alignment::Horizontal::Center),
            )
            .width(Length::FillPortion(1))
            .padding([8, 4])
            .on_press(Message::Navigate(*nav))
            .style(style::button_nav(*nav == Nav::Location))
            .into()
        });

        Row::with_children(buttons)
            .spacing(6)
            .padding([0, 20])
            .into()
    }

    fn view_map_section(&self) -> Element<'_, Message> {
        let selecting = self.session.is_selecting_location();

        let set_location = button(text("SET MY LOCATION").size(12))
            .padding([6, 12])
            .on_press_maybe((!selecting && !self.loading).then_some(Message::SetMyLocation))
            .style(style::button_set_location);

        let expand = button(text(if self.map_expanded { "COLLAPSE" } else { "EXPAND" }).size(12))
            .padding([6, 12])
            .on_press(Message::ToggleMapSize)
            .style(style::button_primary);

        let mut section = Column::new()
            .spacing(6)
            .push(
                row![
                    text("STUDY GROUPS MAP").size(16),
                    horizontal_space(),
                    set_location,
                    expand
                ]
                .spacing(8)
                .align_y(iced::Alignment::Center),
            );

        if selecting {
            let pending = match self.session.pending_coordinate() {
                Some(c) => format!("New location: {}", c),
                None => "No point picked yet".to_string(),
            };
            section = section.push(
                container(
                    row![
                        column![
                            text("LOCATION SELECTION MODE: Click on the map to set your location")
                                .size(13),
                            text(pending).size(11),
                        ]
                        .spacing(2),
                        horizontal_space(),
                        button(text("CONFIRM").size(12))
                            .padding([6, 12])
                            .on_press(Message::ConfirmLocation)
                            .style(style::button_confirm),
                        button(text("CANCEL").size(12))
                            .padding([6, 12])
                            .on_press(Message::CancelLocation)
                            .style(style::button_cancel),
                    ]
                    .spacing(8)
                    .align_y(iced::Alignment::Center),
                )
                .padding(8)
                .width(Length::Fill)
                .style(style::container_banner),
            );
        }

        let height = if self.map_expanded {
            MAP_HEIGHT_EXPANDED
        } else {
            MAP_HEIGHT_COLLAPSED
        };
        let map_view: Element<'_, Message> = MapView {
            session: &self.session,
            tile_manager: &self.tile_manager,
        }
        .into();

        section = section.push(
            container(map_view)
                .width(Length::Fill)
                .height(Length::Fixed(height))
                .padding(1)
                .style(style::container_map),
        );

        container(section).padding([0, 20]).into()
    }

    fn view_groups_section(&self) -> Element<'_, Message> {
        let mode = self.session.view_mode();
        let list_btn = button(text("LIST").size(12))
            .padding([4, 12])
            .on_press(Message::SetViewMode(ViewMode::List))
            .style(style::button_toggle(mode == ViewMode::List));
        let grid_btn = button(text("GRID").size(12))
            .padding([4, 12])
            .on_press(Message::SetViewMode(ViewMode::Grid))
            .style(style::button_toggle(mode == ViewMode::Grid));
        let refresh_btn = button(text("REFRESH").size(12))
            .padding([4, 12])
            .on_press_maybe((!self.loading).then_some(Message::RefreshLocations))
            .style(style::button_primary);
        let sort = pick_list(
            SortMode::ALL,
            Some(self.session.sort_mode()),
            Message::SortChanged,
        )
        .text_size(12);

        let toolbar = row![
            text("GROUPS NEARBY").size(16),
            horizontal_space(),
            list_btn,
            grid_btn,
            sort,
            refresh_btn
        ]
        .spacing(8)
        .align_y(iced::Alignment::Center);

        let locations = self.session.visible_locations();
        let body: Element<'_, Message> = if self.loading {
            text("Loading study groups...").size(13).into()
        } else if locations.is_empty() {
            text(format!("No study groups match \"{}\".", self.session.sort_mode()))
                .size(13)
                .color(style::palette::TEXT_SECONDARY)
                .into()
        } else {
            match mode {
                ViewMode::List => Column::with_children(locations.iter().map(location_card))
                    .spacing(8)
                    .into(),
                ViewMode::Grid => {
                    let rows = grid_rows(&locations).into_iter().map(
                        |cards| -> Element<'static, Message> {
                            let mut r =
                                Row::with_children(cards.iter().map(location_card)).spacing(8);
                            for _ in cards.len()..GRID_COLUMNS {
                                r = r.push(horizontal_space().width(Length::FillPortion(1)));
                            }
                            r.into()
                        },
                    );
                    Column::with_children(rows).spacing(8).into()
                }
            }
        };

        container(
            column![toolbar, scrollable(body).height(Length::Fill)].spacing(8),
        )
        .padding([0, 20])
        .height(Length::Fill)
        .into()
    }
}

fn location_card(location: &StudyLocation) -> Element<'static, Message> {
    let show = button(text("SHOW").size(11))
        .padding([4, 10])
        .on_press(Message::FocusLocation(location.id))
        .style(style::button_primary);
    let message = button(text("MESSAGE").size(11))
        .padding([4, 10])
        .on_press(Message::MessageGroup)
        .style(style::button_primary);

    container(
        column![
            text(location.group_name.clone()).size(14),
            text(format!("• {}", location.location_name))
                .size(12)
                .color(style::palette::TEXT_SECONDARY),
            text(summary_line(location)).size(12),
            row![
                text(members_line(location))
                    .size(11)
                    .color(style::palette::SELECTED_BLUE),
                horizontal_space(),
                show,
                message
            ]
            .spacing(6)
            .align_y(iced::Alignment::Center),
        ]
        .spacing(3),
    )
    .padding(10)
    .width(Length::FillPortion(1))
    .style(style::container_card)
    .into()
}

/// Runs `job` against a freshly opened store on the blocking pool, giving
/// up after `budget`. A timed-out job keeps running but its result is
/// dropped.
async fn with_store<T, F>(config: AppConfig, budget: Duration, job: F) -> Result<T, String>
where
    T: Send + 'static,
    F: FnOnce(&dyn LocationStore) -> Result<T, StoreError> + Send + 'static,
{
    let handle = tokio::task::spawn_blocking(move || -> Result<T, StoreError> {
        let store = config.open_store()?;
        job(&*store)
    });

    match tokio::time::timeout(budget, handle).await {
        Ok(Ok(result)) => result.map_err(|e| e.to_string()),
        Ok(Err(e)) => Err(format!("Storage task failed: {}", e)),
        Err(_) => {
            warn!("Storage call exceeded {:?}", budget);
            Err(StoreError::Timeout(budget).to_string())
        }
    }
}

async fn show_dialog(title: String, description: String, level: rfd::MessageLevel) {
    rfd::AsyncMessageDialog::new()
        .set_title(title)
        .set_description(description)
        .set_level(level)
        .set_buttons(rfd::MessageButtons::Ok)
        .show()
        .await;
}

fn under_construction(feature: &str) -> Task<Message> {
    Task::perform(
        show_dialog(
            "Under Construction".to_string(),
            format!(
                "{} is currently under construction.\nThis feature will be available in a future update.",
                feature
            ),
            rfd::MessageLevel::Info,
        ),
        |_| Message::DialogClosed,
    )
}
