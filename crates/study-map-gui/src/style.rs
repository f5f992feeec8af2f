// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use iced::widget::{button, container};
use iced::{Background, Border, Color, Shadow, Theme};

pub mod palette {
    use iced::Color;

    pub const BACKGROUND: Color = Color::from_rgb(0.94, 0.94, 0.94); // #f0f0f0
    pub const SURFACE: Color = Color::WHITE;
    pub const HEADER: Color = Color::from_rgb(0.68, 0.85, 0.90); // #add8e6
    pub const ACCENT_BLUE: Color = Color::from_rgb(0.53, 0.81, 0.92); // #87ceeb
    pub const SELECTED_BLUE: Color = Color::from_rgb(0.27, 0.51, 0.71); // #4682b4
    pub const ACCENT_ORANGE: Color = Color::from_rgb(1.0, 0.65, 0.0); // #ffa500
    pub const CONFIRM_GREEN: Color = Color::from_rgb(0.13, 0.55, 0.13); // #228b22
    pub const CANCEL_RED: Color = Color::from_rgb(0.86, 0.08, 0.24); // #dc143c
    pub const BANNER: Color = Color::from_rgb(1.0, 1.0, 0.78); // #ffffc8
    pub const BANNER_TEXT: Color = Color::from_rgb(0.55, 0.27, 0.07); // #8b4513
    pub const TEXT_PRIMARY: Color = Color::from_rgb(0.1, 0.1, 0.1);
    pub const TEXT_SECONDARY: Color = Color::from_rgb(0.4, 0.4, 0.4);
    pub const ERROR: Color = Color::from_rgb(0.75, 0.1, 0.1);
    pub const BORDER: Color = Color::from_rgb(0.8, 0.8, 0.8);
}

// Container Styles
pub fn container_page(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(palette::BACKGROUND)),
        text_color: Some(palette::TEXT_PRIMARY),
        ..Default::default()
    }
}

pub fn container_header(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(palette::HEADER)),
        text_color: Some(palette::TEXT_PRIMARY),
        ..Default::default()
    }
}

pub fn container_card(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(palette::SURFACE)),
        border: Border {
            color: palette::BORDER,
            width: 1.0,
            radius: 8.0.into(),
        },
        shadow: Shadow {
            color: Color::from_rgba(0.0, 0.0, 0.0, 0.15),
            offset: iced::Vector::new(0.0, 2.0),
            blur_radius: 6.0,
        },
        ..Default::default()
    }
}

pub fn container_map(_theme: &Theme) -> container::Style {
    container::Style {
        border: Border {
            color: palette::SELECTED_BLUE,
            width: 1.0,
            radius: 0.0.into(),
        },
        ..Default::default()
    }
}

pub fn container_banner(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(palette::BANNER)),
        text_color: Some(palette::BANNER_TEXT),
        border: Border {
            color: palette::ACCENT_ORANGE,
            width: 2.0,
            radius: 4.0.into(),
        },
        ..Default::default()
    }
}

// Button Styles
fn filled(color: Color, hover: Color, text: Color, status: button::Status) -> button::Style {
    let background = match status {
        button::Status::Hovered | button::Status::Pressed => hover,
        button::Status::Disabled => Color { a: 0.5, ..color },
        button::Status::Active => color,
    };
    button::Style {
        background: Some(Background::Color(background)),
        text_color: text,
        border: Border {
            radius: 4.0.into(),
            ..Default::default()
        },
        shadow: Shadow::default(),
    }
}

pub fn button_primary(_theme: &Theme, status: button::Status) -> button::Style {
    filled(palette::ACCENT_BLUE, palette::SELECTED_BLUE, Color::WHITE, status)
}

/// Navigation bar entries. The active one is drawn selected.
pub fn button_nav(active: bool) -> impl Fn(&Theme, button::Status) -> button::Style {
    move |_theme: &Theme, status: button::Status| {
        if active {
            filled(palette::SELECTED_BLUE, palette::SELECTED_BLUE, Color::WHITE, status)
        } else {
            filled(palette::ACCENT_BLUE, palette::SELECTED_BLUE, Color::WHITE, status)
        }
    }
}

/// LIST / GRID switch: the selected mode is filled, the other is plain.
pub fn button_toggle(selected: bool) -> impl Fn(&Theme, button::Status) -> button::Style {
    move |_theme: &Theme, status: button::Status| {
        if selected {
            filled(palette::ACCENT_BLUE, palette::SELECTED_BLUE, Color::WHITE, status)
        } else {
            let mut style = filled(Color::WHITE, palette::BACKGROUND, palette::TEXT_PRIMARY, status);
            style.border = Border {
                color: palette::BORDER,
                width: 1.0,
                radius: 4.0.into(),
            };
            style
        }
    }
}

pub fn button_set_location(_theme: &Theme, status: button::Status) -> button::Style {
    filled(
        palette::ACCENT_ORANGE,
        Color::from_rgb(1.0, 0.55, 0.0),
        Color::WHITE,
        status,
    )
}

pub fn button_confirm(_theme: &Theme, status: button::Status) -> button::Style {
    filled(
        palette::CONFIRM_GREEN,
        Color::from_rgb(0.18, 0.65, 0.18),
        Color::WHITE,
        status,
    )
}

pub fn button_cancel(_theme: &Theme, status: button::Status) -> button::Style {
    filled(
        palette::CANCEL_RED,
        Color::from_rgb(0.95, 0.2, 0.3),
        Color::WHITE,
        status,
    )
}

pub fn button_link(_theme: &Theme, status: button::Status) -> button::Style {
    let text_color = match status {
        button::Status::Hovered | button::Status::Pressed => palette::SELECTED_BLUE,
        _ => palette::TEXT_PRIMARY,
    };
    button::Style {
        background: None,
        text_color,
        border: Border::default(),
        shadow: Shadow::default(),
    }
}
