// SPDX-License-Identifier: MPL-2.0
//! View rendering for the application.
//!
//! The window is a toolbar, the single message area, the live canvas and an
//! optional info panel. A captured screenshot is shown as a modal on top.

use super::{App, Message, Phase, StatusMessage, TextureChoice};
use crate::domain::render::Density;
use iced::widget::{
    button, center, column, container, image, opaque, pick_list, progress_bar, row, stack, text,
    Space,
};
use iced::{Alignment, Color, ContentFit, Element, Length, Theme};

const SPACING: f32 = 10.0;
const PADDING: f32 = 12.0;

const TIPS: [&str; 3] = [
    "Use a bright, evenly lit room.",
    "Sit about 40 cm from the camera.",
    "Keep your head steady while the countdown runs.",
];

/// Renders the whole window.
pub(super) fn view(app: &App) -> Element<'_, Message> {
    let mut content = column![toolbar(app)]
        .spacing(SPACING)
        .padding(PADDING)
        .width(Length::Fill)
        .height(Length::Fill);

    if let Some(area) = message_area(app) {
        content = content.push(area);
    }
    content = content.push(canvas(app));
    if app.session.is_info_open() {
        content = content.push(info_panel());
    }

    match (app.session.screenshot(), &app.screenshot_handle) {
        (Some(_), Some(handle)) => stack![content, screenshot_modal(handle)].into(),
        _ => content.into(),
    }
}

fn toolbar(app: &App) -> Element<'_, Message> {
    let choices: Vec<TextureChoice> = app
        .session
        .catalog()
        .map(|catalog| catalog.iter().map(TextureChoice::from).collect())
        .unwrap_or_default();
    let selected = app.session.selected_texture().map(TextureChoice::from);

    let texture_picker = pick_list(choices, selected, Message::SelectTexture)
        .placeholder("Loading irises...");
    let density_picker = pick_list(
        Density::ALL,
        Some(app.session.render_config().density),
        Message::SetDensity,
    );

    let capture_label = match app.session.countdown_remaining() {
        Some(seconds) => seconds.to_string(),
        None => "Capture".to_string(),
    };
    let capture = button(text(capture_label))
        .on_press_maybe(app.session.can_capture().then_some(Message::Capture));

    let face_label = match app.session.phase() {
        Phase::TrackingFace => "Face found",
        Phase::TrackingNoFace => "Looking for a face...",
        _ => "",
    };

    row![
        text("Iris"),
        texture_picker,
        text("Density"),
        density_picker,
        capture,
        text(face_label),
        Space::new().width(Length::Fill),
        button(text("Info")).on_press(Message::ToggleInfo),
    ]
    .spacing(SPACING)
    .align_y(Alignment::Center)
    .into()
}

fn message_area(app: &App) -> Option<Element<'_, Message>> {
    if let Some(progress) = app.model_progress {
        return Some(
            row![
                text("Downloading face model"),
                progress_bar(0.0..=1.0, progress),
            ]
            .spacing(SPACING)
            .align_y(Alignment::Center)
            .into(),
        );
    }

    let message = match app.session.status()? {
        StatusMessage::Error(sentence) => text(*sentence).style(text::danger),
        StatusMessage::Info(note) => text(note.as_str()),
    };
    Some(
        row![
            message,
            Space::new().width(Length::Fill),
            button(text("Dismiss"))
                .style(button::text)
                .on_press(Message::DismissMessage),
        ]
        .spacing(SPACING)
        .align_y(Alignment::Center)
        .into(),
    )
}

fn canvas(app: &App) -> Element<'_, Message> {
    if let Some(handle) = &app.preview_handle {
        return image(handle.clone())
            .content_fit(ContentFit::Contain)
            .width(Length::Fill)
            .height(Length::Fill)
            .into();
    }

    let placeholder = match app.session.phase() {
        Phase::LoadingCatalog => "Loading iris catalog...",
        Phase::LoadingCamera => "Starting camera...",
        _ => "Waiting for camera frames...",
    };
    center(text(placeholder)).into()
}

fn info_panel<'a>() -> Element<'a, Message> {
    let tips = TIPS
        .iter()
        .fold(column![text("Tips").size(18)].spacing(4), |col, tip| {
            col.push(text(format!("- {tip}")))
        });

    container(
        row![
            tips,
            Space::new().width(Length::Fill),
            button(text("Export diagnostics")).on_press(Message::ExportDiagnostics),
        ]
        .align_y(Alignment::End),
    )
    .padding(PADDING)
    .width(Length::Fill)
    .style(container::rounded_box)
    .into()
}

fn screenshot_modal(handle: &image::Handle) -> Element<'_, Message> {
    let dialog = container(
        column![
            image(handle.clone())
                .content_fit(ContentFit::Contain)
                .width(Length::Fill)
                .height(Length::Fill),
            row![
                button(text("Share")).on_press(Message::Share),
                button(text("Close"))
                    .style(button::secondary)
                    .on_press(Message::CloseScreenshot),
            ]
            .spacing(SPACING),
        ]
        .spacing(SPACING)
        .align_x(Alignment::Center),
    )
    .padding(PADDING * 2.0)
    .max_width(900.0)
    .style(container::rounded_box);

    opaque(
        center(dialog)
            .padding(PADDING * 3.0)
            .style(|_theme: &Theme| container::Style {
                background: Some(
                    Color {
                        a: 0.75,
                        ..Color::BLACK
                    }
                    .into(),
                ),
                ..container::Style::default()
            }),
    )
}
