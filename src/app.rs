use iced::widget::button as button_widget;
use iced::widget::canvas::{Canvas, Frame, Geometry, Path, Program, Stroke};
use iced::widget::container as container_widget;
use iced::widget::{button, column, container, row, text, text_input, Column};
use iced::theme;
use iced::{Alignment, Background, Color, Command, Element, Font, Length, Renderer, Theme};
use std::time::Duration;
use tracing::{debug, info};

use morse_watcher::clock::utc_now_label;
use morse_watcher::playback::{PlaybackDriver, Ticket, Wakeup};
use morse_watcher::timing::{TimingConfig, TimingInputs};
use morse_watcher::DEFAULT_MESSAGE;

const STREAM_TAIL_CHARS: usize = 56;

fn color_bg() -> Color {
    Color::from_rgb8(10, 12, 16)
}

fn color_surface() -> Color {
    Color::from_rgb8(20, 26, 34)
}

fn color_surface_alt() -> Color {
    Color::from_rgb8(26, 34, 44)
}

fn color_border() -> Color {
    Color::from_rgb8(40, 52, 66)
}

fn color_text() -> Color {
    Color::from_rgb8(236, 242, 248)
}

fn color_muted() -> Color {
    Color::from_rgb8(150, 168, 186)
}

fn color_mint() -> Color {
    Color::from_rgb8(127, 217, 183)
}

fn color_signal() -> Color {
    Color::from_rgb8(255, 93, 79)
}

#[derive(Debug, Clone)]
pub enum Message {
    Advance(Ticket),
    ClockTick,
    Reset,
    OnShortChanged(String),
    OnLongChanged(String),
    OffShortChanged(String),
    OffMediumChanged(String),
    OffLongChanged(String),
    TimingSubmitted,
    MessageChanged(String),
    MessageSubmitted,
}

pub struct App {
    driver: PlaybackDriver,
    timing_inputs: TimingInputs,
    message_input: String,
    clock: String,
}

impl Default for App {
    fn default() -> Self {
        let timing_inputs = TimingInputs::default();
        App {
            driver: PlaybackDriver::new(DEFAULT_MESSAGE, timing_inputs.resolve()),
            timing_inputs,
            message_input: DEFAULT_MESSAGE.to_string(),
            clock: utc_now_label(),
        }
    }
}

impl iced::Application for App {
    type Executor = iced::executor::Default;
    type Message = Message;
    type Theme = Theme;
    type Flags = ();

    fn new(_flags: ()) -> (Self, Command<Self::Message>) {
        let mut app = Self::default();
        let command = app.restart();
        (app, command)
    }

    fn title(&self) -> String {
        "Morse Watcher".to_string()
    }

    fn subscription(&self) -> iced::Subscription<Self::Message> {
        iced::time::every(Duration::from_secs(1)).map(|_| Message::ClockTick)
    }

    fn update(&mut self, message: Self::Message) -> Command<Self::Message> {
        match message {
            Message::Advance(ticket) => {
                self.clock = utc_now_label();
                if self.driver.is_loop_restart(ticket) {
                    return self.restart();
                }
                match self.driver.fire(ticket) {
                    Some(wakeup) => schedule(wakeup),
                    None => Command::none(),
                }
            }
            Message::ClockTick => {
                self.clock = utc_now_label();
                Command::none()
            }
            Message::Reset => self.restart(),
            Message::OnShortChanged(v) => {
                self.timing_inputs.on_short = v;
                Command::none()
            }
            Message::OnLongChanged(v) => {
                self.timing_inputs.on_long = v;
                Command::none()
            }
            Message::OffShortChanged(v) => {
                self.timing_inputs.off_short = v;
                Command::none()
            }
            Message::OffMediumChanged(v) => {
                self.timing_inputs.off_medium = v;
                Command::none()
            }
            Message::OffLongChanged(v) => {
                self.timing_inputs.off_long = v;
                Command::none()
            }
            Message::TimingSubmitted => self.restart(),
            Message::MessageChanged(v) => {
                self.message_input = v;
                Command::none()
            }
            Message::MessageSubmitted => {
                let message = self.message_input.trim().to_uppercase();
                info!(%message, "new message");
                self.message_input = message.clone();
                let timing = self.commit_timing();
                let wakeup = self.driver.set_message(message, timing);
                schedule(wakeup)
            }
        }
    }

    fn view(&self) -> Element<'_, Self::Message> {
        let view = self.driver.display();

        let header = row![
            text("MORSE WATCHER").size(22).style(color_text()),
            container(text("")).width(Length::Fill),
            pill(&self.clock, color_surface_alt(), color_text()),
        ]
        .spacing(10)
        .align_items(Alignment::Center);

        let banner: Element<'_, Message> = match &view.banner {
            Some(label) => pill(label, color_mint(), Color::from_rgb8(6, 16, 20)),
            None => text("").into(),
        };

        let light = Canvas::new(LightView {
            active: view.light_active,
        })
        .width(Length::Fixed(220.0))
        .height(Length::Fixed(220.0));

        let scene = container(
            column![banner, light]
                .spacing(12)
                .align_items(Alignment::Center),
        )
        .padding(18)
        .width(Length::Fill)
        .center_x()
        .style(theme::Container::from(hero_style));

        let readout = card(
            "Signal",
            column![
                row![
                    text("Symbols:").style(color_muted()),
                    text(view.symbol_tail(STREAM_TAIL_CHARS))
                        .font(Font::MONOSPACE)
                        .size(18),
                ]
                .spacing(10)
                .align_items(Alignment::Center),
                row![
                    text("Decoded:").style(color_muted()),
                    text(&view.decoded).size(18),
                ]
                .spacing(10)
                .align_items(Alignment::Center),
                row![
                    pill(&format!("Pulse {}", view.pulse_width), color_surface_alt(), color_text()),
                    pill(&view.calibration, color_surface_alt(), color_mint()),
                ]
                .spacing(10),
            ],
        );

        let timing_field = |label: &str, value: &str, on_input: fn(String) -> Message| {
            column![
                text(label).size(12).style(color_muted()),
                text_input("ms", value)
                    .on_input(on_input)
                    .on_submit(Message::TimingSubmitted)
                    .width(Length::Fixed(90.0)),
            ]
            .spacing(4)
        };

        let controls = card(
            "Timing (ms)",
            column![
                row![
                    timing_field("On short", &self.timing_inputs.on_short, Message::OnShortChanged),
                    timing_field("On long", &self.timing_inputs.on_long, Message::OnLongChanged),
                    timing_field("Off short", &self.timing_inputs.off_short, Message::OffShortChanged),
                    timing_field("Off medium", &self.timing_inputs.off_medium, Message::OffMediumChanged),
                    timing_field("Off long", &self.timing_inputs.off_long, Message::OffLongChanged),
                ]
                .spacing(10),
                row![
                    text_input("Message", &self.message_input)
                        .on_input(Message::MessageChanged)
                        .on_submit(Message::MessageSubmitted),
                    button("Reset")
                        .padding(10)
                        .style(theme::Button::Custom(Box::new(PrimaryButton)))
                        .on_press(Message::Reset),
                ]
                .spacing(10)
                .align_items(Alignment::Center),
            ],
        );

        container(column![header, scene, readout, controls].spacing(16))
            .padding(20)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(theme::Container::from(body_style))
            .into()
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

impl App {
    /// Resolves the timing fields and writes the coerced values back, so the
    /// inputs always show what the driver runs with.
    fn commit_timing(&mut self) -> TimingConfig {
        let timing = self.timing_inputs.resolve();
        self.timing_inputs = TimingInputs::from(timing);
        timing
    }

    fn restart(&mut self) -> Command<Message> {
        let timing = self.commit_timing();
        debug!(?timing, "restart requested");
        schedule(self.driver.restart(timing))
    }
}

fn schedule(wakeup: Wakeup) -> Command<Message> {
    let Wakeup { ticket, delay } = wakeup;
    Command::perform(async move { tokio::time::sleep(delay).await }, move |_| {
        Message::Advance(ticket)
    })
}

fn card<'a>(title: &str, content: Column<'a, Message>) -> Element<'a, Message> {
    container(
        column![
            container(text(title).size(15).style(color_text()))
                .padding([6, 10])
                .width(Length::Fill)
                .style(theme::Container::from(header_style)),
            content.spacing(12),
        ]
        .spacing(12),
    )
    .padding(14)
    .width(Length::Fill)
    .style(theme::Container::from(card_style))
    .into()
}

fn header_style(_theme: &Theme) -> container_widget::Appearance {
    container_widget::Appearance {
        background: Some(Background::Color(color_surface_alt())),
        text_color: Some(color_text()),
        border_radius: 10.0.into(),
        border_width: 1.0,
        border_color: color_border(),
    }
}

fn card_style(_theme: &Theme) -> container_widget::Appearance {
    container_widget::Appearance {
        background: Some(Background::Color(color_surface())),
        text_color: Some(color_text()),
        border_radius: 14.0.into(),
        border_width: 1.0,
        border_color: color_border(),
    }
}

fn hero_style(_theme: &Theme) -> container_widget::Appearance {
    container_widget::Appearance {
        background: Some(Background::Color(Color::from_rgb8(6, 8, 11))),
        text_color: Some(color_text()),
        border_radius: 16.0.into(),
        border_width: 1.0,
        border_color: color_mint(),
    }
}

fn body_style(_theme: &Theme) -> container_widget::Appearance {
    container_widget::Appearance {
        background: Some(Background::Color(color_bg())),
        text_color: Some(color_text()),
        ..Default::default()
    }
}

fn pill<'a>(label: &str, bg: Color, fg: Color) -> Element<'a, Message> {
    container(text(label).size(12))
        .padding([4, 10])
        .style(theme::Container::Custom(Box::new(PillStyle { bg, fg })))
        .into()
}

struct PrimaryButton;

impl button_widget::StyleSheet for PrimaryButton {
    type Style = Theme;

    fn active(&self, _style: &Self::Style) -> button_widget::Appearance {
        button_widget::Appearance {
            background: Some(Background::Color(color_mint())),
            text_color: Color::from_rgb8(6, 16, 20),
            border_radius: 10.0.into(),
            border_width: 1.0,
            border_color: color_mint(),
            ..Default::default()
        }
    }

    fn hovered(&self, style: &Self::Style) -> button_widget::Appearance {
        let mut active = self.active(style);
        active.background = Some(Background::Color(Color::from_rgb8(152, 230, 200)));
        active
    }

    fn pressed(&self, style: &Self::Style) -> button_widget::Appearance {
        let mut active = self.active(style);
        active.background = Some(Background::Color(Color::from_rgb8(104, 196, 162)));
        active
    }
}

struct PillStyle {
    bg: Color,
    fg: Color,
}

impl container_widget::StyleSheet for PillStyle {
    type Style = Theme;

    fn appearance(&self, _style: &Self::Style) -> container_widget::Appearance {
        container_widget::Appearance {
            background: Some(Background::Color(self.bg)),
            text_color: Some(self.fg),
            border_radius: 999.0.into(),
            border_width: 1.0,
            border_color: self.bg,
        }
    }
}

/// The watched light plus the small signal indicator in its corner.
struct LightView {
    active: bool,
}

impl<Message> Program<Message, Renderer> for LightView {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: iced::Rectangle,
        _cursor: iced::mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        let center = frame.center();
        let full = frame.size().width.min(frame.size().height) * 0.3;

        let (radius, core, glow) = if self.active {
            (
                full,
                Color::WHITE,
                [Color::from_rgba(1.0, 1.0, 1.0, 0.45), Color::from_rgba(1.0, 1.0, 1.0, 0.2)],
            )
        } else {
            (
                full * 0.88,
                Color::from_rgba8(127, 217, 183, 0.5 * 0.28),
                [Color::from_rgba8(127, 217, 183, 0.12), Color::from_rgba8(127, 217, 183, 0.06)],
            )
        };

        // outer halo first so the core paints over it
        frame.fill(&Path::circle(center, radius * 1.6), glow[1]);
        frame.fill(&Path::circle(center, radius * 1.25), glow[0]);
        frame.fill(&Path::circle(center, radius), core);
        frame.stroke(
            &Path::circle(center, full * 1.05),
            Stroke::default()
                .with_width(1.0)
                .with_color(Color::from_rgba8(127, 217, 183, 0.35)),
        );

        let dot = iced::Point::new(frame.size().width - 16.0, 16.0);
        let (dot_color, dot_glow) = if self.active {
            (color_signal(), Color::from_rgba8(255, 93, 79, 0.45))
        } else {
            (Color::from_rgba8(239, 107, 94, 0.18), Color::from_rgba8(239, 107, 94, 0.06))
        };
        frame.fill(&Path::circle(dot, 10.0), dot_glow);
        frame.fill(&Path::circle(dot, 5.0), dot_color);

        vec![frame.into_geometry()]
    }
}
