use linebot_core::{RULES, Report, Snapshot, WheelCommand};
use ratatui::prelude::*;
use ratatui::symbols::border;
use ratatui::widgets::block::Title;
use ratatui::widgets::{Block, Borders, Paragraph, Widget};

use crate::sim::RecordingWheels;

fn panel(name: &'static str) -> Block<'static> {
    Block::default()
        .title(Title::from(name.bold()).alignment(Alignment::Center))
        .borders(Borders::ALL)
        .border_set(border::THICK)
}

/// Text screen mirroring one of the robot's OLED panels.
pub struct OledWidget {
    name: &'static str,
    lines: Vec<String>,
}

impl OledWidget {
    pub fn new(name: &'static str, lines: Vec<String>) -> Self {
        Self { name, lines }
    }
}

impl Widget for OledWidget {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let text = Text::from(self.lines.into_iter().map(Line::from).collect::<Vec<Line>>());

        Paragraph::new(text)
            .block(panel(self.name))
            .render(area, buf);
    }
}

/// The priority table for the reported snapshot, winning rule highlighted.
pub struct RulesWidget<'a> {
    report: &'a Report,
}

impl<'a> RulesWidget<'a> {
    pub fn new(report: &'a Report) -> Self {
        Self { report }
    }
}

impl Widget for RulesWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let snapshot = Snapshot {
            distances: self.report.distances,
            line: self.report.line,
        };
        let winner = RULES.iter().position(|rule| (rule.holds)(&snapshot));

        let text = Text::from(
            RULES
                .iter()
                .enumerate()
                .map(|(i, rule)| -> Line<'static> {
                    let holds = (rule.holds)(&snapshot);
                    let row = format!("{i} {:<10} {}", rule.command.label(), if holds { "yes" } else { "-" });
                    let style = if Some(i) == winner {
                        Style::new().yellow().bold()
                    } else if holds {
                        Style::new()
                    } else {
                        Style::new().dark_gray()
                    };
                    Span::styled(row, style).into()
                })
                .collect::<Vec<Line>>(),
        );

        Paragraph::new(text)
            .block(panel(" Rules "))
            .render(area, buf);
    }
}

pub struct WheelsWidget<'a> {
    wheels: &'a RecordingWheels,
}

impl<'a> WheelsWidget<'a> {
    pub fn new(wheels: &'a RecordingWheels) -> Self {
        Self { wheels }
    }
}

fn wheel_span(command: WheelCommand) -> Span<'static> {
    let style = match command.signed() {
        0 => Style::new().dark_gray(),
        s if s < 0 => Style::new().red(),
        _ => Style::new().green(),
    };
    Span::styled(format!("{:>5}", command.to_string()), style)
}

impl Widget for WheelsWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let text = Text::from(vec![
            Line::from(vec![
                "L ".into(),
                wheel_span(self.wheels.left),
                "  R ".into(),
                wheel_span(self.wheels.right),
            ]),
            Line::from(format!("commands: {}", self.wheels.applied)),
        ]);

        Paragraph::new(text)
            .centered()
            .block(panel(" Wheels "))
            .render(area, buf);
    }
}
