use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::App;

use super::centered;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let machine = app.machine();

    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "TRIVIA QUIZ",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
    ];

    match machine.fetch_error() {
        Some(error) => {
            content.push(Line::from(Span::styled(
                format!("Error: {error}"),
                Style::default().fg(Color::Red).bold(),
            )));
            content.push(Line::from(""));
            content.push(Line::from(
                "enter retry  ·  r back  ·  q quit".fg(Color::DarkGray),
            ));
        }
        None => {
            let summary = machine
                .settings()
                .map(|s| format!("{} {} questions", s.amount(), s.difficulty()))
                .unwrap_or_default();
            content.push(Line::from(Span::styled(
                "Loading questions...",
                Style::default().fg(Color::Yellow),
            )));
            content.push(Line::from(summary.fg(Color::DarkGray)));
            content.push(Line::from(""));
            content.push(Line::from("r cancel  ·  q quit".fg(Color::DarkGray)));
        }
    }

    let widget = Paragraph::new(content)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Color::DarkGray),
        );
    frame.render_widget(widget, centered(area, 60.min(area.width), 9));
}
