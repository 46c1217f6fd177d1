use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::app::{App, CategoryList, FormField};
use crate::models::Difficulty;

use super::centered;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let panel = centered(area, 64.min(area.width), 17.min(area.height));

    let chunks = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(2),
        Constraint::Length(2),
        Constraint::Length(2),
        Constraint::Length(2),
        Constraint::Length(2),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .split(panel);

    render_title(frame, chunks[0]);
    render_category(frame, chunks[1], app);

    let form = app.form();
    let difficulties: Vec<String> = Difficulty::ALL.iter().map(|d| d.to_string()).collect();
    let difficulty_index = Difficulty::ALL
        .iter()
        .position(|d| *d == form.difficulty)
        .unwrap_or(0);
    render_choice(
        frame,
        chunks[2],
        "Difficulty",
        &difficulties,
        difficulty_index,
        form.focus == FormField::Difficulty,
    );

    let amounts: Vec<String> = form.amounts.iter().map(u32::to_string).collect();
    render_choice(
        frame,
        chunks[3],
        "Questions",
        &amounts,
        form.amount_index,
        form.focus == FormField::Amount,
    );

    let times: Vec<String> = form.times.iter().map(|t| format!("{t}s")).collect();
    render_choice(
        frame,
        chunks[4],
        "Time",
        &times,
        form.time_index,
        form.focus == FormField::Time,
    );

    render_start(frame, chunks[5], form.focus == FormField::Start);
    render_error(frame, chunks[6], app.settings_error());
    render_controls(frame, chunks[7]);
}

fn render_title(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new(Line::from(Span::styled(
        "TRIVIA QUIZ",
        Style::default().fg(Color::Cyan).bold(),
    )))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn label_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow).bold()
    } else {
        Style::default().fg(Color::Gray)
    }
}

fn render_category(frame: &mut Frame, area: Rect, app: &App) {
    let focused = app.form().focus == FormField::Category;

    let value = match app.categories() {
        CategoryList::Loading => Span::styled("loading...", Style::default().fg(Color::Yellow)),
        CategoryList::Failed(error) => Span::styled(
            format!("Error: {error}"),
            Style::default().fg(Color::Red),
        ),
        CategoryList::Loaded(_) => {
            let name = app
                .selected_category()
                .map(|c| c.name.as_str())
                .unwrap_or("-");
            Span::styled(
                format!("< {name} >"),
                if focused {
                    Style::default().fg(Color::Cyan).bold()
                } else {
                    Style::default().fg(Color::White)
                },
            )
        }
    };

    let line = Line::from(vec![
        Span::styled(marker(focused), label_style(focused)),
        Span::styled(format!("{:<12}", "Category"), label_style(focused)),
        value,
    ]);
    frame.render_widget(
        Paragraph::new(line).block(Block::default().padding(Padding::horizontal(1))),
        area,
    );
}

fn render_choice(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    options: &[String],
    selected: usize,
    focused: bool,
) {
    let mut spans = vec![
        Span::styled(marker(focused), label_style(focused)),
        Span::styled(format!("{label:<12}"), label_style(focused)),
    ];

    for (index, option) in options.iter().enumerate() {
        let style = if index == selected {
            Style::default().fg(Color::Black).bg(Color::Cyan).bold()
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!(" {option} "), style));
        spans.push(Span::raw(" "));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).block(Block::default().padding(Padding::horizontal(1))),
        area,
    );
}

fn render_start(frame: &mut Frame, area: Rect, focused: bool) {
    let style = if focused {
        Style::default().fg(Color::Black).bg(Color::Green).bold()
    } else {
        Style::default().fg(Color::Green).bold()
    };
    let widget = Paragraph::new(Span::styled("  START QUIZ  ", style)).alignment(Alignment::Center);
    frame.render_widget(widget, area);
}

fn render_error(frame: &mut Frame, area: Rect, error: Option<&str>) {
    if let Some(error) = error {
        let widget = Paragraph::new(error)
            .alignment(Alignment::Center)
            .fg(Color::Red);
        frame.render_widget(widget, area);
    }
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("j/k field  ·  h/l change  ·  enter start  ·  q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}

fn marker(focused: bool) -> &'static str {
    if focused { "> " } else { "  " }
}
