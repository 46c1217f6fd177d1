use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Gauge, Padding, Paragraph, Wrap},
};

use crate::app::App;

use super::centered;

const OPTION_LABELS: [char; 4] = ['A', 'B', 'C', 'D'];

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let machine = app.machine();
    let Some(question) = machine.current_question() else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(5),
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    let current = machine.current_question_index() + 1;
    let total = machine.questions().len();

    render_progress_bar(frame, chunks[0], current, total);
    render_header(frame, chunks[1], app, current, total);
    render_meta(frame, chunks[2], &question.category, &question.difficulty);
    render_question_text(frame, chunks[3], &question.text);
    render_options(frame, chunks[4], app);
    render_action(frame, chunks[5], app);
    render_controls(frame, chunks[6]);

    if app.is_exit_prompt_open() {
        render_exit_prompt(frame, area);
    }
}

fn render_progress_bar(frame: &mut Frame, area: Rect, current: usize, total: usize) {
    let ratio = if total > 0 {
        current as f64 / total as f64
    } else {
        0.0
    };
    let widget = Gauge::default()
        .gauge_style(Style::default().fg(Color::Cyan).bg(Color::DarkGray))
        .ratio(ratio.clamp(0.0, 1.0))
        .label("");
    frame.render_widget(widget, area);
}

fn render_header(frame: &mut Frame, area: Rect, app: &App, current: usize, total: usize) {
    let [left, middle, right] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(8),
        Constraint::Fill(1),
    ])
    .areas(area);

    let counter = Paragraph::new(format!("Question {current} of {total}")).fg(Color::Gray);
    frame.render_widget(counter, left);

    let remaining = app.machine().time_remaining();
    let mut timer = Span::styled(format_time(remaining), timer_style(remaining));
    if app.machine().is_timer_paused() && !app.machine().is_transitioning() {
        timer = timer.dim();
    }
    frame.render_widget(Paragraph::new(timer).alignment(Alignment::Center), middle);

    let actions = Paragraph::new("x exit  ·  r reset")
        .alignment(Alignment::Right)
        .fg(Color::DarkGray);
    frame.render_widget(actions, right);
}

fn format_time(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

fn timer_style(seconds: u32) -> Style {
    let color = match seconds {
        0..=5 => Color::Red,
        6..=10 => Color::Yellow,
        _ => Color::Blue,
    };
    Style::default().fg(color).bold()
}

fn render_meta(frame: &mut Frame, area: Rect, category: &str, difficulty: &str) {
    if category.is_empty() && difficulty.is_empty() {
        return;
    }
    let widget = Paragraph::new(format!("{category}  ·  {difficulty}")).fg(Color::DarkGray);
    frame.render_widget(widget, area);
}

fn render_question_text(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::White).bold())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .padding(Padding::horizontal(1)),
        );
    frame.render_widget(widget, area);
}

fn render_options(frame: &mut Frame, area: Rect, app: &App) {
    let machine = app.machine();
    let staged = machine.staged_answer();
    let locked = machine.is_transitioning() || machine.is_time_up();

    let mut lines: Vec<Line> = Vec::with_capacity(machine.answer_order().len() * 2);
    for (index, option) in machine.answer_order().iter().enumerate() {
        let is_cursor = index == app.answer_cursor();
        let is_staged = staged == Some(option.as_str());

        let style = if is_staged {
            Style::default().fg(Color::Black).bg(Color::Blue).bold()
        } else if is_cursor {
            Style::default().fg(Color::Cyan).bold()
        } else if locked {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Gray)
        };
        let marker = if is_cursor { ">" } else { " " };
        let label = OPTION_LABELS.get(index).copied().unwrap_or('?');

        lines.push(Line::from(vec![
            Span::styled(format!(" {marker} "), style),
            Span::styled(format!("{label}. "), style),
            Span::styled(option.as_str(), style),
        ]));
        lines.push(Line::from(""));
    }

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Answers ")
            .title_style(Style::default().fg(Color::Cyan))
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

fn render_action(frame: &mut Frame, area: Rect, app: &App) {
    let machine = app.machine();
    let text = if machine.is_transitioning() {
        "..."
    } else if machine.staged_answer().is_none() {
        "n  Skip"
    } else if machine.is_last_question() {
        "n  See Results"
    } else {
        "n  Next Question"
    };
    let widget = Paragraph::new(text)
        .alignment(Alignment::Right)
        .fg(Color::Green)
        .bold();
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("j/k navigate  ·  enter/1-4 select  ·  n next  ·  q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}

fn render_exit_prompt(frame: &mut Frame, area: Rect) {
    let popup = centered(area, 52.min(area.width), 8.min(area.height));
    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Exit quiz?",
            Style::default().fg(Color::Yellow).bold(),
        )),
        Line::from(""),
        Line::from("Your progress is kept and you'll see your results.".fg(Color::Gray)),
        Line::from(""),
        Line::from("y exit  ·  n cancel".fg(Color::DarkGray)),
    ];

    let widget = Paragraph::new(content)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        );
    frame.render_widget(Clear, popup);
    frame.render_widget(widget, popup);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(75), "1:15");
        assert_eq!(format_time(9), "0:09");
        assert_eq!(format_time(0), "0:00");
    }

    #[test]
    fn test_timer_turns_red_in_last_five_seconds() {
        assert_eq!(timer_style(5).fg, Some(Color::Red));
        assert_eq!(timer_style(10).fg, Some(Color::Yellow));
        assert_eq!(timer_style(30).fg, Some(Color::Blue));
    }
}
