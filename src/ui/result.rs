use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::models::Answer;
use crate::quiz::{Phase, ReviewEntry};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let machine = app.machine();
    let score = machine.score();
    let total = machine.questions().len();
    let percentage = calculate_percentage(score, total);
    let exited_early = matches!(machine.phase(), Phase::Completed { exited_early: true });

    let chunks = Layout::vertical([
        Constraint::Length(8),
        Constraint::Fill(1),
        Constraint::Length(2),
    ])
    .margin(1)
    .split(area);

    let summary = Summary {
        score,
        total,
        percentage,
        answered: machine.answered_count(),
        skipped: machine.skipped_count(),
        exited_early,
    };
    render_score_summary(frame, chunks[0], &summary);
    render_review(frame, chunks[1], app.review(), app.result_scroll());
    render_controls(frame, chunks[2]);
}

struct Summary {
    score: usize,
    total: usize,
    percentage: f64,
    answered: usize,
    skipped: usize,
    exited_early: bool,
}

fn calculate_percentage(score: usize, total: usize) -> f64 {
    if total > 0 {
        (score as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}

fn get_grade_color(percentage: f64) -> Color {
    match percentage.round() as u32 {
        80..=100 => Color::Green,
        60..=79 => Color::Yellow,
        _ => Color::Red,
    }
}

fn render_score_summary(frame: &mut Frame, area: Rect, summary: &Summary) {
    let mut content = vec![
        Line::from(Span::styled(
            "QUIZ RESULTS",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "{} / {}  ({:.0}%)",
                summary.score, summary.total, summary.percentage
            ),
            Style::default()
                .fg(get_grade_color(summary.percentage))
                .bold(),
        )),
        Line::from(""),
        Line::from(
            format!("{} questions answered", summary.answered).fg(Color::Gray),
        ),
    ];

    if summary.skipped > 0 {
        content.push(Line::from(
            format!("{} questions skipped", summary.skipped).fg(Color::Yellow),
        ));
    }
    if summary.exited_early {
        content.push(Line::from("quiz exited early".fg(Color::DarkGray)));
    }

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn review_lines(entry: &ReviewEntry) -> Vec<Line<'_>> {
    let (symbol, color) = if entry.is_correct {
        ("+", Color::Green)
    } else if entry.is_skipped {
        ("~", Color::Yellow)
    } else {
        ("-", Color::Red)
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(format!(" {symbol} "), Style::default().fg(color).bold()),
        Span::styled(
            format!("{:2}. ", entry.number),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(entry.question.as_str(), Style::default().fg(Color::White)),
    ])];

    let your_answer = match &entry.selected {
        Some(Answer::Given(text)) => Span::styled(text.as_str(), Style::default().fg(color)),
        Some(Answer::Skipped) | None => {
            Span::styled("skipped", Style::default().fg(Color::Yellow).italic())
        }
    };
    lines.push(Line::from(vec![
        Span::styled("      your answer: ", Style::default().fg(Color::DarkGray)),
        your_answer,
    ]));

    if !entry.is_correct {
        lines.push(Line::from(vec![
            Span::styled("      correct:     ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                entry.correct_answer.as_str(),
                Style::default().fg(Color::Green),
            ),
        ]));
    }

    lines.push(Line::from(Span::styled(
        format!("      {}", entry.candidates.join("  ·  ")),
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(""));
    lines
}

fn render_review(frame: &mut Frame, area: Rect, review: &[ReviewEntry], scroll: usize) {
    let lines: Vec<Line> = review.iter().skip(scroll).flat_map(review_lines).collect();

    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Question Review ")
                .title_style(Style::default().fg(Color::Cyan))
                .padding(Padding::horizontal(1)),
        );
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("j/k scroll  ·  r take another quiz  ·  q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_of_empty_quiz_is_zero() {
        assert_eq!(calculate_percentage(0, 0), 0.0);
        assert_eq!(calculate_percentage(3, 5), 60.0);
    }

    #[test]
    fn test_grade_colors() {
        assert_eq!(get_grade_color(100.0), Color::Green);
        assert_eq!(get_grade_color(80.0), Color::Green);
        assert_eq!(get_grade_color(60.0), Color::Yellow);
        assert_eq!(get_grade_color(40.0), Color::Red);
    }

    #[test]
    fn test_correct_entries_omit_correct_line() {
        let entry = ReviewEntry {
            number: 1,
            question: "Q".to_string(),
            selected: Some(Answer::Given("A".to_string())),
            correct_answer: "A".to_string(),
            candidates: vec!["A".to_string(), "B".to_string()],
            is_correct: true,
            is_skipped: false,
        };
        assert_eq!(review_lines(&entry).len(), 4);

        let skipped = ReviewEntry {
            selected: Some(Answer::Skipped),
            is_correct: false,
            is_skipped: true,
            ..entry
        };
        assert_eq!(review_lines(&skipped).len(), 5);
    }
}
