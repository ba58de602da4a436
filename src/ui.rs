use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Widget},
};

use crate::app::{key_for_hole, App, Screen};
use crate::session::SessionPhase;

const HORIZONTAL_MARGIN: u16 = 5;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.screen {
            Screen::Arena => render_arena(self, area, buf),
            Screen::Leaderboard => render_leaderboard(self, area, buf),
            Screen::GameOver => render_game_over(self, area, buf),
        }
    }
}

fn render_arena(app: &App, area: Rect, buf: &mut Buffer) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let dim = Style::default().add_modifier(Modifier::DIM);
    let mole_style = Style::default().patch(bold).fg(Color::Magenta);
    let green_bold = Style::default().patch(bold).fg(Color::Green);
    let red_bold = Style::default().patch(bold).fg(Color::Red);
    let yellow_bold = Style::default().patch(bold).fg(Color::Yellow);

    let session = &app.session;
    let config = session.config();
    let ledger = session.ledger();

    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(vec![
        Span::styled(session.player_name().to_string(), bold),
        Span::raw("  ·  "),
        Span::styled(session.difficulty().to_string(), bold),
        Span::raw("  ·  "),
        Span::styled(format!("{}s left", session.remaining_secs()), dim),
    ]));
    lines.push(Line::default());

    // One line per grid row; the label is the strike key for that hole.
    let rows = session
        .holes()
        .iter()
        .enumerate()
        .chunks(config.columns as usize);
    for row in &rows {
        let mut spans = Vec::new();
        for (hole, state) in row {
            let label = key_for_hole(hole).unwrap_or('?');
            if state.occupied {
                spans.push(Span::styled(format!("  ({label}) ◉  "), mole_style));
            } else {
                spans.push(Span::styled(format!("  ({label}) ·  "), dim));
            }
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::default());
    lines.push(Line::from(vec![
        Span::styled(
            format!("hits {} (+{})", ledger.hits(), config.hit_points),
            green_bold,
        ),
        Span::raw("   "),
        Span::styled(
            format!("missed {} (-{})", ledger.missed(), config.miss_penalty),
            yellow_bold,
        ),
        Span::raw("   "),
        Span::styled(
            format!("errors {} (-{})", ledger.errors(), config.error_penalty),
            red_bold,
        ),
        Span::raw("   "),
        Span::styled(format!("score {}", session.score()), bold),
    ]));
    lines.push(Line::default());

    match session.phase() {
        SessionPhase::Idle | SessionPhase::Ended => {
            lines.push(Line::from(Span::styled(
                "(s)tart  (←/→) difficulty  (l)eaderboard  (esc)ape",
                dim.add_modifier(Modifier::ITALIC),
            )));
        }
        SessionPhase::Running => {
            lines.push(Line::from(Span::styled(
                "(1-9,0) whack  (p)ause  (esc)ape",
                dim.add_modifier(Modifier::ITALIC),
            )));
        }
        SessionPhase::Paused => {
            lines.push(Line::from(Span::styled(
                "PAUSED — press (p) to resume",
                yellow_bold.add_modifier(Modifier::ITALIC),
            )));
        }
    }

    if let Some(ref status) = app.status {
        lines.push(Line::from(Span::styled(status.clone(), red_bold)));
    }

    let content_height = lines.len() as u16;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints(
            [
                Constraint::Length(area.height.saturating_sub(content_height) / 2),
                Constraint::Length(content_height),
                Constraint::Min(0),
            ]
            .as_ref(),
        )
        .split(area);

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(chunks[1], buf);
}

fn render_leaderboard(app: &App, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([Constraint::Min(1), Constraint::Length(1)].as_ref())
        .split(area);

    let header = Row::new(["#", "player", "points", "tier", "date"]).style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );

    let rows = app.leaderboard_rows.iter().enumerate().map(|(i, record)| {
        Row::new([
            Cell::from(format!("{}", i + 1)),
            Cell::from(record.name.clone()),
            Cell::from(format!("{}", record.points)),
            Cell::from(record.difficulty.to_string()),
            Cell::from(record.date.clone()),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Length(22),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title("Leaderboard"));
    table.render(chunks[0], buf);

    Paragraph::new(Span::styled(
        "(l)/(b)ack to the arena  (esc)ape",
        Style::default()
            .add_modifier(Modifier::DIM)
            .add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(chunks[1], buf);
}

fn render_game_over(app: &App, area: Rect, buf: &mut Buffer) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let dim = Style::default().add_modifier(Modifier::DIM);

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(Span::styled(
        "ROUND OVER",
        bold.fg(Color::Magenta),
    )));
    lines.push(Line::default());

    if let Some(ref summary) = app.last_summary {
        lines.push(Line::from(Span::styled(
            format!("{} · {}", summary.player, summary.difficulty),
            bold,
        )));
        lines.push(Line::from(vec![
            Span::styled(format!("hits {}", summary.hits), bold.fg(Color::Green)),
            Span::raw("   "),
            Span::styled(format!("missed {}", summary.missed), bold.fg(Color::Yellow)),
            Span::raw("   "),
            Span::styled(format!("errors {}", summary.errors), bold.fg(Color::Red)),
        ]));
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            format!("final score: {}", summary.points),
            bold,
        )));
        lines.push(Line::from(Span::styled(
            "your record was saved",
            dim.add_modifier(Modifier::ITALIC),
        )));
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "(s)tart again  (←/→) difficulty  (l)eaderboard  (esc)ape",
        dim.add_modifier(Modifier::ITALIC),
    )));

    let content_height = lines.len() as u16;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints(
            [
                Constraint::Length(area.height.saturating_sub(content_height) / 2),
                Constraint::Length(content_height),
                Constraint::Min(0),
            ]
            .as_ref(),
        )
        .split(area);

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(chunks[1], buf);
}
