use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use typemaster::{
    app::{App, AppState, MenuItem, MENU_ITEMS},
    clock::Clock,
    differ::CharClass,
    ledger::ScoreLedger,
    record::NAME_PLACEHOLDER,
    sentences::SentenceSource,
    Difficulty,
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn title_style() -> Style {
    bold().fg(Color::Cyan)
}

fn dim_style() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

fn difficulty_color(difficulty: Difficulty) -> Color {
    match difficulty {
        Difficulty::Easy => Color::Green,
        Difficulty::Medium => Color::Yellow,
        Difficulty::Hard => Color::Red,
    }
}

pub fn draw<S, C, L>(app: &App<S, C, L>, f: &mut Frame)
where
    S: SentenceSource,
    C: Clock,
    L: ScoreLedger,
{
    let area = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([Constraint::Min(1)])
        .split(f.area())[0];

    match app.state {
        AppState::Menu => render_menu(app, f, area),
        AppState::Typing => render_typing(app, f, area),
        AppState::Results => render_results(app, f, area),
        AppState::HighScores => render_high_scores(app, f, area),
    }
}

fn render_menu<S, C, L>(app: &App<S, C, L>, f: &mut Frame, area: Rect)
where
    S: SentenceSource,
    C: Clock,
    L: ScoreLedger,
{
    let name = if app.name_input.is_empty() {
        Span::styled(NAME_PLACEHOLDER, Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(format!("{}_", app.name_input), bold())
    };

    let mut lines = vec![
        Line::styled("Typing Master", title_style()),
        Line::raw(""),
        Line::from(vec![Span::raw("Name: "), name]),
        Line::styled(
            format!("Last Score: {}", app.last_score_info()),
            Style::default().fg(Color::Gray),
        ),
        Line::raw(""),
        Line::raw("Select Difficulty:"),
    ];

    for (idx, item) in MENU_ITEMS.iter().enumerate() {
        let selected = idx == app.menu_index;
        let style = match item {
            MenuItem::Play(difficulty) => Style::default().fg(difficulty_color(*difficulty)),
            MenuItem::HighScores => Style::default().fg(Color::Blue),
            MenuItem::Exit => Style::default().fg(Color::Red),
        };
        let (marker, style) = if selected {
            ("> ", style.add_modifier(Modifier::BOLD | Modifier::REVERSED))
        } else {
            ("  ", style)
        };
        lines.push(Line::from(vec![
            Span::raw(marker),
            Span::styled(format!("{:<12}", item.label()), style),
        ]));
    }

    lines.push(Line::raw(""));
    if let Some(status) = &app.status {
        lines.push(Line::styled(status.as_str(), bold().fg(Color::Yellow)));
    }
    lines.push(Line::styled(
        "type your name · ↑/↓ select · enter start · esc quit",
        Style::default().add_modifier(Modifier::ITALIC),
    ));

    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn render_typing<S, C, L>(app: &App<S, C, L>, f: &mut Frame, area: Rect)
where
    S: SentenceSource,
    C: Clock,
    L: ScoreLedger,
{
    let Some(feedback) = &app.feedback else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // label
            Constraint::Length(5), // sentence
            Constraint::Length(3), // input
            Constraint::Length(2), // stats
            Constraint::Min(0),
            Constraint::Length(1), // legend
        ])
        .split(area);

    f.render_widget(
        Paragraph::new(format!("Type the following ({} level):", app.difficulty))
            .style(Style::default().fg(Color::Gray)),
        chunks[0],
    );

    let correct = bold().fg(Color::Green);
    let incorrect = bold().fg(Color::Red);
    let spans: Vec<Span> = feedback
        .sentence
        .chars()
        .zip(feedback.chars.iter())
        .map(|(c, class)| {
            let style = match class {
                CharClass::Correct => correct,
                CharClass::Incorrect => incorrect,
                CharClass::Pending => dim_style(),
            };
            Span::styled(c.to_string(), style)
        })
        .collect();

    // short sentences read better centered
    let fits = feedback.sentence.width() + 2 <= chunks[1].width as usize;
    f.render_widget(
        Paragraph::new(Line::from(spans))
            .alignment(if fits {
                Alignment::Center
            } else {
                Alignment::Left
            })
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL)),
        chunks[1],
    );

    f.render_widget(
        Paragraph::new(format!("{}_", app.input))
            .block(Block::default().borders(Borders::ALL).title("Your typing")),
        chunks[2],
    );

    let stats = Line::from(vec![
        Span::styled(
            format!("Time Left: {}s", app.remaining_secs.max(0.0) as u64),
            title_style(),
        ),
        Span::raw("    "),
        Span::raw(format!("WPM: {:.2}", feedback.wpm)),
        Span::raw("    "),
        Span::raw(format!("Accuracy: {:.2}%", feedback.accuracy)),
    ]);
    f.render_widget(
        Paragraph::new(stats).alignment(Alignment::Center),
        chunks[3],
    );

    f.render_widget(
        Paragraph::new(Span::styled(
            "esc menu · ctrl+r restart",
            Style::default().add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center),
        chunks[5],
    );
}

fn render_results<S, C, L>(app: &App<S, C, L>, f: &mut Frame, area: Rect)
where
    S: SentenceSource,
    C: Clock,
    L: ScoreLedger,
{
    let Some(record) = &app.last_record else {
        return;
    };

    let mut lines = vec![
        Line::styled("Test Results", title_style()),
        Line::raw(""),
        Line::raw(format!("Player: {}", record.name())),
        Line::raw(format!("Time: {:.1} seconds", app.elapsed_secs().unwrap_or_default())),
        Line::raw(format!("Words Per Minute: {:.2}", record.wpm())),
        Line::raw(format!("Accuracy: {:.2}%", record.accuracy())),
        Line::raw(""),
        Line::styled(format!("Score: {}", record.score()), title_style()),
        Line::raw(""),
    ];

    if let Some(status) = &app.status {
        lines.push(Line::styled(status.as_str(), bold().fg(Color::Red)));
    }
    lines.push(Line::styled(
        "(r)etry · (m)enu · (h)igh scores · (q)uit",
        Style::default().add_modifier(Modifier::ITALIC),
    ));

    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn render_high_scores<S, C, L>(app: &App<S, C, L>, f: &mut Frame, area: Rect)
where
    S: SentenceSource,
    C: Clock,
    L: ScoreLedger,
{
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // title
            Constraint::Length(1), // warning
            Constraint::Min(3),    // table
            Constraint::Length(1), // legend
        ])
        .split(area);

    f.render_widget(
        Paragraph::new(Line::styled("High Scores", title_style())).alignment(Alignment::Center),
        chunks[0],
    );

    if let Some(warning) = app.leaderboard.warning() {
        f.render_widget(
            Paragraph::new(Span::styled(warning, bold().fg(Color::Yellow))),
            chunks[1],
        );
    }

    if app.leaderboard.is_empty() {
        f.render_widget(
            Paragraph::new("No high scores yet!").alignment(Alignment::Center),
            chunks[2],
        );
    } else {
        let rows = app
            .leaderboard
            .entries()
            .iter()
            .enumerate()
            .map(|(idx, record)| {
                Row::new(vec![
                    (idx + 1).to_string(),
                    record.name().to_string(),
                    record.score().to_string(),
                    format!("{:.1}", record.wpm()),
                    format!("{:.1}", record.accuracy()),
                    record.timestamp().to_string(),
                ])
            });
        let table = Table::new(
            rows,
            [
                Constraint::Length(5),
                Constraint::Length(21),
                Constraint::Length(6),
                Constraint::Length(7),
                Constraint::Length(9),
                Constraint::Min(16),
            ],
        )
        .header(
            Row::new(vec!["Rank", "Name", "Score", "WPM", "Accuracy", "Date"])
                .style(bold().fg(Color::Cyan)),
        )
        .block(Block::default().borders(Borders::ALL));
        f.render_widget(table, chunks[2]);
    }

    f.render_widget(
        Paragraph::new(Span::styled(
            "esc back",
            Style::default().add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center),
        chunks[3],
    );
}
