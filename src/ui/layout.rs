//! Dashboard layout: header, controls, postcode ranking, detail panel and footer

use {
    super::{
        input::Focus,
        renderer::{checkbox, format_count, format_sources, window_label},
    },
    crate::view::RenderModel,
    ratatui::{
        layout::{Constraint, Direction, Layout as RatLayout, Rect},
        style::{Color, Modifier, Style},
        text::{Line, Span},
        widgets::{Block, Borders, Paragraph, Row, Table},
        Frame,
    },
};

/// Render the main UI layout
pub fn render_layout(
    f: &mut Frame,
    area: Rect,
    model: &RenderModel,
    focus: Focus,
) -> Result<(), Box<dyn std::error::Error>> {
    let controls_height = if model.controls_visible { 5 } else { 0 };

    // Create layout sections
    let chunks = RatLayout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),               // Header
            Constraint::Length(controls_height), // Controls
            Constraint::Min(0),                  // Ranking + detail
            Constraint::Length(3),               // Footer/Status
        ])
        .split(area);

    render_header(f, chunks[0], model);

    if model.controls_visible {
        render_controls(f, chunks[1], model, focus);
    }

    let body = RatLayout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[2]);

    render_ranking_table(f, body[0], model)?;
    render_detail(f, body[1], model);

    render_footer(f, chunks[3], model);

    Ok(())
}

fn render_header(f: &mut Frame, area: Rect, model: &RenderModel) {
    let header = Block::default()
        .borders(Borders::ALL)
        .title("Infection Map - Postcode Timeline");

    let date_style = if model.date_valid {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    };
    let back = if model.can_step_back { "◀" } else { " " };
    let forward = if model.can_step_forward { "▶" } else { " " };

    let text = vec![Line::from(vec![
        Span::raw(format!("{} ", back)),
        Span::styled(model.date_text.clone(), date_style),
        Span::raw(format!(" {}", forward)),
        Span::raw("  |  "),
        Span::styled(
            format!("[{}]", model.timer_label),
            Style::default().fg(if model.timer_running { Color::Green } else { Color::Gray }),
        ),
        Span::raw("  |  "),
        Span::raw(window_label(&model.window_selected)),
    ])];

    f.render_widget(Paragraph::new(text).block(header), area);
}

fn field_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

fn render_controls(f: &mut Frame, area: Rect, model: &RenderModel, focus: Focus) {
    let mut sources = vec![Span::styled("Sources: ", Style::default().fg(Color::Cyan))];
    for (i, source) in model.sources.iter().enumerate() {
        sources.push(Span::raw(format!(
            "{}{} {}  ",
            i + 1,
            checkbox(source.included),
            source.name
        )));
    }

    let text = vec![
        Line::from(vec![
            Span::styled("Date: ", field_style(focus == Focus::Date)),
            Span::raw(model.date_text.clone()),
            Span::raw(if model.date_valid { "" } else { "  (invalid)" }),
            Span::raw("   "),
            Span::styled("Window: ", field_style(focus == Focus::Window)),
            Span::raw(format!(
                "{} (of {})",
                model.window_selected,
                model.window_options.len()
            )),
            Span::raw("   "),
            Span::styled("Postcode: ", field_style(focus == Focus::Postcode)),
            Span::raw(model.postcode_text.clone()),
        ]),
        Line::from(sources),
        Line::from(vec![Span::raw(
            "←/→ day  space play  tab field  ↑/↓ window  1-9 source  h hide  q quit",
        )]),
    ];

    let block = Block::default().borders(Borders::ALL).title("Controls");
    f.render_widget(Paragraph::new(text).block(block), area);
}

fn render_ranking_table(
    f: &mut Frame,
    area: Rect,
    model: &RenderModel,
) -> Result<(), Box<dyn std::error::Error>> {
    let header = Row::new(vec!["Postcode", "Cases"])
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = model
        .ranked
        .iter()
        .take(area.height.saturating_sub(3) as usize)
        .map(|(postcode, cases)| {
            let selected = model
                .detail
                .as_ref()
                .is_some_and(|d| &d.postcode == postcode);
            let style = if selected {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else if *cases == 0 {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default()
            };
            Row::new(vec![postcode.clone(), format_count(*cases)]).style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(10), // Postcode
        Constraint::Length(12), // Cases
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("Postcodes"));

    f.render_widget(table, area);
    Ok(())
}

fn render_detail(f: &mut Frame, area: Rect, model: &RenderModel) {
    let block = Block::default().borders(Borders::ALL).title("Detail");

    let Some(detail) = &model.detail else {
        let hint = if model.postcode_text.is_empty() {
            "Type or hover a postcode"
        } else {
            "No such postcode"
        };
        f.render_widget(Paragraph::new(hint).block(block), area);
        return;
    };

    let mut text = vec![
        Line::from(vec![
            Span::styled(
                detail.postcode.clone(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(
                "  cases {}  tests {}",
                format_count(detail.cases),
                format_count(detail.tests)
            )),
        ]),
        Line::from(""),
    ];
    for row in &detail.rows {
        let style = if row.in_window {
            Style::default()
        } else {
            Style::default().fg(Color::DarkGray)
        };
        text.push(Line::from(vec![
            Span::styled(row.day.clone(), style),
            Span::styled(format!("  {}", format_sources(&row.counts)), style),
        ]));
    }

    f.render_widget(Paragraph::new(text).block(block), area);
}

fn render_footer(f: &mut Frame, area: Rect, model: &RenderModel) {
    let (status, status_color) = if model.loaded {
        ("Loaded", Color::Green)
    } else {
        ("Waiting for data", Color::Yellow)
    };

    let text = vec![Line::from(vec![
        Span::styled("Status: ", Style::default().fg(status_color)),
        Span::raw(status),
        Span::raw(" | "),
        Span::styled("Cases: ", Style::default().fg(Color::Cyan)),
        Span::raw(format_count(model.total_cases)),
        Span::raw(" | "),
        Span::styled("Postcodes: ", Style::default().fg(Color::Cyan)),
        Span::raw(model.postcode_count.to_string()),
    ])];

    let footer = Block::default().borders(Borders::ALL).title("Status");

    f.render_widget(Paragraph::new(text).block(footer), area);
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            dataset::{tests::record, Dataset},
            state::{reduce, Event, SessionState},
            view::render_model,
        },
        ratatui::{backend::TestBackend, Terminal},
    };

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_render_loaded_dashboard() {
        let dataset = Dataset::new(vec![record(
            "2000",
            vec![("2020-04-05", vec![("confirmed", 1234)])],
            100,
        )]);
        let state = reduce(SessionState::new(), Event::DatasetLoaded(dataset));
        let state = reduce(state, Event::ExternalHover("2000".into()));
        let model = render_model(&state);

        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal
            .draw(|f| {
                let area = f.size();
                render_layout(f, area, &model, Focus::None).unwrap();
            })
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("2020-04-05"));
        assert!(text.contains("1,234"));
        assert!(text.contains("[x] confirmed"));
        assert!(text.contains("Loaded"));
    }

    #[test]
    fn test_render_empty_without_controls() {
        let state = reduce(SessionState::new(), Event::ToggleControlsVisible);
        let model = render_model(&state);

        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal
            .draw(|f| {
                let area = f.size();
                render_layout(f, area, &model, Focus::None).unwrap();
            })
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Waiting for data"));
        assert!(!text.contains("Controls"));
    }
}
