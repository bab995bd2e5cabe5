use caseorg_core::{NoteMode, OptionList, ResultRow};
use caseorg_types::{NOTE_FILE_NAME, NoteContext};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

use super::app::{App, Column, Focus, Surface};

const HELP: &str = "Tab focus · / files · c case · l case law · y year · b browse · n note · N new note · i invoice · q quit";

pub(crate) fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8),
            Constraint::Min(0),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_lookup(f, chunks[0], app);
    render_results(f, chunks[1], app);
    render_prompt(f, chunks[2], app);
    render_status(f, chunks[3], app);

    app.picker_area = None;
    if app.year_filter.is_open() {
        render_picker(f, chunks[1], app);
    }
    if app.editor.is_visible() {
        render_editor(f, app);
    }
    if let Some(ticket) = &app.pending_delete {
        let area = centered_rect(f.area().width / 2, 5, f.area());
        let text = Text::from(vec![
            Line::from(ticket.prompt()),
            Line::from(Span::styled(
                "[y] Yes   [n] No   [Esc] Close",
                Style::default().fg(Color::DarkGray),
            )),
        ]);
        f.render_widget(Clear, area);
        f.render_widget(
            Paragraph::new(text)
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL).title("Delete file")),
            area,
        );
    }
}

fn focused_block(title: String, focused: bool) -> Block<'static> {
    let style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title)
}

fn render_lookup(f: &mut Frame, area: Rect, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(15),
            Constraint::Percentage(15),
            Constraint::Percentage(35),
            Constraint::Percentage(35),
        ])
        .split(area);

    for (index, column) in [Column::Year, Column::Month, Column::Case]
        .into_iter()
        .enumerate()
    {
        render_options(
            f,
            columns[index],
            app.options(column),
            column_title(column),
            app.focus == Focus::Lookup(column),
            app.lookup_cursor[index],
        );
    }

    if app.focus == Focus::Matches {
        render_matches(f, columns[3], app);
    } else {
        render_case_panel(f, columns[3], app);
    }
}

fn column_title(column: Column) -> &'static str {
    match column {
        Column::Year => "Year",
        Column::Month => "Month",
        Column::Case => "Case",
    }
}

fn render_options(
    f: &mut Frame,
    area: Rect,
    list: &OptionList,
    title: &str,
    focused: bool,
    cursor: usize,
) {
    let title = if list.loading {
        format!("{} …", title)
    } else {
        title.to_string()
    };
    let item_style = if list.enabled {
        Style::default()
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let items: Vec<ListItem> = list
        .options
        .iter()
        .map(|option| ListItem::new(option.as_str()).style(item_style))
        .collect();
    let mut state = ListState::default().with_selected((!list.options.is_empty()).then_some(cursor));
    let widget = List::new(items)
        .block(focused_block(title, focused))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    f.render_stateful_widget(widget, area, &mut state);
}

fn render_case_panel(f: &mut Frame, area: Rect, app: &App) {
    let mut lines = Vec::new();
    let selection = app.lookup.selection();
    if selection.is_complete() {
        lines.push(Line::from(Span::styled(
            selection.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "Choose year, month and case",
            Style::default().fg(Color::DarkGray),
        )));
    }
    match app.lookup.note_button().label() {
        Some(label) => lines.push(Line::from(format!("[n] {}", label))),
        None if app.lookup.note_template().is_some() => {
            lines.push(Line::from(format!("[N] Create {}", NOTE_FILE_NAME)))
        }
        None => {}
    }
    if app.lookup.invoice_enabled() {
        let invoice = match &app.invoice {
            Some(draft) => format!(
                "Invoice {}",
                draft.invoice_number.as_deref().unwrap_or("(no number)")
            ),
            None => "[i] Invoice".to_string(),
        };
        lines.push(Line::from(invoice));
    }
    f.render_widget(
        Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: true })
            .block(focused_block("Case".to_string(), false)),
        area,
    );
}

fn render_matches(f: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = app
        .lookup
        .matches()
        .iter()
        .map(|hit| {
            ListItem::new(Line::from(vec![
                Span::raw(hit.case_name.clone()),
                Span::styled(
                    format!("  {}/{}", hit.year, hit.month),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();
    let selected = (!items.is_empty()).then_some(app.match_cursor);
    let mut state = ListState::default().with_selected(selected);
    let widget = List::new(items)
        .block(focused_block("Matches".to_string(), true))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    f.render_stateful_widget(widget, area, &mut state);
}

fn row_line(row: &ResultRow) -> Line<'static> {
    match row {
        ResultRow::Record(record) => {
            let mut spans = vec![Span::raw(record.display_name.clone())];
            if let Some(rel) = &record.record.rel {
                spans.push(Span::styled(
                    format!("  {}", rel),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            if record.deletable {
                spans.push(Span::styled("  [d]", Style::default().fg(Color::Red)));
            }
            Line::from(spans)
        }
        ResultRow::Directory { .. } | ResultRow::Up { .. } => Line::from(Span::styled(
            row.label(),
            Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        )),
        ResultRow::Error(_) => Line::from(Span::styled(row.label(), Style::default().fg(Color::Red))),
        ResultRow::Placeholder(_) | ResultRow::Empty => Line::from(Span::styled(
            row.label(),
            Style::default().fg(Color::DarkGray),
        )),
    }
}

fn render_results(f: &mut Frame, area: Rect, app: &App) {
    let title = if app.navigator.is_active() {
        format!("Browse /{}", app.navigator.current_path())
    } else {
        match app.surface {
            Surface::Files => "Results".to_string(),
            Surface::CaseLaw => "Case law".to_string(),
        }
    };
    let rows = app.renderer.rows();
    let items: Vec<ListItem> = rows.iter().map(|row| ListItem::new(row_line(row))).collect();
    let mut state = ListState::default().with_selected((!rows.is_empty()).then_some(app.row_cursor));
    let widget = List::new(items)
        .block(focused_block(title, app.focus == Focus::Results))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    f.render_stateful_widget(widget, area, &mut state);
}

fn render_prompt(f: &mut Frame, area: Rect, app: &App) {
    let year = app.year_filter.field();
    let filter = if year.is_empty() { "any" } else { year.as_str() };
    let (title, body) = match app.focus {
        Focus::Prompt(kind) => (format!("{} (year: {})", kind.title(), filter), format!("{}▏", app.input)),
        _ => ("Search".to_string(), format!("Year filter: {}", filter)),
    };
    f.render_widget(
        Paragraph::new(body).block(focused_block(title, matches!(app.focus, Focus::Prompt(_)))),
        area,
    );
}

fn render_status(f: &mut Frame, area: Rect, app: &App) {
    let text = if app.status.is_empty() {
        Span::styled(HELP, Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(app.status.clone())
    };
    f.render_widget(Paragraph::new(Line::from(text)), area);
}

fn render_picker(f: &mut Frame, results: Rect, app: &mut App) {
    let picker = &app.year_filter;
    let visible = picker.visible_count();
    let height = (visible as u16 + 2).min(results.height);
    let area = Rect {
        x: results.x + results.width.saturating_sub(14),
        y: results.y,
        width: 12.min(results.width),
        height,
    };
    let lines: Vec<Line> = picker
        .items()
        .iter()
        .skip(picker.first_visible())
        .take(visible)
        .map(|item| {
            let style = if item.selected {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            Line::from(Span::styled(item.label(), style))
        })
        .collect();
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(Text::from(lines)).block(focused_block("Year".to_string(), true)),
        area,
    );
    app.picker_area = Some(area);
}

fn render_editor(f: &mut Frame, app: &App) {
    let screen = f.area();
    let area = centered_rect(screen.width * 7 / 10, screen.height * 6 / 10, screen);
    let subject = match app.editor.context() {
        Some(NoteContext::Case(case)) => case.to_string(),
        Some(NoteContext::CaseLaw { id }) => format!("case law #{}", id),
        None => String::new(),
    };
    let (body, hint) = match app.editor.mode() {
        NoteMode::View => (app.editor.display_text(), "e edit · Esc close".to_string()),
        NoteMode::Edit => {
            let cursor = app.editor.cursor();
            let before: String = app.editor.buffer().chars().take(cursor).collect();
            let after: String = app.editor.buffer().chars().skip(cursor).collect();
            let hint = if app.editor.save_enabled() {
                "Ctrl+S save · Esc cancel"
            } else {
                "Esc cancel"
            };
            (format!("{}▏{}", before, after), hint.to_string())
        }
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!("{}: {}", NOTE_FILE_NAME, subject))
        .title_bottom(Line::from(hint));
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(body).wrap(Wrap { trim: false }).block(block),
        area,
    );
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
