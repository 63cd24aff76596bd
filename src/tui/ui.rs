use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

use crate::dialog::{Session, SessionMode};
use crate::store::TaskStore;
use crate::view::ListView;

use super::app::{App, Focus};
use super::form;
use super::keymap::KeyMap;

pub fn draw<S: TaskStore>(frame: &mut Frame, app: &App<S>) {
    let view = app.view();

    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // title
            Constraint::Length(3), // input
            Constraint::Length(1), // input error
            Constraint::Length(1), // tabs
            Constraint::Min(3),    // list
            Constraint::Length(1), // bulk actions
            Constraint::Length(1), // status
            Constraint::Length(1), // hints
        ])
        .split(frame.area());

    draw_title(frame, app, &view, outer[0]);
    draw_input(frame, app, &view, outer[1]);
    frame.render_widget(
        Paragraph::new(Span::styled(
            format!(" {}", app.controller.state().input_error),
            app.theme.error_style(),
        )),
        outer[2],
    );
    draw_tabs(frame, app, &view, outer[3]);
    draw_list(frame, app, &view, outer[4]);
    draw_bulk_actions(frame, app, &view, outer[5]);
    frame.render_widget(
        Paragraph::new(Span::styled(
            format!(" {}", app.controller.state().message),
            Style::default()
                .fg(app.theme.accent)
                .add_modifier(Modifier::BOLD),
        )),
        outer[6],
    );
    form::render_hints(
        frame,
        outer[7],
        KeyMap::footer_hints(),
        Style::default().fg(app.theme.accent),
        app.theme.secondary(),
    );

    if let Some(session) = app.dialog.session() {
        draw_dialog(frame, app, session);
    }
    if app.show_help {
        draw_help(frame, app);
    }
}

fn draw_title<S: TaskStore>(frame: &mut Frame, app: &App<S>, view: &ListView, area: Rect) {
    let mut spans = vec![
        Span::styled(
            " taskpad ",
            Style::default()
                .fg(app.theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(
                "  {} tasks \u{b7} {} done \u{b7} {} todo",
                view.total,
                view.done,
                view.todo()
            ),
            app.theme.secondary(),
        ),
    ];
    if app.is_busy() {
        spans.push(Span::styled(
            "  working\u{2026}",
            Style::default().fg(app.theme.dialog_border),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_input<S: TaskStore>(frame: &mut Frame, app: &App<S>, view: &ListView, area: Rect) {
    let focused = app.focus == Focus::Input && !app.dialog.is_open();
    let block = Block::default()
        .title(" New task ")
        .borders(Borders::ALL)
        .border_style(app.theme.border(focused));

    let line = if focused {
        let style = if view.add_enabled {
            Style::default()
        } else {
            Style::default().fg(app.theme.disabled)
        };
        Line::from(form::cursor_spans(
            &app.input,
            app.input_cursor,
            Style::default().fg(app.theme.accent),
        ))
        .style(style)
    } else if app.input.is_empty() {
        Line::from(Span::styled("press a to add a task", app.theme.secondary()))
    } else {
        Line::from(app.input.as_str())
    };
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_tabs<S: TaskStore>(frame: &mut Frame, app: &App<S>, view: &ListView, area: Rect) {
    let mut spans = vec![Span::raw(" ")];
    for tab in &view.tabs {
        spans.push(Span::styled(
            format!(" {} ", tab.filter.label()),
            app.theme.tab_style(tab.active),
        ));
        spans.push(Span::raw(" "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_list<S: TaskStore>(frame: &mut Frame, app: &App<S>, view: &ListView, area: Rect) {
    let focused = app.focus == Focus::List && !app.dialog.is_open();
    let block = Block::default()
        .title(" Tasks ")
        .borders(Borders::ALL)
        .border_style(app.theme.border(focused));

    if let Some(message) = view.empty_message {
        let msg = Paragraph::new(format!("  {message}"))
            .style(app.theme.secondary())
            .block(block);
        frame.render_widget(msg, area);
        return;
    }

    let items: Vec<ListItem> = view
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let is_selected = focused && i == app.selected;
            let indicator = if is_selected {
                Span::styled("\u{25b8} ", Style::default().fg(app.theme.selection))
            } else {
                Span::raw("  ")
            };
            let checkbox = if row.completed { "[x] " } else { "[ ] " };
            let mut text_style = app.theme.task_style(row.completed, row.controls_enabled);
            if is_selected {
                text_style = text_style.add_modifier(Modifier::BOLD);
            }
            ListItem::new(Line::from(vec![
                indicator,
                Span::styled(checkbox, app.theme.control_style(row.controls_enabled)),
                Span::styled(row.text.as_str(), text_style),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

fn draw_bulk_actions<S: TaskStore>(frame: &mut Frame, app: &App<S>, view: &ListView, area: Rect) {
    let line = Line::from(vec![
        Span::raw(" "),
        Span::styled(
            "[D] Delete done",
            app.theme.control_style(view.delete_done_enabled),
        ),
        Span::raw("   "),
        Span::styled(
            "[X] Delete all",
            app.theme.control_style(view.delete_all_enabled),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_dialog<S: TaskStore>(frame: &mut Frame, app: &App<S>, session: &Session) {
    let prompt = matches!(session.mode, SessionMode::Prompt { .. });
    let height = if prompt { 9 } else { 6 };
    let inner = form::render_modal(
        frame,
        &session.title,
        Style::default().fg(app.theme.dialog_border),
        60,
        height,
    );
    if inner.height == 0 {
        return;
    }

    let mut lines = vec![Line::from(session.body.as_str()), Line::from("")];
    if let SessionMode::Prompt {
        input,
        cursor,
        error,
    } = &session.mode
    {
        let mut spans = vec![Span::styled("> ", Style::default().fg(app.theme.accent))];
        spans.extend(form::cursor_spans(
            input,
            *cursor,
            Style::default().fg(app.theme.accent),
        ));
        lines.push(Line::from(spans));
        lines.push(Line::from(Span::styled(error.as_str(), app.theme.error_style())));
        lines.push(Line::from(""));
    }

    if session.pending {
        lines.push(Line::from(Span::styled(
            "Working\u{2026}",
            Style::default().fg(app.theme.dialog_border),
        )));
    } else {
        lines.push(Line::from(vec![
            Span::styled("Enter", Style::default().fg(app.theme.accent)),
            Span::raw(format!(" {}   ", session.confirm_label)),
            Span::styled("Esc", Style::default().fg(app.theme.accent)),
            Span::raw(" Cancel"),
        ]));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn draw_help<S: TaskStore>(frame: &mut Frame, app: &App<S>) {
    let groups = app.keymap.help_entries();
    let rows: u16 = groups
        .iter()
        .map(|(_, entries)| entries.len() as u16 + 2)
        .sum();
    let inner = form::render_modal(
        frame,
        "Keys",
        app.theme.border(true),
        50,
        rows + 4,
    );

    let mut lines = Vec::new();
    for (title, entries) in groups {
        lines.push(Line::from(Span::styled(
            title,
            Style::default()
                .fg(app.theme.accent)
                .add_modifier(Modifier::BOLD),
        )));
        for e in entries {
            lines.push(Line::from(vec![
                Span::styled(format!("  {:<10}", e.label), Style::default().fg(app.theme.text_primary)),
                Span::styled(e.description, app.theme.secondary()),
            ]));
        }
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        "Input: Enter adds, Esc/Tab to the list. Dialog: Enter confirms, Esc cancels.",
        app.theme.secondary(),
    )));
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
