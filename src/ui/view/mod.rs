//! 视图层模块
//!
//! 每帧根据视图模型完整重绘，并记录可点击区域

pub mod components;
pub mod layouts;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::state::{App, AppMode, Focus, Hit, Tool};
use super::text::escape_field;
use crate::models::ExerciseField;
use components::{
    button_width, render_button, render_dialog_framework, render_input_widget, tail_window,
};
use layouts::{centered_fixed, scroll_into_view};

const EXERCISE_CARD_HEIGHT: u16 = 4;
const TOOLS: [(Tool, &str); 4] = [
    (Tool::Rename, " ✎ "),
    (Tool::Up, " ↑ "),
    (Tool::Down, " ↓ "),
    (Tool::Delete, " ✕ "),
];
const TOOLS_WIDTH: u16 = 12;

/// 渲染 UI
pub fn render(frame: &mut Frame, app: &mut App) {
    app.hits.clear();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // 标题
            Constraint::Length(5), // 训练日
            Constraint::Length(3), // 当前训练日
            Constraint::Min(6),    // 动作列表
            Constraint::Length(3), // 帮助
        ])
        .split(frame.area());

    render_title(frame, app, chunks[0]);
    render_days(frame, app, chunks[1]);
    render_header(frame, app, chunks[2]);
    render_exercises(frame, app, chunks[3]);
    render_help(frame, app, chunks[4]);

    // 渲染弹窗
    if app.mode == AppMode::Prompting {
        render_prompt(frame, app);
    } else if let AppMode::Alert(message) = &app.mode {
        render_alert(frame, message);
    }
}

fn render_title(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);
    let title = Paragraph::new(Line::from(vec![
        Span::styled(
            "NightForm",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("  workout planner", Style::default().fg(Color::Gray)),
    ]))
    .block(block);
    frame.render_widget(title, area);

    let label = "+ Add day";
    let width = button_width(label);
    if inner.height > 0 && inner.width > width {
        let button = render_button(
            frame,
            inner.right() - width,
            inner.y,
            label,
            Style::default().fg(Color::Green),
        );
        app.hits.push(button, Hit::AddDay);
    }
}

fn render_days(frame: &mut Frame, app: &mut App, area: Rect) {
    let width = app.config.card_width.max(8);
    let visible = (area.width / width) as usize;
    app.day_offset = scroll_into_view(
        app.day_offset,
        app.view.selected.unwrap_or(0),
        visible,
        app.view.cards.len(),
    );
    let offset = app.day_offset;
    let days_focused = app.focus == Focus::Days;

    for (slot, (i, card)) in app
        .view
        .cards
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .enumerate()
    {
        let rect = Rect::new(area.x + slot as u16 * width, area.y, width, area.height);
        let active = app.view.selected == Some(i);
        let border = match (active, days_focused) {
            (true, true) => Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            (true, false) => Style::default().fg(Color::Cyan),
            _ => Style::default().fg(Color::DarkGray),
        };
        let block = Block::default().borders(Borders::ALL).border_style(border);
        let inner = block.inner(rect);
        frame.render_widget(block, rect);
        app.hits.push(rect, Hit::DayCard(i));
        if inner.height < 3 {
            continue;
        }

        // 拖动手柄尚未实现，仅作提示
        frame.render_widget(
            Paragraph::new("⠿").style(Style::default().fg(Color::DarkGray)),
            Rect { height: 1, ..inner },
        );
        let close = Rect::new(inner.right().saturating_sub(3), inner.y, inner.width.min(3), 1);
        frame.render_widget(
            Paragraph::new(" × ").style(Style::default().fg(Color::Red)),
            close,
        );
        app.hits.push(close, Hit::DayClose(i));

        let name_style = if active {
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        frame.render_widget(
            Paragraph::new(card.name.as_str()).style(name_style),
            Rect::new(inner.x, inner.y + 1, inner.width, 1),
        );
        frame.render_widget(
            Paragraph::new(format!("{} done", card.progress))
                .style(Style::default().fg(Color::DarkGray)),
            Rect::new(inner.x, inner.y + 2, inner.width, 1),
        );
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let header = &app.view.header;
    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let title = Paragraph::new(Line::from(vec![
        Span::styled(
            header.kicker.as_str(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(header.title.trim(), Style::default().fg(Color::White)),
    ]));
    frame.render_widget(title, inner);

    let progress = Paragraph::new(header.progress.as_str())
        .style(Style::default().fg(Color::Green))
        .alignment(Alignment::Right);
    frame.render_widget(progress, inner);
}

fn render_exercises(frame: &mut Frame, app: &mut App, area: Rect) {
    let focused = app.focus == Focus::Exercises;
    let border = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let block = Block::default()
        .title("Exercises")
        .borders(Borders::ALL)
        .border_style(border);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 {
        return;
    }

    let list_area = Rect {
        height: inner.height - 1,
        ..inner
    };
    let can_add = app.view.header.can_add_exercise;
    let add_style = if can_add {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let button = render_button(frame, inner.x, inner.bottom() - 1, "+ Add exercise", add_style);
    if can_add {
        app.hits.push(button, Hit::AddExercise);
    }

    if app.view.rows.is_empty() {
        if can_add {
            let empty = Paragraph::new("No exercises yet. Add one below.")
                .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(empty, list_area);
        }
        return;
    }

    let visible = (list_area.height / EXERCISE_CARD_HEIGHT) as usize;
    app.exercise_offset = scroll_into_view(
        app.exercise_offset,
        app.exercise_cursor,
        visible,
        app.view.rows.len(),
    );
    let offset = app.exercise_offset;
    let end = app.view.rows.len().min(offset + visible);
    for (slot, idx) in (offset..end).enumerate() {
        let rect = Rect::new(
            list_area.x,
            list_area.y + slot as u16 * EXERCISE_CARD_HEIGHT,
            list_area.width,
            EXERCISE_CARD_HEIGHT,
        );
        render_exercise_card(frame, app, idx, rect);
    }
}

fn render_exercise_card(frame: &mut Frame, app: &mut App, idx: usize, rect: Rect) {
    let row = &app.view.rows[idx];
    let selected = app.focus == Focus::Exercises && app.exercise_cursor == idx;
    let border = if selected {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default().borders(Borders::ALL).border_style(border);
    let inner = block.inner(rect);
    frame.render_widget(block, rect);
    app.hits.push(rect, Hit::Exercise(idx));
    if inner.height < 2 || inner.width < 4 {
        return;
    }

    let top = Rect { height: 1, ..inner };
    let check = Rect::new(top.x, top.y, 3, 1);
    let (check_text, check_style) = if row.done {
        ("[✓]", Style::default().fg(Color::Green))
    } else {
        ("[ ]", Style::default().fg(Color::Gray))
    };
    frame.render_widget(Paragraph::new(check_text).style(check_style), check);
    app.hits.push(check, Hit::ExerciseCheck(idx));

    let name_style = if row.done {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    };
    let name_width = top.width.saturating_sub(4 + TOOLS_WIDTH + 1);
    frame.render_widget(
        Paragraph::new(row.name.as_str()).style(name_style),
        Rect::new(top.x + 4, top.y, name_width, 1),
    );

    let tools_x = top.right().saturating_sub(TOOLS_WIDTH);
    for (n, (tool, label)) in TOOLS.iter().enumerate() {
        let area = Rect::new(tools_x + n as u16 * 3, top.y, 3, 1).intersection(top);
        let style = if *tool == Tool::Delete {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::Cyan)
        };
        frame.render_widget(Paragraph::new(*label).style(style), area);
        app.hits.push(area, Hit::ExerciseTool(idx, *tool));
    }

    let fields_row = Rect::new(inner.x, inner.y + 1, inner.width, 1);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(fields_row);
    let editing = app.editing().filter(|cursor| cursor.exercise == idx);

    for (n, field) in ExerciseField::ALL.into_iter().enumerate() {
        let is_editing = editing.is_some_and(|cursor| cursor.field == field);
        let area = columns[n];
        let label = format!("{}: ", field.label());
        let label_width = label.chars().count();
        // 编辑中的字段直接读取最新值
        let value = if is_editing {
            let live = app
                .state
                .selected_day()
                .and_then(|day| day.exercises.get(idx))
                .map(|ex| escape_field(ex.field(field)).into_owned())
                .unwrap_or_default();
            tail_window(&live, (area.width as usize).saturating_sub(label_width + 1))
        } else {
            app.view.rows[idx].fields[n].clone()
        };

        let value_span = if is_editing {
            Span::styled(
                value.clone(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::UNDERLINED),
            )
        } else if value.is_empty() {
            Span::styled(field.placeholder(), Style::default().fg(Color::DarkGray))
        } else {
            Span::styled(value.clone(), Style::default().fg(Color::White))
        };
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(label.clone(), Style::default().fg(Color::Gray)),
                value_span,
            ])),
            area,
        );
        app.hits.push(area, Hit::ExerciseField(idx, field));

        if is_editing && area.width > 0 {
            let offset = u16::try_from(label_width + value.chars().count()).unwrap_or(u16::MAX);
            let x = area.x.saturating_add(offset).min(area.right() - 1);
            frame.set_cursor_position((x, area.y));
        }
    }
}

fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = match &app.mode {
        AppMode::Normal => match app.focus {
            Focus::Days => {
                "[←/→] select  [N] new day  [r] rename  [d] delete  [a] add exercise  [Tab] exercises  [q] quit"
            }
            Focus::Exercises => {
                "[j/k] move  [space] done  [e] edit  [r] rename  [J/K] reorder  [d] delete  [a] add  [Tab] days  [q] quit"
            }
        },
        AppMode::Prompting => "[Enter] OK  [Esc] cancel",
        AppMode::EditingField(_) => "type to edit  [Tab] next field  [Enter/Esc] done",
        AppMode::Alert(_) => "[Enter] dismiss",
    };

    let message = app.message.as_deref().unwrap_or("");
    let text = if message.is_empty() {
        help_text.to_string()
    } else {
        format!("{}  |  {}", help_text, message)
    };

    let help = Paragraph::new(text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(help, area);
}

fn render_prompt(frame: &mut Frame, app: &mut App) {
    let Some(prompt) = app.prompts.active() else {
        return;
    };
    let area = centered_fixed(50, 7, frame.area());
    let inner = render_dialog_framework(frame, area, &prompt.title, Color::Cyan);
    app.hits.push(area, Hit::PromptDialog);
    if inner.height < 3 {
        return;
    }

    let input = Rect { height: 3, ..inner };
    let cursor = render_input_widget(frame, input, "", &escape_field(&prompt.buffer));
    frame.set_cursor_position(cursor);

    if inner.height < 4 {
        return;
    }
    let y = inner.bottom() - 1;
    let ok_x = inner.right().saturating_sub(button_width("OK"));
    let cancel_x = ok_x.saturating_sub(button_width("Cancel") + 1);
    let cancel = render_button(frame, cancel_x, y, "Cancel", Style::default().fg(Color::Gray));
    app.hits.push(cancel, Hit::PromptCancel);
    let ok = render_button(
        frame,
        ok_x,
        y,
        "OK",
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
    );
    app.hits.push(ok, Hit::PromptOk);
}

fn render_alert(frame: &mut Frame, message: &str) {
    let area = centered_fixed(44, 6, frame.area());
    let inner = render_dialog_framework(frame, area, "⚠️ Warning", Color::Red);
    let alert = Paragraph::new(format!("{}\n\n[Enter] OK", message)).wrap(Wrap { trim: true });
    frame.render_widget(alert, inner);
}
