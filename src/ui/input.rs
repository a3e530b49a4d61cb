//! 事件映射 (Input -> Action)
//!
//! 将按键与鼠标事件转换为 Action

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, MouseButton, MouseEvent, MouseEventKind};

use super::actions::Action;
use super::state::{App, AppMode, Focus, Hit, Tool};
use crate::models::ExerciseField;

/// 根据当前模式和按键获取对应的 Action
pub fn get_action(app: &App, key: KeyCode) -> Option<Action> {
    match &app.mode {
        AppMode::Normal => normal_action(app, key),
        AppMode::Prompting => match key {
            KeyCode::Esc => Some(Action::Cancel),
            KeyCode::Enter => Some(Action::Submit),
            KeyCode::Backspace => Some(Action::DeleteChar),
            KeyCode::Char(c) => Some(Action::Input(c)),
            _ => None,
        },
        AppMode::EditingField(_) => match key {
            KeyCode::Esc => Some(Action::Cancel),
            KeyCode::Enter => Some(Action::Submit),
            KeyCode::Tab => Some(Action::NextField),
            KeyCode::Backspace => Some(Action::DeleteChar),
            KeyCode::Char(c) => Some(Action::Input(c)),
            _ => None,
        },
        AppMode::Alert(_) => match key {
            KeyCode::Enter | KeyCode::Char(' ') => Some(Action::Submit),
            KeyCode::Esc => Some(Action::Cancel),
            _ => None,
        },
    }
}

fn normal_action(app: &App, key: KeyCode) -> Option<Action> {
    let selected = app.state.selected_index();
    match key {
        KeyCode::Char('q') => return Some(Action::Quit),
        KeyCode::Tab => return Some(Action::SwitchFocus),
        KeyCode::Char('N') => return Some(Action::StartAddDay),
        KeyCode::Char('a') => return Some(Action::StartAddExercise),
        KeyCode::Char('h') | KeyCode::Left => {
            return selected
                .filter(|&i| i > 0)
                .map(|i| Action::SelectDay(i - 1));
        }
        KeyCode::Char('l') | KeyCode::Right => {
            return selected
                .map(|i| i + 1)
                .filter(|&i| i < app.state.days.len())
                .map(Action::SelectDay);
        }
        _ => {}
    }

    match app.focus {
        Focus::Days => {
            let idx = selected?;
            match key {
                KeyCode::Char('r') => Some(Action::StartRenameDay(idx)),
                KeyCode::Char('d') | KeyCode::Delete => Some(Action::DeleteDay(idx)),
                KeyCode::Char('j') | KeyCode::Down | KeyCode::Enter => Some(Action::SwitchFocus),
                _ => None,
            }
        }
        Focus::Exercises => {
            match key {
                KeyCode::Char('j') | KeyCode::Down => return Some(Action::CursorDown),
                KeyCode::Char('k') | KeyCode::Up => return Some(Action::CursorUp),
                _ => {}
            }
            let idx = app.exercise_cursor;
            if idx >= app.selected_exercise_count() {
                return None;
            }
            match key {
                KeyCode::Char(' ') | KeyCode::Char('x') => Some(Action::ToggleDone(idx)),
                KeyCode::Char('r') => Some(Action::StartRenameExercise(idx)),
                KeyCode::Char('K') => Some(Action::MoveExerciseUp(idx)),
                KeyCode::Char('J') => Some(Action::MoveExerciseDown(idx)),
                KeyCode::Char('d') | KeyCode::Delete => Some(Action::DeleteExercise(idx)),
                KeyCode::Char('e') | KeyCode::Enter => {
                    Some(Action::EditField(idx, ExerciseField::Weight))
                }
                _ => None,
            }
        }
    }
}

/// 处理按键事件，返回是否退出
pub fn handle_key_event(app: &mut App, key: KeyCode) -> bool {
    match get_action(app, key) {
        Some(action) => app.dispatch(action),
        None => false,
    }
}

/// 鼠标点击映射为 Action；弹窗打开时点击弹窗外即取消
pub fn mouse_actions(app: &mut App, mouse: MouseEvent, now: Instant) -> Vec<Action> {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return Vec::new();
    }
    let hit = app.hits.hit_at(mouse.column, mouse.row);

    match &app.mode {
        AppMode::Prompting => {
            return match hit {
                Some(Hit::PromptOk) => vec![Action::Submit],
                Some(Hit::PromptDialog) => Vec::new(),
                _ => vec![Action::Cancel],
            };
        }
        AppMode::Alert(_) => return vec![Action::Submit],
        _ => {}
    }

    let mut actions = Vec::new();
    // 点击其他位置即失去焦点
    if let AppMode::EditingField(cursor) = app.mode {
        if hit == Some(Hit::ExerciseField(cursor.exercise, cursor.field)) {
            return actions;
        }
        actions.push(Action::Submit);
    }

    let Some(hit) = hit else {
        app.last_click = None;
        return actions;
    };

    let threshold = Duration::from_millis(app.config.double_click_ms);
    let double = app
        .last_click
        .is_some_and(|(last, at)| last == hit && now.duration_since(at) <= threshold);
    app.last_click = if double { None } else { Some((hit, now)) };

    let action = match hit {
        Hit::DayCard(i) if double => Action::StartRenameDay(i),
        Hit::DayCard(i) => Action::SelectDay(i),
        Hit::DayClose(i) => Action::DeleteDay(i),
        Hit::Exercise(i) => Action::FocusExercise(i),
        Hit::ExerciseCheck(i) => Action::ToggleDone(i),
        Hit::ExerciseTool(i, Tool::Rename) => Action::StartRenameExercise(i),
        Hit::ExerciseTool(i, Tool::Up) => Action::MoveExerciseUp(i),
        Hit::ExerciseTool(i, Tool::Down) => Action::MoveExerciseDown(i),
        Hit::ExerciseTool(i, Tool::Delete) => Action::DeleteExercise(i),
        Hit::ExerciseField(i, field) => Action::EditField(i, field),
        Hit::AddDay => Action::StartAddDay,
        Hit::AddExercise => Action::StartAddExercise,
        Hit::PromptDialog | Hit::PromptOk | Hit::PromptCancel => return actions,
    };
    actions.push(action);
    actions
}

/// 处理鼠标事件，返回是否退出
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent, now: Instant) -> bool {
    mouse_actions(app, mouse, now)
        .into_iter()
        .any(|action| app.dispatch(action))
}
