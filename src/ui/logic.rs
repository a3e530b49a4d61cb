//! 业务逻辑处理 (Update/Dispatch)
//!
//! 调用模型操作，并显式决定静默保存还是保存后刷新

use log::{debug, info};

use super::actions::Action;
use super::prompt::{PromptAnswer, PromptPurpose, PromptRequest, Resolution};
use super::state::{App, AppMode, Commit, FieldCursor, Focus};
use crate::models::{ExerciseField, ModelError};

impl App {
    /// 核心逻辑分发，返回是否退出
    pub fn dispatch(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => return true,
            Action::SwitchFocus => self.switch_focus(),
            Action::CursorUp => self.cursor_up(),
            Action::CursorDown => self.cursor_down(),

            Action::SelectDay(idx) => self.select_day(idx),
            Action::StartAddDay => self.start_add_day(),
            Action::StartRenameDay(idx) => self.start_rename_day(idx),
            Action::DeleteDay(idx) => self.delete_day(idx),

            Action::FocusExercise(idx) => self.focus_exercise(idx),
            Action::StartAddExercise => self.start_add_exercise(),
            Action::StartRenameExercise(idx) => self.start_rename_exercise(idx),
            Action::ToggleDone(idx) => self.toggle_done(idx),
            Action::MoveExerciseUp(idx) => self.move_exercise_up(idx),
            Action::MoveExerciseDown(idx) => self.move_exercise_down(idx),
            Action::DeleteExercise(idx) => self.delete_exercise(idx),
            Action::EditField(idx, field) => self.start_edit_field(idx, field),

            Action::Submit => match &self.mode {
                AppMode::Prompting => self.resolve_prompt(Resolution::Confirm),
                AppMode::EditingField(_) => self.blur_field(),
                AppMode::Alert(_) => self.dismiss_alert(),
                AppMode::Normal => {}
            },
            Action::Cancel => match &self.mode {
                AppMode::Prompting => self.resolve_prompt(Resolution::Cancel),
                AppMode::EditingField(_) => self.blur_field(),
                AppMode::Alert(_) => self.dismiss_alert(),
                AppMode::Normal => self.message = None,
            },
            Action::NextField => self.next_field(),

            Action::Input(c) => match self.mode {
                AppMode::Prompting => self.prompts.push_char(c),
                AppMode::EditingField(cursor) => self.edit_field(cursor, |value| value.push(c)),
                _ => {}
            },
            Action::DeleteChar => match self.mode {
                AppMode::Prompting => self.prompts.pop_char(),
                AppMode::EditingField(cursor) => self.edit_field(cursor, |value| {
                    value.pop();
                }),
                _ => {}
            },
        }
        false
    }

    // ============ 导航相关 ============

    pub fn switch_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Days => Focus::Exercises,
            Focus::Exercises => Focus::Days,
        };
    }

    pub fn cursor_up(&mut self) {
        if self.exercise_cursor > 0 {
            self.exercise_cursor -= 1;
        }
    }

    pub fn cursor_down(&mut self) {
        if self.exercise_cursor + 1 < self.selected_exercise_count() {
            self.exercise_cursor += 1;
        }
    }

    pub fn focus_exercise(&mut self, idx: usize) {
        if idx < self.selected_exercise_count() {
            self.focus = Focus::Exercises;
            self.exercise_cursor = idx;
        }
    }

    // ============ 训练日相关 ============

    pub fn select_day(&mut self, idx: usize) {
        let Some(id) = self.state.days.get(idx).map(|d| d.id.clone()) else {
            return;
        };
        if self.state.selected_day_id.as_deref() != Some(id.as_str()) {
            self.exercise_cursor = 0;
        }
        self.state.select_day(&id);
        self.commit(Commit::Full);
    }

    pub fn start_add_day(&mut self) {
        let initial = format!("Day {}", self.state.days.len() + 1);
        self.request_prompt(PromptRequest::new(
            "New day name",
            initial,
            PromptPurpose::NewDay,
        ));
    }

    pub fn start_rename_day(&mut self, idx: usize) {
        if let Some(day) = self.state.days.get(idx) {
            let request = PromptRequest::new(
                "Rename day",
                day.name.clone(),
                PromptPurpose::RenameDay(day.id.clone()),
            );
            self.request_prompt(request);
        }
    }

    pub fn delete_day(&mut self, idx: usize) {
        let Some(id) = self.state.days.get(idx).map(|d| d.id.clone()) else {
            return;
        };
        match self.state.delete_day(&id) {
            Ok(true) => {
                info!("deleted day {id}");
                self.exercise_cursor = 0;
                self.commit(Commit::Full);
            }
            Ok(false) => {}
            Err(e @ ModelError::LastDay) => {
                self.mode = AppMode::Alert(e.to_string());
            }
        }
    }

    // ============ 动作相关 ============

    pub fn start_add_exercise(&mut self) {
        let Some(day) = self.state.selected_day() else {
            return;
        };
        let request = PromptRequest::new(
            "Exercise name",
            "Exercise",
            PromptPurpose::NewExercise {
                day_id: day.id.clone(),
            },
        );
        self.request_prompt(request);
    }

    pub fn start_rename_exercise(&mut self, idx: usize) {
        let Some(day) = self.state.selected_day() else {
            return;
        };
        if let Some(ex) = day.exercises.get(idx) {
            let request = PromptRequest::new(
                "Rename exercise",
                ex.name.clone(),
                PromptPurpose::RenameExercise {
                    day_id: day.id.clone(),
                    exercise_id: ex.id.clone(),
                },
            );
            self.request_prompt(request);
        }
    }

    pub fn toggle_done(&mut self, idx: usize) {
        let changed = self
            .state
            .selected_day_mut()
            .is_some_and(|day| day.toggle_exercise_done(idx));
        if changed {
            self.exercise_cursor = idx;
            self.commit(Commit::Full);
        }
    }

    pub fn move_exercise_up(&mut self, idx: usize) {
        let moved = self
            .state
            .selected_day_mut()
            .is_some_and(|day| day.move_exercise_up(idx));
        if moved {
            self.exercise_cursor = idx - 1;
            self.commit(Commit::Full);
        }
    }

    pub fn move_exercise_down(&mut self, idx: usize) {
        let moved = self
            .state
            .selected_day_mut()
            .is_some_and(|day| day.move_exercise_down(idx));
        if moved {
            self.exercise_cursor = idx + 1;
            self.commit(Commit::Full);
        }
    }

    pub fn delete_exercise(&mut self, idx: usize) {
        let removed = self
            .state
            .selected_day_mut()
            .and_then(|day| day.delete_exercise(idx));
        if let Some(ex) = removed {
            debug!("deleted exercise {}", ex.id);
            self.commit(Commit::Full);
        }
    }

    // ============ 字段编辑相关 ============

    pub fn start_edit_field(&mut self, idx: usize, field: ExerciseField) {
        if idx < self.selected_exercise_count() {
            self.focus = Focus::Exercises;
            self.exercise_cursor = idx;
            self.mode = AppMode::EditingField(FieldCursor {
                exercise: idx,
                field,
            });
        }
    }

    /// 每次按键都静默保存，不刷新视图
    fn edit_field(&mut self, cursor: FieldCursor, edit: impl FnOnce(&mut String)) {
        let Some(day) = self.state.selected_day_mut() else {
            return;
        };
        let Some(ex) = day.exercises.get(cursor.exercise) else {
            return;
        };
        let mut value = ex.field(cursor.field).to_string();
        edit(&mut value);
        day.set_exercise_field(cursor.exercise, cursor.field, value);
        self.commit(Commit::Silent);
    }

    pub fn next_field(&mut self) {
        let AppMode::EditingField(cursor) = self.mode else {
            return;
        };
        match cursor.field.next() {
            Some(field) => self.mode = AppMode::EditingField(FieldCursor { field, ..cursor }),
            None => self.blur_field(),
        }
    }

    /// 失去焦点：保存并刷新
    pub fn blur_field(&mut self) {
        self.mode = AppMode::Normal;
        self.commit(Commit::Full);
    }

    // ============ 弹窗相关 ============

    fn request_prompt(&mut self, request: PromptRequest) {
        self.prompts.request(request);
        self.mode = AppMode::Prompting;
    }

    pub fn resolve_prompt(&mut self, resolution: Resolution) {
        let resolved = self.prompts.resolve(resolution);
        if !self.prompts.is_open() {
            self.mode = AppMode::Normal;
        }
        let Some((purpose, PromptAnswer::Text(name))) = resolved else {
            return;
        };
        self.complete_prompt(purpose, name);
    }

    fn complete_prompt(&mut self, purpose: PromptPurpose, name: String) {
        let changed = match purpose {
            PromptPurpose::NewDay => {
                self.state.add_day(name);
                self.exercise_cursor = 0;
                self.focus = Focus::Days;
                true
            }
            PromptPurpose::RenameDay(day_id) => self.state.rename_day(&day_id, &name),
            PromptPurpose::NewExercise { day_id } => match self.state.day_mut(&day_id) {
                Some(day) => {
                    day.add_exercise(name);
                    let last = day.exercises.len() - 1;
                    if self.state.selected_day_id.as_deref() == Some(day_id.as_str()) {
                        self.exercise_cursor = last;
                    }
                    true
                }
                None => false,
            },
            PromptPurpose::RenameExercise {
                day_id,
                exercise_id,
            } => self.state.day_mut(&day_id).is_some_and(|day| {
                day.exercise_index(&exercise_id)
                    .is_some_and(|idx| day.rename_exercise(idx, &name))
            }),
        };
        if changed {
            self.commit(Commit::Full);
        }
    }

    pub fn dismiss_alert(&mut self) {
        self.mode = AppMode::Normal;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::AppState;
    use crate::storage::Store;

    fn app() -> App {
        App::new(AppState::seed(), Store::in_memory(), Config::default())
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.dispatch(Action::Input(c));
        }
    }

    fn clear_prompt(app: &mut App) {
        let len = app.prompts.active().map_or(0, |p| p.buffer.chars().count());
        for _ in 0..len {
            app.dispatch(Action::DeleteChar);
        }
    }

    fn add_exercise(app: &mut App, name: &str) {
        app.dispatch(Action::StartAddExercise);
        clear_prompt(app);
        type_text(app, name);
        app.dispatch(Action::Submit);
    }

    #[test]
    fn test_squat_scenario() {
        let mut app = app();
        add_exercise(&mut app, "Squat");
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.view.cards[0].progress.to_string(), "0/1");
        assert_eq!(app.view.rows[0].name, "Squat");

        app.dispatch(Action::ToggleDone(0));
        assert_eq!(app.view.cards[0].progress.to_string(), "1/1");
        assert_eq!(app.view.header.progress, "1/1 completed");
        assert!(app.store().load().days[0].exercises[0].done);
    }

    #[test]
    fn test_add_day_prompt_defaults() {
        let mut app = app();
        app.dispatch(Action::StartAddDay);
        assert_eq!(app.mode, AppMode::Prompting);
        let prompt = app.prompts.active().unwrap();
        assert_eq!(prompt.title, "New day name");
        assert_eq!(prompt.buffer, "Day 4");

        app.dispatch(Action::Submit);
        assert_eq!(app.state.days.len(), 4);
        assert_eq!(app.view.selected, Some(3));
        assert_eq!(app.store().load().days[3].name, "Day 4");
    }

    #[test]
    fn test_cancelled_prompt_changes_nothing() {
        let mut app = app();
        let before = app.state.clone();
        app.dispatch(Action::StartRenameDay(0));
        type_text(&mut app, "ignored");
        app.dispatch(Action::Cancel);
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.state, before);

        app.dispatch(Action::StartAddExercise);
        clear_prompt(&mut app);
        type_text(&mut app, "   ");
        app.dispatch(Action::Submit);
        assert_eq!(app.state, before);
    }

    #[test]
    fn test_rename_day_and_exercise() {
        let mut app = app();
        app.dispatch(Action::StartRenameDay(1));
        clear_prompt(&mut app);
        type_text(&mut app, " Pull ");
        app.dispatch(Action::Submit);
        assert_eq!(app.state.days[1].name, "Pull");

        add_exercise(&mut app, "Row");
        app.dispatch(Action::StartRenameExercise(0));
        type_text(&mut app, "s");
        app.dispatch(Action::Submit);
        assert_eq!(app.state.days[0].exercises[0].name, "Rows");
        assert_eq!(app.view.rows[0].name, "Rows");
    }

    #[test]
    fn test_delete_last_day_alerts() {
        let mut app = app();
        app.dispatch(Action::DeleteDay(2));
        app.dispatch(Action::DeleteDay(1));
        assert_eq!(app.state.days.len(), 1);
        let before = app.state.clone();

        app.dispatch(Action::DeleteDay(0));
        assert_eq!(app.mode, AppMode::Alert("You need at least one day.".to_string()));
        assert_eq!(app.state, before);
        assert_eq!(app.store().load().days.len(), 1);

        app.dispatch(Action::Submit);
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn test_field_edit_is_silent_until_blur() {
        let mut app = app();
        add_exercise(&mut app, "Squat");
        app.dispatch(Action::EditField(0, ExerciseField::Weight));
        type_text(&mut app, "100");

        assert_eq!(app.store().load().days[0].exercises[0].weight, "100");
        assert_eq!(app.view.rows[0].fields[0], "");

        app.dispatch(Action::NextField);
        assert_eq!(
            app.mode,
            AppMode::EditingField(FieldCursor {
                exercise: 0,
                field: ExerciseField::Sets
            })
        );
        app.dispatch(Action::Submit);
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.view.rows[0].fields[0], "100");

        let reloaded = app.store().load();
        assert_eq!(reloaded.days[0].exercises[0].weight, "100");
    }

    #[test]
    fn test_backspace_in_field() {
        let mut app = app();
        add_exercise(&mut app, "Squat");
        app.dispatch(Action::EditField(0, ExerciseField::Note));
        type_text(&mut app, "slo");
        app.dispatch(Action::DeleteChar);
        app.dispatch(Action::Cancel);
        assert_eq!(app.state.days[0].exercises[0].note, "sl");
    }

    #[test]
    fn test_reorder_moves_cursor() {
        let mut app = app();
        for name in ["a", "b", "c"] {
            add_exercise(&mut app, name);
        }
        assert_eq!(app.exercise_cursor, 2);
        app.dispatch(Action::MoveExerciseUp(2));
        assert_eq!(app.exercise_cursor, 1);
        app.dispatch(Action::MoveExerciseUp(0));
        app.dispatch(Action::MoveExerciseDown(2));
        let names: Vec<_> = app.view.rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["a", "c", "b"]);

        app.dispatch(Action::DeleteExercise(0));
        let names: Vec<_> = app.view.rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["c", "b"]);
    }

    #[test]
    fn test_queued_prompts_run_in_order() {
        let mut app = app();
        app.dispatch(Action::StartAddDay);
        app.dispatch(Action::StartRenameDay(0));
        assert_eq!(app.prompts.pending_len(), 1);

        app.dispatch(Action::Submit);
        assert_eq!(app.mode, AppMode::Prompting);
        assert_eq!(app.state.days.len(), 4);

        clear_prompt(&mut app);
        type_text(&mut app, "Legs");
        app.dispatch(Action::Submit);
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.state.days[0].name, "Legs");
    }

    #[test]
    fn test_select_day_persists_selection() {
        let mut app = app();
        app.dispatch(Action::SelectDay(2));
        let id = app.state.days[2].id.clone();
        assert_eq!(app.store().load().selected_day_id, Some(id));
        app.dispatch(Action::SelectDay(9));
        assert_eq!(app.view.selected, Some(2));
    }
}
