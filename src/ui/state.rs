//! App 状态定义 (Model)
//!
//! 包含应用状态容器、视图模型与持久化提交

use std::time::Instant;

use log::error;
use ratatui::layout::{Position, Rect};

use super::prompt::PromptQueue;
use super::text::{escape_field, escape_text};
use crate::config::Config;
use crate::models::{AppState, Day, ExerciseField, Progress};
use crate::storage::{StorageError, Store};

/// 应用状态
pub struct App {
    pub state: AppState,
    store: Store,
    pub config: Config,
    pub mode: AppMode,
    pub focus: Focus,
    pub exercise_cursor: usize,
    /// 训练日卡片与动作列表的滚动偏移，跨帧保留
    pub day_offset: usize,
    pub exercise_offset: usize,
    pub prompts: PromptQueue,
    pub message: Option<String>,
    pub view: ViewModel,
    pub hits: HitMap,
    pub last_click: Option<(Hit, Instant)>,
    pub unsaved: bool,
}

/// 应用模式
#[derive(Debug, Clone, PartialEq)]
pub enum AppMode {
    Normal,
    Prompting,
    EditingField(FieldCursor),
    Alert(String),
}

/// 正在编辑的字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldCursor {
    pub exercise: usize,
    pub field: ExerciseField,
}

/// 焦点所在的面板
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Days,
    Exercises,
}

/// 提交方式：静默只保存，完整则保存并刷新视图
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    Silent,
    Full,
}

/// 由状态派生的视图数据，只在完整刷新时重建
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewModel {
    pub cards: Vec<DayCard>,
    pub selected: Option<usize>,
    pub header: Header,
    pub rows: Vec<ExerciseRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayCard {
    pub name: String,
    pub progress: Progress,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Header {
    pub kicker: String,
    pub title: String,
    pub progress: String,
    pub can_add_exercise: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseRow {
    pub name: String,
    pub done: bool,
    pub fields: [String; 4],
}

impl ViewModel {
    pub fn build(state: &AppState) -> Self {
        let cards = state
            .days
            .iter()
            .map(|day| DayCard {
                name: escape_text(&day.name).into_owned(),
                progress: day.progress(),
            })
            .collect();

        let Some(day) = state.selected_day() else {
            return Self {
                cards,
                selected: None,
                header: Header {
                    kicker: "Day".to_string(),
                    title: "Select a day".to_string(),
                    progress: "0/0 completed".to_string(),
                    can_add_exercise: false,
                },
                rows: Vec::new(),
            };
        };

        Self {
            cards,
            selected: state.selected_index(),
            header: Header {
                kicker: escape_text(&day.name).to_uppercase(),
                title: " ".to_string(),
                progress: format!("{} completed", day.progress()),
                can_add_exercise: true,
            },
            rows: exercise_rows(day),
        }
    }
}

fn exercise_rows(day: &Day) -> Vec<ExerciseRow> {
    day.exercises
        .iter()
        .map(|ex| ExerciseRow {
            name: escape_text(&ex.name).into_owned(),
            done: ex.done,
            fields: ExerciseField::ALL.map(|f| escape_field(ex.field(f)).into_owned()),
        })
        .collect()
}

/// 可点击区域
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    DayCard(usize),
    DayClose(usize),
    Exercise(usize),
    ExerciseCheck(usize),
    ExerciseTool(usize, Tool),
    ExerciseField(usize, ExerciseField),
    AddDay,
    AddExercise,
    PromptDialog,
    PromptOk,
    PromptCancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Rename,
    Up,
    Down,
    Delete,
}

/// 渲染时记录的点击区域，后记录的优先
#[derive(Debug, Clone, Default)]
pub struct HitMap {
    areas: Vec<(Rect, Hit)>,
}

impl HitMap {
    pub fn clear(&mut self) {
        self.areas.clear();
    }

    pub fn push(&mut self, area: Rect, hit: Hit) {
        if area.width > 0 && area.height > 0 {
            self.areas.push((area, hit));
        }
    }

    pub fn hit_at(&self, column: u16, row: u16) -> Option<Hit> {
        let pos = Position::new(column, row);
        self.areas
            .iter()
            .rev()
            .find(|(area, _)| area.contains(pos))
            .map(|(_, hit)| *hit)
    }

    #[cfg(test)]
    pub fn area_of(&self, hit: Hit) -> Option<Rect> {
        self.areas
            .iter()
            .rev()
            .find(|(_, h)| *h == hit)
            .map(|(area, _)| *area)
    }
}

impl App {
    /// 创建新的应用实例
    pub fn new(state: AppState, store: Store, config: Config) -> Self {
        let mut app = Self {
            state,
            store,
            config,
            mode: AppMode::Normal,
            focus: Focus::Days,
            exercise_cursor: 0,
            day_offset: 0,
            exercise_offset: 0,
            prompts: PromptQueue::new(),
            message: None,
            view: ViewModel::default(),
            hits: HitMap::default(),
            last_click: None,
            unsaved: false,
        };
        app.refresh();
        app
    }

    /// 完整刷新：修正选中项并重建视图数据
    pub fn refresh(&mut self) {
        self.state.normalize_selection();
        let len = self
            .state
            .selected_day()
            .map_or(0, |day| day.exercises.len());
        if self.exercise_cursor >= len {
            self.exercise_cursor = len.saturating_sub(1);
        }
        self.view = ViewModel::build(&self.state);
    }

    /// 保存状态；Full 额外刷新视图
    pub fn commit(&mut self, commit: Commit) {
        if commit == Commit::Full {
            self.state.normalize_selection();
        }
        self.persist();
        if commit == Commit::Full {
            self.refresh();
        }
    }

    fn persist(&mut self) {
        match self.store.save(&self.state) {
            Ok(()) => self.unsaved = false,
            Err(e) => {
                error!("failed to save state: {e}");
                self.unsaved = true;
                self.message = Some(format!("Save failed: {e}"));
            }
        }
    }

    /// 退出前补存失败的写入
    pub fn flush(&mut self) -> Result<(), StorageError> {
        if self.unsaved {
            self.store.save(&self.state)?;
            self.unsaved = false;
        }
        Ok(())
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn selected_exercise_count(&self) -> usize {
        self.state
            .selected_day()
            .map_or(0, |day| day.exercises.len())
    }

    pub fn editing(&self) -> Option<FieldCursor> {
        match self.mode {
            AppMode::EditingField(cursor) => Some(cursor),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(AppState::seed(), Store::in_memory(), Config::default())
    }

    #[test]
    fn test_new_normalizes_selection_without_saving() {
        let app = app();
        assert_eq!(app.state.selected_index(), Some(0));
        assert_eq!(app.view.selected, Some(0));
        assert_eq!(app.store().load().selected_day_id, None);
    }

    #[test]
    fn test_refresh_idempotent() {
        let mut app = app();
        app.state.days[1].add_exercise("Squat".to_string());
        app.state.selected_day_id = Some("stale".to_string());
        app.refresh();
        let first = app.view.clone();
        let selection = app.state.selected_day_id.clone();
        app.refresh();
        assert_eq!(app.view, first);
        assert_eq!(app.state.selected_day_id, selection);
    }

    #[test]
    fn test_silent_commit_skips_refresh() {
        let mut app = app();
        app.state.days[0].add_exercise("Squat".to_string());
        app.commit(Commit::Silent);
        assert!(app.view.rows.is_empty());
        assert_eq!(app.store().load().days[0].exercises.len(), 1);

        app.commit(Commit::Full);
        assert_eq!(app.view.rows.len(), 1);
        assert_eq!(app.view.cards[0].progress.to_string(), "0/1");
    }

    #[test]
    fn test_header_without_selection() {
        let mut state = AppState::seed();
        state.days.clear();
        let view = ViewModel::build(&state);
        assert_eq!(view.header.kicker, "Day");
        assert_eq!(view.header.title, "Select a day");
        assert_eq!(view.header.progress, "0/0 completed");
        assert!(!view.header.can_add_exercise);
    }

    #[test]
    fn test_header_with_selection() {
        let mut state = AppState::seed();
        state.normalize_selection();
        state.days[0].add_exercise("Squat".to_string());
        state.days[0].toggle_exercise_done(0);
        let view = ViewModel::build(&state);
        assert_eq!(view.header.kicker, "DAY 1");
        assert_eq!(view.header.progress, "1/1 completed");
        assert!(view.rows[0].done);
    }

    #[test]
    fn test_hit_map_prefers_latest() {
        let mut hits = HitMap::default();
        hits.push(Rect::new(0, 0, 10, 5), Hit::DayCard(0));
        hits.push(Rect::new(8, 0, 2, 1), Hit::DayClose(0));
        hits.push(Rect::new(20, 0, 0, 5), Hit::DayCard(1));
        assert_eq!(hits.hit_at(9, 0), Some(Hit::DayClose(0)));
        assert_eq!(hits.hit_at(2, 3), Some(Hit::DayCard(0)));
        assert_eq!(hits.hit_at(20, 1), None);
        assert_eq!(hits.area_of(Hit::DayClose(0)), Some(Rect::new(8, 0, 2, 1)));
    }
}
