use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// 生成唯一 ID：随机 64 位十六进制 + 毫秒时间戳十六进制
pub fn uid() -> String {
    let random = Uuid::new_v4().as_u128() as u64;
    format!("{:x}{:x}", random, Utc::now().timestamp_millis())
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("You need at least one day.")]
    LastDay,
}

/// 训练动作
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    #[serde(default = "uid")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub weight: String,
    #[serde(default)]
    pub sets: String,
    #[serde(default)]
    pub reps: String,
    #[serde(default)]
    pub note: String,
}

/// 可自由编辑的文本字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExerciseField {
    Weight,
    Sets,
    Reps,
    Note,
}

impl ExerciseField {
    pub const ALL: [ExerciseField; 4] = [
        ExerciseField::Weight,
        ExerciseField::Sets,
        ExerciseField::Reps,
        ExerciseField::Note,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ExerciseField::Weight => "Weight (kg)",
            ExerciseField::Sets => "Sets",
            ExerciseField::Reps => "Reps",
            ExerciseField::Note => "S (notes)",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            ExerciseField::Note => "...",
            _ => "0",
        }
    }

    pub fn next(self) -> Option<ExerciseField> {
        match self {
            ExerciseField::Weight => Some(ExerciseField::Sets),
            ExerciseField::Sets => Some(ExerciseField::Reps),
            ExerciseField::Reps => Some(ExerciseField::Note),
            ExerciseField::Note => None,
        }
    }
}

impl Exercise {
    pub fn new(name: String) -> Self {
        Self {
            id: uid(),
            name,
            done: false,
            weight: String::new(),
            sets: String::new(),
            reps: String::new(),
            note: String::new(),
        }
    }

    pub fn field(&self, field: ExerciseField) -> &str {
        match field {
            ExerciseField::Weight => &self.weight,
            ExerciseField::Sets => &self.sets,
            ExerciseField::Reps => &self.reps,
            ExerciseField::Note => &self.note,
        }
    }

    fn field_mut(&mut self, field: ExerciseField) -> &mut String {
        match field {
            ExerciseField::Weight => &mut self.weight,
            ExerciseField::Sets => &mut self.sets,
            ExerciseField::Reps => &mut self.reps,
            ExerciseField::Note => &mut self.note,
        }
    }

    /// 原样写入字段值，不做校验
    pub fn set_field(&mut self, field: ExerciseField, value: String) {
        *self.field_mut(field) = value;
    }

    pub fn rename(&mut self, name: &str) -> bool {
        if name.trim().is_empty() {
            return false;
        }
        self.name = name.to_string();
        true
    }
}

/// 完成进度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub done: usize,
    pub total: usize,
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.done, self.total)
    }
}

/// 训练日
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Day {
    #[serde(default = "uid")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

impl Day {
    pub fn new(name: String) -> Self {
        Self {
            id: uid(),
            name,
            exercises: Vec::new(),
        }
    }

    pub fn rename(&mut self, name: &str) -> bool {
        if name.trim().is_empty() {
            return false;
        }
        self.name = name.to_string();
        true
    }

    pub fn progress(&self) -> Progress {
        Progress {
            done: self.exercises.iter().filter(|ex| ex.done).count(),
            total: self.exercises.len(),
        }
    }

    /// 追加动作，返回新动作的 ID
    pub fn add_exercise(&mut self, name: String) -> String {
        let exercise = Exercise::new(name);
        let id = exercise.id.clone();
        self.exercises.push(exercise);
        id
    }

    pub fn exercise_index(&self, exercise_id: &str) -> Option<usize> {
        self.exercises.iter().position(|ex| ex.id == exercise_id)
    }

    pub fn rename_exercise(&mut self, idx: usize, name: &str) -> bool {
        self.exercises
            .get_mut(idx)
            .is_some_and(|ex| ex.rename(name))
    }

    pub fn toggle_exercise_done(&mut self, idx: usize) -> bool {
        match self.exercises.get_mut(idx) {
            Some(ex) => {
                ex.done = !ex.done;
                true
            }
            None => false,
        }
    }

    /// 按索引删除，后续动作依次前移
    pub fn delete_exercise(&mut self, idx: usize) -> Option<Exercise> {
        (idx < self.exercises.len()).then(|| self.exercises.remove(idx))
    }

    pub fn move_exercise_up(&mut self, idx: usize) -> bool {
        if idx == 0 || idx >= self.exercises.len() {
            return false;
        }
        self.exercises.swap(idx - 1, idx);
        true
    }

    pub fn move_exercise_down(&mut self, idx: usize) -> bool {
        if idx + 1 >= self.exercises.len() {
            return false;
        }
        self.exercises.swap(idx, idx + 1);
        true
    }

    pub fn set_exercise_field(&mut self, idx: usize, field: ExerciseField, value: String) -> bool {
        match self.exercises.get_mut(idx) {
            Some(ex) => {
                ex.set_field(field, value);
                true
            }
            None => false,
        }
    }
}

/// 应用全部持久化状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    #[serde(default)]
    pub selected_day_id: Option<String>,
    pub days: Vec<Day>,
}

impl AppState {
    /// 首次运行或数据损坏时的默认数据
    pub fn seed() -> Self {
        Self {
            selected_day_id: None,
            days: (1..=3).map(|n| Day::new(format!("Day {n}"))).collect(),
        }
    }

    pub fn day_index(&self, day_id: &str) -> Option<usize> {
        self.days.iter().position(|d| d.id == day_id)
    }

    pub fn day_mut(&mut self, day_id: &str) -> Option<&mut Day> {
        self.days.iter_mut().find(|d| d.id == day_id)
    }

    pub fn selected_day(&self) -> Option<&Day> {
        let id = self.selected_day_id.as_deref()?;
        self.days.iter().find(|d| d.id == id)
    }

    pub fn selected_day_mut(&mut self) -> Option<&mut Day> {
        let id = self.selected_day_id.clone()?;
        self.day_mut(&id)
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected_day_id
            .as_deref()
            .and_then(|id| self.day_index(id))
    }

    pub fn select_day(&mut self, day_id: &str) -> bool {
        if self.day_index(day_id).is_none() {
            return false;
        }
        self.selected_day_id = Some(day_id.to_string());
        true
    }

    /// 选中项失效时回退到第一天（无天时为空）
    pub fn normalize_selection(&mut self) -> bool {
        if self.selected_day().is_some() {
            return false;
        }
        let fallback = self.days.first().map(|d| d.id.clone());
        let changed = fallback != self.selected_day_id;
        self.selected_day_id = fallback;
        changed
    }

    /// 追加新的一天并选中，返回其 ID
    pub fn add_day(&mut self, name: String) -> String {
        let day = Day::new(name);
        let id = day.id.clone();
        self.days.push(day);
        self.selected_day_id = Some(id.clone());
        id
    }

    pub fn rename_day(&mut self, day_id: &str, name: &str) -> bool {
        self.day_mut(day_id).is_some_and(|d| d.rename(name))
    }

    /// 删除一天；至少保留一天
    pub fn delete_day(&mut self, day_id: &str) -> Result<bool, ModelError> {
        if self.days.len() <= 1 {
            return Err(ModelError::LastDay);
        }
        let Some(idx) = self.day_index(day_id) else {
            return Ok(false);
        };
        self.days.remove(idx);

        if self.selected_day_id.as_deref() == Some(day_id) {
            let next = self
                .days
                .get(idx.saturating_sub(1))
                .or_else(|| self.days.first())
                .map(|d| d.id.clone());
            self.selected_day_id = next;
        }
        Ok(true)
    }
}
