//! Action 枚举定义 (Intent)
//!
//! 键盘与鼠标事件都转化为明确的语义化 Action

use crate::models::ExerciseField;

/// 用户操作枚举
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    SwitchFocus,
    CursorUp,
    CursorDown,

    // 训练日，参数为索引
    SelectDay(usize),
    StartAddDay,
    StartRenameDay(usize),
    DeleteDay(usize),

    // 动作，参数为当前训练日内的索引
    FocusExercise(usize),
    StartAddExercise,
    StartRenameExercise(usize),
    ToggleDone(usize),
    MoveExerciseUp(usize),
    MoveExerciseDown(usize),
    DeleteExercise(usize),
    EditField(usize, ExerciseField),

    // 表单/通用交互
    Cancel,      // Esc / 点击弹窗外 / Cancel 按钮
    Submit,      // Enter / OK 按钮
    NextField,   // Tab
    Input(char), // 输入字符
    DeleteChar,  // Backspace
}
