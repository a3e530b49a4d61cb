//! UI 模块
//!
//! 采用 MVI (Model-View-Intent) 架构：
//! - Model (state.rs): App 容器、视图模型与持久化提交
//! - View (view/): 将视图模型映射为终端画面
//! - Intent (actions.rs / input.rs): 按键与鼠标转化为语义化 Action
//! - Update (logic.rs): 执行 Action 并决定保存方式

pub mod actions;
pub mod input;
pub mod logic;
pub mod prompt;
pub mod state;
pub mod text;
pub mod view;

// Re-export for convenience
pub use input::{handle_key_event, handle_mouse_event};
pub use state::App;
pub use view::render;
