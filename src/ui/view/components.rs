//! 通用 UI 组件
//!
//! 对话框、输入框、按钮等通用组件

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

/// [组件] 弹窗基础框架
pub fn render_dialog_framework(frame: &mut Frame, area: Rect, title: &str, color: Color) -> Rect {
    frame.render_widget(Clear, area);
    let block = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .style(Style::default().fg(color));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    inner
}

/// [组件] 带有标题的单行输入框，返回光标位置
pub fn render_input_widget(frame: &mut Frame, area: Rect, title: &str, value: &str) -> (u16, u16) {
    let style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let block = Block::default().title(title.to_string()).borders(Borders::ALL);
    let inner = block.inner(area);

    let shown = tail_window(value, inner.width.saturating_sub(1) as usize);
    let cursor_x = inner.x.saturating_add(shown.chars().count() as u16);

    frame.render_widget(Paragraph::new(shown).style(style).block(block), area);
    (cursor_x, inner.y)
}

/// 超出宽度时只保留末尾 `room` 个字符
pub fn tail_window(value: &str, room: usize) -> String {
    let len = value.chars().count();
    value.chars().skip(len.saturating_sub(room)).collect()
}

/// [组件] 带方括号的按钮，返回按钮区域
pub fn render_button(frame: &mut Frame, x: u16, y: u16, label: &str, style: Style) -> Rect {
    let text = format!("[ {label} ]");
    let area = Rect::new(x, y, text.chars().count() as u16, 1).intersection(frame.area());
    frame.render_widget(Paragraph::new(Line::from(Span::styled(text, style))), area);
    area
}

/// 按钮渲染所需宽度
pub fn button_width(label: &str) -> u16 {
    label.chars().count() as u16 + 4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tail_window() {
        assert_eq!(tail_window("squat", 10), "squat");
        assert_eq!(tail_window("deadlift", 4), "lift");
        assert_eq!(tail_window("组间休息", 2), "休息");
        assert_eq!(tail_window("bench", 0), "");
    }
}
