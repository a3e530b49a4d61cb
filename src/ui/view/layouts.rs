//! 布局辅助函数

use ratatui::layout::Rect;

/// 固定尺寸居中，超出时收缩到可用区域
pub fn centered_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    Rect::new(
        r.x + (r.width - width) / 2,
        r.y + (r.height - height) / 2,
        width,
        height,
    )
}

/// 滚动偏移：沿用上一帧的偏移，仅在选中项移出窗口时调整
pub fn scroll_into_view(offset: usize, selected: usize, visible: usize, len: usize) -> usize {
    if visible == 0 {
        return 0;
    }
    let offset = if selected < offset {
        selected
    } else if selected >= offset + visible {
        selected + 1 - visible
    } else {
        offset
    };
    // 删除后不留空白
    offset.min(len.saturating_sub(visible))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_fixed_clamps() {
        let area = Rect::new(0, 0, 80, 24);
        assert_eq!(centered_fixed(40, 8, area), Rect::new(20, 8, 40, 8));
        assert_eq!(centered_fixed(100, 30, area), area);
    }

    #[test]
    fn test_scroll_into_view() {
        assert_eq!(scroll_into_view(0, 0, 3, 10), 0);
        assert_eq!(scroll_into_view(0, 2, 3, 10), 0);
        assert_eq!(scroll_into_view(0, 5, 3, 10), 3);
        assert_eq!(scroll_into_view(3, 0, 0, 10), 0);
    }

    #[test]
    fn test_scroll_keeps_window_while_selection_visible() {
        // 选中窗口内的其他项不滚动
        assert_eq!(scroll_into_view(5, 5, 5, 10), 5);
        assert_eq!(scroll_into_view(5, 7, 5, 10), 5);
        // 向上移出窗口时，选中项停在首位
        assert_eq!(scroll_into_view(5, 4, 5, 10), 4);
        // 列表变短时收回偏移
        assert_eq!(scroll_into_view(5, 2, 5, 6), 1);
        assert_eq!(scroll_into_view(5, 0, 5, 3), 0);
    }
}
