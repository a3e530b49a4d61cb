//! 用户文本转义
//!
//! 存储中的文本可能含有控制字符，直接写入终端会被解释为控制序列。

use std::borrow::Cow;

const REPLACEMENT: char = '\u{FFFD}';

/// 多行文本：保留换行，其余控制字符替换为 U+FFFD
pub fn escape_text(s: &str) -> Cow<'_, str> {
    escape_with(s, |c| if c == '\n' { Some(c) } else { None })
}

/// 单行字段：换行折叠为空格
pub fn escape_field(s: &str) -> Cow<'_, str> {
    escape_with(s, |c| matches!(c, '\n' | '\r').then_some(' '))
}

fn escape_with(s: &str, keep: impl Fn(char) -> Option<char>) -> Cow<'_, str> {
    if !s.chars().any(char::is_control) {
        return Cow::Borrowed(s);
    }
    let escaped = s
        .chars()
        .map(|c| {
            if c.is_control() {
                keep(c).unwrap_or(REPLACEMENT)
            } else {
                c
            }
        })
        .collect();
    Cow::Owned(escaped)
}
