//! 文本输入弹窗 (Prompt)
//!
//! 调用方发起请求后挂起，直到用户确认或取消；
//! 同一时刻只有一个活动弹窗，其余请求按顺序排队。

use std::collections::VecDeque;

/// 弹窗结果返回后要继续执行的操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptPurpose {
    NewDay,
    RenameDay(String),
    NewExercise { day_id: String },
    RenameExercise { day_id: String, exercise_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    pub title: String,
    pub initial: String,
    pub purpose: PromptPurpose,
}

impl PromptRequest {
    pub fn new(title: impl Into<String>, initial: impl Into<String>, purpose: PromptPurpose) -> Self {
        Self {
            title: title.into(),
            initial: initial.into(),
            purpose,
        }
    }
}

/// 当前显示中的弹窗
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivePrompt {
    pub title: String,
    pub buffer: String,
    purpose: PromptPurpose,
}

/// 用户的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Confirm,
    Cancel,
}

/// 弹窗结果：空白输入等同于取消
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptAnswer {
    Text(String),
    Aborted,
}

#[derive(Debug, Default)]
pub struct PromptQueue {
    active: Option<ActivePrompt>,
    pending: VecDeque<PromptRequest>,
}

impl PromptQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// 空闲时立即打开，否则排队
    pub fn request(&mut self, request: PromptRequest) {
        if self.active.is_some() {
            self.pending.push_back(request);
        } else {
            self.open(request);
        }
    }

    fn open(&mut self, request: PromptRequest) {
        self.active = Some(ActivePrompt {
            title: request.title,
            buffer: request.initial,
            purpose: request.purpose,
        });
    }

    pub fn active(&self) -> Option<&ActivePrompt> {
        self.active.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    #[cfg(test)]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(prompt) = &mut self.active {
            prompt.buffer.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        if let Some(prompt) = &mut self.active {
            prompt.buffer.pop();
        }
    }

    /// 结束当前弹窗并打开下一个排队请求。每个请求只会被解析一次。
    pub fn resolve(&mut self, resolution: Resolution) -> Option<(PromptPurpose, PromptAnswer)> {
        let prompt = self.active.take()?;
        if let Some(next) = self.pending.pop_front() {
            self.open(next);
        }

        let answer = match resolution {
            Resolution::Confirm => {
                let text = prompt.buffer.trim();
                if text.is_empty() {
                    PromptAnswer::Aborted
                } else {
                    PromptAnswer::Text(text.to_string())
                }
            }
            Resolution::Cancel => PromptAnswer::Aborted,
        };
        Some((prompt.purpose, answer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_day(initial: &str) -> PromptRequest {
        PromptRequest::new("New day name", initial, PromptPurpose::NewDay)
    }

    #[test]
    fn test_confirm_trims() {
        let mut queue = PromptQueue::new();
        queue.request(new_day("  Legs "));
        assert_eq!(queue.active().unwrap().title, "New day name");
        let (purpose, answer) = queue.resolve(Resolution::Confirm).unwrap();
        assert_eq!(purpose, PromptPurpose::NewDay);
        assert_eq!(answer, PromptAnswer::Text("Legs".to_string()));
        assert!(!queue.is_open());
    }

    #[test]
    fn test_blank_confirm_aborts() {
        let mut queue = PromptQueue::new();
        queue.request(new_day("ab"));
        queue.pop_char();
        queue.pop_char();
        queue.push_char(' ');
        let (_, answer) = queue.resolve(Resolution::Confirm).unwrap();
        assert_eq!(answer, PromptAnswer::Aborted);
    }

    #[test]
    fn test_cancel_aborts() {
        let mut queue = PromptQueue::new();
        queue.request(new_day("Day 4"));
        let (_, answer) = queue.resolve(Resolution::Cancel).unwrap();
        assert_eq!(answer, PromptAnswer::Aborted);
    }

    #[test]
    fn test_requests_queue_in_order() {
        let mut queue = PromptQueue::new();
        queue.request(new_day("first"));
        queue.request(PromptRequest::new(
            "Rename day",
            "second",
            PromptPurpose::RenameDay("d".to_string()),
        ));
        assert_eq!(queue.pending_len(), 1);
        assert_eq!(queue.active().unwrap().buffer, "first");

        let (purpose, _) = queue.resolve(Resolution::Cancel).unwrap();
        assert_eq!(purpose, PromptPurpose::NewDay);
        assert_eq!(queue.active().unwrap().buffer, "second");

        let (purpose, answer) = queue.resolve(Resolution::Confirm).unwrap();
        assert_eq!(purpose, PromptPurpose::RenameDay("d".to_string()));
        assert_eq!(answer, PromptAnswer::Text("second".to_string()));
    }

    #[test]
    fn test_resolves_once() {
        let mut queue = PromptQueue::new();
        queue.request(new_day("x"));
        assert!(queue.resolve(Resolution::Confirm).is_some());
        assert!(queue.resolve(Resolution::Confirm).is_none());
        queue.push_char('y');
        assert!(queue.active().is_none());
    }
}
