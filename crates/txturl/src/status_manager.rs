use std::time::{Duration, Instant};

/// How long a notice stays visible.
pub const NOTICE_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub content: String,
    pub message_type: MessageType,
    pub created_at: Instant,
    pub auto_clear_duration: Duration,
}

impl StatusMessage {
    pub fn new(content: String, message_type: MessageType) -> Self {
        Self::with_duration(content, message_type, NOTICE_DURATION)
    }

    pub fn with_duration(content: String, message_type: MessageType, duration: Duration) -> Self {
        Self {
            content,
            message_type,
            created_at: Instant::now(),
            auto_clear_duration: duration,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() > self.auto_clear_duration
    }
}

/// User-visible notices. A new notice replaces the current one.
#[derive(Debug, Clone, Default)]
pub struct StatusManager {
    current_message: Option<StatusMessage>,
}

impl StatusManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_info(&mut self, message: impl Into<String>) {
        self.set(StatusMessage::new(message.into(), MessageType::Info));
    }

    pub fn set_warning(&mut self, message: impl Into<String>) {
        self.set(StatusMessage::new(message.into(), MessageType::Warning));
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.set(StatusMessage::new(message.into(), MessageType::Error));
    }

    fn set(&mut self, message: StatusMessage) {
        log::debug!("Notice ({:?}): {}", message.message_type, message.content);
        self.current_message = Some(message);
    }

    pub fn clear(&mut self) {
        self.current_message = None;
    }

    /// Drops the current notice once it has expired.
    pub fn update(&mut self) {
        if let Some(ref message) = self.current_message {
            if message.is_expired() {
                self.current_message = None;
            }
        }
    }

    pub fn get_current_message(&self) -> Option<&StatusMessage> {
        self.current_message.as_ref()
    }

    pub fn has_message(&self) -> bool {
        self.current_message.is_some()
    }
}
