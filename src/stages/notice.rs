use std::sync::Mutex;

/// Severity of a user-facing notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// Transient message shown to the user after an operation settles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Operation named in failure notices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Loading,
    Saving,
    Deleting,
    Reordering,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Loading => "loading",
            Operation::Saving => "saving",
            Operation::Deleting => "deleting",
            Operation::Reordering => "reordering",
        }
    }
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, message: message.into() }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, message: message.into() }
    }

    /// Backend answered 404/401: the feature is not available yet
    pub fn unavailable(subject: &str) -> Self {
        Self::info(format!("{} are not available yet", capitalize(subject)))
    }

    /// Any other failure. Status codes and error details go to the log, not here.
    pub fn failed(operation: Operation, subject: &str) -> Self {
        Self::error(format!("Error while {} {}", operation.as_str(), subject))
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Fire-and-forget sink for notices
pub trait Notifier {
    fn notify(&self, notice: Notice);

    /// A fetch of `subject` has started
    fn loading(&self, _subject: &str) {}
}

impl<T: Notifier + ?Sized> Notifier for &T {
    fn notify(&self, notice: Notice) {
        (**self).notify(notice)
    }

    fn loading(&self, subject: &str) {
        (**self).loading(subject)
    }
}

/// Keeps every notice it receives
#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
    loads: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap_or_else(|err| err.into_inner()).clone()
    }

    pub fn levels(&self) -> Vec<NoticeLevel> {
        self.notices().into_iter().map(|n| n.level).collect()
    }

    /// Subjects whose loading was announced, oldest first
    pub fn loads(&self) -> Vec<String> {
        self.loads.lock().unwrap_or_else(|err| err.into_inner()).clone()
    }

    pub fn clear(&self) {
        self.notices.lock().unwrap_or_else(|err| err.into_inner()).clear();
        self.loads.lock().unwrap_or_else(|err| err.into_inner()).clear();
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap_or_else(|err| err.into_inner()).push(notice);
    }

    fn loading(&self, subject: &str) {
        self.loads.lock().unwrap_or_else(|err| err.into_inner()).push(subject.to_string());
    }
}
