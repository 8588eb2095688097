use std::sync::{Arc, Mutex};

/// Collects callback lines so tests can assert on them afterwards.
///
/// Clones share the same buffer, which lets one clone go into a `'static`
/// echo callback while the test keeps another.
#[derive(Debug, Clone, Default)]
pub struct LineRecorder {
    lines: Arc<Mutex<Vec<String>>>,
}

impl LineRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, line: &str) {
        self.lines.lock().unwrap().push(line.to_string());
    }

    /// A callback suitable for `run_tool`.
    pub fn callback(&self) -> impl FnMut(&str) + Send + 'static {
        let recorder = self.clone();
        move |line: &str| recorder.record(line)
    }

    /// A callback suitable for `ToolRunner::set_echo`.
    pub fn echo(&self) -> impl Fn(&str) + Send + Sync + 'static {
        let recorder = self.clone();
        move |line: &str| recorder.record(line)
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
