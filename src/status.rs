/// Receives the user-facing progress of a run.
pub trait StatusSink: Send + Sync {
    fn info(&self, message: &str);
    fn failed(&self, message: &str);
}

/// Writes Actions workflow commands to stdout so the runner annotates the job.
pub struct ActionsStatus;

impl StatusSink for ActionsStatus {
    fn info(&self, message: &str) {
        println!("{message}");
    }

    fn failed(&self, message: &str) {
        println!("::error::{}", escape_data(message));
    }
}

/// Escapes a workflow command payload so multi-line messages stay one annotation.
pub fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
