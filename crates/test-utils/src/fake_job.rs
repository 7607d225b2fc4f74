use std::sync::{Arc, Mutex};

use depgraph::job::{Job, JobFuture};

/// What a [`FakeJob`] reports when run.
#[derive(Debug, Clone)]
pub enum Script {
    Pass,
    ValidationFailures(Vec<String>),
    Error(String),
}

/// A job that:
/// - records its name in a shared log when run
/// - reports a scripted result without spawning anything.
pub struct FakeJob {
    name: String,
    script: Script,
    executed: Arc<Mutex<Vec<String>>>,
}

impl FakeJob {
    pub fn new(name: &str, script: Script, executed: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            name: name.to_string(),
            script,
            executed,
        }
    }
}

impl Job for FakeJob {
    fn run(&self) -> JobFuture {
        let name = self.name.clone();
        let script = self.script.clone();
        let executed = Arc::clone(&self.executed);

        Box::pin(async move {
            executed.lock().unwrap().push(name);
            match script {
                Script::Pass => Ok(Vec::new()),
                Script::ValidationFailures(failures) => Ok(failures),
                Script::Error(msg) => Err(anyhow::anyhow!(msg)),
            }
        })
    }
}
