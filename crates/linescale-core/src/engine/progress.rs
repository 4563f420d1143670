#[derive(Debug, Clone)]
pub enum Progress {
    PhaseStart { name: &'static str },
    PhaseFinish,

    TaskStart { total_steps: u64 },
    TaskIncrement,
    TaskFinish,

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

/// Forwards progress events to an optional observer; a reporter without a
/// callback silently drops everything.
#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }

    /// Runs `work` as a counted task of `total_steps` inside the phase `name`.
    ///
    /// Start and finish events are emitted even when `work` fails, so an
    /// observer never sees a dangling phase.
    pub fn task<T, E>(
        &self,
        name: &'static str,
        total_steps: usize,
        work: impl FnOnce() -> Result<T, E>,
    ) -> Result<T, E> {
        self.report(Progress::PhaseStart { name });
        self.report(Progress::TaskStart {
            total_steps: total_steps as u64,
        });
        let result = work();
        self.report(Progress::TaskFinish);
        self.report(Progress::PhaseFinish);
        result
    }
}
