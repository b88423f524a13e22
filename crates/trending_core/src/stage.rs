use std::fmt;

/// Progress of one page through a harvest run.
///
/// `Pending → Resolving → Fetching → Extracting → Selecting → Succeeded`, with
/// any non-terminal stage able to drop to `Failed`. There is no way back out of
/// a terminal stage within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Stage {
    #[default]
    Pending,
    Resolving,
    Fetching,
    Extracting,
    Selecting,
    Succeeded,
    Failed,
}

impl Stage {
    /// Next stage on the success path; terminal stages stay put.
    pub fn advance(self) -> Stage {
        match self {
            Stage::Pending => Stage::Resolving,
            Stage::Resolving => Stage::Fetching,
            Stage::Fetching => Stage::Extracting,
            Stage::Extracting => Stage::Selecting,
            Stage::Selecting => Stage::Succeeded,
            Stage::Succeeded => Stage::Succeeded,
            Stage::Failed => Stage::Failed,
        }
    }

    pub fn fail(self) -> Stage {
        if self.is_terminal() {
            self
        } else {
            Stage::Failed
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Succeeded | Stage::Failed)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Pending => "pending",
            Stage::Resolving => "resolving",
            Stage::Fetching => "fetching",
            Stage::Extracting => "extracting",
            Stage::Selecting => "selecting",
            Stage::Succeeded => "succeeded",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Stage tracking for a single page, remembering where a failure happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRun {
    key: String,
    stage: Stage,
    failed_at: Option<Stage>,
}

impl PageRun {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            stage: Stage::Pending,
            failed_at: None,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// The stage that was active when the page failed.
    pub fn failed_at(&self) -> Option<Stage> {
        self.failed_at
    }

    pub fn advance(&mut self) -> Stage {
        self.stage = self.stage.advance();
        self.stage
    }

    /// Marks the run failed and returns the stage the failure happened in.
    /// Failing an already terminal run changes nothing.
    pub fn fail(&mut self) -> Stage {
        if !self.stage.is_terminal() {
            self.failed_at = Some(self.stage);
            self.stage = self.stage.fail();
        }
        self.failed_at.unwrap_or(self.stage)
    }
}
