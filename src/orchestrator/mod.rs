//! Job execution sequencing
//!
//! [`Orchestrator`] owns the [`Session`] (settings, tool statuses, log) and
//! moves one job through Idle -> Confirming -> Running -> Terminal. Components
//! read the session through it and request transitions; they never mutate the
//! log directly.

pub mod consumer;

use crate::error::TransitionError;
use crate::model::job::{JobOutcome, JobPhase};
use crate::model::log_buffer::{LogBuffer, LogLine};
use crate::model::settings::JobSettings;
use crate::model::tool_status::ToolStatuses;
use crate::services::command_line::build_command_line;
use crate::services::host::JobHost;
use crate::services::risk;
use crate::services::tools::ToolStatusMonitor;
use consumer::Subscription;
use std::time::{Duration, Instant};

/// State shared by every view of the current job
pub struct Session {
    pub settings: JobSettings,
    pub monitor: ToolStatusMonitor,
    pub log: LogBuffer,
}

impl Session {
    pub fn new(settings: JobSettings, monitor: ToolStatusMonitor) -> Self {
        Self {
            settings,
            monitor,
            log: LogBuffer::new(),
        }
    }

    pub fn statuses(&self) -> &ToolStatuses {
        self.monitor.statuses()
    }
}

/// One execution, from confirmation until reset
pub struct JobRun {
    /// Settings as they were when the job was confirmed
    pub settings: JobSettings,
    pub command_line: Option<String>,
    /// Process id of the running download tool
    pub pid: Option<u32>,
    subscription: Option<Subscription>,
    started_at: Instant,
    finished_at: Option<Instant>,
}

impl JobRun {
    fn new(settings: JobSettings) -> Self {
        Self {
            settings,
            command_line: None,
            pid: None,
            subscription: None,
            started_at: Instant::now(),
            finished_at: None,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.finished_at
            .unwrap_or_else(Instant::now)
            .duration_since(self.started_at)
    }
}

pub struct Orchestrator<H: JobHost> {
    host: H,
    session: Session,
    phase: JobPhase,
    run: Option<JobRun>,
}

impl<H: JobHost> Orchestrator<H> {
    pub fn new(host: H, session: Session) -> Self {
        Self {
            host,
            session,
            phase: JobPhase::Idle,
            run: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn phase(&self) -> JobPhase {
        self.phase
    }

    pub fn run(&self) -> Option<&JobRun> {
        self.run.as_ref()
    }

    pub fn is_processing(&self) -> bool {
        self.phase.is_running()
    }

    /// Settings may only change while no job is pending or running
    pub fn settings_mut(&mut self) -> Option<&mut JobSettings> {
        match self.phase {
            JobPhase::Idle => Some(&mut self.session.settings),
            _ => None,
        }
    }

    /// Re-query both tools with the current transcode directory
    pub fn check_tools(&mut self) {
        let dir = self.session.settings.tool_directory.clone();
        self.session.monitor.check_tools(dir);
    }

    pub fn risks(&self) -> Vec<String> {
        risk::evaluate(self.session.statuses(), &self.session.settings)
    }

    /// Idle -> Confirming, returning the risks to show
    pub fn request_start(&mut self) -> Result<Vec<String>, TransitionError> {
        if self.phase != JobPhase::Idle {
            return Err(TransitionError::NotIdle);
        }
        self.phase = JobPhase::Confirming {
            acknowledged: false,
        };
        log::info!("start requested");
        Ok(self.risks())
    }

    pub fn set_acknowledged(&mut self, value: bool) -> Result<(), TransitionError> {
        match &mut self.phase {
            JobPhase::Confirming { acknowledged } => {
                *acknowledged = value;
                Ok(())
            }
            _ => Err(TransitionError::NotConfirming),
        }
    }

    /// Whether `confirm` would currently be accepted
    pub fn can_confirm(&self) -> bool {
        match self.phase {
            JobPhase::Confirming { acknowledged } => acknowledged || self.risks().is_empty(),
            _ => false,
        }
    }

    /// Confirming -> Idle without side effects
    pub fn cancel(&mut self) -> Result<(), TransitionError> {
        match self.phase {
            JobPhase::Confirming { .. } => {
                self.phase = JobPhase::Idle;
                log::info!("start cancelled");
                Ok(())
            }
            _ => Err(TransitionError::NotConfirming),
        }
    }

    /// Confirming -> Running, or straight to Terminal(Failure) on setup errors
    ///
    /// Setup failures are reported in the log, not as an `Err`; `Err` means
    /// the transition itself was refused.
    pub fn confirm(&mut self) -> Result<(), TransitionError> {
        let JobPhase::Confirming { acknowledged } = self.phase else {
            return Err(TransitionError::NotConfirming);
        };
        let risks = self.risks();
        if !risks.is_empty() && !acknowledged {
            return Err(TransitionError::AcknowledgementRequired);
        }
        if !risks.is_empty() {
            log::warn!("starting with acknowledged risks: {:?}", risks);
        }

        let snapshot = self.session.settings.clone();
        let job_log = &mut self.session.log;
        let mut run = JobRun::new(snapshot.clone());
        self.phase = JobPhase::Running;
        job_log.clear();
        job_log.append(LogLine::info("Starting download process..."));
        job_log.append(LogLine::info("Writing URLs to file..."));

        let batch_file = match self.host.persist_url_list(&snapshot.url_text()) {
            Ok(path) => path,
            Err(e) => {
                log::error!("batch file write failed: {}", e);
                job_log.append(LogLine::error(format!("Process failed: {}", e)));
                run.finished_at = Some(Instant::now());
                self.run = Some(run);
                self.phase = JobPhase::Terminal(JobOutcome::Failure);
                return Ok(());
            }
        };
        job_log.append(LogLine::info(format!(
            "URLs file created: {}",
            batch_file.display()
        )));

        if let Some(dir) = &snapshot.output_directory {
            job_log.append(LogLine::info(format!("Output directory: {}", dir.display())));
        }
        if let Some(dir) = &snapshot.tool_directory {
            job_log.append(LogLine::info(format!("FFmpeg directory: {}", dir.display())));
        }
        if let Some(custom) = snapshot.effective_custom_options() {
            job_log.append(LogLine::info(format!("Custom options: {}", custom)));
        }

        let command_line = build_command_line(&snapshot, &batch_file);
        job_log.append(LogLine::info(format!(
            "Executing command: yt-dlp {}",
            command_line
        )));
        run.command_line = Some(command_line.clone());

        let (subscription, sender) = consumer::subscribe();
        match self.host.start_process(&command_line, sender) {
            Ok(pid) => {
                log::info!("job started, yt-dlp pid {}", pid);
                run.pid = Some(pid);
                run.subscription = Some(subscription);
            }
            Err(e) => {
                log::error!("job start failed: {}", e);
                drop(subscription);
                job_log.append(LogLine::error(format!("Process failed: {}", e)));
                run.finished_at = Some(Instant::now());
                self.phase = JobPhase::Terminal(JobOutcome::Failure);
            }
        }
        self.run = Some(run);
        Ok(())
    }

    /// Apply finished tool checks and pending job events
    ///
    /// Returns true when anything visible changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = self.session.monitor.poll();

        let Some(run) = self.run.as_mut() else {
            return changed;
        };
        let Some(subscription) = run.subscription.as_mut() else {
            return changed;
        };

        let before = self.session.log.len();
        let outcome = subscription.drain(&mut self.session.log);
        changed |= self.session.log.len() != before || outcome.is_some();

        if let Some(outcome) = outcome {
            if self.phase == JobPhase::Running {
                log::info!("job finished: {:?} (pid {:?})", outcome, run.pid);
                self.phase = JobPhase::Terminal(outcome);
                run.finished_at = Some(Instant::now());
            }
        }
        // stdout coalescing keeps the length constant, so redraw while running
        changed || self.phase.is_running()
    }

    /// Terminal (or Idle) -> Idle, discarding the log and the run
    pub fn reset(&mut self) -> Result<(), TransitionError> {
        match self.phase {
            JobPhase::Running => Err(TransitionError::Busy),
            JobPhase::Confirming { .. } => Err(TransitionError::NotIdle),
            JobPhase::Idle | JobPhase::Terminal(_) => {
                self.shutdown();
                self.session.log.clear();
                self.run = None;
                self.phase = JobPhase::Idle;
                log::info!("session reset");
                Ok(())
            }
        }
    }

    /// Stop listening to the current job, whatever its state
    pub fn shutdown(&mut self) {
        if let Some(subscription) = self.run.as_mut().and_then(|r| r.subscription.as_mut()) {
            subscription.close();
        }
    }
}
