use outage_schedule::GroupCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::clock::Clock;
use crate::display::StatusDisplay;
use crate::refresh::{SchedulePipeline, ScheduleSnapshot};
use crate::session::{RefreshOutcome, RefreshTicket, Session, TickOutcome};

const COMMAND_BUFFER: usize = 8;

type Completion = (RefreshTicket, anyhow::Result<ScheduleSnapshot>);

#[derive(Debug)]
enum Command {
    ChangeGroup(GroupCode),
    RefreshNow,
}

/// Drives a session: a countdown tick every `tick_interval`, refreshes run as
/// separate tasks and are applied when they complete.
pub struct Controller {
    session: Session,
    pipeline: Arc<SchedulePipeline>,
    display: Arc<dyn StatusDisplay>,
    clock: Arc<dyn Clock>,
    tick_interval: Duration,
}

/// Handle to a running controller. Dropping it also ends the task, but only `stop`
/// waits for the task to finish.
pub struct ControllerHandle {
    commands: mpsc::Sender<Command>,
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl ControllerHandle {
    pub async fn change_group(&self, group: GroupCode) -> anyhow::Result<()> {
        self.commands
            .send(Command::ChangeGroup(group))
            .await
            .map_err(|_| anyhow::anyhow!("Controller is no longer running"))
    }

    pub async fn refresh_now(&self) -> anyhow::Result<()> {
        self.commands
            .send(Command::RefreshNow)
            .await
            .map_err(|_| anyhow::anyhow!("Controller is no longer running"))
    }

    pub async fn stop(self) -> anyhow::Result<()> {
        // The controller may have already exited, in which case there is nobody to tell.
        let _ = self.shutdown.send(true);
        self.task.await?;
        Ok(())
    }
}

impl Controller {
    pub fn new(
        session: Session,
        pipeline: Arc<SchedulePipeline>,
        display: Arc<dyn StatusDisplay>,
        clock: Arc<dyn Clock>,
        tick_interval: Duration,
    ) -> Self {
        Controller {
            session,
            pipeline,
            display,
            clock,
            tick_interval,
        }
    }

    pub fn spawn(self) -> ControllerHandle {
        let (commands, command_receiver) = mpsc::channel(COMMAND_BUFFER);
        let (shutdown, shutdown_receiver) = watch::channel(false);
        let task = tokio::spawn(self.run(command_receiver, shutdown_receiver));
        ControllerHandle {
            commands,
            shutdown,
            task,
        }
    }

    async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        let (completion_sender, mut completions) = mpsc::unbounded_channel::<Completion>();
        let mut ticker = tokio::time::interval(self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::info!("Watching power status for group {}", self.session.group());
        loop {
            tokio::select! {
                _ = ticker.tick() => self.on_tick(&completion_sender),
                Some((ticket, result)) = completions.recv() => self.on_completion(ticket, result),
                Some(command) = commands.recv() => self.on_command(command, &completion_sender),
                _ = shutdown.changed() => break,
            }
        }
        tracing::info!("Stopped watching power status");
    }

    fn on_tick(&mut self, completions: &mpsc::UnboundedSender<Completion>) {
        match self.session.tick(self.clock.now()) {
            TickOutcome::Publish(report) => self.display.show_status(&report),
            TickOutcome::Refresh(ticket) => self.start_refresh(ticket, completions),
            TickOutcome::Idle => {}
        }
    }

    fn on_command(&mut self, command: Command, completions: &mpsc::UnboundedSender<Completion>) {
        tracing::debug!("Received {command:?}");
        match command {
            Command::ChangeGroup(group) => {
                self.session.change_group(group);
                self.on_tick(completions);
            }
            Command::RefreshNow => {
                if let Some(ticket) = self.session.begin_refresh(self.clock.now()) {
                    self.start_refresh(ticket, completions);
                }
            }
        }
    }

    fn start_refresh(&self, ticket: RefreshTicket, completions: &mpsc::UnboundedSender<Completion>) {
        let pipeline = Arc::clone(&self.pipeline);
        let completions = completions.clone();
        tokio::spawn(async move {
            let result = pipeline.load(&ticket.group, ticket.date).await;
            if completions.send((ticket, result)).is_err() {
                tracing::debug!("Controller stopped before the refresh completed");
            }
        });
    }

    fn on_completion(&mut self, ticket: RefreshTicket, result: anyhow::Result<ScheduleSnapshot>) {
        match self.session.complete_refresh(ticket, result, self.clock.now()) {
            RefreshOutcome::Applied {
                report,
                schedule_changed,
            } => {
                if schedule_changed {
                    if let Some(schedule) = self.session.today() {
                        self.display.schedule_updated(schedule);
                    }
                }
                self.display.show_status(&report);
            }
            RefreshOutcome::Discarded => {}
            RefreshOutcome::Failed {
                error,
                has_prior_schedule,
            } => {
                if has_prior_schedule {
                    tracing::warn!("Refresh failed, keeping the last schedule: {error:?}");
                } else {
                    self.display.show_error(&error);
                }
            }
        }
    }
}
