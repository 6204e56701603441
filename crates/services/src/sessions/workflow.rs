use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at, sleep_until};

use super::progress::{AnswerFeedback, QuestionView, SessionPhase};
use super::service::{QuizController, StepOutcome};
use super::summary::QuizSummary;
use super::timer::TimerTick;
use super::view::HistoryListItem;
use crate::error::SessionError;

const INTENT_BUFFER: usize = 32;
const EVENT_BUFFER: usize = 64;

/// User intents forwarded by a presentation adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizIntent {
    Start,
    AnswerSelected(usize),
    /// Leave the feedback window now instead of waiting for the configured delay.
    FeedbackWindowElapsed,
    Restart,
    Home,
    ShowHistory,
    ReloadQuestions,
}

/// State changes pushed to the presentation adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizEvent {
    QuestionsLoaded { count: usize },
    LoadFailed { reason: String },
    Question(QuestionView),
    Feedback(AnswerFeedback),
    Tick(TimerTick),
    Finished(QuizSummary),
    Home,
    History(Vec<HistoryListItem>),
    Rejected(SessionError),
}

/// Feedback window armed for one question of one session.
struct FeedbackDeadline {
    session_id: u64,
    index: usize,
    at: Instant,
}

/// Readout interval armed for one session.
struct SessionTicker {
    session_id: u64,
    interval: Interval,
}

enum Step {
    Intent(QuizIntent),
    FeedbackElapsed,
    Tick,
    Closed,
}

/// Single-task event loop around a `QuizController`.
///
/// Intents, the feedback deadline and the readout interval are all handled
/// on one task, so at most one transition runs at a time. The deadline and the
/// interval are keyed by session id: after a reset or restart they are
/// disarmed before the loop waits again, and can never fire into a newer session.
pub struct QuizSessionLoop {
    controller: QuizController,
}

impl QuizSessionLoop {
    #[must_use]
    pub fn new(controller: QuizController) -> Self {
        Self { controller }
    }

    /// Spawn the loop on the current tokio runtime.
    #[must_use]
    pub fn spawn(self) -> QuizSessionHandle {
        let (intent_tx, intent_rx) = mpsc::channel(INTENT_BUFFER);
        let (event_tx, event_rx) = mpsc::channel(EVENT_BUFFER);
        let task = tokio::spawn(self.run(intent_rx, event_tx));
        QuizSessionHandle {
            intents: intent_tx,
            events: event_rx,
            task,
        }
    }

    /// Drive the controller until the intent channel closes or nobody listens
    /// for events. Returns the controller for inspection.
    pub async fn run(
        mut self,
        mut intents: mpsc::Receiver<QuizIntent>,
        events: mpsc::Sender<QuizEvent>,
    ) -> QuizController {
        let mut feedback: Option<FeedbackDeadline> = None;
        let mut ticker: Option<SessionTicker> = None;

        loop {
            self.sync_schedules(&mut feedback, &mut ticker);
            let feedback_at = feedback.as_ref().map(|d| d.at);

            let step = tokio::select! {
                intent = intents.recv() => intent.map_or(Step::Closed, Step::Intent),
                () = wait_until(feedback_at) => Step::FeedbackElapsed,
                () = next_tick(ticker.as_mut()) => Step::Tick,
            };

            let delivered = match step {
                Step::Intent(intent) => self.handle_intent(intent, &events).await,
                Step::FeedbackElapsed => {
                    feedback = None;
                    self.advance(&events).await
                }
                Step::Tick => match self.controller.tick() {
                    Some(tick) => events.send(QuizEvent::Tick(tick)).await.is_ok(),
                    None => true,
                },
                Step::Closed => false,
            };
            if !delivered {
                break;
            }
        }

        tracing::debug!("quiz session loop stopped");
        self.controller
    }

    /// Arm or disarm the deadline and the interval to match the controller.
    fn sync_schedules(
        &self,
        feedback: &mut Option<FeedbackDeadline>,
        ticker: &mut Option<SessionTicker>,
    ) {
        let session_id = self.controller.session_id();
        let settings = self.controller.settings();

        if self.controller.timer_running() {
            if ticker.as_ref().map(|t| t.session_id) != Some(session_id) {
                let period = settings.tick_period();
                let mut interval = interval_at(Instant::now() + period, period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                *ticker = Some(SessionTicker {
                    session_id,
                    interval,
                });
            }
        } else {
            *ticker = None;
        }

        if let SessionPhase::ShowingFeedback(index) = self.controller.phase() {
            let armed = feedback
                .as_ref()
                .is_some_and(|d| d.session_id == session_id && d.index == index);
            if !armed {
                *feedback = Some(FeedbackDeadline {
                    session_id,
                    index,
                    at: Instant::now() + settings.feedback_delay(),
                });
            }
        } else {
            *feedback = None;
        }
    }

    async fn handle_intent(&mut self, intent: QuizIntent, events: &mpsc::Sender<QuizEvent>) -> bool {
        tracing::trace!(?intent, phase = %self.controller.phase(), "intent");
        match intent {
            QuizIntent::Start => {
                let shown = self.controller.start();
                emit_question(shown, events).await
            }
            QuizIntent::Restart => {
                let shown = self.controller.restart();
                emit_question(shown, events).await
            }
            QuizIntent::AnswerSelected(choice) => {
                let event = match self.controller.submit_answer(choice) {
                    Ok(feedback) => QuizEvent::Feedback(feedback),
                    Err(err) => QuizEvent::Rejected(err),
                };
                events.send(event).await.is_ok()
            }
            QuizIntent::FeedbackWindowElapsed => self.advance(events).await,
            QuizIntent::Home => {
                self.controller.reset();
                events.send(QuizEvent::Home).await.is_ok() && self.emit_history(events).await
            }
            QuizIntent::ShowHistory => self.emit_history(events).await,
            QuizIntent::ReloadQuestions => {
                let event = match self.controller.reload_questions().await {
                    Ok(count) => QuizEvent::QuestionsLoaded { count },
                    Err(err) => QuizEvent::LoadFailed {
                        reason: err.to_string(),
                    },
                };
                events.send(event).await.is_ok()
            }
        }
    }

    async fn advance(&mut self, events: &mpsc::Sender<QuizEvent>) -> bool {
        match self.controller.advance().await {
            Ok(StepOutcome::Next(view)) => events.send(QuizEvent::Question(view)).await.is_ok(),
            Ok(StepOutcome::Finished(summary)) => {
                events.send(QuizEvent::Finished(summary)).await.is_ok()
                    && self.emit_history(events).await
            }
            Err(err) => events.send(QuizEvent::Rejected(err)).await.is_ok(),
        }
    }

    async fn emit_history(&self, events: &mpsc::Sender<QuizEvent>) -> bool {
        let items = self.controller.history().list_items().await;
        events.send(QuizEvent::History(items)).await.is_ok()
    }
}

async fn emit_question(
    shown: Result<QuestionView, SessionError>,
    events: &mpsc::Sender<QuizEvent>,
) -> bool {
    let event = match shown {
        Ok(view) => QuizEvent::Question(view),
        Err(err) => QuizEvent::Rejected(err),
    };
    events.send(event).await.is_ok()
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => sleep_until(at).await,
        None => std::future::pending().await,
    }
}

async fn next_tick(ticker: Option<&mut SessionTicker>) {
    match ticker {
        Some(ticker) => {
            ticker.interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

/// Presentation-side ends of a spawned `QuizSessionLoop`.
pub struct QuizSessionHandle {
    intents: mpsc::Sender<QuizIntent>,
    events: mpsc::Receiver<QuizEvent>,
    task: JoinHandle<QuizController>,
}

impl QuizSessionHandle {
    /// Forward an intent. Returns false once the loop has stopped.
    pub async fn send(&self, intent: QuizIntent) -> bool {
        self.intents.send(intent).await.is_ok()
    }

    /// A sender that can be moved to an input task.
    #[must_use]
    pub fn intents(&self) -> mpsc::Sender<QuizIntent> {
        self.intents.clone()
    }

    pub async fn next_event(&mut self) -> Option<QuizEvent> {
        self.events.recv().await
    }

    /// An event that is already queued, without waiting.
    pub fn try_next_event(&mut self) -> Option<QuizEvent> {
        self.events.try_recv().ok()
    }

    /// Stop the loop and take back its controller.
    ///
    /// Senders handed out by `intents` must be dropped first, or the loop keeps
    /// waiting for them. Returns `None` if the loop task panicked or was cancelled.
    pub async fn shutdown(self) -> Option<QuizController> {
        let Self {
            intents,
            events,
            task,
        } = self;
        drop(intents);
        drop(events);
        task.await.ok()
    }
}
