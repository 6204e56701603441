use std::fmt;

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;

use quiz_core::model::{AnswerLogEntry, HistoryEntry, Question, QuizSettings, ScoreBand};
use quiz_core::Clock;

use super::plan::select_session;
use super::progress::{AnswerFeedback, QuestionView, SessionPhase, SessionProgress};
use super::summary::QuizSummary;
use super::timer::{SessionTimer, TimerTick};
use super::view::HistoryService;
use crate::error::{LoadError, SessionError};
use crate::question_bank::QuestionBank;

//
// ─── SESSION STATE ─────────────────────────────────────────────────────────────
//

/// Everything that lives only as long as one session.
struct SessionState {
    questions: Vec<Question>,
    score: u32,
    answer_log: Vec<AnswerLogEntry>,
    timer: SessionTimer,
}

impl SessionState {
    fn total(&self) -> u32 {
        u32::try_from(self.questions.len()).unwrap_or(u32::MAX)
    }

    fn view(&self, index: usize) -> QuestionView {
        QuestionView::new(index, self.questions.len(), &self.questions[index], self.score)
    }
}

/// Result of leaving the feedback window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The next question is now awaiting an answer.
    Next(QuestionView),
    /// That was the last question.
    Finished(QuizSummary),
}

//
// ─── CONTROLLER ────────────────────────────────────────────────────────────────
//

/// Owns and drives a single quiz session.
///
/// `Idle -> AwaitingAnswer(0) -> ShowingFeedback(0) -> AwaitingAnswer(1) -> ... -> Finished`.
/// Every operation called in the wrong phase returns `SessionError::InvalidState`
/// and leaves the session untouched.
pub struct QuizController {
    settings: QuizSettings,
    clock: Clock,
    rng: StdRng,
    bank: QuestionBank,
    history: HistoryService,
    phase: SessionPhase,
    session: Option<SessionState>,
    session_id: u64,
    summary: Option<QuizSummary>,
}

impl QuizController {
    #[must_use]
    pub fn new(bank: QuestionBank, history: HistoryService) -> Self {
        Self {
            settings: QuizSettings::default(),
            clock: Clock::default_clock(),
            rng: StdRng::seed_from_u64(rand::random()),
            bank,
            history,
            phase: SessionPhase::Idle,
            session: None,
            session_id: 0,
            summary: None,
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: QuizSettings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Use a deterministic shuffle.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    #[must_use]
    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    #[must_use]
    pub fn history(&self) -> &HistoryService {
        &self.history
    }

    #[must_use]
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Retry loading the question pool.
    ///
    /// A running session keeps the questions it drew; the new pool applies
    /// from the next `start`.
    ///
    /// # Errors
    ///
    /// Returns `LoadError` if the pool cannot be loaded; the pool is then empty.
    pub async fn reload_questions(&mut self) -> Result<usize, LoadError> {
        self.bank.load().await
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Identifier of the current session; changes on every `start`.
    #[must_use]
    pub fn session_id(&self) -> u64 {
        self.session_id
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.session.as_ref().map_or(0, |s| s.score)
    }

    #[must_use]
    pub fn answer_log(&self) -> &[AnswerLogEntry] {
        self.session.as_ref().map_or(&[], |s| s.answer_log.as_slice())
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.session.as_ref().map(|s| s.timer.started_at())
    }

    #[must_use]
    pub fn summary(&self) -> Option<&QuizSummary> {
        self.summary.as_ref()
    }

    #[must_use]
    pub fn progress(&self) -> Option<SessionProgress> {
        let session = self.session.as_ref()?;
        let total = session.questions.len();
        let answered = session.answer_log.len();
        Some(SessionProgress {
            total,
            answered,
            remaining: total.saturating_sub(answered),
            is_complete: self.phase == SessionPhase::Finished,
        })
    }

    /// The question awaiting an answer, or being shown with its feedback.
    #[must_use]
    pub fn current_question(&self) -> Option<QuestionView> {
        let index = match self.phase {
            SessionPhase::AwaitingAnswer(i) | SessionPhase::ShowingFeedback(i) => i,
            SessionPhase::Idle | SessionPhase::Finished => return None,
        };
        let session = self.session.as_ref()?;
        Some(session.view(index))
    }

    #[must_use]
    pub fn timer_running(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.timer.is_running())
    }

    /// Current readout without advancing the tick high-water mark.
    #[must_use]
    pub fn timer_readout(&self) -> Option<TimerTick> {
        let session = self.session.as_ref()?;
        Some(TimerTick::from_elapsed(session.timer.elapsed(&self.clock)))
    }

    /// Periodic readout; `None` unless the timer is running.
    pub fn tick(&mut self) -> Option<TimerTick> {
        let session = self.session.as_mut()?;
        if !session.timer.is_running() {
            return None;
        }
        Some(session.timer.tick(&self.clock))
    }

    /// Start a new session from `Idle`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` outside `Idle` and
    /// `SessionError::NoQuestionsAvailable` when the pool is empty.
    pub fn start(&mut self) -> Result<QuestionView, SessionError> {
        if self.phase != SessionPhase::Idle {
            return Err(self.invalid("start"));
        }
        if self.bank.is_empty() {
            return Err(SessionError::NoQuestionsAvailable);
        }

        let size = usize::try_from(self.settings.session_size()).unwrap_or(usize::MAX);
        let questions = select_session(self.bank.questions(), size, &mut self.rng);
        if questions.len() < size {
            tracing::info!(
                available = questions.len(),
                requested = size,
                "question pool is small, shortening session"
            );
        }

        let session = SessionState {
            answer_log: Vec::with_capacity(questions.len()),
            questions,
            score: 0,
            timer: SessionTimer::start(&self.clock),
        };
        self.session_id = self.session_id.wrapping_add(1);
        self.summary = None;
        self.phase = SessionPhase::AwaitingAnswer(0);

        let view = session.view(0);
        tracing::info!(
            session_id = self.session_id,
            total = session.questions.len(),
            "quiz session started"
        );
        self.session = Some(session);
        Ok(view)
    }

    /// Reset from any phase, then start.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoQuestionsAvailable` when the pool is empty.
    pub fn restart(&mut self) -> Result<QuestionView, SessionError> {
        self.reset();
        self.start()
    }

    /// Answer the current question with the choice at `choice_index`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` unless a question awaits an answer,
    /// and `SessionError::InvalidChoice` if `choice_index` names no choice.
    pub fn submit_answer(&mut self, choice_index: usize) -> Result<AnswerFeedback, SessionError> {
        let SessionPhase::AwaitingAnswer(index) = self.phase else {
            return Err(self.invalid("submit an answer"));
        };
        let Some(session) = self.session.as_mut() else {
            return Err(SessionError::InvalidState {
                operation: "submit an answer",
                phase: self.phase,
            });
        };

        let question = &session.questions[index];
        let chosen = question
            .choice(choice_index)
            .ok_or(SessionError::InvalidChoice {
                index: choice_index,
            })?;
        let is_correct = chosen == question.correct_choice();

        let feedback = AnswerFeedback {
            index,
            is_correct,
            chosen_choice: chosen.to_owned(),
            correct_choice: question.correct_choice().to_owned(),
            score: session.score + u32::from(is_correct),
        };
        session.answer_log.push(AnswerLogEntry::new(
            question.text(),
            chosen,
            is_correct,
        ));
        session.score = feedback.score;
        self.phase = SessionPhase::ShowingFeedback(index);

        tracing::debug!(index, is_correct, score = feedback.score, "answer recorded");
        Ok(feedback)
    }

    /// Leave the feedback window: show the next question or finish the session.
    ///
    /// Finishing stops the timer and appends the result to the history. A failed
    /// history write is logged and flagged on the summary; it does not keep the
    /// session from finishing.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` unless feedback is being shown.
    pub async fn advance(&mut self) -> Result<StepOutcome, SessionError> {
        let SessionPhase::ShowingFeedback(index) = self.phase else {
            return Err(self.invalid("advance"));
        };
        let Some(session) = self.session.as_mut() else {
            return Err(SessionError::InvalidState {
                operation: "advance",
                phase: self.phase,
            });
        };

        let next = index + 1;
        if next < session.questions.len() {
            let view = session.view(next);
            self.phase = SessionPhase::AwaitingAnswer(next);
            return Ok(StepOutcome::Next(view));
        }

        let elapsed = session.timer.stop(&self.clock);
        let score = session.score;
        let total = session.total();
        let entry = HistoryEntry::from_result(score, total, elapsed);
        let resume = session.answer_log.clone();
        self.phase = SessionPhase::Finished;

        let history_saved = match self.history.append(&entry).await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(error = %err, "failed to save quiz result to history");
                false
            }
        };

        let summary = QuizSummary {
            score,
            total,
            elapsed,
            band: ScoreBand::for_score(score),
            resume,
            history_entry: entry,
            history_saved,
        };
        tracing::info!(
            session_id = self.session_id,
            score,
            total,
            elapsed = %elapsed,
            "quiz session finished"
        );
        self.summary = Some(summary.clone());
        Ok(StepOutcome::Finished(summary))
    }

    /// Return to `Idle` from any phase, stopping the timer and dropping the session.
    pub fn reset(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.timer.stop(&self.clock);
            tracing::debug!(session_id = self.session_id, "quiz session reset");
        }
        self.summary = None;
        self.phase = SessionPhase::Idle;
    }

    fn invalid(&self, operation: &'static str) -> SessionError {
        SessionError::InvalidState {
            operation,
            phase: self.phase,
        }
    }
}

impl fmt::Debug for QuizController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizController")
            .field("phase", &self.phase)
            .field("session_id", &self.session_id)
            .field("pool_len", &self.bank.len())
            .field("score", &self.score())
            .field("answered", &self.answer_log().len())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
