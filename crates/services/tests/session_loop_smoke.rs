use std::sync::Arc;
use std::time::Duration;

use quiz_core::model::{Question, QuizSettings};
use quiz_core::time::fixed_now;
use services::{
    Clock, HistoryService, QuestionBank, QuestionView, QuizController, QuizEvent, QuizIntent,
    QuizSessionHandle, QuizSessionLoop, SessionError, SessionPhase,
};
use storage::repository::InMemoryRepository;

fn build_question(id: usize) -> Question {
    Question::new(
        format!("Q{id}"),
        vec![
            format!("wrong{id}a"),
            format!("right{id}"),
            format!("wrong{id}b"),
            format!("wrong{id}c"),
        ],
        &format!("right{id}"),
    )
    .unwrap()
}

async fn spawn_loop(pool: usize, settings: QuizSettings) -> (QuizSessionHandle, HistoryService) {
    let questions = (0..pool).map(build_question).collect();
    let mut bank = QuestionBank::new(Arc::new(InMemoryRepository::with_questions(questions)));
    bank.load().await.unwrap();
    let history = HistoryService::in_memory();

    let controller = QuizController::new(bank, history.clone())
        .with_settings(settings)
        .with_clock(Clock::fixed(fixed_now()))
        .with_seed(42);
    (QuizSessionLoop::new(controller).spawn(), history)
}

fn right_choice(view: &QuestionView) -> usize {
    view.choices
        .iter()
        .position(|c| c.starts_with("right"))
        .unwrap()
}

async fn expect_question(handle: &mut QuizSessionHandle) -> QuestionView {
    match handle.next_event().await {
        Some(QuizEvent::Question(view)) => view,
        other => panic!("expected question, got {other:?}"),
    }
}

/// Settings whose readout never fires within a test.
fn quiet_ticks(feedback_delay_ms: u64) -> QuizSettings {
    QuizSettings::new(10, feedback_delay_ms, 3_600_000).unwrap()
}

#[tokio::test(start_paused = true)]
async fn full_session_finishes_and_persists_history() {
    let (mut handle, history) = spawn_loop(15, quiet_ticks(3_600_000)).await;

    assert!(handle.send(QuizIntent::Start).await);
    let mut view = expect_question(&mut handle).await;

    for i in 0..10 {
        assert_eq!(view.index, i);
        assert!(handle.send(QuizIntent::AnswerSelected(right_choice(&view))).await);
        match handle.next_event().await {
            Some(QuizEvent::Feedback(feedback)) => assert!(feedback.is_correct),
            other => panic!("expected feedback, got {other:?}"),
        }
        assert!(handle.send(QuizIntent::FeedbackWindowElapsed).await);
        if i < 9 {
            view = expect_question(&mut handle).await;
        }
    }

    match handle.next_event().await {
        Some(QuizEvent::Finished(summary)) => {
            assert_eq!(summary.score, 10);
            assert_eq!(summary.resume.len(), 10);
            assert!(summary.history_saved);
        }
        other => panic!("expected summary, got {other:?}"),
    }
    match handle.next_event().await {
        Some(QuizEvent::History(items)) => {
            assert_eq!(items.len(), 1);
            assert_eq!(items[0].score, "10 /10");
        }
        other => panic!("expected history, got {other:?}"),
    }

    assert_eq!(history.load_all().await.len(), 1);
    let controller = handle.shutdown().await.unwrap();
    assert_eq!(controller.phase(), SessionPhase::Finished);
}

#[tokio::test(start_paused = true)]
async fn feedback_window_advances_after_delay() {
    let (mut handle, _history) = spawn_loop(10, quiet_ticks(1_500)).await;

    handle.send(QuizIntent::Start).await;
    let view = expect_question(&mut handle).await;
    handle.send(QuizIntent::AnswerSelected(right_choice(&view))).await;
    assert!(matches!(
        handle.next_event().await,
        Some(QuizEvent::Feedback(_))
    ));

    let answered_at = tokio::time::Instant::now();
    let next = expect_question(&mut handle).await;

    assert_eq!(next.index, 1);
    assert_eq!(next.score, 1);
    assert!(answered_at.elapsed() >= Duration::from_millis(1_500));
}

#[tokio::test(start_paused = true)]
async fn second_answer_during_feedback_is_rejected() {
    let (mut handle, _history) = spawn_loop(10, quiet_ticks(1_500)).await;

    handle.send(QuizIntent::Start).await;
    let view = expect_question(&mut handle).await;
    handle.send(QuizIntent::AnswerSelected(right_choice(&view))).await;
    handle.send(QuizIntent::AnswerSelected(right_choice(&view))).await;

    assert!(matches!(
        handle.next_event().await,
        Some(QuizEvent::Feedback(_))
    ));
    assert!(matches!(
        handle.next_event().await,
        Some(QuizEvent::Rejected(SessionError::InvalidState { .. }))
    ));
    let next = expect_question(&mut handle).await;
    assert_eq!(next.score, 1);
}

#[tokio::test(start_paused = true)]
async fn home_stops_ticks() {
    let (mut handle, _history) = spawn_loop(10, QuizSettings::default()).await;

    handle.send(QuizIntent::Start).await;
    expect_question(&mut handle).await;

    match handle.next_event().await {
        Some(QuizEvent::Tick(tick)) => assert_eq!(tick.readout, "0:00"),
        other => panic!("expected tick, got {other:?}"),
    }

    handle.send(QuizIntent::Home).await;
    assert_eq!(handle.next_event().await, Some(QuizEvent::Home));
    assert!(matches!(
        handle.next_event().await,
        Some(QuizEvent::History(_))
    ));

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(handle.try_next_event(), None);

    let controller = handle.shutdown().await.unwrap();
    assert_eq!(controller.phase(), SessionPhase::Idle);
    assert!(controller.answer_log().is_empty());
}

#[tokio::test(start_paused = true)]
async fn restart_cancels_pending_feedback() {
    let (mut handle, _history) = spawn_loop(10, quiet_ticks(1_500)).await;

    handle.send(QuizIntent::Start).await;
    let view = expect_question(&mut handle).await;
    handle.send(QuizIntent::AnswerSelected(right_choice(&view))).await;
    assert!(matches!(
        handle.next_event().await,
        Some(QuizEvent::Feedback(_))
    ));

    handle.send(QuizIntent::Restart).await;
    let fresh = expect_question(&mut handle).await;
    assert_eq!(fresh.index, 0);
    assert_eq!(fresh.score, 0);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(handle.try_next_event(), None);

    let controller = handle.shutdown().await.unwrap();
    assert_eq!(controller.phase(), SessionPhase::AwaitingAnswer(0));
}

#[tokio::test(start_paused = true)]
async fn empty_pool_rejects_start() {
    let (mut handle, _history) = spawn_loop(0, QuizSettings::default()).await;

    handle.send(QuizIntent::Start).await;
    assert_eq!(
        handle.next_event().await,
        Some(QuizEvent::Rejected(SessionError::NoQuestionsAvailable))
    );

    handle.send(QuizIntent::ReloadQuestions).await;
    assert_eq!(
        handle.next_event().await,
        Some(QuizEvent::QuestionsLoaded { count: 0 })
    );
}

#[tokio::test(start_paused = true)]
async fn restart_after_finish_resumes_ticks() {
    let settings = QuizSettings::new(1, 3_600_000, 1_000).unwrap();
    let (mut handle, history) = spawn_loop(5, settings).await;

    handle.send(QuizIntent::Start).await;
    let view = expect_question(&mut handle).await;
    handle.send(QuizIntent::AnswerSelected(right_choice(&view))).await;
    assert!(matches!(
        handle.next_event().await,
        Some(QuizEvent::Feedback(_))
    ));
    handle.send(QuizIntent::FeedbackWindowElapsed).await;
    assert!(matches!(
        handle.next_event().await,
        Some(QuizEvent::Finished(_))
    ));
    assert!(matches!(
        handle.next_event().await,
        Some(QuizEvent::History(_))
    ));

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(handle.try_next_event(), None);

    handle.send(QuizIntent::Restart).await;
    let fresh = expect_question(&mut handle).await;
    assert_eq!(fresh.index, 0);
    assert_eq!(fresh.score, 0);
    assert!(matches!(
        handle.next_event().await,
        Some(QuizEvent::Tick(_))
    ));

    assert_eq!(history.load_all().await.len(), 1);
    let controller = handle.shutdown().await.unwrap();
    assert_eq!(controller.phase(), SessionPhase::AwaitingAnswer(0));
    assert!(controller.answer_log().is_empty());
}
