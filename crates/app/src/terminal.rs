//! Line-oriented presentation adapter: maps typed commands to intents and
//! renders loop events as text.

use services::{AnswerFeedback, QuestionView, QuizEvent, QuizIntent, QuizSummary};

/// What a typed line asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Intent(QuizIntent),
    /// A blank line: skips the feedback pause, ignored otherwise.
    Blank,
    Help,
    Quit,
    Unknown,
}

pub fn parse_input(line: &str) -> Input {
    match line.trim().to_ascii_lowercase().as_str() {
        "s" | "start" => Input::Intent(QuizIntent::Start),
        "r" | "restart" => Input::Intent(QuizIntent::Restart),
        "n" | "next" => Input::Intent(QuizIntent::FeedbackWindowElapsed),
        "" => Input::Blank,
        "h" | "home" => Input::Intent(QuizIntent::Home),
        "l" | "history" => Input::Intent(QuizIntent::ShowHistory),
        "reload" => Input::Intent(QuizIntent::ReloadQuestions),
        "?" | "help" => Input::Help,
        "q" | "quit" | "exit" => Input::Quit,
        other => match other.parse::<usize>() {
            Ok(n @ 1..=4) => Input::Intent(QuizIntent::AnswerSelected(n - 1)),
            _ => Input::Unknown,
        },
    }
}

pub fn help_lines() -> Vec<String> {
    [
        "Commands:",
        "  s        start a quiz",
        "  1-4      answer the current question",
        "  n, Enter skip the rest of the feedback pause",
        "  r        restart the quiz",
        "  h        back to home",
        "  l        list past scores",
        "  reload   load the questions again",
        "  q        quit",
    ]
    .iter()
    .map(|line| (*line).to_owned())
    .collect()
}

/// Keeps the last timer readout so it can be shown with the next question,
/// and whether feedback is on screen.
#[derive(Debug)]
pub struct Screen {
    timer: String,
    showing_feedback: bool,
}

impl Default for Screen {
    fn default() -> Self {
        Self {
            timer: "0:00".to_owned(),
            showing_feedback: false,
        }
    }
}

impl Screen {
    /// Intent for a typed line given what is on screen; `None` means nothing to send.
    pub fn intent_for(&self, input: Input) -> Option<QuizIntent> {
        match input {
            Input::Intent(intent) => Some(intent),
            Input::Blank if self.showing_feedback => Some(QuizIntent::FeedbackWindowElapsed),
            Input::Blank | Input::Help | Input::Quit | Input::Unknown => None,
        }
    }

    /// Lines to print for `event`; ticks only update the stored readout.
    pub fn render(&mut self, event: &QuizEvent) -> Vec<String> {
        match event {
            QuizEvent::Feedback(_) => self.showing_feedback = true,
            QuizEvent::Question(_) | QuizEvent::Finished(_) | QuizEvent::Home => {
                self.showing_feedback = false;
            }
            _ => {}
        }
        match event {
            QuizEvent::QuestionsLoaded { count } => vec![format!("{count} questions loaded.")],
            QuizEvent::LoadFailed { reason } => vec![
                format!("Could not load the questions: {reason}"),
                "Type 'reload' to try again.".to_owned(),
            ],
            QuizEvent::Question(view) => self.question_lines(view),
            QuizEvent::Feedback(feedback) => feedback_lines(feedback),
            QuizEvent::Tick(tick) => {
                self.timer.clone_from(&tick.readout);
                Vec::new()
            }
            QuizEvent::Finished(summary) => {
                self.timer = "0:00".to_owned();
                summary_lines(summary)
            }
            QuizEvent::Home => {
                self.timer = "0:00".to_owned();
                vec!["Welcome! Type 's' to start a quiz.".to_owned()]
            }
            QuizEvent::History(items) => {
                if items.is_empty() {
                    return vec!["No scores yet.".to_owned()];
                }
                let mut lines = vec!["Past scores:".to_owned()];
                lines.extend(items.iter().map(|item| format!("  {}", item.display_line())));
                lines
            }
            QuizEvent::Rejected(err) => vec![format!("Not now: {err}.")],
        }
    }

    fn question_lines(&self, view: &QuestionView) -> Vec<String> {
        let mut lines = vec![
            String::new(),
            format!(
                "Question {}/{}    {}    Temps : {}",
                view.number(),
                view.total,
                view.score_line(),
                self.timer
            ),
            view.text.clone(),
        ];
        lines.extend(
            view.choices
                .iter()
                .enumerate()
                .map(|(i, choice)| format!("  {}. {choice}", i + 1)),
        );
        lines
    }
}

fn feedback_lines(feedback: &AnswerFeedback) -> Vec<String> {
    let mut lines = vec![feedback.message().to_owned()];
    if !feedback.is_correct {
        lines.push(format!("The answer was: {}", feedback.correct_choice));
    }
    lines
}

fn summary_lines(summary: &QuizSummary) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        summary.score_line(),
        summary.duration_line(),
        summary.message().to_owned(),
    ];
    if !summary.history_saved {
        lines.push("(This score could not be saved.)".to_owned());
    }
    lines.push(String::new());
    lines.extend(summary.resume_lines());
    lines.push(String::new());
    lines.push("Type 'r' to play again or 'h' for home.".to_owned());
    lines
}
