use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::compute::{ComputeClient, EmissionResult};
use crate::errors::{ComputeError, InputError, QuizError, Result};

use super::answers::{AnswerMap, TRANSPORT_KEY};
use super::question::{default_questions, Question};
use super::transport::TransportMode;

/// Lifecycle of a quiz run.
#[derive(Debug, Clone, PartialEq)]
pub enum WizardState {
    /// Waiting for the answer to the question at this index.
    Asking(usize),
    /// Every question is answered; the compute call is pending or in flight.
    Submitting,
    Done(EmissionResult),
    Failed(ComputeError),
}

/// Outcome of an accepted answer.
#[derive(Debug, Clone, PartialEq)]
pub struct Submitted {
    pub key: &'static str,
    pub stored: f64,
    pub transport: Option<TransportMode>,
    /// True when this was the last question.
    pub complete: bool,
}

/// Owns the question catalogue, the current position and the answer map.
#[derive(Debug, Clone)]
pub struct WizardController {
    questions: Vec<Question>,
    answers: AnswerMap,
    state: WizardState,
}

impl Default for WizardController {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardController {
    /// Controller over the standard catalogue.
    pub fn new() -> Self {
        Self {
            questions: default_questions(),
            answers: AnswerMap::new(),
            state: WizardState::Asking(0),
        }
    }

    /// Controller over a custom catalogue. Keys must be unique and must not
    /// collide with the transport key.
    pub fn with_questions(questions: Vec<Question>) -> Result<Self> {
        if questions.is_empty() {
            return Err(QuizError::EmptyCatalogue);
        }
        let mut seen = HashSet::new();
        for question in &questions {
            if question.key == TRANSPORT_KEY || !seen.insert(question.key) {
                return Err(QuizError::InvalidQuestionKey(question.key.to_string()));
            }
        }
        Ok(Self {
            questions,
            answers: AnswerMap::new(),
            state: WizardState::Asking(0),
        })
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    /// Index of the active question, if the wizard is asking.
    pub fn index(&self) -> Option<usize> {
        match self.state {
            WizardState::Asking(index) => Some(index),
            _ => None,
        }
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.index().and_then(|index| self.questions.get(index))
    }

    pub fn result(&self) -> Option<&EmissionResult> {
        match &self.state {
            WizardState::Done(result) => Some(result),
            _ => None,
        }
    }

    /// True when the compute call may be issued (first attempt or retry).
    pub fn can_submit(&self) -> bool {
        match &self.state {
            WizardState::Submitting => true,
            WizardState::Failed(err) => err.is_retryable(),
            _ => false,
        }
    }

    /// Validates and stores an answer for the active question.
    ///
    /// `transport` is only consulted for the distance question and defaults
    /// to [`TransportMode::Car`]. Rejected input leaves state untouched.
    pub fn submit(
        &mut self,
        raw: &str,
        transport: Option<TransportMode>,
    ) -> std::result::Result<Submitted, InputError> {
        let WizardState::Asking(index) = self.state else {
            return Err(InputError::NotAsking);
        };
        let question = self.questions.get(index).ok_or(InputError::NotAsking)?;
        let value = parse_answer(raw)?;

        let stored = question.project(value);
        if !stored.is_finite() {
            return Err(InputError::NotNonNegative(raw.trim().to_string()));
        }
        let key = question.key;
        let transport = question
            .is_distance()
            .then(|| transport.unwrap_or_default());

        self.answers.insert(key, stored);
        if let Some(mode) = transport {
            self.answers.set_transport(mode);
        }

        let next = index + 1;
        let complete = next >= self.questions.len();
        self.state = if complete {
            WizardState::Submitting
        } else {
            WizardState::Asking(next)
        };
        debug!(key, stored, ?transport, next, "answer accepted");

        Ok(Submitted {
            key,
            stored,
            transport,
            complete,
        })
    }

    /// Sends the full answer map to the compute endpoint exactly once and
    /// records the outcome.
    pub async fn submit_answers<C>(&mut self, client: &C) -> Result<()>
    where
        C: ComputeClient + ?Sized,
    {
        match &self.state {
            WizardState::Submitting => {}
            WizardState::Failed(err) if err.is_retryable() => {}
            WizardState::Failed(_) => return Err(QuizError::Halted),
            WizardState::Done(_) => return Err(QuizError::AlreadyComplete),
            WizardState::Asking(_) => return Err(QuizError::Incomplete),
        }
        if !self.answers_complete() {
            return Err(QuizError::Incomplete);
        }

        self.state = WizardState::Submitting;
        info!(answers = self.answers.len(), "submitting answers");

        match client.compute(&self.answers).await {
            Ok(result) => {
                info!(total_tonnes = result.total_tonnes, "emissions computed");
                self.state = WizardState::Done(result);
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "compute call failed");
                self.state = WizardState::Failed(err.clone());
                Err(QuizError::Compute(err))
            }
        }
    }

    /// Returns to the first question with an empty answer map.
    pub fn reset(&mut self) {
        debug!("wizard reset");
        self.answers.clear();
        self.state = WizardState::Asking(0);
    }

    fn answers_complete(&self) -> bool {
        let numeric = self
            .questions
            .iter()
            .all(|question| self.answers.contains(question.key));
        let has_distance = self.questions.iter().any(Question::is_distance);
        numeric
            && self.answers.len() == self.questions.len()
            && has_distance == self.answers.transport().is_some()
    }
}

/// Parses a raw answer, requiring a finite number that is zero or greater.
pub fn parse_answer(raw: &str) -> std::result::Result<f64, InputError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InputError::MissingValue);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(InputError::NotNonNegative(trimmed.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::Amounts;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct StubClient {
        outcome: std::result::Result<EmissionResult, ComputeError>,
        calls: Mutex<Vec<serde_json::Value>>,
    }

    impl StubClient {
        fn new(outcome: std::result::Result<EmissionResult, ComputeError>) -> Self {
            Self {
                outcome,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<serde_json::Value> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ComputeClient for StubClient {
        async fn compute(
            &self,
            answers: &AnswerMap,
        ) -> std::result::Result<EmissionResult, ComputeError> {
            self.calls.lock().unwrap().push(answers.to_json());
            self.outcome.clone()
        }
    }

    fn sample_result() -> EmissionResult {
        EmissionResult {
            total_tonnes: 2.5,
            trees: 14.0,
            compensation: Amounts::from(vec![("Reforestation".to_string(), 100.0)]),
            categories: Amounts::from(vec![
                ("Energy".to_string(), 1500.0),
                ("Transport".to_string(), 1000.0),
            ]),
        }
    }

    fn answer_all(wizard: &mut WizardController) {
        for _ in 0..wizard.questions().len() {
            wizard.submit("1", None).unwrap();
        }
    }

    fn block_on<F: std::future::Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(future)
    }

    #[test]
    fn starts_asking_first_question() {
        let wizard = WizardController::new();
        assert_eq!(wizard.state(), &WizardState::Asking(0));
        assert!(wizard.answers().is_empty());
    }

    #[test]
    fn plain_answer_is_stored_as_is() {
        let mut wizard = WizardController::new();
        let submitted = wizard.submit("100", None).unwrap();
        assert_eq!(submitted.key, "energia");
        assert_eq!(wizard.answers().get("energia"), Some(100.0));
        assert_eq!(wizard.index(), Some(1));
    }

    #[test]
    fn distance_answer_is_annualized_with_transport() {
        let mut wizard = WizardController::new();
        wizard.submit("100", None).unwrap();
        let submitted = wizard.submit("10", Some(TransportMode::Bicycle)).unwrap();
        assert_eq!(submitted.stored, 520.0);
        assert_eq!(wizard.answers().get("km"), Some(520.0));
        assert_eq!(wizard.answers().transport(), Some(TransportMode::Bicycle));
        assert_eq!(wizard.answers().to_json()["type"], "bike");
    }

    #[test]
    fn distance_answer_defaults_to_car() {
        let mut wizard = WizardController::new();
        wizard.submit("0", None).unwrap();
        wizard.submit("3.5", None).unwrap();
        assert_eq!(wizard.answers().transport(), Some(TransportMode::Car));
    }

    #[test]
    fn transport_is_ignored_outside_distance_question() {
        let mut wizard = WizardController::new();
        let submitted = wizard.submit("5", Some(TransportMode::Bus)).unwrap();
        assert_eq!(submitted.transport, None);
        assert_eq!(wizard.answers().transport(), None);
    }

    #[test]
    fn invalid_answers_neither_advance_nor_mutate() {
        let mut wizard = WizardController::new();
        wizard.submit("7", None).unwrap();
        let before = wizard.answers().clone();

        for raw in ["", "   ", "-1", "abc", "NaN", "inf", "-0.5"] {
            let err = wizard.submit(raw, Some(TransportMode::Bus)).unwrap_err();
            if raw.trim().is_empty() {
                assert_eq!(err, InputError::MissingValue);
            } else {
                assert!(matches!(err, InputError::NotNonNegative(_)), "{raw}");
            }
            assert_eq!(wizard.index(), Some(1));
            assert_eq!(wizard.answers(), &before);
        }
    }

    #[test]
    fn answers_that_overflow_when_annualized_are_rejected() {
        let mut wizard = WizardController::new();
        wizard.submit("1", None).unwrap();
        let before = wizard.answers().clone();

        let err = wizard.submit("1e307", Some(TransportMode::Bus)).unwrap_err();
        assert_eq!(err, InputError::NotNonNegative("1e307".into()));
        assert_eq!(wizard.index(), Some(1));
        assert_eq!(wizard.answers(), &before);
        assert_eq!(wizard.answers().transport(), None);

        wizard.submit("1e300", None).unwrap();
        let body = serde_json::to_string(&wizard.answers().to_json()).unwrap();
        assert!(!body.contains("null"), "{body}");
    }

    #[test]
    fn every_valid_answer_advances_by_one() {
        let mut wizard = WizardController::new();
        for (expected, raw) in ["0", "12", "0.25", "3", "1e2"].iter().enumerate() {
            assert_eq!(wizard.index(), Some(expected));
            let submitted = wizard.submit(raw, None).unwrap();
            let question = &wizard.questions()[expected];
            let value: f64 = raw.parse().unwrap();
            assert_eq!(submitted.stored, question.project(value));
        }
        assert_eq!(wizard.state(), &WizardState::Submitting);
        assert_eq!(wizard.answers().len(), 5);
    }

    #[test]
    fn submitting_after_last_question_is_rejected() {
        let mut wizard = WizardController::new();
        answer_all(&mut wizard);
        assert_eq!(wizard.submit("1", None), Err(InputError::NotAsking));
    }

    #[test]
    fn compute_call_sends_full_map_once() {
        let mut wizard = WizardController::new();
        wizard.submit("100", None).unwrap();
        wizard.submit("10", Some(TransportMode::Bicycle)).unwrap();
        wizard.submit("2", None).unwrap();
        wizard.submit("4", None).unwrap();
        wizard.submit("3", None).unwrap();

        let client = StubClient::new(Ok(sample_result()));
        block_on(wizard.submit_answers(&client)).unwrap();

        let calls = client.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0],
            serde_json::json!({
                "energia": 100.0,
                "km": 520.0,
                "type": "bike",
                "carne": 104.0,
                "aviao": 4.0,
                "lixo": 156.0
            })
        );
        assert_eq!(wizard.result(), Some(&sample_result()));
        assert!(matches!(
            block_on(wizard.submit_answers(&client)),
            Err(QuizError::AlreadyComplete)
        ));
        assert_eq!(client.calls().len(), 1);
    }

    #[test]
    fn compute_is_refused_before_last_answer() {
        let mut wizard = WizardController::new();
        wizard.submit("1", None).unwrap();
        let client = StubClient::new(Ok(sample_result()));
        assert!(matches!(
            block_on(wizard.submit_answers(&client)),
            Err(QuizError::Incomplete)
        ));
        assert!(client.calls().is_empty());
    }

    #[test]
    fn connectivity_failure_can_be_retried() {
        let mut wizard = WizardController::new();
        answer_all(&mut wizard);

        let failing = StubClient::new(Err(ComputeError::Status(503)));
        let err = block_on(wizard.submit_answers(&failing)).unwrap_err();
        assert!(matches!(err, QuizError::Compute(ComputeError::Status(503))));
        assert_eq!(wizard.state(), &WizardState::Failed(ComputeError::Status(503)));
        assert!(wizard.result().is_none());
        assert!(wizard.can_submit());

        let working = StubClient::new(Ok(sample_result()));
        block_on(wizard.submit_answers(&working)).unwrap();
        assert!(wizard.result().is_some());
    }

    #[test]
    fn domain_failure_halts_until_reset() {
        let mut wizard = WizardController::new();
        answer_all(&mut wizard);

        let client = StubClient::new(Err(ComputeError::Domain("invalid transport".into())));
        block_on(wizard.submit_answers(&client)).unwrap_err();
        assert!(!wizard.can_submit());
        assert!(matches!(
            block_on(wizard.submit_answers(&client)),
            Err(QuizError::Halted)
        ));
        assert_eq!(client.calls().len(), 1);

        wizard.reset();
        assert_eq!(wizard.state(), &WizardState::Asking(0));
    }

    #[test]
    fn reset_clears_from_any_state() {
        let mut wizard = WizardController::new();
        wizard.submit("1", None).unwrap();
        wizard.submit("2", Some(TransportMode::Walking)).unwrap();
        wizard.reset();
        assert_eq!(wizard.index(), Some(0));
        assert!(wizard.answers().is_empty());

        answer_all(&mut wizard);
        block_on(wizard.submit_answers(&StubClient::new(Ok(sample_result())))).unwrap();
        wizard.reset();
        assert_eq!(wizard.index(), Some(0));
        assert!(wizard.answers().is_empty());
        assert!(wizard.result().is_none());
    }

    #[test]
    fn custom_catalogue_rejects_reserved_and_duplicate_keys() {
        let reserved = vec![Question::new("?", "type?", "type", false)];
        assert!(matches!(
            WizardController::with_questions(reserved),
            Err(QuizError::InvalidQuestionKey(_))
        ));

        let duplicate = vec![
            Question::new("a", "a", "x", false),
            Question::new("b", "b", "x", true),
        ];
        assert!(WizardController::with_questions(duplicate).is_err());
        assert!(matches!(
            WizardController::with_questions(Vec::new()),
            Err(QuizError::EmptyCatalogue)
        ));
    }

    #[test]
    fn catalogue_without_distance_sends_no_type() {
        let questions = vec![Question::new("🍖", "meat", "carne", true)];
        let mut wizard = WizardController::with_questions(questions).unwrap();
        wizard.submit("2", Some(TransportMode::Bus)).unwrap();

        let client = StubClient::new(Ok(sample_result()));
        block_on(wizard.submit_answers(&client)).unwrap();
        assert_eq!(client.calls()[0], serde_json::json!({ "carne": 104.0 }));
    }
}
