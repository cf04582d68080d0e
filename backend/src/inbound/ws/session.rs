//! Per-connection WebSocket handler.
//!
//! Keeps WebSocket framing and heartbeats at the edge while the study and
//! quiz engines hold the per-connection state. The public WebSocket contract
//! pings every 5s and considers a connection idle after 10s without client
//! traffic. Tests shorten these intervals to speed up feedback; adjust the
//! constants below if SLAs change so clients and intermediaries stay aligned.

use std::time::{Duration, Instant};

use actix_ws::{CloseCode, CloseReason, Closed, Message, MessageStream, ProtocolError, Session};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tokio::time;
use tracing::warn;

use crate::domain::ports::{ListWordsRequest, SetRememberedRequest};
use crate::domain::quiz::{QuizEngine, QuizStartError};
use crate::domain::study::{Direction, StudySession};
use crate::domain::{Error, UserId, Word, WordId, WordSetId};
use crate::inbound::ws::messages::{ClientMessage, QuizOption, ServerMessage};
use crate::inbound::ws::state::WsState;

/// Time between heartbeats to the client (5s in production, shorter in tests).
#[cfg(not(test))]
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
#[cfg(test)]
const HEARTBEAT_INTERVAL: Duration = Duration::from_millis(50);

/// Max idle time before disconnecting the client (10s in production, shorter in tests).
#[cfg(not(test))]
const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);
#[cfg(test)]
const CLIENT_TIMEOUT: Duration = Duration::from_millis(100);

/// How long the answer highlight stays on screen before the next question.
#[cfg(not(test))]
const ANSWER_DISPLAY_DELAY: Duration = Duration::from_millis(1500);
#[cfg(test)]
const ANSWER_DISPLAY_DELAY: Duration = Duration::from_millis(10);

pub(super) async fn handle_ws_session(
    state: WsState,
    user_id: UserId,
    mut session: Session,
    stream: MessageStream,
) {
    let mut handler = WsSession::new(state, user_id);

    // Load the deck eagerly so the first frame the client sees is a card.
    match handler.load_deck().await {
        Ok(deck) => handler.study.replace_deck(deck),
        Err(error) => {
            warn!(error = %error, "failed to load deck on connect");
            if handler.send_error(&mut session, error).await.is_err() {
                return;
            }
        }
    }
    if handler.send_snapshot(&mut session).await.is_err() {
        return;
    }

    handler.run(session, stream).await;
}

enum SessionError {
    ClientClosed(Option<CloseReason>),
    StreamClosed,
    HeartbeatTimeout,
    Protocol(ProtocolError),
    InvalidPayload,
    Network(Closed),
}

enum CloseAction {
    None,
    Close(Option<CloseReason>),
}

struct WsSession {
    state: WsState,
    user_id: UserId,
    selected_set: Option<WordSetId>,
    study: StudySession<SmallRng>,
    quiz: Option<QuizEngine<SmallRng>>,
}

impl WsSession {
    fn new(state: WsState, user_id: UserId) -> Self {
        Self {
            state,
            user_id,
            selected_set: None,
            study: StudySession::new(Vec::new(), SmallRng::from_entropy()),
            quiz: None,
        }
    }

    async fn run(&mut self, mut session: Session, mut stream: MessageStream) {
        let mut last_heartbeat = Instant::now();
        let mut heartbeat = time::interval(HEARTBEAT_INTERVAL);

        loop {
            let result = tokio::select! {
                _ = heartbeat.tick() => {
                    Self::handle_heartbeat_tick(&mut session, &last_heartbeat).await
                }
                message = stream.recv() => {
                    self.handle_stream_message(&mut session, &mut last_heartbeat, message)
                        .await
                }
            };

            if let Err(error) = result {
                Self::log_shutdown_reason(&error);
                let close_action = Self::close_action_for(&error);
                Self::close_session_if_needed(session, close_action).await;
                return;
            }
        }
    }

    async fn handle_heartbeat_tick(
        session: &mut Session,
        last_heartbeat: &Instant,
    ) -> Result<(), SessionError> {
        if Instant::now().duration_since(*last_heartbeat) > CLIENT_TIMEOUT {
            return Err(SessionError::HeartbeatTimeout);
        }

        session.ping(b"").await.map_err(SessionError::Network)
    }

    async fn handle_stream_message(
        &mut self,
        session: &mut Session,
        last_heartbeat: &mut Instant,
        message: Option<Result<Message, ProtocolError>>,
    ) -> Result<(), SessionError> {
        let Some(message) = message else {
            return Err(SessionError::StreamClosed);
        };

        match message {
            Ok(message) => self.handle_message(session, last_heartbeat, message).await,
            Err(error) => Err(SessionError::Protocol(error)),
        }
    }

    async fn handle_message(
        &mut self,
        session: &mut Session,
        last_heartbeat: &mut Instant,
        message: Message,
    ) -> Result<(), SessionError> {
        match message {
            Message::Ping(payload) => {
                *last_heartbeat = Instant::now();
                session
                    .pong(&payload)
                    .await
                    .map_err(SessionError::Network)?;
                Ok(())
            }
            Message::Text(text) => {
                *last_heartbeat = Instant::now();
                self.handle_text_message(session, text.as_ref()).await
            }
            Message::Pong(_) | Message::Binary(_) | Message::Continuation(_) | Message::Nop => {
                *last_heartbeat = Instant::now();
                Ok(())
            }
            Message::Close(reason) => Err(SessionError::ClientClosed(reason)),
        }
    }

    async fn handle_text_message(
        &mut self,
        session: &mut Session,
        text: &str,
    ) -> Result<(), SessionError> {
        let command = match serde_json::from_str::<ClientMessage>(text) {
            Ok(command) => command,
            Err(error) => {
                warn!(error = %error, "rejected malformed frame");
                return Err(SessionError::InvalidPayload);
            }
        };

        self.handle_command(session, command).await
    }

    async fn handle_command(
        &mut self,
        session: &mut Session,
        command: ClientMessage,
    ) -> Result<(), SessionError> {
        match command {
            ClientMessage::SelectSet { word_set } => {
                self.selected_set = word_set.map(WordSetId::from_uuid);
                self.quiz = None;
                self.reload_deck(session).await
            }
            ClientMessage::SetFilter { filter } => {
                self.study.set_filter(filter);
                self.send_snapshot(session).await
            }
            ClientMessage::SetOrder { order } => {
                self.study.set_order(order);
                self.send_snapshot(session).await
            }
            ClientMessage::Next => {
                self.study.advance(Direction::Next);
                self.send_snapshot(session).await
            }
            ClientMessage::Prev => {
                self.study.advance(Direction::Prev);
                self.send_snapshot(session).await
            }
            ClientMessage::Flip => {
                self.study.flip();
                self.send_snapshot(session).await
            }
            ClientMessage::Swipe { delta } => {
                self.study.swipe(delta);
                self.send_snapshot(session).await
            }
            ClientMessage::MarkRemembered => self.mark_remembered(session).await,
            ClientMessage::Pronounce => {
                self.pronounce().await;
                Ok(())
            }
            ClientMessage::Refresh => self.reload_deck(session).await,
            ClientMessage::StartQuiz { word_sets } => self.start_quiz(session, word_sets).await,
            ClientMessage::AnswerQuiz { word_id } => {
                self.answer_quiz(session, WordId::from_uuid(word_id)).await
            }
            ClientMessage::RestartQuiz => {
                if let Some(engine) = self.quiz.as_mut() {
                    engine.restart();
                }
                self.send_snapshot(session).await
            }
            ClientMessage::EndQuiz => {
                self.quiz = None;
                self.send_snapshot(session).await
            }
        }
    }

    async fn load_deck(&self) -> Result<Vec<Word>, Error> {
        let response = self
            .state
            .query
            .list_words(ListWordsRequest {
                user_id: self.user_id,
                word_set: self.selected_set,
            })
            .await?;
        Ok(response
            .words
            .into_iter()
            .map(|populated| populated.word)
            .collect())
    }

    async fn reload_deck(&mut self, session: &mut Session) -> Result<(), SessionError> {
        match self.load_deck().await {
            Ok(deck) => self.study.replace_deck(deck),
            Err(error) => {
                warn!(error = %error, "failed to reload deck");
                self.send_error(session, error)
                    .await
                    .map_err(SessionError::Network)?;
            }
        }
        self.send_snapshot(session).await
    }

    /// Toggle the current card and persist the new flag.
    ///
    /// The local state is already updated when persistence fails; the next
    /// refresh reconciles, so the failure is logged rather than surfaced.
    async fn mark_remembered(&mut self, session: &mut Session) -> Result<(), SessionError> {
        if let Some(update) = self.study.mark_remembered() {
            let result = self
                .state
                .command
                .set_remembered(SetRememberedRequest {
                    user_id: self.user_id,
                    word_id: update.word_id,
                    remembered: update.remembered,
                })
                .await;
            if let Err(error) = result {
                warn!(
                    word_id = %update.word_id,
                    error = %error,
                    "failed to persist remembered flag"
                );
            }
        }
        self.send_snapshot(session).await
    }

    async fn pronounce(&self) {
        let Some(word) = self.study.current() else {
            return;
        };
        if let Err(error) = self.state.speech.speak(&word.english, "en-US").await {
            warn!(error = %error, "pronunciation unavailable");
        }
    }

    async fn start_quiz(
        &mut self,
        session: &mut Session,
        word_sets: Vec<uuid::Uuid>,
    ) -> Result<(), SessionError> {
        let pool = match self.load_quiz_pool(&word_sets).await {
            Ok(pool) => pool,
            Err(error) => {
                warn!(error = %error, "failed to load quiz pool");
                return self
                    .send_error(session, error)
                    .await
                    .map_err(SessionError::Network);
            }
        };

        match QuizEngine::start(pool, SmallRng::from_entropy()) {
            Ok(engine) => {
                self.quiz = Some(engine);
                self.send_snapshot(session).await
            }
            Err(QuizStartError::NotEnoughWords {
                available,
                required,
            }) => self
                .send_json(
                    session,
                    &ServerMessage::QuizRejected {
                        available,
                        required,
                    },
                )
                .await
                .map_err(SessionError::Network),
        }
    }

    /// Quiz pools span whole sets regardless of remembered state.
    async fn load_quiz_pool(&self, word_sets: &[uuid::Uuid]) -> Result<Vec<Word>, Error> {
        let response = self
            .state
            .query
            .list_words(ListWordsRequest {
                user_id: self.user_id,
                word_set: None,
            })
            .await?;
        let selected: Vec<WordSetId> = word_sets.iter().copied().map(WordSetId::from_uuid).collect();
        Ok(response
            .words
            .into_iter()
            .map(|populated| populated.word)
            .filter(|word| selected.is_empty() || selected.contains(&word.word_set))
            .collect())
    }

    async fn answer_quiz(
        &mut self,
        session: &mut Session,
        selected: WordId,
    ) -> Result<(), SessionError> {
        let Some(engine) = self.quiz.as_mut() else {
            return Ok(());
        };
        let Some(outcome) = engine.answer(selected) else {
            return Ok(());
        };
        let score = engine.score();

        self.send_json(
            session,
            &ServerMessage::QuizAnswer {
                correct: outcome.correct,
                correct_word_id: *outcome.correct_word_id.as_uuid(),
                score_correct: score.correct,
                score_answered: score.answered,
            },
        )
        .await
        .map_err(SessionError::Network)?;

        // Leave the highlighted answer on screen before moving on.
        time::sleep(ANSWER_DISPLAY_DELAY).await;

        if let Some(engine) = self.quiz.as_mut() {
            engine.advance();
        }
        self.send_snapshot(session).await
    }

    /// Send the frame describing what the client should currently show.
    async fn send_snapshot(&mut self, session: &mut Session) -> Result<(), SessionError> {
        let frame = self.snapshot();
        self.send_json(session, &frame)
            .await
            .map_err(SessionError::Network)
    }

    fn snapshot(&self) -> ServerMessage {
        if let Some(engine) = self.quiz.as_ref() {
            return Self::quiz_frame(engine);
        }
        match self.study.current() {
            Some(word) => ServerMessage::Card {
                word: word.clone(),
                face: self.study.face(),
                position: self.study.position(),
                total: self.study.total(),
            },
            None => ServerMessage::NothingToStudy,
        }
    }

    fn quiz_frame(engine: &QuizEngine<SmallRng>) -> ServerMessage {
        match engine.current_question() {
            Some(question) => ServerMessage::QuizQuestion {
                prompt: question.english.clone(),
                options: engine
                    .options()
                    .iter()
                    .map(|word| QuizOption {
                        word_id: *word.id.as_uuid(),
                        vietnamese: word.vietnamese.clone(),
                    })
                    .collect(),
                index: engine.index(),
                total: engine.total(),
            },
            None => {
                let score = engine.score();
                ServerMessage::QuizFinished {
                    correct: score.correct,
                    answered: score.answered,
                }
            }
        }
    }

    async fn send_error(&self, session: &mut Session, error: Error) -> Result<(), Closed> {
        self.send_json(session, &ServerMessage::Error { error })
            .await
    }

    async fn send_json<T: serde::Serialize>(
        &self,
        session: &mut Session,
        payload: &T,
    ) -> Result<(), Closed> {
        match serde_json::to_string(payload) {
            Ok(body) => session.text(body).await,
            Err(error) => {
                // Debug builds fail fast on schema drift; release keeps the connection alive.
                if cfg!(debug_assertions) {
                    panic!("server frames must serialize: {error}");
                } else {
                    warn!(error = %error, "failed to serialize server frame");
                }
                Ok(())
            }
        }
    }

    fn log_shutdown_reason(error: &SessionError) {
        match error {
            SessionError::HeartbeatTimeout => {
                warn!("client missed heartbeats; closing connection");
            }
            SessionError::Protocol(error) => {
                warn!(error = %error, "closing after WebSocket protocol error");
            }
            SessionError::Network(error) => {
                warn!(error = %error, "send failed; dropping connection");
            }
            SessionError::InvalidPayload
            | SessionError::ClientClosed(_)
            | SessionError::StreamClosed => {}
        }
    }

    fn close_action_for(error: &SessionError) -> CloseAction {
        match error {
            SessionError::HeartbeatTimeout => CloseAction::Close(Some(CloseReason {
                code: CloseCode::Normal,
                description: Some("heartbeat timeout".to_owned()),
            })),
            SessionError::Protocol(_) => CloseAction::Close(Some(CloseReason {
                code: CloseCode::Protocol,
                description: Some("protocol error".to_owned()),
            })),
            SessionError::InvalidPayload => CloseAction::Close(Some(CloseReason {
                code: CloseCode::Policy,
                description: Some("invalid payload".to_owned()),
            })),
            SessionError::ClientClosed(reason) => CloseAction::Close(reason.clone()),
            SessionError::StreamClosed | SessionError::Network(_) => CloseAction::None,
        }
    }

    async fn close_session_if_needed(session: Session, close_action: CloseAction) {
        if let CloseAction::Close(reason) = close_action {
            if let Err(error) = session.close(reason).await {
                warn!(error = %error, "failed to close WebSocket session");
            }
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
