//! WebSocket session handler tests.

use std::sync::{Arc, Mutex};

use actix_web::dev::ServerHandle;
use actix_web::{App, HttpServer, web};
use async_trait::async_trait;
use awc::ws::{CloseCode as AwcCloseCode, Frame, Message as AwcMessage};
use chrono::Utc;
use futures_util::{SinkExt, StreamExt};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{
    FixtureSpeechSynthesizer, FixtureVocabularyCommand, FixtureVocabularyQuery,
    ListWordSetsRequest, ListWordSetsResponse, ListWordsResponse, MockLoginService,
    VocabularyCommand, VocabularyQuery,
};
use crate::domain::ports::{
    CreateWordSetRequest, DeleteWordRequest, DeleteWordSetRequest, DeleteWordSetResponse,
    IngestWordsRequest, IngestWordsResponse, RenameWordSetRequest, UpdateWordRequest,
};
use crate::domain::{PopulatedWord, User, WordSet};
use crate::inbound::ws;
use crate::inbound::ws::state::WsState;

const FIXTURE_USER_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

fn fixture_user_id() -> UserId {
    UserId::new(FIXTURE_USER_ID).expect("fixture id")
}

fn fixture_word(english: &str, remembered: bool, set_id: WordSetId) -> PopulatedWord {
    let now = Utc::now();
    PopulatedWord {
        word: Word {
            id: WordId::random(),
            english: english.to_owned(),
            phonetic: None,
            type_tag: None,
            vietnamese: format!("nghĩa của {english}"),
            word_set: set_id,
            owner: Some(fixture_user_id()),
            remembered,
            created_at: now,
            updated_at: now,
        },
        word_set_detail: WordSet {
            id: set_id,
            name: "animals".to_owned(),
            owner: Some(fixture_user_id()),
            is_default: false,
            created_at: now,
            updated_at: now,
        },
    }
}

fn fixture_deck(size: usize, remembered: bool) -> Vec<PopulatedWord> {
    let set_id = WordSetId::random();
    (0..size)
        .map(|i| fixture_word(&format!("word-{i}"), remembered, set_id))
        .collect()
}

/// Read-only query double serving a fixed deck.
struct StaticDeck {
    words: Vec<PopulatedWord>,
}

#[async_trait]
impl VocabularyQuery for StaticDeck {
    async fn list_words(&self, _request: ListWordsRequest) -> Result<ListWordsResponse, Error> {
        Ok(ListWordsResponse {
            words: self.words.clone(),
        })
    }

    async fn list_word_sets(
        &self,
        _request: ListWordSetsRequest,
    ) -> Result<ListWordSetsResponse, Error> {
        Ok(ListWordSetsResponse {
            word_sets: Vec::new(),
        })
    }
}

/// Command double recording remembered-flag writes.
#[derive(Default)]
struct RecordingCommand {
    remembered: Mutex<Vec<SetRememberedRequest>>,
}

impl RecordingCommand {
    fn recorded(&self) -> Vec<SetRememberedRequest> {
        self.remembered.lock().expect("lock poisoned").clone()
    }
}

#[async_trait]
impl VocabularyCommand for RecordingCommand {
    async fn ingest_words(
        &self,
        _request: IngestWordsRequest,
    ) -> Result<IngestWordsResponse, Error> {
        unreachable!("not exercised over the socket")
    }

    async fn update_word(&self, _request: UpdateWordRequest) -> Result<Word, Error> {
        unreachable!("not exercised over the socket")
    }

    async fn delete_word(&self, _request: DeleteWordRequest) -> Result<Word, Error> {
        unreachable!("not exercised over the socket")
    }

    async fn set_remembered(&self, request: SetRememberedRequest) -> Result<Word, Error> {
        self.remembered.lock().expect("lock poisoned").push(request);
        Ok(fixture_word("word-0", request.remembered, WordSetId::random()).word)
    }

    async fn create_word_set(&self, _request: CreateWordSetRequest) -> Result<WordSet, Error> {
        unreachable!("not exercised over the socket")
    }

    async fn rename_word_set(&self, _request: RenameWordSetRequest) -> Result<WordSet, Error> {
        unreachable!("not exercised over the socket")
    }

    async fn delete_word_set(
        &self,
        _request: DeleteWordSetRequest,
    ) -> Result<DeleteWordSetResponse, Error> {
        unreachable!("not exercised over the socket")
    }
}

fn spawn_app(
    words: Vec<PopulatedWord>,
    command: Arc<dyn VocabularyCommand>,
) -> (String, ServerHandle) {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");

    let ws_state = web::Data::new(WsState::new(
        Arc::new(StaticDeck { words }),
        command,
        Arc::new(FixtureSpeechSynthesizer),
    ));

    let mut login_service = MockLoginService::new();
    login_service.expect_login().returning(|credentials| {
        Ok(User {
            id: fixture_user_id(),
            email: credentials.email,
            created_at: Utc::now(),
        })
    });
    let http_state = web::Data::new(crate::inbound::http::state::HttpState::new(
        Arc::new(login_service),
        Arc::new(FixtureVocabularyQuery),
        Arc::new(FixtureVocabularyCommand),
    ));

    let server = HttpServer::new(move || {
        App::new()
            .app_data(ws_state.clone())
            .app_data(http_state.clone())
            .wrap(crate::inbound::http::test_utils::test_session_middleware())
            .service(crate::inbound::http::auth::login)
            .service(ws::study_ws)
    })
    .workers(1)
    .listen(listener)
    .expect("bind test server")
    .disable_signals()
    .run();
    let handle = server.handle();
    actix_web::rt::spawn(server);

    (format!("http://{addr}"), handle)
}

async fn login_cookie(base: &str) -> awc::cookie::Cookie<'static> {
    let client = awc::Client::default();
    let response = client
        .post(format!("{base}/auth/login"))
        .send_json(&json!({ "email": "learner@example.com", "password": "secret" }))
        .await
        .expect("login request");
    assert!(response.status().is_success());
    response
        .cookies()
        .expect("cookies parse")
        .iter()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .clone()
        .into_owned()
}

async fn connect(base: &str) -> actix_codec::Framed<awc::BoxedSocket, awc::ws::Codec> {
    let cookie = login_cookie(base).await;
    let (_resp, socket) = awc::Client::default()
        .ws(format!("{base}/ws/study"))
        .cookie(cookie)
        .connect()
        .await
        .expect("websocket connect");
    socket
}

async fn next_frame_value(
    socket: &mut actix_codec::Framed<awc::BoxedSocket, awc::ws::Codec>,
) -> Value {
    loop {
        let frame = socket.next().await.expect("response frame").expect("frame");
        match frame {
            Frame::Text(bytes) => return serde_json::from_slice(&bytes).expect("frame JSON"),
            Frame::Ping(_) | Frame::Pong(_) => continue,
            other => panic!("expected text frame, got {other:?}"),
        }
    }
}

async fn send(
    socket: &mut actix_codec::Framed<awc::BoxedSocket, awc::ws::Codec>,
    payload: Value,
) {
    socket
        .send(AwcMessage::Text(payload.to_string().into()))
        .await
        .expect("send text");
}

fn frame_type(value: &Value) -> &str {
    value
        .get("type")
        .and_then(Value::as_str)
        .expect("frame type")
}

#[rstest]
#[actix_rt::test]
async fn rejects_upgrades_without_a_session() {
    let (base, _server) = spawn_app(Vec::new(), Arc::new(RecordingCommand::default()));

    let result = awc::Client::default()
        .ws(format!("{base}/ws/study"))
        .connect()
        .await;

    match result {
        Err(awc::error::WsClientError::InvalidResponseStatus(status)) => {
            assert_eq!(status, actix_web::http::StatusCode::UNAUTHORIZED);
        }
        Ok(_) => panic!("expected rejected upgrade, got a successful upgrade"),
        Err(other) => panic!("expected rejected upgrade, got {other:?}"),
    }
}

#[rstest]
#[actix_rt::test]
async fn sends_the_first_card_on_connect() {
    let (base, _server) = spawn_app(fixture_deck(2, false), Arc::new(RecordingCommand::default()));
    let mut socket = connect(&base).await;

    let frame = next_frame_value(&mut socket).await;
    assert_eq!(frame_type(&frame), "card");
    assert_eq!(frame.get("total").and_then(Value::as_u64), Some(2));
    assert_eq!(frame.get("position").and_then(Value::as_u64), Some(0));
    assert_eq!(frame.get("face").and_then(Value::as_str), Some("front"));
}

#[rstest]
#[actix_rt::test]
async fn review_filter_hides_a_fully_remembered_deck() {
    let (base, _server) = spawn_app(fixture_deck(2, true), Arc::new(RecordingCommand::default()));
    let mut socket = connect(&base).await;

    let initial = next_frame_value(&mut socket).await;
    assert_eq!(frame_type(&initial), "nothing_to_study");

    send(&mut socket, json!({ "type": "set_filter", "filter": "all" })).await;
    let after = next_frame_value(&mut socket).await;
    assert_eq!(frame_type(&after), "card");
    assert_eq!(after.get("total").and_then(Value::as_u64), Some(2));
}

#[rstest]
#[actix_rt::test]
async fn short_swipes_do_not_advance() {
    let (base, _server) = spawn_app(fixture_deck(3, false), Arc::new(RecordingCommand::default()));
    let mut socket = connect(&base).await;
    next_frame_value(&mut socket).await;

    send(&mut socket, json!({ "type": "swipe", "delta": -30.0 })).await;
    let unchanged = next_frame_value(&mut socket).await;
    assert_eq!(unchanged.get("position").and_then(Value::as_u64), Some(0));

    send(&mut socket, json!({ "type": "swipe", "delta": -51.0 })).await;
    let advanced = next_frame_value(&mut socket).await;
    assert_eq!(advanced.get("position").and_then(Value::as_u64), Some(1));
}

#[rstest]
#[actix_rt::test]
async fn marking_remembered_persists_and_shrinks_the_review_deck() {
    let command = Arc::new(RecordingCommand::default());
    let (base, _server) = spawn_app(fixture_deck(2, false), command.clone());
    let mut socket = connect(&base).await;
    next_frame_value(&mut socket).await;

    send(&mut socket, json!({ "type": "mark_remembered" })).await;
    let frame = next_frame_value(&mut socket).await;
    assert_eq!(frame_type(&frame), "card");
    assert_eq!(frame.get("total").and_then(Value::as_u64), Some(1));

    let recorded = command.recorded();
    assert_eq!(recorded.len(), 1);
    assert!(recorded[0].remembered);
    assert_eq!(recorded[0].user_id, fixture_user_id());
}

#[rstest]
#[actix_rt::test]
async fn rejects_quiz_pools_below_the_minimum() {
    let (base, _server) = spawn_app(fixture_deck(2, false), Arc::new(RecordingCommand::default()));
    let mut socket = connect(&base).await;
    next_frame_value(&mut socket).await;

    send(&mut socket, json!({ "type": "start_quiz", "wordSets": [] })).await;
    let frame = next_frame_value(&mut socket).await;
    assert_eq!(frame_type(&frame), "quiz_rejected");
    assert_eq!(frame.get("available").and_then(Value::as_u64), Some(2));
    assert_eq!(frame.get("required").and_then(Value::as_u64), Some(4));
}

#[rstest]
#[actix_rt::test]
async fn answers_one_quiz_question_end_to_end() {
    let (base, _server) = spawn_app(fixture_deck(4, false), Arc::new(RecordingCommand::default()));
    let mut socket = connect(&base).await;
    next_frame_value(&mut socket).await;

    send(&mut socket, json!({ "type": "start_quiz", "wordSets": [] })).await;
    let question = next_frame_value(&mut socket).await;
    assert_eq!(frame_type(&question), "quiz_question");
    let options = question
        .get("options")
        .and_then(Value::as_array)
        .expect("options");
    assert_eq!(options.len(), 4);
    let picked = options[0]
        .get("wordId")
        .and_then(Value::as_str)
        .expect("option id")
        .to_owned();

    send(&mut socket, json!({ "type": "answer_quiz", "wordId": picked })).await;
    let outcome = next_frame_value(&mut socket).await;
    assert_eq!(frame_type(&outcome), "quiz_answer");
    assert!(outcome.get("correct").and_then(Value::as_bool).is_some());
    assert!(outcome.get("correctWordId").is_some());
    assert_eq!(
        outcome.get("scoreAnswered").and_then(Value::as_u64),
        Some(1)
    );

    let next = next_frame_value(&mut socket).await;
    assert_eq!(frame_type(&next), "quiz_question");
    assert_eq!(next.get("index").and_then(Value::as_u64), Some(1));
}

#[rstest]
#[actix_rt::test]
async fn ending_the_quiz_returns_to_the_deck() {
    let (base, _server) = spawn_app(fixture_deck(4, false), Arc::new(RecordingCommand::default()));
    let mut socket = connect(&base).await;
    next_frame_value(&mut socket).await;

    send(&mut socket, json!({ "type": "start_quiz", "wordSets": [] })).await;
    next_frame_value(&mut socket).await;

    send(&mut socket, json!({ "type": "end_quiz" })).await;
    let frame = next_frame_value(&mut socket).await;
    assert_eq!(frame_type(&frame), "card");
    assert_eq!(frame.get("total").and_then(Value::as_u64), Some(4));
}

#[rstest]
#[actix_rt::test]
async fn closes_on_malformed_json() {
    let (base, _server) = spawn_app(fixture_deck(1, false), Arc::new(RecordingCommand::default()));
    let mut socket = connect(&base).await;
    next_frame_value(&mut socket).await;

    socket
        .send(AwcMessage::Text("not-json".into()))
        .await
        .expect("send text");

    loop {
        let frame = socket.next().await.expect("response frame").expect("frame");
        match frame {
            Frame::Ping(_) | Frame::Pong(_) => continue,
            Frame::Close(reason) => {
                assert_eq!(reason.expect("reason").code, AwcCloseCode::Policy);
                break;
            }
            other => panic!("expected close frame, got {other:?}"),
        }
    }
}
