use super::*;
use crate::voice::audio::UnavailableSink;
use crate::voice::mock::{event_log, Event, EventLog, MockBehavior, MockSink, MockTts};
use crate::voice::resolver::VoiceGender;
use chrono::TimeZone;
use tempfile::TempDir;

fn orchestrator(behavior: MockBehavior) -> (SpeechOrchestrator, EventLog) {
    let log = event_log();
    let tts = Arc::new(MockTts::new(behavior, log.clone()));
    let sink = Box::new(MockSink { log: log.clone() });
    (SpeechOrchestrator::new(tts, sink), log)
}

fn request(text: &str) -> SynthesisRequest {
    SynthesisRequest::new(text, "en-US", VoiceGender::Female, 1.0)
}

fn events(log: &EventLog) -> Vec<Event> {
    log.lock().unwrap().clone()
}

fn synth(text: &str, voice_id: &str) -> Event {
    Event::Synthesize {
        text: text.to_string(),
        voice_id: voice_id.to_string(),
    }
}

fn started(text: &str, speed: f32) -> Event {
    Event::PlayStarted {
        bytes: text.as_bytes().to_vec(),
        speed,
    }
}

#[tokio::test]
async fn empty_text_is_rejected_without_network_calls() {
    let (mut orchestrator, log) = orchestrator(MockBehavior::Echo);
    let temp_dir = TempDir::new().unwrap();

    for text in ["", "   \n\t"] {
        let err = orchestrator
            .speak(&request(text), PlaybackMode::Whole)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SpeechError::Validation(ValidationError::EmptyText)
        ));

        let err = orchestrator
            .speak(&request(text), PlaybackMode::WordByWord)
            .await
            .unwrap_err();
        assert!(err.is_validation());

        let err = orchestrator
            .download(&request(text), temp_dir.path(), Utc::now())
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    assert!(events(&log).is_empty());
    assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn whole_mode_sends_single_request() {
    let (mut orchestrator, log) = orchestrator(MockBehavior::Echo);

    orchestrator
        .speak(&request("hello world"), PlaybackMode::Whole)
        .await
        .unwrap();

    assert_eq!(
        events(&log),
        vec![
            synth("hello world", "Salli"),
            started("hello world", 1.0),
            Event::PlayFinished,
        ]
    );
}

#[tokio::test]
async fn word_by_word_is_strictly_sequential() {
    let (mut orchestrator, log) = orchestrator(MockBehavior::Echo);
    let request = SynthesisRequest::new("hello world", "en-US", VoiceGender::Male, 1.5);

    orchestrator
        .speak(&request, PlaybackMode::WordByWord)
        .await
        .unwrap();

    assert_eq!(
        events(&log),
        vec![
            synth("hello", "Justin"),
            started("hello", 1.5),
            Event::PlayFinished,
            synth("world", "Justin"),
            started("world", 1.5),
            Event::PlayFinished,
        ]
    );
    assert_eq!(
        orchestrator.last_payload().map(|p| p.mp3_data.clone()),
        Some(b"world".to_vec())
    );
}

#[tokio::test]
async fn word_by_word_skips_runs_of_whitespace() {
    let (mut orchestrator, log) = orchestrator(MockBehavior::Echo);

    orchestrator
        .speak(&request("  one \n\n two\tthree  "), PlaybackMode::WordByWord)
        .await
        .unwrap();

    let synthesized: Vec<_> = events(&log)
        .into_iter()
        .filter_map(|e| match e {
            Event::Synthesize { text, .. } => Some(text),
            _ => None,
        })
        .collect();
    assert_eq!(synthesized, vec!["one", "two", "three"]);
}

#[tokio::test]
async fn word_by_word_stops_at_first_failure() {
    let (mut orchestrator, log) = orchestrator(MockBehavior::FailOn("two".to_string()));

    let err = orchestrator
        .speak(&request("one two three"), PlaybackMode::WordByWord)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SpeechError::Synthesis(SynthesisError::Request(_))
    ));
    assert_eq!(
        events(&log),
        vec![
            synth("one", "Salli"),
            started("one", 1.0),
            Event::PlayFinished,
            synth("two", "Salli"),
        ]
    );
}

#[tokio::test]
async fn missing_audio_stream_is_a_synthesis_error() {
    let (mut orchestrator, log) = orchestrator(MockBehavior::NoAudio);

    let err = orchestrator
        .speak(&request("hello"), PlaybackMode::Whole)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SpeechError::Synthesis(SynthesisError::NoAudioStream)
    ));
    assert_eq!(events(&log), vec![synth("hello", "Salli")]);
    assert!(orchestrator.last_payload().is_none());
}

#[tokio::test]
async fn endpoint_failure_is_propagated_not_retried() {
    let (orchestrator, log) = orchestrator(MockBehavior::Fail);

    let err = orchestrator.synthesize(&request("hello")).await.unwrap_err();

    assert!(matches!(err, SpeechError::Synthesis(_)));
    assert_eq!(events(&log).len(), 1);
}

#[tokio::test]
async fn single_voice_locale_uses_same_voice_for_both_genders() {
    let (orchestrator, log) = orchestrator(MockBehavior::Echo);

    for voice in [VoiceGender::Female, VoiceGender::Male] {
        let request = SynthesisRequest::new("merhaba", "tr-TR", voice, 1.0);
        orchestrator.synthesize(&request).await.unwrap();
    }

    assert_eq!(
        events(&log),
        vec![synth("merhaba", "Filiz"), synth("merhaba", "Filiz")]
    );
}

#[tokio::test]
async fn download_writes_exact_payload_with_timestamped_name() {
    let (mut orchestrator, log) = orchestrator(MockBehavior::Echo);
    let temp_dir = TempDir::new().unwrap();
    let now = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
    let request = SynthesisRequest::new("bonjour tout le monde", "fr-FR", VoiceGender::Male, 1.0);

    let path = orchestrator
        .download(&request, temp_dir.path(), now)
        .await
        .unwrap();

    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "audio_fr-FR_2025-01-02T03-04-05-000Z.mp3"
    );
    assert_eq!(std::fs::read(&path).unwrap(), b"bonjour tout le monde");
    // download never plays and never splits into words
    assert_eq!(events(&log), vec![synth("bonjour tout le monde", "Mathieu")]);
}

#[tokio::test]
async fn save_last_requires_a_previous_synthesis() {
    let (mut orchestrator, log) = orchestrator(MockBehavior::Echo);
    let temp_dir = TempDir::new().unwrap();

    let err = orchestrator
        .save_last(temp_dir.path(), Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SpeechError::Validation(ValidationError::NoAudioYet)
    ));

    orchestrator
        .speak(&request("remember me"), PlaybackMode::Whole)
        .await
        .unwrap();
    let calls_before = events(&log).len();

    let path = orchestrator
        .save_last(temp_dir.path(), Utc::now())
        .await
        .unwrap();

    assert_eq!(std::fs::read(path).unwrap(), b"remember me");
    assert_eq!(events(&log).len(), calls_before);
}

#[test]
fn playback_mode_from_flag() {
    assert_eq!(PlaybackMode::from_flag(true), PlaybackMode::WordByWord);
    assert_eq!(PlaybackMode::from_flag(false), PlaybackMode::Whole);
    assert_eq!(PlaybackMode::WordByWord.to_string(), "word_by_word");
}

#[tokio::test]
async fn speak_without_audio_output_never_calls_the_endpoint() {
    let log = event_log();
    let tts = Arc::new(MockTts::new(MockBehavior::Echo, log.clone()));
    let mut orchestrator = SpeechOrchestrator::new(tts, Box::new(UnavailableSink));

    for mode in [PlaybackMode::Whole, PlaybackMode::WordByWord] {
        let err = orchestrator
            .speak(&request("hello world"), mode)
            .await
            .unwrap_err();
        assert!(matches!(err, SpeechError::Playback(_)));
    }

    assert!(events(&log).is_empty());
    assert!(orchestrator.last_payload().is_none());

    // downloads do not need an output device
    let temp_dir = TempDir::new().unwrap();
    orchestrator
        .download(&request("hello world"), temp_dir.path(), Utc::now())
        .await
        .unwrap();
    assert_eq!(events(&log), vec![synth("hello world", "Salli")]);
}
