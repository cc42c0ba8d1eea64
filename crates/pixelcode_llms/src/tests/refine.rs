use std::sync::Arc;

use crate::clock::ManualClock;
use crate::error::{Error, ErrorKind};
use crate::model::Model;
use crate::provider::Credentials;
use crate::refine::{IMPROVE_INSTRUCTION, RefineOptions, Refiner, THINKING_PREFIX};
use crate::types::{Content, Conversation, NullSink, Role};

fn conversation() -> Conversation {
    Conversation::new("Replicate the app in the video").with_user("Here are the frames")
}

#[tokio::test]
async fn test_conversation_grows_two_turns_per_pass() {
    let refiner = Refiner::new(RefineOptions::default().with_passes(3)).with_mock(true);
    let mut conv = conversation();
    let before = conv.len();

    let completion = refiner
        .run(Model::Claude3Opus, &mut conv, &Credentials::default(), &mut NullSink)
        .await
        .unwrap();

    assert_eq!(conv.len(), before + 6);
    let turns = conv.turns();
    for pass in 0..3 {
        let assistant = &turns[before + pass * 2];
        let user = &turns[before + pass * 2 + 1];
        assert_eq!(assistant.role, Role::Assistant);
        assert_eq!(user.role, Role::User);
        assert_eq!(user.content, Content::Text(IMPROVE_INSTRUCTION.to_string()));
    }
    assert_eq!(
        turns[turns.len() - 2].content,
        Content::Text(format!("{}{}", THINKING_PREFIX, completion.text()))
    );
}

#[tokio::test]
async fn test_history_marked_even_without_thinking() {
    let refiner = Refiner::new(RefineOptions::default().with_passes(1)).with_mock(true);
    let mut conv = conversation();

    let completion = refiner
        .run(Model::Claude3Opus, &mut conv, &Credentials::default(), &mut NullSink)
        .await
        .unwrap();

    assert!(!refiner.options().include_thinking);
    assert!(!completion.text().starts_with(THINKING_PREFIX));
    assert_eq!(
        conv.turns()[2].content,
        Content::Text(format!("{}{}", THINKING_PREFIX, completion.text()))
    );
}

#[tokio::test]
async fn test_thinking_prefix_kept_in_history_only() {
    let refiner = Refiner::new(RefineOptions::default().with_thinking(true).with_passes(1))
        .with_mock(true);
    let mut conv = conversation();

    let completion = refiner
        .run(Model::Claude3Opus, &mut conv, &Credentials::default(), &mut NullSink)
        .await
        .unwrap();

    assert!(!completion.text().starts_with(THINKING_PREFIX));
    let assistant = &conv.turns()[2];
    assert_eq!(
        assistant.content,
        Content::Text(format!("{}{}", THINKING_PREFIX, completion.text()))
    );
}

#[tokio::test]
async fn test_zero_passes_is_exhausted() {
    let refiner = Refiner::new(RefineOptions::default().with_passes(0)).with_mock(true);
    let mut conv = conversation();
    let err = refiner
        .run(Model::Claude3Haiku, &mut conv, &Credentials::default(), &mut NullSink)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ProtocolExhausted { passes: 0 }));
    assert_eq!(err.kind(), ErrorKind::ProtocolExhausted);
    assert_eq!(conv, conversation());
}

#[tokio::test]
async fn test_non_anthropic_model_rejected() {
    let refiner = Refiner::new(RefineOptions::default()).with_mock(true);
    let err = refiner
        .run(Model::Gpt4o20240806, &mut conversation(), &Credentials::default(), &mut NullSink)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}

#[tokio::test]
async fn test_missing_key_fails_before_any_pass() {
    let refiner = Refiner::new(RefineOptions::default());
    let mut conv = conversation();
    let err = refiner
        .run(Model::Claude3Opus, &mut conv, &Credentials::new(" "), &mut NullSink)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::MissingApiKey(_)));
    assert_eq!(conv.len(), 2);
}

#[tokio::test]
async fn test_debug_artifacts_written() {
    let base = tempfile::tempdir().unwrap();
    let clock = Arc::new(ManualClock::from_secs_f64([0.0, 4.0]));
    let refiner = Refiner::new(
        RefineOptions::default().with_debug_dir(Some(base.path().to_path_buf())),
    )
    .with_mock(true)
    .with_clock(clock);

    let completion = refiner
        .run(Model::Claude3Opus, &mut conversation(), &Credentials::default(), &mut NullSink)
        .await
        .unwrap();
    assert_eq!(completion.duration_secs(), 4.0);

    let runs: Vec<_> = std::fs::read_dir(base.path()).unwrap().collect();
    assert_eq!(runs.len(), 1);
    let run_dir = runs.into_iter().next().unwrap().unwrap().path();
    for name in [
        "pass_1.html",
        "pass_2.html",
        "thinking_pass_1.txt",
        "thinking_pass_2.txt",
        "full_stream.txt",
    ] {
        assert!(run_dir.join(name).exists(), "{name}");
    }
    let full = std::fs::read_to_string(run_dir.join("full_stream.txt")).unwrap();
    assert_eq!(full, completion.text().repeat(2));
}
