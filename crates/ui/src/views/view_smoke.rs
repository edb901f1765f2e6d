use dioxus::prelude::*;
use recite_core::model::{Feedback, Phase, ProgressIndex};
use storage::repository::ProgressRepository;

use super::test_harness::{TEST_PASSAGE, setup_view_harness};
use crate::views::PracticePanel;
use crate::vm::{PracticeIntent, PracticeSnapshot};

fn snapshot(phase: Phase) -> PracticeSnapshot {
    PracticeSnapshot {
        chunk_number: 1,
        total: 2,
        progress_percent: 0,
        phase,
        chunk_text: "A cat sat.".to_string(),
        remaining_secs: (phase == Phase::Showing).then_some(3),
        feedback: None,
        peek_open: false,
    }
}

#[component]
fn PanelHarness(snapshot: PracticeSnapshot) -> Element {
    rsx! {
        PracticePanel {
            snapshot,
            draft: String::new(),
            on_draft: move |_: String| {},
            on_intent: move |_: PracticeIntent| {},
        }
    }
}

fn render_panel(snapshot: PracticeSnapshot) -> String {
    let mut dom = VirtualDom::new_with_props(PanelHarness, PanelHarnessProps { snapshot });
    dom.rebuild_in_place();
    dioxus_ssr::render(&dom)
}

#[test]
fn panel_shows_chunk_and_countdown_while_showing() {
    let html = render_panel(snapshot(Phase::Showing));
    assert!(html.contains("A cat sat."), "missing chunk in {html}");
    assert!(html.contains("Disappearing in 3 sec..."), "missing countdown in {html}");
    assert!(!html.contains("practice-input"), "input shown early in {html}");
}

#[test]
fn panel_hides_chunk_and_offers_input_once_hidden() {
    let html = render_panel(snapshot(Phase::Hidden));
    assert!(!html.contains("A cat sat."), "chunk still visible in {html}");
    assert!(html.contains("practice-input"), "missing input in {html}");
    assert!(html.contains("Check"), "missing check in {html}");
    assert!(html.contains("Reveal the correct chunk"), "missing disclosure in {html}");
}

#[test]
fn panel_peek_reveals_chunk_when_opened() {
    let mut opened = snapshot(Phase::Hidden);
    opened.peek_open = true;
    let html = render_panel(opened);
    assert!(html.contains("A cat sat."), "peek did not reveal chunk in {html}");
    assert!(html.contains("practice-input"), "input lost while peeking in {html}");
}

#[test]
fn panel_celebrates_completion() {
    let mut done = snapshot(Phase::Complete);
    done.feedback = Some(Feedback::Correct);
    done.progress_percent = 100;
    let html = render_panel(done);
    assert!(html.contains("finished memorizing"), "missing celebration in {html}");
    assert!(html.contains("You nailed it"), "missing success in {html}");
    assert!(html.contains("Reset Progress"), "missing reset in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn practice_view_smoke_shows_first_chunk() {
    let mut harness = setup_view_harness(TEST_PASSAGE, ProgressIndex::START);
    harness.rebuild();
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("Memory Flash Game"), "missing title in {html}");
    assert!(html.contains("Chunk 1 of 2"), "missing progress in {html}");
    assert!(html.contains("A cat sat."), "missing chunk in {html}");
    assert!(html.contains("Disappearing in 4 sec..."), "missing countdown in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn practice_view_check_flow_advances_and_resets() {
    let mut harness = setup_view_harness(TEST_PASSAGE, ProgressIndex::START);
    harness.rebuild();
    harness.drive_async().await;

    harness.tick_at(4);
    let html = harness.render();
    assert!(!html.contains("A cat sat."), "chunk visible after hide in {html}");
    assert!(html.contains("practice-input"), "missing input in {html}");

    harness
        .dispatch(PracticeIntent::Check("a cat sat.".to_string()))
        .await;
    let html = harness.render();
    assert!(html.contains("Not quite"), "missing failure in {html}");
    assert_eq!(
        harness.repo.load_progress().await.unwrap(),
        ProgressIndex::START
    );

    harness
        .dispatch(PracticeIntent::Check("A cat sat.".to_string()))
        .await;
    let html = harness.render();
    assert!(html.contains("You nailed it"), "missing success in {html}");
    assert!(html.contains("Chunk 2 of 2"), "did not advance in {html}");
    assert!(html.contains("It slept well."), "next chunk not shown in {html}");
    assert_eq!(
        harness.repo.load_progress().await.unwrap(),
        ProgressIndex::new(1)
    );

    harness.dispatch(PracticeIntent::Reset).await;
    let html = harness.render();
    assert!(html.contains("Chunk 1 of 2"), "reset did not rewind in {html}");
    assert_eq!(
        harness.repo.load_progress().await.unwrap(),
        ProgressIndex::START
    );
}

#[tokio::test(flavor = "current_thread")]
async fn practice_view_smoke_renders_save_error() {
    let mut harness = setup_view_harness(TEST_PASSAGE, ProgressIndex::START);
    harness.rebuild();
    harness.drive_async().await;
    harness.tick_at(5);
    harness.repo.set_fail_writes(true);

    harness
        .dispatch(PracticeIntent::Check("A cat sat.".to_string()))
        .await;
    let html = harness.render();
    assert!(html.contains("Progress was not saved"), "missing error in {html}");
    assert!(html.contains("Retry"), "missing retry in {html}");
    assert!(html.contains("Chunk 1 of 2"), "advanced despite failure in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn practice_view_retry_replays_failed_check() {
    let mut harness = setup_view_harness(TEST_PASSAGE, ProgressIndex::START);
    harness.rebuild();
    harness.drive_async().await;
    harness.tick_at(5);
    harness.repo.set_fail_writes(true);

    harness
        .dispatch(PracticeIntent::Check("A cat sat.".to_string()))
        .await;
    assert!(harness.render().contains("Progress was not saved"));

    harness.repo.set_fail_writes(false);
    harness.retry().await;

    let html = harness.render();
    assert!(!html.contains("Progress was not saved"), "error kept in {html}");
    assert!(html.contains("Chunk 2 of 2"), "retry did not advance in {html}");
    assert!(html.contains("You nailed it"), "missing success in {html}");
    assert_eq!(
        harness.repo.load_progress().await.unwrap(),
        ProgressIndex::new(1)
    );
}

#[tokio::test(flavor = "current_thread")]
async fn practice_view_retry_replays_failed_reset() {
    let mut harness = setup_view_harness(TEST_PASSAGE, ProgressIndex::new(1));
    harness.rebuild();
    harness.drive_async().await;
    assert!(harness.render().contains("Chunk 2 of 2"));
    harness.repo.set_fail_writes(true);

    harness.dispatch(PracticeIntent::Reset).await;
    let html = harness.render();
    assert!(html.contains("Progress was not saved"), "missing error in {html}");
    assert!(html.contains("Chunk 2 of 2"), "reset applied despite failure in {html}");
    assert_eq!(
        harness.repo.load_progress().await.unwrap(),
        ProgressIndex::new(1)
    );

    harness.repo.set_fail_writes(false);
    harness.retry().await;

    let html = harness.render();
    assert!(!html.contains("Progress was not saved"), "error kept in {html}");
    assert!(html.contains("Chunk 1 of 2"), "retry did not rewind in {html}");
    assert_eq!(
        harness.repo.load_progress().await.unwrap(),
        ProgressIndex::START
    );
}
