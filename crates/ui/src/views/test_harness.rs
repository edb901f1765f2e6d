use std::sync::Arc;
use std::time::Duration;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use recite_core::model::{ExerciseSettings, Passage, ProgressIndex};
use recite_core::time::fixed_now;
use services::{Clock, PracticeLoopService};
use storage::repository::InMemoryRepository;

use crate::context::{UiApp, build_app_context};
use crate::views::PracticeView;
use crate::views::practice::PracticeTestHandles;

pub const TEST_PASSAGE: &str = "A cat sat. It slept well.";

#[derive(Clone)]
struct TestApp {
    practice_loop: Arc<PracticeLoopService>,
}

impl UiApp for TestApp {
    fn practice_loop(&self) -> Arc<PracticeLoopService> {
        Arc::clone(&self.practice_loop)
    }

    // Keep the countdown loop out of the way; tests drive the timer themselves.
    fn tick_interval(&self) -> Duration {
        Duration::from_secs(3_600)
    }
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    handles: PracticeTestHandles,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewHarnessRoot(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.handles.clone());
    rsx! { PracticeView {} }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub repo: InMemoryRepository,
    pub practice_loop: Arc<PracticeLoopService>,
    pub handles: PracticeTestHandles,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        for _ in 0..3 {
            let _ = tokio::time::timeout(
                std::time::Duration::from_millis(50),
                self.dom.wait_for_work(),
            )
            .await;
            self.dom.render_immediate(&mut NoOpMutations);
            self.dom.process_events();
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }

    /// Runs the session's timer against a clock `secs` after the start.
    pub fn tick_at(&mut self, secs: i64) {
        let later = (*self.practice_loop)
            .clone()
            .with_clock(Clock::fixed(fixed_now() + chrono::Duration::seconds(secs)));
        let vm = self.handles.vm();
        self.dom.in_runtime(|| {
            let mut vm = vm;
            if let Some(vm) = vm.write().as_mut() {
                vm.tick(&later);
            }
        });
        drive_dom(&mut self.dom);
    }

    pub async fn retry(&mut self) {
        let retry = self.handles.retry();
        self.dom.in_runtime(|| retry.call(()));
        self.drive_async().await;
    }

    pub async fn dispatch(&mut self, intent: crate::vm::PracticeIntent) {
        let dispatch = self.handles.dispatch();
        self.dom.in_runtime(|| dispatch.call(intent));
        self.drive_async().await;
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(text: &str, progress: ProgressIndex) -> ViewHarness {
    let repo = InMemoryRepository::with_progress(progress);
    let practice_loop = Arc::new(
        PracticeLoopService::new(
            Clock::fixed(fixed_now()),
            &Passage::parse(text).expect("test passage"),
            ExerciseSettings::new(1, 4).expect("test settings"),
            Arc::new(repo.clone()),
        )
        .expect("practice loop"),
    );
    let handles = PracticeTestHandles::default();

    let app = Arc::new(TestApp {
        practice_loop: Arc::clone(&practice_loop),
    });
    let dom = VirtualDom::new_with_props(
        ViewHarnessRoot,
        ViewHarnessProps {
            app,
            handles: handles.clone(),
        },
    );

    ViewHarness {
        dom,
        repo,
        practice_loop,
        handles,
    }
}
