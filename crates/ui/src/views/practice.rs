use dioxus::prelude::*;
use recite_core::model::{Feedback, Phase};
use services::CheckOutcome;

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{
    PracticeIntent, PracticeSnapshot, PracticeVm, format_countdown, format_progress,
    start_practice,
};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq, Eq)]
enum LastAction {
    Start,
    Intent(PracticeIntent),
}

#[component]
pub fn PracticeView() -> Element {
    let ctx = use_context::<AppContext>();
    let practice = ctx.practice_loop();
    let tick_interval = ctx.tick_interval();

    let error = use_signal(|| None::<ViewError>);
    let vm = use_signal(|| None::<PracticeVm>);
    let mut draft = use_signal(String::new);
    let last_action = use_signal(|| None::<LastAction>);

    let practice_for_resource = practice.clone();
    let resource = use_resource(move || {
        let practice = practice_for_resource.clone();
        let mut error = error;
        let mut vm = vm;
        let mut last_action = last_action;

        async move {
            last_action.set(Some(LastAction::Start));
            let started = start_practice(&practice).await?;
            vm.set(Some(started));
            error.set(None);
            Ok::<_, ViewError>(())
        }
    });
    let state = view_state_from_resource(&resource);

    // Countdown: re-evaluate the timer while the chunk is on screen.
    let practice_for_ticks = practice.clone();
    use_future(move || {
        let practice = practice_for_ticks.clone();
        let mut vm = vm;
        async move {
            loop {
                tokio::time::sleep(tick_interval).await;
                let showing = vm.peek().as_ref().is_some_and(PracticeVm::is_showing);
                if !showing {
                    continue;
                }
                if let Some(vm) = vm.write().as_mut() {
                    vm.tick(&practice);
                }
            }
        }
    });

    let dispatch_intent = {
        let practice = practice.clone();
        use_callback(move |intent: PracticeIntent| {
            let mut error = error;
            let mut vm = vm;
            let mut draft = draft;
            let mut last_action = last_action;

            if intent == PracticeIntent::TogglePeek {
                if let Some(vm) = vm.write().as_mut() {
                    vm.toggle_peek();
                }
                return;
            }

            let practice = practice.clone();
            spawn(async move {
                last_action.set(Some(LastAction::Intent(intent.clone())));
                let taken = vm.write().take();
                let Some(mut vm_value) = taken else {
                    error.set(Some(ViewError::Unknown));
                    return;
                };

                let result = match &intent {
                    PracticeIntent::Check(attempt) => vm_value
                        .check(&practice, attempt)
                        .await
                        .map(|outcome| outcome != CheckOutcome::Mismatch),
                    PracticeIntent::Reset => vm_value.reset(&practice).await.map(|()| true),
                    PracticeIntent::TogglePeek => Ok(false),
                };

                // Put the session back before reporting errors.
                vm.set(Some(vm_value));

                match result {
                    Ok(clear_draft) => {
                        error.set(None);
                        if clear_draft {
                            draft.set(String::new());
                        }
                    }
                    Err(err) => error.set(Some(err)),
                }
            });
        })
    };

    let retry_action = use_callback(move |()| match last_action() {
        Some(LastAction::Start) | None => {
            let mut resource = resource;
            resource.restart();
        }
        Some(LastAction::Intent(intent)) => dispatch_intent.call(intent),
    });

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<PracticeTestHandles>() {
                handles.register(dispatch_intent, retry_action, vm);
            }
        }
    }

    let snapshot = vm.read().as_ref().map(|vm| vm.snapshot(&practice));

    rsx! {
        div { class: "page practice-page",
            h1 { class: "practice-title", "🧠 Memory Flash Game" }
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "practice-error", "{err.message()}" }
                    if err != ViewError::EmptyPassage {
                        button {
                            class: "btn btn-secondary",
                            r#type: "button",
                            onclick: move |_| retry_action.call(()),
                            "Retry"
                        }
                    }
                },
                ViewState::Ready(()) => rsx! {
                    if let Some(err) = *error.read() {
                        p { class: "practice-error", "{err.message()}" }
                        button {
                            class: "btn btn-secondary",
                            r#type: "button",
                            onclick: move |_| retry_action.call(()),
                            "Retry"
                        }
                    }
                    if let Some(snapshot) = snapshot {
                        PracticePanel {
                            snapshot,
                            draft: draft(),
                            on_draft: move |value: String| draft.set(value),
                            on_intent: dispatch_intent,
                        }
                    }
                },
            }
        }
    }
}

/// Stateless rendering of one practice frame.
#[component]
pub fn PracticePanel(
    snapshot: PracticeSnapshot,
    draft: String,
    on_draft: EventHandler<String>,
    on_intent: EventHandler<PracticeIntent>,
) -> Element {
    let progress_label = format_progress(snapshot.chunk_number, snapshot.total);
    let percent = snapshot.progress_percent;
    let countdown = snapshot.remaining_secs.map(format_countdown);
    let chunk_text = snapshot.chunk_text.clone();
    let peek_open = snapshot.peek_open;
    let attempt = draft.clone();

    rsx! {
        section { class: "practice",
            div {
                class: "practice-progress",
                role: "progressbar",
                aria_valuemin: "0",
                aria_valuemax: "100",
                aria_valuenow: "{percent}",
                div { class: "practice-progress__fill", style: "width: {percent}%" }
            }
            h2 { class: "practice-subtitle", "{progress_label}" }

            match snapshot.phase {
                Phase::Showing => rsx! {
                    p { class: "practice-hint", "⏱ Memorize this quickly!" }
                    pre { class: "practice-chunk", id: "practice-chunk", "{chunk_text}" }
                    if let Some(countdown) = countdown {
                        p { class: "practice-countdown", "{countdown}" }
                    }
                },
                Phase::Hidden => rsx! {
                    p { class: "practice-label", "✍️ Type what you remember:" }
                    textarea {
                        class: "practice-input",
                        id: "practice-input",
                        value: "{draft}",
                        oninput: move |evt| on_draft.call(evt.value()),
                    }
                    button {
                        class: "btn btn-primary",
                        id: "practice-check",
                        r#type: "button",
                        onclick: move |_| on_intent.call(PracticeIntent::Check(attempt.clone())),
                        "Check"
                    }
                },
                Phase::Complete => rsx! {
                    div { class: "practice-complete",
                        p { class: "practice-complete__balloons", "🎈 🎈 🎈" }
                        p { class: "practice-complete__title", "🎉 You've finished memorizing the whole thing!" }
                    }
                },
            }

            match snapshot.feedback {
                Some(Feedback::Correct) => rsx! {
                    p { class: "practice-feedback practice-feedback--ok", "✅ You nailed it!" }
                },
                Some(Feedback::Incorrect) => rsx! {
                    p {
                        class: "practice-feedback practice-feedback--miss",
                        "❌ Not quite. Try again or view the original below."
                    }
                },
                None => rsx! {},
            }

            div { class: "practice-peek",
                button {
                    class: "btn btn-ghost",
                    id: "practice-peek-toggle",
                    r#type: "button",
                    aria_expanded: "{peek_open}",
                    onclick: move |_| on_intent.call(PracticeIntent::TogglePeek),
                    "👀 Reveal the correct chunk"
                }
                if peek_open {
                    p { class: "practice-peek__text", "{chunk_text}" }
                }
            }

            button {
                class: "btn btn-secondary",
                id: "practice-reset",
                r#type: "button",
                onclick: move |_| on_intent.call(PracticeIntent::Reset),
                "🔁 Reset Progress"
            }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct PracticeTestHandles {
    dispatch: Rc<RefCell<Option<Callback<PracticeIntent>>>>,
    retry: Rc<RefCell<Option<Callback<()>>>>,
    vm: Rc<RefCell<Option<Signal<Option<PracticeVm>>>>>,
}

#[cfg(test)]
impl PracticeTestHandles {
    pub(crate) fn register(
        &self,
        dispatch: Callback<PracticeIntent>,
        retry: Callback<()>,
        vm: Signal<Option<PracticeVm>>,
    ) {
        *self.dispatch.borrow_mut() = Some(dispatch);
        *self.retry.borrow_mut() = Some(retry);
        *self.vm.borrow_mut() = Some(vm);
    }

    pub(crate) fn dispatch(&self) -> Callback<PracticeIntent> {
        (*self.dispatch.borrow()).expect("practice dispatch registered")
    }

    pub(crate) fn retry(&self) -> Callback<()> {
        (*self.retry.borrow()).expect("practice retry registered")
    }

    pub(crate) fn vm(&self) -> Signal<Option<PracticeVm>> {
        (*self.vm.borrow()).expect("practice vm registered")
    }
}
