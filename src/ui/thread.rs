//! The conversation view: message list, composer, branch navigation and
//! per-message action bars.
//!
//! Components here are purely presentational. All conversation state lives
//! behind the [`ThreadHandle`] context; this module reads it and dispatches
//! user intent (send, cancel, edit, copy, reload, branch switch) back into
//! it.

use std::rc::Rc;

use dioxus::prelude::*;

use crate::md2rsx::markdown_to_rsx;
use crate::thread::{MessageId, ThreadMessages, use_thread};
use crate::ui::tooltip_button::TooltipIconButton;

const SEND_ICON: Asset = asset!("/assets/send.svg");
const COPY_ICON: Asset = asset!("/assets/copy.svg");
const CHECK_ICON: Asset = asset!("/assets/check.svg");
const PENCIL_ICON: Asset = asset!("/assets/pencil.svg");
const REFRESH_ICON: Asset = asset!("/assets/refresh.svg");
const CHEVRON_LEFT_ICON: Asset = asset!("/assets/chevron_left.svg");
const CHEVRON_RIGHT_ICON: Asset = asset!("/assets/chevron_right.svg");
const ARROW_DOWN_ICON: Asset = asset!("/assets/arrow_down.svg");

/// Maximum width of the message column, exposed to the stylesheet as a
/// custom property.
const THREAD_MAX_WIDTH: &str = "42rem";

/// Prompts offered on an empty thread. Clicking one sends it verbatim.
pub const SUGGESTIONS: [&str; 3] = [
    "Explain overfitting in machine learning",
    "Summarize the latest news about AI",
    "Give me a Python code to reverse a string",
];

/// Root of the conversation view.
#[component]
pub fn Thread() -> Element {
    let thread = use_thread();
    rsx! {
        div {
            class: "thread-root",
            style: "--thread-max-width: {THREAD_MAX_WIDTH};",
            div { id: "thread-viewport", class: "thread-viewport",
                ThreadWelcome {}
                ThreadMessages {
                    user_message: move |id| rsx! {
                        UserMessage { id }
                    },
                    edit_composer: move |id| rsx! {
                        EditComposer { id }
                    },
                    assistant_message: move |id| rsx! {
                        AssistantMessage { id }
                    },
                }
                if !thread.is_empty() {
                    div { class: "thread-spacer" }
                }
                div { class: "thread-footer",
                    ThreadScrollToBottom {}
                    if let Some(message) = thread.error_message() {
                        div { class: "error-banner",
                            span { "{message}" }
                            button {
                                class: "error-dismiss",
                                onclick: move |_| thread.clear_error(),
                                "Dismiss"
                            }
                        }
                    }
                    Composer {}
                }
            }
        }
    }
}

#[component]
pub fn ThreadScrollToBottom() -> Element {
    let thread = use_thread();
    rsx! {
        if !thread.is_empty() {
            TooltipIconButton {
                tooltip: "Scroll to bottom",
                class: "scroll-to-bottom",
                onclick: move |_| {
                    let _ = document::eval(
                        "const v = document.getElementById('thread-viewport'); \
                         if (v) v.scrollTo({ top: v.scrollHeight, behavior: 'smooth' });",
                    );
                },
                img { src: ARROW_DOWN_ICON }
            }
        }
    }
}

#[component]
pub fn ThreadWelcome() -> Element {
    let thread = use_thread();
    rsx! {
        if thread.is_empty() {
            div { class: "thread-welcome",
                p { class: "thread-welcome-greeting", "👋 How can I help you today?" }
                ThreadWelcomeSuggestions {}
            }
        }
    }
}

#[component]
pub fn ThreadWelcomeSuggestions() -> Element {
    let thread = use_thread();
    rsx! {
        div { class: "thread-suggestions",
            for prompt in SUGGESTIONS {
                button {
                    class: "suggestion",
                    onclick: move |_| thread.send(prompt.to_string()),
                    "{prompt}"
                }
            }
        }
    }
}

#[component]
pub fn Composer() -> Element {
    let thread = use_thread();
    let mut text = use_signal(String::new);
    let mut submit = move || {
        let message = text.cloned();
        if message.trim().is_empty() {
            return;
        }
        thread.send(message);
        text.set(String::new());
    };
    rsx! {
        div { class: "composer",
            textarea {
                class: "composer-input",
                rows: "1",
                autofocus: true,
                placeholder: "Ask anything...",
                value: text,
                oninput: move |e: Event<FormData>| {
                    text.set(e.value());
                },
                onkeypress: move |e: Event<KeyboardData>| {
                    let k: Rc<KeyboardData> = e.data;
                    if k.code() == Code::Enter && k.modifiers().ctrl() {
                        submit();
                    }
                },
            }
            ComposerAction { on_send: move |_| submit() }
        }
    }
}

/// Send or cancel, depending on whether a run is in flight. Never both.
#[component]
pub fn ComposerAction(on_send: EventHandler<()>) -> Element {
    let thread = use_thread();
    rsx! {
        if !thread.is_running() {
            TooltipIconButton {
                tooltip: "Send",
                class: "composer-send",
                onclick: move |_| on_send.call(()),
                img { src: SEND_ICON }
            }
        }
        if thread.is_running() {
            TooltipIconButton {
                tooltip: "Cancel",
                class: "composer-cancel",
                onclick: move |_| thread.cancel(),
                CircleStopIcon {}
            }
        }
    }
}

#[component]
pub fn UserMessage(id: MessageId) -> Element {
    let thread = use_thread();
    let Some(content) = thread.content(id) else {
        return rsx! {};
    };
    let rendered = markdown_to_rsx(&content)?;
    rsx! {
        div { class: "message-row user-row",
            UserActionBar { id }
            div { class: "message human-message", {rendered} }
            BranchPicker { id, class: "user-branches" }
        }
    }
}

#[component]
pub fn UserActionBar(id: MessageId) -> Element {
    let thread = use_thread();
    rsx! {
        if !thread.is_running() {
            div { class: "action-bar user-actions",
                TooltipIconButton {
                    tooltip: "Edit",
                    onclick: move |_| thread.begin_edit(id),
                    img { src: PENCIL_ICON }
                }
            }
        }
    }
}

/// Replaces a user message while it is being edited. Cancel discards the
/// draft; Send forks the edited text as a new branch.
#[component]
pub fn EditComposer(id: MessageId) -> Element {
    let thread = use_thread();
    let draft = thread.edit_draft().unwrap_or_default();
    rsx! {
        div { class: "edit-composer",
            textarea {
                class: "edit-composer-input",
                value: "{draft}",
                oninput: move |e: Event<FormData>| {
                    thread.set_edit_draft(e.value());
                },
            }
            div { class: "edit-composer-actions",
                button {
                    class: "button-ghost",
                    onclick: move |_| thread.cancel_edit(),
                    "Cancel"
                }
                button {
                    class: "button-primary",
                    onclick: move |_| thread.submit_edit(),
                    "Send"
                }
            }
        }
    }
}

#[component]
pub fn AssistantMessage(id: MessageId) -> Element {
    let thread = use_thread();
    let Some(content) = thread.content(id) else {
        return rsx! {};
    };
    let streaming = if thread.streaming_id() == Some(id) {
        "streaming"
    } else {
        ""
    };
    let rendered = markdown_to_rsx(&content)?;
    rsx! {
        div { class: "message-row assistant-row",
            div { class: "message ai-message {streaming}", {rendered} }
            AssistantActionBar { id }
            BranchPicker { id, class: "assistant-branches" }
        }
    }
}

#[component]
pub fn AssistantActionBar(id: MessageId) -> Element {
    let thread = use_thread();
    rsx! {
        if !thread.is_running() {
            div { class: "action-bar assistant-actions",
                TooltipIconButton {
                    tooltip: "Copy",
                    onclick: move |_| thread.copy(id),
                    if thread.copied_id() == Some(id) {
                        img { class: "icon-check", src: CHECK_ICON }
                    } else {
                        img { class: "icon-copy", src: COPY_ICON }
                    }
                }
                TooltipIconButton {
                    tooltip: "Refresh",
                    onclick: move |_| thread.reload(id),
                    img { src: REFRESH_ICON }
                }
            }
        }
    }
}

/// Branch navigation for one message position. Not rendered at all when the
/// message has no siblings.
#[component]
pub fn BranchPicker(id: MessageId, #[props(into, default)] class: String) -> Element {
    let thread = use_thread();
    let (position, count) = thread.branches(id);
    rsx! {
        if count > 1 {
            div { class: "branch-picker {class}",
                TooltipIconButton {
                    tooltip: "Previous",
                    onclick: move |_| thread.previous_branch(id),
                    img { src: CHEVRON_LEFT_ICON }
                }
                span { class: "branch-counter", "{position} / {count}" }
                TooltipIconButton {
                    tooltip: "Next",
                    onclick: move |_| thread.next_branch(id),
                    img { src: CHEVRON_RIGHT_ICON }
                }
            }
        }
    }
}

#[component]
pub fn CircleStopIcon() -> Element {
    rsx! {
        svg {
            xmlns: "http://www.w3.org/2000/svg",
            view_box: "0 0 16 16",
            fill: "currentColor",
            width: "16",
            height: "16",
            rect { width: "10", height: "10", x: "3", y: "3", rx: "2" }
        }
    }
}
