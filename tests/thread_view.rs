//! Rendering contracts for the conversation view, checked against a seeded
//! thread context and the SSR output of the full `Thread` tree.

use braidchat::thread::{Conversation, MessageId, Role, ThreadHandle};
use braidchat::ui::thread::{SUGGESTIONS, Thread};
use dioxus::prelude::*;

#[derive(Clone, PartialEq)]
enum Scenario {
    Empty,
    /// One user message and one assistant reply, idle.
    SingleTurn,
    /// A send in flight: running flag set, placeholder streaming.
    Running,
    /// Two assistant branches under the same user message.
    Branched,
    /// Single turn with the assistant reply flagged as copied.
    Copied,
    /// Single turn with the user message being edited.
    Editing,
    /// Single turn where an edit was started and then cancelled.
    EditCancelled,
    /// A suggestion was dispatched through the send pathway.
    SuggestionSent,
}

/// Inserts one user message with one assistant reply.
fn seed_turn(mut conversation: Signal<Conversation>) -> (MessageId, MessageId) {
    conversation.with_mut(|c| {
        let user = c.tree.insert(None, Role::User, "what is rust".into());
        let reply = c
            .tree
            .insert(Some(user), Role::Assistant, "a systems language".into());
        (user, reply)
    })
}

impl Scenario {
    fn seed(&self, handle: ThreadHandle) {
        let mut conversation = handle.conversation;
        match self {
            Scenario::Empty => {}
            Scenario::SingleTurn => {
                seed_turn(conversation);
            }
            Scenario::Running => {
                handle.send("what is rust".to_string());
            }
            Scenario::Branched => {
                let (user, _reply) = seed_turn(conversation);
                conversation.with_mut(|c| {
                    c.tree
                        .insert(Some(user), Role::Assistant, "a compiled language".into());
                });
            }
            Scenario::Copied => {
                let (_user, reply) = seed_turn(conversation);
                let mut copied = handle.copied;
                copied.set(Some(reply));
            }
            Scenario::Editing => {
                let (user, _reply) = seed_turn(conversation);
                handle.begin_edit(user);
            }
            Scenario::EditCancelled => {
                let (user, _reply) = seed_turn(conversation);
                handle.begin_edit(user);
                handle.set_edit_draft("something else".to_string());
                handle.cancel_edit();
            }
            Scenario::SuggestionSent => {
                handle.send(SUGGESTIONS[0].to_string());
            }
        }
    }
}

#[component]
fn Harness(scenario: Scenario) -> Element {
    let settings = use_signal(|| None);
    let on_persisted = use_callback(|_: u32| {});
    use_hook(move || {
        let handle = ThreadHandle::new(settings, on_persisted);
        scenario.seed(handle);
        provide_context(handle);
    });
    rsx! {
        Thread {}
    }
}

fn render(scenario: Scenario) -> String {
    let mut dom = VirtualDom::new_with_props(Harness, HarnessProps { scenario });
    dom.rebuild_in_place();
    dioxus_ssr::render(&dom)
}

#[test]
fn send_control_shown_exactly_when_idle() {
    let html = render(Scenario::Empty);
    assert!(html.contains("composer-send"));
    assert!(!html.contains("composer-cancel"));

    let html = render(Scenario::SingleTurn);
    assert!(html.contains("composer-send"));
    assert!(!html.contains("composer-cancel"));
}

#[test]
fn cancel_control_shown_exactly_when_running() {
    let html = render(Scenario::Running);
    assert!(html.contains("composer-cancel"));
    assert!(!html.contains("composer-send"));
}

#[test]
fn empty_thread_shows_welcome_and_all_suggestions() {
    let html = render(Scenario::Empty);
    assert!(html.contains("thread-welcome"));
    for prompt in SUGGESTIONS {
        assert!(html.contains(prompt), "missing suggestion: {prompt}");
    }

    let html = render(Scenario::SingleTurn);
    assert!(!html.contains("thread-welcome"));
}

#[test]
fn suggestion_dispatch_sends_the_exact_text() {
    let html = render(Scenario::SuggestionSent);
    // the suggestion text is now a user message, not a welcome button
    assert!(!html.contains("thread-welcome"));
    assert!(html.contains("human-message"));
    assert!(html.contains(SUGGESTIONS[0]));
}

#[test]
fn branch_picker_hidden_for_a_single_branch() {
    let html = render(Scenario::SingleTurn);
    assert!(!html.contains("branch-picker"));
}

#[test]
fn branch_picker_counts_sibling_branches() {
    let html = render(Scenario::Branched);
    assert!(html.contains("branch-picker"));
    assert!(html.contains("2 / 2"));
    // the newest branch is the visible one
    assert!(html.contains("a compiled language"));
    assert!(!html.contains("a systems language"));
}

#[test]
fn copied_flag_swaps_the_copy_icon() {
    let html = render(Scenario::SingleTurn);
    assert!(html.contains("icon-copy"));
    assert!(!html.contains("icon-check"));

    let html = render(Scenario::Copied);
    assert!(html.contains("icon-check"));
    assert!(!html.contains("icon-copy"));
}

#[test]
fn action_bars_hidden_while_running() {
    let html = render(Scenario::Running);
    assert!(!html.contains("action-bar"));

    let html = render(Scenario::SingleTurn);
    assert!(html.contains("action-bar"));
}

#[test]
fn editing_swaps_the_user_message_for_the_edit_composer() {
    let html = render(Scenario::Editing);
    assert!(html.contains("edit-composer"));
    // the bubble is replaced, but the draft carries the original content
    assert!(!html.contains("human-message"));
    assert!(html.contains("what is rust"));
}

#[test]
fn cancelling_an_edit_restores_the_message_unchanged() {
    let html = render(Scenario::EditCancelled);
    assert!(!html.contains("edit-composer"));
    assert!(html.contains("human-message"));
    assert!(html.contains("what is rust"));
    assert!(!html.contains("something else"));
}
