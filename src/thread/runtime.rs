use std::time::Duration;

use anyhow::Context as _;
use dioxus::core::Task;
use dioxus::logger::tracing::warn;
use dioxus::prelude::*;

use crate::app_settings::AppSettings;
use crate::llm::{ContentPart, LlmClient, Message};
use crate::storage::{Storage, get_storage};

use super::{Conversation, MessageId, MessageNode, Role};

/// Prepended to every model request; never part of the visible thread.
const SYSTEM_PROMPT: &str =
    "You are a helpful assistant. Answer concisely and format responses in Markdown.";

/// How long the copied marker stays on a message.
const COPIED_RESET: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq)]
pub struct EditDraft {
    pub id: MessageId,
    pub text: String,
}

/// Handle to one conversation's state, shared through context.
///
/// Everything inside is a `Signal`, so the handle is `Copy` and any
/// component that reads through it re-renders when the state changes.
#[derive(Clone, Copy)]
pub struct ThreadHandle {
    pub conversation: Signal<Conversation>,
    pub running: Signal<bool>,
    pub streaming_into: Signal<Option<MessageId>>,
    pub editing: Signal<Option<EditDraft>>,
    pub copied: Signal<Option<MessageId>>,
    pub error: Signal<Option<String>>,
    run_task: Signal<Option<Task>>,
    settings: Signal<Option<AppSettings>>,
    on_persisted: Callback<u32>,
}

/// Creates a [`ThreadHandle`] and provides it to this scope's children.
pub fn use_thread_provider(
    settings: Signal<Option<AppSettings>>,
    on_persisted: Callback<u32>,
) -> ThreadHandle {
    use_hook(|| provide_context(ThreadHandle::new(settings, on_persisted)))
}

/// The handle provided by the nearest [`use_thread_provider`] ancestor.
pub fn use_thread() -> ThreadHandle {
    use_context()
}

impl ThreadHandle {
    pub fn new(settings: Signal<Option<AppSettings>>, on_persisted: Callback<u32>) -> Self {
        Self {
            conversation: Signal::new(Conversation::default()),
            running: Signal::new(false),
            streaming_into: Signal::new(None),
            editing: Signal::new(None),
            copied: Signal::new(None),
            error: Signal::new(None),
            run_task: Signal::new(None),
            settings,
            on_persisted,
        }
    }

    // --- read side ---

    pub fn is_running(&self) -> bool {
        self.running.cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.conversation.read().tree.is_empty()
    }

    pub fn path(&self) -> Vec<MessageId> {
        self.conversation.read().tree.path()
    }

    pub fn message(&self, id: MessageId) -> Option<MessageNode> {
        self.conversation.read().tree.get(id).cloned()
    }

    pub fn content(&self, id: MessageId) -> Option<String> {
        self.conversation
            .read()
            .tree
            .content(id)
            .map(|c| c.to_string())
    }

    pub fn branches(&self, id: MessageId) -> (usize, usize) {
        self.conversation.read().tree.branch_position(id)
    }

    pub fn editing_id(&self) -> Option<MessageId> {
        self.editing.read().as_ref().map(|d| d.id)
    }

    pub fn edit_draft(&self) -> Option<String> {
        self.editing.read().as_ref().map(|d| d.text.clone())
    }

    pub fn copied_id(&self) -> Option<MessageId> {
        self.copied.cloned()
    }

    pub fn streaming_id(&self) -> Option<MessageId> {
        self.streaming_into.cloned()
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.cloned()
    }

    // --- operations ---

    /// Appends a user message at the current leaf and starts a run.
    pub fn send(mut self, text: String) {
        let text = text.trim().to_string();
        if text.is_empty() || self.is_running() {
            return;
        }
        let leaf = self.conversation.read().tree.leaf();
        let user = self
            .conversation
            .with_mut(|c| c.tree.insert(leaf, Role::User, text));
        self.start_run(Some(user));
    }

    /// Cancels the in-flight run, keeping any partial text already streamed.
    pub fn cancel(mut self) {
        let Some(task) = self.run_task.with_mut(|t| t.take()) else {
            return;
        };
        task.cancel();
        if let Some(node) = self.streaming_into.with_mut(|s| s.take()) {
            self.drop_if_empty(node);
        }
        self.running.set(false);
    }

    /// Regenerates an assistant message as a new sibling branch.
    pub fn reload(self, id: MessageId) {
        if self.is_running() {
            return;
        }
        let parent = match self.message(id) {
            Some(node) if node.role == Role::Assistant => node.parent,
            _ => return,
        };
        self.start_run(parent);
    }

    pub fn begin_edit(mut self, id: MessageId) {
        if self.is_running() {
            return;
        }
        let Some(node) = self.message(id) else { return };
        if node.role != Role::User {
            return;
        }
        self.editing.set(Some(EditDraft {
            id,
            text: node.content,
        }));
    }

    pub fn set_edit_draft(mut self, text: String) {
        self.editing.with_mut(|e| {
            if let Some(draft) = e {
                draft.text = text;
            }
        });
    }

    /// Discards the draft; the message itself is untouched.
    pub fn cancel_edit(mut self) {
        self.editing.set(None);
    }

    /// Inserts the draft as a sibling branch of the edited message and runs.
    pub fn submit_edit(mut self) {
        let Some(draft) = self.editing.with_mut(|e| e.take()) else {
            return;
        };
        let text = draft.text.trim().to_string();
        if text.is_empty() || self.is_running() {
            return;
        }
        let parent = self.message(draft.id).and_then(|n| n.parent);
        let user = self
            .conversation
            .with_mut(|c| c.tree.insert(parent, Role::User, text));
        self.start_run(Some(user));
    }

    /// Copies the message text to the clipboard and flags it for a moment.
    pub fn copy(mut self, id: MessageId) {
        let Some(text) = self.content(id) else { return };
        match serde_json::to_string(&text) {
            Ok(quoted) => {
                let _ = document::eval(&format!("navigator.clipboard.writeText({quoted});"));
            }
            Err(e) => warn!("could not encode clipboard text: {e:?}"),
        }
        self.copied.set(Some(id));
        let mut copied = self.copied;
        spawn(async move {
            tokio::time::sleep(COPIED_RESET).await;
            if copied.cloned() == Some(id) {
                copied.set(None);
            }
        });
    }

    pub fn previous_branch(self, id: MessageId) {
        self.select_branch(id, -1);
    }

    pub fn next_branch(self, id: MessageId) {
        self.select_branch(id, 1);
    }

    fn select_branch(mut self, id: MessageId, step: isize) {
        if self.is_running() {
            return;
        }
        self.conversation.with_mut(|c| {
            c.tree.select_sibling(id, step);
        });
    }

    pub fn clear_error(mut self) {
        self.error.set(None);
    }

    /// Swaps in a stored conversation, discarding transient state.
    pub fn replace(mut self, conversation: Conversation) {
        self.cancel();
        self.editing.set(None);
        self.copied.set(None);
        self.error.set(None);
        self.conversation.set(conversation);
    }

    // --- run lifecycle ---

    fn start_run(mut self, parent: Option<MessageId>) {
        if self.is_running() {
            return;
        }
        self.error.set(None);
        self.running.set(true);
        let node = self
            .conversation
            .with_mut(|c| c.tree.insert(parent, Role::Assistant, String::new()));
        self.streaming_into.set(Some(node));
        let mut handle = self;
        let task = spawn(async move {
            if let Err(e) = handle.run_to_completion(node).await {
                warn!("run failed: {e:?}");
                handle.error.set(Some(format!("{e:#}")));
                handle.drop_if_empty(node);
            }
            handle.streaming_into.set(None);
            handle.run_task.set(None);
            handle.running.set(false);
        });
        self.run_task.set(Some(task));
    }

    async fn run_to_completion(mut self, node: MessageId) -> anyhow::Result<()> {
        let settings = self
            .settings
            .cloned()
            .context("no provider configured; open Settings first")?;
        anyhow::ensure!(
            settings.provider.is_configured(),
            "no provider configured; open Settings first"
        );
        let model = settings
            .provider
            .get_model()
            .context("no model selected; open Settings first")?;
        let client = LlmClient::new(
            settings.provider.get_api_url(),
            settings.provider.get_api_key().unwrap_or_default(),
        );

        let request = self.request_messages(node);
        let mut stream = client.stream(&model, &request).await?;
        while let Some(event) = stream.recv().await {
            let Some(choice) = event.choices.into_iter().next() else {
                continue;
            };
            if let Some(text) = choice.delta.content
                && !text.is_empty()
            {
                self.conversation
                    .with_mut(|c| c.tree.append_content(node, &text));
            }
        }
        self.persist().await
    }

    /// Wire messages for the visible path, minus the streaming placeholder.
    fn request_messages(&self, placeholder: MessageId) -> Vec<Message> {
        let conversation = self.conversation.read();
        let mut wire = vec![Message::System {
            content: SYSTEM_PROMPT.to_string(),
        }];
        for id in conversation.tree.path() {
            if id == placeholder {
                continue;
            }
            let Some(node) = conversation.tree.get(id) else {
                continue;
            };
            wire.push(match node.role {
                Role::User => Message::User {
                    content: vec![ContentPart::Text {
                        text: node.content.clone(),
                    }],
                },
                Role::Assistant => Message::Assistant {
                    content: Some(node.content.clone()),
                },
            });
        }
        wire
    }

    async fn persist(mut self) -> anyhow::Result<()> {
        let storage = get_storage().await?;
        let snapshot = self.conversation.cloned();
        let id = storage.save_chat(&snapshot).await?;
        self.conversation.with_mut(|c| c.id = Some(id));
        self.on_persisted.call(id);
        Ok(())
    }

    fn drop_if_empty(mut self, node: MessageId) {
        self.conversation.with_mut(|c| {
            if c.tree.content(node).is_some_and(str::is_empty) {
                c.tree.remove_leaf(node);
            }
        });
    }
}

/// Walks the visible path and renders each message through the slot
/// registered for its state: user, user-being-edited, or assistant.
#[component]
pub fn ThreadMessages(
    user_message: Callback<MessageId, Element>,
    edit_composer: Callback<MessageId, Element>,
    assistant_message: Callback<MessageId, Element>,
) -> Element {
    let thread = use_thread();
    let editing = thread.editing_id();
    let path = thread.path();
    rsx! {
        for id in path {
            if thread.message(id).map(|n| n.role) == Some(Role::Assistant) {
                {assistant_message.call(id)}
            } else if editing == Some(id) {
                {edit_composer.call(id)}
            } else {
                {user_message.call(id)}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    thread_local! {
        static HANDLE: RefCell<Option<ThreadHandle>> = const { RefCell::new(None) };
    }

    #[component]
    fn Probe() -> Element {
        let settings = use_signal(|| None);
        let on_persisted = use_callback(|_: u32| {});
        use_hook(move || {
            HANDLE.with(|h| *h.borrow_mut() = Some(ThreadHandle::new(settings, on_persisted)));
        });
        rsx! {}
    }

    fn with_handle(f: impl FnOnce(ThreadHandle)) {
        let mut dom = VirtualDom::new(Probe);
        dom.rebuild_in_place();
        // operations spawn tasks, so they need a scope on the runtime stack
        dom.in_runtime(|| {
            dioxus::core::Runtime::current().in_scope(ScopeId::ROOT, || {
                let handle = HANDLE.with(|h| h.borrow().unwrap());
                f(handle);
            });
        });
    }

    #[test]
    fn send_appends_user_message_and_marks_running() {
        with_handle(|handle| {
            handle.send("  what is rust  ".to_string());
            assert!(handle.is_running());
            let path = handle.path();
            assert_eq!(path.len(), 2); // user + assistant placeholder
            let user = handle.message(path[0]).unwrap();
            assert_eq!(user.role, Role::User);
            assert_eq!(user.content, "what is rust");
        });
    }

    #[test]
    fn cancel_drops_the_empty_placeholder() {
        with_handle(|handle| {
            handle.send("hello".to_string());
            handle.cancel();
            assert!(!handle.is_running());
            let path = handle.path();
            assert_eq!(path.len(), 1);
            assert_eq!(handle.message(path[0]).unwrap().role, Role::User);
        });
    }

    #[test]
    fn edit_cancel_leaves_content_untouched() {
        with_handle(|handle| {
            handle.send("original".to_string());
            handle.cancel();
            let user = handle.path()[0];
            handle.begin_edit(user);
            handle.set_edit_draft("rewritten".to_string());
            assert_eq!(handle.edit_draft().as_deref(), Some("rewritten"));
            handle.cancel_edit();
            assert_eq!(handle.editing_id(), None);
            assert_eq!(handle.content(user).as_deref(), Some("original"));
        });
    }

    #[test]
    fn submit_edit_forks_a_sibling_user_branch() {
        with_handle(|handle| {
            handle.send("v1".to_string());
            handle.cancel();
            let user = handle.path()[0];
            handle.begin_edit(user);
            handle.set_edit_draft("v2".to_string());
            handle.submit_edit();
            let path = handle.path();
            let forked = handle.message(path[0]).unwrap();
            assert_eq!(forked.content, "v2");
            assert_eq!(handle.branches(path[0]), (2, 2));
            // the old branch is intact
            assert_eq!(handle.content(user).as_deref(), Some("v1"));
            handle.cancel();
        });
    }

    #[test]
    fn blank_send_is_ignored() {
        with_handle(|handle| {
            handle.send("   ".to_string());
            assert!(!handle.is_running());
            assert!(handle.is_empty());
        });
    }
}
