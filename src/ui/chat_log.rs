use dioxus::{logger::tracing::warn, prelude::*};

use crate::Route;
use crate::storage::{Storage, get_storage};
use crate::thread::Conversation;

#[derive(Props, Clone, PartialEq)]
pub struct ChatLogProps {
    pub on_close: Option<EventHandler<()>>,
}

/// Lists stored conversations with open and delete actions.
#[component]
pub fn ChatLog(props: ChatLogProps) -> Element {
    let mut refresh_trigger = use_signal(|| 0);

    let chats: Resource<Option<Vec<Conversation>>> = use_resource(move || {
        let _ = refresh_trigger(); // subscribe to refreshes
        async move {
            let storage = match get_storage().await {
                Ok(s) => s,
                Err(e) => {
                    warn!("could not get storage: {e:?}");
                    return None;
                }
            };
            match storage.list_chats().await {
                Ok(chats) => Some(chats),
                Err(e) => {
                    warn!("could not list chats: {e:?}");
                    None
                }
            }
        }
    });

    let delete_chat = move |chat_id: u32| {
        spawn(async move {
            match get_storage().await {
                Ok(storage) => {
                    if let Err(e) = storage.delete_chat(chat_id).await {
                        warn!("failed to delete chat {chat_id}: {e:?}");
                    } else {
                        refresh_trigger.set(refresh_trigger() + 1);
                    }
                }
                Err(e) => warn!("could not get storage: {e:?}"),
            }
        });
    };

    let Some(Some(chats)) = chats() else {
        return rsx! {
            div { class: "chat-log", "Loading..." }
        };
    };

    rsx! {
        div {
            class: "chat-log",
            onclick: move |e: Event<MouseData>| {
                e.stop_propagation();
            },

            div { class: "chat-log-header",
                h3 { "History" }
                if let Some(on_close) = props.on_close {
                    button {
                        class: "chat-log-close",
                        onclick: move |_| {
                            on_close.call(());
                        },
                        "×"
                    }
                }
            }

            hr {}

            if chats.is_empty() {
                div { class: "chat-log-empty", "No conversations yet" }
            } else {
                for chat in chats {
                    {
                        let chat_id = chat.id;
                        let message_count = chat.tree.len();
                        let on_close_handler = props.on_close;

                        rsx! {
                            div { class: "chat-log-entry",
                                if let Some(id) = chat_id {
                                    Link {
                                        class: "chat-log-link",
                                        to: Route::ChatEl { id },
                                        onclick: move |_| {
                                            if let Some(on_close) = &on_close_handler {
                                                on_close.call(());
                                            }
                                        },
                                        div { class: "chat-log-title", "Chat #{id}" }
                                        div { class: "chat-log-count", "{message_count} messages" }
                                    }
                                    button {
                                        class: "chat-log-delete",
                                        onclick: move |e: Event<MouseData>| {
                                            e.stop_propagation();
                                            delete_chat(id);
                                        },
                                        "Delete"
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
