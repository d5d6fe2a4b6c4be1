//! Chat pages.
//!
//! `ThreadScreen` wires a conversation's state to the thread view: it
//! provides the [`ThreadHandle`] context, loads a stored conversation when
//! the route carries an id, and navigates to the permalink once a new
//! conversation is first persisted.

use dioxus::{logger::tracing::warn, prelude::*};

use crate::Route;
use crate::app_settings::AppSettings;
use crate::storage::{Storage, get_storage};
use crate::thread::use_thread_provider;
use crate::ui::thread::Thread;

#[component]
pub fn ChatEl(id: u32) -> Element {
    rsx! {
        ThreadScreen { id: Signal::new(Some(id)) }
    }
}

#[component]
pub fn NewChat() -> Element {
    rsx! {
        ThreadScreen { id: Signal::new(None) }
    }
}

#[component]
pub fn ThreadScreen(id: Signal<Option<u32>>) -> Element {
    let nav = navigator();
    let settings_ctx = consume_context::<Signal<Option<AppSettings>>>();
    let on_persisted = use_callback(move |chat_id: u32| {
        if id() != Some(chat_id) {
            nav.push(Route::ChatEl { id: chat_id });
        }
    });
    let thread = use_thread_provider(settings_ctx, on_persisted);

    let loaded = use_resource(move || async move {
        let Some(chat_id) = id() else {
            return;
        };
        let storage = match get_storage().await {
            Ok(s) => s,
            Err(e) => {
                warn!("could not get storage: {e:?}");
                return;
            }
        };
        match storage.get_chat(chat_id).await {
            Ok(Some(conversation)) => thread.replace(conversation),
            Ok(None) => warn!("no stored chat with id {chat_id}"),
            Err(e) => warn!("could not load chat {chat_id}: {e:?}"),
        }
    });

    rsx! {
        if loaded.read().is_none() {
            div { class: "thread-loading", "Loading..." }
        } else {
            Thread {}
        }
    }
}
