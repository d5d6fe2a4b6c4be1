use dioxus::prelude::*;

pub mod app_settings;
pub mod llm;
mod md2rsx;
pub mod storage;
pub mod thread;
pub mod ui;

use app_settings::AppSettings;
use storage::{Storage, get_storage};
use ui::chat_log::ChatLog;
use ui::home::{ChatEl, NewChat};
use ui::settings::Settings;
use ui::slideout::Slideout;

const FAVICON: Asset = asset!("/assets/favicon.svg");
const MAIN_CSS: Asset = asset!("/assets/main.css");

#[component]
pub fn App() -> Element {
    let mut settings_ctx = use_context_provider(|| Signal::new(None::<AppSettings>));
    let init = use_resource(move || async move {
        let storage = get_storage().await?;
        if let Some(settings) = storage.load_settings().await? {
            settings_ctx.set(Some(settings));
        }
        anyhow::Ok(())
    });
    rsx! {
        document::Link { rel: "icon", href: FAVICON }
        document::Link { rel: "stylesheet", href: MAIN_CSS }
        if init.read().is_none() {
            "Loading..."
        } else {
            Router::<Route> {}
        }
    }
}

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
    #[route("/")]
    NewChat {},
    #[route("/chat/:id")]
    ChatEl { id: u32 },
    #[route("/settings")]
    Settings { },
    #[route("/:..segments")]
    PageNotFound { segments: Vec<String> },
}

/// Shared layout: top bar plus the history slideout.
#[component]
fn Layout() -> Element {
    let mut history_open = use_signal(|| false);
    rsx! {
        div { class: "topbar",
            Link { class: "brand", to: Route::NewChat {}, "braidchat" }
            div { class: "topbar-actions",
                Link { to: Route::NewChat {}, "New chat" }
                button {
                    onclick: move |_| history_open.toggle(),
                    "History"
                }
                Link { to: Route::Settings {}, "Settings" }
            }
        }
        Slideout { open: history_open,
            ChatLog { on_close: move |_| history_open.set(false) }
        }
        Outlet::<Route> {}
    }
}

#[component]
fn PageNotFound(segments: Vec<String>) -> Element {
    rsx! {
        "Could not find the page you are looking for."
        Link { to: Route::NewChat {}, "Go To Home" }
    }
}
