use dioxus::{logger::tracing::warn, prelude::*};

use crate::app_settings::{AppSettings, ProviderSettings};
use crate::llm::LlmClient;
use crate::storage::{Storage, get_storage};
use crate::ui::box_select::BoxSelect;

const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434/v1";

#[derive(Props, Clone, PartialEq)]
pub struct SettingsProps {
    pub on_close: Option<EventHandler<()>>,
}

/// Provider configuration page. Changes persist immediately and update the
/// settings context the rest of the app reads from.
#[component]
pub fn Settings(props: SettingsProps) -> Element {
    let mut provider = use_signal(move || ProviderSettings::OpenRouter {
        api_key: "".to_string(),
        model: None,
    });
    let mut settings = use_resource(move || async move {
        let storage = match get_storage().await {
            Ok(s) => Some(s),
            Err(e) => {
                warn!("could not get storage: {e:?}");
                None
            }
        };
        let stored = if let Some(st) = storage {
            st.load_settings().await.unwrap_or_default()
        } else {
            None
        };
        let s = stored.unwrap_or_else(|| AppSettings {
            provider: ProviderSettings::OpenRouter {
                api_key: "".to_string(),
                model: None,
            },
        });
        provider.set(s.provider.clone());
        s
    });
    let save_settings = move |s: AppSettings| async move {
        let storage = match get_storage().await {
            Ok(st) => Some(st),
            Err(e) => {
                warn!("could not get storage: {e:?}");
                None
            }
        };
        if let Some(st) = storage
            && let Err(e) = st.save_settings(&s).await
        {
            warn!("could not save settings: {e:?}");
        }
        let mut settings_ctx = consume_context::<Signal<Option<AppSettings>>>();
        settings_ctx.set(Some(s));
        settings.restart();
    };
    let handle_provider_change = move |ps: ProviderSettings| async move {
        save_settings(AppSettings { provider: ps }).await;
    };

    if settings().is_none() {
        return rsx! { "Loading..." };
    }

    rsx! {
        div {
            class: "settings-page",
            onclick: move |e: Event<MouseData>| {
                e.stop_propagation();
            },

            div { class: "settings-header",
                h3 { "Settings" }
                if let Some(on_close) = props.on_close {
                    button {
                        class: "settings-close",
                        onclick: move |_| {
                            on_close.call(());
                        },
                        "×"
                    }
                }
            }

            hr {}

            ElProviderSettings { ps: provider, onchange: handle_provider_change }
        }
    }
}

#[component]
fn ElProviderSettings(
    ps: Signal<ProviderSettings>,
    onchange: Callback<ProviderSettings, ()>,
) -> Element {
    let mut p_type = use_signal(|| match ps() {
        ProviderSettings::OpenRouter { .. } => "openrouter".to_string(),
        ProviderSettings::Ollama { .. } => "ollama".to_string(),
    });
    rsx! {
        h4 { "API provider" }
        BoxSelect {
            value: Some(p_type()),
            options: vec!["openrouter".to_string(), "ollama".to_string()],
            on_select: move |o: Option<String>| {
                if let Some(o) = o
                    && o != p_type()
                {
                    p_type.set(o);
                }
            },
        }
        if p_type() == "openrouter" {
            OpenRouterSettings { ps, onchange }
        }
        if p_type() == "ollama" {
            OllamaSettings { ps, onchange }
        }
    }
}

#[component]
fn OllamaSettings(
    ps: Signal<ProviderSettings>,
    onchange: Callback<ProviderSettings, ()>,
) -> Element {
    let mut available_models = use_signal(Vec::<String>::new);

    let handle_url_change = move |e: Event<FormData>| async move {
        let model = if let ProviderSettings::Ollama { model, .. } = ps() {
            model
        } else {
            None
        };
        onchange(ProviderSettings::Ollama {
            api_url: e.value(),
            model,
        });
    };
    let set_model = move |model: Option<String>| async move {
        let api_url = if let ProviderSettings::Ollama { api_url, .. } = ps() {
            api_url
        } else {
            DEFAULT_OLLAMA_URL.to_string()
        };
        onchange(ProviderSettings::Ollama { api_url, model });
    };
    let get_available_models = move || async move {
        let api_url = if let ProviderSettings::Ollama { api_url, .. } = ps() {
            api_url
        } else {
            DEFAULT_OLLAMA_URL.to_string()
        };
        let lmc = LlmClient::new(api_url, "".to_string());
        let models = lmc.models().await?;
        let names = models.data.into_iter().map(|m| m.id).collect::<Vec<_>>();
        anyhow::Ok(names)
    };
    let refresh_model_list = move |_e: Event<MouseData>| async move {
        match get_available_models().await {
            Ok(models) => {
                available_models.set(models);
            }
            Err(e) => {
                warn!("could not list models: {e:?}");
            }
        }
    };

    let (api_url, model) = if let ProviderSettings::Ollama { api_url, model } = ps() {
        (api_url, model)
    } else {
        (DEFAULT_OLLAMA_URL.to_string(), None)
    };

    rsx! {
        div { class: "provider-form",
            label { "API endpoint" }
            input { value: api_url, oninput: handle_url_change }
            label {
                "Select Model"
                button {
                    class: "refresh-models",
                    onclick: refresh_model_list,
                    "⟳ refresh list"
                }
            }
            BoxSelect {
                value: model,
                options: available_models(),
                on_select: set_model,
            }
        }
    }
}

#[component]
fn OpenRouterSettings(
    ps: Signal<ProviderSettings>,
    onchange: Callback<ProviderSettings, ()>,
) -> Element {
    let mut filter = use_signal(|| "".to_string());
    let mut available_models = use_signal(Vec::<String>::new);

    let handle_key_change = move |e: Event<FormData>| async move {
        let model = if let ProviderSettings::OpenRouter { model, .. } = ps() {
            model
        } else {
            None
        };
        onchange(ProviderSettings::OpenRouter {
            api_key: e.value(),
            model,
        });
    };
    let set_model = move |model: Option<String>| async move {
        let api_key = if let ProviderSettings::OpenRouter { api_key, .. } = ps() {
            api_key
        } else {
            "".to_string()
        };
        onchange(ProviderSettings::OpenRouter { api_key, model });
    };
    let get_available_models = move || async move {
        let api_key = if let ProviderSettings::OpenRouter { api_key, .. } = ps() {
            api_key
        } else {
            "".to_string()
        };
        let lmc = LlmClient::new("https://openrouter.ai/api/v1".to_string(), api_key);
        let models = lmc.models().await?;
        let names = models.data.into_iter().map(|m| m.id).collect::<Vec<_>>();
        anyhow::Ok(names)
    };
    let refresh_model_list = move |_e: Event<MouseData>| async move {
        match get_available_models().await {
            Ok(models) => {
                available_models.set(models);
            }
            Err(e) => {
                warn!("could not list models: {e:?}");
            }
        }
    };

    let filtered_models: Vec<String> = available_models()
        .into_iter()
        .filter(|s| s.to_lowercase().contains(&*filter.read()))
        .collect();

    let (api_key, model) = if let ProviderSettings::OpenRouter { api_key, model } = ps() {
        (api_key, model)
    } else {
        ("".to_string(), None)
    };

    rsx! {
        div { class: "provider-form",
            label { "API Key" }
            input { r#type: "password", value: api_key, oninput: handle_key_change }
            label {
                "Select Model"
                button {
                    class: "refresh-models",
                    onclick: refresh_model_list,
                    "⟳ refresh list"
                }
                input {
                    placeholder: "filter",
                    value: filter,
                    oninput: move |e| {
                        filter.set(e.value());
                    },
                }
            }
            BoxSelect {
                value: model,
                options: filtered_models,
                on_select: set_model,
            }
        }
    }
}
