use dioxus::prelude::*;

/// Single-select list rendered as a column of clickable options.
#[component]
pub fn BoxSelect(
    value: Option<String>,
    options: Vec<String>,
    placeholder: Option<String>,
    on_select: Callback<Option<String>, ()>,
) -> Element {
    let placeholder = placeholder.unwrap_or_else(|| "-- Select One --".to_string());
    let selected_none_class = if value.is_none() { "selected" } else { "" };
    rsx! {
        div { class: "box-select",
            div {
                class: "option {selected_none_class}",
                onclick: move |_e| { on_select(None) },
                "{placeholder}"
            }
            for option in options {
                {
                    let label = option.clone();
                    let selected_class = if value.as_deref() == Some(option.as_str()) {
                        "selected"
                    } else {
                        ""
                    };
                    rsx! {
                        div {
                            key: "{label}",
                            class: "option {selected_class}",
                            onclick: move |_e| { on_select(Some(option.clone())) },
                            "{label}"
                        }
                    }
                }
            }
        }
    }
}
