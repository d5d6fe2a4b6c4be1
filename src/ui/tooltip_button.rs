use dioxus::prelude::*;

/// Small icon-only button with a native tooltip.
#[component]
pub fn TooltipIconButton(
    tooltip: String,
    onclick: EventHandler<MouseEvent>,
    #[props(into, default)] class: String,
    children: Element,
) -> Element {
    rsx! {
        button {
            class: "icon-button {class}",
            title: "{tooltip}",
            onclick: move |e| onclick.call(e),
            {children}
        }
    }
}
