use dioxus::{logger::tracing::Level, prelude::*};

use braidchat::App;

fn main() {
    dioxus::logger::init(Level::INFO).unwrap();
    LaunchBuilder::new().launch(App)
}
