//! User interface components.
//!
//! `thread` holds the conversation view itself; the rest is application
//! chrome: pages, the history panel, settings, and small shared widgets.

mod box_select;      // Single-select option list
pub mod chat_log;    // Stored-conversation history panel
pub mod home;        // Chat pages (public for routing)
pub mod settings;    // Provider configuration page (public for routing)
pub mod slideout;
pub mod thread;      // Conversation view
mod tooltip_button;  // Icon button with tooltip
