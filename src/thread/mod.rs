//! Conversation state and run lifecycle.
//!
//! This module owns everything the presentational components in
//! [`crate::ui::thread`] render from: the branching message tree, the
//! running/streaming flags, edit and copy markers, and persistence after a
//! completed run. Components reach it through the context handle returned
//! by [`use_thread`].

mod runtime;
mod tree;

pub use runtime::{EditDraft, ThreadHandle, ThreadMessages, use_thread, use_thread_provider};
pub use tree::{MessageId, MessageNode, MessageTree, Role};

use serde::{Deserialize, Serialize};

/// A conversation as stored on disk: the tree plus its storage id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Conversation {
    pub id: Option<u32>,
    pub tree: MessageTree,
}
