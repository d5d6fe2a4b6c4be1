use async_trait::async_trait;

use crate::app_settings::AppSettings;
use crate::thread::Conversation;

mod file_storage;

pub type AppStorage = file_storage::FileStorage;

#[async_trait(?Send)]
pub trait Storage {
    async fn save_settings(&self, settings: &AppSettings) -> anyhow::Result<()>;
    async fn load_settings(&self) -> anyhow::Result<Option<AppSettings>>;

    /// Saves a conversation, allocating an id when it has none yet.
    async fn save_chat(&self, conversation: &Conversation) -> anyhow::Result<u32>;
    async fn get_chat(&self, id: u32) -> anyhow::Result<Option<Conversation>>;
    async fn list_chats(&self) -> anyhow::Result<Vec<Conversation>>;
    async fn delete_chat(&self, id: u32) -> anyhow::Result<()>;
}

pub async fn get_storage() -> anyhow::Result<AppStorage> {
    use std::path::PathBuf;

    use directories_next::ProjectDirs;

    let base = if let Some(proj_dirs) = ProjectDirs::from("io", "braidchat", "braidchat") {
        proj_dirs.config_dir().to_path_buf()
    } else {
        PathBuf::from(".")
    };
    Ok(AppStorage::new(base))
}
