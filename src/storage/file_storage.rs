use std::path::PathBuf;

use anyhow::Result;
use tokio::fs;

use crate::app_settings::AppSettings;
use crate::thread::Conversation;

/// JSON files under the app config dir: `settings.json` plus one
/// `chats/{id}.json` per conversation.
pub struct FileStorage {
    base: PathBuf,
}

impl FileStorage {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    fn settings_path(&self) -> PathBuf {
        self.base.join("settings.json")
    }

    fn chats_dir(&self) -> PathBuf {
        self.base.join("chats")
    }

    fn chat_path(&self, id: u32) -> PathBuf {
        self.chats_dir().join(format!("{id}.json"))
    }

    async fn chat_ids(&self) -> Result<Vec<u32>> {
        let mut ids = Vec::new();
        let mut entries = match fs::read_dir(self.chats_dir()).await {
            Ok(entries) => entries,
            Err(_) => return Ok(ids),
        };
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if let Some(stem) = name.strip_suffix(".json")
                && let Ok(id) = stem.parse::<u32>()
            {
                ids.push(id);
            }
        }
        ids.sort_unstable();
        Ok(ids)
    }
}

#[async_trait::async_trait(?Send)]
impl super::Storage for FileStorage {
    async fn save_settings(&self, settings: &AppSettings) -> Result<()> {
        fs::create_dir_all(&self.base).await?;
        let json = serde_json::to_string_pretty(settings)?;
        fs::write(self.settings_path(), json).await?;
        Ok(())
    }

    async fn load_settings(&self) -> Result<Option<AppSettings>> {
        match fs::read_to_string(self.settings_path()).await {
            Ok(data) => Ok(Some(serde_json::from_str(&data)?)),
            Err(_) => Ok(None),
        }
    }

    async fn save_chat(&self, conversation: &Conversation) -> Result<u32> {
        fs::create_dir_all(self.chats_dir()).await?;
        let id = match conversation.id {
            Some(id) => id,
            None => self.chat_ids().await?.last().map_or(1, |last| last + 1),
        };
        let mut snapshot = conversation.clone();
        snapshot.id = Some(id);
        let json = serde_json::to_string_pretty(&snapshot)?;
        fs::write(self.chat_path(id), json).await?;
        Ok(id)
    }

    async fn get_chat(&self, id: u32) -> Result<Option<Conversation>> {
        match fs::read_to_string(self.chat_path(id)).await {
            Ok(data) => Ok(Some(serde_json::from_str(&data)?)),
            Err(_) => Ok(None),
        }
    }

    async fn list_chats(&self) -> Result<Vec<Conversation>> {
        let mut chats = Vec::new();
        for id in self.chat_ids().await? {
            if let Some(chat) = self.get_chat(id).await? {
                chats.push(chat);
            }
        }
        // newest first
        chats.reverse();
        Ok(chats)
    }

    async fn delete_chat(&self, id: u32) -> Result<()> {
        fs::remove_file(self.chat_path(id)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::Storage;
    use super::*;
    use crate::thread::Role;

    fn conversation(text: &str) -> Conversation {
        let mut c = Conversation::default();
        c.tree.insert(None, Role::User, text.to_string());
        c
    }

    #[tokio::test]
    async fn chat_ids_are_allocated_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        let first = storage.save_chat(&conversation("one")).await.unwrap();
        let second = storage.save_chat(&conversation("two")).await.unwrap();
        assert_eq!((first, second), (1, 2));

        let listed = storage.list_chats().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, Some(2));
    }

    #[tokio::test]
    async fn saving_with_an_id_overwrites_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        let id = storage.save_chat(&conversation("draft")).await.unwrap();
        let mut updated = conversation("final");
        updated.id = Some(id);
        assert_eq!(storage.save_chat(&updated).await.unwrap(), id);
        assert_eq!(storage.list_chats().await.unwrap().len(), 1);

        let loaded = storage.get_chat(id).await.unwrap().unwrap();
        let root = loaded.tree.path()[0];
        assert_eq!(loaded.tree.content(root), Some("final"));
    }

    #[tokio::test]
    async fn delete_removes_the_chat() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        let id = storage.save_chat(&conversation("gone")).await.unwrap();
        storage.delete_chat(id).await.unwrap();
        assert!(storage.get_chat(id).await.unwrap().is_none());
        assert!(storage.list_chats().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn settings_roundtrip() {
        use crate::app_settings::{AppSettings, ProviderSettings};

        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        assert!(storage.load_settings().await.unwrap().is_none());
        let settings = AppSettings {
            provider: ProviderSettings::Ollama {
                api_url: "http://localhost:11434/v1".into(),
                model: Some("llama3".into()),
            },
        };
        storage.save_settings(&settings).await.unwrap();
        assert_eq!(storage.load_settings().await.unwrap(), Some(settings));
    }
}
