//! Static page service
//!
//! Reads never 404 for a known page name: an unsaved page yields a
//! synthesized placeholder. Writes upsert.

use crate::db::repositories::PageRepository;
use crate::models::{ContentBlock, PageName, StaticPage};
use std::sync::Arc;
use thiserror::Error;

/// Static page service errors
#[derive(Debug, Error)]
pub enum PageError {
    #[error("Unknown page: {0}")]
    UnknownPage(String),

    #[error("Content block not found")]
    BlockNotFound,

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Static page service
pub struct PageService {
    repository: Arc<dyn PageRepository>,
}

impl PageService {
    pub fn new(repository: Arc<dyn PageRepository>) -> Self {
        Self { repository }
    }

    pub fn parse_name(name: &str) -> Result<PageName, PageError> {
        PageName::from_str(name).ok_or_else(|| PageError::UnknownPage(name.to_string()))
    }

    /// Get a page, falling back to a placeholder when it was never saved.
    pub async fn get(&self, page: PageName) -> Result<StaticPage, PageError> {
        Ok(self
            .repository
            .get(page)
            .await?
            .unwrap_or_else(|| StaticPage::placeholder(page)))
    }

    /// Every page in the fixed set, saved or placeholder.
    pub async fn list(&self) -> Result<Vec<StaticPage>, PageError> {
        let saved = self.repository.list().await?;
        Ok(PageName::ALL
            .into_iter()
            .map(|name| {
                saved
                    .iter()
                    .find(|p| p.page == name)
                    .cloned()
                    .unwrap_or_else(|| StaticPage::placeholder(name))
            })
            .collect())
    }

    /// Replace a page's content and blocks.
    pub async fn save(
        &self,
        page: PageName,
        content: serde_json::Value,
        blocks: Vec<ContentBlock>,
    ) -> Result<StaticPage, PageError> {
        let saved = self.repository.upsert(page, &content, &blocks).await?;
        tracing::info!(page = %page, "Static page saved");
        Ok(saved)
    }

    /// Append a content block with a generated id.
    pub async fn add_block(
        &self,
        page: PageName,
        kind: String,
        position: String,
        content: serde_json::Value,
    ) -> Result<StaticPage, PageError> {
        let current = self.get(page).await?;
        let mut blocks = current.blocks;
        blocks.push(ContentBlock::new(kind, position, content));
        Ok(self.repository.upsert(page, &current.content, &blocks).await?)
    }

    /// Replace the fields of an existing block; unset fields are kept.
    pub async fn update_block(
        &self,
        page: PageName,
        block_id: &str,
        kind: Option<String>,
        position: Option<String>,
        content: Option<serde_json::Value>,
    ) -> Result<StaticPage, PageError> {
        let current = self.get(page).await?;
        let mut blocks = current.blocks;
        let block = blocks
            .iter_mut()
            .find(|b| b.id == block_id)
            .ok_or(PageError::BlockNotFound)?;

        if let Some(kind) = kind {
            block.kind = kind;
        }
        if let Some(position) = position {
            block.position = position;
        }
        if let Some(content) = content {
            block.content = content;
        }

        Ok(self.repository.upsert(page, &current.content, &blocks).await?)
    }

    /// Remove a block by id.
    pub async fn remove_block(
        &self,
        page: PageName,
        block_id: &str,
    ) -> Result<StaticPage, PageError> {
        let current = self.get(page).await?;
        let mut blocks = current.blocks;
        let before = blocks.len();
        blocks.retain(|b| b.id != block_id);
        if blocks.len() == before {
            return Err(PageError::BlockNotFound);
        }
        Ok(self.repository.upsert(page, &current.content, &blocks).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::SqlxPageRepository;
    use crate::db::{create_test_pool, migrations};
    use serde_json::json;

    async fn setup() -> PageService {
        let pool = create_test_pool().await.expect("pool");
        migrations::run_migrations(&pool).await.expect("migrations");
        PageService::new(SqlxPageRepository::boxed(pool))
    }

    #[tokio::test]
    async fn test_unsaved_page_is_placeholder() {
        let service = setup().await;
        let page = service.get(PageName::About).await.expect("get");
        assert_eq!(page.content["placeholder"], true);
    }

    #[tokio::test]
    async fn test_save_then_get() {
        let service = setup().await;
        service
            .save(PageName::About, json!({"title": "About Me"}), vec![])
            .await
            .expect("save");

        let page = service.get(PageName::About).await.expect("get");
        assert_eq!(page.content["title"], "About Me");
        assert!(page.content.get("placeholder").is_none());
    }

    #[tokio::test]
    async fn test_list_covers_every_page() {
        let service = setup().await;
        service
            .save(PageName::Tools, json!({"title": "Tools"}), vec![])
            .await
            .expect("save");

        let pages = service.list().await.expect("list");
        assert_eq!(pages.len(), PageName::ALL.len());
        let tools = pages.iter().find(|p| p.page == PageName::Tools).unwrap();
        assert!(tools.content.get("placeholder").is_none());
    }

    #[tokio::test]
    async fn test_block_lifecycle() {
        let service = setup().await;

        let page = service
            .add_block(
                PageName::About,
                "hero".to_string(),
                "1".to_string(),
                json!({"heading": "Welcome"}),
            )
            .await
            .expect("add");
        assert_eq!(page.blocks.len(), 1);
        let block_id = page.blocks[0].id.clone();

        let page = service
            .update_block(
                PageName::About,
                &block_id,
                None,
                Some("2".to_string()),
                None,
            )
            .await
            .expect("update");
        assert_eq!(page.blocks[0].position, "2");
        assert_eq!(page.blocks[0].kind, "hero");

        let page = service
            .remove_block(PageName::About, &block_id)
            .await
            .expect("remove");
        assert!(page.blocks.is_empty());

        let err = service
            .remove_block(PageName::About, &block_id)
            .await
            .unwrap_err();
        assert!(matches!(err, PageError::BlockNotFound));
    }

    #[tokio::test]
    async fn test_unknown_name_rejected() {
        let err = PageService::parse_name("pricing").unwrap_err();
        assert!(matches!(err, PageError::UnknownPage(_)));
    }
}
