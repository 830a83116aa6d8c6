//! In-process gateway bound directly to a [`PromptStore`].

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use prompt_primitives::{CategoryLabel, NewPrompt, PromptIndex, PromptRecord};
use prompt_store::PromptStore;
use tracing::debug;

use crate::traits::{GatewayResult, ImageUpload, PromptGateway};

/// Gateway that skips the network and calls the store itself.
#[derive(Clone, Debug)]
pub struct LocalGateway {
    store: Arc<PromptStore>,
}

impl LocalGateway {
    /// Wraps a shared store.
    #[must_use]
    pub fn new(store: Arc<PromptStore>) -> Self {
        Self { store }
    }

    /// Returns the underlying store.
    #[must_use]
    pub fn store(&self) -> &Arc<PromptStore> {
        &self.store
    }
}

#[async_trait]
impl PromptGateway for LocalGateway {
    async fn list_prompts(&self) -> GatewayResult<Vec<PromptRecord>> {
        Ok(self.store.list_prompts().await?)
    }

    async fn list_categories(&self) -> GatewayResult<Vec<CategoryLabel>> {
        Ok(self.store.list_categories().await?)
    }

    async fn add_prompt(&self, new: &NewPrompt) -> GatewayResult<PromptIndex> {
        Ok(self.store.add_prompt(new.clone()).await?)
    }

    async fn update_prompt(&self, record: &PromptRecord) -> GatewayResult<()> {
        Ok(self.store.update_prompt(record.clone()).await?)
    }

    async fn delete_prompt(&self, index: PromptIndex) -> GatewayResult<()> {
        self.store.delete_prompt(index).await?;
        Ok(())
    }

    async fn add_category(&self, category: &str) -> GatewayResult<()> {
        self.store.add_category(category).await?;
        Ok(())
    }

    async fn delete_category(&self, category: &str) -> GatewayResult<()> {
        self.store.delete_category(category).await?;
        Ok(())
    }

    async fn upload_image(
        &self,
        index: PromptIndex,
        image: &ImageUpload,
    ) -> GatewayResult<String> {
        Ok(self
            .store
            .save_image(index, image.file_name(), image.data())
            .await?)
    }

    async fn fetch_image(&self, filename: &str) -> GatewayResult<Bytes> {
        let (data, _) = self.store.read_image(filename).await?;
        Ok(data)
    }

    async fn delete_image(&self, filename: &str) -> GatewayResult<()> {
        let removed = self.store.delete_image(filename).await?;
        debug!(%filename, removed, "local image delete");
        Ok(())
    }

    async fn save_all(&self, prompts: &[PromptRecord]) -> GatewayResult<usize> {
        Ok(self.store.save_all(prompts.to_vec()).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::GatewayError;
    use prompt_store::{StoreConfig, StoreError};
    use uuid::Uuid;

    async fn gateway() -> LocalGateway {
        let dir = std::env::temp_dir().join(format!("prompt-gateway-{}", Uuid::new_v4()));
        let store = PromptStore::open(StoreConfig::new(dir).without_sample_prompts())
            .await
            .expect("store opens");
        LocalGateway::new(Arc::new(store))
    }

    #[tokio::test]
    async fn add_then_list_round_trips_through_store() {
        let gateway = gateway().await;
        let index = gateway
            .add_prompt(&NewPrompt::new("Hero", "standing tall").with_categories(["Poses"]))
            .await
            .unwrap();
        assert_eq!(index, PromptIndex::new(1));

        let prompts = gateway.list_prompts().await.unwrap();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].categories, vec!["poses".to_owned()]);
    }

    #[tokio::test]
    async fn image_upload_fetch_and_delete() {
        let gateway = gateway().await;
        let index = gateway
            .add_prompt(&NewPrompt::new("Hero", "standing tall"))
            .await
            .unwrap();

        let upload = ImageUpload::new("shot.PNG", vec![9_u8, 8, 7]);
        let filename = gateway.upload_image(index, &upload).await.unwrap();
        assert_eq!(filename, "prompt_1.png");
        assert_eq!(
            gateway.fetch_image(&filename).await.unwrap().as_ref(),
            &[9, 8, 7]
        );

        gateway.delete_image(&filename).await.unwrap();
        let err = gateway.fetch_image(&filename).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn unknown_index_surfaces_store_error() {
        let gateway = gateway().await;
        let err = gateway.delete_prompt(PromptIndex::new(42)).await.unwrap_err();
        assert!(matches!(
            err,
            GatewayError::Store(StoreError::NotFound { .. })
        ));
    }
}
