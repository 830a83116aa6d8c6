//! The session owning node state, dialog and backend access.

use std::sync::Arc;

use prompt_engine::{
    DialogError, DialogEvent, DialogState, ManagerDialog, ManagerView, NodeSnapshot,
    PromptManagerNode, Tab,
};
use prompt_gateway::{GatewayError, ImageUpload, PromptGateway};
use prompt_primitives::{CategoryLabel, NewPrompt, PromptIndex, PromptRecord};
use tracing::{debug, info, warn};

use crate::confirm::Confirm;
use crate::error::{SessionError, SessionResult};
use crate::upload::{ImageAttachment, ImageEvent, ImagePhase};

/// What an edit does to the record's preview image.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ImageChange {
    /// Leave the current image in place.
    #[default]
    Keep,
    /// Delete the current image (if any) and upload a new one.
    Replace(ImageUpload),
    /// Delete the current image and clear the reference.
    Remove,
}

/// Result of an add or edit.
#[derive(Clone, Debug)]
pub struct MutationOutcome {
    /// Index of the saved record.
    pub index: PromptIndex,
    /// Final image phase.
    pub phase: ImagePhase,
    /// Upload failure reported when `phase` is [`ImagePhase::ImageFailed`].
    pub image_error: Option<String>,
    /// View rendered after the refetch.
    pub view: ManagerView,
}

/// Owns the prompt manager node and drives its dialog against a backend.
///
/// Every method takes `&mut self`; one task owns the session and network
/// calls only suspend that task.
pub struct ManagerSession<G: PromptGateway + ?Sized> {
    gateway: Arc<G>,
    node: PromptManagerNode,
    dialog: ManagerDialog,
}

impl<G: PromptGateway + ?Sized> std::fmt::Debug for ManagerSession<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManagerSession")
            .field("node", &self.node)
            .field("dialog", &self.dialog)
            .finish_non_exhaustive()
    }
}

impl<G: PromptGateway + ?Sized> ManagerSession<G> {
    /// Creates a session with an empty node.
    #[must_use]
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            node: PromptManagerNode::new(),
            dialog: ManagerDialog::new(),
        }
    }

    /// Creates a session restoring a previously serialized node.
    #[must_use]
    pub fn restore(gateway: Arc<G>, snapshot: &NodeSnapshot) -> Self {
        let mut session = Self::new(gateway);
        session.node.configure(snapshot);
        session
    }

    /// Returns the node state.
    #[must_use]
    pub fn node(&self) -> &PromptManagerNode {
        &self.node
    }

    /// Returns the dialog state.
    #[must_use]
    pub fn dialog(&self) -> &ManagerDialog {
        &self.dialog
    }

    /// Returns the backend gateway.
    #[must_use]
    pub fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }

    /// Serializes the node for the host graph.
    #[must_use]
    pub fn snapshot(&self) -> NodeSnapshot {
        self.node.serialize()
    }

    /// Text of the selection badge, if any.
    #[must_use]
    pub fn badge(&self) -> Option<String> {
        self.node.badge()
    }

    /// Loads both stores and opens the dialog on the `All` tab.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Dialog`] when already open and
    /// [`SessionError::Gateway`] when the load fails; the dialog stays closed
    /// in both cases.
    pub async fn open(&mut self) -> SessionResult<ManagerView> {
        if self.dialog.is_open() {
            return Err(SessionError::Dialog(DialogError::InvalidTransition {
                from: DialogState::Open,
                event: DialogEvent::Open,
            }));
        }
        self.fetch().await?;
        let view = self.dialog.open(&self.node)?;
        info!(prompts = self.node.prompts().len(), "prompt manager opened");
        Ok(view)
    }

    /// Renders the dialog without changing anything.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::DialogClosed`] when the dialog is closed.
    pub fn view(&self) -> SessionResult<ManagerView> {
        self.dialog.ensure_open()?;
        Ok(self.dialog.render(&self.node))
    }

    /// Switches the active tab.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::DialogClosed`] when the dialog is closed.
    pub fn set_tab(&mut self, tab: Tab) -> SessionResult<ManagerView> {
        Ok(self.dialog.set_tab(tab, &self.node)?)
    }

    /// Switches to a category tab, as when clicking a category pill.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::DialogClosed`] when the dialog is closed.
    pub fn show_category(&mut self, label: &str) -> SessionResult<ManagerView> {
        self.set_tab(Tab::category(label))
    }

    /// Updates the search text.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::DialogClosed`] when the dialog is closed.
    pub fn set_search(&mut self, search: impl Into<String>) -> SessionResult<ManagerView> {
        Ok(self.dialog.set_search(search, &self.node)?)
    }

    /// Flips selection of one record.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::DialogClosed`] when the dialog is closed.
    pub fn toggle(&mut self, index: PromptIndex) -> SessionResult<ManagerView> {
        Ok(self.dialog.toggle(index, &mut self.node)?)
    }

    /// Adds every record of the filtered view to the selection.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::DialogClosed`] when the dialog is closed.
    pub fn select_all(&mut self) -> SessionResult<ManagerView> {
        Ok(self.dialog.select_all(&mut self.node)?)
    }

    /// Clears the selection.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::DialogClosed`] when the dialog is closed.
    pub fn deselect_all(&mut self) -> SessionResult<ManagerView> {
        Ok(self.dialog.deselect_all(&mut self.node)?)
    }

    /// Commits the projection to the output field and closes the dialog.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Dialog`] when the dialog is closed.
    pub fn apply(&mut self) -> SessionResult<String> {
        let output = self.dialog.apply(&mut self.node)?;
        info!(
            selected = self.node.selection().len(),
            chars = output.len(),
            "applied prompt selection"
        );
        Ok(output)
    }

    /// Closes the dialog, keeping the previous output.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Dialog`] when the dialog is closed.
    pub fn dismiss(&mut self) -> SessionResult<()> {
        Ok(self.dialog.dismiss()?)
    }

    /// Creates a record, then uploads and links the optional image.
    ///
    /// A failed upload leaves the record saved without an image and is
    /// reported through [`MutationOutcome::phase`].
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Validation`] for a blank title or body,
    /// [`SessionError::DialogClosed`] when closed, and
    /// [`SessionError::Gateway`] when the record cannot be created.
    pub async fn add_prompt(
        &mut self,
        draft: NewPrompt,
        image: Option<ImageUpload>,
    ) -> SessionResult<MutationOutcome> {
        self.dialog.ensure_open()?;
        let mut draft = draft.validate()?;
        draft.image = None;

        let index = self
            .gateway
            .add_prompt(&draft)
            .await
            .map_err(|err| gateway_failure("add prompt", err))?;
        info!(%index, title = %draft.title, "prompt created");

        let mut attachment = ImageAttachment::new(index);
        let mut image_error = None;
        if let Some(upload) = image {
            let record = PromptRecord::from_new(index, draft);
            if let Err(err) = self.attach_image(&mut attachment, record, &upload).await {
                image_error = Some(err.to_string());
            }
        }

        let view = self.refresh().await?;
        Ok(MutationOutcome {
            index,
            phase: attachment.phase(),
            image_error,
            view,
        })
    }

    /// Replaces a record wholesale and applies the image change.
    ///
    /// The prior image is deleted before a replacement upload; a failed delete
    /// is logged and does not block the upload.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Validation`] for a blank title or body,
    /// [`SessionError::UnknownPrompt`] for an index not in the loaded list,
    /// [`SessionError::DialogClosed`] when closed, and
    /// [`SessionError::Gateway`] when the update fails.
    pub async fn edit_prompt(
        &mut self,
        index: PromptIndex,
        draft: NewPrompt,
        change: ImageChange,
    ) -> SessionResult<MutationOutcome> {
        self.dialog.ensure_open()?;
        let draft = draft.validate()?;
        let previous = self
            .node
            .find(index)
            .ok_or(SessionError::UnknownPrompt { index })?
            .image()
            .map(str::to_owned);

        let mut record = PromptRecord::from_new(index, draft);
        record.image = match &change {
            ImageChange::Keep => previous.clone(),
            ImageChange::Replace(_) | ImageChange::Remove => None,
        };

        if !matches!(change, ImageChange::Keep) {
            if let Some(old) = previous.as_deref() {
                self.delete_image_best_effort(old).await;
            }
        }

        self.gateway
            .update_prompt(&record)
            .await
            .map_err(|err| gateway_failure("update prompt", err))?;
        info!(%index, title = %record.title, "prompt updated");

        let mut attachment = ImageAttachment::new(index);
        let mut image_error = None;
        if let ImageChange::Replace(upload) = &change {
            if let Err(err) = self.attach_image(&mut attachment, record, upload).await {
                image_error = Some(err.to_string());
            }
        }

        let view = self.refresh().await?;
        Ok(MutationOutcome {
            index,
            phase: attachment.phase(),
            image_error,
            view,
        })
    }

    /// Deletes a record after confirmation and drops it from the selection.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Cancelled`] when declined,
    /// [`SessionError::UnknownPrompt`] for an index not in the loaded list,
    /// [`SessionError::DialogClosed`] when closed, and
    /// [`SessionError::Gateway`] when the delete fails.
    pub async fn delete_prompt(
        &mut self,
        index: PromptIndex,
        confirm: &dyn Confirm,
    ) -> SessionResult<ManagerView> {
        self.dialog.ensure_open()?;
        let title = self
            .node
            .find(index)
            .map(|record| record.title.clone())
            .ok_or(SessionError::UnknownPrompt { index })?;

        if !confirm.confirm(&format!("Delete prompt \"{title}\"?")) {
            debug!(%index, "prompt delete cancelled");
            return Err(SessionError::Cancelled);
        }

        self.gateway
            .delete_prompt(index)
            .await
            .map_err(|err| gateway_failure("delete prompt", err))?;
        self.node.forget(index);
        info!(%index, %title, "prompt deleted");
        self.refresh().await
    }

    /// Flips the favourite flag with a full-record update.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnknownPrompt`] for an index not in the loaded
    /// list, [`SessionError::DialogClosed`] when closed, and
    /// [`SessionError::Gateway`] when the update fails.
    pub async fn toggle_favorite(&mut self, index: PromptIndex) -> SessionResult<ManagerView> {
        self.dialog.ensure_open()?;
        let mut record = self
            .node
            .find(index)
            .cloned()
            .ok_or(SessionError::UnknownPrompt { index })?;
        record.favorite = !record.favorite;

        self.gateway
            .update_prompt(&record)
            .await
            .map_err(|err| gateway_failure("toggle favourite", err))?;
        debug!(%index, favorite = record.favorite, "favourite toggled");
        self.refresh().await
    }

    /// Registers a category.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Validation`] for a blank or malformed label,
    /// [`SessionError::DialogClosed`] when closed, and
    /// [`SessionError::Gateway`] when the call fails.
    pub async fn add_category(&mut self, input: &str) -> SessionResult<ManagerView> {
        self.dialog.ensure_open()?;
        let label = CategoryLabel::new(input)?;
        self.gateway
            .add_category(label.as_str())
            .await
            .map_err(|err| gateway_failure("add category", err))?;
        info!(category = %label, "category added");
        self.refresh().await
    }

    /// Removes a category after confirmation. Records keep the label.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Cancelled`] when declined,
    /// [`SessionError::Validation`] for a malformed label,
    /// [`SessionError::DialogClosed`] when closed, and
    /// [`SessionError::Gateway`] when the call fails.
    pub async fn delete_category(
        &mut self,
        input: &str,
        confirm: &dyn Confirm,
    ) -> SessionResult<ManagerView> {
        self.dialog.ensure_open()?;
        let label = CategoryLabel::new(input)?;
        if !confirm.confirm(&format!("Delete category \"{label}\"?")) {
            debug!(category = %label, "category delete cancelled");
            return Err(SessionError::Cancelled);
        }

        self.gateway
            .delete_category(label.as_str())
            .await
            .map_err(|err| gateway_failure("delete category", err))?;
        info!(category = %label, "category deleted");
        self.refresh().await
    }

    async fn attach_image(
        &self,
        attachment: &mut ImageAttachment,
        mut record: PromptRecord,
        upload: &ImageUpload,
    ) -> Result<(), GatewayError> {
        advance(attachment, ImageEvent::BeginUpload);
        let result = async {
            let filename = self.gateway.upload_image(record.index, upload).await?;
            record.image = Some(filename);
            self.gateway.update_prompt(&record).await
        }
        .await;

        match result {
            Ok(()) => {
                advance(attachment, ImageEvent::Attached);
                info!(index = %record.index, image = ?record.image, "image attached");
                Ok(())
            }
            Err(err) => {
                advance(attachment, ImageEvent::Failed);
                warn!(index = %record.index, error = %err, "image upload failed, record kept without image");
                Err(err)
            }
        }
    }

    async fn delete_image_best_effort(&self, filename: &str) {
        if let Err(err) = self.gateway.delete_image(filename).await {
            warn!(%filename, error = %err, "failed to delete previous image");
        }
    }

    async fn fetch(&mut self) -> SessionResult<()> {
        let prompts = self
            .gateway
            .list_prompts()
            .await
            .map_err(|err| gateway_failure("load prompts", err))?;
        let categories = self
            .gateway
            .list_categories()
            .await
            .map_err(|err| gateway_failure("load categories", err))?;
        self.node.replace_prompts(prompts);
        self.node.replace_categories(categories);
        Ok(())
    }

    async fn refresh(&mut self) -> SessionResult<ManagerView> {
        self.fetch().await?;
        self.dialog.rebuild_tabs(&self.node);
        Ok(self.dialog.render(&self.node))
    }
}

fn advance(attachment: &mut ImageAttachment, event: ImageEvent) {
    if let Err(err) = attachment.transition(event) {
        debug!(error = %err, "ignored image phase event");
    }
}

fn gateway_failure(operation: &'static str, err: GatewayError) -> SessionError {
    warn!(operation, error = %err, "backend call failed");
    SessionError::Gateway(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::AlwaysConfirm;
    use async_trait::async_trait;
    use bytes::Bytes;
    use prompt_gateway::{GatewayResult, LocalGateway};
    use prompt_store::{PromptStore, StoreConfig};
    use uuid::Uuid;

    async fn local_gateway() -> Arc<LocalGateway> {
        let dir = std::env::temp_dir().join(format!("prompt-kernel-{}", Uuid::new_v4()));
        let store = PromptStore::open(
            StoreConfig::new(dir)
                .without_sample_prompts()
                .with_default_categories(["poses", "lighting"]),
        )
        .await
        .expect("store opens");
        Arc::new(LocalGateway::new(Arc::new(store)))
    }

    async fn seeded_session() -> ManagerSession<LocalGateway> {
        let gateway = local_gateway().await;
        for (title, body, cat) in [
            ("Hero", "standing tall", "poses"),
            ("Glow", "rim light", "lighting"),
            ("Crouch", "low stance", "poses"),
        ] {
            gateway
                .add_prompt(&NewPrompt::new(title, body).with_categories([cat]))
                .await
                .unwrap();
        }
        let mut session = ManagerSession::new(gateway);
        session.open().await.unwrap();
        session
    }

    /// Delegates to a local store, optionally failing uploads or image deletes.
    struct Faulty {
        inner: LocalGateway,
        fail_uploads: bool,
        fail_deletes: bool,
    }

    impl Faulty {
        fn uploads(inner: &LocalGateway) -> Self {
            Self {
                inner: inner.clone(),
                fail_uploads: true,
                fail_deletes: false,
            }
        }

        fn deletes(inner: &LocalGateway) -> Self {
            Self {
                inner: inner.clone(),
                fail_uploads: false,
                fail_deletes: true,
            }
        }
    }

    #[async_trait]
    impl PromptGateway for Faulty {
        async fn list_prompts(&self) -> GatewayResult<Vec<PromptRecord>> {
            self.inner.list_prompts().await
        }
        async fn list_categories(&self) -> GatewayResult<Vec<CategoryLabel>> {
            self.inner.list_categories().await
        }
        async fn add_prompt(&self, new: &NewPrompt) -> GatewayResult<PromptIndex> {
            self.inner.add_prompt(new).await
        }
        async fn update_prompt(&self, record: &PromptRecord) -> GatewayResult<()> {
            self.inner.update_prompt(record).await
        }
        async fn delete_prompt(&self, index: PromptIndex) -> GatewayResult<()> {
            self.inner.delete_prompt(index).await
        }
        async fn add_category(&self, category: &str) -> GatewayResult<()> {
            self.inner.add_category(category).await
        }
        async fn delete_category(&self, category: &str) -> GatewayResult<()> {
            self.inner.delete_category(category).await
        }
        async fn upload_image(
            &self,
            index: PromptIndex,
            image: &ImageUpload,
        ) -> GatewayResult<String> {
            if self.fail_uploads {
                return Err(GatewayError::transport("connection reset"));
            }
            self.inner.upload_image(index, image).await
        }
        async fn fetch_image(&self, filename: &str) -> GatewayResult<Bytes> {
            self.inner.fetch_image(filename).await
        }
        async fn delete_image(&self, filename: &str) -> GatewayResult<()> {
            if self.fail_deletes {
                return Err(GatewayError::transport("image delete refused"));
            }
            self.inner.delete_image(filename).await
        }
        async fn save_all(&self, prompts: &[PromptRecord]) -> GatewayResult<usize> {
            self.inner.save_all(prompts).await
        }
    }

    #[tokio::test]
    async fn open_loads_stores_and_resets_filter() {
        let mut session = seeded_session().await;
        session.set_search("light").unwrap();
        session.dismiss().unwrap();

        let view = session.open().await.unwrap();
        assert_eq!(view.search, "");
        assert_eq!(view.items.len(), 3);
        let labels: Vec<_> = view.tabs.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, ["All", "Favorites", "lighting", "poses"]);
    }

    #[tokio::test]
    async fn open_twice_is_rejected() {
        let mut session = seeded_session().await;
        let err = session.open().await.unwrap_err();
        assert!(matches!(err, SessionError::Dialog(_)));
    }

    #[tokio::test]
    async fn operations_require_open_dialog() {
        let gateway = local_gateway().await;
        let mut session = ManagerSession::new(gateway);
        assert!(matches!(
            session.toggle(PromptIndex::new(1)),
            Err(SessionError::DialogClosed)
        ));
        assert!(matches!(
            session.add_category("moods").await,
            Err(SessionError::DialogClosed)
        ));
    }

    #[tokio::test]
    async fn select_all_then_apply_projects_in_index_order() {
        let mut session = seeded_session().await;
        session.show_category("poses").unwrap();
        let view = session.select_all().unwrap();
        assert_eq!(view.selected_count, 2);

        let output = session.apply().unwrap();
        assert_eq!(output, "standing tall\nlow stance");
        assert_eq!(session.node().output(), output);
        assert_eq!(session.badge().as_deref(), Some("✓ 2"));
    }

    #[tokio::test]
    async fn dismiss_keeps_previous_output() {
        let mut session = seeded_session().await;
        session.toggle(PromptIndex::new(1)).unwrap();
        session.apply().unwrap();

        session.open().await.unwrap();
        session.toggle(PromptIndex::new(2)).unwrap();
        session.dismiss().unwrap();
        assert_eq!(session.node().output(), "standing tall");
        assert_eq!(session.node().selection().len(), 2);
    }

    #[tokio::test]
    async fn add_prompt_validates_before_calling_backend() {
        let mut session = seeded_session().await;
        let err = session
            .add_prompt(NewPrompt::new("  ", "body"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Validation(_)));
        assert_eq!(session.node().prompts().len(), 3);
    }

    #[tokio::test]
    async fn add_prompt_with_image_attaches_it() {
        let mut session = seeded_session().await;
        let outcome = session
            .add_prompt(
                NewPrompt::new("Wave", "waving hand").with_categories(["Gestures"]),
                Some(ImageUpload::new("wave.webp", vec![1_u8, 2])),
            )
            .await
            .unwrap();

        assert_eq!(outcome.index, PromptIndex::new(4));
        assert_eq!(outcome.phase, ImagePhase::ImageAttached);
        let record = session.node().find(outcome.index).unwrap();
        assert_eq!(record.image(), Some("prompt_4.webp"));
        assert!(outcome.view.tabs.iter().any(|t| t.label == "gestures"));
    }

    #[tokio::test]
    async fn failed_upload_keeps_record_without_image() {
        let inner = local_gateway().await;
        let gateway = Arc::new(Faulty::uploads(&inner));
        let mut session = ManagerSession::new(gateway);
        session.open().await.unwrap();

        let outcome = session
            .add_prompt(
                NewPrompt::new("Wave", "waving hand"),
                Some(ImageUpload::new("wave.png", vec![1_u8])),
            )
            .await
            .unwrap();
        assert_eq!(outcome.phase, ImagePhase::ImageFailed);
        assert!(outcome.image_error.unwrap().contains("connection reset"));
        assert_eq!(session.node().find(outcome.index).unwrap().image(), None);
    }

    #[tokio::test]
    async fn edit_replaces_and_removes_image() {
        let mut session = seeded_session().await;
        let index = PromptIndex::new(1);
        let outcome = session
            .edit_prompt(
                index,
                NewPrompt::new("Hero", "standing taller").with_categories(["poses"]),
                ImageChange::Replace(ImageUpload::new("hero.jpg", vec![5_u8])),
            )
            .await
            .unwrap();
        assert_eq!(outcome.phase, ImagePhase::ImageAttached);
        assert_eq!(session.node().find(index).unwrap().image(), Some("prompt_1.jpg"));

        let outcome = session
            .edit_prompt(
                index,
                NewPrompt::new("Hero", "standing taller"),
                ImageChange::Remove,
            )
            .await
            .unwrap();
        assert_eq!(outcome.phase, ImagePhase::Created);
        let record = session.node().find(index).unwrap();
        assert_eq!(record.image(), None);
        assert!(record.categories.is_empty());
        assert!(session.gateway().fetch_image("prompt_1.jpg").await.is_err());
    }

    #[tokio::test]
    async fn failed_delete_of_old_image_does_not_block_replacement() {
        let inner = local_gateway().await;
        let index = inner
            .add_prompt(&NewPrompt::new("Hero", "standing tall"))
            .await
            .unwrap();
        let old = inner
            .upload_image(index, &ImageUpload::new("hero.png", vec![1_u8]))
            .await
            .unwrap();
        let mut record = PromptRecord::from_new(index, NewPrompt::new("Hero", "standing tall"));
        record.image = Some(old.clone());
        inner.update_prompt(&record).await.unwrap();

        let mut session = ManagerSession::new(Arc::new(Faulty::deletes(&inner)));
        session.open().await.unwrap();
        let outcome = session
            .edit_prompt(
                index,
                NewPrompt::new("Hero", "standing taller"),
                ImageChange::Replace(ImageUpload::new("hero.jpg", vec![2_u8])),
            )
            .await
            .unwrap();

        assert_eq!(outcome.phase, ImagePhase::ImageAttached);
        assert!(outcome.image_error.is_none());
        assert_eq!(session.node().find(index).unwrap().image(), Some("prompt_1.jpg"));
        assert_eq!(&inner.fetch_image(&old).await.unwrap()[..], &[1_u8]);
    }

    #[tokio::test]
    async fn edit_unknown_index_is_rejected() {
        let mut session = seeded_session().await;
        let err = session
            .edit_prompt(PromptIndex::new(99), NewPrompt::new("a", "b"), ImageChange::Keep)
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::UnknownPrompt { .. }));
    }

    #[tokio::test]
    async fn delete_requires_confirmation_and_drops_selection() {
        let mut session = seeded_session().await;
        session.toggle(PromptIndex::new(2)).unwrap();

        let declined = session
            .delete_prompt(PromptIndex::new(2), &|_: &str| false)
            .await
            .unwrap_err();
        assert!(matches!(declined, SessionError::Cancelled));
        assert_eq!(session.node().prompts().len(), 3);

        let view = session
            .delete_prompt(PromptIndex::new(2), &AlwaysConfirm)
            .await
            .unwrap();
        assert_eq!(view.items.len(), 2);
        assert_eq!(view.selected_count, 0);
        assert!(!session.node().selection().contains(PromptIndex::new(2)));
    }

    #[tokio::test]
    async fn toggle_favorite_round_trips() {
        let mut session = seeded_session().await;
        session.toggle_favorite(PromptIndex::new(3)).await.unwrap();
        let view = session.set_tab(Tab::Favorites).unwrap();
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].title, "Crouch");
    }

    #[tokio::test]
    async fn category_add_and_delete() {
        let mut session = seeded_session().await;
        assert!(matches!(
            session.add_category("   ").await,
            Err(SessionError::Validation(_))
        ));

        let view = session.add_category("  Moods ").await.unwrap();
        assert!(view.tabs.iter().any(|t| t.label == "moods"));

        session.show_category("moods").unwrap();
        let view = session.delete_category("moods", &AlwaysConfirm).await.unwrap();
        assert!(!view.tabs.iter().any(|t| t.label == "moods"));
        assert!(view.tabs.iter().find(|t| t.active).unwrap().label == "All");
    }

    #[tokio::test]
    async fn restore_reproduces_output_without_fetching() {
        let mut session = seeded_session().await;
        session.toggle(PromptIndex::new(3)).unwrap();
        session.toggle(PromptIndex::new(1)).unwrap();
        let output = session.apply().unwrap();
        let snapshot = session.snapshot();

        let restored = ManagerSession::restore(local_gateway().await, &snapshot);
        assert_eq!(restored.node().output(), output);
        assert_eq!(restored.node().selection().len(), 2);
    }
}
