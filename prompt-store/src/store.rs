//! File-backed prompt, category and image store.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use prompt_primitives::{CategoryLabel, NewPrompt, PromptIndex, PromptRecord};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::codec::{format_document, parse_document};
use crate::images::{content_type_for, stored_name, validate_filename};
use crate::{StoreError, StoreResult};

const PROMPTS_FILE: &str = "prompts.txt";
const CATEGORIES_FILE: &str = "categories.json";
const INDEX_FILE: &str = "index.json";
const IMAGES_DIR: &str = "preview_images";

/// Categories written when no category file exists yet.
pub const DEFAULT_CATEGORIES: [&str; 8] = [
    "poses",
    "emotions",
    "portraits",
    "lighting",
    "actions",
    "outfits",
    "backgrounds",
    "angles",
];

/// Location and seeding behaviour of a [`PromptStore`].
#[derive(Debug, Clone)]
pub struct StoreConfig {
    data_dir: PathBuf,
    default_categories: Vec<String>,
    seed_prompts: bool,
}

impl StoreConfig {
    /// Creates a configuration rooted at `data_dir` with default seeding.
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            default_categories: DEFAULT_CATEGORIES.iter().map(|c| (*c).to_owned()).collect(),
            seed_prompts: true,
        }
    }

    /// Overrides the categories written on first use.
    #[must_use]
    pub fn with_default_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Disables writing sample prompts into a missing prompt file.
    #[must_use]
    pub const fn without_sample_prompts(mut self) -> Self {
        self.seed_prompts = false;
        self
    }

    /// Returns the data directory.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

/// Persistent store backing the REST endpoints.
///
/// Every operation holds one async lock for its whole read-modify-write
/// cycle, so concurrent requests never interleave file updates.
#[derive(Debug)]
pub struct PromptStore {
    prompts_path: PathBuf,
    categories_path: PathBuf,
    index_path: PathBuf,
    images_dir: PathBuf,
    default_categories: Vec<CategoryLabel>,
    seed_prompts: bool,
    lock: Mutex<()>,
}

impl PromptStore {
    /// Opens (or creates) a store in the configured directory.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors raised while creating the directories, and
    /// validation errors for malformed default categories.
    pub async fn open(config: StoreConfig) -> StoreResult<Self> {
        let images_dir = config.data_dir.join(IMAGES_DIR);
        fs::create_dir_all(&images_dir).await?;

        let default_categories = config
            .default_categories
            .iter()
            .map(CategoryLabel::new)
            .collect::<Result<Vec<_>, _>>()?;

        info!(data_dir = %config.data_dir.display(), "prompt store opened");
        Ok(Self {
            prompts_path: config.data_dir.join(PROMPTS_FILE),
            categories_path: config.data_dir.join(CATEGORIES_FILE),
            index_path: config.data_dir.join(INDEX_FILE),
            images_dir,
            default_categories,
            seed_prompts: config.seed_prompts,
            lock: Mutex::new(()),
        })
    }

    /// Returns the directory holding preview images.
    #[must_use]
    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    /// Returns every prompt in file order.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors.
    pub async fn list_prompts(&self) -> StoreResult<Vec<PromptRecord>> {
        let _guard = self.lock.lock().await;
        self.load_prompts().await
    }

    /// Returns every category, sorted.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors.
    pub async fn list_categories(&self) -> StoreResult<Vec<CategoryLabel>> {
        let _guard = self.lock.lock().await;
        self.load_categories().await
    }

    /// Creates a record and returns its assigned index.
    ///
    /// Indices come from a persisted high-water mark, so an index is never
    /// handed out twice even after the highest record is deleted. Unknown
    /// categories referenced by the record are registered.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Invalid`] for a blank title or body or when the
    /// index space is exhausted, [`StoreError::InvalidImage`] for an illegal
    /// image name, and propagates I/O errors.
    pub async fn add_prompt(&self, new: NewPrompt) -> StoreResult<PromptIndex> {
        let mut new = new.validate()?;
        new.categories = normalize_categories(&new.categories);
        new.image = clean_image(new.image.as_deref())?;

        let _guard = self.lock.lock().await;
        let mut prompts = self.load_prompts().await?;
        let index = self.load_next_index(&prompts).await?;
        let following = index_after(index)?;

        let title = new.title.clone();
        let categories = new.categories.clone();
        prompts.push(PromptRecord::from_new(index, new));
        self.write_prompts(&prompts).await?;
        self.write_next_index(following).await?;
        self.register_categories(&categories).await?;

        info!(%index, %title, "added prompt");
        Ok(index)
    }

    /// Replaces the record with the same index.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown index,
    /// [`StoreError::Invalid`] for a blank title or body,
    /// [`StoreError::InvalidImage`] for an illegal image name, and propagates
    /// I/O errors.
    pub async fn update_prompt(&self, record: PromptRecord) -> StoreResult<()> {
        let mut record = record.validate()?;
        record.categories = normalize_categories(&record.categories);
        record.image = clean_image(record.image.as_deref())?;

        let _guard = self.lock.lock().await;
        let mut prompts = self.load_prompts().await?;
        let slot = prompts
            .iter_mut()
            .find(|p| p.index == record.index)
            .ok_or_else(|| StoreError::not_found(format!("prompt {}", record.index)))?;

        let index = record.index;
        let categories = record.categories.clone();
        *slot = record;
        self.write_prompts(&prompts).await?;
        self.register_categories(&categories).await?;

        info!(%index, "updated prompt");
        Ok(())
    }

    /// Deletes a record together with its preview image.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown index and propagates I/O
    /// errors.
    pub async fn delete_prompt(&self, index: PromptIndex) -> StoreResult<PromptRecord> {
        let _guard = self.lock.lock().await;
        let mut prompts = self.load_prompts().await?;
        let position = prompts
            .iter()
            .position(|p| p.index == index)
            .ok_or_else(|| StoreError::not_found(format!("prompt {index}")))?;

        let mark = match self.load_next_index(&prompts).await {
            Ok(mark) => Some(mark),
            Err(StoreError::Invalid { .. }) => None,
            Err(err) => return Err(err),
        };
        let deleted = prompts.remove(position);
        if let Some(image) = deleted.image() {
            self.remove_image_file(image).await?;
        }
        self.write_prompts(&prompts).await?;
        if let Some(mark) = mark {
            self.write_next_index(mark).await?;
        }

        info!(%index, title = %deleted.title, "deleted prompt");
        Ok(deleted)
    }

    /// Replaces the entire prompt list, renumbering indices from 1.
    ///
    /// Preview images follow their records: each referenced image is renamed
    /// to the `prompt_{index}` name of the record's new index. The high-water
    /// mark is never lowered.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidImage`] for an illegal image name and
    /// propagates I/O errors.
    pub async fn save_all(&self, prompts: Vec<PromptRecord>) -> StoreResult<usize> {
        let mut prompts = prompts
            .into_iter()
            .zip(1..)
            .map(|(mut record, index)| -> StoreResult<PromptRecord> {
                record.index = PromptIndex::new(index);
                record.image = clean_image(record.image.as_deref())?;
                Ok(record)
            })
            .collect::<StoreResult<Vec<PromptRecord>>>()?;

        let _guard = self.lock.lock().await;
        let floor = match prompts.last() {
            Some(last) => index_after(last.index)?,
            None => PromptIndex::new(1),
        };
        let current = self.load_prompts().await?;
        let mark = match self.load_next_index(&current).await {
            Ok(mark) => mark,
            Err(StoreError::Invalid { .. }) => floor,
            Err(err) => return Err(err),
        };

        self.renumber_images(&mut prompts).await?;
        self.write_prompts(&prompts).await?;
        self.write_next_index(mark.max(floor)).await?;
        info!(count = prompts.len(), "replaced prompt list");
        Ok(prompts.len())
    }

    /// Registers a category, returning the updated sorted list.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Invalid`] for a blank label,
    /// [`StoreError::Serialization`] when the category file is unreadable
    /// (it is left untouched), and propagates I/O errors.
    pub async fn add_category(&self, label: &str) -> StoreResult<Vec<CategoryLabel>> {
        let label = CategoryLabel::new(label)?;
        let _guard = self.lock.lock().await;
        let mut categories = self.read_categories().await?;
        if !categories.contains(&label) {
            info!(category = %label, "added category");
            categories.push(label);
            self.write_categories(&mut categories).await?;
        }
        Ok(categories)
    }

    /// Removes a category, returning the updated list. Prompts keep the label.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Invalid`] for a blank label,
    /// [`StoreError::Serialization`] when the category file is unreadable
    /// (it is left untouched), and propagates I/O errors.
    pub async fn delete_category(&self, label: &str) -> StoreResult<Vec<CategoryLabel>> {
        let label = CategoryLabel::new(label)?;
        let _guard = self.lock.lock().await;
        let mut categories = self.read_categories().await?;
        let before = categories.len();
        categories.retain(|c| c != &label);
        if categories.len() != before {
            self.write_categories(&mut categories).await?;
            info!(category = %label, "deleted category");
        }
        Ok(categories)
    }

    /// Stores an uploaded preview image for `index` and returns its filename.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidImage`] for unsupported file types and
    /// propagates I/O errors.
    pub async fn save_image(
        &self,
        index: PromptIndex,
        uploaded_name: &str,
        data: &[u8],
    ) -> StoreResult<String> {
        let filename = stored_name(index, uploaded_name)?;
        fs::write(self.images_dir.join(&filename), data).await?;
        info!(%index, %filename, bytes = data.len(), "saved preview image");
        Ok(filename)
    }

    /// Reads a preview image, returning its bytes and content type.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when missing,
    /// [`StoreError::InvalidImage`] for illegal names, and propagates I/O
    /// errors.
    pub async fn read_image(&self, filename: &str) -> StoreResult<(Bytes, &'static str)> {
        let name = validate_filename(filename)?;
        let path = self.images_dir.join(name);
        match fs::read(&path).await {
            Ok(data) => Ok((Bytes::from(data), content_type_for(name))),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::not_found(format!("image {name}")))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Deletes a preview image, returning whether a file was removed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidImage`] for illegal names and propagates I/O
    /// errors.
    pub async fn delete_image(&self, filename: &str) -> StoreResult<bool> {
        let name = validate_filename(filename)?;
        self.remove_image_file(name).await
    }

    async fn remove_image_file(&self, filename: &str) -> StoreResult<bool> {
        let name = validate_filename(filename)?;
        match fs::remove_file(self.images_dir.join(name)).await {
            Ok(()) => {
                info!(filename = %name, "deleted preview image");
                Ok(true)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    async fn load_prompts(&self) -> StoreResult<Vec<PromptRecord>> {
        match fs::read_to_string(&self.prompts_path).await {
            Ok(text) => Ok(parse_document(&text)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                let seeded = if self.seed_prompts {
                    sample_prompts()
                } else {
                    Vec::new()
                };
                self.write_prompts(&seeded).await?;
                info!(count = seeded.len(), "created prompt file");
                Ok(seeded)
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn write_prompts(&self, prompts: &[PromptRecord]) -> StoreResult<()> {
        write_atomic(&self.prompts_path, format_document(prompts).as_bytes()).await?;
        info!(count = prompts.len(), "saved prompts");
        Ok(())
    }

    /// Categories for display: an unreadable file yields the defaults.
    async fn load_categories(&self) -> StoreResult<Vec<CategoryLabel>> {
        match self.read_categories().await {
            Err(StoreError::Serialization { source }) => {
                warn!(error = %source, path = %self.categories_path.display(), "unreadable category file, using defaults");
                let mut defaults = self.default_categories.clone();
                defaults.sort();
                defaults.dedup();
                Ok(defaults)
            }
            other => other,
        }
    }

    /// Categories for an update. Entries that are not valid labels are
    /// dropped one by one; a file that is not a JSON string array is an error
    /// so callers never overwrite it.
    async fn read_categories(&self) -> StoreResult<Vec<CategoryLabel>> {
        let data = match fs::read(&self.categories_path).await {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                let mut defaults = self.default_categories.clone();
                self.write_categories(&mut defaults).await?;
                return Ok(defaults);
            }
            Err(err) => return Err(err.into()),
        };

        let raw: Vec<String> = serde_json::from_slice(&data)?;
        let mut categories: Vec<CategoryLabel> = raw
            .iter()
            .filter_map(|entry| match CategoryLabel::new(entry) {
                Ok(label) => Some(label),
                Err(err) => {
                    warn!(category = %entry, error = %err, "dropping invalid stored category");
                    None
                }
            })
            .collect();
        categories.sort();
        categories.dedup();
        Ok(categories)
    }

    async fn write_categories(&self, categories: &mut Vec<CategoryLabel>) -> StoreResult<()> {
        categories.sort();
        categories.dedup();
        let data = serde_json::to_vec_pretty(categories)?;
        write_atomic(&self.categories_path, &data).await?;
        info!(count = categories.len(), "saved categories");
        Ok(())
    }

    async fn register_categories(&self, labels: &[String]) -> StoreResult<()> {
        let mut categories = match self.read_categories().await {
            Ok(categories) => categories,
            Err(StoreError::Serialization { source }) => {
                warn!(error = %source, "category file unreadable, not registering prompt categories");
                return Ok(());
            }
            Err(err) => return Err(err),
        };
        let before = categories.len();
        for label in labels {
            if let Ok(label) = CategoryLabel::new(label) {
                if !categories.contains(&label) {
                    categories.push(label);
                }
            }
        }
        if categories.len() != before {
            self.write_categories(&mut categories).await?;
        }
        Ok(())
    }

    async fn load_next_index(&self, prompts: &[PromptRecord]) -> StoreResult<PromptIndex> {
        let floor = match prompts.iter().map(|p| p.index).max() {
            Some(max) => index_after(max)?,
            None => PromptIndex::new(1),
        };
        match fs::read(&self.index_path).await {
            Ok(data) => match serde_json::from_slice::<IndexState>(&data) {
                Ok(state) => Ok(state.next_index.max(floor)),
                Err(err) => {
                    warn!(error = %err, path = %self.index_path.display(), "unreadable index file, using prompt file");
                    Ok(floor)
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(floor),
            Err(err) => Err(err.into()),
        }
    }

    async fn write_next_index(&self, next_index: PromptIndex) -> StoreResult<()> {
        let data = serde_json::to_vec_pretty(&IndexState { next_index })?;
        write_atomic(&self.index_path, &data).await
    }

    /// Moves every referenced image to the name matching its record's index.
    ///
    /// Files are staged under temporary names first, so a record taking over
    /// another record's old index never clobbers an image still in use.
    async fn renumber_images(&self, prompts: &mut [PromptRecord]) -> StoreResult<()> {
        let mut staged = Vec::new();
        for record in prompts {
            let Some(current) = record.image.clone() else {
                continue;
            };
            let Ok(target) = stored_name(record.index, &current) else {
                continue;
            };
            if target == current {
                continue;
            }
            let source = self.images_dir.join(&current);
            if fs::try_exists(&source).await? {
                let staging = self.images_dir.join(format!("{target}.renumber"));
                fs::rename(&source, &staging).await?;
                staged.push((staging, target.clone()));
            }
            info!(index = %record.index, from = %current, to = %target, "renumbered preview image");
            record.image = Some(target);
        }
        for (staging, target) in staged {
            fs::rename(&staging, self.images_dir.join(target)).await?;
        }
        Ok(())
    }
}

/// Persisted high-water mark for index assignment.
#[derive(Debug, Serialize, Deserialize)]
struct IndexState {
    next_index: PromptIndex,
}

fn index_after(index: PromptIndex) -> StoreResult<PromptIndex> {
    index.next().ok_or_else(|| {
        prompt_primitives::Error::InvalidIndex {
            value: index.to_string(),
        }
        .into()
    })
}

fn clean_image(image: Option<&str>) -> StoreResult<Option<String>> {
    match image.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) => Ok(Some(validate_filename(name)?.to_owned())),
        None => Ok(None),
    }
}

fn normalize_categories(labels: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(labels.len());
    for raw in labels {
        match CategoryLabel::new(raw) {
            Ok(label) => {
                if !out.iter().any(|c| c == label.as_str()) {
                    out.push(label.into());
                }
            }
            Err(err) => warn!(category = %raw, error = %err, "dropping invalid category"),
        }
    }
    out
}

async fn write_atomic(path: &Path, data: &[u8]) -> StoreResult<()> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, data).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
}

fn sample_prompts() -> Vec<PromptRecord> {
    vec![
        PromptRecord::from_new(
            PromptIndex::new(1),
            NewPrompt::new(
                "Confident Stand",
                "full body, white background, standing pose, hand on hip, confident smile, masterpiece, best quality",
            )
            .with_categories(["poses"])
            .with_favorite(true),
        ),
        PromptRecord::from_new(
            PromptIndex::new(2),
            NewPrompt::new(
                "Gentle Kneel",
                "white background, full body, kneeling pose, head tilted, gentle smile, soft lighting, best quality",
            )
            .with_categories(["poses", "emotions"]),
        ),
        PromptRecord::from_new(
            PromptIndex::new(3),
            NewPrompt::new(
                "Thoughtful Gaze",
                "close-up, half-lidded eyes, white background, soft lighting, detailed face, masterpiece",
            )
            .with_categories(["portraits", "emotions"])
            .with_favorite(true),
        ),
    ]
}
