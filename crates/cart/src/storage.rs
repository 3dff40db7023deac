//! Where cart items are kept between sessions.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::item::CartItem;

/// File name the cart is stored under.
pub const CART_STORAGE_KEY: &str = "homestyleerode_cart.json";

#[derive(Debug, thiserror::Error)]
pub enum CartStorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt cart data: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("cart storage lock poisoned")]
    Poisoned,
}

/// Persistence for the cart's item list.
pub trait CartStorage {
    /// Load saved items. `Ok(None)` means nothing has been saved yet.
    ///
    /// # Errors
    ///
    /// Returns [`CartStorageError::Corrupt`] when saved data cannot be parsed.
    fn load(&self) -> Result<Option<Vec<CartItem>>, CartStorageError>;

    /// Replace the saved items.
    ///
    /// # Errors
    ///
    /// Returns an error when the write fails.
    fn save(&self, items: &[CartItem]) -> Result<(), CartStorageError>;

    /// Drop saved data.
    ///
    /// # Errors
    ///
    /// Returns an error when the saved data exists but cannot be removed.
    fn remove(&self) -> Result<(), CartStorageError>;
}

/// Stores the cart as a single JSON file inside a directory.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.dir.join(CART_STORAGE_KEY)
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl CartStorage for JsonFileStorage {
    fn load(&self) -> Result<Option<Vec<CartItem>>, CartStorageError> {
        let path = self.path();
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&contents)?))
    }

    fn save(&self, items: &[CartItem]) -> Result<(), CartStorageError> {
        std::fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string(items)?;
        std::fs::write(self.path(), json)?;
        Ok(())
    }

    fn remove(&self) -> Result<(), CartStorageError> {
        let path = self.path();
        if path.exists() {
            std::fs::remove_file(&path)?;
        }
        Ok(())
    }
}

/// Keeps the serialized cart in memory. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryStorage {
    /// Start with raw saved contents, as if a previous session had written them.
    #[must_use]
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(raw.into()))),
        }
    }

    /// The raw saved contents, if any.
    #[must_use]
    pub fn raw(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }
}

impl CartStorage for MemoryStorage {
    fn load(&self) -> Result<Option<Vec<CartItem>>, CartStorageError> {
        let slot = self.slot.lock().map_err(|_| CartStorageError::Poisoned)?;
        slot.as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(CartStorageError::from)
    }

    fn save(&self, items: &[CartItem]) -> Result<(), CartStorageError> {
        let json = serde_json::to_string(items)?;
        *self.slot.lock().map_err(|_| CartStorageError::Poisoned)? = Some(json);
        Ok(())
    }

    fn remove(&self) -> Result<(), CartStorageError> {
        *self.slot.lock().map_err(|_| CartStorageError::Poisoned)? = None;
        Ok(())
    }
}
