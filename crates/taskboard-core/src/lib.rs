pub mod config;
pub mod models;
pub mod normalize;
pub mod state;
pub mod storage;
pub mod store;
pub mod theme;

// Re-export commonly used types and functions
pub use config::{Config, ThemeBackend};
pub use models::{Priority, Task, TaskDraft, TaskMove, TaskStatus};
pub use normalize::{normalize, ThemePatch};
pub use state::{Observable, ThemeState};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError, THEME_STORAGE_KEY};
pub use store::{LocalThemeStore, ThemeStoreError};
pub use theme::{ImageFit, StateMap, ThemeConfiguration};
