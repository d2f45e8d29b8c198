pub mod api;
pub mod store;
pub mod tasks;
pub mod theme;

pub use api::{ApiClient, ApiError};
pub use store::{BackendThemeStore, StoreStatus};
pub use tasks::TaskService;
pub use theme::{ThemeApi, ThemeService};
