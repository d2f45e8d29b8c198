pub mod task;

pub use task::{ParseEnumError, Priority, Task, TaskDraft, TaskMove, TaskStatus};
