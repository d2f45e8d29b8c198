use reqwest::Method;
use taskboard_core::{Task, TaskDraft, TaskMove};

use crate::api::{ApiClient, ApiError};

const TASKS_PATH: &str = "/tasks/";

fn task_path(id: i64) -> String {
    format!("/tasks/{}/", id)
}

/// CRUD operations on `/tasks/`
#[derive(Debug, Clone)]
pub struct TaskService {
    client: ApiClient,
}

impl TaskService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub async fn get_tasks(&self) -> Result<Vec<Task>, ApiError> {
        self.client.get(TASKS_PATH).await
    }

    pub async fn get_task(&self, id: i64) -> Result<Task, ApiError> {
        self.client.get(&task_path(id)).await
    }

    pub async fn create_task(&self, task: &TaskDraft) -> Result<Task, ApiError> {
        self.client.send(Method::POST, TASKS_PATH, task).await
    }

    /// Full replacement of an existing task
    pub async fn update_task(&self, id: i64, task: &TaskDraft) -> Result<Task, ApiError> {
        self.client.send(Method::PUT, &task_path(id), task).await
    }

    /// Partial update that only touches status and order
    pub async fn move_task(&self, id: i64, target: &TaskMove) -> Result<Task, ApiError> {
        self.client.send(Method::PATCH, &task_path(id), target).await
    }

    pub async fn delete_task(&self, id: i64) -> Result<(), ApiError> {
        self.client.send_empty(Method::DELETE, &task_path(id)).await
    }
}
