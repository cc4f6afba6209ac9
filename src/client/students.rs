//! `/sinh-vien` wrapper

use crate::client::http::{Ack, ApiClient};
use crate::models::{NewStudent, Student, StudentQuery};
use crate::types::{ApiError, Page};
use serde_json::json;

#[derive(Clone)]
pub struct StudentApi {
    client: ApiClient,
}

impl StudentApi {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
        }
    }

    pub async fn list(&self, query: &StudentQuery) -> Result<Page<Student>, ApiError> {
        self.client.get_with_query("/sinh-vien", query).await
    }

    pub async fn get(&self, ma_sinh_vien: &str) -> Result<Student, ApiError> {
        self.client.get(&format!("/sinh-vien/{}", ma_sinh_vien)).await
    }

    pub async fn create(&self, student: &NewStudent) -> Result<Student, ApiError> {
        self.client.post("/sinh-vien", student).await
    }

    pub async fn update(&self, ma_sinh_vien: &str, student: &NewStudent) -> Result<Student, ApiError> {
        self.client.put(&format!("/sinh-vien/{}", ma_sinh_vien), student).await
    }

    pub async fn delete(&self, ma_sinh_vien: &str) -> Result<Ack, ApiError> {
        self.client.delete(&format!("/sinh-vien/{}", ma_sinh_vien)).await
    }

    /// Accepts a pending self-registration
    pub async fn approve(&self, ma_sinh_vien: &str) -> Result<Student, ApiError> {
        self.client.put(&format!("/sinh-vien/{}/approve", ma_sinh_vien), &json!({})).await
    }
}
