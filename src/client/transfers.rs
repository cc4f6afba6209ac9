//! `/yeu-cau-chuyen-phong` wrapper (room-transfer requests)

use crate::client::http::{Ack, ApiClient};
use crate::models::{NewTransferRequest, TransferQuery, TransferRequest};
use crate::types::{ApiError, FieldError};
use serde_json::json;

const BASE: &str = "/yeu-cau-chuyen-phong";

#[derive(Clone)]
pub struct TransferApi {
    client: ApiClient,
}

fn require_reason(reason: &str, field: &str) -> Result<(), ApiError> {
    if reason.trim().is_empty() {
        return Err(ApiError::Validation {
            status: 422,
            message: "Vui lòng nhập lý do".to_string(),
            errors: vec![FieldError::new(field, "Vui lòng nhập lý do")],
        });
    }
    Ok(())
}

impl TransferApi {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
        }
    }

    pub async fn list(&self, query: &TransferQuery) -> Result<Vec<TransferRequest>, ApiError> {
        self.client.get_with_query(BASE, query).await
    }

    /// Requests filed by the signed-in student
    pub async fn mine(&self) -> Result<Vec<TransferRequest>, ApiError> {
        self.client.get(&format!("{}/my", BASE)).await
    }

    pub async fn create(&self, request: &NewTransferRequest) -> Result<TransferRequest, ApiError> {
        require_reason(&request.ly_do, "lyDo")?;
        self.client.post(BASE, request).await
    }

    pub async fn approve(&self, id: i64) -> Result<TransferRequest, ApiError> {
        self.client.put(&format!("{}/{}/approve", BASE, id), &json!({})).await
    }

    pub async fn reject(&self, id: i64, reason: &str) -> Result<TransferRequest, ApiError> {
        require_reason(reason, "lyDoTuChoi")?;
        self.client
            .put(&format!("{}/{}/reject", BASE, id), &json!({ "lyDoTuChoi": reason }))
            .await
    }

    /// Withdraws a pending request
    pub async fn cancel(&self, id: i64) -> Result<Ack, ApiError> {
        self.client.delete(&format!("{}/{}", BASE, id)).await
    }
}
