//! `/payments` wrapper

use crate::client::http::ApiClient;
use crate::models::{NewPayment, Payment, PaymentQuery};
use crate::types::{ApiError, FieldError};
use serde_json::json;

#[derive(Clone)]
pub struct PaymentApi {
    client: ApiClient,
}

impl PaymentApi {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
        }
    }

    pub async fn list(&self, query: &PaymentQuery) -> Result<Vec<Payment>, ApiError> {
        self.client.get_with_query("/payments", query).await
    }

    /// Payments of the signed-in student
    pub async fn mine(&self) -> Result<Vec<Payment>, ApiError> {
        self.client.get("/payments/my").await
    }

    pub async fn get(&self, id: i64) -> Result<Payment, ApiError> {
        self.client.get(&format!("/payments/{}", id)).await
    }

    pub async fn create(&self, payment: &NewPayment) -> Result<Payment, ApiError> {
        if payment.so_tien <= 0 {
            return Err(ApiError::Validation {
                status: 422,
                message: "Số tiền không hợp lệ".to_string(),
                errors: vec![FieldError::new("soTien", "Số tiền phải lớn hơn 0")],
            });
        }
        self.client.post("/payments", payment).await
    }

    /// Marks a payment as received
    pub async fn confirm(&self, id: i64) -> Result<Payment, ApiError> {
        self.client.put(&format!("/payments/{}/confirm", id), &json!({})).await
    }
}
