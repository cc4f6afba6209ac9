//! `/phong` wrapper

use crate::client::http::{Ack, ApiClient};
use crate::models::{NewRoom, Room, RoomQuery};
use crate::types::ApiError;

#[derive(Clone)]
pub struct RoomApi {
    client: ApiClient,
}

impl RoomApi {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
        }
    }

    pub async fn list(&self, query: &RoomQuery) -> Result<Vec<Room>, ApiError> {
        self.client.get_with_query("/phong", query).await
    }

    /// Rooms the server reports as having free beds
    pub async fn available(&self) -> Result<Vec<Room>, ApiError> {
        self.client.get("/phong/available").await
    }

    pub async fn get(&self, id: i64) -> Result<Room, ApiError> {
        self.client.get(&format!("/phong/{}", id)).await
    }

    pub async fn create(&self, room: &NewRoom) -> Result<Room, ApiError> {
        self.client.post("/phong", room).await
    }

    pub async fn update(&self, id: i64, room: &NewRoom) -> Result<Room, ApiError> {
        self.client.put(&format!("/phong/{}", id), room).await
    }

    pub async fn delete(&self, id: i64) -> Result<Ack, ApiError> {
        self.client.delete(&format!("/phong/{}", id)).await
    }
}
