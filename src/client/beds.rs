//! `/giuong` wrapper

use crate::client::http::ApiClient;
use crate::housing::check_assignment;
use crate::models::{Bed, Room, Student};
use crate::types::ApiError;
use serde_json::json;

#[derive(Clone)]
pub struct BedApi {
    client: ApiClient,
}

impl BedApi {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
        }
    }

    pub async fn list_by_room(&self, phong_id: i64) -> Result<Vec<Bed>, ApiError> {
        self.client.get_with_query("/giuong", &[("phongId", phong_id)]).await
    }

    pub async fn get(&self, id: i64) -> Result<Bed, ApiError> {
        self.client.get(&format!("/giuong/{}", id)).await
    }

    pub async fn assign(&self, bed_id: i64, ma_sinh_vien: &str) -> Result<Bed, ApiError> {
        self.client
            .post(&format!("/giuong/{}/assign", bed_id), &json!({ "maSinhVien": ma_sinh_vien }))
            .await
    }

    /// Assigns after checking capacity, bed state and gender locally
    pub async fn assign_checked(&self, room: &Room, bed: &Bed, student: &Student) -> Result<Bed, ApiError> {
        check_assignment(room, bed, student)?;
        self.assign(bed.id, &student.ma_sinh_vien).await
    }

    pub async fn release(&self, bed_id: i64) -> Result<Bed, ApiError> {
        self.client.post(&format!("/giuong/{}/release", bed_id), &json!({})).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::session::MemorySessionStore;
    use crate::models::{BedStatus, RoomStatus, StudentStatus};
    use mockito::{Matcher, Server};
    use std::sync::Arc;
    use std::time::Duration;

    fn api(url: String) -> BedApi {
        BedApi::new(ApiClient::new(url, Duration::from_secs(5), Arc::new(MemorySessionStore::new())).unwrap())
    }

    fn full_room() -> Room {
        Room {
            id: 1,
            so_phong: "A101".to_string(),
            loai_phong: None,
            gioi_tinh: None,
            suc_chua: 2,
            so_nguoi_hien_tai: 2,
            gia_phong: 400_000,
            trang_thai: RoomStatus::Full,
        }
    }

    #[tokio::test]
    async fn test_assign_posts_student() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/giuong/7/assign")
            .match_body(Matcher::Json(json!({"maSinhVien": "SV001"})))
            .with_status(200)
            .with_body(
                r#"{"success":true,"data":{"id":7,"phongId":1,"soGiuong":"G7","trangThai":"occupied","maSinhVien":"SV001"}}"#,
            )
            .create_async()
            .await;

        let bed = api(server.url()).assign(7, "SV001").await.unwrap();
        mock.assert_async().await;
        assert_eq!(bed.trang_thai, BedStatus::Occupied);
    }

    #[tokio::test]
    async fn test_assign_checked_refuses_full_room_without_call() {
        let mut server = Server::new_async().await;
        let mock = server.mock("POST", Matcher::Any).expect(0).create_async().await;

        let bed = Bed {
            id: 7,
            phong_id: 1,
            so_giuong: "G7".to_string(),
            trang_thai: BedStatus::Available,
            ma_sinh_vien: None,
        };
        let student = Student {
            ma_sinh_vien: "SV001".to_string(),
            ho_ten: "Phạm D".to_string(),
            gioi_tinh: None,
            email: None,
            so_dien_thoai: None,
            lop: None,
            trang_thai: StudentStatus::Active,
            giuong_id: None,
        };

        let error = api(server.url()).assign_checked(&full_room(), &bed, &student).await.unwrap_err();
        mock.assert_async().await;
        assert_eq!(error, ApiError::Conflict("Phòng A101 đã đầy".to_string()));
    }
}
