use crate::domain::model::{AuthSession, AvailableSlot, Center, LocationTarget, OtpChallenge};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

/// 預約 API 的抽象，正式環境由 `AppointmentClient` 實作
#[async_trait]
pub trait SlotSource: Send + Sync {
    async fn request_code(&self, phone_number: &str) -> Result<OtpChallenge>;

    async fn confirm_code(&self, challenge: &OtpChallenge, code: &str) -> Result<AuthSession>;

    async fn fetch_centers(
        &self,
        auth: &AuthSession,
        target: &LocationTarget,
        date: NaiveDate,
    ) -> Result<Vec<Center>>;
}

/// 通知出口，送達與否不影響輪詢
pub trait Notifier: Send + Sync {
    fn name(&self) -> &str;
    fn notify(&self, location_name: &str, slot: &AvailableSlot);
}

#[async_trait]
pub trait Prompt: Send + Sync {
    async fn ask(&self, message: &str) -> Result<String>;
}
