use crate::config::toml_config::ApiConfig;
use crate::domain::model::{
    AuthSession, Center, CentersResponse, DistrictInfo, LocationKind, LocationTarget,
    OtpChallenge, StateInfo,
};
use crate::domain::ports::SlotSource;
use crate::utils::error::{Result, WatchError};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Response};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::time::Duration;

const GENERATE_OTP: &str = "/auth/public/generateOTP";
const CONFIRM_OTP: &str = "/auth/public/confirmOTP";
const STATES_LIST: &str = "/admin/location/states";
const DISTRICT_LIST: &str = "/admin/location/districts";
const SESSIONS_BY_DISTRICT: &str = "/appointment/sessions/calendarByDistrict";
const SESSIONS_BY_PIN: &str = "/appointment/sessions/calendarByPin";

/// 查詢參數使用的日期格式
pub const DATE_FORMAT: &str = "%d-%m-%Y";

#[derive(Debug, Deserialize)]
struct OtpResponse {
    #[serde(rename = "txnId")]
    txn_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatesResponse {
    states: Vec<StateInfo>,
}

#[derive(Debug, Deserialize)]
struct DistrictsResponse {
    districts: Vec<DistrictInfo>,
}

/// 一次性驗證碼的 SHA-256 十六進位摘要
pub fn hash_code(code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(code.trim().as_bytes());
    format!("{:x}", hasher.finalize())
}

pub struct AppointmentClient {
    base_url: String,
    client: Client,
}

impl AppointmentClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let user_agent = HeaderValue::from_str(config.user_agent()).map_err(|e| {
            WatchError::InvalidConfigValueError {
                field: "api.user_agent".to_string(),
                value: config.user_agent().to_string(),
                reason: e.to_string(),
            }
        })?;
        headers.insert(USER_AGENT, user_agent);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_seconds()))
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// 列出所有州，用來查詢設定檔需要的 id
    pub async fn list_states(&self) -> Result<Vec<StateInfo>> {
        let url = self.url(STATES_LIST);
        tracing::debug!("Fetching states from: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| metadata_error(&e))?;
        let body: StatesResponse = read_json(response)
            .await
            .map_err(|message| WatchError::MetadataError { message })?;

        Ok(body.states)
    }

    pub async fn list_districts(&self, state_id: u64) -> Result<Vec<DistrictInfo>> {
        let url = format!("{}/{}", self.url(DISTRICT_LIST), state_id);
        tracing::debug!("Fetching districts from: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| metadata_error(&e))?;
        let body: DistrictsResponse = read_json(response)
            .await
            .map_err(|message| WatchError::MetadataError { message })?;

        Ok(body.districts)
    }
}

fn metadata_error(e: &reqwest::Error) -> WatchError {
    WatchError::MetadataError {
        message: e.to_string(),
    }
}

/// 檢查狀態碼並解析 JSON，失敗時回傳可讀的錯誤訊息
async fn read_json<T: serde::de::DeserializeOwned>(
    response: Response,
) -> std::result::Result<T, String> {
    let status = response.status();
    let body = response.text().await.map_err(|e| e.to_string())?;
    tracing::debug!("API response status: {}", status);

    if !status.is_success() {
        return Err(format!("status {}: {}", status, body.trim()));
    }

    serde_json::from_str(&body).map_err(|e| format!("unexpected response body: {}", e))
}

#[async_trait]
impl SlotSource for AppointmentClient {
    async fn request_code(&self, phone_number: &str) -> Result<OtpChallenge> {
        let phone_number = phone_number.trim();
        let payload = serde_json::json!({ "mobile": phone_number });

        tracing::debug!("Requesting one-time code for {}", phone_number);
        let response = self
            .client
            .post(self.url(GENERATE_OTP))
            .json(&payload)
            .send()
            .await
            .map_err(|e| WatchError::CodeRequestError {
                message: e.to_string(),
            })?;

        let body: OtpResponse = read_json(response)
            .await
            .map_err(|message| WatchError::CodeRequestError { message })?;

        match body.txn_id {
            Some(txn_id) if !txn_id.trim().is_empty() => {
                tracing::debug!("Received transaction id {}", txn_id);
                Ok(OtpChallenge {
                    phone_number: phone_number.to_string(),
                    txn_id,
                })
            }
            _ => Err(WatchError::CodeRequestError {
                message: "response did not contain a transaction id".to_string(),
            }),
        }
    }

    async fn confirm_code(&self, challenge: &OtpChallenge, code: &str) -> Result<AuthSession> {
        let payload = serde_json::json!({
            "otp": hash_code(code),
            "txnId": challenge.txn_id,
        });

        let response = self
            .client
            .post(self.url(CONFIRM_OTP))
            .json(&payload)
            .send()
            .await
            .map_err(|e| WatchError::ConfirmError {
                message: e.to_string(),
            })?;

        let body: TokenResponse = read_json(response)
            .await
            .map_err(|message| WatchError::ConfirmError { message })?;

        AuthSession::new(challenge, body.token.unwrap_or_default())
    }

    async fn fetch_centers(
        &self,
        auth: &AuthSession,
        target: &LocationTarget,
        date: NaiveDate,
    ) -> Result<Vec<Center>> {
        let (path, id_param) = match target.kind {
            LocationKind::District => (SESSIONS_BY_DISTRICT, "district_id"),
            LocationKind::Pincode => (SESSIONS_BY_PIN, "pincode"),
        };
        let date = date.format(DATE_FORMAT).to_string();
        let fetch_error = |message: String| WatchError::SessionFetchError {
            location: target.name.clone(),
            message,
        };

        tracing::debug!(
            "📡 {}: querying {} with {}={} date={}",
            target.name,
            path,
            id_param,
            target.id,
            date
        );

        let response = self
            .client
            .get(self.url(path))
            .query(&[(id_param, target.id.to_string()), ("date", date)])
            .bearer_auth(auth.token())
            .send()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;

        let body: CentersResponse = read_json(response).await.map_err(fetch_error)?;
        tracing::debug!("📡 {}: received {} centers", target.name, body.centers.len());

        Ok(body.centers)
    }
}
