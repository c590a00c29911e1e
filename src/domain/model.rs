use crate::utils::error::{Result, WatchError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 接種中心的收費類型，API 回傳 "Free" / "Paid"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeeType {
    Free,
    Paid,
    #[serde(other)]
    Unknown,
}

impl FeeType {
    pub fn is_free(&self) -> bool {
        matches!(self, FeeType::Free)
    }
}

/// 可預約的單一時段
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub session_id: Option<String>,
    /// DD-MM-YYYY
    pub date: String,
    pub min_age_limit: u32,
    pub available_capacity: u32,
    #[serde(default)]
    pub vaccine: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Center {
    #[serde(default)]
    pub center_id: Option<u64>,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub pincode: Option<u32>,
    pub fee_type: FeeType,
    #[serde(default)]
    pub sessions: Vec<Session>,
}

impl Center {
    pub fn summary(&self) -> CenterSummary {
        CenterSummary {
            center_id: self.center_id,
            name: self.name.clone(),
            fee_type: self.fee_type.clone(),
            pincode: self.pincode,
        }
    }
}

/// 不含時段列表的中心資訊，附在每個可用時段上
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CenterSummary {
    pub center_id: Option<u64>,
    pub name: String,
    pub fee_type: FeeType,
    pub pincode: Option<u32>,
}

/// 篩選結果：(中心, 時段)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailableSlot {
    pub center: CenterSummary,
    pub session: Session,
}

/// calendarByDistrict / calendarByPin 的回應
#[derive(Debug, Clone, Deserialize)]
pub struct CentersResponse {
    pub centers: Vec<Center>,
}

/// 僅允許 18 與 45 兩種年齡篩選
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgeLimit {
    Eighteen,
    FortyFive,
}

impl AgeLimit {
    pub fn years(self) -> u32 {
        match self {
            AgeLimit::Eighteen => 18,
            AgeLimit::FortyFive => 45,
        }
    }
}

impl TryFrom<u32> for AgeLimit {
    type Error = WatchError;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            18 => Ok(AgeLimit::Eighteen),
            45 => Ok(AgeLimit::FortyFive),
            other => Err(WatchError::InvalidAgeError { value: other }),
        }
    }
}

impl From<AgeLimit> for u32 {
    fn from(age: AgeLimit) -> Self {
        age.years()
    }
}

impl fmt::Display for AgeLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+", self.years())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationKind {
    #[default]
    District,
    Pincode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationTarget {
    pub name: String,
    pub id: u64,
    pub min_age: AgeLimit,
    pub kind: LocationKind,
}

impl LocationTarget {
    pub fn new(name: impl Into<String>, id: u64, min_age: u32) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            id,
            min_age: AgeLimit::try_from(min_age)?,
            kind: LocationKind::District,
        })
    }

    pub fn with_kind(mut self, kind: LocationKind) -> Self {
        self.kind = kind;
        self
    }
}

/// generateOTP 之後、confirmOTP 之前的狀態
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpChallenge {
    pub phone_number: String,
    pub txn_id: String,
}

/// 已驗證的使用者工作階段，建立後不可變，整個程序期間只存在記憶體中
#[derive(Clone, PartialEq, Eq)]
pub struct AuthSession {
    phone_number: String,
    txn_id: String,
    token: String,
}

impl AuthSession {
    pub fn new(challenge: &OtpChallenge, token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(WatchError::ConfirmError {
                message: "remote service returned an empty token".to_string(),
            });
        }

        Ok(Self {
            phone_number: challenge.phone_number.clone(),
            txn_id: challenge.txn_id.clone(),
            token,
        })
    }

    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    pub fn txn_id(&self) -> &str {
        &self.txn_id
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("phone_number", &self.phone_number)
            .field("txn_id", &self.txn_id)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateInfo {
    pub state_id: u64,
    pub state_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistrictInfo {
    pub district_id: u64,
    pub district_name: String,
}
