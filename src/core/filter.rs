use crate::domain::model::{AgeLimit, AvailableSlot, Center};
use crate::utils::error::Result;

/// 篩選可預約時段：中心必須免費、名額大於 0、最低年齡等於篩選值。
///
/// 年齡在任何處理之前先驗證，只接受 18 與 45。輸入的中心列表不會被修改。
pub fn filter_available_sessions(centers: &[Center], min_age: u32) -> Result<Vec<AvailableSlot>> {
    let age = AgeLimit::try_from(min_age)?;
    Ok(available_for_age(centers, age))
}

pub fn available_for_age(centers: &[Center], age: AgeLimit) -> Vec<AvailableSlot> {
    centers
        .iter()
        .filter(|center| center.fee_type.is_free())
        .flat_map(|center| {
            center
                .sessions
                .iter()
                .filter(move |session| {
                    session.min_age_limit == age.years() && session.available_capacity > 0
                })
                .map(move |session| AvailableSlot {
                    center: center.summary(),
                    session: session.clone(),
                })
        })
        .collect()
}
