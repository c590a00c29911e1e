use crate::core::filter::available_for_age;
use crate::domain::model::{AuthSession, AvailableSlot, LocationTarget};
use crate::domain::ports::{Notifier, Prompt, SlotSource};
use crate::utils::error::Result;
use crate::utils::validation::validate_phone_number;
use std::time::{Duration, Instant};

/// 輪詢狀態機：Authenticating → Polling ⇄ Sleeping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    Authenticating,
    Polling,
    Sleeping,
}

/// 單輪輪詢的統計
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundReport {
    pub round: u32,
    pub targets: usize,
    pub matches: usize,
    pub failures: usize,
    pub duration: Duration,
}

pub struct PollingNotifier<S: SlotSource> {
    source: S,
    targets: Vec<LocationTarget>,
    notifiers: Vec<Box<dyn Notifier>>,
    interval: Duration,
    max_rounds: Option<u32>,
}

impl<S: SlotSource> PollingNotifier<S> {
    pub fn new(source: S, targets: Vec<LocationTarget>, interval: Duration) -> Self {
        Self {
            source,
            targets,
            notifiers: Vec::new(),
            interval,
            max_rounds: None,
        }
    }

    pub fn with_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifiers.push(notifier);
        self
    }

    pub fn with_notifiers(mut self, notifiers: Vec<Box<dyn Notifier>>) -> Self {
        self.notifiers.extend(notifiers);
        self
    }

    /// `None` 表示無限輪詢
    pub fn with_max_rounds(mut self, max_rounds: Option<u32>) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    pub fn targets(&self) -> &[LocationTarget] {
        &self.targets
    }

    /// 以手機號碼換取驗證碼，再以驗證碼換取 token。任何失敗都直接回傳錯誤。
    pub async fn authenticate(
        &self,
        prompt: &dyn Prompt,
        phone_number: Option<&str>,
    ) -> Result<AuthSession> {
        tracing::debug!("State: {:?}", WatchState::Authenticating);

        let phone_number = match phone_number {
            Some(number) => number.trim().to_string(),
            None => prompt.ask("Please enter your mobile number: ").await?,
        };
        validate_phone_number(&phone_number)?;

        let challenge = self.source.request_code(&phone_number).await?;
        tracing::info!("📨 One-time code requested for {}", challenge.phone_number);

        let code = prompt
            .ask(&format!(
                "Enter the OTP received on {}: ",
                challenge.phone_number
            ))
            .await?;
        let auth = self.source.confirm_code(&challenge, &code).await?;

        tracing::info!("🔑 Authenticated {}", auth.phone_number());
        Ok(auth)
    }

    /// 查詢今日的時段並篩選。網路或解析錯誤只記錄警告並回傳空列表，輪詢照常繼續。
    pub async fn fetch_available_sessions(
        &self,
        auth: &AuthSession,
        target: &LocationTarget,
    ) -> Vec<AvailableSlot> {
        self.fetch_or_skip(auth, target).await.unwrap_or_default()
    }

    /// 失敗時記錄警告並回傳 `None`，讓呼叫端可以計算失敗次數
    async fn fetch_or_skip(
        &self,
        auth: &AuthSession,
        target: &LocationTarget,
    ) -> Option<Vec<AvailableSlot>> {
        match self.try_fetch_available_sessions(auth, target).await {
            Ok(slots) => Some(slots),
            Err(e) => {
                tracing::warn!("⚠️ {} (will retry next round)", e);
                None
            }
        }
    }

    pub async fn try_fetch_available_sessions(
        &self,
        auth: &AuthSession,
        target: &LocationTarget,
    ) -> Result<Vec<AvailableSlot>> {
        let today = chrono::Local::now().date_naive();
        let centers = self.source.fetch_centers(auth, target, today).await?;
        let slots = available_for_age(&centers, target.min_age);

        tracing::debug!(
            "{}: {} centers, {} available slots for {}",
            target.name,
            centers.len(),
            slots.len(),
            target.min_age
        );
        Ok(slots)
    }

    pub fn notify(&self, location_name: &str, slot: &AvailableSlot) {
        for notifier in &self.notifiers {
            tracing::debug!("Notifying via {}", notifier.name());
            notifier.notify(location_name, slot);
        }
    }

    /// 依序查詢所有地區一次
    pub async fn run_round(&self, auth: &AuthSession, round: u32) -> RoundReport {
        tracing::debug!("State: {:?} (round {})", WatchState::Polling, round);
        let started = Instant::now();
        let mut matches = 0;
        let mut failures = 0;

        for target in &self.targets {
            let Some(slots) = self.fetch_or_skip(auth, target).await else {
                failures += 1;
                continue;
            };

            for slot in &slots {
                self.notify(&target.name, slot);
            }
            matches += slots.len();
        }

        let report = RoundReport {
            round,
            targets: self.targets.len(),
            matches,
            failures,
            duration: started.elapsed(),
        };

        tracing::info!(
            "📊 Round {} - Locations: {}, Matches: {}, Failed: {}, Time: {:?}",
            report.round,
            report.targets,
            report.matches,
            report.failures,
            report.duration
        );
        report
    }

    /// 輪詢直到達到 `max_rounds`；未設定時永不返回
    pub async fn run(&self, auth: &AuthSession) -> Vec<RoundReport> {
        let mut reports = Vec::new();
        let mut round = 0u32;

        loop {
            round = round.saturating_add(1);
            let report = self.run_round(auth, round).await;

            let finished = self.max_rounds.is_some_and(|max| round >= max);
            if self.max_rounds.is_some() {
                reports.push(report);
            }
            if finished {
                return reports;
            }

            tracing::debug!("State: {:?}", WatchState::Sleeping);
            tracing::info!("💤 Sleeping for {:?}...", self.interval);
            tokio::time::sleep(self.interval).await;
        }
    }

    /// 驗證失敗時不進入輪詢
    pub async fn watch(
        &self,
        prompt: &dyn Prompt,
        phone_number: Option<&str>,
    ) -> Result<Vec<RoundReport>> {
        let auth = self.authenticate(prompt, phone_number).await?;
        Ok(self.run(&auth).await)
    }
}
