use anyhow::{anyhow, bail, Context};
use outage_schedule::{GroupCode, MicroFormat};
use serde::Deserialize;
use shared_kernel::configuration::config;
use std::time::Duration;
use url::Url;

#[derive(Debug, Deserialize)]
pub struct SessionSettings {
    /// Group picked during address selection; empty means the address is not in the rotation.
    #[serde(default)]
    pub group_code: String,
}

fn default_cache_ttl_secs() -> u64 {
    300
}

fn default_tick_interval_millis() -> u64 {
    1000
}

fn default_retry_delay_secs() -> u64 {
    30
}

fn default_recheck_secs() -> u64 {
    300
}

/// Upper bound for every second-based setting.
const MAX_DURATION_SECS: u64 = 7 * 24 * 60 * 60;

fn seconds(secs: u64) -> chrono::Duration {
    chrono::Duration::from_std(Duration::from_secs(secs))
        .unwrap_or_else(|_| chrono::Duration::max_value())
}

#[derive(Debug, Deserialize)]
pub struct ScheduleSettings {
    pub feed_url: Url,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_tick_interval_millis")]
    pub tick_interval_millis: u64,
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,
    /// How long an applied schedule is trusted before it is fetched again.
    #[serde(default = "default_recheck_secs")]
    pub recheck_secs: u64,
    #[serde(default)]
    pub micro_format: MicroFormat,
}

impl ScheduleSettings {
    pub fn cache_ttl(&self) -> chrono::Duration {
        seconds(self.cache_ttl_secs)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_millis)
    }

    pub fn retry_delay(&self) -> chrono::Duration {
        seconds(self.retry_delay_secs)
    }

    pub fn recheck_interval(&self) -> chrono::Duration {
        seconds(self.recheck_secs)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.tick_interval_millis == 0 {
            bail!("schedule.tick_interval_millis must be greater than zero");
        }
        for (key, value) in [
            ("cache_ttl_secs", self.cache_ttl_secs),
            ("retry_delay_secs", self.retry_delay_secs),
            ("recheck_secs", self.recheck_secs),
        ] {
            if value > MAX_DURATION_SECS {
                bail!("schedule.{key} is {value}, the maximum is {MAX_DURATION_SECS}");
            }
        }
        // A recheck inside the cache window would only ever see the cached body.
        if self.recheck_secs < self.cache_ttl_secs {
            bail!(
                "schedule.recheck_secs ({}) must not be shorter than schedule.cache_ttl_secs ({})",
                self.recheck_secs,
                self.cache_ttl_secs
            );
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub session: SessionSettings,
    pub schedule: ScheduleSettings,
}

impl Settings {
    pub fn parse() -> anyhow::Result<Settings> {
        let settings = config::<Settings>()
            .context("Failed to deserialize settings to power_status_watcher settings")?;
        settings
            .schedule
            .validate()
            .context("Invalid power_status_watcher settings")?;
        Ok(settings)
    }

    pub fn group(&self) -> anyhow::Result<GroupCode> {
        let raw = self.session.group_code.trim();
        if raw.is_empty() {
            return Ok(GroupCode::default());
        }
        GroupCode::normalize_input(raw).ok_or_else(|| anyhow!("`{raw}` is not a valid group code"))
    }
}
