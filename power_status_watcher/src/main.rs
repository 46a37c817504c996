use anyhow::Context;
use outage_schedule::extractor::MarkupScheduleExtractor;
use outage_schedule::source::{CachedScheduleSource, HttpScheduleSource};
use outage_schedule::{IntervalParser, ScheduleReader};
use power_status_watcher::clock::SystemClock;
use power_status_watcher::configuration::Settings;
use power_status_watcher::controller::Controller;
use power_status_watcher::display::LogDisplay;
use power_status_watcher::refresh::SchedulePipeline;
use power_status_watcher::session::Session;
use response_cache::ResponseCache;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    shared_kernel::tracing::config_telemetry("power_status_watcher")?;
    let result = start().await;
    shared_kernel::tracing::shutdown_global_tracer_provider();
    result
}

async fn start() -> anyhow::Result<()> {
    let settings = Settings::parse()?;
    let group = settings.group()?;
    let schedule = settings.schedule;

    let cache = Arc::new(ResponseCache::<String>::new(schedule.cache_ttl()));
    let source = Arc::new(CachedScheduleSource::new(Arc::new(HttpScheduleSource), cache));
    let reader = ScheduleReader::new(
        Arc::new(MarkupScheduleExtractor::new(schedule.micro_format.clone())?),
        IntervalParser::new(&schedule.micro_format)?,
    );
    let pipeline = Arc::new(SchedulePipeline::new(source, reader, schedule.feed_url.clone()));

    let handle = Controller::new(
        Session::new(group, schedule.retry_delay(), schedule.recheck_interval()),
        pipeline,
        Arc::new(LogDisplay),
        Arc::new(SystemClock),
        schedule.tick_interval(),
    )
    .spawn();

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for the shutdown signal")?;
    tracing::info!("Shutting down");
    handle.stop().await
}
