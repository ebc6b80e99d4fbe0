//! Background scheduled tasks.
//!
//! Call `spawn_all` once during startup; tasks are detached via `tokio::spawn`.

use std::time::Duration;

use crate::config::SyncConfig;
use crate::services::BusifavorService;

/// Spawn all background tasks.
pub fn spawn_all(service: BusifavorService, config: &SyncConfig) {
    // 定时刷新本地批次状态, 间隔为 0 时不启动
    if config.stock_interval_secs == 0 {
        log::info!("Periodic stock sync disabled");
        return;
    }

    let interval = Duration::from_secs(config.stock_interval_secs);
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(interval).await;
            match service.sync_all_stocks().await {
                Ok(report) if report.failed_count() > 0 => log::warn!(
                    "Periodic stock sync: success={}, failed={}",
                    report.success_count(),
                    report.failed_count()
                ),
                Ok(report) => log::debug!("Periodic stock sync: success={}", report.success_count()),
                Err(e) => log::error!("Failed to sync stocks: {e:?}"),
            }
        }
    });
}
