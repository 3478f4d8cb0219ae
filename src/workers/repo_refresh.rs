use anyhow::Result;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::info;

use crate::infrastructure::logging::TraceContext;
use crate::state::AppContext;

/// Run repository refresh worker
/// Re-fetches the GitHub repository list on a fixed interval. The first
/// tick fires immediately and serves as the startup fetch.
pub async fn run_repo_refresh(ctx: AppContext, every: Duration) -> Result<()> {
    let mut refresh_interval = interval(every);
    refresh_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!("Repository refresh worker started (every {}s)", every.as_secs());

    loop {
        refresh_interval.tick().await;

        let trace_id = TraceContext::new_trace_id();
        let count = ctx.showcase_service.refresh(&trace_id).await;
        info!("[{}] Repository snapshot holds {} repos", trace_id, count);
    }
}
