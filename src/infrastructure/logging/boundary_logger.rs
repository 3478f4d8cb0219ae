use std::fmt::{Debug, Display};
use std::time::Instant;
use tracing::{error, info, warn};

/// One crossing between layers, e.g. `ShowcaseService→GitHub list_user_repos`.
#[derive(Debug, Clone, Copy)]
pub struct Hop<'a> {
    pub from: &'a str,
    pub to: &'a str,
    pub op: &'a str,
}

impl<'a> Hop<'a> {
    pub fn new(from: &'a str, to: &'a str, op: &'a str) -> Self {
        Self { from, to, op }
    }

    fn flow(&self) -> String {
        format!("{}→{}", self.from, self.to)
    }
}

/// BoundaryLogger - 레이어 경계(API, 서비스, 외부 호출)마다 한 줄씩 남긴다
///
/// 포맷: [trace_id] [from→to] op [STAGE] detail
#[derive(Clone, Default)]
pub struct BoundaryLogger;

impl BoundaryLogger {
    pub fn new() -> Self {
        Self
    }

    /// 예: [..] [Client→API] GET /api/projects [REQ] category=Data Science
    pub fn request(&self, trace_id: &str, method: &str, path: &str, detail: &str) {
        info!(
            trace_id = %trace_id,
            method = %method,
            path = %path,
            stage = "REQ",
            "[{}] [Client→API] {} {} [REQ] {}",
            trace_id, method, path, detail
        );
    }

    /// 예: [..] [Client→API] GET /api/projects [RES] 200 1.52ms
    pub fn response(&self, trace_id: &str, method: &str, path: &str, status: u16, timer: &Timer) {
        let duration_ms = timer.elapsed_ms();
        if status >= 500 {
            error!(
                trace_id = %trace_id,
                method = %method,
                path = %path,
                status = status,
                duration_ms = duration_ms,
                stage = "RES",
                "[{}] [Client→API] {} {} [RES] {} {:.2}ms",
                trace_id, method, path, status, duration_ms
            );
        } else {
            info!(
                trace_id = %trace_id,
                method = %method,
                path = %path,
                status = status,
                duration_ms = duration_ms,
                stage = "RES",
                "[{}] [Client→API] {} {} [RES] {} {:.2}ms",
                trace_id, method, path, status, duration_ms
            );
        }
    }

    pub fn enter<T: Debug>(&self, trace_id: &str, hop: Hop<'_>, params: &T) {
        info!(
            trace_id = %trace_id,
            flow = %hop.flow(),
            op = %hop.op,
            stage = "ENTER",
            "[{}] [{}] {} [ENTER] {:?}",
            trace_id, hop.flow(), hop.op, params
        );
    }

    pub fn leave(&self, trace_id: &str, hop: Hop<'_>, timer: &Timer) {
        let duration_ms = timer.elapsed_ms();
        info!(
            trace_id = %trace_id,
            flow = %hop.flow(),
            op = %hop.op,
            stage = "LEAVE",
            duration_ms = duration_ms,
            "[{}] [{}] {} [LEAVE] {:.2}ms",
            trace_id, hop.flow(), hop.op, duration_ms
        );
    }

    /// 실패했지만 빈 결과로 대체하는 경우 (degrade)
    pub fn degraded<E: Display>(&self, trace_id: &str, hop: Hop<'_>, error: &E) {
        warn!(
            trace_id = %trace_id,
            flow = %hop.flow(),
            op = %hop.op,
            stage = "DEGRADED",
            error = %error,
            "[{}] [{}] {} [DEGRADED] {}",
            trace_id, hop.flow(), hop.op, error
        );
    }

    pub fn fail<E: Display>(&self, trace_id: &str, hop: Hop<'_>, error: &E) {
        warn!(
            trace_id = %trace_id,
            flow = %hop.flow(),
            op = %hop.op,
            stage = "FAIL",
            error = %error,
            "[{}] [{}] {} [FAIL] {}",
            trace_id, hop.flow(), hop.op, error
        );
    }

    pub fn event_emit(&self, from: &str, event_type: &str) {
        info!(
            from = %from,
            event_type = %event_type,
            stage = "EVT",
            "[{}→EventBus] emit [EVT] {}",
            from, event_type
        );
    }
}

/// 경과 시간 측정
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}
