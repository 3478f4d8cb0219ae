use axum::http::{HeaderMap, HeaderValue};

pub const TRACE_HEADER: &str = "x-trace-id";

/// Longest caller-supplied trace id we accept before minting our own.
const MAX_TRACE_ID_LEN: usize = 64;

/// Trace ID 생성 및 전파
pub struct TraceContext;

impl TraceContext {
    pub fn new_trace_id() -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }

    /// 요청 헤더의 x-trace-id를 그대로 쓰고, 없거나 이상하면 새로 만든다
    pub fn extract_or_generate(headers: &HeaderMap) -> String {
        headers
            .get(TRACE_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|id| Self::is_acceptable(id))
            .map(str::to_string)
            .unwrap_or_else(Self::new_trace_id)
    }

    pub fn add_to_headers(headers: &mut HeaderMap, trace_id: &str) {
        if let Ok(value) = HeaderValue::from_str(trace_id) {
            headers.insert(TRACE_HEADER, value);
        }
    }

    fn is_acceptable(id: &str) -> bool {
        !id.is_empty()
            && id.len() <= MAX_TRACE_ID_LEN
            && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }
}
