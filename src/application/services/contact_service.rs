use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::infrastructure::logging::{BoundaryLogger, Hop, Timer};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContactReceipt {
    pub success: bool,
    pub reference: String,
    pub received_at: DateTime<Utc>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContactError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("email address is not valid")]
    InvalidEmail,
}

/// ContactService - 문의 폼 처리
///
/// 실제 메일 발송은 아직 없음. 설정된 지연 후 성공을 돌려준다.
pub struct ContactService {
    delay: Duration,
    logger: Arc<BoundaryLogger>,
}

impl ContactService {
    pub fn new(delay: Duration, logger: Arc<BoundaryLogger>) -> Self {
        Self { delay, logger }
    }

    pub async fn submit(&self, trace_id: &str, request: ContactRequest) -> Result<ContactReceipt, ContactError> {
        let hop = Hop::new("API", "ContactService", "submit");
        let timer = Timer::start();
        self.logger.enter(trace_id, hop, &request.email);

        if let Err(e) = validate(&request) {
            self.logger.fail(trace_id, hop, &e);
            return Err(e);
        }

        tokio::time::sleep(self.delay).await;

        self.logger.leave(trace_id, hop, &timer);
        Ok(ContactReceipt {
            success: true,
            reference: uuid::Uuid::new_v4().to_string(),
            received_at: Utc::now(),
        })
    }
}

fn validate(request: &ContactRequest) -> Result<(), ContactError> {
    let required = [
        ("name", &request.name),
        ("email", &request.email),
        ("subject", &request.subject),
        ("message", &request.message),
    ];
    if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
        return Err(ContactError::MissingField(*field));
    }

    let email = request.email.trim();
    let valid_email = email
        .split_once('@')
        .map(|(local, domain)| !local.is_empty() && domain.contains('.') && !domain.starts_with('.'))
        .unwrap_or(false);
    if !valid_email {
        return Err(ContactError::InvalidEmail);
    }

    Ok(())
}
