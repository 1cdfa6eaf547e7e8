use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, AppResult};

/// `{success, data, [pagination|message]}` wrapper returned by every endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    pub data: Option<T>,
    pub pagination: Option<Pagination>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct UnreadCount {
    pub count: u64,
}

impl<T: DeserializeOwned> ApiEnvelope<T> {
    pub fn from_value(value: Value) -> AppResult<Self> {
        Ok(serde_json::from_value(value)?)
    }

    fn ensure_success(&self) -> AppResult<()> {
        if self.success {
            Ok(())
        } else {
            Err(AppError::Rejected(
                self.message
                    .clone()
                    .unwrap_or_else(|| "Request was not successful".to_string()),
            ))
        }
    }

    pub fn into_data(self) -> AppResult<T> {
        self.ensure_success()?;
        self.data
            .ok_or_else(|| AppError::Rejected("Response carried no data".to_string()))
    }

    pub fn into_paged(self) -> AppResult<(T, Pagination)> {
        self.ensure_success()?;
        let pagination = self
            .pagination
            .ok_or_else(|| AppError::Rejected("Response carried no pagination".to_string()))?;
        let data = self
            .data
            .ok_or_else(|| AppError::Rejected("Response carried no data".to_string()))?;
        Ok((data, pagination))
    }

    pub fn into_message(self) -> AppResult<String> {
        self.ensure_success()?;
        Ok(self.message.unwrap_or_default())
    }
}
