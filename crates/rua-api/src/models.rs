// Wire envelope shared by every backend command.

use serde::{Deserialize, Serialize};

/// `code` value the backend uses for a successful reply.
pub const SUCCESS_CODE: i64 = 200;

/// `{ code, message, data }` reply envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseResponse<T> {
    pub code: i64,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> BaseResponse<T> {
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }
}
