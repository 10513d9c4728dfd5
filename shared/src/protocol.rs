//! 请求/响应定义
//!
//! 与后端 HTTP 契约一一对应的报文类型，以及非 2xx 错误体的统一解析。
//! 列表端点直接返回 `Vec<Schedule>` / `Vec<Prescription>`（见 lib.rs），
//! 不在此重复定义。

use crate::ExtractedMedicine;
use serde::{Deserialize, Serialize};

// =========================================================
// Request Definitions
// =========================================================

/// `POST /auth/login`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `POST /auth/signup`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    #[serde(rename = "fullName", skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

/// `POST /api/toggle-schedule`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleScheduleRequest {
    pub schedule_id: String,
    pub enabled: bool,
}

// =========================================================
// Response Definitions
// =========================================================

/// `POST /api/upload-prescription` 的成功响应
///
/// `schedule_ids` 与 `medicines` 由服务端从处方文本派生；
/// 客户端展示后仍以整体重载为准，不做本地合并。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadOutcome {
    #[serde(default)]
    pub success: bool,
    pub prescription_id: String,
    #[serde(default)]
    pub schedule_ids: Vec<String>,
    #[serde(default)]
    pub medicines: Vec<ExtractedMedicine>,
    #[serde(default)]
    pub message: String,
}

/// 切换/删除操作的确认响应 `{success, message}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationAck {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

// =========================================================
// Error Body Parsing
// =========================================================

/// 从非 2xx 响应体中提取人类可读的错误信息
///
/// 回退链：`error` 字段 -> `detail` 字段 -> 调用方提供的通用消息。
/// 服务端错误体是松散类型的 JSON，任何一步解析失败都继续回退。
pub fn error_message(body: &str, fallback: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for field in ["error", "detail"] {
            if let Some(message) = value.get(field).and_then(|v| v.as_str()) {
                if !message.is_empty() {
                    return message.to_string();
                }
            }
        }
    }
    fallback.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_field_wins_over_detail() {
        let body = r#"{"error":"bad credentials","detail":"ignored"}"#;
        assert_eq!(error_message(body, "generic"), "bad credentials");
    }

    #[test]
    fn detail_field_is_the_second_choice() {
        let body = r#"{"detail":"not found"}"#;
        assert_eq!(error_message(body, "generic"), "not found");
    }

    #[test]
    fn falls_back_on_missing_fields_or_garbage() {
        assert_eq!(error_message(r#"{"status":500}"#, "generic"), "generic");
        assert_eq!(error_message("<html>502</html>", "generic"), "generic");
        assert_eq!(error_message("", "generic"), "generic");
    }

    #[test]
    fn non_string_and_empty_fields_fall_through() {
        assert_eq!(error_message(r#"{"error":null,"detail":"d"}"#, "g"), "d");
        assert_eq!(error_message(r#"{"error":"","detail":"d"}"#, "g"), "d");
        assert_eq!(error_message(r#"{"detail":{"nested":true}}"#, "g"), "g");
    }

    #[test]
    fn upload_outcome_decodes_backend_response() {
        let outcome: UploadOutcome = serde_json::from_str(
            r#"{
                "success": true,
                "prescription_id": "p1",
                "schedule_ids": ["s1", "s2"],
                "medicines": [
                    {"medicine_name": "Paracetamol", "dosage": "1 tablet",
                     "quantity": "10", "frequency": "2 times a day",
                     "timings": ["morning", "night"]}
                ],
                "message": "Prescription uploaded and schedules created successfully"
            }"#,
        )
        .unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.prescription_id, "p1");
        assert_eq!(outcome.schedule_ids, vec!["s1", "s2"]);
        assert_eq!(outcome.medicines.len(), 1);
        assert_eq!(outcome.medicines[0].medicine_name, "Paracetamol");
    }

    #[test]
    fn signup_request_omits_absent_full_name() {
        let req = SignupRequest {
            email: "a@b.com".to_string(),
            password: "secret".to_string(),
            full_name: None,
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(!json.contains("fullName"));

        let req = SignupRequest {
            full_name: Some("Ada".to_string()),
            ..req
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains(r#""fullName":"Ada""#));
    }
}
