use serde::{Deserialize, Serialize};

mod date;
pub mod protocol;

pub use date::CreatedAt;
pub use protocol::{
    LoginRequest, MutationAck, SignupRequest, ToggleScheduleRequest, UploadOutcome, error_message,
};

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// 后端默认地址，可在编译期通过 `MEDIMIND_API_URL` 覆盖
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// 当前已认证的用户身份
///
/// 一个会话要么完整存在，要么不存在，不暴露半认证状态。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub user_id: String,
    pub email: String,
    #[serde(default, alias = "fullName", skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

/// 用药提醒计划，由后端在处方上传时生成
///
/// 后端以 Mongo 文档形式存储，`_id` 序列化为字符串。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    /// 回指所属处方，不拥有它
    pub prescription_id: String,
    pub medicine_name: String,
    pub dosage: String,
    pub frequency: String,
    pub timings: Vec<String>,
    pub enabled: bool,
    pub created_at: CreatedAt,
}

/// 一次上传的处方文档及其提取结果
///
/// 客户端视角下不可变：没有编辑操作。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prescription {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub raw_text: String,
    /// LLM 结构化提取结果（序列化后的 JSON 字符串）
    pub structured_data: String,
    pub created_at: CreatedAt,
}

/// 上传响应中 `medicines` 列表的单项
///
/// 提取不完整时后端会套用默认值，这里与之保持一致。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedMedicine {
    #[serde(default = "default_medicine_name")]
    pub medicine_name: String,
    #[serde(default = "default_dosage")]
    pub dosage: String,
    #[serde(default)]
    pub quantity: Option<String>,
    #[serde(default = "default_frequency")]
    pub frequency: String,
    #[serde(default = "default_timings")]
    pub timings: Vec<String>,
}

fn default_medicine_name() -> String {
    "Unknown Medicine".to_string()
}

fn default_dosage() -> String {
    "As prescribed".to_string()
}

fn default_frequency() -> String {
    "Daily".to_string()
}

fn default_timings() -> Vec<String> {
    vec!["morning".to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_user_decodes_login_response() {
        let user: SessionUser =
            serde_json::from_str(r#"{"user_id":"u1","email":"a@b.com"}"#).unwrap();
        assert_eq!(user.user_id, "u1");
        assert_eq!(user.email, "a@b.com");
        assert_eq!(user.full_name, None);
    }

    #[test]
    fn session_user_accepts_camel_case_full_name() {
        let user: SessionUser = serde_json::from_str(
            r#"{"user_id":"u1","email":"a@b.com","fullName":"Ada Lovelace"}"#,
        )
        .unwrap();
        assert_eq!(user.full_name.as_deref(), Some("Ada Lovelace"));
    }

    #[test]
    fn schedule_decodes_mongo_document() {
        let schedule: Schedule = serde_json::from_str(
            r#"{
                "_id": "s1",
                "user_id": "u1",
                "prescription_id": "p1",
                "medicine_name": "Paracetamol",
                "dosage": "1 tablet",
                "frequency": "2 times a day",
                "timings": ["morning", "night"],
                "enabled": true,
                "created_at": "2026-08-30T09:15:00.123000"
            }"#,
        )
        .unwrap();
        assert_eq!(schedule.id, "s1");
        assert_eq!(schedule.prescription_id, "p1");
        assert_eq!(schedule.timings, vec!["morning", "night"]);
        assert!(schedule.enabled);
    }

    #[test]
    fn extracted_medicine_applies_backend_defaults() {
        let medicine: ExtractedMedicine =
            serde_json::from_str(r#"{"medicine_name":"Amoxicillin"}"#).unwrap();
        assert_eq!(medicine.medicine_name, "Amoxicillin");
        assert_eq!(medicine.dosage, "As prescribed");
        assert_eq!(medicine.frequency, "Daily");
        assert_eq!(medicine.timings, vec!["morning"]);
        assert_eq!(medicine.quantity, None);
    }
}
