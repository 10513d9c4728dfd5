use gloo_net::http::Request;
use medimind_shared::{
    DEFAULT_API_URL, LoginRequest, MutationAck, Prescription, Schedule, SessionUser,
    SignupRequest, ToggleScheduleRequest, UploadOutcome, error_message,
};
use web_sys::{File, FormData, RequestCredentials};

/// API 调用的类型化错误
///
/// 按操作类别区分，消息来自服务端错误体（`error`/`detail` 回退链）
/// 或各操作的通用兜底文案。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// 登录/注册被拒，或会话凭据已失效
    Auth(String),
    /// 处方文件被拒绝或处理失败，原因原样来自服务端
    Upload(String),
    /// 列表读取失败（这类端点不保证结构化错误体）
    Fetch(String),
    /// 切换/删除被服务端拒绝
    Mutation(String),
}

impl ApiError {
    /// 展示给用户的消息正文
    pub fn message(&self) -> &str {
        match self {
            ApiError::Auth(msg)
            | ApiError::Upload(msg)
            | ApiError::Fetch(msg)
            | ApiError::Mutation(msg) => msg,
        }
    }
}

impl core::fmt::Display for ApiError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ApiError::Auth(msg) => write!(f, "authentication failed: {}", msg),
            ApiError::Upload(msg) => write!(f, "upload rejected: {}", msg),
            ApiError::Fetch(msg) => write!(f, "fetch failed: {}", msg),
            ApiError::Mutation(msg) => write!(f, "mutation rejected: {}", msg),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MediMindApi {
    pub base_url: String,
}

impl MediMindApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    /// 从编译期环境变量读取后端地址，未设置时使用默认值
    pub fn from_env() -> Self {
        Self::new(option_env!("MEDIMIND_API_URL").unwrap_or(DEFAULT_API_URL))
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    // 登录与注册仅端点和报文不同，响应契约一致
    async fn post_credentials<B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> Result<SessionUser, ApiError> {
        let res = Request::post(&self.url(path))
            .credentials(RequestCredentials::Include)
            .json(body)
            .map_err(|e| ApiError::Auth(e.to_string()))?
            .send()
            .await
            .map_err(|e| ApiError::Auth(e.to_string()))?;

        if !res.ok() {
            let body = res.text().await.unwrap_or_default();
            return Err(ApiError::Auth(error_message(&body, fallback)));
        }

        res.json::<SessionUser>()
            .await
            .map_err(|e| ApiError::Auth(e.to_string()))
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<SessionUser, ApiError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.post_credentials("/auth/login", &body, "Invalid email or password")
            .await
    }

    pub async fn signup(
        &self,
        email: &str,
        password: &str,
        full_name: Option<String>,
    ) -> Result<SessionUser, ApiError> {
        let body = SignupRequest {
            email: email.to_string(),
            password: password.to_string(),
            full_name,
        };
        self.post_credentials("/auth/signup", &body, "Could not create your account")
            .await
    }

    /// 远端注销。调用方必须无视结果清除本地会话，失败只是尽力而为。
    pub async fn logout(&self) -> Result<(), ApiError> {
        let res = Request::post(&self.url("/auth/logout"))
            .credentials(RequestCredentials::Include)
            .send()
            .await
            .map_err(|e| ApiError::Auth(e.to_string()))?;

        if !res.ok() {
            let body = res.text().await.unwrap_or_default();
            return Err(ApiError::Auth(error_message(
                &body,
                "Sign-out was rejected by the server",
            )));
        }

        Ok(())
    }

    /// 用环境 Cookie 询问服务端当前会话。任何失败都应视为"未认证"。
    pub async fn me(&self) -> Result<SessionUser, ApiError> {
        let res = Request::get(&self.url("/auth/me"))
            .credentials(RequestCredentials::Include)
            .send()
            .await
            .map_err(|e| ApiError::Auth(e.to_string()))?;

        if !res.ok() {
            let body = res.text().await.unwrap_or_default();
            return Err(ApiError::Auth(error_message(&body, "Session expired")));
        }

        res.json::<SessionUser>()
            .await
            .map_err(|e| ApiError::Auth(e.to_string()))
    }

    /// 以 multipart 上传处方文件，服务端完成 OCR 与计划派生
    pub async fn upload_prescription(
        &self,
        file: &File,
        user_id: &str,
    ) -> Result<UploadOutcome, ApiError> {
        let form = FormData::new().map_err(|e| ApiError::Upload(format!("{:?}", e)))?;
        form.append_with_blob_and_filename("file", file, &file.name())
            .map_err(|e| ApiError::Upload(format!("{:?}", e)))?;
        form.append_with_str("user_id", user_id)
            .map_err(|e| ApiError::Upload(format!("{:?}", e)))?;

        // 不设置 Content-Type，由浏览器补上 multipart 边界
        let res = Request::post(&self.url("/api/upload-prescription"))
            .credentials(RequestCredentials::Include)
            .body(form)
            .map_err(|e| ApiError::Upload(e.to_string()))?
            .send()
            .await
            .map_err(|e| ApiError::Upload(e.to_string()))?;

        if !res.ok() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            // 401 证明环境凭据已失效，按会话过期处理而非上传失败
            if status == 401 {
                return Err(ApiError::Auth(error_message(&body, "Session expired")));
            }
            return Err(ApiError::Upload(error_message(
                &body,
                "The server could not process this prescription",
            )));
        }

        res.json::<UploadOutcome>()
            .await
            .map_err(|e| ApiError::Upload(e.to_string()))
    }

    pub async fn user_schedules(&self, user_id: &str) -> Result<Vec<Schedule>, ApiError> {
        self.fetch_list(
            &format!("/api/user/{}/schedules", user_id),
            "Could not load schedules",
        )
        .await
    }

    pub async fn user_prescriptions(&self, user_id: &str) -> Result<Vec<Prescription>, ApiError> {
        self.fetch_list(
            &format!("/api/user/{}/prescriptions", user_id),
            "Could not load prescriptions",
        )
        .await
    }

    async fn fetch_list<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        fallback: &str,
    ) -> Result<Vec<T>, ApiError> {
        let res = Request::get(&self.url(path))
            .credentials(RequestCredentials::Include)
            .send()
            .await
            .map_err(|e| ApiError::Fetch(e.to_string()))?;

        if !res.ok() {
            let status = res.status();
            if status == 401 {
                return Err(ApiError::Auth("Session expired".to_string()));
            }
            return Err(ApiError::Fetch(format!("{} (HTTP {})", fallback, status)));
        }

        res.json::<Vec<T>>()
            .await
            .map_err(|e| ApiError::Fetch(e.to_string()))
    }

    /// 幂等设置计划的 enabled 标志
    pub async fn toggle_schedule(
        &self,
        schedule_id: &str,
        enabled: bool,
    ) -> Result<MutationAck, ApiError> {
        let body = ToggleScheduleRequest {
            schedule_id: schedule_id.to_string(),
            enabled,
        };
        let res = Request::post(&self.url("/api/toggle-schedule"))
            .credentials(RequestCredentials::Include)
            .json(&body)
            .map_err(|e| ApiError::Mutation(e.to_string()))?
            .send()
            .await
            .map_err(|e| ApiError::Mutation(e.to_string()))?;

        if !res.ok() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            if status == 401 {
                return Err(ApiError::Auth(error_message(&body, "Session expired")));
            }
            return Err(ApiError::Mutation(error_message(
                &body,
                "Could not update the schedule",
            )));
        }

        res.json::<MutationAck>()
            .await
            .map_err(|e| ApiError::Mutation(e.to_string()))
    }

    pub async fn delete_schedule(&self, schedule_id: &str) -> Result<MutationAck, ApiError> {
        let res = Request::delete(&self.url(&format!("/api/schedule/{}", schedule_id)))
            .credentials(RequestCredentials::Include)
            .send()
            .await
            .map_err(|e| ApiError::Mutation(e.to_string()))?;

        if !res.ok() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            if status == 401 {
                return Err(ApiError::Auth(error_message(&body, "Session expired")));
            }
            return Err(ApiError::Mutation(error_message(
                &body,
                "Could not delete the schedule",
            )));
        }

        res.json::<MutationAck>()
            .await
            .map_err(|e| ApiError::Mutation(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_trimmed_and_joined() {
        let api = MediMindApi::new("http://localhost:8000/");
        assert_eq!(api.base_url, "http://localhost:8000");
        assert_eq!(api.url("/auth/me"), "http://localhost:8000/auth/me");
        assert_eq!(api.url("auth/me"), "http://localhost:8000/auth/me");
    }

    #[test]
    fn error_message_is_exposed_verbatim() {
        let err = ApiError::Mutation("not found".to_string());
        assert_eq!(err.message(), "not found");
        assert_eq!(err.to_string(), "mutation rejected: not found");
    }
}
