//! Push-notification gateway client (ServerChan-compatible).
//!
//! One synchronous POST per send. The destination credential travels as a
//! path segment and is never logged; callers obtain it from the environment
//! via [`send_key_from_env`].

use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::Error;
use crate::model::NotificationRequest;

const DEFAULT_BASE_URL: &str = "https://sctapi.ftqq.com";

/// Titles longer than this are rejected, not truncated.
pub const MAX_TITLE_CHARS: usize = 256;

#[derive(Debug, Clone)]
pub struct Notifier {
    http: Client,
    base_url: Url,
}

#[derive(Debug, Deserialize)]
struct GatewayResponse {
    code: i64,
    message: Option<String>,
}

impl Notifier {
    pub fn new() -> Self {
        let base_url = Url::parse(DEFAULT_BASE_URL).expect("default gateway URL is valid");
        Self::with_base_url(base_url)
    }

    /// Point the client at a different gateway host. Used by tests.
    pub fn with_base_url(base_url: Url) -> Self {
        Self { http: Client::new(), base_url }
    }

    /// Send one notification. Exactly one request, no retry; every failure
    /// mode comes back as a typed [`Error`], never a panic.
    pub async fn send(&self, send_key: &str, request: &NotificationRequest) -> Result<(), Error> {
        if send_key.trim().is_empty() {
            return Err(Error::validation("推送密钥不能为空"));
        }
        if request.title.trim().is_empty() {
            return Err(Error::validation("消息标题不能为空"));
        }

        let title_chars = request.title.chars().count();
        if title_chars > MAX_TITLE_CHARS {
            return Err(Error::validation(format!(
                "消息标题过长：{title_chars} 个字符，上限为 {MAX_TITLE_CHARS}"
            )));
        }

        let url = self.send_url(send_key)?;
        let body = request.body.as_deref().unwrap_or("");

        let res = self
            .http
            .post(url)
            .form(&[("text", request.title.as_str()), ("desp", body)])
            .send()
            .await
            .map_err(Error::transport)?;

        let status = res.status();
        if status != reqwest::StatusCode::OK {
            return Err(Error::Upstream(format!("推送请求失败 (HTTP {status})")));
        }

        let reply: GatewayResponse = res
            .json()
            .await
            .map_err(|err| Error::Parse(format!("无法解析推送网关响应: {err}")))?;

        if reply.code != 0 {
            let message = reply.message.unwrap_or_else(|| format!("网关错误码 {}", reply.code));
            return Err(Error::Upstream(message));
        }

        Ok(())
    }

    fn send_url(&self, send_key: &str) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::validation("推送网关地址无效"))?
            .push(&format!("{}.send", send_key.trim()));
        Ok(url)
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Read the gateway credential from the named environment variable. The
/// value stays out of logs and error messages; only the variable NAME is
/// ever shown to the user.
pub fn send_key_from_env(var_name: &str) -> Result<String, Error> {
    match std::env::var(var_name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::validation(format!(
            "环境变量 {var_name} 未设置，无法读取推送密钥"
        ))),
    }
}
