use caresync_core::CaptureError;
use reqwest::{multipart, StatusCode};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct AsrResponse {
    data: Option<AsrData>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AsrData {
    text: String,
}

/// 语音识别服务客户端
#[derive(Clone)]
pub struct AsrClient {
    client: reqwest::Client,
    endpoint: String,
    asr_config_id: String,
}

impl AsrClient {
    pub fn new(server_url: &str, asr_config_id: &str, timeout: Duration) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| format!("创建 HTTP 客户端失败: {e}"))?;
        Ok(Self {
            client,
            endpoint: format!(
                "{}/api/tasks/asr-recognize/sync",
                server_url.trim_end_matches('/')
            ),
            asr_config_id: asr_config_id.to_string(),
        })
    }

    /// 上传 WAV 并返回识别文本
    pub async fn recognize(&self, wav_bytes: Vec<u8>) -> Result<String, CaptureError> {
        let file_part = multipart::Part::bytes(wav_bytes)
            .file_name("recording.wav")
            .mime_str("audio/wav")
            .map_err(|e| other(format!("构建 multipart 失败: {e}")))?;

        let form = multipart::Form::new()
            .part("file", file_part)
            .text("asrConfigId", self.asr_config_id.clone());

        let resp = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| other(format!("ASR 请求失败: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(classify_status(status));
        }

        let body: AsrResponse = resp
            .json()
            .await
            .map_err(|e| other(format!("解析 ASR 响应失败: {e}")))?;
        parse_response(body)
    }
}

fn other(message: String) -> CaptureError {
    log::error!("{message}");
    CaptureError::Other(message)
}

/// 服务端拒绝访问时按权限问题处理
fn classify_status(status: StatusCode) -> CaptureError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            log::error!("ASR 拒绝访问: {status}");
            CaptureError::PermissionDenied
        }
        _ => other(format!("ASR 返回错误状态: {status}")),
    }
}

fn parse_response(body: AsrResponse) -> Result<String, CaptureError> {
    if let Some(err) = body.error {
        return Err(other(format!("ASR 错误: {err}")));
    }
    match body.data {
        Some(d) if d.text.trim().is_empty() => Err(CaptureError::NoSpeech),
        Some(d) => Ok(d.text),
        None => Err(other("ASR 响应中无 data 字段".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<String, CaptureError> {
        parse_response(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn text_is_returned() {
        assert_eq!(parse(r#"{"data":{"text":"open doctors"}}"#), Ok("open doctors".into()));
    }

    #[test]
    fn empty_text_is_no_speech() {
        assert_eq!(parse(r#"{"data":{"text":"  "}}"#), Err(CaptureError::NoSpeech));
    }

    #[test]
    fn server_error_is_other() {
        assert!(matches!(
            parse(r#"{"error":"model offline"}"#),
            Err(CaptureError::Other(msg)) if msg.contains("model offline")
        ));
        assert!(matches!(parse("{}"), Err(CaptureError::Other(_))));
    }

    #[test]
    fn auth_failures_map_to_permission_denied() {
        assert_eq!(classify_status(StatusCode::FORBIDDEN), CaptureError::PermissionDenied);
        assert!(matches!(
            classify_status(StatusCode::BAD_GATEWAY),
            CaptureError::Other(_)
        ));
    }

    #[test]
    fn endpoint_trims_trailing_slash() {
        let client = AsrClient::new("http://asr.local/", "cfg", Duration::from_secs(5)).unwrap();
        assert_eq!(client.endpoint, "http://asr.local/api/tasks/asr-recognize/sync");
    }
}
