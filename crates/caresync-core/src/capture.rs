//! 语音采集会话
//!
//! 同一界面同时只允许一个采集会话。开始新会话会先静默停止旧会话；
//! 已取消或被替换的会话，其识别结果到达时直接丢弃。

use serde::Serialize;
use std::fmt;

/// 采集会话编号
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 采集失败原因
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "kebab-case")]
pub enum CaptureError {
    PermissionDenied,
    NoSpeech,
    Other(String),
}

impl CaptureError {
    /// 是否需要切换到手动输入
    pub fn wants_manual_entry(&self) -> bool {
        matches!(self, CaptureError::PermissionDenied)
    }
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::PermissionDenied => f.write_str("permission-denied"),
            CaptureError::NoSpeech => f.write_str("no-speech"),
            CaptureError::Other(reason) => write!(f, "other: {reason}"),
        }
    }
}

/// 会话的终结事件
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum CaptureEvent {
    Result(String),
    Error(CaptureError),
}

/// 设备的语音能力
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    /// 可以本地采集
    Native,
    /// 不可用，只能手动输入
    ManualEntry,
}

/// 采集后端
pub trait CaptureBackend: Send {
    fn capability(&self) -> Capability;
    /// 开始采集
    fn begin(&mut self, session: SessionId) -> Result<(), CaptureError>;
    /// 停止采集，返回录到的音频（WAV 字节）
    fn end(&mut self) -> Result<Vec<u8>, CaptureError>;
    /// 停止采集并丢弃数据
    fn abort(&mut self);
}

/// 不支持语音的设备：只能手动输入
#[derive(Debug, Default)]
pub struct ManualEntry;

impl CaptureBackend for ManualEntry {
    fn capability(&self) -> Capability {
        Capability::ManualEntry
    }

    fn begin(&mut self, _session: SessionId) -> Result<(), CaptureError> {
        Err(CaptureError::Other("speech capture unavailable".to_string()))
    }

    fn end(&mut self) -> Result<Vec<u8>, CaptureError> {
        Err(CaptureError::Other("speech capture unavailable".to_string()))
    }

    fn abort(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "session", rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Listening(SessionId),
    Recognizing(SessionId),
}

impl SessionState {
    pub fn label(self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Listening(_) => "listening",
            SessionState::Recognizing(_) => "recognizing",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started(SessionId),
    /// 设备不支持，调用方应提示并切到手动输入
    Unsupported,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Started(SessionId),
    Unsupported,
    Cancelled(SessionId),
}

/// 采集会话控制器
pub struct CaptureSession {
    backend: Box<dyn CaptureBackend>,
    state: SessionState,
    next_id: u64,
}

impl CaptureSession {
    pub fn new(backend: Box<dyn CaptureBackend>) -> Self {
        Self {
            backend,
            state: SessionState::Idle,
            next_id: 1,
        }
    }

    pub fn capability(&self) -> Capability {
        self.backend.capability()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state != SessionState::Idle
    }

    /// 开始新会话，已有会话先静默停止
    pub fn start(&mut self) -> Result<StartOutcome, CaptureError> {
        if self.capability() == Capability::ManualEntry {
            return Ok(StartOutcome::Unsupported);
        }
        if let Some(previous) = self.cancel() {
            log::info!("开始新会话前停止旧会话 {previous}");
        }

        let id = SessionId(self.next_id);
        self.next_id += 1;
        self.backend.begin(id)?;
        self.state = SessionState::Listening(id);
        log::info!("采集会话 {id} 开始");
        Ok(StartOutcome::Started(id))
    }

    /// 活动中则取消，否则开始
    pub fn toggle(&mut self) -> Result<ToggleOutcome, CaptureError> {
        if let Some(id) = self.cancel() {
            return Ok(ToggleOutcome::Cancelled(id));
        }
        Ok(match self.start()? {
            StartOutcome::Started(id) => ToggleOutcome::Started(id),
            StartOutcome::Unsupported => ToggleOutcome::Unsupported,
        })
    }

    /// 结束录音进入识别阶段，返回待识别的音频
    ///
    /// 会话不是正在录音的那个时返回 None。
    pub fn finish(&mut self, id: SessionId) -> Option<Result<Vec<u8>, CaptureError>> {
        if self.state != SessionState::Listening(id) {
            log::info!("忽略过期会话 {id} 的结束请求");
            return None;
        }
        match self.backend.end() {
            Ok(audio) => {
                self.state = SessionState::Recognizing(id);
                Some(Ok(audio))
            }
            Err(e) => {
                self.state = SessionState::Idle;
                Some(Err(e))
            }
        }
    }

    /// 交付会话的最终结果，过期会话返回 None
    ///
    /// 空白识别文本按未检测到语音处理。
    pub fn deliver(
        &mut self,
        id: SessionId,
        result: Result<String, CaptureError>,
    ) -> Option<CaptureEvent> {
        match self.state {
            SessionState::Listening(current) if current == id => self.backend.abort(),
            SessionState::Recognizing(current) if current == id => {}
            _ => {
                log::info!("丢弃过期会话 {id} 的结果");
                return None;
            }
        }
        self.state = SessionState::Idle;

        Some(match result {
            Ok(text) if text.trim().is_empty() => CaptureEvent::Error(CaptureError::NoSpeech),
            Ok(text) => CaptureEvent::Result(text),
            Err(e) => CaptureEvent::Error(e),
        })
    }

    /// 静默取消当前会话
    pub fn cancel(&mut self) -> Option<SessionId> {
        let id = match self.state {
            SessionState::Idle => return None,
            SessionState::Listening(id) => {
                self.backend.abort();
                id
            }
            SessionState::Recognizing(id) => id,
        };
        self.state = SessionState::Idle;
        log::info!("采集会话 {id} 已取消");
        Some(id)
    }
}
