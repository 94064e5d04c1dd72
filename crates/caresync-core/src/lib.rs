//! CareSync 的核心逻辑：语音/文本指令解析、病人与医生目录、采集会话。
//!
//! 不依赖任何界面框架，桌面外壳见 `src-tauri`。

pub mod capture;
pub mod directory;
pub mod keywords;
pub mod locale;
pub mod matching;
pub mod notice;
pub mod route;
pub mod vad;
pub mod voice_commands;

pub use capture::{
    Capability, CaptureBackend, CaptureError, CaptureEvent, CaptureSession, ManualEntry,
    SessionId, SessionState, StartOutcome, ToggleOutcome,
};
pub use directory::{Directory, Doctor, Patient, StatusFilter, WorkflowStatus};
pub use locale::Locale;
pub use notice::{Navigator, Notice, NoticeLevel};
pub use route::{Route, Section};
pub use voice_commands::{CommandInterpreter, Outcome};
