//! 把采集会话、语音识别和指令解析串起来

use crate::audio::AudioSignal;
use crate::commands::AppState;
use crate::navigator::{emit_capture_state, WindowNavigator};
use caresync_core::notice::{act, report_capture_error, report_unsupported};
use caresync_core::vad::VadSignal;
use caresync_core::{
    CaptureError, CaptureEvent, Outcome, SessionId, SessionState, StartOutcome, ToggleOutcome,
};
use std::sync::mpsc::Receiver;
use tauri::{AppHandle, Manager};

/// 解析一条文本指令并执行
pub fn submit_text(app: &AppHandle, text: &str) -> Option<Outcome> {
    let state = app.state::<AppState>();
    let locale = *state.locale.lock().unwrap();
    let outcome = state.interpreter.interpret(text, locale)?;
    act(&outcome, locale, &WindowNavigator::new(app));
    Some(outcome)
}

/// 开始采集，已有会话会先被停止
pub fn start_listening(app: &AppHandle) {
    let state = app.state::<AppState>();
    let started = state.capture.lock().unwrap().start();
    match started {
        Ok(StartOutcome::Started(id)) => emit_capture_state(app, SessionState::Listening(id)),
        Ok(StartOutcome::Unsupported) => on_unsupported(app),
        Err(e) => on_capture_error(app, &e),
    }
}

/// 开关式：空闲时开始，活动时静默取消
pub fn toggle_listening(app: &AppHandle) -> SessionState {
    let state = app.state::<AppState>();
    let toggled = state.capture.lock().unwrap().toggle();
    match toggled {
        Ok(ToggleOutcome::Started(id)) => emit_capture_state(app, SessionState::Listening(id)),
        Ok(ToggleOutcome::Cancelled(_)) => emit_capture_state(app, SessionState::Idle),
        Ok(ToggleOutcome::Unsupported) => on_unsupported(app),
        Err(e) => on_capture_error(app, &e),
    }
    let current = state.capture.lock().unwrap().state();
    current
}

/// 静默取消
pub fn cancel_listening(app: &AppHandle) {
    let state = app.state::<AppState>();
    let cancelled = state.capture.lock().unwrap().cancel();
    if cancelled.is_some() {
        emit_capture_state(app, SessionState::Idle);
    }
}

/// 结束当前录音并识别（热键松开、前端停止按钮）
pub fn stop_listening(app: &AppHandle) {
    let state = app.state::<AppState>();
    let current = state.capture.lock().unwrap().state();
    if let SessionState::Listening(id) = current {
        finish_session(app, id);
    }
}

/// 结束录音，把音频交给识别服务
fn finish_session(app: &AppHandle, id: SessionId) {
    let state = app.state::<AppState>();
    let audio = match state.capture.lock().unwrap().finish(id) {
        Some(audio) => audio,
        None => return,
    };

    let wav = match audio {
        Ok(wav) => wav,
        Err(e) => {
            emit_capture_state(app, SessionState::Idle);
            on_capture_error(app, &e);
            return;
        }
    };

    emit_capture_state(app, SessionState::Recognizing(id));
    let asr = state.asr.clone();
    let app_handle = app.clone();
    tauri::async_runtime::spawn(async move {
        let result = asr.recognize(wav).await;
        deliver(&app_handle, id, result);
    });
}

/// 交付会话结果：识别文本走指令解析，失败给出提示；过期会话静默丢弃
fn deliver(app: &AppHandle, id: SessionId, result: Result<String, CaptureError>) {
    let state = app.state::<AppState>();
    let event = state.capture.lock().unwrap().deliver(id, result);
    let Some(event) = event else {
        return;
    };
    emit_capture_state(app, SessionState::Idle);

    match event {
        CaptureEvent::Result(text) => {
            log::info!("识别结果 {id}: {}", text.trim());
            submit_text(app, &text);
        }
        CaptureEvent::Error(e) => on_capture_error(app, &e),
    }
}

fn on_unsupported(app: &AppHandle) {
    log::warn!("设备不支持语音采集，切换到手动输入");
    let locale = *app.state::<AppState>().locale.lock().unwrap();
    report_unsupported(locale, &WindowNavigator::new(app));
}

fn on_capture_error(app: &AppHandle, error: &CaptureError) {
    log::error!("语音采集失败: {error}");
    let locale = *app.state::<AppState>().locale.lock().unwrap();
    report_capture_error(error, locale, &WindowNavigator::new(app));
}

/// 在后台线程里处理音频线程发来的信号
pub fn spawn_signal_dispatcher(app: AppHandle, signals: Receiver<AudioSignal>) {
    std::thread::spawn(move || {
        for signal in signals {
            match signal {
                AudioSignal::Vad(id, VadSignal::SpeechEnded) => finish_session(&app, id),
                AudioSignal::Vad(id, VadSignal::NoSpeech) => {
                    deliver(&app, id, Err(CaptureError::NoSpeech))
                }
                AudioSignal::StreamError(id, message) => {
                    deliver(&app, id, Err(CaptureError::Other(message)))
                }
            }
        }
        log::info!("音频信号通道关闭");
    });
}
