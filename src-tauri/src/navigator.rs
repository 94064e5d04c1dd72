use caresync_core::{Navigator, Notice, SessionState};
use tauri::{AppHandle, Emitter, Manager};

/// 通过前端事件执行导航与提示
pub struct WindowNavigator<'a> {
    app: &'a AppHandle,
}

impl<'a> WindowNavigator<'a> {
    pub fn new(app: &'a AppHandle) -> Self {
        Self { app }
    }
}

impl Navigator for WindowNavigator<'_> {
    fn navigate(&self, path: &str) {
        show_main_window(self.app);
        if let Err(e) = self.app.emit("navigate", path) {
            log::error!("发送导航事件失败: {e}");
        }
    }

    fn notify(&self, notice: Notice) {
        if let Err(e) = self.app.emit("notice", notice) {
            log::error!("发送提示事件失败: {e}");
        }
    }

    fn request_manual_entry(&self) {
        show_main_window(self.app);
        if let Err(e) = self.app.emit("manual-entry", ()) {
            log::error!("发送手动输入事件失败: {e}");
        }
    }
}

/// 显示并聚焦主窗口
pub fn show_main_window(app: &AppHandle) {
    if let Some(window) = app.get_webview_window("main") {
        let _ = window.show();
        let _ = window.set_focus();
    }
}

/// 通知前端采集状态：idle / listening / recognizing
pub fn emit_capture_state(app: &AppHandle, state: SessionState) {
    if let Err(e) = app.emit("capture-state", state.label()) {
        log::error!("发送采集状态失败: {e}");
    }
}
