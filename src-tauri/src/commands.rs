use crate::asr::AsrClient;
use crate::config::{save_config, AppConfig};
use crate::voice;
use caresync_core::directory::{
    ActionItem, ActiveWorkflowSummary, DashboardStats, DoctorDetail,
};
use caresync_core::{
    CaptureSession, CommandInterpreter, Directory, Doctor, Locale, Outcome, Patient,
    SessionState, StatusFilter,
};
use std::sync::{Arc, Mutex};
use tauri::{AppHandle, State};

/// 应用共享状态
pub struct AppState {
    pub config: Mutex<AppConfig>,
    pub locale: Mutex<Locale>,
    pub directory: Arc<Directory>,
    pub interpreter: CommandInterpreter,
    pub capture: Mutex<CaptureSession>,
    pub asr: AsrClient,
}

/// 手动输入的文本指令，空白输入返回 None
#[tauri::command]
pub fn submit_command(app: AppHandle, text: String) -> Option<Outcome> {
    voice::submit_text(&app, &text)
}

/// 开始语音采集
#[tauri::command]
pub fn start_listening(app: AppHandle) {
    voice::start_listening(&app);
}

/// 结束录音并识别
#[tauri::command]
pub fn stop_listening(app: AppHandle) {
    voice::stop_listening(&app);
}

/// 取消采集，不产生任何结果
#[tauri::command]
pub fn cancel_listening(app: AppHandle) {
    voice::cancel_listening(&app);
}

/// 麦克风按钮：开始或取消
#[tauri::command]
pub fn toggle_listening(app: AppHandle) -> SessionState {
    voice::toggle_listening(&app)
}

#[tauri::command]
pub fn get_locale(state: State<'_, AppState>) -> Locale {
    *state.locale.lock().unwrap()
}

/// 切换界面语言并写回配置，不支持的值回退到默认语言
#[tauri::command]
pub fn set_locale(state: State<'_, AppState>, code: String) -> Result<Locale, String> {
    let locale = Locale::parse_or_default(&code);
    *state.locale.lock().unwrap() = locale;

    let mut config = state.config.lock().unwrap();
    config.locale = locale.code().to_string();
    save_config(&config)?;
    log::info!("界面语言切换为 {locale}");
    Ok(locale)
}

/// 获取当前配置
#[tauri::command]
pub fn get_config(state: State<'_, AppState>) -> AppConfig {
    state.config.lock().unwrap().clone()
}

/// 病人列表：按姓名/编号/医生检索，再按状态过滤
#[tauri::command]
pub fn list_patients(
    state: State<'_, AppState>,
    query: Option<String>,
    status: Option<String>,
) -> Vec<Patient> {
    let filter = status
        .as_deref()
        .map(StatusFilter::parse)
        .unwrap_or_default();
    state
        .directory
        .search_patients(query.as_deref().unwrap_or_default(), filter)
        .into_iter()
        .cloned()
        .collect()
}

#[tauri::command]
pub fn get_patient(state: State<'_, AppState>, id: String) -> Result<Patient, String> {
    state
        .directory
        .patient(&id)
        .cloned()
        .ok_or_else(|| format!("未找到病人: {id}"))
}

#[tauri::command]
pub fn list_doctors(state: State<'_, AppState>) -> Vec<Doctor> {
    state.directory.doctors().to_vec()
}

#[tauri::command]
pub fn get_doctor(state: State<'_, AppState>, id: String) -> Result<DoctorDetail, String> {
    state
        .directory
        .doctor_detail(&id)
        .ok_or_else(|| format!("未找到医生: {id}"))
}

#[tauri::command]
pub fn dashboard_stats(state: State<'_, AppState>) -> DashboardStats {
    let today = state.config.lock().unwrap().today();
    state.directory.dashboard_stats(today)
}

#[tauri::command]
pub fn active_workflow(state: State<'_, AppState>) -> ActiveWorkflowSummary {
    let today = state.config.lock().unwrap().today();
    state.directory.active_workflow(today)
}

#[tauri::command]
pub fn pending_actions(state: State<'_, AppState>) -> Vec<ActionItem> {
    state.directory.pending_actions()
}

#[tauri::command]
pub fn delayed_actions(state: State<'_, AppState>) -> Vec<ActionItem> {
    state.directory.delayed_actions()
}
