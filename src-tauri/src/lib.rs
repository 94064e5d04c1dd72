mod asr;
mod audio;
mod commands;
mod config;
mod navigator;
mod tray;
mod voice;

use asr::AsrClient;
use audio::NativeCapture;
use caresync_core::{CaptureBackend, CaptureSession, CommandInterpreter, Directory, ManualEntry};
use commands::AppState;
use config::load_config;
use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;
use tauri::Manager;
use tauri_plugin_global_shortcut::{GlobalShortcutExt, ShortcutState};

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    env_logger::init();

    let config = load_config().unwrap_or_else(|e| {
        log::error!("加载配置失败: {e}");
        panic!("配置加载失败: {e}");
    });
    let directory = Directory::fixture().unwrap_or_else(|e| {
        log::error!("加载目录失败: {e}");
        panic!("目录加载失败: {e}");
    });
    let asr = AsrClient::new(
        &config.server.url,
        &config.server.asr_config_id,
        Duration::from_secs(config.server.timeout_secs),
    )
    .unwrap_or_else(|e| {
        log::error!("{e}");
        panic!("ASR 客户端初始化失败: {e}");
    });

    // 有麦克风走本地采集，否则只能手动输入
    let (signal_tx, signal_rx) = mpsc::channel();
    let backend: Box<dyn CaptureBackend> = match NativeCapture::start(config.vad_settings(), signal_tx)
    {
        Ok(native) => Box::new(native),
        Err(e) => {
            log::warn!("语音采集不可用: {e}，使用手动输入");
            Box::new(ManualEntry)
        }
    };

    let directory = Arc::new(directory);
    let app_state = AppState {
        locale: Mutex::new(config.locale()),
        interpreter: CommandInterpreter::new(directory.clone()),
        directory,
        capture: Mutex::new(CaptureSession::new(backend)),
        asr,
        config: Mutex::new(config),
    };

    tauri::Builder::default()
        .plugin(
            tauri_plugin_global_shortcut::Builder::new()
                .with_handler(|app, _shortcut, event| {
                    // 按住说话：按下开始，松开结束并识别
                    match event.state() {
                        ShortcutState::Pressed => voice::start_listening(app),
                        ShortcutState::Released => voice::stop_listening(app),
                    }
                })
                .build(),
        )
        .manage(app_state)
        .invoke_handler(tauri::generate_handler![
            commands::submit_command,
            commands::start_listening,
            commands::stop_listening,
            commands::cancel_listening,
            commands::toggle_listening,
            commands::get_locale,
            commands::set_locale,
            commands::get_config,
            commands::list_patients,
            commands::get_patient,
            commands::list_doctors,
            commands::get_doctor,
            commands::dashboard_stats,
            commands::active_workflow,
            commands::pending_actions,
            commands::delayed_actions,
        ])
        .setup(move |app| {
            voice::spawn_signal_dispatcher(app.handle().clone(), signal_rx);

            // 创建系统托盘
            if let Err(e) = tray::create_tray(app.handle()) {
                log::error!("创建托盘失败: {e}");
            }

            // 注册全局热键
            let state = app.state::<AppState>();
            let hotkey_str = state.config.lock().unwrap().hotkey.record.clone();
            match hotkey_str.parse::<tauri_plugin_global_shortcut::Shortcut>() {
                Ok(shortcut) => {
                    if let Err(e) = app.global_shortcut().register(shortcut) {
                        log::error!("注册热键 {hotkey_str} 失败: {e}");
                    } else {
                        log::info!("已注册热键: {hotkey_str}");
                    }
                }
                Err(e) => {
                    log::error!("解析热键 {hotkey_str} 失败: {e}");
                }
            }

            Ok(())
        })
        .run(tauri::generate_context!())
        .expect("启动应用失败");
}
