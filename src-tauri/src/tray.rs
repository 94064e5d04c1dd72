use crate::commands::AppState;
use crate::navigator::{show_main_window, WindowNavigator};
use crate::voice;
use caresync_core::notice::act;
use caresync_core::{Outcome, Route, Section};
use tauri::{
    menu::{Menu, MenuItem, PredefinedMenuItem},
    tray::{MouseButton, MouseButtonState, TrayIconBuilder, TrayIconEvent},
    AppHandle, Manager,
};

/// 分区菜单项 id 的前缀
const SECTION_PREFIX: &str = "section:";

/// 创建系统托盘
pub fn create_tray(app: &AppHandle) -> Result<(), String> {
    let locale = *app.state::<AppState>().locale.lock().unwrap();

    let show = MenuItem::with_id(app, "show", "显示/隐藏窗口", true, None::<&str>)
        .map_err(|e| format!("创建菜单项失败: {e}"))?;
    let voice_item = MenuItem::with_id(app, "voice", "语音指令", true, None::<&str>)
        .map_err(|e| format!("创建菜单项失败: {e}"))?;
    let quit = MenuItem::with_id(app, "quit", "退出", true, None::<&str>)
        .map_err(|e| format!("创建菜单项失败: {e}"))?;
    let separator =
        PredefinedMenuItem::separator(app).map_err(|e| format!("创建分隔符失败: {e}"))?;

    let menu = Menu::new(app).map_err(|e| format!("创建菜单失败: {e}"))?;
    menu.append(&show)
        .map_err(|e| format!("添加菜单项失败: {e}"))?;
    for section in Section::ALL {
        let item = MenuItem::with_id(
            app,
            format!("{SECTION_PREFIX}{}", section.key()),
            section.label(locale),
            true,
            None::<&str>,
        )
        .map_err(|e| format!("创建菜单项失败: {e}"))?;
        menu.append(&item)
            .map_err(|e| format!("添加菜单项失败: {e}"))?;
    }
    menu.append_items(&[&separator, &voice_item, &quit])
        .map_err(|e| format!("添加菜单项失败: {e}"))?;

    let mut builder = TrayIconBuilder::new();
    if let Some(icon) = app.default_window_icon() {
        builder = builder.icon(icon.clone());
    }
    builder
        .tooltip("CareSync")
        .menu(&menu)
        .on_menu_event(move |app, event| match event.id.as_ref() {
            "show" => {
                if let Some(window) = app.get_webview_window("main") {
                    if window.is_visible().unwrap_or(false) {
                        let _ = window.hide();
                    } else {
                        show_main_window(app);
                    }
                }
            }
            "voice" => {
                voice::toggle_listening(app);
            }
            "quit" => {
                app.exit(0);
            }
            id => {
                if let Some(section) = id.strip_prefix(SECTION_PREFIX).and_then(Section::from_key) {
                    navigate_to_section(app, section);
                }
            }
        })
        .on_tray_icon_event(|tray, event| {
            if let TrayIconEvent::Click {
                button: MouseButton::Left,
                button_state: MouseButtonState::Up,
                ..
            } = event
            {
                show_main_window(tray.app_handle());
            }
        })
        .build(app)
        .map_err(|e| format!("创建托盘失败: {e}"))?;

    Ok(())
}

/// 托盘点选分区，与语音指令走同一条执行路径
fn navigate_to_section(app: &AppHandle, section: Section) {
    let locale = *app.state::<AppState>().locale.lock().unwrap();
    let outcome = Outcome::NavigateTo {
        route: Route::Section(section),
        label: section.label(locale).to_string(),
    };
    log::info!("托盘导航: {}", section.path());
    act(&outcome, locale, &WindowNavigator::new(app));
}
