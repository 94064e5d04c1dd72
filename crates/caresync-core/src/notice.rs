use crate::capture::CaptureError;
use crate::locale::Locale;
use crate::voice_commands::Outcome;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// 前端弹出的短暂提示
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub level: NoticeLevel,
}

impl Notice {
    fn new(title: &str, description: String, level: NoticeLevel) -> Self {
        Self {
            title: title.to_string(),
            description,
            level,
        }
    }
}

/// 执行解析结果的宿主界面
pub trait Navigator {
    fn navigate(&self, path: &str);
    fn notify(&self, notice: Notice);
    /// 请求界面打开手动输入框
    fn request_manual_entry(&self);
}

fn voice_title(locale: Locale) -> &'static str {
    match locale {
        Locale::En => "🎤 Voice Command",
        Locale::Es => "🎤 Comando de voz",
        Locale::Fr => "🎤 Commande vocale",
    }
}

/// 解析结果对应的提示
pub fn outcome_notice(outcome: &Outcome, locale: Locale) -> Notice {
    let title = voice_title(locale);
    match outcome {
        Outcome::NavigateTo { label, .. } => {
            let description = match locale {
                Locale::En => format!("Navigating to {label}"),
                Locale::Es => format!("Navegando a {label}"),
                Locale::Fr => format!("Navigation vers {label}"),
            };
            Notice::new(title, description, NoticeLevel::Info)
        }
        Outcome::NavigateToEntity { label, .. } => {
            let description = match locale {
                Locale::En => format!("Opening {label}"),
                Locale::Es => format!("Abriendo {label}"),
                Locale::Fr => format!("Ouverture de {label}"),
            };
            Notice::new(title, description, NoticeLevel::Info)
        }
        Outcome::Unrecognized { text } => {
            let description = match locale {
                Locale::En => format!("Command not recognized: \"{text}\""),
                Locale::Es => format!("Comando no reconocido: \"{text}\""),
                Locale::Fr => format!("Commande non reconnue : \"{text}\""),
            };
            Notice::new(title, description, NoticeLevel::Info)
        }
    }
}

/// 执行解析结果：跳转并提示
pub fn act(outcome: &Outcome, locale: Locale, navigator: &dyn Navigator) {
    if let Some(path) = outcome.path() {
        navigator.navigate(&path);
    }
    navigator.notify(outcome_notice(outcome, locale));
}

/// 设备不支持语音采集时的提示
pub fn unsupported_notice(locale: Locale) -> Notice {
    let (title, description) = match locale {
        Locale::En => (
            "Voice not supported",
            "Speech capture is unavailable here. Type your command instead.",
        ),
        Locale::Es => (
            "Voz no disponible",
            "La captura de voz no está disponible. Escriba su comando.",
        ),
        Locale::Fr => (
            "Voix non prise en charge",
            "La capture vocale est indisponible. Saisissez votre commande.",
        ),
    };
    Notice::new(title, description.to_string(), NoticeLevel::Info)
}

/// 采集失败的提示
pub fn capture_error_notice(error: &CaptureError, locale: Locale) -> Notice {
    let title = voice_title(locale);
    match error {
        CaptureError::PermissionDenied => {
            let description = match locale {
                Locale::En => "Microphone access was denied. Type your command instead.",
                Locale::Es => "Se denegó el acceso al micrófono. Escriba su comando.",
                Locale::Fr => "L'accès au microphone a été refusé. Saisissez votre commande.",
            };
            Notice::new(title, description.to_string(), NoticeLevel::Error)
        }
        CaptureError::NoSpeech => {
            let description = match locale {
                Locale::En => "No speech was detected. Please try again.",
                Locale::Es => "No se detectó voz. Inténtelo de nuevo.",
                Locale::Fr => "Aucune parole détectée. Veuillez réessayer.",
            };
            Notice::new(title, description.to_string(), NoticeLevel::Warning)
        }
        CaptureError::Other(reason) => {
            let description = match locale {
                Locale::En => format!("Voice capture failed: {reason}"),
                Locale::Es => format!("Falló la captura de voz: {reason}"),
                Locale::Fr => format!("La capture vocale a échoué : {reason}"),
            };
            Notice::new(title, description, NoticeLevel::Error)
        }
    }
}

/// 报告采集失败；权限被拒时同时切到手动输入
pub fn report_capture_error(error: &CaptureError, locale: Locale, navigator: &dyn Navigator) {
    navigator.notify(capture_error_notice(error, locale));
    if error.wants_manual_entry() {
        navigator.request_manual_entry();
    }
}

/// 报告设备不支持语音，并切到手动输入
pub fn report_unsupported(locale: Locale, navigator: &dyn Navigator) {
    navigator.notify(unsupported_notice(locale));
    navigator.request_manual_entry();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::{Route, Section};
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        paths: RefCell<Vec<String>>,
        notices: RefCell<Vec<Notice>>,
        manual: RefCell<usize>,
    }

    impl Navigator for Recorder {
        fn navigate(&self, path: &str) {
            self.paths.borrow_mut().push(path.to_string());
        }
        fn notify(&self, notice: Notice) {
            self.notices.borrow_mut().push(notice);
        }
        fn request_manual_entry(&self) {
            *self.manual.borrow_mut() += 1;
        }
    }

    #[test]
    fn act_navigates_and_notifies() {
        let rec = Recorder::default();
        let outcome = Outcome::NavigateTo {
            route: Route::Section(Section::Doctors),
            label: "Doctors".into(),
        };
        act(&outcome, Locale::En, &rec);
        assert_eq!(*rec.paths.borrow(), ["/doctors"]);
        assert_eq!(rec.notices.borrow()[0].description, "Navigating to Doctors");
    }

    #[test]
    fn unrecognized_only_notifies() {
        let rec = Recorder::default();
        act(
            &Outcome::Unrecognized { text: "xyz".into() },
            Locale::En,
            &rec,
        );
        assert!(rec.paths.borrow().is_empty());
        let notices = rec.notices.borrow();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Info);
        assert!(notices[0].description.contains("\"xyz\""));
    }

    #[test]
    fn entity_notice_is_localized() {
        let outcome = Outcome::NavigateToEntity {
            route: Route::Patient("PT-1001".into()),
            entity_id: "PT-1001".into(),
            label: "John Doe".into(),
        };
        assert_eq!(outcome_notice(&outcome, Locale::Fr).description, "Ouverture de John Doe");
        assert_eq!(outcome_notice(&outcome, Locale::Es).title, "🎤 Comando de voz");
    }

    #[test]
    fn permission_denied_requests_manual_entry() {
        let rec = Recorder::default();
        report_capture_error(&CaptureError::PermissionDenied, Locale::En, &rec);
        assert_eq!(*rec.manual.borrow(), 1);
        assert_eq!(rec.notices.borrow()[0].level, NoticeLevel::Error);

        let rec = Recorder::default();
        report_capture_error(&CaptureError::NoSpeech, Locale::En, &rec);
        assert_eq!(*rec.manual.borrow(), 0);
        assert_eq!(rec.notices.borrow()[0].level, NoticeLevel::Warning);
    }

    #[test]
    fn unsupported_falls_back_to_manual_entry() {
        let rec = Recorder::default();
        report_unsupported(Locale::Es, &rec);
        assert_eq!(*rec.manual.borrow(), 1);
        assert_eq!(rec.notices.borrow()[0].title, "Voz no disponible");
    }
}
