//! 各语言的分区关键词表
//!
//! 每种语言一张表，结构相同。匹配时把同一分区在所有语言下的关键词合并成一组，
//! 因此无论当前界面语言是什么，任何一种语言说出的关键词都能命中。

use crate::locale::Locale;
use crate::route::Section;

/// 一种语言下各分区的关键词（均为小写，按子串匹配）
pub struct SectionKeywords {
    pub pending_actions: &'static [&'static str],
    pub delayed_actions: &'static [&'static str],
    pub active_workflow: &'static [&'static str],
    pub dashboard: &'static [&'static str],
    pub doctors: &'static [&'static str],
    pub patients: &'static [&'static str],
    pub logout: &'static [&'static str],
}

impl SectionKeywords {
    pub fn get(&self, section: Section) -> &'static [&'static str] {
        match section {
            Section::PendingActions => self.pending_actions,
            Section::DelayedActions => self.delayed_actions,
            Section::ActiveWorkflow => self.active_workflow,
            Section::Dashboard => self.dashboard,
            Section::Doctors => self.doctors,
            Section::Patients => self.patients,
            Section::Logout => self.logout,
        }
    }
}

pub static EN: SectionKeywords = SectionKeywords {
    pending_actions: &["pending"],
    delayed_actions: &["delayed", "overdue"],
    active_workflow: &["active", "workflow"],
    dashboard: &["home", "dashboard"],
    // "dr " / "dr." 让 "open dr chen" 这类说法也走医生规则，只在词首匹配
    doctors: &["doctor", "dr ", "dr."],
    patients: &["patient"],
    logout: &["logout", "log out", "sign out"],
};

pub static ES: SectionKeywords = SectionKeywords {
    pending_actions: &["pendiente"],
    delayed_actions: &["retrasad", "atrasad"],
    active_workflow: &["activo", "flujo"],
    dashboard: &["inicio", "tablero", "panel principal"],
    doctors: &["médico", "medico", "doctor", "dra "],
    patients: &["paciente"],
    logout: &["cerrar sesión", "cerrar sesion", "salir"],
};

pub static FR: SectionKeywords = SectionKeywords {
    pending_actions: &["en attente"],
    delayed_actions: &["en retard", "retardé"],
    active_workflow: &["actif", "flux"],
    dashboard: &["accueil", "tableau de bord"],
    doctors: &["médecin", "medecin", "docteur"],
    patients: &["patient"],
    logout: &["déconnexion", "deconnexion", "déconnecter"],
};

/// 只能出现在词首的关键词，避免 "sandra " 这类姓名误触发
const WORD_START: &[&str] = &["dr ", "dr.", "dra "];

/// 关键词是否出现在已规范化的语句里
///
/// 一般关键词按子串匹配，称谓缩写要求位于语句开头或空白之后。
pub fn occurs_in(keyword: &str, utterance: &str) -> bool {
    if !WORD_START.iter().any(|w| *w == keyword) {
        return utterance.contains(keyword);
    }
    utterance.match_indices(keyword).any(|(i, _)| {
        utterance[..i]
            .chars()
            .next_back()
            .map_or(true, char::is_whitespace)
    })
}

pub fn table(locale: Locale) -> &'static SectionKeywords {
    match locale {
        Locale::En => &EN,
        Locale::Es => &ES,
        Locale::Fr => &FR,
    }
}

/// 合并所有语言下某分区的关键词，去重并保持语言顺序
pub fn merged(section: Section) -> Vec<&'static str> {
    let mut out: Vec<&'static str> = Vec::new();
    for locale in Locale::ALL {
        for kw in table(locale).get(section) {
            if !out.contains(kw) {
                out.push(*kw);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_locale_covers_every_section() {
        for locale in Locale::ALL {
            for section in Section::ALL {
                assert!(
                    !table(locale).get(section).is_empty(),
                    "{locale} 缺少 {section:?} 的关键词"
                );
            }
        }
    }

    #[test]
    fn keywords_are_lowercase() {
        for locale in Locale::ALL {
            for section in Section::ALL {
                for kw in table(locale).get(section) {
                    assert_eq!(*kw, kw.to_lowercase());
                }
            }
        }
    }

    #[test]
    fn abbreviations_only_match_at_word_start() {
        assert!(occurs_in("dr ", "dr chen"));
        assert!(occurs_in("dr ", "open dr chen"));
        assert!(occurs_in("dr.", "open dr. chen"));
        assert!(occurs_in("dra ", "abrir dra garcia"));
        assert!(!occurs_in("dr ", "sandra lopez"));
        assert!(!occurs_in("dra ", "alexandra reyes"));
        // 其他关键词仍按子串匹配
        assert!(occurs_in("retrasad", "los retrasados"));
        assert!(occurs_in("patient", "outpatients"));
    }

    #[test]
    fn merged_deduplicates_shared_words() {
        let patients = merged(Section::Patients);
        assert_eq!(patients, ["patient", "paciente"]);
        let doctors = merged(Section::Doctors);
        assert_eq!(doctors.iter().filter(|k| **k == "doctor").count(), 1);
        assert!(doctors.contains(&"docteur"));
    }
}
