use crate::directory::{Directory, NamedEntity};
use crate::keywords;
use crate::locale::Locale;
use crate::matching::{self, NameForm};
use crate::route::{Route, Section};
use serde::Serialize;
use std::sync::Arc;

/// 解析结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Outcome {
    /// 跳转到某个分区
    #[serde(rename_all = "camelCase")]
    NavigateTo { route: Route, label: String },
    /// 跳转到某个病人/医生的详情页
    #[serde(rename_all = "camelCase")]
    NavigateToEntity {
        route: Route,
        entity_id: String,
        label: String,
    },
    /// 未识别，保留原始文本
    Unrecognized { text: String },
}

impl Outcome {
    /// 需要跳转的路径，未识别时为 None
    pub fn path(&self) -> Option<String> {
        match self {
            Outcome::NavigateTo { route, .. } | Outcome::NavigateToEntity { route, .. } => {
                Some(route.path())
            }
            Outcome::Unrecognized { .. } => None,
        }
    }
}

/// 关键词命中后在哪个目录里继续找人
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityScope {
    Doctors,
    Patients,
}

/// 意图规则：关键词谓词 + 目标分区
#[derive(Debug, Clone)]
pub struct IntentRule {
    pub section: Section,
    keywords: Vec<&'static str>,
    scope: Option<EntityScope>,
}

impl IntentRule {
    /// 用所有语言合并后的关键词构造规则
    pub fn new(section: Section) -> Self {
        Self::with_keywords(section, keywords::merged(section))
    }

    pub fn with_keywords(section: Section, keywords: Vec<&'static str>) -> Self {
        Self {
            section,
            keywords,
            scope: None,
        }
    }

    /// 命中后继续在目录中限定匹配
    pub fn scoped(mut self, scope: EntityScope) -> Self {
        self.scope = Some(scope);
        self
    }

    pub fn matches(&self, normalized: &str) -> bool {
        self.keywords
            .iter()
            .any(|kw| keywords::occurs_in(kw, normalized))
    }
}

/// 默认规则表，顺序即优先级
pub fn default_rules() -> Vec<IntentRule> {
    vec![
        IntentRule::new(Section::PendingActions),
        IntentRule::new(Section::DelayedActions),
        IntentRule::new(Section::ActiveWorkflow),
        IntentRule::new(Section::Dashboard),
        IntentRule::new(Section::Doctors).scoped(EntityScope::Doctors),
        IntentRule::new(Section::Patients).scoped(EntityScope::Patients),
        IntentRule::new(Section::Logout),
    ]
}

/// 语音/文本指令解析器
pub struct CommandInterpreter {
    rules: Vec<IntentRule>,
    directory: Arc<Directory>,
}

impl CommandInterpreter {
    pub fn new(directory: Arc<Directory>) -> Self {
        Self::with_rules(directory, default_rules())
    }

    pub fn with_rules(directory: Arc<Directory>, rules: Vec<IntentRule>) -> Self {
        Self { rules, directory }
    }

    /// 解析一条语句，空白输入返回 None
    ///
    /// `locale` 只决定结果里展示文案的语言，关键词始终跨语言匹配。
    pub fn interpret(&self, utterance: &str, locale: Locale) -> Option<Outcome> {
        let normalized = utterance.trim().to_lowercase();
        if normalized.is_empty() {
            return None;
        }

        let outcome = match self.rules.iter().find(|r| r.matches(&normalized)) {
            Some(rule) => self.resolve_rule(rule, &normalized, locale),
            None => self
                .fallback(&normalized)
                .unwrap_or_else(|| Outcome::Unrecognized {
                    text: utterance.to_string(),
                }),
        };

        log::info!("指令解析: {:?} → {:?}", utterance.trim(), outcome);
        Some(outcome)
    }

    fn resolve_rule(&self, rule: &IntentRule, normalized: &str, locale: Locale) -> Outcome {
        let entity = match rule.scope {
            Some(EntityScope::Doctors) => {
                matching::match_qualified(
                    self.directory.doctors(),
                    normalized,
                    NameForm::StripHonorific,
                )
                .map(|d| entity_outcome(Route::Doctor(d.id.clone()), d))
            }
            Some(EntityScope::Patients) => {
                matching::match_qualified(self.directory.patients(), normalized, NameForm::AsIs)
                    .map(|p| entity_outcome(Route::Patient(p.id.clone()), p))
            }
            None => None,
        };

        entity.unwrap_or_else(|| Outcome::NavigateTo {
            route: Route::Section(rule.section),
            label: rule.section.label(locale).to_string(),
        })
    }

    /// 兜底：先病人后医生
    fn fallback(&self, normalized: &str) -> Option<Outcome> {
        if let Some(p) = matching::match_fallback(self.directory.patients(), normalized) {
            return Some(entity_outcome(Route::Patient(p.id.clone()), p));
        }
        matching::match_fallback(self.directory.doctors(), normalized)
            .map(|d| entity_outcome(Route::Doctor(d.id.clone()), d))
    }
}

fn entity_outcome(route: Route, entity: &impl NamedEntity) -> Outcome {
    Outcome::NavigateToEntity {
        route,
        entity_id: entity.id().to_string(),
        label: entity.name().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interpreter() -> CommandInterpreter {
        CommandInterpreter::new(Arc::new(Directory::fixture().unwrap()))
    }

    fn section_of(outcome: Option<Outcome>) -> Option<Section> {
        match outcome {
            Some(Outcome::NavigateTo {
                route: Route::Section(s),
                ..
            }) => Some(s),
            _ => None,
        }
    }

    #[test]
    fn blank_input_is_a_no_op() {
        let it = interpreter();
        assert_eq!(it.interpret("", Locale::En), None);
        assert_eq!(it.interpret("   \t\n", Locale::En), None);
    }

    #[test]
    fn default_rule_order_is_fixed() {
        let order: Vec<Section> = default_rules().iter().map(|r| r.section).collect();
        assert_eq!(
            order,
            [
                Section::PendingActions,
                Section::DelayedActions,
                Section::ActiveWorkflow,
                Section::Dashboard,
                Section::Doctors,
                Section::Patients,
                Section::Logout,
            ]
        );
    }

    #[test]
    fn each_section_is_reachable() {
        let it = interpreter();
        let cases = [
            ("show pending", Section::PendingActions),
            ("delayed items", Section::DelayedActions),
            ("open workflow", Section::ActiveWorkflow),
            ("go home", Section::Dashboard),
            ("list doctors", Section::Doctors),
            ("all patients", Section::Patients),
            ("log out please", Section::Logout),
        ];
        for (text, expected) in cases {
            assert_eq!(section_of(it.interpret(text, Locale::En)), Some(expected), "{text}");
        }
    }

    #[test]
    fn pending_beats_delayed() {
        let it = interpreter();
        assert_eq!(
            section_of(it.interpret("delayed or pending?", Locale::En)),
            Some(Section::PendingActions)
        );
    }

    #[test]
    fn label_uses_active_locale() {
        let it = interpreter();
        assert_eq!(
            it.interpret("pending", Locale::Es),
            Some(Outcome::NavigateTo {
                route: Route::Section(Section::PendingActions),
                label: "Acciones pendientes".into(),
            })
        );
    }

    #[test]
    fn doctor_keyword_with_name_opens_doctor() {
        let it = interpreter();
        assert_eq!(
            it.interpret("open dr chen", Locale::En),
            Some(Outcome::NavigateToEntity {
                route: Route::Doctor("DR-001".into()),
                entity_id: "DR-001".into(),
                label: "Dr. Sarah Chen".into(),
            })
        );
        assert_eq!(
            it.interpret("Doctor Wilson", Locale::En).and_then(|o| o.path()),
            Some("/doctors/DR-002".to_string())
        );
    }

    #[test]
    fn patient_keyword_with_name_opens_patient() {
        let it = interpreter();
        assert_eq!(
            it.interpret("patient maria garcia", Locale::En).and_then(|o| o.path()),
            Some("/patients/PT-1002".to_string())
        );
        assert_eq!(
            it.interpret("paciente Emily", Locale::Es).and_then(|o| o.path()),
            Some("/patients/PT-1004".to_string())
        );
    }

    #[test]
    fn fallback_prefers_patients() {
        let it = interpreter();
        // "chen" 同时是病人 Lisa Chen 和医生 Sarah Chen 的姓
        assert_eq!(
            it.interpret("chen", Locale::En).and_then(|o| o.path()),
            Some("/patients/PT-1008".to_string())
        );
        assert_eq!(
            it.interpret("aisha", Locale::En).and_then(|o| o.path()),
            Some("/doctors/DR-003".to_string())
        );
    }

    #[test]
    fn unrecognized_echoes_original_text() {
        let it = interpreter();
        assert_eq!(
            it.interpret("xyz", Locale::En),
            Some(Outcome::Unrecognized { text: "xyz".into() })
        );
        assert_eq!(
            it.interpret("  What Now  ", Locale::En),
            Some(Outcome::Unrecognized {
                text: "  What Now  ".into()
            })
        );
    }

    #[test]
    fn reordering_rules_changes_priority() {
        let dir = Arc::new(Directory::fixture().unwrap());
        let mut rules = default_rules();
        rules.swap(0, 1);
        let it = CommandInterpreter::with_rules(dir, rules);
        assert_eq!(
            section_of(it.interpret("delayed or pending?", Locale::En)),
            Some(Section::DelayedActions)
        );
    }

    #[test]
    fn outcome_serializes_for_frontend() {
        let outcome = Outcome::NavigateToEntity {
            route: Route::Doctor("DR-001".into()),
            entity_id: "DR-001".into(),
            label: "Dr. Sarah Chen".into(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["type"], "navigateToEntity");
        assert_eq!(json["entityId"], "DR-001");
        assert_eq!(json["route"]["kind"], "doctor");
    }
}
