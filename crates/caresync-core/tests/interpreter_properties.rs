use caresync_core::{CommandInterpreter, Directory, Locale, Outcome, Route, Section};
use std::sync::Arc;

/// 只有姓名有意义的最小目录
fn directory(patients: &[(&str, &str)], doctors: &[(&str, &str)]) -> Arc<Directory> {
    let patients: Vec<String> = patients
        .iter()
        .map(|(id, name)| {
            format!(
                r#"{{"id":"{id}","name":"{name}","age":40,"gender":"Other",
                    "assignedDoctor":"","currentStage":"OPD Visit","status":"pending",
                    "lastUpdated":"2026-02-11 09:00"}}"#
            )
        })
        .collect();
    let doctors: Vec<String> = doctors
        .iter()
        .map(|(id, name)| {
            format!(
                r#"{{"id":"{id}","name":"{name}","specialization":"General",
                    "department":"General","activePatients":0,"completedCases":0}}"#
            )
        })
        .collect();
    let json = format!(
        r#"{{"patients":[{}],"doctors":[{}]}}"#,
        patients.join(","),
        doctors.join(",")
    );
    Arc::new(Directory::from_json(&json).unwrap())
}

fn fixture() -> CommandInterpreter {
    CommandInterpreter::new(Arc::new(Directory::fixture().unwrap()))
}

fn pending() -> Route {
    Route::Section(Section::PendingActions)
}

fn route_of(outcome: Option<Outcome>) -> Option<Route> {
    match outcome? {
        Outcome::NavigateTo { route, .. } | Outcome::NavigateToEntity { route, .. } => Some(route),
        Outcome::Unrecognized { .. } => None,
    }
}

#[test]
fn pending_keyword_in_any_locale_regardless_of_active_locale() {
    let it = fixture();
    let utterances = ["show pending", "acciones pendientes", "actions en attente"];
    for text in utterances {
        for locale in Locale::ALL {
            assert_eq!(route_of(it.interpret(text, locale)), Some(pending()), "{text} / {locale}");
        }
    }
}

#[test]
fn pending_is_evaluated_before_delayed() {
    let it = fixture();
    for text in ["pending and delayed", "retrasados pendientes", "en retard ou en attente"] {
        assert_eq!(route_of(it.interpret(text, Locale::En)), Some(pending()), "{text}");
    }
}

#[test]
fn open_dr_chen_navigates_to_the_doctor() {
    let it = CommandInterpreter::new(directory(&[], &[("DR-001", "Dr. Sarah Chen")]));
    assert_eq!(
        it.interpret("open dr chen", Locale::En),
        Some(Outcome::NavigateToEntity {
            route: Route::Doctor("DR-001".into()),
            entity_id: "DR-001".into(),
            label: "Dr. Sarah Chen".into(),
        })
    );
}

#[test]
fn no_overlap_is_unrecognized() {
    let it = fixture();
    assert_eq!(
        it.interpret("xyz", Locale::Fr),
        Some(Outcome::Unrecognized { text: "xyz".into() })
    );
}

#[test]
fn blank_input_produces_nothing() {
    let it = fixture();
    assert_eq!(it.interpret("", Locale::En), None);
    assert_eq!(it.interpret("   ", Locale::Es), None);
}

#[test]
fn two_letter_names_never_fuzzy_match() {
    let it = CommandInterpreter::new(directory(&[("PT-1", "Jo Li")], &[]));
    for text in ["jo", "li", "jo li", "call jo li please"] {
        assert_eq!(
            it.interpret(text, Locale::En),
            Some(Outcome::Unrecognized { text: text.into() }),
            "{text}"
        );
    }
    // 带关键词时也只退回到分区页
    assert_eq!(
        route_of(it.interpret("patient jo li", Locale::En)),
        Some(Route::Section(Section::Patients))
    );
}

#[test]
fn interpretation_is_idempotent() {
    let it = fixture();
    for text in ["doctor wilson", "chen", "pendiente", "nothing here", "inicio"] {
        assert_eq!(it.interpret(text, Locale::Es), it.interpret(text, Locale::Es));
    }
}

#[test]
fn fallback_scans_patients_before_doctors() {
    let it = CommandInterpreter::new(directory(
        &[("PT-7", "Morgan Reyes")],
        &[("DR-7", "Dr. Alex Reyes")],
    ));
    assert_eq!(
        route_of(it.interpret("reyes", Locale::En)),
        Some(Route::Patient("PT-7".into()))
    );
}

#[test]
fn section_keyword_without_name_gives_generic_outcome() {
    let it = fixture();
    assert_eq!(
        it.interpret("médecins", Locale::Fr),
        Some(Outcome::NavigateTo {
            route: Route::Section(Section::Doctors),
            label: "Médecins".into(),
        })
    );
}

#[test]
fn names_containing_dr_fall_back_to_the_patient() {
    let it = CommandInterpreter::new(directory(
        &[("PT-9", "Sandra Lopez"), ("PT-10", "Leandra Reyes")],
        &[("DR-001", "Dr. Sarah Chen")],
    ));
    assert_eq!(
        it.interpret("sandra lopez", Locale::En).and_then(|o| o.path()),
        Some("/patients/PT-9".to_string())
    );
    assert_eq!(
        it.interpret("open leandra reyes", Locale::Es).and_then(|o| o.path()),
        Some("/patients/PT-10".to_string())
    );
    // 真正的称谓仍然走医生规则
    assert_eq!(
        it.interpret("dr chen", Locale::En).and_then(|o| o.path()),
        Some("/doctors/DR-001".to_string())
    );
}
