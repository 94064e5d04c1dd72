use crate::locale::Locale;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 应用内的页面分区
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Section {
    Dashboard,
    Patients,
    ActiveWorkflow,
    PendingActions,
    DelayedActions,
    Doctors,
    Logout,
}

impl Section {
    /// 托盘菜单与导航栏的展示顺序
    pub const ALL: [Section; 7] = [
        Section::Dashboard,
        Section::Patients,
        Section::ActiveWorkflow,
        Section::PendingActions,
        Section::DelayedActions,
        Section::Doctors,
        Section::Logout,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Section::Dashboard => "/",
            Section::Patients => "/patients",
            Section::ActiveWorkflow => "/active-workflow",
            Section::PendingActions => "/pending-actions",
            Section::DelayedActions => "/delayed-actions",
            Section::Doctors => "/doctors",
            Section::Logout => "/logout",
        }
    }

    /// 稳定的标识，用作托盘菜单项 id
    pub fn key(self) -> &'static str {
        match self {
            Section::Dashboard => "dashboard",
            Section::Patients => "patients",
            Section::ActiveWorkflow => "active-workflow",
            Section::PendingActions => "pending-actions",
            Section::DelayedActions => "delayed-actions",
            Section::Doctors => "doctors",
            Section::Logout => "logout",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.key() == key)
    }

    pub fn label(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Section::Dashboard, Locale::En) => "Dashboard",
            (Section::Dashboard, Locale::Es) => "Panel principal",
            (Section::Dashboard, Locale::Fr) => "Tableau de bord",
            (Section::Patients, Locale::En) => "Patients",
            (Section::Patients, Locale::Es) => "Pacientes",
            (Section::Patients, Locale::Fr) => "Patients",
            (Section::ActiveWorkflow, Locale::En) => "Active Workflow",
            (Section::ActiveWorkflow, Locale::Es) => "Flujo activo",
            (Section::ActiveWorkflow, Locale::Fr) => "Flux actif",
            (Section::PendingActions, Locale::En) => "Pending Actions",
            (Section::PendingActions, Locale::Es) => "Acciones pendientes",
            (Section::PendingActions, Locale::Fr) => "Actions en attente",
            (Section::DelayedActions, Locale::En) => "Delayed Actions",
            (Section::DelayedActions, Locale::Es) => "Acciones retrasadas",
            (Section::DelayedActions, Locale::Fr) => "Actions en retard",
            (Section::Doctors, Locale::En) => "Doctors",
            (Section::Doctors, Locale::Es) => "Médicos",
            (Section::Doctors, Locale::Fr) => "Médecins",
            (Section::Logout, Locale::En) => "Log out",
            (Section::Logout, Locale::Es) => "Cerrar sesión",
            (Section::Logout, Locale::Fr) => "Déconnexion",
        }
    }
}

/// 导航目标
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum Route {
    Section(Section),
    Patient(String),
    Doctor(String),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Section(section) => section.path().to_string(),
            Route::Patient(id) => format!("/patients/{id}"),
            Route::Doctor(id) => format!("/doctors/{id}"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
