use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// 内置演示数据
const FIXTURE_JSON: &str = include_str!("../data/fixture.json");

/// 时间戳格式，如 "2026-02-11 09:30"
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// 流程状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkflowStatus {
    Completed,
    InProgress,
    Pending,
    Delayed,
}

impl WorkflowStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "completed" => Some(Self::Completed),
            "in-progress" => Some(Self::InProgress),
            "pending" => Some(Self::Pending),
            "delayed" => Some(Self::Delayed),
            _ => None,
        }
    }
}

/// 就诊流程阶段（有序）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WorkflowStage {
    #[serde(rename = "OPD Visit")]
    OpdVisit,
    #[serde(rename = "Consultation")]
    Consultation,
    #[serde(rename = "Lab Ordered")]
    LabOrdered,
    #[serde(rename = "Sample Collected")]
    SampleCollected,
    #[serde(rename = "Result Uploaded")]
    ResultUploaded,
    #[serde(rename = "Prescription Dispensed")]
    PrescriptionDispensed,
}

impl WorkflowStage {
    pub const ALL: [WorkflowStage; 6] = [
        WorkflowStage::OpdVisit,
        WorkflowStage::Consultation,
        WorkflowStage::LabOrdered,
        WorkflowStage::SampleCollected,
        WorkflowStage::ResultUploaded,
        WorkflowStage::PrescriptionDispensed,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    pub stage: WorkflowStage,
    /// 尚未发生的阶段为空串
    #[serde(default)]
    pub timestamp: String,
    pub status: WorkflowStatus,
    #[serde(default)]
    pub department: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestReport {
    pub test_name: String,
    pub ordered_by: String,
    pub result_status: WorkflowStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_timestamp: Option<String>,
}

/// 病人
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    /// 主治医生显示名，如 "Dr. Sarah Chen"
    pub assigned_doctor: String,
    pub current_stage: WorkflowStage,
    pub status: WorkflowStatus,
    pub last_updated: String,
    #[serde(default)]
    pub timeline: Vec<TimelineEvent>,
    #[serde(default)]
    pub tests: Vec<TestReport>,
}

impl Patient {
    /// 当前阶段对应的时间线事件
    pub fn current_event(&self) -> Option<&TimelineEvent> {
        self.timeline.iter().find(|e| e.stage == self.current_stage)
    }

    /// 当前阶段处于等待状态的事件
    pub fn pending_event(&self) -> Option<&TimelineEvent> {
        self.timeline
            .iter()
            .find(|e| e.status == WorkflowStatus::Pending && e.stage == self.current_stage)
    }

    /// 第一个延误的事件
    pub fn delayed_event(&self) -> Option<&TimelineEvent> {
        self.timeline
            .iter()
            .find(|e| e.status == WorkflowStatus::Delayed)
    }

    pub fn completed_stage_count(&self) -> usize {
        self.timeline
            .iter()
            .filter(|e| e.status == WorkflowStatus::Completed)
            .count()
    }

    /// 完成进度（0-100），按全部流程阶段计算
    pub fn progress_percent(&self) -> f32 {
        self.completed_stage_count() as f32 / WorkflowStage::ALL.len() as f32 * 100.0
    }

    /// 是否在给定日期更新过
    pub fn updated_on(&self, day: NaiveDate) -> bool {
        match NaiveDateTime::parse_from_str(&self.last_updated, TIMESTAMP_FORMAT) {
            Ok(ts) => ts.date() == day,
            Err(e) => {
                log::warn!("病人 {} 的更新时间 {:?} 无法解析: {e}", self.id, self.last_updated);
                false
            }
        }
    }
}

/// 医生
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: String,
    pub name: String,
    pub specialization: String,
    pub department: String,
    pub active_patients: u32,
    pub completed_cases: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// 指令解析只关心 id 和显示名
pub trait NamedEntity {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
}

impl NamedEntity for Patient {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
}

impl NamedEntity for Doctor {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
}

/// 病人列表的状态筛选
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(WorkflowStatus),
}

impl StatusFilter {
    /// "all" 或空串表示不过滤，无法识别的值同样不过滤
    pub fn parse(s: &str) -> Self {
        match WorkflowStatus::parse(s) {
            Some(status) => StatusFilter::Only(status),
            None => StatusFilter::All,
        }
    }

    fn accepts(self, status: WorkflowStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(s) => s == status,
        }
    }
}

/// 首页统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_patients: usize,
    pub total_active: usize,
    pub completed_today: usize,
    pub delayed_actions: usize,
}

/// 医生详情：医生本身加上名下病人
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorDetail {
    pub doctor: Doctor,
    pub assigned_patients: Vec<Patient>,
}

/// 待处理/延误列表的一行：病人及其卡住的阶段
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionItem {
    pub patient: Patient,
    pub stage: WorkflowStage,
}

/// 进行中流程页的数据
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveWorkflowSummary {
    pub patients: Vec<Patient>,
    pub total_active: usize,
    pub in_progress: usize,
    pub completed_today: usize,
}

/// 病人/医生目录（只读）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Directory {
    patients: Vec<Patient>,
    doctors: Vec<Doctor>,
}

impl Directory {
    pub fn new(patients: Vec<Patient>, doctors: Vec<Doctor>) -> Self {
        Self { patients, doctors }
    }

    /// 从 JSON 加载
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("解析目录数据失败: {e}"))
    }

    /// 加载内置演示数据
    pub fn fixture() -> Result<Self, String> {
        let directory = Self::from_json(FIXTURE_JSON)?;
        log::info!(
            "已加载目录: {} 位病人, {} 位医生",
            directory.patients.len(),
            directory.doctors.len()
        );
        Ok(directory)
    }

    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }

    pub fn doctors(&self) -> &[Doctor] {
        &self.doctors
    }

    pub fn patient(&self, id: &str) -> Option<&Patient> {
        self.patients.iter().find(|p| p.id == id)
    }

    pub fn doctor(&self, id: &str) -> Option<&Doctor> {
        self.doctors.iter().find(|d| d.id == id)
    }

    pub fn patients_by_status(&self, status: WorkflowStatus) -> Vec<&Patient> {
        self.patients.iter().filter(|p| p.status == status).collect()
    }

    /// 按主治医生显示名精确匹配
    pub fn patients_by_doctor(&self, doctor_name: &str) -> Vec<&Patient> {
        self.patients
            .iter()
            .filter(|p| p.assigned_doctor == doctor_name)
            .collect()
    }

    /// 进行中或等待中的病人
    pub fn active_patients(&self) -> Vec<&Patient> {
        self.patients
            .iter()
            .filter(|p| matches!(p.status, WorkflowStatus::InProgress | WorkflowStatus::Pending))
            .collect()
    }

    pub fn pending_patients(&self) -> Vec<&Patient> {
        self.patients_by_status(WorkflowStatus::Pending)
    }

    pub fn delayed_patients(&self) -> Vec<&Patient> {
        self.patients_by_status(WorkflowStatus::Delayed)
    }

    pub fn in_progress_count(&self) -> usize {
        self.patients_by_status(WorkflowStatus::InProgress).len()
    }

    /// 当天完成的病人
    pub fn completed_on(&self, day: NaiveDate) -> Vec<&Patient> {
        self.patients
            .iter()
            .filter(|p| p.status == WorkflowStatus::Completed && p.updated_on(day))
            .collect()
    }

    /// 病人列表检索：姓名、编号、主治医生的子串匹配（不区分大小写），再按状态过滤
    pub fn search_patients(&self, query: &str, filter: StatusFilter) -> Vec<&Patient> {
        let needle = query.trim().to_lowercase();
        self.patients
            .iter()
            .filter(|p| {
                needle.is_empty()
                    || p.name.to_lowercase().contains(&needle)
                    || p.id.to_lowercase().contains(&needle)
                    || p.assigned_doctor.to_lowercase().contains(&needle)
            })
            .filter(|p| filter.accepts(p.status))
            .collect()
    }

    pub fn doctor_detail(&self, id: &str) -> Option<DoctorDetail> {
        let doctor = self.doctor(id)?;
        Some(DoctorDetail {
            doctor: doctor.clone(),
            assigned_patients: self
                .patients_by_doctor(&doctor.name)
                .into_iter()
                .cloned()
                .collect(),
        })
    }

    /// 等待中的病人，阶段取当前阶段上的等待事件
    pub fn pending_actions(&self) -> Vec<ActionItem> {
        self.pending_patients()
            .into_iter()
            .map(|p| ActionItem {
                stage: p.pending_event().map_or(p.current_stage, |e| e.stage),
                patient: p.clone(),
            })
            .collect()
    }

    /// 延误的病人，阶段取第一个延误事件
    pub fn delayed_actions(&self) -> Vec<ActionItem> {
        self.delayed_patients()
            .into_iter()
            .map(|p| ActionItem {
                stage: p.delayed_event().map_or(p.current_stage, |e| e.stage),
                patient: p.clone(),
            })
            .collect()
    }

    pub fn active_workflow(&self, today: NaiveDate) -> ActiveWorkflowSummary {
        let patients: Vec<Patient> = self.active_patients().into_iter().cloned().collect();
        ActiveWorkflowSummary {
            total_active: patients.len(),
            patients,
            in_progress: self.in_progress_count(),
            completed_today: self.completed_on(today).len(),
        }
    }

    pub fn dashboard_stats(&self, today: NaiveDate) -> DashboardStats {
        DashboardStats {
            total_patients: self.patients.len(),
            total_active: self.active_patients().len(),
            completed_today: self.completed_on(today).len(),
            delayed_actions: self.delayed_patients().len(),
        }
    }
}
