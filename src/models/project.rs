use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;

/// Lifecycle status of a project. The set is closed: anything else in the
/// input data is rejected at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProjectStatus {
    ToStart,
    InProgress,
    Completed,
    Canceled,
}

impl ProjectStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ProjectStatus::ToStart => "To start",
            ProjectStatus::InProgress => "In progress",
            ProjectStatus::Completed => "Completed",
            ProjectStatus::Canceled => "Canceled",
        }
    }
}

/// Milestone dates, each independently optional. Wire keys keep the
/// original data model's names.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct StageDates {
    #[serde(default, rename = "orcamento")]
    pub quote: Option<NaiveDate>,
    #[serde(default, rename = "projetoTecnico")]
    pub technical_design: Option<NaiveDate>,
    #[serde(default, rename = "instalacao")]
    pub installation: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub status: ProjectStatus,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub stages: StageDates,
    #[serde(default)]
    pub estimated_delivery: Option<NaiveDate>,
    #[serde(default)]
    pub value: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_record_with_wire_names() {
        let raw = r#"{
            "id": "p-1",
            "name": "Casa Alphaville",
            "status": "inProgress",
            "createdAt": "2026-07-01T09:30:00",
            "stages": {
                "orcamento": "2026-07-01",
                "projetoTecnico": "2026-07-10"
            },
            "estimatedDelivery": "2026-08-15",
            "value": 42500.0
        }"#;
        let project: Project = serde_json::from_str(raw).unwrap();
        assert_eq!(project.status, ProjectStatus::InProgress);
        assert_eq!(project.stages.quote, NaiveDate::from_ymd_opt(2026, 7, 1));
        assert_eq!(
            project.stages.technical_design,
            NaiveDate::from_ymd_opt(2026, 7, 10)
        );
        assert_eq!(project.stages.installation, None);
        assert_eq!(
            project.estimated_delivery,
            NaiveDate::from_ymd_opt(2026, 8, 15)
        );
        assert_eq!(project.value, Some(42500.0));
    }

    #[test]
    fn optional_fields_default_when_absent() {
        let raw = r#"{
            "id": "p-2",
            "name": "Loja Centro",
            "status": "toStart",
            "createdAt": "2026-07-02T10:00:00"
        }"#;
        let project: Project = serde_json::from_str(raw).unwrap();
        assert_eq!(project.status, ProjectStatus::ToStart);
        assert!(project.stages.quote.is_none());
        assert!(project.estimated_delivery.is_none());
        assert!(project.value.is_none());
    }

    #[test]
    fn unknown_status_is_rejected() {
        let raw = r#"{
            "id": "p-3",
            "name": "Bad",
            "status": "onHold",
            "createdAt": "2026-07-02T10:00:00"
        }"#;
        assert!(serde_json::from_str::<Project>(raw).is_err());
    }
}
