use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::models::validation::{ValidationError, ValidationRules};
use crate::models::wire::{de_id, de_opt_id, null_default, ser_id, ser_opt_id};
use crate::utils::date::wire_date;

/// Opaque stage identifier assigned by the backend
pub type StageId = String;

/// Stage priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Priority {
    #[serde(rename = "HAUTE", alias = "haute", alias = "HIGH", alias = "high")]
    High,
    #[default]
    #[serde(rename = "MOYEN", alias = "moyen", alias = "MOYENNE", alias = "MEDIUM", alias = "medium")]
    Medium,
    #[serde(rename = "BAS", alias = "bas", alias = "BASSE", alias = "LOW", alias = "low")]
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    /// Parse user input. Accepts English and backend (French) names, any case.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "high" | "haute" | "h" => Some(Priority::High),
            "medium" | "moyen" | "moyenne" | "m" => Some(Priority::Medium),
            "low" | "bas" | "basse" | "l" => Some(Priority::Low),
            _ => None,
        }
    }
}

/// One ordered phase of a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    #[serde(deserialize_with = "de_id", serialize_with = "ser_id")]
    pub id: StageId,
    #[serde(rename = "ordre", alias = "ordre_execution", default, deserialize_with = "null_default")]
    pub order: u32,
    #[serde(rename = "titre", default, deserialize_with = "null_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_default")]
    pub description: String,
    #[serde(rename = "progressionPct", default, deserialize_with = "null_default")]
    pub progress_percent: u8,
    #[serde(rename = "priorite", default, deserialize_with = "null_default")]
    pub priority: Priority,
    #[serde(rename = "dateDebut", default, with = "wire_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(rename = "dateFin", default, with = "wire_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(rename = "statutId", default, deserialize_with = "de_opt_id", serialize_with = "ser_id")]
    pub status_id: String,
    #[serde(rename = "typeEtapeId", default, deserialize_with = "de_opt_id", serialize_with = "ser_id")]
    pub stage_type_id: String,
}

/// Form contents for a stage that does not exist yet
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct StageDraft {
    #[serde(rename = "titre")]
    pub title: String,
    pub description: String,
    #[serde(rename = "progressionPct")]
    pub progress_percent: u8,
    #[serde(rename = "ordre")]
    pub order: u32,
    #[serde(rename = "priorite")]
    pub priority: Priority,
    #[serde(rename = "dateDebut", with = "wire_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(rename = "dateFin", with = "wire_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(rename = "statutId", serialize_with = "ser_id")]
    pub status_id: String,
    #[serde(rename = "typeEtapeId", serialize_with = "ser_id")]
    pub stage_type_id: String,
}

impl StageDraft {
    /// Create an empty draft placed at the given position
    pub fn at_order(order: u32) -> Self {
        Self {
            order,
            ..Self::default()
        }
    }

    /// Check required fields and value ranges before anything is sent
    pub fn validate(&self, rules: &ValidationRules) -> Result<(), ValidationError> {
        require("title", &self.title)?;
        require("status", &self.status_id)?;
        require("stage type", &self.stage_type_id)?;
        check_progress(self.progress_percent)?;
        check_order(self.order)?;
        rules.check_dates(self.start_date, self.end_date)
    }
}

/// Partial update of a stage. Absent fields are left untouched by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct StagePatch {
    #[serde(rename = "titre", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "progressionPct", skip_serializing_if = "Option::is_none")]
    pub progress_percent: Option<u8>,
    #[serde(rename = "ordre", skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    #[serde(rename = "priorite", skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(rename = "dateDebut", with = "wire_date", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(rename = "dateFin", with = "wire_date", skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(rename = "statutId", serialize_with = "ser_opt_id", skip_serializing_if = "Option::is_none")]
    pub status_id: Option<String>,
    #[serde(rename = "typeEtapeId", serialize_with = "ser_opt_id", skip_serializing_if = "Option::is_none")]
    pub stage_type_id: Option<String>,
}

impl StagePatch {
    /// Patch carrying only a new order number (used by reordering)
    pub fn order(order: u32) -> Self {
        Self {
            order: Some(order),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Validate the patch against the stage it will be applied to.
    /// Required fields may be changed but not blanked.
    pub fn validate(&self, current: &Stage, rules: &ValidationRules) -> Result<(), ValidationError> {
        if let Some(title) = &self.title {
            require("title", title)?;
        }
        if let Some(status) = &self.status_id {
            require("status", status)?;
        }
        if let Some(stage_type) = &self.stage_type_id {
            require("stage type", stage_type)?;
        }
        if let Some(progress) = self.progress_percent {
            check_progress(progress)?;
        }
        if let Some(order) = self.order {
            check_order(order)?;
        }
        rules.check_dates(
            self.start_date.or(current.start_date),
            self.end_date.or(current.end_date),
        )
    }

    /// Apply the patch to a local copy of a stage
    pub fn apply_to(&self, stage: &mut Stage) {
        if let Some(title) = &self.title {
            stage.title = title.clone();
        }
        if let Some(description) = &self.description {
            stage.description = description.clone();
        }
        if let Some(progress) = self.progress_percent {
            stage.progress_percent = progress;
        }
        if let Some(order) = self.order {
            stage.order = order;
        }
        if let Some(priority) = self.priority {
            stage.priority = priority;
        }
        if self.start_date.is_some() {
            stage.start_date = self.start_date;
        }
        if self.end_date.is_some() {
            stage.end_date = self.end_date;
        }
        if let Some(status) = &self.status_id {
            stage.status_id = status.clone();
        }
        if let Some(stage_type) = &self.stage_type_id {
            stage.stage_type_id = stage_type.clone();
        }
    }
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(())
    }
}

fn check_progress(value: u8) -> Result<(), ValidationError> {
    if value > 100 {
        Err(ValidationError::ProgressOutOfRange(value))
    } else {
        Ok(())
    }
}

fn check_order(value: u32) -> Result<(), ValidationError> {
    if value == 0 {
        Err(ValidationError::InvalidOrder(value))
    } else {
        Ok(())
    }
}
