use serde::Deserialize;

use crate::core::item::{SqlValue, TableRow};

use super::fields;

/// A state change of a piece of equipment.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EquipmentStatus {
    #[serde(deserialize_with = "fields::text")]
    pub eqp_id: String,
    #[serde(deserialize_with = "fields::text")]
    pub eqp_type: String,
    #[serde(deserialize_with = "fields::text")]
    pub status: String,
    #[serde(deserialize_with = "fields::optional_text")]
    pub status_ts: Option<String>,
    #[serde(deserialize_with = "fields::text")]
    pub previous_status: String,
    #[serde(deserialize_with = "fields::decimal")]
    pub duration_min: f64,
    #[serde(deserialize_with = "fields::text")]
    pub reason_code: String,
    #[serde(deserialize_with = "fields::text")]
    pub current_lot: String,
    #[serde(deserialize_with = "fields::text")]
    pub operator: String,
    #[serde(deserialize_with = "fields::text")]
    pub notes: String,
}

impl TableRow for EquipmentStatus {
    const TABLE: &'static str = "equipment_status";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "eqp_id",
        "eqp_type",
        "status",
        "status_ts",
        "previous_status",
        "duration_min",
        "reason_code",
        "current_lot",
        "operator",
        "notes",
    ];
    const LABEL: &'static str = "Equipment Status";

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Text(self.eqp_id.clone()),
            SqlValue::Text(self.eqp_type.clone()),
            SqlValue::Text(self.status.clone()),
            SqlValue::OptionalText(self.status_ts.clone()),
            SqlValue::Text(self.previous_status.clone()),
            SqlValue::Decimal(self.duration_min),
            SqlValue::Text(self.reason_code.clone()),
            SqlValue::Text(self.current_lot.clone()),
            SqlValue::Text(self.operator.clone()),
            SqlValue::Text(self.notes.clone()),
        ]
    }
}
