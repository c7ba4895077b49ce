use serde::Deserialize;

use crate::core::item::{LotList, SqlValue, TableRow};

use super::fields;

/// An alarm raised by a piece of equipment, with the lots it affected.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EquipmentEvent {
    #[serde(deserialize_with = "fields::text")]
    pub event_id: String,
    #[serde(deserialize_with = "fields::text")]
    pub eqp_id: String,
    #[serde(deserialize_with = "fields::text")]
    pub alarm_code: String,
    #[serde(deserialize_with = "fields::text")]
    pub alarm_desc: String,
    #[serde(deserialize_with = "fields::optional_text")]
    pub alarm_ts: Option<String>,
    #[serde(deserialize_with = "fields::text")]
    pub severity: String,
    #[serde(deserialize_with = "fields::optional_text")]
    pub resolution_time: Option<String>,
    #[serde(deserialize_with = "fields::lot_list")]
    pub affected_lots: LotList,
    #[serde(deserialize_with = "fields::text")]
    pub operator: String,
    #[serde(deserialize_with = "fields::text")]
    pub notes: String,
}

impl TableRow for EquipmentEvent {
    const TABLE: &'static str = "equipment_events";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "event_id",
        "eqp_id",
        "alarm_code",
        "alarm_desc",
        "alarm_ts",
        "severity",
        "resolution_time",
        "affected_lots",
        "operator",
        "notes",
    ];
    const LABEL: &'static str = "Equipment Events";

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Text(self.event_id.clone()),
            SqlValue::Text(self.eqp_id.clone()),
            SqlValue::Text(self.alarm_code.clone()),
            SqlValue::Text(self.alarm_desc.clone()),
            SqlValue::OptionalText(self.alarm_ts.clone()),
            SqlValue::Text(self.severity.clone()),
            SqlValue::OptionalText(self.resolution_time.clone()),
            SqlValue::List(self.affected_lots.clone()),
            SqlValue::Text(self.operator.clone()),
            SqlValue::Text(self.notes.clone()),
        ]
    }
}
