use serde::Deserialize;

use crate::core::item::{SqlValue, TableRow};

use super::fields;

/// A child lot split off an assembly mother lot.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssemblySplitLot {
    #[serde(deserialize_with = "fields::text")]
    pub child_lot_id: String,
    #[serde(deserialize_with = "fields::text")]
    pub parent_lot_id: String,
    #[serde(rename = "eqpid", deserialize_with = "fields::text")]
    pub eqp_id: String,
    #[serde(deserialize_with = "fields::text")]
    pub operation_step: String,
    #[serde(deserialize_with = "fields::text")]
    pub material_id: String,
    #[serde(deserialize_with = "fields::integer")]
    pub in_qty: i64,
    #[serde(deserialize_with = "fields::integer")]
    pub out_qty: i64,
    #[serde(deserialize_with = "fields::text")]
    pub yield_status: String,
    #[serde(deserialize_with = "fields::text")]
    pub track_in_time: String,
    #[serde(deserialize_with = "fields::text")]
    pub track_out_time: String,
    #[serde(deserialize_with = "fields::text")]
    pub operator: String,
}

impl TableRow for AssemblySplitLot {
    const TABLE: &'static str = "assembly_split_lots";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "child_lot_id",
        "parent_lot_id",
        "eqp_id",
        "operation_step",
        "material_id",
        "in_qty",
        "out_qty",
        "yield_status",
        "track_in_time",
        "track_out_time",
        "operator",
    ];
    const LABEL: &'static str = "Assembly Split Lots";

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Text(self.child_lot_id.clone()),
            SqlValue::Text(self.parent_lot_id.clone()),
            SqlValue::Text(self.eqp_id.clone()),
            SqlValue::Text(self.operation_step.clone()),
            SqlValue::Text(self.material_id.clone()),
            SqlValue::Integer(self.in_qty),
            SqlValue::Integer(self.out_qty),
            SqlValue::Text(self.yield_status.clone()),
            SqlValue::Text(self.track_in_time.clone()),
            SqlValue::Text(self.track_out_time.clone()),
            SqlValue::Text(self.operator.clone()),
        ]
    }
}
