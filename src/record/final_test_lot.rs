use serde::Deserialize;

use crate::core::item::{SqlValue, TableRow};

use super::fields;

/// A lot measured at final test, with its yield and reject breakdown.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FinalTestLot {
    #[serde(deserialize_with = "fields::text")]
    pub ft_lot_id: String,
    #[serde(deserialize_with = "fields::text")]
    pub assy_mother_lot: String,
    #[serde(deserialize_with = "fields::text")]
    pub device: String,
    #[serde(deserialize_with = "fields::text")]
    pub vendor_lot: String,
    #[serde(deserialize_with = "fields::text")]
    pub test_eqp_id: String,
    #[serde(deserialize_with = "fields::integer")]
    pub in_qty: i64,
    #[serde(deserialize_with = "fields::integer")]
    pub out_qty: i64,
    #[serde(rename = "yield", deserialize_with = "fields::decimal")]
    pub yield_pct: f64,
    #[serde(deserialize_with = "fields::decimal")]
    pub fpy: f64,
    #[serde(deserialize_with = "fields::text")]
    pub bin: String,
    #[serde(deserialize_with = "fields::integer")]
    pub open_rejects: i64,
    #[serde(deserialize_with = "fields::integer")]
    pub short_rejects: i64,
    #[serde(deserialize_with = "fields::integer")]
    pub func_rejects: i64,
    #[serde(deserialize_with = "fields::text")]
    pub status: String,
    #[serde(deserialize_with = "fields::text")]
    pub operator: String,
    #[serde(deserialize_with = "fields::text")]
    pub start_time: String,
    #[serde(deserialize_with = "fields::text")]
    pub end_time: String,
    #[serde(deserialize_with = "fields::text")]
    pub customer: String,
    #[serde(deserialize_with = "fields::text")]
    pub plant: String,
}

impl TableRow for FinalTestLot {
    const TABLE: &'static str = "final_test_lots";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "ft_lot_id",
        "assy_mother_lot",
        "device",
        "vendor_lot",
        "test_eqp_id",
        "in_qty",
        "out_qty",
        "yield",
        "fpy",
        "bin",
        "open_rejects",
        "short_rejects",
        "func_rejects",
        "status",
        "operator",
        "start_time",
        "end_time",
        "customer",
        "plant",
    ];
    const LABEL: &'static str = "Final Test Lots";

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Text(self.ft_lot_id.clone()),
            SqlValue::Text(self.assy_mother_lot.clone()),
            SqlValue::Text(self.device.clone()),
            SqlValue::Text(self.vendor_lot.clone()),
            SqlValue::Text(self.test_eqp_id.clone()),
            SqlValue::Integer(self.in_qty),
            SqlValue::Integer(self.out_qty),
            SqlValue::Decimal(self.yield_pct),
            SqlValue::Decimal(self.fpy),
            SqlValue::Text(self.bin.clone()),
            SqlValue::Integer(self.open_rejects),
            SqlValue::Integer(self.short_rejects),
            SqlValue::Integer(self.func_rejects),
            SqlValue::Text(self.status.clone()),
            SqlValue::Text(self.operator.clone()),
            SqlValue::Text(self.start_time.clone()),
            SqlValue::Text(self.end_time.clone()),
            SqlValue::Text(self.customer.clone()),
            SqlValue::Text(self.plant.clone()),
        ]
    }
}
