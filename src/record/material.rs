use serde::Deserialize;

use crate::core::item::{LotList, SqlValue, TableRow};

use super::fields;

/// A received material batch and the lots that consumed it.
///
/// `material_id` is the table's business key: rows whose key already exists
/// are skipped by the insert rather than failing the load.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Material {
    #[serde(deserialize_with = "fields::text")]
    pub material_id: String,
    #[serde(deserialize_with = "fields::text")]
    pub vendor_id: String,
    #[serde(deserialize_with = "fields::text")]
    pub vendor_name: String,
    #[serde(deserialize_with = "fields::text")]
    pub batch_no: String,
    #[serde(deserialize_with = "fields::text")]
    pub receipt_date: String,
    #[serde(deserialize_with = "fields::lot_list")]
    pub consumed_in_lots: LotList,
    #[serde(deserialize_with = "fields::text")]
    pub material_type: String,
    #[serde(deserialize_with = "fields::text")]
    pub quality_status: String,
}

impl TableRow for Material {
    const TABLE: &'static str = "materials";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "material_id",
        "vendor_id",
        "vendor_name",
        "batch_no",
        "receipt_date",
        "consumed_in_lots",
        "material_type",
        "quality_status",
    ];
    const CONFLICT_KEY: Option<&'static str> = Some("material_id");
    const LABEL: &'static str = "Materials";

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Text(self.material_id.clone()),
            SqlValue::Text(self.vendor_id.clone()),
            SqlValue::Text(self.vendor_name.clone()),
            SqlValue::Text(self.batch_no.clone()),
            SqlValue::Text(self.receipt_date.clone()),
            SqlValue::List(self.consumed_in_lots.clone()),
            SqlValue::Text(self.material_type.clone()),
            SqlValue::Text(self.quality_status.clone()),
        ]
    }
}
