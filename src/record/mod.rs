//! Row types, one per destination table.
//!
//! Each type deserializes from a raw JSON record with per-column defaults and
//! implements [`TableRow`](crate::core::item::TableRow) to describe its table.

pub mod fields;

mod assembly_lot;
mod assembly_split_lot;
mod equipment_event;
mod equipment_status;
mod final_test_lot;
mod material;

pub use assembly_lot::AssemblyLot;
pub use assembly_split_lot::AssemblySplitLot;
pub use equipment_event::EquipmentEvent;
pub use equipment_status::EquipmentStatus;
pub use final_test_lot::FinalTestLot;
pub use material::Material;
