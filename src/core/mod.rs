/// Identifier generation for inserted rows.
pub mod id;

/// Row description shared by every table: raw records, bind values and the [`item::TableRow`] trait.
pub mod item;

/// Transactional, batched loading of one file into one table.
pub mod loader;
