/// This module provides the JSON record source.
pub mod json;

/// This module provides database connection providers and the multi-row INSERT they execute.
pub mod rdbc;
