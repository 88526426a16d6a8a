pub mod field;
pub mod status_table;

pub use field::{FIELD_COUNT, FIELDS, Field, field};
pub use status_table::{
    BACKEND, FRONTEND, ParseReport, Proxy, ServerStats, StatusTable, is_aggregate,
};
