mod type_table;

pub use type_table::{TypeTable, TypeTableError};
