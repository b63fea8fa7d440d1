mod field;
mod model;
mod schema;

pub use field::{Field, FieldList};
pub use model::{Hierarchy, Model};
pub use schema::{NodeError, Schema};
