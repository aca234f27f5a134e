mod batch;
mod connection;
mod counter;
mod field_mapper;
mod iterator;
mod list;
mod paged;
mod predicate;
mod record;
mod row;
mod select;
mod sql_writer;
mod util;
mod value;
mod where_clause;
mod write;

pub use ::anyhow::Context;
pub use batch::*;
pub use connection::*;
pub use counter::*;
pub use field_mapper::*;
pub use iterator::*;
pub use list::*;
pub use paged::*;
pub use predicate::*;
pub use record::*;
pub use row::*;
pub use select::*;
pub use sql_writer::*;
pub use util::*;
pub use value::*;
pub use where_clause::*;
pub use write::*;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
