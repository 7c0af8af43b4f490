pub mod visit;

pub use visit::{RecordVisitRequest, VisitRow};
