pub mod error;
pub mod history;
pub mod requisition;
pub mod serialization;
pub mod state;
pub mod trick;
pub mod year;
