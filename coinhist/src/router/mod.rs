pub mod exchanges;
pub mod history;
