pub mod capture;
pub mod decoder;
pub mod inventory;
pub mod report;
pub mod table;
