pub mod entry;
pub mod page;
pub mod reference;
pub mod sort;
