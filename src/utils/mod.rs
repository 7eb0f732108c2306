pub mod errors;
pub mod page;
pub mod table;
pub mod timestamp;

pub use errors::extract_clean_error;
pub use page::Page;
pub use table::Table;
