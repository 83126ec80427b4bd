pub mod books;
pub mod categories;
