mod book_repo;
mod category_repo;

pub use book_repo::BookRepo;
pub use category_repo::CategoryRepo;
