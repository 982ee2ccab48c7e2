//! PostgreSQL repository implementations.

mod history_repository;
mod order_repository;
mod user_repository;

pub use history_repository::PgHistoryRepository;
pub use order_repository::PgOrderRepository;
pub use user_repository::PgUserRepository;
