//! Bot roster repository trait definition.

use waggle_types::bot::Bot;
use waggle_types::error::RepositoryError;

/// Repository trait for the bot roster.
///
/// Implementations must preserve registration order in `list` -- weighted
/// selection iterates the roster in that order, and re-registering an
/// existing id must keep its original position.
///
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait BotRepository: Send + Sync {
    /// Insert a bot, or replace the existing bot with the same id in place.
    fn upsert(
        &self,
        bot: &Bot,
    ) -> impl std::future::Future<Output = Result<Bot, RepositoryError>> + Send;

    /// Get a bot by id.
    fn get(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<Option<Bot>, RepositoryError>> + Send;

    /// List all bots in registration order.
    fn list(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Bot>, RepositoryError>> + Send;

    /// Replace an existing bot. Fails with `NotFound` if the id is unknown.
    fn update(
        &self,
        bot: &Bot,
    ) -> impl std::future::Future<Output = Result<Bot, RepositoryError>> + Send;

    /// Remove a bot by id. Returns whether a bot was removed.
    fn remove(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;
}
