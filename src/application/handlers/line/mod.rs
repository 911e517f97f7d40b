//! Messaging bot handlers.

mod link_account;
mod read_work;

pub use link_account::{LinkAccountCommand, LinkAccountHandler, LinkedAccount};
pub use read_work::{ReadWorkCommand, ReadWorkError, ReadWorkHandler};
