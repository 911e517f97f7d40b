//! ReadWorkHandler - The bot's detail view, keyed by messaging id.

use std::sync::Arc;

use thiserror::Error;

use crate::application::handlers::books::{ViewWorkCommand, ViewWorkHandler, ViewWorkResult};
use crate::domain::entitlement::EntitlementError;
use crate::domain::foundation::{DomainError, WorkId};
use crate::domain::identity::{Identity, UserContext, UserContextResolver};

#[derive(Debug, Clone)]
pub struct ReadWorkCommand {
    pub messaging_id: String,
    pub work_id: WorkId,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadWorkError {
    /// No account carries this messaging id.
    #[error("messaging account is not linked")]
    NotLinked,

    #[error(transparent)]
    Denied(#[from] EntitlementError),
}

impl From<DomainError> for ReadWorkError {
    fn from(err: DomainError) -> Self {
        ReadWorkError::Denied(err.into())
    }
}

pub struct ReadWorkHandler {
    resolver: Arc<UserContextResolver>,
    view_work: Arc<ViewWorkHandler>,
}

impl ReadWorkHandler {
    pub fn new(resolver: Arc<UserContextResolver>, view_work: Arc<ViewWorkHandler>) -> Self {
        Self { resolver, view_work }
    }

    pub async fn handle(&self, cmd: ReadWorkCommand) -> Result<ViewWorkResult, ReadWorkError> {
        let context = self
            .resolver
            .resolve(&Identity::MessagingId(cmd.messaging_id))
            .await?;
        if matches!(context, UserContext::Guest) {
            return Err(ReadWorkError::NotLinked);
        }

        Ok(self
            .view_work
            .handle(ViewWorkCommand {
                context,
                work_id: cmd.work_id,
            })
            .await?)
    }
}
