use std::sync::Arc;

use nexza_domain::clock::Clock;
use nexza_domain::email::AdminAllowList;

use crate::infra::identity::IdentityToolkitProvider;
use crate::infra::notifier::LogCodeNotifier;
use crate::infra::repo::{
    DocAdminMessageRepository, DocAnnouncementRepository, DocContactMessageRepository,
    DocUserRepository, DocUsernameRepository, DocVerificationCodeRepository,
};
use crate::infra::store::AnyDocumentStore;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub store: AnyDocumentStore,
    pub identity: IdentityToolkitProvider,
    pub notifier: LogCodeNotifier,
    pub clock: Arc<dyn Clock>,
    pub admins: Arc<AdminAllowList>,
    pub session_secret: String,
    pub cookie_domain: String,
}

impl AppState {
    pub fn verification_code_repo(&self) -> DocVerificationCodeRepository<AnyDocumentStore> {
        DocVerificationCodeRepository {
            store: self.store.clone(),
        }
    }

    pub fn user_repo(&self) -> DocUserRepository<AnyDocumentStore> {
        DocUserRepository {
            store: self.store.clone(),
        }
    }

    pub fn username_repo(&self) -> DocUsernameRepository<AnyDocumentStore> {
        DocUsernameRepository {
            store: self.store.clone(),
        }
    }

    pub fn contact_message_repo(&self) -> DocContactMessageRepository<AnyDocumentStore> {
        DocContactMessageRepository {
            store: self.store.clone(),
        }
    }

    pub fn admin_message_repo(&self) -> DocAdminMessageRepository<AnyDocumentStore> {
        DocAdminMessageRepository {
            store: self.store.clone(),
        }
    }

    pub fn announcement_repo(&self) -> DocAnnouncementRepository<AnyDocumentStore> {
        DocAnnouncementRepository {
            store: self.store.clone(),
        }
    }
}
