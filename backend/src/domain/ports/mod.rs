//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod content;
mod credential_service;
mod mailer;
mod review_store;
mod social_graph;
mod user_store;

#[cfg(test)]
pub use content::{MockContentCommand, MockContentQuery};
pub use content::{ContentCommand, ContentQuery, NewReview};
#[cfg(test)]
pub use credential_service::MockCredentialService;
pub use credential_service::{
    AccountSummary, AuthenticatedIdentity, CredentialService, LoginOutcome,
};
#[cfg(test)]
pub use mailer::MockMailer;
pub use mailer::{CodePurpose, Mailer, MailerError};
#[cfg(test)]
pub use review_store::MockReviewStore;
pub use review_store::{ReviewStore, ReviewStoreError};
#[cfg(test)]
pub use social_graph::{MockSocialGraphCommand, MockSocialGraphQuery};
pub use social_graph::{OwnProfile, ProfileView, SocialGraphCommand, SocialGraphQuery, UserHit};
#[cfg(test)]
pub use user_store::MockUserStore;
pub use user_store::{UserStore, UserStoreError};
