// Service exports
pub mod catalog;
pub mod icons;
pub mod invite;
pub mod notify;
pub mod profile;

pub use catalog::{CatalogError, CatalogSource, FileCatalog, StaticCatalog};
pub use icons::{IconName, IconSource, ParseIconError, StaticIcons};
pub use invite::{InviteError, InviteValidator, StaticInviteValidator};
pub use notify::{ChannelSink, NotificationSink, NullSink, TracingSink};
pub use profile::{InMemoryProfileStore, ProfileSubmitter, SubmitError};
