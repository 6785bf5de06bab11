pub mod actor;
pub mod profile;

pub use actor::{Actor, ActorStatus};
pub use profile::ProfileView;
