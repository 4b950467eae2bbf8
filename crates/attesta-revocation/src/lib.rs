//! Attesta Revocation — RevocationList2020 support: the bitstring codec,
//! list credential lifecycle, the status cross-check wired into the
//! verification engine, and publishing backends.

pub mod engine;
pub mod list;
pub mod publish;
pub mod status;

pub use engine::{
    check_revocation_status, create_revocation_credential, update_revocation_credential,
};
pub use list::RevocationList;
pub use publish::{HostedPublisher, RevocationPublisher};
pub use status::RevocationVerifier;
