//! HTTP agent shared by the upload backends.
//!
//! Uses native-tls with the platform root store, which behaves the same on
//! every desktop target without bundling certificates.

use std::time::Duration;
use ureq::tls::{RootCerts, TlsConfig, TlsProvider};
use ureq::Agent;

/// Whole-request timeout for uploads.
pub const UPLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// User agent sent with every request; GitHub rejects requests without one.
pub const USER_AGENT: &str = concat!("inkpad/", env!("CARGO_PKG_VERSION"));

/// Create an agent configured with native-tls and the upload timeout.
pub fn agent() -> Agent {
    let tls_config = TlsConfig::builder()
        .provider(TlsProvider::NativeTls)
        .root_certs(RootCerts::PlatformVerifier)
        .build();

    Agent::config_builder()
        .tls_config(tls_config)
        .timeout_global(Some(UPLOAD_TIMEOUT))
        .build()
        .into()
}
