//! TLS policy for the Nexus Dashboard transport.
//!
//! Connections offer TLS 1.2 and 1.3 with AES-GCM suites only. Certificate
//! verification uses the Mozilla root set unless the configuration asks for
//! an insecure connection.

use std::sync::Arc;
use std::time::SystemTime;

use rustls::client::{ServerCertVerified, ServerCertVerifier};
use rustls::cipher_suite::{
    TLS13_AES_128_GCM_SHA256, TLS13_AES_256_GCM_SHA384, TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256,
    TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384,
};
use rustls::{
    Certificate, ClientConfig, OwnedTrustAnchor, RootCertStore, ServerName, SupportedCipherSuite,
};

use crate::error::ConfigError;

/// Cipher suites offered to the server.
fn cipher_suites() -> [SupportedCipherSuite; 4] {
    [
        TLS13_AES_128_GCM_SHA256,
        TLS13_AES_256_GCM_SHA384,
        TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256,
        TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384,
    ]
}

/// Builds the rustls client configuration.
///
/// With `insecure`, any server certificate is accepted.
///
/// # Errors
///
/// Returns [`ConfigError::Transport`] if rustls rejects the suite and
/// version combination.
pub fn client_config(insecure: bool) -> Result<ClientConfig, ConfigError> {
    let mut roots = RootCertStore::empty();
    roots.add_trust_anchors(webpki_roots::TLS_SERVER_ROOTS.iter().map(|anchor| {
        OwnedTrustAnchor::from_subject_spki_name_constraints(
            anchor.subject,
            anchor.spki,
            anchor.name_constraints,
        )
    }));

    let mut config = ClientConfig::builder()
        .with_cipher_suites(&cipher_suites())
        .with_safe_default_kx_groups()
        .with_protocol_versions(&[&rustls::version::TLS12, &rustls::version::TLS13])
        .map_err(|e| ConfigError::Transport {
            reason: e.to_string(),
        })?
        .with_root_certificates(roots)
        .with_no_client_auth();

    if insecure {
        tracing::debug!("TLS certificate verification is disabled");
        config
            .dangerous()
            .set_certificate_verifier(Arc::new(NoVerifier));
    }

    Ok(config)
}

/// Accepts every server certificate.
struct NoVerifier;

impl ServerCertVerifier for NoVerifier {
    fn verify_server_cert(
        &self,
        _end_entity: &Certificate,
        _intermediates: &[Certificate],
        _server_name: &ServerName,
        _scts: &mut dyn Iterator<Item = &[u8]>,
        _ocsp_response: &[u8],
        _now: SystemTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_builds_for_both_modes() {
        assert!(client_config(false).is_ok());
        assert!(client_config(true).is_ok());
    }

    #[test]
    fn test_allow_list_is_gcm_only() {
        for suite in cipher_suites() {
            let name = format!("{:?}", suite.suite());
            assert!(name.contains("GCM"), "unexpected suite {name}");
            assert!(!name.contains("ECDSA"), "unexpected suite {name}");
        }
    }
}
