use passkey_attestation::origin::{
    Origin, OriginError, OriginMatching, OriginValidator, ServerOrigins,
};

use crate::common::RP_ORIGIN;

fn origin(s: &str) -> Origin {
    s.parse().unwrap()
}

#[test]
fn test_strict_validator_rejects_different_site() {
    let configured: ServerOrigins = [origin("https://example.org:443")].into_iter().collect();

    let result = OriginValidator::strict().validate(Some(&origin("https://example.com:443")), &configured);

    match result {
        Err(OriginError::BadOrigin {
            asserted,
            configured,
        }) => {
            assert_eq!(asserted, Some(origin("https://example.com")));
            assert_eq!(configured, vec![origin("https://example.org")]);
        }
        other => panic!("expected BadOrigin, got {other:?}"),
    }
}

#[test]
fn test_relaxed_validators() {
    let configured: ServerOrigins = [origin("https://example.org:443")].into_iter().collect();
    let asserted = origin("https://example.com:443");

    // Accepting: a caller relation that treats both registrable domains as one
    let equivalent = |a: &Origin, c: &Origin| {
        let canonical = |o: &Origin| o.host().replace("example.org", "example.com");
        a.scheme() == c.scheme() && canonical(a) == canonical(c)
    };
    assert_eq!(
        OriginValidator::with_matcher(equivalent).validate(Some(&asserted), &configured),
        Ok(())
    );

    // Rejecting: the built-in relaxed relation only allows subdomains
    assert!(
        OriginValidator::with_matcher(OriginMatching::Relaxed)
            .validate(Some(&asserted), &configured)
            .is_err()
    );
}

#[test]
fn test_absent_origin_is_a_non_match() {
    let configured: ServerOrigins = [origin(RP_ORIGIN)].into_iter().collect();

    assert!(matches!(
        OriginValidator::relaxed().validate(None, &configured),
        Err(OriginError::BadOrigin { asserted: None, .. })
    ));
}

#[test]
fn test_related_origins_document() {
    let configured: ServerOrigins = [
        origin(RP_ORIGIN),
        origin("https://shop.example.com"),
        origin("https://example.com:443"),
    ]
    .into_iter()
    .collect();

    let json = configured.related_origins_json("example.com").unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed["rp_id"], "example.com");
    assert_eq!(
        parsed["origins"],
        serde_json::json!(["https://example.com", "https://shop.example.com"])
    );
}
