use common::errors::{error_to_http, ErrorKind};
use common::hashid::{HashId, HashIdError, Id, IdHasher};
use configs::HashIdConfig;
use proptest::prelude::*;

proptest! {
    #[test]
    fn decode_inverts_encode(
        id in 1i64..=i64::MAX,
        salt in "[a-zA-Z0-9 ]{1,24}",
        min_length in 0usize..32,
    ) {
        let codec = HashId::new(&salt, min_length).unwrap();
        let hash = codec.encode(Id(id)).unwrap();
        prop_assert!(hash.len() >= min_length);
        prop_assert_eq!(codec.decode(&hash).unwrap(), Id(id));
    }

    #[test]
    fn decode_never_panics(input in "\\PC{0,20}") {
        let codec = HashId::new("test", 10).unwrap();
        let _ = codec.decode(&input);
    }
}

#[test]
fn end_to_end_scenario() {
    let codec = HashId::from_config(&HashIdConfig::new("test", 10)).unwrap();

    assert_eq!(codec.encode(Id(1)).unwrap(), "3wedgpzLRq");
    assert_eq!(codec.decode("3wedgpzLRq").unwrap(), Id(1));
    assert_eq!(serde_json::to_string(&codec.encoded(Id(0))).unwrap(), "null");
    assert_eq!(serde_json::to_string(&codec.encoded(Id(1))).unwrap(), "\"3wedgpzLRq\"");
}

#[test]
fn malformed_id_surfaces_as_bad_request() {
    let codec = HashId::new("test", 10).unwrap();
    let err: common::Error = match codec.decode("3wedg~zLRq") {
        Err(e @ HashIdError::Decoding(_)) => e.into(),
        other => panic!("expected decoding error, got {other:?}"),
    };
    assert!(err.is(ErrorKind::ValidationFailed));
    let http = error_to_http(Some(&err)).unwrap();
    assert_eq!(http.status, axum::http::StatusCode::BAD_REQUEST);
}
