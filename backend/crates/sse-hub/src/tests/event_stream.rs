use crate::{HubError, ensure_streaming_transport, frame_event};

use axum::http::Version;

#[test]
fn given_payload_when_framed_then_data_line_and_blank_line() {
    let framed = frame_event(b"Test message");

    assert_eq!(&framed[..], b"data: Test message\n\n");
}

#[test]
fn given_empty_payload_when_framed_then_empty_data_event() {
    let framed = frame_event(b"");

    assert_eq!(&framed[..], b"data: \n\n");
}

#[test]
fn given_http11_or_http2_when_checked_then_streaming_supported() {
    assert!(ensure_streaming_transport(Version::HTTP_11).is_ok());
    assert!(ensure_streaming_transport(Version::HTTP_2).is_ok());
}

#[test]
fn given_http10_when_checked_then_transport_unsupported() {
    let result = ensure_streaming_transport(Version::HTTP_10);

    assert!(matches!(
        result.unwrap_err(),
        HubError::TransportUnsupported { .. }
    ));
}
