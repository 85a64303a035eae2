//! Codec Tests
//!
//! Tests for request encoding and the stream helpers.

use std::io::Cursor;

use skkserv::protocol::{
    encode_request, read_response, write_request, Request, RequestType, ResponseFramer,
    Terminator,
};
use skkserv::SkkError;

fn all_requests() -> Vec<Request> {
    vec![
        Request::End,
        Request::lookup("aiueo").unwrap(),
        Request::Version,
        Request::Host,
    ]
}

// =============================================================================
// Request Encoding Tests
// =============================================================================

#[test]
fn test_encode_end() {
    assert_eq!(encode_request(&Request::End), vec![0x30, 0x20, 0x0a]);
}

#[test]
fn test_encode_version() {
    assert_eq!(encode_request(&Request::Version), vec![0x32, 0x20, 0x0a]);
}

#[test]
fn test_encode_host() {
    assert_eq!(encode_request(&Request::Host), vec![0x33, 0x20, 0x0a]);
}

#[test]
fn test_encode_lookup() {
    let request = Request::lookup("aiueo").unwrap();
    assert_eq!(encode_request(&request), b"1aiueo \n".to_vec());
}

#[test]
fn test_encode_lookup_utf8_key() {
    let key = "あい".as_bytes().to_vec();
    let request = Request::lookup(key.clone()).unwrap();

    let mut expected = vec![0x31];
    expected.extend_from_slice(&key);
    expected.extend_from_slice(&[0x20, 0x0a]);
    assert_eq!(encode_request(&request), expected);
}

#[test]
fn test_encode_lookup_binary_key() {
    let key: Vec<u8> = vec![0x00, 0xa4, 0xa2, 0xff];
    let request = Request::lookup(key.clone()).unwrap();
    let encoded = encode_request(&request);

    assert_eq!(encoded[0], 0x31);
    assert_eq!(&encoded[1..encoded.len() - 2], key.as_slice());
}

#[test]
fn test_every_request_is_tagged_and_terminated() {
    for request in all_requests() {
        let encoded = encode_request(&request);
        assert!(
            [0x30, 0x31, 0x32, 0x33].contains(&encoded[0]),
            "bad tag for {:?}",
            request
        );
        assert_eq!(&encoded[encoded.len() - 2..], &[0x20, 0x0a]);
        assert_eq!(encoded[0], request.request_type() as u8);
    }
}

#[test]
fn test_request_type_tags() {
    assert_eq!(RequestType::End as u8, b'0');
    assert_eq!(RequestType::Lookup as u8, b'1');
    assert_eq!(RequestType::Version as u8, b'2');
    assert_eq!(RequestType::Host as u8, b'3');
}

#[test]
fn test_lookup_key_region_survives_framing() {
    // Splitting the encoded lookup at its line feed gives back tag + key + space
    let key = "かんじ".as_bytes().to_vec();
    let encoded = encode_request(&Request::lookup(key.clone()).unwrap());

    let mut framer = ResponseFramer::default();
    let frames = framer.feed(&encoded[1..]).unwrap();

    let mut expected = key;
    expected.push(0x20);
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].as_bytes(), expected.as_slice());
    assert_eq!(framer.pending(), 0);
}

// =============================================================================
// Key Validation Tests
// =============================================================================

#[test]
fn test_lookup_rejects_space() {
    let result = Request::lookup("a b");
    assert!(matches!(result, Err(SkkError::MalformedKey(_))));
}

#[test]
fn test_lookup_rejects_line_feed() {
    let result = Request::lookup("ab\n");
    assert!(matches!(result, Err(SkkError::MalformedKey(_))));
}

#[test]
fn test_lookup_rejects_empty_key() {
    let result = Request::lookup(Vec::new());
    assert!(matches!(result, Err(SkkError::MalformedKey(_))));
}

#[test]
fn test_malformed_key_is_recoverable() {
    let err = Request::lookup("a b").unwrap_err();
    assert!(err.is_recoverable());
}

// =============================================================================
// Terminator Tests
// =============================================================================

#[test]
fn test_reply_terminators() {
    assert_eq!(Request::End.reply_terminator(), None);
    assert_eq!(
        Request::lookup("a").unwrap().reply_terminator(),
        Some(Terminator::LineFeed)
    );
    assert_eq!(
        Request::Version.reply_terminator(),
        Some(Terminator::TrailingSpace)
    );
    assert_eq!(
        Request::Host.reply_terminator(),
        Some(Terminator::TrailingSpace)
    );
}

// =============================================================================
// Stream I/O Tests
// =============================================================================

#[test]
fn test_write_request() {
    let mut buffer = Vec::new();
    write_request(&mut buffer, &Request::lookup("aiueo").unwrap()).unwrap();
    assert_eq!(buffer, b"1aiueo \n");
}

#[test]
fn test_write_multiple_requests() {
    let mut buffer = Vec::new();
    for request in all_requests() {
        write_request(&mut buffer, &request).unwrap();
    }
    assert_eq!(buffer, b"0 \n1aiueo \n2 \n3 \n");
}

#[test]
fn test_read_response() {
    let mut cursor = Cursor::new(b"1/\xE6\x84\x9B/\n".to_vec());
    let mut framer = ResponseFramer::default();

    let response = read_response(&mut cursor, &mut framer, Terminator::LineFeed).unwrap();
    assert_eq!(response.as_bytes(), "1/愛/".as_bytes());
}

#[test]
fn test_read_response_keeps_following_bytes() {
    let mut cursor = Cursor::new(b"1/a/\n4b\n".to_vec());
    let mut framer = ResponseFramer::default();

    let first = read_response(&mut cursor, &mut framer, Terminator::LineFeed).unwrap();
    assert_eq!(first.as_bytes(), b"1/a/");
    assert_eq!(framer.leftover(), b"4b\n");

    let second = read_response(&mut cursor, &mut framer, Terminator::LineFeed).unwrap();
    assert_eq!(second.as_bytes(), b"4b");
}

#[test]
fn test_read_version_response() {
    let mut cursor = Cursor::new(b"dbskkd-cdb-3.00 ".to_vec());
    let mut framer = ResponseFramer::default();

    let response = read_response(&mut cursor, &mut framer, Terminator::TrailingSpace).unwrap();
    assert_eq!(response.as_bytes(), b"dbskkd-cdb-3.00");
}

#[test]
fn test_read_response_closed_stream() {
    let mut cursor = Cursor::new(Vec::new());
    let mut framer = ResponseFramer::default();

    let result = read_response(&mut cursor, &mut framer, Terminator::LineFeed);
    assert!(matches!(result, Err(SkkError::ConnectionClosed)));
}

#[test]
fn test_read_response_incomplete_frame() {
    let mut cursor = Cursor::new(b"1/partial".to_vec());
    let mut framer = ResponseFramer::default();

    let result = read_response(&mut cursor, &mut framer, Terminator::LineFeed);
    match result {
        Err(SkkError::IncompleteFrame { pending }) => assert_eq!(pending, 9),
        other => panic!("Expected IncompleteFrame, got {:?}", other),
    }
}
