//! Protocol Tests
//!
//! Tests for frame classification, command parsing (both grammars), reply
//! encoding, and client-side message splitting.

use puplink::protocol::{classify, split_message, ChunkEnvelope, Command, Frame, MoveAll, Reply};
use puplink::LinkError;

// =============================================================================
// Frame Classification Tests
// =============================================================================

#[test]
fn test_classify_chunk_envelope() {
    let frame = classify(br#"{"k":1,"t":3,"d":"abc"}"#).unwrap();
    match frame {
        Frame::Chunk(chunk) => {
            assert_eq!(chunk.index, 1);
            assert_eq!(chunk.total, 3);
            assert_eq!(chunk.data, "abc");
        }
        _ => panic!("Expected chunk frame"),
    }
}

#[test]
fn test_classify_complete_message() {
    let frame = classify(br#"{"p":1}"#).unwrap();
    match frame {
        Frame::Message(value) => assert_eq!(value["p"], 1),
        _ => panic!("Expected message frame"),
    }
}

#[test]
fn test_classify_rejects_non_json() {
    let err = classify(b"not json").unwrap_err();
    assert!(matches!(err, LinkError::Protocol(_)));
}

#[test]
fn test_classify_missing_field_is_message() {
    // No "d": a complete message, not an envelope
    assert!(matches!(
        classify(br#"{"k":1,"t":2}"#).unwrap(),
        Frame::Message(_)
    ));
}

#[test]
fn test_classify_mistyped_field_is_message() {
    // String index
    assert!(matches!(
        classify(br#"{"k":"1","t":2,"d":"x"}"#).unwrap(),
        Frame::Message(_)
    ));
    // Fractional index
    assert!(matches!(
        classify(br#"{"k":1.5,"t":2,"d":"x"}"#).unwrap(),
        Frame::Message(_)
    ));
    // Negative index
    assert!(matches!(
        classify(br#"{"k":-1,"t":2,"d":"x"}"#).unwrap(),
        Frame::Message(_)
    ));
    // Non-string payload
    assert!(matches!(
        classify(br#"{"k":1,"t":2,"d":7}"#).unwrap(),
        Frame::Message(_)
    ));
}

#[test]
fn test_classify_chunk_with_extra_fields() {
    assert!(matches!(
        classify(br#"{"k":1,"t":1,"d":"x","v":2}"#).unwrap(),
        Frame::Chunk(_)
    ));
}

// =============================================================================
// Positional Grammar Tests
// =============================================================================

#[test]
fn test_parse_move_defaults_delay() {
    let cmd = Command::parse(br#"{"s":[10,20,30,40,500]}"#).unwrap();
    assert_eq!(
        cmd,
        Command::MoveAll(MoveAll {
            fr: 10.0,
            fl: 20.0,
            br: 30.0,
            bl: 40.0,
            speed: 500,
            delay_ms: 0,
        })
    );
}

#[test]
fn test_parse_move_with_delay() {
    let cmd = Command::parse(br#"{"s":[270,90,90,270,1000,150]}"#).unwrap();
    assert_eq!(
        cmd,
        Command::MoveAll(MoveAll {
            fr: 270.0,
            fl: 90.0,
            br: 90.0,
            bl: 270.0,
            speed: 1000,
            delay_ms: 150,
        })
    );
}

#[test]
fn test_parse_move_ignores_extra_elements() {
    let cmd = Command::parse(br#"{"s":[1,2,3,4,5,6,7,8]}"#).unwrap();
    match cmd {
        Command::MoveAll(mv) => {
            assert_eq!(mv.speed, 5);
            assert_eq!(mv.delay_ms, 6);
        }
        _ => panic!("Expected MoveAll"),
    }
}

#[test]
fn test_parse_move_fractional_angles() {
    let cmd = Command::parse(br#"{"s":[10.5,20.25,30.0,40.75,500]}"#).unwrap();
    match cmd {
        Command::MoveAll(mv) => {
            assert_eq!(mv.fr, 10.5);
            assert_eq!(mv.bl, 40.75);
        }
        _ => panic!("Expected MoveAll"),
    }
}

#[test]
fn test_parse_short_move_is_unknown() {
    assert_eq!(
        Command::parse(br#"{"s":[1,2,3]}"#).unwrap(),
        Command::Unknown
    );
}

#[test]
fn test_parse_nonconforming_move_falls_through() {
    // "s" fails its shape test, so the ping key still matches
    assert_eq!(
        Command::parse(br#"{"s":[1,2,3],"p":1}"#).unwrap(),
        Command::Ping
    );
}

#[test]
fn test_parse_conforming_move_wins_over_ping() {
    let cmd = Command::parse(br#"{"s":[1,2,3,4,5],"p":1}"#).unwrap();
    assert!(matches!(cmd, Command::MoveAll(_)));
}

#[test]
fn test_parse_sequence() {
    let cmd =
        Command::parse(br#"{"m":[[100,80,260,280,500,50],[120,60,240,300,500,0]]}"#).unwrap();
    match cmd {
        Command::MoveSequence(moves) => {
            assert_eq!(moves.len(), 2);
            assert_eq!(moves[0].fr, 100.0);
            assert_eq!(moves[0].delay_ms, 50);
            assert_eq!(moves[1].fr, 120.0);
            assert_eq!(moves[1].delay_ms, 0);
        }
        _ => panic!("Expected MoveSequence"),
    }
}

#[test]
fn test_parse_sequence_skips_malformed_entries() {
    let cmd = Command::parse(br#"{"m":[[1,2,3,4,5],[9,9],"x",[6,7,8,9,10,50]]}"#).unwrap();
    match cmd {
        Command::MoveSequence(moves) => {
            assert_eq!(moves.len(), 2);
            assert_eq!(moves[0].fr, 1.0);
            assert_eq!(moves[1].delay_ms, 50);
        }
        _ => panic!("Expected MoveSequence"),
    }
}

#[test]
fn test_parse_empty_sequence() {
    assert_eq!(
        Command::parse(br#"{"m":[]}"#).unwrap(),
        Command::MoveSequence(vec![])
    );
}

#[test]
fn test_parse_non_array_sequence_falls_through() {
    assert_eq!(
        Command::parse(br#"{"m":5,"r":1}"#).unwrap(),
        Command::Stance
    );
}

#[test]
fn test_parse_ping_any_value() {
    assert_eq!(Command::parse(br#"{"p":1}"#).unwrap(), Command::Ping);
    assert_eq!(Command::parse(br#"{"p":"x"}"#).unwrap(), Command::Ping);
    assert_eq!(Command::parse(br#"{"p":null}"#).unwrap(), Command::Ping);
}

#[test]
fn test_parse_stance() {
    assert_eq!(Command::parse(br#"{"r":0}"#).unwrap(), Command::Stance);
}

#[test]
fn test_parse_unknown_key() {
    assert_eq!(Command::parse(br#"{"x":1}"#).unwrap(), Command::Unknown);
}

#[test]
fn test_parse_non_object_is_unknown() {
    assert_eq!(Command::parse(b"[1,2,3]").unwrap(), Command::Unknown);
    assert_eq!(Command::parse(b"42").unwrap(), Command::Unknown);
}

#[test]
fn test_parse_invalid_json_errors() {
    assert!(Command::parse(b"{{{").is_err());
}

// =============================================================================
// Keyed Grammar Tests
// =============================================================================

#[test]
fn test_parse_keyed_servos() {
    let cmd = Command::parse(
        br#"{"cmd":"servos","fr":90,"fl":85,"br":270,"bl":275,"speed":1000,"delay":100}"#,
    )
    .unwrap();
    assert_eq!(
        cmd,
        Command::MoveAll(MoveAll {
            fr: 90.0,
            fl: 85.0,
            br: 270.0,
            bl: 275.0,
            speed: 1000,
            delay_ms: 100,
        })
    );
}

#[test]
fn test_parse_keyed_servos_defaults_delay() {
    let cmd =
        Command::parse(br#"{"cmd":"servos","fr":1,"fl":2,"br":3,"bl":4,"speed":5}"#).unwrap();
    match cmd {
        Command::MoveAll(mv) => assert_eq!(mv.delay_ms, 0),
        _ => panic!("Expected MoveAll"),
    }
}

#[test]
fn test_parse_keyed_servo() {
    let cmd = Command::parse(br#"{"cmd":"servo","id":2,"angle":45.5,"speed":300}"#).unwrap();
    match cmd {
        Command::MoveSingle(mv) => {
            assert_eq!(mv.id, 2);
            assert_eq!(mv.angle, 45.5);
            assert_eq!(mv.speed, 300);
            assert_eq!(mv.delay_ms, 0);
        }
        _ => panic!("Expected MoveSingle"),
    }
}

#[test]
fn test_parse_keyed_unknown_verb() {
    assert_eq!(
        Command::parse(br#"{"cmd":"mcp","tool":"list"}"#).unwrap(),
        Command::Unknown
    );
}

#[test]
fn test_parse_keyed_missing_field_is_unknown() {
    // Once "cmd" is present the positional keys are never consulted
    assert_eq!(
        Command::parse(br#"{"cmd":"servos","fr":90,"p":1}"#).unwrap(),
        Command::Unknown
    );
}

#[test]
fn test_parse_keyed_bad_id_is_unknown() {
    assert_eq!(
        Command::parse(br#"{"cmd":"servo","id":-1,"angle":45,"speed":300}"#).unwrap(),
        Command::Unknown
    );
    assert_eq!(
        Command::parse(br#"{"cmd":"servo","id":300,"angle":45,"speed":300}"#).unwrap(),
        Command::Unknown
    );
}

// =============================================================================
// Reply Encoding Tests
// =============================================================================

#[test]
fn test_reply_encodings() {
    assert_eq!(Reply::Ack(3).to_json(), r#"{"ack":3}"#);
    assert_eq!(Reply::Ok.to_json(), r#"{"ok":1}"#);
    assert_eq!(Reply::Pong.to_json(), r#"{"p":1}"#);
    assert_eq!(Reply::ChunkSequence.to_json(), r#"{"err":"chunk_seq"}"#);
    assert_eq!(Reply::Overflow.to_json(), r#"{"err":"overflow"}"#);
}

#[test]
fn test_reply_position_whole_degrees() {
    let reply = Reply::Position {
        fr: 270.4,
        fl: 90.0,
        br: 89.6,
        bl: 270.0,
    };
    assert_eq!(reply.to_json(), r#"{"pos":[270,90,90,270]}"#);
}

#[test]
fn test_reply_for_error() {
    let seq = LinkError::Sequence {
        index: 3,
        total: 3,
        expected: 2,
        expected_total: 3,
    };
    assert_eq!(Reply::for_error(&seq), Some(Reply::ChunkSequence));

    let cap = LinkError::Capacity {
        required: 4096,
        capacity: 2048,
    };
    assert_eq!(Reply::for_error(&cap), Some(Reply::Overflow));

    assert_eq!(Reply::for_error(&LinkError::Protocol("x".into())), None);
    assert_eq!(Reply::for_error(&LinkError::Transport("x".into())), None);
}

// =============================================================================
// Message Splitting Tests
// =============================================================================

#[test]
fn test_split_message_round_trip() {
    let message: String = "0123456789".repeat(25); // 250 bytes
    let envelopes = split_message(&message, 100).unwrap();

    assert_eq!(envelopes.len(), 3);
    for (i, envelope) in envelopes.iter().enumerate() {
        assert_eq!(envelope.index, i as u32 + 1);
        assert_eq!(envelope.total, 3);
        assert!(envelope.data.len() <= 100);
    }

    let rebuilt: String = envelopes.iter().map(|e| e.data.as_str()).collect();
    assert_eq!(rebuilt, message);
}

#[test]
fn test_split_message_single_chunk() {
    let envelopes = split_message(r#"{"p":1}"#, 120).unwrap();
    assert_eq!(envelopes.len(), 1);
    assert_eq!(envelopes[0].index, 1);
    assert_eq!(envelopes[0].total, 1);
    assert_eq!(envelopes[0].data, r#"{"p":1}"#);
}

#[test]
fn test_split_message_keeps_utf8_whole() {
    let message = "αβγδεζηθικλμ"; // two bytes per character
    let envelopes = split_message(message, 5).unwrap();

    for envelope in &envelopes {
        assert!(envelope.data.len() <= 5);
        assert!(!envelope.data.is_empty());
    }
    let rebuilt: String = envelopes.iter().map(|e| e.data.as_str()).collect();
    assert_eq!(rebuilt, message);
}

#[test]
fn test_split_message_empty() {
    assert!(split_message("", 100).unwrap().is_empty());
}

#[test]
fn test_split_message_zero_size_errors() {
    assert!(split_message("hello", 0).is_err());
}

#[test]
fn test_split_message_size_below_char_errors() {
    // One byte cannot hold a two-byte character
    assert!(split_message("ααα", 1).is_err());
}

#[test]
fn test_envelope_serializes_compact() {
    let envelope = ChunkEnvelope {
        index: 2,
        total: 3,
        data: "abc".to_string(),
    };
    assert_eq!(
        serde_json::to_string(&envelope).unwrap(),
        r#"{"k":2,"t":3,"d":"abc"}"#
    );
}
