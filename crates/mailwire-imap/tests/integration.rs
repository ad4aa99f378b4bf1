//! End-to-end decoding and serialization tests.

#![allow(clippy::unwrap_used)]

use bytes::{Bytes, BytesMut};
use proptest::prelude::*;

use mailwire_imap::{
    Command, CommandDecoder, Error, LiteralChunk, Parameter, Response, ResponseCode,
    ResponseDecoder, Status,
};

fn commands(input: &[u8]) -> Vec<Command> {
    CommandDecoder::new()
        .decode_all(&mut BytesMut::from(input))
        .unwrap()
}

fn responses(input: &[u8]) -> Vec<Response> {
    ResponseDecoder::new()
        .decode_all(&mut BytesMut::from(input))
        .unwrap()
}

/// Feeds `input` in pieces of `size` bytes and collects every decoded command.
fn commands_in_pieces(input: &[u8], size: usize) -> Vec<Command> {
    let mut decoder = CommandDecoder::new();
    let mut buf = BytesMut::new();
    let mut out = Vec::new();
    for piece in input.chunks(size) {
        buf.extend_from_slice(piece);
        out.extend(decoder.decode_all(&mut buf).unwrap());
    }
    out
}

fn responses_in_pieces(input: &[u8], size: usize) -> Vec<Response> {
    let mut decoder = ResponseDecoder::new();
    let mut buf = BytesMut::new();
    let mut out = Vec::new();
    for piece in input.chunks(size) {
        buf.extend_from_slice(piece);
        out.extend(decoder.decode_all(&mut buf).unwrap());
    }
    out
}

#[test]
fn test_simple_command() {
    assert_eq!(
        commands(b"ZZ01 BLURYBLOOP\r\n"),
        vec![Command::new("ZZ01", "BLURYBLOOP", Vec::new())]
    );
}

#[test]
fn test_command_split_across_calls() {
    let mut decoder = CommandDecoder::new();
    let mut buf = BytesMut::from(&b"ZZ01 BLURYBLOO"[..]);
    assert!(decoder.decode(&mut buf).unwrap().is_none());

    buf.extend_from_slice(b"P\r\n");
    assert_eq!(
        decoder.decode(&mut buf).unwrap(),
        Some(Command::new("ZZ01", "BLURYBLOOP", Vec::new()))
    );
}

#[test]
fn test_non_synchronizing_literal() {
    let decoded = commands(b"ZZ01 BLURYBLOOP {11+}12345678901\r\n");
    let [command] = decoded.as_slice() else {
        panic!("expected one command, got {decoded:?}");
    };
    let [Parameter::Chunk(chunk)] = command.parameters() else {
        panic!("expected one literal, got {:?}", command.parameters());
    };
    assert_eq!(&chunk.data[..], b"12345678901");
    assert!(!chunk.partial);
    assert!(chunk.non_synchronizing);
}

#[test]
fn test_literals_and_quoted_strings_mixed() {
    let decoded = commands(b"ZZ01 BLURYBLOOP {11+}12345678901 {2+}OK \"OK2\"\r\n");
    assert_eq!(
        decoded[0].parameters(),
        &[
            Parameter::literal_plus(&b"12345678901"[..]),
            Parameter::literal_plus(&b"OK"[..]),
            Parameter::quoted("OK2"),
        ]
    );
}

#[test]
fn test_list_with_nil() {
    let decoded = commands(b"ZZ01 BLURYBLOOP (ABC DCD NIL)\r\n");
    assert_eq!(
        decoded[0].parameters(),
        &[
            Parameter::OpenList,
            Parameter::atom("ABC"),
            Parameter::atom("DCD"),
            Parameter::Nil,
            Parameter::CloseList,
        ]
    );
}

#[test]
fn test_missing_space_after_tag() {
    let err = CommandDecoder::new()
        .decode(&mut BytesMut::from(&b"ZZ01BLURYBLOOP\r\n"[..]))
        .unwrap_err();
    assert!(matches!(err, Error::CorruptedFrame { .. }));
}

#[test]
fn test_atom_over_cap() {
    let mut decoder = CommandDecoder::new();
    let mut buf = BytesMut::from(&b"A1 "[..]);
    buf.extend_from_slice(&[b'X'; 128]);
    assert!(decoder.decode(&mut buf).unwrap().is_none());

    buf.extend_from_slice(b"X");
    let err = decoder.decode(&mut buf).unwrap_err();
    assert!(matches!(err, Error::FrameTooLong { limit: 128, .. }));
}

#[test]
fn test_tagged_ok_with_alert() {
    assert_eq!(
        responses(b"A001 OK [ALERT] LOGIN Completed\r\n"),
        vec![Response::Ok {
            tag: Some("A001".to_string()),
            code: Some(ResponseCode::new("ALERT")),
            text: "LOGIN Completed".into(),
        }]
    );
}

#[test]
fn test_recent() {
    assert_eq!(
        responses(b"* 5 RECENT\r\n"),
        vec![Response::MessageStatus {
            number: 5,
            verb: "RECENT".to_string(),
            parameters: Vec::new(),
        }]
    );
}

#[test]
fn test_namespace() {
    let decoded = responses(b"* NAMESPACE ((\"\" \"/\")) NIL NIL\r\n");
    assert_eq!(
        decoded,
        vec![Response::Server {
            verb: "NAMESPACE".to_string(),
            parameters: vec![
                Parameter::OpenList,
                Parameter::OpenList,
                Parameter::quoted(""),
                Parameter::quoted("/"),
                Parameter::CloseList,
                Parameter::CloseList,
                Parameter::Nil,
                Parameter::Nil,
            ],
        }]
    );
    assert_eq!(
        decoded[0].to_bytes(),
        b"* NAMESPACE ((\"\" \"/\")) NIL NIL\r\n"
    );
}

#[test]
fn test_select_session() {
    let input = b"* FLAGS (\\Answered \\Flagged \\Deleted \\Seen \\Draft)\r\n\
* 172 EXISTS\r\n\
* 1 RECENT\r\n\
* OK [UNSEEN 12] Message 12 is first unseen\r\n\
* OK [UIDVALIDITY 3857529045] UIDs valid\r\n\
* OK [UIDNEXT 4392] Predicted next UID\r\n\
* OK [PERMANENTFLAGS (\\Deleted \\Seen \\*)] Limited\r\n\
A142 OK [READ-WRITE] SELECT completed\r\n";

    let decoded = responses(input);
    assert_eq!(decoded.len(), 8);
    assert_eq!(decoded[0].parameters().len(), 7);
    assert!(matches!(decoded[1], Response::MessageStatus { number: 172, .. }));
    assert_eq!(
        decoded[4].code(),
        Some(&ResponseCode::with_parameters(
            "UIDVALIDITY",
            vec![Parameter::Number(3_857_529_045)]
        ))
    );
    assert_eq!(decoded[6].code().map(|c| c.parameters.len()), Some(5));
    assert_eq!(decoded[7].tag(), Some("A142"));
    assert_eq!(decoded[7].status(), Some(Status::Ok));

    let mut reencoded = Vec::new();
    for response in &decoded {
        response.encode(&mut reencoded);
    }
    assert_eq!(reencoded, input);
}

#[test]
fn test_fetch_body_literal_fragmented() {
    let input = b"* 12 FETCH (UID 9 BODY[HEADER.FIELDS (SUBJECT)] {21}\r\nSubject: hi there\r\n\r\n)\r\n";
    let whole = responses(input);
    assert_eq!(
        whole[0].parameters(),
        &[
            Parameter::OpenList,
            Parameter::atom("UID"),
            Parameter::Number(9),
            Parameter::atom("BODY[HEADER.FIELDS (SUBJECT)]"),
            Parameter::literal(&b"Subject: hi there\r\n\r\n"[..]),
            Parameter::CloseList,
        ]
    );
    for size in 1..input.len() {
        assert_eq!(responses_in_pieces(input, size), whole, "piece size {size}");
    }
}

#[test]
fn test_capability_and_bye() {
    let decoded =
        responses(b"* CAPABILITY IMAP4rev1 LITERAL+ IDLE\r\n* BYE server shutting down\r\n");
    assert_eq!(
        decoded[0].parameters(),
        &[
            Parameter::atom("IMAP4rev1"),
            Parameter::atom("LITERAL+"),
            Parameter::atom("IDLE"),
        ]
    );
    assert_eq!(
        decoded[1],
        Response::Bye {
            code: None,
            text: "server shutting down".into(),
        }
    );
}

#[test]
fn test_8bit_greeting_and_mailbox() {
    let greeting = b"* OK [ALERT] Bienvenue \xe9t\xe9\r\n";
    let decoded = responses(greeting);
    assert_eq!(decoded[0].text(), Some(&b"Bienvenue \xe9t\xe9"[..]));
    assert_eq!(decoded[0].to_bytes(), greeting);

    let select = b"A1 SELECT \"Bo\xeete\"\r\n";
    let decoded = commands(select);
    let mailbox = Parameter::quoted(&b"Bo\xeete"[..]);
    assert_eq!(decoded[0].parameters(), &[mailbox]);
    assert_eq!(decoded[0].to_bytes(), select);
}

#[test]
fn test_text_parameter_round_trip() {
    let command = Command::new("A1", "X", vec![Parameter::text("hello world")]);
    assert_eq!(command.to_bytes(), b"A1 X \"hello world\"\r\n");
    assert_eq!(commands(&command.to_bytes()), vec![command]);

    let command = Command::new("A2", "X", vec![Parameter::text("two\r\nlines")]);
    assert_eq!(command.to_bytes(), b"A2 X {10}\r\ntwo\r\nlines\r\n");
    assert_eq!(commands(&command.to_bytes()), vec![command]);
}

#[test]
fn test_error_leaves_no_value() {
    let mut decoder = ResponseDecoder::new();
    let mut buf = BytesMut::from(&b"* LIST (\\Noselect \"/\" foo\r\n"[..]);
    assert!(matches!(
        decoder.decode(&mut buf),
        Err(Error::CorruptedFrame { .. })
    ));
}

fn atom() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Za-z][A-Za-z0-9.\\-]{0,15}",
        "\\\\[A-Z][a-z]{0,8}",
    ]
    .prop_filter("NIL is not an atom", |s| s != "NIL")
}

fn literal() -> impl Strategy<Value = Parameter> {
    (prop::collection::vec(any::<u8>(), 0..48), any::<bool>()).prop_map(|(data, plus)| {
        Parameter::Chunk(LiteralChunk::complete(data, plus))
    })
}

/// Any octet except CR and LF.
fn line_octet() -> impl Strategy<Value = u8> {
    any::<u8>().prop_filter("line break", |&b| b != b'\r' && b != b'\n')
}

fn leaf() -> impl Strategy<Value = Parameter> {
    prop_oneof![
        atom().prop_map(Parameter::Atom),
        any::<u64>().prop_map(Parameter::Number),
        Just(Parameter::Nil),
        prop::collection::vec(line_octet(), 0..24).prop_map(Parameter::quoted),
        prop::collection::vec(any::<u8>(), 0..24).prop_map(Parameter::text),
        literal(),
    ]
}

/// Flattened parameter sequences with balanced lists.
fn parameters() -> impl Strategy<Value = Vec<Parameter>> {
    let tree = leaf().prop_map(|p| vec![p]).prop_recursive(3, 32, 4, |inner| {
        prop::collection::vec(inner, 0..4).prop_map(|items| {
            let mut list = vec![Parameter::OpenList];
            list.extend(items.into_iter().flatten());
            list.push(Parameter::CloseList);
            list
        })
    });
    prop::collection::vec(tree, 0..5).prop_map(|trees| trees.into_iter().flatten().collect())
}

fn command() -> impl Strategy<Value = Command> {
    ("[A-Za-z][A-Za-z0-9]{0,7}", atom(), parameters())
        .prop_map(|(tag, verb, params)| Command::new(tag, verb, params))
}

/// Status and continuation text, including 8-bit octets.
fn text() -> impl Strategy<Value = Bytes> {
    prop::collection::vec(line_octet(), 0..40)
        .prop_filter("text would read as a response code", |t| {
            t.first() != Some(&b'[')
        })
        .prop_map(Bytes::from)
}

fn code() -> impl Strategy<Value = Option<ResponseCode>> {
    let code = (atom(), parameters())
        .prop_map(|(name, params)| ResponseCode::with_parameters(name, params));
    prop::option::of(code)
}

fn tag() -> impl Strategy<Value = Option<String>> {
    prop::option::of("[A-Za-z][A-Za-z0-9]{0,7}")
}

fn verb() -> impl Strategy<Value = String> {
    atom().prop_filter("status keywords classify as status", |v| {
        Status::from_keyword(v).is_none()
    })
}

fn response() -> impl Strategy<Value = Response> {
    prop_oneof![
        (tag(), code(), text()).prop_map(|(tag, code, text)| Response::Ok { tag, code, text }),
        (tag(), code(), text()).prop_map(|(tag, code, text)| Response::No { tag, code, text }),
        (tag(), code(), text()).prop_map(|(tag, code, text)| Response::Bad { tag, code, text }),
        (code(), text()).prop_map(|(code, text)| Response::PreAuth { code, text }),
        (code(), text()).prop_map(|(code, text)| Response::Bye { code, text }),
        (verb(), parameters()).prop_map(|(verb, params)| Response::server(verb, params)),
        (any::<u32>(), verb(), parameters()).prop_map(|(number, verb, params)| {
            Response::message_status(number, verb, params)
        }),
        text().prop_map(|text| Response::Continuation { text }),
    ]
}

proptest! {
    #[test]
    fn prop_command_round_trip(command in command()) {
        prop_assert_eq!(commands(&command.to_bytes()), vec![command]);
    }

    #[test]
    fn prop_response_round_trip(response in response()) {
        prop_assert_eq!(responses(&response.to_bytes()), vec![response]);
    }

    #[test]
    fn prop_command_fragmentation(batch in prop::collection::vec(command(), 1..4), size in 1usize..24) {
        let mut wire = Vec::new();
        for command in &batch {
            command.encode(&mut wire);
        }
        prop_assert_eq!(commands_in_pieces(&wire, 1), batch.clone());
        prop_assert_eq!(commands_in_pieces(&wire, size), batch);
    }

    #[test]
    fn prop_response_fragmentation(batch in prop::collection::vec(response(), 1..4), size in 1usize..24) {
        let mut wire = Vec::new();
        for response in &batch {
            response.encode(&mut wire);
        }
        prop_assert_eq!(responses_in_pieces(&wire, 1), batch.clone());
        prop_assert_eq!(responses_in_pieces(&wire, size), batch);
    }
}
