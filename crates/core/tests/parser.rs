//! Integration tests for the HL7 parser.
//!
//! Covers: segment splitting and ordering, header special-casing, field
//! nesting, the two fatal errors, structural warnings, determinism, and
//! concurrent use.
//!
//! Accessor-specific tests live in `accessors.rs`.

mod common;

use common::{BASIC_ADT, REPEATING_PHONE, extract_diag_codes, leaves, parse_ok, segment_names};
use hl7_toolchain_core::{
    Delimiters, Message, ParseError, ParserConfig, Severity, Span, codes, parse_str,
    parse_with_config,
};

// ─── 1. Basic parsing ───────────────────────────────────────────────────────

#[test]
fn basic_message_has_two_segments() {
    let res = parse_ok(BASIC_ADT);
    assert_eq!(segment_names(&res.message), vec!["MSH", "PID"]);
    assert!(res.diagnostics.is_empty(), "{:?}", extract_diag_codes(&res));
}

#[test]
fn patient_name_components() {
    let res = parse_ok(
        "MSH|^~\\&|A|B|C|D|20231115||ADT^A01|1|P|2.5\nPID|1||123||Doe^John||19800115|M",
    );
    let pid = res.message.get_segment("PID").unwrap();
    let name = pid.get_field(5).unwrap();
    assert_eq!(name.get_component(1), "Doe");
    assert_eq!(name.get_component(2), "John");
}

#[test]
fn one_segment_per_non_blank_line_in_order() {
    let input = "\r\nMSH|^~\\&|A\r\n\r\nEVN|A01\rPID|1\n   \nPV1|1|I\n\n";
    let res = parse_ok(input);
    assert_eq!(segment_names(&res.message), vec!["MSH", "EVN", "PID", "PV1"]);
}

#[test]
fn line_ending_styles_are_equivalent() {
    let lf = parse_ok("MSH|^~\\&|A\nPID|1|x^y\nOBX|1").message;
    let cr = parse_ok("MSH|^~\\&|A\rPID|1|x^y\rOBX|1").message;
    let crlf = parse_ok("MSH|^~\\&|A\r\nPID|1|x^y\r\nOBX|1\r\n").message;
    assert_eq!(lf, cr);
    assert_eq!(lf, crlf);
}

#[test]
fn segment_with_name_only() {
    let res = parse_ok("MSH|^~\\&\nEVN");
    let evn = res.message.get_segment("EVN").unwrap();
    assert!(evn.fields().is_empty());
    assert!(evn.get_field(1).is_none());
}

// ─── 2. Header segment ──────────────────────────────────────────────────────

#[test]
fn header_first_field_is_field_separator() {
    let res = parse_ok(BASIC_ADT);
    let msh = res.message.header().unwrap();
    assert_eq!(leaves(msh.get_field(1).unwrap()), vec![vec![vec!["|"]]]);
}

#[test]
fn header_field_numbers_match_standard_positions() {
    let res = parse_ok(BASIC_ADT);
    let msh = res.message.header().unwrap();
    assert_eq!(msh.get_component(3, 1), "EPIC");
    assert_eq!(msh.get_component(9, 1), "ADT");
    assert_eq!(msh.get_component(9, 2), "A01");
    assert_eq!(msh.get_component(10, 1), "MSG001");
    assert_eq!(msh.get_component(12, 1), "2.5");
}

#[test]
fn header_encoding_field_is_tokenized_generically() {
    let res = parse_ok(BASIC_ADT);
    let msh2 = res.message.header().unwrap().get_field(2).unwrap();
    // `^~\&` splits on `~`, then `^`, then `&`.
    assert_eq!(msh2.repetitions().len(), 2);
    assert_eq!(leaves(msh2), vec![vec![vec![""], vec![""]], vec![vec!["\\", ""]]]);
}

#[test]
fn bare_header_line() {
    let res = parse_ok("MSH");
    let msh = res.message.header().unwrap();
    assert_eq!(msh.fields().len(), 1);
    assert_eq!(msh.get_component(1, 1), "|");
}

#[test]
fn configured_field_separator_is_synthesized() {
    let custom = Delimiters {
        field: '#',
        ..Delimiters::STANDARD
    };
    let cfg = ParserConfig::default().with_delimiters(custom);
    let res = parse_with_config("MSH#^~\\&#APP\nPID#1##123", &cfg).unwrap();
    let msh = res.message.header().unwrap();
    assert_eq!(msh.get_component(1, 1), "#");
    assert_eq!(msh.get_component(3, 1), "APP");
    assert_eq!(res.message.get_segment("PID").unwrap().get_component(3, 1), "123");
    assert_eq!(res.message.delimiters().field, '#');
}

// ─── 3. Field nesting ───────────────────────────────────────────────────────

#[test]
fn repetition_count_is_separator_count_plus_one() {
    for (raw, expected) in [("", 1), ("a", 1), ("a~b", 2), ("~", 2), ("a~~b~", 4)] {
        let res = parse_ok(&format!("MSH|^~\\&\nZZZ|{raw}"));
        let field = res.message.get_segment("ZZZ").unwrap().get_field(1).unwrap();
        assert_eq!(field.repetitions().len(), expected, "field {raw:?}");
    }
}

#[test]
fn repeating_phone_numbers() {
    let res = parse_ok(REPEATING_PHONE);
    let phones = res
        .message
        .get_segment("PID")
        .unwrap()
        .get_field(13)
        .unwrap();
    assert_eq!(phones.repetitions().len(), 2);
    assert_eq!(phones.repetitions()[0].get_component(1), "555-1234");
    assert_eq!(phones.repetitions()[1].get_component(1), "555-5678");
}

#[test]
fn empty_fields_are_single_empty_leaves() {
    let res = parse_ok("MSH|^~\\&\nPID|||");
    let pid = res.message.get_segment("PID").unwrap();
    assert_eq!(pid.fields().len(), 3);
    for field in pid.fields() {
        assert_eq!(leaves(field), vec![vec![vec![""]]]);
    }
}

#[test]
fn escaped_separators_still_split() {
    let res = parse_ok("MSH|^~\\&\nNTE|1||a\\^b\\&c");
    let comment = res.message.get_segment("NTE").unwrap().get_field(3).unwrap();
    assert_eq!(leaves(comment), vec![vec![vec!["a\\"], vec!["b\\", "c"]]]);
}

// ─── 4. Fatal errors ────────────────────────────────────────────────────────

#[test]
fn empty_input_is_malformed() {
    assert_eq!(parse_str("").unwrap_err(), ParseError::MalformedMessage);
}

#[test]
fn blank_input_is_malformed() {
    assert_eq!(parse_str("\r\n \n\t").unwrap_err(), ParseError::MalformedMessage);
}

#[test]
fn missing_header_is_invalid_structure() {
    let err = parse_str("PID|1||12345").unwrap_err();
    assert_eq!(
        err,
        ParseError::InvalidStructure {
            expected: "MSH",
            found: "PID".into(),
            span: Span::new(0, 12),
        }
    );
    assert_eq!(err.code(), codes::PARSER_INVALID_STRUCTURE);
}

#[test]
fn header_after_other_segment_is_invalid_structure() {
    let err = parse_str("\nEVN|A01\nMSH|^~\\&").unwrap_err();
    assert!(matches!(err, ParseError::InvalidStructure { ref found, .. } if found == "EVN"));
    assert_eq!(err.span(), Some(Span::new(1, 8)));
}

#[test]
fn from_str_uses_same_contract() {
    let m: Message = BASIC_ADT.parse().unwrap();
    assert_eq!(m.segments().len(), 2);
    assert!("".parse::<Message>().is_err());
    assert!("PID|1".parse::<Message>().is_err());
}

#[test]
fn short_and_odd_input_never_fails_after_header() {
    for input in [
        "MSH|",
        "MSH|^~\\&\n|||",
        "MSH|^~\\&\nX",
        "MSH|^~\\&\n^^^~~~&&&",
        "MSH|^~\\&\nPID|1\u{0}2|é^ü",
    ] {
        assert!(parse_str(input).is_ok(), "should parse {input:?}");
    }
}

// ─── 5. Structural warnings ─────────────────────────────────────────────────

#[test]
fn nonstandard_declared_delimiters_warn() {
    let res = parse_ok("MSH|$~\\&|APP\nPID|1|a$b");
    let codes_found = extract_diag_codes(&res);
    assert_eq!(codes_found, vec![codes::PARSER_NONSTANDARD_DELIMITERS]);
    let d = &res.diagnostics[0];
    assert_eq!(d.severity, Severity::Warn);
    assert_eq!(d.span, Some(Span::new(3, 8)));
    let ctx = d.context.as_ref().unwrap();
    assert_eq!(ctx["declared"], "|$~\\&");
    assert_eq!(ctx["resolved"], "|^~\\&");
    // The declaration is not honored.
    assert_eq!(
        res.message.get_segment("PID").unwrap().get_component(2, 1),
        "a$b"
    );
}

#[test]
fn odd_segment_names_warn_but_parse() {
    let res = parse_ok("MSH|^~\\&\npid|1\nZPID|2\n|3");
    let names: Vec<_> = res
        .diagnostics
        .iter()
        .filter(|d| d.id == codes::PARSER_SEGMENT_NAME)
        .map(|d| d.context.as_ref().unwrap()["segment"].clone())
        .collect();
    assert_eq!(names, vec!["pid", "ZPID", ""]);
    assert_eq!(res.diagnostics[0].context.as_ref().unwrap()["line"], "2");
    assert_eq!(segment_names(&res.message), vec!["MSH", "pid", "ZPID", ""]);
}

#[test]
fn warnings_never_have_error_severity() {
    let res = parse_ok("MSH#bad\nx|y\nMSH|$$$$|");
    assert!(!res.diagnostics.is_empty());
    assert!(res.diagnostics.iter().all(|d| !d.is_error()));
}

// ─── 6. Determinism and concurrency ─────────────────────────────────────────

#[test]
fn parsing_is_idempotent() {
    let a = parse_ok(REPEATING_PHONE);
    let b = parse_ok(REPEATING_PHONE);
    assert_eq!(a.message, b.message);
    assert_eq!(a.diagnostics, b.diagnostics);
}

#[test]
fn concurrent_parses_are_independent() {
    let inputs = [BASIC_ADT, REPEATING_PHONE, "MSH|^~\\&\nOBX|1|NM|x||42"];
    let expected: Vec<Message> = inputs.iter().map(|i| parse_ok(i).message).collect();
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|n| {
                let input = inputs[n % inputs.len()];
                scope.spawn(move || (n, parse_str(input).unwrap().message))
            })
            .collect();
        for handle in handles {
            let (n, message) = handle.join().unwrap();
            assert_eq!(message, expected[n % inputs.len()]);
        }
    });
}
