#![allow(non_snake_case)]

use busgen_codegen::escape_string;
use proptest::prelude::*;

/// Decode the escapes `escape_string` produces.
fn unescape(escaped: &str) -> String {
    let mut units: Vec<u16> = Vec::new();
    let mut chars = escaped.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            units.push(c as u16);
            continue;
        }
        match chars.next() {
            Some('n') => units.push(b'\n' as u16),
            Some('r') => units.push(b'\r' as u16),
            Some('t') => units.push(b'\t' as u16),
            Some('b') => units.push(0x08),
            Some('f') => units.push(0x0c),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                units.push(u16::from_str_radix(&hex, 16).unwrap());
            }
            Some(d) if d.is_digit(8) => {
                let mut digits = d.to_string();
                digits.extend(chars.by_ref().take(2));
                units.push(u16::from_str_radix(&digits, 8).unwrap());
            }
            Some(other) => units.push(other as u16),
            None => panic!("dangling backslash"),
        }
    }
    String::from_utf16(&units).unwrap()
}

proptest! {
    #[test]
    fn escape_string___output_is_printable_ascii(input in any::<String>()) {
        let escaped = escape_string(&input);

        prop_assert!(escaped.chars().all(|c| c.is_ascii() && !c.is_ascii_control()));
    }

    #[test]
    fn escape_string___quotes_never_terminate_literal(input in any::<String>()) {
        let escaped = escape_string(&input);

        let mut backslashes = 0usize;
        for c in escaped.chars() {
            if c == '"' {
                prop_assert!(backslashes % 2 == 1, "unescaped quote in {escaped}");
            }
            backslashes = if c == '\\' { backslashes + 1 } else { 0 };
        }
    }

    #[test]
    fn escape_string___decodes_to_input(input in any::<String>()) {
        prop_assert_eq!(unescape(&escape_string(&input)), input);
    }
}
