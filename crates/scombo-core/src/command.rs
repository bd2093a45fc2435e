//! Compiler command rendering.
//!
//! Two shapes for the same cursor position: a NUL-delimited token stream
//! consumed by the worker protocol, and a single human-readable fxc
//! invocation line for logs and dry runs. The combo number is rendered as
//! bare lowercase hex in both.

use std::fmt::Write as _;

use crate::cursor::ComboCursor;

/// Append the token stream for `cursor` to `buffer`: each token
/// NUL-terminated, with one extra NUL closing the stream.
pub fn format_command(cursor: &ComboCursor, buffer: &mut Vec<u8>) {
    let info = cursor.entry_info();
    push_token(buffer, "command");
    push_token(buffer, &info.shader_file_name);
    push_token(buffer, &info.shader_version);
    push_token(buffer, "SHADERCOMBO");
    push_token(buffer, &format!("{:x}", cursor.combo_number()));
    push_token(
        buffer,
        &format!("SHADER_MODEL_{}", info.shader_version.to_ascii_uppercase()),
    );
    push_token(buffer, "1");
    for (define, value) in cursor.variables() {
        push_token(buffer, define.name());
        push_token(buffer, &value.to_string());
    }
    buffer.push(0);
}

fn push_token(buffer: &mut Vec<u8>, token: &str) {
    buffer.extend_from_slice(token.as_bytes());
    buffer.push(0);
}

/// Render the single-line fxc invocation for `cursor`.
#[must_use]
pub fn format_command_human(cursor: &ComboCursor) -> String {
    let info = cursor.entry_info();
    let mut line = format!(
        "fxc.exe /DCENTROIDMASK={} /DSHADERCOMBO={:x} /DSHADER_MODEL_{}=1 /T{} /Emain",
        info.centroid_mask,
        cursor.combo_number(),
        info.shader_version.to_ascii_uppercase(),
        info.shader_version,
    );
    for (define, value) in cursor.variables() {
        let _ = write!(line, " /D{}={}", define.name(), value);
    }
    let _ = write!(line, " {}", info.shader_file_name);
    line
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use scombo_expr::Expr;

    use super::*;
    use crate::define::Define;
    use crate::entry::{CfgEntry, EntryInfo};
    use crate::generator::ComboGenerator;

    /// Cursor over fixed single-value defines plus a wide counter slot,
    /// advanced until the combo number equals `combo_hex`.
    fn cursor_at(defines: &[(&str, i32)], combo_hex: u64) -> ComboCursor {
        let mut generator = ComboGenerator::default();
        for (name, value) in defines {
            generator.add_define(Define::new(*name, *value, *value, false));
        }
        // A hidden counter slot gives the entry enough combos to reach
        // the requested combo number.
        generator.add_define(Define::new("COUNTER", 0, i32::MAX, false));
        let info = EntryInfo {
            name: "P".to_owned(),
            shader_file_name: "p.fxc".to_owned(),
            shader_version: "ps_3_0".to_owned(),
            centroid_mask: 7,
            num_combos: generator.num_combos(),
            ..EntryInfo::default()
        };
        let entry = Arc::new(CfgEntry::new(generator, Expr::Const(0), info));
        let num_combos = entry.generator().num_combos();
        let mut cursor = ComboCursor::new(entry, 0);
        cursor.advance(num_combos - 1 - combo_hex).unwrap();
        cursor
    }

    #[test]
    fn test_human_readable_line() {
        let cursor = cursor_at(&[("A", 2), ("B", 1)], 0x2a);
        assert_eq!(cursor.combo_number(), 0x2a);
        let line = format_command_human(&cursor);
        assert!(
            line.starts_with(
                "fxc.exe /DCENTROIDMASK=7 /DSHADERCOMBO=2a /DSHADER_MODEL_PS_3_0=1 \
                 /Tps_3_0 /Emain /DA=2 /DB=1"
            ),
            "unexpected line: {line}"
        );
        assert!(line.ends_with(" p.fxc"));
    }

    #[test]
    fn test_token_stream_layout() {
        let cursor = cursor_at(&[("A", 2), ("B", 1)], 0x2a);
        let mut buffer = Vec::new();
        format_command(&cursor, &mut buffer);

        let mut tokens: Vec<&[u8]> = buffer.split(|b| *b == 0).collect();
        // Trailing extra NUL yields two empty tails after split.
        assert_eq!(tokens.pop(), Some(&b""[..]));
        assert_eq!(tokens.pop(), Some(&b""[..]));
        assert_eq!(
            tokens,
            vec![
                &b"command"[..],
                b"p.fxc",
                b"ps_3_0",
                b"SHADERCOMBO",
                b"2a",
                b"SHADER_MODEL_PS_3_0",
                b"1",
                b"A",
                b"2",
                b"B",
                b"1",
                b"COUNTER",
                b"42",
            ]
        );
    }

    #[test]
    fn test_hex_is_bare_lowercase() {
        let cursor = cursor_at(&[], 0xbeef);
        let line = format_command_human(&cursor);
        assert!(line.contains("/DSHADERCOMBO=beef "));
        assert!(!line.contains("0x"));
    }
}
