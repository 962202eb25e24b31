//! The builtin command registry and single-pass line parsing.
//!
//! A finalized line is parsed exactly once into [`ParsedLine`]; dispatch
//! happens on the tag, never by re-comparing strings downstream.

/// Commands handled in-process, without the host shell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Builtin {
    Help,
    Clear,
    Cd,
    History,
    Exit,
}

/// One registry row. `ignore_case` rows match the whole line in any case;
/// `takes_arg` rows also match `name` followed by a space and an argument.
#[derive(Clone, Copy, Debug)]
struct BuiltinSpec {
    command: Builtin,
    name: &'static str,
    ignore_case: bool,
    takes_arg: bool,
}

const REGISTRY: &[BuiltinSpec] = &[
    BuiltinSpec {
        command: Builtin::Help,
        name: "help",
        ignore_case: true,
        takes_arg: false,
    },
    BuiltinSpec {
        command: Builtin::Clear,
        name: "clear",
        ignore_case: true,
        takes_arg: false,
    },
    BuiltinSpec {
        command: Builtin::Cd,
        name: "cd",
        ignore_case: false,
        takes_arg: true,
    },
    BuiltinSpec {
        command: Builtin::History,
        name: "history",
        ignore_case: false,
        takes_arg: false,
    },
    BuiltinSpec {
        command: Builtin::Exit,
        name: "exit",
        ignore_case: true,
        takes_arg: false,
    },
    BuiltinSpec {
        command: Builtin::Exit,
        name: "quit",
        ignore_case: true,
        takes_arg: false,
    },
];

/// A finalized line, parsed once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParsedLine {
    Builtin {
        command: Builtin,
        arg: Option<String>,
    },
    External {
        line: String,
    },
}

/// Classifies a trimmed, non-empty line. Anything the registry does not
/// claim goes to the host shell verbatim.
pub fn parse_line(line: &str) -> ParsedLine {
    for spec in REGISTRY {
        if spec.takes_arg {
            if line == spec.name {
                return ParsedLine::Builtin {
                    command: spec.command,
                    arg: None,
                };
            }
            if let Some(rest) = line.strip_prefix(spec.name) {
                if rest.starts_with(' ') {
                    let arg = rest.trim();
                    return ParsedLine::Builtin {
                        command: spec.command,
                        arg: (!arg.is_empty()).then(|| arg.to_string()),
                    };
                }
            }
        } else {
            let hit = if spec.ignore_case {
                line.eq_ignore_ascii_case(spec.name)
            } else {
                line == spec.name
            };
            if hit {
                return ParsedLine::Builtin {
                    command: spec.command,
                    arg: None,
                };
            }
        }
    }
    ParsedLine::External {
        line: line.to_string(),
    }
}
