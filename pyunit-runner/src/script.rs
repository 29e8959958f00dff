// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The Python script that lists `unittest` test identifiers.

use crate::{
    errors::{ScriptArgKind, ScriptTemplateError},
    list::{DiscoverArgs, SENTINEL_LINE},
};
use indoc::formatdoc;

/// Characters that would end or alter a double-quoted Python string literal.
const FORBIDDEN_CHARS: &[char] = &['"', '\\', '\n', '\r', '\0'];

/// A rendered discovery script, ready to be passed to `python -c`.
///
/// The script runs `unittest.TestLoader().discover` with the given start directory and pattern,
/// prints [`SENTINEL_LINE`], then prints the id of each test it found, one per line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DiscoveryScript {
    source: String,
}

impl DiscoveryScript {
    /// Renders the script for the given arguments.
    ///
    /// Returns an error if either value contains a double quote, a backslash, a line break or a
    /// NUL character.
    pub fn new(args: &DiscoverArgs) -> Result<Self, ScriptTemplateError> {
        let start_directory = check_value(ScriptArgKind::StartDirectory, &args.start_directory)?;
        let pattern = check_value(ScriptArgKind::Pattern, &args.pattern)?;

        let source = formatdoc! {r#"
            import unittest
            loader = unittest.TestLoader()
            suites = loader.discover("{start_directory}", pattern="{pattern}")
            print("{SENTINEL_LINE}")
            for suite in suites._tests:
                for cls in suite._tests:
                    try:
                        for m in cls._tests:
                            print(m.id())
                    except:
                        pass
        "#};
        Ok(Self { source })
    }

    /// Returns the script source.
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

fn check_value(kind: ScriptArgKind, value: &str) -> Result<&str, ScriptTemplateError> {
    match value.chars().find(|c| FORBIDDEN_CHARS.contains(c)) {
        Some(forbidden) => Err(ScriptTemplateError::new(kind, value, forbidden)),
        None => Ok(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test]
    fn test_render_default() {
        let script = DiscoveryScript::new(&DiscoverArgs::default()).unwrap();
        assert_eq!(
            script.as_str(),
            indoc! {r#"
                import unittest
                loader = unittest.TestLoader()
                suites = loader.discover(".", pattern="test*.py")
                print("start")
                for suite in suites._tests:
                    for cls in suite._tests:
                        try:
                            for m in cls._tests:
                                print(m.id())
                        except:
                            pass
            "#}
        );
    }

    #[test]
    fn test_render_custom() {
        let args = DiscoverArgs {
            start_directory: "src/tests".to_owned(),
            pattern: "*_test.py".to_owned(),
        };
        let script = DiscoveryScript::new(&args).unwrap();
        assert!(
            script
                .as_str()
                .contains(r#"loader.discover("src/tests", pattern="*_test.py")"#),
            "script: {}",
            script.as_str()
        );
    }

    #[test_case("my\"dir", "test*.py", ScriptArgKind::StartDirectory, '"' ; "quote in start dir")]
    #[test_case("C:\\tests", "test*.py", ScriptArgKind::StartDirectory, '\\' ; "backslash in start dir")]
    #[test_case(".", "test*.py\nimport os", ScriptArgKind::Pattern, '\n' ; "newline in pattern")]
    #[test_case(".", "a\0b", ScriptArgKind::Pattern, '\0' ; "nul in pattern")]
    fn test_render_rejects(start_directory: &str, pattern: &str, kind: ScriptArgKind, forbidden: char) {
        let args = DiscoverArgs {
            start_directory: start_directory.to_owned(),
            pattern: pattern.to_owned(),
        };
        let error = DiscoveryScript::new(&args).unwrap_err();
        assert_eq!(error.kind(), kind);
        assert_eq!(error.forbidden(), forbidden);
    }
}
