use std::{io::Write, num::NonZeroUsize};

use octopus::{
    catalog::Catalog, config::Config, parse_file, parser::ParseError, scanner::ScanError,
    stmt::Stmt, token_type::TokenClass, tokenize_file, Error,
};
use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;

fn write_source(source: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(source.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn parses_a_catalog_file() {
    let file = write_source("class Foo:\n    file \"a\":\n        path = \"/etc/a\"\n");
    let program = parse_file(file.path(), &Config::default()).unwrap();

    assert_eq!(program.classes.len(), 1);
    let Stmt::Resource(resource) = &program.classes[0].body[0] else {
        panic!("expected a resource");
    };
    assert_eq!(resource.body.len(), 1);
}

#[test]
fn missing_file_is_an_open_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.oct");
    let err = parse_file(&path, &Config::default()).unwrap_err();
    assert!(matches!(err, Error::Open { .. }));
    assert!(err.to_string().starts_with("failed to open "));
}

#[test]
fn large_files_span_several_buffer_refills() {
    let mut source = String::from("class Big:\n");
    for index in 0..400 {
        source.push_str(&format!(
            "    package \"pkg_{index}\":\n        version = {index}\n"
        ));
    }
    let file = write_source(&source);
    let program = parse_file(file.path(), &Config::default()).unwrap();
    let catalog = Catalog::from_program(&program);

    assert_eq!(catalog.items().len(), 400);
    assert_eq!(catalog.items()[399].title, "\"pkg_399\"");
    assert_eq!(
        catalog.items()[399].attributes.get("version").map(String::as_str),
        Some("399")
    );
}

#[test]
fn indentation_errors_carry_the_line() {
    let file = write_source("class Foo:\n  file \"a\":\n");
    let err = parse_file(file.path(), &Config::default()).unwrap_err();
    assert!(matches!(
        err,
        Error::Parse(ParseError::Scan(ScanError::Indentation { line: 2, .. }))
    ));
    assert_eq!(
        err.to_string(),
        "indentation of 2 spaces at line 2 is not a multiple of 4"
    );

    let config = Config::with_indent_size(NonZeroUsize::new(2).unwrap());
    assert!(parse_file(file.path(), &config).is_ok());
}

#[test]
fn first_grammar_error_stops_the_parse() {
    let file = write_source("class A:\n    x = 1 +\n    y = 'unterminated\n");
    let err = parse_file(file.path(), &Config::default()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "expected one of 'identifier', 'string', 'integer', 'boolean', found 'new line' at line 2, column 12"
    );
}

#[test]
fn tokenizes_a_file() {
    let file = write_source("class Foo:\n");
    let classes: Vec<_> = tokenize_file(file.path(), &Config::default())
        .unwrap()
        .into_iter()
        .map(|token| token.class)
        .collect();
    assert_eq!(
        classes,
        vec![
            TokenClass::ClassDef,
            TokenClass::Identifier,
            TokenClass::Colon,
            TokenClass::Newline,
            TokenClass::Eof
        ]
    );
}
