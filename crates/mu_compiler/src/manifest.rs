//! Manifest documents.
//!
//! A manifest is the JSON form of one document's top-level declarations:
//!
//! ```json
//! { "declarations": [
//!     { "kind": "stack", "name": "net", "description": "shared network" },
//!     { "kind": "service", "name": "web", "type": "aws/ec2" }
//! ] }
//! ```
//!
//! `serde_json` does not report where values came from. Each declaration is
//! kept as a borrowed raw object, so its offset in the document is known, and
//! its span is the value of that object's own `"name"` key.

use log::debug;
use memchr::{memchr2, memchr3};
use mu_ast::{AstBuilder, Declaration, Document};
use mu_core::text::{compute_line_starts, LineMap, TextSpan};
use mu_diagnostics::{messages, Diagnostic, DiagnosticSink};
use serde::Deserialize;
use serde_json::value::RawValue;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Manifest<'a> {
    #[serde(borrow, default)]
    declarations: Vec<&'a RawValue>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum ManifestDeclaration {
    Stack {
        name: String,
        #[serde(default)]
        description: Option<String>,
    },
    Service {
        name: String,
        #[serde(rename = "type", default)]
        service_type: Option<String>,
    },
}

/// One document and the declarations it contributes, starting with the
/// document itself.
#[derive(Debug, Clone)]
pub struct LoadedDocument<'a> {
    pub document: &'a Document<'a>,
    pub declarations: Vec<Declaration<'a>>,
}

/// Turn a manifest's text into AST declarations.
///
/// Malformed manifests are reported to `sink`; the document then contributes
/// only its own declaration.
pub fn load_document<'a>(
    builder: &AstBuilder<'a>,
    path: &str,
    text: &str,
    sink: &mut impl DiagnosticSink,
) -> LoadedDocument<'a> {
    let document = builder.document(path, text);
    let mut declarations = vec![Declaration::Document(document)];

    let raw_declarations = match parse_manifest(text) {
        Ok(raw_declarations) => raw_declarations,
        Err(err) => {
            report_invalid(document, &err, sink);
            return LoadedDocument {
                document,
                declarations,
            };
        }
    };

    for raw in &raw_declarations {
        let span = match own_name_literal(raw.object) {
            Some(range) => TextSpan::new((raw.offset + range.start) as u32, range.len() as u32),
            None => TextSpan::empty(raw.offset as u32),
        };

        declarations.push(match &raw.declaration {
            ManifestDeclaration::Stack { name, description } => {
                Declaration::Stack(builder.stack(document, name, span, description.as_deref()))
            }
            ManifestDeclaration::Service { name, service_type } => {
                Declaration::Service(builder.service(document, name, span, service_type.as_deref()))
            }
        });
    }

    debug!("loaded {} declarations from {}", raw_declarations.len(), path);
    LoadedDocument {
        document,
        declarations,
    }
}

/// One entry of the `declarations` array, decoded, with the exact text of
/// its object and where that text starts in the document.
struct RawDeclaration<'t> {
    offset: usize,
    object: &'t str,
    declaration: ManifestDeclaration,
}

/// A serde error and the document offset of the text serde was reading.
struct ManifestError {
    offset: usize,
    source: serde_json::Error,
}

fn parse_manifest(text: &str) -> Result<Vec<RawDeclaration<'_>>, ManifestError> {
    let manifest: Manifest<'_> =
        serde_json::from_str(text).map_err(|source| ManifestError { offset: 0, source })?;

    manifest
        .declarations
        .into_iter()
        .map(|raw| {
            let object = raw.get();
            let offset = object.as_ptr() as usize - text.as_ptr() as usize;
            let declaration = serde_json::from_str(object)
                .map_err(|source| ManifestError { offset, source })?;
            Ok(RawDeclaration {
                offset,
                object,
                declaration,
            })
        })
        .collect()
}

fn report_invalid(document: &Document<'_>, err: &ManifestError, sink: &mut impl DiagnosticSink) {
    let reason = err.source.to_string();
    let at = error_span(&document.text[err.offset..], &err.source).start + err.offset as u32;
    sink.report(Diagnostic::with_location(
        document.location_of(TextSpan::empty(at)),
        &messages::DOCUMENT_0_IS_NOT_A_VALID_MANIFEST_1,
        &[document.path, reason.as_str()],
    ));
}

/// Where `serde_json` gave up inside `text`, as an empty span.
fn error_span(text: &str, err: &serde_json::Error) -> TextSpan {
    let line = err.line().saturating_sub(1) as u32;
    let character = err.column().saturating_sub(1) as u32;
    let starts = compute_line_starts(text);
    let pos = LineMap::new(&starts).position_of(line, character);
    TextSpan::empty(pos.min(text.len() as u32))
}

/// Byte range of the string value of `object`'s own `"name"` key. Keys of
/// nested objects are skipped.
fn own_name_literal(object: &str) -> Option<std::ops::Range<usize>> {
    let bytes = object.as_bytes();
    let mut depth = 0usize;
    let mut cursor = 0;
    while let Some(found) = memchr3(b'"', b'{', b'}', &bytes[cursor..]) {
        let at = cursor + found;
        match bytes[at] {
            b'{' => depth += 1,
            b'}' => depth = depth.saturating_sub(1),
            _ => {
                let end = string_end(bytes, at)?;
                if depth == 1 && &object[at..end] == "\"name\"" {
                    let value = object[end..].trim_start().strip_prefix(':').map(str::trim_start);
                    if let Some(value) = value.filter(|v| v.starts_with('"')) {
                        let start = object.len() - value.len();
                        return Some(start..string_end(bytes, start)?);
                    }
                }
                cursor = end;
                continue;
            }
        }
        cursor = at + 1;
    }
    None
}

/// Offset just past the closing quote of the string literal opening at `open`.
fn string_end(bytes: &[u8], open: usize) -> Option<usize> {
    let mut cursor = open + 1;
    loop {
        let at = cursor + memchr2(b'"', b'\\', &bytes[cursor..])?;
        if bytes[at] == b'"' {
            return Some(at + 1);
        }
        cursor = at + 2;
        if cursor > bytes.len() {
            return None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bumpalo::Bump;
    use mu_core::intern::NameInterner;

    #[test]
    fn test_load_declarations_in_order() {
        let arena = Bump::new();
        let interner = NameInterner::new();
        let builder = AstBuilder::new(&arena, &interner);
        let text = r#"{ "declarations": [
    { "kind": "stack", "name": "net", "description": "shared network" },
    { "kind": "service", "name": "web", "type": "aws/ec2" }
] }"#;

        let mut sink: Vec<Diagnostic> = Vec::new();
        let loaded = load_document(&builder, "net.json", text, &mut sink);
        assert!(sink.is_empty());
        assert_eq!(loaded.declarations.len(), 3);

        let Declaration::Stack(stack) = loaded.declarations[1] else {
            panic!("expected a stack");
        };
        assert_eq!(interner.resolve(stack.name), "net");
        assert_eq!(stack.description, Some("shared network"));
        assert_eq!(&text[stack.node.span.to_range()], "\"net\"");

        let Declaration::Service(service) = loaded.declarations[2] else {
            panic!("expected a service");
        };
        assert_eq!(service.service_type, Some("aws/ec2"));
        assert_eq!(&text[service.node.span.to_range()], "\"web\"");
    }

    #[test]
    fn test_name_equal_to_kind_is_anchored_on_name_key() {
        let object = r#"{"kind":"stack","name":"stack"}"#;
        let range = own_name_literal(object).unwrap();
        assert_eq!(&object[range.clone()], "\"stack\"");
        assert_eq!(range.start, object.find("\"name\"").unwrap() + 7);
    }

    #[test]
    fn test_repeated_names_get_distinct_spans() {
        let arena = Bump::new();
        let interner = NameInterner::new();
        let builder = AstBuilder::new(&arena, &interner);
        let text = r#"{"declarations":[{"kind":"stack","name":"a"},{"kind":"service","name":"a"}]}"#;

        let mut sink: Vec<Diagnostic> = Vec::new();
        let loaded = load_document(&builder, "a.json", text, &mut sink);
        let first = loaded.declarations[1];
        let second = loaded.declarations[2];
        let (Declaration::Stack(first), Declaration::Service(second)) = (first, second) else {
            panic!("expected a stack then a service");
        };
        assert!(second.node.span.start > first.node.span.start);
        assert_eq!(&text[second.node.span.to_range()], "\"a\"");
    }

    #[test]
    fn test_nested_name_keys_are_skipped() {
        let arena = Bump::new();
        let interner = NameInterner::new();
        let builder = AstBuilder::new(&arena, &interner);
        let text = r#"{"declarations":[
  {"kind":"stack","meta":{"name":"net","tags":[{"name":"x"}]},"name":"net"},
  {"kind":"service","name":"web"}
]}"#;

        let mut sink: Vec<Diagnostic> = Vec::new();
        let loaded = load_document(&builder, "meta.json", text, &mut sink);
        assert!(sink.is_empty());

        let Declaration::Stack(stack) = loaded.declarations[1] else {
            panic!("expected a stack");
        };
        let own = text.rfind(r#""name":"net""#).unwrap() + 7;
        assert_eq!(stack.node.span, TextSpan::new(own as u32, 5));

        let Declaration::Service(service) = loaded.declarations[2] else {
            panic!("expected a service");
        };
        assert_eq!(&text[service.node.span.to_range()], "\"web\"");
        assert_eq!(service.node.location().to_string(), "meta.json(3,28)");
    }

    #[test]
    fn test_escaped_names_span_their_source_literal() {
        let object = r#"{"kind":"stack","note":"a \"name\": x","name":"we\"b"}"#;
        let range = own_name_literal(object).unwrap();
        assert_eq!(&object[range], r#""we\"b""#);
    }

    #[test]
    fn test_declaration_error_points_into_the_declaration() {
        let arena = Bump::new();
        let interner = NameInterner::new();
        let builder = AstBuilder::new(&arena, &interner);
        let text = "{\"declarations\":[\n  {\"kind\":\"stack\",\"name\":\"ok\"},\n  {\"kind\":\"function\",\"name\":\"f\"}\n]}";

        let mut sink: Vec<Diagnostic> = Vec::new();
        let loaded = load_document(&builder, "odd.json", text, &mut sink);
        assert_eq!(loaded.declarations.len(), 1);
        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].location.as_ref().and_then(|l| l.position).map(|p| p.line), Some(2));
    }

    #[test]
    fn test_malformed_manifest_reports() {
        let arena = Bump::new();
        let interner = NameInterner::new();
        let builder = AstBuilder::new(&arena, &interner);

        let mut sink: Vec<Diagnostic> = Vec::new();
        let loaded = load_document(&builder, "bad.json", "{\n  \"declarations\": [\n", &mut sink);
        assert_eq!(loaded.declarations.len(), 1);
        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].code, 1001);
        assert!(sink[0].message_text.starts_with("Document 'bad.json' is not a valid manifest"));
        assert_eq!(sink[0].file(), Some("bad.json"));
    }

    #[test]
    fn test_unknown_kind_reports() {
        let arena = Bump::new();
        let interner = NameInterner::new();
        let builder = AstBuilder::new(&arena, &interner);

        let mut sink: Vec<Diagnostic> = Vec::new();
        load_document(
            &builder,
            "odd.json",
            r#"{"declarations":[{"kind":"function","name":"f"}]}"#,
            &mut sink,
        );
        assert_eq!(sink.len(), 1);
        assert!(sink[0].is_error());
    }

    #[test]
    fn test_empty_object_is_valid() {
        let arena = Bump::new();
        let interner = NameInterner::new();
        let builder = AstBuilder::new(&arena, &interner);

        let mut sink: Vec<Diagnostic> = Vec::new();
        let loaded = load_document(&builder, "empty.json", "{}", &mut sink);
        assert!(sink.is_empty());
        assert_eq!(loaded.declarations, vec![Declaration::Document(loaded.document)]);
    }
}
