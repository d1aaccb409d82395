use quire_core::{classify, AttachmentKind, BinaryAttachmentKind, StorageMode, TextAttachmentKind};
use std::path::Path;

fn source_code(language: &str) -> AttachmentKind {
    AttachmentKind::Text(TextAttachmentKind::SourceCode {
        language: language.to_string(),
    })
}

fn structured_data(format: &str) -> AttachmentKind {
    AttachmentKind::Text(TextAttachmentKind::StructuredData {
        format: format.to_string(),
    })
}

#[test]
fn recognized_binary_extensions() {
    let cases = [
        ("shot.png", BinaryAttachmentKind::RasterPng),
        ("photo.jpg", BinaryAttachmentKind::RasterJpeg),
        ("photo.jpeg", BinaryAttachmentKind::RasterJpeg),
        ("paper.pdf", BinaryAttachmentKind::DocumentPdf),
    ];
    for (name, expected) in cases {
        let (kind, mode) = classify(Path::new(name));
        assert_eq!(kind, AttachmentKind::Binary(expected), "path: {name}");
        assert_eq!(mode, StorageMode::Binary, "path: {name}");
    }
}

#[test]
fn recognized_text_extensions() {
    let cases = [
        (
            "notes.txt",
            AttachmentKind::Text(TextAttachmentKind::PlainText),
        ),
        ("main.rs", source_code("rust")),
        ("lib.c", source_code("c")),
        ("impl.cpp", source_code("cpp")),
        ("impl.cxx", source_code("cpp")),
        ("mod.ml", source_code("ocaml")),
        ("mod.mli", source_code("ocaml")),
        ("doc.saty", source_code("satysfi")),
        ("pkg.satyh", source_code("satysfi")),
        (
            "thesis.tex",
            AttachmentKind::Text(TextAttachmentKind::MarkupDocument),
        ),
        (
            "readme.md",
            AttachmentKind::Text(TextAttachmentKind::MarkupDocument),
        ),
        ("config.json", structured_data("json")),
        ("Cargo.toml", structured_data("toml")),
        ("ci.yaml", structured_data("yaml")),
        ("ci.yml", structured_data("yaml")),
    ];
    for (name, expected) in cases {
        let (kind, mode) = classify(Path::new(name));
        assert_eq!(kind, expected, "path: {name}");
        assert_eq!(mode, StorageMode::Text, "path: {name}");
    }
}

#[test]
fn extension_match_is_case_insensitive() {
    let (kind, mode) = classify(Path::new("SCAN.PNG"));
    assert_eq!(kind, AttachmentKind::Binary(BinaryAttachmentKind::RasterPng));
    assert_eq!(mode, StorageMode::Binary);

    let (kind, _mode) = classify(Path::new("Main.RS"));
    assert_eq!(kind, source_code("rust"));
}

#[test]
fn unknown_extensions_degrade_to_unspecified_text() {
    for name in ["data.bin", "archive.tar.gz", "noextension", ".hidden"] {
        let (kind, mode) = classify(Path::new(name));
        assert_eq!(
            kind,
            AttachmentKind::Text(TextAttachmentKind::Unspecified),
            "path: {name}"
        );
        assert_eq!(mode, StorageMode::Text, "path: {name}");
    }
}

#[test]
fn classification_is_idempotent() {
    for name in ["a.png", "b.rs", "c.unknown", "d.yaml"] {
        let path = Path::new(name);
        assert_eq!(classify(path), classify(path), "path: {name}");
    }
}
