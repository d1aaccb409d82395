use quire_core::{
    Attachment, AttachmentKind, AttachmentPayloadError, AttachmentSlot, BinaryAttachmentKind,
    DetachError, Entry, EntryPatch, EntryValidationError, TextAttachmentKind,
};
use serde_json::json;
use std::collections::BTreeSet;

fn text_attachment(name: &str, contents: &str) -> Attachment {
    Attachment::from_bytes(
        AttachmentKind::Text(TextAttachmentKind::PlainText),
        name,
        contents.as_bytes().to_vec(),
    )
    .expect("plain text bytes should build an attachment")
}

fn binary_attachment(name: &str, contents: &[u8]) -> Attachment {
    Attachment::from_bytes(
        AttachmentKind::Binary(BinaryAttachmentKind::RasterPng),
        name,
        contents.to_vec(),
    )
    .expect("binary bytes should build an attachment")
}

#[test]
fn new_entry_has_empty_defaults() {
    let entry = Entry::new();

    assert!(!entry.id.is_nil());
    assert!(entry.title.is_empty());
    assert!(entry.book_name.is_empty());
    assert!(entry.book_author.is_empty());
    assert!(entry.url.is_empty());
    assert!(entry.memo.is_empty());
    assert!(entry.keywords.is_empty());
    assert!(entry.text_attachments.is_empty());
    assert!(entry.binary_attachments.is_empty());
    assert_eq!(entry.created_at, entry.last_edited);
}

#[test]
fn validate_rejects_empty_title() {
    let entry = Entry::new();
    assert_eq!(entry.validate(), Err(EntryValidationError::EmptyTitle));

    let titled = entry.apply(EntryPatch {
        title: Some("Borrowing chapter".to_string()),
        ..EntryPatch::default()
    });
    assert_eq!(titled.validate(), Ok(()));
}

#[test]
fn apply_is_a_pure_transform() {
    let entry = Entry::new();
    let keywords: BTreeSet<String> = ["rust", "ownership"]
        .iter()
        .map(|keyword| keyword.to_string())
        .collect();

    let patched = entry.apply(EntryPatch {
        title: Some("A".to_string()),
        book_name: Some("The Book".to_string()),
        book_author: Some("Steve".to_string()),
        url: Some("https://example.com".to_string()),
        memo: Some("# hi".to_string()),
        keywords: Some(keywords.clone()),
    });

    // The original value is untouched.
    assert!(entry.title.is_empty());
    assert!(entry.memo.is_empty());

    assert_eq!(patched.id, entry.id);
    assert_eq!(patched.title, "A");
    assert_eq!(patched.book_name, "The Book");
    assert_eq!(patched.book_author, "Steve");
    assert_eq!(patched.url, "https://example.com");
    assert_eq!(patched.memo, "# hi");
    assert_eq!(patched.keywords, keywords);
    // apply never stamps edit time.
    assert_eq!(patched.last_edited, entry.last_edited);
}

#[test]
fn empty_patch_changes_nothing() {
    let entry = Entry::new().apply(EntryPatch {
        title: Some("kept".to_string()),
        ..EntryPatch::default()
    });
    let unchanged = entry.apply(EntryPatch::default());
    assert_eq!(unchanged, entry);
}

#[test]
fn attach_prepends_per_storage_mode() {
    let entry = Entry::new()
        .attach(text_attachment("a.txt", "first"))
        .attach(text_attachment("b.txt", "second"))
        .attach(binary_attachment("pic.png", &[1, 2, 3]));

    let text_names: Vec<&str> = entry
        .text_attachments
        .iter()
        .map(|attachment| attachment.file_name.as_str())
        .collect();
    assert_eq!(text_names, vec!["b.txt", "a.txt"]);
    assert_eq!(entry.binary_attachments.len(), 1);
    assert_eq!(entry.binary_attachments[0].contents, vec![1, 2, 3]);
}

#[test]
fn attach_does_not_stamp_last_edited() {
    let entry = Entry::new();
    let attached = entry.attach(text_attachment("a.txt", "x"));
    assert_eq!(attached.last_edited, entry.last_edited);
}

#[test]
fn detach_removes_by_position() {
    let entry = Entry::new()
        .attach(text_attachment("a.txt", "first"))
        .attach(text_attachment("b.txt", "second"));

    let detached = entry
        .detach(AttachmentSlot::Text, 0)
        .expect("index 0 should exist");
    assert_eq!(detached.text_attachments.len(), 1);
    assert_eq!(detached.text_attachments[0].file_name, "a.txt");
    // Source entry is untouched.
    assert_eq!(entry.text_attachments.len(), 2);
}

#[test]
fn detach_out_of_range_reports_and_changes_nothing() {
    let entry = Entry::new().attach(binary_attachment("pic.png", &[9]));

    let err = entry
        .detach(AttachmentSlot::Binary, 3)
        .expect_err("index 3 does not exist");
    assert_eq!(
        err,
        DetachError::IndexOutOfRange {
            slot: AttachmentSlot::Binary,
            index: 3,
            len: 1,
        }
    );
    assert_eq!(entry.binary_attachments.len(), 1);
}

#[test]
fn commit_edit_only_touches_last_edited() {
    let entry = Entry::new().apply(EntryPatch {
        title: Some("A".to_string()),
        ..EntryPatch::default()
    });
    let committed = entry.commit_edit();

    assert!(committed.last_edited >= entry.last_edited);
    assert_eq!(committed.created_at, entry.created_at);
    assert_eq!(committed.title, entry.title);
}

#[test]
fn kind_tags_serialize_internally_tagged() {
    assert_eq!(
        serde_json::to_value(TextAttachmentKind::SourceCode {
            language: "rust".to_string()
        })
        .expect("kind should serialize"),
        json!({ "type": "source_code", "language": "rust" })
    );
    assert_eq!(
        serde_json::to_value(TextAttachmentKind::StructuredData {
            format: "toml".to_string()
        })
        .expect("kind should serialize"),
        json!({ "type": "structured_data", "format": "toml" })
    );
    assert_eq!(
        serde_json::to_value(TextAttachmentKind::Unspecified).expect("kind should serialize"),
        json!({ "type": "unspecified" })
    );
    assert_eq!(
        serde_json::to_value(BinaryAttachmentKind::DocumentPdf).expect("kind should serialize"),
        json!({ "type": "document_pdf" })
    );
}

#[test]
fn unknown_kind_tags_deserialize_to_fallbacks() {
    let text: TextAttachmentKind = serde_json::from_value(json!({ "type": "hologram" }))
        .expect("unknown text kind tag should fall back");
    assert_eq!(text, TextAttachmentKind::Unspecified);

    let binary: BinaryAttachmentKind = serde_json::from_value(json!({ "type": "voxel_grid" }))
        .expect("unknown binary kind tag should fall back");
    assert_eq!(binary, BinaryAttachmentKind::Unknown);
}

#[test]
fn text_attachment_rejects_invalid_utf8() {
    let err = Attachment::from_bytes(
        AttachmentKind::Text(TextAttachmentKind::PlainText),
        "broken.txt",
        vec![0xff, 0xfe, 0x00],
    )
    .expect_err("invalid UTF-8 must be rejected for text storage");
    assert_eq!(
        err,
        AttachmentPayloadError::NotUtf8 {
            file_name: "broken.txt".to_string()
        }
    );
}
