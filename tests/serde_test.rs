use holdfast::{ScopedPtr, SharedPtr, TransferPtr};
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Settings {
    name: String,
    retries: u8,
}

#[derive(Serialize, Deserialize)]
struct Document {
    primary: TransferPtr<Settings>,
    fallback: TransferPtr<Settings>,
    tags: SharedPtr<Vec<String>>,
}

#[test]
fn test_pointers_serialize_as_options() {
    let doc = Document {
        primary: TransferPtr::new(Settings {
            name: "main".into(),
            retries: 3,
        }),
        fallback: TransferPtr::empty(),
        tags: SharedPtr::new(vec!["a".into(), "b".into()]),
    };

    let json = serde_json::to_value(&doc).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "primary": { "name": "main", "retries": 3 },
            "fallback": null,
            "tags": ["a", "b"],
        })
    );
}

#[test]
fn test_pointers_deserialize() {
    let doc: Document = serde_json::from_str(
        r#"{"primary":{"name":"x","retries":1},"fallback":null,"tags":[]}"#,
    )
    .unwrap();

    assert_eq!(doc.primary.name, "x");
    assert!(doc.fallback.is_empty());
    assert!(doc.tags.unique());
    assert_eq!(doc.tags.len(), 0);
}

#[test]
fn test_scoped_round_trip() {
    let p = ScopedPtr::new(Settings {
        name: "scoped".into(),
        retries: 0,
    });
    let json = serde_json::to_string(&p).unwrap();
    let back: ScopedPtr<Settings> = serde_json::from_str(&json).unwrap();
    assert_eq!(back.as_ref(), p.as_ref());
}
