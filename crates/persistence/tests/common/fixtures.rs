//! Catalog fixtures for persistence tests.
//!
//! The seeded catalog has two registries (`jhs`, `interop`), three schemes
//! under `jhs` and a scheme with many codes for pagination tests.

#![allow(dead_code)]

use std::sync::Arc;

use serde_json::{Value, json};

use codelist_persistence::ResourceRepository;
use codelist_persistence::backends::memory::MemoryBackend;

/// Base of every fixture URI.
pub const URI_BASE: &str = "http://uri.suomi.fi/codelist";

/// Number of codes in the `numerot` scheme.
pub const NUMBERED_CODES: usize = 23;

/// Builds a registry document.
pub fn registry_doc(code_value: &str, label: &str) -> Value {
    json!({
        "id": format!("registry-{}", code_value),
        "codeValue": code_value,
        "uri": format!("{}/{}", URI_BASE, code_value),
        "prefLabel": {"fi": label},
        "modified": "2018-01-01T00:00:00Z"
    })
}

/// Builds a scheme document.
pub fn scheme_doc(
    registry: &str,
    code_value: &str,
    label: &str,
    status: &str,
    modified: &str,
) -> Value {
    json!({
        "id": format!("scheme-{}-{}", registry, code_value),
        "codeValue": code_value,
        "uri": format!("{}/{}/{}", URI_BASE, registry, code_value),
        "status": status,
        "prefLabel": {"fi": label, "en": format!("{} (en)", label)},
        "description": {"fi": format!("Kuvaus: {}", label)},
        "modified": modified,
        "codeRegistry": {"codeValue": registry, "uri": format!("{}/{}", URI_BASE, registry)}
    })
}

/// Builds a code document.
pub fn code_doc(
    registry: &str,
    scheme: &str,
    code_value: &str,
    label: &str,
    modified: &str,
) -> Value {
    json!({
        "id": format!("code-{}-{}-{}", registry, scheme, code_value),
        "codeValue": code_value,
        "uri": format!("{}/{}/{}/code/{}", URI_BASE, registry, scheme, code_value),
        "status": "VALID",
        "prefLabel": {"fi": label, "sv": format!("{} sv", label)},
        "modified": modified,
        "codeScheme": {
            "codeValue": scheme,
            "uri": format!("{}/{}/{}", URI_BASE, registry, scheme),
            "codeRegistry": {"codeValue": registry}
        }
    })
}

/// Creates an in-memory backend with the fixture catalog.
pub fn seeded_backend() -> MemoryBackend {
    let backend = MemoryBackend::new();

    backend.insert_many(
        "coderegistry",
        vec![
            registry_doc("jhs", "Julkisen hallinnon suositukset"),
            registry_doc("interop", "Yhteentoimivuusalusta"),
        ],
    );

    backend.insert_many(
        "codescheme",
        vec![
            scheme_doc("jhs", "kunta", "Kunnat", "VALID", "2019-01-01T00:00:00Z"),
            scheme_doc("jhs", "maakunta", "Maakunnat", "DRAFT", "2017-06-01T00:00:00Z"),
            scheme_doc("jhs", "luonnos", "Keskeneräinen", "INCOMPLETE", "2019-02-01T00:00:00Z"),
            scheme_doc("interop", "numerot", "Numerot", "VALID", "2018-01-01T00:00:00Z"),
        ],
    );

    backend.insert_many(
        "code",
        vec![
            code_doc("jhs", "kunta", "091", "Helsinki", "2019-01-01T00:00:00Z"),
            code_doc("jhs", "kunta", "049", "Espoo", "2017-01-01T00:00:00Z"),
            code_doc("jhs", "kunta", "092", "Vantaa", "2018-05-01T00:00:00Z"),
            code_doc("jhs", "maakunta", "01", "Uusimaa", "2018-05-01T00:00:00Z"),
        ],
    );

    backend.insert_many(
        "code",
        (0..NUMBERED_CODES).map(|i| {
            code_doc(
                "interop",
                "numerot",
                &format!("n{:03}", i),
                &format!("Numero {}", i),
                "2018-01-01T00:00:00Z",
            )
        }),
    );

    backend
}

/// Creates a repository over the fixture catalog.
pub fn seeded_repository() -> ResourceRepository<MemoryBackend> {
    ResourceRepository::new(Arc::new(seeded_backend()))
}
