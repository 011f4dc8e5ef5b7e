//! Seed catalog for API tests.
//!
//! Two registries (`jhs`, `interop`), four schemes and enough codes in
//! `interop/numerot` to page through.

#![allow(dead_code)]

use serde_json::{Value, json};

/// Base of every fixture URI.
pub const URI_BASE: &str = "http://uri.suomi.fi/codelist";

/// API base produced by `ServerConfig::for_testing`.
pub const API_BASE: &str = "http://localhost/codelist-api/api/v1";

/// Web base produced by `ServerConfig::for_testing`.
pub const WEB_BASE: &str = "http://localhost/codelist";

/// Number of codes in the `numerot` scheme.
pub const NUMBERED_CODES: usize = 12;

fn registry_doc(code_value: &str, label: &str) -> Value {
    json!({
        "id": format!("registry-{}", code_value),
        "codeValue": code_value,
        "uri": format!("{}/{}", URI_BASE, code_value),
        "prefLabel": {"fi": label},
        "modified": "2018-01-01T00:00:00Z"
    })
}

fn scheme_doc(registry: &str, code_value: &str, label: &str, status: &str, modified: &str) -> Value {
    json!({
        "id": format!("scheme-{}-{}", registry, code_value),
        "codeValue": code_value,
        "uri": format!("{}/{}/{}", URI_BASE, registry, code_value),
        "status": status,
        "prefLabel": {"fi": label, "en": format!("{} (en)", label)},
        "modified": modified,
        "codeRegistry": {"codeValue": registry, "uri": format!("{}/{}", URI_BASE, registry)}
    })
}

fn code_doc(registry: &str, scheme: &str, code_value: &str, label: &str, modified: &str) -> Value {
    json!({
        "id": format!("code-{}-{}-{}", registry, scheme, code_value),
        "codeValue": code_value,
        "uri": format!("{}/{}/{}/code/{}", URI_BASE, registry, scheme, code_value),
        "status": "VALID",
        "prefLabel": {"fi": label},
        "modified": modified,
        "codeScheme": {
            "codeValue": scheme,
            "uri": format!("{}/{}/{}", URI_BASE, registry, scheme),
            "codeRegistry": {"codeValue": registry}
        }
    })
}

/// Builds the seed object accepted by `MemoryBackend::from_seed`.
pub fn seed() -> Value {
    let mut codes = vec![
        code_doc("jhs", "kunta", "091", "Helsinki", "2019-01-01T00:00:00Z"),
        code_doc("jhs", "kunta", "049", "Espoo", "2017-01-01T00:00:00Z"),
        code_doc("jhs", "kunta", "092", "Vantaa", "2018-05-01T00:00:00Z"),
        code_doc("jhs", "luonnos", "x1", "Luonnoskoodi", "2019-02-01T00:00:00Z"),
    ];
    codes.extend((0..NUMBERED_CODES).map(|i| {
        code_doc(
            "interop",
            "numerot",
            &format!("n{:03}", i),
            &format!("Numero {}", i),
            "2018-01-01T00:00:00Z",
        )
    }));

    json!({
        "coderegistry": [
            registry_doc("jhs", "Julkisen hallinnon suositukset"),
            registry_doc("interop", "Yhteentoimivuusalusta"),
        ],
        "codescheme": [
            scheme_doc("jhs", "kunta", "Kunnat", "VALID", "2019-01-01T00:00:00Z"),
            scheme_doc("jhs", "maakunta", "Maakunnat", "DRAFT", "2017-06-01T00:00:00Z"),
            scheme_doc("jhs", "luonnos", "Keskeneräinen", "INCOMPLETE", "2019-02-01T00:00:00Z"),
            scheme_doc("interop", "numerot", "Numerot", "VALID", "2018-01-01T00:00:00Z"),
        ],
        "code": codes
    })
}
