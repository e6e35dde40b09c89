//! Shared fixtures for archmap tests

use crate::input::{CodeEntry, DocumentationUnit, FolderEntry, References, VocabularyRegistry};
use crate::model::DocPriority;

/// A folder whose declared and resolved path are the same.
pub fn folder(desc: &str, path: &str) -> FolderEntry {
    FolderEntry {
        desc: desc.to_string(),
        path: Some(path.to_string()),
        resolved_path: Some(path.to_string()),
        path_exists: true,
    }
}

/// A module or export living at `path`.
pub fn code(desc: &str, path: &str) -> CodeEntry {
    CodeEntry {
        desc: desc.to_string(),
        type_signature: None,
        import_path: Some(format!("@app/{}", path.trim_end_matches(".ts"))),
        resolved_path: Some(path.to_string()),
        path_exists: true,
    }
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// A documentation unit referencing folders, modules, exports and terms.
pub fn doc(
    path: &str,
    priority: DocPriority,
    explains: &str,
    refs: [&[&str]; 4],
) -> DocumentationUnit {
    let [folders, modules, exports, terms] = refs;
    DocumentationUnit {
        file_path: path.to_string(),
        format: "markdown".to_string(),
        content: format!("# {}\n\n{}", path, explains),
        references: References {
            folders: names(folders),
            modules: names(modules),
            exports: names(exports),
            terms: names(terms),
        },
        priority,
        explains: explains.to_string(),
    }
}

/// A small web-service style codebase.
///
/// `cache` is declared both as a module and as a term.
pub fn sample_registry() -> VocabularyRegistry {
    let mut registry = VocabularyRegistry::default();

    registry.folders.insert("src".into(), folder("Application sources", "src"));
    registry.folders.insert("api".into(), folder("HTTP API layer", "src/api"));
    registry
        .folders
        .insert("handlers".into(), folder("Request handlers", "src/api/handlers"));
    registry
        .folders
        .insert("storage".into(), folder("Persistence adapters", "src/storage"));
    registry.folders.insert("docs".into(), folder("Project documentation", "docs"));

    registry
        .modules
        .insert("router".into(), code("Routes requests to handlers", "src/api/router.ts"));
    registry
        .modules
        .insert("handler".into(), code("User request handler", "src/api/handlers/user.ts"));
    registry.modules.insert("db".into(), code("Database connection pool", "src/storage/db.ts"));
    registry
        .modules
        .insert("cache".into(), code("In-memory cache module", "src/storage/cache.ts"));

    registry
        .exports
        .insert("createRouter".into(), code("Builds the API router", "src/api/router.ts"));
    registry
        .exports
        .insert("UserHandler".into(), code("Handles user requests", "src/api/handlers/user.ts"));
    registry.exports.insert("openDb".into(), code("Opens the database", "src/storage/db.ts"));
    registry.exports.insert("slugify".into(), code("Slug helper", "src/util/slugify.ts"));
    registry.exports.insert(
        "floating".into(),
        CodeEntry {
            desc: "Export without a location".into(),
            ..CodeEntry::default()
        },
    );

    registry
        .terms
        .insert("cache".into(), "Read-through cache in front of the database".into());
    registry
        .terms
        .insert("tenant".into(), "An isolated customer account".into());

    registry
}

pub fn sample_docs() -> Vec<DocumentationUnit> {
    vec![
        doc(
            "docs/architecture.md",
            DocPriority::Essential,
            "Overall layering of the service",
            [&["src", "api", "storage"], &["router"], &[], &["tenant"]],
        ),
        doc(
            "docs/api-rules.md",
            DocPriority::Constraint,
            "Rules every handler must follow",
            [&["api"], &["handler", "handler"], &["UserHandler", "ghost"], &[]],
        ),
        doc(
            "docs/storage.md",
            DocPriority::Supplementary,
            "How persistence works",
            [&[], &["db", "cache"], &[], &["cache"]],
        ),
        doc(
            "docs/onboarding.md",
            DocPriority::Essential,
            "Where to start reading",
            [&[], &[], &[], &[]],
        ),
    ]
}
