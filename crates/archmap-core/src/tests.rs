//! Unit tests for archmap-core

use crate::test_utils::*;
use crate::*;
use std::collections::HashSet;

fn api_only_registry() -> VocabularyRegistry {
    let mut registry = VocabularyRegistry::default();
    registry.folders.insert(
        "api".to_string(),
        FolderEntry {
            desc: "API layer".to_string(),
            path: Some("src/api".to_string()),
            resolved_path: Some("src/api".to_string()),
            path_exists: true,
        },
    );
    registry
}

fn edges_of(graph: &KnowledgeGraph, kind: EdgeType) -> Vec<(&str, &str)> {
    graph
        .edges_of_type(kind)
        .map(|e| (e.from.as_str(), e.to.as_str()))
        .collect()
}

#[test]
fn test_exact_build_scenario() {
    let graph = build_graph(&api_only_registry(), &[], ".");

    assert_eq!(graph.nodes.folders.len(), 2);
    assert!(graph.root().is_some());
    assert_eq!(graph.metadata.stats.folder_count, 2);
    assert_eq!(graph.metadata.stats.edge_count, 1);
    assert_eq!(graph.metadata.version, SCHEMA_VERSION);

    insta::assert_json_snapshot!(graph.edges, @r###"
    [
      {
        "from": "root",
        "to": "api",
        "type": "contains"
      }
    ]
    "###);
}

#[test]
fn test_folder_node_serialization_shape() {
    let graph = build_graph(&api_only_registry(), &[], ".");

    insta::assert_json_snapshot!(graph.nodes.folders["api"], @r###"
    {
      "type": "folder",
      "id": "api",
      "description": "API layer",
      "path": "src/api",
      "resolvedPath": "src/api",
      "pathExists": true
    }
    "###);
}

#[test]
fn test_membership_scenario() {
    let mut registry = api_only_registry();
    registry.modules.insert(
        "handler".to_string(),
        CodeEntry {
            desc: "x".to_string(),
            resolved_path: Some("src/api/handler.ts".to_string()),
            ..CodeEntry::default()
        },
    );

    let graph = build_graph(&registry, &[], ".");

    assert_eq!(edges_of(&graph, EdgeType::BelongsTo), vec![("handler", "api")]);
}

#[test]
fn test_longest_prefix_wins() {
    let mut registry = VocabularyRegistry::default();
    registry.folders.insert("a".into(), folder("outer", "a"));
    registry.folders.insert("ab".into(), folder("inner", "a/b"));
    registry.modules.insert("c".into(), code("leaf", "a/b/c.x"));

    let graph = build_graph(&registry, &[], ".");

    assert_eq!(edges_of(&graph, EdgeType::BelongsTo), vec![("c", "ab")]);
    let contains: HashSet<_> = edges_of(&graph, EdgeType::Contains).into_iter().collect();
    assert_eq!(contains, HashSet::from([("root", "a"), ("a", "ab")]));
}

#[test]
fn test_prefix_is_segment_aware() {
    let mut registry = VocabularyRegistry::default();
    registry.folders.insert("api".into(), folder("api", "src/api"));
    registry.modules.insert("apis".into(), code("not under api", "src/apis/list.ts"));

    let graph = build_graph(&registry, &[], ".");

    assert_eq!(edges_of(&graph, EdgeType::BelongsTo), vec![("apis", "root")]);
}

#[test]
fn test_root_is_not_outranked_by_short_folder_names() {
    let mut registry = VocabularyRegistry::default();
    registry.folders.insert("a".into(), folder("one letter", "a"));
    registry.folders.insert("b".into(), folder("nested", "a/b"));

    let graph = build_graph(&registry, &[], ".");

    let contains: HashSet<_> = edges_of(&graph, EdgeType::Contains).into_iter().collect();
    assert_eq!(contains, HashSet::from([("root", "a"), ("a", "b")]));
}

#[test]
fn test_sample_graph_counts() {
    let graph = build_graph(&sample_registry(), &sample_docs(), ".");
    let stats = graph.metadata.stats;

    assert_eq!(stats.folder_count, 6);
    assert_eq!(stats.module_count, 4);
    assert_eq!(stats.export_count, 5);
    assert_eq!(stats.term_count, 2);
    assert_eq!(stats.doc_count, 4);
    assert_eq!(graph.edges_of_type(EdgeType::References).count(), 11);
    assert_eq!(graph.edges_of_type(EdgeType::Contains).count(), 5);
    assert_eq!(graph.edges_of_type(EdgeType::BelongsTo).count(), 8);
    assert_eq!(stats.edge_count, 24);
}

#[test]
fn test_sample_hierarchy() {
    let graph = build_graph(&sample_registry(), &sample_docs(), ".");

    assert_eq!(
        edges_of(&graph, EdgeType::Contains),
        vec![
            ("src", "api"),
            ("root", "docs"),
            ("api", "handlers"),
            ("root", "src"),
            ("src", "storage"),
        ]
    );
}

#[test]
fn test_export_membership() {
    let graph = build_graph(&sample_registry(), &sample_docs(), ".");
    let belongs: HashSet<_> = edges_of(&graph, EdgeType::BelongsTo).into_iter().collect();

    // Same file as a module.
    assert!(belongs.contains(&("UserHandler", "handler")));
    assert!(belongs.contains(&("createRouter", "router")));
    assert!(belongs.contains(&("openDb", "db")));
    // No module in that file, so the closest folder.
    assert!(belongs.contains(&("slugify", "src")));
    // No location, no edge.
    assert!(!belongs.iter().any(|(from, _)| *from == "floating"));
}

#[test]
fn test_belongs_to_has_single_target() {
    let graph = build_graph(&sample_registry(), &sample_docs(), ".");
    let mut seen = HashSet::new();
    for edge in graph.edges_of_type(EdgeType::BelongsTo) {
        assert!(seen.insert(edge.from.as_str()), "{} has two owners", edge.from);
    }
}

#[test]
fn test_references_are_deduplicated_and_unknown_names_dropped() {
    let graph = build_graph(&sample_registry(), &sample_docs(), ".");
    let from_rules: Vec<_> = graph
        .edges_of_type(EdgeType::References)
        .filter(|e| e.from == "docs/api-rules.md")
        .map(|e| e.to.as_str())
        .collect();

    assert_eq!(from_rules, vec!["api", "handler", "UserHandler"]);
}

#[test]
fn test_no_dangling_edges() {
    let graph = build_graph(&sample_registry(), &sample_docs(), ".");
    for edge in &graph.edges {
        assert!(graph.contains_id(&edge.from), "dangling source {}", edge.from);
        assert!(graph.contains_id(&edge.to), "dangling target {}", edge.to);
    }
}

#[test]
fn test_forest_invariant() {
    let graph = build_graph(&sample_registry(), &sample_docs(), ".");
    let structure = StructureGraph::from_graph(&graph);

    for id in graph.nodes.folders.keys() {
        assert!(structure.parent_folders(id).len() <= 1);
        let ancestors = structure.ancestors(id);
        let unique: HashSet<_> = ancestors.iter().collect();
        assert_eq!(unique.len(), ancestors.len());
        if id != ROOT_FOLDER_ID {
            assert_eq!(ancestors.last().map(String::as_str), Some(ROOT_FOLDER_ID));
        }
    }
    assert!(graph.validate().is_clean());
}

#[test]
fn test_build_is_deterministic() {
    let first = build_graph(&sample_registry(), &sample_docs(), ".");
    let second = build_graph(&sample_registry(), &sample_docs(), ".");

    assert_eq!(
        serde_json::to_string(&first.nodes).unwrap(),
        serde_json::to_string(&second.nodes).unwrap()
    );
    assert_eq!(
        serde_json::to_string(&first.edges).unwrap(),
        serde_json::to_string(&second.edges).unwrap()
    );
}

#[test]
fn test_duplicate_path_tie_break_is_stable() {
    let mut registry = VocabularyRegistry::default();
    registry.folders.insert("zeta".into(), folder("second", "lib"));
    registry.folders.insert("alpha".into(), folder("first", "lib"));
    registry.folders.insert("sub".into(), folder("nested", "lib/sub"));
    registry.modules.insert("m".into(), code("module", "lib/m.ts"));

    let graph = build_graph(&registry, &[], ".");
    let contains: HashSet<_> = edges_of(&graph, EdgeType::Contains).into_iter().collect();

    assert!(contains.contains(&("alpha", "sub")));
    assert!(!contains.contains(&("alpha", "zeta")));
    assert!(!contains.contains(&("zeta", "alpha")));
    assert_eq!(edges_of(&graph, EdgeType::BelongsTo), vec![("m", "alpha")]);
}

#[test]
fn test_root_collision_is_skipped() {
    let mut registry = VocabularyRegistry::default();
    registry.folders.insert(ROOT_FOLDER_ID.into(), folder("impostor", "elsewhere"));

    let graph = build_graph(&registry, &[], ".");

    assert_eq!(graph.nodes.folders.len(), 1);
    assert_eq!(graph.root().map(|r| r.description.as_str()), Some("Project root"));
}

#[test]
fn test_unlocated_folder_has_no_parent() {
    let mut registry = VocabularyRegistry::default();
    registry.folders.insert(
        "virtual".into(),
        FolderEntry {
            desc: "Declared without a location".into(),
            ..FolderEntry::default()
        },
    );

    let graph = build_graph(&registry, &[], ".");

    assert!(graph.edges.is_empty());
}

#[test]
fn test_absolute_paths_are_made_portable() {
    let mut registry = VocabularyRegistry::default();
    registry.folders.insert("api".into(), folder("api", "/work/repo/src/api"));
    registry.modules.insert("h".into(), code("handler", "/work/repo/src/api/h.ts"));
    let docs = vec![doc(
        "/work/repo/docs/a.md",
        DocPriority::Supplementary,
        "about api",
        [&["api"], &[], &[], &[]],
    )];

    let graph = build_graph(&registry, &docs, "/work/repo");

    assert_eq!(graph.nodes.folders["api"].resolved_path.as_deref(), Some("src/api"));
    assert_eq!(graph.nodes.folders["api"].path.as_deref(), Some("/work/repo/src/api"));
    assert!(graph.nodes.docs.contains_key("docs/a.md"));
    assert_eq!(edges_of(&graph, EdgeType::BelongsTo), vec![("h", "api")]);
    assert_eq!(graph.metadata.root_path, "/work/repo");
}

#[test]
fn test_duplicate_doc_units_keep_the_later_one() {
    let docs = vec![
        doc("docs/a.md", DocPriority::Essential, "first", [&["api"], &[], &[], &[]]),
        doc("docs/a.md", DocPriority::Constraint, "second", [&[], &[], &[], &[]]),
    ];

    let graph = build_graph(&api_only_registry(), &docs, ".");

    assert_eq!(graph.nodes.docs.len(), 1);
    assert_eq!(graph.nodes.docs["docs/a.md"].explains, "second");
    assert_eq!(graph.edges_of_type(EdgeType::References).count(), 0);
}

#[test]
fn test_lookup_priority_across_categories() {
    let graph = build_graph(&sample_registry(), &sample_docs(), ".");

    assert_eq!(graph.find("cache").map(|n| n.kind()), Some(NodeKind::Module));
    assert_eq!(
        graph.node(NodeKind::Term, "cache").map(|n| n.kind()),
        Some(NodeKind::Term)
    );
}

#[test]
fn test_structure_children() {
    let graph = build_graph(&sample_registry(), &sample_docs(), ".");
    let structure = StructureGraph::from_graph(&graph);

    let children: Vec<_> = structure
        .children("api")
        .into_iter()
        .map(|n| (n.kind, n.id.as_str()))
        .collect();
    assert_eq!(
        children,
        vec![(NodeKind::Folder, "handlers"), (NodeKind::Module, "router")]
    );

    let folders: Vec<_> = structure
        .child_folders(ROOT_FOLDER_ID)
        .into_iter()
        .map(|n| n.id.as_str())
        .collect();
    assert_eq!(folders, vec!["docs", "src"]);
}

#[test]
fn test_ancestors_climb_through_owners() {
    let graph = build_graph(&sample_registry(), &sample_docs(), ".");
    let structure = StructureGraph::from_graph(&graph);

    let folders = vec!["handlers", "api", "src", "root"];
    assert_eq!(structure.ancestors("handler"), folders);
    assert_eq!(structure.ancestors("UserHandler"), folders);
    assert_eq!(structure.ancestors("handlers"), folders[1..].to_vec());
    assert_eq!(structure.ancestors("slugify"), vec!["src", "root"]);
    assert_eq!(structure.owner("UserHandler").map(|n| n.id.as_str()), Some("handler"));
    assert!(structure.owner("api").is_none());
    assert!(structure.ancestors("floating").is_empty());
}

#[test]
fn test_validate_hand_edited_graph() {
    let mut graph = build_graph(&sample_registry(), &sample_docs(), ".");
    graph.nodes.folders.remove(ROOT_FOLDER_ID);
    graph.edges.push(Edge::new("api", "src", EdgeType::Contains));
    graph.edges.push(Edge::new("storage", "handlers", EdgeType::Contains));
    graph.edges.push(Edge::new("docs/nowhere.md", "api", EdgeType::References));

    let report = graph.validate();

    assert!(report.missing_root);
    assert!(report.contains_cycle);
    assert_eq!(report.multi_parent_folders, vec!["handlers".to_string()]);
    // Both contains edges out of the removed root, plus the injected reference.
    assert_eq!(report.dangling_edges.len(), 3);
    assert!(!report.is_clean());
}

#[test]
fn test_store_round_trip() {
    let dir = tempfile::TempDir::new().unwrap();
    let graph = build_graph(&sample_registry(), &sample_docs(), ".");

    assert!(load_graph(dir.path()).unwrap().is_none());

    let path = save_graph(&graph, dir.path()).unwrap();
    assert!(path.ends_with(GRAPH_FILE));

    let loaded = load_graph(dir.path()).unwrap().unwrap();
    assert_eq!(loaded, graph);

    clear_store(dir.path()).unwrap();
    assert!(!store_dir(dir.path()).exists());
}

#[test]
fn test_graph_metadata_serialization() {
    let graph = build_graph(&api_only_registry(), &[], ".");
    let json = serde_json::to_value(&graph).unwrap();

    assert_eq!(json["metadata"]["stats"]["folderCount"], 2);
    assert_eq!(json["metadata"]["rootPath"], ".");
    assert!(json["metadata"]["generatedAt"].is_string());
    assert!(json["nodes"]["folders"]["root"].is_object());
    assert!(json["nodes"]["docs"].is_object());
}
