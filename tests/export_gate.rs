use camino::Utf8PathBuf;
use pathsbml::convert::{export_document, export_to_file, import_document, is_fully_connected};
use pathsbml::diagram::{ArcClass, Diagram, Edge, GlyphClass, Node};
use pathsbml::error::ExportError;
use pathsbml::geometry::Point;
use pathsbml::model::{Model, Reaction, SbmlDocument, SpeciesRef};
use pathsbml::xref::StandardRegistry;

fn connected_diagram() -> Diagram {
    let mut model = Model::default();
    model.reactions.push(Reaction {
        id: "R1".into(),
        reactants: vec![SpeciesRef::new("A")],
        products: vec![SpeciesRef::new("B")],
        modifiers: vec![],
    });
    let doc = SbmlDocument {
        level: None,
        version: None,
        notes: None,
        model,
    };
    import_document(&doc, &StandardRegistry)
}

fn dangling_arc() -> Edge {
    Edge::arc(
        ArcClass::Consumption,
        "A",
        "",
        Point::default(),
        Point::default(),
    )
}

#[test]
fn connectivity_holds_for_an_imported_diagram() {
    assert!(is_fully_connected(&connected_diagram()));
}

#[test]
fn empty_endpoint_breaks_connectivity() {
    let mut diagram = connected_diagram();
    diagram.edges.push(dangling_arc());
    assert!(!is_fully_connected(&diagram));
}

#[test]
fn unresolvable_endpoint_breaks_connectivity() {
    let mut diagram = connected_diagram();
    diagram.edges.push(Edge::arc(
        ArcClass::Production,
        "A",
        "NotInTheGraph",
        Point::default(),
        Point::default(),
    ));
    assert!(!is_fully_connected(&diagram));
}

#[test]
fn export_fails_on_broken_connectivity() {
    let mut diagram = connected_diagram();
    diagram.edges.push(dangling_arc());
    match export_document(&diagram) {
        Err(ExportError::GraphInconsistent(_)) => {}
        other => panic!("expected GraphInconsistent, got {other:?}"),
    }
}

#[test]
fn failed_export_leaves_the_target_file_untouched() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = Utf8PathBuf::from_path_buf(dir.path().join("out.sbml")).expect("utf-8 temp path");
    std::fs::write(&path, "sentinel").expect("seed file");

    let mut diagram = connected_diagram();
    diagram.edges.push(dangling_arc());
    assert!(export_to_file(&diagram, &path).is_err());

    let content = std::fs::read_to_string(&path).expect("file still present");
    assert_eq!(content, "sentinel", "no partial document may be written");
}

#[test]
fn connectivity_is_rechecked_after_host_mutation() {
    let mut diagram = connected_diagram();
    assert!(export_document(&diagram).is_ok());

    // The host mutates the graph between export attempts; the gate must
    // re-run rather than trust the earlier pass.
    diagram.edges.push(dangling_arc());
    assert!(export_document(&diagram).is_err());

    diagram.edges.pop();
    assert!(export_document(&diagram).is_ok());
}

#[test]
fn successful_export_writes_a_parseable_document() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = Utf8PathBuf::from_path_buf(dir.path().join("out.sbml")).expect("utf-8 temp path");

    export_to_file(&connected_diagram(), &path).expect("export succeeds");
    let text = std::fs::read_to_string(&path).expect("file written");
    assert!(pathsbml::sbml::looks_like_sbml(&text));

    let reparsed = pathsbml::sbml::read::parse_document(&text).expect("round-trips");
    assert!(reparsed.model.species.contains_key("A"));
    assert!(reparsed.model.species.contains_key("B"));
    assert_eq!(reparsed.model.reactions[0].id, "R1");
}

#[test]
fn nodes_with_empty_ids_are_skipped_not_fatal() {
    let mut diagram = connected_diagram();
    diagram.add_node(Node::data("", GlyphClass::SimpleChemical, 0.0, 0.0));
    let exported = export_document(&diagram).expect("export still succeeds");
    assert_eq!(exported.model.species.len(), 2);
}
