use pathsbml::convert::{export_document, import_document};
use pathsbml::diagram::{ArcClass, Diagram, GlyphClass, NodeKind};
use pathsbml::model::{
    CvTerm, Model, QualModel, Qualifier, QualitativeSpecies, Reaction, SbmlDocument, Sign, Species,
    SpeciesRef, Transition, TransitionInput, TransitionOutput,
};
use pathsbml::xref::StandardRegistry;

fn doc(model: Model) -> SbmlDocument {
    SbmlDocument {
        level: None,
        version: None,
        notes: None,
        model,
    }
}

fn species(id: &str) -> Species {
    Species {
        id: id.to_string(),
        ..Default::default()
    }
}

fn reaction(id: &str, reactants: &[&str], products: &[&str], modifiers: &[&str]) -> Reaction {
    Reaction {
        id: id.to_string(),
        reactants: reactants.iter().map(|s| SpeciesRef::new(*s)).collect(),
        products: products.iter().map(|s| SpeciesRef::new(*s)).collect(),
        modifiers: modifiers.iter().map(|s| SpeciesRef::new(*s)).collect(),
    }
}

fn import(model: Model) -> Diagram {
    import_document(&doc(model), &StandardRegistry)
}

fn arc_refs(diagram: &Diagram, class: ArcClass) -> Vec<(String, String)> {
    diagram
        .arcs()
        .filter(|e| e.arc_class() == Some(class))
        .map(|e| (e.start_ref.clone(), e.end_ref.clone()))
        .collect()
}

// ── Import ─────────────────────────────────────────────────────────────────

#[test]
fn one_reaction_imports_to_process_node_with_port_arcs() {
    let mut model = Model::default();
    model.species.insert("A".into(), species("A"));
    model.species.insert("B".into(), species("B"));
    model.reactions.push(reaction("R1", &["A"], &["B"], &[]));

    let diagram = import(model);

    assert_eq!(diagram.nodes().count(), 3);
    let r1 = diagram.node("R1").expect("process node");
    assert!(matches!(r1.kind, NodeKind::Process(_)));
    assert!(matches!(diagram.node("A").unwrap().kind, NodeKind::Data));
    assert!(matches!(diagram.node("B").unwrap().kind, NodeKind::Data));

    // One consumption arc into the reactant-side port, one production arc
    // out of the product-side port, plus the two structural port links.
    assert_eq!(
        arc_refs(&diagram, ArcClass::Consumption),
        vec![("A".to_string(), "R1.reactant".to_string())]
    );
    assert_eq!(
        arc_refs(&diagram, ArcClass::Production),
        vec![("R1.product".to_string(), "B".to_string())]
    );
    assert_eq!(diagram.edges.iter().filter(|e| e.is_port()).count(), 2);
    assert_eq!(diagram.arcs().count(), 2);
}

#[test]
fn reactants_and_products_flank_the_process_node() {
    let mut model = Model::default();
    model.reactions.push(reaction("R1", &["A"], &["B"], &[]));

    let diagram = import(model);
    let r1 = diagram.node("R1").unwrap().bounds;
    let a = diagram.node("A").unwrap().bounds;
    let b = diagram.node("B").unwrap().bounds;
    assert_eq!((a.cx, a.cy), (r1.cx - 80.0, r1.cy));
    assert_eq!((b.cx, b.cy), (r1.cx + 80.0, r1.cy));
}

#[test]
fn modifiers_sit_above_and_attach_to_the_process_node_itself() {
    let mut model = Model::default();
    model.reactions.push(reaction("R1", &["A"], &["B"], &["M"]));

    let diagram = import(model);
    let m = diagram.node("M").expect("modifier node");
    assert_eq!(m.glyph_class, GlyphClass::Macromolecule);
    let r1 = diagram.node("R1").unwrap().bounds;
    assert_eq!((m.bounds.cx, m.bounds.cy), (r1.cx, r1.cy - 80.0));

    // The catalysis arc ends at the process node, not at a port.
    assert_eq!(
        arc_refs(&diagram, ArcClass::Catalysis),
        vec![("M".to_string(), "R1".to_string())]
    );
}

#[test]
fn chained_reactions_flow_left_to_right() {
    let mut model = Model::default();
    model.reactions.push(reaction("R1", &["A"], &["B"], &[]));
    model.reactions.push(reaction("R2", &["B"], &["C"], &[]));

    let diagram = import(model);
    let b = diagram.node("B").unwrap().bounds;
    let r2 = diagram.node("R2").unwrap().bounds;
    // R2 has an already-materialized reactant, so it goes 100 units to its
    // right instead of taking the next cursor slot.
    assert_eq!((r2.cx, r2.cy), (b.cx + 100.0, b.cy));
}

#[test]
fn species_outside_any_reaction_are_swept_in() {
    let mut model = Model::default();
    model.species.insert("A".into(), species("A"));
    model.species.insert("Lone".into(), species("Lone"));
    model.reactions.push(reaction("R1", &["A"], &[], &[]));

    let diagram = import(model);
    let lone = diagram.node("Lone").expect("unreferenced species still gets a glyph");
    assert_eq!(lone.glyph_class, GlyphClass::BiologicalActivity);
    assert!(matches!(lone.kind, NodeKind::Data));
}

#[test]
fn species_annotations_resolve_to_node_xrefs() {
    let mut model = Model::default();
    let mut a = species("A");
    a.annotations.push(CvTerm {
        qualifier: Qualifier::Is,
        resources: vec!["http://identifiers.org/chebi/24996".into()],
    });
    let mut b = species("B");
    b.annotations.push(CvTerm {
        qualifier: Qualifier::Is,
        resources: vec!["http://identifiers.org/nosuchdb/1".into()],
    });
    model.species.insert("A".into(), a);
    model.species.insert("B".into(), b);
    model.reactions.push(reaction("R1", &["A"], &["B"], &[]));

    let diagram = import(model);
    let xref = diagram.node("A").unwrap().xref.as_ref().expect("chebi xref");
    assert_eq!(xref.datasource.full_name, "ChEBI");
    // Unresolvable annotations never abort the conversion.
    assert!(diagram.node("B").unwrap().xref.is_none());
}

#[test]
fn layout_extension_overrides_guessed_positions() {
    use pathsbml::geometry::Rect;
    use pathsbml::model::{LayoutModel, SpeciesGlyphBox};

    let mut model = Model::default();
    model.species.insert("A".into(), species("A"));
    model.layout = Some(LayoutModel {
        species_glyphs: vec![SpeciesGlyphBox {
            species: "A".into(),
            bounds: Rect::from_top_left(10.0, 20.0, 100.0, 40.0),
        }],
    });

    let diagram = import(model);
    let a = diagram.node("A").unwrap().bounds;
    assert_eq!((a.cx, a.cy, a.width, a.height), (60.0, 40.0, 100.0, 40.0));
}

// ── Qualitative layer ──────────────────────────────────────────────────────

fn transition(id: &str, inputs: &[(&str, Sign)], outputs: &[&str]) -> Transition {
    Transition {
        id: id.to_string(),
        inputs: inputs
            .iter()
            .map(|(qs, sign)| TransitionInput {
                qualitative_species: qs.to_string(),
                sign: *sign,
            })
            .collect(),
        outputs: outputs
            .iter()
            .map(|qs| TransitionOutput {
                qualitative_species: qs.to_string(),
            })
            .collect(),
    }
}

#[test]
fn transitions_map_signs_to_influence_arcs() {
    let mut model = Model::default();
    model.qual = Some(QualModel {
        species: ["Q1", "Q2", "Q3"]
            .iter()
            .map(|id| QualitativeSpecies {
                id: id.to_string(),
                ..Default::default()
            })
            .collect(),
        transitions: vec![
            transition("t1", &[("Q1", Sign::Positive)], &["Q2"]),
            transition("t2", &[("Q2", Sign::Negative)], &["Q3"]),
            transition("t3", &[("Q3", Sign::Dual)], &["Q1"]),
        ],
    });

    let diagram = import(model);
    assert!(matches!(diagram.node("Q1").unwrap().kind, NodeKind::State));
    assert_eq!(
        arc_refs(&diagram, ArcClass::PositiveInfluence),
        vec![("Q1".to_string(), "Q2".to_string())]
    );
    assert_eq!(
        arc_refs(&diagram, ArcClass::NegativeInfluence),
        vec![("Q2".to_string(), "Q3".to_string())]
    );
    assert_eq!(
        arc_refs(&diagram, ArcClass::UnknownInfluence),
        vec![("Q3".to_string(), "Q1".to_string())]
    );
}

#[test]
fn transitions_with_wrong_arity_are_skipped() {
    let mut model = Model::default();
    model.qual = Some(QualModel {
        species: ["Q1", "Q2", "Q3"]
            .iter()
            .map(|id| QualitativeSpecies {
                id: id.to_string(),
                ..Default::default()
            })
            .collect(),
        transitions: vec![
            transition("bad", &[("Q1", Sign::Positive), ("Q2", Sign::Positive)], &["Q3"]),
            transition("good", &[("Q1", Sign::Positive)], &["Q2"]),
        ],
    });

    let diagram = import(model);
    // The 2-input transition produced no arc; the 1-in/1-out one converted.
    assert_eq!(diagram.arcs().count(), 1);
    assert_eq!(
        arc_refs(&diagram, ArcClass::PositiveInfluence),
        vec![("Q1".to_string(), "Q2".to_string())]
    );
}

// ── Export / round-trip ────────────────────────────────────────────────────

#[test]
fn export_recovers_reaction_membership_through_the_ports() {
    let mut model = Model::default();
    model.species.insert("A".into(), species("A"));
    model.species.insert("B".into(), species("B"));
    model.reactions.push(reaction("R1", &["A"], &["B"], &[]));

    let diagram = import(model);
    let exported = export_document(&diagram).expect("export succeeds");

    let mut ids: Vec<_> = exported.model.species.keys().cloned().collect();
    ids.sort();
    assert_eq!(ids, vec!["A".to_string(), "B".to_string()]);

    assert_eq!(exported.model.reactions.len(), 1);
    let r1 = &exported.model.reactions[0];
    assert_eq!(r1.id, "R1");
    let reactants: Vec<_> = r1.reactants.iter().map(|r| r.species.as_str()).collect();
    let products: Vec<_> = r1.products.iter().map(|r| r.species.as_str()).collect();
    assert_eq!(reactants, vec!["A"]);
    assert_eq!(products, vec!["B"]);
    assert!(r1.modifiers.is_empty());
}

#[test]
fn round_trip_preserves_identifiers_and_membership() {
    let mut model = Model::default();
    for id in ["A", "B", "C", "D"] {
        model.species.insert(id.into(), species(id));
    }
    model.reactions.push(reaction("R1", &["A", "B"], &["C"], &[]));
    model.reactions.push(reaction("R2", &["C"], &["D"], &[]));

    let first = export_document(&import(model)).expect("first export");
    let second = export_document(&import_document(&first, &StandardRegistry)).expect("re-export");

    let mut first_ids: Vec<_> = first.model.species.keys().cloned().collect();
    let mut second_ids: Vec<_> = second.model.species.keys().cloned().collect();
    first_ids.sort();
    second_ids.sort();
    assert_eq!(first_ids, second_ids);

    for (a, b) in first.model.reactions.iter().zip(&second.model.reactions) {
        assert_eq!(a.id, b.id);
        let members = |refs: &[SpeciesRef]| {
            let mut v: Vec<_> = refs.iter().map(|r| r.species.clone()).collect();
            v.sort();
            v
        };
        assert_eq!(members(&a.reactants), members(&b.reactants));
        assert_eq!(members(&a.products), members(&b.products));
    }
}

#[test]
fn export_keeps_node_xrefs_as_urn_annotations() {
    let mut model = Model::default();
    let mut a = species("A");
    a.annotations.push(CvTerm {
        qualifier: Qualifier::Is,
        resources: vec!["http://identifiers.org/chebi/24996".into()],
    });
    model.species.insert("A".into(), a);

    let exported = export_document(&import(model)).expect("export succeeds");
    let a = exported.model.species.get("A").expect("species kept");
    assert_eq!(a.meta_id.as_deref(), Some("metaid_A"));
    assert_eq!(a.annotations.len(), 1);
    assert_eq!(a.annotations[0].qualifier, Qualifier::Is);
    assert_eq!(a.annotations[0].resources, vec!["urn:miriam:chebi:24996".to_string()]);
}

#[test]
fn level_and_version_survive_the_round_trip() {
    let mut model = Model::default();
    model.species.insert("A".into(), species("A"));
    let source = SbmlDocument {
        level: Some(2),
        version: Some(4),
        notes: None,
        model,
    };

    let diagram = import_document(&source, &StandardRegistry);
    assert_eq!(diagram.sbml_level, Some(2));
    let exported = export_document(&diagram).expect("export succeeds");
    assert_eq!(exported.level, Some(2));
    assert_eq!(exported.version, Some(4));
}

#[test]
fn missing_level_falls_back_to_the_default() {
    let diagram = import(Model::default());
    assert_eq!(diagram.sbml_level, Some(3));
    assert_eq!(diagram.sbml_version, Some(1));
}
