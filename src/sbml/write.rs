//! Generate SBML XML text from a document model.
//!
//! The output is deterministic: 2-space indentation, attributes in a fixed
//! order, elements in model order. Optional attributes are only written when
//! set, and empty lists are omitted entirely.

use crate::model::{CvTerm, Qualifier, Reaction, SbmlDocument, Species, SpeciesRef};

const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
const BQBIOL_NS: &str = "http://biomodels.net/biology-qualifiers/";

/// Generate the XML text for an SBML document.
pub fn write_document(doc: &SbmlDocument) -> String {
    let level = doc.level_or_default();
    let version = doc.version_or_default();

    let mut out = String::with_capacity(4096);
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str(&format!(
        "<sbml xmlns=\"{}\" level=\"{}\" version=\"{}\">\n",
        namespace_for(level, version),
        level,
        version
    ));
    if let Some(notes) = &doc.notes {
        out.push_str(&format!("  <notes>{}</notes>\n", xml_escape(notes)));
    }
    write_model(&mut out, doc);
    out.push_str("</sbml>\n");
    out
}

/// Core namespace URI for a given SBML level/version.
fn namespace_for(level: u32, version: u32) -> String {
    match level {
        0..=1 => "http://www.sbml.org/sbml/level1".to_string(),
        2 => format!("http://www.sbml.org/sbml/level2/version{version}"),
        _ => format!("http://www.sbml.org/sbml/level{level}/version{version}/core"),
    }
}

fn write_model(out: &mut String, doc: &SbmlDocument) {
    out.push_str(&format!("  <model id=\"{}\"", xml_escape_attr(&doc.model.id)));
    if let Some(name) = &doc.model.name {
        out.push_str(&format!(" name=\"{}\"", xml_escape_attr(name)));
    }
    out.push_str(">\n");

    if !doc.model.species.is_empty() {
        out.push_str("    <listOfSpecies>\n");
        for sp in doc.model.species.values() {
            write_species(out, sp);
        }
        out.push_str("    </listOfSpecies>\n");
    }

    if !doc.model.reactions.is_empty() {
        out.push_str("    <listOfReactions>\n");
        for re in &doc.model.reactions {
            write_reaction(out, re);
        }
        out.push_str("    </listOfReactions>\n");
    }

    out.push_str("  </model>\n");
}

fn write_species(out: &mut String, sp: &Species) {
    out.push_str(&format!("      <species id=\"{}\"", xml_escape_attr(&sp.id)));
    if let Some(meta_id) = &sp.meta_id {
        out.push_str(&format!(" metaid=\"{}\"", xml_escape_attr(meta_id)));
    }
    if let Some(name) = &sp.name {
        out.push_str(&format!(" name=\"{}\"", xml_escape_attr(name)));
    }
    if sp.boundary_condition {
        out.push_str(" boundaryCondition=\"true\"");
    }
    if let Some(units) = &sp.substance_units {
        out.push_str(&format!(" substanceUnits=\"{}\"", xml_escape_attr(units)));
    }
    if sp.annotations.is_empty() {
        out.push_str("/>\n");
    } else {
        out.push_str(">\n");
        write_annotation(out, sp);
        out.push_str("      </species>\n");
    }
}

/// RDF annotation block in the canonical shape: one `rdf:Description` about
/// the species' metadata id, one qualifier element per CV term.
fn write_annotation(out: &mut String, sp: &Species) {
    let about = sp.meta_id.as_deref().unwrap_or(&sp.id);
    out.push_str("        <annotation>\n");
    out.push_str(&format!(
        "          <rdf:RDF xmlns:rdf=\"{RDF_NS}\" xmlns:bqbiol=\"{BQBIOL_NS}\">\n"
    ));
    out.push_str(&format!(
        "            <rdf:Description rdf:about=\"#{}\">\n",
        xml_escape_attr(about)
    ));
    for term in &sp.annotations {
        write_cv_term(out, term);
    }
    out.push_str("            </rdf:Description>\n");
    out.push_str("          </rdf:RDF>\n");
    out.push_str("        </annotation>\n");
}

fn write_cv_term(out: &mut String, term: &CvTerm) {
    let qualifier = match &term.qualifier {
        Qualifier::Is => "is",
        Qualifier::Other(name) => name.as_str(),
    };
    out.push_str(&format!("              <bqbiol:{qualifier}>\n"));
    out.push_str("                <rdf:Bag>\n");
    for resource in &term.resources {
        out.push_str(&format!(
            "                  <rdf:li rdf:resource=\"{}\"/>\n",
            xml_escape_attr(resource)
        ));
    }
    out.push_str("                </rdf:Bag>\n");
    out.push_str(&format!("              </bqbiol:{qualifier}>\n"));
}

fn write_reaction(out: &mut String, re: &Reaction) {
    out.push_str(&format!("      <reaction id=\"{}\"", xml_escape_attr(&re.id)));
    if re.reactants.is_empty() && re.products.is_empty() && re.modifiers.is_empty() {
        out.push_str("/>\n");
        return;
    }
    out.push_str(">\n");
    write_species_refs(out, "listOfReactants", "speciesReference", &re.reactants);
    write_species_refs(out, "listOfProducts", "speciesReference", &re.products);
    write_species_refs(
        out,
        "listOfModifiers",
        "modifierSpeciesReference",
        &re.modifiers,
    );
    out.push_str("      </reaction>\n");
}

fn write_species_refs(out: &mut String, list_tag: &str, ref_tag: &str, refs: &[SpeciesRef]) {
    if refs.is_empty() {
        return;
    }
    out.push_str(&format!("        <{list_tag}>\n"));
    for r in refs {
        out.push_str(&format!(
            "          <{ref_tag} species=\"{}\"",
            xml_escape_attr(&r.species)
        ));
        if let Some(stoichiometry) = r.stoichiometry {
            out.push_str(&format!(" stoichiometry=\"{stoichiometry}\""));
        }
        out.push_str("/>\n");
    }
    out.push_str(&format!("        </{list_tag}>\n"));
}

/// Escape text content for XML.
fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape an attribute value for XML; also encodes quotes and newlines.
fn xml_escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\n' => out.push_str("&#xA;"),
            '\r' => out.push_str("&#xD;"),
            _ => out.push(ch),
        }
    }
    out
}
