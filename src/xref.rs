//! Cross-reference resolution for biological annotations.
//!
//! SBML species carry controlled-vocabulary annotations pointing at external
//! databases, usually as identifiers.org URIs
//! (`http://identifiers.org/chebi/CHEBI:24996`) or legacy MIRIAM URNs. This
//! module maps such a URI to a local [`Xref`]: the datasource, the accession
//! identifier, and the kind of biological entity it names.
//!
//! Resolution consults a fixed priority table of well-known ontology
//! databases first and only then falls back to a case-insensitive full-name
//! lookup against a [`DatasourceRegistry`]. A URI that matches neither
//! resolves to `None`; the caller proceeds without a cross-reference.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Kind of biological entity an external identifier refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    GeneProduct,
    Metabolite,
    Protein,
    Unknown,
}

/// An external database known to the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Datasource {
    /// Short system code, e.g. `"Ce"` for ChEBI.
    pub system_code: String,
    pub full_name: String,
    /// MIRIAM namespace segment used when rebuilding URNs on export.
    pub miriam: String,
    pub kind: EntityKind,
}

/// A resolved cross-reference: datasource plus accession identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Xref {
    pub datasource: Datasource,
    pub id: String,
}

impl Xref {
    pub fn entity_kind(&self) -> EntityKind {
        self.datasource.kind
    }

    /// Canonical MIRIAM URN form, used as the CV term resource on export.
    pub fn urn(&self) -> String {
        format!("urn:miriam:{}:{}", self.datasource.miriam, self.id)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Datasource registry
// ────────────────────────────────────────────────────────────────────────────

/// Read-only lookup service for known datasources.
///
/// The host application typically backs this with its own synonym database;
/// [`StandardRegistry`] ships the entries the converter itself depends on.
pub trait DatasourceRegistry {
    fn by_system_code(&self, code: &str) -> Option<Datasource>;
    /// Case-insensitive lookup by full database name.
    fn by_full_name(&self, name: &str) -> Option<Datasource>;
}

/// Built-in registry of the datasources the conversion tables reference.
#[derive(Debug, Default)]
pub struct StandardRegistry;

/// (system code, full name, miriam namespace, entity kind)
const DATASOURCES: &[(&str, &str, &str, EntityKind)] = &[
    ("Ce", "ChEBI", "chebi", EntityKind::Metabolite),
    ("Cps", "PubChem-substance", "pubchem.substance", EntityKind::Metabolite),
    ("Ck", "KEGG Compound", "kegg.compound", EntityKind::Metabolite),
    ("Ca", "CAS", "cas", EntityKind::Metabolite),
    ("T", "GeneOntology", "obo.go", EntityKind::GeneProduct),
    ("S", "UniProt", "uniprot", EntityKind::Protein),
    ("L", "Entrez Gene", "entrez.gene", EntityKind::GeneProduct),
    ("En", "Ensembl", "ensembl", EntityKind::GeneProduct),
    ("Ec", "EC Number", "ec-code", EntityKind::Protein),
];

fn datasource_from_row(row: &(&str, &str, &str, EntityKind)) -> Datasource {
    Datasource {
        system_code: row.0.to_string(),
        full_name: row.1.to_string(),
        miriam: row.2.to_string(),
        kind: row.3,
    }
}

impl DatasourceRegistry for StandardRegistry {
    fn by_system_code(&self, code: &str) -> Option<Datasource> {
        DATASOURCES
            .iter()
            .find(|row| row.0 == code)
            .map(datasource_from_row)
    }

    fn by_full_name(&self, name: &str) -> Option<Datasource> {
        DATASOURCES
            .iter()
            .find(|row| row.1.eq_ignore_ascii_case(name))
            .map(datasource_from_row)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// URI resolution
// ────────────────────────────────────────────────────────────────────────────

/// Resolve an identifiers.org URI (or MIRIAM URN) to an [`Xref`].
///
/// The database segment is matched against the ontology priority table before
/// any registry full-name lookup. Returns `None` for malformed URIs and for
/// databases neither table knows; resolution never fails the conversion.
pub fn resolve_uri(uri: &str, registry: &dyn DatasourceRegistry) -> Option<Xref> {
    let (database, id) = split_uri(uri)?;

    let db = database.to_ascii_lowercase();
    let code = if db.contains("chebi") {
        Some("Ce")
    } else if db.contains("pubchem") {
        Some("Cps")
    } else if db.contains("kegg") {
        Some("Ck")
    } else if db.contains("cas") {
        Some("Ca")
    } else if db == "obo.go" || db == "go" {
        Some("T")
    } else if db.contains("uniprot") {
        Some("S")
    } else {
        None
    };

    let datasource = match code {
        Some(code) => registry.by_system_code(code),
        None => registry.by_full_name(&db).or_else(|| {
            warn!(database = %database, "no datasource match for annotation");
            None
        }),
    }?;

    Some(Xref {
        datasource,
        id: id.to_string(),
    })
}

/// Split a cross-reference URI into (database, identifier).
///
/// Handles both URL forms (`…identifiers.org/<db>/<id>`) and URN forms
/// (`urn:miriam:<db>:<id>`). Returns `None` when no recognizable segments
/// are present.
fn split_uri(uri: &str) -> Option<(&str, &str)> {
    if let Some(rest) = uri.strip_prefix("urn:miriam:") {
        let (db, id) = rest.rsplit_once(':')?;
        if db.is_empty() || id.is_empty() {
            return None;
        }
        return Some((db, id));
    }
    let rest = uri.split_once("org/")?.1;
    let (db, id) = rest.split_once('/')?;
    if db.is_empty() || id.is_empty() {
        return None;
    }
    Some((db, id))
}
