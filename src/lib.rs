//! # s57
//!
//! Parser pour les cartes électroniques de navigation (ENC) au format
//! IHO S-57 Edition 3.1, structurées en ISO/IEC 8211.
//!
//! ## Features
//!
//! - Décodage complet des enregistrements S-57 (DSID, DSPM, FRID, VRID, …)
//! - Fusion des fichiers de mise à jour séquentiels (.001, .002, …) au
//!   niveau des enregistrements, avant toute construction de géométrie
//! - Résolution topologique noeuds/arêtes/faces vers des géométries
//!   Point / LineString / Polygon en WGS-84
//! - Sondes 3D (SOUNDG) avec profondeurs
//! - Types `geo` pour l'interopérabilité avec l'écosystème Rust géospatial
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::path::Path;
//!
//! let chart = s57::parse(Path::new("GB5X01NE.000"))?;
//! println!("Cellule: {}", chart.dataset_name());
//! println!("Édition {} / mise à jour {}", chart.edition(), chart.update_number());
//!
//! for feature in chart.features() {
//!     println!("{}: {}", feature.object_class, feature.geometry.geometry_type());
//! }
//! ```

pub mod catalog;
pub mod chart;
pub mod error;
pub mod geometry;
pub mod iso8211;
pub mod records;
pub mod topology;
pub mod types;
pub mod updates;
pub mod validation;

pub use chart::{Chart, UsageBand};
pub use error::S57Error;
pub use types::{AttributeValue, Bounds, Feature, FeatureKey, Geometry, GeometryType, Position};

use std::path::Path;

use crate::records::ChartData;

/// Options de parsing
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Découvrir et fusionner les fichiers de mise à jour séquentiels
    pub apply_updates: bool,

    /// Valider coordonnées et géométries après assemblage
    pub validate_geometry: bool,

    /// Abandonner silencieusement une feature en échec au lieu de faire
    /// échouer la carte entière
    pub skip_unknown_features: bool,

    /// Si non vide, seules les features de ces classes (acronymes)
    /// atteignent la sortie
    pub object_class_filter: Vec<String>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            apply_updates: true,
            validate_geometry: true,
            skip_unknown_features: false,
            object_class_filter: Vec::new(),
        }
    }
}

/// Extrait l'identifiant de cellule depuis un nom de fichier ENC.
/// Format attendu: `<cellule>.000` (ou .001, .002, … pour les révisions)
pub fn extract_cell_id(path: &Path) -> Option<String> {
    let extension = path.extension()?.to_str()?;
    if extension.len() != 3 || !extension.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    if stem.is_empty() {
        return None;
    }
    Some(stem.to_string())
}

/// Parse une cellule de base S-57 avec les options par défaut.
///
/// # Arguments
///
/// * `path` - Chemin vers la cellule de base (.000)
///
/// # Errors
///
/// Retourne `S57Error` si le fichier est illisible, si une révision est
/// malformée, ou si une feature échoue la validation.
pub fn parse(path: &Path) -> Result<Chart, S57Error> {
    parse_with_options(path, &ParseOptions::default())
}

/// Parse une cellule de base S-57 avec des options explicites.
///
/// Pipeline: décodage ISO 8211, classification des enregistrements,
/// fusion des révisions découvertes (si demandée), construction des
/// géométries, filtrage et validation.
pub fn parse_with_options(path: &Path, options: &ParseOptions) -> Result<Chart, S57Error> {
    // 1. Cellule de base: décodage et classification des enregistrements
    let base = iso8211::read(path)?;
    let mut data: ChartData = records::collect(&base);
    drop(base);

    // Certaines cellules omettent le DSNM: le nom de fichier fait alors foi
    if data.metadata.dsnm.is_empty() {
        if let Some(cell_id) = extract_cell_id(path) {
            data.metadata.dsnm = cell_id;
        }
    }

    // 2. Révisions, en séquence stricte. Chaque fichier est relâché avant
    // d'ouvrir le suivant.
    if options.apply_updates {
        for update_path in updates::find_update_files(path)? {
            let file = update_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| update_path.display().to_string());
            let revision = iso8211::read(&update_path)
                .map_err(|error| S57Error::update_parse_failure(&file, error.to_string()))?;
            updates::apply_update(&mut data, &file, &revision)?;
        }
    }

    // 3. Géométries et assemblage final: seulement une fois toutes les
    // révisions fusionnées
    chart::build(data, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_cell_id() {
        assert_eq!(
            extract_cell_id(Path::new("charts/GB5X01NE.000")),
            Some("GB5X01NE".to_string())
        );
        assert_eq!(
            extract_cell_id(Path::new("US5MA22M.003")),
            Some("US5MA22M".to_string())
        );
        assert_eq!(extract_cell_id(Path::new("notes.txt")), None);
        assert_eq!(extract_cell_id(Path::new("archive.tar")), None);
    }

    #[test]
    fn test_parse_missing_file_is_io_error() {
        let result = parse(Path::new("nonexistent.000"));
        assert!(matches!(result, Err(S57Error::Io(_))));
    }
}
