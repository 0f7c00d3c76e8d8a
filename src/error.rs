//! Types d'erreurs pour le crate s57

use thiserror::Error;

/// Erreurs pouvant survenir lors du parsing S-57
#[derive(Debug, Error)]
pub enum S57Error {
    /// Erreur d'I/O lors de la lecture d'un fichier
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Structure ISO 8211 illisible (leader, directory ou field area corrompus)
    #[error("invalid ISO 8211 structure in {file}: {reason}")]
    Iso8211 { file: String, reason: String },

    /// Coordonnée hors des bornes géographiques valides
    #[error("invalid coordinate: lat={lat} lon={lon} (lat must be within ±90, lon within ±180)")]
    InvalidCoordinate { lat: f64, lon: f64 },

    /// Code de classe d'objet invalide (OBJL ≤ 0)
    #[error("unknown object class code: {0}")]
    UnknownObjectClass(i32),

    /// Géométrie violant les règles de validation
    #[error("invalid geometry for feature {feature_id}: {reason}")]
    InvalidGeometry { feature_id: i64, reason: String },

    /// Pointeur FSPT/VRPT vers un enregistrement spatial absent
    #[error("feature {feature_id} references missing spatial record {rcid}")]
    MissingSpatialRecord { feature_id: i64, rcid: i64 },

    /// Enregistrement spatial d'un type inattendu
    #[error("invalid spatial record {rcid}: {reason}")]
    InvalidSpatialRecord { rcid: i64, reason: String },

    /// MODIFY vers un enregistrement absent du jeu fusionné
    #[error("update {file}: MODIFY targets missing record {key}")]
    UpdateTargetMissing { file: String, key: String },

    /// Fichier de mise à jour indéchiffrable
    #[error("update {file} cannot be decoded: {reason}")]
    UpdateParseFailure { file: String, reason: String },

    /// RUIN hors de {1, 2, 3}
    #[error("update {file}: unknown update instruction {ruin} for record {key}")]
    UnknownUpdateInstruction { file: String, ruin: u8, key: String },
}

impl S57Error {
    /// Crée une erreur de structure ISO 8211 avec contexte
    pub fn iso8211(file: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Iso8211 {
            file: file.into(),
            reason: reason.into(),
        }
    }

    /// Crée une erreur de géométrie invalide
    pub fn invalid_geometry(feature_id: i64, reason: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            feature_id,
            reason: reason.into(),
        }
    }

    /// Crée une erreur de mise à jour indéchiffrable
    pub fn update_parse_failure(file: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UpdateParseFailure {
            file: file.into(),
            reason: reason.into(),
        }
    }
}
