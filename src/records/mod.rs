//! Décodage sémantique des enregistrements S-57
//!
//! Un enregistrement ISO 8211 n'est qu'une table `tag -> octets`. La
//! classification est structurelle: un champ FRID (RCNM=100) en fait un
//! enregistrement feature, un champ VRID (RCNM spatial) un enregistrement
//! spatial, DSID/DSPM portent les métadonnées du jeu de données. Tout le
//! reste est ignoré.

pub mod dsid;
pub mod dspm;
pub mod feature;
pub mod spatial;

use std::collections::HashMap;

use crate::iso8211::Iso8211File;
use crate::types::FeatureKey;

use self::dsid::DatasetMetadata;
use self::dspm::DatasetParams;
use self::feature::FeatureRecord;
use self::spatial::{SpatialKey, SpatialRecord};

/// État intermédiaire d'une cellule: les enregistrements bruts classés,
/// avant fusion des mises à jour et construction des géométries.
///
/// `features` préserve l'ordre de rencontre du fichier de base;
/// `feature_index` donne la position par clé composite pour la fusion.
#[derive(Debug, Default)]
pub(crate) struct ChartData {
    pub metadata: DatasetMetadata,
    pub params: DatasetParams,
    pub features: Vec<FeatureRecord>,
    pub feature_index: HashMap<FeatureKey, usize>,
    pub spatial: HashMap<SpatialKey, SpatialRecord>,
}

/// Classe les enregistrements d'un fichier décodé
pub(crate) fn collect(file: &Iso8211File) -> ChartData {
    let params = file
        .records
        .iter()
        .find_map(|r| r.field("DSPM").and_then(dspm::parse))
        .unwrap_or_default();

    let metadata = file
        .records
        .iter()
        .find_map(|r| r.field("DSID").and_then(dsid::parse))
        .unwrap_or_default();

    let mut data = ChartData {
        metadata,
        params,
        ..ChartData::default()
    };

    for record in &file.records {
        if let Some(feature_record) = feature::parse(record) {
            data.feature_index
                .insert(feature_record.key, data.features.len());
            data.features.push(feature_record);
        } else if let Some(spatial_record) = spatial::parse(record, &data.params) {
            data.spatial.insert(spatial_record.key(), spatial_record);
        }
    }

    data
}

/// u16 little-endian à l'offset donné, None si le buffer est trop court
pub(crate) fn read_u16_le(data: &[u8], offset: usize) -> Option<u16> {
    let bytes = data.get(offset..offset + 2)?;
    Some(u16::from_le_bytes([bytes[0], bytes[1]]))
}

/// u32 little-endian à l'offset donné
pub(crate) fn read_u32_le(data: &[u8], offset: usize) -> Option<u32> {
    let bytes = data.get(offset..offset + 4)?;
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// i32 little-endian à l'offset donné
pub(crate) fn read_i32_le(data: &[u8], offset: usize) -> Option<i32> {
    let bytes = data.get(offset..offset + 4)?;
    Some(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}
