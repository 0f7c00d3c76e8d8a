//! Découverte et application des fichiers de mise à jour
//!
//! Les cellules ENC sont révisées par des fichiers séquentiels (.001, .002,
//! …) appliqués au niveau des enregistrements, avant toute construction de
//! géométrie. Appliquer les révisions sur les enregistrements bruts évite de
//! reconstruire la topologie après chaque fichier: la fusion produit
//! exactement l'état qu'aurait une cellule de base rééditée.

use std::path::{Path, PathBuf};

use crate::error::S57Error;
use crate::iso8211::{DataRecord, Iso8211File};
use crate::records::{dsid, feature, spatial, ChartData};

/// Instructions de mise à jour (sous-champ RUIN)
pub const RUIN_INSERT: u8 = 1;
pub const RUIN_DELETE: u8 = 2;
pub const RUIN_MODIFY: u8 = 3;

/// Découvre les fichiers de révision d'une cellule de base.
///
/// À partir de `X.000`, cherche `X.001`, `X.002`, … dans le même répertoire,
/// en ordre strictement croissant. La découverte s'arrête au premier numéro
/// manquant: une discontinuité tronque la séquence, elle ne la saute jamais.
pub fn find_update_files(base: &Path) -> Result<Vec<PathBuf>, S57Error> {
    let directory = base.parent().unwrap_or_else(|| Path::new("."));
    let Some(stem) = base.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
        return Ok(Vec::new());
    };

    let mut updates = Vec::new();
    for number in 1..=999 {
        let candidate = directory.join(format!("{stem}.{number:03}"));
        if candidate.try_exists()? {
            updates.push(candidate);
        } else {
            break;
        }
    }

    Ok(updates)
}

/// Applique un fichier de révision déjà décodé au jeu d'enregistrements.
///
/// Chaque enregistrement porte son instruction RUIN. La fusion est stricte:
/// une révision malformée ne doit pas passer silencieusement, des
/// métadonnées corrompues ne se rattrapent pas. Il n'y a pas de rollback
/// partiel: un échec nomme le fichier et la clé fautive et arrête tout.
pub(crate) fn apply_update(
    data: &mut ChartData,
    file: &str,
    revision: &Iso8211File,
) -> Result<(), S57Error> {
    for record in &revision.records {
        if record.has_field("FRID") {
            apply_feature_update(data, file, record)?;
        } else if record.has_field("VRID") {
            apply_spatial_update(data, file, record)?;
        }
    }

    // Métadonnées: la révision fait avancer UPDN et UADT (et ISDT si
    // présent). EDTN et DSNM ne changent jamais entre révisions: leurs
    // valeurs dans le DSID de révision sont tolérées mais ignorées.
    let revision_dsid = revision
        .records
        .iter()
        .find_map(|r| r.field("DSID").and_then(dsid::parse));
    if let Some(revision_metadata) = revision_dsid {
        data.metadata.updn = revision_metadata.updn;
        data.metadata.uadt = revision_metadata.uadt;
        if !revision_metadata.isdt.is_empty() {
            data.metadata.isdt = revision_metadata.isdt;
        }
    }

    Ok(())
}

fn apply_feature_update(
    data: &mut ChartData,
    file: &str,
    record: &DataRecord,
) -> Result<(), S57Error> {
    let Some(feature_record) = feature::parse(record) else {
        return Err(S57Error::update_parse_failure(
            file,
            "unreadable feature record",
        ));
    };
    let key = feature_record.key;

    match feature_record.update_instruction {
        // Certains producteurs émettent des INSERT recouvrant la base:
        // l'insertion vaut remplacement quand la clé existe déjà
        RUIN_INSERT => {
            if let Some(&index) = data.feature_index.get(&key) {
                data.features[index] = feature_record;
            } else {
                data.feature_index.insert(key, data.features.len());
                data.features.push(feature_record);
            }
        }
        // Supprimer un absent est sans effet
        RUIN_DELETE => {
            if let Some(index) = data.feature_index.remove(&key) {
                data.features.remove(index);
                for position in data.feature_index.values_mut() {
                    if *position > index {
                        *position -= 1;
                    }
                }
            }
        }
        // Modifier un absent est une révision malformée
        RUIN_MODIFY => {
            let Some(&index) = data.feature_index.get(&key) else {
                return Err(S57Error::UpdateTargetMissing {
                    file: file.to_string(),
                    key: key.to_string(),
                });
            };
            data.features[index] = feature_record;
        }
        ruin => {
            return Err(S57Error::UnknownUpdateInstruction {
                file: file.to_string(),
                ruin,
                key: key.to_string(),
            });
        }
    }

    Ok(())
}

fn apply_spatial_update(
    data: &mut ChartData,
    file: &str,
    record: &DataRecord,
) -> Result<(), S57Error> {
    let Some(spatial_record) = spatial::parse(record, &data.params) else {
        return Err(S57Error::update_parse_failure(
            file,
            "unreadable spatial record",
        ));
    };
    let key = spatial_record.key();

    match spatial_record.update_instruction {
        RUIN_INSERT => {
            data.spatial.insert(key, spatial_record);
        }
        RUIN_DELETE => {
            data.spatial.remove(&key);
        }
        RUIN_MODIFY => {
            if !data.spatial.contains_key(&key) {
                return Err(S57Error::UpdateTargetMissing {
                    file: file.to_string(),
                    key: key.to_string(),
                });
            }
            data.spatial.insert(key, spatial_record);
        }
        ruin => {
            return Err(S57Error::UnknownUpdateInstruction {
                file: file.to_string(),
                ruin,
                key: key.to_string(),
            });
        }
    }

    Ok(())
}
