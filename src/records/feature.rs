//! Décodage des enregistrements feature (FRID, FOID, ATTF, FSPT)

use std::collections::HashMap;

use memchr::memchr;

use crate::catalog;
use crate::iso8211::{DataRecord, UNIT_SEPARATOR};
use crate::records::{read_u16_le, read_u32_le};
use crate::types::{AttributeValue, FeatureKey};

/// RCNM d'un enregistrement feature
const RCNM_FEATURE: u8 = 100;

/// Primitives géométriques (sous-champ PRIM du FRID)
pub const PRIM_POINT: u8 = 1;
pub const PRIM_LINE: u8 = 2;
pub const PRIM_AREA: u8 = 3;
/// Méta-feature sans géométrie (C_AGGR, M_COVR, ...)
pub const PRIM_NONE: u8 = 255;

/// Pointeur feature -> spatial, issu du FSPT.
///
/// Le RCNM cible du FSPT n'est pas fiable dans les fichiers réels: la
/// résolution cherche le RCID à travers les classes connues, le pointeur ne
/// retient donc que le RCID et les indicateurs.
#[derive(Debug, Clone, Copy)]
pub struct SpatialRef {
    pub rcid: i64,
    /// 1=avant, 2=arrière, 255=nul
    pub orientation: u8,
    /// 1=extérieur, 2=intérieur, 3=extérieur tronqué
    pub usage: u8,
    /// 1=masqué, 2=visible, 255=nul
    pub mask: u8,
}

/// Enregistrement feature décodé, avant résolution de géométrie
#[derive(Debug, Clone)]
pub struct FeatureRecord {
    /// Clé composite (AGEN, FIDN, FIDS) issue du FOID
    pub key: FeatureKey,
    /// FIDN seul, conservé pour compatibilité
    pub id: i64,
    /// Code de classe d'objet (OBJL)
    pub object_class: u16,
    /// Primitive géométrique (PRIM)
    pub geom_prim: u8,
    /// Code de groupe (GRUP)
    pub group: u8,
    /// Version de l'enregistrement (RVER)
    pub version: u16,
    /// Instruction de mise à jour (RUIN)
    pub update_instruction: u8,
    /// Attributs décodés (acronyme -> valeur)
    pub attributes: HashMap<String, AttributeValue>,
    /// Références spatiales dans l'ordre de rencontre du FSPT.
    /// Cet ordre porte du sens: les frontières de surface sont référencées
    /// séquentiellement.
    pub spatial_refs: Vec<SpatialRef>,
}

/// Décode un enregistrement feature. None si le record ne porte pas de FRID
/// exploitable ou si son RCNM n'est pas celui d'une feature.
pub fn parse(record: &DataRecord) -> Option<FeatureRecord> {
    let frid = record.field("FRID")?;
    // RCNM(1) + RCID(4) + PRIM(1) + GRUP(1) + OBJL(2) + RVER(2) + RUIN(1)
    if frid.len() < 12 || frid[0] != RCNM_FEATURE {
        return None;
    }

    let mut feature = FeatureRecord {
        key: FeatureKey::default(),
        id: 0,
        geom_prim: frid[5],
        group: frid[6],
        object_class: read_u16_le(frid, 7)?,
        version: read_u16_le(frid, 9)?,
        update_instruction: frid[11],
        attributes: HashMap::new(),
        spatial_refs: Vec::new(),
    };

    // FOID: AGEN(2) + FIDN(4) + FIDS(2)
    if let Some(foid) = record.field("FOID") {
        if foid.len() >= 8 {
            feature.key = FeatureKey {
                agen: read_u16_le(foid, 0)?,
                fidn: read_u32_le(foid, 2)?,
                fids: read_u16_le(foid, 6)?,
            };
            feature.id = i64::from(feature.key.fidn);
        }
    }

    if let Some(attf) = record.field("ATTF") {
        feature.attributes = parse_attributes(attf);
    }

    if let Some(fspt) = record.field("FSPT") {
        feature.spatial_refs = parse_spatial_refs(fspt);
    }

    Some(feature)
}

/// Paires répétées ATTL(2, code) + ATVL(ASCII variable terminé par 0x1F).
/// Le code est traduit en acronyme via le catalogue d'attributs; les valeurs
/// vides ne sont pas conservées.
pub(crate) fn parse_attributes(data: &[u8]) -> HashMap<String, AttributeValue> {
    let mut attributes = HashMap::new();

    let mut offset = 0;
    while let Some(code) = read_u16_le(data, offset) {
        offset += 2;
        let rest = &data[offset.min(data.len())..];
        let end = memchr(UNIT_SEPARATOR, rest).unwrap_or(rest.len());

        if end > 0 {
            let value = encoding_rs::mem::decode_latin1(&rest[..end]).into_owned();
            attributes.insert(catalog::attribute_acronym(code), AttributeValue::Text(value));
        }

        offset += end + 1; // séparateur compris
    }

    attributes
}

/// Entrées FSPT à pas fixe de 8 octets:
/// NAME_RCNM(1) + NAME_RCID(4) + ORNT(1) + USAG(1) + MASK(1)
pub(crate) fn parse_spatial_refs(data: &[u8]) -> Vec<SpatialRef> {
    let mut refs = Vec::with_capacity(data.len() / 8);

    let mut offset = 0;
    while offset + 8 <= data.len() {
        refs.push(SpatialRef {
            // NAME_RCNM à l'offset 0 est parfois incohérent, on ne le lit pas
            rcid: read_u32_le(data, offset + 1).map(i64::from).unwrap_or(0),
            orientation: data[offset + 5],
            usage: data[offset + 6],
            mask: data[offset + 7],
        });
        offset += 8;
    }

    refs
}
