//! Décodage du champ DSID (identification du jeu de données)

use memchr::memchr;

use crate::iso8211::UNIT_SEPARATOR;
use crate::records::{read_u16_le, read_u32_le};

/// RCNM d'un enregistrement DSID
const RCNM_DATASET: u8 = 10;

/// Métadonnées du jeu de données, issues du DSID.
///
/// Format mixte: sous-champs binaires à offsets fixes, puis sous-champs
/// ASCII variables terminés par 0x1F, entrecoupés de trois sous-champs ASCII
/// de largeur fixe (UADT, ISDT, STED) qui ne sont PAS terminés.
#[derive(Debug, Clone, Default)]
pub struct DatasetMetadata {
    /// Identifiant d'enregistrement
    pub rcid: u32,
    /// But de l'échange (1=nouveau jeu, 2=révision)
    pub expp: u8,
    /// Usage prévu (1..6, Overview -> Berthing)
    pub intu: u8,
    /// Nom du jeu de données: identifiant de cellule (ex: "GB5X01NE")
    pub dsnm: String,
    /// Numéro d'édition
    pub edtn: String,
    /// Numéro de mise à jour ("0" pour une cellule de base)
    pub updn: String,
    /// Date d'application des mises à jour (AAAAMMJJ)
    pub uadt: String,
    /// Date de publication (AAAAMMJJ)
    pub isdt: String,
    /// Édition du standard S-57 (ex: "03.1")
    pub sted: String,
    /// Spécification de produit (1=ENC, 2=ODD)
    pub prsp: u8,
    /// Description de la spécification de produit
    pub psdn: String,
    /// Édition de la spécification de produit
    pub pred: String,
    /// Profil d'application (1=EN, 2=ER, 3=DD)
    pub prof: u8,
    /// Code de l'agence productrice
    pub agen: u16,
    /// Commentaire libre
    pub comt: String,
}

/// Décode un champ DSID. None si le buffer est trop court pour la partie
/// fixe ou si RCNM n'est pas celui d'un jeu de données.
pub fn parse(data: &[u8]) -> Option<DatasetMetadata> {
    // RCNM(1) + RCID(4) + EXPP(1) + INTU(1)
    if data.len() < 7 || data[0] != RCNM_DATASET {
        return None;
    }

    let mut metadata = DatasetMetadata {
        rcid: read_u32_le(data, 1)?,
        expp: data[5],
        intu: data[6],
        ..DatasetMetadata::default()
    };

    let mut offset = 7;
    metadata.dsnm = read_terminated(data, &mut offset);
    metadata.edtn = read_terminated(data, &mut offset);
    metadata.updn = read_terminated(data, &mut offset);
    metadata.uadt = read_fixed(data, &mut offset, 8);
    metadata.isdt = read_fixed(data, &mut offset, 8);
    metadata.sted = read_fixed(data, &mut offset, 4);

    if offset < data.len() {
        metadata.prsp = data[offset];
        offset += 1;
    }
    metadata.psdn = read_terminated(data, &mut offset);
    metadata.pred = read_terminated(data, &mut offset);
    if offset < data.len() {
        metadata.prof = data[offset];
        offset += 1;
    }
    if let Some(agen) = read_u16_le(data, offset) {
        metadata.agen = agen;
        offset += 2;
    }
    metadata.comt = read_terminated(data, &mut offset);

    Some(metadata)
}

/// Sous-champ ASCII variable terminé par 0x1F; avance l'offset au-delà du
/// séparateur. Le dernier sous-champ (COMT) peut courir jusqu'à la fin.
fn read_terminated(data: &[u8], offset: &mut usize) -> String {
    if *offset >= data.len() {
        return String::new();
    }
    let rest = &data[*offset..];
    let end = memchr(UNIT_SEPARATOR, rest).unwrap_or(rest.len());
    let value = encoding_rs::mem::decode_latin1(&rest[..end]).into_owned();
    *offset += end + usize::from(end < rest.len());
    value
}

/// Sous-champ ASCII de largeur fixe, non terminé (UADT, ISDT, STED)
fn read_fixed(data: &[u8], offset: &mut usize, width: usize) -> String {
    let Some(bytes) = data.get(*offset..*offset + width) else {
        return String::new();
    };
    *offset += width;
    encoding_rs::mem::decode_latin1(bytes)
        .trim_end_matches(['\0', ' '])
        .to_string()
}
