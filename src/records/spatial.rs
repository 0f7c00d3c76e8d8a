//! Décodage des enregistrements spatiaux (VRID, VRPT, SG2D, SG3D)

use std::fmt;

use crate::iso8211::DataRecord;
use crate::records::dspm::{self, DatasetParams};
use crate::records::{read_i32_le, read_u16_le, read_u32_le};
use crate::types::Position;

/// Orientations (FSPT et VRPT)
pub const ORNT_FORWARD: u8 = 1;
pub const ORNT_REVERSE: u8 = 2;

/// Indicateurs de topologie du VRPT
pub const TOPI_BEGIN_NODE: u8 = 1;
pub const TOPI_END_NODE: u8 = 2;

/// Classe d'un enregistrement spatial (valeurs RCNM)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpatialType {
    /// VI: noeud isolé (110)
    IsolatedNode,
    /// VC: noeud connecté (120)
    ConnectedNode,
    /// VE: arête (130)
    Edge,
    /// VF: face (140)
    Face,
}

impl SpatialType {
    pub fn from_rcnm(rcnm: u8) -> Option<Self> {
        match rcnm {
            110 => Some(SpatialType::IsolatedNode),
            120 => Some(SpatialType::ConnectedNode),
            130 => Some(SpatialType::Edge),
            140 => Some(SpatialType::Face),
            _ => None,
        }
    }

    pub fn rcnm(self) -> u8 {
        match self {
            SpatialType::IsolatedNode => 110,
            SpatialType::ConnectedNode => 120,
            SpatialType::Edge => 130,
            SpatialType::Face => 140,
        }
    }

    pub(crate) fn is_node(rcnm: u8) -> bool {
        rcnm == 110 || rcnm == 120
    }
}

/// Clé composite d'un enregistrement spatial.
///
/// RCID n'est unique qu'au sein d'une classe RCNM: une clé par RCID seul
/// produirait des collisions entre classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpatialKey {
    pub rcnm: u8,
    pub rcid: i64,
}

impl SpatialKey {
    pub fn new(record_type: SpatialType, rcid: i64) -> Self {
        Self {
            rcnm: record_type.rcnm(),
            rcid,
        }
    }
}

impl fmt::Display for SpatialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.rcnm, self.rcid)
    }
}

/// Pointeur vecteur -> vecteur, issu du VRPT.
///
/// Pour une arête, les deux premiers pointeurs vers des noeuds désignent le
/// noeud de début puis le noeud de fin.
#[derive(Debug, Clone, Copy)]
pub struct VectorPointer {
    pub target_rcnm: u8,
    pub target_rcid: i64,
    /// 1=avant, 2=arrière, 255=nul
    pub orientation: u8,
    pub usage: u8,
    /// 1=noeud de début, 2=noeud de fin, 3=face gauche, 4=face droite, 255=nul
    pub topology: u8,
    pub mask: u8,
}

/// Enregistrement spatial décodé, coordonnées déjà ramenées en degrés
#[derive(Debug, Clone)]
pub struct SpatialRecord {
    pub rcid: i64,
    pub record_type: SpatialType,
    pub version: u16,
    pub update_instruction: u8,
    /// Points dans l'ordre de rencontre; 3D (profondeur) pour les SG3D
    pub positions: Vec<Position>,
    pub pointers: Vec<VectorPointer>,
}

impl SpatialRecord {
    pub fn key(&self) -> SpatialKey {
        SpatialKey::new(self.record_type, self.rcid)
    }
}

/// Décode un enregistrement spatial. None si le record ne porte pas de VRID
/// exploitable ou si son RCNM n'est pas une classe spatiale connue.
pub fn parse(record: &DataRecord, params: &DatasetParams) -> Option<SpatialRecord> {
    let vrid = record.field("VRID")?;
    // RCNM(1) + RCID(4) + RVER(2) + RUIN(1)
    if vrid.len() < 8 {
        return None;
    }
    let record_type = SpatialType::from_rcnm(vrid[0])?;

    let mut spatial = SpatialRecord {
        rcid: i64::from(read_u32_le(vrid, 1)?),
        record_type,
        version: read_u16_le(vrid, 5)?,
        update_instruction: vrid[7],
        positions: Vec::new(),
        pointers: Vec::new(),
    };

    if let Some(sg2d) = record.field("SG2D") {
        spatial.positions = parse_sg2d(sg2d, params.comf);
    }
    if let Some(sg3d) = record.field("SG3D") {
        spatial.positions = parse_sg3d(sg3d, params.comf, params.somf);
    }
    if let Some(vrpt) = record.field("VRPT") {
        spatial.pointers = parse_pointers(vrpt);
    }

    Some(spatial)
}

/// Paires répétées de deux i32 little-endian, pas de 8 octets.
///
/// Le standard documente l'ordre (Y, X) mais les fichiers réels visés
/// stockent (X, Y): cet ordre observé fait foi.
pub(crate) fn parse_sg2d(data: &[u8], comf: i32) -> Vec<Position> {
    let mut positions = Vec::with_capacity(data.len() / 8);

    let mut offset = 0;
    while offset + 8 <= data.len() {
        let x = read_i32_le(data, offset).unwrap_or(0);
        let y = read_i32_le(data, offset + 4).unwrap_or(0);
        positions.push(Position::new(dspm::scale(x, comf), dspm::scale(y, comf)));
        offset += 8;
    }

    positions
}

/// Triplets répétés de trois i32 little-endian, pas de 12 octets.
/// X et Y sont ramenés par COMF, Z (la sonde) par SOMF.
pub(crate) fn parse_sg3d(data: &[u8], comf: i32, somf: i32) -> Vec<Position> {
    let mut positions = Vec::with_capacity(data.len() / 12);

    let mut offset = 0;
    while offset + 12 <= data.len() {
        let x = read_i32_le(data, offset).unwrap_or(0);
        let y = read_i32_le(data, offset + 4).unwrap_or(0);
        let z = read_i32_le(data, offset + 8).unwrap_or(0);
        positions.push(Position::with_depth(
            dspm::scale(x, comf),
            dspm::scale(y, comf),
            dspm::scale(z, somf),
        ));
        offset += 12;
    }

    positions
}

/// Entrées VRPT à pas fixe de 9 octets:
/// NAME_RCNM(1) + NAME_RCID(4) + ORNT(1) + USAG(1) + TOPI(1) + MASK(1)
pub(crate) fn parse_pointers(data: &[u8]) -> Vec<VectorPointer> {
    let mut pointers = Vec::with_capacity(data.len() / 9);

    let mut offset = 0;
    while offset + 9 <= data.len() {
        pointers.push(VectorPointer {
            target_rcnm: data[offset],
            target_rcid: read_u32_le(data, offset + 1).map(i64::from).unwrap_or(0),
            orientation: data[offset + 5],
            usage: data[offset + 6],
            topology: data[offset + 7],
            mask: data[offset + 8],
        });
        offset += 9;
    }

    pointers
}
