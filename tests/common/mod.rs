//! Encodage de cellules S-57 synthétiques (conteneur ISO 8211) pour les
//! tests d'intégration

#![allow(dead_code)]

use std::path::Path;

const FIELD_TERMINATOR: u8 = 0x1e;
const UNIT_SEPARATOR: u8 = 0x1f;
const LEADER_SIZE: usize = 24;

/// Encode un enregistrement ISO 8211: leader, répertoire, zone de champs
pub fn encode_record(leader_id: u8, fields: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let mut directory = Vec::new();
    let mut field_area = Vec::new();
    for (tag, data) in fields {
        let position = field_area.len();
        field_area.extend_from_slice(data);
        field_area.push(FIELD_TERMINATOR);
        directory.extend_from_slice(format!("{tag:<4}").as_bytes());
        directory.extend_from_slice(format!("{:04}", data.len() + 1).as_bytes());
        directory.extend_from_slice(format!("{position:05}").as_bytes());
    }
    directory.push(FIELD_TERMINATOR);

    let base_address = LEADER_SIZE + directory.len();
    let record_length = base_address + field_area.len();

    let mut record = Vec::with_capacity(record_length);
    record.extend_from_slice(format!("{record_length:05}").as_bytes());
    record.push(b'3');
    record.push(leader_id);
    record.extend_from_slice(b"E1 09");
    record.extend_from_slice(format!("{base_address:05}").as_bytes());
    record.extend_from_slice(b" ! ");
    record.extend_from_slice(b"4504");
    record.extend_from_slice(&directory);
    record.extend_from_slice(&field_area);
    record
}

/// Encode une cellule complète: enregistrement descripteur puis données
pub fn encode_cell(records: &[Vec<(&str, Vec<u8>)>]) -> Vec<u8> {
    let mut buffer = encode_record(b'L', &[("0000", Vec::new())]);
    for fields in records {
        buffer.extend_from_slice(&encode_record(b'D', fields));
    }
    buffer
}

pub fn write_cell(path: &Path, records: &[Vec<(&str, Vec<u8>)>]) {
    std::fs::write(path, encode_cell(records)).unwrap();
}

/// Champ DSID complet
pub fn dsid(dsnm: &str, edtn: &str, updn: &str, uadt: &str, isdt: &str, agen: u16) -> Vec<u8> {
    let mut data = vec![10u8];
    data.extend_from_slice(&1u32.to_le_bytes()); // RCID
    data.push(1); // EXPP
    data.push(5); // INTU (Harbour)
    data.extend_from_slice(dsnm.as_bytes());
    data.push(UNIT_SEPARATOR);
    data.extend_from_slice(edtn.as_bytes());
    data.push(UNIT_SEPARATOR);
    data.extend_from_slice(updn.as_bytes());
    data.push(UNIT_SEPARATOR);
    data.extend_from_slice(format!("{uadt:<8}").as_bytes());
    data.extend_from_slice(format!("{isdt:<8}").as_bytes());
    data.extend_from_slice(b"03.1");
    data.push(1); // PRSP
    data.extend_from_slice(b"ENC");
    data.push(UNIT_SEPARATOR);
    data.extend_from_slice(b"2.0");
    data.push(UNIT_SEPARATOR);
    data.push(1); // PROF
    data.extend_from_slice(&agen.to_le_bytes());
    data.extend_from_slice(b"Synthetic cell");
    data.push(UNIT_SEPARATOR);
    data
}

/// Champ DSPM
pub fn dspm(comf: i32, somf: i32) -> Vec<u8> {
    let mut data = vec![20u8];
    data.extend_from_slice(&1u32.to_le_bytes()); // RCID
    data.push(2); // HDAT WGS-84
    data.push(3); // VDAT
    data.push(23); // SDAT
    data.extend_from_slice(&25_000i32.to_le_bytes()); // CSCL
    data.push(1); // DUNI
    data.push(1); // HUNI
    data.push(1); // PUNI
    data.push(1); // COUN lat/lon
    data.extend_from_slice(&comf.to_le_bytes());
    data.extend_from_slice(&somf.to_le_bytes());
    data
}

/// Champ FRID (RCNM=100)
pub fn frid(rcid: u32, prim: u8, objl: u16, rver: u16, ruin: u8) -> Vec<u8> {
    let mut data = vec![100u8];
    data.extend_from_slice(&rcid.to_le_bytes());
    data.push(prim);
    data.push(1); // GRUP
    data.extend_from_slice(&objl.to_le_bytes());
    data.extend_from_slice(&rver.to_le_bytes());
    data.push(ruin);
    data
}

/// Champ FOID
pub fn foid(agen: u16, fidn: u32, fids: u16) -> Vec<u8> {
    let mut data = agen.to_le_bytes().to_vec();
    data.extend_from_slice(&fidn.to_le_bytes());
    data.extend_from_slice(&fids.to_le_bytes());
    data
}

/// Champ ATTF: paires (code, valeur)
pub fn attf(pairs: &[(u16, &str)]) -> Vec<u8> {
    let mut data = Vec::new();
    for (code, value) in pairs {
        data.extend_from_slice(&code.to_le_bytes());
        data.extend_from_slice(value.as_bytes());
        data.push(UNIT_SEPARATOR);
    }
    data
}

/// Champ FSPT: entrées (rcnm cible, rcid, orientation)
pub fn fspt(entries: &[(u8, u32, u8)]) -> Vec<u8> {
    let mut data = Vec::new();
    for &(rcnm, rcid, orientation) in entries {
        data.push(rcnm);
        data.extend_from_slice(&rcid.to_le_bytes());
        data.push(orientation);
        data.push(1); // USAG
        data.push(2); // MASK
    }
    data
}

/// Champ VRID
pub fn vrid(rcnm: u8, rcid: u32, ruin: u8) -> Vec<u8> {
    let mut data = vec![rcnm];
    data.extend_from_slice(&rcid.to_le_bytes());
    data.extend_from_slice(&1u16.to_le_bytes()); // RVER
    data.push(ruin);
    data
}

/// Champ VRPT: entrées (rcnm cible, rcid, orientation, topologie)
pub fn vrpt(entries: &[(u8, u32, u8, u8)]) -> Vec<u8> {
    let mut data = Vec::new();
    for &(rcnm, rcid, orientation, topology) in entries {
        data.push(rcnm);
        data.extend_from_slice(&rcid.to_le_bytes());
        data.push(orientation);
        data.push(1); // USAG
        data.push(topology);
        data.push(2); // MASK
    }
    data
}

/// Champ SG2D: paires (x, y) entières
pub fn sg2d(points: &[(i32, i32)]) -> Vec<u8> {
    let mut data = Vec::new();
    for &(x, y) in points {
        data.extend_from_slice(&x.to_le_bytes());
        data.extend_from_slice(&y.to_le_bytes());
    }
    data
}

/// Champ SG3D: triplets (x, y, sonde) entiers
pub fn sg3d(points: &[(i32, i32, i32)]) -> Vec<u8> {
    let mut data = Vec::new();
    for &(x, y, z) in points {
        data.extend_from_slice(&x.to_le_bytes());
        data.extend_from_slice(&y.to_le_bytes());
        data.extend_from_slice(&z.to_le_bytes());
    }
    data
}
