//! Construction des géométries par primitive
//!
//! Le sous-champ PRIM du FRID choisit la stratégie: point (ou multi-point
//! pour les sondes), polyligne, ou surface par résolution topologique. La
//! construction est volontairement indulgente: les cellules réelles
//! contiennent des références pendantes vers des enregistrements hors
//! cellule, une topologie manquante donne une géométrie vide ou partielle,
//! pas un échec.

use std::collections::HashMap;

use tracing::warn;

use crate::error::S57Error;
use crate::records::feature::{FeatureRecord, SpatialRef, PRIM_AREA, PRIM_LINE, PRIM_NONE};
use crate::records::spatial::{SpatialKey, SpatialRecord, SpatialType};
use crate::topology::{is_ring_closed, EdgeResolver};
use crate::types::{Geometry, Position};

/// Construit la géométrie d'une feature depuis le jeu spatial fusionné
pub fn construct(
    feature: &FeatureRecord,
    spatial: &HashMap<SpatialKey, SpatialRecord>,
) -> Result<Geometry, S57Error> {
    // Les méta-features (C_AGGR, M_COVR, ...) ne portent que des attributs
    if feature.geom_prim == PRIM_NONE {
        return Ok(Geometry::Point(Vec::new()));
    }

    if feature.spatial_refs.is_empty() {
        return Err(S57Error::MissingSpatialRecord {
            feature_id: feature.id,
            rcid: 0,
        });
    }

    match feature.geom_prim {
        PRIM_AREA => construct_polygon(feature, spatial),
        PRIM_LINE => construct_line_string(feature, spatial),
        _ => construct_point(feature, spatial),
    }
}

/// Recherche un enregistrement par RCID à travers les classes données, dans
/// l'ordre. Le RCNM du FSPT n'est pas fiable: on ne s'y fie jamais.
fn find_by_rcid<'a>(
    spatial: &'a HashMap<SpatialKey, SpatialRecord>,
    rcid: i64,
    order: &[SpatialType],
) -> Option<&'a SpatialRecord> {
    order
        .iter()
        .find_map(|&record_type| spatial.get(&SpatialKey::new(record_type, rcid)))
}

/// Point ou multi-point: toutes les références, toutes leurs coordonnées.
///
/// Le noeud isolé est cherché en premier: les features multi-points comme
/// SOUNDG stockent leur paquet de coordonnées SG3D sur des noeuds isolés.
/// La dimension est préservée (les sondes restent 3D).
fn construct_point(
    feature: &FeatureRecord,
    spatial: &HashMap<SpatialKey, SpatialRecord>,
) -> Result<Geometry, S57Error> {
    let mut positions = Vec::new();

    for spatial_ref in &feature.spatial_refs {
        let Some(record) = find_by_rcid(
            spatial,
            spatial_ref.rcid,
            &[SpatialType::IsolatedNode, SpatialType::ConnectedNode],
        ) else {
            warn!(
                feature_id = feature.id,
                rcid = spatial_ref.rcid,
                "point feature references missing node"
            );
            continue;
        };

        positions.extend(record.positions.iter().copied());
    }

    Ok(Geometry::Point(positions))
}

/// Polyligne: les références dans l'ordre FSPT, chaque arête développée en
/// séquence complète avec l'orientation de la référence
fn construct_line_string(
    feature: &FeatureRecord,
    spatial: &HashMap<SpatialKey, SpatialRecord>,
) -> Result<Geometry, S57Error> {
    let mut resolver = EdgeResolver::new(spatial);
    let mut positions = Vec::new();

    for spatial_ref in &feature.spatial_refs {
        let Some(record) = find_by_rcid(
            spatial,
            spatial_ref.rcid,
            &[
                SpatialType::Edge,
                SpatialType::ConnectedNode,
                SpatialType::IsolatedNode,
                SpatialType::Face,
            ],
        ) else {
            continue;
        };

        if record.record_type == SpatialType::Edge {
            let Ok(edge) = resolver.load_edge(record.rcid) else {
                continue;
            };
            positions.extend(resolver.full_edge_coordinates(&edge, spatial_ref.orientation));
        } else if !record.positions.is_empty() {
            positions.extend(record.positions.iter().map(|p| Position::new(p.lon, p.lat)));
        } else if !record.pointers.is_empty() {
            positions.extend(resolver.resolve_pointers(record));
        }
    }

    if positions.len() < 2 {
        // Ligne dégénérée: géométrie vide, le tri revient à l'appelant
        return Ok(Geometry::LineString(Vec::new()));
    }

    Ok(Geometry::LineString(positions))
}

/// Surface: collecte une liste ordonnée d'arêtes orientées puis construit
/// l'anneau.
///
/// Une référence FSPT vers une face apporte tous les pointeurs VRPT de la
/// face vers des arêtes: l'orientation du VRPT de la face fait foi. Une
/// référence FSPT directe vers une arête s'apporte elle-même avec
/// l'orientation du FSPT.
fn construct_polygon(
    feature: &FeatureRecord,
    spatial: &HashMap<SpatialKey, SpatialRecord>,
) -> Result<Geometry, S57Error> {
    let mut resolver = EdgeResolver::new(spatial);

    let mut edge_refs: Vec<SpatialRef> = Vec::new();
    for fspt_ref in &feature.spatial_refs {
        let Some(record) = find_by_rcid(
            spatial,
            fspt_ref.rcid,
            &[
                SpatialType::Face,
                SpatialType::Edge,
                SpatialType::ConnectedNode,
                SpatialType::IsolatedNode,
            ],
        ) else {
            continue;
        };

        match record.record_type {
            SpatialType::Face => {
                for pointer in &record.pointers {
                    if pointer.target_rcnm == SpatialType::Edge.rcnm() {
                        edge_refs.push(SpatialRef {
                            rcid: pointer.target_rcid,
                            orientation: pointer.orientation,
                            usage: pointer.usage,
                            mask: pointer.mask,
                        });
                    }
                }
            }
            SpatialType::Edge => edge_refs.push(*fspt_ref),
            _ => {}
        }
    }

    if !edge_refs.is_empty() {
        match resolver.build_ring(&edge_refs) {
            Ok(ring) => {
                if ring.len() < 3 {
                    return Ok(Geometry::Polygon(Vec::new()));
                }
                return Ok(Geometry::Polygon(ring));
            }
            Err(error) => {
                // Topologie incomplète ou malformée (méta-features M_COVR
                // notamment): retomber sur la collecte directe
                warn!(
                    feature_id = feature.id,
                    error = %error,
                    "ring construction failed, falling back to direct coordinates"
                );
                let mut positions = Vec::new();
                for edge_ref in &edge_refs {
                    let key = SpatialKey::new(SpatialType::Edge, edge_ref.rcid);
                    if let Some(edge) = spatial.get(&key) {
                        positions
                            .extend(edge.positions.iter().map(|p| Position::new(p.lon, p.lat)));
                    }
                }
                if positions.is_empty() {
                    positions = direct_coordinates(feature, spatial);
                }
                if positions.is_empty() {
                    return Err(error);
                }
                close_ring(&mut positions);
                return Ok(Geometry::Polygon(positions));
            }
        }
    }

    // Aucune topologie VRPT: collecte directe par RCID
    let mut positions = direct_coordinates(feature, spatial);
    if positions.len() < 3 {
        return Ok(Geometry::Polygon(Vec::new()));
    }
    close_ring(&mut positions);

    Ok(Geometry::Polygon(positions))
}

/// Collecte directe: les coordonnées de chaque référence, classe par classe
fn direct_coordinates(
    feature: &FeatureRecord,
    spatial: &HashMap<SpatialKey, SpatialRecord>,
) -> Vec<Position> {
    let mut positions = Vec::new();
    for spatial_ref in &feature.spatial_refs {
        let found = find_by_rcid(
            spatial,
            spatial_ref.rcid,
            &[
                SpatialType::Face,
                SpatialType::Edge,
                SpatialType::ConnectedNode,
                SpatialType::IsolatedNode,
            ],
        );
        if let Some(record) = found {
            positions.extend(record.positions.iter().map(|p| Position::new(p.lon, p.lat)));
        }
    }
    positions
}

/// Referme l'anneau si nécessaire (premier point répété en dernier)
fn close_ring(positions: &mut Vec<Position>) {
    if positions.len() < 3 {
        return;
    }
    if !is_ring_closed(positions) {
        let first = positions[0];
        positions.push(first);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::feature::{PRIM_POINT, SpatialRef};
    use crate::records::spatial::{VectorPointer, TOPI_BEGIN_NODE, TOPI_END_NODE};
    use crate::types::FeatureKey;

    fn feature_with(prim: u8, refs: Vec<SpatialRef>) -> FeatureRecord {
        FeatureRecord {
            key: FeatureKey {
                agen: 540,
                fidn: 1,
                fids: 0,
            },
            id: 1,
            object_class: 42,
            geom_prim: prim,
            group: 1,
            version: 1,
            update_instruction: 1,
            attributes: HashMap::new(),
            spatial_refs: refs,
        }
    }

    fn forward(rcid: i64) -> SpatialRef {
        SpatialRef {
            rcid,
            orientation: 1,
            usage: 1,
            mask: 2,
        }
    }

    fn spatial_map(records: Vec<SpatialRecord>) -> HashMap<SpatialKey, SpatialRecord> {
        records.into_iter().map(|r| (r.key(), r)).collect()
    }

    fn edge(rcid: i64, points: &[(f64, f64)]) -> SpatialRecord {
        SpatialRecord {
            rcid,
            record_type: SpatialType::Edge,
            version: 1,
            update_instruction: 1,
            positions: points.iter().map(|&(x, y)| Position::new(x, y)).collect(),
            pointers: vec![
                VectorPointer {
                    target_rcnm: 120,
                    target_rcid: 0,
                    orientation: 255,
                    usage: 255,
                    topology: TOPI_BEGIN_NODE,
                    mask: 255,
                },
                VectorPointer {
                    target_rcnm: 120,
                    target_rcid: 0,
                    orientation: 255,
                    usage: 255,
                    topology: TOPI_END_NODE,
                    mask: 255,
                },
            ],
        }
    }

    #[test]
    fn test_meta_feature_gets_empty_point() {
        let feature = feature_with(PRIM_NONE, Vec::new());
        let geometry = construct(&feature, &HashMap::new()).unwrap();
        assert_eq!(geometry, Geometry::Point(Vec::new()));
    }

    #[test]
    fn test_feature_without_refs_is_missing_spatial() {
        let feature = feature_with(PRIM_POINT, Vec::new());
        assert!(matches!(
            construct(&feature, &HashMap::new()),
            Err(S57Error::MissingSpatialRecord { feature_id: 1, .. })
        ));
    }

    #[test]
    fn test_line_from_edge_without_resolvable_nodes() {
        // Une arête dont les noeuds de début/fin sont irrésolubles donne la
        // polyligne de ses seuls points SG2D
        let spatial = spatial_map(vec![edge(7, &[(-71.0, 42.0), (-70.0, 43.0)])]);
        let feature = feature_with(PRIM_LINE, vec![forward(7)]);

        let geometry = construct(&feature, &spatial).unwrap();
        assert_eq!(
            geometry,
            Geometry::LineString(vec![Position::new(-71.0, 42.0), Position::new(-70.0, 43.0)])
        );
    }

    #[test]
    fn test_sounding_multipoint_keeps_depths() {
        let spatial = spatial_map(vec![SpatialRecord {
            rcid: 3,
            record_type: SpatialType::IsolatedNode,
            version: 1,
            update_instruction: 1,
            positions: vec![
                Position::with_depth(-71.0, 42.0, 10.0),
                Position::with_depth(-71.001, 42.001, 12.5),
                Position::with_depth(-71.002, 42.002, 15.0),
            ],
            pointers: Vec::new(),
        }]);
        let feature = feature_with(PRIM_POINT, vec![forward(3)]);

        let geometry = construct(&feature, &spatial).unwrap();
        let positions = geometry.positions();
        assert_eq!(positions.len(), 3);
        assert_eq!(positions[0], Position::with_depth(-71.0, 42.0, 10.0));
        assert_eq!(positions[2], Position::with_depth(-71.002, 42.002, 15.0));
    }

    #[test]
    fn test_point_prefers_isolated_node() {
        // Le même RCID existe en noeud isolé et en noeud connecté: le noeud
        // isolé gagne (c'est lui qui porte les sondes)
        let spatial = spatial_map(vec![
            SpatialRecord {
                rcid: 3,
                record_type: SpatialType::IsolatedNode,
                version: 1,
                update_instruction: 1,
                positions: vec![Position::new(-71.0, 42.0)],
                pointers: Vec::new(),
            },
            SpatialRecord {
                rcid: 3,
                record_type: SpatialType::ConnectedNode,
                version: 1,
                update_instruction: 1,
                positions: vec![Position::new(0.0, 0.0)],
                pointers: Vec::new(),
            },
        ]);
        let feature = feature_with(PRIM_POINT, vec![forward(3)]);

        let geometry = construct(&feature, &spatial).unwrap();
        assert_eq!(geometry.positions()[0], Position::new(-71.0, 42.0));
    }

    #[test]
    fn test_polygon_from_face_with_mixed_orientations() {
        // Quadrilatère: e1, e2 en avant, e3 inversée, e4 en avant.
        // e3 est encodée dans le sens opposé au parcours: son orientation
        // VRPT la remet dans le bon sens.
        let mut records = vec![
            edge(1, &[(0.0, 0.0), (2.0, 0.0)]),
            edge(2, &[(2.0, 0.0), (2.0, 2.0)]),
            edge(3, &[(0.0, 2.0), (2.0, 2.0)]), // encodée à l'envers
            edge(4, &[(0.0, 2.0), (0.0, 0.0)]),
        ];
        let face_pointer = |rcid: i64, orientation: u8| VectorPointer {
            target_rcnm: 130,
            target_rcid: rcid,
            orientation,
            usage: 1,
            topology: 255,
            mask: 255,
        };
        records.push(SpatialRecord {
            rcid: 50,
            record_type: SpatialType::Face,
            version: 1,
            update_instruction: 1,
            positions: Vec::new(),
            pointers: vec![
                face_pointer(1, 1),
                face_pointer(2, 1),
                face_pointer(3, 2),
                face_pointer(4, 1),
            ],
        });
        let spatial = spatial_map(records);
        let feature = feature_with(PRIM_AREA, vec![forward(50)]);

        let geometry = construct(&feature, &spatial).unwrap();
        let ring = geometry.positions();
        assert_eq!(ring.len(), 5);
        assert!(ring[0].same_point(&ring[4]));
        for window in ring.windows(2) {
            assert!(!window[0].same_point(&window[1]));
        }
    }

    #[test]
    fn test_polygon_from_direct_edge_refs() {
        let spatial = spatial_map(vec![
            edge(1, &[(0.0, 0.0), (1.0, 0.0)]),
            edge(2, &[(1.0, 0.0), (0.5, 1.0)]),
            edge(3, &[(0.5, 1.0), (0.0, 0.0)]),
        ]);
        let feature = feature_with(PRIM_AREA, vec![forward(1), forward(2), forward(3)]);

        let geometry = construct(&feature, &spatial).unwrap();
        assert_eq!(geometry.positions().len(), 4);
    }

    #[test]
    fn test_degenerate_polygon_is_empty() {
        let spatial = spatial_map(vec![SpatialRecord {
            rcid: 3,
            record_type: SpatialType::ConnectedNode,
            version: 1,
            update_instruction: 1,
            positions: vec![Position::new(0.0, 0.0)],
            pointers: Vec::new(),
        }]);
        let feature = feature_with(PRIM_AREA, vec![forward(3)]);

        let geometry = construct(&feature, &spatial).unwrap();
        assert!(geometry.is_empty());
    }
}
