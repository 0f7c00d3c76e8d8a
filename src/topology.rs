//! Résolution topologique des géométries
//!
//! Les features S-57 ne portent pas leurs coordonnées: elles pointent vers
//! un graphe de primitives spatiales (noeuds isolés, noeuds connectés,
//! arêtes, faces). Ce module reconstruit les séquences de coordonnées à
//! partir de ce graphe: coordonnées complètes d'une arête (noeud de début +
//! points intermédiaires + noeud de fin), anneaux de polygones par parcours
//! séquentiel des arêtes orientées, et chasse aux pointeurs VRPT imbriqués.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use tracing::warn;

use crate::error::S57Error;
use crate::records::feature::SpatialRef;
use crate::records::spatial::{SpatialKey, SpatialRecord, SpatialType, ORNT_REVERSE};
use crate::types::Position;

/// Budget d'itération de la construction d'anneau. Un anneau qui le dépasse
/// trahit un graphe pathologique, pas une frontière de cellule.
const MAX_RING_POSITIONS: usize = 1_000_000;

/// Arête décodée: points de forme SG2D seulement, la géométrie des noeuds
/// n'appartient pas à l'arête et se résout via les pointeurs
#[derive(Debug)]
pub struct Edge {
    pub rcid: i64,
    pub points: Vec<Position>,
    pub begin_node: Option<i64>,
    pub end_node: Option<i64>,
}

/// Résolveur d'arêtes sur le jeu spatial fusionné.
///
/// Les arêtes sont décodées au premier usage puis mises en cache pour la
/// durée d'une construction de carte: une arête partagée par de nombreuses
/// surfaces n'est décodée qu'une fois.
pub struct EdgeResolver<'a> {
    spatial: &'a HashMap<SpatialKey, SpatialRecord>,
    edge_cache: HashMap<i64, Rc<Edge>>,
}

impl<'a> EdgeResolver<'a> {
    pub fn new(spatial: &'a HashMap<SpatialKey, SpatialRecord>) -> Self {
        Self {
            spatial,
            edge_cache: HashMap::new(),
        }
    }

    /// Coordonnées d'un noeud par RCID: noeud connecté d'abord, isolé ensuite
    fn node(&self, rcid: i64) -> Option<&SpatialRecord> {
        for record_type in [SpatialType::ConnectedNode, SpatialType::IsolatedNode] {
            let key = SpatialKey::new(record_type, rcid);
            if let Some(record) = self.spatial.get(&key) {
                if !record.positions.is_empty() {
                    return Some(record);
                }
            }
        }
        None
    }

    /// Charge une arête par RCID, avec cache
    pub fn load_edge(&mut self, rcid: i64) -> Result<Rc<Edge>, S57Error> {
        if let Some(edge) = self.edge_cache.get(&rcid) {
            return Ok(Rc::clone(edge));
        }

        let key = SpatialKey::new(SpatialType::Edge, rcid);
        let Some(record) = self.spatial.get(&key) else {
            return Err(S57Error::MissingSpatialRecord {
                feature_id: 0,
                rcid,
            });
        };
        if record.record_type != SpatialType::Edge {
            return Err(S57Error::InvalidSpatialRecord {
                rcid,
                reason: "expected edge record (RCNM=130)".to_string(),
            });
        }

        // Les deux premiers pointeurs vers des noeuds donnent le noeud de
        // début puis le noeud de fin
        let mut begin_node = None;
        let mut end_node = None;
        for pointer in &record.pointers {
            if SpatialType::is_node(pointer.target_rcnm) {
                if begin_node.is_none() {
                    begin_node = Some(pointer.target_rcid);
                } else if end_node.is_none() {
                    end_node = Some(pointer.target_rcid);
                }
            }
        }

        let edge = Rc::new(Edge {
            rcid,
            points: record.positions.clone(),
            begin_node,
            end_node,
        });
        self.edge_cache.insert(rcid, Rc::clone(&edge));

        Ok(edge)
    }

    /// Séquence complète d'une arête: noeud de début, points SG2D, noeud de
    /// fin. L'orientation vit sur la référence (FSPT ou VRPT), pas sur
    /// l'arête: la séquence entière est inversée pour ORNT=2. Un noeud
    /// irrésoluble est omis, jamais fatal.
    pub fn full_edge_coordinates(&self, edge: &Edge, orientation: u8) -> Vec<Position> {
        let mut coordinates = Vec::with_capacity(edge.points.len() + 2);

        if let Some(rcid) = edge.begin_node {
            if let Some(node) = self.node(rcid) {
                let p = node.positions[0];
                coordinates.push(Position::new(p.lon, p.lat));
            }
        }

        coordinates.extend(edge.points.iter().copied());

        if let Some(rcid) = edge.end_node {
            if let Some(node) = self.node(rcid) {
                let p = node.positions[0];
                coordinates.push(Position::new(p.lon, p.lat));
            }
        }

        if orientation == ORNT_REVERSE {
            coordinates.reverse();
        }

        coordinates
    }

    /// Construit l'anneau d'une surface en parcourant les arêtes dans
    /// l'ordre référencé.
    ///
    /// Le standard promet des frontières référencées séquentiellement: le
    /// parcours suit cet ordre, supprime le point partagé à chaque jonction
    /// (égalité exacte sur les deux composantes) et referme l'anneau si le
    /// dernier point diffère du premier. Quand un producteur viole la
    /// séquentialité, l'anneau résultant est malformé et revient à la
    /// validation: pas de réparation silencieuse.
    pub fn build_ring(&mut self, edge_refs: &[SpatialRef]) -> Result<Vec<Position>, S57Error> {
        if edge_refs.is_empty() {
            return Err(S57Error::invalid_geometry(0, "no edge references provided"));
        }

        let mut ring: Vec<Position> = Vec::new();

        for edge_ref in edge_refs {
            let edge = match self.load_edge(edge_ref.rcid) {
                Ok(edge) => edge,
                Err(_) => {
                    warn!(rcid = edge_ref.rcid, "skipping unresolvable edge reference");
                    continue;
                }
            };

            let mut coordinates = self.full_edge_coordinates(&edge, edge_ref.orientation);

            // Jonction: le dernier point de l'anneau et le premier de la
            // nouvelle arête sont le même noeud
            if let (Some(last), Some(first)) = (ring.last(), coordinates.first()) {
                if last.same_point(first) {
                    coordinates.remove(0);
                }
            }

            ring.extend(coordinates);

            if ring.len() > MAX_RING_POSITIONS {
                return Err(S57Error::invalid_geometry(
                    0,
                    "ring construction budget exhausted",
                ));
            }
        }

        if ring.is_empty() {
            return Err(S57Error::invalid_geometry(
                0,
                "no coordinates collected from edges",
            ));
        }

        if !is_ring_closed(&ring) {
            let first = ring[0];
            ring.push(first);
        }

        Ok(ring)
    }

    /// Collecte indirecte de coordonnées en chassant les pointeurs VRPT.
    ///
    /// Les chaînes VRPT de cartes malformées peuvent être cycliques: le
    /// parcours porte un ensemble de cibles visitées, clé RCID, et saute
    /// tout pointeur déjà vu.
    pub fn resolve_pointers(&self, record: &SpatialRecord) -> Vec<Position> {
        let mut visited = HashSet::new();
        self.resolve_pointers_inner(record, &mut visited)
    }

    fn resolve_pointers_inner(
        &self,
        record: &SpatialRecord,
        visited: &mut HashSet<i64>,
    ) -> Vec<Position> {
        let mut coordinates = Vec::new();

        for pointer in &record.pointers {
            if !visited.insert(pointer.target_rcid) {
                continue;
            }

            let key = SpatialKey {
                rcnm: pointer.target_rcnm,
                rcid: pointer.target_rcid,
            };
            let Some(target) = self.spatial.get(&key) else {
                continue;
            };

            let target_coordinates = if !target.positions.is_empty() {
                target
                    .positions
                    .iter()
                    .map(|p| Position::new(p.lon, p.lat))
                    .collect()
            } else {
                self.resolve_pointers_inner(target, visited)
            };

            if pointer.orientation == ORNT_REVERSE {
                coordinates.extend(target_coordinates.into_iter().rev());
            } else {
                coordinates.extend(target_coordinates);
            }
        }

        coordinates
    }
}

/// Un anneau est fermé si son premier et son dernier point coïncident
pub(crate) fn is_ring_closed(ring: &[Position]) -> bool {
    if ring.len() < 3 {
        return false;
    }
    ring[0].same_point(&ring[ring.len() - 1])
}
