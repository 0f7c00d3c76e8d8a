//! Types de données pour le crate s57

use std::collections::HashMap;
use std::fmt;

use geo::{Coord, LineString, Point, Polygon, Rect};

/// Position géographique WGS-84 en degrés décimaux.
///
/// La profondeur (sonde) est optionnelle: seules les coordonnées SG3D en
/// portent une, dans l'unité impliquée par DUNI (décimètres via SOMF=10).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub lon: f64,
    pub lat: f64,
    pub depth: Option<f64>,
}

impl Position {
    /// Position 2D (lon, lat)
    pub fn new(lon: f64, lat: f64) -> Self {
        Self {
            lon,
            lat,
            depth: None,
        }
    }

    /// Position 3D (lon, lat, profondeur): sondes SG3D
    pub fn with_depth(lon: f64, lat: f64, depth: f64) -> Self {
        Self {
            lon,
            lat,
            depth: Some(depth),
        }
    }

    /// Égalité exacte sur les deux composantes horizontales.
    /// Les jonctions d'arêtes partagent le même noeud, donc les mêmes entiers
    /// SG2D: la comparaison exacte est volontaire, pas de tolérance.
    pub(crate) fn same_point(&self, other: &Position) -> bool {
        self.lon == other.lon && self.lat == other.lat
    }

    fn coord(&self) -> Coord {
        Coord {
            x: self.lon,
            y: self.lat,
        }
    }
}

/// Type de géométrie, dérivé de la primitive PRIM du FRID
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryType {
    Point,
    LineString,
    Polygon,
}

impl fmt::Display for GeometryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryType::Point => write!(f, "Point"),
            GeometryType::LineString => write!(f, "LineString"),
            GeometryType::Polygon => write!(f, "Polygon"),
        }
    }
}

/// Géométrie d'une feature S-57.
///
/// `Point` couvre aussi le multi-point (une feature SOUNDG peut porter des
/// centaines de sondes). `Polygon` est l'anneau extérieur fermé reconstruit
/// par la résolution topologique.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Vec<Position>),
    LineString(Vec<Position>),
    Polygon(Vec<Position>),
}

impl Geometry {
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Point(_) => GeometryType::Point,
            Geometry::LineString(_) => GeometryType::LineString,
            Geometry::Polygon(_) => GeometryType::Polygon,
        }
    }

    pub fn positions(&self) -> &[Position] {
        match self {
            Geometry::Point(p) | Geometry::LineString(p) | Geometry::Polygon(p) => p,
        }
    }

    /// Vide pour les méta-features (PRIM=255) et les géométries dégénérées
    pub fn is_empty(&self) -> bool {
        self.positions().is_empty()
    }

    /// Conversion vers les types `geo` pour l'interopérabilité avec
    /// l'écosystème géospatial Rust. La profondeur des sondes est perdue
    /// (les types `geo` sont 2D); elle reste disponible via les positions.
    pub fn to_geo(&self) -> Option<geo::Geometry> {
        match self {
            Geometry::Point(positions) => match positions.len() {
                0 => None,
                1 => Some(geo::Geometry::Point(Point::from(positions[0].coord()))),
                _ => Some(geo::Geometry::MultiPoint(geo::MultiPoint::new(
                    positions.iter().map(|p| Point::from(p.coord())).collect(),
                ))),
            },
            Geometry::LineString(positions) => {
                if positions.len() < 2 {
                    return None;
                }
                Some(geo::Geometry::LineString(LineString::new(
                    positions.iter().map(Position::coord).collect(),
                )))
            }
            Geometry::Polygon(positions) => {
                if positions.len() < 4 {
                    return None;
                }
                Some(geo::Geometry::Polygon(Polygon::new(
                    LineString::new(positions.iter().map(Position::coord).collect()),
                    vec![],
                )))
            }
        }
    }

    /// Boîte englobante de la géométrie, None si elle est vide
    pub fn bounds(&self) -> Option<Bounds> {
        let positions = self.positions();
        let first = positions.first()?;
        let mut bounds = Bounds::from_position(first);
        for position in &positions[1..] {
            bounds.extend(position);
        }
        Some(bounds)
    }
}

/// Identifiant composite d'une feature, issu du champ FOID.
///
/// Le triplet (AGEN, FIDN, FIDS) est la clé faisant autorité: FIDN seul
/// n'est pas unique entre agences productrices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FeatureKey {
    /// Agence productrice
    pub agen: u16,
    /// Numéro d'identification de la feature
    pub fidn: u32,
    /// Subdivision de l'identifiant
    pub fids: u16,
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.agen, self.fidn, self.fids)
    }
}

/// Valeur d'attribut S-57.
///
/// Les valeurs restent des chaînes à ce niveau (l'interprétation typée -
/// entiers, énumérations, listes: dépend du catalogue et revient à
/// l'appelant). La seule exception est `Numbers`, portée par l'attribut
/// synthétique DEPTHS des features SOUNDG.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Text(String),
    Numbers(Vec<f64>),
}

impl AttributeValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(s) => Some(s),
            AttributeValue::Numbers(_) => None,
        }
    }

    pub fn as_numbers(&self) -> Option<&[f64]> {
        match self {
            AttributeValue::Text(_) => None,
            AttributeValue::Numbers(n) => Some(n),
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Text(s) => write!(f, "{s}"),
            AttributeValue::Numbers(n) => {
                let joined: Vec<String> = n.iter().map(|v| v.to_string()).collect();
                write!(f, "{}", joined.join(","))
            }
        }
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Text(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

/// Une feature navigationnelle avec sa géométrie reconstruite et ses attributs
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// FIDN seul, conservé pour compatibilité
    pub id: i64,

    /// Identifiant composite complet (AGEN, FIDN, FIDS)
    pub foid: FeatureKey,

    /// Acronyme de la classe d'objet (ex: "DEPARE", "LIGHTS", "SOUNDG")
    pub object_class: String,

    /// Géométrie en coordonnées WGS-84
    pub geometry: Geometry,

    /// Attributs (acronyme -> valeur)
    pub attributes: HashMap<String, AttributeValue>,
}

impl Feature {
    /// Valeur d'un attribut par acronyme
    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }
}

/// Boîte englobante géographique (degrés décimaux WGS-84)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl Bounds {
    pub fn from_position(position: &Position) -> Self {
        Self {
            min_lon: position.lon,
            min_lat: position.lat,
            max_lon: position.lon,
            max_lat: position.lat,
        }
    }

    pub fn extend(&mut self, position: &Position) {
        self.min_lon = self.min_lon.min(position.lon);
        self.min_lat = self.min_lat.min(position.lat);
        self.max_lon = self.max_lon.max(position.lon);
        self.max_lat = self.max_lat.max(position.lat);
    }

    /// Union de deux boîtes
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min_lon: self.min_lon.min(other.min_lon),
            min_lat: self.min_lat.min(other.min_lat),
            max_lon: self.max_lon.max(other.max_lon),
            max_lat: self.max_lat.max(other.max_lat),
        }
    }

    pub fn intersects(&self, other: &Bounds) -> bool {
        self.min_lon <= other.max_lon
            && self.max_lon >= other.min_lon
            && self.min_lat <= other.max_lat
            && self.max_lat >= other.min_lat
    }

    /// Conversion vers `geo::Rect`, None pour une boîte dégénérée inversée
    pub fn to_rect(&self) -> Option<Rect> {
        if self.min_lon > self.max_lon || self.min_lat > self.max_lat {
            return None;
        }
        Some(Rect::new(
            Coord {
                x: self.min_lon,
                y: self.min_lat,
            },
            Coord {
                x: self.max_lon,
                y: self.max_lat,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_to_geo_point() {
        let geometry = Geometry::Point(vec![Position::new(-71.0, 42.0)]);
        match geometry.to_geo() {
            Some(geo::Geometry::Point(p)) => {
                assert_eq!(p.x(), -71.0);
                assert_eq!(p.y(), 42.0);
            }
            other => panic!("expected Point, got {other:?}"),
        }
    }

    #[test]
    fn test_geometry_to_geo_multipoint_for_soundings() {
        let geometry = Geometry::Point(vec![
            Position::with_depth(-71.0, 42.0, 10.0),
            Position::with_depth(-71.001, 42.001, 12.5),
        ]);
        assert!(matches!(
            geometry.to_geo(),
            Some(geo::Geometry::MultiPoint(_))
        ));
    }

    #[test]
    fn test_empty_geometry_has_no_bounds() {
        let geometry = Geometry::Point(vec![]);
        assert!(geometry.is_empty());
        assert!(geometry.bounds().is_none());
        assert!(geometry.to_geo().is_none());
    }

    #[test]
    fn test_bounds_union_and_intersects() {
        let a = Bounds {
            min_lon: -72.0,
            min_lat: 41.0,
            max_lon: -71.0,
            max_lat: 42.0,
        };
        let b = Bounds {
            min_lon: -71.5,
            min_lat: 41.5,
            max_lon: -70.0,
            max_lat: 43.0,
        };
        let union = a.union(&b);
        assert_eq!(union.min_lon, -72.0);
        assert_eq!(union.max_lon, -70.0);
        assert_eq!(union.max_lat, 43.0);
        assert!(a.intersects(&b));

        let far = Bounds {
            min_lon: 10.0,
            min_lat: 10.0,
            max_lon: 11.0,
            max_lat: 11.0,
        };
        assert!(!a.intersects(&far));
    }

    #[test]
    fn test_feature_key_display() {
        let key = FeatureKey {
            agen: 540,
            fidn: 1,
            fids: 0,
        };
        assert_eq!(key.to_string(), "(540, 1, 0)");
    }
}
